//! Delta engine WASM API
//!
//! # Module Structure
//!
//! - `helpers`: serialization and error conversion shared by every export
//! - `types`: result objects returned to JavaScript
//! - `delta`: compose, apply and normalize action lists

pub mod helpers;
pub mod types;
pub mod delta;

pub use delta::{apply_actions_js, compose_actions, normalize_actions};
pub use types::ApplyResult;
