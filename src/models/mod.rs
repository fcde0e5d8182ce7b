//! Models module for the delta engine
//!
//! Document bodies with their overlays, style payloads, and edit actions.

pub mod action;
pub mod body;
pub mod style;

// Re-export commonly used types
pub use action::*;
pub use body::*;
pub use style::*;
