//! Applying action lists to a live document body

pub mod executor;

pub use executor::{apply_actions, apply_actions_with, ExecuteOptions};
