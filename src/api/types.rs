//! Shared types for the WASM API

use crate::models::{Action, DocumentBody};
use serde::{Deserialize, Serialize};

/// Result of applying an action list
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ApplyResult {
    /// The body after the edit
    pub body: DocumentBody,
    /// Actions that revert the edit
    pub inverse: Vec<Action>,
}
