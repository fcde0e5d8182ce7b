//! Error types for the delta engine
//!
//! None of these occur in normal operation: they flag malformed action
//! lists or out-of-bounds reconciliation calls, i.e. caller bugs.

use crate::models::ActionKind;
use thiserror::Error;

/// Top-level engine error
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DeltaError {
    /// Action rejected at construction time
    #[error("Invalid action: {0}")]
    InvalidAction(#[from] InvalidActionError),

    /// `compose` reached a pairing that a well-formed list never produces
    #[error("Unknown compose case: {this} then {other}")]
    ComposeInvariant { this: ActionKind, other: ActionKind },

    /// Overlay reconciliation called outside the body bounds
    #[error("Overlay precondition violated: {0}")]
    OverlayPrecondition(#[from] OverlayPreconditionError),

    /// JSON conversion failure at the API boundary
    #[error("Serialization error: {0}")]
    Serialization(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidActionError {
    #[error("{kind} action with zero length")]
    ZeroLength { kind: ActionKind },

    #[error("{kind} action has len {len} but its body stream has {body_len} positions")]
    LengthMismatch { kind: ActionKind, len: usize, body_len: usize },

    #[error("action targets segment '{found}' in a list for segment '{expected}'")]
    MixedSegments { expected: String, found: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OverlayPreconditionError {
    #[error("span [{index}, {index}+{len}) outside stream of length {stream_len}")]
    OutOfBounds { index: usize, len: usize, stream_len: usize },

    #[error("inverted range [{start}, {end}]")]
    InvertedRange { start: usize, end: usize },
}

impl From<serde_json::Error> for DeltaError {
    fn from(e: serde_json::Error) -> Self {
        DeltaError::Serialization(e.to_string())
    }
}
