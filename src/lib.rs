//! Rich-document delta engine WASM module
//!
//! Describes edits to a rich document body (a character stream plus
//! position-keyed overlays) as action lists, composes them, and applies
//! them while keeping every overlay consistent. Inverse lists produced on
//! apply drive undo.

pub mod api;
pub mod delta;
pub mod errors;
pub mod models;
pub mod mutation;
pub mod ops;
pub mod overlays;
pub mod undo;

// Re-export commonly used types
pub use delta::{ActionIterator, TextX};
pub use errors::{DeltaError, InvalidActionError, OverlayPreconditionError};
pub use models::*;
pub use mutation::{apply_actions, apply_actions_with, ExecuteOptions};
pub use undo::{UndoEntry, UndoStack};

use wasm_bindgen::prelude::*;

// This is like the `main` function, but for WASM modules.
#[wasm_bindgen(start)]
pub fn main() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();

    #[cfg(feature = "console_log")]
    if console_log::init_with_level(log::Level::Debug).is_err() {
        // Logger already installed by an earlier start call
        return;
    }

    log::info!("Delta engine WASM module initialized");
}
