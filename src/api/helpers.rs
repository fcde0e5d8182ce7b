//! Shared helpers for WASM API operations
//!
//! Serialization, deserialization and error conversion used by every
//! exported function.

use crate::errors::DeltaError;
use serde::de::DeserializeOwned;
use serde::Serialize;
use wasm_bindgen::prelude::*;

// ============================================================================
// Console Logging Functions
// ============================================================================

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = console)]
    fn info(s: &str);

    #[wasm_bindgen(js_namespace = console)]
    fn error(s: &str);
}

// ============================================================================
// Logging Macro
// ============================================================================

/// Log an info message with [WASM] prefix
#[macro_export]
macro_rules! wasm_info {
    ($($arg:tt)*) => {
        $crate::api::helpers::log_info(&format!($($arg)*))
    };
}

pub fn log_info(msg: &str) {
    info(&format!("[WASM] {}", msg));
}

pub fn log_error(msg: &str) {
    error(&format!("[WASM] {}", msg));
}

// ============================================================================
// Serialization/Deserialization Helpers
// ============================================================================

/// Deserialize a value from JavaScript with automatic error handling
pub fn deserialize<T: DeserializeOwned>(value: JsValue, error_context: &str) -> Result<T, JsValue> {
    serde_wasm_bindgen::from_value(value).map_err(|e| {
        let msg = format!("{}: {}", error_context, e);
        log_error(&msg);
        js_sys::Error::new(&msg).into()
    })
}

/// Serialize a value to JavaScript
///
/// Uses the JSON-compatible serializer so style maps arrive as plain
/// objects rather than `Map`s.
pub fn serialize<T: Serialize>(value: &T, error_context: &str) -> Result<JsValue, JsValue> {
    let serializer = serde_wasm_bindgen::Serializer::json_compatible();
    value.serialize(&serializer).map_err(|e| {
        let msg = format!("{}: {}", error_context, e);
        log_error(&msg);
        js_sys::Error::new(&msg).into()
    })
}

// ============================================================================
// Result Conversion Helpers
// ============================================================================

/// Convert an engine error into a thrown JavaScript `Error`
pub fn delta_error(context: &str, err: DeltaError) -> JsValue {
    let msg = format!("{}: {}", context, err);
    log_error(&msg);
    js_sys::Error::new(&msg).into()
}
