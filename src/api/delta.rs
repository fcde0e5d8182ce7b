//! Action list operations
//!
//! JS owns the document; these functions take bodies and action lists as
//! plain objects in the persisted JSON shape and return new values.

use wasm_bindgen::prelude::*;

use super::helpers::{delta_error, deserialize, serialize};
use super::types::ApplyResult;
use crate::delta::TextX;
use crate::models::{Action, DocumentBody};
use crate::mutation::apply_actions;
use crate::wasm_info;

/// Compose two sequential action lists into one
///
/// # Parameters
/// - `a_js`: actions applied first
/// - `b_js`: actions applied to the result of `a_js`
///
/// # Returns
/// A single action list equivalent to applying both in order
#[wasm_bindgen(js_name = composeActions)]
pub fn compose_actions(a_js: JsValue, b_js: JsValue) -> Result<JsValue, JsValue> {
    let a: Vec<Action> = deserialize(a_js, "Failed to deserialize first action list")?;
    let b: Vec<Action> = deserialize(b_js, "Failed to deserialize second action list")?;
    wasm_info!("composeActions called: {} + {} actions", a.len(), b.len());

    let composed = TextX::compose(&a, &b).map_err(|e| delta_error("composeActions failed", e))?;
    serialize(&composed, "Failed to serialize composed actions")
}

/// Apply an action list to a body
///
/// # Returns
/// JavaScript object with `body` (the edited body) and `inverse` (the
/// action list that reverts the edit)
#[wasm_bindgen(js_name = applyActions)]
pub fn apply_actions_js(body_js: JsValue, actions_js: JsValue) -> Result<JsValue, JsValue> {
    let mut body: DocumentBody = deserialize(body_js, "Failed to deserialize body")?;
    let actions: Vec<Action> = deserialize(actions_js, "Failed to deserialize actions")?;
    wasm_info!("applyActions called: {} actions on {} positions", actions.len(), body.len());

    let inverse =
        apply_actions(&mut body, &actions).map_err(|e| delta_error("applyActions failed", e))?;
    serialize(&ApplyResult { body, inverse }, "Failed to serialize apply result")
}

/// Validate an action list and bring it into canonical form
#[wasm_bindgen(js_name = normalizeActions)]
pub fn normalize_actions(actions_js: JsValue) -> Result<JsValue, JsValue> {
    let actions: Vec<Action> = deserialize(actions_js, "Failed to deserialize actions")?;

    let normalized =
        TextX::normalize(actions).map_err(|e| delta_error("normalizeActions failed", e))?;
    serialize(&normalized, "Failed to serialize actions")
}
