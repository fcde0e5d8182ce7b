//! WASM build test
//!
//! Exercises the exported functions through `JsValue`, so it only runs on
//! the wasm32 target (`wasm-pack test --headless --chrome`).

#![cfg(target_arch = "wasm32")]

use docs_delta_wasm::api::{apply_actions_js, compose_actions, normalize_actions, ApplyResult};
use docs_delta_wasm::*;
use wasm_bindgen::JsValue;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

fn to_js<T: serde::Serialize>(value: &T) -> JsValue {
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .unwrap()
}

#[wasm_bindgen_test]
fn test_compose_actions() {
    let a = vec![Action::insert(2, DocumentBody::new("ab"), "")];
    let b = vec![Action::delete(2, "")];

    let composed = compose_actions(to_js(&a), to_js(&b)).unwrap();
    let composed: Vec<Action> = serde_wasm_bindgen::from_value(composed).unwrap();
    assert!(composed.is_empty());
}

#[wasm_bindgen_test]
fn test_apply_actions() {
    let body = DocumentBody::new("ab\r").with_paragraphs(vec![Paragraph::new(2)]);
    let actions = vec![Action::retain(2, ""), Action::insert(1, DocumentBody::new("c"), "")];

    let result = apply_actions_js(to_js(&body), to_js(&actions)).unwrap();
    let result: ApplyResult = serde_wasm_bindgen::from_value(result).unwrap();

    assert_eq!(result.body.data_stream, "abc\r");
    assert_eq!(result.inverse, vec![Action::retain(2, ""), Action::delete(1, "")]);
}

#[wasm_bindgen_test]
fn test_apply_actions_rejects_out_of_bounds() {
    let body = DocumentBody::new("ab");
    let actions = vec![Action::delete(5, "")];

    assert!(apply_actions_js(to_js(&body), to_js(&actions)).is_err());
}

#[wasm_bindgen_test]
fn test_normalize_actions() {
    let actions = vec![Action::delete(1, ""), Action::delete(2, ""), Action::retain(3, "")];

    let normalized = normalize_actions(to_js(&actions)).unwrap();
    let normalized: Vec<Action> = serde_wasm_bindgen::from_value(normalized).unwrap();
    assert_eq!(normalized, vec![Action::delete(3, "")]);
}
