//! Body primitives used by the iterator, the composer and the executor
//!
//! - `slice`: cut a window out of a body
//! - `compose_body`: merge attribute bodies, normalize style runs

pub mod compose_body;
pub mod slice;

pub use compose_body::{
    compose_body, cover_paragraph, cover_text_runs, is_same_style_text_run, normalize_text_runs,
};
pub use slice::get_body_slice;
