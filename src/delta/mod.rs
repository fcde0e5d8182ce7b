//! Delta layer: iterate, build and compose action lists
//!
//! - `iterator`: slice-aware cursor over an action list
//! - `text_x`: canonicalizing builder and `compose`

pub mod iterator;
pub mod text_x;

pub use iterator::ActionIterator;
pub use text_x::TextX;
