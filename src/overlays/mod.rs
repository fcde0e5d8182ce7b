//! Overlay Reconciler
//!
//! Keeps the position-keyed overlays of a [`DocumentBody`] consistent when a
//! contiguous span of the data stream is inserted or deleted. Each overlay
//! kind has an `insert_*` / `delete_*` pair; deletes return the removed
//! entries rebased to the deletion start, which is the payload undo needs.
//!
//! All functions validate positions against the stream *before* it is
//! spliced. [`insert_body`] and [`delete_body`] run every pair and splice
//! the stream themselves.
//!
//! ## Modules
//!
//! - `points`: shared sorted algorithms for single-anchor overlays
//! - `ranges`: shared algorithms for closed-range overlays
//! - `segments`: half-open segment arithmetic

mod points;
mod ranges;
pub mod segments;

pub mod custom_blocks;
pub mod custom_ranges;
pub mod paragraphs;
pub mod section_breaks;
pub mod tables;
pub mod text_runs;

pub use custom_blocks::{delete_custom_blocks, insert_custom_blocks};
pub use custom_ranges::{delete_custom_ranges, insert_custom_ranges};
pub use paragraphs::{delete_paragraphs, insert_paragraphs};
pub use section_breaks::{delete_section_breaks, insert_section_breaks};
pub use tables::{delete_tables, insert_tables};
pub use text_runs::{delete_text_runs, insert_text_runs};

use crate::errors::OverlayPreconditionError;
use crate::models::{stream_insert, stream_remove, stream_slice, DocumentBody};

pub(crate) fn check_bounds(
    body: &DocumentBody,
    current_index: usize,
    text_length: usize,
) -> Result<(), OverlayPreconditionError> {
    let stream_len = body.len();
    match current_index.checked_add(text_length) {
        Some(end) if end <= stream_len => Ok(()),
        _ => Err(OverlayPreconditionError::OutOfBounds {
            index: current_index,
            len: text_length,
            stream_len,
        }),
    }
}

fn non_empty<T>(entries: Vec<T>) -> Option<Vec<T>> {
    if entries.is_empty() {
        None
    } else {
        Some(entries)
    }
}

/// Insert `insert_body` (stream and overlays) at `current_index`
pub fn insert_body(
    body: &mut DocumentBody,
    insert_body: &DocumentBody,
    current_index: usize,
) -> Result<(), OverlayPreconditionError> {
    check_bounds(body, current_index, 0)?;
    let text_length = insert_body.len();

    insert_text_runs(body, insert_body, text_length, current_index)?;
    insert_paragraphs(body, insert_body, text_length, current_index)?;
    insert_section_breaks(body, insert_body, text_length, current_index)?;
    insert_custom_blocks(body, insert_body, text_length, current_index)?;
    insert_tables(body, insert_body, text_length, current_index)?;
    insert_custom_ranges(body, insert_body, text_length, current_index)?;

    body.data_stream = stream_insert(&body.data_stream, current_index, &insert_body.data_stream);
    log::trace!("inserted {} positions at {}", text_length, current_index);
    Ok(())
}

/// Delete `text_length` positions at `current_index`
///
/// Returns the removed content as a body: the removed stream plus every
/// removed overlay entry, positioned relative to the deletion. Re-inserting
/// it at the same index undoes the deletion. Text runs and range overlays
/// are returned as lists (possibly empty) whenever the body had them, so
/// the re-inserted span neither inherits a neighbouring style nor joins a
/// neighbouring range.
pub fn delete_body(
    body: &mut DocumentBody,
    text_length: usize,
    current_index: usize,
) -> Result<DocumentBody, OverlayPreconditionError> {
    check_bounds(body, current_index, text_length)?;
    let had_runs = body.text_runs.is_some();
    let had_tables = body.tables.is_some();
    let had_ranges = body.custom_ranges.is_some();

    let text_runs = delete_text_runs(body, text_length, current_index)?;
    let paragraphs = delete_paragraphs(body, text_length, current_index)?;
    let section_breaks = delete_section_breaks(body, text_length, current_index)?;
    let custom_blocks = delete_custom_blocks(body, text_length, current_index)?;
    let tables = delete_tables(body, text_length, current_index)?;
    let custom_ranges = delete_custom_ranges(body, text_length, current_index)?;

    let removed = DocumentBody {
        data_stream: stream_slice(&body.data_stream, current_index, current_index + text_length),
        text_runs: had_runs.then_some(text_runs),
        paragraphs: non_empty(paragraphs),
        section_breaks: non_empty(section_breaks),
        custom_blocks: non_empty(custom_blocks),
        tables: had_tables.then_some(tables),
        custom_ranges: had_ranges.then_some(custom_ranges),
    };

    body.data_stream = stream_remove(&body.data_stream, current_index, text_length);
    log::trace!("deleted {} positions at {}", text_length, current_index);
    Ok(removed)
}
