//! Paragraph reconciliation
//!
//! A paragraph is anchored at its terminator (`\r`) and its style belongs
//! to the text before it. Splitting and joining paragraphs therefore moves
//! formatting between terminators, see the two special cases below.

use super::points::{delete_points, insert_points};
use super::check_bounds;
use crate::errors::OverlayPreconditionError;
use crate::models::{DocumentBody, Paragraph};

/// Shift paragraphs and merge the ones carried by `insert_body`
///
/// Inserting a single bare terminator splits the paragraph it lands in:
/// the new terminator takes the style of the paragraph that follows it,
/// and that paragraph takes the style supplied with the insertion.
pub fn insert_paragraphs(
    body: &mut DocumentBody,
    insert_body: &DocumentBody,
    text_length: usize,
    current_index: usize,
) -> Result<(), OverlayPreconditionError> {
    check_bounds(body, current_index, 0)?;

    let incoming = insert_body.paragraphs.as_deref();
    let merged_at = insert_points(&mut body.paragraphs, incoming, text_length, current_index);

    let splits = insert_body.is_bare_paragraph() && incoming.map_or(0, <[Paragraph]>::len) == 1;
    if let (true, Some(at), Some(paragraphs)) = (splits, merged_at, body.paragraphs.as_mut()) {
        if let [inserted, next, ..] = &mut paragraphs[at..] {
            inserted.swap_format(next);
        }
    }
    Ok(())
}

/// Remove terminators inside the deleted span
///
/// When terminators are deleted, the first paragraph after the span now
/// ends the merged text and inherits the format of the first deleted
/// terminator. The removed entry records the format that paragraph had
/// before, so undo can put both back.
pub fn delete_paragraphs(
    body: &mut DocumentBody,
    text_length: usize,
    current_index: usize,
) -> Result<Vec<Paragraph>, OverlayPreconditionError> {
    check_bounds(body, current_index, text_length)?;

    let (mut removed, next) = delete_points(&mut body.paragraphs, text_length, current_index);
    if let (Some(first), Some(following)) = (
        removed.first_mut(),
        body.paragraphs.as_mut().and_then(|p| p.get_mut(next)),
    ) {
        first.swap_format(following);
    }
    Ok(removed)
}
