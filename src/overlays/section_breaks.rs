//! Section break reconciliation

use super::points::{delete_points, insert_points};
use super::check_bounds;
use crate::errors::OverlayPreconditionError;
use crate::models::{DocumentBody, SectionBreak};

pub fn insert_section_breaks(
    body: &mut DocumentBody,
    insert_body: &DocumentBody,
    text_length: usize,
    current_index: usize,
) -> Result<(), OverlayPreconditionError> {
    check_bounds(body, current_index, 0)?;
    insert_points(
        &mut body.section_breaks,
        insert_body.section_breaks.as_deref(),
        text_length,
        current_index,
    );
    Ok(())
}

pub fn delete_section_breaks(
    body: &mut DocumentBody,
    text_length: usize,
    current_index: usize,
) -> Result<Vec<SectionBreak>, OverlayPreconditionError> {
    check_bounds(body, current_index, text_length)?;
    let (removed, _) = delete_points(&mut body.section_breaks, text_length, current_index);
    Ok(removed)
}
