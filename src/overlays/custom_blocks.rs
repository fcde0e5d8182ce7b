//! Custom block (inline drawing placeholder) reconciliation

use super::points::{delete_points, insert_points};
use super::check_bounds;
use crate::errors::OverlayPreconditionError;
use crate::models::{CustomBlock, DocumentBody};

pub fn insert_custom_blocks(
    body: &mut DocumentBody,
    insert_body: &DocumentBody,
    text_length: usize,
    current_index: usize,
) -> Result<(), OverlayPreconditionError> {
    check_bounds(body, current_index, 0)?;
    insert_points(
        &mut body.custom_blocks,
        insert_body.custom_blocks.as_deref(),
        text_length,
        current_index,
    );
    Ok(())
}

pub fn delete_custom_blocks(
    body: &mut DocumentBody,
    text_length: usize,
    current_index: usize,
) -> Result<Vec<CustomBlock>, OverlayPreconditionError> {
    check_bounds(body, current_index, text_length)?;
    let (removed, _) = delete_points(&mut body.custom_blocks, text_length, current_index);
    Ok(removed)
}
