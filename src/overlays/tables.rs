//! Table reconciliation

use super::ranges::{delete_ranges, insert_ranges};
use super::check_bounds;
use crate::errors::OverlayPreconditionError;
use crate::models::{DocumentBody, Table};

pub fn insert_tables(
    body: &mut DocumentBody,
    insert_body: &DocumentBody,
    text_length: usize,
    current_index: usize,
) -> Result<(), OverlayPreconditionError> {
    check_bounds(body, current_index, 0)?;
    insert_ranges(&mut body.tables, insert_body.tables.as_deref(), text_length, current_index)
}

pub fn delete_tables(
    body: &mut DocumentBody,
    text_length: usize,
    current_index: usize,
) -> Result<Vec<Table>, OverlayPreconditionError> {
    check_bounds(body, current_index, text_length)?;
    delete_ranges(&mut body.tables, text_length, current_index)
}
