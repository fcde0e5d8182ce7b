//! Custom range (hyperlink, comment, mention, ...) reconciliation

use super::ranges::{delete_ranges, insert_ranges};
use super::check_bounds;
use crate::errors::OverlayPreconditionError;
use crate::models::{CustomRange, DocumentBody};

pub fn insert_custom_ranges(
    body: &mut DocumentBody,
    insert_body: &DocumentBody,
    text_length: usize,
    current_index: usize,
) -> Result<(), OverlayPreconditionError> {
    check_bounds(body, current_index, 0)?;
    insert_ranges(
        &mut body.custom_ranges,
        insert_body.custom_ranges.as_deref(),
        text_length,
        current_index,
    )
}

pub fn delete_custom_ranges(
    body: &mut DocumentBody,
    text_length: usize,
    current_index: usize,
) -> Result<Vec<CustomRange>, OverlayPreconditionError> {
    check_bounds(body, current_index, text_length)?;
    delete_ranges(&mut body.custom_ranges, text_length, current_index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CustomRangeType;

    fn link(start: usize, end: usize) -> CustomRange {
        CustomRange::new(start, end, "link-1", CustomRangeType::Hyperlink)
    }

    fn sample() -> DocumentBody {
        DocumentBody::new("go \u{1F}here\u{1E}").with_custom_ranges(vec![link(3, 8)])
    }

    #[test]
    fn test_insert_before_range_moves_it() {
        let mut body = sample();
        insert_custom_ranges(&mut body, &DocumentBody::new("ab"), 2, 1).unwrap();
        assert_eq!(body.custom_ranges, Some(vec![link(5, 10)]));
    }

    #[test]
    fn test_delete_clips_range_start() {
        let mut body = sample();
        let removed = delete_custom_ranges(&mut body, 3, 2).unwrap();
        assert_eq!(removed, vec![link(1, 2)]);
        assert_eq!(body.custom_ranges, Some(vec![link(2, 5)]));
    }
}
