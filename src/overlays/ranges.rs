//! Reconciliation for closed-range overlays (tables, custom ranges)

use super::segments::{classify, removed_part, subtract_segment, Overlap};
use crate::errors::OverlayPreconditionError;
use crate::models::Spanned;

fn check_ranges<T: Spanned>(entries: &[T]) -> Result<(), OverlayPreconditionError> {
    match entries.iter().find(|e| e.start_index() > e.end_index()) {
        Some(e) => Err(OverlayPreconditionError::InvertedRange {
            start: e.start_index(),
            end: e.end_index(),
        }),
        None => Ok(()),
    }
}

/// Shift ranges after the insertion point, grow ranges covering it
///
/// An inserted body without a range list (`incoming` is `None`) joins any
/// range it lands in or right behind: a range whose end is at or past
/// `current_index - 1` grows. A body with a list states its own membership.
/// Only ranges strictly around the insertion point grow, ranges starting at
/// it move, and each incoming fragment rejoins the live range with the same
/// id that it touches.
pub(crate) fn insert_ranges<T: Spanned + Clone>(
    live: &mut Option<Vec<T>>,
    incoming: Option<&[T]>,
    text_length: usize,
    current_index: usize,
) -> Result<(), OverlayPreconditionError> {
    let explicit = incoming.is_some();
    let reach = if explicit {
        current_index
    } else {
        current_index.saturating_sub(1)
    };

    if let Some(entries) = live.as_mut() {
        check_ranges(entries)?;
        for entry in entries.iter_mut() {
            let start = entry.start_index();
            if start > current_index || (explicit && start == current_index) {
                entry.set_start_index(start + text_length);
                entry.set_end_index(entry.end_index() + text_length);
            } else if entry.end_index() >= reach {
                entry.set_end_index(entry.end_index() + text_length);
            }
        }
    }

    let Some(incoming) = incoming.filter(|v| !v.is_empty()) else {
        return Ok(());
    };
    check_ranges(incoming)?;
    let entries = live.get_or_insert_with(Vec::new);
    for fragment in incoming {
        let start = fragment.start_index() + current_index;
        let end = fragment.end_index() + current_index;
        let touching = entries.iter_mut().find(|e| {
            e.span_id() == fragment.span_id()
                && e.start_index() <= end + 1
                && start <= e.end_index() + 1
        });
        match touching {
            Some(entry) => {
                entry.set_start_index(entry.start_index().min(start));
                entry.set_end_index(entry.end_index().max(end));
            }
            None => {
                let mut entry = fragment.clone();
                entry.set_start_index(start);
                entry.set_end_index(end);
                entries.push(entry);
            }
        }
    }
    entries.sort_by_key(|e| e.start_index());
    Ok(())
}

/// Trim ranges against the deleted span `[current_index, current_index + text_length)`
///
/// Ranges fully inside the span are removed. Partially covered ranges are
/// clipped and later ranges shift left. Every removed part, whole range or
/// clipped piece, is returned rebased to the span start, so re-inserting
/// them restores the ranges.
pub(crate) fn delete_ranges<T: Spanned + Clone>(
    live: &mut Option<Vec<T>>,
    text_length: usize,
    current_index: usize,
) -> Result<Vec<T>, OverlayPreconditionError> {
    let Some(entries) = live.as_mut() else {
        return Ok(Vec::new());
    };
    check_ranges(entries)?;
    if text_length == 0 {
        return Ok(Vec::new());
    }

    let (ds, de) = (current_index, current_index + text_length);
    let mut removed = Vec::new();
    let mut kept = Vec::with_capacity(entries.len());
    for mut entry in entries.drain(..) {
        // Closed [start, end] as half-open [start, end + 1)
        let (st, ed) = (entry.start_index(), entry.end_index() + 1);
        match classify(st, ed, ds, de) {
            Overlap::Before => kept.push(entry),
            Overlap::Inside => {
                entry.set_start_index(st - ds);
                entry.set_end_index(ed - 1 - ds);
                removed.push(entry);
            }
            overlap => {
                if overlap != Overlap::After {
                    let (piece_st, piece_ed) = removed_part(st, ed, ds, de);
                    let mut piece = entry.clone();
                    piece.set_start_index(piece_st);
                    piece.set_end_index(piece_ed - 1);
                    removed.push(piece);
                }
                let (new_st, new_ed) = subtract_segment(st, ed, ds, de);
                entry.set_start_index(new_st);
                entry.set_end_index(new_ed - 1);
                kept.push(entry);
            }
        }
    }
    *entries = kept;
    Ok(removed)
}
