//! Reconciliation for single-anchor overlays
//!
//! Entries are kept sorted by anchor, so the affected suffix is found by
//! binary search rather than a full scan.

use crate::models::Anchored;

/// Shift anchors at or after `current_index` right and merge `incoming`
///
/// Incoming anchors are relative to the inserted span. Returns the index
/// of the first merged entry, if any were merged.
pub(crate) fn insert_points<T: Anchored + Clone>(
    live: &mut Option<Vec<T>>,
    incoming: Option<&[T]>,
    text_length: usize,
    current_index: usize,
) -> Option<usize> {
    if let Some(entries) = live.as_mut() {
        let first = entries.partition_point(|e| e.start_index() < current_index);
        for entry in &mut entries[first..] {
            entry.set_start_index(entry.start_index() + text_length);
        }
    }

    let incoming = incoming.filter(|v| !v.is_empty())?;
    let entries = live.get_or_insert_with(Vec::new);
    let at = entries.partition_point(|e| e.start_index() < current_index);
    entries.splice(
        at..at,
        incoming.iter().map(|e| {
            let mut e = e.clone();
            e.set_start_index(e.start_index() + current_index);
            e
        }),
    );

    // Anchors past the inserted span would break the order
    if incoming.iter().any(|e| e.start_index() >= text_length) {
        entries.sort_by_key(|e| e.start_index());
    }
    Some(at)
}

/// Remove anchors inside `[current_index, current_index + text_length)`
///
/// Removed entries come back rebased to the deletion start. Returns the
/// removed entries and the index of the first surviving entry after the
/// deleted span.
pub(crate) fn delete_points<T: Anchored>(
    live: &mut Option<Vec<T>>,
    text_length: usize,
    current_index: usize,
) -> (Vec<T>, usize) {
    let Some(entries) = live.as_mut() else {
        return (Vec::new(), 0);
    };
    let end = current_index + text_length;
    let lo = entries.partition_point(|e| e.start_index() < current_index);
    let hi = entries.partition_point(|e| e.start_index() < end);

    let removed: Vec<T> = entries
        .drain(lo..hi)
        .map(|mut e| {
            e.set_start_index(e.start_index() - current_index);
            e
        })
        .collect();
    for entry in &mut entries[lo..] {
        entry.set_start_index(entry.start_index() - text_length);
    }
    (removed, lo)
}
