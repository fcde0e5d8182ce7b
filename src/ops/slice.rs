//! Body slicing
//!
//! Cuts a `[start, end)` window out of a body: the stream and every overlay,
//! rebased so the window starts at 0. The source body is never aliased.

use crate::models::{stream_slice, Anchored, DocumentBody, Spanned, TextRun};

/// Copy of `body` restricted to positions `[start, end)`
///
/// Text runs are clipped to the window. A body that carried a run list
/// keeps one, even if empty, so an explicitly unstyled span stays unstyled.
/// Range overlays keep entries intersecting the window, clipped to it, and
/// likewise keep a list even if empty. Point overlays keep anchors inside
/// the window.
pub fn get_body_slice(body: &DocumentBody, start: usize, end: usize) -> DocumentBody {
    DocumentBody {
        data_stream: stream_slice(&body.data_stream, start, end),
        text_runs: body
            .text_runs
            .as_ref()
            .map(|runs| slice_text_runs(runs, start, end)),
        paragraphs: slice_points(body.paragraphs.as_deref(), start, end),
        section_breaks: slice_points(body.section_breaks.as_deref(), start, end),
        custom_blocks: slice_points(body.custom_blocks.as_deref(), start, end),
        tables: slice_ranges(body.tables.as_deref(), start, end),
        custom_ranges: slice_ranges(body.custom_ranges.as_deref(), start, end),
    }
}

fn slice_text_runs(runs: &[TextRun], start: usize, end: usize) -> Vec<TextRun> {
    runs.iter()
        .filter(|run| run.st < end && run.ed > start)
        .map(|run| TextRun {
            st: run.st.max(start) - start,
            ed: run.ed.min(end) - start,
            ..run.clone()
        })
        .collect()
}

fn slice_points<T: Anchored + Clone>(
    entries: Option<&[T]>,
    start: usize,
    end: usize,
) -> Option<Vec<T>> {
    let sliced: Vec<T> = entries?
        .iter()
        .filter(|e| e.start_index() >= start && e.start_index() < end)
        .map(|e| {
            let mut e = e.clone();
            e.set_start_index(e.start_index() - start);
            e
        })
        .collect();

    if sliced.is_empty() {
        None
    } else {
        Some(sliced)
    }
}

fn slice_ranges<T: Spanned + Clone>(
    entries: Option<&[T]>,
    start: usize,
    end: usize,
) -> Option<Vec<T>> {
    let entries = entries?;
    if end <= start {
        return Some(Vec::new());
    }
    let sliced = entries
        .iter()
        .filter(|e| e.start_index() < end && e.end_index() >= start)
        .map(|e| {
            let mut e = e.clone();
            let s = e.start_index().max(start) - start;
            let t = e.end_index().min(end - 1) - start;
            e.set_start_index(s);
            e.set_end_index(t);
            e
        })
        .collect();
    Some(sliced)
}
