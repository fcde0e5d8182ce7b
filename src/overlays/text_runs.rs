//! Style run reconciliation
//!
//! Runs are half-open `[st, ed)` and kept maximal: after every edit,
//! touching runs with the same style are merged back together.

use super::segments::{classify, removed_part, subtract_segment, Overlap};
use super::check_bounds;
use crate::errors::OverlayPreconditionError;
use crate::models::{DocumentBody, TextRun};
use crate::ops::normalize_text_runs;

/// Reconcile runs for `text_length` positions inserted at `current_index`
///
/// When `insert_body` carries no run list, the inserted text inherits the
/// style of the run it lands in (a run starting before the insertion point
/// and ending at or after it is extended). When it carries one, that run is
/// split around the inserted runs instead, and equal-style neighbours are
/// merged afterwards.
pub fn insert_text_runs(
    body: &mut DocumentBody,
    insert_body: &DocumentBody,
    text_length: usize,
    current_index: usize,
) -> Result<(), OverlayPreconditionError> {
    check_bounds(body, current_index, 0)?;

    let incoming: Option<Vec<TextRun>> = insert_body.text_runs.as_ref().map(|runs| {
        runs.iter()
            .map(|run| TextRun {
                st: run.st + current_index,
                ed: run.ed + current_index,
                ..run.clone()
            })
            .collect()
    });

    let Some(runs) = body.text_runs.as_mut() else {
        // Nothing to inherit from; explicit styles still land
        if let Some(incoming) = incoming.filter(|runs| !runs.is_empty()) {
            body.text_runs = Some(normalize_text_runs(incoming));
        }
        return Ok(());
    };

    let mut out = Vec::with_capacity(runs.len() + incoming.as_ref().map_or(0, Vec::len) + 1);
    let mut spliced = false;
    for run in runs.drain(..) {
        let TextRun { st, ed, .. } = run;
        if ed < current_index {
            out.push(run);
        } else if st >= current_index {
            out.push(TextRun {
                st: st + text_length,
                ed: ed + text_length,
                ..run
            });
        } else {
            match &incoming {
                None => out.push(TextRun {
                    ed: ed + text_length,
                    ..run
                }),
                Some(incoming) => {
                    out.push(TextRun {
                        ed: current_index,
                        ..run.clone()
                    });
                    out.extend(incoming.iter().cloned());
                    if ed > current_index {
                        out.push(TextRun {
                            st: current_index + text_length,
                            ed: ed + text_length,
                            ..run
                        });
                    }
                    spliced = true;
                }
            }
        }
    }

    if let (false, Some(incoming)) = (spliced, incoming) {
        out.extend(incoming);
        out.sort_by_key(|run| run.st);
    }
    *runs = normalize_text_runs(out);
    Ok(())
}

/// Reconcile runs for `text_length` positions deleted at `current_index`
///
/// Returns the deleted parts of every overlapping run, rebased to the
/// deletion start.
pub fn delete_text_runs(
    body: &mut DocumentBody,
    text_length: usize,
    current_index: usize,
) -> Result<Vec<TextRun>, OverlayPreconditionError> {
    check_bounds(body, current_index, text_length)?;
    let Some(runs) = body.text_runs.as_mut() else {
        return Ok(Vec::new());
    };
    if text_length == 0 {
        return Ok(Vec::new());
    }

    let (ds, de) = (current_index, current_index + text_length);
    let mut removed = Vec::new();
    let mut kept = Vec::with_capacity(runs.len());
    for run in runs.drain(..) {
        let overlap = classify(run.st, run.ed, ds, de);
        if !matches!(overlap, Overlap::Before | Overlap::After) {
            let (st, ed) = removed_part(run.st, run.ed, ds, de);
            removed.push(TextRun { st, ed, ..run.clone() });
        }
        match overlap {
            Overlap::Before => kept.push(run),
            Overlap::Inside => {}
            _ => {
                let (st, ed) = subtract_segment(run.st, run.ed, ds, de);
                kept.push(TextRun { st, ed, ..run });
            }
        }
    }
    *runs = normalize_text_runs(kept);
    Ok(removed)
}
