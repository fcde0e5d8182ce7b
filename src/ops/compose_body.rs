//! Attribute merging between bodies
//!
//! Shared by `TextX::compose` (merging two bodies covering the same span)
//! and by the executor (applying a styling retain to live content).

use crate::models::{CoverType, DocumentBody, Paragraph, TextRun};

/// Two runs render identically
pub fn is_same_style_text_run(a: &TextRun, b: &TextRun) -> bool {
    a.ts == b.ts && a.s_id == b.s_id
}

/// Drop empty and plain runs, then merge touching runs of equal style
pub fn normalize_text_runs(runs: Vec<TextRun>) -> Vec<TextRun> {
    let mut out: Vec<TextRun> = Vec::with_capacity(runs.len());
    for run in runs {
        if run.is_empty() || run.is_plain() {
            continue;
        }
        match out.last_mut() {
            Some(last) if last.ed == run.st && is_same_style_text_run(last, &run) => {
                last.ed = run.ed;
            }
            _ => out.push(run),
        }
    }
    out
}

/// Lay `update` runs over `base` runs
///
/// Every elementary segment covered by an update run gets either the
/// merged style (`Cover`) or the update style verbatim (`Replace`).
/// Segments without an update run keep the base style. Both inputs must be
/// sorted and non-overlapping.
pub fn cover_text_runs(
    base: &[TextRun],
    update: &[TextRun],
    cover_type: CoverType,
) -> Vec<TextRun> {
    let mut points: Vec<usize> = base
        .iter()
        .chain(update.iter())
        .flat_map(|run| [run.st, run.ed])
        .collect();
    points.sort_unstable();
    points.dedup();

    let mut out = Vec::with_capacity(points.len());
    let (mut bi, mut ui) = (0, 0);
    for window in points.windows(2) {
        let (st, ed) = (window[0], window[1]);
        while bi < base.len() && base[bi].ed <= st {
            bi += 1;
        }
        while ui < update.len() && update[ui].ed <= st {
            ui += 1;
        }
        let b = base.get(bi).filter(|run| run.st <= st);
        let u = update.get(ui).filter(|run| run.st <= st);

        let run = match (b, u) {
            (None, None) => continue,
            (Some(b), None) => TextRun { st, ed, ..b.clone() },
            (None, Some(u)) => TextRun { st, ed, ..u.clone() },
            (Some(b), Some(u)) => match cover_type {
                CoverType::Cover => TextRun {
                    st,
                    ed,
                    ts: b.ts.merged(&u.ts),
                    s_id: u.s_id.clone().or_else(|| b.s_id.clone()),
                },
                CoverType::Replace => TextRun { st, ed, ..u.clone() },
            },
        };
        out.push(run);
    }

    normalize_text_runs(out)
}

/// Apply a paragraph attribute update onto an existing paragraph
pub fn cover_paragraph(target: &mut Paragraph, update: &Paragraph, cover_type: CoverType) {
    match cover_type {
        CoverType::Cover => {
            let old = target.paragraph_style.take();
            target.paragraph_style = match (old, &update.paragraph_style) {
                (Some(old), Some(new)) => Some(old.merged(new)),
                (old, None) => old,
                (None, Some(new)) => Some(new.clone()),
            };
            if update.bullet.is_some() {
                target.bullet = update.bullet.clone();
            }
        }
        CoverType::Replace => {
            target.paragraph_style = update.paragraph_style.clone();
            target.bullet = update.bullet.clone();
        }
    }
}

/// Merge the attributes of `overlay` into `base`, both covering the same span
///
/// The stream comes from `base` (or `overlay` if `base` has none). When
/// `base` carries content, paragraph updates only touch paragraphs it
/// already has; when it is itself an attribute body, updates at new
/// positions are kept too.
pub fn compose_body(
    base: &DocumentBody,
    overlay: &DocumentBody,
    cover_type: CoverType,
) -> DocumentBody {
    let data_stream = if base.data_stream.is_empty() {
        overlay.data_stream.clone()
    } else {
        base.data_stream.clone()
    };

    let text_runs = match (&base.text_runs, &overlay.text_runs) {
        (None, None) => None,
        (base_runs, overlay_runs) => Some(cover_text_runs(
            base_runs.as_deref().unwrap_or_default(),
            overlay_runs.as_deref().unwrap_or_default(),
            cover_type,
        )),
    };

    let paragraphs = compose_paragraphs(
        base.paragraphs.as_deref(),
        overlay.paragraphs.as_deref(),
        cover_type,
        base.data_stream.is_empty(),
    );

    DocumentBody {
        data_stream,
        text_runs,
        paragraphs,
        ..base.clone()
    }
}

fn compose_paragraphs(
    base: Option<&[Paragraph]>,
    overlay: Option<&[Paragraph]>,
    cover_type: CoverType,
    keep_new: bool,
) -> Option<Vec<Paragraph>> {
    let Some(overlay) = overlay else {
        return base.map(<[Paragraph]>::to_vec);
    };

    let mut out = base.map(<[Paragraph]>::to_vec).unwrap_or_default();
    for update in overlay {
        match out.binary_search_by_key(&update.start_index, |p| p.start_index) {
            Ok(pos) => cover_paragraph(&mut out[pos], update, cover_type),
            Err(pos) if keep_new => out.insert(pos, update.clone()),
            Err(_) => {}
        }
    }

    if out.is_empty() && base.is_none() {
        None
    } else {
        Some(out)
    }
}
