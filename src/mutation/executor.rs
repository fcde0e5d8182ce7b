//! Mutation executor
//!
//! Applies an action list to a live body and produces the inverse list
//! used by the undo stack. Retains walk the cursor (restyling when they
//! carry a body), inserts and deletes go through the overlay reconciler.
//! The body is only replaced once every action succeeded.

use crate::delta::TextX;
use crate::errors::{DeltaError, InvalidActionError, OverlayPreconditionError};
use crate::models::{Action, ActionKind, CoverType, DocumentBody, Paragraph, TextRun};
use crate::ops::{cover_paragraph, cover_text_runs};
use crate::overlays::{delete_body, insert_body};

/// Executor settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExecuteOptions {
    /// Replay the inverse on a copy and patch paragraph formats it fails to
    /// restore (deleting terminators moves formats between paragraphs)
    pub repair_inverse: bool,
}

impl Default for ExecuteOptions {
    fn default() -> Self {
        Self { repair_inverse: true }
    }
}

/// Apply `actions` to `body` and return the inverse action list
pub fn apply_actions(
    body: &mut DocumentBody,
    actions: &[Action],
) -> Result<Vec<Action>, DeltaError> {
    apply_actions_with(body, actions, ExecuteOptions::default())
}

pub fn apply_actions_with(
    body: &mut DocumentBody,
    actions: &[Action],
    options: ExecuteOptions,
) -> Result<Vec<Action>, DeltaError> {
    let segment_id = check_segments(actions)?;

    let mut work = body.clone();
    let mut inverse = execute(&mut work, actions)?;
    if options.repair_inverse {
        inverse = repair_inverse(&work, body, inverse, segment_id)?;
    }

    *body = work;
    Ok(inverse)
}

/// All actions of a list target one segment
fn check_segments(actions: &[Action]) -> Result<&str, DeltaError> {
    let Some(first) = actions.first() else {
        return Ok("");
    };
    let expected = first.segment_id();
    match actions.iter().find(|a| a.segment_id() != expected) {
        Some(other) => Err(DeltaError::InvalidAction(InvalidActionError::MixedSegments {
            expected: expected.to_string(),
            found: other.segment_id().to_string(),
        })),
        None => Ok(expected),
    }
}

fn execute(body: &mut DocumentBody, actions: &[Action]) -> Result<Vec<Action>, DeltaError> {
    let mut cursor: usize = 0;
    let mut inverse = TextX::new();

    for action in actions {
        let segment_id = action.segment_id();
        match action {
            Action::Retain(retain) => {
                let stream_len = body.len();
                if cursor.checked_add(retain.len).map_or(true, |end| end > stream_len) {
                    return Err(OverlayPreconditionError::OutOfBounds {
                        index: cursor,
                        len: retain.len,
                        stream_len,
                    }
                    .into());
                }
                match &retain.body {
                    None => {
                        inverse.push(Action::retain(retain.len, segment_id));
                    }
                    Some(update) => {
                        let previous =
                            apply_attributes(body, update, retain.cover(), cursor, retain.len);
                        inverse.push(Action::retain_with_body(
                            retain.len,
                            segment_id,
                            previous,
                            Some(CoverType::Replace),
                        ));
                    }
                }
                cursor += retain.len;
            }
            Action::Insert(insert) => {
                let body_len = insert.body.len();
                if body_len != insert.len {
                    return Err(InvalidActionError::LengthMismatch {
                        kind: ActionKind::Insert,
                        len: insert.len,
                        body_len,
                    }
                    .into());
                }
                insert_body(body, &insert.body, cursor)?;
                inverse.push(Action::delete(insert.len, segment_id));
                cursor += insert.len;
            }
            Action::Delete(delete) => {
                let removed = delete_body(body, delete.len, cursor)?;
                inverse.push(Action::insert(delete.len, removed, segment_id));
            }
        }
        log::trace!("applied {} ({}) at {}", action.kind(), action.len(), cursor);
    }

    inverse.trim_end_useless_retain_action();
    Ok(inverse.into_actions())
}

/// Restyle `[cursor, cursor + len)` with `update`, returning the attributes
/// it replaced (relative to `cursor`) so a `Replace` retain can restore them
fn apply_attributes(
    body: &mut DocumentBody,
    update: &DocumentBody,
    cover_type: CoverType,
    cursor: usize,
    len: usize,
) -> DocumentBody {
    let mut previous = DocumentBody::attributes();

    if let Some(update_runs) = &update.text_runs {
        let rebased: Vec<TextRun> = update_runs
            .iter()
            .filter(|run| run.st < len)
            .map(|run| TextRun {
                st: run.st + cursor,
                ed: run.ed.min(len) + cursor,
                ..run.clone()
            })
            .collect();
        let live = body.text_runs.as_deref().unwrap_or_default();

        previous.text_runs = Some(
            covered_runs(live, &rebased)
                .into_iter()
                .map(|run| TextRun {
                    st: run.st - cursor,
                    ed: run.ed - cursor,
                    ..run
                })
                .collect(),
        );

        let runs = cover_text_runs(live, &rebased, cover_type);
        if body.text_runs.is_some() || !runs.is_empty() {
            body.text_runs = Some(runs);
        }
    }

    if let (Some(updates), Some(live)) = (&update.paragraphs, body.paragraphs.as_mut()) {
        let mut replaced = Vec::new();
        for update in updates.iter().filter(|p| p.start_index < len) {
            let index = cursor + update.start_index;
            if let Ok(pos) = live.binary_search_by_key(&index, |p| p.start_index) {
                let target = &mut live[pos];
                replaced.push(Paragraph {
                    start_index: update.start_index,
                    paragraph_style: target.paragraph_style.clone(),
                    bullet: target.bullet.clone(),
                });
                cover_paragraph(target, update, cover_type);
            }
        }
        if !replaced.is_empty() {
            previous.paragraphs = Some(replaced);
        }
    }

    previous
}

/// Live styles under every update run, with unstyled gaps filled by empty
/// runs so a `Replace` clears them again
fn covered_runs(live: &[TextRun], update: &[TextRun]) -> Vec<TextRun> {
    let mut out = Vec::new();
    for span in update {
        let mut pos = span.st;
        for run in live.iter().filter(|r| r.st < span.ed && r.ed > span.st) {
            let st = run.st.max(span.st);
            if st > pos {
                out.push(TextRun::new(pos, st, Default::default()));
            }
            let ed = run.ed.min(span.ed);
            out.push(TextRun { st, ed, ..run.clone() });
            pos = ed;
        }
        if pos < span.ed {
            out.push(TextRun::new(pos, span.ed, Default::default()));
        }
    }
    out
}

/// Patch paragraph formats the plain inverse would not restore
///
/// Deleting terminators hands the first deleted format to the following
/// paragraph; re-inserting more than a bare terminator does not hand it
/// back. The inverse is replayed on a copy of `result`, and every
/// paragraph whose format differs from `original` gets a `Replace` retain
/// composed onto the inverse.
fn repair_inverse(
    result: &DocumentBody,
    original: &DocumentBody,
    inverse: Vec<Action>,
    segment_id: &str,
) -> Result<Vec<Action>, DeltaError> {
    let mut replay = result.clone();
    execute(&mut replay, &inverse)?;

    let (Some(expected), Some(actual)) = (&original.paragraphs, &replay.paragraphs) else {
        return Ok(inverse);
    };
    if expected.len() != actual.len() {
        log::debug!("inverse replay changed the paragraph count, skipping repair");
        return Ok(inverse);
    }

    let mut fixup = TextX::new();
    let mut cursor = 0;
    for (want, got) in expected.iter().zip(actual) {
        if want.start_index != got.start_index {
            log::debug!("inverse replay moved paragraph {}, skipping repair", want.start_index);
            return Ok(inverse);
        }
        if want.same_format(got) {
            continue;
        }
        if want.start_index > cursor {
            fixup.retain(want.start_index - cursor, segment_id, None, None)?;
        }
        let format = Paragraph {
            start_index: 0,
            ..want.clone()
        };
        fixup.retain(
            1,
            segment_id,
            Some(DocumentBody::attributes().with_paragraphs(vec![format])),
            Some(CoverType::Replace),
        )?;
        cursor = want.start_index + 1;
    }

    if fixup.is_empty() {
        return Ok(inverse);
    }
    log::debug!("repairing inverse with {} paragraph fix-up actions", fixup.serialize().len());
    TextX::compose(&inverse, &fixup.into_actions())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ParagraphStyle, TextStyle};

    fn bold() -> TextStyle {
        TextStyle::new().with("bl", 1)
    }

    #[test]
    fn test_insert_inverse_is_delete() {
        let mut body = DocumentBody::new("abc\r");
        let actions = vec![Action::retain(1, ""), Action::insert(2, DocumentBody::new("xy"), "")];

        let inverse = apply_actions(&mut body, &actions).unwrap();

        assert_eq!(body.data_stream, "axybc\r");
        assert_eq!(inverse, vec![Action::retain(1, ""), Action::delete(2, "")]);
    }

    #[test]
    fn test_delete_inverse_reinserts_content() {
        let mut body =
            DocumentBody::new("hello\r").with_text_runs(vec![TextRun::new(0, 5, bold())]);

        let inverse = apply_actions(&mut body, &[Action::delete(2, "")]).unwrap();

        let expected = DocumentBody::new("he").with_text_runs(vec![TextRun::new(0, 2, bold())]);
        assert_eq!(inverse, vec![Action::insert(2, expected, "")]);
        assert_eq!(body.text_runs, Some(vec![TextRun::new(0, 3, bold())]));
    }

    #[test]
    fn test_styling_retain_inverse_replaces() {
        let mut body =
            DocumentBody::new("hello\r").with_text_runs(vec![TextRun::new(0, 2, bold())]);
        let italic = TextStyle::new().with("it", 1);
        let update =
            DocumentBody::attributes().with_text_runs(vec![TextRun::new(0, 4, italic.clone())]);

        let inverse = apply_actions(
            &mut body,
            &[Action::retain_with_body(4, "", update, Some(CoverType::Cover))],
        )
        .unwrap();

        assert_eq!(
            body.text_runs,
            Some(vec![TextRun::new(0, 2, bold().merged(&italic)), TextRun::new(2, 4, italic)])
        );
        let previous = DocumentBody::attributes()
            .with_text_runs(vec![TextRun::new(0, 2, bold()), TextRun::new(2, 4, TextStyle::new())]);
        assert_eq!(
            inverse,
            vec![Action::retain_with_body(4, "", previous, Some(CoverType::Replace))]
        );
    }

    #[test]
    fn test_failed_apply_leaves_body_untouched() {
        let original = DocumentBody::new("abc");
        let mut body = original.clone();

        let actions = [Action::insert(1, DocumentBody::new("x"), ""), Action::delete(9, "")];
        let err = apply_actions(&mut body, &actions);

        assert!(matches!(err, Err(DeltaError::OverlayPrecondition(_))));
        assert_eq!(body, original);
    }

    #[test]
    fn test_huge_lengths_are_rejected() {
        let original = DocumentBody::new("abc");
        let mut body = original.clone();

        let actions = [Action::retain(1, ""), Action::delete(usize::MAX, "")];
        let err = apply_actions(&mut body, &actions).unwrap_err();
        assert_eq!(
            err,
            DeltaError::OverlayPrecondition(OverlayPreconditionError::OutOfBounds {
                index: 1,
                len: usize::MAX,
                stream_len: 3,
            })
        );

        let actions = [Action::retain(1, ""), Action::retain(usize::MAX, "")];
        let err = apply_actions(&mut body, &actions).unwrap_err();
        assert!(matches!(
            err,
            DeltaError::OverlayPrecondition(OverlayPreconditionError::OutOfBounds { .. })
        ));
        assert_eq!(body, original);
    }

    #[test]
    fn test_mixed_segments_rejected() {
        let mut body = DocumentBody::new("abc");
        let actions = [Action::retain(1, ""), Action::delete(1, "footer")];
        let err = apply_actions(&mut body, &actions).unwrap_err();
        assert_eq!(
            err,
            DeltaError::InvalidAction(InvalidActionError::MixedSegments {
                expected: String::new(),
                found: "footer".to_string(),
            })
        );
    }

    #[test]
    fn test_repair_restores_joined_paragraph() {
        let left = ParagraphStyle::new().with("horizontalAlign", 1);
        let right = ParagraphStyle::new().with("horizontalAlign", 2);
        let original = DocumentBody::new("ab\rcd\r").with_paragraphs(vec![
            Paragraph::new(2).with_style(left.clone()),
            Paragraph::new(5).with_style(right.clone()),
        ]);
        let mut body = original.clone();

        // Delete "b\rc": two paragraphs join
        let inverse =
            apply_actions(&mut body, &[Action::retain(1, ""), Action::delete(3, "")]).unwrap();
        assert_eq!(body.data_stream, "ad\r");
        assert_eq!(body.paragraphs, Some(vec![Paragraph::new(2).with_style(left)]));

        apply_actions(&mut body, &inverse).unwrap();
        assert_eq!(body, original);
    }
}
