//! Delta builder and composer
//!
//! `TextX` accumulates a canonical action list from primitive edit intents
//! and composes two sequential lists into one. The composition law is the
//! contract undo squashing relies on: applying `compose(a, b)` once is
//! equivalent to applying `a` and then `b`.

use super::iterator::ActionIterator;
use crate::errors::{DeltaError, InvalidActionError};
use crate::models::{Action, ActionKind, CoverType, DocumentBody, InsertAction, RetainAction};
use crate::ops::compose_body;
use crate::overlays::insert_body;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextX {
    actions: Vec<Action>,
}

impl TextX {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `body` (`len` positions) at the cursor
    pub fn insert(
        &mut self,
        len: usize,
        body: DocumentBody,
        segment_id: &str,
    ) -> Result<&mut Self, DeltaError> {
        check_len(ActionKind::Insert, len)?;
        let body_len = body.len();
        if body_len != len {
            return Err(reject(InvalidActionError::LengthMismatch {
                kind: ActionKind::Insert,
                len,
                body_len,
            }));
        }
        Ok(self.push(Action::insert(len, body, segment_id)))
    }

    /// Delete `len` positions at the cursor
    pub fn delete(&mut self, len: usize, segment_id: &str) -> Result<&mut Self, DeltaError> {
        check_len(ActionKind::Delete, len)?;
        Ok(self.push(Action::delete(len, segment_id)))
    }

    /// Skip `len` positions, optionally restyling them with `body`
    pub fn retain(
        &mut self,
        len: usize,
        segment_id: &str,
        body: Option<DocumentBody>,
        cover_type: Option<CoverType>,
    ) -> Result<&mut Self, DeltaError> {
        check_len(ActionKind::Retain, len)?;
        let action = match body {
            Some(body) => {
                let body_len = body.len();
                if body_len != 0 && body_len != len {
                    return Err(reject(InvalidActionError::LengthMismatch {
                        kind: ActionKind::Retain,
                        len,
                        body_len,
                    }));
                }
                Action::retain_with_body(len, segment_id, body, cover_type)
            }
            None => Action::Retain(RetainAction {
                cover_type,
                ..RetainAction::new(len, segment_id)
            }),
        };
        Ok(self.push(action))
    }

    /// Canonicalizing append
    ///
    /// Adjacent deletes merge, adjacent plain retains merge, and an insert
    /// pushed right after a delete is moved in front of it.
    pub fn push(&mut self, action: Action) -> &mut Self {
        if action.is_empty() {
            return self;
        }

        match (self.actions.last_mut(), &action) {
            (Some(Action::Delete(last)), Action::Delete(next))
                if last.segment_id == next.segment_id =>
            {
                if let Some(len) = last.len.checked_add(next.len) {
                    last.len = len;
                    return self;
                }
            }
            (Some(Action::Retain(last)), Action::Retain(next))
                if last.body.is_none()
                    && next.body.is_none()
                    && last.segment_id == next.segment_id =>
            {
                if let Some(len) = last.len.checked_add(next.len) {
                    last.len = len;
                    return self;
                }
            }
            _ => {}
        }

        let mut index = self.actions.len();
        if let (Action::Insert(_), Some(Action::Delete(_))) = (&action, self.actions.last()) {
            // Insert before delete; an insert never merges with what precedes it
            index -= 1;
        }
        self.actions.insert(index, action);
        self
    }

    /// Drop trailing plain retains, they carry no information
    pub fn trim_end_useless_retain_action(&mut self) -> &mut Self {
        while self.actions.last().is_some_and(Action::is_plain_retain) {
            self.actions.pop();
        }
        self
    }

    pub fn serialize(&self) -> Vec<Action> {
        self.actions.clone()
    }

    pub fn into_actions(self) -> Vec<Action> {
        self.actions
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Rebuild an arbitrary list through the validating builder and trim it
    pub fn normalize(actions: Vec<Action>) -> Result<Vec<Action>, DeltaError> {
        let mut text_x = TextX::new();
        for action in actions {
            match action {
                Action::Retain(retain) => {
                    text_x.retain(retain.len, &retain.segment_id, retain.body, retain.cover_type)?;
                }
                Action::Insert(insert) => {
                    text_x.insert(insert.len, insert.body, &insert.segment_id)?;
                }
                Action::Delete(delete) => {
                    text_x.delete(delete.len, &delete.segment_id)?;
                }
            }
        }
        text_x.trim_end_useless_retain_action();
        Ok(text_x.into_actions())
    }

    /// Compose `this` then `other` into one equivalent action list
    pub fn compose(this: &[Action], other: &[Action]) -> Result<Vec<Action>, DeltaError> {
        let mut this_iter = ActionIterator::new(this);
        let mut other_iter = ActionIterator::new(other);
        let mut text_x = TextX::new();
        // Insert of `this` whose last piece was emitted, see `join_insert_piece`
        let mut open_insert: Option<usize> = None;

        while this_iter.has_next() || other_iter.has_next() {
            if other_iter.peek_kind() == Some(ActionKind::Insert) {
                text_x.push_next(&mut other_iter);
                open_insert = None;
            } else if this_iter.peek_kind() == Some(ActionKind::Delete) {
                text_x.push_next(&mut this_iter);
                open_insert = None;
            } else {
                let length = match (this_iter.peek_length(), other_iter.peek_length()) {
                    (Some(a), Some(b)) => a.min(b),
                    (Some(a), None) => a,
                    (None, Some(b)) => b,
                    (None, None) => break,
                };
                let segment_id = this_iter
                    .peek()
                    .or_else(|| other_iter.peek())
                    .map(|a| a.segment_id().to_string())
                    .unwrap_or_default();
                let origin = this_iter.position();
                let from_insert = this_iter.peek_kind() == Some(ActionKind::Insert);
                let splits_paragraph = matches!(
                    this_iter.peek(),
                    Some(Action::Insert(insert)) if insert.body.is_bare_paragraph()
                );

                // Past the end of either list the rest is identity
                let this_action = this_iter
                    .next_len(length)
                    .unwrap_or_else(|| Action::retain(length, &segment_id));
                let other_action = other_iter
                    .next_len(length)
                    .unwrap_or_else(|| Action::retain(length, &segment_id));
                if splits_paragraph && restyles_paragraphs(&other_action) {
                    // The split hand-off runs after the merge, so the restyle
                    // lands on the following paragraph
                    log::debug!(
                        "paragraph split at action {} composed with a paragraph restyle",
                        origin
                    );
                }

                match compose_pair(this_action, other_action)? {
                    Some(Action::Insert(piece)) if from_insert => {
                        if open_insert == Some(origin) {
                            text_x.join_insert_piece(piece)?;
                        } else {
                            text_x.push(Action::Insert(piece));
                        }
                        open_insert = Some(origin);
                    }
                    Some(action) => {
                        text_x.push(action);
                        open_insert = None;
                    }
                    None => {}
                }
            }
        }

        text_x.trim_end_useless_retain_action();
        log::debug!(
            "composed {} + {} actions into {}",
            this.len(),
            other.len(),
            text_x.actions.len()
        );
        Ok(text_x.actions)
    }

    fn push_next(&mut self, iter: &mut ActionIterator<'_>) {
        if let Some(action) = iter.next() {
            self.push(action);
        }
    }

    /// Append `piece` to the insert it was cut from
    ///
    /// Composing slices an insert wherever the other list has a boundary.
    /// Emitting the pieces as separate inserts is not equivalent when one of
    /// them is a bare paragraph terminator, so pieces of one insert are
    /// joined back. Pieces that disagree on carrying a run list stay apart.
    fn join_insert_piece(&mut self, piece: InsertAction) -> Result<(), DeltaError> {
        let target = match self.actions.last() {
            // The last piece was moved in front of a delete
            Some(Action::Delete(_)) => self.actions.len().checked_sub(2),
            _ => self.actions.len().checked_sub(1),
        };
        let carries_runs = piece.body.text_runs.is_some();
        let joinable = matches!(
            target.and_then(|i| self.actions.get(i)),
            Some(Action::Insert(last)) if last.body.text_runs.is_some() == carries_runs
        );
        if !joinable {
            self.push(Action::Insert(piece));
            return Ok(());
        }

        if let Some(Action::Insert(last)) = target.and_then(|i| self.actions.get_mut(i)) {
            let at = last.body.len();
            insert_body(&mut last.body, &piece.body, at)?;
            last.len += piece.len;
        }
        Ok(())
    }
}

fn compose_pair(this: Action, other: Action) -> Result<Option<Action>, DeltaError> {
    match (this, other) {
        (Action::Insert(mut insert), Action::Retain(retain)) => {
            if let Some(body) = &retain.body {
                insert.body = compose_body(&insert.body, body, retain.cover());
            }
            Ok(Some(Action::Insert(insert)))
        }
        (Action::Retain(this), Action::Retain(other)) => {
            let composed = match (this.body.as_ref(), other.body.as_ref()) {
                (None, None) => RetainAction::new(this.len, &this.segment_id),
                (Some(this_body), Some(other_body)) => RetainAction {
                    body: Some(compose_body(this_body, other_body, other.cover())),
                    ..this
                },
                (Some(_), None) => this,
                (None, Some(_)) => other,
            };
            Ok(Some(Action::Retain(composed)))
        }
        (Action::Retain(_), Action::Delete(delete)) => Ok(Some(Action::Delete(delete))),
        (Action::Insert(_), Action::Delete(_)) => Ok(None),
        (this, other) => {
            let (this, other) = (this.kind(), other.kind());
            log::warn!("unknown compose case: {} then {}", this, other);
            Err(DeltaError::ComposeInvariant { this, other })
        }
    }
}

fn restyles_paragraphs(action: &Action) -> bool {
    matches!(
        action,
        Action::Retain(RetainAction { body: Some(body), .. }) if body.paragraphs.is_some()
    )
}

fn check_len(kind: ActionKind, len: usize) -> Result<(), DeltaError> {
    if len == 0 {
        return Err(reject(InvalidActionError::ZeroLength { kind }));
    }
    Ok(())
}

fn reject(error: InvalidActionError) -> DeltaError {
    log::warn!("rejected action: {}", error);
    DeltaError::InvalidAction(error)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Paragraph, TextRun, TextStyle};

    fn bold() -> TextStyle {
        TextStyle::new().with("bl", 1)
    }

    fn hello() -> DocumentBody {
        DocumentBody::new("hello").with_text_runs(vec![TextRun::new(0, 5, bold())])
    }

    #[test]
    fn test_adjacent_deletes_merge() {
        let mut text_x = TextX::new();
        text_x.delete(5, "").unwrap().delete(5, "").unwrap();
        assert_eq!(text_x.serialize(), vec![Action::delete(10, "")]);
    }

    #[test]
    fn test_adjacent_retains_merge() {
        let mut text_x = TextX::new();
        text_x.retain(4, "", None, None).unwrap().retain(5, "", None, None).unwrap();
        assert_eq!(text_x.serialize(), vec![Action::retain(9, "")]);
    }

    #[test]
    fn test_styling_retains_stay_apart() {
        let mut text_x = TextX::new();
        text_x.retain(2, "", None, None).unwrap();
        text_x
            .retain(3, "", Some(DocumentBody::attributes()), Some(CoverType::Cover))
            .unwrap();
        assert_eq!(text_x.serialize().len(), 2);
    }

    #[test]
    fn test_insert_moves_before_delete() {
        let mut text_x = TextX::new();
        text_x.delete(5, "").unwrap();
        text_x.insert(5, hello(), "").unwrap();

        let actions = text_x.serialize();
        assert_eq!(actions[0].kind(), ActionKind::Insert);
        assert_eq!(actions[1].kind(), ActionKind::Delete);
    }

    #[test]
    fn test_insert_lands_between_retain_and_delete() {
        let mut text_x = TextX::new();
        text_x.retain(2, "", None, None).unwrap();
        text_x.delete(3, "").unwrap();
        text_x.insert(5, hello(), "").unwrap();
        text_x.delete(1, "").unwrap();

        let kinds: Vec<ActionKind> = text_x.serialize().iter().map(Action::kind).collect();
        assert_eq!(kinds, vec![ActionKind::Retain, ActionKind::Insert, ActionKind::Delete]);
        assert_eq!(text_x.serialize()[2].len(), 4);
    }

    #[test]
    fn test_deletes_in_different_segments_do_not_merge() {
        let mut text_x = TextX::new();
        text_x.delete(1, "").unwrap().delete(1, "footer").unwrap();
        assert_eq!(text_x.serialize().len(), 2);
    }

    #[test]
    fn test_rejects_invalid_actions() {
        let mut text_x = TextX::new();
        assert_eq!(
            text_x.delete(0, "").unwrap_err(),
            DeltaError::InvalidAction(InvalidActionError::ZeroLength { kind: ActionKind::Delete })
        );
        assert_eq!(
            text_x.insert(3, hello(), "").unwrap_err(),
            DeltaError::InvalidAction(InvalidActionError::LengthMismatch {
                kind: ActionKind::Insert,
                len: 3,
                body_len: 5,
            })
        );
        assert!(text_x.is_empty());
    }

    #[test]
    fn test_trim_trailing_retains() {
        let mut text_x = TextX::new();
        text_x.delete(1, "").unwrap();
        text_x.retain(4, "", None, None).unwrap();
        text_x.trim_end_useless_retain_action();
        assert_eq!(text_x.serialize(), vec![Action::delete(1, "")]);
    }

    #[test]
    fn test_compose_insert_then_delete_cancels() {
        let a = vec![Action::insert(5, hello(), "")];
        let b = vec![Action::delete(5, "")];
        assert_eq!(TextX::compose(&a, &b).unwrap(), vec![]);
    }

    #[test]
    fn test_compose_typing() {
        let a = vec![Action::retain(2, ""), Action::insert(1, DocumentBody::new("a"), "")];
        let b = vec![Action::retain(3, ""), Action::insert(1, DocumentBody::new("b"), "")];

        let composed = TextX::compose(&a, &b).unwrap();
        assert_eq!(
            composed,
            vec![
                Action::retain(2, ""),
                Action::insert(1, DocumentBody::new("a"), ""),
                Action::insert(1, DocumentBody::new("b"), ""),
            ]
        );
    }

    #[test]
    fn test_compose_styles_inserted_text() {
        let a = vec![Action::insert(5, DocumentBody::new("hello"), "")];
        let style = DocumentBody::attributes().with_text_runs(vec![TextRun::new(0, 2, bold())]);
        let b = vec![Action::retain_with_body(5, "", style, Some(CoverType::Cover))];

        let composed = TextX::compose(&a, &b).unwrap();
        let expected = DocumentBody::new("hello").with_text_runs(vec![TextRun::new(0, 2, bold())]);
        assert_eq!(composed, vec![Action::insert(5, expected, "")]);
    }

    #[test]
    fn test_compose_delete_after_retain() {
        let a = vec![Action::retain(3, ""), Action::delete(2, "")];
        let b = vec![Action::delete(1, "")];

        let composed = TextX::compose(&a, &b).unwrap();
        assert_eq!(
            composed,
            vec![Action::delete(1, ""), Action::retain(2, ""), Action::delete(2, "")]
        );
    }

    #[test]
    fn test_compose_merges_styling_retains() {
        let italic = TextStyle::new().with("it", 1);
        let a = vec![Action::retain_with_body(
            3,
            "",
            DocumentBody::attributes().with_text_runs(vec![TextRun::new(0, 3, bold())]),
            Some(CoverType::Cover),
        )];
        let b = vec![Action::retain_with_body(
            3,
            "",
            DocumentBody::attributes().with_text_runs(vec![TextRun::new(1, 3, italic.clone())]),
            Some(CoverType::Cover),
        )];

        let composed = TextX::compose(&a, &b).unwrap();
        let expected = DocumentBody::attributes().with_text_runs(vec![
            TextRun::new(0, 1, bold()),
            TextRun::new(1, 3, bold().merged(&italic)),
        ]);
        assert_eq!(
            composed,
            vec![Action::retain_with_body(3, "", expected, Some(CoverType::Cover))]
        );
    }

    #[test]
    fn test_compose_keeps_restyled_insert_whole() {
        let inserted = DocumentBody::new("x\r")
            .with_text_runs(vec![])
            .with_paragraphs(vec![Paragraph::new(1)]);
        let a = vec![Action::retain(2, ""), Action::insert(2, inserted, "")];
        let restyle = DocumentBody::attributes().with_text_runs(vec![TextRun::new(0, 1, bold())]);
        let b = vec![
            Action::retain(3, ""),
            Action::retain_with_body(1, "", restyle, Some(CoverType::Cover)),
        ];

        let composed = TextX::compose(&a, &b).unwrap();

        let expected = DocumentBody::new("x\r")
            .with_text_runs(vec![TextRun::new(1, 2, bold())])
            .with_paragraphs(vec![Paragraph::new(1)]);
        assert_eq!(composed, vec![Action::retain(2, ""), Action::insert(2, expected, "")]);
    }

    #[test]
    fn test_huge_lengths_do_not_merge() {
        let mut text_x = TextX::new();
        text_x.delete(usize::MAX, "").unwrap().delete(1, "").unwrap();
        assert_eq!(text_x.serialize(), vec![Action::delete(usize::MAX, ""), Action::delete(1, "")]);
    }

    #[test]
    fn test_compose_with_empty_list_is_identity() {
        let a = vec![Action::retain(2, ""), Action::insert(5, hello(), "")];
        assert_eq!(TextX::compose(&a, &[]).unwrap(), a);
        assert_eq!(TextX::compose(&[], &a).unwrap(), a);
    }

    #[test]
    fn test_normalize_canonicalizes_and_validates() {
        let raw = vec![
            Action::retain(1, ""),
            Action::retain(1, ""),
            Action::delete(1, ""),
            Action::insert(5, hello(), ""),
            Action::retain(4, ""),
        ];
        assert_eq!(
            TextX::normalize(raw).unwrap(),
            vec![Action::retain(2, ""), Action::insert(5, hello(), ""), Action::delete(1, "")]
        );

        let bad = vec![Action::insert(3, hello(), "")];
        assert!(matches!(TextX::normalize(bad), Err(DeltaError::InvalidAction(_))));
    }
}
