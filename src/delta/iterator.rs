//! Cursor over an action list
//!
//! Consumes arbitrary sub-lengths from the head action. Content-carrying
//! actions (insert, styling retain) are split by slicing their body, so
//! every returned action is self-contained with positions relative to
//! itself.

use crate::models::{Action, ActionKind, InsertAction, RetainAction};
use crate::ops::get_body_slice;

#[derive(Debug, Clone)]
pub struct ActionIterator<'a> {
    actions: &'a [Action],
    index: usize,
    offset: usize,
}

impl<'a> ActionIterator<'a> {
    pub fn new(actions: &'a [Action]) -> Self {
        Self {
            actions,
            index: 0,
            offset: 0,
        }
    }

    pub fn has_next(&self) -> bool {
        self.index < self.actions.len()
    }

    /// Head action, ignoring how much of it was consumed
    pub fn peek(&self) -> Option<&'a Action> {
        self.actions.get(self.index)
    }

    /// Unconsumed length of the head action; `None` once exhausted
    pub fn peek_length(&self) -> Option<usize> {
        self.peek().map(|action| action.len() - self.offset)
    }

    pub fn peek_kind(&self) -> Option<ActionKind> {
        self.peek().map(Action::kind)
    }

    /// Index of the head action in the underlying list
    pub(crate) fn position(&self) -> usize {
        self.index
    }

    /// Consume up to `length` positions of the head action
    pub fn next_len(&mut self, length: usize) -> Option<Action> {
        let action = self.actions.get(self.index)?;
        let offset = self.offset;
        let remaining = action.len() - offset;

        let length = if length >= remaining {
            self.index += 1;
            self.offset = 0;
            remaining
        } else {
            self.offset += length;
            length
        };

        let sliced = match action {
            Action::Insert(insert) => Action::Insert(InsertAction {
                body: get_body_slice(&insert.body, offset, offset + length),
                len: length,
                ..insert.clone()
            }),
            Action::Retain(RetainAction {
                body: Some(body),
                segment_id,
                cover_type,
                ..
            }) => Action::Retain(RetainAction {
                len: length,
                segment_id: segment_id.clone(),
                body: Some(get_body_slice(body, offset, offset + length)),
                cover_type: *cover_type,
            }),
            Action::Retain(_) | Action::Delete(_) => action.with_len(length),
        };
        Some(sliced)
    }

    /// Everything not consumed yet, without moving the cursor
    pub fn rest(&self) -> Vec<Action> {
        if !self.has_next() {
            return Vec::new();
        }
        if self.offset == 0 {
            return self.actions[self.index..].to_vec();
        }

        let mut lookahead = self.clone();
        let mut rest = Vec::with_capacity(self.actions.len() - self.index);
        rest.extend(lookahead.next());
        rest.extend_from_slice(&lookahead.actions[lookahead.index..]);
        rest
    }
}

impl Iterator for ActionIterator<'_> {
    type Item = Action;

    /// Consume the whole remainder of the head action
    fn next(&mut self) -> Option<Action> {
        self.next_len(usize::MAX)
    }
}
