use crate::delta::TextX;
use crate::errors::DeltaError;
use crate::models::{Action, DocumentBody};
use crate::mutation::apply_actions;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// A reversible edit: the applied actions and the list that reverts them
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UndoEntry {
    pub actions: Vec<Action>,
    pub inverse: Vec<Action>,
}

/// What an entry does to the stream, used for batch breaks
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum EditKind {
    Insert,
    Delete,
    Attribute,
    Mixed,
}

impl UndoEntry {
    pub fn new(actions: Vec<Action>, inverse: Vec<Action>) -> Self {
        Self { actions, inverse }
    }

    fn kind(&self) -> EditKind {
        let mut inserts = false;
        let mut deletes = false;
        for action in &self.actions {
            match action {
                Action::Retain(retain) if retain.body.is_some() => return EditKind::Attribute,
                Action::Retain(_) => {}
                Action::Insert(_) => inserts = true,
                Action::Delete(_) => deletes = true,
            }
        }
        match (inserts, deletes) {
            (true, false) => EditKind::Insert,
            (false, true) => EditKind::Delete,
            _ => EditKind::Mixed,
        }
    }

    /// Inserts nothing but whitespace or paragraph terminators
    fn is_whitespace_insert(&self) -> bool {
        let inserted: Vec<&str> = self
            .actions
            .iter()
            .filter_map(|action| match action {
                Action::Insert(insert) => Some(insert.body.data_stream.as_str()),
                _ => None,
            })
            .collect();
        !inserted.is_empty()
            && inserted
                .iter()
                .all(|s| s.chars().all(|c| matches!(c, ' ' | '\t' | '\r' | '\n')))
    }

    /// This entry followed by `next`, as one entry
    fn squash(&self, next: &UndoEntry) -> Result<UndoEntry, DeltaError> {
        Ok(UndoEntry {
            actions: TextX::compose(&self.actions, &next.actions)?,
            inverse: TextX::compose(&next.inverse, &self.inverse)?,
        })
    }
}

/// Manages undo/redo history with batching
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct UndoStack {
    /// Entries that can be undone
    pub entries: VecDeque<UndoEntry>,
    /// Current position in the stack (for redo support)
    pub current_index: usize,
    max_size: usize,
    /// Squashed entry still accepting edits
    #[serde(skip)]
    current_batch: Option<UndoEntry>,
}

impl Default for UndoStack {
    fn default() -> Self {
        Self::new(100)
    }
}

impl PartialEq for UndoStack {
    fn eq(&self, other: &Self) -> bool {
        // Only compare serialized fields
        self.entries == other.entries
            && self.current_index == other.current_index
            && self.max_size == other.max_size
    }
}

impl UndoStack {
    /// Create a new undo stack with specified maximum size
    pub fn new(max_size: usize) -> Self {
        Self {
            entries: VecDeque::new(),
            current_index: 0,
            max_size,
            current_batch: None,
        }
    }

    pub fn max_size(&self) -> usize {
        self.max_size
    }

    /// Apply `actions` to `body` and record the edit
    pub fn apply(
        &mut self,
        body: &mut DocumentBody,
        actions: Vec<Action>,
    ) -> Result<(), DeltaError> {
        let inverse = apply_actions(body, &actions)?;
        self.push(UndoEntry::new(actions, inverse));
        Ok(())
    }

    /// Add an entry, squashing it into the open batch when possible
    ///
    /// Batching breaks on:
    /// - Whitespace or paragraph insertion
    /// - Kind change (insert-only vs delete-only)
    /// - Attribute or mixed edits, which always stand alone
    pub fn push(&mut self, entry: UndoEntry) {
        if self.should_break_batch(&entry) {
            self.finalize_batch();
        }

        let batch = match self.current_batch.take() {
            Some(batch) => match batch.squash(&entry) {
                Ok(squashed) => squashed,
                Err(err) => {
                    log::warn!("could not squash undo entry, starting a new batch: {}", err);
                    self.current_batch = Some(batch);
                    self.finalize_batch();
                    entry
                }
            },
            None => entry,
        };
        self.current_batch = Some(batch);
    }

    fn should_break_batch(&self, entry: &UndoEntry) -> bool {
        let Some(batch) = &self.current_batch else {
            return false;
        };

        let kind = entry.kind();
        if matches!(kind, EditKind::Attribute | EditKind::Mixed) {
            return true;
        }
        if entry.is_whitespace_insert() {
            return true;
        }
        batch.kind() != kind
    }

    /// Finalize the current batch and add it to the undo stack
    pub fn finalize_batch(&mut self) {
        let Some(entry) = self.current_batch.take() else {
            return;
        };

        // Truncate any redo history when new entry is added
        self.entries.truncate(self.current_index);
        self.entries.push_back(entry);
        self.current_index = self.entries.len();

        if self.entries.len() > self.max_size {
            self.entries.pop_front();
            self.current_index = self.current_index.saturating_sub(1);
        }
    }

    /// Revert the last entry; `Ok(false)` when there is nothing to undo
    pub fn undo(&mut self, body: &mut DocumentBody) -> Result<bool, DeltaError> {
        self.finalize_batch();

        if !self.can_undo() {
            return Ok(false);
        }

        let entry = &self.entries[self.current_index - 1];
        apply_actions(body, &entry.inverse)?;
        self.current_index -= 1;
        Ok(true)
    }

    /// Re-apply the last undone entry; `Ok(false)` when there is nothing to redo
    pub fn redo(&mut self, body: &mut DocumentBody) -> Result<bool, DeltaError> {
        if !self.can_redo() {
            return Ok(false);
        }

        let entry = &self.entries[self.current_index];
        apply_actions(body, &entry.actions)?;
        self.current_index += 1;
        Ok(true)
    }

    pub fn can_undo(&self) -> bool {
        self.current_index > 0 || self.current_batch.is_some()
    }

    pub fn can_redo(&self) -> bool {
        self.current_batch.is_none() && self.current_index < self.entries.len()
    }

    /// Clear all undo history
    pub fn clear(&mut self) {
        self.entries.clear();
        self.current_index = 0;
        self.current_batch = None;
    }

    /// Number of available undo steps, counting the open batch
    pub fn undo_count(&self) -> usize {
        self.current_index + usize::from(self.current_batch.is_some())
    }

    pub fn redo_count(&self) -> usize {
        self.entries.len() - self.current_index
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CoverType, TextRun, TextStyle};

    fn type_char(stack: &mut UndoStack, body: &mut DocumentBody, at: usize, ch: &str) {
        let mut actions = Vec::new();
        if at > 0 {
            actions.push(Action::retain(at, ""));
        }
        actions.push(Action::insert(1, DocumentBody::new(ch), ""));
        stack.apply(body, actions).unwrap();
    }

    fn backspace(stack: &mut UndoStack, body: &mut DocumentBody, at: usize) {
        let mut actions = Vec::new();
        if at > 0 {
            actions.push(Action::retain(at, ""));
        }
        actions.push(Action::delete(1, ""));
        stack.apply(body, actions).unwrap();
    }

    #[test]
    fn test_undo_stack_basic() {
        let mut stack = UndoStack::new(10);
        let mut body = DocumentBody::new("\r");

        type_char(&mut stack, &mut body, 0, "S");
        stack.finalize_batch();

        assert!(stack.can_undo());
        assert!(!stack.can_redo());

        assert!(stack.undo(&mut body).unwrap());
        assert_eq!(body.data_stream, "\r");
        assert!(!stack.can_undo());
        assert!(stack.can_redo());

        assert!(stack.redo(&mut body).unwrap());
        assert_eq!(body.data_stream, "S\r");
        assert!(stack.can_undo());
        assert!(!stack.can_redo());
    }

    #[test]
    fn test_typing_is_squashed() {
        let mut stack = UndoStack::new(10);
        let mut body = DocumentBody::new("\r");

        type_char(&mut stack, &mut body, 0, "a");
        type_char(&mut stack, &mut body, 1, "b");
        type_char(&mut stack, &mut body, 2, "c");
        assert_eq!(body.data_stream, "abc\r");
        assert_eq!(stack.undo_count(), 1);

        stack.undo(&mut body).unwrap();
        assert_eq!(body.data_stream, "\r");
        assert_eq!(stack.redo_count(), 1);

        stack.redo(&mut body).unwrap();
        assert_eq!(body.data_stream, "abc\r");
    }

    #[test]
    fn test_batching_on_whitespace() {
        let mut stack = UndoStack::new(10);
        let mut body = DocumentBody::new("\r");

        type_char(&mut stack, &mut body, 0, "S");
        type_char(&mut stack, &mut body, 1, "r");
        type_char(&mut stack, &mut body, 2, " ");
        stack.finalize_batch();

        assert_eq!(stack.entries.len(), 2);
        stack.undo(&mut body).unwrap();
        assert_eq!(body.data_stream, "Sr\r");
    }

    #[test]
    fn test_kind_change_breaks_batch() {
        let mut stack = UndoStack::new(10);
        let mut body = DocumentBody::new("\r");

        type_char(&mut stack, &mut body, 0, "a");
        type_char(&mut stack, &mut body, 1, "b");
        backspace(&mut stack, &mut body, 1);
        stack.finalize_batch();

        assert_eq!(stack.entries.len(), 2);
        stack.undo(&mut body).unwrap();
        assert_eq!(body.data_stream, "ab\r");
        stack.undo(&mut body).unwrap();
        assert_eq!(body.data_stream, "\r");
    }

    #[test]
    fn test_attribute_edit_stands_alone() {
        let mut stack = UndoStack::new(10);
        let mut body = DocumentBody::new("ab\r").with_text_runs(vec![]);
        let bold = DocumentBody::attributes()
            .with_text_runs(vec![TextRun::new(0, 2, TextStyle::new().with("bl", 1))]);

        type_char(&mut stack, &mut body, 2, "c");
        stack
            .apply(&mut body, vec![Action::retain_with_body(2, "", bold, Some(CoverType::Cover))])
            .unwrap();
        stack.finalize_batch();
        assert_eq!(stack.entries.len(), 2);

        stack.undo(&mut body).unwrap();
        assert_eq!(body.data_stream, "abc\r");
        assert_eq!(body.text_runs, Some(vec![]));
    }

    #[test]
    fn test_new_edit_truncates_redo() {
        let mut stack = UndoStack::new(10);
        let mut body = DocumentBody::new("\r");

        type_char(&mut stack, &mut body, 0, "a");
        stack.undo(&mut body).unwrap();
        type_char(&mut stack, &mut body, 0, "b");
        stack.finalize_batch();

        assert_eq!(stack.entries.len(), 1);
        assert!(!stack.can_redo());
        assert!(!stack.redo(&mut body).unwrap());
    }

    #[test]
    fn test_max_size_enforcement() {
        let mut stack = UndoStack::new(3);
        let mut body = DocumentBody::new("\r");

        for i in 0..5 {
            type_char(&mut stack, &mut body, i, "S");
            stack.finalize_batch();
        }

        assert_eq!(stack.entries.len(), 3);
        assert_eq!(stack.max_size(), 3);
    }

    #[test]
    fn test_undo_on_empty_stack() {
        let mut stack = UndoStack::default();
        let mut body = DocumentBody::new("\r");
        assert!(!stack.undo(&mut body).unwrap());
        assert_eq!(body, DocumentBody::new("\r"));
    }
}
