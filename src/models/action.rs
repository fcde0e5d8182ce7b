//! Edit actions (Retain / Insert / Delete)
//!
//! Wire shape: `{ t: "r"|"i"|"d", len, segmentId, body?, coverType?, line? }`.

use super::body::DocumentBody;
use serde::{Deserialize, Serialize};
use serde_repr::{Deserialize_repr, Serialize_repr};
use std::fmt;

/// How a retain's attribute body is merged into existing attributes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize_repr, Deserialize_repr)]
#[repr(u8)]
pub enum CoverType {
    /// Merge: update keys win, other existing keys stay
    #[default]
    Cover = 0,
    /// Override: the update style replaces the existing one wholesale
    Replace = 1,
}

/// Discriminant of an action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActionKind {
    #[serde(rename = "r")]
    Retain,
    #[serde(rename = "i")]
    Insert,
    #[serde(rename = "d")]
    Delete,
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ActionKind::Retain => "retain",
            ActionKind::Insert => "insert",
            ActionKind::Delete => "delete",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RetainAction {
    pub len: usize,
    #[serde(default)]
    pub segment_id: String,
    /// Attribute overlay to merge into the retained content
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<DocumentBody>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_type: Option<CoverType>,
}

impl RetainAction {
    pub fn new(len: usize, segment_id: &str) -> Self {
        Self {
            len,
            segment_id: segment_id.to_string(),
            body: None,
            cover_type: None,
        }
    }

    pub fn with_body(
        len: usize,
        segment_id: &str,
        body: DocumentBody,
        cover_type: Option<CoverType>,
    ) -> Self {
        Self {
            len,
            segment_id: segment_id.to_string(),
            body: Some(body),
            cover_type,
        }
    }

    /// Effective merge policy (absent means cover)
    pub fn cover(&self) -> CoverType {
        self.cover_type.unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertAction {
    pub body: DocumentBody,
    pub len: usize,
    /// Reserved, always 0
    #[serde(default)]
    pub line: usize,
    #[serde(default)]
    pub segment_id: String,
}

impl InsertAction {
    pub fn new(len: usize, body: DocumentBody, segment_id: &str) -> Self {
        Self {
            body,
            len,
            line: 0,
            segment_id: segment_id.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteAction {
    pub len: usize,
    /// Reserved, always 0
    #[serde(default)]
    pub line: usize,
    #[serde(default)]
    pub segment_id: String,
}

impl DeleteAction {
    pub fn new(len: usize, segment_id: &str) -> Self {
        Self {
            len,
            line: 0,
            segment_id: segment_id.to_string(),
        }
    }
}

/// One step of an edit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "t")]
pub enum Action {
    #[serde(rename = "r")]
    Retain(RetainAction),
    #[serde(rename = "i")]
    Insert(InsertAction),
    #[serde(rename = "d")]
    Delete(DeleteAction),
}

/// An ordered edit, consumed once by the executor
pub type ActionList = Vec<Action>;

impl Action {
    pub fn retain(len: usize, segment_id: &str) -> Self {
        Action::Retain(RetainAction::new(len, segment_id))
    }

    pub fn retain_with_body(
        len: usize,
        segment_id: &str,
        body: DocumentBody,
        cover_type: Option<CoverType>,
    ) -> Self {
        Action::Retain(RetainAction::with_body(len, segment_id, body, cover_type))
    }

    pub fn insert(len: usize, body: DocumentBody, segment_id: &str) -> Self {
        Action::Insert(InsertAction::new(len, body, segment_id))
    }

    pub fn delete(len: usize, segment_id: &str) -> Self {
        Action::Delete(DeleteAction::new(len, segment_id))
    }

    pub fn kind(&self) -> ActionKind {
        match self {
            Action::Retain(_) => ActionKind::Retain,
            Action::Insert(_) => ActionKind::Insert,
            Action::Delete(_) => ActionKind::Delete,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Action::Retain(a) => a.len,
            Action::Insert(a) => a.len,
            Action::Delete(a) => a.len,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn segment_id(&self) -> &str {
        match self {
            Action::Retain(a) => &a.segment_id,
            Action::Insert(a) => &a.segment_id,
            Action::Delete(a) => &a.segment_id,
        }
    }

    pub fn body(&self) -> Option<&DocumentBody> {
        match self {
            Action::Retain(a) => a.body.as_ref(),
            Action::Insert(a) => Some(&a.body),
            Action::Delete(_) => None,
        }
    }

    /// A retain without body changes nothing
    pub fn is_plain_retain(&self) -> bool {
        matches!(self, Action::Retain(RetainAction { body: None, .. }))
    }

    /// Same action with a different length and no body change
    pub(crate) fn with_len(&self, len: usize) -> Action {
        let mut action = self.clone();
        match &mut action {
            Action::Retain(a) => a.len = len,
            Action::Insert(a) => a.len = len,
            Action::Delete(a) => a.len = len,
        }
        action
    }
}
