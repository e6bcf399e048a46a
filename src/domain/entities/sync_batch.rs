use crate::domain::value_objects::{AttemptId, Revision};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncDirection {
    /// Local writes replicated outward.
    Push,
    /// Remote writes replicated into the local database.
    Pull,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangedDocument {
    pub id: AttemptId,
    pub rev: Revision,
    pub deleted: bool,
}

/// One batch of document changes delivered by the store's change stream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncBatch {
    pub direction: SyncDirection,
    pub docs: Vec<ChangedDocument>,
}

impl SyncBatch {
    pub fn new(direction: SyncDirection, docs: Vec<ChangedDocument>) -> Self {
        Self { direction, docs }
    }

    /// The id of the only changed document, if the batch holds exactly one.
    pub fn single_document(&self) -> Option<&AttemptId> {
        match self.docs.as_slice() {
            [only] => Some(&only.id),
            _ => None,
        }
    }

    pub fn ids(&self) -> impl Iterator<Item = &AttemptId> {
        self.docs.iter().map(|doc| &doc.id)
    }

    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }

    pub fn len(&self) -> usize {
        self.docs.len()
    }
}
