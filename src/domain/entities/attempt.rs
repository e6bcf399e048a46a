use crate::domain::value_objects::{AttemptId, Revision};
use serde::{Deserialize, Serialize};

/// One completed or partial puzzle attempt as stored in the replicated database.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttemptRecord {
    #[serde(rename = "_id")]
    pub id: AttemptId,
    #[serde(rename = "_rev")]
    pub rev: Revision,
    /// `None` marks an incomplete or penalty attempt.
    #[serde(default)]
    pub total_result_ms: Option<i64>,
    #[serde(default)]
    pub scramble: Option<String>,
    #[serde(default)]
    pub solution: Option<String>,
    #[serde(default)]
    pub event: String,
    #[serde(default)]
    pub unix_date: Option<i64>,
}

impl AttemptRecord {
    pub fn is_complete(&self) -> bool {
        self.total_result_ms.is_some()
    }

    pub fn has_solution(&self) -> bool {
        self.solution.as_deref().is_some_and(|s| !s.is_empty())
    }

    pub fn reference(&self) -> AttemptRef {
        AttemptRef {
            id: self.id.clone(),
            rev: self.rev.clone(),
        }
    }
}

/// Identity and revision of a record, enough to request its removal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AttemptRef {
    pub id: AttemptId,
    pub rev: Revision,
}

/// Fields of an attempt before the store assigns an id and revision.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttemptDraft {
    #[serde(default)]
    pub total_result_ms: Option<i64>,
    #[serde(default)]
    pub scramble: Option<String>,
    #[serde(default)]
    pub solution: Option<String>,
    #[serde(default)]
    pub event: String,
    #[serde(default)]
    pub unix_date: Option<i64>,
}

impl AttemptDraft {
    pub fn new(event: impl Into<String>) -> Self {
        Self {
            event: event.into(),
            ..Self::default()
        }
    }

    pub fn with_result(mut self, total_result_ms: i64) -> Self {
        self.total_result_ms = Some(total_result_ms);
        self
    }

    pub fn with_scramble(mut self, scramble: impl Into<String>) -> Self {
        self.scramble = Some(scramble.into());
        self
    }

    pub fn with_solution(mut self, solution: impl Into<String>) -> Self {
        self.solution = Some(solution.into());
        self
    }

    pub fn with_unix_date(mut self, unix_date: i64) -> Self {
        self.unix_date = Some(unix_date);
        self
    }
}

/// A document as delivered by replication, including tombstones.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplicatedDocument {
    #[serde(flatten)]
    pub record: AttemptRecord,
    #[serde(rename = "_deleted", default)]
    pub deleted: bool,
}
