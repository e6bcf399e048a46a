use super::attempt::AttemptRef;
use crate::domain::value_objects::AttemptId;
use serde::Serialize;
use thiserror::Error;

/// Label of the solution playback link.
pub const SOLUTION_LINK_GLYPH: &str = "▶️";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Error)]
pub enum LinkError {
    #[error("Invalid move sequence at offset {position}: {message}")]
    Parse { position: usize, message: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScrambleCell {
    /// Raw scramble, or an empty string when the attempt has none.
    pub text: String,
    /// Setup-only playback link.
    pub link: Result<String, LinkError>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum SolutionCell {
    Empty,
    Link {
        label: String,
        href: String,
        title: String,
    },
    Unavailable(LinkError),
}

impl SolutionCell {
    pub fn error(&self) -> Option<&LinkError> {
        match self {
            SolutionCell::Unavailable(err) => Some(err),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeleteControl {
    pub attempt: AttemptRef,
}

/// Everything one table row shows for an attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplayRow {
    pub time: String,
    pub scramble: ScrambleCell,
    pub solution: SolutionCell,
    pub event: String,
    pub recorded_at: String,
    pub delete: DeleteControl,
}

impl DisplayRow {
    pub fn attempt_id(&self) -> &AttemptId {
        &self.delete.attempt.id
    }

    pub fn link_errors(&self) -> impl Iterator<Item = &LinkError> {
        self.scramble
            .link
            .as_ref()
            .err()
            .into_iter()
            .chain(self.solution.error())
    }
}
