use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AttemptId(String);

impl AttemptId {
    pub fn new(value: String) -> Result<Self, String> {
        if value.trim().is_empty() {
            return Err("Attempt ID cannot be empty".to_string());
        }
        Ok(Self(value))
    }

    /// Ids sort by creation time so the store's id order matches recency.
    pub fn generate(unix_date_ms: i64) -> Self {
        let suffix = uuid::Uuid::new_v4().simple().to_string();
        Self(format!("{unix_date_ms:013}-{}", &suffix[..8]))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AttemptId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<AttemptId> for String {
    fn from(id: AttemptId) -> Self {
        id.0
    }
}

/// Document revision in `<generation>-<hash>` form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Revision(String);

impl Revision {
    pub fn new(value: String) -> Result<Self, String> {
        let revision = Self(value);
        if revision.generation().is_none() {
            return Err(format!("Invalid revision format: {}", revision.0));
        }
        Ok(revision)
    }

    pub fn from_parts(generation: u64, hash: &str) -> Self {
        Self(format!("{generation}-{hash}"))
    }

    pub fn generation(&self) -> Option<u64> {
        let (generation, hash) = self.0.split_once('-')?;
        if hash.is_empty() {
            return None;
        }
        generation.parse().ok().filter(|g| *g > 0)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Revision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
