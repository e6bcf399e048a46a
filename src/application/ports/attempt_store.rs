use crate::domain::entities::{AttemptRecord, AttemptRef, SyncBatch};
use crate::shared::error::AppError;
use async_trait::async_trait;
use tokio::sync::broadcast;

/// Locally replicated attempt database.
#[async_trait]
pub trait AttemptStore: Send + Sync {
    /// Newest attempts first, at most `limit` of them. Incomplete attempts are included.
    async fn most_recent_attempts(&self, limit: usize) -> Result<Vec<AttemptRecord>, AppError>;

    /// Removes the attempt. Already removed attempts are ignored; a stale revision fails with
    /// `AppError::Conflict`.
    async fn remove(&self, attempt: &AttemptRef) -> Result<(), AppError>;

    /// Subscribes to replication batches. The receiver lives as long as the page.
    fn start_sync(&self) -> broadcast::Receiver<SyncBatch>;
}
