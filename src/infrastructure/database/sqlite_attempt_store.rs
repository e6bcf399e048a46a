use super::connection_pool::ConnectionPool;
use super::queries::{
    INSERT_ATTEMPT, MARK_ATTEMPT_DELETED, SELECT_ATTEMPT_BY_ID, SELECT_RECENT_ATTEMPTS,
    SELECT_REVISION_BY_ID, UPSERT_REPLICATED_ATTEMPT,
};
use crate::application::ports::attempt_store::AttemptStore;
use crate::domain::entities::{
    AttemptDraft, AttemptRecord, AttemptRef, ChangedDocument, ReplicatedDocument, SyncBatch,
    SyncDirection,
};
use crate::domain::value_objects::{AttemptId, Revision};
use crate::shared::error::AppError;
use async_trait::async_trait;
use chrono::Utc;
use sha2::{Digest, Sha256};
use sqlx::FromRow;
use tokio::sync::broadcast;
use tracing::debug;

#[derive(Debug, FromRow)]
struct AttemptRow {
    id: String,
    rev: String,
    total_result_ms: Option<i64>,
    scramble: Option<String>,
    solution: Option<String>,
    event: String,
    unix_date: Option<i64>,
}

impl AttemptRow {
    fn into_domain(self) -> Result<AttemptRecord, AppError> {
        let id = AttemptId::new(self.id)
            .map_err(|err| AppError::SerializationError(format!("Invalid attempt id: {err}")))?;
        let rev = Revision::new(self.rev)
            .map_err(|err| AppError::SerializationError(format!("Invalid revision: {err}")))?;

        Ok(AttemptRecord {
            id,
            rev,
            total_result_ms: self.total_result_ms,
            scramble: self.scramble,
            solution: self.solution,
            event: self.event,
            unix_date: self.unix_date,
        })
    }
}

#[derive(Debug, FromRow)]
struct RevisionRow {
    rev: String,
    deleted: bool,
}

/// Attempt documents in SQLite. Local writes and removals are announced as `Push` batches,
/// replicated documents as `Pull` batches.
pub struct SqliteAttemptStore {
    pool: ConnectionPool,
    changes: broadcast::Sender<SyncBatch>,
}

impl SqliteAttemptStore {
    pub fn new(pool: ConnectionPool, channel_capacity: usize) -> Self {
        let (changes, _) = broadcast::channel(channel_capacity.max(1));
        Self { pool, changes }
    }

    pub async fn initialize(&self) -> Result<(), AppError> {
        self.pool.migrate().await?;
        Ok(())
    }

    /// Stores a new attempt written on this device.
    pub async fn put_attempt(&self, draft: AttemptDraft) -> Result<AttemptRecord, AppError> {
        let now = Utc::now().timestamp_millis();
        let id = AttemptId::generate(draft.unix_date.unwrap_or(now));
        let rev = revision_for(1, &id, &draft, false);

        sqlx::query(INSERT_ATTEMPT)
            .bind(id.as_str())
            .bind(rev.as_str())
            .bind(draft.total_result_ms)
            .bind(&draft.scramble)
            .bind(&draft.solution)
            .bind(&draft.event)
            .bind(draft.unix_date)
            .bind(now)
            .execute(self.pool.get_pool())
            .await?;

        let record = AttemptRecord {
            id,
            rev,
            total_result_ms: draft.total_result_ms,
            scramble: draft.scramble,
            solution: draft.solution,
            event: draft.event,
            unix_date: draft.unix_date,
        };
        self.publish(SyncBatch::new(
            SyncDirection::Push,
            vec![ChangedDocument {
                id: record.id.clone(),
                rev: record.rev.clone(),
                deleted: false,
            }],
        ));
        Ok(record)
    }

    pub async fn get_attempt(&self, id: &AttemptId) -> Result<Option<AttemptRecord>, AppError> {
        let row = sqlx::query_as::<_, AttemptRow>(SELECT_ATTEMPT_BY_ID)
            .bind(id.as_str())
            .fetch_optional(self.pool.get_pool())
            .await?;
        row.map(AttemptRow::into_domain).transpose()
    }

    /// Applies documents received from replication. A document replaces the local copy when
    /// its revision wins; the applied documents are announced as one `Pull` batch.
    pub async fn apply_remote_batch(
        &self,
        documents: Vec<ReplicatedDocument>,
    ) -> Result<SyncBatch, AppError> {
        let now = Utc::now().timestamp_millis();
        let mut applied = Vec::with_capacity(documents.len());
        let mut tx = self.pool.get_pool().begin().await?;

        for document in documents {
            let record = document.record;
            let current = sqlx::query_as::<_, RevisionRow>(SELECT_REVISION_BY_ID)
                .bind(record.id.as_str())
                .fetch_optional(&mut *tx)
                .await?;

            if let Some(current) = current {
                let local = Revision::new(current.rev).map_err(AppError::SerializationError)?;
                if !revision_wins(&record.rev, &local) {
                    debug!(id = %record.id, local = %local, remote = %record.rev, "Keeping local revision");
                    continue;
                }
            }

            sqlx::query(UPSERT_REPLICATED_ATTEMPT)
                .bind(record.id.as_str())
                .bind(record.rev.as_str())
                .bind(record.total_result_ms)
                .bind(&record.scramble)
                .bind(&record.solution)
                .bind(&record.event)
                .bind(record.unix_date)
                .bind(document.deleted)
                .bind(now)
                .execute(&mut *tx)
                .await?;

            applied.push(ChangedDocument {
                id: record.id,
                rev: record.rev,
                deleted: document.deleted,
            });
        }

        tx.commit().await?;

        let batch = SyncBatch::new(SyncDirection::Pull, applied);
        if !batch.is_empty() {
            self.publish(batch.clone());
        }
        Ok(batch)
    }

    fn publish(&self, batch: SyncBatch) {
        // No receivers simply means nobody is listening yet.
        if self.changes.send(batch).is_err() {
            debug!("Sync batch dropped: no subscribers");
        }
    }
}

#[async_trait]
impl AttemptStore for SqliteAttemptStore {
    async fn most_recent_attempts(&self, limit: usize) -> Result<Vec<AttemptRecord>, AppError> {
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let rows = sqlx::query_as::<_, AttemptRow>(SELECT_RECENT_ATTEMPTS)
            .bind(limit)
            .fetch_all(self.pool.get_pool())
            .await?;

        rows.into_iter().map(AttemptRow::into_domain).collect()
    }

    async fn remove(&self, attempt: &AttemptRef) -> Result<(), AppError> {
        let current = sqlx::query_as::<_, RevisionRow>(SELECT_REVISION_BY_ID)
            .bind(attempt.id.as_str())
            .fetch_optional(self.pool.get_pool())
            .await?;

        let current = match current {
            Some(row) if !row.deleted => row,
            _ => {
                debug!(id = %attempt.id, "Attempt already removed");
                return Ok(());
            }
        };

        if current.rev != attempt.rev.as_str() {
            return Err(AppError::Conflict(format!(
                "{} is at revision {}, not {}",
                attempt.id, current.rev, attempt.rev
            )));
        }

        let generation = attempt.rev.generation().unwrap_or(1) + 1;
        let tombstone_rev = revision_for(generation, &attempt.id, &AttemptDraft::default(), true);
        let result = sqlx::query(MARK_ATTEMPT_DELETED)
            .bind(tombstone_rev.as_str())
            .bind(Utc::now().timestamp_millis())
            .bind(attempt.id.as_str())
            .bind(attempt.rev.as_str())
            .execute(self.pool.get_pool())
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::Conflict(format!(
                "{} changed while it was being removed",
                attempt.id
            )));
        }

        self.publish(SyncBatch::new(
            SyncDirection::Push,
            vec![ChangedDocument {
                id: attempt.id.clone(),
                rev: tombstone_rev,
                deleted: true,
            }],
        ));
        Ok(())
    }

    fn start_sync(&self) -> broadcast::Receiver<SyncBatch> {
        self.changes.subscribe()
    }
}

fn revision_for(generation: u64, id: &AttemptId, draft: &AttemptDraft, deleted: bool) -> Revision {
    let payload = serde_json::json!({
        "id": id,
        "deleted": deleted,
        "attempt": draft,
    });
    let digest = Sha256::digest(format!("{generation}:{payload}").as_bytes());
    let hex = format!("{digest:x}");
    Revision::from_parts(generation, &hex[..32])
}

/// Higher generation wins; ties go to the greater revision string.
fn revision_wins(candidate: &Revision, current: &Revision) -> bool {
    (candidate.generation(), candidate.as_str()) > (current.generation(), current.as_str())
}
