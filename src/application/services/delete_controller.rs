use super::pending_deletions::PendingDeletions;
use crate::application::ports::attempt_store::AttemptStore;
use crate::application::ports::results_table::ResultsTable;
use crate::domain::entities::DeleteControl;
use crate::shared::error::AppError;
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Debug, Clone, PartialEq)]
pub struct DeleteOutcome {
    pub row_removed: bool,
    /// Failure reported by the store. Never retried; the next sync change settles the table.
    pub store_error: Option<String>,
}

impl DeleteOutcome {
    pub fn is_success(&self) -> bool {
        self.store_error.is_none()
    }
}

/// Handles a row's delete gesture.
pub struct DeleteController {
    store: Arc<dyn AttemptStore>,
    table: Arc<dyn ResultsTable>,
    pending: Arc<PendingDeletions>,
}

impl DeleteController {
    pub fn new(
        store: Arc<dyn AttemptStore>,
        table: Arc<dyn ResultsTable>,
        pending: Arc<PendingDeletions>,
    ) -> Self {
        Self {
            store,
            table,
            pending,
        }
    }

    pub async fn delete(&self, control: &DeleteControl) -> DeleteOutcome {
        let attempt = &control.attempt;

        // Both must be in place before the store call yields to a sync change.
        self.pending.record(attempt.id.clone()).await;
        let row_removed = self.table.remove_row(&attempt.id).await;

        let store_error = match self.store.remove(attempt).await {
            Ok(()) => {
                info!(id = %attempt.id, "Attempt removed");
                None
            }
            Err(AppError::Conflict(message)) => {
                warn!(id = %attempt.id, rev = %attempt.rev, "Remove conflicted: {message}");
                Some(message)
            }
            Err(err) => {
                warn!(id = %attempt.id, error = %err, "Failed to remove attempt");
                Some(err.to_string())
            }
        };

        if store_error.is_some() {
            // The removal did not happen; the next change for this id must not be swallowed.
            self.pending.forget([&attempt.id]).await;
        }

        DeleteOutcome {
            row_removed,
            store_error,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::clock::Clock;
    use crate::domain::entities::{
        AttemptRecord, AttemptRef, DisplayRow, ScrambleCell, SolutionCell, SyncBatch,
    };
    use crate::domain::value_objects::{AttemptId, Revision};
    use crate::infrastructure::view::InMemoryResultsTable;
    use async_trait::async_trait;
    use mockall::mock;
    use std::sync::Mutex;
    use tokio::sync::broadcast;

    mock! {
        pub Store {}

        #[async_trait]
        impl AttemptStore for Store {
            async fn most_recent_attempts(&self, limit: usize) -> Result<Vec<AttemptRecord>, AppError>;
            async fn remove(&self, attempt: &AttemptRef) -> Result<(), AppError>;
            fn start_sync(&self) -> broadcast::Receiver<SyncBatch>;
        }
    }

    struct FixedClock;

    impl Clock for FixedClock {
        fn now_ms(&self) -> u64 {
            0
        }
    }

    fn control(id: &str) -> DeleteControl {
        DeleteControl {
            attempt: AttemptRef {
                id: AttemptId::new(id.to_string()).unwrap(),
                rev: Revision::new("1-abc".to_string()).unwrap(),
            },
        }
    }

    fn controller(store: MockStore) -> (DeleteController, Arc<PendingDeletions>) {
        let pending = Arc::new(PendingDeletions::new(8, 30_000, Arc::new(FixedClock)));
        let controller = DeleteController::new(
            Arc::new(store),
            Arc::new(InMemoryResultsTable::new()),
            pending.clone(),
        );
        (controller, pending)
    }

    #[tokio::test]
    async fn delete_removes_and_records_pending() {
        let mut store = MockStore::new();
        store
            .expect_remove()
            .withf(|attempt| attempt.id.as_str() == "a" && attempt.rev.as_str() == "1-abc")
            .times(1)
            .returning(|_| Ok(()));
        let (controller, pending) = controller(store);

        let outcome = controller.delete(&control("a")).await;

        assert!(outcome.is_success());
        assert!(!outcome.row_removed);
        assert!(pending.is_pending(&control("a").attempt.id).await);
    }

    #[tokio::test]
    async fn conflict_is_reported_and_pending_entry_dropped() {
        let mut store = MockStore::new();
        store
            .expect_remove()
            .times(1)
            .returning(|_| Err(AppError::Conflict("stale revision".to_string())));
        let (controller, pending) = controller(store);

        let outcome = controller.delete(&control("a")).await;

        assert_eq!(outcome.store_error.as_deref(), Some("stale revision"));
        assert!(!pending.is_pending(&control("a").attempt.id).await);
    }

    fn row(id: &str) -> DisplayRow {
        DisplayRow {
            time: "1.00".to_string(),
            scramble: ScrambleCell {
                text: String::new(),
                link: Ok("https://alg.cubing.net/".to_string()),
            },
            solution: SolutionCell::Empty,
            event: "333".to_string(),
            recorded_at: String::new(),
            delete: control(id),
        }
    }

    /// Captures what the table and pending set looked like when `remove` ran.
    struct InspectingStore {
        table: InMemoryResultsTable,
        pending: Arc<PendingDeletions>,
        seen: Mutex<Option<(bool, bool)>>,
    }

    #[async_trait]
    impl AttemptStore for InspectingStore {
        async fn most_recent_attempts(&self, _: usize) -> Result<Vec<AttemptRecord>, AppError> {
            Ok(Vec::new())
        }

        async fn remove(&self, attempt: &AttemptRef) -> Result<(), AppError> {
            let row_present = self.table.contains(&attempt.id).await;
            let pending = self.pending.is_pending(&attempt.id).await;
            *self.seen.lock().unwrap() = Some((row_present, pending));
            Ok(())
        }

        fn start_sync(&self) -> broadcast::Receiver<SyncBatch> {
            broadcast::channel(1).1
        }
    }

    #[tokio::test]
    async fn row_and_pending_entry_are_settled_before_store_call() {
        let table = InMemoryResultsTable::new();
        table.replace_rows(vec![row("a"), row("b")]).await;
        let pending = Arc::new(PendingDeletions::new(8, 30_000, Arc::new(FixedClock)));
        let store = Arc::new(InspectingStore {
            table: table.clone(),
            pending: pending.clone(),
            seen: Mutex::new(None),
        });
        let controller = DeleteController::new(store.clone(), Arc::new(table.clone()), pending);

        let outcome = controller.delete(&control("a")).await;

        assert!(outcome.row_removed);
        assert!(outcome.is_success());
        assert_eq!(*store.seen.lock().unwrap(), Some((false, true)));
        assert!(table.contains(&control("b").attempt.id).await);
    }
}
