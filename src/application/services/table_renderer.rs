use super::row_projector::RowProjector;
use crate::application::ports::attempt_store::AttemptStore;
use crate::application::ports::results_table::ResultsTable;
use crate::shared::error::AppError;
use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, warn};

/// Number of attempts fetched per render. Incomplete attempts count toward it.
pub const MOST_RECENT_LIMIT: usize = 1000;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RenderSummary {
    pub fetched: usize,
    pub rendered: usize,
    pub skipped_incomplete: usize,
    pub link_failures: usize,
}

#[async_trait]
pub trait TableRendererTrait: Send + Sync {
    async fn render(&self) -> Result<RenderSummary, AppError>;
}

/// Rebuilds the whole results table from the most recent attempts.
pub struct TableRenderer {
    store: Arc<dyn AttemptStore>,
    projector: Arc<RowProjector>,
    table: Arc<dyn ResultsTable>,
}

impl TableRenderer {
    pub fn new(
        store: Arc<dyn AttemptStore>,
        projector: Arc<RowProjector>,
        table: Arc<dyn ResultsTable>,
    ) -> Self {
        Self {
            store,
            projector,
            table,
        }
    }
}

#[async_trait]
impl TableRendererTrait for TableRenderer {
    async fn render(&self) -> Result<RenderSummary, AppError> {
        let records = self.store.most_recent_attempts(MOST_RECENT_LIMIT).await?;

        let mut summary = RenderSummary {
            fetched: records.len(),
            ..RenderSummary::default()
        };
        let mut rows = Vec::with_capacity(records.len());
        for record in records.iter().filter(|record| record.is_complete()) {
            if let Some(row) = self.projector.project(record) {
                for err in row.link_errors() {
                    warn!(id = %record.id, error = %err, "Failed to build playback link");
                    summary.link_failures += 1;
                }
                rows.push(row);
            }
        }
        summary.rendered = rows.len();
        summary.skipped_incomplete = summary.fetched - summary.rendered;

        self.table.replace_rows(rows).await;
        debug!(
            fetched = summary.fetched,
            rendered = summary.rendered,
            skipped = summary.skipped_incomplete,
            link_failures = summary.link_failures,
            "Rendered results table"
        );
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::shared::timestamp::TimestampFormatter;
    use crate::domain::entities::{AttemptRecord, AttemptRef, SyncBatch};
    use crate::domain::value_objects::{AttemptId, Revision};
    use crate::infrastructure::alg::AlgCubingNetEncoder;
    use crate::infrastructure::stats::StatsTimeFormatter;
    use crate::infrastructure::view::InMemoryResultsTable;
    use mockall::mock;
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

    fn attempt(id: &str, total: Option<i64>) -> AttemptRecord {
        AttemptRecord {
            id: AttemptId::new(id.to_string()).unwrap(),
            rev: Revision::new("1-abc".to_string()).unwrap(),
            total_result_ms: total,
            scramble: Some("R U R'".to_string()),
            solution: None,
            event: "333".to_string(),
            unix_date: Some(1_700_000_000_000),
        }
    }

    fn renderer(store: MockStore, table: InMemoryResultsTable) -> TableRenderer {
        let projector = RowProjector::new(
            Arc::new(StatsTimeFormatter),
            Arc::new(AlgCubingNetEncoder::new()),
            TimestampFormatter::utc(),
        );
        TableRenderer::new(Arc::new(store), Arc::new(projector), Arc::new(table))
    }

    #[tokio::test]
    async fn renders_complete_attempts_in_store_order() {
        let mut store = MockStore::new();
        store
            .expect_most_recent_attempts()
            .withf(|limit| *limit == MOST_RECENT_LIMIT)
            .times(1)
            .returning(|_| {
                Ok(vec![
                    attempt("c", Some(3_000)),
                    attempt("b", None),
                    attempt("a", Some(12_345)),
                ])
            });
        let table = InMemoryResultsTable::new();

        let summary = renderer(store, table.clone()).render().await.unwrap();

        assert_eq!(
            summary,
            RenderSummary {
                fetched: 3,
                rendered: 2,
                skipped_incomplete: 1,
                link_failures: 0,
            }
        );
        let rows = table.rows().await;
        let ids: Vec<_> = rows.iter().map(|row| row.attempt_id().as_str()).collect();
        assert_eq!(ids, vec!["c", "a"]);
        assert_eq!(rows[1].time, "12.34");
    }

    #[tokio::test]
    async fn render_is_idempotent() {
        let mut store = MockStore::new();
        store
            .expect_most_recent_attempts()
            .times(2)
            .returning(|_| Ok(vec![attempt("a", Some(12_345)), attempt("b", Some(9_000))]));
        let table = InMemoryResultsTable::new();
        let renderer = renderer(store, table.clone());

        renderer.render().await.unwrap();
        let first = table.rows().await;
        renderer.render().await.unwrap();
        assert_eq!(table.rows().await, first);
    }

    #[tokio::test]
    async fn malformed_solution_is_counted_not_fatal() {
        let mut store = MockStore::new();
        store.expect_most_recent_attempts().returning(|_| {
            let mut broken = attempt("a", Some(1_000));
            broken.solution = Some("R (U".to_string());
            Ok(vec![broken, attempt("b", Some(2_000))])
        });
        let table = InMemoryResultsTable::new();

        let summary = renderer(store, table.clone()).render().await.unwrap();

        assert_eq!(summary.rendered, 2);
        assert_eq!(summary.link_failures, 1);
        assert_eq!(table.len().await, 2);
    }

    #[tokio::test]
    async fn store_failure_propagates() {
        let mut store = MockStore::new();
        store
            .expect_most_recent_attempts()
            .returning(|_| Err(AppError::Store("database is locked".to_string())));
        let table = InMemoryResultsTable::new();

        let err = renderer(store, table.clone()).render().await.unwrap_err();
        assert!(matches!(err, AppError::Store(_)));
        assert!(table.is_empty().await);
    }
}
