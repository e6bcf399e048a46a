use super::pending_deletions::PendingDeletions;
use super::table_renderer::{RenderSummary, TableRendererTrait};
use crate::domain::entities::SyncBatch;
use crate::shared::error::AppError;
use serde::Serialize;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ReconcileOutcome {
    /// The table already reflects the change through a local removal.
    Suppressed,
    Rendered(RenderSummary),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ReconcileStats {
    pub suppressed: u64,
    pub rendered: u64,
}

/// Decides whether a replication batch needs a full re-render.
pub struct ChangeReconciler {
    renderer: Arc<dyn TableRendererTrait>,
    pending: Arc<PendingDeletions>,
    suppressed: AtomicU64,
    rendered: AtomicU64,
}

impl ChangeReconciler {
    pub fn new(renderer: Arc<dyn TableRendererTrait>, pending: Arc<PendingDeletions>) -> Self {
        Self {
            renderer,
            pending,
            suppressed: AtomicU64::new(0),
            rendered: AtomicU64::new(0),
        }
    }

    pub async fn on_sync_change(&self, batch: &SyncBatch) -> Result<ReconcileOutcome, AppError> {
        if let Some(id) = batch.single_document() {
            if self.pending.take_if_pending(id).await {
                self.suppressed.fetch_add(1, Ordering::Relaxed);
                debug!(id = %id, direction = ?batch.direction, "Change already reflected by local removal");
                return Ok(ReconcileOutcome::Suppressed);
            }
        }

        // The render below reflects every document in the batch.
        self.pending.forget(batch.ids()).await;
        debug!(
            docs = batch.len(),
            direction = ?batch.direction,
            "Re-rendering after sync change"
        );
        self.render().await
    }

    /// Renders regardless of pending deletions, e.g. after missed change notifications.
    pub async fn force_refresh(&self) -> Result<ReconcileOutcome, AppError> {
        self.render().await
    }

    pub fn stats(&self) -> ReconcileStats {
        ReconcileStats {
            suppressed: self.suppressed.load(Ordering::Relaxed),
            rendered: self.rendered.load(Ordering::Relaxed),
        }
    }

    async fn render(&self) -> Result<ReconcileOutcome, AppError> {
        let summary = self.renderer.render().await?;
        self.rendered.fetch_add(1, Ordering::Relaxed);
        Ok(ReconcileOutcome::Rendered(summary))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::clock::Clock;
    use crate::domain::entities::{ChangedDocument, SyncDirection};
    use crate::domain::value_objects::{AttemptId, Revision};
    use async_trait::async_trait;
    use mockall::mock;

    mock! {
        pub Renderer {}

        #[async_trait]
        impl TableRendererTrait for Renderer {
            async fn render(&self) -> Result<RenderSummary, AppError>;
        }
    }

    struct FixedClock;

    impl Clock for FixedClock {
        fn now_ms(&self) -> u64 {
            1_000
        }
    }

    fn id(value: &str) -> AttemptId {
        AttemptId::new(value.to_string()).unwrap()
    }

    fn batch(ids: &[&str]) -> SyncBatch {
        SyncBatch::new(
            SyncDirection::Pull,
            ids.iter()
                .map(|value| ChangedDocument {
                    id: id(value),
                    rev: Revision::new("2-abc".to_string()).unwrap(),
                    deleted: true,
                })
                .collect(),
        )
    }

    fn reconciler(renders: usize) -> (ChangeReconciler, Arc<PendingDeletions>) {
        let mut renderer = MockRenderer::new();
        renderer
            .expect_render()
            .times(renders)
            .returning(|| Ok(RenderSummary::default()));
        let pending = Arc::new(PendingDeletions::new(8, 30_000, Arc::new(FixedClock)));
        (
            ChangeReconciler::new(Arc::new(renderer), pending.clone()),
            pending,
        )
    }

    #[tokio::test]
    async fn single_pending_change_is_suppressed() {
        let (reconciler, pending) = reconciler(0);
        pending.record(id("x")).await;

        let outcome = reconciler.on_sync_change(&batch(&["x"])).await.unwrap();

        assert_eq!(outcome, ReconcileOutcome::Suppressed);
        assert_eq!(reconciler.stats().suppressed, 1);
        assert!(pending.is_empty().await);
    }

    #[tokio::test]
    async fn batch_of_two_renders_even_with_pending_member() {
        let (reconciler, pending) = reconciler(1);
        pending.record(id("x")).await;

        let outcome = reconciler.on_sync_change(&batch(&["x", "c"])).await.unwrap();

        assert!(matches!(outcome, ReconcileOutcome::Rendered(_)));
        assert!(!pending.is_pending(&id("x")).await);
    }

    #[tokio::test]
    async fn nothing_pending_always_renders() {
        let (reconciler, _) = reconciler(2);
        reconciler.on_sync_change(&batch(&["a"])).await.unwrap();
        reconciler.on_sync_change(&batch(&["a", "b"])).await.unwrap();
        assert_eq!(reconciler.stats().rendered, 2);
    }

    #[tokio::test]
    async fn different_single_id_renders_and_keeps_pending() {
        let (reconciler, pending) = reconciler(1);
        pending.record(id("x")).await;

        reconciler.on_sync_change(&batch(&["y"])).await.unwrap();

        assert!(pending.is_pending(&id("x")).await);
    }

    #[tokio::test]
    async fn rapid_deletions_are_each_suppressed() {
        let (reconciler, pending) = reconciler(0);
        pending.record(id("a")).await;
        pending.record(id("b")).await;

        assert_eq!(
            reconciler.on_sync_change(&batch(&["a"])).await.unwrap(),
            ReconcileOutcome::Suppressed
        );
        assert_eq!(
            reconciler.on_sync_change(&batch(&["b"])).await.unwrap(),
            ReconcileOutcome::Suppressed
        );
    }

    #[tokio::test]
    async fn empty_batch_renders() {
        let (reconciler, _) = reconciler(1);
        let outcome = reconciler.on_sync_change(&batch(&[])).await.unwrap();
        assert!(matches!(outcome, ReconcileOutcome::Rendered(_)));
    }

    #[tokio::test]
    async fn render_failure_propagates() {
        let mut renderer = MockRenderer::new();
        renderer
            .expect_render()
            .returning(|| Err(AppError::Store("unreachable".to_string())));
        let pending = Arc::new(PendingDeletions::new(8, 30_000, Arc::new(FixedClock)));
        let reconciler = ChangeReconciler::new(Arc::new(renderer), pending);

        let err = reconciler.force_refresh().await.unwrap_err();
        assert!(matches!(err, AppError::Store(_)));
        assert_eq!(reconciler.stats().rendered, 0);
    }
}
