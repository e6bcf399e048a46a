use crate::application::ports::attempt_store::AttemptStore;
use crate::application::ports::clock::Clock;
use crate::application::ports::results_table::{ResultsTable, ViewHost};
use crate::application::services::{
    ChangeReconciler, DeleteController, DeleteOutcome, PendingDeletions, RenderSummary,
    RowProjector, SyncListener, TableRenderer, TableRendererTrait,
};
use crate::application::shared::timestamp::TimestampFormatter;
use crate::domain::entities::{DeleteControl, DisplayRow};
use crate::infrastructure::alg::AlgCubingNetEncoder;
use crate::infrastructure::clock::SystemClock;
use crate::infrastructure::stats::StatsTimeFormatter;
use crate::shared::config::AppConfig;
use crate::shared::error::AppError;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::info;

/// The results page: a mounted table kept in step with the attempt store.
pub struct ResultsPage {
    table: Arc<dyn ResultsTable>,
    renderer: Arc<TableRenderer>,
    reconciler: Arc<ChangeReconciler>,
    delete_controller: DeleteController,
    initial_render: RenderSummary,
    listener: JoinHandle<()>,
}

impl ResultsPage {
    pub async fn load(
        config: &AppConfig,
        store: Arc<dyn AttemptStore>,
        host: &dyn ViewHost,
    ) -> Result<Self, AppError> {
        Self::load_with_clock(config, store, host, Arc::new(SystemClock)).await
    }

    pub async fn load_with_clock(
        config: &AppConfig,
        store: Arc<dyn AttemptStore>,
        host: &dyn ViewHost,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, AppError> {
        config.validate().map_err(AppError::ConfigurationError)?;

        let selector = &config.view.mount_selector;
        let table = host
            .find_table(selector)
            .ok_or_else(|| AppError::MountPointMissing(selector.clone()))?;

        let projector = RowProjector::new(
            Arc::new(StatsTimeFormatter),
            Arc::new(AlgCubingNetEncoder::new()),
            TimestampFormatter::from_config(config.view.utc_offset_minutes),
        )
        .with_identity_tag(config.view.identity_tag.clone());

        let renderer = Arc::new(TableRenderer::new(
            store.clone(),
            Arc::new(projector),
            table.clone(),
        ));
        let pending = Arc::new(PendingDeletions::new(
            config.sync.pending_deletion_capacity,
            config.sync.pending_deletion_ttl_ms,
            clock,
        ));
        let reconciler = Arc::new(ChangeReconciler::new(renderer.clone(), pending.clone()));
        let delete_controller = DeleteController::new(store.clone(), table.clone(), pending);

        // Subscribe first so changes landing during the initial render are not missed.
        let changes = store.start_sync();
        let initial_render = renderer.render().await?;
        let listener = SyncListener::spawn(reconciler.clone(), changes);

        info!(
            selector = %selector,
            rows = initial_render.rendered,
            "Results page loaded"
        );

        Ok(Self {
            table,
            renderer,
            reconciler,
            delete_controller,
            initial_render,
            listener,
        })
    }

    pub fn initial_render(&self) -> RenderSummary {
        self.initial_render
    }

    pub async fn rows(&self) -> Vec<DisplayRow> {
        self.table.rows().await
    }

    pub async fn render(&self) -> Result<RenderSummary, AppError> {
        self.renderer.render().await
    }

    pub async fn delete(&self, control: &DeleteControl) -> DeleteOutcome {
        self.delete_controller.delete(control).await
    }

    pub fn reconciler(&self) -> &Arc<ChangeReconciler> {
        &self.reconciler
    }
}

impl Drop for ResultsPage {
    fn drop(&mut self) {
        self.listener.abort();
    }
}
