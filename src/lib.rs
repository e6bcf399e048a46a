pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod shared;
pub mod state;

pub use application::services::{
    ChangeReconciler, DeleteController, DeleteOutcome, MOST_RECENT_LIMIT, PendingDeletions,
    ReconcileOutcome, RenderSummary, RowProjector, TableRenderer, TableRendererTrait,
};
pub use domain::entities::{
    AttemptDraft, AttemptRecord, AttemptRef, DeleteControl, DisplayRow, ReplicatedDocument,
    SolutionCell, SyncBatch, SyncDirection,
};
pub use infrastructure::{ConnectionPool, InMemoryResultsTable, SqliteAttemptStore, StaticViewHost};
pub use shared::{AppConfig, AppError, Result};
pub use state::ResultsPage;

/// Installs the global `tracing` subscriber. `RUST_LOG` overrides the default filter.
pub fn init_logging() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "solve_results=debug,info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
