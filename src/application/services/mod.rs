pub mod change_reconciler;
pub mod delete_controller;
pub mod pending_deletions;
pub mod row_projector;
pub mod sync_listener;
pub mod table_renderer;

pub use change_reconciler::{ChangeReconciler, ReconcileOutcome, ReconcileStats};
pub use delete_controller::{DeleteController, DeleteOutcome};
pub use pending_deletions::PendingDeletions;
pub use row_projector::RowProjector;
pub use sync_listener::SyncListener;
pub use table_renderer::{MOST_RECENT_LIMIT, RenderSummary, TableRenderer, TableRendererTrait};
