use crate::domain::entities::DisplayRow;
use crate::domain::value_objects::AttemptId;
use async_trait::async_trait;
use std::sync::Arc;

/// Body of the rendered results table.
#[async_trait]
pub trait ResultsTable: Send + Sync {
    /// Swaps the whole body for `rows`. Readers never observe a mix of old and new rows.
    async fn replace_rows(&self, rows: Vec<DisplayRow>);

    /// Removes the row of `id`; returns whether a row was present.
    async fn remove_row(&self, id: &AttemptId) -> bool;

    async fn rows(&self) -> Vec<DisplayRow>;
}

/// Resolves rendering mount points by selector.
pub trait ViewHost: Send + Sync {
    fn find_table(&self, selector: &str) -> Option<Arc<dyn ResultsTable>>;
}
