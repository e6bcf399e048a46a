use crate::application::ports::results_table::{ResultsTable, ViewHost};
use crate::domain::entities::DisplayRow;
use crate::domain::value_objects::AttemptId;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Table body held in memory.
#[derive(Clone, Default)]
pub struct InMemoryResultsTable {
    rows: Arc<RwLock<Vec<DisplayRow>>>,
}

impl InMemoryResultsTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.rows.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.rows.read().await.is_empty()
    }

    pub async fn contains(&self, id: &AttemptId) -> bool {
        let rows = self.rows.read().await;
        rows.iter().any(|row| row.attempt_id() == id)
    }
}

#[async_trait]
impl ResultsTable for InMemoryResultsTable {
    async fn replace_rows(&self, rows: Vec<DisplayRow>) {
        let mut guard = self.rows.write().await;
        *guard = rows;
    }

    async fn remove_row(&self, id: &AttemptId) -> bool {
        let mut rows = self.rows.write().await;
        let before = rows.len();
        rows.retain(|row| row.attempt_id() != id);
        rows.len() != before
    }

    async fn rows(&self) -> Vec<DisplayRow> {
        self.rows.read().await.clone()
    }
}

/// Fixed set of mount points keyed by selector.
#[derive(Clone, Default)]
pub struct StaticViewHost {
    tables: HashMap<String, Arc<dyn ResultsTable>>,
}

impl StaticViewHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_table(mut self, selector: impl Into<String>, table: Arc<dyn ResultsTable>) -> Self {
        self.tables.insert(selector.into(), table);
        self
    }
}

impl ViewHost for StaticViewHost {
    fn find_table(&self, selector: &str) -> Option<Arc<dyn ResultsTable>> {
        self.tables.get(selector).cloned()
    }
}
