use super::change_reconciler::ChangeReconciler;
use crate::domain::entities::SyncBatch;
use std::sync::Arc;
use tokio::sync::broadcast::{self, error::RecvError};
use tokio::task::JoinHandle;
use tracing::{debug, error, warn};

/// Forwards every replication batch to the reconciler until the stream closes.
pub struct SyncListener;

impl SyncListener {
    pub fn spawn(
        reconciler: Arc<ChangeReconciler>,
        mut changes: broadcast::Receiver<SyncBatch>,
    ) -> JoinHandle<()> {
        tokio::spawn(async move {
            loop {
                let result = match changes.recv().await {
                    Ok(batch) => reconciler.on_sync_change(&batch).await,
                    Err(RecvError::Lagged(skipped)) => {
                        warn!(skipped, "Sync stream lagged, refreshing results table");
                        reconciler.force_refresh().await
                    }
                    Err(RecvError::Closed) => {
                        debug!("Sync stream closed");
                        break;
                    }
                };

                if let Err(err) = result {
                    error!(error = %err, "Failed to update results table after sync change");
                }
            }
        })
    }
}
