#![allow(dead_code)]

use async_trait::async_trait;
use solve_results_lib::application::ports::clock::Clock;
use solve_results_lib::domain::entities::ChangedDocument;
use solve_results_lib::domain::value_objects::{AttemptId, Revision};
use solve_results_lib::{AppError, AttemptRecord, AttemptRef, SyncBatch, SyncDirection};
use solve_results_lib::application::ports::attempt_store::AttemptStore;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use tokio::sync::broadcast;

/// Store double: serves a fixed list of records and records removals.
pub struct FakeStore {
    records: Mutex<Vec<AttemptRecord>>,
    removed: Mutex<Vec<AttemptRef>>,
    queries: AtomicUsize,
    changes: broadcast::Sender<SyncBatch>,
}

impl FakeStore {
    pub fn new(records: Vec<AttemptRecord>) -> Self {
        let (changes, _) = broadcast::channel(16);
        Self {
            records: Mutex::new(records),
            removed: Mutex::new(Vec::new()),
            queries: AtomicUsize::new(0),
            changes,
        }
    }

    pub fn set_records(&self, records: Vec<AttemptRecord>) {
        *self.records.lock().unwrap() = records;
    }

    pub fn removed(&self) -> Vec<AttemptRef> {
        self.removed.lock().unwrap().clone()
    }

    /// Number of `most_recent_attempts` calls, i.e. renders.
    pub fn queries(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }

    pub fn emit(&self, ids: &[&str]) {
        let docs = ids
            .iter()
            .map(|id| ChangedDocument {
                id: attempt_id(id),
                rev: Revision::new("2-remote".to_string()).unwrap(),
                deleted: false,
            })
            .collect();
        self.changes
            .send(SyncBatch::new(SyncDirection::Pull, docs))
            .unwrap();
    }
}

#[async_trait]
impl AttemptStore for FakeStore {
    async fn most_recent_attempts(&self, limit: usize) -> Result<Vec<AttemptRecord>, AppError> {
        self.queries.fetch_add(1, Ordering::SeqCst);
        let records = self.records.lock().unwrap();
        Ok(records.iter().take(limit).cloned().collect())
    }

    async fn remove(&self, attempt: &AttemptRef) -> Result<(), AppError> {
        self.removed.lock().unwrap().push(attempt.clone());
        self.records
            .lock()
            .unwrap()
            .retain(|record| record.id != attempt.id);
        Ok(())
    }

    fn start_sync(&self) -> broadcast::Receiver<SyncBatch> {
        self.changes.subscribe()
    }
}

pub struct ManualClock(pub AtomicU64);

impl ManualClock {
    pub fn new(now_ms: u64) -> Self {
        Self(AtomicU64::new(now_ms))
    }

    pub fn advance(&self, ms: u64) {
        self.0.fetch_add(ms, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> u64 {
        self.0.load(Ordering::SeqCst)
    }
}

pub fn attempt_id(value: &str) -> AttemptId {
    AttemptId::new(value.to_string()).unwrap()
}

pub fn attempt(id: &str, total_result_ms: Option<i64>) -> AttemptRecord {
    AttemptRecord {
        id: attempt_id(id),
        rev: Revision::new("1-abc".to_string()).unwrap(),
        total_result_ms,
        scramble: Some("R U R'".to_string()),
        solution: None,
        event: "333".to_string(),
        unix_date: Some(1_700_000_000_000),
    }
}

/// Polls `condition` until it holds or a second has passed.
pub async fn eventually<F>(mut condition: F) -> bool
where
    F: FnMut() -> bool,
{
    let deadline = tokio::time::Instant::now() + std::time::Duration::from_secs(1);
    while tokio::time::Instant::now() < deadline {
        if condition() {
            return true;
        }
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    }
    condition()
}
