use crate::application::ports::clock::Clock;
use crate::domain::value_objects::AttemptId;
use lru::LruCache;
use std::num::NonZeroUsize;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Identities removed locally whose confirming sync change has not been observed yet.
///
/// Entries expire after `ttl_ms`; when full, the least recently recorded entry is dropped.
pub struct PendingDeletions {
    entries: Mutex<LruCache<AttemptId, u64>>,
    ttl_ms: u64,
    clock: Arc<dyn Clock>,
}

impl PendingDeletions {
    pub fn new(capacity: usize, ttl_ms: u64, clock: Arc<dyn Clock>) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: Mutex::new(LruCache::new(capacity)),
            ttl_ms,
            clock,
        }
    }

    pub async fn record(&self, id: AttemptId) {
        let now = self.clock.now_ms();
        let mut entries = self.entries.lock().await;
        entries.put(id, now);
    }

    /// Removes `id` and returns true if it was pending and not yet expired.
    pub async fn take_if_pending(&self, id: &AttemptId) -> bool {
        let now = self.clock.now_ms();
        let mut entries = self.entries.lock().await;
        match entries.pop(id) {
            Some(recorded_at) => !self.is_expired(recorded_at, now),
            None => false,
        }
    }

    pub async fn forget<'a>(&self, ids: impl IntoIterator<Item = &'a AttemptId>) {
        let mut entries = self.entries.lock().await;
        for id in ids {
            entries.pop(id);
        }
    }

    pub async fn is_pending(&self, id: &AttemptId) -> bool {
        let now = self.clock.now_ms();
        let entries = self.entries.lock().await;
        entries
            .peek(id)
            .is_some_and(|recorded_at| !self.is_expired(*recorded_at, now))
    }

    /// Live entries; expired ones are pruned first.
    pub async fn len(&self) -> usize {
        let now = self.clock.now_ms();
        let mut entries = self.entries.lock().await;
        let expired: Vec<AttemptId> = entries
            .iter()
            .filter(|(_, recorded_at)| self.is_expired(**recorded_at, now))
            .map(|(id, _)| id.clone())
            .collect();
        for id in &expired {
            entries.pop(id);
        }
        entries.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    fn is_expired(&self, recorded_at: u64, now: u64) -> bool {
        now.saturating_sub(recorded_at) > self.ttl_ms
    }
}
