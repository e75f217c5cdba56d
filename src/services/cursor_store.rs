//! Cursor store - service layer
//!
//! Remembers which school of the roster the user reached for a period, so a
//! reopened wizard resumes there. Best-effort: storage failures are logged
//! and never stop data entry.

use tracing::{debug, warn};

use crate::models::{Period, UtilityKind};
use crate::ports::KeyValueStore;

/// Cursor store
///
/// Key layout: `"<feature>_last_index_<periodLabel>"`.
///
/// `persist` is ignored until `restore` has run once, so a fresh session
/// cannot overwrite the previous session's progress before reading it.
pub struct CursorStore<K> {
    kv: K,
    feature: UtilityKind,
    has_restored: bool,
}

impl<K: KeyValueStore> CursorStore<K> {
    pub fn new(kv: K, feature: UtilityKind) -> Self {
        Self {
            kv,
            feature,
            has_restored: false,
        }
    }

    /// Storage key for a period
    pub fn key(&self, period: Period) -> String {
        format!("{}_last_index_{}", self.feature.key(), period.label())
    }

    pub fn has_restored(&self) -> bool {
        self.has_restored
    }

    /// Read the saved index for the period
    ///
    /// An index outside `0..roster_len` is discarded, not clamped. The store
    /// counts as restored afterwards whatever the outcome.
    pub async fn restore(&mut self, period: Period, roster_len: usize) -> Option<usize> {
        let key = self.key(period);
        let stored = match self.kv.get(&key).await {
            Ok(stored) => stored,
            Err(e) => {
                warn!("⚠️ could not read saved progress {}: {:#}", key, e);
                None
            }
        };
        self.has_restored = true;

        let raw = stored?;
        match raw.trim().parse::<usize>() {
            Ok(index) if index < roster_len => {
                debug!("restored {} = {}", key, index);
                Some(index)
            }
            Ok(index) => {
                warn!(
                    "⚠️ saved progress {} = {} is past the roster ({} schools), starting over",
                    key, index, roster_len
                );
                None
            }
            Err(_) => {
                warn!("⚠️ saved progress {} = {:?} is not an index, ignoring", key, raw);
                None
            }
        }
    }

    /// Save the index for the period
    pub async fn persist(&self, period: Period, index: usize) {
        let key = self.key(period);
        if !self.has_restored {
            debug!("skipping save of {} before restore", key);
            return;
        }
        if let Err(e) = self.kv.set(&key, index.to_string()).await {
            warn!("⚠️ could not save progress {} = {}: {:#}", key, index, e);
        }
    }

    /// Forget the period's progress
    pub async fn clear(&self, period: Period) {
        let key = self.key(period);
        if let Err(e) = self.kv.delete(&key).await {
            warn!("⚠️ could not clear progress {}: {:#}", key, e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::MemoryKeyValueStore;

    fn janeiro() -> Period {
        "Janeiro/2025".parse().unwrap()
    }

    #[tokio::test]
    async fn test_round_trip_across_reopen() {
        let kv = MemoryKeyValueStore::new();

        let mut first = CursorStore::new(kv.clone(), UtilityKind::Water);
        assert_eq!(first.restore(janeiro(), 10).await, None);
        first.persist(janeiro(), 7).await;

        let mut reopened = CursorStore::new(kv.clone(), UtilityKind::Water);
        assert_eq!(reopened.restore(janeiro(), 10).await, Some(7));

        let mut other_period = CursorStore::new(kv, UtilityKind::Water);
        assert_eq!(other_period.restore(janeiro().previous(), 10).await, None);
    }

    #[tokio::test]
    async fn test_key_layout() {
        let store = CursorStore::new(MemoryKeyValueStore::new(), UtilityKind::Energy);
        assert_eq!(store.key(janeiro()), "energia_last_index_Janeiro/2025");
    }

    #[tokio::test]
    async fn test_persist_before_restore_is_ignored() {
        let kv = MemoryKeyValueStore::new();
        kv.set("agua_last_index_Janeiro/2025", "4".to_string())
            .await
            .unwrap();

        let mut store = CursorStore::new(kv.clone(), UtilityKind::Water);
        store.persist(janeiro(), 0).await;
        assert_eq!(kv.peek("agua_last_index_Janeiro/2025").as_deref(), Some("4"));

        assert_eq!(store.restore(janeiro(), 5).await, Some(4));
        store.persist(janeiro(), 2).await;
        assert_eq!(kv.peek("agua_last_index_Janeiro/2025").as_deref(), Some("2"));
    }

    #[tokio::test]
    async fn test_out_of_bounds_index_is_discarded() {
        let kv = MemoryKeyValueStore::new();
        kv.set("agua_last_index_Janeiro/2025", "5".to_string())
            .await
            .unwrap();

        let mut store = CursorStore::new(kv, UtilityKind::Water);
        assert_eq!(store.restore(janeiro(), 5).await, None);
        assert!(store.has_restored());
    }

    #[tokio::test]
    async fn test_garbage_value_is_discarded() {
        let kv = MemoryKeyValueStore::new();
        kv.set("agua_last_index_Janeiro/2025", "abc".to_string())
            .await
            .unwrap();

        let mut store = CursorStore::new(kv, UtilityKind::Water);
        assert_eq!(store.restore(janeiro(), 5).await, None);
    }

    #[tokio::test]
    async fn test_failing_storage_is_absorbed() {
        let kv = MemoryKeyValueStore::new();
        kv.set_failing(true);

        let mut store = CursorStore::new(kv, UtilityKind::Water);
        assert_eq!(store.restore(janeiro(), 5).await, None);
        assert!(store.has_restored());
        store.persist(janeiro(), 1).await;
        store.clear(janeiro()).await;
    }

    #[tokio::test]
    async fn test_clear() {
        let kv = MemoryKeyValueStore::new();
        let mut store = CursorStore::new(kv.clone(), UtilityKind::Water);
        store.restore(janeiro(), 3).await;
        store.persist(janeiro(), 2).await;
        store.clear(janeiro()).await;
        assert_eq!(kv.peek("agua_last_index_Janeiro/2025"), None);
    }
}
