//! In-memory correlation store for engine callback results.
//!
//! Process-local and ephemeral: entries are lost on restart and are not
//! shared between instances. Growth is bounded by a retention period
//! (enforced by [`crate::background::result_retention`]) and a capacity
//! ceiling enforced on insert.

use std::collections::HashMap;
use std::time::Duration;

use chrono::Utc;
use pige_core::result::StoredResult;
use pige_core::types::Timestamp;
use tokio::sync::RwLock;

/// Callback results keyed by search id.
///
/// Thread-safe via interior `RwLock`; designed to be wrapped in `Arc` and
/// shared across the application.
pub struct ResultStore {
    entries: RwLock<HashMap<String, StoredResult>>,
    retention: Duration,
    /// `0` disables the ceiling.
    max_entries: usize,
}

impl ResultStore {
    pub fn new(retention: Duration, max_entries: usize) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            retention,
            max_entries,
        }
    }

    pub fn retention(&self) -> Duration {
        self.retention
    }

    /// Store a result received now. Last write wins.
    pub async fn insert(&self, search_id: String, payload: serde_json::Value) -> StoredResult {
        self.insert_at(search_id, payload, Utc::now()).await
    }

    /// Store a result with an explicit reception time.
    pub async fn insert_at(
        &self,
        search_id: String,
        payload: serde_json::Value,
        received_at: Timestamp,
    ) -> StoredResult {
        let entry = StoredResult {
            search_id: search_id.clone(),
            received_at,
            payload,
        };

        let mut entries = self.entries.write().await;
        let replaced = entries.insert(search_id.clone(), entry.clone()).is_some();
        if replaced {
            tracing::info!(search_id = %search_id, "Overwrote existing pige result");
        }

        if self.max_entries > 0 {
            while entries.len() > self.max_entries {
                let oldest = entries
                    .values()
                    .filter(|e| e.search_id != search_id)
                    .min_by_key(|e| e.received_at)
                    .map(|e| e.search_id.clone());
                match oldest {
                    Some(id) => {
                        entries.remove(&id);
                        tracing::warn!(search_id = %id, "Result store full, evicted oldest entry");
                    }
                    None => break,
                }
            }
        }

        entry
    }

    pub async fn get(&self, search_id: &str) -> Option<StoredResult> {
        self.entries.read().await.get(search_id).cloned()
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Drop every entry received before `cutoff`. Returns how many were removed.
    pub async fn purge_older_than(&self, cutoff: Timestamp) -> usize {
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|_, e| e.received_at >= cutoff);
        before - entries.len()
    }

    /// Drop entries older than the retention period.
    pub async fn purge_expired(&self) -> usize {
        let retention = chrono::Duration::from_std(self.retention)
            .unwrap_or_else(|_| chrono::Duration::weeks(52 * 100));
        match Utc::now().checked_sub_signed(retention) {
            Some(cutoff) => self.purge_older_than(cutoff).await,
            None => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn store() -> ResultStore {
        ResultStore::new(Duration::from_secs(3600), 0)
    }

    #[tokio::test]
    async fn insert_then_get() {
        let store = store();
        store.insert("abc".into(), json!({ "n": 1 })).await;
        let entry = store.get("abc").await.unwrap();
        assert_eq!(entry.search_id, "abc");
        assert_eq!(entry.payload, json!({ "n": 1 }));
    }

    #[tokio::test]
    async fn missing_id_returns_none() {
        assert!(store().get("nope").await.is_none());
    }

    #[tokio::test]
    async fn second_write_overwrites_first() {
        let store = store();
        store.insert("abc".into(), json!({ "n": 1 })).await;
        store.insert("abc".into(), json!({ "n": 2 })).await;
        assert_eq!(store.len().await, 1);
        assert_eq!(store.get("abc").await.unwrap().payload, json!({ "n": 2 }));
    }

    #[tokio::test]
    async fn capacity_evicts_oldest() {
        let store = ResultStore::new(Duration::from_secs(3600), 2);
        let t0 = Utc::now();
        store.insert_at("a".into(), json!(1), t0).await;
        store.insert_at("b".into(), json!(2), t0 + chrono::Duration::seconds(1)).await;
        store.insert_at("c".into(), json!(3), t0 + chrono::Duration::seconds(2)).await;

        assert_eq!(store.len().await, 2);
        assert!(store.get("a").await.is_none());
        assert!(store.get("b").await.is_some());
        assert!(store.get("c").await.is_some());
    }

    #[tokio::test]
    async fn purge_removes_only_old_entries() {
        let store = store();
        let now = Utc::now();
        store.insert_at("old".into(), json!(1), now - chrono::Duration::hours(2)).await;
        store.insert_at("new".into(), json!(2), now).await;

        let removed = store.purge_expired().await;
        assert_eq!(removed, 1);
        assert!(store.get("old").await.is_none());
        assert!(store.get("new").await.is_some());
    }
}
