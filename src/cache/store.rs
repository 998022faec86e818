//! Cache store collaborator.
//!
//! [`CacheStore`] is the key-value surface the catalog cache talks to.
//! Implementations never surface backend errors: a failed or unavailable
//! lookup is reported as a miss and the read path degrades to a direct
//! query.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use dashmap::DashMap;
use serde_json::Value;

/// TTL-capable key-value store consumed by the catalog cache.
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Fetch a value. Absent, expired, and unreadable entries all return `None`.
    async fn get(&self, key: &str) -> Option<Value>;

    /// Store a value under `key` for `ttl`. Overwrites any existing entry.
    async fn set(&self, key: &str, value: Value, ttl: Duration);

    /// Remove one entry. Removing an absent key is a no-op.
    async fn delete(&self, key: &str);

    /// Flush the entire store.
    async fn clear(&self);
}

struct StoredEntry {
    value: Value,
    expires_at: Instant,
}

/// In-process [`CacheStore`] with per-entry deadlines.
///
/// Expired entries are dropped lazily on the next `get`. Doubles as the
/// fake store for tests.
#[derive(Default)]
pub struct MemoryStore {
    entries: DashMap<String, StoredEntry>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
        }
    }

    /// Number of entries currently held, expired ones included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[async_trait]
impl CacheStore for MemoryStore {
    async fn get(&self, key: &str) -> Option<Value> {
        let expired = {
            let entry = self.entries.get(key)?;
            if entry.expires_at > Instant::now() {
                return Some(entry.value.clone());
            }
            true
        };
        // Guard dropped above; safe to remove without deadlocking the shard.
        if expired {
            self.entries.remove(key);
        }
        None
    }

    async fn set(&self, key: &str, value: Value, ttl: Duration) {
        self.entries.insert(
            key.to_string(),
            StoredEntry {
                value,
                expires_at: Instant::now() + ttl,
            },
        );
    }

    async fn delete(&self, key: &str) {
        self.entries.remove(key);
    }

    async fn clear(&self) {
        self.entries.clear();
    }
}

/// Store used when caching is disabled: every read is a miss and writes
/// are discarded.
pub struct NullStore;

#[async_trait]
impl CacheStore for NullStore {
    async fn get(&self, _key: &str) -> Option<Value> {
        None
    }

    async fn set(&self, _key: &str, _value: Value, _ttl: Duration) {}

    async fn delete(&self, _key: &str) {}

    async fn clear(&self) {}
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[tokio::test]
    async fn set_get_roundtrip() {
        let store = MemoryStore::new();
        assert!(store.get("products:all").await.is_none());

        store
            .set("products:all", json!({"ids": [1, 2]}), Duration::from_secs(60))
            .await;

        let value = store.get("products:all").await.expect("cached value");
        assert_eq!(value, json!({"ids": [1, 2]}));
    }

    #[tokio::test]
    async fn expired_entries_read_as_misses() {
        let store = MemoryStore::new();
        store
            .set("products:stats", json!({"total": 3}), Duration::ZERO)
            .await;

        assert!(store.get("products:stats").await.is_none());
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn delete_is_idempotent() {
        let store = MemoryStore::new();
        store
            .set("categories:all", json!({"ids": []}), Duration::from_secs(60))
            .await;

        store.delete("categories:all").await;
        store.delete("categories:all").await;
        assert!(store.get("categories:all").await.is_none());
    }

    #[tokio::test]
    async fn clear_flushes_everything() {
        let store = MemoryStore::new();
        store
            .set("a", json!(1), Duration::from_secs(60))
            .await;
        store
            .set("b", json!(2), Duration::from_secs(60))
            .await;

        store.clear().await;
        assert!(store.is_empty());
        assert!(store.get("a").await.is_none());
        assert!(store.get("b").await.is_none());
    }
}
