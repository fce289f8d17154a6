//! Argument-keyed memoization for upstream lookups.
//!
//! Entries are keyed by `(operation, serialized arguments)` and stored as JSON
//! values in a pluggable [`CacheStore`]. Every [`MemoCache`] owns its store, so
//! two pipelines never share cached results unless they share the cache.

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt::Debug;
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tokio::sync::RwLock;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredEntry {
    pub value: Value,
    /// Unix timestamp (seconds); `None` never expires
    pub expires_at: Option<u64>,
}

/// Backing store for [`MemoCache`]
#[async_trait]
pub trait CacheStore: Send + Sync {
    async fn get(&self, key: &str) -> Option<StoredEntry>;
    async fn insert(&self, key: String, entry: StoredEntry);
    async fn remove(&self, key: &str);
    async fn len(&self) -> usize;
}

/// Process-local store behind an async lock
#[derive(Debug, Default)]
pub struct InMemoryStore {
    entries: RwLock<HashMap<String, StoredEntry>>,
}

#[async_trait]
impl CacheStore for InMemoryStore {
    async fn get(&self, key: &str) -> Option<StoredEntry> {
        self.entries.read().await.get(key).cloned()
    }

    async fn insert(&self, key: String, entry: StoredEntry) {
        self.entries.write().await.insert(key, entry);
    }

    async fn remove(&self, key: &str) {
        self.entries.write().await.remove(key);
    }

    async fn len(&self) -> usize {
        self.entries.read().await.len()
    }
}

/// Cache key for one memoized call
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    /// Build a key from an operation name and its arguments
    pub fn new<A: Serialize + ?Sized>(operation: &str, args: &A) -> Result<Self> {
        let args = serde_json::to_string(args)?;
        Ok(Self(format!("{operation}:{args}")))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Clone)]
pub struct MemoCache {
    store: Arc<dyn CacheStore>,
    ttl: Option<Duration>,
}

impl Debug for MemoCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoCache").field("ttl", &self.ttl).finish()
    }
}

impl Default for MemoCache {
    fn default() -> Self {
        Self::in_memory(None)
    }
}

fn unix_now() -> Result<u64> {
    Ok(SystemTime::now().duration_since(UNIX_EPOCH)?.as_secs())
}

impl MemoCache {
    #[must_use]
    pub fn new(store: Arc<dyn CacheStore>, ttl: Option<Duration>) -> Self {
        Self { store, ttl }
    }

    /// Fresh in-memory cache; `None` keeps entries for the cache's lifetime
    #[must_use]
    pub fn in_memory(ttl: Option<Duration>) -> Self {
        Self::new(Arc::new(InMemoryStore::default()), ttl)
    }

    #[must_use]
    pub fn ttl(&self) -> Option<Duration> {
        self.ttl
    }

    /// Stores a serializable value under `key`.
    #[tracing::instrument(
        name = "put_cache",
        level = "debug",
        skip(self, key, value),
        fields(key = key.as_str())
    )]
    pub async fn put<T: Serialize>(&self, key: &CacheKey, value: &T) -> Result<()> {
        let expires_at = match self.ttl {
            Some(ttl) => Some(
                SystemTime::now()
                    .checked_add(ttl)
                    .ok_or(anyhow!("TTL overflow"))?
                    .duration_since(UNIX_EPOCH)?
                    .as_secs(),
            ),
            None => None,
        };
        let entry = StoredEntry {
            value: serde_json::to_value(value)?,
            expires_at,
        };
        self.store.insert(key.as_str().to_string(), entry).await;
        Ok(())
    }

    /// Retrieves a value if it exists and has not expired.
    /// Returns `None` for cache misses or expired entries.
    #[tracing::instrument(
        name = "query_cache",
        level = "debug",
        skip(self, key),
        fields(key = key.as_str())
    )]
    pub async fn get<T: DeserializeOwned>(&self, key: &CacheKey) -> Result<Option<T>> {
        let Some(entry) = self.store.get(key.as_str()).await else {
            tracing::debug!("Key not found");
            return Ok(None);
        };

        if let Some(expires_at) = entry.expires_at {
            if unix_now()? >= expires_at {
                tracing::debug!("Key found but expired");
                self.remove(key).await;
                return Ok(None);
            }
        }

        tracing::debug!("Key found and still fresh");
        Ok(Some(serde_json::from_value(entry.value)?))
    }

    /// Manually removes a key from the cache.
    pub async fn remove(&self, key: &CacheKey) {
        self.store.remove(key.as_str()).await;
    }

    pub async fn len(&self) -> usize {
        self.store.len().await
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}
