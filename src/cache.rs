//! Key/value fast-path cache.
//!
//! Non-authoritative mirror of small store-owned values (today's card). The
//! store remains the durable owner; losing the cache only costs a round
//! trip, so the interface is infallible and misses are `None`.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

#[async_trait]
pub trait LocalCache: Send + Sync {
    async fn get(&self, key: &str) -> Option<String>;
    async fn set(&self, key: &str, value: String);
    async fn remove(&self, key: &str);
}

/// In-process cache backend.
#[derive(Default)]
pub struct MemoryCache {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LocalCache for MemoryCache {
    async fn get(&self, key: &str) -> Option<String> {
        self.entries.lock().await.get(key).cloned()
    }

    async fn set(&self, key: &str, value: String) {
        self.entries.lock().await.insert(key.to_string(), value);
    }

    async fn remove(&self, key: &str) {
        self.entries.lock().await.remove(key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn set_get_remove_roundtrip() {
        let cache = MemoryCache::new();
        assert_eq!(cache.get("k").await, None);

        cache.set("k", "v1".into()).await;
        assert_eq!(cache.get("k").await, Some("v1".into()));

        cache.set("k", "v2".into()).await;
        assert_eq!(cache.get("k").await, Some("v2".into()));

        cache.remove("k").await;
        assert_eq!(cache.get("k").await, None);
    }
}
