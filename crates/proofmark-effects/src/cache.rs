//! In-process TTL result cache

use async_trait::async_trait;
use parking_lot::RwLock;
use proofmark_core::effects::ResultCache;
use proofmark_core::FulfillmentCacheEntry;
use std::collections::HashMap;
use std::time::{Duration, Instant};

/// In-memory result cache with per-entry expiry.
///
/// Suits a single-process deployment; lose-on-restart is acceptable
/// because the cache is a convenience for the polling client, never the
/// system of record. Expired entries are dropped lazily on access.
#[derive(Default)]
pub struct InMemoryResultCache {
    entries: RwLock<HashMap<String, (FulfillmentCacheEntry, Instant)>>,
}

impl InMemoryResultCache {
    /// An empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop every expired entry. Called opportunistically on writes so a
    /// long-lived process does not accumulate dead sessions.
    fn sweep(&self) {
        let now = Instant::now();
        self.entries.write().retain(|_, (_, deadline)| *deadline > now);
    }
}

#[async_trait]
impl ResultCache for InMemoryResultCache {
    async fn put(&self, key: &str, entry: FulfillmentCacheEntry, ttl: Duration) {
        self.sweep();
        let deadline = Instant::now() + ttl;
        self.entries
            .write()
            .insert(key.to_string(), (entry, deadline));
    }

    async fn get(&self, key: &str) -> Option<FulfillmentCacheEntry> {
        let expired = {
            let entries = self.entries.read();
            match entries.get(key) {
                Some((entry, deadline)) if *deadline > Instant::now() => {
                    return Some(entry.clone())
                }
                Some(_) => true,
                None => false,
            }
        };
        if expired {
            self.entries.write().remove(key);
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proofmark_core::effects::cache::fulfillment_key;
    use proofmark_core::{AttestationUids, RequestRef};

    fn entry() -> FulfillmentCacheEntry {
        FulfillmentCacheEntry {
            request_ref: RequestRef::generate(),
            tracking_number: Some("9400100000000000000001".to_string()),
            mailed_at: "2026-08-31T12:00:00+00:00".to_string(),
            deletion_receipt_hash: "ab".repeat(32),
            attestation_uids: AttestationUids::default(),
        }
    }

    #[tokio::test]
    async fn live_entries_round_trip() {
        let cache = InMemoryResultCache::new();
        let key = fulfillment_key("cs_1");
        cache.put(&key, entry(), Duration::from_secs(60)).await;
        let cached = cache.get(&key).await.unwrap();
        assert_eq!(cached.deletion_receipt_hash, "ab".repeat(32));
        assert!(cache.get(&fulfillment_key("cs_other")).await.is_none());
    }

    #[tokio::test]
    async fn expired_entries_are_dropped_on_access() {
        let cache = InMemoryResultCache::new();
        let key = fulfillment_key("cs_2");
        cache.put(&key, entry(), Duration::ZERO).await;
        assert!(cache.get(&key).await.is_none());
        assert!(cache.entries.read().is_empty());
    }

    #[tokio::test]
    async fn writes_sweep_dead_sessions() {
        let cache = InMemoryResultCache::new();
        cache
            .put(&fulfillment_key("cs_dead"), entry(), Duration::ZERO)
            .await;
        cache
            .put(&fulfillment_key("cs_live"), entry(), Duration::from_secs(60))
            .await;
        assert_eq!(cache.entries.read().len(), 1);
    }
}
