//! Best-effort result cache effects

use crate::result::FulfillmentCacheEntry;
use async_trait::async_trait;
use std::time::Duration;

/// Short-lived key/value side channel letting a polling client observe
/// fulfillment completion. Not authoritative and may be absent entirely;
/// both operations are best-effort and infallible at this boundary.
#[async_trait]
pub trait ResultCache: Send + Sync {
    /// Store an entry under `key` with a fixed expiry.
    async fn put(&self, key: &str, entry: FulfillmentCacheEntry, ttl: Duration);

    /// Look up an entry; `None` when missing, expired, or unavailable.
    async fn get(&self, key: &str) -> Option<FulfillmentCacheEntry>;
}

/// Cache key for a fulfillment result, namespaced by payment session.
pub fn fulfillment_key(session_id: &str) -> String {
    format!("fulfillment:{session_id}")
}
