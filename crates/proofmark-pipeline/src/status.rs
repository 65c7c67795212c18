//! Polling-client status lookup
//!
//! The confirmation page polls by payment session id until the dispatched
//! run publishes its result to the cache. The client only ever sees
//! `Processing` or `Complete`; internal errors are never surfaced here.

use proofmark_core::effects::cache::fulfillment_key;
use proofmark_core::effects::ResultCache;
use proofmark_core::FulfillmentCacheEntry;

/// What the polling client sees.
#[derive(Debug, Clone)]
pub enum FulfillmentStatus {
    /// No result yet: still running, failed, or the cache is absent.
    /// The client is directed to check email rather than shown an error.
    Processing,
    /// Run finished; the cached result
    Complete(FulfillmentCacheEntry),
}

/// Look up the fulfillment status for a payment session.
pub async fn lookup(cache: Option<&dyn ResultCache>, session_id: &str) -> FulfillmentStatus {
    let Some(cache) = cache else {
        return FulfillmentStatus::Processing;
    };
    match cache.get(&fulfillment_key(session_id)).await {
        Some(entry) => FulfillmentStatus::Complete(entry),
        None => FulfillmentStatus::Processing,
    }
}
