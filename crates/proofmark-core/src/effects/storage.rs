//! Stored-object deletion effects

use async_trait::async_trait;

/// Deletes the one persistent copy of the uploaded identity document.
///
/// The success flag is recorded in the deletion receipt; implementations
/// never raise past this boundary. A `false` return leaves the object to
/// the store's own retention expiry, which the pipeline cannot assume.
#[async_trait]
pub trait StorageEffects: Send + Sync {
    /// Delete the stored object at `url`. Returns whether the remote copy
    /// was actually removed.
    async fn delete_stored(&self, url: &str) -> bool;
}
