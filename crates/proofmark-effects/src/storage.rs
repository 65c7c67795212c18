//! HTTP stored-object deleter

use async_trait::async_trait;
use proofmark_core::effects::StorageEffects;

/// Deletes uploaded objects from the blob store over its HTTP API.
///
/// The trait boundary is infallible: every failure mode collapses to
/// `false`, which the deletion receipt records. The store's own retention
/// expiry is the backstop when the remote delete does not land.
#[derive(Debug, Clone)]
pub struct HttpBlobDeleter {
    client: reqwest::Client,
    api_token: String,
}

impl HttpBlobDeleter {
    /// Deleter authenticated with the store's management token.
    pub fn new(api_token: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_token: api_token.into(),
        }
    }
}

#[async_trait]
impl StorageEffects for HttpBlobDeleter {
    async fn delete_stored(&self, url: &str) -> bool {
        let result = self
            .client
            .delete(url)
            .bearer_auth(&self.api_token)
            .send()
            .await;
        match result {
            Ok(response) if response.status().is_success() => {
                tracing::info!("stored object deleted");
                true
            }
            Ok(response) => {
                tracing::error!(status = %response.status(), "stored object delete rejected");
                false
            }
            Err(err) => {
                tracing::error!(error = %err, "stored object delete request failed");
                false
            }
        }
    }
}
