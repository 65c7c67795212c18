//! HTTP stored-object fetcher

use async_trait::async_trait;
use proofmark_core::effects::{FetchEffects, FetchedObject};
use proofmark_core::PipelineError;

const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// Fetches uploaded objects from the short-lived blob store over HTTPS.
///
/// Upload URLs are unguessable and expire on their own; no credential is
/// attached to the fetch.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    /// Fetcher over a fresh HTTP client.
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }

    /// Fetcher over a shared HTTP client.
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl FetchEffects for HttpFetcher {
    async fn fetch_bytes(&self, url: &str) -> Result<FetchedObject, PipelineError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|err| PipelineError::fetch(format!("stored object fetch failed: {err}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(PipelineError::fetch(format!(
                "stored object fetch returned {status}"
            )));
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or(DEFAULT_CONTENT_TYPE)
            .to_string();

        let bytes = response
            .bytes()
            .await
            .map_err(|err| PipelineError::fetch(format!("stored object body read failed: {err}")))?
            .to_vec();

        if bytes.is_empty() {
            return Err(PipelineError::fetch("stored object is empty"));
        }

        tracing::debug!(len = bytes.len(), %content_type, "stored object fetched");
        Ok(FetchedObject {
            bytes,
            content_type,
        })
    }
}
