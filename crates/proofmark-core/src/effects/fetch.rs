//! Stored-object fetch effects

use crate::errors::PipelineError;
use async_trait::async_trait;

/// An object fetched into memory from the short-lived blob store.
#[derive(Debug, Clone)]
pub struct FetchedObject {
    /// Raw object bytes
    pub bytes: Vec<u8>,
    /// MIME content type reported by the store
    pub content_type: String,
}

/// Fetches the uploaded identity document into process memory.
///
/// The fetch is the pipeline's first suspension point; a failure here is
/// fatal and triggers error recovery. No retry is built in.
#[async_trait]
pub trait FetchEffects: Send + Sync {
    /// Fetch the object at `url`. Fails with a fetch error on any
    /// non-success response.
    async fn fetch_bytes(&self, url: &str) -> Result<FetchedObject, PipelineError>;
}
