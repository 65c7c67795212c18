//! Append-only attestation ledger effects

use crate::errors::PipelineError;
use async_trait::async_trait;

/// A record confirmed by the ledger.
///
/// Submission only confirms that a transaction was accepted, not the
/// record's finalized identity. When the record identifier cannot be parsed
/// from confirmed ledger output, `uid` is absent and `tx_ref` remains the
/// independently verifiable fallback.
#[derive(Debug, Clone)]
pub struct PublishedRecord {
    /// Finalized record identifier, when extracted from ledger event data
    pub uid: Option<String>,
    /// Raw transaction reference of the submission
    pub tx_ref: String,
}

impl PublishedRecord {
    /// The best available identifier: the finalized UID, or the raw
    /// transaction reference so the record stays linkable.
    pub fn identifier(self) -> String {
        self.uid.unwrap_or(self.tx_ref)
    }
}

/// Publishes schema-typed records to the public attestation ledger,
/// signed by a service-held key.
#[async_trait]
pub trait LedgerEffects: Send + Sync {
    /// Publish one record under `schema_id`. Each call is an independent
    /// network transaction.
    async fn publish_attestation(
        &self,
        schema_id: &str,
        payload: serde_json::Value,
        revocable: bool,
    ) -> Result<PublishedRecord, PipelineError>;
}
