//! Attestation relay client
//!
//! The service never holds chain credentials in-process. Publishes go
//! through a relay that signs with the service key, submits the record,
//! and reports back the finalized record UID when it can parse one from
//! the confirmed transaction's event data. When it cannot, the raw
//! transaction reference is still returned so the record stays linkable.

use async_trait::async_trait;
use proofmark_core::effects::{LedgerEffects, PublishedRecord};
use proofmark_core::PipelineError;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct RelayResponse {
    #[serde(default)]
    uid: Option<String>,
    tx_ref: String,
}

/// HTTP client for the attestation relay.
pub struct AttestationRelay {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl AttestationRelay {
    /// Client for the relay at `base_url`, authenticated with `api_key`.
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
            api_key: api_key.into(),
        }
    }
}

#[async_trait]
impl LedgerEffects for AttestationRelay {
    async fn publish_attestation(
        &self,
        schema_id: &str,
        payload: serde_json::Value,
        revocable: bool,
    ) -> Result<PublishedRecord, PipelineError> {
        let url = format!("{}/attestations", self.base_url.trim_end_matches('/'));
        let body = serde_json::json!({
            "schema_id": schema_id,
            "data": payload,
            "revocable": revocable,
        });
        let response = self
            .client
            .post(url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|err| PipelineError::ledger(format!("attestation relay unreachable: {err}")))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(PipelineError::ledger(format!(
                "attestation relay returned {status}: {detail}"
            )));
        }

        let confirmed: RelayResponse = response
            .json()
            .await
            .map_err(|err| PipelineError::ledger(format!("malformed relay response: {err}")))?;

        // An empty UID string means the relay could not parse one
        let uid = confirmed.uid.filter(|uid| !uid.is_empty());
        if uid.is_none() {
            tracing::warn!(schema_id, tx_ref = %confirmed.tx_ref, "record confirmed without parseable uid");
        }
        Ok(PublishedRecord {
            uid,
            tx_ref: confirmed.tx_ref,
        })
    }
}
