//! Proofmark Attest - public attestation emission
//!
//! Publishes three schema-typed records to the append-only attestation
//! ledger: authorization (revocable), fulfillment, and deletion (both
//! non-revocable). Each publish is an independent network transaction;
//! failure of one never blocks the other two, and any failed slot comes
//! back as `None` in the returned [`AttestationUids`]. Attestation is an
//! enhancement, not a correctness requirement of the underlying mailing,
//! so nothing here raises past the `emit` boundary.

#![forbid(unsafe_code)]

use proofmark_core::effects::LedgerEffects;
use proofmark_core::fingerprint::to_bytes32;
use proofmark_core::{AttestationUids, DeletionReceipt, RequestRef};
use std::sync::Arc;

/// The three ledger schema identifiers, configured per deployment.
#[derive(Debug, Clone)]
pub struct SchemaIds {
    /// Authorization record schema
    pub authorization: String,
    /// Fulfillment record schema
    pub fulfillment: String,
    /// Deletion record schema
    pub deletion: String,
}

/// Claim that the user authorized the service to file on their behalf.
#[derive(Debug, Clone)]
pub struct AuthorizationClaim {
    /// Jurisdiction code
    pub jurisdiction: String,
    /// Record type filed for, e.g. `birth_certificate`
    pub request_type: String,
    /// Hex SHA-256 of the user's signature artifact
    pub signature_digest: String,
    /// Authorization timestamp, unix seconds
    pub authorized_at: i64,
    /// Whether the agent authorization box was affirmed
    pub agent_authorized: bool,
}

/// Claim that the packet was physically mailed.
#[derive(Debug, Clone)]
pub struct FulfillmentClaim {
    pub jurisdiction: String,
    pub request_type: String,
    /// Mail identifier of the submitted packet
    pub mail_id: String,
    /// Carrier tracking number; encoded as an empty string when unavailable
    pub tracking_number: Option<String>,
    /// Name line of the receiving agency address
    pub mailed_to_name: String,
    /// Mailing timestamp, unix seconds
    pub mailed_at: i64,
    pub request_ref: RequestRef,
}

/// Publishes the three attestation records.
pub struct AttestationEmitter {
    ledger: Arc<dyn LedgerEffects>,
    schemas: Option<SchemaIds>,
}

impl AttestationEmitter {
    /// Emitter publishing under the given schema identifiers.
    pub fn new(ledger: Arc<dyn LedgerEffects>, schemas: SchemaIds) -> Self {
        Self {
            ledger,
            schemas: Some(schemas),
        }
    }

    /// Emitter for deployments without ledger configuration: every emit
    /// returns an empty set without touching the network.
    pub fn disabled(ledger: Arc<dyn LedgerEffects>) -> Self {
        Self {
            ledger,
            schemas: None,
        }
    }

    /// Publish the three records sequentially and independently. Never
    /// raises; failed slots are `None`.
    pub async fn emit(
        &self,
        authorization: AuthorizationClaim,
        fulfillment: FulfillmentClaim,
        receipt: &DeletionReceipt,
    ) -> AttestationUids {
        let Some(schemas) = &self.schemas else {
            tracing::warn!("ledger schemas not configured; skipping attestations");
            return AttestationUids::default();
        };

        let uids = AttestationUids {
            authorization: self
                .publish_slot(
                    "authorization",
                    &schemas.authorization,
                    authorization_payload(&authorization),
                    true,
                )
                .await,
            fulfillment: self
                .publish_slot(
                    "fulfillment",
                    &schemas.fulfillment,
                    fulfillment_payload(&fulfillment),
                    false,
                )
                .await,
            deletion: self
                .publish_slot("deletion", &schemas.deletion, deletion_payload(receipt), false)
                .await,
        };
        tracing::info!(
            published = uids.published_count(),
            "attestation emission finished"
        );
        uids
    }

    /// One independent publish. All failures are caught and logged here;
    /// a confirmed record without a parseable UID degrades to the raw
    /// transaction reference so it stays independently verifiable.
    async fn publish_slot(
        &self,
        slot: &str,
        schema_id: &str,
        payload: serde_json::Value,
        revocable: bool,
    ) -> Option<String> {
        match self
            .ledger
            .publish_attestation(schema_id, payload, revocable)
            .await
        {
            Ok(record) => {
                if record.uid.is_none() {
                    tracing::warn!(
                        slot,
                        tx_ref = %record.tx_ref,
                        "record UID not parseable from ledger output; using tx reference"
                    );
                }
                Some(record.identifier())
            }
            Err(err) => {
                tracing::error!(slot, error = %err, "attestation publish failed");
                None
            }
        }
    }
}

fn authorization_payload(claim: &AuthorizationClaim) -> serde_json::Value {
    serde_json::json!({
        "jurisdiction": claim.jurisdiction,
        "request_type": claim.request_type,
        "signature_hash": to_bytes32(&claim.signature_digest),
        "authorized_at": claim.authorized_at,
        "agent_authorized": claim.agent_authorized,
    })
}

fn fulfillment_payload(claim: &FulfillmentClaim) -> serde_json::Value {
    serde_json::json!({
        "jurisdiction": claim.jurisdiction,
        "request_type": claim.request_type,
        "mail_id": claim.mail_id,
        "tracking_number": claim.tracking_number.clone().unwrap_or_default(),
        "mailed_to_name": claim.mailed_to_name,
        "mailed_at": claim.mailed_at,
        "request_ref": claim.request_ref,
    })
}

fn deletion_payload(receipt: &DeletionReceipt) -> serde_json::Value {
    let file_hashes: Vec<String> = receipt
        .file_hashes
        .iter()
        .map(|digest| to_bytes32(&digest.sha256))
        .collect();
    serde_json::json!({
        "file_hashes": file_hashes,
        "deleted_at": receipt.deleted_at,
        "deletion_method": receipt.deletion_method,
        "all_files_deleted": receipt.all_files_deleted,
        "receipt_hash": to_bytes32(&receipt.receipt_hash),
        "request_ref": receipt.request_ref,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proofmark_core::ArtifactDigest;
    use proofmark_testkit::builders::sample_request_ref;
    use proofmark_testkit::mocks::{LedgerBehavior, MockLedger};

    fn schemas() -> SchemaIds {
        SchemaIds {
            authorization: "schema_auth".to_string(),
            fulfillment: "schema_fulfill".to_string(),
            deletion: "schema_delete".to_string(),
        }
    }

    fn claims() -> (AuthorizationClaim, FulfillmentClaim, DeletionReceipt) {
        let request_ref = sample_request_ref();
        let authorization = AuthorizationClaim {
            jurisdiction: "CO".into(),
            request_type: "birth_certificate".into(),
            signature_digest: "ab".repeat(32),
            authorized_at: 1_770_000_000,
            agent_authorized: true,
        };
        let fulfillment = FulfillmentClaim {
            jurisdiction: "CO".into(),
            request_type: "birth_certificate".into(),
            mail_id: "ltr_1".into(),
            tracking_number: None,
            mailed_to_name: "Vital Records Section".into(),
            mailed_at: 1_770_000_100,
            request_ref: request_ref.clone(),
        };
        let receipt = DeletionReceipt::finalize(
            request_ref,
            vec![ArtifactDigest {
                label: "photo_id".into(),
                sha256: "cd".repeat(32),
            }],
            1_770_000_200_000,
            "ltr_1".into(),
            "chk_1".into(),
            true,
        );
        (authorization, fulfillment, receipt)
    }

    #[tokio::test]
    async fn all_three_slots_published() {
        let ledger = Arc::new(MockLedger::confirming());
        let emitter = AttestationEmitter::new(ledger.clone(), schemas());
        let (auth, fulfill, receipt) = claims();

        let uids = emitter.emit(auth, fulfill, &receipt).await;
        assert_eq!(uids.published_count(), 3);

        let publishes = ledger.publishes();
        assert_eq!(publishes.len(), 3);
        assert!(publishes[0].revocable, "authorization is revocable");
        assert!(!publishes[1].revocable, "fulfillment is non-revocable");
        assert!(!publishes[2].revocable, "deletion is non-revocable");
    }

    #[tokio::test]
    async fn single_slot_failure_leaves_exactly_that_slot_null() {
        let ledger = Arc::new(
            MockLedger::confirming().with_behavior("schema_fulfill", LedgerBehavior::Fail),
        );
        let emitter = AttestationEmitter::new(ledger.clone(), schemas());
        let (auth, fulfill, receipt) = claims();

        let uids = emitter.emit(auth, fulfill, &receipt).await;
        assert!(uids.authorization.is_some());
        assert!(uids.fulfillment.is_none());
        assert!(uids.deletion.is_some());
        // The failing middle slot did not block the third publish
        assert_eq!(ledger.publishes().len(), 3);
    }

    #[tokio::test]
    async fn unparseable_uid_falls_back_to_tx_reference() {
        let ledger = Arc::new(MockLedger::confirming().with_behavior(
            "schema_delete",
            LedgerBehavior::TxOnly {
                tx_ref: "0xtxfallback".into(),
            },
        ));
        let emitter = AttestationEmitter::new(ledger, schemas());
        let (auth, fulfill, receipt) = claims();

        let uids = emitter.emit(auth, fulfill, &receipt).await;
        assert_eq!(uids.deletion.as_deref(), Some("0xtxfallback"));
    }

    #[tokio::test]
    async fn deletion_payload_carries_truthful_degradation_flag() {
        let ledger = Arc::new(MockLedger::confirming());
        let emitter = AttestationEmitter::new(ledger.clone(), schemas());
        let (auth, fulfill, mut receipt) = claims();
        receipt = DeletionReceipt::finalize(
            receipt.request_ref.clone(),
            receipt.file_hashes.clone(),
            receipt.deleted_at,
            receipt.mail_id.clone(),
            receipt.check_id.clone(),
            false,
        );

        emitter.emit(auth, fulfill, &receipt).await;
        let publishes = ledger.publishes();
        let deletion = &publishes[2].payload;
        assert_eq!(deletion["all_files_deleted"], serde_json::json!(false));
        assert_eq!(
            deletion["receipt_hash"],
            serde_json::json!(to_bytes32(&receipt.receipt_hash))
        );
        assert!(deletion["file_hashes"][0]
            .as_str()
            .unwrap()
            .starts_with("0x"));
    }

    #[tokio::test]
    async fn disabled_emitter_skips_network_entirely() {
        let ledger = Arc::new(MockLedger::confirming());
        let emitter = AttestationEmitter::disabled(ledger.clone());
        let (auth, fulfill, receipt) = claims();

        let uids = emitter.emit(auth, fulfill, &receipt).await;
        assert_eq!(uids.published_count(), 0);
        assert!(ledger.publishes().is_empty());
    }

    #[tokio::test]
    async fn missing_tracking_number_encodes_as_empty_string() {
        let ledger = Arc::new(MockLedger::confirming());
        let emitter = AttestationEmitter::new(ledger.clone(), schemas());
        let (auth, fulfill, receipt) = claims();

        emitter.emit(auth, fulfill, &receipt).await;
        let publishes = ledger.publishes();
        assert_eq!(
            publishes[1].payload["tracking_number"],
            serde_json::json!("")
        );
    }
}
