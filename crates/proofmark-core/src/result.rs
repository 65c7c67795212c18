//! Terminal pipeline results
//!
//! Constructed once at the end of a successful run, written to the
//! best-effort result cache, returned to the caller, and never mutated.

use crate::identifiers::RequestRef;
use serde::{Deserialize, Serialize};

/// The three attestation identifiers, each absent when that record could
/// not be published. Immutable once set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttestationUids {
    /// Authorization record (revocable)
    pub authorization: Option<String>,
    /// Fulfillment record (non-revocable)
    pub fulfillment: Option<String>,
    /// Deletion record (non-revocable)
    pub deletion: Option<String>,
}

impl AttestationUids {
    /// How many of the three slots were actually published.
    pub fn published_count(&self) -> usize {
        [&self.authorization, &self.fulfillment, &self.deletion]
            .iter()
            .filter(|slot| slot.is_some())
            .count()
    }
}

/// Terminal success value of one pipeline run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FulfillmentResult {
    /// Request reference for correlation
    pub request_ref: RequestRef,
    /// Mail identifier of the submitted packet
    pub mail_id: String,
    /// Identifier of the mailed fee instrument
    pub check_id: String,
    /// Carrier tracking number, when the gateway provided one
    pub tracking_number: Option<String>,
    /// RFC 3339 timestamp of packet submission
    pub mailed_at: String,
    /// Self-fingerprint of the deletion receipt
    pub deletion_receipt_hash: String,
    /// Whatever subset of attestations was published
    pub attestation_uids: AttestationUids,
}

/// Entry written to the best-effort result cache so a polling client can
/// observe completion. Keyed by the originating payment-session identifier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FulfillmentCacheEntry {
    pub request_ref: RequestRef,
    pub tracking_number: Option<String>,
    pub mailed_at: String,
    pub deletion_receipt_hash: String,
    pub attestation_uids: AttestationUids,
}

impl From<&FulfillmentResult> for FulfillmentCacheEntry {
    fn from(result: &FulfillmentResult) -> Self {
        Self {
            request_ref: result.request_ref.clone(),
            tracking_number: result.tracking_number.clone(),
            mailed_at: result.mailed_at.clone(),
            deletion_receipt_hash: result.deletion_receipt_hash.clone(),
            attestation_uids: result.attestation_uids.clone(),
        }
    }
}
