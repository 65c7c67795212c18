//! The verifiable deletion receipt
//!
//! Produced exactly once per run by the deletion engine. The receipt records
//! what was hashed and destroyed, then fingerprints itself so any third
//! party can check it has not been altered after the fact.
//!
//! # Canonicalization
//!
//! The self-fingerprint (`receipt_hash`) is the SHA-256 of the compact JSON
//! serialization of every other field, in declaration order. Reproduce it
//! with [`DeletionReceipt::recompute_hash`].

use crate::fingerprint::sha256_hex;
use crate::identifiers::RequestRef;
use serde::{Deserialize, Serialize};

/// Deletion-method tag recorded in every receipt.
pub const DELETION_METHOD: &str = "blob_delete_plus_buffer_zeroize";

/// Label and fingerprint of one destroyed artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactDigest {
    /// Artifact label, e.g. `photo_id`
    pub label: String,
    /// Lowercase hex SHA-256 of the artifact contents
    pub sha256: String,
}

/// Self-fingerprinted proof of destruction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeletionReceipt {
    /// Request reference this receipt belongs to
    pub request_ref: RequestRef,
    /// Per-artifact fingerprints, computed before any deletion began
    pub file_hashes: Vec<ArtifactDigest>,
    /// Deletion timestamp, unix milliseconds
    pub deleted_at: i64,
    /// Mail identifier of the submitted packet
    pub mail_id: String,
    /// Identifier of the mailed fee instrument
    pub check_id: String,
    /// How destruction was performed
    pub deletion_method: String,
    /// Whether the remote stored object was actually removed
    pub all_files_deleted: bool,
    /// SHA-256 of the canonical serialization of all other fields
    pub receipt_hash: String,
}

/// All receipt fields except the self-fingerprint, in canonical order.
#[derive(Serialize)]
struct ReceiptBody<'a> {
    request_ref: &'a RequestRef,
    file_hashes: &'a [ArtifactDigest],
    deleted_at: i64,
    mail_id: &'a str,
    check_id: &'a str,
    deletion_method: &'a str,
    all_files_deleted: bool,
}

impl DeletionReceipt {
    /// Assemble a receipt and compute its self-fingerprint. All other
    /// fields are fixed before this is called and never mutated after.
    pub fn finalize(
        request_ref: RequestRef,
        file_hashes: Vec<ArtifactDigest>,
        deleted_at: i64,
        mail_id: String,
        check_id: String,
        all_files_deleted: bool,
    ) -> Self {
        let mut receipt = Self {
            request_ref,
            file_hashes,
            deleted_at,
            mail_id,
            check_id,
            deletion_method: DELETION_METHOD.to_string(),
            all_files_deleted,
            receipt_hash: String::new(),
        };
        receipt.receipt_hash = receipt.recompute_hash();
        receipt
    }

    /// Recompute the self-fingerprint from the visible fields. Equal to
    /// `receipt_hash` for any untampered receipt.
    pub fn recompute_hash(&self) -> String {
        let body = ReceiptBody {
            request_ref: &self.request_ref,
            file_hashes: &self.file_hashes,
            deleted_at: self.deleted_at,
            mail_id: &self.mail_id,
            check_id: &self.check_id,
            deletion_method: &self.deletion_method,
            all_files_deleted: self.all_files_deleted,
        };
        // Struct serialization is deterministic: compact JSON, declaration order
        match serde_json::to_vec(&body) {
            Ok(bytes) => sha256_hex(&bytes),
            Err(_) => sha256_hex(&[]),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn receipt() -> DeletionReceipt {
        DeletionReceipt::finalize(
            serde_json::from_str("\"PRF-2026-K7QT\"").unwrap(),
            vec![
                ArtifactDigest {
                    label: "photo_id".into(),
                    sha256: "aa".repeat(32),
                },
                ArtifactDigest {
                    label: "filled_form".into(),
                    sha256: "bb".repeat(32),
                },
            ],
            1_770_000_000_000,
            "ltr_123".into(),
            "chk_456".into(),
            true,
        )
    }

    #[test]
    fn self_fingerprint_is_reproducible() {
        let receipt = receipt();
        assert_eq!(receipt.receipt_hash.len(), 64);
        assert_eq!(receipt.recompute_hash(), receipt.receipt_hash);
    }

    #[test]
    fn tampered_field_breaks_self_fingerprint() {
        let mut tampered = receipt();
        tampered.all_files_deleted = false;
        assert_ne!(tampered.recompute_hash(), tampered.receipt_hash);
    }

    #[test]
    fn round_trips_through_json() {
        let original = receipt();
        let json = serde_json::to_string(&original).unwrap();
        let restored: DeletionReceipt = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.recompute_hash(), original.receipt_hash);
    }
}
