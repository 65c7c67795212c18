//! The deletion engine
//!
//! Given the transient artifact buffers and the one persistent storage
//! reference, the engine hashes everything, deletes the stored object,
//! scrubs the buffers, and emits a self-fingerprinted receipt. Order is the
//! load-bearing invariant: hashing MUST complete for every buffer before
//! any destruction begins, so a receipt can always be produced even when
//! deletion later fails.

use proofmark_core::effects::StorageEffects;
use proofmark_core::fingerprint::sha256_hex;
use proofmark_core::{ArtifactDigest, DeletionReceipt, PipelineError, RequestRef, TransientBuffer};
use std::sync::Arc;

/// Correlation identifiers recorded in the receipt.
#[derive(Debug, Clone)]
pub struct CorrelationIds {
    /// Request reference of the run
    pub request_ref: RequestRef,
    /// Mail identifier of the submitted packet
    pub mail_id: String,
    /// Identifier of the mailed fee instrument
    pub check_id: String,
}

/// Destroys transient artifacts and produces the deletion receipt.
pub struct DeletionEngine {
    storage: Arc<dyn StorageEffects>,
}

impl DeletionEngine {
    /// Create an engine over the given storage handler.
    pub fn new(storage: Arc<dyn StorageEffects>) -> Self {
        Self { storage }
    }

    /// Run the deletion pipeline, in strict order:
    ///
    /// 1. Fingerprint every buffer. Completes for all buffers before any
    ///    deletion begins.
    /// 2. Delete the stored object. Failure is recorded in the receipt as
    ///    `all_files_deleted = false`, never raised.
    /// 3. Overwrite every buffer with zero bytes, in place.
    /// 4. Assemble the receipt and compute its self-fingerprint.
    ///
    /// The only fatal failure is an inability to fingerprint in step 1,
    /// which means the input was already corrupted or empty.
    pub async fn run(
        &self,
        stored_object_url: &str,
        buffers: &mut [TransientBuffer],
        correlation: CorrelationIds,
    ) -> Result<DeletionReceipt, PipelineError> {
        // Step 1: fingerprint everything before anything is destroyed
        let file_hashes = fingerprint_all(buffers)?;

        // Step 2: the stored object is the only durable copy outside
        // process memory
        let remote_deleted = self.storage.delete_stored(stored_object_url).await;
        if remote_deleted {
            tracing::info!(request_ref = %correlation.request_ref, "stored object deleted");
        } else {
            tracing::warn!(
                request_ref = %correlation.request_ref,
                url = %stored_object_url,
                "stored object delete failed; flagged in receipt, object left to store expiry"
            );
        }

        // Step 3: scrub process memory
        for buffer in buffers.iter_mut() {
            buffer.wipe();
        }

        // Step 4: receipt, self-fingerprinted last
        let receipt = DeletionReceipt::finalize(
            correlation.request_ref,
            file_hashes,
            chrono::Utc::now().timestamp_millis(),
            correlation.mail_id,
            correlation.check_id,
            remote_deleted,
        );
        tracing::info!(
            request_ref = %receipt.request_ref,
            receipt_hash = %receipt.receipt_hash,
            all_files_deleted = receipt.all_files_deleted,
            "deletion receipt issued"
        );
        Ok(receipt)
    }
}

fn fingerprint_all(buffers: &[TransientBuffer]) -> Result<Vec<ArtifactDigest>, PipelineError> {
    if buffers.is_empty() {
        return Err(PipelineError::internal(
            "deletion engine invoked with no buffers",
        ));
    }
    buffers
        .iter()
        .map(|buffer| {
            if buffer.is_empty() {
                return Err(PipelineError::internal(format!(
                    "buffer \"{}\" is empty; refusing to fingerprint",
                    buffer.label()
                )));
            }
            Ok(ArtifactDigest {
                label: buffer.label().to_string(),
                sha256: sha256_hex(buffer.as_slice()),
            })
        })
        .collect()
}
