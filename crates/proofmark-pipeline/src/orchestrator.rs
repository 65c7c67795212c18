//! The orchestrator state machine
//!
//! Strictly sequential: each step's output is the next step's input, carried
//! in immutable bindings rather than ambient mutable state. The only
//! branches are the terminal fan-out (attestation, notification, cache
//! write, all best-effort) and error recovery.
//!
//! ```text
//! Start -> ConfigLoaded -> FileFetched -> Verified -> FormFilled
//!       -> LetterGenerated -> PacketBuilt -> Mailed -> FeePaid
//!       -> Deleted -> Attested -> Notified -> Done
//! ```
//!
//! `ErrorRecovery` is reachable from any state after `FileFetched`: it
//! zeroizes whatever buffers exist, attempts the stored-object delete if
//! the deletion engine has not already done so, logs with the request
//! reference, and re-propagates the original error. It guarantees cleanup;
//! it does not suppress the failure.

use crate::notify;
use proofmark_attest::{AttestationEmitter, AuthorizationClaim, FulfillmentClaim, SchemaIds};
use proofmark_core::buffer::{LABEL_CONSENT_LETTER, LABEL_FILLED_FORM, LABEL_PHOTO_ID};
use proofmark_core::config::{self, JurisdictionConfig};
use proofmark_core::effects::{
    cache::fulfillment_key, DocumentEffects, EmailEffects, FetchEffects, LedgerEffects,
    MailEffects, MailedCheck, MailedLetter, ResultCache, StorageEffects,
};
use proofmark_core::fingerprint::sha256_hex;
use proofmark_core::{
    DeletionReceipt, FulfillmentCacheEntry, FulfillmentRequest, FulfillmentResult, PipelineError,
    RequestRef, TransientBuffer,
};
use proofmark_deletion::engine::{CorrelationIds, DeletionEngine};
use proofmark_deletion::verifier;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// How long completed results stay visible to the polling client.
const RESULT_CACHE_TTL: Duration = Duration::from_secs(7 * 24 * 60 * 60);

/// Every external collaborator the pipeline touches.
#[derive(Clone)]
pub struct PipelineEffects {
    pub fetch: Arc<dyn FetchEffects>,
    pub documents: Arc<dyn DocumentEffects>,
    pub mail: Arc<dyn MailEffects>,
    pub storage: Arc<dyn StorageEffects>,
    pub ledger: Arc<dyn LedgerEffects>,
    pub email: Arc<dyn EmailEffects>,
    /// Best-effort result cache; the pipeline works without one
    pub cache: Option<Arc<dyn ResultCache>>,
}

/// States of one fulfillment run, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    Start,
    ConfigLoaded,
    FileFetched,
    Verified,
    FormFilled,
    LetterGenerated,
    PacketBuilt,
    Mailed,
    FeePaid,
    Deleted,
    Attested,
    Notified,
    Done,
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Step::Start => "start",
            Step::ConfigLoaded => "config_loaded",
            Step::FileFetched => "file_fetched",
            Step::Verified => "verified",
            Step::FormFilled => "form_filled",
            Step::LetterGenerated => "letter_generated",
            Step::PacketBuilt => "packet_built",
            Step::Mailed => "mailed",
            Step::FeePaid => "fee_paid",
            Step::Deleted => "deleted",
            Step::Attested => "attested",
            Step::Notified => "notified",
            Step::Done => "done",
        };
        f.write_str(name)
    }
}

/// Transient resources that error recovery must clean up.
struct RecoveryState {
    stored_object_url: String,
    buffers: Vec<TransientBuffer>,
    /// Set once the deletion engine has attempted the stored-object delete,
    /// so recovery does not issue a second delete call
    delete_attempted: bool,
}

impl RecoveryState {
    fn new(stored_object_url: &str) -> Self {
        Self {
            stored_object_url: stored_object_url.to_string(),
            buffers: Vec::with_capacity(3),
            delete_attempted: false,
        }
    }
}

/// The post-payment fulfillment pipeline.
pub struct FulfillmentPipeline {
    effects: PipelineEffects,
    emitter: AttestationEmitter,
    engine: DeletionEngine,
}

impl FulfillmentPipeline {
    /// Build a pipeline over the given effects. Without schema ids the
    /// attestation step is skipped and every run yields an empty UID set.
    pub fn new(effects: PipelineEffects, schemas: Option<SchemaIds>) -> Self {
        let emitter = match schemas {
            Some(schemas) => AttestationEmitter::new(effects.ledger.clone(), schemas),
            None => AttestationEmitter::disabled(effects.ledger.clone()),
        };
        let engine = DeletionEngine::new(effects.storage.clone());
        Self {
            effects,
            emitter,
            engine,
        }
    }

    /// Run one fulfillment end to end.
    ///
    /// Fatal errors abort the run, trigger best-effort cleanup, and
    /// propagate to the caller. Attestation and notification failures
    /// degrade into the result instead of failing it.
    pub async fn process(
        &self,
        request: FulfillmentRequest,
    ) -> Result<FulfillmentResult, PipelineError> {
        // Fail fast before any I/O: no transient resources exist yet, so
        // these errors never run recovery
        request.validate()?;
        let config = config::jurisdiction(&request.jurisdiction)?;

        let request_ref = RequestRef::generate();
        tracing::info!(request_ref = %request_ref, session = %request.session_id, "fulfillment started");

        let mut recovery = RecoveryState::new(&request.stored_object_url);
        match self.run(&request, config, &request_ref, &mut recovery).await {
            Ok(result) => Ok(result),
            Err(err) => {
                self.recover(&mut recovery, &request_ref, &err).await;
                Err(err)
            }
        }
    }

    async fn run(
        &self,
        request: &FulfillmentRequest,
        config: &JurisdictionConfig,
        request_ref: &RequestRef,
        recovery: &mut RecoveryState,
    ) -> Result<FulfillmentResult, PipelineError> {
        self.enter(request_ref, Step::Start);
        self.enter(request_ref, Step::ConfigLoaded);

        // Fetch the identity document into memory; from here on recovery
        // owns every plaintext byte
        let fetched = self
            .effects
            .fetch
            .fetch_bytes(&request.stored_object_url)
            .await?;
        let id_content_type = fetched.content_type;
        recovery
            .buffers
            .push(TransientBuffer::new(LABEL_PHOTO_ID, fetched.bytes));
        self.enter(request_ref, Step::FileFetched);

        // Tamper check against the fingerprint committed at upload time,
        // before the bytes are used for anything
        if !verifier::verify(
            recovery.buffers[0].as_slice(),
            &request.committed_fingerprint,
        ) {
            return Err(PipelineError::integrity(
                "uploaded file does not match committed fingerprint",
            ));
        }
        self.enter(request_ref, Step::Verified);

        let now = chrono::Utc::now();
        let form_date = now.format("%m/%d/%Y").to_string();
        let letter_date = now.format("%B %-d, %Y").to_string();

        let form_bytes = self
            .effects
            .documents
            .fill_official_form(
                config,
                &request.applicant,
                &request.signature_data_url,
                request.copies,
                &form_date,
            )
            .await?;
        recovery
            .buffers
            .push(TransientBuffer::new(LABEL_FILLED_FORM, form_bytes));
        self.enter(request_ref, Step::FormFilled);

        let letter_bytes = self
            .effects
            .documents
            .generate_consent_letter(
                config,
                &request.applicant,
                &request.signature_data_url,
                request_ref,
                &letter_date,
            )
            .await?;
        recovery
            .buffers
            .push(TransientBuffer::new(LABEL_CONSENT_LETTER, letter_bytes));
        self.enter(request_ref, Step::LetterGenerated);

        let packet = self
            .effects
            .documents
            .merge_packet(
                recovery.buffers[1].as_slice(),
                recovery.buffers[2].as_slice(),
                recovery.buffers[0].as_slice(),
                &id_content_type,
            )
            .await?;
        self.enter(request_ref, Step::PacketBuilt);

        let letter = self
            .effects
            .mail
            .mail_packet(&packet, config, &request.applicant, request_ref)
            .await?;
        let mailed_at = chrono::Utc::now();
        self.enter(request_ref, Step::Mailed);

        let check = self
            .effects
            .mail
            .mail_fee_check(config, request.copies, &request.applicant, request_ref)
            .await?;
        self.enter(request_ref, Step::FeePaid);

        // The signature digest outlives the signature artifact; compute it
        // before destruction
        let signature_digest = sha256_hex(request.signature_data_url.as_bytes());

        let receipt = self
            .engine
            .run(
                &request.stored_object_url,
                &mut recovery.buffers,
                CorrelationIds {
                    request_ref: request_ref.clone(),
                    mail_id: letter.mail_id.clone(),
                    check_id: check.check_id.clone(),
                },
            )
            .await?;
        recovery.delete_attempted = true;
        self.enter(request_ref, Step::Deleted);

        let uids = self
            .emitter
            .emit(
                AuthorizationClaim {
                    jurisdiction: config.code.clone(),
                    request_type: config.request_type.clone(),
                    signature_digest,
                    authorized_at: now.timestamp(),
                    agent_authorized: true,
                },
                FulfillmentClaim {
                    jurisdiction: config.code.clone(),
                    request_type: config.request_type.clone(),
                    mail_id: letter.mail_id.clone(),
                    tracking_number: letter.tracking_number.clone(),
                    mailed_to_name: config.agency.mailing_address.name.clone(),
                    mailed_at: mailed_at.timestamp(),
                    request_ref: request_ref.clone(),
                },
                &receipt,
            )
            .await;
        self.enter(request_ref, Step::Attested);

        self.notify(request, config, request_ref, &letter, &receipt, &uids)
            .await;
        self.enter(request_ref, Step::Notified);

        let result = assemble_result(request_ref, &letter, &check, mailed_at, &receipt, uids);
        self.cache_result(&request.session_id, &result).await;
        self.enter(request_ref, Step::Done);
        tracing::info!(request_ref = %request_ref, "fulfillment complete: mailed, deleted, attested");
        Ok(result)
    }

    /// Send the confirmation email. The only step whose failure is
    /// swallowed: every privacy- and money-critical step has already
    /// succeeded by this point.
    async fn notify(
        &self,
        request: &FulfillmentRequest,
        config: &JurisdictionConfig,
        request_ref: &RequestRef,
        letter: &MailedLetter,
        receipt: &DeletionReceipt,
        uids: &proofmark_core::AttestationUids,
    ) {
        let message = notify::confirmation_email(
            &request.applicant,
            config,
            request_ref,
            letter,
            receipt,
            uids,
        );
        if let Err(err) = self
            .effects
            .email
            .send(
                &request.applicant.email,
                &message.subject,
                &message.html,
                &message.text,
            )
            .await
        {
            tracing::warn!(request_ref = %request_ref, error = %err, "confirmation email failed");
        }
    }

    /// Best-effort cache write so the polling client can observe
    /// completion. Absence of a cache is not an error.
    async fn cache_result(&self, session_id: &str, result: &FulfillmentResult) {
        if let Some(cache) = &self.effects.cache {
            cache
                .put(
                    &fulfillment_key(session_id),
                    FulfillmentCacheEntry::from(result),
                    RESULT_CACHE_TTL,
                )
                .await;
        }
    }

    /// Best-effort cleanup on the fatal path: zeroize fetched buffers and
    /// delete the stored object if the deletion engine never ran. The
    /// original error propagates unchanged.
    async fn recover(
        &self,
        recovery: &mut RecoveryState,
        request_ref: &RequestRef,
        err: &PipelineError,
    ) {
        if !err.triggers_recovery() {
            return;
        }
        for buffer in recovery.buffers.iter_mut() {
            buffer.wipe();
        }
        if !recovery.delete_attempted {
            let deleted = self
                .effects
                .storage
                .delete_stored(&recovery.stored_object_url)
                .await;
            if deleted {
                tracing::info!(request_ref = %request_ref, "stored object deleted during error recovery");
            } else {
                tracing::error!(request_ref = %request_ref, "stored object delete failed during error recovery");
            }
        }
        tracing::error!(request_ref = %request_ref, error = %err, "fulfillment aborted");
    }

    fn enter(&self, request_ref: &RequestRef, step: Step) {
        tracing::debug!(request_ref = %request_ref, state = %step, "pipeline transition");
    }
}

fn assemble_result(
    request_ref: &RequestRef,
    letter: &MailedLetter,
    check: &MailedCheck,
    mailed_at: chrono::DateTime<chrono::Utc>,
    receipt: &DeletionReceipt,
    uids: proofmark_core::AttestationUids,
) -> FulfillmentResult {
    FulfillmentResult {
        request_ref: request_ref.clone(),
        mail_id: letter.mail_id.clone(),
        check_id: check.check_id.clone(),
        tracking_number: letter.tracking_number.clone(),
        mailed_at: mailed_at.to_rfc3339(),
        deletion_receipt_hash: receipt.receipt_hash.clone(),
        attestation_uids: uids,
    }
}
