//! Mock effect handlers
//!
//! Every mock records its calls into an optional shared [`CallJournal`] so
//! tests can assert cross-component ordering (most importantly that the
//! stored-object delete happens only after mailing, and never before a
//! fingerprint mismatch aborts the run).

use async_trait::async_trait;
use parking_lot::Mutex;
use proofmark_core::config::JurisdictionConfig;
use proofmark_core::effects::{
    CheckStatus, DocumentEffects, EmailEffects, FetchEffects, FetchedObject, LedgerEffects,
    MailEffects, MailedCheck, MailedLetter, PublishedRecord, ResultCache, StorageEffects,
};
use proofmark_core::{
    ApplicantRecord, FulfillmentCacheEntry, PipelineError, RequestRef,
};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Shared, ordered journal of effect calls.
#[derive(Debug, Default, Clone)]
pub struct CallJournal {
    events: Arc<Mutex<Vec<String>>>,
}

impl CallJournal {
    /// Create an empty journal.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one event.
    pub fn record(&self, event: impl Into<String>) {
        self.events.lock().push(event.into());
    }

    /// Snapshot of all events in call order.
    pub fn events(&self) -> Vec<String> {
        self.events.lock().clone()
    }

    /// Position of the first event equal to `name`, if any.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.events.lock().iter().position(|e| e == name)
    }
}

// =============================================================================
// Fetch
// =============================================================================

/// Configurable stored-object fetcher.
pub struct MockFetch {
    response: Option<FetchedObject>,
    calls: AtomicUsize,
    journal: Option<CallJournal>,
}

impl MockFetch {
    /// Always return these bytes with the given content type.
    pub fn ok(bytes: Vec<u8>, content_type: &str) -> Self {
        Self {
            response: Some(FetchedObject {
                bytes,
                content_type: content_type.to_string(),
            }),
            calls: AtomicUsize::new(0),
            journal: None,
        }
    }

    /// Always fail with a fetch error.
    pub fn failing() -> Self {
        Self {
            response: None,
            calls: AtomicUsize::new(0),
            journal: None,
        }
    }

    /// Attach a shared call journal.
    pub fn with_journal(mut self, journal: CallJournal) -> Self {
        self.journal = Some(journal);
        self
    }

    /// Number of fetch calls observed.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl FetchEffects for MockFetch {
    async fn fetch_bytes(&self, url: &str) -> Result<FetchedObject, PipelineError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(journal) = &self.journal {
            journal.record("fetch_bytes");
        }
        match &self.response {
            Some(object) => Ok(object.clone()),
            None => Err(PipelineError::fetch(format!("fetch failed for {url}"))),
        }
    }
}

// =============================================================================
// Documents
// =============================================================================

/// Deterministic document composer returning marker PDFs.
#[derive(Default)]
pub struct MockDocuments {
    fail_form: bool,
    fail_letter: bool,
    fail_merge: bool,
    journal: Option<CallJournal>,
}

impl MockDocuments {
    /// A composer where every operation succeeds.
    pub fn succeeding() -> Self {
        Self::default()
    }

    /// Fail the form fill.
    pub fn failing_form() -> Self {
        Self {
            fail_form: true,
            ..Self::default()
        }
    }

    /// Fail the packet merge.
    pub fn failing_merge() -> Self {
        Self {
            fail_merge: true,
            ..Self::default()
        }
    }

    /// Attach a shared call journal.
    pub fn with_journal(mut self, journal: CallJournal) -> Self {
        self.journal = Some(journal);
        self
    }

    fn note(&self, event: &str) {
        if let Some(journal) = &self.journal {
            journal.record(event);
        }
    }
}

#[async_trait]
impl DocumentEffects for MockDocuments {
    async fn fill_official_form(
        &self,
        _config: &JurisdictionConfig,
        _applicant: &ApplicantRecord,
        _signature_data_url: &str,
        _copies: u32,
        _today: &str,
    ) -> Result<Vec<u8>, PipelineError> {
        self.note("fill_official_form");
        if self.fail_form {
            return Err(PipelineError::document("form template failed to load"));
        }
        Ok(b"%PDF-1.4 mock filled form".to_vec())
    }

    async fn generate_consent_letter(
        &self,
        _config: &JurisdictionConfig,
        _applicant: &ApplicantRecord,
        _signature_data_url: &str,
        _request_ref: &RequestRef,
        _today: &str,
    ) -> Result<Vec<u8>, PipelineError> {
        self.note("generate_consent_letter");
        if self.fail_letter {
            return Err(PipelineError::document("letter render failed"));
        }
        Ok(b"%PDF-1.4 mock consent letter".to_vec())
    }

    async fn merge_packet(
        &self,
        form_bytes: &[u8],
        letter_bytes: &[u8],
        id_bytes: &[u8],
        _id_content_type: &str,
    ) -> Result<Vec<u8>, PipelineError> {
        self.note("merge_packet");
        if self.fail_merge {
            return Err(PipelineError::document("packet merge failed"));
        }
        let mut packet = b"%PDF-1.4 mock packet ".to_vec();
        packet.extend_from_slice(&(form_bytes.len() as u32).to_be_bytes());
        packet.extend_from_slice(&(letter_bytes.len() as u32).to_be_bytes());
        packet.extend_from_slice(&(id_bytes.len() as u32).to_be_bytes());
        Ok(packet)
    }
}

// =============================================================================
// Mail
// =============================================================================

/// Recording mail gateway.
pub struct MockMailer {
    fail_packet: bool,
    fail_check: bool,
    stub_check: bool,
    packet_calls: AtomicUsize,
    check_calls: AtomicUsize,
    journal: Option<CallJournal>,
}

impl MockMailer {
    /// Gateway where both calls succeed with fixed identifiers.
    pub fn succeeding() -> Self {
        Self {
            fail_packet: false,
            fail_check: false,
            stub_check: false,
            packet_calls: AtomicUsize::new(0),
            check_calls: AtomicUsize::new(0),
            journal: None,
        }
    }

    /// Fail the packet mailing.
    pub fn failing_packet() -> Self {
        Self {
            fail_packet: true,
            ..Self::succeeding()
        }
    }

    /// Fail the fee check mailing.
    pub fn failing_check() -> Self {
        Self {
            fail_check: true,
            ..Self::succeeding()
        }
    }

    /// Return a stubbed check, as when no funding account is configured.
    pub fn stubbing_check() -> Self {
        Self {
            stub_check: true,
            ..Self::succeeding()
        }
    }

    /// Attach a shared call journal.
    pub fn with_journal(mut self, journal: CallJournal) -> Self {
        self.journal = Some(journal);
        self
    }

    /// Number of packet mailings observed.
    pub fn packet_call_count(&self) -> usize {
        self.packet_calls.load(Ordering::SeqCst)
    }

    /// Number of fee-check mailings observed.
    pub fn check_call_count(&self) -> usize {
        self.check_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MailEffects for MockMailer {
    async fn mail_packet(
        &self,
        _packet_pdf: &[u8],
        _config: &JurisdictionConfig,
        _applicant: &ApplicantRecord,
        _request_ref: &RequestRef,
    ) -> Result<MailedLetter, PipelineError> {
        self.packet_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(journal) = &self.journal {
            journal.record("mail_packet");
        }
        if self.fail_packet {
            return Err(PipelineError::mailing("gateway rejected letter"));
        }
        Ok(MailedLetter {
            mail_id: "ltr_mock_1".to_string(),
            tracking_number: Some("9400100000000000000001".to_string()),
            expected_delivery: Some("2026-09-08".to_string()),
        })
    }

    async fn mail_fee_check(
        &self,
        _config: &JurisdictionConfig,
        _copies: u32,
        _applicant: &ApplicantRecord,
        request_ref: &RequestRef,
    ) -> Result<MailedCheck, PipelineError> {
        self.check_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(journal) = &self.journal {
            journal.record("mail_fee_check");
        }
        if self.fail_check {
            return Err(PipelineError::mailing("gateway rejected check"));
        }
        if self.stub_check {
            return Ok(MailedCheck {
                check_id: format!("STUB_{request_ref}"),
                check_number: None,
                status: CheckStatus::Stubbed,
            });
        }
        Ok(MailedCheck {
            check_id: "chk_mock_1".to_string(),
            check_number: Some(1042),
            status: CheckStatus::Created,
        })
    }
}

// =============================================================================
// Storage
// =============================================================================

/// Recording stored-object deleter.
pub struct MockStorage {
    succeed: bool,
    deletes: AtomicUsize,
    urls: Mutex<Vec<String>>,
    journal: Option<CallJournal>,
}

impl MockStorage {
    /// Deletes always succeed.
    pub fn succeeding() -> Self {
        Self {
            succeed: true,
            deletes: AtomicUsize::new(0),
            urls: Mutex::new(Vec::new()),
            journal: None,
        }
    }

    /// Deletes always report failure.
    pub fn failing() -> Self {
        Self {
            succeed: false,
            ..Self::succeeding()
        }
    }

    /// Attach a shared call journal.
    pub fn with_journal(mut self, journal: CallJournal) -> Self {
        self.journal = Some(journal);
        self
    }

    /// Number of delete calls observed.
    pub fn delete_count(&self) -> usize {
        self.deletes.load(Ordering::SeqCst)
    }

    /// URLs passed to delete, in call order.
    pub fn deleted_urls(&self) -> Vec<String> {
        self.urls.lock().clone()
    }
}

#[async_trait]
impl StorageEffects for MockStorage {
    async fn delete_stored(&self, url: &str) -> bool {
        self.deletes.fetch_add(1, Ordering::SeqCst);
        self.urls.lock().push(url.to_string());
        if let Some(journal) = &self.journal {
            journal.record("delete_stored");
        }
        self.succeed
    }
}

// =============================================================================
// Ledger
// =============================================================================

/// Per-schema publish behavior.
#[derive(Debug, Clone)]
pub enum LedgerBehavior {
    /// Confirmed with a parseable record UID
    Confirm { uid: String, tx_ref: String },
    /// Submission confirmed but no UID parseable from ledger output
    TxOnly { tx_ref: String },
    /// Publish fails outright
    Fail,
}

/// One recorded publish call.
#[derive(Debug, Clone)]
pub struct RecordedPublish {
    pub schema_id: String,
    pub payload: serde_json::Value,
    pub revocable: bool,
}

/// Recording attestation ledger with per-schema behavior.
#[derive(Default)]
pub struct MockLedger {
    behaviors: Mutex<HashMap<String, LedgerBehavior>>,
    publishes: Mutex<Vec<RecordedPublish>>,
    journal: Option<CallJournal>,
}

impl MockLedger {
    /// Every publish confirms with a UID derived from the schema id.
    pub fn confirming() -> Self {
        Self::default()
    }

    /// Override behavior for one schema.
    pub fn with_behavior(self, schema_id: &str, behavior: LedgerBehavior) -> Self {
        self.behaviors
            .lock()
            .insert(schema_id.to_string(), behavior);
        self
    }

    /// Attach a shared call journal.
    pub fn with_journal(mut self, journal: CallJournal) -> Self {
        self.journal = Some(journal);
        self
    }

    /// All publishes observed, in call order.
    pub fn publishes(&self) -> Vec<RecordedPublish> {
        self.publishes.lock().clone()
    }
}

#[async_trait]
impl LedgerEffects for MockLedger {
    async fn publish_attestation(
        &self,
        schema_id: &str,
        payload: serde_json::Value,
        revocable: bool,
    ) -> Result<PublishedRecord, PipelineError> {
        self.publishes.lock().push(RecordedPublish {
            schema_id: schema_id.to_string(),
            payload,
            revocable,
        });
        if let Some(journal) = &self.journal {
            journal.record(format!("publish:{schema_id}"));
        }
        let behavior = self
            .behaviors
            .lock()
            .get(schema_id)
            .cloned()
            .unwrap_or(LedgerBehavior::Confirm {
                uid: format!("0xuid_{schema_id}"),
                tx_ref: format!("0xtx_{schema_id}"),
            });
        match behavior {
            LedgerBehavior::Confirm { uid, tx_ref } => Ok(PublishedRecord {
                uid: Some(uid),
                tx_ref,
            }),
            LedgerBehavior::TxOnly { tx_ref } => Ok(PublishedRecord { uid: None, tx_ref }),
            LedgerBehavior::Fail => Err(PipelineError::ledger("ledger unavailable")),
        }
    }
}

// =============================================================================
// Email
// =============================================================================

/// One recorded outbound message.
#[derive(Debug, Clone)]
pub struct SentEmail {
    pub to: String,
    pub subject: String,
    pub html: String,
    pub text: String,
}

/// Recording email sender.
#[derive(Default)]
pub struct MockEmail {
    fail: bool,
    sent: Mutex<Vec<SentEmail>>,
}

impl MockEmail {
    /// Sender where every send succeeds.
    pub fn succeeding() -> Self {
        Self::default()
    }

    /// Sender where every send fails.
    pub fn failing() -> Self {
        Self {
            fail: true,
            sent: Mutex::new(Vec::new()),
        }
    }

    /// Messages sent so far.
    pub fn sent(&self) -> Vec<SentEmail> {
        self.sent.lock().clone()
    }
}

#[async_trait]
impl EmailEffects for MockEmail {
    async fn send(
        &self,
        to: &str,
        subject: &str,
        html: &str,
        text: &str,
    ) -> Result<(), PipelineError> {
        if self.fail {
            return Err(PipelineError::notification("smtp relay refused"));
        }
        self.sent.lock().push(SentEmail {
            to: to.to_string(),
            subject: subject.to_string(),
            html: html.to_string(),
            text: text.to_string(),
        });
        Ok(())
    }
}

// =============================================================================
// Result cache
// =============================================================================

/// In-memory result cache for tests. TTLs are recorded but not enforced.
#[derive(Default)]
pub struct MemoryCache {
    entries: Mutex<HashMap<String, (FulfillmentCacheEntry, Duration)>>,
}

impl MemoryCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// The TTL recorded for `key`, if present.
    pub fn ttl_of(&self, key: &str) -> Option<Duration> {
        self.entries.lock().get(key).map(|(_, ttl)| *ttl)
    }
}

#[async_trait]
impl ResultCache for MemoryCache {
    async fn put(&self, key: &str, entry: FulfillmentCacheEntry, ttl: Duration) {
        self.entries.lock().insert(key.to_string(), (entry, ttl));
    }

    async fn get(&self, key: &str) -> Option<FulfillmentCacheEntry> {
        self.entries.lock().get(key).map(|(entry, _)| entry.clone())
    }
}
