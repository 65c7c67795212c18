//! Shared harness for pipeline integration tests

use proofmark_attest::SchemaIds;
use proofmark_pipeline::{FulfillmentPipeline, PipelineEffects};
use proofmark_testkit::builders::{sample_jpeg, sample_request};
use proofmark_testkit::mocks::{
    MemoryCache, MockDocuments, MockEmail, MockFetch, MockLedger, MockMailer, MockStorage,
};
use proofmark_testkit::CallJournal;
use proofmark_core::FulfillmentRequest;
use std::sync::Arc;

/// Pipeline wired to recording mocks, with handles kept for assertions.
pub struct Harness {
    pub fetch: Arc<MockFetch>,
    pub documents: Arc<MockDocuments>,
    pub mail: Arc<MockMailer>,
    pub storage: Arc<MockStorage>,
    pub ledger: Arc<MockLedger>,
    pub email: Arc<MockEmail>,
    pub cache: Arc<MemoryCache>,
    pub journal: CallJournal,
    pub pipeline: Arc<FulfillmentPipeline>,
}

pub fn schemas() -> SchemaIds {
    SchemaIds {
        authorization: "schema_auth".to_string(),
        fulfillment: "schema_fulfill".to_string(),
        deletion: "schema_delete".to_string(),
    }
}

impl Harness {
    /// Harness around the given mocks; remaining collaborators succeed.
    pub fn build(
        fetch: MockFetch,
        documents: MockDocuments,
        mail: MockMailer,
        storage: MockStorage,
        ledger: MockLedger,
        email: MockEmail,
    ) -> Self {
        let journal = CallJournal::new();
        let fetch = Arc::new(fetch.with_journal(journal.clone()));
        let documents = Arc::new(documents.with_journal(journal.clone()));
        let mail = Arc::new(mail.with_journal(journal.clone()));
        let storage = Arc::new(storage.with_journal(journal.clone()));
        let ledger = Arc::new(ledger.with_journal(journal.clone()));
        let email = Arc::new(email);
        let cache = Arc::new(MemoryCache::new());

        let effects = PipelineEffects {
            fetch: fetch.clone(),
            documents: documents.clone(),
            mail: mail.clone(),
            storage: storage.clone(),
            ledger: ledger.clone(),
            email: email.clone(),
            cache: Some(cache.clone()),
        };
        let pipeline = Arc::new(FulfillmentPipeline::new(effects, Some(schemas())));
        Self {
            fetch,
            documents,
            mail,
            storage,
            ledger,
            email,
            cache,
            journal,
            pipeline,
        }
    }

    /// All-succeeding harness serving `id_bytes` from the blob store.
    pub fn succeeding(id_bytes: Vec<u8>) -> Self {
        Self::build(
            MockFetch::ok(id_bytes, "image/jpeg"),
            MockDocuments::succeeding(),
            MockMailer::succeeding(),
            MockStorage::succeeding(),
            MockLedger::confirming(),
            MockEmail::succeeding(),
        )
    }
}

/// A 12 KB JPEG fixture and a valid CO request committed to it.
pub fn fixture_request() -> (Vec<u8>, FulfillmentRequest) {
    let id_bytes = sample_jpeg(12 * 1024);
    let request = sample_request(&id_bytes);
    (id_bytes, request)
}
