//! End-to-end fulfillment runs over mock effects

mod common;

use common::{fixture_request, Harness};
use proofmark_core::identifiers::REF_ALPHABET;
use proofmark_testkit::mocks::{
    LedgerBehavior, MockDocuments, MockEmail, MockFetch, MockLedger, MockMailer, MockStorage,
};

fn assert_request_ref_shape(value: &str) {
    let year = chrono::Utc::now().format("%Y").to_string();
    let parts: Vec<&str> = value.split('-').collect();
    assert_eq!(parts.len(), 3, "unexpected reference shape: {value}");
    assert_eq!(parts[0], "PRF");
    assert_eq!(parts[1], year);
    assert_eq!(parts[2].len(), 4);
    for byte in parts[2].bytes() {
        assert!(
            REF_ALPHABET.contains(&byte),
            "reference {value} uses a character outside the reference alphabet"
        );
    }
}

#[tokio::test]
async fn happy_path_mails_deletes_attests_and_caches() {
    let (_id_bytes, request) = fixture_request();
    let session_id = request.session_id.clone();
    let stored_url = request.stored_object_url.clone();
    let harness = Harness::succeeding(_id_bytes);

    let result = harness.pipeline.process(request).await.expect("run failed");

    assert_request_ref_shape(result.request_ref.as_str());
    assert_eq!(result.mail_id, "ltr_mock_1");
    assert_eq!(result.check_id, "chk_mock_1");
    assert_eq!(
        result.tracking_number.as_deref(),
        Some("9400100000000000000001")
    );
    assert_eq!(result.deletion_receipt_hash.len(), 64);
    assert!(result
        .deletion_receipt_hash
        .bytes()
        .all(|b| b.is_ascii_hexdigit()));

    // All three ledger slots published and confirmed
    assert_eq!(harness.ledger.publishes().len(), 3);
    assert_eq!(
        result.attestation_uids.authorization.as_deref(),
        Some("0xuid_schema_auth")
    );
    assert_eq!(
        result.attestation_uids.fulfillment.as_deref(),
        Some("0xuid_schema_fulfill")
    );
    assert_eq!(
        result.attestation_uids.deletion.as_deref(),
        Some("0xuid_schema_delete")
    );

    // Exactly one delete of the stored object, and only after both mailings
    assert_eq!(harness.storage.delete_count(), 1);
    assert_eq!(harness.storage.deleted_urls(), vec![stored_url]);
    let mail_pos = harness.journal.position("mail_packet").unwrap();
    let check_pos = harness.journal.position("mail_fee_check").unwrap();
    let delete_pos = harness.journal.position("delete_stored").unwrap();
    assert!(mail_pos < delete_pos);
    assert!(check_pos < delete_pos);

    // Confirmation email carries the durable identifiers
    let sent = harness.email.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].to, "avery@example.com");
    assert!(sent[0].text.contains(result.request_ref.as_str()));
    assert!(sent[0].text.contains(&result.deletion_receipt_hash));

    // Result cached under the session key with the seven-day TTL
    let key = format!("fulfillment:{session_id}");
    let entry = harness.cache.ttl_of(&key).expect("result not cached");
    assert_eq!(entry.as_secs(), 7 * 24 * 60 * 60);
}

#[tokio::test]
async fn stubbed_fee_check_flows_into_result() {
    let (id_bytes, request) = fixture_request();
    let harness = Harness::build(
        MockFetch::ok(id_bytes, "image/jpeg"),
        MockDocuments::succeeding(),
        MockMailer::stubbing_check(),
        MockStorage::succeeding(),
        MockLedger::confirming(),
        MockEmail::succeeding(),
    );

    let result = harness.pipeline.process(request).await.expect("run failed");
    assert_eq!(
        result.check_id,
        format!("STUB_{}", result.request_ref.as_str())
    );
}

#[tokio::test]
async fn ledger_outage_degrades_attestation_without_failing_the_run() {
    let (id_bytes, request) = fixture_request();
    let ledger = MockLedger::confirming()
        .with_behavior("schema_auth", LedgerBehavior::Fail)
        .with_behavior("schema_fulfill", LedgerBehavior::Fail)
        .with_behavior("schema_delete", LedgerBehavior::Fail);
    let harness = Harness::build(
        MockFetch::ok(id_bytes, "image/jpeg"),
        MockDocuments::succeeding(),
        MockMailer::succeeding(),
        MockStorage::succeeding(),
        ledger,
        MockEmail::succeeding(),
    );

    let result = harness.pipeline.process(request).await.expect("run failed");
    assert_eq!(result.attestation_uids.published_count(), 0);
    assert!(result.attestation_uids.authorization.is_none());
    // Deletion still happened
    assert_eq!(harness.storage.delete_count(), 1);
}

#[tokio::test]
async fn notification_failure_is_non_fatal() {
    let (id_bytes, request) = fixture_request();
    let session_id = request.session_id.clone();
    let harness = Harness::build(
        MockFetch::ok(id_bytes, "image/jpeg"),
        MockDocuments::succeeding(),
        MockMailer::succeeding(),
        MockStorage::succeeding(),
        MockLedger::confirming(),
        MockEmail::failing(),
    );

    let result = harness.pipeline.process(request).await.expect("run failed");
    assert_eq!(result.mail_id, "ltr_mock_1");
    assert!(harness.email.sent().is_empty());
    // The cache write still records completion for the polling client
    let key = format!("fulfillment:{session_id}");
    let cached = harness.cache.ttl_of(&key);
    assert!(cached.is_some());
}

#[tokio::test]
async fn storage_delete_failure_degrades_into_the_receipt() {
    let (id_bytes, request) = fixture_request();
    let harness = Harness::build(
        MockFetch::ok(id_bytes, "image/jpeg"),
        MockDocuments::succeeding(),
        MockMailer::succeeding(),
        MockStorage::failing(),
        MockLedger::confirming(),
        MockEmail::succeeding(),
    );

    let result = harness.pipeline.process(request).await.expect("run failed");
    assert_eq!(result.deletion_receipt_hash.len(), 64);
    // The deletion attestation reports the partial outcome truthfully
    let publishes = harness.ledger.publishes();
    let deletion = publishes
        .iter()
        .find(|p| p.schema_id == "schema_delete")
        .expect("deletion slot not published");
    assert_eq!(
        deletion.payload["all_files_deleted"],
        serde_json::json!(false)
    );
}
