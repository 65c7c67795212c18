//! Dispatcher deduplication and the polling status surface

mod common;

use assert_matches::assert_matches;
use common::{fixture_request, Harness};
use proofmark_pipeline::{status, DispatchAck, Dispatcher, FulfillmentStatus};
use std::time::Duration;

/// Poll the harness cache until the run's result lands.
async fn wait_for_completion(harness: &Harness, session_id: &str) -> FulfillmentStatus {
    for _ in 0..200 {
        let status = status::lookup(Some(harness.cache.as_ref()), session_id).await;
        if matches!(status, FulfillmentStatus::Complete(_)) {
            return status;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    panic!("run for session {session_id} never completed");
}

#[tokio::test]
async fn duplicate_trigger_is_acknowledged_but_not_rerun() {
    let (id_bytes, request) = fixture_request();
    let session_id = request.session_id.clone();
    let harness = Harness::succeeding(id_bytes);
    let dispatcher = Dispatcher::new(harness.pipeline.clone());

    assert_matches!(dispatcher.dispatch(request.clone()), DispatchAck::Accepted);
    assert_matches!(dispatcher.dispatch(request), DispatchAck::Duplicate);

    let status = wait_for_completion(&harness, &session_id).await;
    let FulfillmentStatus::Complete(entry) = status else {
        unreachable!()
    };
    assert_eq!(entry.deletion_receipt_hash.len(), 64);

    // One run, not two
    assert_eq!(harness.fetch.call_count(), 1);
    assert_eq!(harness.mail.packet_call_count(), 1);
    assert_eq!(harness.storage.delete_count(), 1);
}

#[tokio::test]
async fn invalid_request_is_rejected_without_claiming_the_session() {
    let (id_bytes, mut request) = fixture_request();
    request.copies = 0;
    let harness = Harness::succeeding(id_bytes.clone());
    let dispatcher = Dispatcher::new(harness.pipeline.clone());

    assert_matches!(
        dispatcher.dispatch(request.clone()),
        DispatchAck::Rejected(_)
    );
    assert_eq!(harness.fetch.call_count(), 0);

    // The same session dispatches fine once the request is corrected
    request.copies = 1;
    assert_matches!(dispatcher.dispatch(request), DispatchAck::Accepted);
    wait_for_completion(&harness, "cs_test_a1B2c3").await;
}

#[tokio::test]
async fn status_reports_processing_until_the_result_lands() {
    let (id_bytes, request) = fixture_request();
    let session_id = request.session_id.clone();
    let harness = Harness::succeeding(id_bytes);

    // Before any run, and with no cache at all, the client sees processing
    assert_matches!(
        status::lookup(Some(harness.cache.as_ref()), &session_id).await,
        FulfillmentStatus::Processing
    );
    assert_matches!(
        status::lookup(None, &session_id).await,
        FulfillmentStatus::Processing
    );

    harness
        .pipeline
        .process(request)
        .await
        .expect("run failed");
    let status = status::lookup(Some(harness.cache.as_ref()), &session_id).await;
    let FulfillmentStatus::Complete(entry) = status else {
        panic!("completed run not visible to polling client");
    };
    assert!(entry.request_ref.as_str().starts_with("PRF-"));
}
