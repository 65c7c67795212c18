//! Request and fixture builders

use proofmark_core::request::{Purpose, Relationship};
use proofmark_core::{ApplicantRecord, FulfillmentRequest, RequestRef};

/// A request reference for receipts and claims under test.
pub fn sample_request_ref() -> RequestRef {
    RequestRef::generate()
}

/// A well-formed JPEG-shaped fixture of roughly `len` bytes: SOI + JFIF
/// marker, patterned body, EOI. Enough structure for content-type handling
/// without being a real photograph.
pub fn sample_jpeg(len: usize) -> Vec<u8> {
    let mut bytes = vec![
        0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, b'J', b'F', b'I', b'F', 0x00, 0x01, 0x01, 0x00,
        0x00, 0x48, 0x00, 0x48, 0x00, 0x00,
    ];
    let body = len.saturating_sub(bytes.len() + 2);
    bytes.extend((0..body).map(|i| (i % 251) as u8));
    bytes.extend_from_slice(&[0xFF, 0xD9]);
    bytes
}

/// A complete Colorado applicant record.
pub fn sample_applicant() -> ApplicantRecord {
    ApplicantRecord {
        full_name: "Avery Quinn".to_string(),
        date_of_birth: "1990-04-02".to_string(),
        place_of_birth: "Denver".to_string(),
        mother_name_at_birth: "Riley Quinn".to_string(),
        father_name: "Jordan Quinn".to_string(),
        relationship: Relationship::Own,
        purpose: Purpose::Passport,
        purpose_detail: String::new(),
        mailing_address1: "100 Main St".to_string(),
        mailing_address2: String::new(),
        city: "Denver".to_string(),
        state: "CO".to_string(),
        zip: "80202".to_string(),
        email: "avery@example.com".to_string(),
    }
}

/// A complete, valid Colorado fulfillment request whose committed
/// fingerprint matches `id_bytes`.
pub fn sample_request(id_bytes: &[u8]) -> FulfillmentRequest {
    FulfillmentRequest {
        session_id: "cs_test_a1B2c3".to_string(),
        jurisdiction: "CO".to_string(),
        copies: 3,
        stored_object_url: "https://blobs.example/uploads/id-4afd.jpg".to_string(),
        committed_fingerprint: proofmark_core::fingerprint::sha256_hex(id_bytes),
        signature_data_url: "data:image/png;base64,iVBORw0KGgoAAAANSUhEUg==".to_string(),
        applicant: sample_applicant(),
    }
}
