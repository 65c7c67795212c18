//! Confirmation email content
//!
//! Builds the final human-readable confirmation referencing the mailing,
//! the deletion receipt, and whatever attestations were published. Content
//! only; sending goes through `EmailEffects` and stays best-effort.

use proofmark_core::config::JurisdictionConfig;
use proofmark_core::effects::MailedLetter;
use proofmark_core::{ApplicantRecord, AttestationUids, DeletionReceipt, RequestRef};

/// Public explorer for published attestation records.
const ATTESTATION_EXPLORER: &str = "https://explorer.proofmark.dev/attestation";

/// A rendered outbound message.
pub struct EmailMessage {
    pub subject: String,
    pub html: String,
    pub text: String,
}

/// Render the confirmation email for a completed run.
pub fn confirmation_email(
    applicant: &ApplicantRecord,
    config: &JurisdictionConfig,
    request_ref: &RequestRef,
    letter: &MailedLetter,
    receipt: &DeletionReceipt,
    uids: &AttestationUids,
) -> EmailMessage {
    let record = config.request_type.replace('_', " ");
    let subject = format!("Your {} {record} request — Ref: {request_ref}", config.name);

    let tracking_html = match &letter.tracking_number {
        Some(tracking) => {
            let delivery = letter
                .expected_delivery
                .as_ref()
                .map(|date| format!("<p>Expected delivery to the agency: {date}</p>"))
                .unwrap_or_default();
            format!("<p>Tracking number: <code>{tracking}</code></p>{delivery}")
        }
        None => "<p>Tracking information will be available shortly.</p>".to_string(),
    };

    let attestation_items: String = [
        ("Authorization", &uids.authorization),
        ("Fulfillment", &uids.fulfillment),
        ("Data destruction", &uids.deletion),
    ]
    .iter()
    .filter_map(|(label, uid)| {
        uid.as_ref().map(|uid| {
            format!("<li>{label}: <a href=\"{ATTESTATION_EXPLORER}/{uid}\">{uid}</a></li>")
        })
    })
    .collect();

    let attestation_html = if attestation_items.is_empty() {
        String::new()
    } else {
        format!(
            "<h3>Public attestations</h3><p>Independently verifiable records:</p><ul>{attestation_items}</ul>"
        )
    };

    let deletion_note = if receipt.all_files_deleted {
        "All of your documents have been permanently deleted."
    } else {
        "All of your documents have been destroyed in memory; the uploaded copy will expire from storage shortly."
    };

    let html = format!(
        "<html><body>\
         <h2>Request submitted</h2>\
         <p>Hi {name},</p>\
         <p>Your {state} {record} request has been mailed to {agency} on your behalf. \
         The certificate will be mailed directly to the address you provided.</p>\
         <h3>Request reference</h3><p><strong>{reference}</strong></p>\
         <h3>Mail tracking</h3>{tracking}\
         <h3>Privacy proof</h3>\
         <p>{deletion_note}</p>\
         <p>Deletion receipt hash:<br><code>{receipt_hash}</code></p>\
         {attestations}\
         <p>Allow up to {days} business days for the agency to process your request.</p>\
         </body></html>",
        name = applicant.full_name,
        state = config.name,
        agency = config.agency.name,
        reference = request_ref,
        tracking = tracking_html,
        deletion_note = deletion_note,
        receipt_hash = receipt.receipt_hash,
        attestations = attestation_html,
        days = config.agency.processing_time_days,
    );

    let text = format!(
        "Proofmark — Request submitted\n\n\
         Hi {name},\n\n\
         Your {state} {record} request has been mailed.\n\n\
         Request reference: {reference}\n\
         Tracking: {tracking}\n\
         Deletion receipt hash: {receipt_hash}\n\
         All files deleted: {deleted}\n\n\
         Allow up to {days} business days for processing.\n",
        name = applicant.full_name,
        state = config.name,
        reference = request_ref,
        tracking = letter.tracking_number.as_deref().unwrap_or("pending"),
        receipt_hash = receipt.receipt_hash,
        deleted = if receipt.all_files_deleted { "yes" } else { "pending storage expiry" },
        days = config.agency.processing_time_days,
    );

    EmailMessage {
        subject,
        html,
        text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proofmark_core::{config, ArtifactDigest};

    fn fixture() -> (DeletionReceipt, MailedLetter) {
        let receipt = DeletionReceipt::finalize(
            RequestRef::generate(),
            vec![ArtifactDigest {
                label: "photo_id".into(),
                sha256: "ab".repeat(32),
            }],
            1_770_000_000_000,
            "ltr_1".into(),
            "chk_1".into(),
            true,
        );
        let letter = MailedLetter {
            mail_id: "ltr_1".into(),
            tracking_number: Some("94001000000001".into()),
            expected_delivery: None,
        };
        (receipt, letter)
    }

    #[test]
    fn email_references_receipt_and_tracking() {
        let (receipt, letter) = fixture();
        let config = config::jurisdiction("CO").unwrap();
        let applicant = proofmark_core::request::ApplicantRecord {
            full_name: "Avery Quinn".into(),
            date_of_birth: "1990-04-02".into(),
            place_of_birth: "Denver".into(),
            mother_name_at_birth: "Riley Quinn".into(),
            father_name: String::new(),
            relationship: proofmark_core::request::Relationship::Own,
            purpose: proofmark_core::request::Purpose::Passport,
            purpose_detail: String::new(),
            mailing_address1: "100 Main St".into(),
            mailing_address2: String::new(),
            city: "Denver".into(),
            state: "CO".into(),
            zip: "80202".into(),
            email: "avery@example.com".into(),
        };
        let uids = AttestationUids {
            authorization: Some("0xaaa".into()),
            fulfillment: None,
            deletion: Some("0xbbb".into()),
        };

        let message = confirmation_email(
            &applicant,
            config,
            &receipt.request_ref.clone(),
            &letter,
            &receipt,
            &uids,
        );
        assert!(message.subject.contains("Colorado"));
        assert!(message.html.contains(&receipt.receipt_hash));
        assert!(message.html.contains("94001000000001"));
        assert!(message.html.contains("0xaaa"));
        assert!(message.html.contains("0xbbb"));
        // Unpublished slots are omitted rather than shown as missing
        assert!(!message.html.contains("Fulfillment:"));
        assert!(message.text.contains(receipt.request_ref.as_str()));
    }
}
