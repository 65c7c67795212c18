//! Agent authorization (consent) letter
//!
//! A single US-Letter page: service header, authorization body, scope and
//! agreement bullets, registrant box, signature, and the request reference
//! in the signature block so the printed page ties back to the published
//! records.

use crate::render::{
    approx_width, decode_data_url, overlay_image, save_to_bytes, Font, PageBuilder, PAGE_WIDTH,
};
use proofmark_core::config::JurisdictionConfig;
use proofmark_core::{ApplicantRecord, PipelineError, RequestRef};

const MARGIN: f32 = 72.0;
const TEAL: (f32, f32, f32) = (0.06, 0.47, 0.42);
const GRAY: (f32, f32, f32) = (0.4, 0.4, 0.4);
const BLACK: (f32, f32, f32) = (0.0, 0.0, 0.0);

const SIGNATURE_WIDTH: f32 = 220.0;
const SIGNATURE_HEIGHT: f32 = 55.0;

/// Render the consent letter, embedding the signature image when it can
/// be decoded and leaving the ruled line when it cannot.
pub fn render(
    config: &JurisdictionConfig,
    applicant: &ApplicantRecord,
    signature_data_url: &str,
    request_ref: &RequestRef,
    today: &str,
) -> Result<Vec<u8>, PipelineError> {
    let content_width = PAGE_WIDTH - MARGIN * 2.0;
    let mut page = PageBuilder::new();
    let mut y = 792.0 - MARGIN;

    // Header
    page.text_color(Font::Bold, 20.0, MARGIN, y, "PROOFMARK", TEAL);
    y -= 16.0;
    page.text_color(
        Font::Regular,
        9.0,
        MARGIN,
        y,
        "Privacy-first records fulfillment  *  support@proofmark.dev",
        GRAY,
    );
    y -= 8.0;
    page.hline(MARGIN, PAGE_WIDTH - MARGIN, y, 1.0, 0.85);
    y -= 24.0;

    let title = format!(
        "AGENT AUTHORIZATION FOR {} REQUEST",
        config.request_type.replace('_', " ").to_uppercase()
    );
    page.text(Font::Bold, 13.0, MARGIN, y, &title);
    y -= 20.0;
    page.text_color(Font::Regular, 10.0, MARGIN, y, &format!("Date: {today}"), GRAY);
    y -= 28.0;

    // Authorization body
    let body = format!(
        "I, {}, hereby authorize Proofmark to act as my authorized agent for the sole and \
         limited purpose of submitting a {} application to the {} on my behalf.",
        applicant.full_name,
        config.request_type.replace('_', " "),
        config.agency.name,
    );
    y = page.wrapped(Font::Regular, 11.0, MARGIN, y, content_width, 16.0, &body, BLACK);
    y -= 20.0;

    page.text(Font::Bold, 11.0, MARGIN, y, "This authorization covers:");
    y -= 16.0;
    let coverage = [
        format!(
            "- Completing the official {} application on my behalf",
            config.name
        ),
        "- Submitting the completed application with a copy of my government-issued photo ID"
            .to_string(),
        "- Submitting the required fee payment on my behalf".to_string(),
        "- Receiving submission confirmation and tracking information".to_string(),
    ];
    for item in &coverage {
        y = page.wrapped(
            Font::Regular,
            10.0,
            MARGIN + 12.0,
            y,
            content_width - 12.0,
            15.0,
            item,
            BLACK,
        );
        y -= 4.0;
    }
    y -= 16.0;

    page.text(Font::Bold, 11.0, MARGIN, y, "I understand and agree:");
    y -= 16.0;
    let agreements = [
        "- All documents provided will be permanently deleted immediately after submission",
        "- A cryptographic SHA-256 hash of every file is published to a public attestation \
         ledger before deletion",
        "- The requested record will be mailed directly to my address by the agency",
        "- This authorization is one-time use only, for this specific request",
        "- Proofmark retains no copies of any documents after the deletion receipt is issued",
    ];
    for item in &agreements {
        y = page.wrapped(
            Font::Regular,
            10.0,
            MARGIN + 12.0,
            y,
            content_width - 12.0,
            15.0,
            item,
            BLACK,
        );
        y -= 4.0;
    }
    y -= 20.0;

    // Registrant box
    let box_height = 90.0;
    page.boxed(MARGIN, y + 8.0 - box_height, content_width, box_height);
    y -= 4.0;
    page.text_color(Font::Bold, 10.0, MARGIN + 12.0, y, "Registrant Information", GRAY);
    y -= 16.0;
    let rows: [(&str, String); 4] = [
        ("Name at Birth:", applicant.full_name.clone()),
        ("Date of Birth:", long_date(&applicant.date_of_birth)),
        (
            "Place of Birth:",
            format!("{} County, {}", applicant.place_of_birth, config.name),
        ),
        ("Relationship:", applicant.relationship.label().to_string()),
    ];
    for (label, value) in &rows {
        page.text(Font::Bold, 10.0, MARGIN + 12.0, y, label);
        page.text(Font::Regular, 10.0, MARGIN + 130.0, y, value);
        y -= 15.0;
    }
    y -= 20.0;

    page.text(Font::Bold, 10.0, MARGIN, y, "Authorized Agent:");
    page.text(Font::Regular, 10.0, MARGIN + 130.0, y, "Proofmark");
    y -= 14.0;
    page.text(Font::Bold, 10.0, MARGIN, y, "Agent Contact:");
    page.text(Font::Regular, 10.0, MARGIN + 130.0, y, "support@proofmark.dev");
    y -= 30.0;

    // Signature block. The ruled line stays under the image so the page
    // still reads as signed when the image cannot be embedded.
    page.text(Font::Bold, 11.0, MARGIN, y, "Requestor Signature:");
    y -= 14.0;
    page.text_color(
        Font::Regular,
        9.0,
        MARGIN,
        y,
        "By signing below, I certify the above authorization is true and correct.",
        GRAY,
    );
    let signature_y = y - 8.0 - SIGNATURE_HEIGHT;
    page.hline(MARGIN, MARGIN + SIGNATURE_WIDTH, signature_y - 4.0, 1.0, 0.0);
    y = signature_y - 20.0;

    page.text(Font::Regular, 10.0, MARGIN, y, &format!("Date Signed: {today}"));
    y -= 14.0;
    page.text(Font::Regular, 10.0, MARGIN, y, "Request Reference:");
    page.text_color(
        Font::Mono,
        10.0,
        MARGIN + approx_width("Request Reference:  ", 10.0),
        y,
        request_ref.as_str(),
        TEAL,
    );
    y -= 28.0;

    page.hline(MARGIN, PAGE_WIDTH - MARGIN, y, 0.5, 0.85);
    y -= 14.0;
    page.wrapped(
        Font::Regular,
        8.0,
        MARGIN,
        y,
        content_width,
        13.0,
        "This e-signature is legally binding under the Electronic Signatures in Global and \
         National Commerce Act (E-SIGN Act) and applicable state electronic signature laws. \
         This authorization is one-time use only and expires upon fulfillment.",
        (0.5, 0.5, 0.5),
    );

    page.text_color(
        Font::Regular,
        8.0,
        MARGIN,
        36.0,
        "Proofmark  *  Privacy-first records fulfillment  *  proofmark.dev",
        (0.6, 0.6, 0.6),
    );

    let mut doc = page.into_document()?;
    if let Some(&page_id) = doc.get_pages().get(&1) {
        match decode_data_url(signature_data_url) {
            Ok(image_bytes) => overlay_image(
                &mut doc,
                page_id,
                &image_bytes,
                (MARGIN, signature_y),
                (SIGNATURE_WIDTH, SIGNATURE_HEIGHT),
            ),
            Err(err) => {
                tracing::warn!(error = %err, "signature image skipped on consent letter");
            }
        }
    }
    save_to_bytes(&mut doc)
}

/// `YYYY-MM-DD` to `Month D, YYYY`; the input passes through unchanged
/// when it does not parse.
fn long_date(iso: &str) -> String {
    chrono::NaiveDate::parse_from_str(iso, "%Y-%m-%d")
        .map(|date| date.format("%B %-d, %Y").to_string())
        .unwrap_or_else(|_| iso.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::Document;
    use proofmark_testkit::builders::{sample_applicant, sample_request_ref};

    #[test]
    fn letter_is_a_single_parseable_page() {
        let config = proofmark_core::config::jurisdiction("CO").unwrap();
        let bytes = render(
            config,
            &sample_applicant(),
            "data:image/png;base64,aGk=",
            &sample_request_ref(),
            "August 31, 2026",
        )
        .unwrap();
        let doc = Document::load_mem(&bytes).unwrap();
        assert_eq!(doc.get_pages().len(), 1);

        let page_id = *doc.get_pages().get(&1).unwrap();
        let text = doc.extract_text(&[1]).unwrap_or_default();
        assert!(text.contains("PROOFMARK"));
        assert!(text.contains("AGENT AUTHORIZATION"));
        assert!(!doc.get_page_contents(page_id).is_empty());
    }

    #[test]
    fn dates_render_long_form() {
        assert_eq!(long_date("1990-04-02"), "April 2, 1990");
        assert_eq!(long_date("not-a-date"), "not-a-date");
    }
}
