//! Official form fill
//!
//! The agency form is a flat scanned PDF, not an AcroForm, so values are
//! drawn as a text overlay at per-jurisdiction slot coordinates. A missing
//! slot or an unembeddable signature is best-effort (logged and skipped);
//! only a template that cannot be loaded or parsed is fatal.

use crate::render::{decode_data_url, overlay_image, save_to_bytes, Font};
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, ObjectId};
use proofmark_core::config::JurisdictionConfig;
use proofmark_core::request::Purpose;
use proofmark_core::{ApplicantRecord, PipelineError};

const OVERLAY_FONT_ALIAS: &str = "PFov";
const OVERLAY_SIZE: f32 = 10.0;

const SIGNATURE_WIDTH: f32 = 200.0;
const SIGNATURE_HEIGHT: f32 = 40.0;

/// Fill the official form template with applicant values.
pub fn fill(
    template_bytes: &[u8],
    config: &JurisdictionConfig,
    applicant: &ApplicantRecord,
    signature_data_url: &str,
    copies: u32,
    today: &str,
) -> Result<Vec<u8>, PipelineError> {
    let mut doc = Document::load_mem(template_bytes)
        .map_err(|err| PipelineError::document(format!("form template failed to parse: {err}")))?;
    let page_id = *doc
        .get_pages()
        .get(&1)
        .ok_or_else(|| PipelineError::document("form template has no pages"))?;

    register_overlay_font(&mut doc, page_id)?;

    let mut ops: Vec<Operation> = Vec::new();
    for (key, value) in field_values(config, applicant, copies, today) {
        if value.is_empty() {
            continue;
        }
        match config.form.slot(key) {
            Some(slot) => {
                ops.push(Operation::new("BT", vec![]));
                ops.push(Operation::new(
                    "Tf",
                    vec![OVERLAY_FONT_ALIAS.into(), OVERLAY_SIZE.into()],
                ));
                ops.push(Operation::new("Td", vec![slot.x.into(), slot.y.into()]));
                ops.push(Operation::new("Tj", vec![Object::string_literal(value)]));
                ops.push(Operation::new("ET", vec![]));
            }
            None => {
                tracing::warn!(key, jurisdiction = %config.code, "no overlay slot for field, skipping");
            }
        }
    }

    let mut content = doc
        .get_and_decode_page_content(page_id)
        .map_err(|err| PipelineError::document(format!("form template content unreadable: {err}")))?;
    content.operations.extend(ops);
    let encoded = encode_content(content)?;
    doc.change_page_content(page_id, encoded)
        .map_err(|err| PipelineError::document(format!("form content rewrite failed: {err}")))?;

    if let Some(slot) = config.form.slot("signature") {
        match decode_data_url(signature_data_url) {
            Ok(image_bytes) => overlay_image(
                &mut doc,
                page_id,
                &image_bytes,
                (slot.x, slot.y),
                (SIGNATURE_WIDTH, SIGNATURE_HEIGHT),
            ),
            Err(err) => tracing::warn!(error = %err, "signature image skipped on form"),
        }
    }

    save_to_bytes(&mut doc)
}

/// Logical field values in slot-key order.
fn field_values(
    config: &JurisdictionConfig,
    applicant: &ApplicantRecord,
    copies: u32,
    today: &str,
) -> Vec<(&'static str, String)> {
    let purpose = match applicant.purpose {
        Purpose::Other if !applicant.purpose_detail.is_empty() => {
            format!("Other: {}", applicant.purpose_detail)
        }
        other => other.label().to_string(),
    };
    let total_cents = config.fees.agency_fee_cents(copies);
    vec![
        ("requestor_name", applicant.full_name.clone()),
        ("requestor_email", applicant.email.clone()),
        ("mailing_street", applicant.street_line()),
        (
            "mailing_city_state_zip",
            format!("{}, {} {}", applicant.city, applicant.state, applicant.zip),
        ),
        ("relationship", applicant.relationship.label().to_string()),
        ("purpose", purpose),
        ("registrant_name", applicant.full_name.clone()),
        ("date_of_birth", applicant.date_of_birth.clone()),
        ("place_of_birth", applicant.place_of_birth.clone()),
        ("mother_name", applicant.mother_name_at_birth.clone()),
        ("father_name", applicant.father_name.clone()),
        ("copies", copies.to_string()),
        ("fee_total", format!("${:.2}", total_cents as f64 / 100.0)),
        ("todays_date", today.to_string()),
    ]
}

/// Register the overlay font in the page's resource dictionary, creating
/// or copying the dictionary as needed. Resources may live inline on the
/// page, behind a reference, or be inherited from the page tree.
fn register_overlay_font(doc: &mut Document, page_id: ObjectId) -> Result<(), PipelineError> {
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => Font::Regular.base_font(),
    });

    let direct = doc
        .get_dictionary(page_id)
        .map_err(|err| PipelineError::document(format!("form page unreadable: {err}")))?
        .get(b"Resources")
        .ok()
        .cloned();

    match direct {
        Some(Object::Reference(resources_id)) => {
            let resources = doc
                .get_object_mut(resources_id)
                .and_then(Object::as_dict_mut)
                .map_err(|err| {
                    PipelineError::document(format!("form resources unreadable: {err}"))
                })?;
            set_font(resources, font_id);
        }
        Some(Object::Dictionary(mut resources)) => {
            set_font(&mut resources, font_id);
            set_page_resources(doc, page_id, resources)?;
        }
        _ => {
            // Inherited resources: copy them onto the page so the overlay
            // font does not shadow the template's own fonts
            let (inherited, _) = doc.get_page_resources(page_id);
            let mut resources = inherited.cloned().unwrap_or_else(lopdf::Dictionary::new);
            set_font(&mut resources, font_id);
            set_page_resources(doc, page_id, resources)?;
        }
    }
    Ok(())
}

fn set_font(resources: &mut lopdf::Dictionary, font_id: ObjectId) {
    let mut fonts = match resources.get(b"Font").and_then(Object::as_dict) {
        Ok(existing) => existing.clone(),
        Err(_) => lopdf::Dictionary::new(),
    };
    fonts.set(OVERLAY_FONT_ALIAS, font_id);
    resources.set("Font", fonts);
}

fn set_page_resources(
    doc: &mut Document,
    page_id: ObjectId,
    resources: lopdf::Dictionary,
) -> Result<(), PipelineError> {
    let page = doc
        .get_object_mut(page_id)
        .and_then(Object::as_dict_mut)
        .map_err(|err| PipelineError::document(format!("form page unwritable: {err}")))?;
    page.set("Resources", resources);
    Ok(())
}

fn encode_content(content: Content) -> Result<Vec<u8>, PipelineError> {
    content
        .encode()
        .map_err(|err| PipelineError::document(format!("overlay encode failed: {err}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::PageBuilder;
    use proofmark_testkit::builders::sample_applicant;

    fn blank_template() -> Vec<u8> {
        let mut builder = PageBuilder::new();
        builder.text(Font::Regular, 9.0, 72.0, 760.0, "CERTIFICATE REQUEST FORM");
        let mut doc = builder.into_document().unwrap();
        save_to_bytes(&mut doc).unwrap()
    }

    #[test]
    fn filled_form_carries_applicant_values() {
        let config = proofmark_core::config::jurisdiction("CO").unwrap();
        let bytes = fill(
            &blank_template(),
            config,
            &sample_applicant(),
            "data:image/png;base64,aGk=",
            3,
            "08/31/2026",
        )
        .unwrap();
        let doc = Document::load_mem(&bytes).unwrap();
        let text = doc.extract_text(&[1]).unwrap_or_default();
        assert!(text.contains("Avery Quinn"));
        assert!(text.contains("08/31/2026"));
        // 2500 + 2 * 2000 cents
        assert!(text.contains("$65.00"));
    }

    #[test]
    fn garbage_template_is_fatal() {
        let config = proofmark_core::config::jurisdiction("CO").unwrap();
        let err = fill(
            b"not a pdf",
            config,
            &sample_applicant(),
            "data:image/png;base64,aGk=",
            1,
            "08/31/2026",
        )
        .unwrap_err();
        assert!(matches!(err, PipelineError::Document { .. }));
    }

    #[test]
    fn other_purpose_carries_its_detail() {
        let config = proofmark_core::config::jurisdiction("CO").unwrap();
        let mut applicant = sample_applicant();
        applicant.purpose = Purpose::Other;
        applicant.purpose_detail = "Genealogy".to_string();
        let values = field_values(config, &applicant, 1, "08/31/2026");
        let purpose = values.iter().find(|(k, _)| *k == "purpose").unwrap();
        assert_eq!(purpose.1, "Other: Genealogy");
    }
}
