//! Packet merge
//!
//! Combines the three documents into the single PDF the mail gateway
//! accepts, in reading order: consent letter (cover), filled form, then
//! the identity document. A PDF identity document is merged page by page;
//! an image is placed on a labeled page of its own.

use crate::render::{save_to_bytes, Font, PageBuilder, PAGE_HEIGHT, PAGE_WIDTH};
use lopdf::{Document, Object, ObjectId};
use proofmark_core::PipelineError;
use std::collections::BTreeMap;

const IMAGE_MARGIN: f32 = 54.0;

/// Merge letter, form, and identity document into one mailable PDF.
pub fn build(
    form_bytes: &[u8],
    letter_bytes: &[u8],
    id_bytes: &[u8],
    id_content_type: &str,
) -> Result<Vec<u8>, PipelineError> {
    let letter = load(letter_bytes, "consent letter")?;
    let form = load(form_bytes, "filled form")?;
    let id_doc = if id_content_type == "application/pdf" {
        load(id_bytes, "identity document")?
    } else {
        image_page(id_bytes)?
    };

    let mut merged = merge(vec![letter, form, id_doc])?;
    save_to_bytes(&mut merged)
}

fn load(bytes: &[u8], what: &str) -> Result<Document, PipelineError> {
    Document::load_mem(bytes)
        .map_err(|err| PipelineError::document(format!("{what} is not a well-formed PDF: {err}")))
}

/// A labeled US-Letter page carrying the identity image, scaled to fit
/// inside the margins. Everything that is not `application/pdf` is decoded
/// as an image; the gateway normalizes formats on upload.
fn image_page(id_bytes: &[u8]) -> Result<Document, PipelineError> {
    let mut builder = PageBuilder::new();
    builder.text(
        Font::Bold,
        9.0,
        IMAGE_MARGIN,
        PAGE_HEIGHT - IMAGE_MARGIN,
        "GOVERNMENT-ISSUED PHOTO ID - SUBMITTED BY APPLICANT",
    );
    builder.text(
        Font::Regular,
        8.0,
        IMAGE_MARGIN,
        PAGE_HEIGHT - IMAGE_MARGIN - 14.0,
        "Required for mail-in record requests. See the application for ID requirements.",
    );
    let mut doc = builder.into_document()?;
    let page_id = *doc
        .get_pages()
        .get(&1)
        .ok_or_else(|| PipelineError::internal("image carrier page missing"))?;

    let stream = lopdf::xobject::image_from(id_bytes.to_vec())
        .map_err(|err| PipelineError::document(format!("identity image failed to decode: {err}")))?;
    let (draw_x, draw_y, draw_w, draw_h) = fit_rect(&stream);
    // Placement failure here is fatal: a packet without the ID is not
    // acceptable to the agency
    doc.insert_image(page_id, stream, (draw_x, draw_y), (draw_w, draw_h))
        .map_err(|err| PipelineError::document(format!("identity image placement failed: {err}")))?;
    Ok(doc)
}

/// Scale-to-fit rectangle for an image stream, centered, never upscaled.
fn fit_rect(stream: &lopdf::Stream) -> (f32, f32, f32, f32) {
    let img_w = stream
        .dict
        .get(b"Width")
        .and_then(Object::as_i64)
        .unwrap_or(600) as f32;
    let img_h = stream
        .dict
        .get(b"Height")
        .and_then(Object::as_i64)
        .unwrap_or(400) as f32;
    let max_w = PAGE_WIDTH - IMAGE_MARGIN * 2.0;
    // Room for the label above the image
    let max_h = PAGE_HEIGHT - IMAGE_MARGIN * 2.0 - 60.0;
    let scale = (max_w / img_w).min(max_h / img_h).min(1.0);
    let draw_w = img_w * scale;
    let draw_h = img_h * scale;
    (
        (PAGE_WIDTH - draw_w) / 2.0,
        (PAGE_HEIGHT - draw_h) / 2.0,
        draw_w,
        draw_h,
    )
}

/// Concatenate documents, preserving page order across inputs.
fn merge(documents: Vec<Document>) -> Result<Document, PipelineError> {
    let mut max_id = 1;
    let mut page_order: Vec<ObjectId> = Vec::new();
    let mut pages: BTreeMap<ObjectId, Object> = BTreeMap::new();
    let mut objects: BTreeMap<ObjectId, Object> = BTreeMap::new();

    for mut doc in documents {
        doc.renumber_objects_with(max_id);
        max_id = doc.max_id + 1;
        for (_, object_id) in doc.get_pages() {
            let page = doc
                .get_object(object_id)
                .map_err(|err| PipelineError::document(format!("unreadable page: {err}")))?
                .to_owned();
            page_order.push(object_id);
            pages.insert(object_id, page);
        }
        objects.extend(doc.objects);
    }

    let mut merged = Document::with_version("1.5");
    let mut catalog_id: Option<ObjectId> = None;
    let mut pages_id: Option<ObjectId> = None;
    let mut pages_dict = lopdf::Dictionary::new();

    for (object_id, object) in objects {
        match object.type_name().unwrap_or("") {
            "Catalog" => catalog_id = Some(catalog_id.unwrap_or(object_id)),
            "Pages" => {
                if let Ok(dict) = object.as_dict() {
                    pages_dict.extend(dict);
                }
                pages_id = Some(pages_id.unwrap_or(object_id));
            }
            // Re-inserted below with a fixed parent
            "Page" => {}
            "Outlines" | "Outline" => {}
            _ => {
                merged.objects.insert(object_id, object);
            }
        }
    }

    let pages_id =
        pages_id.ok_or_else(|| PipelineError::document("no page tree in any input"))?;
    let catalog_id =
        catalog_id.ok_or_else(|| PipelineError::document("no catalog in any input"))?;

    for (object_id, object) in &pages {
        if let Ok(dict) = object.as_dict() {
            let mut dict = dict.clone();
            dict.set("Parent", pages_id);
            merged.objects.insert(*object_id, Object::Dictionary(dict));
        }
    }

    pages_dict.set("Type", "Pages");
    pages_dict.set("Count", page_order.len() as u32);
    pages_dict.set(
        "Kids",
        page_order
            .iter()
            .map(|id| Object::Reference(*id))
            .collect::<Vec<_>>(),
    );
    merged
        .objects
        .insert(pages_id, Object::Dictionary(pages_dict));

    let mut catalog = lopdf::Dictionary::new();
    catalog.set("Type", "Catalog");
    catalog.set("Pages", pages_id);
    merged
        .objects
        .insert(catalog_id, Object::Dictionary(catalog));

    merged.trailer.set("Root", catalog_id);
    merged.max_id = max_id;
    merged.renumber_objects();
    merged.compress();
    Ok(merged)
}
