//! Low-level page construction over lopdf
//!
//! A thin builder for single-page US-Letter documents drawn with the
//! base-14 fonts. Wrapping uses an average Helvetica advance; this is
//! layout for printed letters, not typesetting.

use base64::Engine;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, ObjectId, Stream};
use proofmark_core::PipelineError;

/// US Letter, in PDF points.
pub const PAGE_WIDTH: f32 = 612.0;
pub const PAGE_HEIGHT: f32 = 792.0;

/// Base-14 fonts registered on every built page.
#[derive(Debug, Clone, Copy)]
pub enum Font {
    Regular,
    Bold,
    Mono,
}

impl Font {
    pub(crate) fn alias(self) -> &'static str {
        match self {
            Font::Regular => "F1",
            Font::Bold => "F2",
            Font::Mono => "F3",
        }
    }

    pub(crate) fn base_font(self) -> &'static str {
        match self {
            Font::Regular => "Helvetica",
            Font::Bold => "Helvetica-Bold",
            Font::Mono => "Courier",
        }
    }
}

/// Approximate width of `text` at `size`, using an average advance.
pub fn approx_width(text: &str, size: f32) -> f32 {
    text.chars().count() as f32 * size * 0.5
}

/// Accumulates draw operations for one US-Letter page.
#[derive(Default)]
pub struct PageBuilder {
    ops: Vec<Operation>,
}

impl PageBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Draw one text run in black.
    pub fn text(&mut self, font: Font, size: f32, x: f32, y: f32, text: &str) {
        self.text_color(font, size, x, y, text, (0.0, 0.0, 0.0));
    }

    /// Draw one text run in the given RGB color.
    pub fn text_color(
        &mut self,
        font: Font,
        size: f32,
        x: f32,
        y: f32,
        text: &str,
        color: (f32, f32, f32),
    ) {
        self.ops
            .push(Operation::new("rg", vec![color.0.into(), color.1.into(), color.2.into()]));
        self.ops.push(Operation::new("BT", vec![]));
        self.ops.push(Operation::new(
            "Tf",
            vec![font.alias().into(), size.into()],
        ));
        self.ops
            .push(Operation::new("Td", vec![x.into(), y.into()]));
        self.ops
            .push(Operation::new("Tj", vec![Object::string_literal(text)]));
        self.ops.push(Operation::new("ET", vec![]));
    }

    /// Draw word-wrapped text and return the y position below it.
    pub fn wrapped(
        &mut self,
        font: Font,
        size: f32,
        x: f32,
        mut y: f32,
        max_width: f32,
        leading: f32,
        text: &str,
        color: (f32, f32, f32),
    ) -> f32 {
        let mut line = String::new();
        for word in text.split_whitespace() {
            let candidate = if line.is_empty() {
                word.to_string()
            } else {
                format!("{line} {word}")
            };
            if approx_width(&candidate, size) > max_width && !line.is_empty() {
                self.text_color(font, size, x, y, &line, color);
                y -= leading;
                line = word.to_string();
            } else {
                line = candidate;
            }
        }
        if !line.is_empty() {
            self.text_color(font, size, x, y, &line, color);
            y -= leading;
        }
        y
    }

    /// Horizontal rule from `x1` to `x2` at height `y`.
    pub fn hline(&mut self, x1: f32, x2: f32, y: f32, thickness: f32, gray: f32) {
        self.ops
            .push(Operation::new("w", vec![thickness.into()]));
        self.ops.push(Operation::new(
            "RG",
            vec![gray.into(), gray.into(), gray.into()],
        ));
        self.ops
            .push(Operation::new("m", vec![x1.into(), y.into()]));
        self.ops
            .push(Operation::new("l", vec![x2.into(), y.into()]));
        self.ops.push(Operation::new("S", vec![]));
    }

    /// Light-gray filled box with a border, anchored at its bottom-left.
    pub fn boxed(&mut self, x: f32, y: f32, width: f32, height: f32) {
        self.ops
            .push(Operation::new("rg", vec![0.97.into(), 0.97.into(), 0.97.into()]));
        self.ops
            .push(Operation::new("RG", vec![0.8.into(), 0.8.into(), 0.8.into()]));
        self.ops.push(Operation::new("w", vec![1.0.into()]));
        self.ops.push(Operation::new(
            "re",
            vec![x.into(), y.into(), width.into(), height.into()],
        ));
        self.ops.push(Operation::new("B", vec![]));
    }

    /// Build a one-page document from the accumulated operations.
    pub fn into_document(self) -> Result<Document, PipelineError> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();

        let mut fonts = lopdf::Dictionary::new();
        for font in [Font::Regular, Font::Bold, Font::Mono] {
            let font_id = doc.add_object(dictionary! {
                "Type" => "Font",
                "Subtype" => "Type1",
                "BaseFont" => font.base_font(),
            });
            fonts.set(font.alias(), font_id);
        }
        let resources_id = doc.add_object(dictionary! { "Font" => fonts });

        let encoded = Content {
            operations: self.ops,
        }
        .encode()
        .map_err(|err| PipelineError::document(format!("content encode failed: {err}")))?;
        let content_id = doc.add_object(Stream::new(dictionary! {}, encoded));

        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), PAGE_WIDTH.into(), PAGE_HEIGHT.into()],
        });

        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => vec![page_id.into()],
                "Count" => 1,
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);
        Ok(doc)
    }
}

/// Serialize a document to bytes.
pub fn save_to_bytes(doc: &mut Document) -> Result<Vec<u8>, PipelineError> {
    let mut bytes = Vec::new();
    doc.save_to(&mut bytes)
        .map_err(|err| PipelineError::document(format!("document save failed: {err}")))?;
    Ok(bytes)
}

/// Decode a `data:image/...;base64,` URL into raw image bytes.
pub fn decode_data_url(data_url: &str) -> Result<Vec<u8>, PipelineError> {
    let encoded = data_url
        .split_once("base64,")
        .map(|(_, rest)| rest)
        .unwrap_or(data_url);
    base64::engine::general_purpose::STANDARD
        .decode(encoded.trim())
        .map_err(|err| PipelineError::document(format!("signature image is not base64: {err}")))
}

/// Best-effort image overlay: decode, embed, place. Failures are logged
/// and the document keeps its ruled fallback line.
pub fn overlay_image(
    doc: &mut Document,
    page_id: ObjectId,
    image_bytes: &[u8],
    position: (f32, f32),
    size: (f32, f32),
) {
    match lopdf::xobject::image_from(image_bytes.to_vec()) {
        Ok(stream) => {
            if let Err(err) = doc.insert_image(page_id, stream, position, size) {
                tracing::warn!(error = %err, "image placement failed, keeping ruled line");
            }
        }
        Err(err) => {
            tracing::warn!(error = %err, "image decode failed, keeping ruled line");
        }
    }
}
