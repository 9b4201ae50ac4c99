//! Single-page label PDF writer

use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Document, Object, Stream};

use crate::codes::Code;
use crate::error::RenderError;

use super::barcode::encode_code128;
use super::geometry::{LabelGeometry, LabelLayout, CAPTION_FONT_SIZE};
use super::metrics::helvetica_text_width;

const FONT_NAME: &str = "F1";
const IMAGE_NAME: &str = "Im1";

/// One rendered label: where things went, and the serialized one-page PDF
#[derive(Debug, Clone)]
pub struct LabelPage {
    pub code: Code,
    pub layout: LabelLayout,
    pub pdf: Vec<u8>,
}

/// Renders codes onto fixed-size label pages
#[derive(Debug, Clone)]
pub struct LabelRenderer {
    geometry: LabelGeometry,
    caption: bool,
}

impl Default for LabelRenderer {
    fn default() -> Self {
        Self::new(LabelGeometry::default(), true)
    }
}

impl LabelRenderer {
    pub fn new(geometry: LabelGeometry, caption: bool) -> Self {
        Self { geometry, caption }
    }

    /// Render every code, stopping at the first failure.
    ///
    /// Either all pages come back, in input order, or none do.
    pub fn render_all(&self, codes: &[Code]) -> Result<Vec<LabelPage>, RenderError> {
        codes.iter().map(|code| self.render(code)).collect()
    }

    /// Render one code as a one-page PDF
    pub fn render(&self, code: &Code) -> Result<LabelPage, RenderError> {
        tracing::debug!(code = %code, "Rendering label");

        let raster = encode_code128(code)?;
        let caption_width = self
            .caption
            .then(|| helvetica_text_width(code.as_str(), CAPTION_FONT_SIZE));
        let layout = self
            .geometry
            .layout(raster.width(), raster.height(), caption_width);

        let pdf_error = |reason: String| RenderError::Pdf {
            code: code.to_string(),
            reason,
        };

        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();

        let font_id = doc.add_object(Dictionary::from_iter([
            ("Type", Object::Name(b"Font".to_vec())),
            ("Subtype", Object::Name(b"Type1".to_vec())),
            ("BaseFont", Object::Name(b"Helvetica".to_vec())),
            ("Encoding", Object::Name(b"WinAnsiEncoding".to_vec())),
        ]));

        let image_dict = Dictionary::from_iter([
            ("Type", Object::Name(b"XObject".to_vec())),
            ("Subtype", Object::Name(b"Image".to_vec())),
            ("Width", Object::Integer(i64::from(raster.width()))),
            ("Height", Object::Integer(i64::from(raster.height()))),
            ("ColorSpace", Object::Name(b"DeviceGray".to_vec())),
            ("BitsPerComponent", Object::Integer(8)),
        ]);
        let image_id = doc.add_object(Stream::new(image_dict, raster.into_samples()));

        let content = page_content(code, &layout)
            .encode()
            .map_err(|e| pdf_error(format!("content stream: {}", e)))?;
        let content_id = doc.add_object(Stream::new(Dictionary::new(), content));

        let resources = Dictionary::from_iter([
            (
                "Font",
                Object::Dictionary(Dictionary::from_iter([(FONT_NAME, Object::Reference(font_id))])),
            ),
            (
                "XObject",
                Object::Dictionary(Dictionary::from_iter([(IMAGE_NAME, Object::Reference(image_id))])),
            ),
        ]);

        let page_id = doc.add_object(Dictionary::from_iter([
            ("Type", Object::Name(b"Page".to_vec())),
            ("Parent", Object::Reference(pages_id)),
            (
                "MediaBox",
                Object::Array(vec![
                    0.into(),
                    0.into(),
                    layout.page_width.into(),
                    layout.page_height.into(),
                ]),
            ),
            ("Contents", Object::Reference(content_id)),
            ("Resources", Object::Dictionary(resources)),
        ]));

        doc.objects.insert(
            pages_id,
            Object::Dictionary(Dictionary::from_iter([
                ("Type", Object::Name(b"Pages".to_vec())),
                ("Kids", Object::Array(vec![Object::Reference(page_id)])),
                ("Count", Object::Integer(1)),
            ])),
        );

        let catalog_id = doc.add_object(Dictionary::from_iter([
            ("Type", Object::Name(b"Catalog".to_vec())),
            ("Pages", Object::Reference(pages_id)),
        ]));
        doc.trailer.set("Root", Object::Reference(catalog_id));
        doc.compress();

        let mut pdf = Vec::new();
        doc.save_to(&mut pdf)
            .map_err(|e| pdf_error(format!("save: {}", e)))?;

        Ok(LabelPage {
            code: code.clone(),
            layout,
            pdf,
        })
    }
}

fn page_content(code: &Code, layout: &LabelLayout) -> Content {
    let image = &layout.image;
    let mut operations = vec![
        Operation::new("q", vec![]),
        Operation::new(
            "cm",
            vec![
                image.width.into(),
                0.into(),
                0.into(),
                image.height.into(),
                image.x.into(),
                image.y.into(),
            ],
        ),
        Operation::new("Do", vec![IMAGE_NAME.into()]),
        Operation::new("Q", vec![]),
    ];

    if let Some(caption) = &layout.caption {
        operations.extend([
            Operation::new("BT", vec![]),
            Operation::new("g", vec![0.into()]),
            Operation::new("Tf", vec![FONT_NAME.into(), caption.font_size.into()]),
            Operation::new("Td", vec![caption.x.into(), caption.y.into()]),
            Operation::new("Tj", vec![Object::string_literal(code.as_str())]),
            Operation::new("ET", vec![]),
        ]);
    }

    Content { operations }
}
