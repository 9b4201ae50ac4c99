//! Best-effort barcode recognition on uploaded PDFs
//!
//! Each page is rendered with MuPDF and scanned with rxing. Pages without a
//! recognizable symbol are skipped, so the result can be shorter than the
//! page count. Nothing here returns an error: failures are logged and the
//! codes found so far are kept.

use std::collections::HashSet;

use mupdf::{Colorspace, Document, Matrix};
use rxing::{BarcodeFormat, DecodeHintType, DecodeHintValue, DecodingHintDictionary};

/// Render scale applied to each page before scanning
pub const DECODE_SCALE: f32 = 2.0;

/// Symbologies reported back to the caller
pub const ACCEPTED_FORMATS: [BarcodeFormat; 3] = [
    BarcodeFormat::DATA_MATRIX,
    BarcodeFormat::EAN_13,
    BarcodeFormat::CODE_128,
];

/// A rendered page as 8-bit luminance
struct LumaPage {
    samples: Vec<u8>,
    width: u32,
    height: u32,
}

/// Decode one barcode per page, in page order.
pub fn decode_pdf(bytes: &[u8]) -> Vec<String> {
    let doc = match Document::from_bytes(bytes, "application/pdf") {
        Ok(doc) => doc,
        Err(e) => {
            tracing::warn!("Could not open PDF for decoding: {}", e);
            return Vec::new();
        }
    };

    let page_count = match doc.page_count() {
        Ok(count) => count,
        Err(e) => {
            tracing::warn!("Could not count PDF pages: {}", e);
            return Vec::new();
        }
    };

    let mut decoded = Vec::new();
    for index in 0..page_count {
        let page = match render_page(&doc, index) {
            Ok(page) => page,
            Err(e) => {
                tracing::warn!(page = index + 1, "Could not render page: {}", e);
                continue;
            }
        };

        match scan_luma(page) {
            Some(text) => {
                tracing::debug!(page = index + 1, code = %text, "Decoded barcode");
                decoded.push(text);
            }
            None => tracing::warn!(page = index + 1, "No barcode recognized"),
        }
    }

    decoded
}

fn render_page(doc: &Document, index: i32) -> Result<LumaPage, mupdf::Error> {
    let page = doc.load_page(index)?;
    let matrix = Matrix::new_scale(DECODE_SCALE, DECODE_SCALE);
    let pixmap = page.to_pixmap(&matrix, &Colorspace::device_gray(), false, false)?;
    Ok(pixmap_to_luma(&pixmap))
}

fn pixmap_to_luma(pixmap: &mupdf::Pixmap) -> LumaPage {
    let width = pixmap.width() as u32;
    let height = pixmap.height() as u32;
    let samples = pixmap.samples();
    let n = (pixmap.n() as usize).max(1);

    let mut luma = Vec::with_capacity((width * height) as usize);
    for y in 0..height as usize {
        for x in 0..width as usize {
            let offset = (y * width as usize + x) * n;
            let value = if n >= 3 {
                let r = samples.get(offset).copied().unwrap_or(255) as u32;
                let g = samples.get(offset + 1).copied().unwrap_or(255) as u32;
                let b = samples.get(offset + 2).copied().unwrap_or(255) as u32;
                ((r * 299 + g * 587 + b * 114) / 1000) as u8
            } else {
                samples.get(offset).copied().unwrap_or(255)
            };
            luma.push(value);
        }
    }

    LumaPage {
        samples: luma,
        width,
        height,
    }
}

fn scan_hints() -> DecodingHintDictionary {
    let formats: HashSet<BarcodeFormat> = ACCEPTED_FORMATS.into_iter().collect();
    DecodingHintDictionary::from([
        (
            DecodeHintType::POSSIBLE_FORMATS,
            DecodeHintValue::PossibleFormats(formats),
        ),
        (DecodeHintType::TRY_HARDER, DecodeHintValue::TryHarder(true)),
    ])
}

fn scan_luma(page: LumaPage) -> Option<String> {
    let mut hints = scan_hints();
    rxing::helpers::detect_in_luma_with_hints(
        page.samples,
        page.width,
        page.height,
        None,
        &mut hints,
    )
    .ok()
    .map(|result| result.getText().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codes::Code;
    use crate::label::LabelRenderer;
    use crate::pdf::merge_documents;

    fn labels_pdf(codes: &[&str]) -> Vec<u8> {
        let renderer = LabelRenderer::default();
        let pages: Vec<Vec<u8>> = codes
            .iter()
            .map(|c| renderer.render(&Code::new(*c)).unwrap().pdf)
            .collect();
        merge_documents(&pages).unwrap().bytes
    }

    #[test]
    fn test_decodes_rendered_labels_in_page_order() {
        let pdf = labels_pdf(&["123456789012", "ABC-42"]);
        assert_eq!(decode_pdf(&pdf), vec!["123456789012", "ABC-42"]);
    }

    #[test]
    fn test_decodes_wide_raster() {
        let raster = crate::label::encode_code128(&Code::new("ABC-42")).unwrap();
        let (width, height) = (raster.width(), raster.height());
        let pad = 100;
        let padded_width = width + 2 * pad;
        let mut samples = vec![255u8; (padded_width * height) as usize];
        let source = raster.into_samples();
        for y in 0..height {
            let from = (y * width) as usize;
            let to = (y * padded_width + pad) as usize;
            samples[to..to + width as usize].copy_from_slice(&source[from..from + width as usize]);
        }

        let page = LumaPage {
            samples,
            width: padded_width,
            height,
        };
        assert_eq!(scan_luma(page).as_deref(), Some("ABC-42"));
    }

    #[test]
    fn test_garbage_yields_empty() {
        assert!(decode_pdf(b"not a pdf at all").is_empty());
        assert!(decode_pdf(&[]).is_empty());
    }

    #[test]
    fn test_blank_page_yields_nothing() {
        let page = LumaPage {
            samples: vec![255; 64 * 64],
            width: 64,
            height: 64,
        };
        assert!(scan_luma(page).is_none());
    }
}
