//! Code-128 encoding into a grayscale raster

use barcoders::sym::code128::Code128;
use image::{GrayImage, Luma};

use crate::codes::Code;
use crate::error::RenderError;

use super::geometry::POINTS_PER_MM;

/// Pixels per barcode module
pub const MODULE_SCALE: u32 = 3;

/// Nominal bar height before scaling, in millimeters at 72 dpi
pub const BAR_HEIGHT_MM: f32 = 10.0;

// Code-128 start characters understood by barcoders
const START_SET_B: char = '\u{0181}';
const START_SET_C: char = '\u{0106}';

const BAR: Luma<u8> = Luma([0]);
const SPACE: Luma<u8> = Luma([255]);

/// Rendered barcode, one byte per pixel (0 = bar, 255 = space)
#[derive(Debug, Clone)]
pub struct BarcodeRaster {
    image: GrayImage,
}

impl BarcodeRaster {
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Raw DeviceGray samples, row-major
    pub fn samples(&self) -> &[u8] {
        self.image.as_raw()
    }

    pub fn into_samples(self) -> Vec<u8> {
        self.image.into_raw()
    }
}

/// Encode a code as a Code-128 raster at the fixed module scale.
///
/// Even-length all-digit codes of four or more digits use set C (two digits
/// per symbol); everything else uses set B. Only printable ASCII is accepted.
pub fn encode_code128(code: &Code) -> Result<BarcodeRaster, RenderError> {
    let text = code.as_str();
    let fail = |reason: String| RenderError::Encode {
        code: text.to_string(),
        reason,
    };

    if text.is_empty() {
        return Err(fail("empty code".to_string()));
    }
    if let Some(c) = text.chars().find(|c| !(' '..='~').contains(c)) {
        return Err(fail(format!("unsupported character {:?}", c)));
    }

    let start = if use_set_c(text) { START_SET_C } else { START_SET_B };
    let symbol = Code128::new(format!("{}{}", start, text)).map_err(|e| fail(e.to_string()))?;
    let modules = symbol.encode();
    if modules.is_empty() {
        return Err(fail("encoder produced no modules".to_string()));
    }

    let width = modules.len() as u32 * MODULE_SCALE;
    let height = bar_height_px();
    let image = GrayImage::from_fn(width, height, |x, _| {
        if modules[(x / MODULE_SCALE) as usize] == 1 {
            BAR
        } else {
            SPACE
        }
    });

    Ok(BarcodeRaster { image })
}

fn use_set_c(text: &str) -> bool {
    text.len() >= 4 && text.len() % 2 == 0 && text.bytes().all(|b| b.is_ascii_digit())
}

fn bar_height_px() -> u32 {
    (BAR_HEIGHT_MM * POINTS_PER_MM * MODULE_SCALE as f32).round() as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    // start + check + stop, in modules
    const FRAME_MODULES: u32 = 11 + 11 + 13;

    #[test]
    fn test_bar_height() {
        assert_eq!(bar_height_px(), 85);
    }

    #[test]
    fn test_raster_dimensions() {
        let raster = encode_code128(&Code::new("ABC")).unwrap();
        assert_eq!(raster.height(), 85);
        assert_eq!(raster.width(), (FRAME_MODULES + 3 * 11) * MODULE_SCALE);
        assert_eq!(raster.samples().len(), (raster.width() * raster.height()) as usize);
    }

    #[test]
    fn test_numeric_codes_use_set_c() {
        assert!(use_set_c("123456789012"));
        assert!(!use_set_c("12345"));
        assert!(!use_set_c("12"));
        assert!(!use_set_c("12AB"));

        let raster = encode_code128(&Code::new("123456789012")).unwrap();
        assert_eq!(raster.width(), (FRAME_MODULES + 6 * 11) * MODULE_SCALE);
    }

    #[test]
    fn test_raster_starts_with_bar_and_is_binary() {
        let raster = encode_code128(&Code::new("A")).unwrap();
        let samples = raster.samples();
        assert_eq!(samples[0], 0);
        assert!(samples.iter().all(|&p| p == 0 || p == 255));
    }

    #[test]
    fn test_rejects_unencodable_codes() {
        for bad in ["", "ÄBC", "tab\there", "snow☃"] {
            let err = encode_code128(&Code::new(bad)).unwrap_err();
            assert_eq!(err.code(), bad);
        }
    }

    #[test]
    fn test_deterministic() {
        let a = encode_code128(&Code::new("LABEL-42")).unwrap();
        let b = encode_code128(&Code::new("LABEL-42")).unwrap();
        assert_eq!(a.samples(), b.samples());
    }
}
