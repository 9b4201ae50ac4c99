//! Label rendering
//!
//! One code in, one single-page PDF out:
//!
//! 1. `barcode` encodes the code as a Code-128 raster
//! 2. `geometry` fits the raster onto a 56x40 mm page
//! 3. `renderer` writes the page, image and caption with lopdf
//!
//! Layout is pure arithmetic over fixed constants, so the same code always
//! lands at the same scale and position.

mod barcode;
mod geometry;
mod metrics;
mod renderer;

pub use barcode::{encode_code128, BarcodeRaster, BAR_HEIGHT_MM, MODULE_SCALE};
pub use geometry::{
    mm_to_pt, CaptionPlacement, ImagePlacement, LabelGeometry, LabelLayout,
    CAPTION_ALLOWANCE_PT, CAPTION_FONT_SIZE, POINTS_PER_MM,
};
pub use metrics::helvetica_text_width;
pub use renderer::{LabelPage, LabelRenderer};
