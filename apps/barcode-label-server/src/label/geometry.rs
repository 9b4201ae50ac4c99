//! Label page geometry
//!
//! All values are PDF points with the origin at the bottom-left corner.

pub const POINTS_PER_MM: f32 = 2.83465;

/// Vertical room reserved for the caption when one is drawn
pub const CAPTION_ALLOWANCE_PT: f32 = 15.0;

/// Caption font size, Helvetica
pub const CAPTION_FONT_SIZE: f32 = 10.0;

pub fn mm_to_pt(mm: f32) -> f32 {
    mm * POINTS_PER_MM
}

/// Physical page dimensions
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LabelGeometry {
    pub width_mm: f32,
    pub height_mm: f32,
    pub margin_mm: f32,
}

impl Default for LabelGeometry {
    fn default() -> Self {
        Self {
            width_mm: 56.0,
            height_mm: 40.0,
            margin_mm: 3.0,
        }
    }
}

/// Where the barcode image is drawn
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImagePlacement {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub scale: f32,
}

/// Where the caption baseline starts
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CaptionPlacement {
    pub x: f32,
    pub y: f32,
    pub font_size: f32,
}

/// Complete placement for one label page
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LabelLayout {
    pub page_width: f32,
    pub page_height: f32,
    pub image: ImagePlacement,
    pub caption: Option<CaptionPlacement>,
}

impl LabelGeometry {
    pub fn page_width(&self) -> f32 {
        mm_to_pt(self.width_mm)
    }

    pub fn page_height(&self) -> f32 {
        mm_to_pt(self.height_mm)
    }

    pub fn margin(&self) -> f32 {
        mm_to_pt(self.margin_mm)
    }

    /// Fit an `image_width` x `image_height` raster onto the page.
    ///
    /// The image keeps its aspect ratio and takes the largest scale that fits
    /// the printable area, centered horizontally and hung from the top. With
    /// `caption_width` (the caption's rendered width in points) the printable
    /// height loses [`CAPTION_ALLOWANCE_PT`] and the caption is centered on the
    /// bottom margin.
    pub fn layout(&self, image_width: u32, image_height: u32, caption_width: Option<f32>) -> LabelLayout {
        let page_width = self.page_width();
        let page_height = self.page_height();
        let margin = self.margin();
        let allowance = if caption_width.is_some() {
            CAPTION_ALLOWANCE_PT
        } else {
            0.0
        };

        let max_width = page_width - 2.0 * margin;
        let max_height = page_height - 2.0 * margin - allowance;
        let scale = (max_width / image_width as f32).min(max_height / image_height as f32);
        let width = image_width as f32 * scale;
        let height = image_height as f32 * scale;

        let image = ImagePlacement {
            x: (page_width - width) / 2.0,
            y: page_height - height - margin - allowance,
            width,
            height,
            scale,
        };

        let caption = caption_width.map(|text_width| CaptionPlacement {
            x: (page_width - text_width) / 2.0,
            y: margin,
            font_size: CAPTION_FONT_SIZE,
        });

        LabelLayout {
            page_width,
            page_height,
            image,
            caption,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-3;

    #[test]
    fn test_page_size_in_points() {
        let geometry = LabelGeometry::default();
        assert!((geometry.page_width() - 158.7404).abs() < EPS);
        assert!((geometry.page_height() - 113.386).abs() < EPS);
        assert!((geometry.margin() - 8.50395).abs() < EPS);
    }

    #[test]
    fn test_wide_image_is_width_bound_and_centered() {
        let geometry = LabelGeometry::default();
        let layout = geometry.layout(303, 85, Some(60.0));
        let max_width = geometry.page_width() - 2.0 * geometry.margin();

        assert!((layout.image.width - max_width).abs() < EPS);
        assert!((layout.image.x - geometry.margin()).abs() < EPS);
        assert!((layout.image.height / layout.image.width - 85.0 / 303.0).abs() < EPS);

        let expected_y = geometry.page_height() - layout.image.height - geometry.margin() - 15.0;
        assert!((layout.image.y - expected_y).abs() < EPS);
    }

    #[test]
    fn test_tall_image_is_height_bound() {
        let geometry = LabelGeometry::default();
        let layout = geometry.layout(10, 1000, None);
        let max_height = geometry.page_height() - 2.0 * geometry.margin();

        assert!((layout.image.height - max_height).abs() < EPS);
        assert!((layout.image.y - geometry.margin()).abs() < EPS);
        assert!(layout.caption.is_none());
    }

    #[test]
    fn test_image_stays_inside_printable_area() {
        let geometry = LabelGeometry::default();
        let margin = geometry.margin();
        for (w, h) in [(99, 85), (303, 85), (1200, 85), (40, 400), (1, 1)] {
            for caption in [None, Some(30.0)] {
                let layout = geometry.layout(w, h, caption);
                let bottom_limit = margin + if caption.is_some() { 15.0 } else { 0.0 };
                assert!(layout.image.x >= margin - EPS);
                assert!(layout.image.x + layout.image.width <= layout.page_width - margin + EPS);
                assert!(layout.image.y + layout.image.height <= layout.page_height - margin + EPS);
                assert!(layout.image.height <= layout.page_height - margin - bottom_limit + EPS);
            }
        }
    }

    #[test]
    fn test_caption_centered_on_bottom_margin() {
        let geometry = LabelGeometry::default();
        let layout = geometry.layout(303, 85, Some(66.72));
        let caption = layout.caption.unwrap();

        assert!((caption.x + 66.72 / 2.0 - geometry.page_width() / 2.0).abs() < EPS);
        assert!((caption.y - geometry.margin()).abs() < EPS);
        assert_eq!(caption.font_size, 10.0);
    }

    #[test]
    fn test_layout_is_deterministic() {
        let geometry = LabelGeometry::default();
        assert_eq!(
            geometry.layout(303, 85, Some(55.6)),
            geometry.layout(303, 85, Some(55.6))
        );
    }
}
