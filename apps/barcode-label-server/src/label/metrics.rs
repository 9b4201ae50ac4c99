//! Helvetica advance widths (standard 14 font AFM, 1/1000 em)

// Printable ASCII 0x20..=0x7E
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // ' '..'/'
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556, // '0'..'?'
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778, // '@'..'O'
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556, // 'P'..'_'
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556, // '`'..'o'
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584, // 'p'..'~'
];

// Used for anything outside the table
const DEFAULT_WIDTH: u16 = 556;

/// Rendered width of `text` in Helvetica at `font_size` points
pub fn helvetica_text_width(text: &str, font_size: f32) -> f32 {
    let units: u32 = text
        .chars()
        .map(|c| {
            let index = (c as u32).wrapping_sub(0x20) as usize;
            HELVETICA_WIDTHS.get(index).copied().unwrap_or(DEFAULT_WIDTH) as u32
        })
        .sum();
    units as f32 * font_size / 1000.0
}
