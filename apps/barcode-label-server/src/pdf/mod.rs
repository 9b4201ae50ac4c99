//! PDF document handling
//!
//! - `merge`: concatenate label pages into one document (lopdf)
//! - `decode`: recover barcode text from an uploaded PDF (MuPDF + rxing)

mod decode;
mod merge;

pub use decode::{decode_pdf, ACCEPTED_FORMATS, DECODE_SCALE};
pub use merge::{merge_documents, MergedDocument};
