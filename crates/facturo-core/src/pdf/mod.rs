//! PDF serialization of laid-out documents.

mod writer;

pub use writer::{encode_win_ansi, PdfWriter};

use crate::error::RenderError;
use crate::render::Document;

/// Result type for PDF operations.
pub type Result<T> = std::result::Result<T, RenderError>;

/// Serialize a document with default writer settings.
pub fn to_pdf_bytes(document: &Document) -> Result<Vec<u8>> {
    PdfWriter::new().write(document)
}
