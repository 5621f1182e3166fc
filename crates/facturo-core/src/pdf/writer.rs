//! Single-page PDF writer built on lopdf.

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Object, StringFormat, Stream};
use tracing::trace;

use super::Result;
use crate::render::{Document, DrawOp, Font};

const FONTS: [Font; 2] = [Font::Helvetica, Font::HelveticaBold];

/// Turns a [`Document`] into PDF bytes.
///
/// Text is set in the standard Type1 faces with WinAnsi encoding, so no font
/// data is embedded.
#[derive(Debug, Clone)]
pub struct PdfWriter {
    version: &'static str,
    producer: String,
}

impl Default for PdfWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl PdfWriter {
    pub fn new() -> Self {
        Self {
            version: "1.4",
            producer: format!("facturo {}", env!("CARGO_PKG_VERSION")),
        }
    }

    /// Serialize the document as a one-page PDF.
    pub fn write(&self, document: &Document) -> Result<Vec<u8>> {
        let mut pdf = lopdf::Document::with_version(self.version);
        let pages_id = pdf.new_object_id();

        let mut fonts = lopdf::Dictionary::new();
        for font in FONTS {
            let font_id = pdf.add_object(dictionary! {
                "Type" => "Font",
                "Subtype" => "Type1",
                "BaseFont" => font.base_name(),
                "Encoding" => "WinAnsiEncoding",
            });
            fonts.set(font.resource_name(), font_id);
        }
        let resources_id = pdf.add_object(dictionary! { "Font" => fonts });

        let content = Content {
            operations: content_operations(document),
        };
        trace!("{} content operations", content.operations.len());
        let content_id = pdf.add_object(Stream::new(lopdf::Dictionary::new(), content.encode()?));

        let page_id = pdf.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });

        pdf.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => vec![page_id.into()],
                "Count" => 1,
                "Resources" => resources_id,
                "MediaBox" => vec![
                    0.into(),
                    0.into(),
                    document.width().into(),
                    document.height().into(),
                ],
            }),
        );

        let catalog_id = pdf.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        pdf.trailer.set("Root", catalog_id);

        let info_id = pdf.add_object(dictionary! {
            "Title" => Object::String(encode_win_ansi(document.title()), StringFormat::Literal),
            "Producer" => Object::string_literal(self.producer.as_str()),
        });
        pdf.trailer.set("Info", info_id);

        let mut bytes = Vec::new();
        pdf.save_to(&mut bytes)?;
        Ok(bytes)
    }
}

fn content_operations(document: &Document) -> Vec<Operation> {
    let mut ops = Vec::with_capacity(document.ops().len() * 5);

    for op in document.ops() {
        match op {
            DrawOp::Text {
                x,
                y,
                font,
                size,
                text,
            } => {
                ops.push(Operation::new("BT", vec![]));
                ops.push(Operation::new(
                    "Tf",
                    vec![font.resource_name().into(), (*size).into()],
                ));
                ops.push(Operation::new("Td", vec![(*x).into(), (*y).into()]));
                ops.push(Operation::new(
                    "Tj",
                    vec![Object::String(encode_win_ansi(text), StringFormat::Literal)],
                ));
                ops.push(Operation::new("ET", vec![]));
            }
            DrawOp::Line { x1, y1, x2, y2 } => {
                ops.push(Operation::new("m", vec![(*x1).into(), (*y1).into()]));
                ops.push(Operation::new("l", vec![(*x2).into(), (*y2).into()]));
                ops.push(Operation::new("S", vec![]));
            }
            DrawOp::Rect {
                x,
                y,
                width,
                height,
                fill,
            } => {
                let rect = vec![(*x).into(), (*y).into(), (*width).into(), (*height).into()];
                match fill {
                    Some(gray) => {
                        ops.push(Operation::new("q", vec![]));
                        ops.push(Operation::new("g", vec![(*gray).into()]));
                        ops.push(Operation::new("re", rect));
                        ops.push(Operation::new("B", vec![]));
                        ops.push(Operation::new("Q", vec![]));
                    }
                    None => {
                        ops.push(Operation::new("re", rect));
                        ops.push(Operation::new("S", vec![]));
                    }
                }
            }
        }
    }

    ops
}

/// Encode text for a WinAnsiEncoding font.
///
/// Latin-1 maps directly; the Windows-1252 extras (€, curly quotes, œ, …)
/// use their 0x80..0x9F slots. Anything else becomes `?`.
pub fn encode_win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|ch| match ch {
            '\u{20}'..='\u{7e}' | '\u{a0}'..='\u{ff}' => ch as u8,
            '€' => 0x80,
            '‚' => 0x82,
            'ƒ' => 0x83,
            '„' => 0x84,
            '…' => 0x85,
            '†' => 0x86,
            '‡' => 0x87,
            'ˆ' => 0x88,
            '‰' => 0x89,
            'Š' => 0x8a,
            '‹' => 0x8b,
            'Œ' => 0x8c,
            'Ž' => 0x8e,
            '‘' => 0x91,
            '’' => 0x92,
            '“' => 0x93,
            '”' => 0x94,
            '•' => 0x95,
            '–' => 0x96,
            '—' => 0x97,
            '˜' => 0x98,
            '™' => 0x99,
            'š' => 0x9a,
            '›' => 0x9b,
            'œ' => 0x9c,
            'ž' => 0x9e,
            'Ÿ' => 0x9f,
            _ => b'?',
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::record::InvoiceRecord;
    use crate::models::schema::{fields, LayoutVariant};
    use crate::render::InvoiceRenderer;
    use crate::sheet::Cell;

    fn summary_document() -> Document {
        let values = LayoutVariant::Summary
            .schema()
            .fields()
            .iter()
            .map(|field| {
                let cell = match *field {
                    fields::INVOICE_NUMBER => Cell::from("F-9"),
                    fields::CLIENT => Cell::from("Société Générale"),
                    fields::DAYS => Cell::Number(2.0),
                    fields::TOTAL_HT | fields::TOTAL_TTC => Cell::Number(500.0),
                    _ => Cell::from("x"),
                };
                (*field, cell)
            })
            .collect();

        InvoiceRenderer::new(LayoutVariant::Summary)
            .render(&InvoiceRecord::new(2, values))
            .unwrap()
    }

    fn contains(haystack: &[u8], needle: &[u8]) -> bool {
        haystack.windows(needle.len()).any(|w| w == needle)
    }

    #[test]
    fn test_win_ansi_encoding() {
        assert_eq!(encode_win_ansi("Abc"), b"Abc".to_vec());
        assert_eq!(encode_win_ansi("é°"), vec![0xe9, 0xb0]);
        assert_eq!(encode_win_ansi("€’œ"), vec![0x80, 0x92, 0x9c]);
        assert_eq!(encode_win_ansi("ℓ"), vec![b'?']);
    }

    #[test]
    fn test_writes_single_page_pdf() {
        let bytes = to_bytes();
        assert!(bytes.starts_with(b"%PDF-1.4"));

        let pdf = lopdf::Document::load_mem(&bytes).unwrap();
        assert_eq!(pdf.get_pages().len(), 1);

        let info_id = pdf.trailer.get(b"Info").unwrap().as_reference().unwrap();
        let info = pdf.get_object(info_id).unwrap().as_dict().unwrap();
        assert_eq!(info.get(b"Title").unwrap().as_str().unwrap(), b"Facture F-9");
    }

    #[test]
    fn test_text_is_win_ansi_in_content() {
        let bytes = to_bytes();
        assert!(contains(&bytes, b"(FACTURE)"));
        assert!(contains(&bytes, &encode_win_ansi("Soci\u{e9}t\u{e9} G\u{e9}n\u{e9}rale.")));
        assert!(contains(&bytes, b"/Helvetica-Bold"));
    }

    fn to_bytes() -> Vec<u8> {
        PdfWriter::new().write(&summary_document()).unwrap()
    }
}
