//! PDF rendering for text documents
//!
//! Lays out lines of Helvetica text top to bottom on US Letter pages and
//! hands them to `printpdf`, which serializes the document. A line that
//! would cross the bottom margin starts a new page.

use crate::types::LedgerError;
use printpdf::{BuiltinFont, Mm, PdfDocument, Pt};

const PAGE_WIDTH: f32 = 612.0;
const PAGE_HEIGHT: f32 = 792.0;
const MARGIN: f32 = 72.0;
const LEADING: f32 = 1.2;
const LAYER: &str = "Text";

/// One line of text in the document
#[derive(Debug, Clone, PartialEq)]
pub struct TextLine {
    pub text: String,
    /// Font size in points
    pub size: f32,
}

impl TextLine {
    pub fn new(text: impl Into<String>, size: f32) -> Self {
        Self {
            text: text.into(),
            size,
        }
    }

    /// Vertical space without text
    pub fn blank(size: f32) -> Self {
        Self::new(String::new(), size)
    }
}

/// A line with its baseline, in points from the bottom of the page
#[derive(Debug, Clone, Copy, PartialEq)]
struct Placed<'a> {
    line: &'a TextLine,
    baseline: f32,
}

/// Render lines into a complete PDF file
///
/// An empty input still yields one blank page.
///
/// # Errors
///
/// Returns `ExportError` if `printpdf` cannot load the font or write the file.
pub fn render_pdf(title: &str, lines: &[TextLine]) -> Result<Vec<u8>, LedgerError> {
    let pages = paginate(lines);

    let (doc, first_page, first_layer) =
        PdfDocument::new(title, page_dimension(PAGE_WIDTH), page_dimension(PAGE_HEIGHT), LAYER);
    let font = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| LedgerError::export(format!("Failed to load PDF font: {}", e)))?;

    for (index, page) in pages.iter().enumerate() {
        let (page_index, layer_index) = if index == 0 {
            (first_page, first_layer)
        } else {
            doc.add_page(page_dimension(PAGE_WIDTH), page_dimension(PAGE_HEIGHT), LAYER)
        };
        let layer = doc.get_page(page_index).get_layer(layer_index);

        for placed in page {
            layer.use_text(
                placed.line.text.as_str(),
                placed.line.size,
                page_dimension(MARGIN),
                page_dimension(placed.baseline),
                &font,
            );
        }
    }

    doc.save_to_bytes()
        .map_err(|e| LedgerError::export(format!("Failed to write PDF: {}", e)))
}

fn page_dimension(points: f32) -> Mm {
    Mm::from(Pt(points))
}

fn paginate(lines: &[TextLine]) -> Vec<Vec<Placed<'_>>> {
    let mut pages = vec![Vec::new()];
    let mut baseline = PAGE_HEIGHT - MARGIN;

    for line in lines {
        let advance = line.size * LEADING;
        if baseline - advance < MARGIN {
            pages.push(Vec::new());
            baseline = PAGE_HEIGHT - MARGIN;
        }
        baseline -= advance;

        if line.text.is_empty() {
            continue;
        }
        if let Some(page) = pages.last_mut() {
            page.push(Placed { line, baseline });
        }
    }

    pages
}
