//! PDF backends
//!
//! A backend turns an HTML page into a complete PDF document. Backends are
//! synchronous and CPU-bound; the exporter runs them on the blocking pool.

use mupdf::Document;

use super::RenderError;

/// A4 in points (72 points = 1 inch)
const A4_WIDTH: f32 = 595.0;
const A4_HEIGHT: f32 = 842.0;
/// Base font size in points
const FONT_SIZE: f32 = 11.0;

pub trait PdfBackend: Send + Sync {
    fn render(&self, html: &str) -> Result<Vec<u8>, RenderError>;
}

/// MuPDF HTML layout engine
///
/// Opens a fresh document per call; MuPDF documents are not shared across
/// threads.
#[derive(Debug, Clone, Copy, Default)]
pub struct MupdfBackend;

impl PdfBackend for MupdfBackend {
    fn render(&self, html: &str) -> Result<Vec<u8>, RenderError> {
        let mut document = Document::from_bytes(html.as_bytes(), "text/html")?;
        document.layout(A4_WIDTH, A4_HEIGHT, FONT_SIZE)?;

        let pdf = document.convert_to_pdf(0, -1, 0)?;
        let mut bytes = Vec::new();
        pdf.write_to(&mut bytes)?;

        if bytes.is_empty() {
            return Err(RenderError::Backend("renderer produced no output".to_string()));
        }
        Ok(bytes)
    }
}
