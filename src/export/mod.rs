//! PDF Export Module
//!
//! Renders a stored essay into a downloadable PDF: the essay is laid out as an
//! HTML page with both texts escaped, then converted by a [`PdfBackend`]
//! (MuPDF by default) on the blocking thread pool under a timeout.

mod backend;
mod html;

use std::sync::Arc;

use thiserror::Error;
use tokio::time::{timeout, Duration};

pub use backend::{MupdfBackend, PdfBackend};
pub use html::essay_html;

use crate::db::Essay;

/// PDF rendering errors. No partial document is ever returned.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("PDF backend error: {0}")]
    Backend(String),

    #[error("PDF rendering timed out after {0} seconds")]
    Timeout(u64),

    #[error("Task join error: {0}")]
    Join(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<mupdf::Error> for RenderError {
    fn from(err: mupdf::Error) -> Self {
        RenderError::Backend(err.to_string())
    }
}

/// Download name of an exported essay
pub fn file_name(essay_id: i64) -> String {
    format!("essay_{}.pdf", essay_id)
}

#[derive(Clone)]
pub struct PdfExporter {
    backend: Arc<dyn PdfBackend>,
    timeout_secs: u64,
}

impl PdfExporter {
    pub fn new(backend: Arc<dyn PdfBackend>, timeout_secs: u64) -> Self {
        Self {
            backend,
            timeout_secs,
        }
    }

    pub fn mupdf(timeout_secs: u64) -> Self {
        Self::new(Arc::new(MupdfBackend), timeout_secs)
    }

    /// Render `essay` into a complete PDF document
    pub async fn render_pdf(&self, essay: &Essay) -> Result<Vec<u8>, RenderError> {
        let html = essay_html(essay);
        let backend = Arc::clone(&self.backend);

        // Offload CPU-bound layout to the blocking thread pool
        let result = timeout(
            Duration::from_secs(self.timeout_secs),
            tokio::task::spawn_blocking(move || backend.render(&html)),
        )
        .await;

        match result {
            Ok(join_result) => join_result.map_err(|e| RenderError::Join(e.to_string()))?,
            Err(_) => Err(RenderError::Timeout(self.timeout_secs)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct SlowBackend;

    impl PdfBackend for SlowBackend {
        fn render(&self, _html: &str) -> Result<Vec<u8>, RenderError> {
            std::thread::sleep(std::time::Duration::from_millis(1_500));
            Ok(b"%PDF-late".to_vec())
        }
    }

    struct FailingBackend;

    impl PdfBackend for FailingBackend {
        fn render(&self, _html: &str) -> Result<Vec<u8>, RenderError> {
            Err(RenderError::Backend("font subsystem unavailable".to_string()))
        }
    }

    fn essay() -> Essay {
        Essay {
            id: 3,
            original_text: "text".to_string(),
            corrected_text: "text".to_string(),
            timestamp: "2026-10-17T12:00:00.000000Z".to_string(),
            word_count: 1,
            paragraph_count: 1,
            backspace_count: 0,
        }
    }

    #[test]
    fn test_file_name() {
        assert_eq!(file_name(42), "essay_42.pdf");
    }

    #[tokio::test]
    async fn test_render_times_out() {
        let exporter = PdfExporter::new(Arc::new(SlowBackend), 1);
        let result = exporter.render_pdf(&essay()).await;
        assert!(matches!(result, Err(RenderError::Timeout(1))));
    }

    #[tokio::test]
    async fn test_backend_failure_is_surfaced() {
        let exporter = PdfExporter::new(Arc::new(FailingBackend), 5);
        let result = exporter.render_pdf(&essay()).await;
        assert!(matches!(result, Err(RenderError::Backend(_))));
    }
}
