//! Lootscan OCR crate - OCR engine trait and implementations.
//!
//! Provides the OcrService trait for turning a screenshot into recognized
//! text fragments, a MockOcrService for testing, and a TesseractOcrService
//! that drives Tesseract through `rusty_tesseract`.

pub mod tesseract;

use lootscan_core::error::LootscanError;
use lootscan_core::types::OcrFragment;

pub use tesseract::{OcrConfig, TesseractOcrService};

/// Service for extracting text from screenshot images.
///
/// Implementations wrap an OCR engine behind a uniform async interface.
pub trait OcrService: Send + Sync {
    /// Extract text fragments from an encoded image.
    ///
    /// # Arguments
    /// * `image_data` - Encoded image bytes (PNG).
    ///
    /// # Returns
    /// Recognized fragments in reading order. May be empty if no text is
    /// detected.
    fn extract_text(
        &self,
        image_data: &[u8],
    ) -> impl std::future::Future<Output = Result<Vec<OcrFragment>, LootscanError>> + Send;
}

/// Mock OCR service for testing.
///
/// Returns the same fragments for any non-empty input.
#[derive(Debug, Clone, Default)]
pub struct MockOcrService {
    fragments: Vec<OcrFragment>,
}

impl MockOcrService {
    /// Mock that recognizes each line with full confidence.
    pub fn with_lines(lines: &[&str]) -> Self {
        Self {
            fragments: lines.iter().map(|l| OcrFragment::new(*l, 1.0)).collect(),
        }
    }

    /// Mock that returns the given fragments verbatim.
    pub fn with_fragments(fragments: Vec<OcrFragment>) -> Self {
        Self { fragments }
    }

    /// Mock that finds no text.
    pub fn empty() -> Self {
        Self::default()
    }
}

impl OcrService for MockOcrService {
    async fn extract_text(&self, image_data: &[u8]) -> Result<Vec<OcrFragment>, LootscanError> {
        if image_data.is_empty() {
            return Err(LootscanError::Ocr("Empty image data".to_string()));
        }
        Ok(self.fragments.clone())
    }
}
