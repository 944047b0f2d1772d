//! OCR via Tesseract, driven through `rusty_tesseract`.
//!
//! The image is written to a temporary PNG and `image_to_data` runs on a
//! blocking thread. Its word rows are grouped back into lines; line
//! confidence is the mean of the word confidences, scaled to 0.0..=1.0.

use std::collections::HashMap;
use std::io::Write;

use rusty_tesseract::{Args, Data, Image};
use tracing::{debug, error, info};

use lootscan_core::error::LootscanError;
use lootscan_core::types::OcrFragment;

use crate::OcrService;

/// Tesseract reports one row per page, block, paragraph, line and word.
const WORD_LEVEL: i32 = 5;

/// Configuration for the Tesseract OCR service.
#[derive(Debug, Clone)]
pub struct OcrConfig {
    /// Tesseract language code (e.g. "eng").
    pub language: String,
    /// Page segmentation mode; `None` keeps the rusty-tesseract default.
    pub psm: Option<i32>,
    /// Requested GPU acceleration. Tesseract runs on the CPU only.
    pub use_gpu: bool,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            language: "eng".to_string(),
            psm: None,
            use_gpu: true,
        }
    }
}

impl OcrConfig {
    fn args(&self) -> Args {
        let defaults = Args::default();
        Args {
            lang: self.language.clone(),
            psm: self.psm.or(defaults.psm),
            ..defaults
        }
    }
}

/// OCR service backed by Tesseract.
#[derive(Debug, Clone)]
pub struct TesseractOcrService {
    config: OcrConfig,
}

impl TesseractOcrService {
    /// Create a new service with the given configuration.
    pub fn new(config: OcrConfig) -> Self {
        info!(
            language = %config.language,
            use_gpu = config.use_gpu,
            "OCR reader initialized"
        );
        if config.use_gpu {
            debug!("Tesseract has no GPU backend, running on CPU");
        }
        Self { config }
    }

    pub fn config(&self) -> &OcrConfig {
        &self.config
    }
}

impl OcrService for TesseractOcrService {
    async fn extract_text(&self, image_data: &[u8]) -> Result<Vec<OcrFragment>, LootscanError> {
        if image_data.is_empty() {
            return Err(LootscanError::Ocr("Empty image data".into()));
        }

        let data = image_data.to_vec();
        let args = self.config.args();

        // Tesseract runs as a child process and reads the image from disk.
        tokio::task::spawn_blocking(move || run_tesseract(&data, &args))
            .await
            .map_err(|e| LootscanError::Ocr(format!("OCR task panicked: {}", e)))?
    }
}

fn run_tesseract(data: &[u8], args: &Args) -> Result<Vec<OcrFragment>, LootscanError> {
    let mut file = tempfile::Builder::new()
        .prefix("lootscan-ocr-")
        .suffix(".png")
        .tempfile()
        .map_err(|e| LootscanError::Ocr(format!("Failed to create temp image: {}", e)))?;
    file.write_all(data)
        .map_err(|e| LootscanError::Ocr(format!("Failed to write temp image: {}", e)))?;

    debug!(path = %file.path().display(), bytes = data.len(), lang = %args.lang, "Running tesseract");

    let image = Image::from_path(file.path())
        .map_err(|e| LootscanError::Ocr(format!("Failed to open temp image: {}", e)))?;
    let output = rusty_tesseract::image_to_data(&image, args).map_err(|e| {
        error!(error = %e, "Text extraction failed");
        LootscanError::Ocr(format!("Text extraction failed: {}", e))
    })?;

    let fragments = group_lines(&output.data);
    debug!(words = output.data.len(), lines = fragments.len(), "Tesseract output parsed");
    Ok(fragments)
}

/// Group Tesseract word rows into line fragments.
///
/// Rows that are not words, carry a negative confidence, or have blank text
/// are skipped. Lines keep the order they first appear in.
pub fn group_lines(rows: &[Data]) -> Vec<OcrFragment> {
    let mut lines: Vec<(Vec<&str>, Vec<f32>)> = Vec::new();
    let mut index: HashMap<(i32, i32, i32, i32), usize> = HashMap::new();

    for row in rows {
        let text = row.text.trim();
        if row.level != WORD_LEVEL || row.conf < 0.0 || text.is_empty() {
            continue;
        }
        let key = (row.page_num, row.block_num, row.par_num, row.line_num);
        let i = *index.entry(key).or_insert_with(|| {
            lines.push((Vec::new(), Vec::new()));
            lines.len() - 1
        });
        lines[i].0.push(text);
        lines[i].1.push(row.conf);
    }

    lines
        .into_iter()
        .map(|(words, confs)| {
            let mean = confs.iter().sum::<f32>() / confs.len() as f32;
            OcrFragment::new(words.join(" "), (mean / 100.0).clamp(0.0, 1.0))
        })
        .collect()
}
