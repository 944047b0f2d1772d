//! Lootscan capture crate - loading screenshots from disk or the clipboard.
//!
//! Provides the ImageSource enum naming where a screenshot comes from, the
//! LoadedImage wrapper that hands PNG bytes to the OCR collaborator, and
//! clipboard helpers for reading bitmaps and copying result text.

pub mod clipboard;

use std::io::Cursor;
use std::path::{Path, PathBuf};

use image::{DynamicImage, GenericImageView, ImageFormat};
use tracing::{debug, info};

use lootscan_core::error::{LootscanError, Result};

/// Label used for images that did not come from a file.
pub const CLIPBOARD_LABEL: &str = "Clipboard Image";

/// Where a screenshot is loaded from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSource {
    /// A local image file (png, jpg, gif, bmp, webp, ...).
    File(PathBuf),
    /// The bitmap currently on the system clipboard.
    Clipboard,
}

impl ImageSource {
    /// Human-readable label for status messages.
    pub fn label(&self) -> String {
        match self {
            ImageSource::File(path) => path.display().to_string(),
            ImageSource::Clipboard => CLIPBOARD_LABEL.to_string(),
        }
    }

    /// Load and decode the image.
    pub fn load(&self) -> Result<LoadedImage> {
        let image = match self {
            ImageSource::File(path) => decode_file(path)?,
            ImageSource::Clipboard => clipboard::read_image()?,
        };
        LoadedImage::new(self.label(), image)
    }
}

fn decode_file(path: &Path) -> Result<DynamicImage> {
    if !path.exists() {
        return Err(LootscanError::Capture(format!(
            "File not found: {}",
            path.display()
        )));
    }
    image::open(path)
        .map_err(|e| LootscanError::Capture(format!("{}: {}", path.display(), e)))
}

/// A decoded screenshot ready for OCR.
#[derive(Debug, Clone)]
pub struct LoadedImage {
    label: String,
    image: DynamicImage,
}

impl LoadedImage {
    /// Wrap a decoded image. Zero-sized images are rejected.
    pub fn new(label: impl Into<String>, image: DynamicImage) -> Result<Self> {
        let label = label.into();
        let (width, height) = image.dimensions();
        if width == 0 || height == 0 {
            return Err(LootscanError::Capture(format!("{label}: image is empty")));
        }
        info!(source = %label, width, height, "Image loaded");
        Ok(Self { label, image })
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    /// Encode the original image as PNG for the OCR engine.
    pub fn to_png_bytes(&self) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        self.image
            .write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
            .map_err(|e| LootscanError::Capture(format!("PNG encoding failed: {e}")))?;
        debug!(bytes = buf.len(), "Encoded image as PNG");
        Ok(buf)
    }

    /// Downscale to fit within `max_width` x `max_height`, keeping the aspect
    /// ratio. Images that already fit are returned unchanged.
    pub fn thumbnail(&self, max_width: u32, max_height: u32) -> DynamicImage {
        let (width, height) = self.image.dimensions();
        if width <= max_width && height <= max_height {
            return self.image.clone();
        }
        self.image.thumbnail(max_width, max_height)
    }

    /// Write a bounded preview to `path`; the format follows the extension.
    pub fn save_preview(&self, path: &Path, max_width: u32, max_height: u32) -> Result<()> {
        let preview = self.thumbnail(max_width, max_height);
        preview
            .save(path)
            .map_err(|e| LootscanError::Capture(format!("{}: {}", path.display(), e)))?;
        info!(path = %path.display(), width = preview.width(), height = preview.height(), "Preview saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    fn write_png(dir: &Path, name: &str, width: u32, height: u32) -> PathBuf {
        let path = dir.join(name);
        let img = RgbaImage::from_pixel(width, height, Rgba([200, 30, 30, 255]));
        img.save(&path).unwrap();
        path
    }

    #[test]
    fn test_load_png_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_png(dir.path(), "shot.png", 64, 32);

        let source = ImageSource::File(path.clone());
        let loaded = source.load().unwrap();
        assert_eq!(loaded.dimensions(), (64, 32));
        assert_eq!(loaded.label(), path.display().to_string());
    }

    #[test]
    fn test_missing_file_is_capture_error() {
        let source = ImageSource::File(PathBuf::from("/does/not/exist.png"));
        let err = source.load().unwrap_err();
        assert!(matches!(err, LootscanError::Capture(_)));
        assert!(err.to_string().contains("File not found"));
    }

    #[test]
    fn test_garbage_file_is_capture_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.png");
        std::fs::write(&path, b"definitely not a png").unwrap();

        let err = ImageSource::File(path).load().unwrap_err();
        assert!(matches!(err, LootscanError::Capture(_)));
    }

    #[test]
    fn test_clipboard_label() {
        assert_eq!(ImageSource::Clipboard.label(), "Clipboard Image");
    }

    #[test]
    fn test_zero_sized_image_rejected() {
        let img = DynamicImage::ImageRgba8(RgbaImage::new(0, 0));
        assert!(LoadedImage::new("empty", img).is_err());
    }

    #[test]
    fn test_png_bytes_decode_back() {
        let img = DynamicImage::ImageRgba8(RgbaImage::from_pixel(10, 12, Rgba([0, 0, 0, 255])));
        let loaded = LoadedImage::new("mem", img).unwrap();

        let bytes = loaded.to_png_bytes().unwrap();
        assert!(bytes.starts_with(&[0x89, b'P', b'N', b'G']));
        let decoded = image::load_from_memory(&bytes).unwrap();
        assert_eq!(decoded.dimensions(), (10, 12));
    }

    #[test]
    fn test_thumbnail_fits_bounds_and_keeps_aspect() {
        let img = DynamicImage::ImageRgba8(RgbaImage::new(1000, 500));
        let loaded = LoadedImage::new("big", img).unwrap();

        let thumb = loaded.thumbnail(500, 500);
        assert_eq!(thumb.dimensions(), (500, 250));
    }

    #[test]
    fn test_thumbnail_never_upscales() {
        let img = DynamicImage::ImageRgba8(RgbaImage::new(120, 80));
        let loaded = LoadedImage::new("small", img).unwrap();
        assert_eq!(loaded.thumbnail(500, 500).dimensions(), (120, 80));
    }

    #[test]
    fn test_save_preview() {
        let dir = tempfile::tempdir().unwrap();
        let img = DynamicImage::ImageRgba8(RgbaImage::new(800, 400));
        let loaded = LoadedImage::new("big", img).unwrap();

        let out = dir.path().join("preview.png");
        loaded.save_preview(&out, 500, 500).unwrap();
        let reread = image::open(&out).unwrap();
        assert_eq!(reread.dimensions(), (500, 250));
    }
}
