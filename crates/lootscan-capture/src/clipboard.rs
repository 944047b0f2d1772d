//! System clipboard access via `arboard`.

use arboard::Clipboard;
use image::{DynamicImage, RgbaImage};
use tracing::{debug, info};

use lootscan_core::error::{LootscanError, Result};

/// Read a bitmap from the clipboard.
///
/// Returns a `Capture` error when the clipboard holds no image, so the
/// caller can surface it as a normal status message.
pub fn read_image() -> Result<DynamicImage> {
    let mut clipboard =
        Clipboard::new().map_err(|e| LootscanError::Clipboard(e.to_string()))?;

    let data = match clipboard.get_image() {
        Ok(data) => data,
        Err(arboard::Error::ContentNotAvailable) => {
            return Err(LootscanError::Capture(
                "No image found on the clipboard".to_string(),
            ))
        }
        Err(e) => return Err(LootscanError::Clipboard(e.to_string())),
    };

    debug!(width = data.width, height = data.height, "Clipboard image read");

    let rgba = RgbaImage::from_raw(
        data.width as u32,
        data.height as u32,
        data.bytes.into_owned(),
    )
    .ok_or_else(|| {
        LootscanError::Capture("Clipboard image has an invalid pixel buffer".to_string())
    })?;

    Ok(DynamicImage::ImageRgba8(rgba))
}

/// Replace the clipboard contents with `text`.
pub fn write_text(text: &str) -> Result<()> {
    let mut clipboard =
        Clipboard::new().map_err(|e| LootscanError::Clipboard(e.to_string()))?;
    clipboard
        .set_text(text.to_string())
        .map_err(|e| LootscanError::Clipboard(e.to_string()))?;
    info!(chars = text.chars().count(), "Copied text to clipboard");
    Ok(())
}
