//! User-facing toggles persisted as a flat key-value file.
//!
//! ```toml
//! [settings]
//! ocr_use_gpu = true
//! use_item_corrections = true
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::error::Result;

/// The two persisted user toggles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Ask the OCR engine for GPU acceleration.
    pub ocr_use_gpu: bool,
    /// Fall back to fuzzy item-name matching when no exact rule applies.
    pub use_item_corrections: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            ocr_use_gpu: true,
            use_item_corrections: true,
        }
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct SettingsFile {
    #[serde(default)]
    settings: Settings,
}

impl Settings {
    /// Read settings from `path`.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let file: SettingsFile = toml::from_str(&content)?;
        info!(path = %path.display(), "Settings loaded");
        Ok(file.settings)
    }

    /// Read settings, falling back to defaults.
    ///
    /// A missing file is not an error. A file that exists but cannot be read
    /// or parsed is logged and overwritten with the defaults.
    pub fn load_or_default(path: &Path) -> Self {
        if !path.exists() {
            info!(path = %path.display(), "No settings file, using defaults");
            return Self::default();
        }
        match Self::load(path) {
            Ok(settings) => settings,
            Err(e) => {
                error!(path = %path.display(), error = %e, "Error loading settings");
                let settings = Self::default();
                if let Err(e) = settings.save(path) {
                    error!(path = %path.display(), error = %e, "Error saving settings");
                }
                settings
            }
        }
    }

    /// Write settings to `path`, creating parent directories as needed.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(&SettingsFile { settings: *self })?;
        std::fs::write(path, content)?;
        info!(path = %path.display(), "Settings saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_enable_both_flags() {
        let settings = Settings::default();
        assert!(settings.ocr_use_gpu);
        assert!(settings.use_item_corrections);
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.toml");

        let settings = Settings {
            ocr_use_gpu: false,
            use_item_corrections: true,
        };
        settings.save(&path).unwrap();

        assert_eq!(Settings::load(&path).unwrap(), settings);
    }

    #[test]
    fn test_file_is_flat_key_value() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.toml");
        Settings::default().save(&path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("[settings]"));
        assert!(content.contains("ocr_use_gpu = true"));
        assert!(content.contains("use_item_corrections = true"));
    }

    #[test]
    fn test_missing_key_falls_back_per_field() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.toml");
        std::fs::write(&path, "[settings]\nuse_item_corrections = false\n").unwrap();

        let settings = Settings::load(&path).unwrap();
        assert!(settings.ocr_use_gpu);
        assert!(!settings.use_item_corrections);
    }

    #[test]
    fn test_missing_file_uses_defaults_without_writing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.toml");

        assert_eq!(Settings::load_or_default(&path), Settings::default());
        assert!(!path.exists());
    }

    #[test]
    fn test_corrupt_file_is_rewritten_with_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.toml");
        std::fs::write(&path, "ocr_use_gpu = [[[").unwrap();

        assert_eq!(Settings::load_or_default(&path), Settings::default());
        assert_eq!(Settings::load(&path).unwrap(), Settings::default());
    }
}
