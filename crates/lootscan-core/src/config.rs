use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{LootscanError, Result};

/// Top-level configuration for lootscan.
///
/// Loaded from `~/.lootscan/config.toml` by default. The two user-facing
/// toggles live in the separate settings file (see [`crate::Settings`]);
/// this file holds the tuning knobs that rarely change.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LootscanConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub correction: CorrectionConfig,
    #[serde(default)]
    pub ocr: OcrEngineConfig,
    #[serde(default)]
    pub image: ImageConfig,
}

impl LootscanConfig {
    /// Load configuration from a TOML file.
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: LootscanConfig = toml::from_str(&content)?;
        info!("Configuration loaded from {}", path.display());
        Ok(config)
    }

    /// Load configuration from a TOML file, falling back to defaults if the
    /// file does not exist or cannot be parsed.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                warn!(
                    "Failed to load config from {}: {}. Using defaults.",
                    path.display(),
                    e
                );
                Self::default()
            }
        }
    }

    /// Save the current configuration to a TOML file.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| LootscanError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        info!("Configuration saved to {}", path.display());
        Ok(())
    }

    /// Data directory with a leading `~` expanded to the home directory.
    pub fn data_dir(&self) -> PathBuf {
        expand_home(&self.general.data_dir)
    }

    /// Path of the flat settings file inside the data directory.
    pub fn settings_path(&self) -> PathBuf {
        self.data_dir().join("settings.toml")
    }

    /// Path of the log file, or `None` when file logging is disabled.
    pub fn log_file_path(&self) -> Option<PathBuf> {
        if self.general.log_file.trim().is_empty() {
            return None;
        }
        Some(self.resolve_in_data_dir(&self.general.log_file))
    }

    /// Path of the exact-match autocorrect dictionary.
    pub fn autocorrect_path(&self) -> PathBuf {
        self.resolve_in_data_dir(&self.correction.autocorrect_file)
    }

    /// Path of the item-name lookup used as the fuzzy candidate set.
    pub fn item_names_path(&self) -> PathBuf {
        self.resolve_in_data_dir(&self.correction.item_names_file)
    }

    fn resolve_in_data_dir(&self, file: &str) -> PathBuf {
        let expanded = expand_home(file);
        if expanded.is_absolute() {
            expanded
        } else {
            self.data_dir().join(expanded)
        }
    }
}

/// Expand `~/` (or `~\` on Windows) to the user's home directory.
pub fn expand_home(path: &str) -> PathBuf {
    if path.starts_with("~/") || path.starts_with("~\\") {
        #[cfg(target_os = "windows")]
        let home = std::env::var("USERPROFILE").unwrap_or_else(|_| ".".to_string());
        #[cfg(not(target_os = "windows"))]
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
        PathBuf::from(home).join(&path[2..])
    } else {
        PathBuf::from(path)
    }
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Data directory for settings, dictionaries and logs.
    pub data_dir: String,
    /// Log level: trace, debug, info, warn, error.
    pub log_level: String,
    /// Log file, relative to the data directory. Empty disables file logging.
    pub log_file: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            data_dir: "~/.lootscan/data".to_string(),
            log_level: "info".to_string(),
            log_file: "logs/lootscan.log".to_string(),
        }
    }
}

/// Price-lookup API configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// GraphQL endpoint.
    pub url: String,
    /// Seconds a cached lookup stays valid.
    pub cache_ttl_secs: u64,
    /// Fixed delay after every request, in milliseconds.
    pub request_delay_ms: u64,
    /// Total request attempts per lookup.
    pub max_retries: u32,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            url: "https://api.tarkov.dev/graphql".to_string(),
            cache_ttl_secs: 3600,
            request_delay_ms: 200,
            max_retries: 3,
            timeout_secs: 30,
        }
    }
}

/// Item-name correction configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CorrectionConfig {
    /// Minimum fuzzy score (0-100) for a candidate to replace the input.
    pub fuzzy_threshold: u8,
    /// Exact-match dictionary (JSON object of string to string).
    pub autocorrect_file: String,
    /// Known item names (JSON object keyed by name).
    pub item_names_file: String,
}

impl Default for CorrectionConfig {
    fn default() -> Self {
        Self {
            fuzzy_threshold: 80,
            autocorrect_file: "autocorrect_rules.json".to_string(),
            item_names_file: "item_names.json".to_string(),
        }
    }
}

/// OCR engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OcrEngineConfig {
    /// Tesseract language code.
    pub language: String,
    /// Tesseract page segmentation mode. Unset uses the engine default.
    pub psm: Option<i32>,
}

impl Default for OcrEngineConfig {
    fn default() -> Self {
        Self {
            language: "eng".to_string(),
            psm: None,
        }
    }
}

/// Screenshot preview configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageConfig {
    /// Maximum preview width in pixels.
    pub preview_width: u32,
    /// Maximum preview height in pixels.
    pub preview_height: u32,
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            preview_width: 500,
            preview_height: 500,
        }
    }
}
