use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// UTC timestamp used across lootscan.
pub type Timestamp = DateTime<Utc>;

// =============================================================================
// Status
// =============================================================================

/// Interactive status shown to the user while a scan runs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AppStatus {
    Ready,
    Loading,
    Processing,
    Searching,
    Completed,
    Error,
}

impl AppStatus {
    /// Label as shown in the status line.
    pub fn label(&self) -> &'static str {
        match self {
            AppStatus::Ready => "Ready",
            AppStatus::Loading => "Loading...",
            AppStatus::Processing => "Processing...",
            AppStatus::Searching => "Searching Tarkov.dev...",
            AppStatus::Completed => "Completed",
            AppStatus::Error => "Error",
        }
    }

    /// Render `"<label>"` or `"<label> - <message>"`.
    pub fn line(&self, message: Option<&str>) -> String {
        match message {
            Some(m) if !m.is_empty() => format!("{} - {}", self.label(), m),
            _ => self.label().to_string(),
        }
    }
}

impl fmt::Display for AppStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// =============================================================================
// OCR
// =============================================================================

/// One piece of recognized text with the engine's confidence (0.0 to 1.0).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OcrFragment {
    pub text: String,
    pub confidence: f32,
}

impl OcrFragment {
    pub fn new(text: impl Into<String>, confidence: f32) -> Self {
        Self {
            text: text.into(),
            confidence,
        }
    }
}

// =============================================================================
// Prices
// =============================================================================

/// A single item record returned by the price-lookup API.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemPrice {
    pub name: String,
    #[serde(rename = "shortName", default)]
    pub short_name: Option<String>,
    #[serde(rename = "avg24hPrice", default)]
    pub avg_24h_price: Option<i64>,
    #[serde(rename = "basePrice", default)]
    pub base_price: Option<i64>,
    #[serde(rename = "wikiLink", default)]
    pub wiki_link: Option<String>,
}

/// Lookup outcome for one distinct corrected item name.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemReport {
    /// Corrected name that was looked up.
    pub query: String,
    /// How many times the name appeared in the screenshot.
    pub count: u32,
    /// `None` when the lookup failed after all retries.
    pub items: Option<Vec<ItemPrice>>,
}

impl ItemReport {
    /// Whether the lookup produced at least one record.
    pub fn has_data(&self) -> bool {
        self.items.as_ref().is_some_and(|items| !items.is_empty())
    }
}

/// Everything one scan produced.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ScanReport {
    pub id: Uuid,
    /// Image label: file path or `Clipboard Image`.
    pub source: String,
    /// Cleaned and corrected OCR lines, in recognition order.
    pub extracted_lines: Vec<String>,
    pub items: Vec<ItemReport>,
    pub started_at: Timestamp,
    pub finished_at: Timestamp,
}
