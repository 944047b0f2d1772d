use thiserror::Error;

/// Top-level error type for lootscan.
///
/// Each variant names the collaborator that failed. Errors are caught at the
/// call boundary in the application and rendered as a status line; none of
/// them terminate the process.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum LootscanError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Image error: {0}")]
    Capture(String),

    #[error("OCR error: {0}")]
    Ocr(String),

    #[error("API error: {0}")]
    Api(String),

    #[error("Clipboard error: {0}")]
    Clipboard(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<toml::de::Error> for LootscanError {
    fn from(err: toml::de::Error) -> Self {
        LootscanError::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for LootscanError {
    fn from(err: toml::ser::Error) -> Self {
        LootscanError::Config(err.to_string())
    }
}

impl From<serde_json::Error> for LootscanError {
    fn from(err: serde_json::Error) -> Self {
        LootscanError::Serialization(err.to_string())
    }
}

/// A specialized `Result` type for lootscan operations.
pub type Result<T> = std::result::Result<T, LootscanError>;
