pub mod config;
pub mod error;
pub mod settings;
pub mod text;
pub mod types;

pub use config::LootscanConfig;
pub use error::{LootscanError, Result};
pub use settings::Settings;
pub use types::*;
