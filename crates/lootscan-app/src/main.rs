//! Lootscan application binary - composition root.
//!
//! 1. Parse the command line and load configuration from TOML
//! 2. Initialize logging (stderr + rolling file)
//! 3. Load the persisted settings
//! 4. Run one command, reporting progress as status lines
//! 5. Save settings on the way out

mod app;
mod cli;
mod logging;

use std::path::Path;

use clap::Parser;

use lootscan_core::config::LootscanConfig;

use crate::app::App;
use crate::cli::CliArgs;

/// Load the config file. A missing file silently yields the defaults; an
/// unreadable one yields the defaults plus the error to report once logging
/// is up.
fn load_config(path: &Path) -> (LootscanConfig, Option<String>) {
    if !path.exists() {
        return (LootscanConfig::default(), None);
    }
    match LootscanConfig::load(path) {
        Ok(config) => (config, None),
        Err(e) => (LootscanConfig::default(), Some(e.to_string())),
    }
}

#[tokio::main]
async fn main() {
    let args = CliArgs::parse();

    // Config.
    let config_file = args.resolve_config_path();
    let (mut config, config_error) = load_config(&config_file);
    args.apply_overrides(&mut config);

    // Tracing.
    let _log_guard = logging::init(&config.general.log_level, config.log_file_path().as_deref());

    tracing::info!("Starting lootscan v{}", env!("CARGO_PKG_VERSION"));
    match config_error {
        Some(e) => tracing::warn!(
            path = %config_file.display(),
            error = %e,
            "Failed to load config, using defaults"
        ),
        None => tracing::info!(path = %config_file.display(), "Configuration loaded"),
    }

    let mut app = App::new(config, std::io::stdout());
    let written = app.run(args.command).await;
    // Settings are saved even when stdout has gone away.
    if let Err(e) = written.and(app.shutdown()) {
        tracing::error!(error = %e, "Failed to write output");
    }
}
