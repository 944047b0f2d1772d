//! Tracing setup: stderr plus an optional daily-rolling log file.

use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize the global subscriber.
///
/// `RUST_LOG` wins over `level`. When `log_file` is set, records are also
/// written to `<dir>/<name>.YYYY-MM-DD`. Keep the returned guard alive for
/// the life of the process or buffered file records are lost.
pub fn init(level: &str, log_file: Option<&Path>) -> Option<WorkerGuard> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false);

    let (file_layer, guard) = match log_file.and_then(split_log_path) {
        Some((dir, name)) => {
            let appender = RollingFileAppender::new(Rotation::DAILY, dir, name);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer().with_writer(writer).with_ansi(false);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .with(file_layer)
        .try_init();

    guard
}

fn split_log_path(path: &Path) -> Option<(&Path, &std::ffi::OsStr)> {
    let name = path.file_name()?;
    let dir = path.parent().filter(|p| !p.as_os_str().is_empty())?;
    if let Err(e) = std::fs::create_dir_all(dir) {
        eprintln!("Failed to create log directory {}: {}", dir.display(), e);
        return None;
    }
    Some((dir, name))
}
