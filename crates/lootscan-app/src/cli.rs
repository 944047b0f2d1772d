//! CLI argument definitions for the lootscan binary.
//!
//! Priority resolution: CLI args > env vars > config file > defaults.

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use lootscan_core::config::LootscanConfig;

/// Lootscan - read item names off a game screenshot and price them.
#[derive(Parser, Debug)]
#[command(name = "lootscan", version, about)]
pub struct CliArgs {
    /// Path to the configuration file.
    #[arg(short = 'c', long = "config", global = true)]
    pub config: Option<PathBuf>,

    /// Data directory for settings, dictionaries and logs.
    #[arg(short = 'd', long = "data-dir", global = true)]
    pub data_dir: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(short = 'l', long = "log-level", global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// OCR a screenshot, correct the item names and look up their prices.
    Scan(ScanArgs),
    /// Look up item prices by name.
    Lookup {
        #[arg(required = true)]
        names: Vec<String>,
    },
    /// Show how OCR terms would be cleaned and corrected.
    Correct {
        #[arg(required = true)]
        terms: Vec<String>,
    },
    /// Show or change the persisted settings.
    Settings {
        #[command(subcommand)]
        action: Option<SettingsAction>,
    },
}

#[derive(Args, Debug)]
pub struct ScanArgs {
    /// Image file to scan.
    #[arg(required_unless_present = "clipboard", conflicts_with = "clipboard")]
    pub path: Option<PathBuf>,

    /// Scan the image currently on the clipboard.
    #[arg(long)]
    pub clipboard: bool,

    /// Copy the lookup results to the clipboard.
    #[arg(long)]
    pub copy_results: bool,

    /// Copy the extracted text to the clipboard.
    #[arg(long)]
    pub copy_extracted: bool,

    /// Save a preview thumbnail of the screenshot.
    #[arg(long, value_name = "PATH")]
    pub preview: Option<PathBuf>,

    /// Use exact autocorrect rules only for this scan.
    #[arg(long)]
    pub no_corrections: bool,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsAction {
    /// Print the current settings.
    Show,
    /// Request GPU acceleration for OCR.
    Gpu {
        #[arg(value_enum)]
        state: Toggle,
    },
    /// Fall back to fuzzy item-name matching.
    Corrections {
        #[arg(value_enum)]
        state: Toggle,
    },
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Toggle {
    On,
    Off,
}

impl Toggle {
    pub fn enabled(self) -> bool {
        self == Toggle::On
    }
}

impl CliArgs {
    /// Resolve the configuration file path.
    ///
    /// Priority: --config flag > LOOTSCAN_CONFIG env var > ~/.lootscan/config.toml.
    pub fn resolve_config_path(&self) -> PathBuf {
        if let Some(ref p) = self.config {
            return p.clone();
        }
        if let Ok(p) = std::env::var("LOOTSCAN_CONFIG") {
            return PathBuf::from(p);
        }
        default_config_path()
    }

    /// Apply --data-dir and --log-level on top of the loaded config.
    pub fn apply_overrides(&self, config: &mut LootscanConfig) {
        if let Some(ref dir) = self.data_dir {
            config.general.data_dir = dir.to_string_lossy().to_string();
        }
        if let Some(ref level) = self.log_level {
            config.general.log_level = level.clone();
        }
    }
}

/// Default config file path for the current platform.
fn default_config_path() -> PathBuf {
    #[cfg(target_os = "windows")]
    if let Ok(home) = std::env::var("USERPROFILE") {
        return PathBuf::from(home).join(".lootscan").join("config.toml");
    }
    #[cfg(not(target_os = "windows"))]
    if let Ok(home) = std::env::var("HOME") {
        return PathBuf::from(home).join(".lootscan").join("config.toml");
    }
    PathBuf::from("config.toml")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> CliArgs {
        CliArgs::try_parse_from(args).unwrap()
    }

    #[test]
    fn test_scan_file() {
        let args = parse(&["lootscan", "scan", "shot.png", "--copy-results"]);
        match args.command {
            Command::Scan(scan) => {
                assert_eq!(scan.path, Some(PathBuf::from("shot.png")));
                assert!(!scan.clipboard);
                assert!(scan.copy_results);
                assert!(!scan.copy_extracted);
                assert!(!scan.no_corrections);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_scan_clipboard_with_preview() {
        let args = parse(&["lootscan", "scan", "--clipboard", "--preview", "p.png"]);
        match args.command {
            Command::Scan(scan) => {
                assert!(scan.clipboard);
                assert!(scan.path.is_none());
                assert_eq!(scan.preview, Some(PathBuf::from("p.png")));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_scan_needs_exactly_one_source() {
        assert!(CliArgs::try_parse_from(["lootscan", "scan"]).is_err());
        assert!(CliArgs::try_parse_from(["lootscan", "scan", "a.png", "--clipboard"]).is_err());
    }

    #[test]
    fn test_lookup_requires_names() {
        assert!(CliArgs::try_parse_from(["lootscan", "lookup"]).is_err());
        let args = parse(&["lootscan", "lookup", "Bolts", "Gas analyzer"]);
        match args.command {
            Command::Lookup { names } => assert_eq!(names, vec!["Bolts", "Gas analyzer"]),
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_settings_actions() {
        let args = parse(&["lootscan", "settings", "gpu", "off"]);
        match args.command {
            Command::Settings { action } => assert_eq!(
                action,
                Some(SettingsAction::Gpu {
                    state: Toggle::Off
                })
            ),
            other => panic!("unexpected command: {:?}", other),
        }

        let args = parse(&["lootscan", "settings"]);
        assert!(matches!(args.command, Command::Settings { action: None }));

        assert!(CliArgs::try_parse_from(["lootscan", "settings", "gpu", "maybe"]).is_err());
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let args = parse(&["lootscan", "correct", "bolt", "--log-level", "debug", "-d", "/tmp/ls"]);
        assert_eq!(args.log_level.as_deref(), Some("debug"));
        assert_eq!(args.data_dir, Some(PathBuf::from("/tmp/ls")));
    }

    #[test]
    fn test_config_flag_wins() {
        let args = parse(&["lootscan", "--config", "/etc/lootscan.toml", "settings", "show"]);
        assert_eq!(args.resolve_config_path(), PathBuf::from("/etc/lootscan.toml"));
    }

    #[test]
    fn test_apply_overrides() {
        let args = parse(&["lootscan", "-d", "/data", "-l", "warn", "settings"]);
        let mut config = LootscanConfig::default();
        args.apply_overrides(&mut config);
        assert_eq!(config.general.data_dir, "/data");
        assert_eq!(config.general.log_level, "warn");

        let args = parse(&["lootscan", "settings"]);
        let mut config = LootscanConfig::default();
        args.apply_overrides(&mut config);
        assert_eq!(config.general.data_dir, "~/.lootscan/data");
        assert_eq!(config.general.log_level, "info");
    }

    #[test]
    fn test_toggle() {
        assert!(Toggle::On.enabled());
        assert!(!Toggle::Off.enabled());
    }
}
