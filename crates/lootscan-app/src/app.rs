//! Command handlers. Every failure is rendered as an `Error - ...` status
//! line on the output; nothing here aborts the process. Handlers only return
//! an error when the output itself cannot be written.

use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;

use tracing::{error, info, warn};

use lootscan_capture::{clipboard, ImageSource};
use lootscan_core::config::LootscanConfig;
use lootscan_core::text::preprocess_search_term;
use lootscan_core::types::{AppStatus, ItemReport, ScanReport};
use lootscan_core::Settings;
use lootscan_correct::{load_autocorrect_rules, load_item_names, Autocorrector, Correction};
use lootscan_market::PriceClient;
use lootscan_ocr::{OcrConfig, TesseractOcrService};
use lootscan_scan::{format_extracted, format_results, spawn_scan, ScanEvent, Scanner};

use crate::cli::{Command, ScanArgs, SettingsAction};

/// Application state shared by all commands of one run.
pub struct App<W> {
    config: LootscanConfig,
    settings: Settings,
    settings_path: PathBuf,
    ocr: TesseractOcrService,
    out: W,
}

impl<W: Write> App<W> {
    pub fn new(config: LootscanConfig, out: W) -> Self {
        let settings_path = config.settings_path();
        let settings = Settings::load_or_default(&settings_path);
        let ocr = build_ocr(&config, settings.ocr_use_gpu);
        Self {
            config,
            settings,
            settings_path,
            ocr,
            out,
        }
    }

    #[cfg(test)]
    pub fn settings(&self) -> Settings {
        self.settings
    }

    #[cfg(test)]
    pub fn ocr(&self) -> &TesseractOcrService {
        &self.ocr
    }

    #[cfg(test)]
    pub fn into_output(self) -> W {
        self.out
    }

    /// Run one command. Only a failure to write the output is returned.
    pub async fn run(&mut self, command: Command) -> io::Result<()> {
        match command {
            Command::Scan(args) => self.scan(args).await,
            Command::Lookup { names } => self.lookup(&names).await,
            Command::Correct { terms } => self.correct(&terms),
            Command::Settings { action } => {
                self.update_settings(action.unwrap_or(SettingsAction::Show))
            }
        }
    }

    /// Persist the settings. Called once when the process exits.
    pub fn shutdown(&mut self) -> io::Result<()> {
        if let Err(e) = self.settings.save(&self.settings_path) {
            error!(path = %self.settings_path.display(), error = %e, "Error saving settings");
            self.status(AppStatus::Error, &format!("Error saving settings: {}", e))?;
        }
        info!("Application closed");
        self.out.flush()
    }

    fn status(&mut self, status: AppStatus, message: &str) -> io::Result<()> {
        let line = status.line(Some(message));
        info!("Status updated to: {}", line);
        writeln!(self.out, "{}", line)
    }

    fn corrector(&self, item_corrections: bool) -> Autocorrector {
        let rules = load_autocorrect_rules(&self.config.autocorrect_path());
        let items = load_item_names(&self.config.item_names_path());
        Autocorrector::new(rules, items)
            .with_threshold(self.config.correction.fuzzy_threshold)
            .with_item_corrections(item_corrections)
    }

    async fn scan(&mut self, args: ScanArgs) -> io::Result<()> {
        let report = self.run_scan(&args).await?;

        let (extracted, results) = match report {
            Some(ref report) => (
                format_extracted(&report.extracted_lines),
                format_results(&report.items),
            ),
            None => (String::new(), String::new()),
        };

        if args.copy_extracted {
            self.copy(
                &extracted,
                "No extracted text to copy.",
                "Extracted text copied to clipboard.",
                "Error copying extracted text",
            )?;
        }
        if args.copy_results {
            self.copy(
                &results,
                "No results to copy.",
                "API results copied to clipboard.",
                "Error copying results",
            )?;
        }
        Ok(())
    }

    async fn run_scan(&mut self, args: &ScanArgs) -> io::Result<Option<ScanReport>> {
        let source = match args.path {
            Some(ref path) if !args.clipboard => ImageSource::File(path.clone()),
            _ => ImageSource::Clipboard,
        };

        self.status(AppStatus::Loading, "Loading image...")?;
        let image = match source.load() {
            Ok(image) => image,
            Err(e) => {
                error!(source = %source.label(), error = %e, "Error loading image");
                self.status(AppStatus::Error, &format!("Error loading image: {}", e))?;
                return Ok(None);
            }
        };
        self.status(AppStatus::Ready, &format!("Image loaded: {}", image.label()))?;

        if let Some(ref path) = args.preview {
            let (width, height) = (
                self.config.image.preview_width,
                self.config.image.preview_height,
            );
            if let Err(e) = image.save_preview(path, width, height) {
                self.status(AppStatus::Error, &format!("Error saving preview: {}", e))?;
            }
        }

        let client = match PriceClient::from_config(&self.config.api) {
            Ok(client) => client,
            Err(e) => {
                self.status(AppStatus::Error, &e.to_string())?;
                return Ok(None);
            }
        };
        let item_corrections = self.settings.use_item_corrections && !args.no_corrections;
        let scanner = Arc::new(Scanner::new(
            self.ocr.clone(),
            client,
            self.corrector(item_corrections),
        ));

        let (handle, mut events) = spawn_scan(scanner, image);
        while let Some(event) = events.recv().await {
            match event {
                ScanEvent::Status { status, message } => {
                    writeln!(self.out, "{}", status.line(message.as_deref()))?;
                }
                ScanEvent::TextExtracted { lines } => {
                    write!(self.out, "\nExtracted text:\n{}\n", format_extracted(&lines))?;
                }
                ScanEvent::ItemResolved(report) => {
                    write!(self.out, "{}", format_results(std::slice::from_ref(&report)))?;
                }
                _ => {}
            }
        }

        match handle.await {
            Ok(report) => Ok(report),
            Err(e) => {
                error!(error = %e, "Scan task failed");
                self.status(AppStatus::Error, &format!("Scan failed: {}", e))?;
                Ok(None)
            }
        }
    }

    fn copy(&mut self, text: &str, empty: &str, done: &str, failed: &str) -> io::Result<()> {
        if text.trim().is_empty() {
            return self.status(AppStatus::Error, empty);
        }
        match clipboard::write_text(text) {
            Ok(()) => self.status(AppStatus::Completed, done),
            Err(e) => {
                error!(error = %e, "{}", failed);
                self.status(AppStatus::Error, &format!("{}: {}", failed, e))
            }
        }
    }

    async fn lookup(&mut self, names: &[String]) -> io::Result<()> {
        let client = match PriceClient::from_config(&self.config.api) {
            Ok(client) => client,
            Err(e) => return self.status(AppStatus::Error, &e.to_string()),
        };

        self.status(AppStatus::Searching, "Searching Tarkov.dev...")?;
        for name in names {
            let query = name.trim().to_string();
            if query.is_empty() {
                continue;
            }
            let items = client.get_item_data(&query).await;
            let report = ItemReport {
                query,
                count: 1,
                items,
            };
            if !report.has_data() {
                warn!(item = %report.query, "No API data found for item");
            }
            write!(self.out, "{}", format_results(std::slice::from_ref(&report)))?;
        }
        self.status(AppStatus::Completed, "Search completed.")
    }

    fn correct(&mut self, terms: &[String]) -> io::Result<()> {
        let corrector = self.corrector(self.settings.use_item_corrections);
        for term in terms {
            let cleaned = preprocess_search_term(term);
            let line = match corrector.resolve(&cleaned) {
                Correction::Exact(name) => format!("{} -> {} (exact)", term, name),
                Correction::Fuzzy { name, score } => {
                    format!("{} -> {} (fuzzy {})", term, name, score)
                }
                Correction::Unchanged(name) => format!("{} -> {} (unchanged)", term, name),
            };
            writeln!(self.out, "{}", line)?;
        }
        Ok(())
    }

    fn update_settings(&mut self, action: SettingsAction) -> io::Result<()> {
        match action {
            SettingsAction::Show => writeln!(
                self.out,
                "ocr_use_gpu = {}\nuse_item_corrections = {}\nsettings file: {}",
                self.settings.ocr_use_gpu,
                self.settings.use_item_corrections,
                self.settings_path.display()
            ),
            SettingsAction::Gpu { state } => {
                self.settings.ocr_use_gpu = state.enabled();
                self.ocr = build_ocr(&self.config, self.settings.ocr_use_gpu);
                if let Err(e) = self.settings.save(&self.settings_path) {
                    return self.status(AppStatus::Error, &format!("Error saving settings: {}", e));
                }
                let message = format!("OCR GPU set to: {}", self.settings.ocr_use_gpu);
                self.status(AppStatus::Ready, &message)
            }
            SettingsAction::Corrections { state } => {
                self.settings.use_item_corrections = state.enabled();
                let message = format!(
                    "Item corrections set to: {}",
                    self.settings.use_item_corrections
                );
                self.status(AppStatus::Ready, &message)
            }
        }
    }
}

fn build_ocr(config: &LootscanConfig, use_gpu: bool) -> TesseractOcrService {
    TesseractOcrService::new(OcrConfig {
        language: config.ocr.language.clone(),
        psm: config.ocr.psm,
        use_gpu,
    })
}
