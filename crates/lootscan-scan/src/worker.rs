use std::sync::Arc;

use chrono::Utc;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;
use tracing::{info, warn};
use uuid::Uuid;

use lootscan_capture::LoadedImage;
use lootscan_core::error::Result;
use lootscan_core::text::preprocess_search_term;
use lootscan_core::types::{AppStatus, ItemReport, ScanReport};
use lootscan_correct::{Autocorrector, FuzzyMatcher, StrsimMatcher};
use lootscan_market::PriceLookup;
use lootscan_ocr::OcrService;

use crate::events::{emit, ScanEvent};
use crate::report::count_items;

/// OCR, correction and lookup collaborators for one or more scans.
pub struct Scanner<O, L, M = StrsimMatcher> {
    ocr: O,
    lookup: L,
    corrector: Autocorrector<M>,
}

impl<O, L, M> Scanner<O, L, M>
where
    O: OcrService,
    L: PriceLookup,
    M: FuzzyMatcher,
{
    pub fn new(ocr: O, lookup: L, corrector: Autocorrector<M>) -> Self {
        Self {
            ocr,
            lookup,
            corrector,
        }
    }

    pub fn lookup(&self) -> &L {
        &self.lookup
    }

    /// Clean and correct a raw OCR line.
    pub fn correct_line(&self, raw: &str) -> String {
        self.corrector.autocorrect(&preprocess_search_term(raw))
    }

    /// OCR the image, then correct every line.
    ///
    /// Only OCR can fail; cleanup and correction always produce a line.
    pub async fn extract_lines(&self, image_png: &[u8]) -> Result<Vec<String>> {
        let fragments = self.ocr.extract_text(image_png).await?;
        info!(fragments = fragments.len(), "OCR complete");
        Ok(fragments
            .iter()
            .map(|fragment| self.correct_line(&fragment.text))
            .collect())
    }

    /// Count names and look each distinct one up, in order.
    ///
    /// Every line goes through cleanup and correction once more first, so a
    /// rule output with punctuation is queried cleaned and outputs that
    /// converge are counted together.
    pub async fn search(
        &self,
        lines: &[String],
        events: &UnboundedSender<ScanEvent>,
    ) -> Vec<ItemReport> {
        emit(
            events,
            ScanEvent::status(AppStatus::Searching, "Searching Tarkov.dev..."),
        );

        let names: Vec<String> = lines.iter().map(|line| self.correct_line(line)).collect();

        let mut reports = Vec::new();
        for (query, count) in count_items(&names) {
            let items = self.lookup.get_item_data(&query).await;
            let report = ItemReport {
                query,
                count,
                items,
            };
            if !report.has_data() {
                warn!(item = %report.query, "No API data found for item");
            }
            emit(events, ScanEvent::ItemResolved(report.clone()));
            reports.push(report);
        }

        emit(events, ScanEvent::status(AppStatus::Completed, "Search completed."));
        reports
    }

    /// Run a full scan of `image`, reporting progress on `events`.
    ///
    /// OCR failures end the scan with an `Error` status and no report.
    pub async fn scan(
        &self,
        image: &LoadedImage,
        events: &UnboundedSender<ScanEvent>,
    ) -> Option<ScanReport> {
        let started_at = Utc::now();
        let (width, height) = image.dimensions();
        info!(source = image.label(), width, height, "Scan started");
        emit(
            events,
            ScanEvent::status(AppStatus::Processing, "Extracting text..."),
        );

        let lines = match self.ocr_lines(image).await {
            Ok(lines) => lines,
            Err(e) => {
                emit(
                    events,
                    ScanEvent::status(AppStatus::Error, format!("Error during OCR: {}", e)),
                );
                return None;
            }
        };

        emit(
            events,
            ScanEvent::TextExtracted {
                lines: lines.clone(),
            },
        );
        emit(
            events,
            ScanEvent::status(AppStatus::Completed, "Text extracted successfully!"),
        );

        let items = self.search(&lines, events).await;

        let report = ScanReport {
            id: Uuid::new_v4(),
            source: image.label().to_string(),
            extracted_lines: lines,
            items,
            started_at,
            finished_at: Utc::now(),
        };
        emit(events, ScanEvent::Finished(report.clone()));
        Some(report)
    }

    async fn ocr_lines(&self, image: &LoadedImage) -> Result<Vec<String>> {
        let png = image.to_png_bytes()?;
        self.extract_lines(&png).await
    }
}

/// Run a scan on a background task.
///
/// Returns the task handle and the receiving end of its event stream. The
/// stream closes when the task finishes.
pub fn spawn_scan<O, L, M>(
    scanner: Arc<Scanner<O, L, M>>,
    image: LoadedImage,
) -> (JoinHandle<Option<ScanReport>>, UnboundedReceiver<ScanEvent>)
where
    O: OcrService + 'static,
    L: PriceLookup + 'static,
    M: FuzzyMatcher + 'static,
{
    let (tx, rx) = mpsc::unbounded_channel();
    let handle = tokio::spawn(async move { scanner.scan(&image, &tx).await });
    (handle, rx)
}
