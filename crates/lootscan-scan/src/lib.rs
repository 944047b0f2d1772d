//! Lootscan scan crate - the background OCR and price-lookup worker.
//!
//! A scan turns one screenshot into a [`ScanReport`]: OCR, term cleanup,
//! autocorrection, occurrence counting, then one price lookup per distinct
//! name. Progress is reported over a channel so the interactive side never
//! blocks on the work.

pub mod events;
pub mod report;
pub mod worker;

pub use events::ScanEvent;
pub use report::{count_items, format_extracted, format_results};
pub use worker::{spawn_scan, Scanner};
