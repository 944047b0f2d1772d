//! Loading the static correction dictionaries from JSON.

use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use serde_json::Value;
use tracing::{error, info};

use lootscan_core::error::Result;

/// Exact-match rules: lowercased OCR term to corrected item name.
pub type AutocorrectRules = HashMap<String, String>;

/// Known item names with arbitrary metadata. Sorted so the fuzzy candidate
/// order is stable between runs.
pub type ItemNameLookup = BTreeMap<String, Value>;

/// Read the autocorrect rules. Keys are lowercased.
pub fn read_autocorrect_rules(path: &Path) -> Result<AutocorrectRules> {
    let content = std::fs::read_to_string(path)?;
    let raw: HashMap<String, String> = serde_json::from_str(&content)?;
    Ok(raw
        .into_iter()
        .map(|(k, v)| (k.to_lowercase(), v))
        .collect())
}

/// Read the item-name lookup.
pub fn read_item_names(path: &Path) -> Result<ItemNameLookup> {
    let content = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

/// Load the autocorrect rules, logging and returning an empty map on error.
pub fn load_autocorrect_rules(path: &Path) -> AutocorrectRules {
    match read_autocorrect_rules(path) {
        Ok(rules) => {
            info!(path = %path.display(), rules = rules.len(), "Autocorrect rules loaded");
            rules
        }
        Err(e) => {
            error!(path = %path.display(), error = %e, "Error loading autocorrect rules");
            AutocorrectRules::new()
        }
    }
}

/// Load the item-name lookup, logging and returning an empty map on error.
pub fn load_item_names(path: &Path) -> ItemNameLookup {
    match read_item_names(path) {
        Ok(items) => {
            info!(path = %path.display(), items = items.len(), "Item names loaded");
            items
        }
        Err(e) => {
            error!(path = %path.display(), error = %e, "Error loading item names");
            ItemNameLookup::new()
        }
    }
}
