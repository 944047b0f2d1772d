//! Lootscan correction crate - mapping noisy OCR terms to known item names.
//!
//! An exact-match dictionary is consulted first. When it has no entry and
//! item corrections are enabled, a fuzzy matcher picks the closest known
//! item name, which is accepted only at or above a score threshold.

pub mod dictionary;
pub mod matcher;

use tracing::debug;

pub use dictionary::{
    load_autocorrect_rules, load_item_names, AutocorrectRules, ItemNameLookup,
};
pub use matcher::{FuzzyMatch, FuzzyMatcher, StrsimMatcher};

/// Default minimum fuzzy score for accepting a candidate.
pub const DEFAULT_FUZZY_THRESHOLD: u8 = 80;

/// How a term was resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Correction {
    /// The exact-match dictionary had an entry.
    Exact(String),
    /// A known item name scored at or above the threshold.
    Fuzzy { name: String, score: u8 },
    /// Nothing applied; the input is kept as-is.
    Unchanged(String),
}

impl Correction {
    pub fn into_term(self) -> String {
        match self {
            Correction::Exact(term)
            | Correction::Fuzzy { name: term, .. }
            | Correction::Unchanged(term) => term,
        }
    }
}

/// Resolves OCR terms against the autocorrect rules and item names.
#[derive(Debug, Clone)]
pub struct Autocorrector<M = StrsimMatcher> {
    rules: AutocorrectRules,
    item_names: ItemNameLookup,
    matcher: M,
    threshold: u8,
    use_item_corrections: bool,
}

impl Autocorrector<StrsimMatcher> {
    pub fn new(rules: AutocorrectRules, item_names: ItemNameLookup) -> Self {
        Self::with_matcher(rules, item_names, StrsimMatcher)
    }
}

impl<M: FuzzyMatcher> Autocorrector<M> {
    pub fn with_matcher(rules: AutocorrectRules, item_names: ItemNameLookup, matcher: M) -> Self {
        Self {
            rules,
            item_names,
            matcher,
            threshold: DEFAULT_FUZZY_THRESHOLD,
            use_item_corrections: true,
        }
    }

    pub fn with_threshold(mut self, threshold: u8) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn with_item_corrections(mut self, enabled: bool) -> Self {
        self.use_item_corrections = enabled;
        self
    }

    /// Resolve a term, reporting which rule applied.
    pub fn resolve(&self, term: &str) -> Correction {
        let lower = term.to_lowercase();
        if let Some(fixed) = self.rules.get(&lower) {
            debug!(term, corrected = %fixed, "Exact autocorrect");
            return Correction::Exact(fixed.clone());
        }

        if self.use_item_corrections && !self.item_names.is_empty() {
            let candidates = self.item_names.keys().map(String::as_str);
            if let Some(best) = self.matcher.best_match(&lower, candidates) {
                if best.score >= self.threshold {
                    debug!(term, corrected = best.candidate, score = best.score, "Fuzzy autocorrect");
                    return Correction::Fuzzy {
                        name: best.candidate.to_string(),
                        score: best.score,
                    };
                }
                debug!(term, best = best.candidate, score = best.score, "Fuzzy match below threshold");
            }
        }

        Correction::Unchanged(term.to_string())
    }

    /// Corrected term, or the input unchanged.
    pub fn autocorrect(&self, term: &str) -> String {
        self.resolve(term).into_term()
    }
}
