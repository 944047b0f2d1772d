//! Fuzzy string matching behind a small trait seam.

use std::collections::BTreeSet;

use strsim::normalized_levenshtein;

/// Best candidate for a query with its similarity score (0-100).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FuzzyMatch<'a> {
    pub candidate: &'a str,
    pub score: u8,
}

/// Approximate string matcher.
pub trait FuzzyMatcher: Send + Sync {
    /// Score a single pair on a 0-100 scale.
    fn score(&self, query: &str, candidate: &str) -> u8;

    /// Return the highest-scoring candidate, or `None` when there are no
    /// candidates. Ties go to the earliest candidate.
    fn best_match<'a, I>(&self, query: &str, candidates: I) -> Option<FuzzyMatch<'a>>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut best: Option<FuzzyMatch<'a>> = None;
        for candidate in candidates {
            let score = self.score(query, candidate);
            if best.as_ref().map_or(true, |b| score > b.score) {
                best = Some(FuzzyMatch { candidate, score });
                if score == 100 {
                    break;
                }
            }
        }
        best
    }
}

/// Weight applied to the token-based scores.
const TOKEN_SCALE: f64 = 0.95;

/// Length ratio above which substring scoring takes over.
const PARTIAL_MIN_LEN_RATIO: f64 = 1.5;

/// Levenshtein-based weighted matcher.
///
/// Both strings are lowercased and stripped of punctuation first. When the
/// lengths are close, the score is the best of the plain, token-sorted and
/// token-set similarities. When one string is at least 1.5x longer, the
/// shorter one is instead slid across the longer one and scored against its
/// best window, scaled by 0.9 (0.6 past 8x). This lets a truncated inventory
/// label such as "Salewa" still reach "Salewa first aid kit".
#[derive(Debug, Clone, Copy, Default)]
pub struct StrsimMatcher;

impl FuzzyMatcher for StrsimMatcher {
    fn score(&self, query: &str, candidate: &str) -> u8 {
        let q = normalize(query);
        let c = normalize(candidate);
        if q.is_empty() || c.is_empty() {
            return 0;
        }

        let (q_len, c_len) = (q.chars().count(), c.chars().count());
        let len_ratio = q_len.max(c_len) as f64 / q_len.min(c_len) as f64;

        let base = ratio(&q, &c);
        let best = if len_ratio < PARTIAL_MIN_LEN_RATIO {
            base.max(ratio(&sort_tokens(&q), &sort_tokens(&c)) * TOKEN_SCALE)
                .max(token_set(&q, &c, ratio) * TOKEN_SCALE)
        } else {
            let scale = if len_ratio < 8.0 { 0.9 } else { 0.6 };
            base.max(partial_ratio(&q, &c) * scale)
                .max(partial_ratio(&sort_tokens(&q), &sort_tokens(&c)) * TOKEN_SCALE * scale)
                .max(token_set(&q, &c, partial_ratio) * TOKEN_SCALE * scale)
        };
        best.round().clamp(0.0, 100.0) as u8
    }
}

/// Normalized Levenshtein similarity on a 0-100 scale. Empty input scores 0.
fn ratio(a: &str, b: &str) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    normalized_levenshtein(a, b) * 100.0
}

/// Best [`ratio`] of the shorter string against every equally long window
/// of the longer one.
fn partial_ratio(a: &str, b: &str) -> f64 {
    let (short, long) = if a.chars().count() <= b.chars().count() {
        (a, b)
    } else {
        (b, a)
    };
    let long: Vec<char> = long.chars().collect();
    let width = short.chars().count();
    if width == 0 {
        return 0.0;
    }

    let mut best = 0.0_f64;
    for window in long.windows(width) {
        let window: String = window.iter().collect();
        best = best.max(ratio(short, &window));
        if best >= 100.0 {
            break;
        }
    }
    best
}

/// Compare the shared tokens against each side's shared-plus-remaining
/// tokens, so extra words on one side cost little.
fn token_set(a: &str, b: &str, score: fn(&str, &str) -> f64) -> f64 {
    let ta: BTreeSet<&str> = a.split_whitespace().collect();
    let tb: BTreeSet<&str> = b.split_whitespace().collect();

    let shared = join(ta.intersection(&tb));
    let only_a = join(ta.difference(&tb));
    let only_b = join(tb.difference(&ta));
    let with_a = join([shared.as_str(), only_a.as_str()].iter().filter(|s| !s.is_empty()));
    let with_b = join([shared.as_str(), only_b.as_str()].iter().filter(|s| !s.is_empty()));

    score(&shared, &with_a)
        .max(score(&shared, &with_b))
        .max(score(&with_a, &with_b))
}

fn join<'a, I, S>(parts: I) -> String
where
    I: IntoIterator<Item = &'a S>,
    S: AsRef<str> + ?Sized + 'a,
{
    parts
        .into_iter()
        .map(AsRef::as_ref)
        .collect::<Vec<&str>>()
        .join(" ")
}

fn normalize(input: &str) -> String {
    input
        .to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

fn sort_tokens(input: &str) -> String {
    let mut tokens: Vec<&str> = input.split_whitespace().collect();
    tokens.sort_unstable();
    tokens.join(" ")
}
