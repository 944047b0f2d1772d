//! OCR output cleanup.

/// Clean an OCR fragment into a search term.
///
/// Trims surrounding whitespace, then keeps only alphanumeric characters,
/// spaces and hyphens. Case is preserved; autocorrection lowercases later.
pub fn preprocess_search_term(term: &str) -> String {
    term.trim()
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == ' ' || *c == '-')
        .collect()
}
