// src/filter/keywords.rs
//! Keyword matcher and exclusion filter: plain case-insensitive substring
//! containment, no tokenization or word-boundary logic. "frontend developers"
//! therefore also satisfies the phrase "frontend developer".

/// Return the configured phrases contained in `text`, preserving list order.
/// An empty result means the post is never eligible.
pub fn matching_keywords(text: &str, phrases: &[String]) -> Vec<String> {
    let text_lower = text.to_lowercase();
    phrases
        .iter()
        .filter(|p| text_lower.contains(&p.to_lowercase()))
        .cloned()
        .collect()
}

/// True if any negative phrase is present (any case): a veto regardless of
/// keyword matches.
pub fn has_excluded_phrase(text: &str, phrases: &[String]) -> bool {
    let text_lower = text.to_lowercase();
    phrases.iter().any(|p| text_lower.contains(&p.to_lowercase()))
}
