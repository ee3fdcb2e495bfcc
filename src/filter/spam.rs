// src/filter/spam.rs
//! Basic spam detection over post text: excessive hashtags or mentions, and a
//! fixed set of known spam phrasings. Any single rule is sufficient to reject.

use once_cell::sync::Lazy;
use regex::Regex;

const MAX_HASHTAGS: usize = 10;
const MAX_MENTIONS: usize = 5;

static SPAM_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"click here",
        r"dm me",
        r"follow for follow",
        r"free money",
        r"make \$\d+",
        r"work from home.*\$\d+",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("spam pattern"))
    .collect()
});

/// True if the text looks like spam. Patterns are matched against the
/// lowercased text, so they are effectively case-insensitive.
pub fn is_likely_spam(text: &str) -> bool {
    if text.matches('#').count() > MAX_HASHTAGS {
        return true;
    }
    if text.matches('@').count() > MAX_MENTIONS {
        return true;
    }

    let lower = text.to_lowercase();
    SPAM_PATTERNS.iter().any(|re| re.is_match(&lower))
}
