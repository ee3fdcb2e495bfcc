// src/types.rs
use chrono::{DateTime, Utc};

/// A freshly fetched post from the search collaborator, not yet evaluated.
/// Owned by the calling cycle; never persisted directly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidatePost {
    pub id: String,
    pub author_handle: String,
    pub author_followers: u64,
    pub author_created_at: DateTime<Utc>,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

/// A candidate that passed every filter stage. Immutable after creation,
/// persisted indefinitely.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AcceptedJobPost {
    pub id: String,
    pub author_handle: String,
    pub author_followers: u64,
    /// Whole days between acceptance time and account creation.
    pub account_age_days: i64,
    pub text: String,
    pub created_at: DateTime<Utc>,
    /// Matched phrases in configured list order (not text occurrence order).
    pub matching_keywords: Vec<String>,
}

impl AcceptedJobPost {
    /// Permalink to the post on the platform.
    pub fn url(&self) -> String {
        format!(
            "https://twitter.com/{}/status/{}",
            self.author_handle, self.id
        )
    }
}
