// src/cycle.rs
//! One full search → filter → persist → notify pass.
//!
//! Collaborator failures degrade to an empty result for the cycle; store
//! failures abort the cycle (the caller logs them and waits for the next
//! scheduled run). Every examined candidate lands in the processed set,
//! accepted or not.

use anyhow::Result;
use chrono::Utc;
use tracing::{debug, info, warn};

use crate::config::Criteria;
use crate::filter::{evaluate, Rejection};
use crate::notify::Notifier;
use crate::search::{build_query, SearchProvider};
use crate::store::Store;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CycleOutcome {
    pub fetched: usize,
    pub accepted: usize,
}

pub async fn run_search_cycle(
    provider: &dyn SearchProvider,
    store: &Store,
    notifier: &Notifier,
    criteria: &Criteria,
) -> Result<CycleOutcome> {
    info!("starting search cycle");

    let query = build_query(&criteria.keywords);
    let candidates = match provider
        .fetch_recent(&query, criteria.search_page_size)
        .await
    {
        Ok(v) => v,
        Err(e) => {
            warn!(error = ?e, provider = provider.name(), "search failed, empty cycle");
            Vec::new()
        }
    };
    info!(found = candidates.len(), "candidates fetched");

    let now = Utc::now();
    let mut accepted = 0usize;

    for candidate in &candidates {
        let already_processed = store.is_processed(&candidate.id).await?;

        match evaluate(candidate, now, already_processed, criteria) {
            Ok(post) => {
                // accepted record + dedup marker commit together, before
                // any notification goes out
                store.record_acceptance(&post, now).await?;
                if notifier.notify(&post).await {
                    store.mark_notified(&post.id).await?;
                }
                accepted += 1;
                info!(
                    post_id = %post.id,
                    author = %post.author_handle,
                    keywords = ?post.matching_keywords,
                    "new job found"
                );
            }
            Err(reason) => {
                log_rejection(&candidate.id, &reason);
                store
                    .mark_processed(&candidate.id, &candidate.author_handle, now)
                    .await?;
            }
        }
    }

    info!(accepted, "search cycle completed");
    Ok(CycleOutcome {
        fetched: candidates.len(),
        accepted,
    })
}

fn log_rejection(post_id: &str, reason: &Rejection) {
    match reason {
        // silent stages: dedup hits and plain non-matches are the common case
        Rejection::AlreadyProcessed | Rejection::NoKeywordMatch => {
            debug!(post_id = %post_id, reason = ?reason, "candidate skipped");
        }
        Rejection::Stale { age_hours } => {
            info!(post_id = %post_id, age_hours = %format!("{age_hours:.1}"), "excluded: too old");
        }
        Rejection::ExcludedPhrase => {
            info!(post_id = %post_id, "excluded due to negative keywords");
        }
        Rejection::LowFollowers { followers } => {
            info!(post_id = %post_id, followers, "excluded: not enough followers");
        }
        Rejection::AccountTooNew { age_days } => {
            info!(post_id = %post_id, age_days, "excluded: account too new");
        }
        Rejection::LikelySpam => {
            info!(post_id = %post_id, "excluded: appears to be spam");
        }
    }
}
