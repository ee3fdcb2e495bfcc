// src/search.rs
//! Search collaborator: the Twitter/X v2 recent-search endpoint behind a
//! provider trait so cycles can run against fakes in tests.
//!
//! The upstream budget (180 calls per 15-minute window) is enforced by a
//! blocking limiter: an exhausted budget makes the caller wait for the window
//! to roll, it never errors.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Deserialize;
use std::collections::{HashMap, VecDeque};
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;

use crate::config::{AppConfig, RATE_LIMIT_CALLS, RATE_LIMIT_WINDOW};
use crate::types::CandidatePost;

const SEARCH_URL: &str = "https://api.twitter.com/2/tweets/search/recent";

#[async_trait::async_trait]
pub trait SearchProvider: Send + Sync {
    /// Fetch up to `page_size` recent posts matching `query`, joined with
    /// author metadata.
    async fn fetch_recent(&self, query: &str, page_size: u32) -> Result<Vec<CandidatePost>>;
    fn name(&self) -> &'static str;
}

/// Build the boolean-OR query over all keyword phrases, restricted to
/// original English-language posts.
pub fn build_query(keywords: &[String]) -> String {
    let joined = keywords
        .iter()
        .map(|k| format!("\"{k}\""))
        .collect::<Vec<_>>()
        .join(" OR ");
    format!("({joined}) -is:retweet lang:en")
}

/// Sliding-window call budget that blocks instead of failing.
pub struct RateLimiter {
    budget: u32,
    window: Duration,
    calls: Mutex<VecDeque<Instant>>,
}

impl RateLimiter {
    pub fn new(budget: u32, window: Duration) -> Self {
        Self {
            budget,
            window,
            calls: Mutex::new(VecDeque::new()),
        }
    }

    /// Wait until a call slot is available, then consume it.
    pub async fn acquire(&self) {
        loop {
            let wait = {
                let mut calls = self.calls.lock().await;
                let now = Instant::now();
                while let Some(front) = calls.front() {
                    if now.duration_since(*front) >= self.window {
                        calls.pop_front();
                    } else {
                        break;
                    }
                }
                if (calls.len() as u32) < self.budget {
                    calls.push_back(now);
                    return;
                }
                // oldest call ages out of the window first
                self.window - now.duration_since(*calls.front().expect("non-empty window"))
            };
            tokio::time::sleep(wait).await;
        }
    }
}

pub struct TwitterSearch {
    client: Client,
    bearer_token: String,
    limiter: RateLimiter,
}

impl TwitterSearch {
    pub fn new(cfg: &AppConfig) -> Self {
        Self {
            client: Client::new(),
            bearer_token: cfg.bearer_token.clone(),
            limiter: RateLimiter::new(RATE_LIMIT_CALLS, RATE_LIMIT_WINDOW),
        }
    }
}

#[async_trait::async_trait]
impl SearchProvider for TwitterSearch {
    async fn fetch_recent(&self, query: &str, page_size: u32) -> Result<Vec<CandidatePost>> {
        self.limiter.acquire().await;

        let max_results = page_size.to_string();
        let rsp = self
            .client
            .get(SEARCH_URL)
            .bearer_auth(&self.bearer_token)
            .query(&[
                ("query", query),
                ("max_results", max_results.as_str()),
                ("tweet.fields", "created_at,author_id,public_metrics"),
                ("user.fields", "created_at,public_metrics,verified"),
                ("expansions", "author_id"),
            ])
            .timeout(Duration::from_secs(30))
            .send()
            .await
            .context("search request failed")?;

        let rsp = rsp.error_for_status().context("search HTTP error")?;
        let body: SearchResponse = rsp.json().await.context("decoding search response")?;
        Ok(join_authors(body))
    }

    fn name(&self) -> &'static str {
        "twitter-recent-search"
    }
}

// --- v2 response shapes (only the consumed fields) ---

#[derive(Debug, Deserialize)]
struct SearchResponse {
    data: Option<Vec<TweetRow>>,
    includes: Option<Includes>,
}

#[derive(Debug, Deserialize)]
struct TweetRow {
    id: String,
    text: String,
    author_id: String,
    created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
struct Includes {
    users: Option<Vec<UserRow>>,
}

#[derive(Debug, Deserialize)]
struct UserRow {
    id: String,
    username: String,
    created_at: DateTime<Utc>,
    public_metrics: UserMetrics,
}

#[derive(Debug, Deserialize)]
struct UserMetrics {
    #[serde(default)]
    followers_count: u64,
}

/// Join tweet rows to their expanded author rows; tweets whose author did not
/// come back in the expansion are skipped.
fn join_authors(body: SearchResponse) -> Vec<CandidatePost> {
    let users: HashMap<String, UserRow> = body
        .includes
        .and_then(|i| i.users)
        .unwrap_or_default()
        .into_iter()
        .map(|u| (u.id.clone(), u))
        .collect();

    body.data
        .unwrap_or_default()
        .into_iter()
        .filter_map(|t| {
            let user = users.get(&t.author_id)?;
            Some(CandidatePost {
                id: t.id,
                author_handle: user.username.clone(),
                author_followers: user.public_metrics.followers_count,
                author_created_at: user.created_at,
                text: t.text,
                created_at: t.created_at,
            })
        })
        .collect()
}
