// src/notify/mod.rs
//! Alert delivery: one formatted-message contract shared by every channel.
//! The direct-message channel is primary; a webhook can be added as an
//! optional secondary. Delivery is fire-and-forget from the cycle's
//! perspective: failures are logged, never retried, never fatal.

pub mod direct;
pub mod webhook;

use tracing::{info, warn};

use crate::types::AcceptedJobPost;

pub use direct::DirectMessageNotifier;
pub use webhook::WebhookNotifier;

/// Maximum characters of post text quoted in an alert.
const ALERT_TEXT_LIMIT: usize = 200;

#[async_trait::async_trait]
pub trait NotifyChannel: Send + Sync {
    fn name(&self) -> &'static str;
    async fn send(&self, post: &AcceptedJobPost) -> anyhow::Result<()>;
}

/// The human-readable alert body, identical for every channel.
pub fn format_alert(post: &AcceptedJobPost) -> String {
    format!(
        "🚨 New Frontend Job Alert!\n\n\
         👤 @{handle} ({followers} followers)\n\
         📅 Account age: {age} days\n\
         🔍 Keywords: {keywords}\n\
         🔗 {url}\n\n\
         \"{text}\"",
        handle = post.author_handle,
        followers = thousands(post.author_followers),
        age = post.account_age_days,
        keywords = post.matching_keywords.join(", "),
        url = post.url(),
        text = truncate_chars(&post.text, ALERT_TEXT_LIMIT),
    )
}

/// Fan out one accepted post to all configured channels.
pub struct Notifier {
    channels: Vec<Box<dyn NotifyChannel>>,
}

impl Notifier {
    pub fn new(channels: Vec<Box<dyn NotifyChannel>>) -> Self {
        Self { channels }
    }

    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }

    /// Returns true if at least one channel delivered.
    pub async fn notify(&self, post: &AcceptedJobPost) -> bool {
        let mut delivered = false;
        for ch in &self.channels {
            match ch.send(post).await {
                Ok(()) => {
                    info!(post_id = %post.id, channel = ch.name(), "alert sent");
                    delivered = true;
                }
                Err(e) => {
                    warn!(post_id = %post.id, channel = ch.name(), error = ?e, "alert delivery failed");
                }
            }
        }
        delivered
    }
}

/// Thousands-separated rendering, e.g. 1500 -> "1,500".
fn thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Char-safe truncation with an ellipsis marker when the text was cut.
fn truncate_chars(s: &str, limit: usize) -> String {
    if s.chars().count() <= limit {
        s.to_string()
    } else {
        let mut out: String = s.chars().take(limit).collect();
        out.push_str("...");
        out
    }
}
