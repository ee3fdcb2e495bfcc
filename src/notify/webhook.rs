// src/notify/webhook.rs
//! Optional secondary channel: POST the alert as JSON to a configured
//! webhook URL. Shares the formatted-message contract with the DM channel.

use anyhow::{Context, Result};
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;

use super::{format_alert, NotifyChannel};
use crate::types::AcceptedJobPost;

pub struct WebhookNotifier {
    client: Client,
    url: String,
    timeout: Duration,
}

impl WebhookNotifier {
    pub fn new(url: String) -> Self {
        Self {
            client: Client::new(),
            url,
            timeout: Duration::from_secs(10),
        }
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout = Duration::from_secs(secs);
        self
    }
}

#[derive(Serialize)]
struct WebhookPayload<'a> {
    text: String,
    post_url: String,
    job_post: JobPostSummary<'a>,
}

#[derive(Serialize)]
struct JobPostSummary<'a> {
    post_id: &'a str,
    author: &'a str,
    followers: u64,
    keywords: &'a [String],
}

#[async_trait::async_trait]
impl NotifyChannel for WebhookNotifier {
    fn name(&self) -> &'static str {
        "webhook"
    }

    async fn send(&self, post: &AcceptedJobPost) -> Result<()> {
        let payload = WebhookPayload {
            text: format_alert(post),
            post_url: post.url(),
            job_post: JobPostSummary {
                post_id: &post.id,
                author: &post.author_handle,
                followers: post.author_followers,
                keywords: &post.matching_keywords,
            },
        };
        let rsp = self
            .client
            .post(&self.url)
            .timeout(self.timeout)
            .json(&payload)
            .send()
            .await
            .context("webhook request failed")?;
        rsp.error_for_status().context("webhook HTTP error")?;
        Ok(())
    }
}
