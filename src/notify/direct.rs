// src/notify/direct.rs
//! Primary alert channel: a direct message to one configured recipient via
//! the v2 DM conversations endpoint.

use anyhow::{Context, Result};
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;

use super::{format_alert, NotifyChannel};
use crate::types::AcceptedJobPost;

pub struct DirectMessageNotifier {
    client: Client,
    bearer_token: String,
    recipient_id: String,
    timeout: Duration,
}

impl DirectMessageNotifier {
    pub fn new(bearer_token: String, recipient_id: String) -> Self {
        Self {
            client: Client::new(),
            bearer_token,
            recipient_id,
            timeout: Duration::from_secs(10),
        }
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout = Duration::from_secs(secs);
        self
    }

    fn endpoint(&self) -> String {
        format!(
            "https://api.twitter.com/2/dm_conversations/with/{}/messages",
            self.recipient_id
        )
    }
}

#[derive(Serialize)]
struct DmBody {
    text: String,
}

#[async_trait::async_trait]
impl NotifyChannel for DirectMessageNotifier {
    fn name(&self) -> &'static str {
        "direct-message"
    }

    async fn send(&self, post: &AcceptedJobPost) -> Result<()> {
        let body = DmBody {
            text: format_alert(post),
        };
        let rsp = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.bearer_token)
            .timeout(self.timeout)
            .json(&body)
            .send()
            .await
            .context("DM request failed")?;
        rsp.error_for_status().context("DM HTTP error")?;
        Ok(())
    }
}
