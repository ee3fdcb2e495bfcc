//! Frontend Job Watcher — Binary Entrypoint
//! Validates configuration, opens the store, and drives the scheduler loop.

use anyhow::Result;
use chrono::{Duration as ChronoDuration, Utc};
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use frontend_job_watcher::config::{
    AppConfig, PRUNE_INTERVAL, RETENTION_DAYS, SEARCH_INTERVAL,
};
use frontend_job_watcher::cycle::run_search_cycle;
use frontend_job_watcher::notify::{
    DirectMessageNotifier, Notifier, NotifyChannel, WebhookNotifier,
};
use frontend_job_watcher::scheduler::{JobKind, Scheduler, TICK};
use frontend_job_watcher::search::TwitterSearch;
use frontend_job_watcher::store::Store;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("frontend_job_watcher=info,warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .init();
}

fn build_notifier(cfg: &AppConfig) -> Notifier {
    let mut channels: Vec<Box<dyn NotifyChannel>> = Vec::new();
    if let Some(recipient) = &cfg.dm_recipient_id {
        channels.push(Box::new(DirectMessageNotifier::new(
            cfg.bearer_token.clone(),
            recipient.clone(),
        )));
    }
    if let Some(url) = &cfg.webhook_url {
        channels.push(Box::new(WebhookNotifier::new(url.clone())));
    }
    if channels.is_empty() {
        info!("no notification channel configured; accepted posts are only persisted");
    }
    Notifier::new(channels)
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env in local/dev; no-op in prod environments.
    let _ = dotenvy::dotenv();
    init_tracing();

    // Missing credentials abort here, before anything else starts.
    let cfg = AppConfig::from_env()?;
    info!("starting frontend job watcher");

    let store = Store::open(&cfg.db_path).await?;
    let search = TwitterSearch::new(&cfg);
    let notifier = build_notifier(&cfg);

    let mut scheduler = Scheduler::new(Utc::now(), SEARCH_INTERVAL, PRUNE_INTERVAL);

    loop {
        for job in scheduler.due(Utc::now()) {
            match job {
                JobKind::SearchCycle => {
                    if let Err(e) = run_search_cycle(&search, &store, &notifier, &cfg.criteria).await
                    {
                        // store failure aborts the cycle, not the process
                        error!(error = ?e, "search cycle aborted");
                    }
                }
                JobKind::Prune => {
                    let cutoff = Utc::now() - ChronoDuration::days(RETENTION_DAYS);
                    match store.prune(cutoff).await {
                        Ok(removed) => info!(removed, "cleaned up old processed records"),
                        Err(e) => error!(error = ?e, "prune failed"),
                    }
                }
            }
        }

        tokio::select! {
            _ = tokio::time::sleep(TICK) => {}
            _ = tokio::signal::ctrl_c() => {
                info!("shutdown requested, stopping");
                return Ok(());
            }
        }
    }
}
