// src/config.rs
//! Startup configuration: API credentials from env, search criteria with
//! compiled-in defaults overridable from a TOML file and env thresholds.
//!
//! Everything is read once at startup into explicit structs and passed down
//! by reference; there are no process-wide singletons.

use anyhow::{anyhow, Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

// --- env names & defaults ---
pub const ENV_CRITERIA_CONFIG_PATH: &str = "CRITERIA_CONFIG_PATH";
pub const DEFAULT_CRITERIA_CONFIG_PATH: &str = "config/criteria.toml";

const ENV_MIN_FOLLOWERS: &str = "MIN_FOLLOWERS";
const ENV_MIN_ACCOUNT_AGE_DAYS: &str = "MIN_ACCOUNT_AGE_DAYS";
const ENV_DB_PATH: &str = "JOB_WATCHER_DB_PATH";

/// Credentials that must be present for the process to start at all.
const REQUIRED_ENV: &[&str] = &[
    "TWITTER_BEARER_TOKEN",
    "TWITTER_API_KEY",
    "TWITTER_API_SECRET",
    "TWITTER_ACCESS_TOKEN",
    "TWITTER_ACCESS_TOKEN_SECRET",
];

/// How often a search cycle runs.
pub const SEARCH_INTERVAL: Duration = Duration::from_secs(15 * 60);
/// How often the retention prune runs.
pub const PRUNE_INTERVAL: Duration = Duration::from_secs(24 * 60 * 60);
/// Processed-id records older than this are pruned.
pub const RETENTION_DAYS: i64 = 7;
/// Upstream search API budget: calls per window, enforced by blocking.
pub const RATE_LIMIT_CALLS: u32 = 180;
pub const RATE_LIMIT_WINDOW: Duration = Duration::from_secs(900);

/// Filtering thresholds and keyword lists for one deployment.
#[derive(Debug, Clone, PartialEq)]
pub struct Criteria {
    /// Phrases that make a post a candidate; match order is list order.
    pub keywords: Vec<String>,
    /// Phrases that veto a post regardless of keyword matches.
    pub excluded_phrases: Vec<String>,
    /// Strict lower bound: followers below this are rejected.
    pub min_followers: u64,
    pub min_account_age_days: i64,
    /// Posts older than this many hours are stale.
    pub max_post_age_hours: i64,
    /// Upper bound on results requested per search call.
    pub search_page_size: u32,
}

impl Default for Criteria {
    fn default() -> Self {
        Self {
            keywords: [
                "hiring frontend",
                "frontend engineers",
                "new frontend",
                "apply frontend",
                "frontend developer",
                "frontend developers",
                "frontend engineer",
                "hiring react developer",
                "hiring javascript developer",
                "frontend position",
                "frontend role",
                "react role",
                "frontend job",
                "frontend opening",
                "frontend vacancy",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            excluded_phrases: [
                "not hiring",
                "closed",
                "filled",
                "expired",
                "canceled",
                "cancelled",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            min_followers: 999,
            min_account_age_days: 365,
            max_post_age_hours: 60,
            search_page_size: 100,
        }
    }
}

/// Optional overrides parsed from `config/criteria.toml`.
#[derive(Debug, serde::Deserialize)]
struct CriteriaFile {
    keywords: Option<Vec<String>>,
    excluded_phrases: Option<Vec<String>>,
    min_followers: Option<u64>,
    min_account_age_days: Option<i64>,
    max_post_age_hours: Option<i64>,
    search_page_size: Option<u32>,
}

/// Load criteria from an explicit TOML path, applied over defaults.
pub fn load_criteria_from(path: &Path) -> Result<Criteria> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("reading criteria from {}", path.display()))?;
    let file: CriteriaFile =
        toml::from_str(&content).with_context(|| format!("parsing {}", path.display()))?;

    let mut c = Criteria::default();
    if let Some(v) = file.keywords {
        c.keywords = clean_list(v);
    }
    if let Some(v) = file.excluded_phrases {
        c.excluded_phrases = clean_list(v);
    }
    if let Some(v) = file.min_followers {
        c.min_followers = v;
    }
    if let Some(v) = file.min_account_age_days {
        c.min_account_age_days = v;
    }
    if let Some(v) = file.max_post_age_hours {
        c.max_post_age_hours = v;
    }
    if let Some(v) = file.search_page_size {
        c.search_page_size = v.min(100);
    }
    Ok(c)
}

/// Load criteria using env var + fallbacks:
/// 1) $CRITERIA_CONFIG_PATH
/// 2) config/criteria.toml
/// 3) compiled-in defaults
/// Numeric threshold env overrides win over the file in all cases.
pub fn load_criteria_default() -> Result<Criteria> {
    let mut c = if let Ok(p) = std::env::var(ENV_CRITERIA_CONFIG_PATH) {
        let pb = PathBuf::from(p);
        if !pb.exists() {
            return Err(anyhow!("{ENV_CRITERIA_CONFIG_PATH} points to non-existent path"));
        }
        load_criteria_from(&pb)?
    } else {
        let default_p = PathBuf::from(DEFAULT_CRITERIA_CONFIG_PATH);
        if default_p.exists() {
            load_criteria_from(&default_p)?
        } else {
            Criteria::default()
        }
    };

    if let Some(v) = parse_u64_env(ENV_MIN_FOLLOWERS) {
        c.min_followers = v;
    }
    if let Some(v) = parse_u64_env(ENV_MIN_ACCOUNT_AGE_DAYS) {
        c.min_account_age_days = v as i64;
    }
    Ok(c)
}

fn parse_u64_env(name: &str) -> Option<u64> {
    std::env::var(name)
        .ok()
        .and_then(|s| s.trim().parse::<u64>().ok())
}

fn clean_list(items: Vec<String>) -> Vec<String> {
    // Trim and drop empties; keep configured order (it drives match order).
    items
        .into_iter()
        .filter_map(|it| {
            let t = it.trim().to_string();
            (!t.is_empty()).then_some(t)
        })
        .collect()
}

/// Everything the process needs, constructed once at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bearer_token: String,
    pub api_key: String,
    pub api_secret: String,
    pub access_token: String,
    pub access_token_secret: String,
    /// DM recipient for alerts; alerts are skipped when unset.
    pub dm_recipient_id: Option<String>,
    /// Optional secondary webhook channel.
    pub webhook_url: Option<String>,
    pub db_path: String,
    pub criteria: Criteria,
}

impl AppConfig {
    /// Read and validate configuration from the environment. Missing required
    /// credentials abort startup with the full list of missing names.
    pub fn from_env() -> Result<Self> {
        let missing: Vec<&str> = REQUIRED_ENV
            .iter()
            .copied()
            .filter(|name| std::env::var(name).map_or(true, |v| v.trim().is_empty()))
            .collect();
        if !missing.is_empty() {
            return Err(anyhow!(
                "missing required environment variables: {}",
                missing.join(", ")
            ));
        }

        let get = |name: &str| std::env::var(name).unwrap_or_default();

        Ok(Self {
            bearer_token: get("TWITTER_BEARER_TOKEN"),
            api_key: get("TWITTER_API_KEY"),
            api_secret: get("TWITTER_API_SECRET"),
            access_token: get("TWITTER_ACCESS_TOKEN"),
            access_token_secret: get("TWITTER_ACCESS_TOKEN_SECRET"),
            dm_recipient_id: optional_env("YOUR_TWITTER_USER_ID"),
            webhook_url: optional_env("NOTIFICATION_WEBHOOK_URL"),
            db_path: std::env::var(ENV_DB_PATH).unwrap_or_else(|_| "job_watcher.db".to_string()),
            criteria: load_criteria_default()?,
        })
    }
}

fn optional_env(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    #[test]
    fn defaults_match_policy_constants() {
        let c = Criteria::default();
        assert_eq!(c.keywords.len(), 15);
        assert_eq!(c.excluded_phrases.len(), 6);
        assert_eq!(c.min_followers, 999);
        assert_eq!(c.min_account_age_days, 365);
        assert_eq!(c.max_post_age_hours, 60);
        assert_eq!(c.search_page_size, 100);
    }

    #[test]
    fn criteria_file_overrides_apply_over_defaults() {
        let file: CriteriaFile = toml::from_str(
            r#"
            min_followers = 5000
            keywords = [" hiring rust ", "", "rust developer"]
            "#,
        )
        .unwrap();
        let mut c = Criteria::default();
        if let Some(v) = file.keywords {
            c.keywords = clean_list(v);
        }
        if let Some(v) = file.min_followers {
            c.min_followers = v;
        }
        assert_eq!(c.min_followers, 5000);
        assert_eq!(c.keywords, vec!["hiring rust", "rust developer"]);
        // untouched fields keep defaults
        assert_eq!(c.min_account_age_days, 365);
    }

    #[serial_test::serial]
    #[test]
    fn missing_credentials_list_all_names() {
        let saved: Vec<(String, Option<String>)> = REQUIRED_ENV
            .iter()
            .map(|n| (n.to_string(), env::var(n).ok()))
            .collect();
        for name in REQUIRED_ENV {
            env::remove_var(name);
        }

        let err = AppConfig::from_env().unwrap_err().to_string();
        for name in REQUIRED_ENV {
            assert!(err.contains(name), "error should name {name}: {err}");
        }

        for (name, value) in saved {
            match value {
                Some(v) => env::set_var(&name, v),
                None => env::remove_var(&name),
            }
        }
    }

    #[serial_test::serial]
    #[test]
    fn threshold_env_overrides_win() {
        env::set_var(ENV_MIN_FOLLOWERS, "42");
        env::remove_var(ENV_CRITERIA_CONFIG_PATH);
        let c = load_criteria_default().unwrap();
        assert_eq!(c.min_followers, 42);
        env::remove_var(ENV_MIN_FOLLOWERS);
    }
}
