// src/store.rs
//! Deduplication store: a persistent set of processed post ids plus the table
//! of accepted job posts, backed by SQLite via sqlx.
//!
//! Single-writer model: the store is only touched from the one worker running
//! cycles, so no locking discipline beyond the connection itself is needed.
//! All inserts are insert-if-absent; duplicate calls are no-ops, never errors.
//! Timestamps are stored as unix seconds (UTC).

use anyhow::{Context, Result};
use chrono::{DateTime, TimeZone, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::Row;

use crate::types::AcceptedJobPost;

#[derive(Clone)]
pub struct Store {
    pool: SqlitePool,
}

impl Store {
    /// Open (creating if missing) the database at `path` and ensure schema.
    pub async fn open(path: &str) -> Result<Self> {
        let opts = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(opts)
            .await
            .with_context(|| format!("opening database {path}"))?;
        let store = Self { pool };
        store.init_schema().await?;
        Ok(store)
    }

    /// In-memory database for tests.
    pub async fn open_in_memory() -> Result<Self> {
        // a reaped connection would drop the whole in-memory database
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await
            .context("opening in-memory database")?;
        let store = Self { pool };
        store.init_schema().await?;
        Ok(store)
    }

    async fn init_schema(&self) -> Result<()> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS processed_posts (
                post_id       TEXT PRIMARY KEY,
                author_handle TEXT NOT NULL,
                processed_at  INTEGER NOT NULL,
                notified      INTEGER NOT NULL DEFAULT 0
            )",
        )
        .execute(&self.pool)
        .await
        .context("creating processed_posts")?;

        sqlx::query(
            "CREATE TABLE IF NOT EXISTS job_posts (
                post_id           TEXT PRIMARY KEY,
                author_handle     TEXT NOT NULL,
                author_followers  INTEGER NOT NULL,
                account_age_days  INTEGER NOT NULL,
                post_text         TEXT NOT NULL,
                matching_keywords TEXT NOT NULL,
                created_at        INTEGER NOT NULL,
                processed_at      INTEGER NOT NULL
            )",
        )
        .execute(&self.pool)
        .await
        .context("creating job_posts")?;

        Ok(())
    }

    /// Membership test against the processed-id set.
    pub async fn is_processed(&self, post_id: &str) -> Result<bool> {
        let exists: i64 =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM processed_posts WHERE post_id = ?)")
                .bind(post_id)
                .fetch_one(&self.pool)
                .await
                .context("checking processed set")?;
        Ok(exists != 0)
    }

    /// Idempotent insert into the processed-id set.
    pub async fn mark_processed(
        &self,
        post_id: &str,
        author_handle: &str,
        now: DateTime<Utc>,
    ) -> Result<()> {
        sqlx::query(
            "INSERT OR IGNORE INTO processed_posts (post_id, author_handle, processed_at)
             VALUES (?, ?, ?)",
        )
        .bind(post_id)
        .bind(author_handle)
        .bind(now.timestamp())
        .execute(&self.pool)
        .await
        .context("marking post processed")?;
        Ok(())
    }

    /// Idempotent insert of an accepted job post, keyed by post id.
    pub async fn save_accepted(&self, post: &AcceptedJobPost, now: DateTime<Utc>) -> Result<()> {
        sqlx::query(
            "INSERT OR IGNORE INTO job_posts
             (post_id, author_handle, author_followers, account_age_days,
              post_text, matching_keywords, created_at, processed_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&post.id)
        .bind(&post.author_handle)
        .bind(post.author_followers as i64)
        .bind(post.account_age_days)
        .bind(&post.text)
        .bind(post.matching_keywords.join(","))
        .bind(post.created_at.timestamp())
        .bind(now.timestamp())
        .execute(&self.pool)
        .await
        .context("saving accepted post")?;
        Ok(())
    }

    /// Persist an acceptance atomically: the accepted record and the
    /// processed-id marker land in one transaction, before any notification
    /// is attempted. A crash can therefore never leave an accepted post
    /// outside the dedup set.
    pub async fn record_acceptance(
        &self,
        post: &AcceptedJobPost,
        now: DateTime<Utc>,
    ) -> Result<()> {
        let mut tx = self.pool.begin().await.context("starting transaction")?;

        sqlx::query(
            "INSERT OR IGNORE INTO job_posts
             (post_id, author_handle, author_followers, account_age_days,
              post_text, matching_keywords, created_at, processed_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&post.id)
        .bind(&post.author_handle)
        .bind(post.author_followers as i64)
        .bind(post.account_age_days)
        .bind(&post.text)
        .bind(post.matching_keywords.join(","))
        .bind(post.created_at.timestamp())
        .bind(now.timestamp())
        .execute(&mut *tx)
        .await
        .context("saving accepted post")?;

        sqlx::query(
            "INSERT OR IGNORE INTO processed_posts (post_id, author_handle, processed_at)
             VALUES (?, ?, ?)",
        )
        .bind(&post.id)
        .bind(&post.author_handle)
        .bind(now.timestamp())
        .execute(&mut *tx)
        .await
        .context("marking accepted post processed")?;

        tx.commit().await.context("committing acceptance")?;
        Ok(())
    }

    /// Flip the notified flag after a successful delivery.
    pub async fn mark_notified(&self, post_id: &str) -> Result<()> {
        sqlx::query("UPDATE processed_posts SET notified = 1 WHERE post_id = ?")
            .bind(post_id)
            .execute(&self.pool)
            .await
            .context("marking post notified")?;
        Ok(())
    }

    /// Delete processed-id records strictly older than `cutoff`. The accepted
    /// job posts table is never touched. Returns the number of rows removed.
    pub async fn prune(&self, cutoff: DateTime<Utc>) -> Result<u64> {
        let res = sqlx::query("DELETE FROM processed_posts WHERE processed_at < ?")
            .bind(cutoff.timestamp())
            .execute(&self.pool)
            .await
            .context("pruning processed set")?;
        Ok(res.rows_affected())
    }

    pub async fn processed_count(&self) -> Result<i64> {
        sqlx::query_scalar("SELECT COUNT(*) FROM processed_posts")
            .fetch_one(&self.pool)
            .await
            .context("counting processed posts")
    }

    pub async fn accepted_count(&self) -> Result<i64> {
        sqlx::query_scalar("SELECT COUNT(*) FROM job_posts")
            .fetch_one(&self.pool)
            .await
            .context("counting accepted posts")
    }

    /// Load one accepted post back, mostly for diagnostics and tests.
    pub async fn fetch_accepted(&self, post_id: &str) -> Result<Option<AcceptedJobPost>> {
        let row = sqlx::query(
            "SELECT post_id, author_handle, author_followers, account_age_days,
                    post_text, matching_keywords, created_at
             FROM job_posts WHERE post_id = ?",
        )
        .bind(post_id)
        .fetch_optional(&self.pool)
        .await
        .context("loading accepted post")?;

        let Some(row) = row else {
            return Ok(None);
        };

        let keywords: String = row.try_get("matching_keywords")?;
        let created_ts: i64 = row.try_get("created_at")?;
        Ok(Some(AcceptedJobPost {
            id: row.try_get("post_id")?,
            author_handle: row.try_get("author_handle")?,
            author_followers: row.try_get::<i64, _>("author_followers")? as u64,
            account_age_days: row.try_get("account_age_days")?,
            text: row.try_get("post_text")?,
            created_at: Utc
                .timestamp_opt(created_ts, 0)
                .single()
                .context("invalid created_at in job_posts")?,
            matching_keywords: keywords
                .split(',')
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
        }))
    }
}
