// tests/store_dedup.rs
//! Deduplication store contract: idempotent inserts, atomic acceptance, and
//! retention pruning boundaries.

use chrono::{Duration, Utc};

use frontend_job_watcher::store::Store;
use frontend_job_watcher::types::AcceptedJobPost;

fn accepted(id: &str) -> AcceptedJobPost {
    AcceptedJobPost {
        id: id.into(),
        author_handle: "acme_jobs".into(),
        author_followers: 1500,
        account_age_days: 400,
        text: "We are hiring frontend developer, apply now!".into(),
        created_at: Utc::now() - Duration::hours(2),
        matching_keywords: vec!["hiring frontend".into(), "frontend developer".into()],
    }
}

#[tokio::test]
async fn mark_processed_twice_is_a_noop() {
    let store = Store::open_in_memory().await.unwrap();
    let now = Utc::now();

    store.mark_processed("1", "alice", now).await.unwrap();
    store.mark_processed("1", "alice", now).await.unwrap();

    assert_eq!(store.processed_count().await.unwrap(), 1);
    assert!(store.is_processed("1").await.unwrap());
    assert!(!store.is_processed("2").await.unwrap());
}

#[tokio::test]
async fn save_accepted_twice_keeps_one_row() {
    let store = Store::open_in_memory().await.unwrap();
    let now = Utc::now();
    let post = accepted("10");

    store.save_accepted(&post, now).await.unwrap();
    store.save_accepted(&post, now).await.unwrap();

    assert_eq!(store.accepted_count().await.unwrap(), 1);
}

#[tokio::test]
async fn record_acceptance_writes_both_tables() {
    let store = Store::open_in_memory().await.unwrap();
    let now = Utc::now();
    let post = accepted("20");

    store.record_acceptance(&post, now).await.unwrap();

    assert!(store.is_processed("20").await.unwrap());
    assert_eq!(store.accepted_count().await.unwrap(), 1);

    // repeat is a no-op on both tables
    store.record_acceptance(&post, now).await.unwrap();
    assert_eq!(store.processed_count().await.unwrap(), 1);
    assert_eq!(store.accepted_count().await.unwrap(), 1);
}

#[tokio::test]
async fn accepted_round_trip_preserves_keyword_order() {
    let store = Store::open_in_memory().await.unwrap();
    let post = accepted("30");

    store.record_acceptance(&post, Utc::now()).await.unwrap();
    let loaded = store.fetch_accepted("30").await.unwrap().unwrap();

    assert_eq!(loaded.matching_keywords, post.matching_keywords);
    assert_eq!(loaded.author_followers, 1500);
    assert_eq!(loaded.account_age_days, 400);
}

#[tokio::test]
async fn prune_removes_old_records_and_keeps_recent() {
    let store = Store::open_in_memory().await.unwrap();
    let now = Utc::now();

    store
        .mark_processed("old", "alice", now - Duration::days(8))
        .await
        .unwrap();
    store
        .mark_processed("recent", "bob", now - Duration::days(6))
        .await
        .unwrap();

    let removed = store.prune(now - Duration::days(7)).await.unwrap();

    assert_eq!(removed, 1);
    assert!(!store.is_processed("old").await.unwrap());
    assert!(store.is_processed("recent").await.unwrap());
}

#[tokio::test]
async fn prune_cutoff_is_strict() {
    let store = Store::open_in_memory().await.unwrap();
    let now = Utc::now();
    let cutoff = now - Duration::days(7);

    // exactly at the cutoff: not strictly before, so retained
    store.mark_processed("edge", "carol", cutoff).await.unwrap();
    let removed = store.prune(cutoff).await.unwrap();

    assert_eq!(removed, 0);
    assert!(store.is_processed("edge").await.unwrap());
}

#[tokio::test]
async fn prune_never_touches_accepted_posts() {
    let store = Store::open_in_memory().await.unwrap();
    let now = Utc::now();
    let post = accepted("40");

    store.record_acceptance(&post, now - Duration::days(30)).await.unwrap();
    store.prune(now - Duration::days(7)).await.unwrap();

    // the dedup marker ages out, the accepted record does not
    assert!(!store.is_processed("40").await.unwrap());
    assert_eq!(store.accepted_count().await.unwrap(), 1);
}

#[tokio::test]
async fn mark_notified_flips_the_flag_only() {
    let store = Store::open_in_memory().await.unwrap();
    let now = Utc::now();

    store.mark_processed("50", "dave", now).await.unwrap();
    store.mark_notified("50").await.unwrap();

    // still a single membership row
    assert_eq!(store.processed_count().await.unwrap(), 1);
    assert!(store.is_processed("50").await.unwrap());
}
