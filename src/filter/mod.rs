// src/filter/mod.rs
//! Eligibility filter: the composed accept/reject decision over all predicate
//! stages. Pure function of (candidate, now, processed-set membership,
//! criteria) — no I/O, suitable for unit tests and offline evaluation.
//!
//! Stages short-circuit at the first failure. The ordering matters only for
//! which rejection gets logged; the stages are independent ANDs, so the final
//! accept/reject outcome is order-free.

pub mod keywords;
pub mod spam;

use chrono::{DateTime, Utc};

use crate::config::Criteria;
use crate::types::{AcceptedJobPost, CandidatePost};

pub use keywords::{has_excluded_phrase, matching_keywords};
pub use spam::is_likely_spam;

/// The stage at which a candidate was rejected.
#[derive(Debug, Clone, PartialEq)]
pub enum Rejection {
    AlreadyProcessed,
    Stale { age_hours: f64 },
    NoKeywordMatch,
    ExcludedPhrase,
    LowFollowers { followers: u64 },
    AccountTooNew { age_days: i64 },
    LikelySpam,
}

/// Evaluate one candidate against the full policy.
///
/// All timestamps are UTC instants; age arithmetic subtracts them directly
/// rather than stripping offsets.
pub fn evaluate(
    candidate: &CandidatePost,
    now: DateTime<Utc>,
    already_processed: bool,
    criteria: &Criteria,
) -> Result<AcceptedJobPost, Rejection> {
    if already_processed {
        return Err(Rejection::AlreadyProcessed);
    }

    let age_hours = (now - candidate.created_at).num_seconds() as f64 / 3600.0;
    if age_hours > criteria.max_post_age_hours as f64 {
        return Err(Rejection::Stale { age_hours });
    }

    let matched = matching_keywords(&candidate.text, &criteria.keywords);
    if matched.is_empty() {
        return Err(Rejection::NoKeywordMatch);
    }

    if has_excluded_phrase(&candidate.text, &criteria.excluded_phrases) {
        return Err(Rejection::ExcludedPhrase);
    }

    if candidate.author_followers < criteria.min_followers {
        return Err(Rejection::LowFollowers {
            followers: candidate.author_followers,
        });
    }

    // Whole days, floor division.
    let account_age_days = (now - candidate.author_created_at).num_days();
    if account_age_days < criteria.min_account_age_days {
        return Err(Rejection::AccountTooNew {
            age_days: account_age_days,
        });
    }

    if is_likely_spam(&candidate.text) {
        return Err(Rejection::LikelySpam);
    }

    Ok(AcceptedJobPost {
        id: candidate.id.clone(),
        author_handle: candidate.author_handle.clone(),
        author_followers: candidate.author_followers,
        account_age_days,
        text: candidate.text.clone(),
        created_at: candidate.created_at,
        matching_keywords: matched,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn candidate(now: DateTime<Utc>) -> CandidatePost {
        CandidatePost {
            id: "1001".into(),
            author_handle: "acme_jobs".into(),
            author_followers: 1500,
            author_created_at: now - Duration::days(400),
            text: "We are hiring frontend developer, apply now!".into(),
            created_at: now - Duration::hours(2),
        }
    }

    fn now() -> DateTime<Utc> {
        "2025-06-01T12:00:00Z".parse().unwrap()
    }

    #[test]
    fn fully_eligible_candidate_is_accepted() {
        let now = now();
        let post = evaluate(&candidate(now), now, false, &Criteria::default()).unwrap();
        assert_eq!(post.account_age_days, 400);
        assert!(post
            .matching_keywords
            .contains(&"hiring frontend".to_string()));
        assert!(post
            .matching_keywords
            .contains(&"frontend developer".to_string()));
    }

    #[test]
    fn already_processed_wins_over_everything() {
        let now = now();
        let err = evaluate(&candidate(now), now, true, &Criteria::default()).unwrap_err();
        assert_eq!(err, Rejection::AlreadyProcessed);
    }

    #[test]
    fn young_account_is_rejected_before_spam_check() {
        let now = now();
        let mut c = candidate(now);
        c.author_created_at = now - Duration::days(200);
        // spam bait in the text must not matter; account age fails first
        c.text.push_str(" click here");
        let err = evaluate(&c, now, false, &Criteria::default()).unwrap_err();
        assert_eq!(err, Rejection::AccountTooNew { age_days: 200 });
    }

    #[test]
    fn exclusion_phrase_vetoes_despite_keyword_match() {
        let now = now();
        let mut c = candidate(now);
        c.text = "frontend developer role — not hiring anymore".into();
        let err = evaluate(&c, now, false, &Criteria::default()).unwrap_err();
        assert_eq!(err, Rejection::ExcludedPhrase);
    }

    #[test]
    fn stale_post_is_rejected() {
        let now = now();
        let mut c = candidate(now);
        c.created_at = now - Duration::hours(61);
        assert!(matches!(
            evaluate(&c, now, false, &Criteria::default()),
            Err(Rejection::Stale { .. })
        ));
    }

    #[test]
    fn exactly_sixty_hours_is_still_fresh() {
        let now = now();
        let mut c = candidate(now);
        c.created_at = now - Duration::hours(60);
        assert!(evaluate(&c, now, false, &Criteria::default()).is_ok());
    }

    #[test]
    fn follower_threshold_is_strict() {
        let now = now();
        let mut c = candidate(now);
        c.author_followers = 998;
        assert_eq!(
            evaluate(&c, now, false, &Criteria::default()).unwrap_err(),
            Rejection::LowFollowers { followers: 998 }
        );
        c.author_followers = 999;
        assert!(evaluate(&c, now, false, &Criteria::default()).is_ok());
    }

    #[test]
    fn eligibility_is_monotonic_in_min_followers() {
        let now = now();
        let c = candidate(now);
        let mut criteria = Criteria::default();

        criteria.min_followers = 100;
        let accepted_low = evaluate(&c, now, false, &criteria).is_ok();
        criteria.min_followers = 10_000;
        let accepted_high = evaluate(&c, now, false, &criteria).is_ok();

        // raising the bar can only flip accept -> reject
        assert!(accepted_low);
        assert!(!accepted_high);
    }
}
