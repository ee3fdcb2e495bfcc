// src/scheduler.rs
//! Cooperative interval scheduler: a single worker polls a small job list at
//! a fixed tick and runs whatever is due to completion before the next poll.
//! Jobs never overlap; a slow cycle simply delays the next check.

use chrono::{DateTime, Duration as ChronoDuration, Utc};
use std::time::Duration;

/// Poll granularity of the scheduler loop.
pub const TICK: Duration = Duration::from_secs(60);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobKind {
    SearchCycle,
    Prune,
}

#[derive(Debug)]
struct IntervalJob {
    kind: JobKind,
    every: ChronoDuration,
    next_due: DateTime<Utc>,
}

/// Explicit interval timer list keyed by next-due-time.
#[derive(Debug)]
pub struct Scheduler {
    jobs: Vec<IntervalJob>,
}

impl Scheduler {
    /// The search cycle is due immediately (the bot runs an initial search at
    /// startup); pruning first fires one full interval in.
    pub fn new(now: DateTime<Utc>, search_every: Duration, prune_every: Duration) -> Self {
        // clamp to >= 1s so next-due advancement always terminates
        let search_every = ChronoDuration::from_std(search_every)
            .unwrap_or_else(|_| ChronoDuration::seconds(1))
            .max(ChronoDuration::seconds(1));
        let prune_every = ChronoDuration::from_std(prune_every)
            .unwrap_or_else(|_| ChronoDuration::seconds(1))
            .max(ChronoDuration::seconds(1));
        Self {
            jobs: vec![
                IntervalJob {
                    kind: JobKind::SearchCycle,
                    every: search_every,
                    next_due: now,
                },
                IntervalJob {
                    kind: JobKind::Prune,
                    every: prune_every,
                    next_due: now + prune_every,
                },
            ],
        }
    }

    /// Collect jobs due at `now` and advance their next-due-times. A job that
    /// fell multiple intervals behind fires once, not once per missed slot.
    pub fn due(&mut self, now: DateTime<Utc>) -> Vec<JobKind> {
        let mut due = Vec::new();
        for job in &mut self.jobs {
            if job.next_due <= now {
                due.push(job.kind);
                while job.next_due <= now {
                    job.next_due += job.every;
                }
            }
        }
        due
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t0() -> DateTime<Utc> {
        "2025-06-01T00:00:00Z".parse().unwrap()
    }

    #[test]
    fn search_fires_immediately_prune_after_one_interval() {
        let now = t0();
        let mut s = Scheduler::new(
            now,
            Duration::from_secs(900),
            Duration::from_secs(86_400),
        );
        assert_eq!(s.due(now), vec![JobKind::SearchCycle]);
        // nothing more due within the same tick
        assert!(s.due(now).is_empty());
    }

    #[test]
    fn jobs_fire_on_their_own_cadence() {
        let now = t0();
        let mut s = Scheduler::new(
            now,
            Duration::from_secs(900),
            Duration::from_secs(86_400),
        );
        s.due(now);

        let later = now + ChronoDuration::seconds(900);
        assert_eq!(s.due(later), vec![JobKind::SearchCycle]);

        let next_day = now + ChronoDuration::seconds(86_400);
        let due = s.due(next_day);
        assert!(due.contains(&JobKind::SearchCycle));
        assert!(due.contains(&JobKind::Prune));
    }

    #[test]
    fn missed_slots_collapse_to_one_run() {
        let now = t0();
        let mut s = Scheduler::new(
            now,
            Duration::from_secs(900),
            Duration::from_secs(86_400),
        );
        s.due(now);

        // worker was stalled for four intervals
        let later = now + ChronoDuration::seconds(3_600);
        assert_eq!(s.due(later), vec![JobKind::SearchCycle]);
        assert!(s.due(later).is_empty());
    }
}
