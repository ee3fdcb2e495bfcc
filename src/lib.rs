// src/lib.rs
// Public library surface for integration tests (and potential reuse).

pub mod config;
pub mod cycle;
pub mod filter;
pub mod notify;
pub mod scheduler;
pub mod search;
pub mod store;
pub mod types;

// ---- Re-exports for stable public API ----
pub use crate::config::{AppConfig, Criteria};
pub use crate::cycle::{run_search_cycle, CycleOutcome};
pub use crate::filter::{evaluate, Rejection};
pub use crate::notify::{format_alert, Notifier, NotifyChannel};
pub use crate::search::{build_query, SearchProvider, TwitterSearch};
pub use crate::store::Store;
pub use crate::types::{AcceptedJobPost, CandidatePost};
