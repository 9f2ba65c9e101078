//! Retry policy and the reliable fetch loop.
//!
//! This module encapsulates failure classification (transport errors, HTTP
//! error statuses), the flat attempt budget and the loop that drives a
//! transport until one attempt succeeds or the budget is spent.

mod classify;
mod error;
mod policy;
mod run;

pub use classify::{classify, is_success_status, AttemptOutcome};
pub use error::{AttemptError, FetchError, FetchFailed};
pub use policy::{RetryDecision, RetryPolicy};
pub use run::{fetch, ReliableFetcher};
