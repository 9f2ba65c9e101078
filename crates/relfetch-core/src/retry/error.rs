//! Error types for a single attempt and for a whole fetch.

use crate::transport::TransportError;
use thiserror::Error;

/// Why one attempt did not produce a deliverable body.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AttemptError {
    /// No response: connection refused, DNS failure, timeout.
    #[error(transparent)]
    Network(#[from] TransportError),
    /// A response arrived with a non-2xx status.
    #[error("HTTP {0}")]
    Status(u16),
}

/// Every attempt in the budget failed.
///
/// Carries the target, how many attempts were made and the cause of the
/// last one.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("failed to fetch {target} after {attempts} attempt(s): {last}")]
pub struct FetchFailed {
    pub target: String,
    pub attempts: u32,
    #[source]
    pub last: AttemptError,
}

/// Outcome of a fetch that did not deliver a body.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// The retry budget ran out.
    #[error(transparent)]
    Exhausted(#[from] FetchFailed),
    /// An attempt failed in a way that is not worth retrying; the budget
    /// was not necessarily spent.
    #[error("{0} (not retried)")]
    Fatal(FetchFailed),
    /// The caller cancelled before or while the fetch was suspended.
    #[error("fetch of {target} cancelled after {attempts} attempt(s)")]
    Cancelled { target: String, attempts: u32 },
}

impl FetchError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, FetchError::Cancelled { .. })
    }

    /// Number of transport calls that were started before the fetch ended.
    /// A fetch cancelled before its first attempt reports 0.
    pub fn attempts(&self) -> u32 {
        match self {
            FetchError::Exhausted(f) | FetchError::Fatal(f) => f.attempts,
            FetchError::Cancelled { attempts, .. } => *attempts,
        }
    }
}
