//! Classify transport results into attempt outcomes.
//!
//! Only a 2xx response is a success. The policy is deliberately flat: every
//! transport error and every other status (1xx, unfollowed 3xx, 4xx and 5xx
//! alike) is transient. A 404 is retried exactly like a 503, and nothing is
//! ever classified fatal. Status-aware rules (e.g. only 429/5xx) would slot
//! in here without touching the fetch loop.

use super::error::AttemptError;
use crate::transport::{Response, TransportError};

/// Result of one attempt after classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttemptOutcome {
    /// Deliverable body.
    Success(Vec<u8>),
    /// Retry-eligible failure.
    Transient(AttemptError),
    /// Failure that ends the fetch immediately.
    Fatal(AttemptError),
}

/// True if the status code carries a deliverable body.
pub fn is_success_status(status: u16) -> bool {
    (200..300).contains(&status)
}

/// Classify a transport result for retry decisions.
pub fn classify(result: Result<Response, TransportError>) -> AttemptOutcome {
    match result {
        Ok(resp) if is_success_status(resp.status) => AttemptOutcome::Success(resp.body),
        Ok(resp) => AttemptOutcome::Transient(AttemptError::Status(resp.status)),
        Err(e) => AttemptOutcome::Transient(AttemptError::Network(e)),
    }
}
