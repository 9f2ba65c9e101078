use std::time::Duration;

/// Decision returned by the retry policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    /// Do not retry; the budget is spent.
    NoRetry,
    /// Retry after the given delay.
    RetryAfter(Duration),
}

/// Flat retry policy: a fixed attempt budget, a per-attempt timeout and a
/// constant delay between attempts.
///
/// There is no exponential growth and no jitter; every retry waits exactly
/// `retry_delay`. See `classify` for which failures count as retryable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Maximum number of attempts (including the first). Zero is treated as one.
    pub max_attempts: u32,
    /// Upper bound on a single transport call.
    pub attempt_timeout: Duration,
    /// Pause between a failed attempt and the next one.
    pub retry_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            attempt_timeout: Duration::from_secs(5),
            retry_delay: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    /// Attempt budget actually enforced by the fetch loop (never zero).
    pub fn attempt_budget(&self) -> u32 {
        self.max_attempts.max(1)
    }

    /// Decide what to do after a failed attempt.
    ///
    /// `attempt` is 1-based (1 = first attempt). Returns `RetryDecision::NoRetry`
    /// once the attempt that just failed was the last one the budget allows.
    pub fn decide(&self, attempt: u32) -> RetryDecision {
        if attempt >= self.attempt_budget() {
            return RetryDecision::NoRetry;
        }
        RetryDecision::RetryAfter(self.retry_delay)
    }
}
