//! Fetch loop: attempt, classify, then deliver or wait and try again.

use super::classify::{classify, AttemptOutcome};
use super::error::{AttemptError, FetchError, FetchFailed};
use super::policy::{RetryDecision, RetryPolicy};
use crate::sink::ResultSink;
use crate::transport::{CurlTransport, Response, Transport, TransportError};
use std::future::Future;
use tokio_util::sync::CancellationToken;

/// Performs one logical GET, retrying transient failures within the policy budget.
///
/// Attempts are strictly sequential. The only suspension points are the
/// transport call and the delay between attempts; both are raced against
/// the cancellation token when one is supplied.
#[derive(Debug, Clone)]
pub struct ReliableFetcher<T> {
    transport: T,
    policy: RetryPolicy,
}

impl<T: Transport> ReliableFetcher<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            policy: RetryPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Fetch `url`, handing the body to `sink` on the first successful attempt.
    ///
    /// `sink.observe` is called at most once. On `Err`, it was not called.
    pub async fn fetch<S>(&self, url: &str, sink: &mut S) -> Result<(), FetchError>
    where
        S: ResultSink + ?Sized,
    {
        self.run(url, sink, None).await
    }

    /// Like `fetch`, but returns `FetchError::Cancelled` as soon as `cancel`
    /// fires while an attempt or a retry delay is pending.
    pub async fn fetch_with_cancel<S>(
        &self,
        url: &str,
        sink: &mut S,
        cancel: &CancellationToken,
    ) -> Result<(), FetchError>
    where
        S: ResultSink + ?Sized,
    {
        self.run(url, sink, Some(cancel)).await
    }

    async fn run<S>(
        &self,
        url: &str,
        sink: &mut S,
        cancel: Option<&CancellationToken>,
    ) -> Result<(), FetchError>
    where
        S: ResultSink + ?Sized,
    {
        let budget = self.policy.attempt_budget();
        let mut attempt = 1u32;
        loop {
            if cancel.is_some_and(|t| t.is_cancelled()) {
                return Err(cancelled(url, attempt - 1));
            }
            tracing::debug!(url, attempt, budget, "GET attempt");
            let result = match until_cancelled(cancel, self.attempt(url)).await {
                Some(result) => result,
                None => return Err(cancelled(url, attempt)),
            };

            let err = match classify(result) {
                AttemptOutcome::Success(body) => {
                    tracing::info!(url, attempt, bytes = body.len(), "fetch succeeded");
                    sink.observe(body);
                    return Ok(());
                }
                AttemptOutcome::Transient(e) => e,
                AttemptOutcome::Fatal(e) => {
                    tracing::error!(url, attempt, error = %e, "fatal fetch error");
                    return Err(fatal(url, attempt, e));
                }
            };

            match self.policy.decide(attempt) {
                RetryDecision::NoRetry => {
                    tracing::error!(url, attempts = attempt, error = %err, "retry budget exhausted");
                    return Err(failed(url, attempt, err));
                }
                RetryDecision::RetryAfter(delay) => {
                    tracing::warn!(
                        url,
                        attempt,
                        error = %err,
                        "attempt failed; retrying in {:?}",
                        delay
                    );
                    if until_cancelled(cancel, tokio::time::sleep(delay))
                        .await
                        .is_none()
                    {
                        return Err(cancelled(url, attempt));
                    }
                    attempt += 1;
                }
            }
        }
    }

    /// One transport call, cut off at the attempt timeout whether or not
    /// the transport enforces it itself.
    async fn attempt(&self, url: &str) -> Result<Response, TransportError> {
        let timeout = self.policy.attempt_timeout;
        match tokio::time::timeout(timeout, self.transport.get(url, timeout)).await {
            Ok(result) => result,
            Err(_) => Err(TransportError::timeout(format!(
                "no response within {:?}",
                timeout
            ))),
        }
    }
}

/// Fetch `url` with the libcurl transport and the default policy
/// (5 attempts, 5 s per attempt, 1 s between attempts).
pub async fn fetch<S>(url: &str, sink: &mut S) -> Result<(), FetchError>
where
    S: ResultSink + ?Sized,
{
    ReliableFetcher::new(CurlTransport::new())
        .fetch(url, sink)
        .await
}

/// Await `fut` unless `cancel` fires first. `None` means cancelled.
async fn until_cancelled<F: Future>(
    cancel: Option<&CancellationToken>,
    fut: F,
) -> Option<F::Output> {
    match cancel {
        None => Some(fut.await),
        Some(token) => tokio::select! {
            biased;
            _ = token.cancelled() => None,
            out = fut => Some(out),
        },
    }
}

fn failed(url: &str, attempts: u32, last: AttemptError) -> FetchError {
    FetchError::Exhausted(FetchFailed {
        target: url.to_string(),
        attempts,
        last,
    })
}

fn fatal(url: &str, attempts: u32, last: AttemptError) -> FetchError {
    FetchError::Fatal(FetchFailed {
        target: url.to_string(),
        attempts,
        last,
    })
}

fn cancelled(url: &str, attempts: u32) -> FetchError {
    tracing::info!(url, attempts, "fetch cancelled");
    FetchError::Cancelled {
        target: url.to_string(),
        attempts,
    }
}
