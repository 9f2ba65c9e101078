//! relfetch core: one HTTP GET that survives transient failures.
//!
//! `retry::ReliableFetcher` drives a `transport::Transport` through a flat
//! retry budget and hands the body of the first successful response to a
//! `sink::ResultSink`.

pub mod config;
pub mod logging;
pub mod retry;
pub mod sink;
pub mod transport;

pub use retry::{fetch, FetchError, FetchFailed, ReliableFetcher, RetryPolicy};
pub use sink::ResultSink;
pub use transport::{CurlTransport, Transport};
