//! HTTP transport capability.
//!
//! The fetch loop only needs "GET this URL within this timeout"; everything
//! else (TLS, redirects, connection reuse) belongs to the implementation.
//! `CurlTransport` is the default; tests substitute scripted transports.

mod libcurl;

pub use self::libcurl::CurlTransport;

use std::fmt;
use std::future::Future;
use std::time::Duration;
use thiserror::Error;

/// A complete HTTP response: status code and raw body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub status: u16,
    pub body: Vec<u8>,
}

impl Response {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

/// Connection-level failure category reported by a transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportErrorKind {
    /// Could not establish or keep a connection (refused, reset, empty reply).
    Connect,
    /// DNS or proxy name resolution failed.
    Resolve,
    /// Connect or read exceeded the attempt timeout.
    Timeout,
    /// Transfer stopped because the caller went away.
    Aborted,
    Other,
}

impl fmt::Display for TransportErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TransportErrorKind::Connect => "connection error",
            TransportErrorKind::Resolve => "resolve error",
            TransportErrorKind::Timeout => "timed out",
            TransportErrorKind::Aborted => "aborted",
            TransportErrorKind::Other => "transport error",
        };
        f.write_str(s)
    }
}

/// Error returned when no HTTP response was obtained.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}: {message}")]
pub struct TransportError {
    pub kind: TransportErrorKind,
    pub message: String,
}

impl TransportError {
    pub fn new(kind: TransportErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(TransportErrorKind::Timeout, message)
    }

    pub fn connect(message: impl Into<String>) -> Self {
        Self::new(TransportErrorKind::Connect, message)
    }
}

/// GET-capable HTTP client.
///
/// Implementations must not retry on their own and must return once
/// `timeout` has elapsed. Any status code is a `Response`; only failures
/// to obtain a response are `TransportError`s.
pub trait Transport: Send + Sync {
    fn get(
        &self,
        url: &str,
        timeout: Duration,
    ) -> impl Future<Output = Result<Response, TransportError>> + Send;
}
