//! libcurl-backed transport.
//!
//! Each `get` runs one easy handle to completion on a blocking thread and
//! drops it before returning. Dropping the awaiting future raises an abort
//! flag that the progress callback checks, so a cancelled fetch does not
//! leave a transfer running in the background.

use super::{Response, Transport, TransportError, TransportErrorKind};
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

const MAX_REDIRECTIONS: u32 = 10;
const MAX_CONNECT_TIMEOUT: Duration = Duration::from_secs(30);
/// libcurl takes timeouts in whole milliseconds and reads 0 as "no timeout".
const MIN_CURL_TIMEOUT: Duration = Duration::from_millis(1);

/// Default transport: a fresh libcurl easy handle per attempt.
#[derive(Debug, Clone, Default)]
pub struct CurlTransport {
    user_agent: Option<String>,
}

impl CurlTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }
}

impl Transport for CurlTransport {
    fn get(
        &self,
        url: &str,
        timeout: Duration,
    ) -> impl Future<Output = Result<Response, TransportError>> + Send {
        let url = url.to_string();
        let user_agent = self.user_agent.clone();
        async move {
            let abort = Arc::new(AtomicBool::new(false));
            let _guard = AbortOnDrop(Arc::clone(&abort));
            let task = tokio::task::spawn_blocking(move || {
                perform_get(&url, timeout, user_agent.as_deref(), &abort)
            });
            match task.await {
                Ok(result) => result,
                Err(e) => Err(TransportError::new(
                    TransportErrorKind::Other,
                    format!("transfer task failed: {}", e),
                )),
            }
        }
    }
}

/// Raises the abort flag when the awaiting future completes or is dropped.
struct AbortOnDrop(Arc<AtomicBool>);

impl Drop for AbortOnDrop {
    fn drop(&mut self) {
        self.0.store(true, Ordering::Relaxed);
    }
}

/// Blocking GET into memory. Runs in the current thread.
fn perform_get(
    url: &str,
    timeout: Duration,
    user_agent: Option<&str>,
    abort: &AtomicBool,
) -> Result<Response, TransportError> {
    let mut body = Vec::new();

    let mut easy = curl::easy::Easy::new();
    easy.url(url)?;
    easy.follow_location(true)?;
    easy.max_redirections(MAX_REDIRECTIONS)?;
    let timeout = curl_timeout(timeout);
    easy.connect_timeout(timeout.min(MAX_CONNECT_TIMEOUT))?;
    easy.timeout(timeout)?;
    easy.progress(true)?;
    if let Some(ua) = user_agent {
        easy.useragent(ua)?;
    }

    {
        let mut transfer = easy.transfer();
        transfer.write_function(|data| {
            body.extend_from_slice(data);
            Ok(data.len())
        })?;
        // Returning false aborts the transfer.
        transfer.progress_function(|_, _, _, _| !abort.load(Ordering::Relaxed))?;
        transfer.perform()?;
    }

    let status = easy.response_code()?;
    if status == 0 {
        // Transfer finished without an HTTP status line (e.g. a non-HTTP scheme).
        return Err(TransportError::new(
            TransportErrorKind::Other,
            format!("no HTTP response from {}", url),
        ));
    }
    let status = u16::try_from(status).map_err(|_| {
        TransportError::new(
            TransportErrorKind::Other,
            format!("invalid response code {}", status),
        )
    })?;
    Ok(Response { status, body })
}

/// Round sub-millisecond timeouts up so they still bound the transfer.
fn curl_timeout(timeout: Duration) -> Duration {
    if timeout.as_millis() == 0 {
        MIN_CURL_TIMEOUT
    } else {
        timeout
    }
}

impl From<curl::Error> for TransportError {
    fn from(e: curl::Error) -> Self {
        TransportError::new(classify_curl_error(&e), e.to_string())
    }
}

/// Map a curl error to a transport failure category.
fn classify_curl_error(e: &curl::Error) -> TransportErrorKind {
    if e.is_operation_timedout() {
        return TransportErrorKind::Timeout;
    }
    if e.is_aborted_by_callback() {
        return TransportErrorKind::Aborted;
    }
    if e.is_couldnt_resolve_host() || e.is_couldnt_resolve_proxy() {
        return TransportErrorKind::Resolve;
    }
    if e.is_couldnt_connect()
        || e.is_read_error()
        || e.is_recv_error()
        || e.is_send_error()
        || e.is_got_nothing()
        || e.is_partial_file()
    {
        return TransportErrorKind::Connect;
    }
    TransportErrorKind::Other
}
