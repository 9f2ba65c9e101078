//! `relfetch get <url>` – fetch one URL with retries and print or save the body.

use anyhow::{Context, Result};
use relfetch_core::config::RelfetchConfig;
use relfetch_core::sink::CollectSink;
use relfetch_core::{CurlTransport, ReliableFetcher};
use std::fs;
use std::io::{self, Write};
use std::path::Path;
use tokio_util::sync::CancellationToken;

use crate::cli::RetryArgs;

pub async fn run_get(
    cfg: &RelfetchConfig,
    url: &str,
    output: Option<&Path>,
    retry: &RetryArgs,
) -> Result<()> {
    let policy = retry.apply(cfg.retry_policy()?)?;
    let mut transport = CurlTransport::new();
    if let Some(ua) = &cfg.user_agent {
        transport = transport.with_user_agent(ua.clone());
    }
    let fetcher = ReliableFetcher::new(transport).with_policy(policy);

    // Ctrl-C cancels the fetch instead of killing the process mid-transfer.
    let cancel = CancellationToken::new();
    let interrupt = cancel.clone();
    let watcher = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("interrupt received; cancelling fetch");
            interrupt.cancel();
        }
    });

    let mut sink = CollectSink::new();
    let result = fetcher.fetch_with_cancel(url, &mut sink, &cancel).await;
    watcher.abort();
    result?;

    let body = sink.into_body().unwrap_or_default();
    write_body(output, &body)
}

/// Write the body to `output`, or to stdout when no path is given.
fn write_body(output: Option<&Path>, body: &[u8]) -> Result<()> {
    match output {
        Some(path) => {
            fs::write(path, body).with_context(|| format!("write {}", path.display()))?;
            eprintln!("Saved {} bytes to {}", body.len(), path.display());
        }
        None => {
            let mut out = io::stdout().lock();
            out.write_all(body).context("write to stdout")?;
            out.flush().context("flush stdout")?;
        }
    }
    Ok(())
}
