//! CLI for relfetch.

mod commands;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use relfetch_core::config::{self, secs_to_duration, secs_to_timeout};
use relfetch_core::RetryPolicy;
use std::path::PathBuf;

use commands::{run_config, run_get};

/// Top-level CLI for relfetch.
#[derive(Debug, Parser)]
#[command(name = "relfetch")]
#[command(about = "relfetch: one HTTP GET that survives transient failures", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Fetch a URL, retrying connection errors, timeouts and HTTP error statuses.
    Get {
        /// HTTP/HTTPS URL to fetch.
        url: String,
        /// Write the body to this file instead of stdout.
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
        #[command(flatten)]
        retry: RetryArgs,
    },

    /// Show the config file location and the effective retry settings.
    Config,
}

/// Per-invocation overrides for the configured retry policy.
#[derive(Debug, Clone, Default, PartialEq, Args)]
pub struct RetryArgs {
    /// Maximum attempts, including the first.
    #[arg(long, value_name = "N")]
    pub max_attempts: Option<u32>,
    /// Timeout for each attempt, in seconds.
    #[arg(long, value_name = "SECS")]
    pub timeout_secs: Option<f64>,
    /// Pause between attempts, in seconds.
    #[arg(long, value_name = "SECS")]
    pub retry_delay_secs: Option<f64>,
}

impl RetryArgs {
    /// Apply the flags that were given on top of `base`.
    pub fn apply(&self, base: RetryPolicy) -> Result<RetryPolicy> {
        let mut policy = base;
        if let Some(n) = self.max_attempts {
            policy.max_attempts = n;
        }
        if let Some(secs) = self.timeout_secs {
            policy.attempt_timeout = secs_to_timeout("--timeout-secs", secs)?;
        }
        if let Some(secs) = self.retry_delay_secs {
            policy.retry_delay = secs_to_duration("--retry-delay-secs", secs)?;
        }
        Ok(policy)
    }
}

impl CliCommand {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let cfg = config::load_or_init()?;
        tracing::debug!("loaded config: {:?}", cfg);

        match cli.command {
            CliCommand::Get { url, output, retry } => {
                run_get(&cfg, &url, output.as_deref(), &retry).await?
            }
            CliCommand::Config => run_config(&cfg)?,
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
