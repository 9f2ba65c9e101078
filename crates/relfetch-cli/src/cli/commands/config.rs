//! `relfetch config` – show where the config lives and what it resolves to.

use anyhow::Result;
use relfetch_core::config::{self, RelfetchConfig};

pub fn run_config(cfg: &RelfetchConfig) -> Result<()> {
    let policy = cfg.retry_policy()?;
    println!("config file: {}", config::config_path()?.display());
    println!("max_attempts: {}", policy.max_attempts);
    println!("attempt_timeout: {:?}", policy.attempt_timeout);
    println!("retry_delay: {:?}", policy.retry_delay);
    println!(
        "user_agent: {}",
        cfg.user_agent.as_deref().unwrap_or("(libcurl default)")
    );
    Ok(())
}
