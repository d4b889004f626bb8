//! Fetch command: one fetch through the proxy, print digest and size.

use anyhow::{Context, Result};
use fetchcheck_core::config::FetchcheckConfig;
use fetchcheck_core::fetch::{self, Route};

pub async fn run_fetch(cfg: FetchcheckConfig) -> Result<()> {
    cfg.validate()?;
    let body = tokio::task::spawn_blocking(move || {
        fetch::fetch_digest(&cfg.target_url, Route::Proxy(&cfg.proxy), &cfg.timeouts)
            .with_context(|| format!("fetch {} via {}", cfg.target_url, cfg.proxy))
    })
    .await
    .map_err(|e| anyhow::anyhow!("fetch task join: {}", e))??;
    println!("{}  {} bytes", body.digest, body.bytes);
    Ok(())
}
