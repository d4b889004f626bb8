//! Reference command: fetch the target directly and print its digest.

use anyhow::{Context, Result};
use fetchcheck_core::checksum::ContentDigest;
use fetchcheck_core::config::FetchcheckConfig;
use fetchcheck_core::verifier;

/// Prints the target's digest. With `expect`, returns whether it matched;
/// without, always true.
pub async fn run_reference(cfg: FetchcheckConfig, expect: Option<ContentDigest>) -> Result<bool> {
    cfg.validate_target()?;
    let digest = tokio::task::spawn_blocking(move || {
        verifier::compute_reference(&cfg.target_url, &cfg.timeouts)
            .with_context(|| format!("fetch {}", cfg.target_url))
    })
    .await
    .map_err(|e| anyhow::anyhow!("reference task join: {}", e))??;
    println!("{}", digest);

    match expect {
        Some(expected) if expected != digest => {
            eprintln!("digest mismatch: expected {}", expected);
            tracing::warn!(expected = %expected, actual = %digest, "reference digest mismatch");
            Ok(false)
        }
        _ => Ok(true),
    }
}
