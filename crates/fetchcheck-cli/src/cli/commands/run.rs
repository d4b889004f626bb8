//! Run command: reference digest, then concurrent proxied fetches.
//!
//! Prints the reference digest first, then one `Success`/`Failure` line per
//! worker in completion order.

use anyhow::Result;
use fetchcheck_core::config::FetchcheckConfig;
use fetchcheck_core::verifier::{self, WorkerResult};

#[derive(Debug, Clone, Copy, Default)]
pub struct RunOptions {
    pub json: bool,
    pub verbose_outcomes: bool,
}

pub(crate) fn outcome_line(res: &WorkerResult, verbose: bool) -> String {
    if verbose {
        format!("worker {}: {}", res.index, res.outcome)
    } else {
        res.outcome.label().to_string()
    }
}

/// Runs the verifier on a blocking thread. Returns true when every worker succeeded.
pub async fn run_verify(cfg: FetchcheckConfig, opts: RunOptions) -> Result<bool> {
    let report = tokio::task::spawn_blocking(move || {
        verifier::run(
            &cfg,
            |reference| {
                if !opts.json {
                    println!("{}", reference);
                }
            },
            |res| {
                if !opts.json {
                    println!("{}", outcome_line(res, opts.verbose_outcomes));
                }
            },
        )
    })
    .await
    .map_err(|e| anyhow::anyhow!("verifier task join: {}", e))??;

    if opts.json {
        println!("{}", report.to_json()?);
    } else if opts.verbose_outcomes {
        println!(
            "{} succeeded, {} failed ({} timed out, {} never reported)",
            report.successes, report.failures, report.timeouts, report.missing
        );
    }
    Ok(report.passed())
}
