//! Concurrent fetch verifier.
//!
//! A run computes the reference digest by fetching the target directly, then
//! fans out workers that each sleep a random jitter, fetch the same target
//! through the proxy and compare digests. Workers share only the immutable
//! reference; each reports exactly one outcome.

mod jitter;
mod outcome;
mod pool;
mod reference;
mod report;
mod worker;

pub use jitter::Jitter;
pub use outcome::{WorkerOutcome, FAILURE, SUCCESS};
pub use pool::{spawn_workers, RunningWorkers};
pub use reference::compute_reference;
pub use report::RunReport;
pub use worker::{worker_run, WorkerContext, WorkerResult};

use crate::config::FetchcheckConfig;
use anyhow::{Context, Result};
use std::sync::Arc;

/// Runs a full verification described by `cfg`.
///
/// `on_reference` is called once the baseline is known (before any worker
/// starts); `on_result` is called for each worker as it finishes. A failed
/// reference fetch aborts the run with an error and starts no workers.
pub fn run<R, F>(cfg: &FetchcheckConfig, on_reference: R, mut on_result: F) -> Result<RunReport>
where
    R: FnOnce(&crate::checksum::ContentDigest),
    F: FnMut(&WorkerResult),
{
    cfg.validate()?;

    let reference = compute_reference(&cfg.target_url, &cfg.timeouts)
        .with_context(|| format!("reference fetch of {} failed", cfg.target_url))?;
    on_reference(&reference);

    let ctx = Arc::new(WorkerContext {
        target_url: cfg.target_url.clone(),
        proxy: cfg.proxy.clone(),
        timeouts: cfg.timeouts,
        jitter: Jitter::from(cfg.jitter),
        reference: Arc::new(reference.clone()),
    });

    tracing::info!(
        workers = cfg.workers,
        proxy = %cfg.proxy,
        "starting workers"
    );
    let mut running = spawn_workers(cfg.workers, ctx, cfg.max_concurrent)?;
    let mut results = Vec::with_capacity(cfg.workers);
    for res in running.by_ref() {
        on_result(&res);
        results.push(res);
    }
    results.extend(running.join());

    let report = RunReport::new(
        &cfg.target_url,
        &cfg.proxy,
        reference,
        cfg.workers,
        results,
    );
    tracing::info!(
        successes = report.successes,
        failures = report.failures,
        timeouts = report.timeouts,
        missing = report.missing,
        "run finished"
    );
    Ok(report)
}
