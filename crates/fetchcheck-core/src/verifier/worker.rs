//! One fetch-through-proxy-and-compare cycle.

use super::jitter::Jitter;
use super::outcome::WorkerOutcome;
use crate::checksum::ContentDigest;
use crate::config::TimeoutConfig;
use crate::fetch::{self, Route};
use serde::Serialize;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Everything a worker needs, shared read-only by all of them.
#[derive(Debug, Clone)]
pub struct WorkerContext {
    pub target_url: String,
    pub proxy: String,
    pub timeouts: TimeoutConfig,
    pub jitter: Jitter,
    pub reference: Arc<ContentDigest>,
}

/// Outcome of one worker plus timing.
#[derive(Debug, Clone, Serialize)]
pub struct WorkerResult {
    pub index: usize,
    #[serde(flatten)]
    pub outcome: WorkerOutcome,
    pub jitter_ms: u64,
    pub fetch_ms: u64,
}

fn millis(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}

/// Sleeps for a random jitter, fetches the target through the proxy and
/// compares the digest with the reference. Never retries.
pub fn worker_run(index: usize, ctx: &WorkerContext) -> WorkerResult {
    let delay = ctx.jitter.sample(&mut rand::thread_rng());
    tracing::trace!(worker = index, delay_ms = millis(delay), "sleeping before fetch");
    std::thread::sleep(delay);

    let started = Instant::now();
    let fetched = fetch::fetch_digest(&ctx.target_url, Route::Proxy(&ctx.proxy), &ctx.timeouts);
    let outcome = match fetched {
        Ok(body) => WorkerOutcome::compare(&ctx.reference, body),
        Err(error) => WorkerOutcome::FetchFailed { error },
    };
    let elapsed = started.elapsed();

    match &outcome {
        WorkerOutcome::Match { .. } => {
            tracing::debug!(worker = index, fetch_ms = millis(elapsed), "digest matches reference")
        }
        other => tracing::warn!(worker = index, fetch_ms = millis(elapsed), "{}", other),
    }

    WorkerResult {
        index,
        outcome,
        jitter_ms: millis(delay),
        fetch_ms: millis(elapsed),
    }
}
