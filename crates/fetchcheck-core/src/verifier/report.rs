//! Aggregated results of one verification run.

use super::worker::WorkerResult;
use crate::checksum::ContentDigest;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub target_url: String,
    pub proxy: String,
    pub reference: ContentDigest,
    pub successes: usize,
    pub failures: usize,
    pub timeouts: usize,
    /// Workers launched but never reported (thread died); counted in `failures`.
    pub missing: usize,
    /// In completion order.
    pub results: Vec<WorkerResult>,
}

impl RunReport {
    /// `expected` is the number of workers launched; any without a result is a failure.
    pub fn new(
        target_url: &str,
        proxy: &str,
        reference: ContentDigest,
        expected: usize,
        results: Vec<WorkerResult>,
    ) -> Self {
        let missing = expected.saturating_sub(results.len());
        let successes = results.iter().filter(|r| r.outcome.is_success()).count();
        let timeouts = results
            .iter()
            .filter(|r| {
                matches!(
                    &r.outcome,
                    super::WorkerOutcome::FetchFailed { error } if error.is_timeout()
                )
            })
            .count();
        Self {
            target_url: target_url.to_string(),
            proxy: proxy.to_string(),
            reference,
            successes,
            failures: results.len() - successes + missing,
            timeouts,
            missing,
            results,
        }
    }

    /// True when every worker matched (vacuously true with no workers).
    pub fn passed(&self) -> bool {
        self.failures == 0
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
