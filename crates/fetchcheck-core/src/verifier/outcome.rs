//! What a single worker observed.

use crate::checksum::ContentDigest;
use crate::fetch::{FetchError, FetchedBody};
use serde::Serialize;
use std::fmt;

pub const SUCCESS: &str = "Success";
pub const FAILURE: &str = "Failure";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum WorkerOutcome {
    /// Proxied body hashed to the reference digest.
    Match { bytes: u64 },
    /// Proxied body arrived but its digest differs.
    Mismatch {
        expected: ContentDigest,
        actual: ContentDigest,
        bytes: u64,
    },
    /// No body to compare.
    FetchFailed { error: FetchError },
}

impl WorkerOutcome {
    pub fn compare(reference: &ContentDigest, body: FetchedBody) -> Self {
        if body.digest == *reference {
            WorkerOutcome::Match { bytes: body.bytes }
        } else {
            WorkerOutcome::Mismatch {
                expected: reference.clone(),
                actual: body.digest,
                bytes: body.bytes,
            }
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, WorkerOutcome::Match { .. })
    }

    /// Console label: "Success" or "Failure".
    pub fn label(&self) -> &'static str {
        if self.is_success() {
            SUCCESS
        } else {
            FAILURE
        }
    }
}

impl fmt::Display for WorkerOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorkerOutcome::Match { bytes } => write!(f, "{} ({} bytes)", SUCCESS, bytes),
            WorkerOutcome::Mismatch { actual, bytes, .. } => {
                write!(
                    f,
                    "{} (digest mismatch: got {} over {} bytes)",
                    FAILURE,
                    actual.short(),
                    bytes
                )
            }
            WorkerOutcome::FetchFailed { error } => write!(f, "{} ({})", FAILURE, error),
        }
    }
}
