//! Baseline digest of the target, fetched without the proxy.

use crate::checksum::ContentDigest;
use crate::config::TimeoutConfig;
use crate::fetch::{self, FetchError, Route};

/// Fetches `url` directly and returns the digest of its body.
///
/// Fails instead of producing a placeholder digest, so an unreachable target
/// can never be mistaken for a baseline.
pub fn compute_reference(
    url: &str,
    timeouts: &TimeoutConfig,
) -> Result<ContentDigest, FetchError> {
    let body = fetch::fetch_digest(url, Route::Direct, timeouts)?;
    tracing::info!(
        url,
        bytes = body.bytes,
        digest = %body.digest,
        "reference digest computed"
    );
    Ok(body.digest)
}
