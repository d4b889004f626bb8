//! HTTP GET of the target resource, directly or through a forward proxy.
//!
//! Uses the curl crate (libcurl). The body is never buffered: each chunk goes
//! straight into a SHA-256 sink, and only the digest and byte count survive
//! the transfer. Every fetch carries a connect and total deadline.

mod error;

pub use error::FetchError;

use crate::checksum::{ContentDigest, DigestSink};
use crate::config::TimeoutConfig;
use std::fmt;

/// How the request reaches the target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route<'a> {
    /// No proxy, ignoring any `http_proxy`/`all_proxy` in the environment.
    Direct,
    /// Through the given proxy (`host:port`, or a URL whose scheme picks HTTP/SOCKS),
    /// for every host including ones listed in `no_proxy`.
    Proxy(&'a str),
}

impl fmt::Display for Route<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Route::Direct => write!(f, "direct"),
            Route::Proxy(p) => write!(f, "via {}", p),
        }
    }
}

/// Digest of a successfully fetched body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedBody {
    pub digest: ContentDigest,
    pub bytes: u64,
}

/// GETs `url` over `route` and hashes the body as it arrives.
///
/// Runs in the current thread; call from `spawn_blocking` if used from async code.
pub fn fetch_digest(
    url: &str,
    route: Route<'_>,
    timeouts: &TimeoutConfig,
) -> Result<FetchedBody, FetchError> {
    let mut sink = DigestSink::new();

    let mut easy = curl::easy::Easy::new();
    easy.url(url)?;
    easy.follow_location(true)?;
    easy.max_redirections(10)?;
    easy.connect_timeout(timeouts.connect())?;
    easy.timeout(timeouts.total())?;
    match route {
        Route::Direct => easy.noproxy("*")?,
        Route::Proxy(proxy) => {
            easy.proxy(proxy)?;
            // Empty list: a `no_proxy` env var must not let requests skip the proxy.
            easy.noproxy("")?;
        }
    }

    {
        let mut transfer = easy.transfer();
        transfer.write_function(|data| {
            sink.update(data);
            Ok(data.len())
        })?;
        transfer.perform()?;
    }

    let status = easy.response_code()?;
    if let Some(err) = FetchError::from_status(status) {
        tracing::debug!(url, %route, status, "fetch returned non-success status");
        return Err(err);
    }

    let bytes = sink.bytes();
    let digest = sink.finish();
    tracing::debug!(url, %route, bytes, digest = digest.short(), "fetch complete");
    Ok(FetchedBody { digest, bytes })
}
