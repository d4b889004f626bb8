//! SHA-256 content digests.
//!
//! Bodies are hashed as they stream in, so memory use stays bounded no matter
//! how large the verified resource is.

use serde::Serialize;
use sha2::{Digest, Sha256};
use std::fmt;
use std::str::FromStr;

/// Length of a SHA-256 digest rendered as hex.
const DIGEST_HEX_LEN: usize = 64;

/// A SHA-256 digest as 64 lowercase hex characters.
///
/// Only constructible by hashing or by parsing a well-formed hex string, so a
/// value of this type is never empty or truncated.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(into = "String")]
pub struct ContentDigest(String);

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DigestParseError {
    #[error("digest must be 64 hex characters, got {0}")]
    Length(usize),
    #[error("digest contains non-hex character {0:?}")]
    NonHex(char),
}

impl ContentDigest {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Short prefix for log lines.
    pub fn short(&self) -> &str {
        &self.0[..12]
    }
}

impl fmt::Display for ContentDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for ContentDigest {
    type Err = DigestParseError;

    /// Accepts `sha256sum`-style output too: only the first whitespace-separated token is used.
    /// Used for digests pinned on the command line.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token = s.split_whitespace().next().unwrap_or("");
        if token.len() != DIGEST_HEX_LEN {
            return Err(DigestParseError::Length(token.len()));
        }
        if let Some(c) = token.chars().find(|c| !c.is_ascii_hexdigit()) {
            return Err(DigestParseError::NonHex(c));
        }
        Ok(ContentDigest(token.to_ascii_lowercase()))
    }
}

impl From<ContentDigest> for String {
    fn from(d: ContentDigest) -> Self {
        d.0
    }
}

/// Incremental SHA-256 over a streamed body, counting bytes as it goes.
#[derive(Clone, Default)]
pub struct DigestSink {
    hasher: Sha256,
    bytes: u64,
}

impl DigestSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update(&mut self, data: &[u8]) {
        self.hasher.update(data);
        self.bytes += data.len() as u64;
    }

    pub fn bytes(&self) -> u64 {
        self.bytes
    }

    pub fn finish(self) -> ContentDigest {
        ContentDigest(hex::encode(self.hasher.finalize()))
    }
}

/// SHA-256 of an in-memory buffer.
pub fn sha256_bytes(data: &[u8]) -> ContentDigest {
    let mut sink = DigestSink::new();
    sink.update(data);
    sink.finish()
}
