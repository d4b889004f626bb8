//! Fetch failure kinds, classified from curl errors and HTTP status.

use serde::Serialize;

/// Why a fetch produced no digest.
///
/// Kept separate from a content mismatch so a dead proxy and a corrupting
/// proxy are reported differently.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FetchError {
    /// Connect or transfer deadline expired.
    #[error("timed out: {message}")]
    Timeout { message: String },
    /// Could not reach the target or proxy, or the connection dropped mid-transfer.
    #[error("connection failed: {message}")]
    Connection { message: String },
    /// Response arrived with a non-2xx status.
    #[error("HTTP {status}")]
    Http { status: u32 },
    /// Anything else curl reported (bad URL, protocol error, ...).
    #[error("{message}")]
    Other { message: String },
}

impl FetchError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, FetchError::Timeout { .. })
    }

    /// Map an HTTP status to an error, or `None` when it is a success.
    pub fn from_status(status: u32) -> Option<FetchError> {
        if (200..300).contains(&status) {
            None
        } else {
            Some(FetchError::Http { status })
        }
    }
}

impl From<curl::Error> for FetchError {
    fn from(e: curl::Error) -> Self {
        let message = e.to_string();
        if e.is_operation_timedout() {
            return FetchError::Timeout { message };
        }
        if e.is_couldnt_connect()
            || e.is_couldnt_resolve_host()
            || e.is_couldnt_resolve_proxy()
            || e.is_read_error()
            || e.is_recv_error()
            || e.is_send_error()
            || e.is_got_nothing()
            || e.is_partial_file()
        {
            return FetchError::Connection { message };
        }
        FetchError::Other { message }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_2xx_is_success() {
        assert_eq!(FetchError::from_status(200), None);
        assert_eq!(FetchError::from_status(204), None);
    }

    #[test]
    fn status_non_2xx_is_http_error() {
        assert_eq!(
            FetchError::from_status(502),
            Some(FetchError::Http { status: 502 })
        );
        assert_eq!(
            FetchError::from_status(407),
            Some(FetchError::Http { status: 407 })
        );
    }

    #[test]
    fn display_and_json_shape() {
        let e = FetchError::Timeout {
            message: "Operation timed out".to_string(),
        };
        assert!(e.is_timeout());
        assert_eq!(e.to_string(), "timed out: Operation timed out");
        let json = serde_json::to_value(&e).unwrap();
        assert_eq!(json["kind"], "timeout");
        assert_eq!(json["message"], "Operation timed out");

        let e = FetchError::Http { status: 404 };
        assert!(!e.is_timeout());
        assert_eq!(e.to_string(), "HTTP 404");
    }
}
