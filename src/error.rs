//! Error types for polling the dashboard.

use thiserror::Error;

/// Why a poll did not produce a snapshot.
///
/// Every variant is handled the same way by the poller: it is logged and the
/// page is left untouched. The next scheduled tick is the only retry.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PollFailure {
    /// Could not connect to the dashboard server.
    #[error("Connection failed: {0}")]
    Connection(String),

    /// Timeout waiting for response.
    #[error("Request timed out")]
    Timeout,

    /// HTTP request failed or the server answered with a non-success status.
    #[error("HTTP request failed: {0}")]
    Http(String),

    /// Response body was not a valid snapshot.
    #[error("Failed to parse response: {0}")]
    Parse(String),

    /// Reading a replayed snapshot from disk failed.
    #[error("Read error: {0}")]
    Io(String),
}

impl From<reqwest::Error> for PollFailure {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            PollFailure::Timeout
        } else if err.is_connect() {
            PollFailure::Connection(err.to_string())
        } else if err.is_decode() {
            PollFailure::Parse(err.to_string())
        } else {
            PollFailure::Http(err.to_string())
        }
    }
}

impl From<serde_json::Error> for PollFailure {
    fn from(err: serde_json::Error) -> Self {
        PollFailure::Parse(err.to_string())
    }
}

impl From<std::io::Error> for PollFailure {
    fn from(err: std::io::Error) -> Self {
        PollFailure::Io(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        assert_eq!(PollFailure::Timeout.to_string(), "Request timed out");
        assert_eq!(
            PollFailure::Http("API returned status 500".into()).to_string(),
            "HTTP request failed: API returned status 500"
        );
    }

    #[test]
    fn test_from_json_error_is_parse() {
        let err = serde_json::from_str::<u64>("nope").unwrap_err();
        assert!(matches!(PollFailure::from(err), PollFailure::Parse(_)));
    }
}
