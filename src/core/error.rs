//! Error types for wikipath
//!
//! Provides the error taxonomy shared by the search engine, the Wikipedia
//! oracle and the command-line front-end.

use std::fmt;

use crate::core::oracle::Direction;

/// Main error type for wikipath operations
#[derive(Debug)]
pub enum Error {
    /// Invalid search parameters (empty titles, articles from different wikis, ...)
    InvalidInput(String),

    /// Input is not a Wikipedia article URL
    InvalidUrl(String),

    /// A neighbor lookup failed; fatal to the whole search
    OracleFailure {
        direction: Direction,
        node: String,
        reason: String,
    },

    /// HTTP-specific error
    HttpError(String),

    /// Network connectivity issues
    NetworkError(String),

    /// The API answered with something we could not decode
    DecodeError(String),

    /// A search worker panicked or was aborted
    WorkerFailed(String),

    /// I/O error
    IoError(std::io::Error),
}

impl Error {
    /// Wrap a lookup error with the node and direction it happened on
    pub fn oracle_failure(direction: Direction, node: &str, cause: Error) -> Self {
        match cause {
            already @ Error::OracleFailure { .. } => already,
            other => Error::OracleFailure {
                direction,
                node: node.to_string(),
                reason: other.to_string(),
            },
        }
    }

    /// Whether a retry of the same request could succeed
    pub fn is_transient(&self) -> bool {
        matches!(self, Error::NetworkError(_))
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidInput(msg) => {
                write!(f, "Invalid input: {}", msg)
            }
            Error::InvalidUrl(url) => {
                write!(f, "Not a valid Wikipedia article URL: \"{}\"", url)
            }
            Error::OracleFailure { direction, node, reason } => {
                write!(f, "Failed to expand \"{}\" ({} search): {}", node, direction, reason)
            }
            Error::HttpError(msg) => {
                write!(f, "HTTP error: {}", msg)
            }
            Error::NetworkError(msg) => {
                write!(f, "Network error: {}", msg)
            }
            Error::DecodeError(msg) => {
                write!(f, "Malformed API response: {}", msg)
            }
            Error::WorkerFailed(msg) => {
                write!(f, "Search worker failed: {}", msg)
            }
            Error::IoError(err) => {
                write!(f, "I/O error: {}", err)
            }
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::IoError(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::IoError(err)
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        if err.is_connect() || err.is_timeout() {
            Error::NetworkError(err.to_string())
        } else if err.is_decode() {
            Error::DecodeError(err.to_string())
        } else {
            Error::HttpError(err.to_string())
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::DecodeError(err.to_string())
    }
}

/// Convenience result type for wikipath operations
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_oracle_failure_wraps_cause() {
        let err = Error::oracle_failure(
            Direction::Backward,
            "Disc_jockey",
            Error::NetworkError("connection reset".to_string()),
        );

        match &err {
            Error::OracleFailure { direction, node, reason } => {
                assert_eq!(*direction, Direction::Backward);
                assert_eq!(node, "Disc_jockey");
                assert!(reason.contains("connection reset"));
            }
            other => panic!("Expected OracleFailure, got {other:?}"),
        }

        // Wrapping twice keeps the innermost node
        let rewrapped = Error::oracle_failure(Direction::Forward, "Other", err);
        assert!(rewrapped.to_string().contains("Disc_jockey"));
    }

    #[test]
    fn test_display_messages() {
        assert_eq!(
            Error::InvalidUrl("en.wikpedia.org/wiki/Funk".to_string()).to_string(),
            "Not a valid Wikipedia article URL: \"en.wikpedia.org/wiki/Funk\""
        );
        assert!(Error::DecodeError("eof".to_string()).to_string().contains("eof"));
    }

    #[test]
    fn test_transient_classification() {
        assert!(Error::NetworkError("timeout".to_string()).is_transient());
        assert!(!Error::HttpError("404".to_string()).is_transient());
        assert!(!Error::InvalidInput("empty".to_string()).is_transient());
    }

    #[test]
    fn test_serde_error_conversion() {
        let parse_err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err: Error = parse_err.into();
        assert!(matches!(err, Error::DecodeError(_)));
    }
}
