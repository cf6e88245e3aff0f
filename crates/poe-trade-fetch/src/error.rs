//! Error types for the trade-offer fetcher.
//!
//! Uses `thiserror` for structured error handling with automatic `From`
//! implementations. Every failure aborts the run; there is no
//! transient/permanent distinction and no retry.

/// Errors from the HTTP client layer.
#[derive(thiserror::Error, Debug)]
pub enum ClientError {
    /// HTTP transport error (connection, DNS, TLS, etc.)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-success HTTP status
    #[error("Unexpected status {status}: {message}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Response body or message
        message: String,
    },

    /// JSON parsing error
    #[error("Failed to parse response: {0}")]
    Parse(#[from] serde_json::Error),

    /// A configured value could not be encoded as a request header
    #[error("Invalid header value: {0}")]
    InvalidHeader(#[from] reqwest::header::InvalidHeaderValue),
}

impl ClientError {
    /// Create a status error from a non-success response.
    #[must_use]
    pub fn status(status: u16, message: impl Into<String>) -> Self {
        Self::Status { status, message: message.into() }
    }

    /// Get the HTTP status code if this is a status error.
    #[must_use]
    pub const fn status_code(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Result type alias for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_error_display() {
        let err = ClientError::status(502, "bad gateway");
        assert_eq!(err.to_string(), "Unexpected status 502: bad gateway");
        assert_eq!(err.status_code(), Some(502));
    }

    #[test]
    fn test_parse_error_has_no_status() {
        let parse_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = ClientError::from(parse_err);
        assert_eq!(err.status_code(), None);
    }
}
