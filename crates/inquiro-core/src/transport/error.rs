use std::fmt;

use serde_json::Value;

/// Categories of transport failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportErrorKind {
    /// Connection refused, DNS failure, reset, etc.
    Network,
    /// Connection timeout or request timeout
    Timeout,
    /// Non-success HTTP status other than 401
    HttpStatus,
    /// HTTP 401: the session expired and credentials were cleared
    Unauthorized,
    /// Response body could not be decoded
    Parse,
}

impl fmt::Display for TransportErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportErrorKind::Network => write!(f, "network"),
            TransportErrorKind::Timeout => write!(f, "timeout"),
            TransportErrorKind::HttpStatus => write!(f, "http_status"),
            TransportErrorKind::Unauthorized => write!(f, "unauthorized"),
            TransportErrorKind::Parse => write!(f, "parse"),
        }
    }
}

/// Structured error from the transport with kind and HTTP-like status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportError {
    /// Error category
    pub kind: TransportErrorKind,
    /// HTTP status when the server answered
    pub status: Option<u16>,
    /// One-line summary suitable for display
    pub message: String,
}

impl TransportError {
    pub fn new(kind: TransportErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            status: None,
            message: message.into(),
        }
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(TransportErrorKind::Network, message)
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(TransportErrorKind::Timeout, message)
    }

    pub fn parse(message: impl Into<String>) -> Self {
        Self::new(TransportErrorKind::Parse, message)
    }

    /// Creates an HTTP status error, pulling `{"error": ".."}` out of the
    /// body when present.
    pub fn http_status(status: u16, body: &str) -> Self {
        let kind = if status == 401 {
            TransportErrorKind::Unauthorized
        } else {
            TransportErrorKind::HttpStatus
        };

        let detail = serde_json::from_str::<Value>(body).ok().and_then(|json| {
            json.get("error")
                .or_else(|| json.get("message"))
                .and_then(Value::as_str)
                .map(str::to_string)
        });

        let message = match detail {
            Some(detail) => format!("HTTP {status}: {detail}"),
            None => format!("HTTP {status}"),
        };

        Self {
            kind,
            status: Some(status),
            message,
        }
    }

    /// True for the session-expiry signal.
    pub fn is_unauthorized(&self) -> bool {
        self.kind == TransportErrorKind::Unauthorized
    }
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for TransportError {}

impl From<reqwest::Error> for TransportError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            TransportError::timeout(format!("Request timed out: {error}"))
        } else if error.is_decode() {
            TransportError::parse(format!("Failed to decode response: {error}"))
        } else if let Some(status) = error.status() {
            TransportError::http_status(status.as_u16(), "")
        } else {
            TransportError::network(format!("Request failed: {error}"))
        }
    }
}

/// Result type for transport operations.
pub type TransportResult<T> = std::result::Result<T, TransportError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_status_extracts_error_field() {
        let err = TransportError::http_status(404, r#"{"error": "Chat not found"}"#);
        assert_eq!(err.kind, TransportErrorKind::HttpStatus);
        assert_eq!(err.status, Some(404));
        assert_eq!(err.message, "HTTP 404: Chat not found");
    }

    #[test]
    fn test_http_status_plain_body() {
        let err = TransportError::http_status(500, "<html>oops</html>");
        assert_eq!(err.message, "HTTP 500");
    }

    #[test]
    fn test_401_is_unauthorized() {
        let err = TransportError::http_status(401, r#"{"message": "Token expired"}"#);
        assert!(err.is_unauthorized());
        assert_eq!(err.to_string(), "HTTP 401: Token expired");
    }
}
