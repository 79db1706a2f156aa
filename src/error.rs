//! Unified error types for the recipe browser.

use std::fmt;

/// Application-specific errors.
#[derive(Debug, Clone, PartialEq)]
pub enum AppError {
    /// The request never produced a response (connection refused, DNS, reset)
    Network(String),
    /// The server answered with a non-success status
    Request { status: u16, status_text: String },
    /// The response body could not be decoded
    Decode(String),
    /// Durable storage could not be read or written
    Storage(String),
    /// A configuration value could not be used
    Config(String),
}

impl AppError {
    /// HTTP status carried by the error, if the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            AppError::Request { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Network(msg) => write!(f, "Network error: {}", msg),
            AppError::Request {
                status,
                status_text,
            } => write!(f, "Request failed: {} {}", status, status_text),
            AppError::Decode(msg) => write!(f, "Invalid response: {}", msg),
            AppError::Storage(msg) => write!(f, "Storage error: {}", msg),
            AppError::Config(msg) => write!(f, "Configuration error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            AppError::Decode(err.to_string())
        } else if let Some(status) = err.status() {
            AppError::Request {
                status: status.as_u16(),
                status_text: status.canonical_reason().unwrap_or_default().to_string(),
            }
        } else {
            AppError::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Decode(err.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Storage(err.to_string())
    }
}

/// Type alias for Results in this application.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_error_reports_status_and_text() {
        let err = AppError::Request {
            status: 503,
            status_text: "Service Unavailable".to_string(),
        };
        assert_eq!(err.status(), Some(503));
        assert!(!err.is_not_found());
        assert_eq!(err.to_string(), "Request failed: 503 Service Unavailable");
    }

    #[test]
    fn network_error_has_no_status() {
        let err = AppError::Network("connection refused".to_string());
        assert_eq!(err.status(), None);
        assert_eq!(err.to_string(), "Network error: connection refused");
    }
}
