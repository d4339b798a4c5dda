//! Error types and handling for Chargeboard
//!
//! This module defines the error types used throughout the application,
//! providing consistent error handling and reporting.

use thiserror::Error;

/// Result type alias for Chargeboard operations
pub type Result<T> = std::result::Result<T, ChargeboardError>;

/// Main error type for Chargeboard
#[derive(Debug, Error)]
pub enum ChargeboardError {
    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Validation errors
    #[error("Validation error: {field} - {message}")]
    Validation { field: String, message: String },

    /// Transport-level failures talking to a status endpoint
    #[error("Network error: {message}")]
    Network { message: String },

    /// Status endpoint answered with a non-success status code
    #[error("HTTP error: status {status}")]
    Http { status: u16 },

    /// Serialization/deserialization errors
    #[error("Serialization error: {message}")]
    Serialization { message: String },

    /// File I/O errors
    #[error("I/O error: {message}")]
    Io { message: String },

    /// Display surface errors (missing mount points and the like)
    #[error("Surface error: {message}")]
    Surface { message: String },

    /// HTTP/Web server errors
    #[error("Web server error: {message}")]
    Web { message: String },

    /// Generic errors with context
    #[error("Error: {message}")]
    Generic { message: String },
}

impl ChargeboardError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        ChargeboardError::Config {
            message: message.into(),
        }
    }

    /// Create a new validation error
    pub fn validation<S: Into<String>>(field: S, message: S) -> Self {
        ChargeboardError::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a new network error
    pub fn network<S: Into<String>>(message: S) -> Self {
        ChargeboardError::Network {
            message: message.into(),
        }
    }

    /// Create a new HTTP status error
    pub fn http(status: u16) -> Self {
        ChargeboardError::Http { status }
    }

    /// Create a new serialization error
    pub fn serialization<S: Into<String>>(message: S) -> Self {
        ChargeboardError::Serialization {
            message: message.into(),
        }
    }

    /// Create a new I/O error
    pub fn io<S: Into<String>>(message: S) -> Self {
        ChargeboardError::Io {
            message: message.into(),
        }
    }

    /// Create a new surface error
    pub fn surface<S: Into<String>>(message: S) -> Self {
        ChargeboardError::Surface {
            message: message.into(),
        }
    }

    /// Create a new web error
    pub fn web<S: Into<String>>(message: S) -> Self {
        ChargeboardError::Web {
            message: message.into(),
        }
    }

    /// Create a new generic error
    pub fn generic<S: Into<String>>(message: S) -> Self {
        ChargeboardError::Generic {
            message: message.into(),
        }
    }
}

impl From<std::io::Error> for ChargeboardError {
    fn from(err: std::io::Error) -> Self {
        ChargeboardError::io(err.to_string())
    }
}

impl From<serde_yaml::Error> for ChargeboardError {
    fn from(err: serde_yaml::Error) -> Self {
        ChargeboardError::serialization(err.to_string())
    }
}

impl From<serde_json::Error> for ChargeboardError {
    fn from(err: serde_json::Error) -> Self {
        ChargeboardError::serialization(err.to_string())
    }
}

impl From<reqwest::Error> for ChargeboardError {
    fn from(err: reqwest::Error) -> Self {
        if let Some(status) = err.status() {
            return ChargeboardError::http(status.as_u16());
        }
        if err.is_decode() {
            return ChargeboardError::serialization(err.to_string());
        }
        ChargeboardError::network(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = ChargeboardError::config("test config error");
        assert!(matches!(err, ChargeboardError::Config { .. }));

        let err = ChargeboardError::http(500);
        assert!(matches!(err, ChargeboardError::Http { status: 500 }));

        let err = ChargeboardError::validation("field", "test validation error");
        assert!(matches!(err, ChargeboardError::Validation { .. }));
    }

    #[test]
    fn test_error_display() {
        let err = ChargeboardError::config("test error");
        assert_eq!(format!("{}", err), "Configuration error: test error");

        let err = ChargeboardError::validation("test_field", "invalid value");
        assert_eq!(
            format!("{}", err),
            "Validation error: test_field - invalid value"
        );

        assert_eq!(
            format!("{}", ChargeboardError::http(503)),
            "HTTP error: status 503"
        );
    }
}
