//! Error types for docqa
//!
//! This module defines all error types used throughout the application,
//! using `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Main error type for docqa operations
///
/// This enum encompasses all possible errors that can occur while talking
/// to the backend, loading configuration, uploading files, and parsing
/// rubric CSV data.
#[derive(Error, Debug)]
pub enum DocqaError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Backend API errors (non-2xx status or `{error}` envelope)
    #[error("API error: {0}")]
    Api(String),

    /// File upload errors
    #[error("Upload error: {0}")]
    Upload(String),

    /// Rubric CSV parsing errors
    #[error("CSV parse error: {0}")]
    CsvParse(String),

    /// Operation interrupted by a cancellation token
    #[error("Operation cancelled")]
    Cancelled,

    /// Retry budget exhausted for a question
    #[error("Retries exhausted after {attempts} attempts: {message}")]
    RetriesExhausted {
        /// Total attempts performed (initial attempt plus retries)
        attempts: u32,
        /// The final failure message
        message: String,
    },

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// HTTP request errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Result type alias for docqa operations
///
/// This is a convenience alias that uses `anyhow::Error` as the error type,
/// allowing for rich error context and easy error propagation.
pub type Result<T> = anyhow::Result<T>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_display() {
        let error = DocqaError::Config("missing base_url".to_string());
        assert_eq!(error.to_string(), "Configuration error: missing base_url");
    }

    #[test]
    fn test_api_error_display() {
        let error = DocqaError::Api("Unknown error".to_string());
        assert_eq!(error.to_string(), "API error: Unknown error");
    }

    #[test]
    fn test_upload_error_display() {
        let error = DocqaError::Upload("Internal Server Error".to_string());
        assert_eq!(error.to_string(), "Upload error: Internal Server Error");
    }

    #[test]
    fn test_csv_parse_error_display() {
        let error = DocqaError::CsvParse("no data rows".to_string());
        assert_eq!(error.to_string(), "CSV parse error: no data rows");
    }

    #[test]
    fn test_cancelled_display() {
        assert_eq!(DocqaError::Cancelled.to_string(), "Operation cancelled");
    }

    #[test]
    fn test_retries_exhausted_display() {
        let error = DocqaError::RetriesExhausted {
            attempts: 6,
            message: "API request failed with status 500".to_string(),
        };
        let s = error.to_string();
        assert!(s.contains("6 attempts"));
        assert!(s.contains("status 500"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let error: DocqaError = io_error.into();
        assert!(matches!(error, DocqaError::Io(_)));
    }

    #[test]
    fn test_json_error_conversion() {
        let json_error = serde_json::from_str::<serde_json::Value>("{bad json}").unwrap_err();
        let error: DocqaError = json_error.into();
        assert!(matches!(error, DocqaError::Serialization(_)));
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<DocqaError>();
    }
}
