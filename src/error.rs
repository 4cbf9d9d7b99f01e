// src/error.rs

//! Unified error handling for the advisory fetcher.
//!
//! Malformed markup never produces an error; the parsers degrade to empty or
//! partial results. Errors are reserved for configuration problems and for
//! the I/O performed by the caller-side services.

use std::fmt;

use thiserror::Error;

/// Result type alias for fetcher operations.
pub type Result<T> = std::result::Result<T, AppError>;

/// Unified application error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing failed
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Configuration validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// No source is registered under the requested identifier
    #[error("Unknown source '{id}'")]
    UnknownSource { id: String },

    /// Fetching a page failed
    #[error("Fetch error for {url}: {message}")]
    Fetch { url: String, message: String },

    /// Running the external converter failed
    #[error("Conversion of {file} failed: {message}")]
    Convert { file: String, message: String },
}

impl AppError {
    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create an unknown source error.
    pub fn unknown_source(id: impl Into<String>) -> Self {
        Self::UnknownSource { id: id.into() }
    }

    /// Create a fetch error with the offending URL.
    pub fn fetch(url: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Fetch {
            url: url.into(),
            message: message.to_string(),
        }
    }

    /// Create a conversion error for a file.
    pub fn convert(file: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Convert {
            file: file.into(),
            message: message.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_source_message() {
        let err = AppError::unknown_source("reykjavik");
        assert_eq!(err.to_string(), "Unknown source 'reykjavik'");
    }

    #[test]
    fn test_convert_message() {
        let err = AppError::convert("london.202005011200.html", "exit status 1");
        assert_eq!(
            err.to_string(),
            "Conversion of london.202005011200.html failed: exit status 1"
        );
    }
}
