//! Configuration error types.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during configuration loading and validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Port value is outside valid range (1-65535).
    #[error("invalid port '{value}': must be between 1 and 65535")]
    InvalidPort { value: String },

    /// Port string could not be parsed as a number.
    #[error("failed to parse port '{value}': {source}")]
    PortParseError {
        value: String,
        #[source]
        source: std::num::ParseIntError,
    },

    /// Bind address string could not be parsed.
    #[error("failed to parse bind address '{value}': {source}")]
    InvalidBindAddr {
        value: String,
        #[source]
        source: std::net::AddrParseError,
    },

    /// A required environment variable was not set.
    #[error("missing required environment variable: {name}")]
    MissingEnvVar { name: &'static str },

    /// Confidence threshold is not a number in `[0, 1]`.
    #[error("invalid confidence threshold '{value}': must be a number between 0 and 1")]
    InvalidThreshold { value: String },

    /// A numeric or boolean setting could not be parsed.
    #[error("invalid value '{value}' for {name}")]
    InvalidValue { name: &'static str, value: String },

    /// Chunk overlap must be smaller than the chunk size.
    #[error("chunk overlap {overlap} must be smaller than chunk size {size}")]
    InvalidChunking { size: usize, overlap: usize },

    /// Path exists but is not a directory (when a directory was expected).
    #[error("path is not a directory: {path}")]
    NotADirectory { path: PathBuf },
}
