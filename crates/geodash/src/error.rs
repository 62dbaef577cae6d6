//! Error types for geodash.
//!
//! This module defines all error types used throughout the geodash crate,
//! providing detailed context for debugging and user-friendly error messages.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for geodash operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Data Loading Errors ===
    /// The project endpoint answered with a non-success status.
    #[error("{message}")]
    Fetch {
        /// Message shown in the error panel.
        message: String,
        /// HTTP status returned by the endpoint, if any.
        status: Option<u16>,
    },

    /// The HTTP request itself failed.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Failed to read a JSON dump.
    #[error("failed to read dump at {path}: {source}")]
    DumpRead {
        /// Path to the dump file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to write a JSON dump.
    #[error("failed to write dump at {path}: {source}")]
    DumpWrite {
        /// Path to the dump file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    // === Configuration Errors ===
    /// Failed to load configuration.
    #[error("failed to load configuration: {0}")]
    ConfigLoad(Box<figment::Error>),

    /// Configuration validation failed.
    #[error("invalid configuration: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    // === Query Errors ===
    /// A status value did not match any known project status.
    #[error("unknown project status: {0}")]
    InvalidStatus(String),

    /// A page size outside the offered options.
    #[error("page size {0} is not one of 25, 50 or 100")]
    InvalidPageSize(usize),

    // === Server Errors ===
    /// The HTTP server failed to bind or serve.
    #[error("server error on {addr}: {message}")]
    Server {
        /// Address the server was bound to.
        addr: String,
        /// Description of what went wrong.
        message: String,
    },

    // === I/O Errors ===
    /// File system operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to create a required directory.
    #[error("failed to create directory {path}: {source}")]
    DirectoryCreate {
        /// Path that couldn't be created.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    // === Serialization Errors ===
    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV serialization failed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// A specialized Result type for geodash operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl Error {
    /// Create the error raised when the project endpoint rejects a request.
    #[must_use]
    pub fn fetch_failed(status: Option<u16>) -> Self {
        Self::Fetch {
            message: "Failed to fetch data".to_string(),
            status,
        }
    }

    /// Create a configuration validation error.
    #[must_use]
    pub fn config_validation(message: impl Into<String>) -> Self {
        Self::ConfigValidation {
            message: message.into(),
        }
    }

    /// Create a server error.
    #[must_use]
    pub fn server(addr: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Server {
            addr: addr.into(),
            message: message.into(),
        }
    }
}
