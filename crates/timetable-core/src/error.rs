//! Core error types for timetable-core.
//!
//! Every fallible operation in the library returns [`CoreError`] (through the
//! [`Result`] alias). None of these errors is fatal to a running timer: the
//! controller reports them and carries on.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for timetable-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Key-value storage errors
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Task status backend errors
    #[error("Task API error: {0}")]
    TaskApi(#[from] TaskApiError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic errors with context
    #[error("{0}")]
    Custom(String),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Unknown configuration key
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),
}

/// Key-value storage errors.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Failed to open the store
    #[error("Failed to open store at {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Query execution failed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Store is locked by another process
    #[error("Store is locked")]
    Locked,
}

/// Errors from the task status backend.
#[derive(Error, Debug)]
pub enum TaskApiError {
    /// The request never produced a response
    #[error("Request to {endpoint} failed: {source}")]
    Transport {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    /// The backend answered with a non-success status
    #[error("{endpoint} returned HTTP {status}")]
    Status { endpoint: String, status: u16 },

    /// The response body was not the expected JSON
    #[error("Malformed response from {endpoint}: {message}")]
    MalformedResponse { endpoint: String, message: String },

    /// Base URL could not be parsed
    #[error("Invalid base URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Base URL cannot carry a path (e.g. `mailto:`)
    #[error("Base URL cannot carry a path: {0}")]
    NotHierarchical(String),

    /// HTTP client could not be built
    #[error("Failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
}

impl From<rusqlite::Error> for StorageError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(inner, _msg) => {
                if inner.code == rusqlite::ErrorCode::DatabaseLocked
                    || inner.code == rusqlite::ErrorCode::DatabaseBusy
                {
                    StorageError::Locked
                } else {
                    StorageError::QueryFailed(err.to_string())
                }
            }
            _ => StorageError::QueryFailed(err.to_string()),
        }
    }
}

impl From<rusqlite::Error> for CoreError {
    fn from(err: rusqlite::Error) -> Self {
        CoreError::Storage(err.into())
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
