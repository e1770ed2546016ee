// Error types for the movie catalog.

use std::path::PathBuf;

use thiserror::Error;

/// Failures raised by a storage backend while loading or saving the catalog.
///
/// A missing backend file is never reported here: it loads as an empty
/// catalog.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Storage I/O failure: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV failure: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON failure: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Catalog file is corrupt: {0}")]
    Corrupt(String),
}

/// Failures raised by the metadata lookup.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FetchError {
    /// Transport failure or a non-success HTTP status.
    #[error("Failed to connect to OMDb API")]
    Connectivity(String),

    /// The service answered but knows no such title.
    #[error("{0}")]
    NotFound(String),

    #[error("Unexpected OMDb response: {0}")]
    MalformedResponse(String),
}

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Cannot read template {}: {source}", .path.display())]
    Template {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Cannot write report {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("Movie API Key not found in environment variables.")]
    MissingApiKey,

    #[error("Unknown storage format '{0}', expected 'csv' or 'json'")]
    InvalidFormat(String),
}

pub type StorageResult<T> = std::result::Result<T, StorageError>;
