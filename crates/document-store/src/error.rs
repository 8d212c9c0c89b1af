//! Error types for document store operations.

use thiserror::Error;

/// Error type for store reads, writes and live streams.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Network or transport-level HTTP error from reqwest.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The backend returned a non-success HTTP status.
    ///
    /// Common causes: expired token, row-level security violation.
    #[error("Backend error: {status} - {message}")]
    Backend { status: u16, message: String },

    /// The caller may not read or write this collection.
    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    /// The store could not serve the request.
    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

impl StoreError {
    /// Maps an HTTP status and body to the matching variant.
    pub fn from_status(status: u16, message: String) -> Self {
        match status {
            401 | 403 => StoreError::PermissionDenied(message),
            _ => StoreError::Backend { status, message },
        }
    }
}

/// Result type alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
