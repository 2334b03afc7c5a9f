//! Core error types for studyclock-core.
//!
//! The session engine itself is total: every operation is guarded by
//! explicit no-op conditions and never fails. Errors only arise at the
//! storage boundary and when rendering state for output.

use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type for studyclock-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Storage-related errors
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic errors with context
    #[error("{0}")]
    Custom(String),
}

/// Snapshot-store errors.
#[derive(Error, Debug)]
pub enum StorageError {
    /// The snapshot file exists but could not be parsed
    #[error("Failed to load session snapshot from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// The snapshot could not be serialized or written
    #[error("Failed to save session snapshot to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
