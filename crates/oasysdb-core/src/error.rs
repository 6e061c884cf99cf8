//! Error types for `OasysDB`.
//!
//! This module provides a unified error type for all `OasysDB` operations,
//! designed for API exposure to Rust callers and the Python bindings alike.

use std::path::PathBuf;
use thiserror::Error;

use crate::config::ConfigError;

/// Result type alias for `OasysDB` operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Broad category of an [`Error`].
///
/// Bindings use the kind to pick the exception type they raise, so that
/// callers can react to a class of failure without matching every variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The database path is inaccessible, unreadable or corrupted.
    Storage,
    /// A collection or record does not exist.
    NotFound,
    /// A collection name is already taken.
    DuplicateName,
    /// A vector length disagrees with the collection dimension.
    DimensionMismatch,
    /// An argument was rejected before touching any state.
    InvalidInput,
}

/// Errors that can occur in `OasysDB` operations.
///
/// Each variant includes a descriptive error message suitable for end-users.
/// Error codes follow the pattern `OASYS-XXX` for easy debugging.
#[derive(Error, Debug)]
pub enum Error {
    /// Collection already exists (OASYS-001).
    #[error("[OASYS-001] Collection '{0}' already exists")]
    CollectionExists(String),

    /// Collection not found (OASYS-002).
    #[error("[OASYS-002] Collection '{0}' not found")]
    CollectionNotFound(String),

    /// Record not found (OASYS-003).
    #[error("[OASYS-003] Record with ID '{0}' not found")]
    RecordNotFound(u32),

    /// Dimension mismatch (OASYS-004).
    #[error("[OASYS-004] Vector dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Expected dimension.
        expected: usize,
        /// Actual dimension.
        actual: usize,
    },

    /// Invalid vector (OASYS-005).
    #[error("[OASYS-005] Invalid vector: {0}")]
    InvalidVector(String),

    /// Invalid metadata (OASYS-006).
    #[error("[OASYS-006] Invalid metadata: {0}")]
    InvalidMetadata(String),

    /// Invalid collection name (OASYS-007).
    #[error("[OASYS-007] Invalid collection name '{0}': use 1-64 letters, digits, '_' or '-'")]
    InvalidName(String),

    /// Storage error (OASYS-008).
    #[error("[OASYS-008] Storage error: {0}")]
    Storage(String),

    /// Storage corrupted (OASYS-009).
    ///
    /// Persisted files failed validation and cannot be loaded.
    #[error("[OASYS-009] Storage corrupted: {0}")]
    Corrupted(String),

    /// Database not empty (OASYS-010).
    #[error("[OASYS-010] Database at '{}' already contains collections", .0.display())]
    DatabaseNotEmpty(PathBuf),

    /// Configuration error (OASYS-011).
    #[error("[OASYS-011] Configuration error: {0}")]
    Config(String),

    /// Limit exceeded (OASYS-012).
    #[error("[OASYS-012] Limit exceeded: {0}")]
    LimitExceeded(String),

    /// IO error (OASYS-013).
    #[error("[OASYS-013] IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error (OASYS-014).
    #[error("[OASYS-014] Serialization error: {0}")]
    Serialization(String),
}

impl Error {
    /// Returns the error code (e.g., "OASYS-001").
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::CollectionExists(_) => "OASYS-001",
            Self::CollectionNotFound(_) => "OASYS-002",
            Self::RecordNotFound(_) => "OASYS-003",
            Self::DimensionMismatch { .. } => "OASYS-004",
            Self::InvalidVector(_) => "OASYS-005",
            Self::InvalidMetadata(_) => "OASYS-006",
            Self::InvalidName(_) => "OASYS-007",
            Self::Storage(_) => "OASYS-008",
            Self::Corrupted(_) => "OASYS-009",
            Self::DatabaseNotEmpty(_) => "OASYS-010",
            Self::Config(_) => "OASYS-011",
            Self::LimitExceeded(_) => "OASYS-012",
            Self::Io(_) => "OASYS-013",
            Self::Serialization(_) => "OASYS-014",
        }
    }

    /// Returns the broad category of this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::CollectionExists(_) => ErrorKind::DuplicateName,
            Self::CollectionNotFound(_) | Self::RecordNotFound(_) => ErrorKind::NotFound,
            Self::DimensionMismatch { .. } => ErrorKind::DimensionMismatch,
            Self::InvalidVector(_)
            | Self::InvalidMetadata(_)
            | Self::InvalidName(_)
            | Self::Config(_)
            | Self::LimitExceeded(_) => ErrorKind::InvalidInput,
            Self::Storage(_)
            | Self::Corrupted(_)
            | Self::DatabaseNotEmpty(_)
            | Self::Io(_)
            | Self::Serialization(_) => ErrorKind::Storage,
        }
    }

    /// Returns true if this error is recoverable.
    ///
    /// Corrupted storage cannot be fixed by retrying the call.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        !matches!(self, Self::Corrupted(_))
    }
}

impl From<bincode::Error> for Error {
    fn from(err: bincode::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl From<ConfigError> for Error {
    fn from(err: ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}
