//! Error types for the WolfSearch engine.
//!
//! Every fallible operation in the crate returns [`Result`], whose error side is the
//! [`WolfError`] enum. The variants follow the engine's failure taxonomy: schema
//! problems surface at setup time, query problems are recoverable and reported to the
//! caller, and commit failures discard the transaction while the last committed
//! generation stays queryable.
//!
//! # Examples
//!
//! ```
//! use wolfsearch::error::{ErrorKind, Result, WolfError};
//!
//! fn parse_something() -> Result<()> {
//!     Err(WolfError::query_syntax("unbalanced quote"))
//! }
//!
//! let err = parse_something().unwrap_err();
//! assert_eq!(err.kind(), ErrorKind::QuerySyntax);
//! ```

use std::io;

use thiserror::Error;

/// The main error type for WolfSearch operations.
#[derive(Error, Debug)]
pub enum WolfError {
    /// I/O errors (file operations on the index directory).
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Malformed schema definition.
    #[error("Schema error: {0}")]
    Schema(String),

    /// Malformed query string (e.g. an unbalanced quote).
    #[error("Query syntax error: {0}")]
    QuerySyntax(String),

    /// A query or document referenced a field that the schema does not declare.
    #[error("Invalid field: {0}")]
    InvalidField(String),

    /// Lookup of a document that is not stored.
    #[error("Not found: {0}")]
    NotFound(String),

    /// A staged write could not be applied; the transaction was discarded.
    #[error("Commit error: {0}")]
    Commit(String),

    /// A document handed to the writer is unusable (e.g. missing its unique key).
    #[error("Invalid document: {0}")]
    InvalidDocument(String),

    /// Another writer transaction is already active on the index.
    #[error("Writer busy: {0}")]
    WriterBusy(String),

    /// Storage-related errors (missing files, checksum mismatch, closed storage).
    #[error("Storage error: {0}")]
    Storage(String),

    /// Binary encoding/decoding errors.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// JSON serialization/deserialization errors.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error for other cases.
    #[error("Error: {0}")]
    Other(String),
}

/// Result type alias for operations that may fail with [`WolfError`].
pub type Result<T> = std::result::Result<T, WolfError>;

/// Data-free classification of a [`WolfError`].
///
/// Callers that surface errors to untrusted clients report the kind only; the message
/// may mention field names or internal ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Io,
    Schema,
    QuerySyntax,
    InvalidField,
    NotFound,
    Commit,
    InvalidDocument,
    WriterBusy,
    Storage,
    Serialization,
    Other,
}

impl WolfError {
    /// Create a new schema error.
    pub fn schema<S: Into<String>>(msg: S) -> Self {
        WolfError::Schema(msg.into())
    }

    /// Create a new query syntax error.
    pub fn query_syntax<S: Into<String>>(msg: S) -> Self {
        WolfError::QuerySyntax(msg.into())
    }

    /// Create a new invalid field error.
    pub fn invalid_field<S: Into<String>>(field: S) -> Self {
        WolfError::InvalidField(field.into())
    }

    /// Create a new not found error.
    pub fn not_found<S: Into<String>>(msg: S) -> Self {
        WolfError::NotFound(msg.into())
    }

    /// Create a new commit error.
    pub fn commit<S: Into<String>>(msg: S) -> Self {
        WolfError::Commit(msg.into())
    }

    /// Create a new invalid document error.
    pub fn invalid_document<S: Into<String>>(msg: S) -> Self {
        WolfError::InvalidDocument(msg.into())
    }

    /// Create a new writer busy error.
    pub fn writer_busy<S: Into<String>>(msg: S) -> Self {
        WolfError::WriterBusy(msg.into())
    }

    /// Create a new storage error.
    pub fn storage<S: Into<String>>(msg: S) -> Self {
        WolfError::Storage(msg.into())
    }

    /// Create a new serialization error.
    pub fn serialization<S: Into<String>>(msg: S) -> Self {
        WolfError::Serialization(msg.into())
    }

    /// Create a new generic error.
    pub fn other<S: Into<String>>(msg: S) -> Self {
        WolfError::Other(msg.into())
    }

    /// Classify this error without exposing its payload.
    pub fn kind(&self) -> ErrorKind {
        match self {
            WolfError::Io(_) => ErrorKind::Io,
            WolfError::Schema(_) => ErrorKind::Schema,
            WolfError::QuerySyntax(_) => ErrorKind::QuerySyntax,
            WolfError::InvalidField(_) => ErrorKind::InvalidField,
            WolfError::NotFound(_) => ErrorKind::NotFound,
            WolfError::Commit(_) => ErrorKind::Commit,
            WolfError::InvalidDocument(_) => ErrorKind::InvalidDocument,
            WolfError::WriterBusy(_) => ErrorKind::WriterBusy,
            WolfError::Storage(_) => ErrorKind::Storage,
            WolfError::Serialization(_) | WolfError::Json(_) => ErrorKind::Serialization,
            WolfError::Other(_) => ErrorKind::Other,
        }
    }

    /// Whether the caller can carry on after this error (query-time and lookup errors).
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::QuerySyntax | ErrorKind::InvalidField | ErrorKind::NotFound
        )
    }
}

impl From<bincode::Error> for WolfError {
    fn from(err: bincode::Error) -> Self {
        WolfError::Serialization(err.to_string())
    }
}
