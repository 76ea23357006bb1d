//! Error types for the folio search subsystem.

use thiserror::Error;

/// Result type alias using folio's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for folio search operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Database operation failed (wraps sqlx::Error)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// The FTS5 full-text capability is not present in the database.
    ///
    /// Callers should surface a degraded-search signal rather than
    /// silently returning empty results.
    #[error("Full-text search is not available")]
    FtsUnavailable,

    /// The compiled query was rejected by the engine or failed escaping.
    #[error("Query syntax error: {message} (query: {query})")]
    QuerySyntax { query: String, message: String },

    /// A per-note index write failed. Recoverable at batch granularity.
    #[error("Index write failed for note {note_id}: {message}")]
    IndexWrite { note_id: String, message: String },

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}
