//! Error types for the connection resolution layer.
//!
//! This module defines a hierarchy of error types:
//!
//! - [`DecodeError`] - Cursor decoding failures
//! - [`ValidationError`] - Pagination argument contract violations
//! - [`DataSourceError`] - Backend failures reported by a data source
//! - [`ConnectionError`] - Top-level resolution errors
//!
//! Error conversion is automatic via `From` implementations,
//! allowing `?` to work across error boundaries.

use thiserror::Error;

// =============================================================================
// Cursor Decode Errors
// =============================================================================

/// Failure to decode an opaque cursor back into a position.
///
/// Resolution treats a malformed boundary cursor as "cursor absent" rather
/// than failing the whole request; the error type exists so that callers
/// inspecting cursors directly get a precise diagnostic.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The token is not a cursor produced by this encoding scheme.
    #[error("Malformed cursor: {0:?}")]
    Malformed(String),
}

// =============================================================================
// Validation Errors
// =============================================================================

/// Pagination argument contract violations.
///
/// These are client errors: the request itself is contradictory and no
/// query is attempted.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// Both `first` and `last` were provided with nonzero values.
    #[error("Conflicting pagination arguments: first and last are mutually exclusive")]
    ConflictingPagination,

    /// Both `before` and `after` cursors were provided.
    #[error("Conflicting cursors: before and after are mutually exclusive")]
    ConflictingCursors,
}

// =============================================================================
// Data Source Errors
// =============================================================================

/// Failures reported by a backing data source.
///
/// Constructed by [`crate::ports::DataSource`] implementations, never by
/// the resolution core itself.
#[derive(Debug, Error)]
pub enum DataSourceError {
    /// Failed to reach the backing store.
    #[error("Connection error: {0}")]
    Connection(String),

    /// The backend rejected or failed the query.
    #[error("Query execution failed: {0}")]
    QueryFailed(String),
}

// =============================================================================
// Connection Errors
// =============================================================================

/// Top-level resolution errors.
///
/// This is the single error type returned by
/// [`crate::services::ConnectionResolver`]. It wraps the lower-level
/// errors and adds resolver-specific variants.
#[derive(Debug, Error)]
pub enum ConnectionError {
    /// The pagination arguments violate the contract.
    #[error("Invalid arguments: {0}")]
    InvalidArguments(#[from] ValidationError),

    /// The data source failed.
    #[error("Upstream error: {0}")]
    Upstream(#[from] DataSourceError),

    /// The query matched no records.
    ///
    /// Only produced when strict empty-page handling is enabled; the
    /// default behavior is to return an empty connection instead.
    #[error("Query returned no results")]
    NoResults,
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for cursor decoding.
pub type DecodeResult<T> = Result<T, DecodeError>;

/// Result type for argument validation.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Result type for data source operations.
pub type SourceResult<T> = Result<T, DataSourceError>;

/// Result type for connection resolution.
pub type ConnectionResult<T> = Result<T, ConnectionError>;

#[cfg(test)]
mod tests {
    use super::*;

    // Test critique: la chaîne de conversion d'erreurs fonctionne
    // Permet d'utiliser ? à travers les couches
    #[test]
    fn test_error_conversion_chain() {
        // Validation -> Connection
        let validation_err = ValidationError::ConflictingPagination;
        let conn_err: ConnectionError = validation_err.into();
        assert!(conn_err.to_string().contains("mutually exclusive"));

        // DataSource -> Connection
        let source_err = DataSourceError::QueryFailed("db failed".into());
        let conn_err: ConnectionError = source_err.into();
        assert!(conn_err.to_string().contains("db failed"));
    }

    // Test critique: le token fautif est visible dans le message de debug
    #[test]
    fn test_malformed_cursor_includes_token() {
        let err = DecodeError::Malformed("not-a-real-cursor".into());
        assert!(err.to_string().contains("not-a-real-cursor"));
    }
}
