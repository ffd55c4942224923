//! Collaborator seams.
//!
//! The core never talks to a backend directly. It consumes:
//! - a [`QueryExecutor`] for log and aggregation fetches
//! - a [`SchemaProvider`] for default table headers
//! - a [`SavedFilterStore`] for saved filters
//! - a [`Clock`] so time-range math is deterministic under test
//!
//! Transport, retries, caching and cancellation of late results belong to the
//! implementors. The core only consumes returned records or the failure.

use crate::model::{LogRecord, QueryError, SavedFilter, SavedFilterError, SchemaError, StreamSchema};

pub mod clock;
pub mod query;

pub use clock::{Clock, FixedClock, SystemClock};
pub use query::{logs_query, quote_timestamp};

/// Runs a query string and returns its rows.
pub trait QueryExecutor {
    /// Execute `query`.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError`] when the backend rejects the query or cannot be
    /// reached.
    fn execute(&mut self, query: &str) -> Result<Vec<LogRecord>, QueryError>;
}

/// Looks up a stream's columns.
pub trait SchemaProvider {
    /// Schema of `stream`, fields in display order.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::StreamNotFound`] for an unknown stream.
    fn get_schema(&self, stream: &str) -> Result<StreamSchema, SchemaError>;
}

/// Persists saved filters.
pub trait SavedFilterStore {
    /// Create a new filter. The returned copy carries the assigned id and version.
    ///
    /// # Errors
    ///
    /// Returns [`SavedFilterError`] when the store refuses or is unreachable.
    fn create(&mut self, filter: SavedFilter) -> Result<SavedFilter, SavedFilterError>;

    /// Overwrite an existing filter.
    ///
    /// # Errors
    ///
    /// Returns [`SavedFilterError::VersionConflict`] when the stored version moved on.
    fn update(&mut self, filter: SavedFilter) -> Result<SavedFilter, SavedFilterError>;

    /// Filters saved for `stream`.
    ///
    /// # Errors
    ///
    /// Returns [`SavedFilterError`] when the store is unreachable.
    fn list(&self, stream: &str) -> Result<Vec<SavedFilter>, SavedFilterError>;
}
