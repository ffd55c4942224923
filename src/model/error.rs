//! Error types for collaborator failures.
//!
//! This module defines the errors the core receives from its collaborators using
//! `thiserror`. They compose via `?` in the session layer.
//!
//! # Error Taxonomy
//!
//! - **Input validation** (empty filter name, invalid page, empty query) is NOT an
//!   error value. It is carried as an inline message on the relevant state slice
//!   (`TableOpts::page_error`, `CustomQueryState::error`, `SaveFilterForm::is_error`)
//!   and rendered next to the offending control.
//! - **Derivation impossibility** (average of zero buckets) is defined, not raised:
//!   the result is 0.
//! - **Collaborator failure** is represented by the enums below:
//!   - [`QueryError`] - query executor failures (log and aggregation fetches)
//!   - [`SchemaError`] - schema provider failures
//!   - [`SavedFilterError`] - saved-filter store failures
//!
//! # Recovery Strategy
//!
//! Nothing here is fatal. On a failed fetch the session records the message in
//! `DataState::fetch_error` and leaves the previous dataset and page intact, so the
//! rendering layer can offer a retry of the triggering action.

use thiserror::Error;

/// Failure reported by the query executor.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    /// The backend rejected the query (syntax error, unknown column, ...).
    ///
    /// Retrying the same text will fail again; the user must edit the query.
    #[error("Query rejected: {0}")]
    Rejected(String),

    /// The query could not be delivered or the response was lost.
    ///
    /// Retrying may succeed.
    #[error("Query transport failed: {0}")]
    Transport(String),

    /// The backend answered with rows the core could not interpret.
    #[error("Unexpected query response: {0}")]
    MalformedResponse(String),
}

/// Failure reported by the schema provider.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    /// The stream does not exist or is not visible to the current user.
    #[error("Stream not found: {stream}")]
    StreamNotFound {
        /// The stream that was requested.
        stream: String,
    },

    /// Transport-level failure fetching the schema.
    #[error("Schema fetch failed: {0}")]
    Transport(String),
}

/// Failure reported by the saved-filter store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SavedFilterError {
    /// The filter was changed by someone else since it was loaded.
    #[error("Saved filter {filter_id} was modified concurrently")]
    VersionConflict {
        /// Id of the conflicting filter.
        filter_id: String,
    },

    /// The store refused the filter (permissions, quota, validation).
    #[error("Saved filter rejected: {0}")]
    Rejected(String),

    /// Transport-level failure talking to the store.
    #[error("Saved filter store unavailable: {0}")]
    Transport(String),
}
