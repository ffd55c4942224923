//! Saved filter records exchanged with the saved-filter store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Query payload of a saved filter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "filter_type", rename_all = "lowercase")]
pub enum SavedFilterQuery {
    /// Raw SQL text.
    Sql {
        /// The SQL query.
        filter_query: String,
    },
    /// Filter-builder expression.
    Builder {
        /// Serialized builder query.
        filter_builder: String,
    },
}

/// Absolute window stored alongside a filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeFilter {
    /// Window start.
    pub from: DateTime<Utc>,
    /// Window end.
    pub to: DateTime<Utc>,
}

/// A filter persisted by the saved-filter store.
///
/// `filter_id` and `version` are assigned by the store; they are `None` for
/// a filter that has not been created yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedFilter {
    /// Store-assigned id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter_id: Option<String>,
    /// Store-assigned version.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    /// Stream the filter belongs to.
    pub stream_name: String,
    /// User-facing name.
    pub filter_name: String,
    /// Owner.
    pub user_id: String,
    /// Query payload.
    pub query: SavedFilterQuery,
    /// Optional pinned window.
    pub time_filter: Option<TimeFilter>,
}

impl SavedFilter {
    /// Whether the store already knows this filter (id, owner and version present).
    pub fn is_persisted(&self) -> bool {
        let present = |v: &Option<String>| v.as_deref().is_some_and(|s| !s.is_empty());
        present(&self.filter_id) && present(&self.version) && !self.user_id.is_empty()
    }
}
