//! Custom query (builder / SQL) transitions.
//!
//! `show_builder` and `is_active` are never both true: opening the builder
//! suspends the active query and committing one closes the builder.

use crate::pipeline::ColumnFilters;
use crate::state::table_handler::clean_store_for_refetch;
use crate::state::{CustomQueryState, LogsState, QueryMode, QuickFilters, StatePatch, TableOpts};
use chrono::{DateTime, Utc};
use tracing::{debug, info};

/// Fields `set_custom_query_state` may overwrite.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CustomQueryUpdate {
    /// New query text.
    pub raw_query: Option<String>,
    /// New editor tab.
    pub view_mode: Option<QueryMode>,
    /// New applied mode.
    pub active_mode: Option<QueryMode>,
    /// Saved filter the query comes from (`Some(None)` detaches it).
    pub saved_filter_id: Option<Option<String>>,
}

/// Open or close the builder panel.
///
/// Opening suspends the active query; closing reactivates it only if a query
/// was applied before.
pub fn toggle_query_builder(state: &LogsState) -> StatePatch {
    let current = &state.custom_query;
    let show_builder = !current.show_builder;
    let is_active = !show_builder && current.active_mode.is_some();

    StatePatch {
        custom_query: Some(CustomQueryState {
            show_builder,
            is_active,
            ..current.clone()
        }),
        ..StatePatch::none()
    }
}

/// Merge `update` and mark the query active with the builder closed.
pub fn set_custom_query_state(state: &LogsState, update: CustomQueryUpdate) -> StatePatch {
    let current = state.custom_query.clone();
    StatePatch {
        custom_query: Some(CustomQueryState {
            raw_query: update.raw_query.unwrap_or(current.raw_query),
            view_mode: update.view_mode.unwrap_or(current.view_mode),
            active_mode: update.active_mode.or(current.active_mode),
            saved_filter_id: update.saved_filter_id.unwrap_or(current.saved_filter_id),
            show_builder: false,
            is_active: true,
            error: None,
        }),
        ..StatePatch::none()
    }
}

/// Leave custom query mode, keeping only the editor tab, and clear results
/// for a refetch against the stream schema.
pub fn reset_custom_query_state(state: &LogsState, now: DateTime<Utc>) -> StatePatch {
    let custom_query = CustomQueryState {
        view_mode: state.custom_query.view_mode,
        ..CustomQueryState::default()
    };
    StatePatch {
        custom_query: Some(custom_query),
        ..StatePatch::none()
    }
    .merge(clean_store_for_refetch(state, now))
}

/// Switch the editor tab.
pub fn toggle_custom_query_view_mode(state: &LogsState, view_mode: QueryMode) -> StatePatch {
    StatePatch {
        custom_query: Some(CustomQueryState {
            view_mode,
            ..state.custom_query.clone()
        }),
        ..StatePatch::none()
    }
}

/// Commit a query.
///
/// A blank query only records an inline error. Otherwise the query becomes
/// active in `mode`, the builder closes, and all results, counts, headers and
/// column filters are cleared since the previous result shape no longer holds.
pub fn apply_custom_query(
    state: &LogsState,
    query: &str,
    mode: QueryMode,
    now: DateTime<Utc>,
) -> StatePatch {
    let current = &state.custom_query;
    if query.trim().is_empty() {
        debug!(?mode, "Rejected blank custom query");
        return StatePatch {
            custom_query: Some(CustomQueryState {
                error: Some("Query cannot be empty".to_string()),
                ..current.clone()
            }),
            ..StatePatch::none()
        };
    }

    info!(?mode, query_len = query.len(), "Custom query applied");

    let mut cleanup = clean_store_for_refetch(state, now);
    cleanup.table_opts = cleanup.table_opts.map(|table| TableOpts {
        filters: ColumnFilters::new(),
        ..table
    });

    StatePatch {
        custom_query: Some(CustomQueryState {
            show_builder: false,
            is_active: true,
            raw_query: query.to_string(),
            active_mode: Some(mode),
            error: None,
            ..current.clone()
        }),
        quick_filters: Some(QuickFilters {
            filters: ColumnFilters::new(),
            ..state.quick_filters.clone()
        }),
        ..StatePatch::none()
    }
    .merge(cleanup)
}

#[cfg(test)]
#[path = "query_handler_tests.rs"]
mod tests;
