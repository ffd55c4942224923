//! Live-tail transitions. This slice has its own search and never touches
//! the quick filters.

use crate::model::{Field, LogRecord};
use crate::state::{LiveTailConfig, LiveTailStatus, LogsState, StatePatch};

/// Set the transport status.
pub fn set_live_tail_status(state: &LogsState, status: LiveTailStatus) -> StatePatch {
    StatePatch {
        live_tail: Some(LiveTailConfig {
            status,
            ..state.live_tail.clone()
        }),
        ..StatePatch::none()
    }
}

/// Set the search value and the column it applies to.
pub fn set_live_tail_search(
    state: &LogsState,
    value: impl Into<String>,
    field: impl Into<String>,
) -> StatePatch {
    StatePatch {
        live_tail: Some(LiveTailConfig {
            search_value: value.into(),
            search_field: field.into(),
            ..state.live_tail.clone()
        }),
        ..StatePatch::none()
    }
}

/// Clear the search value and field.
pub fn reset_live_tail_search_state(state: &LogsState) -> StatePatch {
    set_live_tail_search(state, String::new(), String::new())
}

/// Replace the tailed stream's columns.
pub fn set_live_tail_schema(state: &LogsState, schema: Vec<Field>) -> StatePatch {
    StatePatch {
        live_tail: Some(LiveTailConfig {
            schema,
            ..state.live_tail.clone()
        }),
        ..StatePatch::none()
    }
}

/// Whether `record` passes the live-tail search.
///
/// Case-insensitive substring match on the configured field. An empty value
/// or field matches everything.
pub fn live_tail_matches(config: &LiveTailConfig, record: &LogRecord) -> bool {
    if config.search_value.is_empty() || config.search_field.is_empty() {
        return true;
    }
    record
        .coerced(&config.search_field)
        .to_lowercase()
        .contains(&config.search_value.to_lowercase())
}

/// The tailed records that pass the search, in arrival order.
pub fn filter_live_tail<'a>(config: &LiveTailConfig, records: &'a [LogRecord]) -> Vec<&'a LogRecord> {
    records
        .iter()
        .filter(|r| live_tail_matches(config, r))
        .collect()
}
