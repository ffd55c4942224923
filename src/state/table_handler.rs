//! Dataset, pipeline and pagination transitions.
//!
//! Pure functions `(&LogsState, payload) -> StatePatch`. Every transition that
//! changes filters or sort re-runs the pipeline over the canonical dataset
//! (`data.raw`), never over the previously derived one.

use crate::model::{headers_from_records, headers_from_schema, LogRecord, StreamSchema, TimeRange};
use crate::model::{find_fixed_duration, floor_to_minute};
use crate::pipeline::{
    filter_and_sort, get_page_slice, total_pages, ColumnFilters, PipelineCriteria, SortOrder,
};
use crate::state::{DataState, LogsState, QuickFilters, SortSpec, StatePatch, TableOpts};
use chrono::{DateTime, Duration, Utc};
use tracing::debug;

// ===== Derivation =====

/// Re-run the pipeline for `table`'s criteria and land on page 1 (page 0 when
/// nothing survives).
///
/// Returns the updated table opts and datasets; callers decide which other
/// sections to patch.
pub(crate) fn rederive_first_page(state: &LogsState, table: TableOpts) -> (TableOpts, DataState) {
    let filtered = filter_and_sort(
        &PipelineCriteria {
            sort_key: &table.sort_key,
            sort_order: table.sort_order,
            filters: &table.filters,
        },
        &state.data.raw,
    );
    let current_page = if filtered.is_empty() { 0 } else { 1 };
    let table = TableOpts {
        page_data: get_page_slice(current_page, table.per_page, &filtered),
        total_pages: total_pages(filtered.len(), table.per_page),
        displayed_count: filtered.len(),
        current_page,
        page_error: None,
        ..table
    };
    let data = DataState {
        filtered,
        ..state.data.clone()
    };
    (table, data)
}

// ===== Data =====

/// Store a freshly fetched canonical dataset and derive the first page.
///
/// Headers come from the result shape while a custom query is active and from
/// the stream schema otherwise. Clears any previous fetch error.
pub fn set_data(state: &LogsState, records: Vec<LogRecord>) -> StatePatch {
    let table = &state.table_opts;
    let filtered = filter_and_sort(
        &PipelineCriteria {
            sort_key: &table.sort_key,
            sort_order: table.sort_order,
            filters: &table.filters,
        },
        &records,
    );
    let current_page = if filtered.is_empty() { 0 } else { 1 };
    let headers = if state.custom_query.is_active {
        headers_from_records(&records)
    } else {
        headers_from_schema(state.data.schema.as_ref())
    };

    debug!(
        raw = records.len(),
        derived = filtered.len(),
        custom_query = state.custom_query.is_active,
        "Dataset replaced"
    );

    StatePatch {
        table_opts: Some(TableOpts {
            page_data: get_page_slice(current_page, table.per_page, &filtered),
            total_pages: total_pages(filtered.len(), table.per_page),
            displayed_count: filtered.len(),
            current_page,
            headers,
            page_error: None,
            ..table.clone()
        }),
        data: Some(DataState {
            raw: records,
            filtered,
            schema: state.data.schema.clone(),
            fetch_error: None,
        }),
        ..StatePatch::none()
    }
}

/// Record a failed fetch. The previous dataset and page stay as they were.
pub fn set_fetch_error(state: &LogsState, message: impl Into<String>) -> StatePatch {
    StatePatch {
        data: Some(DataState {
            fetch_error: Some(message.into()),
            ..state.data.clone()
        }),
        ..StatePatch::none()
    }
}

/// Store the selected stream's schema.
pub fn set_stream_schema(state: &LogsState, schema: StreamSchema) -> StatePatch {
    StatePatch {
        data: Some(DataState {
            schema: Some(schema),
            ..state.data.clone()
        }),
        ..StatePatch::none()
    }
}

/// Open (or close, with `None`) the detail panel for a record.
pub fn set_selected_log(_state: &LogsState, record: Option<LogRecord>) -> StatePatch {
    StatePatch {
        selected_log: Some(record),
        ..StatePatch::none()
    }
}

// ===== Sort / filter =====

/// Apply a new sort and re-derive from the canonical dataset, back to page 1.
pub fn set_and_sort_data(state: &LogsState, sort_key: &str, sort_order: SortOrder) -> StatePatch {
    let table = TableOpts {
        sort_key: sort_key.to_string(),
        sort_order,
        ..state.table_opts.clone()
    };
    let (table, data) = rederive_first_page(state, table);

    StatePatch {
        quick_filters: Some(QuickFilters {
            sort: SortSpec {
                key: sort_key.to_string(),
                order: sort_order,
            },
            ..state.quick_filters.clone()
        }),
        table_opts: Some(table),
        data: Some(data),
        ..StatePatch::none()
    }
}

/// Set (or with `remove`, drop) one column filter and re-derive, back to page 1.
///
/// An empty `values` list removes the column as well.
pub fn set_and_filter_data(
    state: &LogsState,
    column: &str,
    values: &[String],
    remove: bool,
) -> StatePatch {
    let mut filters = state.table_opts.filters.clone();
    if remove {
        filters.remove(column);
    } else {
        filters.set(column, values.iter().cloned());
    }
    with_filters(state, filters)
}

/// Replace all column filters and re-derive, back to page 1.
pub(crate) fn with_filters(state: &LogsState, filters: ColumnFilters) -> StatePatch {
    let table = TableOpts {
        filters: filters.clone(),
        ..state.table_opts.clone()
    };
    let (table, data) = rederive_first_page(state, table);

    debug!(
        columns = filters.len(),
        derived = data.filtered.len(),
        "Column filters applied"
    );

    StatePatch {
        quick_filters: Some(QuickFilters {
            filters,
            ..state.quick_filters.clone()
        }),
        table_opts: Some(table),
        data: Some(data),
        ..StatePatch::none()
    }
}

// ===== Pagination =====

/// Move to a 1-indexed page of the derived dataset.
///
/// With nothing derived the table stays on page 0. Otherwise pages outside
/// `1..=total_pages` are rejected with an inline message and leave the
/// current page untouched.
pub fn set_page_and_page_data(state: &LogsState, page: usize) -> StatePatch {
    let table = &state.table_opts;
    let filtered = &state.data.filtered;
    if filtered.is_empty() {
        return StatePatch {
            table_opts: Some(TableOpts {
                page_data: Vec::new(),
                current_page: 0,
                total_pages: 0,
                page_error: None,
                ..table.clone()
            }),
            ..StatePatch::none()
        };
    }

    let last = total_pages(filtered.len(), table.per_page);
    if page == 0 || page > last {
        return StatePatch {
            table_opts: Some(TableOpts {
                page_error: Some(format!("Page {page} is out of range (1-{last})")),
                ..table.clone()
            }),
            ..StatePatch::none()
        };
    }

    StatePatch {
        table_opts: Some(TableOpts {
            page_data: get_page_slice(page, table.per_page, filtered),
            current_page: page,
            total_pages: last,
            page_error: None,
            ..table.clone()
        }),
        ..StatePatch::none()
    }
}

/// Change the page size and return to the first page.
pub fn set_per_page(state: &LogsState, per_page: usize) -> StatePatch {
    let table = &state.table_opts;
    if per_page == 0 {
        return StatePatch {
            table_opts: Some(TableOpts {
                page_error: Some("Rows per page must be greater than zero".to_string()),
                ..table.clone()
            }),
            ..StatePatch::none()
        };
    }

    let filtered = &state.data.filtered;
    let current_page = if filtered.is_empty() { 0 } else { 1 };
    StatePatch {
        table_opts: Some(TableOpts {
            page_data: get_page_slice(current_page, per_page, filtered),
            total_pages: total_pages(filtered.len(), per_page),
            current_page,
            per_page,
            page_error: None,
            ..table.clone()
        }),
        ..StatePatch::none()
    }
}

/// Set the server-side fetch offset.
pub fn set_current_offset(state: &LogsState, current_offset: usize) -> StatePatch {
    StatePatch {
        table_opts: Some(TableOpts {
            current_offset,
            ..state.table_opts.clone()
        }),
        ..StatePatch::none()
    }
}

/// Set the backend-reported total row count.
pub fn set_total_count(state: &LogsState, total_count: usize) -> StatePatch {
    StatePatch {
        table_opts: Some(TableOpts {
            total_count,
            ..state.table_opts.clone()
        }),
        ..StatePatch::none()
    }
}

// ===== Columns =====

/// Hide or re-show a column.
pub fn toggle_disabled_columns(state: &LogsState, column: &str) -> StatePatch {
    let mut disabled_columns = state.table_opts.disabled_columns.clone();
    if !disabled_columns.shift_remove(column) {
        disabled_columns.insert(column.to_string());
    }
    StatePatch {
        table_opts: Some(TableOpts {
            disabled_columns,
            ..state.table_opts.clone()
        }),
        ..StatePatch::none()
    }
}

/// Pin or unpin a column; pins keep the order they were added in.
pub fn toggle_pinned_columns(state: &LogsState, column: &str) -> StatePatch {
    let mut pinned_columns = state.table_opts.pinned_columns.clone();
    if !pinned_columns.shift_remove(column) {
        pinned_columns.insert(column.to_string());
    }
    StatePatch {
        table_opts: Some(TableOpts {
            pinned_columns,
            ..state.table_opts.clone()
        }),
        ..StatePatch::none()
    }
}

// ===== Refetch =====

/// Clear results ahead of a new fetch.
///
/// Drops pages, counts, headers and both datasets (the schema stays). A fixed
/// window is re-anchored at `now` so the refetch covers the latest interval.
pub fn clean_store_for_refetch(state: &LogsState, now: DateTime<Utc>) -> StatePatch {
    let range = &state.time_range;
    let time_range = match range.interval_ms {
        Some(interval) if range.is_fixed() => Some(match find_fixed_duration(&range.label) {
            Some(preset) => TimeRange::rolling(preset, now),
            None => {
                let end_time = floor_to_minute(now);
                TimeRange {
                    start_time: end_time - Duration::milliseconds(interval),
                    end_time,
                    ..range.clone()
                }
            }
        }),
        _ => None,
    };

    StatePatch {
        time_range,
        table_opts: Some(TableOpts {
            page_data: Vec::new(),
            total_count: 0,
            displayed_count: 0,
            current_page: 0,
            current_offset: 0,
            headers: Vec::new(),
            total_pages: 0,
            page_error: None,
            ..state.table_opts.clone()
        }),
        data: Some(DataState {
            raw: Vec::new(),
            filtered: Vec::new(),
            fetch_error: None,
            ..state.data.clone()
        }),
        ..StatePatch::none()
    }
}

#[cfg(test)]
#[path = "table_handler_tests.rs"]
mod tests;
