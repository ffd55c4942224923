//! Filter-pill transitions.
//!
//! Quick filters and the table pipeline share one filter map; every change
//! here goes through the same re-derivation as a column-filter apply.

use crate::pipeline::ColumnFilters;
use crate::state::table_handler::{rederive_first_page, with_filters};
use crate::state::{LogsState, QuickFilters, SortSpec, StatePatch, StoreDefaults, TableOpts};

/// Add (or replace) the accepted values for `column`.
pub fn add_filter_item(state: &LogsState, column: &str, values: &[String]) -> StatePatch {
    let mut filters = state.table_opts.filters.clone();
    filters.set(column, values.iter().cloned());
    with_filters(state, filters)
}

/// Drop the filter on `column`.
pub fn delete_filter_item(state: &LogsState, column: &str) -> StatePatch {
    let mut filters = state.table_opts.filters.clone();
    if !filters.remove(column) {
        return StatePatch::none();
    }
    with_filters(state, filters)
}

/// Clear every filter pill and restore the default sort.
pub fn reset_quick_filters(state: &LogsState, defaults: &StoreDefaults) -> StatePatch {
    let table = TableOpts {
        filters: ColumnFilters::new(),
        sort_key: defaults.sort_key.clone(),
        sort_order: defaults.sort_order,
        ..state.table_opts.clone()
    };
    let (table, data) = rederive_first_page(state, table);

    StatePatch {
        quick_filters: Some(QuickFilters {
            search: String::new(),
            filters: ColumnFilters::new(),
            sort: SortSpec {
                key: defaults.sort_key.clone(),
                order: defaults.sort_order,
            },
        }),
        table_opts: Some(table),
        data: Some(data),
        ..StatePatch::none()
    }
}

/// Update the free-text search box. Does not touch the pipeline.
pub fn set_quick_search(state: &LogsState, search: impl Into<String>) -> StatePatch {
    StatePatch {
        quick_filters: Some(QuickFilters {
            search: search.into(),
            ..state.quick_filters.clone()
        }),
        ..StatePatch::none()
    }
}
