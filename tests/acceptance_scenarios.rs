//! Acceptance scenarios for the explore view.
//!
//! Each test drives the public state engine the way a UI would and checks the
//! user-visible outcome.

use chrono::{DateTime, TimeZone, Utc};
use logdeck::model::{compare_values, LogRecord, MINUTE_MS};
use logdeck::pipeline::SortOrder;
use logdeck::state::{
    apply_custom_query, set_and_filter_data, set_and_sort_data, set_data,
    set_page_and_page_data, toggle_query_builder, LogsState, QueryMode, Store, StoreDefaults,
};
use logdeck::timeseries::{aggregate_event_rate, GraphRecord};
use std::cmp::Ordering;

// ===== Test Helpers =====

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap()
}

fn at(h: u32, m: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, h, m, 0).unwrap()
}

/// 120 records one second apart; the first 45 are ERROR, the rest INFO.
fn mixed_levels() -> Vec<LogRecord> {
    (0..120)
        .map(|i| {
            LogRecord::new()
                .with("timestamp", format!("2024-01-01T00:{:02}:{:02}", i / 60, i % 60))
                .with("level", if i < 45 { "ERROR" } else { "INFO" })
        })
        .collect()
}

fn loaded_store(records: Vec<LogRecord>) -> Store {
    let mut store = Store::new(StoreDefaults::default(), now());
    store.dispatch("set_data", |s| set_data(s, records));
    store
}

// ===== Filter + sort + paginate =====

#[test]
fn error_filter_sorted_newest_first_shows_two_pages() {
    // GIVEN 120 rows on page 2 of 4
    let mut store = loaded_store(mixed_levels());
    store.dispatch("set_page_and_page_data", |s| set_page_and_page_data(s, 2));
    assert_eq!(store.state().table_opts.total_pages, 4);

    // WHEN sorting by timestamp desc and filtering level = ERROR
    store.dispatch("set_and_sort_data", |s| {
        set_and_sort_data(s, "timestamp", SortOrder::Desc)
    });
    store.dispatch("set_and_filter_data", |s| {
        set_and_filter_data(s, "level", &["ERROR".to_string()], false)
    });

    // THEN 45 rows remain over two pages and we are back on page 1
    let table = &store.state().table_opts;
    assert_eq!(store.state().data.filtered.len(), 45);
    assert_eq!(table.total_pages, 2);
    assert_eq!(table.current_page, 1);
    assert_eq!(table.page_data.len(), 30);

    let first = table.page_data[0].get("timestamp");
    let last = table.page_data[29].get("timestamp");
    assert_ne!(compare_values(first, last), Ordering::Less);
    assert!(table
        .page_data
        .iter()
        .all(|r| r.coerced("level") == "ERROR"));

    // AND the second page holds the remaining 15
    store.dispatch("set_page_and_page_data", |s| set_page_and_page_data(s, 2));
    assert_eq!(store.state().table_opts.page_data.len(), 15);
}

#[test]
fn canonical_dataset_survives_filtering() {
    let mut store = loaded_store(mixed_levels());
    let canonical = store.state().data.raw.clone();

    store.dispatch("set_and_filter_data", |s| {
        set_and_filter_data(s, "level", &["INFO".to_string()], false)
    });
    store.dispatch("set_and_filter_data", |s| {
        set_and_filter_data(s, "level", &[], true)
    });

    assert_eq!(store.state().data.raw, canonical);
    assert_eq!(store.state().data.filtered.len(), 120);
}

// ===== Event-rate graph =====

#[test]
fn single_source_bucket_fills_three_minute_window() {
    let source = vec![GraphRecord {
        minute_range: at(0, 1),
        log_count: 10,
    }];

    let series = aggregate_event_rate(&source, at(0, 0), 3 * MINUTE_MS);

    let minutes: Vec<_> = series.buckets.iter().map(|b| b.minute).collect();
    let counts: Vec<_> = series.buckets.iter().map(|b| b.events).collect();
    assert_eq!(minutes, vec![at(0, 1), at(0, 2), at(0, 3)]);
    assert_eq!(counts, vec![10, 0, 0]);
    assert_eq!(series.average, 3);
    assert!((series.buckets[0].deviation_percent - 233.33).abs() < 0.01);
}

// ===== Custom query =====

#[test]
fn applying_sql_over_active_builder_clears_table() {
    // GIVEN an applied builder query with data loaded and the builder reopened
    let mut store = loaded_store(mixed_levels());
    store.dispatch("apply_custom_query", |s| {
        apply_custom_query(s, "level = 'ERROR'", QueryMode::Filters, now())
    });
    store.dispatch("set_data", |s| set_data(s, mixed_levels()));
    store.dispatch("toggle_query_builder", toggle_query_builder);
    assert!(store.state().custom_query.show_builder);

    // WHEN applying SQL
    store.dispatch("apply_custom_query", |s| {
        apply_custom_query(s, "SELECT * FROM app", QueryMode::Sql, now())
    });

    // THEN SQL mode is active with an empty table awaiting the refetch
    let state: &LogsState = store.state();
    assert!(!state.custom_query.show_builder);
    assert!(state.custom_query.is_active);
    assert_eq!(state.custom_query.active_mode, Some(QueryMode::Sql));
    assert_eq!(state.custom_query.raw_query, "SELECT * FROM app");
    assert!(state.table_opts.page_data.is_empty());
    assert_eq!(state.table_opts.total_pages, 0);
    assert_eq!(state.table_opts.total_count, 0);
    assert_eq!(state.table_opts.displayed_count, 0);
    assert!(state.data.raw.is_empty());
}
