//! Property-based tests for pipeline and state invariants.
//!
//! Tests validate:
//! 1. Filter + sort is idempotent
//! 2. Pages partition the derived dataset
//! 3. Adding filter columns never grows the derived dataset
//! 4. Event-rate series always has one bucket per minute of the window
//! 5. A stream change restores the default state from anywhere

use chrono::{DateTime, Duration, TimeZone, Utc};
use logdeck::model::{LogRecord, MINUTE_MS};
use logdeck::pipeline::{
    filter_and_sort, get_page_slice, total_pages, ColumnFilters, PipelineCriteria, SortOrder,
};
use logdeck::state::{
    add_filter_item, apply_custom_query, set_and_sort_data, set_data, set_page_and_page_data,
    set_per_page, stream_change_cleanup, toggle_pinned_columns, LogsState, QueryMode,
    StoreDefaults,
};
use logdeck::timeseries::{aggregate_event_rate, GraphRecord};
use proptest::prelude::*;

// ===== Strategies =====

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap()
}

fn arb_record() -> impl Strategy<Value = LogRecord> {
    (
        prop_oneof![Just("INFO"), Just("WARN"), Just("ERROR")],
        0u8..4,
        prop::option::of(0i64..50),
    )
        .prop_map(|(level, host, latency)| {
            let record = LogRecord::new()
                .with("level", level)
                .with("host", format!("h{host}"));
            match latency {
                Some(ms) => record.with("latency", ms),
                None => record,
            }
        })
}

fn arb_records() -> impl Strategy<Value = Vec<LogRecord>> {
    prop::collection::vec(arb_record(), 0..120)
}

fn arb_order() -> impl Strategy<Value = SortOrder> {
    prop_oneof![Just(SortOrder::Asc), Just(SortOrder::Desc)]
}

fn arb_sort_key() -> impl Strategy<Value = &'static str> {
    prop_oneof![Just("level"), Just("host"), Just("latency"), Just("missing")]
}

// ===== Property 1: Idempotence =====

proptest! {
    #[test]
    fn filter_and_sort_is_idempotent(
        records in arb_records(),
        key in arb_sort_key(),
        order in arb_order(),
        levels in prop::sample::subsequence(vec!["INFO", "WARN", "ERROR"], 0..=3),
    ) {
        let filters = if levels.is_empty() {
            ColumnFilters::new()
        } else {
            ColumnFilters::new().with("level", levels)
        };
        let criteria = PipelineCriteria { sort_key: key, sort_order: order, filters: &filters };

        let once = filter_and_sort(&criteria, &records);
        let twice = filter_and_sort(&criteria, &once);

        prop_assert_eq!(once, twice);
    }
}

// ===== Property 2: Pagination consistency =====

proptest! {
    #[test]
    fn pages_partition_the_derived_dataset(
        records in arb_records(),
        per_page in 1usize..40,
    ) {
        let pages = total_pages(records.len(), per_page);

        let concatenated: Vec<LogRecord> = (1..=pages)
            .flat_map(|page| get_page_slice(page, per_page, &records))
            .collect();

        prop_assert_eq!(&concatenated, &records);
        prop_assert!(get_page_slice(pages + 1, per_page, &records).is_empty());
    }

    #[test]
    fn page_data_matches_current_slice_after_any_page_move(
        records in arb_records(),
        per_page in 1usize..40,
        page in 0usize..10,
    ) {
        let state = LogsState::initial(&StoreDefaults::default(), now());
        let state = state.patched(set_data(&state, records));
        let state = state.patched(set_per_page(&state, per_page));
        let state = state.patched(set_page_and_page_data(&state, page));

        let table = &state.table_opts;
        prop_assert_eq!(table.total_pages, total_pages(state.data.filtered.len(), per_page));
        prop_assert_eq!(
            &table.page_data,
            &get_page_slice(table.current_page, per_page, &state.data.filtered)
        );
        prop_assert!(table.page_data.len() <= per_page);
    }
}

// ===== Property 3: Filter monotonicity =====

proptest! {
    #[test]
    fn adding_a_filter_column_never_grows_the_result(
        records in arb_records(),
        level in prop_oneof![Just("INFO"), Just("WARN"), Just("ERROR")],
        host in 0u8..4,
    ) {
        let state = LogsState::initial(&StoreDefaults::default(), now());
        let state = state.patched(set_data(&state, records));

        let one = state.patched(add_filter_item(&state, "level", &[level.to_string()]));
        let two = one.patched(add_filter_item(&one, "host", &[format!("h{host}")]));

        prop_assert!(one.data.filtered.len() <= state.data.filtered.len());
        prop_assert!(two.data.filtered.len() <= one.data.filtered.len());
        prop_assert!(two.data.filtered.iter().all(|r| r.coerced("level") == level));
    }
}

// ===== Property 4: Gap-filling completeness =====

proptest! {
    #[test]
    fn event_rate_has_one_bucket_per_minute(
        minutes in 0i64..240,
        rows in prop::collection::vec((0i64..300, 0u64..1000), 0..50),
    ) {
        let start = now();
        let source: Vec<GraphRecord> = rows
            .into_iter()
            .map(|(offset, log_count)| GraphRecord {
                minute_range: start + Duration::minutes(offset),
                log_count,
            })
            .collect();

        let series = aggregate_event_rate(&source, start, minutes * MINUTE_MS);

        prop_assert_eq!(series.buckets.len() as i64, minutes);
        for (i, bucket) in series.buckets.iter().enumerate() {
            prop_assert_eq!(bucket.minute, start + Duration::minutes(i as i64 + 1));
        }
    }
}

// ===== Property 5: Reset discipline =====

proptest! {
    #[test]
    fn stream_change_restores_defaults(
        records in arb_records(),
        key in arb_sort_key(),
        order in arb_order(),
        per_page in 1usize..40,
        custom in any::<bool>(),
    ) {
        let defaults = StoreDefaults::default();
        let state = LogsState::initial(&defaults, now());
        let mut state = state.patched(set_data(&state, records));
        state = state.patched(set_and_sort_data(&state, key, order));
        state = state.patched(set_per_page(&state, per_page));
        state = state.patched(toggle_pinned_columns(&state, "host"));
        if custom {
            state = state.patched(apply_custom_query(&state, "SELECT 1", QueryMode::Sql, now()));
        }

        let reset = state.patched(stream_change_cleanup(&state, &defaults, now()));

        prop_assert_eq!(reset, LogsState::initial(&defaults, now()));
    }
}
