//! Pipeline benchmarks.
//!
//! Filters are recomputed from the canonical dataset on every change, so the
//! cost of one filter + sort + page pass over a full fetch bounds how
//! responsive filter edits can be.
//!
//! Run with: cargo bench --bench pipeline_benchmark

#![allow(missing_docs)] // criterion macros generate undocumented items

use chrono::{Duration, TimeZone, Utc};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use logdeck::model::{LogRecord, MINUTE_MS};
use logdeck::pipeline::{filter_and_sort, ColumnFilters, PipelineCriteria, SortOrder};
use logdeck::state::{set_and_filter_data, set_data, LogsState, StoreDefaults};
use logdeck::timeseries::{aggregate_event_rate, GraphRecord};

const LEVELS: [&str; 4] = ["INFO", "WARN", "ERROR", "DEBUG"];

fn dataset(n: usize) -> Vec<LogRecord> {
    (0..n)
        .map(|i| {
            LogRecord::new()
                .with(
                    "p_timestamp",
                    format!(
                        "2024-01-01T{:02}:{:02}:{:02}",
                        (i / 3600) % 24,
                        (i / 60) % 60,
                        i % 60
                    ),
                )
                .with("level", LEVELS[i % LEVELS.len()])
                .with("host", format!("host-{}", i % 16))
                .with("latency_ms", (i % 500) as i64)
        })
        .collect()
}

fn bench_filter_and_sort(c: &mut Criterion) {
    let mut group = c.benchmark_group("filter_and_sort");
    let filters = ColumnFilters::new()
        .with("level", ["ERROR", "WARN"])
        .with("host", ["host-1", "host-2", "host-3"]);

    for size in [1_000usize, 10_000, 50_000] {
        let records = dataset(size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &records, |b, records| {
            let criteria = PipelineCriteria {
                sort_key: "p_timestamp",
                sort_order: SortOrder::Desc,
                filters: &filters,
            };
            b.iter(|| filter_and_sort(black_box(&criteria), black_box(records)));
        });
    }
    group.finish();
}

fn bench_filter_transition(c: &mut Criterion) {
    let now = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
    let state = LogsState::initial(&StoreDefaults::default(), now);
    let state = state.patched(set_data(&state, dataset(10_000)));
    let values = vec!["ERROR".to_string()];

    c.bench_function("set_and_filter_data_10k", |b| {
        b.iter(|| set_and_filter_data(black_box(&state), "level", black_box(&values), false));
    });
}

fn bench_event_rate(c: &mut Criterion) {
    let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    // Seven days of minutes with every other minute missing.
    let minutes = 7 * 24 * 60;
    let source: Vec<GraphRecord> = (1..=minutes)
        .step_by(2)
        .map(|m| GraphRecord {
            minute_range: start + Duration::minutes(m),
            log_count: (m % 97) as u64,
        })
        .collect();

    c.bench_function("aggregate_event_rate_7d", |b| {
        b.iter(|| aggregate_event_rate(black_box(&source), start, minutes * MINUTE_MS));
    });
}

criterion_group!(
    benches,
    bench_filter_and_sort,
    bench_filter_transition,
    bench_event_rate
);
criterion_main!(benches);
