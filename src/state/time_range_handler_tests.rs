//! Tests for time-range transitions.

use super::*;
use crate::model::{floor_to_minute, FIXED_DURATIONS};
use crate::state::set_page_and_page_data;
use crate::test_harness::{empty_state, fixed_now, loaded_state, records};
use chrono::TimeZone;

fn at(h: u32, m: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, h, m, 0).unwrap()
}

// ===== set_time_range =====

#[test]
fn preset_label_sets_interval_and_start() {
    let state = empty_state();
    let past_hour = FIXED_DURATIONS[1];

    let next = state.patched(set_time_range(
        &state,
        TimeRangeUpdate {
            label: Some(past_hour.name.to_string()),
            ..TimeRangeUpdate::default()
        },
    ));

    let range = &next.time_range;
    assert_eq!(range.kind, TimeRangeKind::Fixed);
    assert_eq!(range.interval_ms, Some(past_hour.milliseconds));
    assert_eq!(range.span_ms(), past_hour.milliseconds);
    assert_eq!(range.end_time, floor_to_minute(fixed_now()));
}

#[test]
fn kind_is_untouched_unless_given() {
    let mut state = empty_state();
    state.time_range = TimeRange::custom(at(1, 0), at(2, 0));

    let next = state.patched(set_time_range(
        &state,
        TimeRangeUpdate {
            end_time: Some(at(3, 0)),
            ..TimeRangeUpdate::default()
        },
    ));

    assert_eq!(next.time_range.kind, TimeRangeKind::Custom);
    assert_eq!(next.time_range.start_time, at(1, 0));
    assert_eq!(next.time_range.interval_ms, Some(2 * 60 * MINUTE_MS));
}

#[test]
fn custom_range_without_label_gets_generated_label() {
    let state = empty_state();

    let next = state.patched(set_time_range(
        &state,
        TimeRangeUpdate {
            start_time: Some(at(0, 1)),
            end_time: Some(at(0, 2)),
            kind: Some(TimeRangeKind::Custom),
            label: None,
        },
    ));

    assert_eq!(next.time_range.label, "Jan 1, 00:01 - Jan 1, 00:02");
    assert_eq!(next.time_range.interval_ms, Some(MINUTE_MS));
}

#[test]
fn time_range_change_returns_to_first_page() {
    let state = loaded_state(records(70));
    let state = state.patched(set_page_and_page_data(&state, 3));

    let next = state.patched(set_time_range(
        &state,
        TimeRangeUpdate {
            label: Some(FIXED_DURATIONS[2].name.to_string()),
            ..TimeRangeUpdate::default()
        },
    ));

    assert_eq!(next.table_opts.current_page, 1);
    assert_eq!(next.table_opts.page_data.len(), 30);
}

#[test]
fn switching_custom_to_fixed_adopts_preset_of_same_width() {
    let mut state = empty_state();
    state.time_range = TimeRange::custom(at(11, 0), at(12, 0));

    let next = state.patched(set_time_range(
        &state,
        TimeRangeUpdate {
            kind: Some(TimeRangeKind::Fixed),
            ..TimeRangeUpdate::default()
        },
    ));

    let range = &next.time_range;
    assert_eq!(range.kind, TimeRangeKind::Fixed);
    assert_eq!(range.label, FIXED_DURATIONS[1].name);
    assert_eq!(range.interval_ms, Some(FIXED_DURATIONS[1].milliseconds));
}

#[test]
fn fixed_range_never_takes_a_non_preset_interval() {
    let state = empty_state();
    let state = state.patched(select_time_bucket(&state, at(0, 1)));

    let patch = set_time_range(
        &state,
        TimeRangeUpdate {
            kind: Some(TimeRangeKind::Fixed),
            ..TimeRangeUpdate::default()
        },
    );
    let next = state.patched(patch.clone());

    assert!(patch.is_empty());
    assert_eq!(next.time_range, state.time_range);
    let interval = next.time_range.interval_ms;
    assert!(
        next.time_range.kind == TimeRangeKind::Custom
            || FIXED_DURATIONS.iter().any(|d| Some(d.milliseconds) == interval)
    );
}

// ===== reset_time_range =====

#[test]
fn reset_rolls_fixed_window_to_now_keeping_span() {
    let state = empty_state();
    let later = fixed_now() + Duration::minutes(42) + Duration::seconds(5);

    let next = state.patched(reset_time_range(&state, later));

    assert_eq!(next.time_range.end_time, later);
    assert_eq!(next.time_range.span_ms(), 10 * MINUTE_MS);
    assert_eq!(next.time_range.label, state.time_range.label);
}

#[test]
fn reset_returns_to_first_page() {
    let state = loaded_state(records(120));
    let state = state.patched(set_page_and_page_data(&state, 3));
    assert_eq!(state.table_opts.current_page, 3);

    let next = state.patched(reset_time_range(&state, fixed_now() + Duration::minutes(1)));

    assert_eq!(next.table_opts.current_page, 1);
    assert_eq!(next.table_opts.page_data, state.data.filtered[..30].to_vec());
    assert_eq!(next.table_opts.page_error, None);
}

#[test]
fn reset_is_a_noop_for_custom_ranges() {
    let mut state = empty_state();
    state.time_range = TimeRange::custom(at(1, 0), at(2, 0));

    let patch = reset_time_range(&state, fixed_now());

    assert!(patch.is_empty());
}

// ===== select_time_bucket =====

#[test]
fn selecting_a_bucket_pins_one_minute() {
    let state = empty_state();

    let next = state.patched(select_time_bucket(&state, at(0, 1)));

    let range = &next.time_range;
    assert_eq!(range.kind, TimeRangeKind::Custom);
    assert_eq!(range.start_time, at(0, 1));
    assert_eq!(range.end_time, at(0, 2));
    assert_eq!(range.interval_ms, Some(MINUTE_MS));
}

#[test]
fn selected_bucket_survives_reset() {
    let state = empty_state();
    let state = state.patched(select_time_bucket(&state, at(0, 1)));

    assert!(reset_time_range(&state, fixed_now()).is_empty());
}

// ===== refresh interval =====

#[test]
fn refresh_interval_can_be_set_and_cleared() {
    let state = empty_state();
    let state = state.patched(set_refresh_interval(&state, Some(10_000)));
    assert_eq!(state.refresh_interval, Some(10_000));

    let state = state.patched(set_refresh_interval(&state, None));
    assert_eq!(state.refresh_interval, None);
}
