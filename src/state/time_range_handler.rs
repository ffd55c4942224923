//! Time-range transitions.
//!
//! A fixed range is a rolling window tied to one of the
//! [`FIXED_DURATIONS`](crate::model::FIXED_DURATIONS) presets; a custom range
//! is pinned and never moves on its own.

use crate::model::{
    find_fixed_duration, make_time_range_label, FixedDuration, TimeRange, TimeRangeKind,
    TimeRangeUpdate, FIXED_DURATIONS, MINUTE_MS,
};
use crate::state::table_handler::rederive_first_page;
use crate::state::{LogsState, StatePatch};
use chrono::{DateTime, Duration, Utc};
use tracing::{debug, warn};

/// Merge `update` into the current range.
///
/// A preset label sets `interval_ms` to the preset width and, for a fixed
/// range, re-derives the start from the end. Any other label leaves the
/// interval equal to the span. `kind` only changes when the update names one.
/// The pipeline is re-run and the table goes back to page 1.
///
/// A fixed range always carries a preset: without a preset label the preset
/// whose width equals the span is used, and if there is none the update is
/// dropped and the range stays as it was.
pub fn set_time_range(state: &LogsState, update: TimeRangeUpdate) -> StatePatch {
    let current = &state.time_range;
    let kind = update.kind.unwrap_or(current.kind);
    let end_time = update.end_time.unwrap_or(current.end_time);
    let mut start_time = update.start_time.unwrap_or(current.start_time);

    let label = match update.label {
        Some(label) => label,
        None if kind == TimeRangeKind::Custom => make_time_range_label(start_time, end_time),
        None => current.label.clone(),
    };

    let preset = match find_fixed_duration(&label) {
        None if kind == TimeRangeKind::Fixed => {
            let span_ms = (end_time - start_time).num_milliseconds();
            match preset_for_span(span_ms) {
                Some(preset) => Some(preset),
                None => {
                    warn!(%label, span_ms, "Fixed range without a matching preset ignored");
                    return StatePatch::none();
                }
            }
        }
        found => found,
    };
    let label = preset.map_or(label, |p| p.name.to_string());

    let interval_ms = match preset {
        Some(preset) => {
            if kind == TimeRangeKind::Fixed {
                start_time = end_time - Duration::milliseconds(preset.milliseconds);
            }
            preset.milliseconds
        }
        None => (end_time - start_time).num_milliseconds(),
    };

    debug!(?kind, %label, interval_ms, "Time range set");

    let (table, data) = rederive_first_page(state, state.table_opts.clone());
    StatePatch {
        time_range: Some(TimeRange {
            start_time,
            end_time,
            kind,
            label,
            interval_ms: Some(interval_ms),
        }),
        table_opts: Some(table),
        data: Some(data),
        ..StatePatch::none()
    }
}

fn preset_for_span(span_ms: i64) -> Option<FixedDuration> {
    FIXED_DURATIONS
        .iter()
        .copied()
        .find(|d| d.milliseconds == span_ms)
}

/// Resume the rolling window: keep the current span but end it at `now`,
/// back on page 1.
///
/// Custom ranges are never rolled, so this is a no-op for them.
pub fn reset_time_range(state: &LogsState, now: DateTime<Utc>) -> StatePatch {
    let current = &state.time_range;
    if current.kind == TimeRangeKind::Custom {
        return StatePatch::none();
    }

    let span = Duration::milliseconds(current.span_ms());
    let (table, data) = rederive_first_page(state, state.table_opts.clone());
    StatePatch {
        time_range: Some(TimeRange {
            start_time: now - span,
            end_time: now,
            ..current.clone()
        }),
        table_opts: Some(table),
        data: Some(data),
        ..StatePatch::none()
    }
}

/// Pin the range to one event-rate bucket: `[bucket_start, bucket_start + 60s)`.
pub fn select_time_bucket(state: &LogsState, bucket_start: DateTime<Utc>) -> StatePatch {
    set_time_range(
        state,
        TimeRangeUpdate {
            start_time: Some(bucket_start),
            end_time: Some(bucket_start + Duration::milliseconds(MINUTE_MS)),
            kind: Some(TimeRangeKind::Custom),
            label: None,
        },
    )
}

/// Set (or clear) the externally driven auto-refresh period.
pub fn set_refresh_interval(_state: &LogsState, interval_ms: Option<u64>) -> StatePatch {
    StatePatch {
        refresh_interval: Some(interval_ms),
        ..StatePatch::none()
    }
}

#[cfg(test)]
#[path = "time_range_handler_tests.rs"]
mod tests;
