//! Time range model and fixed-duration presets.

use chrono::{DateTime, Duration, Timelike, Utc};
use serde::{Deserialize, Serialize};

/// Milliseconds in one minute; also the width of an event-rate bucket.
pub const MINUTE_MS: i64 = 60_000;

// ===== FixedDuration =====

/// A named rolling-window preset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedDuration {
    /// Display label, also used as the lookup key.
    pub name: &'static str,
    /// Window width.
    pub milliseconds: i64,
}

/// Known presets, shortest first. The first entry is the default window.
pub const FIXED_DURATIONS: [FixedDuration; 6] = [
    FixedDuration {
        name: "Past 10 Minutes",
        milliseconds: 10 * MINUTE_MS,
    },
    FixedDuration {
        name: "Past 1 Hour",
        milliseconds: 60 * MINUTE_MS,
    },
    FixedDuration {
        name: "Past 5 Hours",
        milliseconds: 5 * 60 * MINUTE_MS,
    },
    FixedDuration {
        name: "Past 24 Hours",
        milliseconds: 24 * 60 * MINUTE_MS,
    },
    FixedDuration {
        name: "Past 3 Days",
        milliseconds: 3 * 24 * 60 * MINUTE_MS,
    },
    FixedDuration {
        name: "Past 7 Days",
        milliseconds: 7 * 24 * 60 * MINUTE_MS,
    },
];

/// Default preset for new stores.
pub const DEFAULT_FIXED_DURATION: FixedDuration = FIXED_DURATIONS[0];

/// Find a preset by its label.
pub fn find_fixed_duration(label: &str) -> Option<FixedDuration> {
    FIXED_DURATIONS.iter().copied().find(|d| d.name == label)
}

// ===== TimeRange =====

/// Whether a range rolls with the clock or is pinned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeRangeKind {
    /// Rolling window matching a preset.
    Fixed,
    /// User-pinned interval; never auto-rolled.
    Custom,
}

/// Query time window.
///
/// For `Fixed` ranges `interval_ms` equals the preset width and
/// `end_time - start_time == interval_ms`. For `Custom` ranges it is
/// informational (bucket-width decisions only).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRange {
    /// Inclusive start.
    pub start_time: DateTime<Utc>,
    /// End of the window.
    pub end_time: DateTime<Utc>,
    /// Rolling or pinned.
    pub kind: TimeRangeKind,
    /// Preset label or a formatted range label.
    pub label: String,
    /// Window width in milliseconds, when known.
    pub interval_ms: Option<i64>,
}

impl TimeRange {
    /// Rolling window for `duration`, ending at the start of the current minute.
    pub fn rolling(duration: FixedDuration, now: DateTime<Utc>) -> Self {
        let end_time = floor_to_minute(now);
        Self {
            start_time: end_time - Duration::milliseconds(duration.milliseconds),
            end_time,
            kind: TimeRangeKind::Fixed,
            label: duration.name.to_string(),
            interval_ms: Some(duration.milliseconds),
        }
    }

    /// Pinned window `[start, end)`.
    pub fn custom(start_time: DateTime<Utc>, end_time: DateTime<Utc>) -> Self {
        Self {
            start_time,
            end_time,
            kind: TimeRangeKind::Custom,
            label: make_time_range_label(start_time, end_time),
            interval_ms: Some((end_time - start_time).num_milliseconds()),
        }
    }

    /// `end_time - start_time` in milliseconds.
    pub fn span_ms(&self) -> i64 {
        (self.end_time - self.start_time).num_milliseconds()
    }

    /// Width used for bucketing: the recorded interval, else the span.
    pub fn bucket_window_ms(&self) -> i64 {
        self.interval_ms.unwrap_or_else(|| self.span_ms())
    }

    /// Whether this range rolls with the clock.
    pub fn is_fixed(&self) -> bool {
        self.kind == TimeRangeKind::Fixed
    }
}

/// Partial update applied by `set_time_range`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TimeRangeUpdate {
    /// New start, if any.
    pub start_time: Option<DateTime<Utc>>,
    /// New end, if any.
    pub end_time: Option<DateTime<Utc>>,
    /// New kind, if any. Left untouched otherwise.
    pub kind: Option<TimeRangeKind>,
    /// New label; a preset label also sets the interval.
    pub label: Option<String>,
}

/// Truncate to the start of the minute.
pub fn floor_to_minute(t: DateTime<Utc>) -> DateTime<Utc> {
    t.with_second(0)
        .and_then(|t| t.with_nanosecond(0))
        .unwrap_or(t)
}

/// Human label for a pinned range, e.g. `Jan 1, 00:01 - Jan 1, 00:02`.
pub fn make_time_range_label(start: DateTime<Utc>, end: DateTime<Utc>) -> String {
    const FORMAT: &str = "%b %-d, %H:%M";
    format!("{} - {}", start.format(FORMAT), end.format(FORMAT))
}
