//! Event-rate aggregation for the overview graph.
//!
//! The backend counts events per minute but omits minutes with no events.
//! [`aggregate_event_rate`] fills those gaps so the graph always has one
//! bucket per minute of the window, then scores each bucket against the
//! window average.

use crate::model::{FieldValue, LogRecord, QueryError, TimeRange, MINUTE_MS};
use crate::source::quote_timestamp;
use chrono::{DateTime, Duration, NaiveDateTime, Utc};
use std::collections::HashMap;
use std::fmt;

// ===== Source rows =====

/// One `{minute_range, log_count}` row of the count query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GraphRecord {
    /// Bucket start.
    pub minute_range: DateTime<Utc>,
    /// Events in the bucket.
    pub log_count: u64,
}

impl GraphRecord {
    /// Read a row of the count query. `None` if either column is missing or
    /// unreadable.
    pub fn from_record(record: &LogRecord) -> Option<Self> {
        let minute_range = match record.get("minute_range")? {
            FieldValue::Text(s) => parse_bucket_timestamp(s)?,
            _ => return None,
        };
        let log_count = match record.get("log_count")? {
            FieldValue::Number(n) if n.is_finite() && *n >= 0.0 => *n as u64,
            FieldValue::Text(s) => s.trim().parse().ok()?,
            _ => return None,
        };
        Some(Self {
            minute_range,
            log_count,
        })
    }
}

/// Parse every row of a count-query result.
///
/// # Errors
///
/// Returns [`QueryError::MalformedResponse`] naming the first unreadable row.
pub fn parse_graph_records(records: &[LogRecord]) -> Result<Vec<GraphRecord>, QueryError> {
    records
        .iter()
        .enumerate()
        .map(|(i, r)| {
            GraphRecord::from_record(r).ok_or_else(|| {
                QueryError::MalformedResponse(format!("row {i} is not a minute_range/log_count pair"))
            })
        })
        .collect()
}

/// Parse a bucket timestamp. `DATE_TRUNC` drops the offset, so naive
/// timestamps are read as UTC.
pub fn parse_bucket_timestamp(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if let Ok(t) = DateTime::parse_from_rfc3339(s) {
        return Some(t.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .map(|naive| naive.and_utc())
}

/// Per-minute count query for `stream` over `[start, end]`.
pub fn count_query(stream: &str, start: DateTime<Utc>, end: DateTime<Utc>) -> String {
    format!(
        "SELECT DATE_TRUNC('minute', p_timestamp) AS minute_range, COUNT(*) AS log_count \
         FROM {stream} WHERE p_timestamp BETWEEN '{}' AND '{}' \
         GROUP BY minute_range ORDER BY minute_range",
        quote_timestamp(start),
        quote_timestamp(end),
    )
}

// ===== Series =====

/// One gap-filled minute of the graph.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EventBucket {
    /// Bucket start.
    pub minute: DateTime<Utc>,
    /// Events in the bucket (0 for gaps).
    pub events: u64,
    /// `(events - average) / average * 100`, two decimals; 0 when the average is 0.
    pub deviation_percent: f64,
}

impl EventBucket {
    /// The pinned range `[minute, minute + 60s)` selected by clicking this bucket.
    pub fn time_range(&self) -> TimeRange {
        TimeRange::custom(self.minute, self.minute + Duration::milliseconds(MINUTE_MS))
    }

    /// Whether the bucket is above the window average.
    pub fn is_above_average(&self) -> bool {
        self.deviation_percent > 0.0
    }
}

/// The gap-filled graph for one window.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct EventRateSeries {
    /// One bucket per minute, in time order.
    pub buckets: Vec<EventBucket>,
    /// Rounded mean events per bucket.
    pub average: u64,
}

impl EventRateSeries {
    /// Whether any bucket saw an event.
    pub fn has_events(&self) -> bool {
        self.buckets.iter().any(|b| b.events > 0)
    }

    /// Sum of all bucket counts.
    pub fn total_events(&self) -> u64 {
        self.buckets.iter().map(|b| b.events).sum()
    }
}

impl fmt::Display for EventRateSeries {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "avg {}", self.average)?;
        for bucket in &self.buckets {
            write!(
                f,
                "\n{} {} {:+.2}%",
                bucket.minute.format("%H:%M"),
                bucket.events,
                bucket.deviation_percent
            )?;
        }
        Ok(())
    }
}

/// Build the graph for `[start, start + interval_ms)`.
///
/// Emits `interval_ms / 60000` buckets whose starts are `start + (i + 1)`
/// minutes, matching source rows by exact timestamp and filling the rest with
/// zero. Rows outside the window are ignored.
pub fn aggregate_event_rate(
    records: &[GraphRecord],
    start: DateTime<Utc>,
    interval_ms: i64,
) -> EventRateSeries {
    let bucket_count = if interval_ms > 0 { interval_ms / MINUTE_MS } else { 0 };

    let mut counts: HashMap<DateTime<Utc>, u64> = HashMap::with_capacity(records.len());
    for record in records {
        counts.entry(record.minute_range).or_insert(record.log_count);
    }

    let filled: Vec<(DateTime<Utc>, u64)> = (0..bucket_count)
        .map(|i| {
            let minute = start + Duration::milliseconds((i + 1) * MINUTE_MS);
            (minute, counts.get(&minute).copied().unwrap_or(0))
        })
        .collect();

    let average = if filled.is_empty() {
        0
    } else {
        let total: u64 = filled.iter().map(|(_, c)| c).sum();
        (total as f64 / filled.len() as f64).round() as u64
    };

    let buckets = filled
        .into_iter()
        .map(|(minute, events)| EventBucket {
            minute,
            events,
            deviation_percent: deviation_percent(events, average),
        })
        .collect();

    EventRateSeries { buckets, average }
}

fn deviation_percent(events: u64, average: u64) -> f64 {
    if average == 0 {
        return 0.0;
    }
    let avg = average as f64;
    round_to((events as f64 - avg) / avg * 100.0, 2)
}

/// Round half away from zero to `decimals` places.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let scale = 10f64.powi(decimals);
    (value * scale).round() / scale
}

#[cfg(test)]
#[path = "timeseries_tests.rs"]
mod tests;
