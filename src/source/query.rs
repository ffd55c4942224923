//! Query strings handed to the [`QueryExecutor`](crate::source::QueryExecutor).

use crate::model::TimeRange;
use chrono::{DateTime, SecondsFormat, Utc};

/// Timestamp literal in the form the backend expects (`2024-01-01T00:00:00.000Z`).
pub fn quote_timestamp(t: DateTime<Utc>) -> String {
    t.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Default log fetch for `stream` over `range`, newest first.
pub fn logs_query(stream: &str, range: &TimeRange, limit: usize, offset: usize) -> String {
    format!(
        "SELECT * FROM {stream} WHERE p_timestamp >= '{}' AND p_timestamp < '{}' \
         ORDER BY p_timestamp DESC LIMIT {limit} OFFSET {offset}",
        quote_timestamp(range.start_time),
        quote_timestamp(range.end_time),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn logs_query_bounds_window_and_page() {
        let range = TimeRange::custom(
            Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2024, 1, 1, 0, 10, 0).unwrap(),
        );

        let sql = logs_query("app", &range, 1000, 2000);

        assert_eq!(
            sql,
            "SELECT * FROM app WHERE p_timestamp >= '2024-01-01T00:00:00.000Z' \
             AND p_timestamp < '2024-01-01T00:10:00.000Z' \
             ORDER BY p_timestamp DESC LIMIT 1000 OFFSET 2000"
        );
    }
}
