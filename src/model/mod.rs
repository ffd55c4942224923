//! Domain model types (pure).
//!
//! All types in this module are plain data with smart constructors.

pub mod error;
pub mod record;
pub mod saved_filter;
pub mod schema;
pub mod time_range;

// Re-export for convenience
pub use error::{QueryError, SavedFilterError, SchemaError};
pub use record::{compare_values, FieldValue, LogRecord, DEFAULT_SORT_KEY};
pub use saved_filter::{SavedFilter, SavedFilterQuery, TimeFilter};
pub use schema::{headers_from_records, headers_from_schema, Field, StreamSchema};
pub use time_range::{
    find_fixed_duration, floor_to_minute, make_time_range_label, FixedDuration, TimeRange,
    TimeRangeKind, TimeRangeUpdate, DEFAULT_FIXED_DURATION, FIXED_DURATIONS, MINUTE_MS,
};
