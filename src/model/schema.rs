//! Stream schema and table header derivation.

use crate::model::LogRecord;
use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

/// One schema column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    /// Column name.
    pub name: String,
    /// Backend data type (e.g. `Utf8`, `Int64`, `timestamp`).
    #[serde(rename = "type")]
    pub data_type: String,
}

impl Field {
    /// Convenience constructor.
    pub fn new(name: impl Into<String>, data_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data_type: data_type.into(),
        }
    }
}

/// Ordered column list of a stream.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StreamSchema {
    /// Columns in schema order.
    pub fields: Vec<Field>,
}

impl StreamSchema {
    /// Wrap a field list.
    pub fn new(fields: Vec<Field>) -> Self {
        Self { fields }
    }

    /// Column names in schema order.
    pub fn field_names(&self) -> Vec<String> {
        self.fields.iter().map(|f| f.name.clone()).collect()
    }

    /// Data type of a column, if present.
    pub fn field_type(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|f| f.name == name)
            .map(|f| f.data_type.as_str())
    }
}

/// Default headers: the stream schema's column order.
pub fn headers_from_schema(schema: Option<&StreamSchema>) -> Vec<String> {
    schema.map(StreamSchema::field_names).unwrap_or_default()
}

/// Headers for a custom query result: every column seen, in first-seen order.
pub fn headers_from_records(records: &[LogRecord]) -> Vec<String> {
    let mut seen: IndexSet<&str> = IndexSet::new();
    for record in records {
        seen.extend(record.columns());
    }
    seen.into_iter().map(str::to_string).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_headers_follow_field_order() {
        let schema = StreamSchema::new(vec![
            Field::new("p_timestamp", "timestamp"),
            Field::new("level", "Utf8"),
        ]);
        assert_eq!(headers_from_schema(Some(&schema)), vec!["p_timestamp", "level"]);
        assert_eq!(schema.field_type("p_timestamp"), Some("timestamp"));
    }

    #[test]
    fn missing_schema_yields_no_headers() {
        assert!(headers_from_schema(None).is_empty());
    }

    #[test]
    fn record_headers_union_columns_in_first_seen_order() {
        let records = vec![
            LogRecord::new().with("count", 3_i64).with("host", "a"),
            LogRecord::new().with("host", "b").with("region", "eu"),
        ];
        assert_eq!(headers_from_records(&records), vec!["count", "host", "region"]);
    }
}
