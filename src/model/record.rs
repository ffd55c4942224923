//! Log records as returned by the query executor.
//!
//! A record is an open, ordered mapping of column name to scalar value.
//! Records carry no identity of their own; they are compared field by field.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Column used as the default sort key for freshly created stores.
pub const DEFAULT_SORT_KEY: &str = "p_timestamp";

// ===== FieldValue =====

/// A single scalar cell of a log record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// Explicit null.
    Null,
    /// Boolean cell.
    Bool(bool),
    /// Numeric cell (integers are stored losslessly up to 2^53).
    Number(f64),
    /// Text cell.
    Text(String),
}

impl FieldValue {
    /// Coerce the value to the string used for filter membership and
    /// candidate lists.
    ///
    /// Null becomes the empty string, integral numbers print without a
    /// fraction, booleans print as `true`/`false`.
    pub fn to_filter_string(&self) -> String {
        match self {
            FieldValue::Null => String::new(),
            FieldValue::Bool(b) => b.to_string(),
            FieldValue::Number(n) => format_number(*n),
            FieldValue::Text(s) => s.clone(),
        }
    }

    /// Whether this value is the explicit null.
    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }

    fn type_rank(&self) -> u8 {
        match self {
            FieldValue::Bool(_) => 0,
            FieldValue::Number(_) => 1,
            FieldValue::Text(_) => 2,
            FieldValue::Null => 3,
        }
    }
}

fn format_number(n: f64) -> String {
    // Beyond 2^53 the integer cast is no longer exact.
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 9_007_199_254_740_992.0 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

/// Ascending comparison of two (possibly missing) cells.
///
/// Values of the same type compare naturally. Across types the order is
/// `Bool < Number < Text`, and null or missing cells sort after everything
/// else, so they land last in ascending order and first in descending order.
pub fn compare_values(a: Option<&FieldValue>, b: Option<&FieldValue>) -> Ordering {
    let a = a.unwrap_or(&FieldValue::Null);
    let b = b.unwrap_or(&FieldValue::Null);
    match (a, b) {
        (FieldValue::Bool(x), FieldValue::Bool(y)) => x.cmp(y),
        (FieldValue::Number(x), FieldValue::Number(y)) => {
            x.partial_cmp(y).unwrap_or(Ordering::Equal)
        }
        (FieldValue::Text(x), FieldValue::Text(y)) => x.cmp(y),
        _ => a.type_rank().cmp(&b.type_rank()),
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Number(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Number(value as f64)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Bool(value)
    }
}

impl From<serde_json::Value> for FieldValue {
    fn from(value: serde_json::Value) -> Self {
        use serde_json::Value;
        match value {
            Value::Null => FieldValue::Null,
            Value::Bool(b) => FieldValue::Bool(b),
            Value::Number(n) => n.as_f64().map_or(FieldValue::Null, FieldValue::Number),
            Value::String(s) => FieldValue::Text(s),
            // Nested values are not filterable; keep their JSON text.
            other @ (Value::Array(_) | Value::Object(_)) => FieldValue::Text(other.to_string()),
        }
    }
}

// ===== LogRecord =====

/// One row of a query result.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LogRecord {
    fields: IndexMap<String, FieldValue>,
}

impl LogRecord {
    /// Create an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, column: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.fields.insert(column.into(), value.into());
        self
    }

    /// Insert or replace a cell.
    pub fn insert(&mut self, column: impl Into<String>, value: impl Into<FieldValue>) {
        self.fields.insert(column.into(), value.into());
    }

    /// Look up a cell by column name.
    pub fn get(&self, column: &str) -> Option<&FieldValue> {
        self.fields.get(column)
    }

    /// String-coerced cell value; missing columns coerce to the empty string.
    pub fn coerced(&self, column: &str) -> String {
        self.get(column)
            .map(FieldValue::to_filter_string)
            .unwrap_or_default()
    }

    /// Column names in insertion order.
    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    /// Number of cells.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the record has no cells.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Build a record from a JSON object. Returns `None` for non-objects.
    pub fn from_json(value: serde_json::Value) -> Option<Self> {
        match value {
            serde_json::Value::Object(map) => Some(
                map.into_iter()
                    .map(|(k, v)| (k, FieldValue::from(v)))
                    .collect(),
            ),
            _ => None,
        }
    }
}

impl<K: Into<String>, V: Into<FieldValue>> FromIterator<(K, V)> for LogRecord {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}
