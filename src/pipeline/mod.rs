//! Filter, sort and pagination over record sets (pure).
//!
//! Every function here takes the canonical dataset and returns a fresh result.
//! Nothing is composed incrementally from a previous derivation.

use crate::model::{compare_values, LogRecord};
use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};
use std::fmt;

// ===== SortOrder =====

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// Smallest first.
    Asc,
    /// Largest first.
    #[default]
    Desc,
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortOrder::Asc => f.write_str("asc"),
            SortOrder::Desc => f.write_str("desc"),
        }
    }
}

// ===== ColumnFilters =====

/// Per-column accepted values.
///
/// A column with no accepted values is never stored: setting an empty set
/// removes the column, so "present" always means "actively filtering".
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ColumnFilters(IndexMap<String, IndexSet<String>>);

impl ColumnFilters {
    /// No filters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the accepted values of `column`. An empty set removes the column.
    pub fn set<I, S>(&mut self, column: impl Into<String>, values: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let column = column.into();
        let values: IndexSet<String> = values.into_iter().map(Into::into).collect();
        if values.is_empty() {
            self.0.shift_remove(&column);
        } else {
            self.0.insert(column, values);
        }
    }

    /// Builder-style [`set`](Self::set).
    pub fn with<I, S>(mut self, column: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.set(column, values);
        self
    }

    /// Drop the filter on `column`. Returns whether one was present.
    pub fn remove(&mut self, column: &str) -> bool {
        self.0.shift_remove(column).is_some()
    }

    /// Accepted values for `column`.
    pub fn get(&self, column: &str) -> Option<&IndexSet<String>> {
        self.0.get(column)
    }

    /// Whether `column` is filtered.
    pub fn contains(&self, column: &str) -> bool {
        self.0.contains_key(column)
    }

    /// Number of filtered columns.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no column is filtered.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Filtered columns with their accepted values, in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &IndexSet<String>)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }
}

// ===== Criteria =====

/// Inputs to [`filter_and_sort`].
#[derive(Debug, Clone, Copy)]
pub struct PipelineCriteria<'a> {
    /// Column to order by.
    pub sort_key: &'a str,
    /// Direction.
    pub sort_order: SortOrder,
    /// Membership filters.
    pub filters: &'a ColumnFilters,
}

/// Whether `record` passes every column filter.
///
/// AND across columns, OR within a column. The record's value is string-coerced
/// first; a missing column coerces to `""` and only matches an explicitly
/// selected empty string.
pub fn record_matches(record: &LogRecord, filters: &ColumnFilters) -> bool {
    filters
        .iter()
        .all(|(column, accepted)| accepted.contains(&record.coerced(column)))
}

/// Filter then stably sort the canonical dataset.
///
/// The sort compares raw (uncoerced) values; ties keep their original
/// relative order in both directions.
pub fn filter_and_sort(criteria: &PipelineCriteria<'_>, dataset: &[LogRecord]) -> Vec<LogRecord> {
    let mut derived: Vec<LogRecord> = if criteria.filters.is_empty() {
        dataset.to_vec()
    } else {
        dataset
            .iter()
            .filter(|record| record_matches(record, criteria.filters))
            .cloned()
            .collect()
    };

    let key = criteria.sort_key;
    match criteria.sort_order {
        SortOrder::Asc => derived.sort_by(|a, b| compare_values(a.get(key), b.get(key))),
        SortOrder::Desc => derived.sort_by(|a, b| compare_values(b.get(key), a.get(key))),
    }
    derived
}

/// Distinct, non-null, string-coerced values of `column` in first-seen order.
///
/// Computed from the canonical dataset so candidates cover the unfiltered
/// universe.
pub fn get_unique_values(dataset: &[LogRecord], column: &str) -> Vec<String> {
    let unique: IndexSet<String> = dataset
        .iter()
        .filter_map(|record| record.get(column))
        .filter(|value| !value.is_null())
        .map(|value| value.to_filter_string())
        .collect();
    unique.into_iter().collect()
}

/// Records of 1-indexed `page`. Out-of-range pages yield an empty page.
pub fn get_page_slice(page: usize, per_page: usize, dataset: &[LogRecord]) -> Vec<LogRecord> {
    if page == 0 || per_page == 0 {
        return Vec::new();
    }
    let start = (page - 1).saturating_mul(per_page);
    if start >= dataset.len() {
        return Vec::new();
    }
    let end = start.saturating_add(per_page).min(dataset.len());
    dataset[start..end].to_vec()
}

/// `ceil(len / per_page)`, 0 for an empty dataset or a zero page size.
pub fn total_pages(len: usize, per_page: usize) -> usize {
    if per_page == 0 {
        0
    } else {
        len.div_ceil(per_page)
    }
}

#[cfg(test)]
#[path = "pipeline_tests.rs"]
mod tests;
