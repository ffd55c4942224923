//! Per-column filter popover state.
//!
//! Keeps three value sets apart:
//!
//! - the **universe**: every distinct value of the column in the canonical
//!   dataset, so a narrowed filter can still be broadened;
//! - the **search matches**: the universe entries matching the search box;
//! - the **staged selection**: values checked but not yet applied.
//!
//! Searching and toggling only touch this struct. Shared state changes only
//! through [`ColumnFilterState::apply`] and [`ColumnFilterState::clear_filter`],
//! which return a patch for the store. Dropping the struct abandons the edit.

use crate::pipeline::get_unique_values;
use crate::state::{set_and_filter_data, LogsState, StatePatch};
use indexmap::IndexSet;
use regex::{Regex, RegexBuilder};

/// Entries rendered before the list is truncated.
pub const CANDIDATE_DISPLAY_LIMIT: usize = 50;

// ===== CandidateList =====

/// The rendered head of a candidate list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateList<'a> {
    /// Entries to render.
    pub items: &'a [String],
    /// Entries cut off after `items`.
    pub remaining: usize,
}

impl CandidateList<'_> {
    /// `"+N more"` when entries were cut off.
    pub fn more_label(&self) -> Option<String> {
        (self.remaining > 0).then(|| format!("+{} more", self.remaining))
    }
}

// ===== ColumnFilterState =====

/// Staged filter edit for one column.
#[derive(Debug, Clone)]
pub struct ColumnFilterState {
    column: String,
    universe: Vec<String>,
    search_text: String,
    search_matches: Vec<String>,
    staged: IndexSet<String>,
    display_limit: usize,
}

impl ColumnFilterState {
    /// Open the popover for `column`, staging whatever is currently applied.
    pub fn new(column: impl Into<String>, state: &LogsState) -> Self {
        let column = column.into();
        let universe = get_unique_values(&state.data.raw, &column);
        let staged = state
            .table_opts
            .filters
            .get(&column)
            .cloned()
            .unwrap_or_default();
        Self {
            column,
            universe,
            search_text: String::new(),
            search_matches: Vec::new(),
            staged,
            display_limit: CANDIDATE_DISPLAY_LIMIT,
        }
    }

    /// Render at most `limit` candidates (at least one).
    pub fn with_display_limit(self, limit: usize) -> Self {
        Self {
            display_limit: limit.max(1),
            ..self
        }
    }

    /// Candidates rendered before truncation.
    pub fn display_limit(&self) -> usize {
        self.display_limit
    }

    /// The column being edited.
    pub fn column(&self) -> &str {
        &self.column
    }

    /// Every distinct value of the column in the canonical dataset.
    pub fn universe(&self) -> &[String] {
        &self.universe
    }

    /// Current search box text (trimmed).
    pub fn search_text(&self) -> &str {
        &self.search_text
    }

    /// Staged selection in check order.
    pub fn staged(&self) -> &IndexSet<String> {
        &self.staged
    }

    /// Recompute the universe after the canonical dataset changed.
    ///
    /// The search is re-run against the new universe; the staged selection
    /// is kept.
    pub fn refresh_universe(&mut self, state: &LogsState) {
        self.universe = get_unique_values(&state.data.raw, &self.column);
        let text = std::mem::take(&mut self.search_text);
        self.search(&text);
    }

    /// Match the universe against `text`, case-insensitively.
    ///
    /// `text` is tried as a regular expression first; if it does not compile
    /// it is matched as a literal substring.
    pub fn search(&mut self, text: &str) {
        self.search_text = text.trim().to_string();
        if self.search_text.is_empty() {
            self.search_matches.clear();
            return;
        }

        let pattern = search_pattern(&self.search_text);
        self.search_matches = self
            .universe
            .iter()
            .filter(|value| pattern.as_ref().is_some_and(|re| re.is_match(value)))
            .cloned()
            .collect();
    }

    /// Values offered as checkboxes: the universe while the search box is
    /// empty, otherwise the search matches (possibly none).
    pub fn candidates(&self) -> &[String] {
        if self.search_text.is_empty() {
            &self.universe
        } else {
            &self.search_matches
        }
    }

    /// The first `limit` candidates and how many were left out.
    pub fn visible_candidates(&self, limit: usize) -> CandidateList<'_> {
        let all = self.candidates();
        let shown = all.len().min(limit);
        CandidateList {
            items: &all[..shown],
            remaining: all.len() - shown,
        }
    }

    /// The candidates to render under this popover's display limit.
    pub fn displayed_candidates(&self) -> CandidateList<'_> {
        self.visible_candidates(self.display_limit)
    }

    /// Check or uncheck one value.
    pub fn toggle(&mut self, value: &str) {
        if !self.staged.shift_remove(value) {
            self.staged.insert(value.to_string());
        }
    }

    /// Replace the staged selection.
    pub fn set_selection<I, S>(&mut self, values: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.staged = values.into_iter().map(Into::into).collect();
    }

    /// Whether `value` is checked.
    pub fn is_selected(&self, value: &str) -> bool {
        self.staged.contains(value)
    }

    /// Apply is offered only with something checked.
    pub fn can_apply(&self) -> bool {
        !self.staged.is_empty()
    }

    /// Whether the staged selection differs from the applied filter.
    pub fn is_dirty(&self, state: &LogsState) -> bool {
        match state.table_opts.filters.get(&self.column) {
            Some(applied) => *applied != self.staged,
            None => !self.staged.is_empty(),
        }
    }

    /// Whether the shared state currently filters on this column.
    pub fn is_filter_active(&self, state: &LogsState) -> bool {
        state.table_opts.filters.contains(&self.column)
    }

    /// Commit the staged selection. `None` when nothing is checked.
    pub fn apply(&self, state: &LogsState) -> Option<StatePatch> {
        if !self.can_apply() {
            return None;
        }
        let values: Vec<String> = self.staged.iter().cloned().collect();
        Some(set_and_filter_data(state, &self.column, &values, false))
    }

    /// Drop the column's filter and the staged selection.
    pub fn clear_filter(&mut self, state: &LogsState) -> StatePatch {
        self.staged.clear();
        set_and_filter_data(state, &self.column, &[], true)
    }
}

fn search_pattern(text: &str) -> Option<Regex> {
    RegexBuilder::new(text)
        .case_insensitive(true)
        .build()
        .or_else(|_| {
            RegexBuilder::new(&regex::escape(text))
                .case_insensitive(true)
                .build()
        })
        .ok()
}

#[cfg(test)]
#[path = "column_filter_tests.rs"]
mod tests;
