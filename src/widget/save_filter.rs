//! Save-filter form.
//!
//! The form snapshots the applied custom query into a [`SavedFilter`] draft.
//! An empty name is an inline validation error rather than an `Err`; store
//! failures come back as [`SavedFilterError`].

use crate::model::{
    make_time_range_label, SavedFilter, SavedFilterError, SavedFilterQuery, TimeFilter,
};
use crate::source::SavedFilterStore;
use crate::state::{LogsState, QueryMode};
use tracing::{info, warn};

/// Inline message shown for an empty name.
pub const EMPTY_NAME_MESSAGE: &str = "Name cannot be empty";

/// Which window, if any, is stored with the filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeRangeChoice {
    /// No window.
    None,
    /// The explore view's current window.
    Current,
    /// The window already stored with the filter being edited.
    Selected,
}

/// One entry of the time-range dropdown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeRangeOption {
    /// Choice this entry selects.
    pub choice: TimeRangeChoice,
    /// Display label.
    pub label: String,
}

/// Result of [`SaveFilterForm::submit`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Validation failed; nothing was sent to the store.
    Rejected,
    /// A new filter was created.
    Created(SavedFilter),
    /// An existing filter was updated.
    Updated(SavedFilter),
}

/// Draft of a saved filter plus form state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveFilterForm {
    /// The filter that will be sent.
    pub draft: SavedFilter,
    /// Whether this form creates rather than edits.
    pub is_new: bool,
    /// Name validation failed.
    pub is_error: bool,
    /// Dropdown entries.
    pub time_range_options: Vec<TimeRangeOption>,
    /// Current dropdown choice.
    pub selected_time_range: TimeRangeChoice,
    dirty: bool,
    current_window: TimeFilter,
    stored_window: Option<TimeFilter>,
}

impl SaveFilterForm {
    /// Build the form for the current custom query.
    ///
    /// Edits the saved filter named by `custom_query.saved_filter_id` when it
    /// is in `saved`, otherwise starts a new one. Returns `None` until a
    /// custom query has been applied.
    pub fn prepare(
        state: &LogsState,
        stream: &str,
        user_id: &str,
        saved: &[SavedFilter],
    ) -> Option<Self> {
        let query = &state.custom_query;
        let mode = query.active_mode?;
        let range = &state.time_range;
        let current_window = TimeFilter {
            from: range.start_time,
            to: range.end_time,
        };

        let existing = query
            .saved_filter_id
            .as_deref()
            .and_then(|id| saved.iter().find(|f| f.filter_id.as_deref() == Some(id)));

        let mut options = vec![
            TimeRangeOption {
                choice: TimeRangeChoice::None,
                label: "Time range not included".to_string(),
            },
            TimeRangeOption {
                choice: TimeRangeChoice::Current,
                label: format!(
                    "Current - {}",
                    make_time_range_label(current_window.from, current_window.to)
                ),
            },
        ];

        let (draft, is_new) = match existing {
            Some(filter) => (filter.clone(), false),
            None => {
                let payload = match mode {
                    QueryMode::Sql => SavedFilterQuery::Sql {
                        filter_query: query.raw_query.clone(),
                    },
                    QueryMode::Filters => SavedFilterQuery::Builder {
                        filter_builder: query.raw_query.clone(),
                    },
                };
                let draft = SavedFilter {
                    filter_id: None,
                    version: None,
                    stream_name: stream.to_string(),
                    filter_name: String::new(),
                    user_id: user_id.to_string(),
                    query: payload,
                    time_filter: None,
                };
                (draft, true)
            }
        };

        let stored_window = draft.time_filter;
        if let Some(window) = stored_window {
            options.push(TimeRangeOption {
                choice: TimeRangeChoice::Selected,
                label: format!("Stored - {}", make_time_range_label(window.from, window.to)),
            });
        }
        let selected_time_range = if stored_window.is_some() {
            TimeRangeChoice::Selected
        } else {
            TimeRangeChoice::None
        };

        Some(Self {
            draft,
            is_new,
            is_error: false,
            time_range_options: options,
            selected_time_range,
            dirty: false,
            current_window,
            stored_window,
        })
    }

    /// Update the name and re-validate it.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.dirty = true;
        self.draft.filter_name = name.into();
        self.is_error = self.draft.filter_name.trim().is_empty();
    }

    /// Pick which window to store. `Selected` falls back to `None` when the
    /// filter has no stored window.
    pub fn select_time_range(&mut self, choice: TimeRangeChoice) {
        self.dirty = true;
        let (choice, window) = match choice {
            TimeRangeChoice::None => (TimeRangeChoice::None, None),
            TimeRangeChoice::Current => (TimeRangeChoice::Current, Some(self.current_window)),
            TimeRangeChoice::Selected => match self.stored_window {
                Some(window) => (TimeRangeChoice::Selected, Some(window)),
                None => (TimeRangeChoice::None, None),
            },
        };
        self.selected_time_range = choice;
        self.draft.time_filter = window;
    }

    /// Inline message, shown only once the user has touched the form.
    pub fn error_message(&self) -> Option<&'static str> {
        (self.dirty && self.is_error).then_some(EMPTY_NAME_MESSAGE)
    }

    /// Form title.
    pub fn title(&self) -> &'static str {
        if self.is_new {
            "Save Filters"
        } else {
            "Update Filters"
        }
    }

    /// The filter as it would be submitted.
    pub fn to_saved_filter(&self) -> SavedFilter {
        self.draft.clone()
    }

    /// Validate and send the draft.
    ///
    /// Updates only when id, version and owner are all present; everything
    /// else is created, without id or version.
    ///
    /// # Errors
    ///
    /// Returns the store's [`SavedFilterError`] unchanged.
    pub fn submit(
        &mut self,
        store: &mut dyn SavedFilterStore,
    ) -> Result<SubmitOutcome, SavedFilterError> {
        if self.draft.filter_name.trim().is_empty() {
            self.dirty = true;
            self.is_error = true;
            return Ok(SubmitOutcome::Rejected);
        }

        let filter = self.to_saved_filter();
        let result = if filter.is_persisted() {
            store.update(filter).map(SubmitOutcome::Updated)
        } else {
            store
                .create(SavedFilter {
                    filter_id: None,
                    version: None,
                    ..filter
                })
                .map(SubmitOutcome::Created)
        };

        match &result {
            Ok(_) => info!(
                stream = %self.draft.stream_name,
                name = %self.draft.filter_name,
                "Saved filter stored"
            ),
            Err(e) => warn!(error = %e, "Saved filter submit failed"),
        }
        result
    }
}

#[cfg(test)]
#[path = "save_filter_tests.rs"]
mod tests;
