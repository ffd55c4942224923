//! Shared fixtures for unit tests.
//!
//! Provides a pinned clock, record builders and a store harness that counts
//! subscriber notifications.

use crate::model::{LogRecord, SavedFilter, SavedFilterError};
use crate::source::SavedFilterStore;
use crate::state::{set_data, LogsState, StatePatch, Store, StoreDefaults};
use chrono::{DateTime, TimeZone, Utc};
use std::cell::RefCell;
use std::rc::Rc;

/// Levels cycled through by [`records`].
pub const LEVELS: [&str; 3] = ["INFO", "ERROR", "WARN"];

/// Pinned "now": 2024-01-01T12:00:30Z (mid-minute on purpose).
pub fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 30).unwrap()
}

/// One record with a minute-resolution timestamp string.
pub fn record(minute: usize, level: &str, host: &str) -> LogRecord {
    LogRecord::new()
        .with(
            "p_timestamp",
            format!("2024-01-01T{:02}:{:02}:00", minute / 60, minute % 60),
        )
        .with("level", level)
        .with("host", host)
}

/// `n` records in ascending time order, levels cycling INFO/ERROR/WARN and
/// hosts cycling h0..h3.
pub fn records(n: usize) -> Vec<LogRecord> {
    (0..n)
        .map(|i| record(i, LEVELS[i % LEVELS.len()], &format!("h{}", i % 4)))
        .collect()
}

/// The documented default state at [`fixed_now`].
pub fn empty_state() -> LogsState {
    LogsState::initial(&StoreDefaults::default(), fixed_now())
}

/// Default state after `set_data(records)`.
pub fn loaded_state(data: Vec<LogRecord>) -> LogsState {
    let state = empty_state();
    let patch = set_data(&state, data);
    state.patched(patch)
}

/// Store wrapper that records how many times subscribers fired.
pub struct StateHarness {
    store: Store,
    notifications: Rc<RefCell<usize>>,
}

impl StateHarness {
    /// Fresh store with default settings and a counting subscriber.
    pub fn new() -> Self {
        let mut store = Store::new(StoreDefaults::default(), fixed_now());
        let notifications = Rc::new(RefCell::new(0));
        let counter = Rc::clone(&notifications);
        store.subscribe(move |_state| *counter.borrow_mut() += 1);
        Self {
            store,
            notifications,
        }
    }

    /// Dispatch a transition through the store.
    pub fn dispatch(&mut self, reducer: impl FnOnce(&LogsState) -> StatePatch) -> bool {
        self.store.dispatch("test", reducer)
    }

    /// Current snapshot.
    pub fn state(&self) -> &LogsState {
        self.store.state()
    }

    /// Underlying store.
    pub fn store_mut(&mut self) -> &mut Store {
        &mut self.store
    }

    /// Notifications delivered so far.
    pub fn notifications(&self) -> usize {
        *self.notifications.borrow()
    }
}

/// In-memory saved-filter store that assigns ids and bumps versions.
#[derive(Debug, Default)]
pub struct MemoryFilterStore {
    /// Stored filters.
    pub filters: Vec<SavedFilter>,
    /// Error returned by the next call, if set.
    pub fail_with: Option<SavedFilterError>,
}

impl SavedFilterStore for MemoryFilterStore {
    fn create(&mut self, filter: SavedFilter) -> Result<SavedFilter, SavedFilterError> {
        if let Some(err) = self.fail_with.take() {
            return Err(err);
        }
        let stored = SavedFilter {
            filter_id: Some(format!("f-{}", self.filters.len() + 1)),
            version: Some("v1".to_string()),
            ..filter
        };
        self.filters.push(stored.clone());
        Ok(stored)
    }

    fn update(&mut self, filter: SavedFilter) -> Result<SavedFilter, SavedFilterError> {
        if let Some(err) = self.fail_with.take() {
            return Err(err);
        }
        let slot = self
            .filters
            .iter_mut()
            .find(|f| f.filter_id == filter.filter_id)
            .ok_or_else(|| SavedFilterError::Rejected("unknown filter".to_string()))?;
        let stored = SavedFilter {
            version: Some("v2".to_string()),
            ..filter
        };
        *slot = stored.clone();
        Ok(stored)
    }

    fn list(&self, stream: &str) -> Result<Vec<SavedFilter>, SavedFilterError> {
        Ok(self
            .filters
            .iter()
            .filter(|f| f.stream_name == stream)
            .cloned()
            .collect())
    }
}
