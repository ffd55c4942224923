//! The state container for one explore view.

use crate::state::{stream_change_cleanup, LogsState, StatePatch, StoreDefaults};
use chrono::{DateTime, Utc};
use std::fmt;
use tracing::debug;

/// Handle returned by [`Store::subscribe`], used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Subscriber = Box<dyn FnMut(&LogsState)>;

// ===== Store =====

/// Owns the authoritative [`LogsState`] snapshot and its observers.
///
/// One store exists per selected stream; it is owned by the view session
/// rather than shared process-wide.
///
/// # Dispatch
///
/// [`dispatch`](Store::dispatch) runs a pure transition against the current
/// snapshot, merges the returned patch section by section, and only then
/// notifies subscribers. Observers therefore never see a half-applied patch.
/// Transitions run one at a time to completion (`&mut self`).
///
/// An empty patch is not merged and triggers no notification.
pub struct Store {
    state: LogsState,
    defaults: StoreDefaults,
    subscribers: Vec<(SubscriptionId, Subscriber)>,
    next_id: u64,
}

impl Store {
    /// A store holding the default state, anchored at `now`.
    pub fn new(defaults: StoreDefaults, now: DateTime<Utc>) -> Self {
        Self {
            state: LogsState::initial(&defaults, now),
            defaults,
            subscribers: Vec::new(),
            next_id: 0,
        }
    }

    /// Current snapshot.
    pub fn state(&self) -> &LogsState {
        &self.state
    }

    /// Defaults this store resets to.
    pub fn defaults(&self) -> &StoreDefaults {
        &self.defaults
    }

    /// Run `reducer` against the snapshot and merge its patch.
    ///
    /// `transition` names the reducer in logs. Returns whether anything was
    /// merged (and subscribers notified).
    pub fn dispatch<F>(&mut self, transition: &'static str, reducer: F) -> bool
    where
        F: FnOnce(&LogsState) -> StatePatch,
    {
        let patch = reducer(&self.state);
        if patch.is_empty() {
            debug!(transition, "Transition produced no changes");
            return false;
        }

        debug!(transition, sections = ?patch.sections(), "Applying transition");
        self.state.apply(patch);
        self.notify();
        true
    }

    /// Register an observer called after every applied transition.
    pub fn subscribe<F>(&mut self, subscriber: F) -> SubscriptionId
    where
        F: FnMut(&LogsState) + 'static,
    {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.subscribers.push((id, Box::new(subscriber)));
        id
    }

    /// Remove an observer. Returns whether it was registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(sid, _)| *sid != id);
        self.subscribers.len() != before
    }

    /// Full reset to the default state (stream change). Subscribers are kept
    /// and notified.
    pub fn reset(&mut self, now: DateTime<Utc>) {
        let defaults = self.defaults.clone();
        self.dispatch("stream_change_cleanup", |state| {
            stream_change_cleanup(state, &defaults, now)
        });
    }

    fn notify(&mut self) {
        let state = &self.state;
        for (_, subscriber) in &mut self.subscribers {
            subscriber(state);
        }
    }
}

impl fmt::Debug for Store {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Store")
            .field("state", &self.state)
            .field("defaults", &self.defaults)
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
