//! Impure shell around the state engine.
//!
//! [`ExploreSession`] owns one [`Store`] and the collaborators. It turns
//! collaborator results into transitions: rows become `set_data`, failures
//! become a fetch-error indicator with the previous page left in place.
//! Everything stateful stays in the store; the session only sequences calls.

use crate::config::ResolvedConfig;
use crate::model::{QueryError, SavedFilter, SavedFilterError, SchemaError};
use crate::source::{logs_query, Clock, QueryExecutor, SavedFilterStore, SchemaProvider};
use crate::state::{
    apply_custom_query, reset_time_range, select_time_bucket, set_custom_query_state, set_data,
    set_fetch_error, set_live_tail_schema, set_stream_schema, set_total_count,
    toggle_save_filter_modal, CustomQueryUpdate, LogsState, QueryMode, StatePatch, Store,
    StoreDefaults,
};
use crate::timeseries::{
    aggregate_event_rate, count_query, parse_graph_records, EventBucket, EventRateSeries,
};
use crate::widget::{
    ColumnFilterState, SaveFilterForm, SubmitOutcome, CANDIDATE_DISPLAY_LIMIT,
};
use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

/// Rows requested per log fetch unless configured otherwise.
pub const DEFAULT_FETCH_LIMIT: usize = 1000;

/// External services the session talks to.
pub struct Collaborators {
    /// Runs log and aggregation queries.
    pub executor: Box<dyn QueryExecutor>,
    /// Resolves stream schemas.
    pub schemas: Box<dyn SchemaProvider>,
    /// Persists saved filters.
    pub saved_filters: Box<dyn SavedFilterStore>,
    /// Wall clock.
    pub clock: Box<dyn Clock>,
}

/// One explore view: a store plus the collaborators feeding it.
pub struct ExploreSession {
    stream: Option<String>,
    store: Store,
    collaborators: Collaborators,
    fetch_limit: usize,
    candidate_limit: usize,
}

impl ExploreSession {
    /// A session with no stream selected.
    pub fn new(defaults: StoreDefaults, fetch_limit: usize, collaborators: Collaborators) -> Self {
        let store = Store::new(defaults, collaborators.clock.now());
        Self {
            stream: None,
            store,
            collaborators,
            fetch_limit: fetch_limit.max(1),
            candidate_limit: CANDIDATE_DISPLAY_LIMIT,
        }
    }

    /// A session using the store defaults, fetch limit and candidate limit
    /// of `config`.
    pub fn from_config(config: &ResolvedConfig, collaborators: Collaborators) -> Self {
        Self::new(config.store_defaults(), config.fetch_limit, collaborators)
            .with_candidate_limit(config.candidate_limit)
    }

    /// Cap the values a column filter popover renders.
    pub fn with_candidate_limit(self, limit: usize) -> Self {
        Self {
            candidate_limit: limit.max(1),
            ..self
        }
    }

    /// Open the filter popover for `column` over the current dataset.
    pub fn open_column_filter(&self, column: &str) -> ColumnFilterState {
        ColumnFilterState::new(column, self.state()).with_display_limit(self.candidate_limit)
    }

    /// Selected stream, if any.
    pub fn stream(&self) -> Option<&str> {
        self.stream.as_deref()
    }

    /// The store.
    pub fn store(&self) -> &Store {
        &self.store
    }

    /// The store, for dispatching UI transitions and subscribing observers.
    pub fn store_mut(&mut self) -> &mut Store {
        &mut self.store
    }

    /// Current snapshot.
    pub fn state(&self) -> &LogsState {
        self.store.state()
    }

    fn now(&self) -> DateTime<Utc> {
        self.collaborators.clock.now()
    }

    fn require_stream(&self) -> Result<String, QueryError> {
        self.stream
            .clone()
            .ok_or_else(|| QueryError::Rejected("No stream selected".to_string()))
    }

    /// Switch to `stream`: full reset to defaults, then load its schema.
    ///
    /// # Errors
    ///
    /// Returns the schema provider's error. The store is reset either way.
    pub fn select_stream(&mut self, stream: &str) -> Result<(), SchemaError> {
        info!(stream, "Stream selected");
        let now = self.now();
        self.store.reset(now);
        self.stream = Some(stream.to_string());

        let schema = self.collaborators.schemas.get_schema(stream).map_err(|e| {
            warn!(stream, error = %e, "Schema lookup failed");
            e
        })?;
        let fields = schema.fields.clone();
        self.store
            .dispatch("set_stream_schema", |s| set_stream_schema(s, schema));
        self.store
            .dispatch("set_live_tail_schema", |s| set_live_tail_schema(s, fields));
        Ok(())
    }

    /// The query the next fetch will run: the applied custom query while one
    /// is active, otherwise the default fetch over the current window.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::Rejected`] when no stream is selected.
    pub fn current_query(&self) -> Result<String, QueryError> {
        let stream = self.require_stream()?;
        let state = self.state();
        if state.custom_query.is_active {
            return Ok(state.custom_query.raw_query.clone());
        }
        Ok(logs_query(
            &stream,
            &state.time_range,
            self.fetch_limit,
            state.table_opts.current_offset,
        ))
    }

    /// Fetch logs for the current query and load them into the store.
    ///
    /// Returns the number of rows fetched.
    ///
    /// # Errors
    ///
    /// Returns the executor's error after recording it in
    /// `data.fetch_error`. The previous dataset and page stay visible.
    pub fn refresh_logs(&mut self) -> Result<usize, QueryError> {
        let query = self.current_query()?;
        debug!(query = %query, "Fetching logs");

        match self.collaborators.executor.execute(&query) {
            Ok(records) => {
                let count = records.len();
                info!(rows = count, "Logs fetched");
                self.store.dispatch("set_data", |s| set_data(s, records));
                self.store
                    .dispatch("set_total_count", |s| set_total_count(s, count));
                Ok(count)
            }
            Err(e) => {
                warn!(error = %e, "Log fetch failed");
                let message = e.to_string();
                self.store
                    .dispatch("set_fetch_error", |s| set_fetch_error(s, message));
                Err(e)
            }
        }
    }

    /// Commit a custom query and fetch its results.
    ///
    /// A blank query only sets the inline error and fetches nothing
    /// (returns `Ok(0)`).
    ///
    /// # Errors
    ///
    /// See [`refresh_logs`](Self::refresh_logs).
    pub fn apply_custom_query(
        &mut self,
        query: &str,
        mode: QueryMode,
    ) -> Result<usize, QueryError> {
        let now = self.now();
        self.store
            .dispatch("apply_custom_query", |s| apply_custom_query(s, query, mode, now));
        if self.state().custom_query.error.is_some() {
            return Ok(0);
        }
        self.refresh_logs()
    }

    /// Run the per-minute count query for the current window and build the
    /// gap-filled event-rate series.
    ///
    /// # Errors
    ///
    /// Returns the executor's error, or [`QueryError::MalformedResponse`]
    /// when the rows are not `{minute_range, log_count}` pairs.
    pub fn load_event_rate(&mut self) -> Result<EventRateSeries, QueryError> {
        let stream = self.require_stream()?;
        let range = self.state().time_range.clone();
        let query = count_query(&stream, range.start_time, range.end_time);

        let rows = self.collaborators.executor.execute(&query).map_err(|e| {
            warn!(error = %e, "Event-rate fetch failed");
            e
        })?;
        let records = parse_graph_records(&rows)?;
        let series = aggregate_event_rate(&records, range.start_time, range.bucket_window_ms());
        debug!(
            buckets = series.buckets.len(),
            average = series.average,
            "Event rate aggregated"
        );
        Ok(series)
    }

    /// Pin the window to a clicked bucket and refetch.
    ///
    /// # Errors
    ///
    /// See [`refresh_logs`](Self::refresh_logs).
    pub fn select_event_bucket(&mut self, bucket: &EventBucket) -> Result<usize, QueryError> {
        let minute = bucket.minute;
        self.store
            .dispatch("select_time_bucket", |s| select_time_bucket(s, minute));
        self.refresh_logs()
    }

    /// Roll a fixed window forward to now and refetch.
    ///
    /// Returns `Ok(false)` without fetching for a custom range.
    ///
    /// # Errors
    ///
    /// See [`refresh_logs`](Self::refresh_logs).
    pub fn resume_rolling_window(&mut self) -> Result<bool, QueryError> {
        let now = self.now();
        if !self
            .store
            .dispatch("reset_time_range", |s| reset_time_range(s, now))
        {
            return Ok(false);
        }
        self.refresh_logs()?;
        Ok(true)
    }

    /// Saved filters of the selected stream (none without a stream).
    ///
    /// # Errors
    ///
    /// Returns the saved-filter store's error.
    pub fn saved_filters(&self) -> Result<Vec<SavedFilter>, SavedFilterError> {
        match &self.stream {
            Some(stream) => self.collaborators.saved_filters.list(stream),
            None => Ok(Vec::new()),
        }
    }

    /// Open the save-filter form for the applied query.
    ///
    /// Returns `Ok(None)` when no stream is selected or no query was applied.
    ///
    /// # Errors
    ///
    /// Returns the saved-filter store's error from listing existing filters.
    pub fn open_save_filter(
        &mut self,
        user_id: &str,
    ) -> Result<Option<SaveFilterForm>, SavedFilterError> {
        let Some(stream) = self.stream.clone() else {
            return Ok(None);
        };
        let saved = self.saved_filters()?;
        let form = SaveFilterForm::prepare(self.state(), &stream, user_id, &saved);
        if form.is_some() {
            self.store
                .dispatch("toggle_save_filter_modal", |s| toggle_save_filter_modal(s, true));
        }
        Ok(form)
    }

    /// Submit the form. On success the modal closes and the custom query is
    /// linked to the stored filter.
    ///
    /// # Errors
    ///
    /// Returns the saved-filter store's error; the modal stays open.
    pub fn submit_saved_filter(
        &mut self,
        form: &mut SaveFilterForm,
    ) -> Result<SubmitOutcome, SavedFilterError> {
        let outcome = form.submit(self.collaborators.saved_filters.as_mut())?;
        let stored_id = match &outcome {
            SubmitOutcome::Created(f) | SubmitOutcome::Updated(f) => f.filter_id.clone(),
            SubmitOutcome::Rejected => return Ok(outcome),
        };

        self.store.dispatch("submit_saved_filter", |s| {
            toggle_save_filter_modal(s, false).merge(set_custom_query_state(
                s,
                CustomQueryUpdate {
                    saved_filter_id: Some(stored_id),
                    ..CustomQueryUpdate::default()
                },
            ))
        });
        Ok(outcome)
    }

    /// Dispatch a UI transition that needs the clock.
    pub fn dispatch_at<F>(&mut self, transition: &'static str, reducer: F) -> bool
    where
        F: FnOnce(&LogsState, DateTime<Utc>) -> StatePatch,
    {
        let now = self.now();
        self.store.dispatch(transition, |s| reducer(s, now))
    }
}
