//! The consolidated explore-view snapshot and its partial patches.
//!
//! `LogsState` is pure data. Transitions never mutate it; they return a
//! [`StatePatch`] naming the top-level sections they replace, and the
//! [`Store`](crate::state::Store) merges the patch section by section.

use crate::model::{
    Field, FixedDuration, LogRecord, StreamSchema, TimeRange, DEFAULT_FIXED_DURATION,
    DEFAULT_SORT_KEY,
};
use crate::pipeline::{ColumnFilters, SortOrder};
use chrono::{DateTime, Utc};
use indexmap::IndexSet;

// ===== StoreDefaults =====

/// Values a fresh (or freshly cleaned) store starts from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreDefaults {
    /// Rows per page.
    pub per_page: usize,
    /// Preset for the initial rolling window.
    pub duration: FixedDuration,
    /// Initial sort column.
    pub sort_key: String,
    /// Initial sort direction.
    pub sort_order: SortOrder,
}

impl Default for StoreDefaults {
    fn default() -> Self {
        Self {
            per_page: 30,
            duration: DEFAULT_FIXED_DURATION,
            sort_key: DEFAULT_SORT_KEY.to_string(),
            sort_order: SortOrder::Desc,
        }
    }
}

// ===== Sections =====

/// Active sort of the quick-filter bar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortSpec {
    /// Column.
    pub key: String,
    /// Direction.
    pub order: SortOrder,
}

/// Filter-pill state: free text plus per-column membership filters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuickFilters {
    /// Free-text search box.
    pub search: String,
    /// Column membership filters (mirrors the table pipeline criteria).
    pub filters: ColumnFilters,
    /// Active sort.
    pub sort: SortSpec,
}

impl QuickFilters {
    fn from_defaults(defaults: &StoreDefaults) -> Self {
        Self {
            search: String::new(),
            filters: ColumnFilters::new(),
            sort: SortSpec {
                key: defaults.sort_key.clone(),
                order: defaults.sort_order,
            },
        }
    }
}

/// Live-tail transport status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LiveTailStatus {
    /// Receiving events.
    Streaming,
    /// Stopped by the user.
    Stopped,
    /// Aborted by the transport.
    Abort,
    /// Connecting / fetching the first batch.
    Fetch,
    /// Never started.
    #[default]
    Idle,
}

/// Live-tail mode state. Independent of [`QuickFilters`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LiveTailConfig {
    /// Transport status.
    pub status: LiveTailStatus,
    /// Columns of the tailed stream.
    pub schema: Vec<Field>,
    /// Free-text search value.
    pub search_value: String,
    /// Column the search value applies to.
    pub search_field: String,
}

/// Query entry mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QueryMode {
    /// Filter builder.
    #[default]
    Filters,
    /// Raw SQL.
    Sql,
}

/// Custom query (builder / SQL) state.
///
/// `is_active` and `show_builder` are never both true. `active_mode` stays
/// `None` until a query has been applied at least once.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CustomQueryState {
    /// Builder panel open.
    pub show_builder: bool,
    /// A committed custom query drives the displayed data.
    pub is_active: bool,
    /// Query text.
    pub raw_query: String,
    /// Editor tab currently shown.
    pub view_mode: QueryMode,
    /// Mode of the last applied query.
    pub active_mode: Option<QueryMode>,
    /// Saved filter the query was loaded from, if any.
    pub saved_filter_id: Option<String>,
    /// Inline validation message.
    pub error: Option<String>,
}

/// Modal visibility flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ModalOpts {
    /// Delete-stream confirmation.
    pub delete_open: bool,
    /// Alerts editor.
    pub alerts_open: bool,
    /// Retention editor.
    pub retention_open: bool,
    /// Save-filter form.
    pub save_filter_open: bool,
}

/// Table layout, pagination and pipeline criteria.
///
/// `page_data` is always the `current_page` slice of the derived dataset and
/// `total_pages == ceil(derived.len() / per_page)`.
#[derive(Debug, Clone, PartialEq)]
pub struct TableOpts {
    /// Hidden columns.
    pub disabled_columns: IndexSet<String>,
    /// Pinned columns, in pin order.
    pub pinned_columns: IndexSet<String>,
    /// Rows of the current page.
    pub page_data: Vec<LogRecord>,
    /// Page count of the derived dataset.
    pub total_pages: usize,
    /// Total matching rows reported by the backend.
    pub total_count: usize,
    /// Size of the derived dataset.
    pub displayed_count: usize,
    /// 1-indexed page; 0 while there is nothing to show.
    pub current_page: usize,
    /// Rows per page (> 0).
    pub per_page: usize,
    /// Fetch offset for server-side paging.
    pub current_offset: usize,
    /// Column headers.
    pub headers: Vec<String>,
    /// Pipeline sort column.
    pub sort_key: String,
    /// Pipeline sort direction.
    pub sort_order: SortOrder,
    /// Pipeline membership filters.
    pub filters: ColumnFilters,
    /// Inline validation message for paging controls.
    pub page_error: Option<String>,
}

impl TableOpts {
    fn from_defaults(defaults: &StoreDefaults) -> Self {
        Self {
            disabled_columns: IndexSet::new(),
            pinned_columns: IndexSet::new(),
            page_data: Vec::new(),
            total_pages: 0,
            total_count: 0,
            displayed_count: 0,
            current_page: 0,
            per_page: defaults.per_page,
            current_offset: 0,
            headers: Vec::new(),
            sort_key: defaults.sort_key.clone(),
            sort_order: defaults.sort_order,
            filters: ColumnFilters::new(),
            page_error: None,
        }
    }
}

/// Canonical and derived datasets.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DataState {
    /// Canonical dataset, exactly as fetched.
    pub raw: Vec<LogRecord>,
    /// Derived dataset (filtered + sorted).
    pub filtered: Vec<LogRecord>,
    /// Schema of the selected stream.
    pub schema: Option<StreamSchema>,
    /// Last fetch failure, shown with a retry affordance.
    pub fetch_error: Option<String>,
}

// ===== LogsState =====

/// Root snapshot of one explore view.
#[derive(Debug, Clone, PartialEq)]
pub struct LogsState {
    /// Query window.
    pub time_range: TimeRange,
    /// Filter pills.
    pub quick_filters: QuickFilters,
    /// Live-tail mode.
    pub live_tail: LiveTailConfig,
    /// Auto-refresh period in milliseconds, driven externally.
    pub refresh_interval: Option<u64>,
    /// Record opened in the detail panel.
    pub selected_log: Option<LogRecord>,
    /// Custom query mode.
    pub custom_query: CustomQueryState,
    /// Modal flags.
    pub modal_opts: ModalOpts,
    /// Table layout and pagination.
    pub table_opts: TableOpts,
    /// Datasets.
    pub data: DataState,
}

impl LogsState {
    /// The documented default state, with the rolling window ending at `now`.
    pub fn initial(defaults: &StoreDefaults, now: DateTime<Utc>) -> Self {
        Self {
            time_range: TimeRange::rolling(defaults.duration, now),
            quick_filters: QuickFilters::from_defaults(defaults),
            live_tail: LiveTailConfig::default(),
            refresh_interval: None,
            selected_log: None,
            custom_query: CustomQueryState::default(),
            modal_opts: ModalOpts::default(),
            table_opts: TableOpts::from_defaults(defaults),
            data: DataState::default(),
        }
    }

    /// Merge a patch, replacing each section it carries.
    pub fn apply(&mut self, patch: StatePatch) {
        let StatePatch {
            time_range,
            quick_filters,
            live_tail,
            refresh_interval,
            selected_log,
            custom_query,
            modal_opts,
            table_opts,
            data,
        } = patch;

        if let Some(v) = time_range {
            self.time_range = v;
        }
        if let Some(v) = quick_filters {
            self.quick_filters = v;
        }
        if let Some(v) = live_tail {
            self.live_tail = v;
        }
        if let Some(v) = refresh_interval {
            self.refresh_interval = v;
        }
        if let Some(v) = selected_log {
            self.selected_log = v;
        }
        if let Some(v) = custom_query {
            self.custom_query = v;
        }
        if let Some(v) = modal_opts {
            self.modal_opts = v;
        }
        if let Some(v) = table_opts {
            self.table_opts = v;
        }
        if let Some(v) = data {
            self.data = v;
        }
    }

    /// Copy of `self` with `patch` merged.
    pub fn patched(&self, patch: StatePatch) -> Self {
        let mut next = self.clone();
        next.apply(patch);
        next
    }
}

// ===== StatePatch =====

/// Partial state produced by a transition.
///
/// `None` leaves a section untouched. For the nullable sections the outer
/// `Option` means "present in the patch" and the inner one is the new value.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StatePatch {
    /// Replacement time range.
    pub time_range: Option<TimeRange>,
    /// Replacement quick filters.
    pub quick_filters: Option<QuickFilters>,
    /// Replacement live-tail config.
    pub live_tail: Option<LiveTailConfig>,
    /// Replacement refresh interval.
    pub refresh_interval: Option<Option<u64>>,
    /// Replacement selected record.
    pub selected_log: Option<Option<LogRecord>>,
    /// Replacement custom query state.
    pub custom_query: Option<CustomQueryState>,
    /// Replacement modal flags.
    pub modal_opts: Option<ModalOpts>,
    /// Replacement table opts.
    pub table_opts: Option<TableOpts>,
    /// Replacement datasets.
    pub data: Option<DataState>,
}

impl StatePatch {
    /// A patch that changes nothing.
    pub fn none() -> Self {
        Self::default()
    }

    /// A patch replacing every section with those of `state`.
    pub fn full(state: LogsState) -> Self {
        Self {
            time_range: Some(state.time_range),
            quick_filters: Some(state.quick_filters),
            live_tail: Some(state.live_tail),
            refresh_interval: Some(state.refresh_interval),
            selected_log: Some(state.selected_log),
            custom_query: Some(state.custom_query),
            modal_opts: Some(state.modal_opts),
            table_opts: Some(state.table_opts),
            data: Some(state.data),
        }
    }

    /// Whether the patch carries no section.
    pub fn is_empty(&self) -> bool {
        self.sections().is_empty()
    }

    /// Combine two patches; sections in `later` win.
    pub fn merge(self, later: StatePatch) -> StatePatch {
        StatePatch {
            time_range: later.time_range.or(self.time_range),
            quick_filters: later.quick_filters.or(self.quick_filters),
            live_tail: later.live_tail.or(self.live_tail),
            refresh_interval: later.refresh_interval.or(self.refresh_interval),
            selected_log: later.selected_log.or(self.selected_log),
            custom_query: later.custom_query.or(self.custom_query),
            modal_opts: later.modal_opts.or(self.modal_opts),
            table_opts: later.table_opts.or(self.table_opts),
            data: later.data.or(self.data),
        }
    }

    /// Names of the sections present, for logging.
    pub fn sections(&self) -> Vec<&'static str> {
        let mut names = Vec::new();
        if self.time_range.is_some() {
            names.push("time_range");
        }
        if self.quick_filters.is_some() {
            names.push("quick_filters");
        }
        if self.live_tail.is_some() {
            names.push("live_tail");
        }
        if self.refresh_interval.is_some() {
            names.push("refresh_interval");
        }
        if self.selected_log.is_some() {
            names.push("selected_log");
        }
        if self.custom_query.is_some() {
            names.push("custom_query");
        }
        if self.modal_opts.is_some() {
            names.push("modal_opts");
        }
        if self.table_opts.is_some() {
            names.push("table_opts");
        }
        if self.data.is_some() {
            names.push("data");
        }
        names
    }
}

/// Full reset on stream change: the documented default state, whatever came before.
pub fn stream_change_cleanup(
    _state: &LogsState,
    defaults: &StoreDefaults,
    now: DateTime<Utc>,
) -> StatePatch {
    StatePatch::full(LogsState::initial(defaults, now))
}
