//! Explore-view state engine (pure).
//!
//! All transitions are pure functions `(&LogsState, payload) -> StatePatch`,
//! testable without any collaborator. The [`Store`] is the only place a patch
//! is merged.

pub mod live_tail_handler;
pub mod logs_state;
pub mod modal_handler;
pub mod query_handler;
pub mod quick_filter_handler;
pub mod store;
pub mod table_handler;
pub mod time_range_handler;

pub use live_tail_handler::{
    filter_live_tail, live_tail_matches, reset_live_tail_search_state, set_live_tail_schema,
    set_live_tail_search, set_live_tail_status,
};
pub use logs_state::{
    stream_change_cleanup, CustomQueryState, DataState, LiveTailConfig, LiveTailStatus,
    LogsState, ModalOpts, QueryMode, QuickFilters, SortSpec, StatePatch, StoreDefaults, TableOpts,
};
pub use modal_handler::{
    toggle_alerts_modal, toggle_delete_modal, toggle_retention_modal, toggle_save_filter_modal,
};
pub use query_handler::{
    apply_custom_query, reset_custom_query_state, set_custom_query_state,
    toggle_custom_query_view_mode, toggle_query_builder, CustomQueryUpdate,
};
pub use quick_filter_handler::{
    add_filter_item, delete_filter_item, reset_quick_filters, set_quick_search,
};
pub use store::{Store, SubscriptionId};
pub use table_handler::{
    clean_store_for_refetch, set_and_filter_data, set_and_sort_data, set_current_offset,
    set_data, set_fetch_error, set_page_and_page_data, set_per_page, set_selected_log,
    set_stream_schema, set_total_count, toggle_disabled_columns, toggle_pinned_columns,
};
pub use time_range_handler::{
    reset_time_range, select_time_bucket, set_refresh_interval, set_time_range,
};
