//! Widget logic for the explore view, independent of any renderer.
//!
//! Widgets stage edits locally and hand the store a [`StatePatch`] only on
//! commit.
//!
//! [`StatePatch`]: crate::state::StatePatch

pub mod column_filter;
pub mod save_filter;
pub mod sort;

pub use column_filter::{CandidateList, ColumnFilterState, CANDIDATE_DISPLAY_LIMIT};
pub use save_filter::{
    SaveFilterForm, SubmitOutcome, TimeRangeChoice, TimeRangeOption, EMPTY_NAME_MESSAGE,
};
pub use sort::{apply_sort, is_sort_active};
