//! Column sort buttons.

use crate::pipeline::SortOrder;
use crate::state::{set_and_sort_data, LogsState, StatePatch};

/// Whether `column` is the active sort in direction `order` (highlights the button).
pub fn is_sort_active(state: &LogsState, column: &str, order: SortOrder) -> bool {
    state.table_opts.sort_key == column && state.table_opts.sort_order == order
}

/// Sort the table by `column`.
pub fn apply_sort(state: &LogsState, column: &str, order: SortOrder) -> StatePatch {
    set_and_sort_data(state, column, order)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_harness::{loaded_state, records};

    #[test]
    fn default_sort_is_timestamp_descending() {
        let state = loaded_state(records(3));

        assert!(is_sort_active(&state, "p_timestamp", SortOrder::Desc));
        assert!(!is_sort_active(&state, "p_timestamp", SortOrder::Asc));
        assert!(!is_sort_active(&state, "host", SortOrder::Desc));
    }

    #[test]
    fn sorting_moves_the_highlight() {
        let state = loaded_state(records(3));

        let next = state.patched(apply_sort(&state, "host", SortOrder::Asc));

        assert!(is_sort_active(&next, "host", SortOrder::Asc));
        assert_eq!(next.table_opts.page_data[0].coerced("host"), "h0");
    }
}
