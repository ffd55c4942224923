//! Tests for the store's dispatch and subscription behavior.

use super::*;
use crate::pipeline::SortOrder;
use crate::state::{
    reset_time_range, set_and_sort_data, set_data, toggle_delete_modal, LogsState,
};
use crate::test_harness::{fixed_now, records, StateHarness};
use std::cell::RefCell;
use std::rc::Rc;

#[test]
fn dispatch_merges_patch_and_notifies_once() {
    let mut harness = StateHarness::new();

    let applied = harness.dispatch(|s| set_data(s, records(40)));

    assert!(applied);
    assert_eq!(harness.notifications(), 1);
    assert_eq!(harness.state().data.raw.len(), 40);
    assert_eq!(harness.state().table_opts.page_data.len(), 30);
}

#[test]
fn empty_patch_does_not_notify() {
    let mut harness = StateHarness::new();
    harness.dispatch(|s| {
        crate::state::set_time_range(
            s,
            crate::model::TimeRangeUpdate {
                kind: Some(crate::model::TimeRangeKind::Custom),
                ..Default::default()
            },
        )
    });
    let before = harness.notifications();

    let applied = harness.dispatch(|s| reset_time_range(s, fixed_now()));

    assert!(!applied);
    assert_eq!(harness.notifications(), before);
}

#[test]
fn subscribers_observe_fully_applied_state() {
    let mut store = Store::new(StoreDefaults::default(), fixed_now());
    let seen: Rc<RefCell<Vec<(usize, usize)>>> = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    store.subscribe(move |state: &LogsState| {
        sink.borrow_mut()
            .push((state.data.filtered.len(), state.table_opts.page_data.len()));
    });

    store.dispatch("set_data", |s| set_data(s, records(12)));
    store.dispatch("sort", |s| set_and_sort_data(s, "host", SortOrder::Asc));

    // derived data and page always arrive together
    assert_eq!(*seen.borrow(), vec![(12, 12), (12, 12)]);
}

#[test]
fn unsubscribed_observers_stop_receiving() {
    let mut store = Store::new(StoreDefaults::default(), fixed_now());
    let count = Rc::new(RefCell::new(0));
    let counter = Rc::clone(&count);
    let id = store.subscribe(move |_| *counter.borrow_mut() += 1);

    store.dispatch("toggle_delete_modal", toggle_delete_modal);
    assert!(store.unsubscribe(id));
    assert!(!store.unsubscribe(id));
    store.dispatch("toggle_delete_modal", toggle_delete_modal);

    assert_eq!(*count.borrow(), 1);
}

#[test]
fn reset_restores_defaults_and_notifies() {
    let mut harness = StateHarness::new();
    harness.dispatch(|s| set_data(s, records(40)));
    harness.dispatch(toggle_delete_modal);

    harness.store_mut().reset(fixed_now());

    let expected = LogsState::initial(&StoreDefaults::default(), fixed_now());
    assert_eq!(*harness.state(), expected);
    assert_eq!(harness.notifications(), 3);
}

#[test]
fn debug_output_summarises_subscribers() {
    let mut store = Store::new(StoreDefaults::default(), fixed_now());
    store.subscribe(|_| {});

    let rendered = format!("{store:?}");

    assert!(rendered.contains("subscribers: 1"));
}
