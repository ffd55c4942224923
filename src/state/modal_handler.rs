//! Modal visibility toggles.

use crate::state::{LogsState, ModalOpts, StatePatch};

fn with_modals(modal_opts: ModalOpts) -> StatePatch {
    StatePatch {
        modal_opts: Some(modal_opts),
        ..StatePatch::none()
    }
}

/// Flip the delete-stream confirmation.
pub fn toggle_delete_modal(state: &LogsState) -> StatePatch {
    let modals = state.modal_opts;
    with_modals(ModalOpts {
        delete_open: !modals.delete_open,
        ..modals
    })
}

/// Flip the alerts editor.
pub fn toggle_alerts_modal(state: &LogsState) -> StatePatch {
    let modals = state.modal_opts;
    with_modals(ModalOpts {
        alerts_open: !modals.alerts_open,
        ..modals
    })
}

/// Flip the retention editor.
pub fn toggle_retention_modal(state: &LogsState) -> StatePatch {
    let modals = state.modal_opts;
    with_modals(ModalOpts {
        retention_open: !modals.retention_open,
        ..modals
    })
}

/// Open or close the save-filter form.
pub fn toggle_save_filter_modal(state: &LogsState, open: bool) -> StatePatch {
    with_modals(ModalOpts {
        save_filter_open: open,
        ..state.modal_opts
    })
}
