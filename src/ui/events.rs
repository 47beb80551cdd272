//! Background task event handling.
//!
//! Fetch completions and task panics arrive here on the UI loop, which is the
//! only place application state is mutated.

use crate::app::{App, AppEvent};

/// Apply one background event to the application state.
pub(super) fn handle_app_event(app: &mut App, event: AppEvent) {
    match event {
        AppEvent::PostsFetched(result) => app.apply_fetch_result(result),
        AppEvent::TaskPanicked { task, error } => app.task_panicked(task, &error),
    }
    app.needs_redraw = true;
}
