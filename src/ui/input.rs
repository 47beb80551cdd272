//! Input handling for the TUI.
//!
//! Key presses are resolved to actions through the keybinding registry and
//! dispatched by screen. While the tile dialog or the help overlay is up,
//! it captures every key.

use crate::app::{App, AppEvent, View};
use crate::keybindings::{Action as KbAction, Context as KbContext};
use anyhow::Result;
use crossterm::event::{KeyCode, KeyModifiers};
use tokio::sync::mpsc;

use super::Action;

/// Keybinding context for the current screen state.
fn current_context(app: &App) -> KbContext {
    if app.is_dialog_open() {
        return KbContext::TileDialog;
    }
    match app.view {
        View::List => KbContext::PostList,
        View::Detail => KbContext::Detail,
    }
}

/// Main input dispatch function.
pub(super) fn handle_input(
    app: &mut App,
    code: KeyCode,
    modifiers: KeyModifiers,
    event_tx: &mpsc::Sender<AppEvent>,
) -> Result<Action> {
    if app.show_help {
        return Ok(handle_help_input(app, code));
    }

    let context = current_context(app);
    let action = app.keybindings.action_for_key(code, modifiers, context);

    match (context, action) {
        (_, None) => {}
        (_, Some(KbAction::Quit)) => return Ok(Action::Quit),
        (KbContext::TileDialog, Some(action)) => handle_dialog_action(app, action)?,
        (KbContext::Detail, Some(action)) => handle_detail_action(app, action)?,
        (_, Some(action)) => handle_list_action(app, action, event_tx),
    }
    Ok(Action::Continue)
}

/// Handle input while the help overlay is visible.
///
/// Captures all keys: j/k/Up/Down scroll, Esc/q/? dismiss.
fn handle_help_input(app: &mut App, code: KeyCode) -> Action {
    match code {
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('?') => {
            app.show_help = false;
            app.help_scroll_offset = 0;
        }
        KeyCode::Char('j') | KeyCode::Down => {
            app.help_scroll_offset = app
                .help_scroll_offset
                .saturating_add(1)
                .min(app.help_max_scroll);
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.help_scroll_offset = app.help_scroll_offset.saturating_sub(1);
        }
        _ => {}
    }
    Action::Continue
}

fn handle_shared_action(app: &mut App, action: KbAction) {
    match action {
        KbAction::ShowHelp => {
            app.show_help = true;
            app.help_scroll_offset = 0;
        }
        KbAction::CycleTheme => {
            let name = app.cycle_theme();
            app.set_status(format!("Theme: {}", name));
        }
        KbAction::NavDown => app.nav_down(),
        KbAction::NavUp => app.nav_up(),
        _ => {}
    }
}

fn handle_list_action(app: &mut App, action: KbAction, event_tx: &mpsc::Sender<AppEvent>) {
    match action {
        KbAction::Select => {
            if !app.enter_detail() {
                app.set_status("No post selected");
            }
        }
        KbAction::Refresh => {
            tracing::info!(endpoint = %app.fetcher.endpoint(), "Refreshing posts");
            app.fetch_posts(event_tx);
        }
        other => handle_shared_action(app, other),
    }
}

fn handle_detail_action(app: &mut App, action: KbAction) -> Result<()> {
    match action {
        KbAction::Back => app.exit_detail(),
        KbAction::Select => app.open_tile_dialog(None)?,
        KbAction::PickTile(index) => app.open_tile_dialog(Some(index))?,
        other => handle_shared_action(app, other),
    }
    Ok(())
}

fn handle_dialog_action(app: &mut App, action: KbAction) -> Result<()> {
    match action {
        KbAction::DraftPrev => app.move_draft(-1),
        KbAction::DraftNext => app.move_draft(1),
        KbAction::ChooseLabel => app.choose_tile_label()?,
        KbAction::DismissDialog => app.dismiss_tile_dialog(),
        _ => {}
    }
    Ok(())
}
