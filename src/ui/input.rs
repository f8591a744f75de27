//! Input handling for the TUI.
//!
//! This module processes keyboard input and dispatches to the appropriate
//! handler based on the current view.

use crate::app::{App, AppEvent, View};
use crate::nav::{web_link, MenuTarget};
use anyhow::Result;
use crossterm::event::{KeyCode, KeyModifiers};
use tokio::sync::mpsc;

use super::helpers::{spawn_comment_job, spawn_like_save, start_batch_load, start_queue_load};
use super::Action;

pub(super) fn handle_input(
    app: &mut App,
    code: KeyCode,
    modifiers: KeyModifiers,
    event_tx: &mpsc::Sender<AppEvent>,
) -> Result<Action> {
    if modifiers.contains(KeyModifiers::CONTROL) && code == KeyCode::Char('c') {
        return Ok(Action::Quit);
    }

    // The composer takes every key while it is open
    if app.view == View::Comments && app.comments.as_ref().is_some_and(|p| p.compose.is_some()) {
        handle_compose(app, code, event_tx);
        return Ok(Action::Continue);
    }

    match code {
        KeyCode::Char('q') => return Ok(Action::Quit),
        KeyCode::Esc => app.show_view(View::Home),
        KeyCode::Char('j') | KeyCode::Down => {
            app.nav_down();
            if app.view == View::Home && app.wants_more() {
                load_more(app, event_tx);
            }
        }
        KeyCode::Char('k') | KeyCode::Up => app.nav_up(),
        KeyCode::Char(c @ '1'..='9') => {
            let index = c as usize - '1' as usize;
            if let Some(item) = app.menu().get(index) {
                activate_menu(app, item.target, item.link);
            }
        }
        KeyCode::Tab if app.view == View::Home => {
            if let Some(request) = app.toggle_feed_type() {
                start_queue_load(app, request, event_tx);
            }
        }
        KeyCode::Char('r') => {
            let request = app.request_refresh();
            app.set_status("Reloading feed...");
            start_queue_load(app, request, event_tx);
        }
        KeyCode::Char('l') if app.view == View::Home => handle_like(app, event_tx),
        KeyCode::Char('c') if app.view == View::Home => app.open_comments(),
        KeyCode::Char('n') if app.view == View::Comments => app.compose_comment(),
        KeyCode::Char('y') if app.view == View::Comments => app.compose_reply(),
        KeyCode::Char('e') if app.view == View::Comments => app.compose_edit(),
        KeyCode::Char('d') if app.view == View::Comments => {
            if let Some(job) = app.delete_selected_comment() {
                spawn_comment_job(job, event_tx.clone());
            }
        }
        KeyCode::Enter if app.view == View::MyPage => {
            if let Some(tab) = app.mypage_tabs().get(app.selected_tab) {
                open_in_browser(app, &tab.path);
            }
        }
        KeyCode::Char('o') => {
            let path = app.current_path();
            open_in_browser(app, &path);
        }
        KeyCode::Char('x') if app.session.is_logged_in() => {
            if let Some(request) = app.logout()? {
                start_queue_load(app, request, event_tx);
            }
        }
        _ => {}
    }
    Ok(Action::Continue)
}

/// Request the next batch; a no-op while loading or after the last page.
pub(super) fn load_more(app: &mut App, event_tx: &mpsc::Sender<AppEvent>) {
    if let Some(request) = app.request_append() {
        tracing::debug!(remaining = request.queue.len(), "Loading more feeds");
        start_batch_load(app, request, event_tx);
    }
}

fn handle_compose(app: &mut App, code: KeyCode, event_tx: &mpsc::Sender<AppEvent>) {
    match code {
        KeyCode::Esc => app.cancel_compose(),
        KeyCode::Enter => {
            if let Some(job) = app.submit_compose() {
                spawn_comment_job(job, event_tx.clone());
            }
        }
        KeyCode::Backspace => app.compose_pop(),
        KeyCode::Char(c) => app.compose_push(c),
        _ => {}
    }
}

fn handle_like(app: &mut App, event_tx: &mpsc::Sender<AppEvent>) {
    if let Some((toggle, user_id)) = app.like_selected() {
        spawn_like_save(app.source.clone(), toggle, user_id, event_tx.clone());
    }
}

/// Screens the TUI shows itself; everything else opens the web app.
fn activate_menu(app: &mut App, target: MenuTarget, link: &str) {
    match target {
        MenuTarget::Home => app.show_view(View::Home),
        MenuTarget::Notifications => app.show_view(View::Notifications),
        MenuTarget::MyPage => app.show_view(View::MyPage),
        MenuTarget::Search | MenuTarget::Write | MenuTarget::Chat => open_in_browser(app, link),
    }
}

fn open_in_browser(app: &mut App, path: &str) {
    match web_link(&app.config.web_base_url, path) {
        Ok(url) => {
            if let Err(e) = open::that(url.as_str()) {
                app.set_error(format!("Failed to open browser: {}", e));
            } else {
                app.set_status(format!("Opened {}", url));
            }
        }
        Err(e) => app.set_error(e.to_string()),
    }
}
