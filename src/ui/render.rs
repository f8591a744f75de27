//! Render functions for the TUI.
//!
//! This module handles all rendering logic, dispatching to the appropriate
//! view based on application state.

use crate::app::{App, View};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout},
    widgets::Paragraph,
    Frame,
};

use super::{comments, feeds, inbox, menu, mypage, status};

/// Minimum terminal dimensions required for normal operation.
pub(super) const MIN_WIDTH: u16 = 60;
pub(super) const MIN_HEIGHT: u16 = 10;

/// Width of the navigation column.
const MENU_WIDTH: u16 = 22;

/// Main render dispatch function.
///
/// Routes to the appropriate view renderer based on current application state.
/// Handles terminal size validation before rendering.
pub(super) fn render(f: &mut Frame, app: &App) {
    let area = f.area();

    // Guard against zero-width/height to prevent panics
    if area.width < 1 || area.height < 1 {
        return;
    }

    if area.width < MIN_WIDTH || area.height < MIN_HEIGHT {
        let msg = if area.height < 3 || area.width < 20 {
            Paragraph::new("Too small")
        } else {
            Paragraph::new(format!(
                "Terminal too small\n\nMinimum: {}x{}\nCurrent: {}x{}",
                MIN_WIDTH, MIN_HEIGHT, area.width, area.height
            ))
            .alignment(Alignment::Center)
        };
        f.render_widget(msg, area);
        return;
    }

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(area);
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(MENU_WIDTH), Constraint::Min(0)])
        .split(rows[0]);

    menu::render(f, app, columns[0]);
    match app.view {
        View::Home => feeds::render(f, app, columns[1]),
        View::Notifications => inbox::render(f, app, columns[1]),
        View::MyPage => mypage::render(f, app, columns[1]),
        View::Comments => comments::render(f, app, columns[1]),
    }
    status::render(f, app, rows[1]);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::feed::{Batch, FeedItem, MockFeedSource, BATCH_LIMIT};
    use crate::session::{CurrentUser, Session};
    use ratatui::{backend::TestBackend, Terminal};
    use std::sync::Arc;

    fn draw(app: &App, width: u16, height: u16) -> String {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal.draw(|f| render(f, app)).unwrap();
        let buffer = terminal.backend().buffer().clone();
        buffer
            .content()
            .chunks(width as usize)
            .map(|row| row.iter().map(|c| c.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn app() -> App {
        App::new(
            Config::default(),
            Session::ephemeral(Some(CurrentUser::new("u1"))),
            Arc::new(MockFeedSource::new()),
        )
    }

    #[test]
    fn test_small_terminal_message() {
        assert!(draw(&app(), 40, 8).contains("Terminal too small"));
    }

    #[test]
    fn test_home_shows_feed_and_end_marker() {
        let mut app = app();
        let request = app.request_refresh();
        let batch = app.apply_queue(request.generation, vec![1]).unwrap();
        let mut item = FeedItem::new(1);
        item.author = Some("mina".into());
        item.content = "hello world".into();
        app.apply_batch(
            &batch,
            Batch {
                items: vec![item],
                has_more: false,
                consumed: BATCH_LIMIT,
            },
        );

        let screen = draw(&app, 80, 20);
        assert!(screen.contains("mina"));
        assert!(screen.contains("hello world"));
        assert!(screen.contains("No more posts"));
        assert!(screen.contains("All feeds (1)"));
    }

    #[test]
    fn test_loading_marker_while_queue_pending() {
        let mut app = app();
        app.request_refresh();
        assert!(draw(&app, 80, 20).contains("Loading..."));
    }

    #[test]
    fn test_comment_pane_shows_thread_and_composer() {
        let mut app = app();
        let request = app.request_refresh();
        let batch = app.apply_queue(request.generation, vec![3]).unwrap();
        let mut item = FeedItem::new(3);
        item.payload = serde_json::json!({
            "Comments": [
                {
                    "id": 1,
                    "user_id": "u1",
                    "content": "nice shot",
                    "User": { "username": "mina" }
                },
                { "id": 2, "user_id": "u2", "content": "thanks", "parent_comment_id": 1 }
            ]
        })
        .as_object()
        .cloned()
        .unwrap();
        app.apply_batch(
            &batch,
            Batch {
                items: vec![item],
                has_more: false,
                consumed: BATCH_LIMIT,
            },
        );
        app.open_comments();
        app.compose_comment();
        app.compose_push('h');

        let screen = draw(&app, 80, 20);
        assert!(screen.contains("Comments on #3"));
        assert!(screen.contains("mina: nice shot"));
        assert!(screen.contains("↳ Anonymous: thanks"));
        assert!(screen.contains("New comment"));
        assert!(screen.contains("h_"));
        assert!(screen.contains("[Enter]send"));
    }
}
