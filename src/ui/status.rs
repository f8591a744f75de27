use crate::app::{App, View};
use crate::notifications::Severity;
use ratatui::{
    layout::Rect,
    style::{Color, Style},
    widgets::Paragraph,
    Frame,
};
use std::borrow::Cow;

/// Render the status bar
pub fn render(f: &mut Frame, app: &App, area: Rect) {
    // Guard against zero-width/height areas
    if area.width < 1 || area.height < 1 {
        return;
    }

    let (text, bg): (Cow<'_, str>, Color) = match &app.toast {
        Some(toast) => {
            let bg = match toast.severity {
                Severity::Success => Color::Green,
                Severity::Error => Color::Red,
                Severity::Custom => Color::DarkGray,
            };
            (Cow::Borrowed(toast.message.as_str()), bg)
        }
        None => {
            let composing = app.comments.as_ref().is_some_and(|p| p.compose.is_some());
            let hints = match app.view {
                View::Home => {
                    "[j/k]scroll [Tab]all/following [l]ike [c]omments [r]eload [o]pen [1-6]menu [q]uit"
                }
                View::Notifications => "[j/k]scroll [Esc]home [1-6]menu [q]uit",
                View::MyPage => "[j/k]select [Enter]open [x]logout [Esc]home [q]uit",
                View::Comments if composing => "[Enter]send [Esc]cancel",
                View::Comments => "[j/k]select [n]ew [y]reply [e]dit [d]elete [Esc]home [q]uit",
            };
            (Cow::Borrowed(hints), Color::DarkGray)
        }
    };

    let paragraph = Paragraph::new(text).style(Style::default().bg(bg).fg(Color::White));
    f.render_widget(paragraph, area);
}
