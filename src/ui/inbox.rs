use crate::app::App;
use crate::util::time_since;
use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState},
    Frame,
};

/// Render received notifications, newest last
pub fn render(f: &mut Frame, app: &App, area: Rect) {
    let notifications = app.inbox.items();
    let items: Vec<ListItem> = if notifications.is_empty() {
        vec![ListItem::new("No notifications")]
    } else {
        notifications
            .iter()
            .enumerate()
            .map(|(i, n)| {
                let style = if i == app.selected_notification {
                    Style::default().bg(Color::DarkGray).fg(Color::White)
                } else {
                    Style::default()
                };
                let mut spans = vec![Span::styled(n.message.as_str(), style)];
                if let Some(ago) = n.created_at.as_deref().and_then(time_since) {
                    spans.push(Span::styled(
                        format!("  {}", ago),
                        Style::default().fg(Color::Gray),
                    ));
                }
                ListItem::new(Line::from(spans))
            })
            .collect()
    };

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan))
            .title("Notifications"),
    );
    let mut state = ListState::default().with_selected(Some(app.selected_notification));
    f.render_stateful_widget(list, area, &mut state);
}
