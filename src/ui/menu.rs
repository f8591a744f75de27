use crate::app::App;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem},
    Frame,
};

/// Render the navigation menu with numbered shortcuts
pub fn render(f: &mut Frame, app: &App, area: Rect) {
    let current = app.current_path();
    let items: Vec<ListItem> = app
        .menu()
        .into_iter()
        .enumerate()
        .map(|(i, item)| {
            let active = item.link == current
                || (item.link != "/" && current.starts_with(item.link));
            let style = if active {
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };

            let mut spans = vec![
                Span::styled(format!("{} ", i + 1), Style::default().fg(Color::DarkGray)),
                Span::styled(item.label, style),
            ];
            if let Some(badge) = item.badge.filter(|n| *n > 0) {
                spans.push(Span::styled(
                    format!(" ({})", badge),
                    Style::default().fg(Color::Red),
                ));
            }
            ListItem::new(Line::from(spans))
        })
        .collect();

    let title = app
        .user()
        .map(|u| u.display_name().to_string())
        .unwrap_or_else(|| "Guest".to_string());
    let list = List::new(items).block(Block::default().borders(Borders::ALL).title(title));
    f.render_widget(list, area);
}
