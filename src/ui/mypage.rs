use crate::app::App;
use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem},
    Frame,
};

/// Render the my-page tabs; Enter opens the selected one on the web app
pub fn render(f: &mut Frame, app: &App, area: Rect) {
    let tabs = app.mypage_tabs();
    let items: Vec<ListItem> = if tabs.is_empty() {
        vec![ListItem::new("Log in to see your page")]
    } else {
        tabs.into_iter()
            .enumerate()
            .map(|(i, tab)| {
                let style = if i == app.selected_tab {
                    Style::default().bg(Color::DarkGray).fg(Color::White)
                } else {
                    Style::default()
                };
                ListItem::new(Line::from(vec![
                    Span::styled(tab.label, style),
                    Span::styled(format!("  {}", tab.path), Style::default().fg(Color::Gray)),
                ]))
            })
            .collect()
    };

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan))
            .title("My page"),
    );
    f.render_widget(list, area);
}
