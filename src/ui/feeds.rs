use crate::app::App;
use crate::feed::FeedItem;
use crate::util::{relative_time, truncate_to_width};
use chrono::Utc;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState},
    Frame,
};

/// Render the home feed panel
pub fn render(f: &mut Frame, app: &App, area: Rect) {
    let feeds = app.pager.feeds();
    let user_id = app.session.user_id();
    let text_width = area.width.saturating_sub(4) as usize;

    let mut items: Vec<ListItem> = feeds
        .iter()
        .enumerate()
        .map(|(i, item)| feed_item(item, i == app.selected_feed, user_id, text_width))
        .collect();

    // Footer row mirrors the pager state
    let footer = if app.pager.is_loading() {
        Some("Loading...")
    } else if feeds.is_empty() {
        Some("No posts yet")
    } else if !app.pager.has_more() {
        Some("No more posts")
    } else {
        None
    };
    if let Some(text) = footer {
        items.push(ListItem::new(Span::styled(
            text,
            Style::default().fg(Color::DarkGray),
        )));
    }

    let title = format!("{} ({})", app.pager.feed_type().label(), feeds.len());
    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan))
            .title(title),
    );

    let mut state = ListState::default().with_selected(Some(app.selected_feed));
    f.render_stateful_widget(list, area, &mut state);
}

fn feed_item<'a>(
    item: &'a FeedItem,
    selected: bool,
    user_id: Option<&str>,
    width: usize,
) -> ListItem<'a> {
    let base = if selected {
        Style::default().bg(Color::DarkGray).fg(Color::White)
    } else {
        Style::default()
    };

    let mut header = vec![Span::styled(
        item.author.as_deref().unwrap_or("unknown"),
        base.add_modifier(Modifier::BOLD),
    )];
    if let Some(created) = item.created_at {
        header.push(Span::styled(
            format!("  {}", relative_time(created, Utc::now())),
            base.fg(Color::Gray),
        ));
    }

    let liked = user_id.is_some_and(|u| item.is_liked_by(u));
    let (heart, heart_color) = if liked {
        ("♥", Color::Red)
    } else {
        ("♡", Color::Gray)
    };

    let body = item.content.lines().next().unwrap_or_default();
    ListItem::new(vec![
        Line::from(header),
        Line::from(Span::styled(
            truncate_to_width(body, width).into_owned(),
            base,
        )),
        Line::from(vec![
            Span::styled(format!("{} ", heart), base.fg(heart_color)),
            Span::styled(item.likes.len().to_string(), base),
        ]),
    ])
}
