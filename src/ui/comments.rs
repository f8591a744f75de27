use crate::app::{App, CommentPane, Compose};
use crate::util::{display_width, truncate_to_width};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};

/// Height of the composer box, borders included.
const COMPOSER_HEIGHT: u16 = 3;

/// Render the comment thread of the open feed, with the composer below it
pub fn render(f: &mut Frame, app: &App, area: Rect) {
    let Some(pane) = app.comments.as_ref() else {
        return;
    };

    let (list_area, composer_area) = match pane.compose {
        Some(_) => {
            let rows = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Min(0), Constraint::Length(COMPOSER_HEIGHT)])
                .split(area);
            (rows[0], Some(rows[1]))
        }
        None => (area, None),
    };

    render_thread(f, pane, list_area);
    if let (Some(compose), Some(area)) = (pane.compose, composer_area) {
        render_composer(f, pane, compose, area);
    }
}

fn render_thread(f: &mut Frame, pane: &CommentPane, area: Rect) {
    let rows = pane.thread.rows();
    let text_width = area.width.saturating_sub(4) as usize;

    let items: Vec<ListItem> = if rows.is_empty() {
        vec![ListItem::new(Span::styled(
            "No comments yet",
            Style::default().fg(Color::DarkGray),
        ))]
    } else {
        rows.iter()
            .enumerate()
            .map(|(i, comment)| {
                let base = if i == pane.selected {
                    Style::default().bg(Color::DarkGray).fg(Color::White)
                } else {
                    Style::default()
                };
                let indent = if comment.parent_comment_id.is_some() {
                    "  ↳ "
                } else {
                    ""
                };
                let author = comment.author_name();
                let used = display_width(indent) + display_width(author) + 2;
                ListItem::new(Line::from(vec![
                    Span::styled(indent, base.fg(Color::Gray)),
                    Span::styled(author, base.add_modifier(Modifier::BOLD)),
                    Span::styled(": ", base),
                    Span::styled(
                        truncate_to_width(&comment.content, text_width.saturating_sub(used))
                            .into_owned(),
                        base,
                    ),
                ]))
            })
            .collect()
    };

    let mut title = format!("Comments on #{}", pane.feed_id);
    if pane.busy {
        title.push_str(" (saving...)");
    }
    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan))
            .title(title),
    );
    let mut state = ListState::default().with_selected(Some(pane.selected));
    f.render_stateful_widget(list, area, &mut state);
}

fn render_composer(f: &mut Frame, pane: &CommentPane, compose: Compose, area: Rect) {
    let title = match compose {
        Compose::Comment => "New comment",
        Compose::Reply { .. } => "Reply",
        Compose::Edit { .. } => "Edit comment",
    };
    let input = Paragraph::new(format!("{}_", pane.draft)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Yellow))
            .title(title),
    );
    f.render_widget(input, area);
}
