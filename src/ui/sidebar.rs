use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{List, ListItem, Paragraph},
    Frame,
};

use crate::app::{App, View};
use crate::ui::{panel, theme};

pub fn render(f: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(9), Constraint::Length(4)])
        .split(area);

    let items: Vec<ListItem> = View::ALL
        .iter()
        .enumerate()
        .map(|(i, view)| {
            let active = *view == app.view;
            let marker = if active { "▶ " } else { "  " };
            let style = if active {
                Style::default()
                    .fg(theme::ACCENT)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            ListItem::new(Line::from(vec![
                Span::styled(format!("{} ", i + 1), theme::muted()),
                Span::styled(format!("{marker}{}", view.label()), style),
            ]))
        })
        .collect();

    f.render_widget(List::new(items).block(panel("DevTrack")), chunks[0]);

    let mut lines = Vec::new();
    if let Some(session) = &app.session {
        let user = &session.user;
        lines.push(Line::from(vec![
            Span::styled(
                format!(" {} ", user.initial()),
                Style::default().fg(Color::Black).bg(theme::ACCENT),
            ),
            Span::raw(" "),
            Span::styled(
                user.display_name().to_string(),
                Style::default().add_modifier(Modifier::BOLD),
            ),
        ]));
        lines.push(Line::styled(
            user.role.clone().unwrap_or_default(),
            theme::muted(),
        ));
    }

    f.render_widget(Paragraph::new(lines).block(panel("User")), chunks[1]);
}
