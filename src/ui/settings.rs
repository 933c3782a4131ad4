use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Paragraph, Wrap},
    Frame,
};

use crate::app::App;
use crate::ui::{panel, theme};

pub fn render(f: &mut Frame, area: Rect, app: &App) {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(7), Constraint::Min(4)])
        .split(area);

    let mut lines = Vec::new();
    match &app.azure {
        Some(config) => {
            lines.push(Line::from(vec![
                Span::styled("Organization URL: ", theme::label()),
                Span::raw(config.organization_url.clone()),
            ]));
            lines.push(Line::from(vec![
                Span::styled("Project name: ", theme::label()),
                Span::raw(config.project_name.clone()),
            ]));
            lines.push(Line::from(vec![
                Span::styled("Access token: ", theme::label()),
                Span::styled("stored", theme::muted()),
            ]));
        }
        None => lines.push(Line::styled("Azure DevOps is not configured", theme::muted())),
    }
    lines.push(Line::raw(""));
    lines.push(Line::styled("c: configure   s: sync now", theme::muted()));

    f.render_widget(
        Paragraph::new(lines).block(panel("Azure DevOps Integration")),
        vertical[0],
    );

    let about = vec![
        Line::raw("Sync pulls backlog items, features, bugs and tasks from the configured Azure DevOps project."),
        Line::raw("Existing items are matched by their Azure id and updated in place."),
    ];
    f.render_widget(
        Paragraph::new(about)
            .wrap(Wrap { trim: true })
            .block(panel("About Sync")),
        vertical[1],
    );
}
