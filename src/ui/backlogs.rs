use ratatui::{
    layout::{Constraint, Rect},
    style::{Modifier, Style},
    text::Span,
    widgets::{Cell, Row, Table},
    Frame,
};

use crate::app::App;
use crate::report;
use crate::ui::{panel, theme};
use crate::util::format;

pub fn render(f: &mut Frame, area: Rect, app: &App) {
    let projects = &app.snapshot.projects;
    let desc_width = area.width.saturating_sub(72).max(10) as usize;

    let rows: Vec<Row> = app
        .ranked_backlog()
        .into_iter()
        .enumerate()
        .map(|(i, b)| {
            let status = b.status.as_deref().unwrap_or("");
            Row::new(vec![
                Cell::from(Span::styled(
                    b.priority.to_string(),
                    Style::default().add_modifier(Modifier::BOLD),
                )),
                Cell::from(format::truncate(&b.title, 28)),
                Cell::from(format::truncate(report::project_name(projects, b.project_id), 16)),
                Cell::from(Span::styled(
                    status.to_string(),
                    Style::default().fg(theme::status_color(status)),
                )),
                Cell::from(Span::styled(
                    format::truncate(b.description.as_deref().unwrap_or(""), desc_width),
                    theme::muted(),
                )),
            ])
            .style(theme::selected(i == app.selected))
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Length(4),
            Constraint::Length(28),
            Constraint::Length(16),
            Constraint::Length(12),
            Constraint::Min(10),
        ],
    )
    .header(
        Row::new(vec!["#", "Title", "Project", "Status", "Description"])
            .style(theme::label().add_modifier(Modifier::BOLD)),
    )
    .block(panel("Product Backlog"));
    f.render_widget(table, area);
}
