use ratatui::{
    layout::{Constraint, Rect},
    style::{Modifier, Style},
    text::Span,
    widgets::{Cell, Row, Table},
    Frame,
};

use crate::app::App;
use crate::ui::{panel, theme};
use crate::util::format;

pub fn render(f: &mut Frame, area: Rect, app: &App) {
    let desc_width = area.width.saturating_sub(70).max(10) as usize;

    let rows: Vec<Row> = app
        .snapshot
        .projects
        .iter()
        .enumerate()
        .map(|(i, p)| {
            let status = p.status.as_deref().unwrap_or("");
            Row::new(vec![
                Cell::from(p.name.clone()),
                Cell::from(Span::styled(
                    status.to_string(),
                    Style::default().fg(theme::project_status_color(status)),
                )),
                Cell::from(format::date(p.start_date)),
                Cell::from(format::date(p.end_date)),
                Cell::from(Span::styled(
                    format::truncate(p.description.as_deref().unwrap_or(""), desc_width),
                    theme::muted(),
                )),
            ])
            .style(theme::selected(i == app.selected))
        })
        .collect();

    let title = if app.loading {
        "Projects (loading...)"
    } else {
        "Projects"
    };

    let table = Table::new(
        rows,
        [
            Constraint::Length(24),
            Constraint::Length(11),
            Constraint::Length(14),
            Constraint::Length(14),
            Constraint::Min(10),
        ],
    )
    .header(
        Row::new(vec!["Name", "Status", "Start", "End", "Description"])
            .style(theme::label().add_modifier(Modifier::BOLD)),
    )
    .block(panel(title));
    f.render_widget(table, area);
}
