use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
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
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    render_utilization(f, vertical[0], app);
    render_project_status(f, vertical[1], app);
}

fn percent_cell(pct: i64) -> Cell<'static> {
    Cell::from(Span::styled(
        format!("{pct}%"),
        Style::default().fg(theme::percent_color(pct)),
    ))
}

fn render_utilization(f: &mut Frame, area: Rect, app: &App) {
    let rows: Vec<Row> = app
        .snapshot
        .utilization
        .iter()
        .map(|u| {
            Row::new(vec![
                Cell::from(u.name.clone().unwrap_or_default()),
                Cell::from(u.email.clone()),
                Cell::from(u.total_tasks.to_string()),
                Cell::from(format::number(u.total_estimated_hours)),
                Cell::from(format::number(u.total_actual_hours)),
                percent_cell(report::utilization_percent(u)),
            ])
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Length(20),
            Constraint::Min(20),
            Constraint::Length(6),
            Constraint::Length(10),
            Constraint::Length(10),
            Constraint::Length(12),
        ],
    )
    .header(
        Row::new(vec!["Name", "Email", "Tasks", "Est. Hrs", "Act. Hrs", "Utilization"])
            .style(theme::label().add_modifier(Modifier::BOLD)),
    )
    .block(panel("Team Utilization Report  (u: export CSV)"));
    f.render_widget(table, area);
}

fn render_project_status(f: &mut Frame, area: Rect, app: &App) {
    let rows: Vec<Row> = app
        .snapshot
        .project_status
        .iter()
        .map(|p| {
            let status = p.status.as_deref().unwrap_or("");
            Row::new(vec![
                Cell::from(p.name.clone().unwrap_or_else(|| "Unnamed".into())),
                Cell::from(Span::styled(
                    status.to_string(),
                    Style::default().fg(theme::project_status_color(status)),
                )),
                Cell::from(p.total_work_items.unwrap_or(0).to_string()),
                Cell::from(p.completed_items.unwrap_or(0).to_string()),
                Cell::from(p.in_progress_items.map_or_else(|| "-".into(), |n| n.to_string())),
                Cell::from(format::number(p.total_estimated_hours)),
                Cell::from(format::number(p.total_actual_hours)),
                percent_cell(report::completion_percent(p)),
            ])
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Min(16),
            Constraint::Length(11),
            Constraint::Length(6),
            Constraint::Length(10),
            Constraint::Length(12),
            Constraint::Length(10),
            Constraint::Length(10),
            Constraint::Length(11),
        ],
    )
    .header(
        Row::new(vec![
            "Project",
            "Status",
            "Items",
            "Completed",
            "In Progress",
            "Est. Hrs",
            "Act. Hrs",
            "Completion",
        ])
        .style(theme::label().add_modifier(Modifier::BOLD)),
    )
    .block(panel("Project Status Report  (p: export CSV)"));
    f.render_widget(table, area);
}
