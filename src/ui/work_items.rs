use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Cell, Paragraph, Row, Table, Wrap},
    Frame,
};

use crate::app::App;
use crate::model::work_item::WorkItem;
use crate::report;
use crate::ui::{panel, theme};
use crate::util::format;

pub fn render(f: &mut Frame, area: Rect, app: &App) {
    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
        .split(area);

    render_table(f, horizontal[0], app);
    render_detail(f, horizontal[1], app, app.selected_work_item());
}

fn render_table(f: &mut Frame, area: Rect, app: &App) {
    let projects = &app.snapshot.projects;
    let rows: Vec<Row> = app
        .snapshot
        .work_items
        .iter()
        .enumerate()
        .map(|(i, w)| {
            let priority = w.priority.as_deref().unwrap_or("");
            let status = w.status_str();
            Row::new(vec![
                Cell::from(format::truncate(&w.title, 28)),
                Cell::from(format::truncate(report::project_name(projects, w.project_id), 14)),
                Cell::from(w.kind.clone().unwrap_or_default()),
                Cell::from(Span::styled(
                    priority.to_string(),
                    Style::default().fg(theme::priority_color(priority)),
                )),
                Cell::from(Span::styled(
                    status.to_string(),
                    Style::default().fg(theme::status_color(status)),
                )),
                Cell::from(format::truncate(
                    w.assigned_to.as_deref().unwrap_or("Unassigned"),
                    22,
                )),
                Cell::from(format::hours(w.estimated_hours)),
            ])
            .style(theme::selected(i == app.selected))
        })
        .collect();

    let title = if app.loading {
        "Work Items (loading...)"
    } else {
        "Work Items"
    };

    let table = Table::new(
        rows,
        [
            Constraint::Min(16),
            Constraint::Length(14),
            Constraint::Length(8),
            Constraint::Length(9),
            Constraint::Length(12),
            Constraint::Length(22),
            Constraint::Length(6),
        ],
    )
    .header(
        Row::new(vec!["Title", "Project", "Type", "Priority", "Status", "Assignee", "Est."])
            .style(theme::label().add_modifier(Modifier::BOLD)),
    )
    .block(panel(title));
    f.render_widget(table, area);
}

/// Key/value detail for one work item. Shared with the My Tasks view.
pub fn render_detail(f: &mut Frame, area: Rect, app: &App, item: Option<&WorkItem>) {
    let Some(item) = item else {
        f.render_widget(panel("Details"), area);
        return;
    };

    let field = |label: &str, value: String| {
        Line::from(vec![
            Span::styled(format!("{label}: "), theme::label()),
            Span::raw(value),
        ])
    };

    let mut lines = vec![
        Line::styled(
            item.title.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Line::raw(""),
        field(
            "Project",
            report::project_name(&app.snapshot.projects, item.project_id).to_string(),
        ),
        field("Assigned", item.assigned_to.clone().unwrap_or_else(|| "Unassigned".into())),
        field("Size", item.t_shirt_size.clone().unwrap_or_else(|| "-".into())),
        field("Start", format::date(item.start_date)),
        field("End", format::date(item.end_date)),
        field("Estimated", format::hours(item.estimated_hours)),
        field("Actual", format::hours(item.actual_hours)),
    ];

    if let Some(ado) = &item.ado_id {
        lines.push(field("Azure ID", ado.clone()));
    }

    if let Some(desc) = item.description.as_deref().filter(|d| !d.is_empty()) {
        lines.push(Line::raw(""));
        lines.push(Line::raw(format::truncate(desc, 300)));
    }

    let paragraph = Paragraph::new(lines)
        .block(panel("Details"))
        .wrap(Wrap { trim: true });
    f.render_widget(paragraph, area);
}
