use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Bar, BarChart, BarGroup, Cell, Paragraph, Row, Table},
    Frame,
};

use crate::app::App;
use crate::report::{self, DashboardStats};
use crate::ui::{panel, theme};
use crate::util::format;

pub fn render(f: &mut Frame, area: Rect, app: &App) {
    let snapshot = &app.snapshot;
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),
            Constraint::Min(10),
            Constraint::Length(8),
        ])
        .split(area);

    let stats = report::dashboard_stats(
        &snapshot.projects,
        &snapshot.work_items,
        &snapshot.utilization,
    );
    render_stats(f, rows[0], &stats, app.loading);

    let charts = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(rows[1]);
    render_status_chart(f, charts[0], app);
    render_project_progress(f, charts[1], app);
    render_utilization(f, rows[2], app);
}

fn render_stats(f: &mut Frame, area: Rect, stats: &DashboardStats, loading: bool) {
    let cards = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 4); 4])
        .split(area);

    let values = [
        ("Total Projects", stats.projects, Color::Blue),
        ("Work Items", stats.work_items, Color::Green),
        ("In Progress", stats.in_progress, Color::Yellow),
        ("Team Members", stats.team_members, Color::Magenta),
    ];

    for (card, (title, value, color)) in cards.iter().zip(values) {
        let text = if loading {
            "…".to_string()
        } else {
            value.to_string()
        };
        let paragraph = Paragraph::new(Line::from(Span::styled(
            text,
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )))
        .block(panel(title));
        f.render_widget(paragraph, *card);
    }
}

fn render_status_chart(f: &mut Frame, area: Rect, app: &App) {
    let counts = report::status_distribution(&app.snapshot.work_items);
    if counts.is_empty() {
        let empty = Paragraph::new(Line::styled("No work items yet", theme::muted()))
            .block(panel("Work Item Status Distribution"));
        f.render_widget(empty, area);
        return;
    }

    let bars: Vec<Bar> = counts
        .iter()
        .enumerate()
        .map(|(i, c)| {
            Bar::default()
                .value(c.value)
                .label(Line::from(c.name.clone()))
                .style(Style::default().fg(theme::CHART[i % theme::CHART.len()]))
        })
        .collect();

    let width = area.width.saturating_sub(2) / (bars.len() as u16).max(1);
    let chart = BarChart::default()
        .block(panel("Work Item Status Distribution"))
        .data(BarGroup::default().bars(&bars))
        .bar_width(width.saturating_sub(1).clamp(3, 12))
        .bar_gap(1);
    f.render_widget(chart, area);
}

fn render_project_progress(f: &mut Frame, area: Rect, app: &App) {
    let progress = report::project_progress(&app.snapshot.project_status);
    if progress.is_empty() {
        let empty = Paragraph::new(Line::styled("No projects yet", theme::muted()))
            .block(panel("Project Completion"));
        f.render_widget(empty, area);
        return;
    }

    let bars: Vec<Bar> = progress
        .iter()
        .map(|p| {
            Bar::default()
                .value(p.completion.max(0) as u64)
                .label(Line::from(p.name.clone()))
                .text_value(format!("{}%", p.completion))
                .style(Style::default().fg(Color::Green))
        })
        .collect();

    let chart = BarChart::default()
        .block(panel("Project Completion"))
        .direction(Direction::Horizontal)
        .data(BarGroup::default().bars(&bars))
        .bar_width(1)
        .bar_gap(0)
        .max(100);
    f.render_widget(chart, area);
}

fn render_utilization(f: &mut Frame, area: Rect, app: &App) {
    let rows: Vec<Row> = app
        .snapshot
        .utilization
        .iter()
        .map(|u| {
            let pct = report::utilization_percent(u);
            Row::new(vec![
                Cell::from(u.name.clone().unwrap_or_else(|| u.email.clone())),
                Cell::from(u.total_tasks.to_string()),
                Cell::from(format::number(u.total_estimated_hours)),
                Cell::from(format::number(u.total_actual_hours)),
                Cell::from(Span::styled(
                    format!("{pct}%"),
                    Style::default().fg(theme::percent_color(pct)),
                )),
            ])
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Min(20),
            Constraint::Length(7),
            Constraint::Length(10),
            Constraint::Length(10),
            Constraint::Length(12),
        ],
    )
    .header(
        Row::new(vec!["Team Member", "Tasks", "Est. Hrs", "Act. Hrs", "Utilization"])
            .style(theme::label().add_modifier(Modifier::BOLD)),
    )
    .block(panel("Team Utilization"));
    f.render_widget(table, area);
}
