use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Cell, Paragraph, Row, Table},
    Frame,
};

use crate::app::App;
use crate::ui::{panel, theme, work_items};
use crate::util::format;

pub fn render(f: &mut Frame, area: Rect, app: &App) {
    let tasks = app.my_tasks();
    if tasks.is_empty() {
        let paragraph = Paragraph::new(vec![
            Line::raw(""),
            Line::styled("No tasks assigned to you", theme::muted()),
        ])
        .centered()
        .block(panel("My Tasks"));
        f.render_widget(paragraph, area);
        return;
    }

    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(6), Constraint::Length(9)])
        .split(area);
    let top = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(vertical[0]);

    let rows: Vec<Row> = tasks
        .iter()
        .enumerate()
        .map(|(i, t)| {
            let status = t.status_str();
            Row::new(vec![
                Cell::from(format::truncate(&t.title, 30)),
                Cell::from(Span::styled(
                    status.to_string(),
                    Style::default().fg(theme::status_color(status)),
                )),
                Cell::from(format::hours(t.estimated_hours)),
                Cell::from(format::hours(t.actual_hours)),
            ])
            .style(theme::selected(i == app.selected))
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Min(16),
            Constraint::Length(12),
            Constraint::Length(8),
            Constraint::Length(8),
        ],
    )
    .header(
        Row::new(vec!["Title", "Status", "Est.", "Actual"])
            .style(theme::label().add_modifier(Modifier::BOLD)),
    )
    .block(panel(&format!("My Tasks ({})", tasks.len())));
    f.render_widget(table, top[0]);

    work_items::render_detail(f, top[1], app, app.selected_my_task());
    render_history(f, vertical[1], app);
}

fn render_history(f: &mut Frame, area: Rect, app: &App) {
    let selected = app.selected_my_task().map(|t| t.id);
    let entries = match &app.progress_history {
        Some((id, entries)) if Some(*id) == selected => entries,
        _ => {
            let hint = Paragraph::new(Line::styled("Press h to load progress history", theme::muted()))
                .block(panel("Progress History"));
            f.render_widget(hint, area);
            return;
        }
    };

    if entries.is_empty() {
        let empty = Paragraph::new(Line::styled("No progress logged yet", theme::muted()))
            .block(panel("Progress History"));
        f.render_widget(empty, area);
        return;
    }

    let title = match app.history_task() {
        Some(task) => format!("Progress History: {}", format::truncate(&task.title, 30)),
        None => "Progress History".to_string(),
    };

    let rows: Vec<Row> = entries
        .iter()
        .rev()
        .map(|e| {
            Row::new(vec![
                Cell::from(format::date(Some(e.date))),
                Cell::from(format::hours(Some(e.hours_worked))),
                Cell::from(format!("{}%", format::number(Some(e.progress_percentage)))),
                Cell::from(e.notes.clone().unwrap_or_default()),
            ])
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Length(14),
            Constraint::Length(8),
            Constraint::Length(6),
            Constraint::Min(10),
        ],
    )
    .header(
        Row::new(vec!["Date", "Hours", "Done", "Notes"])
            .style(theme::label().add_modifier(Modifier::BOLD)),
    )
    .block(panel(&title));
    f.render_widget(table, area);
}
