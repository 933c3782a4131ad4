use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::app::{App, View};

pub fn render(f: &mut Frame, area: Rect, app: &App) {
    let mut spans = Vec::new();

    if app.confirm.is_some() {
        spans.push(hint("y", "confirm"));
        spans.push(hint("any", "cancel"));
    } else if app.form.is_some() {
        spans.push(hint("tab", "next"));
        spans.push(hint("enter", "submit"));
        if app.session.is_some() {
            spans.push(hint("esc", "cancel"));
        }
        spans.push(hint("ctrl+c", "quit"));
    } else {
        spans.push(hint("tab/1-7", "view"));
        match app.view {
            View::Projects | View::WorkItems | View::Backlogs => {
                spans.push(hint("↑↓", "navigate"));
                spans.push(hint("n", "new"));
                spans.push(hint("e", "edit"));
                if app.view != View::Projects {
                    spans.push(hint("D", "delete"));
                }
            }
            View::MyTasks => {
                spans.push(hint("↑↓", "navigate"));
                spans.push(hint("l", "log progress"));
                spans.push(hint("h", "history"));
            }
            View::Reports => {
                spans.push(hint("u", "export utilization"));
                spans.push(hint("p", "export projects"));
            }
            View::Settings => {
                spans.push(hint("c", "configure"));
                spans.push(hint("s", "sync"));
            }
            View::Dashboard => {}
        }
        spans.push(hint("r", "refresh"));
        spans.push(hint("ctrl+l", "logout"));
        spans.push(hint("q", "quit"));
    }

    if app.loading {
        spans.push(Span::raw("  "));
        spans.push(Span::styled(
            " LOADING ",
            Style::default().fg(Color::Black).bg(Color::Yellow),
        ));
    }

    // Flash message
    if let Some((msg, _)) = &app.flash_message {
        spans.push(Span::raw("  "));
        spans.push(Span::styled(msg, Style::default().fg(Color::Yellow)));
    }

    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn hint(key: &str, desc: &str) -> Span<'static> {
    Span::styled(
        format!(" {key}:{desc} "),
        Style::default().fg(Color::DarkGray),
    )
}
