use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::app::form::{FieldKind, Form, FormKind};
use crate::ui::{centered, theme};

const LABEL_WIDTH: usize = 22;

/// Draws `form` as a modal centered in `area`.
pub fn render(f: &mut Frame, area: Rect, form: &Form) {
    let height = form.fields.len() as u16 + if form.error.is_some() { 6 } else { 4 };
    let popup = centered(area, 70, height);
    f.render_widget(Clear, popup);

    let mut lines: Vec<Line> = form
        .fields
        .iter()
        .enumerate()
        .map(|(i, field)| {
            let focused = i == form.focus;
            let label_style = if focused {
                Style::default()
                    .fg(theme::ACCENT)
                    .add_modifier(Modifier::BOLD)
            } else {
                theme::label()
            };

            let mut value = field.display();
            if focused {
                value = match field.kind {
                    FieldKind::Choice(_) => format!("◀ {value} ▶"),
                    _ => format!("{value}▏"),
                };
            }

            Line::from(vec![
                Span::styled(format!("{:>width$}  ", field.label, width = LABEL_WIDTH), label_style),
                Span::styled(value, theme::selected(focused)),
            ])
        })
        .collect();

    if let Some(err) = &form.error {
        lines.push(Line::raw(""));
        lines.push(Line::styled(err.clone(), Style::default().fg(Color::Red)));
    }

    lines.push(Line::raw(""));
    let hint = match form.kind {
        FormKind::Login => "tab: next field   enter: sign in",
        _ => "tab: next field   ←→: change option   enter: save   esc: cancel",
    };
    lines.push(Line::styled(hint, theme::muted()));

    let paragraph = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Yellow))
                .title(format!(" {} ", form.title)),
        );
    f.render_widget(paragraph, popup);
}
