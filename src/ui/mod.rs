pub mod backlogs;
pub mod dashboard;
pub mod footer;
pub mod form;
pub mod my_tasks;
pub mod projects;
pub mod reports;
pub mod settings;
pub mod sidebar;
pub mod theme;
pub mod work_items;

use ratatui::{
    layout::{Constraint, Direction, Flex, Layout, Rect},
    style::Style,
    text::Line,
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::app::{App, View};

pub fn render(f: &mut Frame, app: &App) {
    let size = f.area();

    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(6),    // main content
            Constraint::Length(1), // footer
        ])
        .split(size);

    let main_area = vertical[0];
    let bottom_area = vertical[1];

    if app.session.is_some() {
        let horizontal = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(24), Constraint::Min(40)])
            .split(main_area);

        sidebar::render(f, horizontal[0], app);
        let content = horizontal[1];

        match app.view {
            View::Dashboard => dashboard::render(f, content, app),
            View::Projects => projects::render(f, content, app),
            View::WorkItems => work_items::render(f, content, app),
            View::Backlogs => backlogs::render(f, content, app),
            View::MyTasks => my_tasks::render(f, content, app),
            View::Reports => reports::render(f, content, app),
            View::Settings => settings::render(f, content, app),
        }
    }

    // Login is just a form drawn over an empty screen
    if let Some(form) = &app.form {
        form::render(f, main_area, form);
    }

    if let Some(pending) = &app.confirm {
        let area = centered(main_area, 50, 3);
        f.render_widget(Clear, area);
        let paragraph = Paragraph::new(Line::raw(pending.prompt())).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(ratatui::style::Color::Red))
                .title(" Confirm "),
        );
        f.render_widget(paragraph, area);
    }

    footer::render(f, bottom_area, app);
}

/// A `width` x `height` rect centered in `area`, clipped to fit.
pub fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let [row] = Layout::vertical([Constraint::Length(height.min(area.height))])
        .flex(Flex::Center)
        .areas(area);
    let [cell] = Layout::horizontal([Constraint::Length(width.min(area.width))])
        .flex(Flex::Center)
        .areas(row);
    cell
}

/// The bordered block every panel uses.
pub fn panel(title: &str) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme::ACCENT))
        .title(format!(" {title} "))
}
