use ratatui::style::{Color, Modifier, Style};

pub const ACCENT: Color = Color::Cyan;

pub fn status_color(status: &str) -> Color {
    match status {
        "new" => Color::Blue,
        "in-progress" => Color::Yellow,
        "testing" => Color::Magenta,
        "completed" | "done" | "Done" | "Committed" => Color::Green,
        "blocked" => Color::Red,
        "approved" => Color::Cyan,
        _ => Color::Gray,
    }
}

pub fn priority_color(priority: &str) -> Color {
    match priority {
        "critical" => Color::Red,
        "high" => Color::Rgb(0xFF, 0x98, 0x00),
        "medium" => Color::Yellow,
        "low" => Color::Green,
        _ => Color::Gray,
    }
}

pub fn project_status_color(status: &str) -> Color {
    match status {
        "planning" => Color::Blue,
        "active" => Color::Green,
        "on-hold" => Color::Yellow,
        "completed" => Color::Gray,
        _ => Color::Gray,
    }
}

/// Bar color for a percentage: green under budget, yellow close, red over.
pub fn percent_color(pct: i64) -> Color {
    match pct {
        p if p > 100 => Color::Red,
        p if p >= 80 => Color::Yellow,
        _ => Color::Green,
    }
}

/// Palette cycled through by the status distribution chart.
pub const CHART: [Color; 6] = [
    Color::Rgb(0x00, 0x88, 0xFE),
    Color::Rgb(0x00, 0xC4, 0x9F),
    Color::Rgb(0xFF, 0xBB, 0x28),
    Color::Rgb(0xFF, 0x80, 0x42),
    Color::Rgb(0x88, 0x84, 0xD8),
    Color::Rgb(0x82, 0xCA, 0x9D),
];

pub fn selected(is_selected: bool) -> Style {
    if is_selected {
        Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    }
}

pub fn label() -> Style {
    Style::default().fg(Color::Gray)
}

pub fn muted() -> Style {
    Style::default().fg(Color::DarkGray)
}
