use chrono::NaiveDate;

/// `8h`, `2.5h`, or `-` when nothing (or zero) is recorded.
pub fn hours(value: Option<f64>) -> String {
    match value {
        Some(h) if h != 0.0 && h.is_finite() => {
            if h.fract() == 0.0 {
                format!("{}h", h as i64)
            } else {
                format!("{h}h")
            }
        }
        _ => "-".into(),
    }
}

/// Plain number for table cells, `0` when missing.
pub fn number(value: Option<f64>) -> String {
    let v = value.unwrap_or(0.0);
    if v.fract() == 0.0 {
        format!("{}", v as i64)
    } else {
        format!("{v:.1}")
    }
}

/// `Mar 01, 2024`, or `Not set`.
pub fn date(value: Option<NaiveDate>) -> String {
    value
        .map(|d| d.format("%b %d, %Y").to_string())
        .unwrap_or_else(|| "Not set".into())
}

pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let mut out: String = s.chars().take(max.saturating_sub(1)).collect();
        out.push('…');
        out
    }
}
