use anyhow::{Context, Result};
use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::config::ExportConfig;
use crate::report::csv::{self, CsvQuoting};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Report {
    Utilization,
    ProjectStatus,
}

impl Report {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "utilization" => Some(Report::Utilization),
            "projects" | "project-status" => Some(Report::ProjectStatus),
            _ => None,
        }
    }

    pub fn file_stem(&self) -> &'static str {
        match self {
            Report::Utilization => "utilization-report",
            Report::ProjectStatus => "project-status-report",
        }
    }
}

/// Renders `rows` as CSV with the configured quoting.
pub fn render<T: Serialize>(rows: &[T], quoting: CsvQuoting) -> Result<String> {
    let records = csv::records(rows)?;
    Ok(csv::to_csv_with(&records, quoting))
}

/// Writes the CSV for `rows` to `<export dir>/<stem>.csv` and returns the path.
pub fn write_report<T: Serialize>(
    rows: &[T],
    report: Report,
    config: &ExportConfig,
) -> Result<PathBuf> {
    let path = config.dir().join(format!("{}.csv", report.file_stem()));
    write_csv(rows, &path, config.quoting)?;
    Ok(path)
}

pub fn write_csv<T: Serialize>(rows: &[T], path: &Path, quoting: CsvQuoting) -> Result<()> {
    let text = render(rows, quoting)?;
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
    }
    std::fs::write(path, text).with_context(|| format!("Failed to write {}", path.display()))?;
    log::info!("Exported {} rows to {}", rows.len(), path.display());
    Ok(())
}
