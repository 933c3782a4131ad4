use serde::{Deserialize, Serialize};

/// Per-member aggregate from `GET /api/reports/utilization`.
///
/// Field order matches the backend's column order, which is also the CSV
/// column order on export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UtilizationRow {
    pub email: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub total_tasks: i64,
    #[serde(default)]
    pub total_estimated_hours: Option<f64>,
    #[serde(default)]
    pub total_actual_hours: Option<f64>,
    #[serde(default)]
    pub avg_progress: Option<f64>,
}

/// Per-project aggregate from `GET /api/reports/project-status`.
///
/// `in_progress_items` is only present on some backends and is left out of
/// the export when absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectStatusRow {
    pub id: i64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub total_work_items: Option<i64>,
    #[serde(default)]
    pub completed_items: Option<i64>,
    #[serde(default)]
    pub total_estimated_hours: Option<f64>,
    #[serde(default)]
    pub total_actual_hours: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub in_progress_items: Option<i64>,
}

/// Optional bounds for the utilization report, on work item start/end dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DateRange {
    pub from: Option<chrono::NaiveDate>,
    pub to: Option<chrono::NaiveDate>,
}

impl DateRange {
    pub fn query(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if let Some(from) = self.from {
            params.push(("start_date", from.to_string()));
        }
        if let Some(to) = self.to {
            params.push(("end_date", to.to_string()));
        }
        params
    }
}
