use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub const STATUSES: &[&str] = &["new", "in-progress", "testing", "completed", "blocked"];
pub const PRIORITIES: &[&str] = &["low", "medium", "high", "critical"];
pub const TYPES: &[&str] = &["task", "feature", "bug", "story"];
pub const T_SHIRT_SIZES: &[&str] = &["XS", "S", "M", "L", "XL"];

/// Status string the dashboard counts as "in progress".
pub const IN_PROGRESS: &str = "in-progress";

/// A work item as returned by the backend.
///
/// Status, priority and type stay plain strings: items synced from Azure
/// DevOps carry tracker values ("Committed", "Done", "Product Backlog Item")
/// that are outside the dashboard's own choices.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkItem {
    pub id: i64,
    #[serde(default)]
    pub project_id: Option<i64>,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub priority: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub assigned_to: Option<String>,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub estimated_hours: Option<f64>,
    #[serde(default)]
    pub actual_hours: Option<f64>,
    #[serde(default)]
    pub t_shirt_size: Option<String>,
    /// Azure DevOps id for synced items
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ado_id: Option<String>,
}

impl WorkItem {
    pub fn status_str(&self) -> &str {
        self.status.as_deref().unwrap_or("")
    }
}

/// Body of `POST /api/work-items` and `PUT /api/work-items/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkItemInput {
    pub project_id: i64,
    pub title: String,
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub kind: String,
    pub priority: String,
    pub status: String,
    pub assigned_to: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub estimated_hours: Option<f64>,
    pub t_shirt_size: Option<String>,
}

impl WorkItemInput {
    /// Builds the entity the backend echoes back for a write, keeping the
    /// logged hours of the item being replaced.
    pub fn into_item(self, id: i64, actual_hours: Option<f64>) -> WorkItem {
        WorkItem {
            id,
            project_id: Some(self.project_id),
            title: self.title,
            description: self.description,
            kind: Some(self.kind),
            priority: Some(self.priority),
            status: Some(self.status),
            assigned_to: self.assigned_to,
            start_date: self.start_date,
            end_date: self.end_date,
            estimated_hours: self.estimated_hours,
            actual_hours,
            t_shirt_size: self.t_shirt_size,
            ado_id: None,
        }
    }
}
