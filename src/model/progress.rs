use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One append-only entry in a work item's progress log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskProgressEntry {
    #[serde(default)]
    pub id: Option<i64>,
    pub work_item_id: i64,
    pub hours_worked: f64,
    pub progress_percentage: f64,
    #[serde(default)]
    pub notes: Option<String>,
    pub date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_email: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressInput {
    pub work_item_id: i64,
    pub hours_worked: f64,
    pub progress_percentage: f64,
    pub notes: Option<String>,
    pub date: NaiveDate,
}
