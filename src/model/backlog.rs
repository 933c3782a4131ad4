use serde::{Deserialize, Serialize};

pub const STATUSES: &[&str] = &["new", "approved", "in-progress", "done"];

/// A ranked candidate work item. Lower `priority` ranks higher.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BacklogItem {
    pub id: i64,
    #[serde(default)]
    pub project_id: Option<i64>,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub priority: i64,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BacklogInput {
    pub project_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub priority: i64,
    pub status: String,
}

impl BacklogInput {
    pub fn into_item(self, id: i64, created_by: Option<String>) -> BacklogItem {
        BacklogItem {
            id,
            project_id: Some(self.project_id),
            title: self.title,
            description: self.description,
            priority: self.priority,
            status: Some(self.status),
            created_by,
        }
    }
}
