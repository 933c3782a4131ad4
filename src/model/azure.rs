use serde::{Deserialize, Serialize};

/// Azure DevOps connection settings. The backend masks the stored
/// token when reading it back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AzureConfig {
    #[serde(default, skip_serializing)]
    pub id: Option<i64>,
    pub organization_url: String,
    pub project_name: String,
    pub personal_access_token: String,
}

#[derive(Debug, Deserialize)]
pub struct SyncResult {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub synced_count: u64,
}
