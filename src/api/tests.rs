use std::sync::{Arc, Mutex};

use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;

use super::{fetch_snapshot, Backend};
use crate::error::ApiError;
use crate::model::azure::{AzureConfig, SyncResult};
use crate::model::backlog::{BacklogInput, BacklogItem};
use crate::model::progress::{ProgressInput, TaskProgressEntry};
use crate::model::project::{Project, ProjectInput};
use crate::model::report::{DateRange, ProjectStatusRow, UtilizationRow};
use crate::model::user::User;
use crate::model::work_item::{WorkItem, WorkItemInput};
use crate::session::Session;
use crate::snapshot::Snapshot;

pub const TOKEN: &str = "mock-token";
pub const EMAIL: &str = "john.doe@example.com";
pub const PASSWORD: &str = "password123";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Failure {
    Unauthorized,
    Down,
}

#[derive(Default)]
pub struct MockState {
    pub data: Snapshot,
    pub calls: Vec<String>,
    pub fail: Option<Failure>,
    pub progress: Vec<TaskProgressEntry>,
    pub azure: Option<AzureConfig>,
    pub synced: u64,
    /// Revokes the token right after a successful sync.
    pub revoke_on_sync: bool,
    next_id: i64,
}

/// In-memory backend. Clones share state so a test can keep a handle
/// after boxing one into the app.
#[derive(Clone, Default)]
pub struct MockBackend {
    pub state: Arc<Mutex<MockState>>,
}

impl MockBackend {
    pub fn with_data(data: Snapshot) -> Self {
        let mock = Self::default();
        {
            let mut state = mock.state.lock().unwrap();
            state.next_id = 100;
            state.data = data;
        }
        mock
    }

    pub fn fail_with(&self, failure: Option<Failure>) {
        self.state.lock().unwrap().fail = failure;
    }

    pub fn calls(&self) -> Vec<String> {
        self.state.lock().unwrap().calls.clone()
    }

    /// Records the call and returns the configured failure, if any.
    fn call(&self, session: Option<&Session>, name: &str) -> Result<std::sync::MutexGuard<'_, MockState>> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(name.to_string());
        if let Some(s) = session {
            if s.token != TOKEN {
                return Err(ApiError::Unauthorized.into());
            }
        }
        match state.fail {
            Some(Failure::Unauthorized) => Err(ApiError::Unauthorized.into()),
            Some(Failure::Down) => Err(ApiError::Rejected {
                status: 500,
                detail: "database unavailable".into(),
            }
            .into()),
            None => Ok(state),
        }
    }

    fn next_id(state: &mut MockState) -> i64 {
        state.next_id += 1;
        state.next_id
    }
}

pub fn session() -> Session {
    Session {
        token: TOKEN.into(),
        user: User {
            email: EMAIL.into(),
            name: Some("John Doe".into()),
            role: Some("developer".into()),
        },
    }
}

pub fn work_item(id: i64, status: &str, assigned_to: Option<&str>) -> WorkItem {
    WorkItem {
        id,
        project_id: Some(1),
        title: format!("Work item {id}"),
        description: None,
        kind: Some("task".into()),
        priority: Some("medium".into()),
        status: Some(status.into()),
        assigned_to: assigned_to.map(String::from),
        start_date: None,
        end_date: None,
        estimated_hours: Some(8.0),
        actual_hours: Some(2.0),
        t_shirt_size: Some("M".into()),
        ado_id: None,
    }
}

pub fn sample_data() -> Snapshot {
    Snapshot {
        projects: vec![Project {
            id: 1,
            name: "Spark".into(),
            description: Some("Client portal".into()),
            start_date: NaiveDate::from_ymd_opt(2024, 1, 8),
            end_date: None,
            status: Some("active".into()),
        }],
        work_items: vec![
            work_item(1, "new", Some(EMAIL)),
            work_item(2, "in-progress", Some("jane@example.com")),
            work_item(3, "in-progress", Some(EMAIL)),
        ],
        backlogs: vec![
            BacklogItem {
                id: 1,
                project_id: Some(1),
                title: "Later".into(),
                description: None,
                priority: 5,
                status: Some("new".into()),
                created_by: Some(EMAIL.into()),
            },
            BacklogItem {
                id: 2,
                project_id: Some(1),
                title: "Soon".into(),
                description: None,
                priority: 1,
                status: Some("approved".into()),
                created_by: Some(EMAIL.into()),
            },
        ],
        utilization: vec![UtilizationRow {
            name: Some("John Doe".into()),
            email: EMAIL.into(),
            total_tasks: 2,
            total_estimated_hours: Some(16.0),
            total_actual_hours: Some(4.0),
            avg_progress: None,
        }],
        project_status: vec![ProjectStatusRow {
            id: 1,
            name: Some("Spark".into()),
            status: Some("active".into()),
            total_work_items: Some(3),
            completed_items: Some(0),
            in_progress_items: Some(2),
            total_estimated_hours: Some(24.0),
            total_actual_hours: Some(6.0),
        }],
    }
}

#[async_trait]
impl Backend for MockBackend {
    async fn login(&self, email: &str, password: &str) -> Result<Session> {
        let _state = self.call(None, "login")?;
        if email == EMAIL && password == PASSWORD {
            Ok(session())
        } else {
            Err(ApiError::Unauthorized.into())
        }
    }

    async fn projects(&self, session: &Session) -> Result<Vec<Project>> {
        Ok(self.call(Some(session), "projects")?.data.projects.clone())
    }

    async fn work_items(&self, session: &Session) -> Result<Vec<WorkItem>> {
        Ok(self.call(Some(session), "work_items")?.data.work_items.clone())
    }

    async fn backlogs(&self, session: &Session) -> Result<Vec<BacklogItem>> {
        Ok(self.call(Some(session), "backlogs")?.data.backlogs.clone())
    }

    async fn utilization(&self, session: &Session, _range: DateRange) -> Result<Vec<UtilizationRow>> {
        Ok(self.call(Some(session), "utilization")?.data.utilization.clone())
    }

    async fn project_status(&self, session: &Session) -> Result<Vec<ProjectStatusRow>> {
        Ok(self
            .call(Some(session), "project_status")?
            .data
            .project_status
            .clone())
    }

    async fn save_project(
        &self,
        session: &Session,
        id: Option<i64>,
        input: &ProjectInput,
    ) -> Result<Project> {
        let mut state = self.call(Some(session), "save_project")?;
        let id = id.unwrap_or_else(|| Self::next_id(&mut state));
        let project = input.clone().into_project(id);
        state.data.upsert_project(project.clone());
        Ok(project)
    }

    async fn save_work_item(
        &self,
        session: &Session,
        id: Option<i64>,
        input: &WorkItemInput,
    ) -> Result<WorkItem> {
        let mut state = self.call(Some(session), "save_work_item")?;
        let id = id.unwrap_or_else(|| Self::next_id(&mut state));
        // Like the real backend, the echo carries no actual_hours
        let item = input.clone().into_item(id, None);
        state.data.upsert_work_item(item.clone());
        Ok(item)
    }

    async fn delete_work_item(&self, session: &Session, id: i64) -> Result<()> {
        self.call(Some(session), "delete_work_item")?
            .data
            .remove_work_item(id);
        Ok(())
    }

    async fn save_backlog(
        &self,
        session: &Session,
        id: Option<i64>,
        input: &BacklogInput,
    ) -> Result<BacklogItem> {
        let mut state = self.call(Some(session), "save_backlog")?;
        let id = id.unwrap_or_else(|| Self::next_id(&mut state));
        let item = input.clone().into_item(id, Some(session.user.email.clone()));
        state.data.upsert_backlog(item.clone());
        Ok(item)
    }

    async fn delete_backlog(&self, session: &Session, id: i64) -> Result<()> {
        self.call(Some(session), "delete_backlog")?
            .data
            .remove_backlog(id);
        Ok(())
    }

    async fn log_progress(
        &self,
        session: &Session,
        input: &ProgressInput,
    ) -> Result<TaskProgressEntry> {
        let mut state = self.call(Some(session), "log_progress")?;
        let id = Self::next_id(&mut state);
        let entry = TaskProgressEntry {
            id: Some(id),
            work_item_id: input.work_item_id,
            hours_worked: input.hours_worked,
            progress_percentage: input.progress_percentage,
            notes: input.notes.clone(),
            date: input.date,
            user_email: None,
        };
        state.progress.push(entry.clone());
        state.data.apply_progress(&entry);
        Ok(entry)
    }

    async fn progress(&self, session: &Session, work_item_id: i64) -> Result<Vec<TaskProgressEntry>> {
        let state = self.call(Some(session), "progress")?;
        Ok(state
            .progress
            .iter()
            .filter(|e| e.work_item_id == work_item_id)
            .cloned()
            .collect())
    }

    async fn azure_config(&self, session: &Session) -> Result<Option<AzureConfig>> {
        let state = self.call(Some(session), "azure_config")?;
        Ok(state.azure.clone().map(|c| AzureConfig {
            personal_access_token: "***hidden***".into(),
            ..c
        }))
    }

    async fn save_azure_config(&self, session: &Session, config: &AzureConfig) -> Result<()> {
        self.call(Some(session), "save_azure_config")?.azure = Some(config.clone());
        Ok(())
    }

    async fn sync_azure(&self, session: &Session) -> Result<SyncResult> {
        let mut state = self.call(Some(session), "sync_azure")?;
        if state.azure.is_none() {
            return Err(ApiError::Rejected {
                status: 400,
                detail: "Azure DevOps not configured".into(),
            }
            .into());
        }
        if state.revoke_on_sync {
            state.fail = Some(Failure::Unauthorized);
        }
        Ok(SyncResult {
            message: Some("Azure DevOps sync completed".into()),
            synced_count: state.synced,
        })
    }
}

#[tokio::test]
async fn fetch_snapshot_loads_every_collection() {
    let mock = MockBackend::with_data(sample_data());
    let snap = fetch_snapshot(&mock, &session(), DateRange::default())
        .await
        .unwrap();
    assert_eq!(snap, sample_data());

    let mut calls = mock.calls();
    calls.sort();
    assert_eq!(
        calls,
        vec!["backlogs", "project_status", "projects", "utilization", "work_items"]
    );
}

#[tokio::test]
async fn fetch_snapshot_fails_as_a_whole() {
    let mock = MockBackend::with_data(sample_data());
    mock.fail_with(Some(Failure::Down));
    let err = fetch_snapshot(&mock, &session(), DateRange::default())
        .await
        .unwrap_err();
    assert!(format!("{err:#}").contains("database unavailable"));
}

#[tokio::test]
async fn stale_token_is_unauthorized() {
    let mock = MockBackend::with_data(sample_data());
    let mut stale = session();
    stale.token = "expired".into();
    let err = mock.projects(&stale).await.unwrap_err();
    assert!(crate::error::is_auth_error(&err));
}

#[tokio::test]
async fn login_checks_credentials() {
    let mock = MockBackend::default();
    assert!(mock.login(EMAIL, "wrong").await.is_err());
    let session = mock.login(EMAIL, PASSWORD).await.unwrap();
    assert_eq!(session.email(), EMAIL);
}

#[test]
fn date_range_query_only_includes_set_bounds() {
    assert!(DateRange::default().query().is_empty());
    let range = DateRange {
        from: NaiveDate::from_ymd_opt(2024, 1, 1),
        to: None,
    };
    assert_eq!(range.query(), vec![("start_date", "2024-01-01".to_string())]);
}
