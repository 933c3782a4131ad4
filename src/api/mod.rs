pub mod rest;

use anyhow::{Context, Result};
use async_trait::async_trait;

use crate::model::azure::{AzureConfig, SyncResult};
use crate::model::backlog::{BacklogInput, BacklogItem};
use crate::model::progress::{ProgressInput, TaskProgressEntry};
use crate::model::project::{Project, ProjectInput};
use crate::model::report::{DateRange, ProjectStatusRow, UtilizationRow};
use crate::model::work_item::{WorkItem, WorkItemInput};
use crate::session::Session;
use crate::snapshot::Snapshot;

/// The dashboard backend. It owns authentication, persistence, report
/// aggregation and tracker sync; this side only reads and writes through it.
///
/// Every call except `login` takes the session explicitly. Writes return
/// the stored entity so callers can merge it into their snapshot.
#[async_trait]
pub trait Backend: Send + Sync {
    async fn login(&self, email: &str, password: &str) -> Result<Session>;

    async fn projects(&self, session: &Session) -> Result<Vec<Project>>;
    async fn work_items(&self, session: &Session) -> Result<Vec<WorkItem>>;
    async fn backlogs(&self, session: &Session) -> Result<Vec<BacklogItem>>;
    async fn utilization(&self, session: &Session, range: DateRange)
        -> Result<Vec<UtilizationRow>>;
    async fn project_status(&self, session: &Session) -> Result<Vec<ProjectStatusRow>>;

    /// Creates when `id` is `None`, replaces otherwise.
    async fn save_project(
        &self,
        session: &Session,
        id: Option<i64>,
        input: &ProjectInput,
    ) -> Result<Project>;
    async fn save_work_item(
        &self,
        session: &Session,
        id: Option<i64>,
        input: &WorkItemInput,
    ) -> Result<WorkItem>;
    async fn delete_work_item(&self, session: &Session, id: i64) -> Result<()>;
    async fn save_backlog(
        &self,
        session: &Session,
        id: Option<i64>,
        input: &BacklogInput,
    ) -> Result<BacklogItem>;
    async fn delete_backlog(&self, session: &Session, id: i64) -> Result<()>;

    async fn log_progress(
        &self,
        session: &Session,
        input: &ProgressInput,
    ) -> Result<TaskProgressEntry>;
    async fn progress(&self, session: &Session, work_item_id: i64)
        -> Result<Vec<TaskProgressEntry>>;

    async fn azure_config(&self, session: &Session) -> Result<Option<AzureConfig>>;
    async fn save_azure_config(&self, session: &Session, config: &AzureConfig) -> Result<()>;
    async fn sync_azure(&self, session: &Session) -> Result<SyncResult>;
}

/// Fetches all five collections concurrently. Any failure fails the whole
/// load and leaves the caller's previous snapshot untouched.
pub async fn fetch_snapshot(
    backend: &dyn Backend,
    session: &Session,
    range: DateRange,
) -> Result<Snapshot> {
    let (projects, work_items, backlogs, utilization, project_status) = tokio::try_join!(
        async { backend.projects(session).await.context("Loading projects") },
        async { backend.work_items(session).await.context("Loading work items") },
        async { backend.backlogs(session).await.context("Loading backlogs") },
        async {
            backend
                .utilization(session, range)
                .await
                .context("Loading utilization report")
        },
        async {
            backend
                .project_status(session)
                .await
                .context("Loading project status report")
        },
    )?;

    Ok(Snapshot {
        projects,
        work_items,
        backlogs,
        utilization,
        project_status,
    })
}

#[cfg(test)]
pub mod tests;
