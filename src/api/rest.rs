use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::Backend;
use crate::config::ApiConfig;
use crate::error::ApiError;
use crate::model::azure::{AzureConfig, SyncResult};
use crate::model::backlog::{BacklogInput, BacklogItem};
use crate::model::progress::{ProgressInput, TaskProgressEntry};
use crate::model::project::{Project, ProjectInput};
use crate::model::report::{DateRange, ProjectStatusRow, UtilizationRow};
use crate::model::user::{Credentials, LoginResponse};
use crate::model::work_item::{WorkItem, WorkItemInput};
use crate::session::Session;

/// [`Backend`] over the dashboard's JSON REST API.
pub struct RestClient {
    base_url: String,
    client: reqwest::Client,
}

impl RestClient {
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    fn request(&self, method: Method, path: &str, session: Option<&Session>) -> RequestBuilder {
        log::debug!("{method} {path}");
        let req = self
            .client
            .request(method, format!("{}{path}", self.base_url))
            .header("Accept", "application/json");
        match session {
            Some(s) => req.header("Authorization", s.bearer()),
            None => req,
        }
    }

    async fn send<T: DeserializeOwned>(&self, req: RequestBuilder, path: &str) -> Result<T, ApiError> {
        let resp = req.send().await.map_err(|e| {
            log::warn!("{path}: {e}");
            ApiError::Transport(e)
        })?;
        let status = resp.status();
        let body = resp.text().await?;

        if !status.is_success() {
            let err = status_error(status, path, &body);
            log::warn!("{path}: {err}");
            return Err(err);
        }

        serde_json::from_str(&body).map_err(|e| ApiError::Decode {
            path: path.to_string(),
            message: e.to_string(),
        })
    }

    async fn get<T: DeserializeOwned>(&self, session: &Session, path: &str) -> Result<T> {
        let req = self.request(Method::GET, path, Some(session));
        Ok(self.send(req, path).await?)
    }

    async fn write<B: Serialize + Sync, T: DeserializeOwned>(
        &self,
        method: Method,
        session: &Session,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let req = self.request(method, path, Some(session)).json(body);
        Ok(self.send(req, path).await?)
    }

    async fn delete(&self, session: &Session, path: &str) -> Result<()> {
        let req = self.request(Method::DELETE, path, Some(session));
        let _: serde_json::Value = self.send(req, path).await?;
        Ok(())
    }
}

/// FastAPI error bodies look like `{"detail": "..."}`.
#[derive(Deserialize)]
struct ErrorBody {
    detail: serde_json::Value,
}

fn status_error(status: StatusCode, path: &str, body: &str) -> ApiError {
    match status {
        StatusCode::UNAUTHORIZED => ApiError::Unauthorized,
        StatusCode::NOT_FOUND => ApiError::NotFound(path.to_string()),
        _ => {
            let detail = serde_json::from_str::<ErrorBody>(body)
                .map(|b| match b.detail {
                    serde_json::Value::String(s) => s,
                    other => other.to_string(),
                })
                .unwrap_or_else(|_| body.chars().take(200).collect());
            ApiError::Rejected {
                status: status.as_u16(),
                detail,
            }
        }
    }
}

fn save_target(collection: &str, id: Option<i64>) -> (Method, String) {
    match id {
        Some(id) => (Method::PUT, format!("{collection}/{id}")),
        None => (Method::POST, collection.to_string()),
    }
}

#[async_trait]
impl Backend for RestClient {
    async fn login(&self, email: &str, password: &str) -> Result<Session> {
        let path = "/api/auth/login";
        let req = self
            .request(Method::POST, path, None)
            .json(&Credentials { email, password });
        let resp: LoginResponse = self.send(req, path).await.context("Login failed")?;
        log::info!("Logged in as {}", resp.user.email);
        Ok(Session {
            token: resp.access_token,
            user: resp.user,
        })
    }

    async fn projects(&self, session: &Session) -> Result<Vec<Project>> {
        self.get(session, "/api/projects").await
    }

    async fn work_items(&self, session: &Session) -> Result<Vec<WorkItem>> {
        self.get(session, "/api/work-items").await
    }

    async fn backlogs(&self, session: &Session) -> Result<Vec<BacklogItem>> {
        self.get(session, "/api/backlogs").await
    }

    async fn utilization(
        &self,
        session: &Session,
        range: DateRange,
    ) -> Result<Vec<UtilizationRow>> {
        let path = "/api/reports/utilization";
        let req = self
            .request(Method::GET, path, Some(session))
            .query(&range.query());
        Ok(self.send(req, path).await?)
    }

    async fn project_status(&self, session: &Session) -> Result<Vec<ProjectStatusRow>> {
        self.get(session, "/api/reports/project-status").await
    }

    async fn save_project(
        &self,
        session: &Session,
        id: Option<i64>,
        input: &ProjectInput,
    ) -> Result<Project> {
        let (method, path) = save_target("/api/projects", id);
        self.write(method, session, &path, input).await
    }

    async fn save_work_item(
        &self,
        session: &Session,
        id: Option<i64>,
        input: &WorkItemInput,
    ) -> Result<WorkItem> {
        let (method, path) = save_target("/api/work-items", id);
        self.write(method, session, &path, input).await
    }

    async fn delete_work_item(&self, session: &Session, id: i64) -> Result<()> {
        self.delete(session, &format!("/api/work-items/{id}")).await
    }

    async fn save_backlog(
        &self,
        session: &Session,
        id: Option<i64>,
        input: &BacklogInput,
    ) -> Result<BacklogItem> {
        let (method, path) = save_target("/api/backlogs", id);
        self.write(method, session, &path, input).await
    }

    async fn delete_backlog(&self, session: &Session, id: i64) -> Result<()> {
        self.delete(session, &format!("/api/backlogs/{id}")).await
    }

    async fn log_progress(
        &self,
        session: &Session,
        input: &ProgressInput,
    ) -> Result<TaskProgressEntry> {
        self.write(Method::POST, session, "/api/task-progress", input)
            .await
    }

    async fn progress(
        &self,
        session: &Session,
        work_item_id: i64,
    ) -> Result<Vec<TaskProgressEntry>> {
        self.get(session, &format!("/api/task-progress/{work_item_id}"))
            .await
    }

    async fn azure_config(&self, session: &Session) -> Result<Option<AzureConfig>> {
        self.get(session, "/api/azure-config").await
    }

    async fn save_azure_config(&self, session: &Session, config: &AzureConfig) -> Result<()> {
        let _: serde_json::Value = self
            .write(Method::POST, session, "/api/azure-config", config)
            .await?;
        Ok(())
    }

    async fn sync_azure(&self, session: &Session) -> Result<SyncResult> {
        let path = "/api/sync-azure-boards";
        let req = self.request(Method::POST, path, Some(session));
        let result: SyncResult = self.send(req, path).await?;
        log::info!("Azure DevOps sync: {} items", result.synced_count);
        Ok(result)
    }
}
