pub mod form;

use std::time::Instant;

use anyhow::Result;
use serde::Serialize;
use tokio::sync::mpsc;

use crate::api::{self, Backend};
use crate::config::ExportConfig;
use crate::error::is_auth_error;
use crate::event::KeyAction;
use crate::export::{self, Report};
use crate::model::azure::AzureConfig;
use crate::model::backlog::BacklogItem;
use crate::model::progress::TaskProgressEntry;
use crate::model::report::DateRange;
use crate::model::work_item::WorkItem;
use crate::report;
use crate::session::{Session, SessionStore};
use crate::snapshot::Snapshot;

use form::{Form, FormKind};

const FLASH_SECS: u64 = 3;

#[derive(Debug, Clone)]
pub enum Action {
    Key(KeyAction),
    Tick,
    /// Fetch results carry the token they were loaded with.
    SnapshotLoaded {
        token: String,
        snapshot: Box<Snapshot>,
    },
    FetchError {
        token: String,
        message: String,
    },
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum View {
    Dashboard,
    Projects,
    WorkItems,
    Backlogs,
    MyTasks,
    Reports,
    Settings,
}

impl View {
    pub const ALL: [View; 7] = [
        View::Dashboard,
        View::Projects,
        View::WorkItems,
        View::Backlogs,
        View::MyTasks,
        View::Reports,
        View::Settings,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            View::Dashboard => "Dashboard",
            View::Projects => "Projects",
            View::WorkItems => "Work Items",
            View::Backlogs => "Backlogs",
            View::MyTasks => "My Tasks",
            View::Reports => "Reports",
            View::Settings => "Settings",
        }
    }

    fn index(&self) -> usize {
        View::ALL.iter().position(|v| v == self).unwrap_or(0)
    }

    fn offset(&self, step: isize) -> View {
        let len = View::ALL.len() as isize;
        View::ALL[(self.index() as isize + step).rem_euclid(len) as usize]
    }
}

/// A delete waiting for `y`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum PendingDelete {
    WorkItem { id: i64, title: String },
    Backlog { id: i64, title: String },
}

impl PendingDelete {
    pub fn prompt(&self) -> String {
        match self {
            PendingDelete::WorkItem { title, .. } => format!("Delete work item '{title}'? (y/n)"),
            PendingDelete::Backlog { title, .. } => format!("Delete backlog item '{title}'? (y/n)"),
        }
    }
}

pub struct App {
    pub session: Option<Session>,
    pub snapshot: Snapshot,
    pub view: View,
    pub selected: usize,
    pub form: Option<Form>,
    pub confirm: Option<PendingDelete>,
    pub progress_history: Option<(i64, Vec<TaskProgressEntry>)>,
    pub azure: Option<AzureConfig>,
    pub loading: bool,
    pub flash_message: Option<(String, Instant)>,
    pub should_quit: bool,
    pub range: DateRange,
    pub action_tx: mpsc::UnboundedSender<Action>,
    backend: Box<dyn Backend>,
    sessions: SessionStore,
    export: ExportConfig,
}

impl App {
    pub fn new(
        backend: Box<dyn Backend>,
        sessions: SessionStore,
        export: ExportConfig,
        action_tx: mpsc::UnboundedSender<Action>,
    ) -> Self {
        let session = sessions.load();
        let form = match &session {
            Some(_) => None,
            None => Some(Form::login("")),
        };

        Self {
            session,
            snapshot: Snapshot::default(),
            view: View::Dashboard,
            selected: 0,
            form,
            confirm: None,
            progress_history: None,
            azure: None,
            loading: false,
            flash_message: None,
            should_quit: false,
            range: DateRange::default(),
            action_tx,
            backend,
            sessions,
            export,
        }
    }

    pub fn flash(&mut self, msg: impl Into<String>) {
        self.flash_message = Some((msg.into(), Instant::now()));
    }

    pub async fn update(&mut self, action: Action) {
        if let Some((_, t)) = &self.flash_message {
            if t.elapsed().as_secs() >= FLASH_SECS {
                self.flash_message = None;
            }
        }

        match action {
            Action::Key(key) => self.handle_key(key).await,
            Action::Tick => {}
            Action::SnapshotLoaded { token, snapshot } => {
                if !self.is_current(&token) {
                    log::debug!("Dropping snapshot loaded for a previous session");
                    return;
                }
                self.snapshot = *snapshot;
                self.loading = false;
                if self.progress_history.is_some() && self.history_task().is_none() {
                    self.progress_history = None;
                }
                self.clamp_selection();
            }
            Action::FetchError { token, message } => {
                if !self.is_current(&token) {
                    log::debug!("Dropping fetch error for a previous session: {message}");
                    return;
                }
                self.loading = false;
                self.flash(format!("Fetch error: {message}"));
            }
            Action::Quit => {
                self.should_quit = true;
            }
        }
    }

    fn is_current(&self, token: &str) -> bool {
        self.session.as_ref().is_some_and(|s| s.token == token)
    }

    /// Reloads every collection. The result arrives as an action so the
    /// caller's loop applies it like any other update.
    pub async fn refresh(&mut self) {
        let Some(session) = self.session.clone() else {
            return;
        };
        self.loading = true;

        match api::fetch_snapshot(self.backend.as_ref(), &session, self.range).await {
            Ok(snapshot) => {
                log::info!(
                    "Loaded {} projects, {} work items, {} backlog items",
                    snapshot.projects.len(),
                    snapshot.work_items.len(),
                    snapshot.backlogs.len()
                );
                let _ = self.action_tx.send(Action::SnapshotLoaded {
                    token: session.token,
                    snapshot: Box::new(snapshot),
                });
            }
            Err(e) if is_auth_error(&e) => {
                self.loading = false;
                self.expire_session();
            }
            Err(e) => {
                log::warn!("Snapshot load failed: {e:#}");
                let _ = self.action_tx.send(Action::FetchError {
                    token: session.token,
                    message: format!("{e:#}"),
                });
            }
        }
    }

    async fn handle_key(&mut self, key: KeyAction) {
        if key == KeyAction::Logout {
            if self.session.is_some() {
                self.logout();
            }
            return;
        }

        if let Some(pending) = self.confirm.take() {
            if matches!(key, KeyAction::Char('y') | KeyAction::Char('Y')) {
                self.delete(pending).await;
            } else {
                self.flash("Cancelled");
            }
            return;
        }

        if self.form.is_some() {
            self.handle_form_key(key).await;
            return;
        }

        self.handle_view_key(key).await;
    }

    async fn handle_form_key(&mut self, key: KeyAction) {
        let Some(form) = self.form.as_mut() else {
            return;
        };
        match key {
            KeyAction::Tab | KeyAction::Down => form.next_field(),
            KeyAction::BackTab | KeyAction::Up => form.prev_field(),
            KeyAction::Right => form.cycle(1),
            KeyAction::Left => form.cycle(-1),
            KeyAction::Char(c) => form.input(c),
            KeyAction::Backspace => form.backspace(),
            KeyAction::Escape => {
                if form.kind != FormKind::Login {
                    self.form = None;
                }
            }
            KeyAction::Enter => self.submit_form().await,
            KeyAction::Logout => {}
        }
    }

    async fn handle_view_key(&mut self, key: KeyAction) {
        match key {
            KeyAction::Up => {
                if self.selected > 0 {
                    self.selected -= 1;
                }
            }
            KeyAction::Down => {
                let len = self.list_len();
                if len > 0 && self.selected < len - 1 {
                    self.selected += 1;
                }
            }
            KeyAction::Tab | KeyAction::Right => self.switch_view(self.view.offset(1)).await,
            KeyAction::BackTab | KeyAction::Left => self.switch_view(self.view.offset(-1)).await,
            KeyAction::Enter => self.edit_selected(),
            KeyAction::Escape => self.progress_history = None,
            KeyAction::Char(c) => self.handle_command(c).await,
            KeyAction::Backspace | KeyAction::Logout => {}
        }
    }

    async fn handle_command(&mut self, c: char) {
        if let Some(d) = c.to_digit(10) {
            if let Some(view) = View::ALL.get((d as usize).wrapping_sub(1)) {
                self.switch_view(*view).await;
            }
            return;
        }

        match (self.view, c) {
            (_, 'q') => self.should_quit = true,
            (_, 'r') => self.refresh().await,
            (View::Projects, 'n') => self.form = Some(Form::project(None)),
            (View::WorkItems, 'n') => {
                self.form = Some(Form::work_item(None, &self.snapshot.projects))
            }
            (View::Backlogs, 'n') => {
                self.form = Some(Form::backlog(None, &self.snapshot.projects))
            }
            (View::Projects | View::WorkItems | View::Backlogs, 'e') => self.edit_selected(),
            (View::WorkItems, 'D') => {
                if let Some(item) = self.selected_work_item() {
                    self.confirm = Some(PendingDelete::WorkItem {
                        id: item.id,
                        title: item.title.clone(),
                    });
                }
            }
            (View::Backlogs, 'D') => {
                if let Some(item) = self.selected_backlog() {
                    self.confirm = Some(PendingDelete::Backlog {
                        id: item.id,
                        title: item.title.clone(),
                    });
                }
            }
            (View::MyTasks, 'l') => self.edit_selected(),
            (View::MyTasks, 'h') => self.load_history().await,
            (View::Reports, 'u') => self.export_report(Report::Utilization),
            (View::Reports, 'p') => self.export_report(Report::ProjectStatus),
            (View::Settings, 'c') => self.edit_selected(),
            (View::Settings, 's') => self.sync().await,
            _ => {}
        }
    }

    async fn switch_view(&mut self, view: View) {
        if self.view == view {
            return;
        }
        self.view = view;
        self.selected = 0;
        self.progress_history = None;
        if view == View::Settings && self.azure.is_none() {
            self.load_azure_config().await;
        }
    }

    /// Opens the form for the selected row of the current view.
    fn edit_selected(&mut self) {
        let today = chrono::Local::now().date_naive();
        self.form = match self.view {
            View::Projects => self
                .snapshot
                .projects
                .get(self.selected)
                .map(|p| Form::project(Some(p))),
            View::WorkItems => self
                .selected_work_item()
                .map(|w| Form::work_item(Some(w), &self.snapshot.projects)),
            View::Backlogs => self
                .selected_backlog()
                .map(|b| Form::backlog(Some(b), &self.snapshot.projects)),
            View::MyTasks => self
                .selected_my_task()
                .map(|task| Form::progress(task, today)),
            View::Settings => Some(Form::azure(self.azure.as_ref())),
            View::Dashboard | View::Reports => None,
        };
    }

    pub fn my_tasks(&self) -> Vec<&WorkItem> {
        match &self.session {
            Some(s) => report::my_tasks(&self.snapshot.work_items, s.email()),
            None => Vec::new(),
        }
    }

    pub fn ranked_backlog(&self) -> Vec<&BacklogItem> {
        report::ranked_backlog(&self.snapshot.backlogs)
    }

    pub fn selected_work_item(&self) -> Option<&WorkItem> {
        self.snapshot.work_items.get(self.selected)
    }

    pub fn selected_backlog(&self) -> Option<&BacklogItem> {
        self.ranked_backlog().get(self.selected).copied()
    }

    pub fn selected_my_task(&self) -> Option<&WorkItem> {
        self.my_tasks().get(self.selected).copied()
    }

    /// The task whose progress history is loaded, while it still exists.
    pub fn history_task(&self) -> Option<&WorkItem> {
        let (id, _) = self.progress_history.as_ref()?;
        self.snapshot.work_item(*id)
    }

    fn list_len(&self) -> usize {
        match self.view {
            View::Projects => self.snapshot.projects.len(),
            View::WorkItems => self.snapshot.work_items.len(),
            View::Backlogs => self.snapshot.backlogs.len(),
            View::MyTasks => self.my_tasks().len(),
            View::Dashboard | View::Reports | View::Settings => 0,
        }
    }

    fn clamp_selection(&mut self) {
        let len = self.list_len();
        if self.selected >= len {
            self.selected = len.saturating_sub(1);
        }
    }

    async fn submit_form(&mut self) {
        let Some(form) = self.form.clone() else {
            return;
        };
        let result = match form.kind {
            FormKind::Login => self.submit_login(&form).await,
            FormKind::Project { id } => self.submit_project(&form, id).await,
            FormKind::WorkItem { id } => self.submit_work_item(&form, id).await,
            FormKind::Backlog { id } => self.submit_backlog(&form, id).await,
            FormKind::Progress { work_item_id } => self.submit_progress(&form, work_item_id).await,
            FormKind::Azure => self.submit_azure(&form).await,
        };

        match result {
            Ok(msg) => {
                if form.kind != FormKind::Login {
                    self.form = None;
                }
                self.flash(msg);
            }
            Err(e) if is_auth_error(&e) && form.kind != FormKind::Login => self.expire_session(),
            Err(e) => {
                log::warn!("Form submit failed: {e:#}");
                if let Some(open) = self.form.as_mut() {
                    open.error = Some(format!("{e:#}"));
                }
            }
        }
    }

    fn session(&self) -> Result<Session> {
        self.session
            .clone()
            .ok_or_else(|| anyhow::anyhow!("Not logged in"))
    }

    async fn submit_login(&mut self, form: &Form) -> Result<String> {
        let (email, password) = form.credentials()?;
        let session = self.backend.login(&email, &password).await?;
        if let Err(e) = self.sessions.save(&session) {
            log::warn!("Session not persisted: {e:#}");
        }
        let greeting = format!("Welcome, {}", session.user.display_name());
        self.session = Some(session);
        self.form = None;
        self.view = View::Dashboard;
        self.selected = 0;
        self.refresh().await;
        Ok(greeting)
    }

    async fn submit_project(&mut self, form: &Form, id: Option<i64>) -> Result<String> {
        let input = form.project_input()?;
        let session = self.session()?;
        let project = self.backend.save_project(&session, id, &input).await?;
        self.snapshot.upsert_project(project);
        Ok(saved_message("Project", id))
    }

    async fn submit_work_item(&mut self, form: &Form, id: Option<i64>) -> Result<String> {
        let input = form.work_item_input()?;
        let session = self.session()?;
        let item = self.backend.save_work_item(&session, id, &input).await?;
        self.snapshot.upsert_work_item(item);
        Ok(saved_message("Work item", id))
    }

    async fn submit_backlog(&mut self, form: &Form, id: Option<i64>) -> Result<String> {
        let input = form.backlog_input()?;
        let session = self.session()?;
        let backlog = self.backend.save_backlog(&session, id, &input).await?;
        self.snapshot.upsert_backlog(backlog);
        Ok(saved_message("Backlog item", id))
    }

    async fn submit_progress(&mut self, form: &Form, work_item_id: i64) -> Result<String> {
        let input = form.progress_input(work_item_id)?;
        let session = self.session()?;
        let entry = self.backend.log_progress(&session, &input).await?;
        self.snapshot.apply_progress(&entry);
        if let Some((id, entries)) = self.progress_history.as_mut() {
            if *id == work_item_id {
                entries.push(entry);
            }
        }
        Ok("Progress logged successfully".into())
    }

    async fn submit_azure(&mut self, form: &Form) -> Result<String> {
        let config = form.azure_input()?;
        let session = self.session()?;
        self.backend.save_azure_config(&session, &config).await?;
        self.azure = Some(AzureConfig {
            personal_access_token: String::new(),
            ..config
        });
        Ok("Azure DevOps configuration saved".into())
    }

    async fn delete(&mut self, pending: PendingDelete) {
        let Some(session) = self.session.clone() else {
            return;
        };
        let result = match &pending {
            PendingDelete::WorkItem { id, .. } => {
                self.backend.delete_work_item(&session, *id).await.map(|_| {
                    self.snapshot.remove_work_item(*id);
                    "Work item deleted"
                })
            }
            PendingDelete::Backlog { id, .. } => {
                self.backend.delete_backlog(&session, *id).await.map(|_| {
                    self.snapshot.remove_backlog(*id);
                    "Backlog deleted"
                })
            }
        };
        match result {
            Ok(msg) => {
                self.clamp_selection();
                self.flash(msg);
            }
            Err(e) => self.report_error("Delete failed", e),
        }
    }

    async fn load_history(&mut self) {
        let Some(task_id) = self.selected_my_task().map(|t| t.id) else {
            return;
        };
        let Some(session) = self.session.clone() else {
            return;
        };
        match self.backend.progress(&session, task_id).await {
            Ok(entries) => self.progress_history = Some((task_id, entries)),
            Err(e) => self.report_error("Failed to load progress", e),
        }
    }

    async fn load_azure_config(&mut self) {
        let Some(session) = self.session.clone() else {
            return;
        };
        match self.backend.azure_config(&session).await {
            Ok(config) => self.azure = config,
            Err(e) => self.report_error("Failed to load Azure config", e),
        }
    }

    /// A sync rewrites backend rows we never saw, so the whole snapshot
    /// is reloaded afterwards.
    async fn sync(&mut self) {
        let Some(session) = self.session.clone() else {
            return;
        };
        self.flash("Syncing...");
        match self.backend.sync_azure(&session).await {
            Ok(result) => {
                self.refresh().await;
                // The reload may have ended the session.
                if self.session.is_none() {
                    return;
                }
                self.flash(format!(
                    "Synced {} work items from Azure DevOps",
                    result.synced_count
                ));
            }
            Err(e) => self.report_error("Failed to sync with Azure DevOps", e),
        }
    }

    fn export_report(&mut self, which: Report) {
        let result = match which {
            Report::Utilization => {
                export::write_report(&self.snapshot.utilization, which, &self.export)
            }
            Report::ProjectStatus => {
                export::write_report(&self.snapshot.project_status, which, &self.export)
            }
        };
        match result {
            Ok(path) => self.flash(format!("Exported {}", path.display())),
            Err(e) => self.report_error("Export failed", e),
        }
    }

    fn report_error(&mut self, what: &str, err: anyhow::Error) {
        if is_auth_error(&err) {
            self.expire_session();
            return;
        }
        log::warn!("{what}: {err:#}");
        self.flash(format!("{what}: {err:#}"));
    }

    fn expire_session(&mut self) {
        log::info!("Session rejected by backend");
        self.logout();
        self.flash("Session expired, please sign in again");
    }

    /// Drops the credential everywhere and returns to the login form.
    pub fn logout(&mut self) {
        let email = self
            .session
            .take()
            .map(|s| s.user.email)
            .unwrap_or_default();
        if let Err(e) = self.sessions.clear() {
            log::warn!("Failed to clear session: {e:#}");
        }
        log::info!("Logged out {email}");
        self.snapshot = Snapshot::default();
        self.azure = None;
        self.progress_history = None;
        self.confirm = None;
        self.loading = false;
        self.selected = 0;
        self.view = View::Dashboard;
        self.form = Some(Form::login(&email));
        self.flash("Logged out successfully");
    }
}

fn saved_message(what: &str, id: Option<i64>) -> String {
    match id {
        Some(_) => format!("{what} updated"),
        None => format!("{what} created"),
    }
}
