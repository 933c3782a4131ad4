//! Modal form drafts and their conversion into backend payloads.

use chrono::NaiveDate;
use serde::Serialize;
use thiserror::Error;

use crate::model::azure::AzureConfig;
use crate::model::backlog::{self, BacklogInput, BacklogItem};
use crate::model::progress::ProgressInput;
use crate::model::project::{self, Project, ProjectInput};
use crate::model::work_item::{self, WorkItem, WorkItemInput};

#[derive(Debug, Error, PartialEq)]
pub enum FormError {
    #[error("{0} is required")]
    Required(&'static str),
    #[error("{label}: {reason}")]
    Invalid { label: &'static str, reason: String },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Choice {
    pub value: String,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum FieldKind {
    Text,
    Secret,
    Choice(Vec<Choice>),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Field {
    pub label: &'static str,
    pub value: String,
    pub kind: FieldKind,
}

impl Field {
    fn text(label: &'static str, value: impl Into<String>) -> Self {
        Self {
            label,
            value: value.into(),
            kind: FieldKind::Text,
        }
    }

    fn secret(label: &'static str, value: impl Into<String>) -> Self {
        Self {
            label,
            value: value.into(),
            kind: FieldKind::Secret,
        }
    }

    fn choice(label: &'static str, value: impl Into<String>, options: Vec<Choice>) -> Self {
        Self {
            label,
            value: value.into(),
            kind: FieldKind::Choice(options),
        }
    }

    fn options(label: &'static str, value: &str, values: &[&str]) -> Self {
        let options = values
            .iter()
            .map(|v| Choice {
                value: v.to_string(),
                label: v.to_string(),
            })
            .collect();
        Self::choice(label, value, options)
    }

    /// Label of the selected choice, or the raw value.
    pub fn display(&self) -> String {
        match &self.kind {
            FieldKind::Secret => "•".repeat(self.value.chars().count()),
            FieldKind::Choice(options) => options
                .iter()
                .find(|c| c.value == self.value)
                .map(|c| c.label.clone())
                .unwrap_or_else(|| self.value.clone()),
            FieldKind::Text => self.value.clone(),
        }
    }
}

/// What a submitted form writes. Ids are `None` for creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FormKind {
    Login,
    Project { id: Option<i64> },
    WorkItem { id: Option<i64> },
    Backlog { id: Option<i64> },
    Progress { work_item_id: i64 },
    Azure,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Form {
    pub kind: FormKind,
    pub title: String,
    pub fields: Vec<Field>,
    pub focus: usize,
    pub error: Option<String>,
}

const EMAIL: &str = "Email";
const PASSWORD: &str = "Password";
const NAME: &str = "Name";
const PROJECT: &str = "Project";
const TITLE: &str = "Title";
const DESCRIPTION: &str = "Description";
const START: &str = "Start date";
const END: &str = "End date";
const STATUS: &str = "Status";
const TYPE: &str = "Type";
const PRIORITY: &str = "Priority";
const ASSIGNED: &str = "Assigned to";
const ESTIMATE: &str = "Estimated hours";
const SIZE: &str = "T-shirt size";
const DATE: &str = "Date";
const HOURS: &str = "Hours worked";
const PERCENT: &str = "Progress %";
const NOTES: &str = "Notes";
const ORG_URL: &str = "Organization URL";
const ADO_PROJECT: &str = "Project name";
const PAT: &str = "Personal access token";

fn project_choices(projects: &[Project]) -> Vec<Choice> {
    projects
        .iter()
        .map(|p| Choice {
            value: p.id.to_string(),
            label: p.name.clone(),
        })
        .collect()
}

fn or_default(
    existing: Option<&WorkItem>,
    field: impl Fn(&WorkItem) -> Option<&str>,
    default: &str,
) -> String {
    existing.and_then(field).unwrap_or(default).to_string()
}

fn date_text(d: Option<NaiveDate>) -> String {
    d.map(|d| d.to_string()).unwrap_or_default()
}

impl Form {
    fn new(kind: FormKind, title: impl Into<String>, fields: Vec<Field>) -> Self {
        Self {
            kind,
            title: title.into(),
            fields,
            focus: 0,
            error: None,
        }
    }

    pub fn login(email: &str) -> Self {
        let mut form = Self::new(
            FormKind::Login,
            "Sign in",
            vec![Field::text(EMAIL, email), Field::secret(PASSWORD, "")],
        );
        if !email.is_empty() {
            form.focus = 1;
        }
        form
    }

    pub fn project(existing: Option<&Project>) -> Self {
        let (title, id) = match existing {
            Some(p) => ("Edit Project", Some(p.id)),
            None => ("New Project", None),
        };
        Self::new(
            FormKind::Project { id },
            title,
            vec![
                Field::text(NAME, existing.map(|p| p.name.clone()).unwrap_or_default()),
                Field::text(
                    DESCRIPTION,
                    existing.and_then(|p| p.description.clone()).unwrap_or_default(),
                ),
                Field::text(START, date_text(existing.and_then(|p| p.start_date))),
                Field::text(END, date_text(existing.and_then(|p| p.end_date))),
                Field::options(
                    STATUS,
                    existing
                        .and_then(|p| p.status.as_deref())
                        .unwrap_or("active"),
                    project::STATUSES,
                ),
            ],
        )
    }

    pub fn work_item(existing: Option<&WorkItem>, projects: &[Project]) -> Self {
        let (title, id) = match existing {
            Some(w) => ("Edit Work Item", Some(w.id)),
            None => ("New Work Item", None),
        };
        let project_id = existing
            .and_then(|w| w.project_id)
            .or_else(|| projects.first().map(|p| p.id))
            .map(|id| id.to_string())
            .unwrap_or_default();

        Self::new(
            FormKind::WorkItem { id },
            title,
            vec![
                Field::choice(PROJECT, project_id, project_choices(projects)),
                Field::text(TITLE, existing.map(|w| w.title.clone()).unwrap_or_default()),
                Field::text(DESCRIPTION, or_default(existing, |w| w.description.as_deref(), "")),
                Field::options(TYPE, &or_default(existing, |w| w.kind.as_deref(), "task"), work_item::TYPES),
                Field::options(
                    PRIORITY,
                    &or_default(existing, |w| w.priority.as_deref(), "medium"),
                    work_item::PRIORITIES,
                ),
                Field::options(
                    STATUS,
                    &or_default(existing, |w| w.status.as_deref(), "new"),
                    work_item::STATUSES,
                ),
                Field::text(ASSIGNED, or_default(existing, |w| w.assigned_to.as_deref(), "")),
                Field::text(START, date_text(existing.and_then(|w| w.start_date))),
                Field::text(END, date_text(existing.and_then(|w| w.end_date))),
                Field::text(
                    ESTIMATE,
                    existing
                        .and_then(|w| w.estimated_hours)
                        .filter(|h| *h != 0.0)
                        .map(|h| h.to_string())
                        .unwrap_or_default(),
                ),
                Field::options(
                    SIZE,
                    &or_default(existing, |w| w.t_shirt_size.as_deref(), "M"),
                    work_item::T_SHIRT_SIZES,
                ),
            ],
        )
    }

    pub fn backlog(existing: Option<&BacklogItem>, projects: &[Project]) -> Self {
        let (title, id) = match existing {
            Some(b) => ("Edit Backlog Item", Some(b.id)),
            None => ("New Backlog Item", None),
        };
        let project_id = existing
            .and_then(|b| b.project_id)
            .or_else(|| projects.first().map(|p| p.id))
            .map(|id| id.to_string())
            .unwrap_or_default();

        Self::new(
            FormKind::Backlog { id },
            title,
            vec![
                Field::choice(PROJECT, project_id, project_choices(projects)),
                Field::text(TITLE, existing.map(|b| b.title.clone()).unwrap_or_default()),
                Field::text(
                    DESCRIPTION,
                    existing.and_then(|b| b.description.clone()).unwrap_or_default(),
                ),
                Field::text(
                    PRIORITY,
                    existing.map(|b| b.priority).unwrap_or(0).to_string(),
                ),
                Field::options(
                    STATUS,
                    existing.and_then(|b| b.status.as_deref()).unwrap_or("new"),
                    backlog::STATUSES,
                ),
            ],
        )
    }

    pub fn progress(task: &WorkItem, today: NaiveDate) -> Self {
        Self::new(
            FormKind::Progress {
                work_item_id: task.id,
            },
            format!("Log Progress: {}", task.title),
            vec![
                Field::text(DATE, today.to_string()),
                Field::text(HOURS, ""),
                Field::text(PERCENT, ""),
                Field::text(NOTES, ""),
            ],
        )
    }

    pub fn azure(existing: Option<&AzureConfig>) -> Self {
        Self::new(
            FormKind::Azure,
            "Azure DevOps Integration",
            vec![
                Field::text(
                    ORG_URL,
                    existing.map(|c| c.organization_url.clone()).unwrap_or_default(),
                ),
                Field::text(
                    ADO_PROJECT,
                    existing.map(|c| c.project_name.clone()).unwrap_or_default(),
                ),
                // The backend only ever returns a masked token
                Field::secret(PAT, ""),
            ],
        )
    }

    pub fn focused(&self) -> Option<&Field> {
        self.fields.get(self.focus)
    }

    pub fn next_field(&mut self) {
        if !self.fields.is_empty() {
            self.focus = (self.focus + 1) % self.fields.len();
        }
    }

    pub fn prev_field(&mut self) {
        if !self.fields.is_empty() {
            self.focus = (self.focus + self.fields.len() - 1) % self.fields.len();
        }
    }

    /// Typing into a choice field is ignored; use [`Form::cycle`].
    pub fn input(&mut self, c: char) {
        if let Some(field) = self.fields.get_mut(self.focus) {
            if !matches!(field.kind, FieldKind::Choice(_)) {
                field.value.push(c);
            }
        }
    }

    pub fn backspace(&mut self) {
        if let Some(field) = self.fields.get_mut(self.focus) {
            if !matches!(field.kind, FieldKind::Choice(_)) {
                field.value.pop();
            }
        }
    }

    /// Moves a choice field `step` options forward (or back), wrapping.
    pub fn cycle(&mut self, step: isize) {
        let Some(field) = self.fields.get_mut(self.focus) else {
            return;
        };
        let FieldKind::Choice(options) = &field.kind else {
            return;
        };
        if options.is_empty() {
            return;
        }
        let len = options.len() as isize;
        let current = options
            .iter()
            .position(|c| c.value == field.value)
            .map(|i| i as isize)
            .unwrap_or(-1);
        let next = (current + step).rem_euclid(len) as usize;
        field.value = options[next].value.clone();
    }

    fn value(&self, label: &str) -> &str {
        self.fields
            .iter()
            .find(|f| f.label == label)
            .map(|f| f.value.trim())
            .unwrap_or("")
    }

    fn required(&self, label: &'static str) -> Result<String, FormError> {
        let v = self.value(label);
        if v.is_empty() {
            Err(FormError::Required(label))
        } else {
            Ok(v.to_string())
        }
    }

    fn optional(&self, label: &str) -> Option<String> {
        let v = self.value(label);
        (!v.is_empty()).then(|| v.to_string())
    }

    fn date(&self, label: &'static str) -> Result<Option<NaiveDate>, FormError> {
        match self.optional(label) {
            None => Ok(None),
            Some(s) => NaiveDate::parse_from_str(&s, "%Y-%m-%d")
                .map(Some)
                .map_err(|_| FormError::Invalid {
                    label,
                    reason: "expected YYYY-MM-DD".into(),
                }),
        }
    }

    fn number(&self, label: &'static str, min: f64, max: f64) -> Result<f64, FormError> {
        let raw = self.required(label)?;
        let n: f64 = raw.parse().map_err(|_| FormError::Invalid {
            label,
            reason: format!("'{raw}' is not a number"),
        })?;
        if !(min..=max).contains(&n) {
            return Err(FormError::Invalid {
                label,
                reason: format!("must be between {min} and {max}"),
            });
        }
        Ok(n)
    }

    fn project_id(&self) -> Result<i64, FormError> {
        self.required(PROJECT)?
            .parse()
            .map_err(|_| FormError::Required(PROJECT))
    }

    pub fn credentials(&self) -> Result<(String, String), FormError> {
        let email = self.required(EMAIL)?;
        let password = self
            .fields
            .iter()
            .find(|f| f.label == PASSWORD)
            .map(|f| f.value.clone())
            .filter(|p| !p.is_empty())
            .ok_or(FormError::Required(PASSWORD))?;
        Ok((email, password))
    }

    pub fn project_input(&self) -> Result<ProjectInput, FormError> {
        Ok(ProjectInput {
            name: self.required(NAME)?,
            description: self.optional(DESCRIPTION),
            start_date: self.date(START)?,
            end_date: self.date(END)?,
            status: self.required(STATUS)?,
        })
    }

    pub fn work_item_input(&self) -> Result<WorkItemInput, FormError> {
        let estimated_hours = match self.optional(ESTIMATE) {
            None => None,
            Some(_) => Some(self.number(ESTIMATE, 0.0, f64::MAX)?),
        };
        Ok(WorkItemInput {
            project_id: self.project_id()?,
            title: self.required(TITLE)?,
            description: self.optional(DESCRIPTION),
            kind: self.required(TYPE)?,
            priority: self.required(PRIORITY)?,
            status: self.required(STATUS)?,
            assigned_to: self.optional(ASSIGNED),
            start_date: self.date(START)?,
            end_date: self.date(END)?,
            estimated_hours,
            t_shirt_size: self.optional(SIZE),
        })
    }

    pub fn backlog_input(&self) -> Result<BacklogInput, FormError> {
        let raw = self.optional(PRIORITY).unwrap_or_else(|| "0".into());
        let priority: i64 = raw.parse().map_err(|_| FormError::Invalid {
            label: PRIORITY,
            reason: format!("'{raw}' is not a whole number"),
        })?;
        if priority < 0 {
            return Err(FormError::Invalid {
                label: PRIORITY,
                reason: "must be 0 or more".into(),
            });
        }
        Ok(BacklogInput {
            project_id: self.project_id()?,
            title: self.required(TITLE)?,
            description: self.optional(DESCRIPTION),
            priority,
            status: self.required(STATUS)?,
        })
    }

    pub fn progress_input(&self, work_item_id: i64) -> Result<ProgressInput, FormError> {
        let date = self.date(DATE)?.ok_or(FormError::Required(DATE))?;
        Ok(ProgressInput {
            work_item_id,
            hours_worked: self.number(HOURS, 0.0, f64::MAX)?,
            progress_percentage: self.number(PERCENT, 0.0, 100.0)?,
            notes: self.optional(NOTES),
            date,
        })
    }

    pub fn azure_input(&self) -> Result<AzureConfig, FormError> {
        Ok(AzureConfig {
            id: None,
            organization_url: self.required(ORG_URL)?,
            project_name: self.required(ADO_PROJECT)?,
            personal_access_token: self.required(PAT)?,
        })
    }
}
