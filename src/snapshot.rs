use crate::model::backlog::BacklogItem;
use crate::model::progress::TaskProgressEntry;
use crate::model::project::Project;
use crate::model::report::{ProjectStatusRow, UtilizationRow};
use crate::model::work_item::WorkItem;

/// Point-in-time copy of the backend collections the views render from.
///
/// Writes are merged in place with the entity the backend returns; a full
/// reload replaces the whole snapshot.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    pub projects: Vec<Project>,
    pub work_items: Vec<WorkItem>,
    pub backlogs: Vec<BacklogItem>,
    pub utilization: Vec<UtilizationRow>,
    pub project_status: Vec<ProjectStatusRow>,
}

fn upsert<T>(items: &mut Vec<T>, item: T, id: impl Fn(&T) -> i64) {
    let key = id(&item);
    match items.iter_mut().find(|existing| id(&**existing) == key) {
        Some(existing) => *existing = item,
        None => items.push(item),
    }
}

impl Snapshot {
    pub fn upsert_project(&mut self, project: Project) {
        upsert(&mut self.projects, project, |p| p.id);
    }

    /// Write responses omit `actual_hours`; keep the logged hours the
    /// snapshot already has for that item.
    pub fn upsert_work_item(&mut self, mut item: WorkItem) {
        if item.actual_hours.is_none() {
            item.actual_hours = self
                .work_items
                .iter()
                .find(|w| w.id == item.id)
                .and_then(|w| w.actual_hours);
        }
        upsert(&mut self.work_items, item, |w| w.id);
    }

    pub fn remove_work_item(&mut self, id: i64) {
        self.work_items.retain(|w| w.id != id);
    }

    pub fn upsert_backlog(&mut self, backlog: BacklogItem) {
        upsert(&mut self.backlogs, backlog, |b| b.id);
    }

    pub fn remove_backlog(&mut self, id: i64) {
        self.backlogs.retain(|b| b.id != id);
    }

    /// The backend keeps `actual_hours` as the sum of logged hours, so a new
    /// entry adds its hours to the held item.
    pub fn apply_progress(&mut self, entry: &TaskProgressEntry) {
        if let Some(item) = self.work_items.iter_mut().find(|w| w.id == entry.work_item_id) {
            item.actual_hours = Some(item.actual_hours.unwrap_or(0.0) + entry.hours_worked);
        }
    }

    pub fn work_item(&self, id: i64) -> Option<&WorkItem> {
        self.work_items.iter().find(|w| w.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn item(id: i64, title: &str, actual: Option<f64>) -> WorkItem {
        WorkItem {
            id,
            project_id: Some(1),
            title: title.into(),
            description: None,
            kind: Some("task".into()),
            priority: Some("medium".into()),
            status: Some("new".into()),
            assigned_to: Some("john.doe@example.com".into()),
            start_date: None,
            end_date: None,
            estimated_hours: Some(8.0),
            actual_hours: actual,
            t_shirt_size: Some("M".into()),
            ado_id: None,
        }
    }

    fn backlog(id: i64, priority: i64) -> BacklogItem {
        BacklogItem {
            id,
            project_id: Some(1),
            title: format!("Idea {id}"),
            description: None,
            priority,
            status: Some("new".into()),
            created_by: None,
        }
    }

    #[test]
    fn upsert_appends_new_and_replaces_existing() {
        let mut snap = Snapshot::default();
        snap.upsert_work_item(item(1, "first", None));
        snap.upsert_work_item(item(2, "second", None));
        snap.upsert_work_item(item(1, "first renamed", None));

        let titles: Vec<&str> = snap.work_items.iter().map(|w| w.title.as_str()).collect();
        assert_eq!(titles, vec!["first renamed", "second"]);
    }

    #[test]
    fn update_keeps_logged_hours() {
        let mut snap = Snapshot::default();
        snap.upsert_work_item(item(1, "task", Some(5.5)));
        snap.upsert_work_item(item(1, "task edited", None));
        assert_eq!(snap.work_item(1).unwrap().actual_hours, Some(5.5));
    }

    #[test]
    fn remove_only_matching_ids() {
        let mut snap = Snapshot::default();
        snap.upsert_backlog(backlog(1, 2));
        snap.upsert_backlog(backlog(2, 1));
        snap.remove_backlog(1);
        snap.remove_backlog(42);
        assert_eq!(snap.backlogs.len(), 1);
        assert_eq!(snap.backlogs[0].id, 2);
    }

    #[test]
    fn progress_adds_hours() {
        let mut snap = Snapshot::default();
        snap.upsert_work_item(item(3, "task", None));
        let entry = TaskProgressEntry {
            id: Some(10),
            work_item_id: 3,
            hours_worked: 2.5,
            progress_percentage: 40.0,
            notes: None,
            date: NaiveDate::from_ymd_opt(2024, 5, 2).unwrap(),
            user_email: None,
        };
        snap.apply_progress(&entry);
        snap.apply_progress(&entry);
        assert_eq!(snap.work_item(3).unwrap().actual_hours, Some(5.0));
    }
}
