//! Derived reporting figures.
//!
//! Everything here is a pure function over an already-fetched snapshot:
//! no I/O, no retained state, safe to call in any order on every render.

pub mod csv;

use std::collections::HashMap;

use serde::Serialize;

use crate::model::backlog::BacklogItem;
use crate::model::project::Project;
use crate::model::report::{ProjectStatusRow, UtilizationRow};
use crate::model::work_item::{WorkItem, IN_PROGRESS};

/// Bucket name for work items that carry no status at all. Matches the
/// label the web dashboard shows for the same items.
pub const NO_STATUS: &str = "null";

/// Longest project name shown on the completion chart.
const PROGRESS_NAME_LEN: usize = 15;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusCount {
    pub name: String,
    pub value: u64,
}

/// Percentage of `numerator` over `denominator`, rounded to the nearest
/// integer with halves rounding up.
///
/// A missing, zero or non-finite denominator yields 0.
pub fn ratio(numerator: f64, denominator: Option<f64>) -> i64 {
    let denominator = match denominator {
        Some(d) if d != 0.0 && d.is_finite() => d,
        _ => return 0,
    };
    let pct = (numerator / denominator * 100.0 + 0.5).floor();
    if pct.is_finite() {
        pct as i64
    } else {
        0
    }
}

/// Completed items over total items for one project.
pub fn completion_percent(row: &ProjectStatusRow) -> i64 {
    ratio(
        row.completed_items.unwrap_or(0) as f64,
        row.total_work_items.map(|t| t as f64),
    )
}

/// Actual hours over estimated hours for one team member.
pub fn utilization_percent(row: &UtilizationRow) -> i64 {
    ratio(
        row.total_actual_hours.unwrap_or(0.0),
        row.total_estimated_hours,
    )
}

/// Counts work items per status, in the order each status is first seen.
///
/// Only observed statuses appear; nothing is zero-filled.
pub fn status_distribution(items: &[WorkItem]) -> Vec<StatusCount> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut counts: Vec<StatusCount> = Vec::new();

    for item in items {
        let status = item.status.as_deref().unwrap_or(NO_STATUS);
        match index.get(status) {
            Some(&i) => counts[i].value += 1,
            None => {
                index.insert(status, counts.len());
                counts.push(StatusCount {
                    name: status.to_string(),
                    value: 1,
                });
            }
        }
    }

    counts
}

/// Work items assigned to exactly `email` (case-sensitive, untrimmed),
/// in input order.
pub fn my_tasks<'a>(
    items: impl IntoIterator<Item = &'a WorkItem>,
    email: &str,
) -> Vec<&'a WorkItem> {
    items
        .into_iter()
        .filter(|item| item.assigned_to.as_deref() == Some(email))
        .collect()
}

/// Backlog entries ranked by ascending priority. Ties keep input order.
pub fn ranked_backlog(items: &[BacklogItem]) -> Vec<&BacklogItem> {
    let mut ranked: Vec<&BacklogItem> = items.iter().collect();
    ranked.sort_by_key(|b| b.priority);
    ranked
}

/// Name of the project with `id`, or `N/A`.
pub fn project_name(projects: &[Project], id: Option<i64>) -> &str {
    id.and_then(|id| projects.iter().find(|p| p.id == id))
        .map(|p| p.name.as_str())
        .unwrap_or("N/A")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DashboardStats {
    pub projects: usize,
    pub work_items: usize,
    pub in_progress: usize,
    pub team_members: usize,
}

pub fn dashboard_stats(
    projects: &[Project],
    items: &[WorkItem],
    utilization: &[UtilizationRow],
) -> DashboardStats {
    DashboardStats {
        projects: projects.len(),
        work_items: items.len(),
        in_progress: items
            .iter()
            .filter(|i| i.status.as_deref() == Some(IN_PROGRESS))
            .count(),
        team_members: utilization.len(),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectProgress {
    pub name: String,
    pub completion: i64,
}

/// Chart rows for the dashboard's project completion bars.
pub fn project_progress(rows: &[ProjectStatusRow]) -> Vec<ProjectProgress> {
    rows.iter()
        .map(|row| {
            let name = match row.name.as_deref() {
                Some(n) if !n.is_empty() => n.chars().take(PROGRESS_NAME_LEN).collect(),
                _ => "Unnamed".to_string(),
            };
            ProjectProgress {
                name,
                completion: completion_percent(row),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: i64, status: Option<&str>, assigned_to: Option<&str>) -> WorkItem {
        WorkItem {
            id,
            project_id: Some(1),
            title: format!("Item {id}"),
            description: None,
            kind: Some("task".into()),
            priority: Some("medium".into()),
            status: status.map(String::from),
            assigned_to: assigned_to.map(String::from),
            start_date: None,
            end_date: None,
            estimated_hours: None,
            actual_hours: None,
            t_shirt_size: None,
            ado_id: None,
        }
    }

    fn status_row(total: Option<i64>, completed: Option<i64>) -> ProjectStatusRow {
        ProjectStatusRow {
            id: 1,
            name: Some("Apollo".into()),
            status: Some("active".into()),
            total_work_items: total,
            completed_items: completed,
            in_progress_items: None,
            total_estimated_hours: None,
            total_actual_hours: None,
        }
    }

    fn backlog(id: i64, priority: i64) -> BacklogItem {
        BacklogItem {
            id,
            project_id: Some(1),
            title: format!("Backlog {id}"),
            description: None,
            priority,
            status: Some("new".into()),
            created_by: None,
        }
    }

    #[test]
    fn ratio_zero_or_missing_denominator_is_zero() {
        for a in [0.0, 1.0, 3.0, 1234.5] {
            assert_eq!(ratio(a, Some(0.0)), 0);
            assert_eq!(ratio(a, None), 0);
        }
    }

    #[test]
    fn ratio_rounds_to_nearest_percent() {
        assert_eq!(ratio(3.0, Some(4.0)), 75);
        assert_eq!(ratio(1.0, Some(3.0)), 33);
        assert_eq!(ratio(2.0, Some(3.0)), 67);
        assert_eq!(ratio(1.0, Some(8.0)), 13);
        assert_eq!(ratio(0.0, Some(5.0)), 0);
    }

    #[test]
    fn ratio_allows_over_one_hundred() {
        assert_eq!(ratio(15.0, Some(10.0)), 150);
    }

    #[test]
    fn ratio_non_finite_denominator_is_zero() {
        assert_eq!(ratio(1.0, Some(f64::NAN)), 0);
        assert_eq!(ratio(1.0, Some(f64::INFINITY)), 0);
    }

    #[test]
    fn completion_with_zero_total_is_zero() {
        assert_eq!(completion_percent(&status_row(Some(0), Some(3))), 0);
        assert_eq!(completion_percent(&status_row(None, Some(3))), 0);
        assert_eq!(completion_percent(&status_row(Some(4), None)), 0);
        assert_eq!(completion_percent(&status_row(Some(4), Some(3))), 75);
    }

    #[test]
    fn utilization_uses_same_ratio() {
        let row = UtilizationRow {
            name: Some("John".into()),
            email: "john.doe@example.com".into(),
            total_tasks: 3,
            total_estimated_hours: Some(40.0),
            total_actual_hours: Some(30.0),
            avg_progress: None,
        };
        assert_eq!(utilization_percent(&row), 75);

        let idle = UtilizationRow {
            total_estimated_hours: None,
            total_actual_hours: None,
            ..row
        };
        assert_eq!(utilization_percent(&idle), 0);
    }

    #[test]
    fn distribution_keeps_first_seen_order() {
        let items = vec![
            item(1, Some("new"), None),
            item(2, Some("new"), None),
            item(3, Some("done"), None),
        ];
        assert_eq!(
            status_distribution(&items),
            vec![
                StatusCount { name: "new".into(), value: 2 },
                StatusCount { name: "done".into(), value: 1 },
            ]
        );
    }

    #[test]
    fn distribution_of_nothing_is_empty() {
        assert!(status_distribution(&[]).is_empty());
    }

    #[test]
    fn distribution_sums_to_item_count() {
        let items: Vec<WorkItem> = ["blocked", "new", "testing", "new", "Committed", "blocked"]
            .iter()
            .enumerate()
            .map(|(i, s)| item(i as i64, Some(*s), None))
            .chain(std::iter::once(item(99, None, None)))
            .collect();
        let dist = status_distribution(&items);
        let total: u64 = dist.iter().map(|c| c.value).sum();
        assert_eq!(total as usize, items.len());
        assert_eq!(dist[0].name, "blocked");
        assert_eq!(dist.last().unwrap().name, NO_STATUS);
        assert!(!dist.iter().any(|c| c.name == "completed"));
    }

    #[test]
    fn missing_status_is_bucketed_as_null() {
        let items = vec![item(1, None, None), item(2, Some("new"), None), item(3, None, None)];
        let dist = status_distribution(&items);
        assert_eq!(
            dist,
            vec![
                StatusCount { name: "null".into(), value: 2 },
                StatusCount { name: "new".into(), value: 1 },
            ]
        );
    }

    #[test]
    fn my_tasks_matches_exactly_and_keeps_order() {
        let items = vec![
            item(1, Some("new"), Some("x@y.com")),
            item(2, Some("new"), Some("X@y.com")),
            item(3, Some("new"), Some(" x@y.com")),
            item(4, Some("new"), None),
            item(5, Some("done"), Some("x@y.com")),
        ];
        let mine = my_tasks(&items, "x@y.com");
        let ids: Vec<i64> = mine.iter().map(|i| i.id).collect();
        assert_eq!(ids, vec![1, 5]);

        let again = my_tasks(mine.iter().copied(), "x@y.com");
        assert_eq!(again, mine);
    }

    #[test]
    fn my_tasks_can_be_empty() {
        let items = vec![item(1, Some("new"), Some("a@b.com"))];
        assert!(my_tasks(&items, "x@y.com").is_empty());
    }

    #[test]
    fn backlog_ranked_by_priority_stable() {
        let items = vec![backlog(1, 5), backlog(2, 0), backlog(3, 5), backlog(4, 1)];
        let ids: Vec<i64> = ranked_backlog(&items).iter().map(|b| b.id).collect();
        assert_eq!(ids, vec![2, 4, 1, 3]);
    }

    #[test]
    fn dashboard_counts_in_progress_items() {
        let items = vec![
            item(1, Some("in-progress"), None),
            item(2, Some("new"), None),
            item(3, Some("in-progress"), None),
        ];
        let stats = dashboard_stats(&[], &items, &[]);
        assert_eq!(stats.work_items, 3);
        assert_eq!(stats.in_progress, 2);
        assert_eq!(stats.projects, 0);
    }

    #[test]
    fn project_progress_truncates_names() {
        let mut long = status_row(Some(2), Some(1));
        long.name = Some("Infrastructure Migration".into());
        let mut unnamed = status_row(Some(0), Some(0));
        unnamed.name = None;

        let progress = project_progress(&[long, unnamed]);
        assert_eq!(progress[0].name, "Infrastructure ");
        assert_eq!(progress[0].completion, 50);
        assert_eq!(progress[1].name, "Unnamed");
        assert_eq!(progress[1].completion, 0);
    }

    #[test]
    fn project_name_falls_back() {
        let projects = vec![Project {
            id: 4,
            name: "Spark".into(),
            description: None,
            start_date: None,
            end_date: None,
            status: Some("active".into()),
        }];
        assert_eq!(project_name(&projects, Some(4)), "Spark");
        assert_eq!(project_name(&projects, Some(5)), "N/A");
        assert_eq!(project_name(&projects, None), "N/A");
    }
}
