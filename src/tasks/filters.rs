// src/tasks/filters.rs
//! Query-string filters for task listings.
//!
//! Distinct filter keys combine with AND; multi-valued keys (status,
//! priority) are comma-separated lists combined with OR within themselves.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use sqlx::{QueryBuilder, Sqlite};

use crate::api::error::{ApiError, validation_error};
use crate::tasks::types::{PRIORITY_MAX, PRIORITY_MIN, TaskStatus};

/// Raw query-string parameters accepted by task list endpoints.
/// Unknown keys are ignored; absent keys impose no restriction.
#[derive(Debug, Default, Deserialize)]
pub struct TaskQuery {
    pub title: Option<String>,
    pub status: Option<String>,
    pub priority: Option<String>,
    pub project: Option<String>,
    pub project_name: Option<String>,
    pub assignee: Option<String>,
    pub creator: Option<String>,
    pub created_after: Option<DateTime<Utc>>,
    pub created_before: Option<DateTime<Utc>>,
    pub deadline_after: Option<DateTime<Utc>>,
    pub deadline_before: Option<DateTime<Utc>>,
    pub is_overdue: Option<bool>,
    pub no_assignee: Option<bool>,
    pub search: Option<String>,
    pub ordering: Option<String>,
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

/// Validated filter set, ready to be pushed onto a query.
#[derive(Debug, Default, Clone)]
pub struct TaskFilter {
    pub title: Option<String>,
    pub statuses: Vec<TaskStatus>,
    pub priorities: Vec<i32>,
    pub project: Option<String>,
    pub project_name: Option<String>,
    pub assignee: Option<String>,
    pub creator: Option<String>,
    pub created_after: Option<DateTime<Utc>>,
    pub created_before: Option<DateTime<Utc>>,
    pub deadline_after: Option<DateTime<Utc>>,
    pub deadline_before: Option<DateTime<Utc>>,
    pub is_overdue: bool,
    pub no_assignee: bool,
    pub search: Option<String>,
    pub(crate) ordering: Option<&'static str>,
}

const DEFAULT_ORDERING: &str = "t.priority DESC, t.created_at DESC";

fn order_clause(ordering: Option<&str>) -> &'static str {
    match ordering {
        Some("priority") => "t.priority ASC",
        Some("-priority") => "t.priority DESC",
        Some("created_at") => "t.created_at ASC",
        Some("-created_at") => "t.created_at DESC",
        Some("updated_at") => "t.updated_at ASC",
        Some("-updated_at") => "t.updated_at DESC",
        Some("deadline") => "t.deadline ASC",
        Some("-deadline") => "t.deadline DESC",
        Some("status") => "t.status ASC",
        Some("-status") => "t.status DESC",
        // Anything outside the allow-list falls back to the default.
        _ => DEFAULT_ORDERING,
    }
}

fn split_values(raw: &str) -> impl Iterator<Item = &str> {
    raw.split(',').map(str::trim).filter(|part| !part.is_empty())
}

impl TaskFilter {
    pub fn from_query(query: &TaskQuery) -> Result<Self, ApiError> {
        let mut statuses = Vec::new();
        if let Some(raw) = &query.status {
            for part in split_values(raw) {
                let status = part.parse::<TaskStatus>().map_err(|_| {
                    validation_error("status", &format!("'{part}' is not a valid choice"))
                })?;
                statuses.push(status);
            }
        }

        let mut priorities = Vec::new();
        if let Some(raw) = &query.priority {
            for part in split_values(raw) {
                let priority: i32 = part.parse().map_err(|_| {
                    validation_error("priority", &format!("'{part}' is not a valid choice"))
                })?;
                if !(PRIORITY_MIN..=PRIORITY_MAX).contains(&priority) {
                    return Err(validation_error("priority", "must be between 1 and 4"));
                }
                priorities.push(priority);
            }
        }

        Ok(Self {
            title: query.title.clone(),
            statuses,
            priorities,
            project: query.project.clone(),
            project_name: query.project_name.clone(),
            assignee: query.assignee.clone(),
            creator: query.creator.clone(),
            created_after: query.created_after,
            created_before: query.created_before,
            deadline_after: query.deadline_after,
            deadline_before: query.deadline_before,
            // Only `true` restricts; `false` is a no-op, not "not overdue".
            is_overdue: query.is_overdue.unwrap_or(false),
            no_assignee: query.no_assignee.unwrap_or(false),
            search: query.search.clone(),
            ordering: Some(order_clause(query.ordering.as_deref())),
        })
    }

    /// Append every supplied predicate as an AND clause. Multi-valued
    /// filters expand to an IN list (an OR within the key).
    pub fn push_where(&self, qb: &mut QueryBuilder<'_, Sqlite>, now: DateTime<Utc>) {
        if let Some(title) = &self.title {
            let pattern = format!("%{}%", title.to_lowercase());
            qb.push(" AND lower(t.title) LIKE ").push_bind(pattern);
        }
        if !self.statuses.is_empty() {
            qb.push(" AND t.status IN (");
            {
                let mut values = qb.separated(", ");
                for status in &self.statuses {
                    values.push_bind(status.to_string());
                }
            }
            qb.push(")");
        }
        if !self.priorities.is_empty() {
            qb.push(" AND t.priority IN (");
            {
                let mut values = qb.separated(", ");
                for priority in &self.priorities {
                    values.push_bind(*priority);
                }
            }
            qb.push(")");
        }
        if let Some(project) = &self.project {
            qb.push(" AND t.project_id = ").push_bind(project.clone());
        }
        if let Some(project_name) = &self.project_name {
            let pattern = format!("%{}%", project_name.to_lowercase());
            qb.push(" AND lower(p.name) LIKE ").push_bind(pattern);
        }
        if let Some(assignee) = &self.assignee {
            qb.push(" AND t.assignee_id = ").push_bind(assignee.clone());
        }
        if let Some(creator) = &self.creator {
            qb.push(" AND t.creator_id = ").push_bind(creator.clone());
        }
        if let Some(created_after) = self.created_after {
            qb.push(" AND t.created_at >= ")
                .push_bind(created_after.naive_utc());
        }
        if let Some(created_before) = self.created_before {
            qb.push(" AND t.created_at <= ")
                .push_bind(created_before.naive_utc());
        }
        if let Some(deadline_after) = self.deadline_after {
            qb.push(" AND t.deadline >= ")
                .push_bind(deadline_after.naive_utc());
        }
        if let Some(deadline_before) = self.deadline_before {
            qb.push(" AND t.deadline <= ")
                .push_bind(deadline_before.naive_utc());
        }
        if self.is_overdue {
            qb.push(" AND t.deadline < ").push_bind(now.naive_utc());
            qb.push(" AND t.status NOT IN ('completed', 'cancelled')");
        }
        if self.no_assignee {
            qb.push(" AND t.assignee_id IS NULL");
        }
        if let Some(search) = &self.search {
            let pattern = format!("%{}%", search.to_lowercase());
            qb.push(" AND (lower(t.title) LIKE ")
                .push_bind(pattern.clone())
                .push(" OR lower(t.description) LIKE ")
                .push_bind(pattern)
                .push(")");
        }
    }

    pub fn order_by(&self) -> &'static str {
        self.ordering.unwrap_or(DEFAULT_ORDERING)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_multi_value_status_parses_as_set() {
        let query = TaskQuery {
            status: Some("todo,in_progress".to_string()),
            ..TaskQuery::default()
        };

        let filter = TaskFilter::from_query(&query).unwrap();
        assert_eq!(
            filter.statuses,
            vec![TaskStatus::Todo, TaskStatus::InProgress]
        );
    }

    #[test]
    fn test_invalid_status_value_is_rejected() {
        let query = TaskQuery {
            status: Some("todo,bogus".to_string()),
            ..TaskQuery::default()
        };

        let error = TaskFilter::from_query(&query).unwrap_err();
        assert_eq!(error.status_code, axum::http::StatusCode::BAD_REQUEST);
        assert!(error.message.contains("bogus"));
    }

    #[test]
    fn test_priority_out_of_range_is_rejected() {
        let query = TaskQuery {
            priority: Some("5".to_string()),
            ..TaskQuery::default()
        };

        assert!(TaskFilter::from_query(&query).is_err());
    }

    #[test]
    fn test_is_overdue_false_is_a_no_op() {
        let query = TaskQuery {
            is_overdue: Some(false),
            ..TaskQuery::default()
        };

        let filter = TaskFilter::from_query(&query).unwrap();
        assert!(!filter.is_overdue);

        let mut qb = QueryBuilder::<Sqlite>::new("SELECT * FROM tasks t WHERE 1=1");
        filter.push_where(&mut qb, Utc::now());
        assert!(!qb.sql().contains("deadline"));
    }

    #[test]
    fn test_unknown_ordering_falls_back_to_default() {
        assert_eq!(order_clause(Some("creator_id")), DEFAULT_ORDERING);
        assert_eq!(order_clause(None), DEFAULT_ORDERING);
        assert_eq!(order_clause(Some("deadline")), "t.deadline ASC");
    }

    #[test]
    fn test_empty_query_pushes_no_predicates() {
        let filter = TaskFilter::from_query(&TaskQuery::default()).unwrap();

        let mut qb = QueryBuilder::<Sqlite>::new("SELECT * FROM tasks t WHERE 1=1");
        filter.push_where(&mut qb, Utc::now());
        assert_eq!(qb.sql(), "SELECT * FROM tasks t WHERE 1=1");
    }
}
