// src/projects/types.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::tasks::types::TaskSummary;
use crate::users::types::UserSummary;

/// Project record as loaded by the store. The task counts are computed at
/// read time, never stored, so a `Project` is also the list/summary shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    pub name: String,
    pub description: String,
    pub owner: UserSummary,
    pub is_active: bool,
    pub tasks_count: i64,
    pub completed_tasks_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Detail shape: the project plus up to [`PROJECT_DETAIL_TASK_LIMIT`] of its
/// tasks in summary form.
#[derive(Debug, Serialize, Deserialize)]
pub struct ProjectDetail {
    pub id: String,
    pub name: String,
    pub description: String,
    pub owner: UserSummary,
    pub is_active: bool,
    pub tasks_count: i64,
    pub completed_tasks_count: i64,
    pub tasks: Vec<TaskSummary>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

pub const PROJECT_DETAIL_TASK_LIMIT: i64 = 10;

impl ProjectDetail {
    pub fn new(project: &Project, tasks: Vec<TaskSummary>) -> Self {
        Self {
            id: project.id.clone(),
            name: project.name.clone(),
            description: project.description.clone(),
            owner: project.owner.clone(),
            is_active: project.is_active,
            tasks_count: project.tasks_count,
            completed_tasks_count: project.completed_tasks_count,
            tasks,
            created_at: project.created_at,
            updated_at: project.updated_at,
        }
    }
}

// Request/Response types for the API

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateProjectRequest {
    pub name: String,
    pub description: Option<String>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct UpdateProjectRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub is_active: Option<bool>,
}

/// Read-time aggregation over one project's tasks.
#[derive(Debug, Serialize, Deserialize)]
pub struct ProjectStatistics {
    pub total_tasks: i64,
    pub completed_tasks: i64,
    pub in_progress_tasks: i64,
    pub todo_tasks: i64,
    pub overdue_tasks: i64,
}
