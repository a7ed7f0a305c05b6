// src/tasks/types.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::projects::types::Project;
use crate::users::types::UserSummary;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Todo,
    InProgress,
    Review,
    Completed,
    Cancelled,
}

impl TaskStatus {
    /// Terminal statuses take a task out of overdue consideration.
    pub fn is_terminal(self) -> bool {
        matches!(self, TaskStatus::Completed | TaskStatus::Cancelled)
    }

    /// Human-readable label exposed as `status_display`.
    pub fn display(self) -> &'static str {
        match self {
            TaskStatus::Todo => "To do",
            TaskStatus::InProgress => "In progress",
            TaskStatus::Review => "In review",
            TaskStatus::Completed => "Completed",
            TaskStatus::Cancelled => "Cancelled",
        }
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let value = match self {
            TaskStatus::Todo => "todo",
            TaskStatus::InProgress => "in_progress",
            TaskStatus::Review => "review",
            TaskStatus::Completed => "completed",
            TaskStatus::Cancelled => "cancelled",
        };
        write!(f, "{value}")
    }
}

#[derive(Debug, thiserror::Error)]
#[error("Unknown task status: {0}")]
pub struct ParseTaskStatusError(String);

impl std::str::FromStr for TaskStatus {
    type Err = ParseTaskStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "todo" => Ok(TaskStatus::Todo),
            "in_progress" => Ok(TaskStatus::InProgress),
            "review" => Ok(TaskStatus::Review),
            "completed" => Ok(TaskStatus::Completed),
            "cancelled" => Ok(TaskStatus::Cancelled),
            _ => Err(ParseTaskStatusError(s.to_string())),
        }
    }
}

pub const PRIORITY_MIN: i32 = 1;
pub const PRIORITY_MAX: i32 = 4;
pub const PRIORITY_DEFAULT: i32 = 2;

/// Human-readable label exposed as `priority_display`.
pub fn priority_display(priority: i32) -> &'static str {
    match priority {
        1 => "Low",
        2 => "Medium",
        3 => "High",
        4 => "Critical",
        _ => "Unknown",
    }
}

/// Hydrated task record as loaded by the store: joins bring in the project
/// name and the compact creator/assignee records.
#[derive(Debug, Clone)]
pub struct Task {
    pub id: String,
    pub title: String,
    pub description: String,
    pub project_id: String,
    pub project_name: String,
    pub creator: UserSummary,
    pub assignee: Option<UserSummary>,
    pub status: TaskStatus,
    pub priority: i32,
    pub deadline: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl Task {
    /// Derived, never persisted: the deadline has passed and the task is
    /// not in a terminal status.
    pub fn is_overdue(&self) -> bool {
        match self.deadline {
            Some(deadline) => Utc::now() > deadline && !self.status.is_terminal(),
            None => false,
        }
    }
}

// Request/Response types for the API

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateTaskRequest {
    pub title: String,
    pub description: Option<String>,
    pub project: String,
    pub assignee_id: Option<String>,
    pub status: Option<TaskStatus>,
    pub priority: Option<i32>,
    pub deadline: Option<DateTime<Utc>>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct UpdateTaskRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub project: Option<String>,
    pub assignee_id: Option<String>,
    pub status: Option<TaskStatus>,
    pub priority: Option<i32>,
    pub deadline: Option<DateTime<Utc>>,
}

/// Body of POST /api/tasks/{id}/change_status. The status arrives as a raw
/// string so an unrecognized value maps to a 400 with a field message.
#[derive(Debug, Serialize, Deserialize)]
pub struct ChangeStatusRequest {
    pub status: String,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct AssignTaskRequest {
    pub assignee_id: Option<String>,
}

/// List shape for tasks.
#[derive(Debug, Serialize, Deserialize)]
pub struct TaskSummary {
    pub id: String,
    pub title: String,
    pub project: String,
    pub project_name: String,
    pub assignee: Option<UserSummary>,
    pub creator: UserSummary,
    pub status: TaskStatus,
    pub status_display: String,
    pub priority: i32,
    pub priority_display: String,
    pub deadline: Option<DateTime<Utc>>,
    pub is_overdue: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Task> for TaskSummary {
    fn from(task: &Task) -> Self {
        Self {
            id: task.id.clone(),
            title: task.title.clone(),
            project: task.project_id.clone(),
            project_name: task.project_name.clone(),
            assignee: task.assignee.clone(),
            creator: task.creator.clone(),
            status: task.status,
            status_display: task.status.display().to_string(),
            priority: task.priority,
            priority_display: priority_display(task.priority).to_string(),
            deadline: task.deadline,
            is_overdue: task.is_overdue(),
            created_at: task.created_at,
            updated_at: task.updated_at,
        }
    }
}

/// Detail shape: summary fields plus description, the embedded project, and
/// the completion timestamp.
#[derive(Debug, Serialize, Deserialize)]
pub struct TaskDetail {
    pub id: String,
    pub title: String,
    pub description: String,
    pub project: String,
    pub project_detail: Project,
    pub assignee: Option<UserSummary>,
    pub creator: UserSummary,
    pub status: TaskStatus,
    pub status_display: String,
    pub priority: i32,
    pub priority_display: String,
    pub deadline: Option<DateTime<Utc>>,
    pub is_overdue: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl TaskDetail {
    pub fn new(task: &Task, project: Project) -> Self {
        Self {
            id: task.id.clone(),
            title: task.title.clone(),
            description: task.description.clone(),
            project: task.project_id.clone(),
            project_detail: project,
            assignee: task.assignee.clone(),
            creator: task.creator.clone(),
            status: task.status,
            status_display: task.status.display().to_string(),
            priority: task.priority,
            priority_display: priority_display(task.priority).to_string(),
            deadline: task.deadline,
            is_overdue: task.is_overdue(),
            created_at: task.created_at,
            updated_at: task.updated_at,
            completed_at: task.completed_at,
        }
    }
}
