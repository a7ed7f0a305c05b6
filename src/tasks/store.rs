// src/tasks/store.rs

use anyhow::Result;
use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use sqlx::{QueryBuilder, Row, Sqlite, SqlitePool};
use uuid::Uuid;

use crate::tasks::filters::TaskFilter;
use crate::tasks::types::{Task, TaskStatus};
use crate::users::types::UserSummary;

// The joins hydrate the project name and the creator/assignee records in
// one round trip. The assignee join is LEFT: unassigned tasks keep NULLs.
const TASK_SELECT: &str = r#"
SELECT
    t.id, t.title, t.description, t.project_id, p.name AS project_name,
    t.creator_id,
    cu.username AS creator_username, cu.email AS creator_email,
    cu.first_name AS creator_first_name, cu.last_name AS creator_last_name,
    t.assignee_id,
    au.username AS assignee_username, au.email AS assignee_email,
    au.first_name AS assignee_first_name, au.last_name AS assignee_last_name,
    t.status, t.priority, t.deadline, t.created_at, t.updated_at, t.completed_at
FROM tasks t
JOIN projects p ON p.id = t.project_id
JOIN users cu ON cu.id = t.creator_id
LEFT JOIN users au ON au.id = t.assignee_id
WHERE 1=1
"#;

const TASK_COUNT: &str = r#"
SELECT COUNT(*)
FROM tasks t
JOIN projects p ON p.id = t.project_id
JOIN users cu ON cu.id = t.creator_id
LEFT JOIN users au ON au.id = t.assignee_id
WHERE 1=1
"#;

pub struct TaskStore {
    pub pool: SqlitePool,
}

/// Fields required to create a task. The creator comes from the request
/// context, never from the client payload.
#[derive(Debug)]
pub struct NewTask {
    pub title: String,
    pub description: String,
    pub project_id: String,
    pub creator_id: String,
    pub assignee_id: Option<String>,
    pub status: TaskStatus,
    pub priority: i32,
    pub deadline: Option<DateTime<Utc>>,
}

/// Mutable fields accepted by `update_task`. `None` leaves a field unchanged.
#[derive(Debug, Default)]
pub struct TaskChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub project_id: Option<String>,
    pub assignee_id: Option<String>,
    pub status: Option<TaskStatus>,
    pub priority: Option<i32>,
    pub deadline: Option<DateTime<Utc>>,
}

/// Completion-timestamp rule. Every write routes its final status through
/// here: `completed_at` is non-null exactly when the status is Completed,
/// and an already-set stamp survives re-saves of a completed task.
fn completion_timestamp(
    status: TaskStatus,
    current: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> Option<DateTime<Utc>> {
    match status {
        TaskStatus::Completed => Some(current.unwrap_or(now)),
        _ => None,
    }
}

impl TaskStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create_task(&self, new: NewTask) -> Result<Task> {
        let id = Uuid::new_v4().to_string();
        let now = Utc::now();
        let completed_at = completion_timestamp(new.status, None, now);

        sqlx::query(
            r#"
            INSERT INTO tasks (id, title, description, project_id, creator_id, assignee_id,
                               status, priority, deadline, created_at, updated_at, completed_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&id)
        .bind(&new.title)
        .bind(&new.description)
        .bind(&new.project_id)
        .bind(&new.creator_id)
        .bind(&new.assignee_id)
        .bind(new.status.to_string())
        .bind(new.priority)
        .bind(new.deadline.map(|d| d.naive_utc()))
        .bind(now.naive_utc())
        .bind(now.naive_utc())
        .bind(completed_at.map(|d| d.naive_utc()))
        .execute(&self.pool)
        .await?;

        self.get_task(&id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("Task not found after insert"))
    }

    pub async fn get_task(&self, id: &str) -> Result<Option<Task>> {
        let mut qb = QueryBuilder::<Sqlite>::new(TASK_SELECT);
        qb.push(" AND t.id = ").push_bind(id);

        let row = qb.build().fetch_optional(&self.pool).await?;

        match row {
            Some(row) => Ok(Some(self.row_to_task(row)?)),
            None => Ok(None),
        }
    }

    pub async fn list_tasks(
        &self,
        filter: &TaskFilter,
        limit: i64,
        offset: i64,
    ) -> Result<(i64, Vec<Task>)> {
        let now = Utc::now();

        let mut count_qb = QueryBuilder::<Sqlite>::new(TASK_COUNT);
        filter.push_where(&mut count_qb, now);
        let count: i64 = count_qb.build_query_scalar().fetch_one(&self.pool).await?;

        let mut qb = QueryBuilder::<Sqlite>::new(TASK_SELECT);
        filter.push_where(&mut qb, now);
        qb.push(" ORDER BY ").push(filter.order_by());
        qb.push(" LIMIT ")
            .push_bind(limit)
            .push(" OFFSET ")
            .push_bind(offset);

        let rows = qb.build().fetch_all(&self.pool).await?;
        let tasks = rows
            .into_iter()
            .map(|row| self.row_to_task(row))
            .collect::<Result<Vec<_>>>()?;

        Ok((count, tasks))
    }

    /// Partial update: only supplied fields change. The final state passes
    /// through the completion-timestamp rule before persisting, so this is
    /// the single write path for every mutation of an existing task.
    pub async fn update_task(&self, id: &str, changes: TaskChanges) -> Result<Option<Task>> {
        let Some(existing) = self.get_task(id).await? else {
            return Ok(None);
        };

        let now = Utc::now();
        let title = changes.title.unwrap_or(existing.title);
        let description = changes.description.unwrap_or(existing.description);
        let project_id = changes.project_id.unwrap_or(existing.project_id);
        let assignee_id = changes
            .assignee_id
            .or(existing.assignee.map(|user| user.id));
        let status = changes.status.unwrap_or(existing.status);
        let priority = changes.priority.unwrap_or(existing.priority);
        let deadline = changes.deadline.or(existing.deadline);
        let completed_at = completion_timestamp(status, existing.completed_at, now);

        sqlx::query(
            r#"
            UPDATE tasks
            SET title = ?, description = ?, project_id = ?, assignee_id = ?,
                status = ?, priority = ?, deadline = ?, updated_at = ?, completed_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&title)
        .bind(&description)
        .bind(&project_id)
        .bind(&assignee_id)
        .bind(status.to_string())
        .bind(priority)
        .bind(deadline.map(|d| d.naive_utc()))
        .bind(now.naive_utc())
        .bind(completed_at.map(|d| d.naive_utc()))
        .bind(id)
        .execute(&self.pool)
        .await?;

        self.get_task(id).await
    }

    pub async fn change_status(&self, id: &str, status: TaskStatus) -> Result<Option<Task>> {
        self.update_task(
            id,
            TaskChanges {
                status: Some(status),
                ..TaskChanges::default()
            },
        )
        .await
    }

    pub async fn assign_task(&self, id: &str, assignee_id: &str) -> Result<Option<Task>> {
        self.update_task(
            id,
            TaskChanges {
                assignee_id: Some(assignee_id.to_string()),
                ..TaskChanges::default()
            },
        )
        .await
    }

    pub async fn delete_task(&self, id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    fn row_to_task(&self, row: sqlx::sqlite::SqliteRow) -> Result<Task> {
        let status: String = row.get("status");
        let status = status.parse::<TaskStatus>()?;

        let assignee = row
            .get::<Option<String>, _>("assignee_id")
            .map(|id| UserSummary {
                id,
                username: row.get("assignee_username"),
                email: row.get("assignee_email"),
                first_name: row.get("assignee_first_name"),
                last_name: row.get("assignee_last_name"),
            });

        let deadline: Option<NaiveDateTime> = row.get("deadline");
        let completed_at: Option<NaiveDateTime> = row.get("completed_at");
        let created_at: NaiveDateTime = row.get("created_at");
        let updated_at: NaiveDateTime = row.get("updated_at");

        Ok(Task {
            id: row.get("id"),
            title: row.get("title"),
            description: row.get("description"),
            project_id: row.get("project_id"),
            project_name: row.get("project_name"),
            creator: UserSummary {
                id: row.get("creator_id"),
                username: row.get("creator_username"),
                email: row.get("creator_email"),
                first_name: row.get("creator_first_name"),
                last_name: row.get("creator_last_name"),
            },
            assignee,
            status,
            priority: row.get("priority"),
            deadline: deadline.map(|d| Utc.from_utc_datetime(&d)),
            created_at: Utc.from_utc_datetime(&created_at),
            updated_at: Utc.from_utc_datetime(&updated_at),
            completed_at: completed_at.map(|d| Utc.from_utc_datetime(&d)),
        })
    }
}
