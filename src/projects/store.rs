// src/projects/store.rs

use anyhow::Result;
use chrono::{NaiveDateTime, TimeZone, Utc};
use sqlx::{QueryBuilder, Row, Sqlite, SqlitePool};
use uuid::Uuid;

use crate::projects::filters::ProjectFilter;
use crate::projects::types::{Project, ProjectStatistics};
use crate::users::types::UserSummary;

// Task counts are subqueries so they are always current at read time.
const PROJECT_SELECT: &str = r#"
SELECT
    p.id, p.name, p.description, p.owner_id,
    u.username AS owner_username, u.email AS owner_email,
    u.first_name AS owner_first_name, u.last_name AS owner_last_name,
    p.is_active, p.created_at, p.updated_at,
    (SELECT COUNT(*) FROM tasks t WHERE t.project_id = p.id) AS tasks_count,
    (SELECT COUNT(*) FROM tasks t
     WHERE t.project_id = p.id AND t.status = 'completed') AS completed_tasks_count
FROM projects p
JOIN users u ON u.id = p.owner_id
WHERE 1=1
"#;

const PROJECT_COUNT: &str = r#"
SELECT COUNT(*)
FROM projects p
JOIN users u ON u.id = p.owner_id
WHERE 1=1
"#;

pub struct ProjectStore {
    pub pool: SqlitePool,
}

impl ProjectStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create_project(
        &self,
        name: String,
        description: String,
        owner_id: &str,
        is_active: bool,
    ) -> Result<Project> {
        let id = Uuid::new_v4().to_string();
        let now = Utc::now();

        sqlx::query(
            r#"
            INSERT INTO projects (id, name, description, owner_id, is_active, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&id)
        .bind(&name)
        .bind(&description)
        .bind(owner_id)
        .bind(is_active)
        .bind(now.naive_utc())
        .bind(now.naive_utc())
        .execute(&self.pool)
        .await?;

        self.get_project(&id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("Project not found after insert"))
    }

    pub async fn get_project(&self, id: &str) -> Result<Option<Project>> {
        let mut qb = QueryBuilder::<Sqlite>::new(PROJECT_SELECT);
        qb.push(" AND p.id = ").push_bind(id);

        let row = qb.build().fetch_optional(&self.pool).await?;

        match row {
            Some(row) => Ok(Some(self.row_to_project(row)?)),
            None => Ok(None),
        }
    }

    pub async fn list_projects(
        &self,
        filter: &ProjectFilter,
        limit: i64,
        offset: i64,
    ) -> Result<(i64, Vec<Project>)> {
        let mut count_qb = QueryBuilder::<Sqlite>::new(PROJECT_COUNT);
        filter.push_where(&mut count_qb);
        let count: i64 = count_qb.build_query_scalar().fetch_one(&self.pool).await?;

        let mut qb = QueryBuilder::<Sqlite>::new(PROJECT_SELECT);
        filter.push_where(&mut qb);
        qb.push(" ORDER BY ").push(filter.order_by());
        qb.push(" LIMIT ")
            .push_bind(limit)
            .push(" OFFSET ")
            .push_bind(offset);

        let rows = qb.build().fetch_all(&self.pool).await?;
        let projects = rows
            .into_iter()
            .map(|row| self.row_to_project(row))
            .collect::<Result<Vec<_>>>()?;

        Ok((count, projects))
    }

    pub async fn update_project(
        &self,
        id: &str,
        name: Option<String>,
        description: Option<String>,
        is_active: Option<bool>,
    ) -> Result<Option<Project>> {
        let Some(existing) = self.get_project(id).await? else {
            return Ok(None);
        };

        let name = name.unwrap_or(existing.name);
        let description = description.unwrap_or(existing.description);
        let is_active = is_active.unwrap_or(existing.is_active);
        let now = Utc::now();

        sqlx::query(
            r#"
            UPDATE projects
            SET name = ?, description = ?, is_active = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&name)
        .bind(&description)
        .bind(is_active)
        .bind(now.naive_utc())
        .bind(id)
        .execute(&self.pool)
        .await?;

        self.get_project(id).await
    }

    /// Deleting a project cascades to its tasks (schema FK action).
    pub async fn delete_project(&self, id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM projects WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Read-time statistics over one project's tasks. Pure read.
    pub async fn statistics(&self, project_id: &str) -> Result<ProjectStatistics> {
        let now = Utc::now().naive_utc();

        let row = sqlx::query(
            r#"
            SELECT
                COUNT(*) AS total_tasks,
                COALESCE(SUM(CASE WHEN status = 'completed' THEN 1 ELSE 0 END), 0) AS completed_tasks,
                COALESCE(SUM(CASE WHEN status = 'in_progress' THEN 1 ELSE 0 END), 0) AS in_progress_tasks,
                COALESCE(SUM(CASE WHEN status = 'todo' THEN 1 ELSE 0 END), 0) AS todo_tasks,
                COALESCE(SUM(CASE WHEN deadline < ?
                                   AND status NOT IN ('completed', 'cancelled')
                             THEN 1 ELSE 0 END), 0) AS overdue_tasks
            FROM tasks
            WHERE project_id = ?
            "#,
        )
        .bind(now)
        .bind(project_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(ProjectStatistics {
            total_tasks: row.get("total_tasks"),
            completed_tasks: row.get("completed_tasks"),
            in_progress_tasks: row.get("in_progress_tasks"),
            todo_tasks: row.get("todo_tasks"),
            overdue_tasks: row.get("overdue_tasks"),
        })
    }

    fn row_to_project(&self, row: sqlx::sqlite::SqliteRow) -> Result<Project> {
        let created_at: NaiveDateTime = row.get("created_at");
        let updated_at: NaiveDateTime = row.get("updated_at");

        Ok(Project {
            id: row.get("id"),
            name: row.get("name"),
            description: row.get("description"),
            owner: UserSummary {
                id: row.get("owner_id"),
                username: row.get("owner_username"),
                email: row.get("owner_email"),
                first_name: row.get("owner_first_name"),
                last_name: row.get("owner_last_name"),
            },
            is_active: row.get("is_active"),
            tasks_count: row.get("tasks_count"),
            completed_tasks_count: row.get("completed_tasks_count"),
            created_at: Utc.from_utc_datetime(&created_at),
            updated_at: Utc.from_utc_datetime(&updated_at),
        })
    }
}
