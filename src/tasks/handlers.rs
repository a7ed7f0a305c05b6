// src/tasks/handlers.rs

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::Utc;
use std::sync::Arc;

use crate::api::error::{
    ApiError, ApiResult, IntoApiError, IntoApiErrorOption, missing_param_error, validation_error,
};
use crate::api::pagination::{Paginated, limit_offset};
use crate::auth::extractor::CurrentUser;
use crate::state::AppState;
use crate::tasks::filters::{TaskFilter, TaskQuery};
use crate::tasks::store::{NewTask, TaskChanges};
use crate::tasks::types::{
    AssignTaskRequest, ChangeStatusRequest, CreateTaskRequest, PRIORITY_DEFAULT, PRIORITY_MAX,
    PRIORITY_MIN, Task, TaskDetail, TaskStatus, TaskSummary, UpdateTaskRequest,
};

/// Build the detail shape: the task plus its project with current counts.
async fn task_detail(state: &AppState, task: &Task) -> ApiResult<TaskDetail> {
    let project = state
        .project_store
        .get_project(&task.project_id)
        .await
        .into_api_error("Failed to get project")?
        .ok_or_not_found("Project not found")?;

    Ok(TaskDetail::new(task, project))
}

fn check_priority(priority: i32) -> ApiResult<()> {
    if (PRIORITY_MIN..=PRIORITY_MAX).contains(&priority) {
        Ok(())
    } else {
        Err(validation_error("priority", "must be between 1 and 4"))
    }
}

pub async fn list_tasks_handler(
    State(state): State<Arc<AppState>>,
    _user: CurrentUser,
    Query(query): Query<TaskQuery>,
) -> ApiResult<Json<Paginated<TaskSummary>>> {
    let filter = TaskFilter::from_query(&query)?;
    let (limit, offset) = limit_offset(query.page, query.page_size);

    let (count, tasks) = state
        .task_store
        .list_tasks(&filter, limit, offset)
        .await
        .into_api_error("Failed to list tasks")?;

    Ok(Json(Paginated {
        count,
        results: tasks.iter().map(TaskSummary::from).collect(),
    }))
}

/// Tasks assigned to the caller, with the same filters as the main listing.
pub async fn my_tasks_handler(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Query(query): Query<TaskQuery>,
) -> ApiResult<Json<Paginated<TaskSummary>>> {
    let mut filter = TaskFilter::from_query(&query)?;
    filter.assignee = Some(user.id);

    let (limit, offset) = limit_offset(query.page, query.page_size);
    let (count, tasks) = state
        .task_store
        .list_tasks(&filter, limit, offset)
        .await
        .into_api_error("Failed to list tasks")?;

    Ok(Json(Paginated {
        count,
        results: tasks.iter().map(TaskSummary::from).collect(),
    }))
}

pub async fn create_task_handler(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Json(payload): Json<CreateTaskRequest>,
) -> ApiResult<impl IntoResponse> {
    if payload.title.trim().is_empty() {
        return Err(validation_error("title", "may not be blank"));
    }

    let priority = payload.priority.unwrap_or(PRIORITY_DEFAULT);
    check_priority(priority)?;

    // Past deadlines are only rejected at creation; an already overdue
    // task can still be edited.
    if let Some(deadline) = payload.deadline {
        if deadline < Utc::now() {
            return Err(validation_error("deadline", "cannot be in the past"));
        }
    }

    state
        .project_store
        .get_project(&payload.project)
        .await
        .into_api_error("Failed to get project")?
        .ok_or_bad_request("project: invalid project id")?;

    if let Some(assignee_id) = &payload.assignee_id {
        state
            .user_store
            .get_user(assignee_id)
            .await
            .into_api_error("Failed to get user")?
            .ok_or_bad_request("assignee_id: invalid user id")?;
    }

    let task = state
        .task_store
        .create_task(NewTask {
            title: payload.title,
            description: payload.description.unwrap_or_default(),
            project_id: payload.project,
            creator_id: user.id,
            assignee_id: payload.assignee_id,
            status: payload.status.unwrap_or(TaskStatus::Todo),
            priority,
            deadline: payload.deadline,
        })
        .await
        .into_api_error("Failed to create task")?;

    let detail = task_detail(&state, &task).await?;
    Ok((StatusCode::CREATED, Json(detail)))
}

pub async fn get_task_handler(
    State(state): State<Arc<AppState>>,
    _user: CurrentUser,
    Path(id): Path<String>,
) -> ApiResult<Json<TaskDetail>> {
    let task = state
        .task_store
        .get_task(&id)
        .await
        .into_api_error("Failed to get task")?
        .ok_or_not_found("Task not found")?;

    Ok(Json(task_detail(&state, &task).await?))
}

pub async fn update_task_handler(
    State(state): State<Arc<AppState>>,
    _user: CurrentUser,
    Path(id): Path<String>,
    Json(payload): Json<UpdateTaskRequest>,
) -> ApiResult<Json<TaskDetail>> {
    if let Some(title) = &payload.title {
        if title.trim().is_empty() {
            return Err(validation_error("title", "may not be blank"));
        }
    }
    if let Some(priority) = payload.priority {
        check_priority(priority)?;
    }
    if let Some(project_id) = &payload.project {
        state
            .project_store
            .get_project(project_id)
            .await
            .into_api_error("Failed to get project")?
            .ok_or_bad_request("project: invalid project id")?;
    }
    if let Some(assignee_id) = &payload.assignee_id {
        state
            .user_store
            .get_user(assignee_id)
            .await
            .into_api_error("Failed to get user")?
            .ok_or_bad_request("assignee_id: invalid user id")?;
    }

    let task = state
        .task_store
        .update_task(
            &id,
            TaskChanges {
                title: payload.title,
                description: payload.description,
                project_id: payload.project,
                assignee_id: payload.assignee_id,
                status: payload.status,
                priority: payload.priority,
                deadline: payload.deadline,
            },
        )
        .await
        .into_api_error("Failed to update task")?
        .ok_or_not_found("Task not found")?;

    Ok(Json(task_detail(&state, &task).await?))
}

pub async fn delete_task_handler(
    State(state): State<Arc<AppState>>,
    _user: CurrentUser,
    Path(id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let deleted = state
        .task_store
        .delete_task(&id)
        .await
        .into_api_error("Failed to delete task")?;

    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::not_found("Task not found"))
    }
}

pub async fn change_status_handler(
    State(state): State<Arc<AppState>>,
    _user: CurrentUser,
    Path(id): Path<String>,
    Json(payload): Json<ChangeStatusRequest>,
) -> ApiResult<Json<TaskDetail>> {
    state
        .task_store
        .get_task(&id)
        .await
        .into_api_error("Failed to get task")?
        .ok_or_not_found("Task not found")?;

    let status = payload
        .status
        .parse::<TaskStatus>()
        .map_err(|_| validation_error("status", &format!("'{}' is not a valid choice", payload.status)))?;

    let task = state
        .task_store
        .change_status(&id, status)
        .await
        .into_api_error("Failed to change status")?
        .ok_or_not_found("Task not found")?;

    Ok(Json(task_detail(&state, &task).await?))
}

pub async fn assign_task_handler(
    State(state): State<Arc<AppState>>,
    _user: CurrentUser,
    Path(id): Path<String>,
    Json(payload): Json<AssignTaskRequest>,
) -> ApiResult<Json<TaskDetail>> {
    state
        .task_store
        .get_task(&id)
        .await
        .into_api_error("Failed to get task")?
        .ok_or_not_found("Task not found")?;

    let assignee_id = payload
        .assignee_id
        .ok_or_else(|| missing_param_error("assignee_id"))?;

    state
        .user_store
        .get_user(&assignee_id)
        .await
        .into_api_error("Failed to get user")?
        .ok_or_not_found("User not found")?;

    let task = state
        .task_store
        .assign_task(&id, &assignee_id)
        .await
        .into_api_error("Failed to assign task")?
        .ok_or_not_found("Task not found")?;

    Ok(Json(task_detail(&state, &task).await?))
}
