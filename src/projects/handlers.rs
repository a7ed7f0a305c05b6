// src/projects/handlers.rs

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use std::sync::Arc;

use crate::api::error::{
    ApiError, ApiResult, IntoApiError, IntoApiErrorOption, validation_error,
};
use crate::api::pagination::{Paginated, limit_offset};
use crate::auth::extractor::CurrentUser;
use crate::projects::filters::{ProjectFilter, ProjectQuery};
use crate::projects::types::{
    CreateProjectRequest, PROJECT_DETAIL_TASK_LIMIT, Project, ProjectDetail, ProjectStatistics,
    UpdateProjectRequest,
};
use crate::state::AppState;
use crate::tasks::filters::{TaskFilter, TaskQuery};
use crate::tasks::types::TaskSummary;

pub async fn list_projects_handler(
    State(state): State<Arc<AppState>>,
    _user: CurrentUser,
    Query(query): Query<ProjectQuery>,
) -> ApiResult<Json<Paginated<Project>>> {
    let filter = ProjectFilter::from_query(&query);
    let (limit, offset) = limit_offset(query.page, query.page_size);

    let (count, projects) = state
        .project_store
        .list_projects(&filter, limit, offset)
        .await
        .into_api_error("Failed to list projects")?;

    Ok(Json(Paginated {
        count,
        results: projects,
    }))
}

pub async fn create_project_handler(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Json(payload): Json<CreateProjectRequest>,
) -> ApiResult<impl IntoResponse> {
    if payload.name.trim().is_empty() {
        return Err(validation_error("name", "may not be blank"));
    }

    let project = state
        .project_store
        .create_project(
            payload.name,
            payload.description.unwrap_or_default(),
            &user.id,
            payload.is_active.unwrap_or(true),
        )
        .await
        .into_api_error("Failed to create project")?;

    Ok((StatusCode::CREATED, Json(project)))
}

pub async fn get_project_handler(
    State(state): State<Arc<AppState>>,
    _user: CurrentUser,
    Path(id): Path<String>,
) -> ApiResult<Json<ProjectDetail>> {
    let project = state
        .project_store
        .get_project(&id)
        .await
        .into_api_error("Failed to get project")?
        .ok_or_not_found("Project not found")?;

    let filter = TaskFilter {
        project: Some(id),
        ..TaskFilter::default()
    };
    let (_, tasks) = state
        .task_store
        .list_tasks(&filter, PROJECT_DETAIL_TASK_LIMIT, 0)
        .await
        .into_api_error("Failed to list project tasks")?;

    let tasks = tasks.iter().map(TaskSummary::from).collect();
    Ok(Json(ProjectDetail::new(&project, tasks)))
}

pub async fn update_project_handler(
    State(state): State<Arc<AppState>>,
    _user: CurrentUser,
    Path(id): Path<String>,
    Json(payload): Json<UpdateProjectRequest>,
) -> ApiResult<Json<Project>> {
    if let Some(name) = &payload.name {
        if name.trim().is_empty() {
            return Err(validation_error("name", "may not be blank"));
        }
    }

    let project = state
        .project_store
        .update_project(&id, payload.name, payload.description, payload.is_active)
        .await
        .into_api_error("Failed to update project")?
        .ok_or_not_found("Project not found")?;

    Ok(Json(project))
}

pub async fn delete_project_handler(
    State(state): State<Arc<AppState>>,
    _user: CurrentUser,
    Path(id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let deleted = state
        .project_store
        .delete_project(&id)
        .await
        .into_api_error("Failed to delete project")?;

    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::not_found("Project not found"))
    }
}

pub async fn project_statistics_handler(
    State(state): State<Arc<AppState>>,
    _user: CurrentUser,
    Path(id): Path<String>,
) -> ApiResult<Json<ProjectStatistics>> {
    state
        .project_store
        .get_project(&id)
        .await
        .into_api_error("Failed to get project")?
        .ok_or_not_found("Project not found")?;

    let stats = state
        .project_store
        .statistics(&id)
        .await
        .into_api_error("Failed to compute statistics")?;

    Ok(Json(stats))
}

/// Filtered, paginated listing of one project's tasks.
pub async fn project_tasks_handler(
    State(state): State<Arc<AppState>>,
    _user: CurrentUser,
    Path(id): Path<String>,
    Query(query): Query<TaskQuery>,
) -> ApiResult<Json<Paginated<TaskSummary>>> {
    state
        .project_store
        .get_project(&id)
        .await
        .into_api_error("Failed to get project")?
        .ok_or_not_found("Project not found")?;

    let mut filter = TaskFilter::from_query(&query)?;
    filter.project = Some(id);

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
