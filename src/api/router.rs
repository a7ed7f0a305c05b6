// src/api/router.rs
// HTTP router composition for the REST API.

use axum::{
    Json, Router,
    http::HeaderValue,
    routing::{get, post},
};
use serde_json::json;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::auth::handlers::{obtain_token_handler, register_handler};
use crate::config::CONFIG;
use crate::projects::handlers::{
    create_project_handler, delete_project_handler, get_project_handler, list_projects_handler,
    project_statistics_handler, project_tasks_handler, update_project_handler,
};
use crate::state::AppState;
use crate::tasks::handlers::{
    assign_task_handler, change_status_handler, create_task_handler, delete_task_handler,
    get_task_handler, list_tasks_handler, my_tasks_handler, update_task_handler,
};

pub fn api_router(app_state: Arc<AppState>) -> Router {
    Router::new()
        // Health
        .route("/health", get(health_handler))
        // Auth
        .route("/api/auth/register", post(register_handler))
        .route("/api/auth/token", post(obtain_token_handler))
        // Projects
        .route(
            "/api/projects",
            get(list_projects_handler).post(create_project_handler),
        )
        .route(
            "/api/projects/{id}",
            get(get_project_handler)
                .put(update_project_handler)
                .patch(update_project_handler)
                .delete(delete_project_handler),
        )
        .route(
            "/api/projects/{id}/statistics",
            get(project_statistics_handler),
        )
        .route("/api/projects/{id}/tasks", get(project_tasks_handler))
        // Tasks
        .route(
            "/api/tasks",
            get(list_tasks_handler).post(create_task_handler),
        )
        .route("/api/tasks/my_tasks", get(my_tasks_handler))
        .route(
            "/api/tasks/{id}",
            get(get_task_handler)
                .put(update_task_handler)
                .patch(update_task_handler)
                .delete(delete_task_handler),
        )
        .route("/api/tasks/{id}/change_status", post(change_status_handler))
        .route("/api/tasks/{id}/assign", post(assign_task_handler))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer())
        .with_state(app_state)
}

async fn health_handler() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

fn cors_layer() -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);

    match CONFIG.cors_origin.parse::<HeaderValue>() {
        Ok(origin) => layer.allow_origin(origin),
        Err(_) => layer.allow_origin(Any),
    }
}
