// src/state.rs

use sqlx::SqlitePool;
use std::sync::Arc;

use crate::auth::service::AuthService;
use crate::projects::store::ProjectStore;
use crate::tasks::store::TaskStore;
use crate::users::store::UserStore;

#[derive(Clone)]
pub struct AppState {
    pub user_store: Arc<UserStore>,
    pub project_store: Arc<ProjectStore>,
    pub task_store: Arc<TaskStore>,
    pub auth_service: Arc<AuthService>,
}

pub fn create_app_state(pool: SqlitePool) -> AppState {
    let user_store = Arc::new(UserStore::new(pool.clone()));

    AppState {
        auth_service: Arc::new(AuthService::new(user_store.clone())),
        project_store: Arc::new(ProjectStore::new(pool.clone())),
        task_store: Arc::new(TaskStore::new(pool)),
        user_store,
    }
}
