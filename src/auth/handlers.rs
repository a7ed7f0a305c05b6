// src/auth/handlers.rs

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use std::sync::Arc;

use crate::api::error::{ApiError, ApiResult};
use crate::auth::models::{AuthResponse, LoginRequest, RegisterRequest};
use crate::state::AppState;

pub async fn register_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RegisterRequest>,
) -> ApiResult<impl IntoResponse> {
    let response = state
        .auth_service
        .register(req)
        .await
        .map_err(|e| ApiError::bad_request(e.to_string()))?;

    Ok((StatusCode::CREATED, Json(response)))
}

pub async fn obtain_token_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<AuthResponse>> {
    let response = state
        .auth_service
        .login(req)
        .await
        .map_err(|e| ApiError::unauthorized(e.to_string()))?;

    Ok(Json(response))
}
