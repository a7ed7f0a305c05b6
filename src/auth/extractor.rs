// src/auth/extractor.rs

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use std::sync::Arc;

use crate::api::error::ApiError;
use crate::auth::jwt::verify_token;
use crate::state::AppState;
use crate::users::types::User;

/// The authenticated user behind the current request.
///
/// Extracting it rejects with 401 unless the request carries a valid
/// bearer token resolving to an active account.
pub struct CurrentUser(pub User);

impl FromRequestParts<Arc<AppState>> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| ApiError::unauthorized("Authentication credentials were not provided"))?;

        // Clients historically sent either scheme; accept both.
        let token = header
            .strip_prefix("Bearer ")
            .or_else(|| header.strip_prefix("Token "))
            .ok_or_else(|| ApiError::unauthorized("Invalid authorization header"))?;

        let claims =
            verify_token(token).map_err(|_| ApiError::unauthorized("Invalid or expired token"))?;

        let user = state
            .user_store
            .get_user(&claims.sub)
            .await
            .map_err(|_| ApiError::internal("Failed to load user"))?
            .ok_or_else(|| ApiError::unauthorized("Unknown user"))?;

        if !user.is_active {
            return Err(ApiError::unauthorized("User account is disabled"));
        }

        Ok(CurrentUser(user))
    }
}
