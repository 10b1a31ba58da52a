use axum::{Extension, Json, extract::State, http::StatusCode};
use iptv_db::models::User;
use iptv_shared::{RegisterUserRequest, RegisteredUser, display_value};
use tracing::info;

use crate::AppState;
use crate::auth::Claims;
use crate::error::ApiError;
use crate::extract::ApiJson;

/// POST /api/users - create an account that can log in.
pub async fn register_user(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<RegisterUserRequest>,
) -> Result<(StatusCode, Json<RegisteredUser>), ApiError> {
    let hash = state.auth.hash_password(&req.password).await?;
    state
        .store
        .users
        .register(&req.user_id, &req.user_code, &req.role, &hash)
        .await
        .map_err(ApiError::Rejected)?;

    info!(
        user_id = %display_value(&req.user_id),
        role = %display_value(&req.role),
        "User registered"
    );
    Ok((
        StatusCode::CREATED,
        Json(RegisteredUser {
            user_id: req.user_id,
            user_code: req.user_code,
            role: req.role,
        }),
    ))
}

/// GET /api/users
pub async fn list_users(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<Vec<User>>, ApiError> {
    let users = state.store.users.list().await.map_err(ApiError::Rejected)?;
    tracing::debug!(by = %claims.sub, count = users.len(), "Listed users");
    Ok(Json(users))
}
