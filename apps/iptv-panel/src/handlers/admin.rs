// Subscriber account lifecycle: add, inspect, ban, unban, renew.
// Every mutation notifies the admin chat without waiting for delivery.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use iptv_db::models::UserStatus;
use iptv_shared::{
    AddUserRequest, AddUserResponse, LoginRequest, LoginResponse, MessageResponse,
    RenewUserRequest, UserIdRequest, display_value,
};
use serde_json::Value;
use tracing::{info, warn};

use crate::AppState;
use crate::error::ApiError;
use crate::extract::AdminJson;

/// POST /admin/addUser
pub async fn add_user(
    State(state): State<AppState>,
    AdminJson(req): AdminJson<AddUserRequest>,
) -> Result<(StatusCode, Json<AddUserResponse>), ApiError> {
    state
        .store
        .users
        .create(&req.user_id, &req.user_code, &req.expiry_date)
        .await?;

    let user_id = display_value(&req.user_id);
    info!(%user_id, "User added");
    state.notifier.notify(format!("New user added: {user_id}"));

    Ok((StatusCode::CREATED, Json(AddUserResponse { user_id: req.user_id })))
}

/// GET /admin/userDetails/{user_id}
///
/// Unknown users get a 200 with an empty body.
pub async fn user_details(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Response, ApiError> {
    let user = state.store.users.get_by_id(&user_id).await?;
    Ok(match user {
        Some(user) => Json(user).into_response(),
        None => StatusCode::OK.into_response(),
    })
}

/// POST /admin/banUser
pub async fn ban_user(
    State(state): State<AppState>,
    AdminJson(req): AdminJson<UserIdRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    let user_id = set_status(&state, &req.user_id, UserStatus::Banned).await?;
    state.notifier.notify(format!("User banned: {user_id}"));
    Ok(Json(MessageResponse::new("User banned successfully.")))
}

/// POST /admin/unbanUser
pub async fn unban_user(
    State(state): State<AppState>,
    AdminJson(req): AdminJson<UserIdRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    let user_id = set_status(&state, &req.user_id, UserStatus::Active).await?;
    state.notifier.notify(format!("User unbanned: {user_id}"));
    Ok(Json(MessageResponse::new("User unbanned successfully.")))
}

/// Returns the user id as it reads in messages.
async fn set_status(
    state: &AppState,
    user_id: &Value,
    status: UserStatus,
) -> Result<String, ApiError> {
    let touched = state.store.users.set_status(user_id, status).await?;
    let user_id = display_value(user_id);
    if touched == 0 {
        warn!(%user_id, status = status.as_str(), "Status change matched no user");
    } else {
        info!(%user_id, status = status.as_str(), "User status changed");
    }
    Ok(user_id)
}

/// POST /admin/renewUser
pub async fn renew_user(
    State(state): State<AppState>,
    AdminJson(req): AdminJson<RenewUserRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    let touched = state
        .store
        .users
        .set_expiry(&req.user_id, &req.new_expiry_date)
        .await?;
    let user_id = display_value(&req.user_id);
    if touched == 0 {
        warn!(%user_id, "Renewal matched no user");
    }

    state
        .notifier
        .notify(format!("User subscription renewed: {user_id}"));
    Ok(Json(MessageResponse::new("User subscription renewed successfully.")))
}

/// POST /admin/login
pub async fn login(
    State(state): State<AppState>,
    AdminJson(req): AdminJson<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let user = state.store.users.get_by_id(&req.user_id).await?;

    let verified = state.auth.check_credentials(user.as_ref(), &req.password).await;
    let Some(user) = user.filter(|_| verified) else {
        warn!(user_id = %req.user_id, "Login failed");
        return Err(ApiError::InvalidCredentials);
    };

    if user.is_banned() {
        warn!(user_id = %user.user_id, "Banned account logged in");
    }
    let token = state.auth.issue_token(&user.user_id, &user.role)?;
    info!(user_id = %user.user_id, role = %user.role, "Login succeeded");

    Ok(Json(LoginResponse { token }))
}
