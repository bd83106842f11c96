//! Authentication handlers

use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::middleware::CurrentUser;
use crate::services::auth::{AuthResponse, RegisterInput};
use crate::services::{AuthService, UserService};
use crate::AppState;
use shared::User;

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Serialize)]
pub struct LogoutResponse {
    pub logged_out: bool,
}

/// Login endpoint handler
pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    let auth_service = AuthService::new(state.db.clone(), &state.config);
    let response = auth_service.login(&body.email, &body.password).await?;

    state.active_users.mark_active(response.user.id).await;

    Ok(Json(response))
}

/// Register endpoint handler
pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterInput>,
) -> Result<(StatusCode, Json<AuthResponse>), AppError> {
    let auth_service = AuthService::new(state.db.clone(), &state.config);
    let response = auth_service.register(body).await?;

    state.active_users.mark_active(response.user.id).await;

    Ok((StatusCode::CREATED, Json(response)))
}

/// Logout endpoint handler. The token itself stays valid until it expires.
pub async fn logout(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Json<LogoutResponse> {
    let was_active = state.active_users.mark_inactive(user.user_id).await;
    tracing::info!(user_id = %user.user_id, username = %user.username, was_active, "User logged out");

    Json(LogoutResponse { logged_out: true })
}

/// Current user profile
pub async fn me(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<User>, AppError> {
    let user = UserService::new(state.db.clone()).get_user(user.user_id).await?;
    Ok(Json(user))
}
