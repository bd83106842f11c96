//! Admin panel handlers for user management

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::middleware::CurrentUser;
use crate::services::users::{CreateUserInput, UpdateUserInput, UserStats};
use crate::services::UserService;
use crate::AppState;
use shared::User;

/// Response for list of users
#[derive(Serialize)]
pub struct UsersResponse {
    pub users: Vec<User>,
}

/// Snapshot of signed-in users
#[derive(Serialize)]
pub struct ActiveUsersResponse {
    pub count: usize,
    pub user_ids: Vec<Uuid>,
}

pub async fn list_users(State(state): State<AppState>) -> AppResult<Json<UsersResponse>> {
    let users = UserService::new(state.db.clone()).list_users().await?;
    Ok(Json(UsersResponse { users }))
}

pub async fn get_user(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> AppResult<Json<User>> {
    let user = UserService::new(state.db.clone()).get_user(user_id).await?;
    Ok(Json(user))
}

pub async fn create_user(
    State(state): State<AppState>,
    Json(input): Json<CreateUserInput>,
) -> AppResult<(StatusCode, Json<User>)> {
    let user = UserService::new(state.db.clone()).create_user(input).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

pub async fn update_user(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
    Json(input): Json<UpdateUserInput>,
) -> AppResult<Json<User>> {
    let user = UserService::new(state.db.clone())
        .update_user(user_id, input)
        .await?;
    Ok(Json(user))
}

/// Delete a user. Admins cannot delete their own account.
pub async fn delete_user(
    State(state): State<AppState>,
    CurrentUser(admin): CurrentUser,
    Path(user_id): Path<Uuid>,
) -> AppResult<StatusCode> {
    if admin.user_id == user_id {
        return Err(AppError::Conflict {
            resource: "user".to_string(),
            message: "You cannot delete your own account".to_string(),
        });
    }

    UserService::new(state.db.clone()).delete_user(user_id).await?;
    state.active_users.mark_inactive(user_id).await;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_active_users(State(state): State<AppState>) -> Json<ActiveUsersResponse> {
    let user_ids = state.active_users.snapshot().await;
    Json(ActiveUsersResponse {
        count: user_ids.len(),
        user_ids,
    })
}

pub async fn get_user_stats(State(state): State<AppState>) -> AppResult<Json<UserStats>> {
    let (admins, users) = UserService::new(state.db.clone()).count_by_role().await?;
    Ok(Json(UserStats {
        total_users: admins + users,
        admins,
        users,
        active_users: state.active_users.count().await,
    }))
}
