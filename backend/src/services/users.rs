//! User administration service

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::services::auth::hash_password;
use shared::{validate_email, validate_password, validate_username, User, UserRole};

/// Columns selected for every user query
pub const USER_COLUMNS: &str = "id, username, email, password_hash, role, created_at, updated_at";

/// User service for admin CRUD
#[derive(Clone)]
pub struct UserService {
    db: PgPool,
}

/// User row as stored
#[derive(Debug, Clone, FromRow)]
pub struct UserRecord {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    #[sqlx(try_from = "String")]
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<UserRecord> for User {
    fn from(record: UserRecord) -> Self {
        User {
            id: record.id,
            username: record.username,
            email: record.email,
            role: record.role,
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}

/// Input for admin-created accounts
#[derive(Debug, Deserialize)]
pub struct CreateUserInput {
    pub username: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub role: UserRole,
}

/// Input for admin edits. A present password is rehashed.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateUserInput {
    pub username: Option<String>,
    pub email: Option<String>,
    pub role: Option<UserRole>,
    pub password: Option<String>,
}

/// Account counts for the admin panel
#[derive(Debug, Serialize)]
pub struct UserStats {
    pub total_users: i64,
    pub admins: i64,
    pub users: i64,
    pub active_users: usize,
}

pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

impl UserService {
    /// Create a new UserService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    pub async fn list_users(&self) -> AppResult<Vec<User>> {
        let records = sqlx::query_as::<_, UserRecord>(&format!(
            "SELECT {} FROM users ORDER BY created_at ASC",
            USER_COLUMNS
        ))
        .fetch_all(&self.db)
        .await?;

        Ok(records.into_iter().map(User::from).collect())
    }

    pub async fn get_user(&self, user_id: Uuid) -> AppResult<User> {
        let record = sqlx::query_as::<_, UserRecord>(&format!(
            "SELECT {} FROM users WHERE id = $1",
            USER_COLUMNS
        ))
        .bind(user_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("User".to_string()))?;

        Ok(record.into())
    }

    pub async fn create_user(&self, input: CreateUserInput) -> AppResult<User> {
        validate_username(&input.username).map_err(|m| AppError::validation("username", m))?;
        validate_email(&input.email).map_err(|m| AppError::validation("email", m))?;
        validate_password(&input.password).map_err(|m| AppError::validation("password", m))?;

        let password_hash = hash_password(&input.password)?;

        let record = sqlx::query_as::<_, UserRecord>(&format!(
            r#"
            INSERT INTO users (username, email, password_hash, role)
            VALUES ($1, $2, $3, $4)
            RETURNING {}
            "#,
            USER_COLUMNS
        ))
        .bind(input.username.trim())
        .bind(normalize_email(&input.email))
        .bind(&password_hash)
        .bind(input.role.as_str())
        .fetch_one(&self.db)
        .await
        .map_err(|e| AppError::from_unique_violation(e, "email"))?;

        tracing::info!(user_id = %record.id, role = %record.role, "Admin created user");
        Ok(record.into())
    }

    pub async fn update_user(&self, user_id: Uuid, input: UpdateUserInput) -> AppResult<User> {
        let existing = sqlx::query_as::<_, UserRecord>(&format!(
            "SELECT {} FROM users WHERE id = $1",
            USER_COLUMNS
        ))
        .bind(user_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("User".to_string()))?;

        let username = match input.username {
            Some(username) => {
                validate_username(&username).map_err(|m| AppError::validation("username", m))?;
                username.trim().to_string()
            }
            None => existing.username,
        };

        let email = match input.email {
            Some(email) => {
                validate_email(&email).map_err(|m| AppError::validation("email", m))?;
                normalize_email(&email)
            }
            None => existing.email,
        };

        let password_hash = match input.password.as_deref() {
            Some(password) if !password.is_empty() => {
                validate_password(password).map_err(|m| AppError::validation("password", m))?;
                hash_password(password)?
            }
            _ => existing.password_hash,
        };

        let role = input.role.unwrap_or(existing.role);

        let record = sqlx::query_as::<_, UserRecord>(&format!(
            r#"
            UPDATE users
            SET username = $1, email = $2, password_hash = $3, role = $4
            WHERE id = $5
            RETURNING {}
            "#,
            USER_COLUMNS
        ))
        .bind(&username)
        .bind(&email)
        .bind(&password_hash)
        .bind(role.as_str())
        .bind(user_id)
        .fetch_one(&self.db)
        .await
        .map_err(|e| AppError::from_unique_violation(e, "email"))?;

        tracing::info!(user_id = %user_id, "Admin updated user");
        Ok(record.into())
    }

    pub async fn delete_user(&self, user_id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(user_id)
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("User".to_string()));
        }

        tracing::info!(user_id = %user_id, "Admin deleted user");
        Ok(())
    }

    /// Count accounts by role
    pub async fn count_by_role(&self) -> AppResult<(i64, i64)> {
        let counts = sqlx::query_as::<_, (i64, i64)>(
            r#"
            SELECT COUNT(*) FILTER (WHERE role = 'admin'),
                   COUNT(*) FILTER (WHERE role = 'user')
            FROM users
            "#,
        )
        .fetch_one(&self.db)
        .await?;

        Ok(counts)
    }
}
