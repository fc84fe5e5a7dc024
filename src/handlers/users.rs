//! User directory HTTP handlers.
//!
//! This module implements the user management endpoints:
//! - GET /users - List all registered users
//! - POST /users - Provision a new user without issuing a token
//!
//! Both routes sit behind the auth middleware.

use crate::{
    error::AppError,
    models::user::{CreateUserRequest, CreatedUserResponse, User, UsersResponse},
    services::auth_service,
    state::AppState,
};
use axum::{Json, extract::State, http::StatusCode};
use uuid::Uuid;

/// List every registered user, newest first.
///
/// Only public profile fields are returned; password hashes stay in the
/// database.
pub async fn list_users(State(state): State<AppState>) -> Result<Json<UsersResponse>, AppError> {
    let users = sqlx::query_as::<_, User>(
        "SELECT id, name, email, password, created_at, updated_at FROM users ORDER BY created_at DESC",
    )
    .fetch_all(&state.pool)
    .await?;

    Ok(Json(UsersResponse {
        users: users.into_iter().map(Into::into).collect(),
    }))
}

/// Provision a new user.
///
/// Same flow as registration, but the caller keeps their own session: no
/// token is issued for the created account.
///
/// # Errors
///
/// - 400 validation error with per-field details
/// - 400 when the email is already taken
pub async fn create_user(
    State(state): State<AppState>,
    Json(request): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<CreatedUserResponse>), AppError> {
    let new_user = request.validate()?;

    let existing: Option<Uuid> = sqlx::query_scalar("SELECT id FROM users WHERE email = $1")
        .bind(&new_user.email)
        .fetch_optional(&state.pool)
        .await?;

    if existing.is_some() {
        return Err(AppError::EmailTaken);
    }

    let password_hash = auth_service::hash_password(new_user.password).await?;

    let user = sqlx::query_as::<_, User>(
        r#"
        INSERT INTO users (name, email, password)
        VALUES ($1, $2, $3)
        RETURNING id, name, email, password, created_at, updated_at
        "#,
    )
    .bind(&new_user.name)
    .bind(&new_user.email)
    .bind(&password_hash)
    .fetch_one(&state.pool)
    .await
    .map_err(AppError::from_unique_email)?;

    Ok((
        StatusCode::CREATED,
        Json(CreatedUserResponse {
            message: "User created successfully".to_string(),
            user: user.into(),
        }),
    ))
}
