//! Authentication HTTP handlers.
//!
//! This module implements the auth-related API endpoints:
//! - POST /auth/register - Provision a new user (requires authentication)
//! - POST /auth/login - Exchange credentials for a bearer token
//! - GET /auth/me - Current user's profile

use crate::{
    error::AppError,
    middleware::auth::AuthContext,
    models::{
        user::{AuthResponse, CreateUserRequest, LoginRequest, MeResponse, User},
        user_id::UserId,
    },
    services::auth_service,
    state::AppState,
};
use axum::{Extension, Json, extract::State, http::StatusCode};
use uuid::Uuid;

/// Register a new user.
///
/// Registration sits behind the auth middleware: accounts are provisioned
/// by an already-authenticated user, and the seeded administrator
/// bootstraps the first login.
///
/// # Request Body
///
/// ```json
/// {
///   "name": "Ann",
///   "email": "ann@x.com",
///   "password": "secret1"
/// }
/// ```
///
/// # Response (201)
///
/// ```json
/// {
///   "message": "User created successfully",
///   "user": { "id": "...", "name": "Ann", "email": "ann@x.com", "createdAt": "..." },
///   "token": "eyJ..."
/// }
/// ```
///
/// # Errors
///
/// - 400 validation error with per-field details
/// - 400 when the email is already taken (pre-check, or the unique
///   constraint when a concurrent registration wins the race)
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), AppError> {
    let new_user = request.validate()?;

    // Reject duplicates up front; the unique constraint is the backstop
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

    let token = auth_service::issue_token(&state.token_keys, UserId::from(user.id), &user.email)?;

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            message: "User created successfully".to_string(),
            user: user.into(),
            token,
        }),
    ))
}

/// Exchange email and password for a bearer token.
///
/// # Security
///
/// An unknown email and a wrong password produce the identical 401
/// response, so the endpoint cannot be used to enumerate accounts.
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    let credentials = request.validate()?;

    let user = sqlx::query_as::<_, User>(
        "SELECT id, name, email, password, created_at, updated_at FROM users WHERE email = $1",
    )
    .bind(&credentials.email)
    .fetch_optional(&state.pool)
    .await?
    .ok_or(AppError::InvalidCredentials)?;

    let password_matches =
        auth_service::verify_password(credentials.password, user.password.clone()).await?;

    if !password_matches {
        return Err(AppError::InvalidCredentials);
    }

    let token = auth_service::issue_token(&state.token_keys, UserId::from(user.id), &user.email)?;

    Ok(Json(AuthResponse {
        message: "Login successful".to_string(),
        user: user.into(),
        token,
    }))
}

/// Current user's public profile.
///
/// The middleware already validated the token and its embedded UUID, so the
/// only remaining question is whether the account still exists.
pub async fn me(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> Result<Json<MeResponse>, AppError> {
    let user = sqlx::query_as::<_, User>(
        "SELECT id, name, email, password, created_at, updated_at FROM users WHERE id = $1",
    )
    .bind(auth.user_id.as_uuid())
    .fetch_optional(&state.pool)
    .await?
    .ok_or(AppError::UserNotFound)?;

    Ok(Json(MeResponse { user: user.into() }))
}
