//! JWT bearer authentication middleware.
//!
//! This middleware intercepts every protected request to:
//! 1. Extract the bearer token from the Authorization header
//! 2. Verify its signature and expiry
//! 3. Inject the authenticated identity into the request
//! 4. Reject unauthorized requests with HTTP 401

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::{
    error::AppError, models::user_id::UserId, services::auth_service, state::AppState,
};

/// Authentication context attached to authenticated requests.
///
/// This struct is inserted into the request's extension map and can be
/// extracted by route handlers to know who made the request.
#[derive(Debug, Clone)]
pub struct AuthContext {
    /// ID of the authenticated user, validated UUID
    ///
    /// Used to scope every transaction query to its owner
    pub user_id: UserId,

    /// Email the token was issued for
    pub email: String,
}

/// Bearer token authentication middleware function.
///
/// # Outcomes
///
/// 1. Missing header or non-Bearer scheme: 401 "Access token is required"
/// 2. Signature mismatch or malformed token: 401 "Invalid token";
///    past expiry: 401 "Token expired"
/// 3. Token valid but the embedded user id is not a canonical UUID:
///    401 "Invalid token format"
/// 4. Otherwise: attach [`AuthContext`] and call the next handler
///
/// # Headers
///
/// Expected header format:
/// ```text
/// Authorization: Bearer <token>
/// ```
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    // Step 1: Extract Authorization header
    let auth_header = request
        .headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .ok_or(AppError::MissingToken)?;

    // Step 2: Expect "Bearer <token>"
    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or(AppError::MissingToken)?;

    // Step 3: Verify signature and expiry
    let claims = auth_service::verify_token(&state.token_keys, token)?;

    // Step 4: The embedded user id must be a canonical UUID
    let user_id = UserId::new(&claims.user_id).map_err(|_| AppError::InvalidTokenFormat)?;

    // Step 5: Inject context into request extensions
    // Route handlers can now extract this using Extension<AuthContext>
    request.extensions_mut().insert(AuthContext {
        user_id,
        email: claims.email,
    });

    // Step 6: Call the next middleware/handler
    Ok(next.run(request).await)
}
