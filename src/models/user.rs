//! User data models and API request/response types.
//!
//! This module defines:
//! - `User`: Database entity representing a registered account
//! - Request types for registration/provisioning and login, with validation
//! - Response types that expose public profile fields only

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{AppError, FieldError};

/// Minimum accepted length for a new password.
const MIN_PASSWORD_LENGTH: usize = 6;

/// Represents a user record from the database.
///
/// # Database Table
///
/// Maps to the `users` table. The `password` column holds a bcrypt hash;
/// the plaintext never touches storage and the hash never appears in a
/// response (the entity does not implement `Serialize` - responses go
/// through [`UserResponse`] or [`UserListItem`]).
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
    /// Unique identifier for this user
    pub id: Uuid,

    /// Display name
    pub name: String,

    /// Unique email address, used for login
    pub email: String,

    /// bcrypt hash of the password
    pub password: String,

    /// When the account was created
    pub created_at: DateTime<Utc>,

    /// When the account was last modified
    pub updated_at: DateTime<Utc>,
}

/// Request to register a new user or provision one through `/users`.
///
/// # JSON Example
///
/// ```json
/// {
///   "name": "Ann",
///   "email": "ann@x.com",
///   "password": "secret1"
/// }
/// ```
#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// A [`CreateUserRequest`] that passed validation. The password is still
/// plaintext at this point; hashing happens in the handler.
#[derive(Debug)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl CreateUserRequest {
    /// Check every field and produce either a normalized value or the full
    /// list of violations.
    ///
    /// # Rules
    ///
    /// - `name` must be non-empty
    /// - `email` must be a well-formed address
    /// - `password` must be at least 6 characters
    pub fn validate(self) -> Result<NewUser, AppError> {
        let mut errors = Vec::new();

        if self.name.is_empty() {
            errors.push(FieldError::new("name", "Name is required"));
        }
        if !email_address::EmailAddress::is_valid(&self.email) {
            errors.push(FieldError::new("email", "Invalid email format"));
        }
        if self.password.len() < MIN_PASSWORD_LENGTH {
            errors.push(FieldError::new(
                "password",
                "Password must be at least 6 characters",
            ));
        }

        if errors.is_empty() {
            Ok(NewUser {
                name: self.name,
                email: self.email,
                password: self.password,
            })
        } else {
            Err(AppError::Validation(errors))
        }
    }
}

/// Request to log in with email and password.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// A [`LoginRequest`] that passed validation.
#[derive(Debug)]
pub struct LoginCredentials {
    pub email: String,
    pub password: String,
}

impl LoginRequest {
    /// # Rules
    ///
    /// - `email` must be a well-formed address
    /// - `password` must be non-empty
    pub fn validate(self) -> Result<LoginCredentials, AppError> {
        let mut errors = Vec::new();

        if !email_address::EmailAddress::is_valid(&self.email) {
            errors.push(FieldError::new("email", "Invalid email format"));
        }
        if self.password.is_empty() {
            errors.push(FieldError::new("password", "Password is required"));
        }

        if errors.is_empty() {
            Ok(LoginCredentials {
                email: self.email,
                password: self.password,
            })
        } else {
            Err(AppError::Validation(errors))
        }
    }
}

/// Public profile fields returned to clients.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            created_at: user.created_at,
        }
    }
}

/// Entry in the `/users` directory listing.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserListItem {
    pub name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserListItem {
    fn from(user: User) -> Self {
        Self {
            name: user.name,
            email: user.email,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// Response for register and login: user summary plus a fresh bearer token.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub message: String,
    pub user: UserResponse,
    pub token: String,
}

/// Response for `GET /auth/me`.
#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub user: UserResponse,
}

/// Response for `GET /users`.
#[derive(Debug, Serialize)]
pub struct UsersResponse {
    pub users: Vec<UserListItem>,
}

/// Response for `POST /users` (provisioning without a token).
#[derive(Debug, Serialize)]
pub struct CreatedUserResponse {
    pub message: String,
    pub user: UserResponse,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_request(name: &str, email: &str, password: &str) -> CreateUserRequest {
        CreateUserRequest {
            name: name.to_string(),
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    #[test]
    fn valid_registration_passes() {
        let request = create_request("Ann", "ann@x.com", "secret1");
        let user = request.validate().unwrap();

        assert_eq!(user.name, "Ann");
        assert_eq!(user.email, "ann@x.com");
    }

    #[test]
    fn every_failing_field_is_reported_together() {
        let request = create_request("", "not-an-email", "short");
        let error = request.validate().unwrap_err();

        let AppError::Validation(details) = error else {
            panic!("expected a validation error");
        };
        let fields: Vec<_> = details.iter().map(|d| d.field).collect();
        assert_eq!(fields, vec!["name", "email", "password"]);
    }

    #[test]
    fn short_password_is_rejected() {
        let request = create_request("Ann", "ann@x.com", "five5");
        assert!(request.validate().is_err());
    }

    #[test]
    fn six_character_password_is_accepted() {
        let request = create_request("Ann", "ann@x.com", "sixsix");
        assert!(request.validate().is_ok());
    }

    #[test]
    fn login_requires_well_formed_email_and_password() {
        let request = LoginRequest {
            email: "nonsense".to_string(),
            password: String::new(),
        };
        let error = request.validate().unwrap_err();

        let AppError::Validation(details) = error else {
            panic!("expected a validation error");
        };
        assert_eq!(details.len(), 2);
    }

    #[test]
    fn login_accepts_any_non_empty_password() {
        let request = LoginRequest {
            email: "ann@x.com".to_string(),
            password: "x".to_string(),
        };
        assert!(request.validate().is_ok());
    }
}
