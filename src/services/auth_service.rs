//! Credential hashing and bearer token issuance/verification.
//!
//! Passwords are hashed with bcrypt (one-way, salted, adaptive cost) and
//! verified without ever recovering the plaintext. Session tokens are
//! HS256-signed JWTs carrying the user id and email, valid for 7 days.

use chrono::{Duration, Utc};
use jsonwebtoken::{
    DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::ErrorKind,
};
use serde::{Deserialize, Serialize};

use crate::{error::AppError, models::user_id::UserId};

/// bcrypt cost factor. Fixed rather than `DEFAULT_COST` so hashes stay
/// compatible with records produced by earlier deployments.
const HASH_COST: u32 = 10;

/// Tokens expire 7 days after issuance.
const TOKEN_TTL_DAYS: i64 = 7;

/// HS256 key pair derived from the configured signing secret.
///
/// Built once at startup and shared through [`crate::state::AppState`].
#[derive(Clone)]
pub struct TokenKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl TokenKeys {
    pub fn new(secret: &str) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
        }
    }
}

/// The contents of a JSON Web Token.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Identifier of the authenticated user
    #[serde(rename = "userId")]
    pub user_id: String,

    /// Email associated with the token
    pub email: String,

    /// When the token was issued (seconds since epoch)
    pub iat: i64,

    /// When the token expires (seconds since epoch)
    pub exp: i64,
}

/// Sign a new bearer token for the given user.
pub fn issue_token(keys: &TokenKeys, user_id: UserId, email: &str) -> Result<String, AppError> {
    let now = Utc::now();
    let claims = Claims {
        user_id: user_id.to_string(),
        email: email.to_string(),
        iat: now.timestamp(),
        exp: (now + Duration::days(TOKEN_TTL_DAYS)).timestamp(),
    };

    encode(&Header::default(), &claims, &keys.encoding).map_err(|_| AppError::TokenCreation)
}

/// Verify a bearer token and return its claims.
///
/// Expiry is reported distinctly from a malformed token or a signature
/// mismatch; both reject the request with a 401.
pub fn verify_token(keys: &TokenKeys, token: &str) -> Result<Claims, AppError> {
    decode::<Claims>(token, &keys.decoding, &Validation::default())
        .map(|data| data.claims)
        .map_err(|error| match error.kind() {
            ErrorKind::ExpiredSignature => AppError::TokenExpired,
            // Crypto backend faults are not the caller's doing
            ErrorKind::Crypto(_) => AppError::Internal,
            _ => AppError::InvalidToken,
        })
}

/// Hash a plaintext password with bcrypt.
///
/// bcrypt is deliberately slow, so the work runs on the blocking thread
/// pool instead of stalling the async executor.
pub async fn hash_password(password: String) -> Result<String, AppError> {
    let hash = tokio::task::spawn_blocking(move || bcrypt::hash(password, HASH_COST))
        .await
        .map_err(|_| AppError::Internal)??;

    Ok(hash)
}

/// Compare a plaintext candidate against a stored bcrypt hash.
pub async fn verify_password(password: String, hash: String) -> Result<bool, AppError> {
    let matches = tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash))
        .await
        .map_err(|_| AppError::Internal)??;

    Ok(matches)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys() -> TokenKeys {
        TokenKeys::new("test-secret")
    }

    #[test]
    fn issued_tokens_verify_and_carry_the_claims() {
        let keys = keys();
        let user_id = UserId::generate();

        let token = issue_token(&keys, user_id, "ann@x.com").unwrap();
        let claims = verify_token(&keys, &token).unwrap();

        assert_eq!(claims.user_id, user_id.to_string());
        assert_eq!(claims.email, "ann@x.com");
        assert_eq!(claims.exp - claims.iat, TOKEN_TTL_DAYS * 24 * 60 * 60);
    }

    #[test]
    fn tampered_tokens_are_invalid() {
        let keys = keys();
        let mut token = issue_token(&keys, UserId::generate(), "ann@x.com").unwrap();
        token.push('x');

        assert!(matches!(
            verify_token(&keys, &token),
            Err(AppError::InvalidToken)
        ));
    }

    #[test]
    fn tokens_signed_with_another_secret_are_invalid() {
        let token = issue_token(&keys(), UserId::generate(), "ann@x.com").unwrap();

        assert!(matches!(
            verify_token(&TokenKeys::new("other-secret"), &token),
            Err(AppError::InvalidToken)
        ));
    }

    #[test]
    fn expired_tokens_are_reported_distinctly() {
        let keys = keys();
        let now = Utc::now();
        let claims = Claims {
            user_id: UserId::generate().to_string(),
            email: "ann@x.com".to_string(),
            iat: (now - Duration::days(8)).timestamp(),
            exp: (now - Duration::days(1)).timestamp(),
        };
        let token = encode(&Header::default(), &claims, &keys.encoding).unwrap();

        assert!(matches!(
            verify_token(&keys, &token),
            Err(AppError::TokenExpired)
        ));
    }

    #[tokio::test]
    async fn hashing_round_trips_and_rejects_wrong_passwords() {
        let hash = hash_password("secret1".to_string()).await.unwrap();

        assert!(hash.starts_with("$2"));
        assert!(verify_password("secret1".to_string(), hash.clone())
            .await
            .unwrap());
        assert!(!verify_password("wrong".to_string(), hash).await.unwrap());
    }
}
