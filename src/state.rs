//! Shared application state handed to every handler via Axum's `State` extractor.

use crate::{db::DbPool, services::auth_service::TokenKeys};

/// Dependencies shared across all requests.
///
/// Cloning is cheap: the pool is an `Arc` internally and the token keys are
/// small key-material handles. Handlers receive this through
/// `State(state)`, which keeps the store substitutable (point the pool at a
/// different database in tests) instead of reaching for a global singleton.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub pool: DbPool,

    /// JWT encoding/decoding key pair derived from the configured secret
    pub token_keys: TokenKeys,
}
