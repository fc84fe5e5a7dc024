//! One-time seed routine for the default administrator account.
//!
//! Registration requires authentication, so a fresh database needs one
//! account to bootstrap the first login. The seed runs at startup, right
//! after migrations, and does nothing when the administrator already
//! exists.

use uuid::Uuid;

use crate::{db::DbPool, services::auth_service};

const ADMIN_NAME: &str = "Administrador";
const ADMIN_EMAIL: &str = "admin@myfinance.com";

/// Default password for the seeded account. Change it after the first login.
const ADMIN_PASSWORD: &str = "admin123";

/// Provision the default administrator if it does not exist yet.
pub async fn seed_admin(pool: &DbPool) -> anyhow::Result<()> {
    let existing: Option<Uuid> = sqlx::query_scalar("SELECT id FROM users WHERE email = $1")
        .bind(ADMIN_EMAIL)
        .fetch_optional(pool)
        .await?;

    if existing.is_some() {
        tracing::info!("administrator account {ADMIN_EMAIL} already exists");
        return Ok(());
    }

    let password_hash = auth_service::hash_password(ADMIN_PASSWORD.to_string()).await?;

    sqlx::query("INSERT INTO users (name, email, password) VALUES ($1, $2, $3)")
        .bind(ADMIN_NAME)
        .bind(ADMIN_EMAIL)
        .bind(&password_hash)
        .execute(pool)
        .await?;

    tracing::info!(
        "administrator account {ADMIN_EMAIL} created; change the default password after the first login"
    );

    Ok(())
}
