//! Application configuration management.
//!
//! This module handles loading configuration from environment variables.
//! It uses the `envy` crate to automatically deserialize environment variables into a type-safe struct.

use serde::Deserialize;

/// Placeholder signing key used only in development when `JWT_SECRET` is unset.
const DEV_JWT_SECRET: &str = "your-secret-key";

/// Application configuration loaded from environment variables.
///
/// # Environment Variables
///
/// - `DATABASE_URL` (required): PostgreSQL connection string
/// - `JWT_SECRET` (optional in development, required otherwise): HS256 signing key
/// - `PORT` (optional): HTTP server port, defaults to 3333
/// - `APP_ENV` (optional): deployment environment name, defaults to "development"
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub database_url: String,

    jwt_secret: Option<String>,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_app_env")]
    pub app_env: String,
}

/// Default port if PORT environment variable is not set.
fn default_port() -> u16 {
    3333
}

fn default_app_env() -> String {
    "development".to_string()
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// This method first attempts to load a `.env` file (which is optional),
    /// then reads environment variables and deserializes them into a Config struct.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Required environment variables are missing (e.g., DATABASE_URL)
    /// - Environment variable values cannot be parsed into expected types
    pub fn from_env() -> Result<Self, envy::Error> {
        // Try to load .env file if it exists (does nothing if not found)
        dotenvy::dotenv().ok();

        // Parse environment variables into Config struct
        // Field names are automatically converted: database_url -> DATABASE_URL
        envy::from_env::<Config>()
    }

    /// Resolve the JWT signing secret.
    ///
    /// Outside of development an unset `JWT_SECRET` refuses to start rather
    /// than silently signing tokens with a publicly known placeholder.
    ///
    /// # Errors
    ///
    /// Returns an error if `JWT_SECRET` is unset and `APP_ENV` is anything
    /// other than `development`.
    pub fn jwt_secret(&self) -> anyhow::Result<String> {
        match &self.jwt_secret {
            Some(secret) => Ok(secret.clone()),
            None if self.app_env == "development" => {
                tracing::warn!(
                    "JWT_SECRET is not set; falling back to an insecure development placeholder"
                );
                Ok(DEV_JWT_SECRET.to_string())
            }
            None => anyhow::bail!(
                "JWT_SECRET must be set when APP_ENV is {:?}",
                self.app_env
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(jwt_secret: Option<&str>, app_env: &str) -> Config {
        Config {
            database_url: "postgres://localhost/myfinance".to_string(),
            jwt_secret: jwt_secret.map(String::from),
            port: default_port(),
            app_env: app_env.to_string(),
        }
    }

    #[test]
    fn explicit_secret_is_used_as_is() {
        let config = config(Some("s3cret"), "production");
        assert_eq!(config.jwt_secret().unwrap(), "s3cret");
    }

    #[test]
    fn development_falls_back_to_placeholder() {
        let config = config(None, "development");
        assert_eq!(config.jwt_secret().unwrap(), DEV_JWT_SECRET);
    }

    #[test]
    fn missing_secret_outside_development_is_fatal() {
        let config = config(None, "production");
        assert!(config.jwt_secret().is_err());
    }
}
