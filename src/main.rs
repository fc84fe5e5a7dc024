//! MyFinance API - Main Application Entry Point
//!
//! This is a REST API server for managing users and their financial
//! transactions. It provides JWT-authenticated endpoints for registration,
//! login, and per-user transaction CRUD plus aggregate statistics.
//!
//! # Architecture
//!
//! - **Web Framework**: Axum (async HTTP server)
//! - **Database**: PostgreSQL with sqlx (async queries)
//! - **Authentication**: bcrypt password hashes, HS256 JWT bearer tokens
//! - **Format**: JSON requests/responses
//!
//! # Startup Flow
//!
//! 1. Load configuration from environment variables
//! 2. Create database connection pool
//! 3. Run database migrations
//! 4. Seed the default administrator account
//! 5. Build HTTP router with routes and middleware
//! 6. Start server on configured port

mod config;
mod db;
mod error;
mod handlers;
mod middleware;
mod models;
mod seed;
mod services;
mod state;

use std::time::Duration;

use tracing_subscriber::EnvFilter;

use axum::{
    Router, middleware as axum_middleware,
    routing::{get, post},
};
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::{services::auth_service::TokenKeys, state::AppState};

/// Upper bound on the time a single request may take end to end.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging with tracing subscriber. Reads RUST_LOG environment variable (defaults to "info" level)
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    // Load configuration
    let config = config::Config::from_env()?;
    tracing::info!("Configuration loaded");

    // Resolve the signing secret (refuses to start outside development
    // when JWT_SECRET is unset)
    let token_keys = TokenKeys::new(&config.jwt_secret()?);

    // Create database pool
    let pool = db::create_pool(&config.database_url).await?;
    tracing::info!("Database pool created");

    // Run migrations
    db::run_migrations(&pool).await?;
    tracing::info!("Database migrations complete");

    // Provision the default administrator on a fresh database
    seed::seed_admin(&pool).await?;

    let state = AppState { pool, token_keys };

    // Protected routes: everything behind the bearer-token middleware.
    // Registration is deliberately in this group - accounts are provisioned
    // by an authenticated user, and the seeded administrator bootstraps the
    // first login.
    let protected_routes = Router::new()
        // Authentication routes
        .route("/auth/register", post(handlers::auth::register))
        .route("/auth/me", get(handlers::auth::me))
        // User directory routes
        .route(
            "/users",
            get(handlers::users::list_users).post(handlers::users::create_user),
        )
        // Financial transaction routes
        .route(
            "/financial-transactions",
            post(handlers::financial_transactions::create_transaction)
                .get(handlers::financial_transactions::list_transactions),
        )
        .route(
            "/financial-transactions/stats",
            get(handlers::financial_transactions::get_transaction_stats),
        )
        .route(
            "/financial-transactions/{id}",
            get(handlers::financial_transactions::get_transaction)
                .put(handlers::financial_transactions::update_transaction)
                .patch(handlers::financial_transactions::update_transaction)
                .delete(handlers::financial_transactions::delete_transaction),
        )
        // Apply authentication middleware to all routes in this group
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::auth::auth_middleware,
        ));

    // Combine authenticated routes with public routes
    let app = Router::new()
        // Public routes (no authentication required)
        .route("/auth/login", post(handlers::auth::login))
        .route("/health", get(handlers::health::health_check))
        // Merge authenticated routes
        .merge(protected_routes)
        // Add request tracing middleware for observability
        .layer(TraceLayer::new_for_http())
        // Bound every request so a stalled store cannot hang the caller
        .layer(TimeoutLayer::new(REQUEST_TIMEOUT))
        // Share pool and token keys with all handlers via State extraction
        .with_state(state);

    // Bind to network address and start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    // Start serving HTTP requests
    // This blocks forever, handling requests concurrently with tokio
    axum::serve(listener, app).await?;

    Ok(())
}
