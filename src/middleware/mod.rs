//! HTTP middleware components.
//!
//! Middleware are functions that run before route handlers. Here that is
//! the bearer-token check guarding every protected route.

/// JWT bearer authentication middleware
pub mod auth;
