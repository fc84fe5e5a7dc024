//! Business logic services.
//!
//! Services contain core logic separated from HTTP handlers: credential
//! hashing and token handling, and the persistence operations for
//! financial transactions.

pub mod auth_service;
pub mod transaction_service;
