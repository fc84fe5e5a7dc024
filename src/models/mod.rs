//! Data models representing database entities.
//!
//! This module contains the structures that map to database tables, the
//! request/response types for the API, and the validation rules that turn
//! untyped payloads into well-formed values.

/// Financial transaction model and validation
pub mod financial_transaction;
/// User account model and validation
pub mod user;
/// Validated user identifier
pub mod user_id;
