//! Validated user identifier.
//!
//! Bearer tokens embed the user id as a plain string. Wrapping it in
//! [`UserId`] at the trust boundary means every id that reaches a query has
//! already passed UUID validation; invalid values are unrepresentable once
//! constructed.

use std::fmt::Display;

use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0} is not a valid UUID")]
pub struct InvalidUserId(pub String);

/// Identifier of a registered user, guaranteed to be a canonical UUID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct UserId(Uuid);

impl UserId {
    /// Parse and validate an identifier from untrusted input.
    ///
    /// # Errors
    ///
    /// Returns an error if `value` is not in the canonical hyphenated UUID
    /// form.
    pub fn new(value: &str) -> Result<Self, InvalidUserId> {
        if !is_valid_uuid(value) {
            return Err(InvalidUserId(value.to_string()));
        }

        Uuid::try_parse(value)
            .map(Self)
            .map_err(|_| InvalidUserId(value.to_string()))
    }

    /// Generate a fresh random identifier.
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// The underlying UUID, for binding into queries.
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

/// Identifiers read back from the database are trusted by construction.
impl From<Uuid> for UserId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Whether `value` matches the canonical UUID textual grammar:
/// five hyphen-separated hex groups of 8-4-4-4-12 digits, case-insensitive.
///
/// `Uuid::try_parse` also accepts braced, URN, and 32-digit "simple"
/// renditions; the length check pins the accepted form to the hyphenated one.
pub fn is_valid_uuid(value: &str) -> bool {
    value.len() == 36 && Uuid::try_parse(value).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_canonical_uuids() {
        let valid = [
            "550e8400-e29b-41d4-a716-446655440000",
            "6ba7b810-9dad-11d1-80b4-00c04fd430c8",
            "6BA7B811-9DAD-11D1-80B4-00C04FD430C8",
            "00000000-0000-0000-0000-000000000000",
        ];

        for value in valid {
            assert!(is_valid_uuid(value), "{value} should be accepted");
        }
    }

    #[test]
    fn rejects_non_canonical_forms() {
        let invalid = [
            "cmfklpdba0000vplcz39cirs0",                    // cuid format
            "123-456-789",                                  // wrong format
            "not-a-uuid",                                   // not a UUID at all
            "550e8400-e29b-41d4-a716",                      // incomplete
            "550e8400-e29b-41d4-a716-446655440000-extra",   // too long
            "",                                             // empty string
            "550e8400-e29b-41d4-a716-44665544000g",         // invalid characters
            "550e8400e29b41d4a716446655440000",             // missing hyphens
            "{550e8400-e29b-41d4-a716-446655440000}",       // braced
        ];

        for value in invalid {
            assert!(!is_valid_uuid(value), "{value} should be rejected");
        }
    }

    #[test]
    fn generated_ids_are_valid_and_unique() {
        let first = UserId::generate();
        let second = UserId::generate();

        assert!(is_valid_uuid(&first.to_string()));
        assert!(is_valid_uuid(&second.to_string()));
        assert_ne!(first, second);
    }

    #[test]
    fn new_round_trips_through_display() {
        let id = UserId::new("550e8400-e29b-41d4-a716-446655440000").unwrap();
        assert_eq!(id.to_string(), "550e8400-e29b-41d4-a716-446655440000");
    }

    #[test]
    fn new_rejects_invalid_input() {
        assert!(matches!(UserId::new("not-a-uuid"), Err(InvalidUserId(_))));
    }
}
