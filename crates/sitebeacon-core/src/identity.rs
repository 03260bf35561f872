//! User identity types for analytics reconciliation.
//!
//! Identity is per-session state: either anonymous or bound to a known user.
//! The reconciler in `sitebeacon-analytics` consumes these types; this module
//! only defines the validated identifier and the trait payload.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Validated user identifier bound to analytics events after `identify`.
///
/// Uses a parse-don't-validate constructor: the identifier must be non-empty,
/// at most 128 characters, and free of leading/trailing whitespace.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    /// Parse and validate a user identifier.
    pub fn parse(raw: impl Into<String>) -> Result<Self, InvalidUserId> {
        let raw = raw.into();
        if raw.is_empty() {
            return Err(InvalidUserId::Empty);
        }
        if raw.len() > 128 {
            return Err(InvalidUserId::TooLong { length: raw.len() });
        }
        if raw.trim() != raw {
            return Err(InvalidUserId::Whitespace);
        }
        Ok(Self(raw))
    }

    /// Construct without validation. Intended for trusted, static inputs.
    pub fn new_unchecked(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// User identifier validation errors.
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum InvalidUserId {
    #[error("user id must not be empty")]
    Empty,

    #[error("user id exceeds 128 characters (got {length})")]
    TooLong { length: usize },

    #[error("user id must not carry leading or trailing whitespace")]
    Whitespace,
}

/// Traits forwarded alongside an `identify` call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserTraits {
    /// Primary email address, when known.
    pub email: Option<String>,
    /// Account creation timestamp, when known.
    pub created_at: Option<DateTime<Utc>>,
}

/// A resolved, signed-in user as observed from the auth-state provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: UserId,
    pub traits: UserTraits,
}

impl UserProfile {
    /// Profile with empty traits.
    pub fn new(id: UserId) -> Self {
        Self {
            id,
            traits: UserTraits::default(),
        }
    }

    /// Attach traits to the profile.
    pub fn with_traits(mut self, traits: UserTraits) -> Self {
        self.traits = traits;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_id_validation() {
        assert!(UserId::parse("user-42").is_ok());
        assert_eq!(UserId::parse(""), Err(InvalidUserId::Empty));
        assert_eq!(UserId::parse("  padded "), Err(InvalidUserId::Whitespace));
        assert!(matches!(
            UserId::parse("u".repeat(129)),
            Err(InvalidUserId::TooLong { length: 129 })
        ));
    }

    #[test]
    fn test_profile_builder() {
        let profile = UserProfile::new(UserId::new_unchecked("user-1")).with_traits(UserTraits {
            email: Some("user@example.com".to_string()),
            created_at: None,
        });

        assert_eq!(profile.id.as_str(), "user-1");
        assert_eq!(profile.traits.email.as_deref(), Some("user@example.com"));
    }
}
