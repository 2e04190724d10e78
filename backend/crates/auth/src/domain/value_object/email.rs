//! Email Value Object
//!
//! Login identifier and lockout key. Normalization only: an address that
//! is not well formed is still a valid key, it simply never matches a user.

use serde::{Deserialize, Serialize};

/// Normalized (trimmed, lowercased) email address
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Email(String);

impl Email {
    /// Normalize user input; `None` when nothing is left after trimming
    pub fn parse(raw: &str) -> Option<Self> {
        let email = raw.trim().to_lowercase();
        if email.is_empty() {
            None
        } else {
            Some(Self(email))
        }
    }

    /// Create from a stored value, casing kept as stored
    pub fn from_db(email: impl Into<String>) -> Self {
        Self(email.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Email {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for Email {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
