//! User Entity
//!
//! Read-only view of an account in the user store. Accounts created
//! through an OAuth provider have no password hash.

use chrono::{DateTime, Utc};
use platform::password::HashedPassword;
use serde::Serialize;

use crate::domain::value_object::{email::Email, UserId};

/// User entity
#[derive(Debug, Clone)]
pub struct User {
    pub user_id: UserId,
    pub email: Email,
    /// Display name
    pub name: Option<String>,
    /// Avatar URL
    pub image: Option<String>,
    /// Argon2id hash; `None` for OAuth-only accounts
    pub password_hash: Option<HashedPassword>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a new password-backed user
    pub fn new(email: Email, name: Option<String>, password_hash: HashedPassword) -> Self {
        let now = Utc::now();
        Self {
            user_id: UserId::new(),
            email,
            name,
            image: None,
            password_hash: Some(password_hash),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }

    /// Projection handed to the session layer; never carries the hash
    pub fn authorized(&self) -> AuthorizedUser {
        AuthorizedUser {
            id: self.user_id.to_string(),
            email: self.email.to_string(),
            name: self.name.clone(),
            image: self.image.clone(),
        }
    }
}

/// Identity produced by a successful credential check
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthorizedUser {
    pub id: String,
    pub email: String,
    pub name: Option<String>,
    pub image: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use platform::password::ClearTextPassword;

    #[test]
    fn test_authorized_projection_has_exactly_four_fields() {
        let hash = ClearTextPassword::new("hunter22".to_string())
            .unwrap()
            .hash(None)
            .unwrap();
        let user = User::new(
            Email::parse("ada@example.com").unwrap(),
            Some("Ada".to_string()),
            hash,
        )
        .with_image("https://example.com/ada.png");

        let json = serde_json::to_value(user.authorized()).unwrap();
        let object = json.as_object().unwrap();

        let mut keys: Vec<&str> = object.keys().map(String::as_str).collect();
        keys.sort_unstable();
        assert_eq!(keys, ["email", "id", "image", "name"]);
        assert_eq!(object["id"], user.user_id.to_string());
        assert_eq!(object["image"], "https://example.com/ada.png");
    }
}
