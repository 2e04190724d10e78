//! Auth Token
//!
//! Claims minted at sign-in and kept server-side for the lifetime of the
//! session. Only `id` is owned by this crate's callbacks; the rest are the
//! default profile claims.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::entity::user::AuthorizedUser;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthToken {
    /// Subject (user id as reported by the provider)
    pub sub: Option<String>,
    pub name: Option<String>,
    pub email: Option<String>,
    pub picture: Option<String>,
    /// Application user id, copied in on mint
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Issued at (unix seconds)
    pub iat: i64,
    /// Expires at (unix seconds)
    pub exp: i64,
}

impl AuthToken {
    /// Default claims for a freshly signed-in user
    pub fn mint(user: &AuthorizedUser, issued_at: DateTime<Utc>, max_age: Duration) -> Self {
        Self {
            sub: Some(user.id.clone()),
            name: user.name.clone(),
            email: Some(user.email.clone()),
            picture: user.image.clone(),
            id: None,
            iat: issued_at.timestamp(),
            exp: (issued_at + max_age).timestamp(),
        }
    }
}
