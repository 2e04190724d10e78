//! Session Entities
//!
//! `Session` is the client-facing view; `StoredSession` is the server-side
//! record referenced by the signed cookie.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::entity::token::AuthToken;
use crate::domain::value_object::SessionId;

/// Client-facing session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub user: Option<SessionUser>,
    pub expires: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: Option<String>,
    pub email: Option<String>,
    pub image: Option<String>,
}

impl Session {
    /// Default session materialized from token claims
    pub fn from_token(token: &AuthToken, expires: DateTime<Utc>) -> Self {
        Self {
            user: Some(SessionUser {
                id: None,
                name: token.name.clone(),
                email: token.email.clone(),
                image: token.picture.clone(),
            }),
            expires,
        }
    }
}

/// Server-side session record
#[derive(Debug, Clone)]
pub struct StoredSession {
    pub session_id: SessionId,
    pub token: AuthToken,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl StoredSession {
    pub fn new(token: AuthToken, ttl: Duration) -> Self {
        let now = Utc::now();
        Self {
            session_id: SessionId::new(),
            token,
            expires_at: now + ttl,
            created_at: now,
        }
    }

    pub fn is_expired(&self) -> bool {
        Utc::now() >= self.expires_at
    }
}
