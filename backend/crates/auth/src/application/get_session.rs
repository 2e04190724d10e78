//! Get Session Use Case
//!
//! Resolves a signed session token to the client-facing session.

use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::domain::entity::session::Session;
use crate::domain::repository::SessionRepository;
use crate::domain::services::enrich_session;
use crate::domain::value_object::SessionId;
use crate::error::{AuthError, AuthResult};

/// Get session use case
pub struct GetSessionUseCase<S>
where
    S: SessionRepository,
{
    session_repo: Arc<S>,
    config: Arc<AuthConfig>,
}

impl<S> GetSessionUseCase<S>
where
    S: SessionRepository,
{
    pub fn new(session_repo: Arc<S>, config: Arc<AuthConfig>) -> Self {
        Self {
            session_repo,
            config,
        }
    }

    pub async fn execute(&self, session_token: &str) -> AuthResult<Session> {
        let session_id = parse_session_token(&self.config.session_secret, session_token)?;

        let stored = self
            .session_repo
            .find_by_id(session_id)
            .await?
            .ok_or(AuthError::SessionInvalid)?;

        if stored.is_expired() {
            self.session_repo.delete(session_id).await?;
            return Err(AuthError::SessionInvalid);
        }

        let session = Session::from_token(&stored.token, stored.expires_at);
        Ok(enrich_session(session, &stored.token))
    }
}

/// Verify the token signature and extract the session id
pub(crate) fn parse_session_token(secret: &[u8; 32], token: &str) -> AuthResult<SessionId> {
    platform::crypto::verify(secret, token)
        .and_then(|payload| payload.parse().ok())
        .ok_or(AuthError::SessionInvalid)
}
