//! Sign Out Use Case
//!
//! Invalidates a user session.

use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::application::get_session::parse_session_token;
use crate::domain::repository::SessionRepository;
use crate::error::AuthResult;

/// Sign out use case
pub struct SignOutUseCase<S>
where
    S: SessionRepository,
{
    session_repo: Arc<S>,
    config: Arc<AuthConfig>,
}

impl<S> SignOutUseCase<S>
where
    S: SessionRepository,
{
    pub fn new(session_repo: Arc<S>, config: Arc<AuthConfig>) -> Self {
        Self {
            session_repo,
            config,
        }
    }

    /// Delete the session behind `session_token`
    pub async fn execute(&self, session_token: &str) -> AuthResult<()> {
        let session_id = parse_session_token(&self.config.session_secret, session_token)?;

        self.session_repo.delete(session_id).await?;

        tracing::info!(session_id = %session_id, "User signed out");

        Ok(())
    }
}
