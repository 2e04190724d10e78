//! Sign In Use Case
//!
//! Runs the credential gate and opens a server-side session for the
//! authorized user.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::application::authorize::{AuthorizeInput, AuthorizeUseCase};
use crate::application::config::AuthConfig;
use crate::domain::entity::{session::StoredSession, token::AuthToken, user::AuthorizedUser};
use crate::domain::repository::{LoginAttemptRepository, SessionRepository, UserRepository};
use crate::domain::services::{PasswordVerifier, enrich_token};
use crate::error::AuthResult;

/// Sign in output
pub struct SignInOutput {
    /// Signed session token for the cookie
    pub session_token: String,
    pub user: AuthorizedUser,
    pub expires_at: DateTime<Utc>,
}

/// Sign in use case
pub struct SignInUseCase<U, A, P, S>
where
    U: UserRepository,
    A: LoginAttemptRepository,
    P: PasswordVerifier,
    S: SessionRepository,
{
    authorize: AuthorizeUseCase<U, A, P>,
    session_repo: Arc<S>,
    config: Arc<AuthConfig>,
}

impl<U, A, P, S> SignInUseCase<U, A, P, S>
where
    U: UserRepository,
    A: LoginAttemptRepository,
    P: PasswordVerifier,
    S: SessionRepository,
{
    pub fn new(
        user_repo: Arc<U>,
        attempt_repo: Arc<A>,
        verifier: Arc<P>,
        session_repo: Arc<S>,
        config: Arc<AuthConfig>,
    ) -> Self {
        Self {
            authorize: AuthorizeUseCase::new(user_repo, attempt_repo, verifier, config.clone()),
            session_repo,
            config,
        }
    }

    pub async fn execute(&self, input: AuthorizeInput) -> AuthResult<SignInOutput> {
        let user = self.authorize.execute(input).await?;

        let ttl = self.config.session_ttl();
        let token = enrich_token(AuthToken::mint(&user, Utc::now(), ttl), Some(&user));
        let session = StoredSession::new(token, ttl);

        self.session_repo.create(&session).await?;

        let session_token =
            platform::crypto::sign(&self.config.session_secret, &session.session_id.to_string());

        tracing::info!(
            user_id = %user.id,
            session_id = %session.session_id,
            "User signed in"
        );

        Ok(SignInOutput {
            session_token,
            user,
            expires_at: session.expires_at,
        })
    }
}
