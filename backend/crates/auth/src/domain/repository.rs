//! Repository Traits
//!
//! Collaborators of the credential gate. Implementations live in `infra`.

use crate::domain::entity::{session::StoredSession, user::User};
use crate::domain::value_object::{SessionId, email::Email};
use crate::error::AuthResult;

/// User lookup
#[trait_variant::make(UserRepository: Send)]
pub trait LocalUserRepository {
    /// Find a user by normalized email
    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<User>>;
}

/// Failed-login bookkeeping keyed by email
///
/// Implementations must make a `record_failed_attempt` visible to a
/// subsequent `is_blocked` for the same email.
#[trait_variant::make(LoginAttemptRepository: Send)]
pub trait LocalLoginAttemptRepository {
    /// Whether sign-in for this email is currently locked out
    async fn is_blocked(&self, email: &Email) -> AuthResult<bool>;

    /// Count one failed attempt (unknown emails included)
    async fn record_failed_attempt(&self, email: &Email) -> AuthResult<()>;

    /// Forget all failures for this email
    async fn clear_attempts(&self, email: &Email) -> AuthResult<()>;
}

/// Server-side session storage
#[trait_variant::make(SessionRepository: Send)]
pub trait LocalSessionRepository {
    async fn create(&self, session: &StoredSession) -> AuthResult<()>;

    async fn find_by_id(&self, session_id: SessionId) -> AuthResult<Option<StoredSession>>;

    async fn delete(&self, session_id: SessionId) -> AuthResult<()>;

    /// Delete expired sessions, returning how many were removed
    async fn cleanup_expired(&self) -> AuthResult<u64>;
}
