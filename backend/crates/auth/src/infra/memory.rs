//! In-Memory Repository
//!
//! Process-local implementation of every auth repository, for tests and
//! single-instance development. The attempt map is behind one mutex so
//! check-then-update on a key is atomic.

use std::collections::HashMap;

use chrono::Utc;
use platform::rate_limit::{AttemptRecord, LockoutPolicy};
use tokio::sync::{Mutex, RwLock};

use crate::domain::entity::{session::StoredSession, user::User};
use crate::domain::repository::{LoginAttemptRepository, SessionRepository, UserRepository};
use crate::domain::value_object::{SessionId, email::Email};
use crate::error::AuthResult;

/// In-memory auth repository
#[derive(Debug, Default)]
pub struct InMemoryAuthRepository {
    users: RwLock<HashMap<Email, User>>,
    attempts: Mutex<HashMap<Email, AttemptRecord>>,
    sessions: RwLock<HashMap<SessionId, StoredSession>>,
    policy: LockoutPolicy,
}

impl InMemoryAuthRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_policy(policy: LockoutPolicy) -> Self {
        Self {
            policy,
            ..Self::default()
        }
    }

    /// Seed a user; replaces any user with the same email in any casing
    pub async fn insert_user(&self, user: User) {
        let key = Email::parse(user.email.as_str()).unwrap_or_else(|| user.email.clone());
        self.users.write().await.insert(key, user);
    }

    /// Current failure record for an email, if any
    pub async fn attempt_record(&self, email: &Email) -> Option<AttemptRecord> {
        self.attempts.lock().await.get(email).cloned()
    }
}

impl UserRepository for InMemoryAuthRepository {
    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<User>> {
        Ok(self.users.read().await.get(email).cloned())
    }
}

impl LoginAttemptRepository for InMemoryAuthRepository {
    async fn is_blocked(&self, email: &Email) -> AuthResult<bool> {
        let now = Utc::now();
        let attempts = self.attempts.lock().await;
        Ok(attempts.get(email).is_some_and(|record| record.is_locked(now)))
    }

    async fn record_failed_attempt(&self, email: &Email) -> AuthResult<()> {
        let now = Utc::now();
        let mut attempts = self.attempts.lock().await;

        attempts.retain(|_, record| !record.is_stale(&self.policy, now));

        let record = attempts
            .entry(email.clone())
            .and_modify(|record| record.register_failure(&self.policy, now))
            .or_insert_with(|| AttemptRecord::first_failure(&self.policy, now));

        if record.is_locked(now) {
            tracing::warn!(
                failed_count = record.failed_count,
                locked_until = ?record.locked_until,
                "Sign-in locked after repeated failures"
            );
        }

        Ok(())
    }

    async fn clear_attempts(&self, email: &Email) -> AuthResult<()> {
        self.attempts.lock().await.remove(email);
        Ok(())
    }
}

impl SessionRepository for InMemoryAuthRepository {
    async fn create(&self, session: &StoredSession) -> AuthResult<()> {
        self.sessions
            .write()
            .await
            .insert(session.session_id, session.clone());
        Ok(())
    }

    async fn find_by_id(&self, session_id: SessionId) -> AuthResult<Option<StoredSession>> {
        Ok(self.sessions.read().await.get(&session_id).cloned())
    }

    async fn delete(&self, session_id: SessionId) -> AuthResult<()> {
        self.sessions.write().await.remove(&session_id);
        Ok(())
    }

    async fn cleanup_expired(&self) -> AuthResult<u64> {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, session| !session.is_expired());
        Ok((before - sessions.len()) as u64)
    }
}
