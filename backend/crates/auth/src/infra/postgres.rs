//! PostgreSQL Repository Implementations

use chrono::{DateTime, Utc};
use platform::password::HashedPassword;
use platform::rate_limit::LockoutPolicy;
use sqlx::PgPool;
use sqlx::types::Json;
use uuid::Uuid;

use crate::domain::entity::{session::StoredSession, token::AuthToken, user::User};
use crate::domain::repository::{LoginAttemptRepository, SessionRepository, UserRepository};
use crate::domain::value_object::{SessionId, UserId, email::Email};
use crate::error::{AuthError, AuthResult};

/// PostgreSQL-backed auth repository
#[derive(Clone)]
pub struct PgAuthRepository {
    pool: PgPool,
    policy: LockoutPolicy,
}

impl PgAuthRepository {
    pub fn new(pool: PgPool, policy: LockoutPolicy) -> Self {
        Self { pool, policy }
    }

    /// Drop attempt rows that are neither locked nor inside a counting window
    pub async fn cleanup_stale_attempts(&self) -> AuthResult<u64> {
        let now = Utc::now();

        let deleted = sqlx::query(
            r#"
            DELETE FROM login_attempts
            WHERE window_started_at <= $1
              AND (locked_until IS NULL OR locked_until <= $2)
            "#,
        )
        .bind(now - self.policy.window)
        .bind(now)
        .execute(&self.pool)
        .await?
        .rows_affected();

        tracing::info!(attempts_deleted = deleted, "Cleaned up stale login attempts");

        Ok(deleted)
    }
}

// ============================================================================
// User Repository Implementation
// ============================================================================

/// Stored emails may carry any casing; served by `users_email_lower_idx`
const FIND_USER_BY_EMAIL: &str = r#"
    SELECT
        user_id,
        email,
        name,
        image,
        password_hash,
        created_at,
        updated_at
    FROM users
    WHERE lower(email) = $1
"#;

impl UserRepository for PgAuthRepository {
    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(FIND_USER_BY_EMAIL)
            .bind(email.as_str())
            .fetch_optional(&self.pool)
            .await?;

        row.map(|r| r.into_user()).transpose()
    }
}

// ============================================================================
// Login Attempt Repository Implementation
// ============================================================================

impl LoginAttemptRepository for PgAuthRepository {
    async fn is_blocked(&self, email: &Email) -> AuthResult<bool> {
        let blocked = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM login_attempts
                WHERE email = $1 AND locked_until > $2
            )
            "#,
        )
        .bind(email.as_str())
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(blocked)
    }

    /// Single upsert so concurrent failures for one email are all counted.
    /// Mirrors `AttemptRecord::register_failure`; SET expressions read the
    /// pre-update row.
    async fn record_failed_attempt(&self, email: &Email) -> AuthResult<()> {
        let now = Utc::now();
        let window_cutoff = now - self.policy.window;
        let lock_until = now + self.policy.lockout;
        let max_failures = i32::try_from(self.policy.max_failures).unwrap_or(i32::MAX);

        let locked_until = sqlx::query_scalar::<_, Option<DateTime<Utc>>>(
            r#"
            INSERT INTO login_attempts (email, failed_count, window_started_at, locked_until)
            VALUES ($1, 1, $2, CASE WHEN $3 <= 1 THEN $4 ELSE NULL END)
            ON CONFLICT (email) DO UPDATE SET
                failed_count = CASE
                    WHEN login_attempts.window_started_at <= $5 THEN 1
                    ELSE login_attempts.failed_count + 1
                END,
                window_started_at = CASE
                    WHEN login_attempts.window_started_at <= $5 THEN $2
                    ELSE login_attempts.window_started_at
                END,
                locked_until = CASE
                    WHEN login_attempts.window_started_at <= $5 THEN
                        CASE WHEN $3 <= 1 THEN $4 ELSE NULL END
                    WHEN login_attempts.failed_count + 1 >= $3 THEN $4
                    ELSE login_attempts.locked_until
                END
            RETURNING locked_until
            "#,
        )
        .bind(email.as_str())
        .bind(now)
        .bind(max_failures)
        .bind(lock_until)
        .bind(window_cutoff)
        .fetch_one(&self.pool)
        .await?;

        if let Some(until) = locked_until.filter(|until| *until > now) {
            tracing::warn!(
                locked_until = %until,
                "Sign-in locked after repeated failures"
            );
        }

        Ok(())
    }

    async fn clear_attempts(&self, email: &Email) -> AuthResult<()> {
        sqlx::query("DELETE FROM login_attempts WHERE email = $1")
            .bind(email.as_str())
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}

// ============================================================================
// Session Repository Implementation
// ============================================================================

impl SessionRepository for PgAuthRepository {
    async fn create(&self, session: &StoredSession) -> AuthResult<()> {
        sqlx::query(
            r#"
            INSERT INTO auth_sessions (
                session_id,
                token,
                expires_at,
                created_at
            ) VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(session.session_id.as_uuid())
        .bind(Json(&session.token))
        .bind(session.expires_at)
        .bind(session.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_by_id(&self, session_id: SessionId) -> AuthResult<Option<StoredSession>> {
        let row = sqlx::query_as::<_, SessionRow>(
            r#"
            SELECT
                session_id,
                token,
                expires_at,
                created_at
            FROM auth_sessions
            WHERE session_id = $1
            "#,
        )
        .bind(session_id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(SessionRow::into_session))
    }

    async fn delete(&self, session_id: SessionId) -> AuthResult<()> {
        sqlx::query("DELETE FROM auth_sessions WHERE session_id = $1")
            .bind(session_id.as_uuid())
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn cleanup_expired(&self) -> AuthResult<u64> {
        let deleted = sqlx::query("DELETE FROM auth_sessions WHERE expires_at <= $1")
            .bind(Utc::now())
            .execute(&self.pool)
            .await?
            .rows_affected();

        tracing::info!(sessions_deleted = deleted, "Cleaned up expired auth sessions");

        Ok(deleted)
    }
}

// ============================================================================
// Row types
// ============================================================================

#[derive(sqlx::FromRow)]
struct UserRow {
    user_id: Uuid,
    email: String,
    name: Option<String>,
    image: Option<String>,
    password_hash: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl UserRow {
    fn into_user(self) -> AuthResult<User> {
        let password_hash = self
            .password_hash
            .map(HashedPassword::from_phc_string)
            .transpose()
            .map_err(|e| AuthError::Internal(format!("Invalid password hash: {}", e)))?;

        Ok(User {
            user_id: UserId::from_uuid(self.user_id),
            email: Email::from_db(self.email),
            name: self.name,
            image: self.image,
            password_hash,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct SessionRow {
    session_id: Uuid,
    token: Json<AuthToken>,
    expires_at: DateTime<Utc>,
    created_at: DateTime<Utc>,
}

impl SessionRow {
    fn into_session(self) -> StoredSession {
        StoredSession {
            session_id: SessionId::from_uuid(self.session_id),
            token: self.token.0,
            expires_at: self.expires_at,
            created_at: self.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_lookup_ignores_stored_casing() {
        assert!(FIND_USER_BY_EMAIL.contains("WHERE lower(email) = $1"));
    }

    #[test]
    fn test_user_row_keeps_stored_email() {
        let now = Utc::now();
        let row = UserRow {
            user_id: Uuid::new_v4(),
            email: "Ada@Example.com".to_string(),
            name: None,
            image: None,
            password_hash: None,
            created_at: now,
            updated_at: now,
        };

        let user = row.into_user().unwrap();
        assert_eq!(user.email.as_str(), "Ada@Example.com");
        assert!(user.password_hash.is_none());
    }
}
