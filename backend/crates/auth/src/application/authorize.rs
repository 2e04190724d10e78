//! Authorize Use Case
//!
//! The credential gate: validates an email/password attempt against the
//! lockout state and the user store. Every rejection after validation is
//! counted against the email, known or not.

use std::sync::Arc;

use platform::password::ClearTextPassword;

use crate::application::config::AuthConfig;
use crate::domain::entity::user::AuthorizedUser;
use crate::domain::repository::{LoginAttemptRepository, UserRepository};
use crate::domain::services::PasswordVerifier;
use crate::domain::value_object::email::Email;
use crate::error::{AuthError, AuthResult};

/// Credential attempt
pub struct AuthorizeInput {
    pub email: String,
    pub password: String,
}

/// Authorize use case
pub struct AuthorizeUseCase<U, A, P>
where
    U: UserRepository,
    A: LoginAttemptRepository,
    P: PasswordVerifier,
{
    user_repo: Arc<U>,
    attempt_repo: Arc<A>,
    verifier: Arc<P>,
    config: Arc<AuthConfig>,
}

impl<U, A, P> AuthorizeUseCase<U, A, P>
where
    U: UserRepository,
    A: LoginAttemptRepository,
    P: PasswordVerifier,
{
    pub fn new(user_repo: Arc<U>, attempt_repo: Arc<A>, verifier: Arc<P>, config: Arc<AuthConfig>) -> Self {
        Self {
            user_repo,
            attempt_repo,
            verifier,
            config,
        }
    }

    pub async fn execute(&self, input: AuthorizeInput) -> AuthResult<AuthorizedUser> {
        let email = Email::parse(&input.email);
        let password = ClearTextPassword::new(input.password).ok();
        let (Some(email), Some(password)) = (email, password) else {
            return Err(AuthError::CredentialsRequired);
        };

        if self.attempt_repo.is_blocked(&email).await? {
            return Err(AuthError::AccountLocked {
                retry_after_minutes: self.config.lockout.lockout_minutes(),
            });
        }

        let Some(user) = self.user_repo.find_by_email(&email).await? else {
            self.attempt_repo.record_failed_attempt(&email).await?;
            return Err(AuthError::InvalidCredentials);
        };

        // OAuth-only accounts have nothing to compare against
        let matches = match &user.password_hash {
            Some(hash) => self.verifier.compare(password, hash).await?,
            None => false,
        };

        if !matches {
            self.attempt_repo.record_failed_attempt(&email).await?;
            return Err(AuthError::InvalidCredentials);
        }

        self.attempt_repo.clear_attempts(&email).await?;

        tracing::debug!(user_id = %user.user_id, "Credentials accepted");

        Ok(user.authorized())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entity::user::User;
    use crate::infra::memory::InMemoryAuthRepository;
    use crate::infra::password::Argon2PasswordVerifier;
    use platform::password::HashedPassword;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    /// Collaborator double that counts every call
    #[derive(Default)]
    struct Recorder {
        blocked: AtomicBool,
        user: Option<User>,
        verdict: bool,
        lookups: AtomicUsize,
        compares: AtomicUsize,
        records: AtomicUsize,
        clears: AtomicUsize,
    }

    impl Recorder {
        fn mutations(&self) -> usize {
            self.records.load(Ordering::SeqCst) + self.clears.load(Ordering::SeqCst)
        }
    }

    impl UserRepository for Recorder {
        async fn find_by_email(&self, _email: &Email) -> AuthResult<Option<User>> {
            self.lookups.fetch_add(1, Ordering::SeqCst);
            Ok(self.user.clone())
        }
    }

    impl LoginAttemptRepository for Recorder {
        async fn is_blocked(&self, _email: &Email) -> AuthResult<bool> {
            Ok(self.blocked.load(Ordering::SeqCst))
        }

        async fn record_failed_attempt(&self, _email: &Email) -> AuthResult<()> {
            self.records.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }

        async fn clear_attempts(&self, _email: &Email) -> AuthResult<()> {
            self.clears.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    impl PasswordVerifier for Recorder {
        async fn compare(&self, _password: ClearTextPassword, _hash: &HashedPassword) -> AuthResult<bool> {
            self.compares.fetch_add(1, Ordering::SeqCst);
            Ok(self.verdict)
        }
    }

    fn stored_user() -> User {
        let hash = ClearTextPassword::new("correct horse".to_string())
            .unwrap()
            .hash(None)
            .unwrap();
        User::new(
            Email::parse("ada@example.com").unwrap(),
            Some("Ada".to_string()),
            hash,
        )
    }

    fn gate(recorder: Recorder) -> (Arc<Recorder>, AuthorizeUseCase<Recorder, Recorder, Recorder>) {
        let recorder = Arc::new(recorder);
        let use_case = AuthorizeUseCase::new(
            recorder.clone(),
            recorder.clone(),
            recorder.clone(),
            Arc::new(AuthConfig::default()),
        );
        (recorder, use_case)
    }

    fn input(email: &str, password: &str) -> AuthorizeInput {
        AuthorizeInput {
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    #[tokio::test]
    async fn test_missing_credentials_touch_nothing() {
        for (email, password) in [("", "pw"), ("   ", "pw"), ("ada@example.com", ""), ("", "")] {
            let (recorder, gate) = gate(Recorder::default());
            let err = gate.execute(input(email, password)).await.unwrap_err();

            assert!(matches!(err, AuthError::CredentialsRequired));
            assert_eq!(err.to_string(), "Email and password are required");
            assert_eq!(recorder.lookups.load(Ordering::SeqCst), 0);
            assert_eq!(recorder.mutations(), 0);
        }
    }

    #[tokio::test]
    async fn test_locked_email_is_rejected_before_lookup() {
        let (recorder, gate) = gate(Recorder {
            blocked: AtomicBool::new(true),
            user: Some(stored_user()),
            verdict: true,
            ..Default::default()
        });

        let err = gate.execute(input("ada@example.com", "correct horse")).await.unwrap_err();

        assert_eq!(err.to_string(), "Account locked. Try again in 15 minutes");
        assert_eq!(recorder.lookups.load(Ordering::SeqCst), 0);
        assert_eq!(recorder.compares.load(Ordering::SeqCst), 0);
        assert_eq!(recorder.mutations(), 0);
    }

    #[tokio::test]
    async fn test_unknown_email_records_one_failure() {
        let (recorder, gate) = gate(Recorder::default());

        let err = gate.execute(input("ghost@example.com", "whatever")).await.unwrap_err();

        assert!(matches!(err, AuthError::InvalidCredentials));
        assert_eq!(recorder.records.load(Ordering::SeqCst), 1);
        assert_eq!(recorder.clears.load(Ordering::SeqCst), 0);
        assert_eq!(recorder.compares.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_wrong_password_is_indistinguishable_from_unknown_email() {
        let (_, unknown_gate) = gate(Recorder::default());
        let unknown = unknown_gate.execute(input("ghost@example.com", "pw")).await.unwrap_err();

        let (recorder, gate) = gate(Recorder {
            user: Some(stored_user()),
            verdict: false,
            ..Default::default()
        });
        let wrong = gate.execute(input("ada@example.com", "wrong")).await.unwrap_err();

        assert_eq!(recorder.records.load(Ordering::SeqCst), 1);
        assert_eq!(recorder.clears.load(Ordering::SeqCst), 0);
        assert_eq!(wrong.to_string(), unknown.to_string());
        assert_eq!(wrong.to_string(), "Incorrect email or password");
        assert_eq!(wrong.status_code(), unknown.status_code());
    }

    #[tokio::test]
    async fn test_user_without_password_hash_fails_comparison() {
        let mut user = stored_user();
        user.password_hash = None;
        let (recorder, gate) = gate(Recorder {
            user: Some(user),
            verdict: true,
            ..Default::default()
        });

        let err = gate.execute(input("ada@example.com", "anything")).await.unwrap_err();

        assert!(matches!(err, AuthError::InvalidCredentials));
        assert_eq!(recorder.compares.load(Ordering::SeqCst), 0);
        assert_eq!(recorder.records.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_correct_password_clears_and_returns_identity() {
        let user = stored_user();
        let (recorder, gate) = gate(Recorder {
            user: Some(user.clone()),
            verdict: true,
            ..Default::default()
        });

        let authorized = gate.execute(input(" ADA@example.com ", "correct horse")).await.unwrap();

        assert_eq!(recorder.clears.load(Ordering::SeqCst), 1);
        assert_eq!(recorder.records.load(Ordering::SeqCst), 0);
        assert_eq!(authorized.id, user.user_id.to_string());
        assert_eq!(authorized.email, "ada@example.com");

        let json = serde_json::to_value(&authorized).unwrap();
        assert_eq!(json.as_object().unwrap().len(), 4);
        assert!(json.get("password").is_none());
        assert!(json.get("password_hash").is_none());
    }

    #[tokio::test]
    async fn test_five_failures_lock_the_email() {
        let repo = Arc::new(InMemoryAuthRepository::new());
        repo.insert_user(stored_user()).await;
        let config = Arc::new(AuthConfig::default());
        let gate = AuthorizeUseCase::new(
            repo.clone(),
            repo.clone(),
            Arc::new(Argon2PasswordVerifier::new(None)),
            config.clone(),
        );

        for _ in 0..config.lockout.max_failures {
            let err = gate.execute(input("ada@example.com", "wrong")).await.unwrap_err();
            assert!(matches!(err, AuthError::InvalidCredentials));
        }

        // Even the right password is refused while locked
        let err = gate.execute(input("ada@example.com", "correct horse")).await.unwrap_err();
        assert!(matches!(err, AuthError::AccountLocked { retry_after_minutes: 15 }));
    }

    #[tokio::test]
    async fn test_success_resets_the_failure_count() {
        let repo = Arc::new(InMemoryAuthRepository::new());
        repo.insert_user(stored_user()).await;
        let gate = AuthorizeUseCase::new(
            repo.clone(),
            repo.clone(),
            Arc::new(Argon2PasswordVerifier::new(None)),
            Arc::new(AuthConfig::default()),
        );

        for _ in 0..4 {
            let _ = gate.execute(input("ada@example.com", "wrong")).await;
        }
        gate.execute(input("ada@example.com", "correct horse")).await.unwrap();

        // A fresh count: four more failures still do not lock
        for _ in 0..4 {
            let _ = gate.execute(input("ada@example.com", "wrong")).await;
        }
        assert!(gate.execute(input("ada@example.com", "correct horse")).await.is_ok());
    }
}
