//! Argon2id password comparison
//!
//! Hash verification is CPU-bound, so it runs on the blocking pool.

use platform::password::{ClearTextPassword, HashedPassword};

use crate::domain::services::PasswordVerifier;
use crate::error::AuthResult;

#[derive(Debug, Clone, Default)]
pub struct Argon2PasswordVerifier {
    pepper: Option<Vec<u8>>,
}

impl Argon2PasswordVerifier {
    pub fn new(pepper: Option<Vec<u8>>) -> Self {
        Self { pepper }
    }
}

impl PasswordVerifier for Argon2PasswordVerifier {
    async fn compare(&self, password: ClearTextPassword, hash: &HashedPassword) -> AuthResult<bool> {
        let hash = hash.clone();
        let pepper = self.pepper.clone();

        let matches = tokio::task::spawn_blocking(move || hash.verify(&password, pepper.as_deref())).await?;

        Ok(matches)
    }
}
