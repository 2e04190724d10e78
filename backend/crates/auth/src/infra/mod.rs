//! Infrastructure Layer
//!
//! Database implementations and external service integrations.

pub mod memory;
pub mod password;
pub mod postgres;

pub use memory::InMemoryAuthRepository;
pub use password::Argon2PasswordVerifier;
pub use postgres::PgAuthRepository;
