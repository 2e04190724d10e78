//! Auth (Authentication) Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Entities, repository traits, redirect and enrichment rules
//! - `application/` - Use cases, configuration, provider setup
//! - `infra/` - Postgres and in-memory repositories, Argon2id verifier
//! - `presentation/` - HTTP handlers, DTOs, router
//!
//! ## Features
//! - Email + password sign-in through the credential gate
//! - Google and GitHub provider configuration
//! - Server-side sessions with HMAC-signed cookie tokens
//! - Allow-listed post sign-in redirects
//!
//! ## Security Model
//! - Passwords hashed with Argon2id, optional pepper
//! - Unknown email and wrong password share one error text
//! - Temporary lockout after repeated failures per email

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;


// Re-exports for convenience
pub use application::config::{AuthConfig, ConfigError};
pub use error::{AuthError, AuthResult};
pub use infra::{memory::InMemoryAuthRepository, postgres::PgAuthRepository};
pub use presentation::router::{auth_router, auth_router_generic};

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};
