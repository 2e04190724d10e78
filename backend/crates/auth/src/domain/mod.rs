//! Domain Layer
//!
//! Entities, value objects, collaborator traits, and pure domain services.

pub mod entity;
pub mod repository;
pub mod services;
pub mod value_object;

// Re-exports
pub use entity::{
    session::{Session, SessionUser, StoredSession},
    token::AuthToken,
    user::{AuthorizedUser, User},
};
pub use repository::{LoginAttemptRepository, SessionRepository, UserRepository};
pub use services::{PasswordVerifier, enrich_session, enrich_token, resolve_redirect};
