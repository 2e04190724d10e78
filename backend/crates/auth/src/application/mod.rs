//! Application Layer
//!
//! Use cases and application services.

pub mod authorize;
pub mod config;
pub mod get_session;
pub mod providers;
pub mod sign_in;
pub mod sign_out;

// Re-exports
pub use authorize::{AuthorizeInput, AuthorizeUseCase};
pub use config::{AuthConfig, ConfigError};
pub use get_session::GetSessionUseCase;
pub use providers::{OAuthProvider, ProviderId, ProviderKind};
pub use sign_in::{SignInOutput, SignInUseCase};
pub use sign_out::SignOutUseCase;
