//! Auth Router
//!
//! Routes are relative; mount the router at `AuthConfig::base_path`.

use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::domain::repository::{LoginAttemptRepository, SessionRepository, UserRepository};
use crate::infra::password::Argon2PasswordVerifier;
use crate::infra::postgres::PgAuthRepository;
use crate::presentation::handlers::{self, AuthAppState};

/// Create the Auth router with PostgreSQL repository
pub fn auth_router(repo: PgAuthRepository, config: AuthConfig) -> Router {
    auth_router_generic(repo, config)
}

/// Create a generic Auth router for any repository implementation
pub fn auth_router_generic<R>(repo: R, config: AuthConfig) -> Router
where
    R: UserRepository + LoginAttemptRepository + SessionRepository + Send + Sync + 'static,
{
    let state = AuthAppState {
        repo: Arc::new(repo),
        verifier: Arc::new(Argon2PasswordVerifier::new(config.pepper().map(<[u8]>::to_vec))),
        config: Arc::new(config),
    };

    Router::new()
        .route("/providers", get(handlers::providers::<R>))
        .route("/signin", get(handlers::sign_in_page::<R>))
        .route(
            "/callback/credentials",
            post(handlers::sign_in_credentials::<R>),
        )
        .route("/session", get(handlers::session::<R>))
        .route("/signout", post(handlers::sign_out::<R>))
        .with_state(state)
}
