//! Auth Error Types
//!
//! Auth-specific error variants that integrate with the unified
//! `kernel::error::AppError` system.

use std::net::IpAddr;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

/// Auth-specific result type alias
pub type AuthResult<T> = Result<T, AuthError>;

/// Auth-specific error variants
#[derive(Debug, Error)]
pub enum AuthError {
    /// Email or password missing
    #[error("Email and password are required")]
    CredentialsRequired,

    /// Too many recent failures for this email
    #[error("Account locked. Try again in {retry_after_minutes} minutes")]
    AccountLocked { retry_after_minutes: i64 },

    /// Unknown email or wrong password. Both cases share this text so the
    /// response never reveals whether an email is registered.
    #[error("Incorrect email or password")]
    InvalidCredentials,

    /// Session cookie missing, forged, or expired
    #[error("Session not found or expired")]
    SessionInvalid,

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AuthError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.kind().status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            AuthError::CredentialsRequired => ErrorKind::BadRequest,
            AuthError::AccountLocked { .. } => ErrorKind::Locked,
            AuthError::InvalidCredentials | AuthError::SessionInvalid => ErrorKind::Unauthorized,
            AuthError::Database(_) | AuthError::Internal(_) => ErrorKind::InternalServerError,
        }
    }

    /// Convert to AppError
    ///
    /// Server-side details stay in the logs; the client gets a generic message.
    pub fn to_app_error(&self) -> AppError {
        match self {
            AuthError::Database(_) | AuthError::Internal(_) => {
                AppError::internal("Internal server error")
            }
            _ => AppError::new(self.kind(), self.to_string()),
        }
    }

    /// Response for a rejected request, logged once with the caller's address
    pub fn into_response_for(self, client_ip: Option<IpAddr>) -> Response {
        self.log(client_ip);
        self.to_app_error().into_response()
    }

    /// Log the error with appropriate level
    fn log(&self, client_ip: Option<IpAddr>) {
        match self {
            AuthError::Database(e) => {
                tracing::error!(error = %e, "Auth database error");
            }
            AuthError::Internal(msg) => {
                tracing::error!(message = %msg, "Auth internal error");
            }
            AuthError::InvalidCredentials => {
                tracing::warn!(client_ip = ?client_ip, "Invalid login attempt");
            }
            AuthError::AccountLocked { .. } => {
                tracing::warn!(client_ip = ?client_ip, "Login attempt on locked account");
            }
            _ => {
                tracing::debug!(error = %self, "Auth error");
            }
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        self.into_response_for(None)
    }
}

impl From<tokio::task::JoinError> for AuthError {
    fn from(err: tokio::task::JoinError) -> Self {
        AuthError::Internal(format!("Blocking task failed: {err}"))
    }
}
