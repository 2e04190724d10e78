//! HTTP Handlers

use std::collections::BTreeMap;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::Json;
use axum::extract::{ConnectInfo, Query, State};
use axum::http::{HeaderMap, header};
use axum::response::{IntoResponse, Redirect, Response};
use url::Url;

use platform::client::extract_client_ip;
use platform::cookie::{extract_cookie, set_cookie_header};

use crate::application::config::AuthConfig;
use crate::application::providers::ProviderId;
use crate::application::{AuthorizeInput, GetSessionUseCase, SignInUseCase, SignOutUseCase};
use crate::domain::repository::{LoginAttemptRepository, SessionRepository, UserRepository};
use crate::domain::services::resolve_redirect;
use crate::error::{AuthError, AuthResult};
use crate::infra::password::Argon2PasswordVerifier;
use crate::presentation::dto::{
    ProviderResponse, SignInPageQuery, SignInRequest, SignInResponse, SignOutRequest,
    SignOutResponse,
};

/// Shared state for auth handlers
pub struct AuthAppState<R>
where
    R: UserRepository + LoginAttemptRepository + SessionRepository + Send + Sync + 'static,
{
    pub repo: Arc<R>,
    pub verifier: Arc<Argon2PasswordVerifier>,
    pub config: Arc<AuthConfig>,
}

// Manual impl: the repository itself need not be Clone
impl<R> Clone for AuthAppState<R>
where
    R: UserRepository + LoginAttemptRepository + SessionRepository + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            repo: self.repo.clone(),
            verifier: self.verifier.clone(),
            config: self.config.clone(),
        }
    }
}

// ============================================================================
// Providers
// ============================================================================

/// GET /api/auth/providers
pub async fn providers<R>(
    State(state): State<AuthAppState<R>>,
) -> Json<BTreeMap<String, ProviderResponse>>
where
    R: UserRepository + LoginAttemptRepository + SessionRepository + Send + Sync + 'static,
{
    let config = &state.config;
    let ids = config
        .providers
        .iter()
        .map(|provider| provider.id)
        .chain(std::iter::once(ProviderId::Credentials));

    let listing = ids
        .map(|id| {
            let prefix = format!("{}{}", config.base_url, config.base_path);
            // Only the credentials flow is routed here; OAuth handshakes live elsewhere
            let (signin_url, callback_url) = match id {
                ProviderId::Credentials => (
                    Some(format!("{}/signin", prefix)),
                    Some(format!("{}/callback/{}", prefix, id)),
                ),
                ProviderId::Google | ProviderId::GitHub => (None, None),
            };
            let entry = ProviderResponse {
                id: id.to_string(),
                name: id.display_name().to_string(),
                kind: id.kind(),
                signin_url,
                callback_url,
            };
            (id.to_string(), entry)
        })
        .collect();

    Json(listing)
}

// ============================================================================
// Sign In
// ============================================================================

/// GET /api/auth/signin
///
/// Sends the browser to the custom sign-in page.
pub async fn sign_in_page<R>(
    State(state): State<AuthAppState<R>>,
    Query(query): Query<SignInPageQuery>,
) -> Redirect
where
    R: UserRepository + LoginAttemptRepository + SessionRepository + Send + Sync + 'static,
{
    let page = format!("{}{}", state.config.base_url, state.config.sign_in_page);

    let target = match (query.callback_url, Url::parse(&page)) {
        (Some(callback_url), Ok(mut url)) => {
            let callback_url = resolve_redirect(&callback_url, &state.config.base_url);
            url.query_pairs_mut().append_pair("callbackUrl", &callback_url);
            url.to_string()
        }
        _ => page,
    };

    Redirect::to(&target)
}

/// POST /api/auth/callback/credentials
pub async fn sign_in_credentials<R>(
    State(state): State<AuthAppState<R>>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    Json(req): Json<SignInRequest>,
) -> Response
where
    R: UserRepository + LoginAttemptRepository + SessionRepository + Send + Sync + 'static,
{
    let client_ip = extract_client_ip(&headers, Some(addr.ip()));

    let use_case = SignInUseCase::new(
        state.repo.clone(),
        state.repo.clone(),
        state.verifier.clone(),
        state.repo.clone(),
        state.config.clone(),
    );

    let input = AuthorizeInput {
        email: req.email.unwrap_or_default(),
        password: req.password.unwrap_or_default(),
    };

    let output = match use_case.execute(input).await {
        Ok(output) => output,
        Err(e) => return e.into_response_for(client_ip),
    };

    let url = resolve_redirect(
        req.callback_url.as_deref().unwrap_or("/"),
        &state.config.base_url,
    );
    let cookie = state
        .config
        .cookie_config()
        .build_set_cookie(&output.session_token);

    (
        [(header::SET_COOKIE, set_cookie_header(&cookie))],
        Json(SignInResponse {
            url,
            user: output.user,
        }),
    )
        .into_response()
}

// ============================================================================
// Session
// ============================================================================

/// GET /api/auth/session
///
/// `null` when there is no valid session.
pub async fn session<R>(
    State(state): State<AuthAppState<R>>,
    headers: HeaderMap,
) -> AuthResult<Response>
where
    R: UserRepository + LoginAttemptRepository + SessionRepository + Send + Sync + 'static,
{
    let Some(token) = extract_cookie(&headers, &state.config.session_cookie_name) else {
        return Ok(Json(None::<()>).into_response());
    };

    let use_case = GetSessionUseCase::new(state.repo.clone(), state.config.clone());

    match use_case.execute(&token).await {
        Ok(session) => Ok(Json(Some(session)).into_response()),
        Err(AuthError::SessionInvalid) => {
            // Drop the stale cookie along with the answer
            let cookie = state.config.cookie_config().build_delete_cookie();
            Ok((
                [(header::SET_COOKIE, set_cookie_header(&cookie))],
                Json(None::<()>),
            )
                .into_response())
        }
        Err(e) => Err(e),
    }
}

// ============================================================================
// Sign Out
// ============================================================================

/// POST /api/auth/signout
pub async fn sign_out<R>(
    State(state): State<AuthAppState<R>>,
    headers: HeaderMap,
    req: Option<Json<SignOutRequest>>,
) -> AuthResult<Response>
where
    R: UserRepository + LoginAttemptRepository + SessionRepository + Send + Sync + 'static,
{
    let req = req.map(|Json(req)| req).unwrap_or_default();

    if let Some(token) = extract_cookie(&headers, &state.config.session_cookie_name) {
        let use_case = SignOutUseCase::new(state.repo.clone(), state.config.clone());
        match use_case.execute(&token).await {
            Ok(()) | Err(AuthError::SessionInvalid) => {}
            Err(e) => return Err(e),
        }
    }

    let url = resolve_redirect(
        req.callback_url.as_deref().unwrap_or("/"),
        &state.config.base_url,
    );
    let cookie = state.config.cookie_config().build_delete_cookie();

    Ok((
        [(header::SET_COOKIE, set_cookie_header(&cookie))],
        Json(SignOutResponse { url }),
    )
        .into_response())
}
