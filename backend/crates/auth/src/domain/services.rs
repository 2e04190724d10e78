//! Domain Services
//!
//! Password comparison seam, redirect allow-listing, and the token/session
//! enrichment callbacks. Everything except the verifier trait is pure.

use platform::password::{ClearTextPassword, HashedPassword};
use url::Url;

use crate::domain::entity::{session::Session, token::AuthToken, user::AuthorizedUser};
use crate::error::AuthResult;

/// Where disallowed redirect targets are sent, relative to the base URL
pub const DEFAULT_REDIRECT_PATH: &str = "/dashboard";

/// One-way password comparison
#[trait_variant::make(PasswordVerifier: Send)]
pub trait LocalPasswordVerifier {
    /// `Ok(false)` on mismatch; `Err` only when the comparison itself failed
    async fn compare(&self, password: ClearTextPassword, hash: &HashedPassword)
    -> AuthResult<bool>;
}

// ============================================================================
// Redirect policy
// ============================================================================

/// Resolve a post-auth redirect target against `base_url`
///
/// - relative paths are prefixed with `base_url`
/// - absolute URLs are kept only when their origin equals `base_url`
/// - anything else, unparseable input included, goes to [`DEFAULT_REDIRECT_PATH`]
///
/// `base_url` is an origin without trailing slash, e.g. `https://app.example.com`.
pub fn resolve_redirect(url: &str, base_url: &str) -> String {
    if url.starts_with('/') {
        return format!("{}{}", base_url, url);
    }

    match Url::parse(url) {
        Ok(parsed) if parsed.origin().ascii_serialization() == base_url => url.to_string(),
        _ => format!("{}{}", base_url, DEFAULT_REDIRECT_PATH),
    }
}

// ============================================================================
// Token / session enrichment
// ============================================================================

/// Token callback: on mint, copy the authorized user's id onto the token
pub fn enrich_token(mut token: AuthToken, user: Option<&AuthorizedUser>) -> AuthToken {
    if let Some(user) = user {
        token.id = Some(user.id.clone());
    }
    token
}

/// Session callback: copy the token's id onto the session user
pub fn enrich_session(mut session: Session, token: &AuthToken) -> Session {
    if let Some(user) = session.user.as_mut() {
        user.id = token.id.clone();
    }
    session
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    const BASE: &str = "https://a.com";

    #[test]
    fn test_relative_path_is_prefixed() {
        assert_eq!(resolve_redirect("/x", BASE), "https://a.com/x");
        assert_eq!(
            resolve_redirect("/notes?id=3#top", BASE),
            "https://a.com/notes?id=3#top"
        );
    }

    #[test]
    fn test_same_origin_is_kept() {
        assert_eq!(resolve_redirect("https://a.com/y", BASE), "https://a.com/y");
        assert_eq!(resolve_redirect("https://a.com", BASE), "https://a.com");
    }

    #[test]
    fn test_foreign_origin_goes_to_dashboard() {
        assert_eq!(
            resolve_redirect("https://evil.com", BASE),
            "https://a.com/dashboard"
        );
        // Same host, different scheme or port is a different origin
        assert_eq!(
            resolve_redirect("http://a.com/y", BASE),
            "https://a.com/dashboard"
        );
        assert_eq!(
            resolve_redirect("https://a.com:8443/y", BASE),
            "https://a.com/dashboard"
        );
        // Lookalike host
        assert_eq!(
            resolve_redirect("https://a.com.evil.com/y", BASE),
            "https://a.com/dashboard"
        );
    }

    #[test]
    fn test_unparseable_and_opaque_targets_go_to_dashboard() {
        assert_eq!(resolve_redirect("", BASE), "https://a.com/dashboard");
        assert_eq!(resolve_redirect("not a url", BASE), "https://a.com/dashboard");
        assert_eq!(
            resolve_redirect("javascript:alert(1)", BASE),
            "https://a.com/dashboard"
        );
    }

    fn user() -> AuthorizedUser {
        AuthorizedUser {
            id: "user-42".to_string(),
            email: "ada@example.com".to_string(),
            name: Some("Ada".to_string()),
            image: None,
        }
    }

    #[test]
    fn test_enrich_token_copies_user_id() {
        let user = user();
        let token = AuthToken::mint(&user, Utc::now(), Duration::days(30));
        assert!(token.id.is_none());

        let token = enrich_token(token, Some(&user));
        assert_eq!(token.id.as_deref(), Some("user-42"));
    }

    #[test]
    fn test_enrich_token_without_user_is_identity() {
        let token = AuthToken::mint(&user(), Utc::now(), Duration::days(30));
        let enriched = enrich_token(token.clone(), None);
        assert_eq!(enriched, token);
    }

    #[test]
    fn test_enrich_session_copies_token_id() {
        let user = user();
        let token = enrich_token(
            AuthToken::mint(&user, Utc::now(), Duration::days(30)),
            Some(&user),
        );
        let session = enrich_session(Session::from_token(&token, Utc::now()), &token);

        assert_eq!(session.user.unwrap().id.as_deref(), Some("user-42"));
    }

    #[test]
    fn test_enrich_session_without_user_is_untouched() {
        let token = AuthToken::mint(&user(), Utc::now(), Duration::days(30));
        let session = Session {
            user: None,
            expires: Utc::now(),
        };
        assert_eq!(enrich_session(session.clone(), &token), session);
    }
}
