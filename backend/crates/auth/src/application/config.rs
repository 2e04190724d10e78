//! Application Configuration
//!
//! Configuration for the Auth application layer.

use std::time::Duration;

use platform::cookie::CookieConfig;
use platform::rate_limit::LockoutPolicy;
use thiserror::Error;
use url::Url;

use crate::application::providers::OAuthProvider;

/// Re-export SameSite from platform
pub use platform::cookie::SameSite;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} is not set")]
    MissingVar(&'static str),

    #[error("{var} is not a valid http(s) origin: {reason}")]
    InvalidUrl { var: &'static str, reason: String },

    #[error("AUTH_SECRET must be base64 encoding exactly 32 bytes")]
    InvalidSecret,

    #[error("AUTH_SIGN_IN_PAGE must be a path starting with '/'")]
    InvalidSignInPage,
}

/// Auth application configuration
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Public origin of the application, without trailing slash
    pub base_url: String,
    /// Mount point of the auth routes
    pub base_path: String,
    /// Custom sign-in page, relative to `base_url`
    pub sign_in_page: String,
    /// Configured OAuth providers
    pub providers: Vec<OAuthProvider>,
    /// Session cookie name
    pub session_cookie_name: String,
    /// Session secret key for HMAC signing (32 bytes)
    pub session_secret: [u8; 32],
    /// Session lifetime (30 days)
    pub session_max_age: Duration,
    /// Whether to require Secure cookie
    pub cookie_secure: bool,
    /// SameSite policy
    pub cookie_same_site: SameSite,
    /// Password pepper (optional, application-wide secret)
    pub password_pepper: Option<Vec<u8>>,
    /// Failed-login lockout policy
    pub lockout: LockoutPolicy,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000".to_string(),
            base_path: "/api/auth".to_string(),
            sign_in_page: "/signIn".to_string(),
            providers: Vec::new(),
            session_cookie_name: "auth_session".to_string(),
            session_secret: [0u8; 32],
            session_max_age: Duration::from_secs(30 * 24 * 3600), // 30 days
            cookie_secure: true,
            cookie_same_site: SameSite::Lax,
            password_pepper: None,
            lockout: LockoutPolicy::default(),
        }
    }
}

impl AuthConfig {
    /// Create config with a random session secret (for development)
    pub fn with_random_secret() -> Self {
        Self {
            session_secret: platform::crypto::random_secret(),
            ..Default::default()
        }
    }

    /// Create config for development (insecure cookie)
    pub fn development() -> Self {
        Self {
            cookie_secure: false,
            ..Self::with_random_secret()
        }
    }

    /// Load from process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load from an arbitrary key lookup; empty values count as unset
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        let base_url = match get("AUTH_BASE_URL") {
            Some(raw) => normalize_origin("AUTH_BASE_URL", &raw)?,
            None => defaults.base_url.clone(),
        };

        let session_secret = match get("AUTH_SECRET") {
            Some(raw) => decode_secret(&raw)?,
            None if cfg!(debug_assertions) => {
                tracing::warn!("AUTH_SECRET not set, using a random secret; sessions will not survive restarts");
                platform::crypto::random_secret()
            }
            None => return Err(ConfigError::MissingVar("AUTH_SECRET")),
        };

        let sign_in_page = match get("AUTH_SIGN_IN_PAGE") {
            Some(page) if page.starts_with('/') => page,
            Some(_) => return Err(ConfigError::InvalidSignInPage),
            None => defaults.sign_in_page.clone(),
        };

        let mut providers = Vec::new();
        match (get("GOOGLE_CLIENT_ID"), get("GOOGLE_CLIENT_SECRET")) {
            (Some(id), Some(secret)) => providers.push(provider(OAuthProvider::google(id, secret))?),
            _ => tracing::warn!(provider = "google", "OAuth credentials missing, provider disabled"),
        }
        match (get("GITHUB_ID"), get("GITHUB_SECRET")) {
            (Some(id), Some(secret)) => providers.push(provider(OAuthProvider::github(id, secret))?),
            _ => tracing::warn!(provider = "github", "OAuth credentials missing, provider disabled"),
        }

        let cookie_secure = base_url.starts_with("https://");

        Ok(Self {
            base_url,
            sign_in_page,
            providers,
            session_secret,
            cookie_secure,
            password_pepper: get("AUTH_PASSWORD_PEPPER").map(String::into_bytes),
            ..defaults
        })
    }

    /// Get password pepper as slice
    pub fn pepper(&self) -> Option<&[u8]> {
        self.password_pepper.as_deref()
    }

    /// Cookie attributes for the session cookie
    pub fn cookie_config(&self) -> CookieConfig {
        CookieConfig {
            name: self.session_cookie_name.clone(),
            secure: self.cookie_secure,
            http_only: true,
            same_site: self.cookie_same_site,
            path: "/".to_string(),
            max_age_secs: Some(self.session_max_age.as_secs() as i64),
        }
    }

    /// Session lifetime as a chrono duration
    pub fn session_ttl(&self) -> chrono::Duration {
        chrono::Duration::from_std(self.session_max_age).unwrap_or(chrono::Duration::days(30))
    }
}

fn normalize_origin(var: &'static str, raw: &str) -> Result<String, ConfigError> {
    let url = Url::parse(raw.trim()).map_err(|e| ConfigError::InvalidUrl {
        var,
        reason: e.to_string(),
    })?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidUrl {
            var,
            reason: format!("unsupported scheme '{}'", url.scheme()),
        });
    }
    Ok(url.origin().ascii_serialization())
}

fn decode_secret(raw: &str) -> Result<[u8; 32], ConfigError> {
    platform::crypto::from_base64(raw.trim())
        .ok()
        .and_then(|bytes| <[u8; 32]>::try_from(bytes).ok())
        .ok_or(ConfigError::InvalidSecret)
}

fn provider(result: Result<OAuthProvider, url::ParseError>) -> Result<OAuthProvider, ConfigError> {
    result.map_err(|e| ConfigError::InvalidUrl {
        var: "provider endpoint",
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::providers::ProviderId;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<AuthConfig, ConfigError> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AuthConfig::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = AuthConfig::default();
        assert_eq!(config.sign_in_page, "/signIn");
        assert_eq!(config.session_max_age.as_secs(), 2_592_000);
        assert_eq!(config.lockout, LockoutPolicy::default());
    }

    #[test]
    fn test_base_url_is_reduced_to_origin() {
        let config = load(&[("AUTH_BASE_URL", "https://app.example.com/some/path/")]).unwrap();
        assert_eq!(config.base_url, "https://app.example.com");
        assert!(config.cookie_secure);
    }

    #[test]
    fn test_rejects_non_http_base_url() {
        assert!(matches!(
            load(&[("AUTH_BASE_URL", "ftp://example.com")]),
            Err(ConfigError::InvalidUrl { .. })
        ));
    }

    #[test]
    fn test_secret_must_be_32_bytes() {
        let short = platform::crypto::to_base64(&[7u8; 16]);
        assert!(matches!(
            load(&[("AUTH_SECRET", short.as_str())]),
            Err(ConfigError::InvalidSecret)
        ));

        let ok = platform::crypto::to_base64(&[7u8; 32]);
        let config = load(&[("AUTH_SECRET", ok.as_str())]).unwrap();
        assert_eq!(config.session_secret, [7u8; 32]);
    }

    #[test]
    fn test_providers_need_both_credentials() {
        let config = load(&[
            ("GOOGLE_CLIENT_ID", "gid"),
            ("GOOGLE_CLIENT_SECRET", "gsecret"),
            ("GITHUB_ID", "only-id"),
        ])
        .unwrap();

        let ids: Vec<ProviderId> = config.providers.iter().map(|p| p.id).collect();
        assert_eq!(ids, [ProviderId::Google]);
    }

    #[test]
    fn test_sign_in_page_must_be_a_path() {
        assert!(matches!(
            load(&[("AUTH_SIGN_IN_PAGE", "signIn")]),
            Err(ConfigError::InvalidSignInPage)
        ));
        assert_eq!(
            load(&[("AUTH_SIGN_IN_PAGE", "/login")]).unwrap().sign_in_page,
            "/login"
        );
    }

    #[test]
    fn test_cookie_config_uses_session_lifetime() {
        let config = AuthConfig::development();
        let cookie = config.cookie_config();
        assert!(!cookie.secure);
        assert_eq!(cookie.max_age_secs, Some(2_592_000));
    }
}
