//! Sign-in Providers
//!
//! Two OAuth providers configured from client credentials, plus the
//! always-present email/password provider. The OAuth handshake itself is
//! out of scope; these entries carry what it needs and what clients list.

use derive_more::Display;
use oauth2::{AuthUrl, ClientId, ClientSecret, TokenUrl};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderId {
    #[display("google")]
    Google,
    #[display("github")]
    GitHub,
    #[display("credentials")]
    Credentials,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    Oauth,
    Credentials,
}

impl ProviderId {
    pub fn display_name(&self) -> &'static str {
        match self {
            ProviderId::Google => "Google",
            ProviderId::GitHub => "GitHub",
            ProviderId::Credentials => "Credentials",
        }
    }

    pub fn kind(&self) -> ProviderKind {
        match self {
            ProviderId::Google | ProviderId::GitHub => ProviderKind::Oauth,
            ProviderId::Credentials => ProviderKind::Credentials,
        }
    }
}

/// OAuth provider configuration
#[derive(Debug, Clone)]
pub struct OAuthProvider {
    pub id: ProviderId,
    pub client_id: ClientId,
    pub client_secret: ClientSecret,
    pub auth_url: AuthUrl,
    pub token_url: TokenUrl,
    pub scopes: Vec<String>,
}

impl OAuthProvider {
    pub fn google(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Result<Self, url::ParseError> {
        Ok(Self {
            id: ProviderId::Google,
            client_id: ClientId::new(client_id.into()),
            client_secret: ClientSecret::new(client_secret.into()),
            auth_url: AuthUrl::new("https://accounts.google.com/o/oauth2/v2/auth".to_string())?,
            token_url: TokenUrl::new("https://oauth2.googleapis.com/token".to_string())?,
            scopes: vec!["openid".into(), "email".into(), "profile".into()],
        })
    }

    pub fn github(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Result<Self, url::ParseError> {
        Ok(Self {
            id: ProviderId::GitHub,
            client_id: ClientId::new(client_id.into()),
            client_secret: ClientSecret::new(client_secret.into()),
            auth_url: AuthUrl::new("https://github.com/login/oauth/authorize".to_string())?,
            token_url: TokenUrl::new("https://github.com/login/oauth/access_token".to_string())?,
            scopes: vec!["read:user".into(), "user:email".into()],
        })
    }
}
