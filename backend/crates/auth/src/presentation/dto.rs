//! API DTOs (Data Transfer Objects)

use serde::{Deserialize, Serialize};

use crate::application::providers::ProviderKind;
use crate::domain::entity::user::AuthorizedUser;

// ============================================================================
// Providers
// ============================================================================

/// One entry of the provider listing
///
/// URLs are only listed for flows this router serves.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderResponse {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: ProviderKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signin_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub callback_url: Option<String>,
}

// ============================================================================
// Sign In
// ============================================================================

/// Query of GET /signin
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignInPageQuery {
    pub callback_url: Option<String>,
}

/// Credentials sign in request
///
/// Absent and `null` fields both reach the gate as empty and are rejected there.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignInRequest {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    pub callback_url: Option<String>,
}

/// Credentials sign in response
#[derive(Debug, Clone, Serialize)]
pub struct SignInResponse {
    /// Allow-listed post sign-in redirect target
    pub url: String,
    pub user: AuthorizedUser,
}

// ============================================================================
// Sign Out
// ============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignOutRequest {
    pub callback_url: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SignOutResponse {
    pub url: String,
}
