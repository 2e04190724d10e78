//! Client identification utilities

use axum::http::HeaderMap;
use std::net::IpAddr;

/// Client IP address for audit logging
///
/// Prefers the first address in `X-Forwarded-For` (reverse proxy setups),
/// then falls back to the direct connection address.
pub fn extract_client_ip(headers: &HeaderMap, direct_ip: Option<IpAddr>) -> Option<IpAddr> {
    headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|xff| xff.split(',').next())
        .and_then(|first| first.trim().parse::<IpAddr>().ok())
        .or(direct_ip)
}
