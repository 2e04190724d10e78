//! Platform Crate - Technical Infrastructure
//!
//! Shared technical foundations for the auth backend:
//! - Password hashing and verification (Argon2id)
//! - Signed tokens (HMAC-SHA256) and secret generation
//! - Cookie building and parsing
//! - Client address extraction
//! - Failed-login window and lockout arithmetic

pub mod client;
pub mod cookie;
pub mod crypto;
pub mod password;
pub mod rate_limit;
