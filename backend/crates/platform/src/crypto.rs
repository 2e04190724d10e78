//! Cryptographic Utilities
//!
//! Secret generation and HMAC-SHA256 signed tokens of the form
//! `<payload>.<base64url(signature)>`.

use base64::{Engine, engine::general_purpose};
use hmac::{Hmac, Mac};
use rand::{RngCore, rngs::OsRng};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Generate a random 32-byte signing secret
pub fn random_secret() -> [u8; 32] {
    let mut secret = [0u8; 32];
    OsRng.fill_bytes(&mut secret);
    secret
}

/// Encode bytes as standard base64
pub fn to_base64(bytes: &[u8]) -> String {
    general_purpose::STANDARD.encode(bytes)
}

/// Decode standard base64
pub fn from_base64(s: &str) -> Result<Vec<u8>, base64::DecodeError> {
    general_purpose::STANDARD.decode(s)
}

fn mac_for(key: &[u8; 32], payload: &str) -> HmacSha256 {
    // HMAC accepts keys of any length; a 32-byte key never fails.
    let mut mac = <HmacSha256 as Mac>::new_from_slice(key)
        .unwrap_or_else(|_| unreachable!("HMAC key length is unrestricted"));
    mac.update(payload.as_bytes());
    mac
}

/// Sign `payload`, returning `payload.signature`
///
/// `payload` must not contain `.`.
pub fn sign(key: &[u8; 32], payload: &str) -> String {
    let signature = mac_for(key, payload).finalize().into_bytes();
    format!(
        "{}.{}",
        payload,
        general_purpose::URL_SAFE_NO_PAD.encode(signature)
    )
}

/// Verify a token produced by [`sign`] and return its payload
///
/// Signature comparison is constant time.
pub fn verify<'a>(key: &[u8; 32], token: &'a str) -> Option<&'a str> {
    let (payload, signature_b64) = token.split_once('.')?;
    if signature_b64.contains('.') {
        return None;
    }

    let signature = general_purpose::URL_SAFE_NO_PAD
        .decode(signature_b64)
        .ok()?;

    mac_for(key, payload).verify_slice(&signature).ok()?;
    Some(payload)
}
