//! HMAC-SHA256 Request Signing
//!
//! Verifies that an inbound Events API request was signed by Slack.
//!
//! The signed base string is `v0:{timestamp}:{body}` and the header carries
//! `v0=` followed by the lowercase hex digest.

use axum::http::{HeaderMap, StatusCode};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use thiserror::Error;

type HmacSha256 = Hmac<Sha256>;

/// Header carrying the request signature.
pub const SIGNATURE_HEADER: &str = "x-slack-signature";

/// Header carrying the Unix timestamp the request was signed at.
pub const TIMESTAMP_HEADER: &str = "x-slack-request-timestamp";

/// Signature scheme version prefix.
const VERSION: &str = "v0";

/// Maximum allowed clock skew between the request timestamp and now.
pub const REPLAY_TOLERANCE_SECS: i64 = 5 * 60;

/// Signature verification failures.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum AuthError {
    #[error("Signing secret is not configured")]
    NoSecret,
    #[error("Missing header: {0}")]
    MissingHeader(&'static str),
    #[error("Invalid request timestamp")]
    InvalidTimestamp,
    #[error("Request timestamp outside the replay window")]
    Expired,
    #[error("Signature mismatch")]
    Mismatch,
}

impl From<AuthError> for StatusCode {
    fn from(_: AuthError) -> Self {
        Self::BAD_REQUEST
    }
}

fn new_mac(secret: &str, timestamp: &str, body: &[u8]) -> HmacSha256 {
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC can take key of any size");
    mac.update(VERSION.as_bytes());
    mac.update(b":");
    mac.update(timestamp.as_bytes());
    mac.update(b":");
    mac.update(body);
    mac
}

/// Compute the header value Slack would send for this body and timestamp.
pub fn sign_request(secret: &str, timestamp: &str, body: &[u8]) -> String {
    let digest = new_mac(secret, timestamp, body).finalize().into_bytes();
    format!("{VERSION}={}", hex::encode(digest))
}

fn header<'a>(headers: &'a HeaderMap, name: &'static str) -> Result<&'a str, AuthError> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .ok_or(AuthError::MissingHeader(name))
}

/// Verify a request against the signing secret using the current time.
pub fn verify(headers: &HeaderMap, body: &[u8], secret: &str) -> Result<(), AuthError> {
    verify_at(headers, body, secret, chrono::Utc::now().timestamp())
}

/// Verify a request against the signing secret at a given Unix time.
///
/// An empty secret rejects every request; HMAC would otherwise accept it as a key.
pub fn verify_at(headers: &HeaderMap, body: &[u8], secret: &str, now: i64) -> Result<(), AuthError> {
    if secret.is_empty() {
        return Err(AuthError::NoSecret);
    }

    let signature = header(headers, SIGNATURE_HEADER)?;
    let timestamp = header(headers, TIMESTAMP_HEADER)?;

    let sent_at: i64 = timestamp
        .trim()
        .parse()
        .map_err(|_| AuthError::InvalidTimestamp)?;
    if now.abs_diff(sent_at) > REPLAY_TOLERANCE_SECS.unsigned_abs() {
        return Err(AuthError::Expired);
    }

    let provided = signature
        .strip_prefix(VERSION)
        .and_then(|s| s.strip_prefix('='))
        .and_then(|hex_sig| hex::decode(hex_sig).ok())
        .ok_or(AuthError::Mismatch)?;

    // Constant-time comparison
    new_mac(secret, timestamp, body)
        .verify_slice(&provided)
        .map_err(|_| AuthError::Mismatch)
}
