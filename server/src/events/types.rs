//! Event Types
//!
//! Typed decoding of Events API payloads.

use axum::http::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Outer `type` of a URL verification handshake.
pub const URL_VERIFICATION: &str = "url_verification";

/// Outer `type` of a callback wrapping an inner event.
pub const EVENT_CALLBACK: &str = "event_callback";

/// Inner `type` of a bot mention.
pub const APP_MENTION: &str = "app_mention";

/// Classified Events API payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventEnvelope {
    /// Endpoint ownership handshake; the token is echoed back verbatim.
    VerificationChallenge(String),
    /// Callback carrying an `app_mention` inner event.
    CallbackEvent(MentionEvent),
    /// Any other outer type, or a callback with an unsupported inner type.
    Unrecognized(String),
}

/// The bot was mentioned in a conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MentionEvent {
    #[serde(rename = "user", default)]
    pub user_id: String,
    pub text: String,
    #[serde(rename = "channel")]
    pub channel_id: String,
}

/// Handshake body.
#[derive(Debug, Deserialize)]
pub(crate) struct ChallengeRequest {
    pub challenge: String,
}

/// Payload decoding errors.
#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("Malformed event payload: {0}")]
    Malformed(String),
}

impl From<serde_json::Error> for DecodeError {
    fn from(err: serde_json::Error) -> Self {
        Self::Malformed(err.to_string())
    }
}

impl From<DecodeError> for StatusCode {
    fn from(_: DecodeError) -> Self {
        Self::INTERNAL_SERVER_ERROR
    }
}
