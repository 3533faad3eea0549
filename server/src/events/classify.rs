//! Event Classification
//!
//! Sorts a raw request body into handshake, mention callback, or unrecognized.

use serde::Deserialize;
use serde_json::Value;

use super::types::{
    ChallengeRequest, DecodeError, EventEnvelope, MentionEvent, APP_MENTION, EVENT_CALLBACK,
    URL_VERIFICATION,
};

fn type_of(value: &Value) -> Option<&str> {
    value.get("type").and_then(Value::as_str)
}

/// Classify a raw Events API body.
///
/// Only structurally broken payloads are errors; unknown event types come
/// back as [`EventEnvelope::Unrecognized`].
pub fn classify(raw: &[u8]) -> Result<EventEnvelope, DecodeError> {
    let value: Value = serde_json::from_slice(raw)?;
    let kind = type_of(&value)
        .ok_or_else(|| DecodeError::Malformed("missing event type".to_string()))?;

    match kind {
        URL_VERIFICATION => {
            let req = ChallengeRequest::deserialize(&value)?;
            Ok(EventEnvelope::VerificationChallenge(req.challenge))
        }
        EVENT_CALLBACK => {
            let inner = value
                .get("event")
                .ok_or_else(|| DecodeError::Malformed("callback without event".to_string()))?;
            match type_of(inner) {
                Some(APP_MENTION) => {
                    let mention = MentionEvent::deserialize(inner)?;
                    Ok(EventEnvelope::CallbackEvent(mention))
                }
                Some(other) => Ok(EventEnvelope::Unrecognized(other.to_string())),
                None => Err(DecodeError::Malformed(
                    "callback event without type".to_string(),
                )),
            }
        }
        other => Ok(EventEnvelope::Unrecognized(other.to_string())),
    }
}
