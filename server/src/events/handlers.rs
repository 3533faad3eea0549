//! Event Listener HTTP Handler

use axum::extract::rejection::BytesRejection;
use axum::extract::State;
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use bytes::Bytes;
use tracing::{error, info, instrument, warn};

use super::classify::classify;
use super::signing;
use super::types::EventEnvelope;
use crate::api::AppState;

/// POST /event-listener
///
/// - 400 when the body cannot be read (including bodies over the size limit)
///   or the signature does not verify
/// - 500 when the payload cannot be decoded
/// - 200 with the challenge as `text/plain` for URL verification
/// - 200 with an empty body otherwise; mention work continues in the background
#[instrument(skip_all)]
pub async fn handle_event_request(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> Response {
    let body = match body {
        Ok(body) => body,
        Err(rejection) => {
            warn!(error = %rejection, "Failed to read event request body");
            return StatusCode::BAD_REQUEST.into_response();
        }
    };

    if let Err(e) = signing::verify(&headers, &body, &state.config.slack_signing_secret) {
        warn!(error = %e, "Rejected event request with invalid signature");
        return StatusCode::from(e).into_response();
    }

    let envelope = match classify(&body) {
        Ok(envelope) => envelope,
        Err(e) => {
            error!(error = %e, "Failed to decode event payload");
            return StatusCode::from(e).into_response();
        }
    };

    match envelope {
        EventEnvelope::VerificationChallenge(challenge) => {
            info!("URL verified");
            ([(header::CONTENT_TYPE, "text/plain")], challenge).into_response()
        }
        EventEnvelope::CallbackEvent(mention) => {
            info!(
                user_id = %mention.user_id,
                channel_id = %mention.channel_id,
                "Mention event occurred"
            );
            state.mentions.dispatch(mention);
            StatusCode::OK.into_response()
        }
        EventEnvelope::Unrecognized(event_type) => {
            error!(event_type = %event_type, "Unsupported event type");
            StatusCode::OK.into_response()
        }
    }
}
