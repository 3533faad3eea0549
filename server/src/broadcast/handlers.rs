//! Broadcast HTTP Handler

use std::net::SocketAddr;

use axum::extract::{ConnectInfo, FromRequest, Query, Request, State};
use axum::Form;
use serde::Deserialize;
use tracing::{debug, instrument, warn};

use super::BroadcastRequest;
use crate::api::AppState;

/// Fields accepted by `/send-to-channels`, from the form body or the query string.
#[derive(Debug, Deserialize)]
pub struct BroadcastForm {
    pub message: Option<String>,
    pub channel: Option<String>,
}

impl BroadcastForm {
    /// Body values win over query values, field by field.
    fn or_query(self, fallback: Option<Self>) -> Self {
        match fallback {
            Some(fallback) => Self {
                message: self.message.or(fallback.message),
                channel: self.channel.or(fallback.channel),
            },
            None => self,
        }
    }
}

/// ANY /send-to-channels
///
/// Always answers 200 with an empty body; outcomes are only logged.
#[instrument(skip_all)]
pub async fn send_to_channels(State(state): State<AppState>, request: Request) {
    let method = request.method().clone();
    let origin = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip());
    let query = Query::<BroadcastForm>::try_from_uri(request.uri())
        .ok()
        .map(|Query(query)| query);

    let form = match Form::<BroadcastForm>::from_request(request, &state).await {
        Ok(Form(body)) => body.or_query(query),
        Err(rejection) => match query {
            Some(query) => {
                debug!(error = %rejection, "No form body, using query parameters");
                query
            }
            None => {
                warn!(method = %method, error = %rejection, "Unreadable broadcast request");
                return;
            }
        },
    };

    state
        .broadcaster
        .broadcast(BroadcastRequest {
            method,
            origin,
            message: form.message.unwrap_or_default(),
            channel: form.channel.filter(|c| !c.is_empty()),
        })
        .await;
}
