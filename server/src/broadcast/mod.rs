//! Channel Broadcast
//!
//! Local administrative endpoint that posts one message to a single channel
//! or to every conversation the bot belongs to.
//!
//! Authorization is only "method is POST and the TCP peer is loopback". That
//! is fine for an operator on the same host and nothing more; do not expose
//! this route beyond localhost without putting real authentication in front.

pub mod handlers;

use std::net::IpAddr;
use std::sync::Arc;

use axum::http::Method;
use tracing::{error, info, warn};

use crate::dispatch::MessageDispatcher;
use crate::mention::compose;

/// Conversations fetched per broadcast. Further pages are not requested.
pub const CONVERSATION_PAGE_LIMIT: u32 = 100;

/// A broadcast request as received by the HTTP layer.
#[derive(Debug, Clone)]
pub struct BroadcastRequest {
    pub method: Method,
    /// Peer address of the caller, if known.
    pub origin: Option<IpAddr>,
    pub message: String,
    /// Explicit destination; `None` means every conversation of the bot.
    pub channel: Option<String>,
}

/// Why a broadcast request was refused.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BroadcastRejection {
    #[error("only POST requests allowed, got {0}")]
    Method(Method),
    #[error("only requests from localhost allowed, origin: {0}")]
    Origin(String),
}

/// Check the local-only trust boundary.
pub fn authorize(req: &BroadcastRequest) -> Result<(), BroadcastRejection> {
    if req.method != Method::POST {
        return Err(BroadcastRejection::Method(req.method.clone()));
    }
    match req.origin {
        Some(ip) if ip.to_canonical().is_loopback() => Ok(()),
        Some(ip) => Err(BroadcastRejection::Origin(ip.to_string())),
        None => Err(BroadcastRejection::Origin("unknown".to_string())),
    }
}

/// Sends broadcast messages through the injected dispatcher.
pub struct BroadcastHandler {
    dispatcher: Arc<dyn MessageDispatcher>,
}

impl BroadcastHandler {
    pub fn new(dispatcher: Arc<dyn MessageDispatcher>) -> Self {
        Self { dispatcher }
    }

    /// Validate and fan out a broadcast. Every failure is logged, none returned.
    pub async fn broadcast(&self, req: BroadcastRequest) {
        if let Err(rejection) = authorize(&req) {
            warn!(error = %rejection, "Broadcast request rejected");
            return;
        }

        let message = compose::plain_text(&req.message);

        if let Some(channel) = req.channel.as_deref() {
            match self.dispatcher.post_message(channel, &message).await {
                Ok(()) => info!(channel_id = %channel, "Broadcast sent"),
                Err(e) => error!(channel_id = %channel, error = %e, "Broadcast failed"),
            }
            return;
        }

        let user_id = match self.dispatcher.own_user_id().await {
            Ok(id) => id,
            Err(e) => {
                error!(error = %e, "Failed to resolve bot identity");
                return;
            }
        };

        let channels = match self
            .dispatcher
            .conversations_for_user(&user_id, CONVERSATION_PAGE_LIMIT)
            .await
        {
            Ok(channels) => channels,
            Err(e) => {
                error!(user_id = %user_id, error = %e, "Failed to list bot conversations");
                return;
            }
        };

        let total = channels.len();
        let mut delivered = 0usize;
        for channel in &channels {
            match self.dispatcher.post_message(channel, &message).await {
                Ok(()) => delivered += 1,
                Err(e) => error!(channel_id = %channel, error = %e, "Broadcast failed"),
            }
        }
        info!(user_id = %user_id, total, delivered, "Broadcast to all conversations finished");
    }
}
