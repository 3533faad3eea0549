//! API Router and Application State
//!
//! Central routing configuration and shared state.

use axum::{
    extract::DefaultBodyLimit,
    routing::{any, get, post},
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tower_http::trace::TraceLayer;

use crate::{
    broadcast::{handlers::send_to_channels, BroadcastHandler},
    config::Config,
    dispatch::{ImageGenerator, MessageDispatcher},
    events::handlers::handle_event_request,
    mention::MentionWorkflow,
    openai::OpenAiImageClient,
    slack::SlackClient,
};

/// Timeout for outbound Slack and OpenAI calls.
const OUTBOUND_TIMEOUT: Duration = Duration::from_secs(60);

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Server configuration
    pub config: Arc<Config>,
    /// Per-mention reply pipeline
    pub mentions: Arc<MentionWorkflow>,
    /// Local-only broadcast handler
    pub broadcaster: Arc<BroadcastHandler>,
}

impl AppState {
    /// Create application state around the given collaborators.
    #[must_use]
    pub fn new(
        config: Config,
        dispatcher: Arc<dyn MessageDispatcher>,
        generator: Arc<dyn ImageGenerator>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            mentions: Arc::new(MentionWorkflow::new(dispatcher.clone(), generator)),
            broadcaster: Arc::new(BroadcastHandler::new(dispatcher)),
        }
    }

    /// Create application state backed by the Slack and OpenAI HTTP APIs.
    pub fn from_config(config: Config) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(OUTBOUND_TIMEOUT)
            .build()?;

        let slack = SlackClient::new(http.clone(), &config.slack_api_base, &config.slack_token);
        let images = OpenAiImageClient::new(
            http,
            &config.openai_api_base,
            &config.openai_token,
            &config.image_size,
        );

        Ok(Self::new(config, Arc::new(slack), Arc::new(images)))
    }
}

/// Create the main application router.
pub fn create_router(state: AppState) -> Router {
    let max_body_size = state.config.max_body_size;

    Router::new()
        // Health check
        .route("/health", get(health_check))
        // Slack Events API
        .route("/event-listener", post(handle_event_request))
        // Local admin broadcast; the handler itself rejects non-POST methods
        .route("/send-to-channels", any(send_to_channels))
        // Middleware
        .layer(TraceLayer::new_for_http())
        .layer(DefaultBodyLimit::max(max_body_size))
        // State
        .with_state(state)
}

/// Health check response.
#[derive(Serialize)]
struct HealthResponse {
    /// Service status
    status: &'static str,
}

/// Health check endpoint.
async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}
