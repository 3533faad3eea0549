//! Outbound Collaborators
//!
//! Seams for the messaging platform and the image generation API. Production
//! implementations live in [`crate::slack`] and [`crate::openai`]; tests swap
//! in fakes.

use async_trait::async_trait;
use thiserror::Error;

use crate::mention::compose::OutboundMessage;

/// Failures talking to an external service after the HTTP response is gone.
#[derive(Error, Debug)]
pub enum DispatchError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Slack API error: {0}")]
    Slack(String),
    #[error("Image generation failed: {0}")]
    Generation(String),
}

/// Posts messages to conversations and answers identity questions.
#[async_trait]
pub trait MessageDispatcher: Send + Sync {
    /// Post a message to a conversation.
    async fn post_message(
        &self,
        channel_id: &str,
        message: &OutboundMessage,
    ) -> Result<(), DispatchError>;

    /// Resolve the user ID of the bot's own identity.
    async fn own_user_id(&self) -> Result<String, DispatchError>;

    /// List up to `limit` conversation IDs the user belongs to (first page only).
    async fn conversations_for_user(
        &self,
        user_id: &str,
        limit: u32,
    ) -> Result<Vec<String>, DispatchError>;
}

/// Turns a text prompt into a generated image URL.
#[async_trait]
pub trait ImageGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, DispatchError>;
}
