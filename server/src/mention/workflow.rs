//! Mention Workflow
//!
//! Handles one mention end to end: acknowledge, decide whether an image is
//! wanted, generate it and post it back.
//!
//! Each mention runs as its own detached tokio task. There is no queue or
//! concurrency bound in front of these tasks, no cancellation and no
//! ordering between them; replies to two mentions in the same conversation
//! may arrive in either order.

use std::sync::Arc;

use tracing::{error, info, warn};

use super::compose::{self, OutboundMessage};
use super::prompt::{needs_image, sanitize};
use crate::dispatch::{DispatchError, ImageGenerator, MessageDispatcher};
use crate::events::MentionEvent;

/// Workflow states. Every run ends in one of the terminal states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkflowState {
    Received,
    Acknowledged,
    /// Image posted.
    Completed,
    /// No trigger keyword; only the acknowledgement was sent.
    ImageSkipped,
    Failed,
}

impl WorkflowState {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Received => "received",
            Self::Acknowledged => "acknowledged",
            Self::Completed => "completed",
            Self::ImageSkipped => "image_skipped",
            Self::Failed => "failed",
        }
    }

    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::ImageSkipped | Self::Failed)
    }
}

impl std::fmt::Display for WorkflowState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Orchestrates replies to mentions using injected collaborators.
pub struct MentionWorkflow {
    dispatcher: Arc<dyn MessageDispatcher>,
    generator: Arc<dyn ImageGenerator>,
}

impl MentionWorkflow {
    pub fn new(
        dispatcher: Arc<dyn MessageDispatcher>,
        generator: Arc<dyn ImageGenerator>,
    ) -> Self {
        Self {
            dispatcher,
            generator,
        }
    }

    /// Fire and forget: run the workflow on a new task without keeping its handle.
    pub fn dispatch(self: &Arc<Self>, event: MentionEvent) {
        let workflow = Arc::clone(self);
        tokio::spawn(async move {
            workflow.run(event).await;
        });
    }

    async fn post(
        &self,
        event: &MentionEvent,
        message: &OutboundMessage,
    ) -> Result<(), DispatchError> {
        let result = self
            .dispatcher
            .post_message(&event.channel_id, message)
            .await;
        match &result {
            Ok(()) => info!(
                channel_id = %event.channel_id,
                kind = message.kind(),
                payload = ?message,
                "Sent message"
            ),
            Err(e) => error!(
                channel_id = %event.channel_id,
                kind = message.kind(),
                error = %e,
                "Failed to send message"
            ),
        }
        result
    }

    /// Run the workflow to a terminal state. Failures are logged, never returned.
    pub async fn run(&self, event: MentionEvent) -> WorkflowState {
        info!(
            user_id = %event.user_id,
            channel_id = %event.channel_id,
            text = %event.text,
            state = %WorkflowState::Received,
            "Mention received"
        );

        let ack = compose::acknowledgement(&event.user_id, &event.text);
        if self.post(&event, &ack).await.is_err() {
            return finish(&event, WorkflowState::Failed);
        }
        info!(
            channel_id = %event.channel_id,
            state = %WorkflowState::Acknowledged,
            "Mention acknowledged"
        );

        if !needs_image(&event.text) {
            return finish(&event, WorkflowState::ImageSkipped);
        }

        let prompt = sanitize(&event.text);
        info!(channel_id = %event.channel_id, prompt = %prompt, "Generating image");

        let url = match self.generator.generate(&prompt).await {
            Ok(url) => url,
            Err(e) => {
                warn!(
                    channel_id = %event.channel_id,
                    prompt = %prompt,
                    error = %e,
                    "Image generation failed"
                );
                let reply = compose::simple_text(&event.user_id, &e.to_string());
                // Best-effort: the failure is already logged by `post`.
                let _ = self.post(&event, &reply).await;
                return finish(&event, WorkflowState::Failed);
            }
        };

        let image = compose::image_with_caption(&url, &event.user_id, &prompt);
        let state = match self.post(&event, &image).await {
            Ok(()) => WorkflowState::Completed,
            Err(_) => WorkflowState::Failed,
        };
        finish(&event, state)
    }
}

fn finish(event: &MentionEvent, state: WorkflowState) -> WorkflowState {
    debug_assert!(state.is_terminal());
    info!(
        user_id = %event.user_id,
        channel_id = %event.channel_id,
        state = %state,
        "Mention workflow finished"
    );
    state
}
