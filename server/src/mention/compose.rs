//! Response Composition
//!
//! Builds the messages the bot posts back in reply to a mention.

use super::prompt::needs_image;

/// Example shown to users who mention the bot without the trigger keyword.
const HINT_EXAMPLE: &str = "_*imagine*_ pink unicorn laying eggs in desert";

/// A message ready to be posted to a conversation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutboundMessage {
    /// First reply to a mention.
    Acknowledgement { text: String },
    /// Plain text, used for errors and broadcasts.
    SimpleText { text: String },
    /// Generated image with a caption addressed to the requesting user.
    ImageWithCaption {
        url: String,
        caption: String,
        user_id: String,
    },
}

impl OutboundMessage {
    /// Plain text form, also used as the notification fallback for images.
    pub fn text(&self) -> String {
        match self {
            Self::Acknowledgement { text } | Self::SimpleText { text } => text.clone(),
            Self::ImageWithCaption {
                caption, user_id, ..
            } => image_heading(user_id, caption),
        }
    }

    /// Short name for log fields.
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Acknowledgement { .. } => "acknowledgement",
            Self::SimpleText { .. } => "simple_text",
            Self::ImageWithCaption { .. } => "image_with_caption",
        }
    }
}

fn mention(user_id: &str) -> String {
    format!("<@{user_id}>")
}

fn image_heading(user_id: &str, caption: &str) -> String {
    format!("{} here's what I imagine about '{caption}'", mention(user_id))
}

/// Acknowledge a mention; the wording depends on whether an image will follow.
pub fn acknowledgement(user_id: &str, text: &str) -> OutboundMessage {
    let text = if needs_image(text) {
        format!("{} Got it, let me think...", mention(user_id))
    } else {
        format!(
            "{} Try to ask me something like: {HINT_EXAMPLE}",
            mention(user_id)
        )
    };
    OutboundMessage::Acknowledgement { text }
}

/// Text addressed to a user.
pub fn simple_text(user_id: &str, text: &str) -> OutboundMessage {
    OutboundMessage::SimpleText {
        text: format!("{} {text}", mention(user_id)),
    }
}

/// Unaddressed text, as sent by broadcasts.
pub fn plain_text(text: &str) -> OutboundMessage {
    OutboundMessage::SimpleText {
        text: text.to_string(),
    }
}

/// Generated image captioned with the prompt it came from.
pub fn image_with_caption(url: &str, user_id: &str, prompt: &str) -> OutboundMessage {
    OutboundMessage::ImageWithCaption {
        url: url.to_string(),
        caption: prompt.to_string(),
        user_id: user_id.to_string(),
    }
}
