//! Slack Event Listener
//!
//! Inbound Events API webhook: request signature verification, payload
//! classification and hand-off of mention events to the mention workflow.

pub mod classify;
pub mod handlers;
pub mod signing;
pub mod types;

pub use classify::classify;
pub use types::{DecodeError, EventEnvelope, MentionEvent};
