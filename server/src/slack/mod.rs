//! Slack Messaging
//!
//! Web API implementation of [`crate::dispatch::MessageDispatcher`].

mod client;

pub use client::{message_payload, SlackClient};
