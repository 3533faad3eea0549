//! Imagine Bot Server
//!
//! Slack bot that answers mentions containing "imagine" with a generated
//! image, plus a local-only endpoint for broadcasting messages to channels.

pub mod api;
pub mod broadcast;
pub mod config;
pub mod dispatch;
pub mod events;
pub mod mention;
pub mod openai;
pub mod slack;
