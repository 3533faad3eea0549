//! Mention Handling
//!
//! Prompt sanitizing, reply composition and the per-mention workflow.

pub mod compose;
pub mod prompt;
pub mod workflow;

pub use workflow::{MentionWorkflow, WorkflowState};
