// The conversation loop shared by both front ends.
pub mod orchestrator;

pub use orchestrator::{Agent, TurnReply, TurnResult, SYSTEM_PROMPT};
