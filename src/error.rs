// src/error.rs

use thiserror::Error;

/// Failures talking to the chat-completion endpoint.
///
/// Remote tool failures are not represented here: the invoker folds them
/// into structured tool results so the model can react to them, and
/// malformed embedded tool calls are skipped per call site with a warning.
#[derive(Error, Debug)]
pub enum AgentError {
    #[error("chat endpoint transport failure: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("chat endpoint returned HTTP {status}: {body}")]
    Endpoint { status: u16, body: String },
    #[error("chat endpoint returned no choices")]
    EmptyResponse,
}
