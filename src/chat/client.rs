// src/chat/client.rs

use reqwest::Client;
use tracing::debug;

use crate::chat::protocol::{ChatRequest, ChatResponse, Message};
use crate::error::AgentError;

/// Client for an OpenAI-compatible chat-completion endpoint (a Gaia node).
///
/// Authentication is a bearer API key; the base URL is the versioned API
/// root, e.g. `https://llama70b.gaia.domains/v1`.
#[derive(Clone)]
pub struct GaiaClient {
    http: Client,
    base_url: String,
    api_key: String,
}

impl GaiaClient {
    pub fn new(http: Client, base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
            api_key: api_key.into(),
        }
    }

    /// Sends one chat-completion request and returns the first choice's
    /// message. An empty `choices` array is an error here so the
    /// orchestrator can treat it like a transport failure and roll back.
    pub async fn chat_completion(
        &self,
        request: &ChatRequest<'_>,
    ) -> Result<Message, AgentError> {
        let url = format!("{}/chat/completions", self.base_url.trim_end_matches('/'));
        debug!("sending chat completion to {} (model: {})", url, request.model);

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AgentError::Endpoint {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: ChatResponse = response.json().await?;
        parsed
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message)
            .ok_or(AgentError::EmptyResponse)
    }
}
