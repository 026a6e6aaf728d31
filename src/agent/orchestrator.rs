//! # Conversation Orchestrator
//!
//! Drives the multi-turn tool protocol for one conversation: send the
//! history plus the tool schema to the chat endpoint, detect tool calls
//! (structured or embedded in the response text), execute them against the
//! Ankr API, fold the results back into history, and resubmit until the
//! model produces a tool-call-free answer.
//!
//! Tool calls detected in one response are independent read-style queries,
//! so they are dispatched concurrently and joined before resubmission. The
//! resulting tool messages are appended in the order the model declared the
//! calls, not completion order, so reruns against recorded responses are
//! deterministic.
//!
//! History is threaded by value through the turn and only handed back when
//! the turn finishes. Dropping the future mid-turn (user abort, client
//! disconnect) therefore leaves the caller's stored history untouched, and
//! every tool call that reaches history has its matching result.

use futures::future::join_all;
use reqwest::Client;
use serde_json::{json, Value};
use tracing::{info, warn};

use crate::chat::client::GaiaClient;
use crate::chat::parser;
use crate::chat::protocol::{ChatRequest, Message, ToolCall};
use crate::config::Config;
use crate::tools::invoker::AnkrClient;
use crate::tools::schema;

/// Base instructions for the model, including the embedded tool-call
/// format some Llama models fall back to.
pub const SYSTEM_PROMPT: &str = "You are a helpful assistant that uses Ankr blockchain tools to answer user questions.\n\
When you need to use a tool, if you have any introductory text, provide it first, then on a new line provide the tool call in the format: <|python_tag|>{\"name\": \"tool_name\", \"parameters\": {\"param1\": \"value1\"}}<|eom_id|>\n\
If the tool call is the only thing, just provide the tag.\n\
Available tools cover blockchain stats, blocks, logs, transactions, NFTs, and token information.\n\
- For 'blockchain' parameters that can take multiple chains, if the user asks for multiple (e.g., \"on eth and bsc\"), provide them as a comma-separated string (e.g., \"eth,bsc\").\n\
- For 'address' parameters that can take multiple addresses, provide them as a comma-separated string or an array of strings.\n\
- If a required parameter for a tool is missing from the user's query, ask the user for it before calling the tool.\n\
- For 'ankr_getNFTsByOwner', the 'filter' parameter is an array of objects, where each object has a contract address as a key and an array of token IDs as its value (or an empty array for all tokens from that contract).\n\
- Be concise in your final answers unless asked for verbosity.";

/// How a turn ended, from the user's point of view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnReply {
    /// Final answer text, cleaned of any marker spans.
    Answer(String),
    /// The model returned neither content nor tool calls.
    NoResponse,
    /// Transport-level failure talking to the chat endpoint; the turn's
    /// history additions were rolled back so a retry starts clean.
    Transient(String),
    /// The model kept requesting tools past the configured round bound.
    ToolLoopExceeded(u32),
}

/// Outcome of one user turn.
#[derive(Debug)]
pub struct TurnResult {
    /// The conversation history after the turn.
    pub history: Vec<Message>,
    /// Commentary the model emitted alongside tool-call rounds, in order.
    pub interim: Vec<String>,
    pub reply: TurnReply,
}

/// The agent core shared by the REPL and the HTTP front end.
pub struct Agent {
    gaia: GaiaClient,
    ankr: AnkrClient,
    model: String,
    temperature: Option<f32>,
    max_tool_rounds: u32,
}

impl Agent {
    pub fn new(config: &Config) -> Self {
        let http = Client::new();
        Self::from_parts(
            GaiaClient::new(
                http.clone(),
                config.gaia_api_endpoint.clone(),
                config.gaia_api_key.clone(),
            ),
            AnkrClient::new(http, &config.ankr_api_key),
            config.gaia_model_name.clone(),
            config.temperature,
            config.max_tool_rounds,
        )
    }

    pub fn from_parts(
        gaia: GaiaClient,
        ankr: AnkrClient,
        model: String,
        temperature: Option<f32>,
        max_tool_rounds: u32,
    ) -> Self {
        Self {
            gaia,
            ankr,
            model,
            temperature,
            max_tool_rounds,
        }
    }

    /// A fresh history seeded with the system prompt.
    pub fn seed_history(&self) -> Vec<Message> {
        vec![Message::system(SYSTEM_PROMPT)]
    }

    /// Appends the user's input to the history and resolves the turn.
    pub async fn run_turn(&self, mut history: Vec<Message>, user_input: &str) -> TurnResult {
        let checkpoint = history.len();
        history.push(Message::user(user_input));
        self.drive(history, checkpoint, None).await
    }

    /// Resolves a turn over a caller-supplied history that already ends
    /// with the user's message (the HTTP chat endpoint posts the full
    /// list). On a transient failure the history comes back exactly as
    /// posted.
    pub async fn run_conversation(
        &self,
        history: Vec<Message>,
        model_override: Option<&str>,
    ) -> TurnResult {
        let checkpoint = history.len();
        self.drive(history, checkpoint, model_override).await
    }

    async fn drive(
        &self,
        mut history: Vec<Message>,
        checkpoint: usize,
        model_override: Option<&str>,
    ) -> TurnResult {
        let model = model_override.unwrap_or(&self.model);
        let mut interim = Vec::new();
        let mut rounds: u32 = 0;

        loop {
            let completion = {
                let request = ChatRequest {
                    model,
                    messages: &history,
                    tools: Some(schema::tool_schema()),
                    tool_choice: Some("auto"),
                    temperature: self.temperature,
                    max_tokens: None,
                };
                self.gaia.chat_completion(&request).await
            };

            let mut message = match completion {
                Ok(message) => message,
                Err(e) => {
                    warn!("chat completion failed: {}", e);
                    history.truncate(checkpoint);
                    return TurnResult {
                        history,
                        interim,
                        reply: TurnReply::Transient(e.to_string()),
                    };
                }
            };

            // Prefer structured tool calls; fall back to the embedded
            // parser and replace the content with the cleaned commentary.
            if !message.has_tool_calls() {
                if let Some(content) = message.content.take() {
                    let parsed = parser::extract_tool_calls(&content);
                    if parsed.is_empty() {
                        message.content = Some(content);
                    } else {
                        let cleaned = parser::clean_content(&content);
                        message.content = (!cleaned.is_empty()).then_some(cleaned);
                        message.tool_calls = Some(parsed);
                    }
                }
            }

            let tool_calls = message.tool_calls.clone().unwrap_or_default();

            if tool_calls.is_empty() {
                let answer = message
                    .content
                    .as_deref()
                    .map(parser::clean_content)
                    .filter(|text| !text.is_empty());
                history.push(message);
                let reply = match answer {
                    Some(text) => TurnReply::Answer(text),
                    None => TurnReply::NoResponse,
                };
                return TurnResult {
                    history,
                    interim,
                    reply,
                };
            }

            if rounds >= self.max_tool_rounds {
                warn!(
                    "tool loop exceeded {} rounds, ending turn",
                    self.max_tool_rounds
                );
                // The pending calls are dropped rather than appended, so no
                // unanswered tool call ever lands in history.
                return TurnResult {
                    history,
                    interim,
                    reply: TurnReply::ToolLoopExceeded(self.max_tool_rounds),
                };
            }
            rounds += 1;

            if let Some(text) = message.content.as_deref() {
                if !text.trim().is_empty() {
                    interim.push(text.trim().to_string());
                }
            }
            let names: Vec<&str> = tool_calls
                .iter()
                .map(|call| call.function.name.as_str())
                .collect();
            info!(
                "model requested {} tool call(s): {}",
                tool_calls.len(),
                names.join(", ")
            );

            history.push(message);

            // Fan out the independent calls, join, and fold the results in
            // declaration order.
            let results = join_all(tool_calls.iter().map(|call| self.execute_tool(call))).await;
            history.extend(results);
        }
    }

    async fn execute_tool(&self, call: &ToolCall) -> Message {
        let args: Value = match serde_json::from_str(&call.function.arguments) {
            Ok(v) => v,
            Err(e) => {
                warn!("tool call {} has malformed arguments: {}", call.id, e);
                json!({})
            }
        };
        let outcome = self.ankr.call(&call.function.name, &args).await;
        Message::tool(
            call.id.as_str(),
            call.function.name.as_str(),
            outcome.to_string(),
        )
    }
}
