use crate::agent::{TurnReply, SYSTEM_PROMPT};
use crate::chat::protocol::{Message, Role};
use crate::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::error;

// Defines the structure for the JSON body posted to /api/chat: the full
// conversation so far, ending with the user's newest message.
#[derive(Debug, Deserialize)]
pub struct ChatTurnRequest {
    pub messages: Vec<Message>,
    #[serde(default)]
    pub model: Option<String>,
}

// Defines the structure for the JSON output returned by our API.
#[derive(Debug, Serialize)]
pub struct ChatTurnResponse {
    pub messages: Vec<Message>,
    pub answer: String,
}

// The handler function for the POST /api/chat endpoint. Runs one agent
// turn over the posted history and returns the updated history plus the
// final answer text.
pub async fn chat_handler(
    State(state): State<AppState>,
    Json(request): Json<ChatTurnRequest>,
) -> impl IntoResponse {
    if request.messages.is_empty() {
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({"error": "messages must not be empty"})),
        )
            .into_response();
    }
    if request.messages.last().map(|m| m.role) != Some(Role::User) {
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({"error": "the last message must have role 'user'"})),
        )
            .into_response();
    }

    let mut history = request.messages;
    if !history.iter().any(|m| m.role == Role::System) {
        history.insert(0, Message::system(SYSTEM_PROMPT));
    }

    let result = state
        .agent
        .run_conversation(history, request.model.as_deref())
        .await;

    match result.reply {
        TurnReply::Answer(answer) => (
            StatusCode::OK,
            Json(ChatTurnResponse {
                messages: result.history,
                answer,
            }),
        )
            .into_response(),
        TurnReply::NoResponse => (
            StatusCode::OK,
            Json(ChatTurnResponse {
                messages: result.history,
                answer: "The model returned no content for this turn.".to_string(),
            }),
        )
            .into_response(),
        TurnReply::Transient(detail) => {
            error!("chat turn failed against upstream endpoint: {}", detail);
            (
                StatusCode::BAD_GATEWAY,
                Json(json!({"error": format!("upstream chat endpoint failed: {}", detail)})),
            )
                .into_response()
        }
        TurnReply::ToolLoopExceeded(rounds) => (
            StatusCode::BAD_GATEWAY,
            Json(json!({
                "error": format!("tool loop exceeded {} rounds without a final answer", rounds)
            })),
        )
            .into_response(),
    }
}
