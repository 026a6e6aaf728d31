//! End-to-end tests for the conversation loop, driven against mock Gaia
//! and Ankr endpoints.
//!
//! Each test uses its own path prefix on the shared mock server so the
//! mocks cannot cross-match. Where one chat path must answer differently
//! across rounds, the resubmission mock matches the `"role":"tool"`
//! messages that only exist after tool execution; mockito gives the
//! last-defined matching mock priority.

use gaia_ankr_agent::agent::{Agent, TurnReply};
use gaia_ankr_agent::chat::client::GaiaClient;
use gaia_ankr_agent::chat::protocol::Role;
use gaia_ankr_agent::tools::invoker::AnkrClient;
use mockito::{mock, server_url, Matcher};
use serde_json::{json, Value};

fn test_agent(prefix: &str, max_tool_rounds: u32) -> Agent {
    let http = reqwest::Client::new();
    Agent::from_parts(
        GaiaClient::new(
            http.clone(),
            format!("{}/{}/v1", server_url(), prefix),
            "test-key",
        ),
        AnkrClient::with_endpoint(http, format!("{}/{}/ankr", server_url(), prefix)),
        "llama70b".to_string(),
        None,
        max_tool_rounds,
    )
}

fn completion_body(message: Value) -> String {
    json!({"choices": [{"message": message}]}).to_string()
}

#[tokio::test]
async fn test_structured_tool_call_end_to_end() {
    let gaia_first = mock("POST", "/t1/v1/chat/completions")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(completion_body(json!({
            "role": "assistant",
            "content": null,
            "tool_calls": [{
                "id": "call_1",
                "type": "function",
                "function": {
                    "name": "ankr_getAccountBalance",
                    "arguments": "{\"walletAddress\":\"0xABC\",\"blockchain\":\"eth,polygon\"}"
                }
            }]
        })))
        .expect(1)
        .create();
    let gaia_final = mock("POST", "/t1/v1/chat/completions")
        .match_body(Matcher::Regex("\"role\":\"tool\"".to_string()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(completion_body(json!({
            "role": "assistant",
            "content": "0xABC holds 1.2 ETH and 20 MATIC."
        })))
        .expect(1)
        .create();
    // The normalizer must have split the comma list before the request
    // goes out; matching on params asserts exactly that.
    let ankr = mock("POST", "/t1/ankr")
        .match_body(Matcher::PartialJson(json!({
            "jsonrpc": "2.0",
            "method": "ankr_getAccountBalance",
            "params": {"walletAddress": "0xABC", "blockchain": ["eth", "polygon"]}
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({"jsonrpc": "2.0", "id": 1, "result": {"totalBalanceUsd": "4210.77"}})
                .to_string(),
        )
        .expect(1)
        .create();

    let agent = test_agent("t1", 5);
    let result = agent
        .run_turn(
            agent.seed_history(),
            "What's the ETH balance of 0xABC on eth and polygon?",
        )
        .await;

    assert_eq!(
        result.reply,
        TurnReply::Answer("0xABC holds 1.2 ETH and 20 MATIC.".to_string())
    );

    // system + user + assistant(tool_calls) + tool + assistant(answer)
    assert_eq!(result.history.len(), 5);
    let tool_message = &result.history[3];
    assert_eq!(tool_message.role, Role::Tool);
    assert_eq!(tool_message.tool_call_id.as_deref(), Some("call_1"));
    assert_eq!(tool_message.name.as_deref(), Some("ankr_getAccountBalance"));
    let payload: Value =
        serde_json::from_str(tool_message.content.as_deref().unwrap()).unwrap();
    assert_eq!(payload["totalBalanceUsd"], "4210.77");

    gaia_first.assert();
    gaia_final.assert();
    ankr.assert();
}

#[tokio::test]
async fn test_embedded_marker_tool_call() {
    let gaia_first = mock("POST", "/t2/v1/chat/completions")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(completion_body(json!({
            "role": "assistant",
            "content": "Let me check.<|python_tag|>{\"name\":\"ankr_getTokenPrice\",\"parameters\":{\"blockchain\":\"eth\"}}<|eom_id|>"
        })))
        .expect(1)
        .create();
    let gaia_final = mock("POST", "/t2/v1/chat/completions")
        .match_body(Matcher::Regex("\"role\":\"tool\"".to_string()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(completion_body(json!({
            "role": "assistant",
            "content": "ETH is trading at $3,000."
        })))
        .expect(1)
        .create();
    let ankr = mock("POST", "/t2/ankr")
        .match_body(Matcher::PartialJson(json!({
            "method": "ankr_getTokenPrice",
            "params": {"blockchain": "eth"}
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(json!({"jsonrpc": "2.0", "id": 1, "result": {"usdPrice": "3000"}}).to_string())
        .expect(1)
        .create();

    let agent = test_agent("t2", 5);
    let result = agent
        .run_turn(agent.seed_history(), "What's the price of ETH?")
        .await;

    assert_eq!(
        result.reply,
        TurnReply::Answer("ETH is trading at $3,000.".to_string())
    );
    // The marker span was stripped; only the commentary survives on the
    // assistant message, and it was surfaced as interim output.
    let assistant = &result.history[2];
    assert_eq!(assistant.content.as_deref(), Some("Let me check."));
    assert!(assistant.has_tool_calls());
    assert_eq!(result.interim, vec!["Let me check.".to_string()]);

    gaia_first.assert();
    gaia_final.assert();
    ankr.assert();
}

#[tokio::test]
async fn test_unknown_tool_gets_structured_error_without_network() {
    let gaia_first = mock("POST", "/t3/v1/chat/completions")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(completion_body(json!({
            "role": "assistant",
            "content": null,
            "tool_calls": [{
                "id": "call_x",
                "type": "function",
                "function": {"name": "ankr_doesNotExist", "arguments": "{}"}
            }]
        })))
        .expect(1)
        .create();
    let gaia_final = mock("POST", "/t3/v1/chat/completions")
        .match_body(Matcher::Regex("\"role\":\"tool\"".to_string()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(completion_body(json!({
            "role": "assistant",
            "content": "I don't have a tool for that."
        })))
        .expect(1)
        .create();
    let ankr = mock("POST", "/t3/ankr").expect(0).create();

    let agent = test_agent("t3", 5);
    let result = agent
        .run_turn(agent.seed_history(), "Do something impossible")
        .await;

    assert_eq!(
        result.reply,
        TurnReply::Answer("I don't have a tool for that.".to_string())
    );
    let tool_message = &result.history[3];
    assert_eq!(tool_message.role, Role::Tool);
    assert!(tool_message
        .content
        .as_deref()
        .unwrap()
        .contains("unknown or unhandled Ankr function"));

    gaia_first.assert();
    gaia_final.assert();
    // The invoker must refuse before any network attempt.
    ankr.assert();
}

#[tokio::test]
async fn test_fan_out_preserves_declaration_order() {
    let gaia_first = mock("POST", "/t4/v1/chat/completions")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(completion_body(json!({
            "role": "assistant",
            "content": null,
            "tool_calls": [
                {
                    "id": "call_a",
                    "type": "function",
                    "function": {"name": "ankr_getTokenPrice", "arguments": "{\"blockchain\":\"eth\"}"}
                },
                {
                    "id": "call_b",
                    "type": "function",
                    "function": {"name": "ankr_getTokenPrice", "arguments": "{\"blockchain\":\"bsc\"}"}
                }
            ]
        })))
        .expect(1)
        .create();
    let gaia_final = mock("POST", "/t4/v1/chat/completions")
        .match_body(Matcher::Regex("\"role\":\"tool\"".to_string()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(completion_body(json!({
            "role": "assistant",
            "content": "Both prices fetched."
        })))
        .expect(1)
        .create();
    let ankr = mock("POST", "/t4/ankr")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(json!({"jsonrpc": "2.0", "id": 1, "result": {"usdPrice": "1"}}).to_string())
        .expect(2)
        .create();

    let agent = test_agent("t4", 5);
    let result = agent
        .run_turn(agent.seed_history(), "Price of ETH and BNB?")
        .await;

    assert_eq!(
        result.reply,
        TurnReply::Answer("Both prices fetched.".to_string())
    );

    // Exactly one tool message per call, in the order the model declared
    // the calls, each keeping its tool_call_id linkage.
    let tool_ids: Vec<&str> = result
        .history
        .iter()
        .filter(|m| m.role == Role::Tool)
        .map(|m| m.tool_call_id.as_deref().unwrap())
        .collect();
    assert_eq!(tool_ids, vec!["call_a", "call_b"]);

    gaia_first.assert();
    gaia_final.assert();
    ankr.assert();
}

#[tokio::test]
async fn test_tool_loop_round_bound_terminates_turn() {
    // The model always asks for another tool call; the agent must stop
    // after the configured number of rounds without leaving an unanswered
    // call in history.
    let gaia = mock("POST", "/t5/v1/chat/completions")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(completion_body(json!({
            "role": "assistant",
            "content": null,
            "tool_calls": [{
                "id": "call_loop",
                "type": "function",
                "function": {"name": "ankr_getCurrencies", "arguments": "{\"blockchain\":\"eth\"}"}
            }]
        })))
        .expect(3)
        .create();
    let ankr = mock("POST", "/t5/ankr")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(json!({"jsonrpc": "2.0", "id": 1, "result": {"currencies": []}}).to_string())
        .expect(2)
        .create();

    let agent = test_agent("t5", 2);
    let result = agent
        .run_turn(agent.seed_history(), "List currencies forever")
        .await;

    assert_eq!(result.reply, TurnReply::ToolLoopExceeded(2));

    // Two executed rounds: system + user + 2 * (assistant + tool). The
    // third round's pending calls were dropped, not appended.
    assert_eq!(result.history.len(), 6);
    let unanswered = result
        .history
        .iter()
        .filter(|m| m.has_tool_calls())
        .count();
    let answered = result
        .history
        .iter()
        .filter(|m| m.role == Role::Tool)
        .count();
    assert_eq!(unanswered, answered);

    gaia.assert();
    ankr.assert();
}

#[tokio::test]
async fn test_transport_failure_rolls_back_user_message() {
    let gaia = mock("POST", "/t6/v1/chat/completions")
        .with_status(500)
        .with_body("upstream exploded")
        .expect(1)
        .create();

    let agent = test_agent("t6", 5);
    let seed = agent.seed_history();
    let seed_len = seed.len();
    let result = agent.run_turn(seed, "hello?").await;

    assert!(matches!(result.reply, TurnReply::Transient(_)));
    // History is back to the seed so a retry starts clean.
    assert_eq!(result.history.len(), seed_len);

    gaia.assert();
}

#[tokio::test]
async fn test_no_content_no_tool_calls_is_explicit_no_response() {
    let gaia = mock("POST", "/t7/v1/chat/completions")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(completion_body(json!({"role": "assistant", "content": null})))
        .expect(1)
        .create();

    let agent = test_agent("t7", 5);
    let result = agent.run_turn(agent.seed_history(), "hm").await;

    assert_eq!(result.reply, TurnReply::NoResponse);

    gaia.assert();
}
