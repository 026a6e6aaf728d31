//! Embedded tool-call extraction.
//!
//! Some Llama-style models express a tool call inline in the response text
//! instead of the structured `tool_calls` field, as one or more spans of
//! `<|python_tag|>{"name": ..., "parameters": {...}}<|eom_id|>`. This module
//! extracts those calls and strips the spans from the displayable text.
//!
//! Payload boundaries are found with a small character state machine that
//! tracks brace depth and quoted-string state, so a `}` inside a string
//! value does not terminate the object early. When brace scanning runs off
//! the end of the text, a later end marker is taken as the literal end of
//! the payload; with neither delimiter the span is discarded.

use serde::Deserialize;
use serde_json::Value;
use tracing::warn;
use uuid::Uuid;

use crate::chat::protocol::{FunctionCall, ToolCall};

const TOOL_CALL_START: &str = "<|python_tag|>";
const TOOL_CALL_END: &str = "<|eom_id|>";

/// Wire shape of one embedded payload. Anything that does not decode to
/// this is a parse failure for that span.
#[derive(Deserialize)]
struct EmbeddedCall {
    name: String,
    parameters: serde_json::Map<String, Value>,
}

/// One marker-delimited region of the response text.
struct MarkerSpan {
    /// Byte offset of the start marker.
    start: usize,
    /// Byte offset one past the span, including a trailing end marker.
    end: usize,
    /// Payload byte range, when one could be delimited.
    payload: Option<(usize, usize)>,
}

enum ScanState {
    Scanning,
    InString,
    InEscape,
}

/// Scans forward from `start`, returning the offset one past the brace that
/// closes the first JSON object, or `None` if the text ends before the
/// braces balance. An unescaped quote toggles string state; a quote behind
/// a backslash does not.
fn balanced_object_end(text: &str, start: usize) -> Option<usize> {
    let mut state = ScanState::Scanning;
    let mut depth: u32 = 0;
    let mut entered = false;

    for (idx, ch) in text[start..].char_indices() {
        match state {
            ScanState::InEscape => state = ScanState::InString,
            ScanState::InString => match ch {
                '\\' => state = ScanState::InEscape,
                '"' => state = ScanState::Scanning,
                _ => {}
            },
            ScanState::Scanning => match ch {
                '"' => state = ScanState::InString,
                '{' => {
                    depth += 1;
                    entered = true;
                }
                '}' => {
                    depth = depth.saturating_sub(1);
                    if entered && depth == 0 {
                        return Some(start + idx + ch.len_utf8());
                    }
                }
                _ => {}
            },
        }
    }
    None
}

fn collect_spans(content: &str) -> Vec<MarkerSpan> {
    let mut spans = Vec::new();
    let mut cursor = 0;

    while let Some(rel) = content[cursor..].find(TOOL_CALL_START) {
        let start = cursor + rel;
        let payload_start = start + TOOL_CALL_START.len();

        let (payload, mut end) = match balanced_object_end(content, payload_start) {
            Some(object_end) => (Some((payload_start, object_end)), object_end),
            None => match content[payload_start..].find(TOOL_CALL_END) {
                // Brace scanning ran off the end of the text; the end marker
                // is the literal end of the payload.
                Some(eom_rel) => {
                    let eom = payload_start + eom_rel;
                    (Some((payload_start, eom)), eom + TOOL_CALL_END.len())
                }
                // No delimiter at all; the payload runs to end-of-text and
                // is unusable, but the span is still removed by cleaning.
                None => (None, content.len()),
            },
        };

        // Consume an end marker that immediately follows the object.
        let rest = &content[end..];
        let ws = rest.len() - rest.trim_start().len();
        if rest[ws..].starts_with(TOOL_CALL_END) {
            end += ws + TOOL_CALL_END.len();
        }

        spans.push(MarkerSpan {
            start,
            end,
            payload,
        });
        cursor = end;
    }
    spans
}

/// Extracts every embedded tool call from the response text, in source
/// order. Malformed payloads are skipped with a warning; the scan continues
/// past them rather than aborting the turn.
pub fn extract_tool_calls(content: &str) -> Vec<ToolCall> {
    let mut calls = Vec::new();

    for span in collect_spans(content) {
        let Some((from, to)) = span.payload else {
            warn!("unterminated tool-call payload after marker, discarding span");
            continue;
        };
        let raw = content[from..to].trim();
        match serde_json::from_str::<EmbeddedCall>(raw) {
            Ok(parsed) => calls.push(ToolCall {
                id: format!("tool_call_{}", Uuid::new_v4()),
                call_type: "function".to_string(),
                function: FunctionCall {
                    name: parsed.name,
                    arguments: Value::Object(parsed.parameters).to_string(),
                },
            }),
            Err(err) => {
                warn!("failed to parse embedded tool-call payload: {}", err);
            }
        }
    }
    calls
}

/// Strips every recognized marker-delimited span from the text, whether or
/// not its payload parsed, leaving only the surrounding commentary. Text
/// with no start marker is returned unchanged. If nothing remains after
/// stripping, the result is the empty string.
pub fn clean_content(content: &str) -> String {
    let spans = collect_spans(content);
    if spans.is_empty() {
        return content.to_string();
    }

    let mut cleaned = String::with_capacity(content.len());
    let mut cursor = 0;
    for span in &spans {
        cleaned.push_str(&content[cursor..span.start]);
        cursor = span.end;
    }
    cleaned.push_str(&content[cursor..]);
    cleaned.trim().to_string()
}
