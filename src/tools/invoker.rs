// src/tools/invoker.rs

use std::sync::atomic::{AtomicU64, Ordering};

use reqwest::Client;
use serde_json::{json, Value};
use tracing::{debug, error, info};

use crate::tools::params;

const ANKR_RPC_BASE_URL: &str = "https://rpc.ankr.com/multichain";

/// Client for the Ankr Advanced API (JSON-RPC over HTTPS, API key embedded
/// in the endpoint path).
///
/// Every outcome of [`AnkrClient::call`] — success payload, remote error,
/// transport failure, unknown tool — is returned as a JSON value so the
/// orchestrator can fold it into a tool-role message without branching on
/// a transport `Result`. Exactly one network attempt is made per
/// invocation; retry policy, if any, belongs to the caller.
pub struct AnkrClient {
    http: Client,
    endpoint: String,
    /// Request ids are unique per client instance, not process-global.
    next_id: AtomicU64,
}

impl AnkrClient {
    pub fn new(http: Client, api_key: &str) -> Self {
        Self::with_endpoint(http, format!("{}/{}", ANKR_RPC_BASE_URL, api_key))
    }

    /// Builds a client against an explicit endpoint URL. Used by tests to
    /// point at a local mock server.
    pub fn with_endpoint(http: Client, endpoint: String) -> Self {
        Self {
            http,
            endpoint,
            next_id: AtomicU64::new(1),
        }
    }

    /// Executes one tool call and returns a foldable result value.
    pub async fn call(&self, name: &str, args: &Value) -> Value {
        info!("calling Ankr tool: {}", name);

        let params = match params::build_params(name, args) {
            Some(p) => p,
            None => {
                error!("unknown or unhandled Ankr function: {}", name);
                return json!({
                    "error": "unknown or unhandled Ankr function",
                    "functionName": name,
                    "args": args,
                });
            }
        };

        let payload = json!({
            "id": self.next_id.fetch_add(1, Ordering::Relaxed),
            "jsonrpc": "2.0",
            "method": name,
            "params": params,
        });
        debug!("sending to Ankr: {}", payload);

        let response = match self.http.post(&self.endpoint).json(&payload).send().await {
            Ok(resp) => resp,
            Err(e) => {
                error!("error calling Ankr API for {}: {}", name, e);
                return json!({
                    "error": "failed to call Ankr API",
                    "details": e.to_string(),
                });
            }
        };

        let status = response.status();
        let body: Value = response
            .json()
            .await
            .unwrap_or_else(|_| json!({"ok": status.is_success()}));

        if !status.is_success() || body.get("error").is_some() {
            let details = body.get("error").cloned().unwrap_or_else(|| {
                json!({
                    "code": status.as_u16(),
                    "message": status.canonical_reason().unwrap_or("unknown"),
                })
            });
            error!("Ankr API error for {}: {}", name, details);
            return json!({
                "error": "Ankr API error",
                "details": details,
            });
        }

        debug!("received from Ankr: {}", body);
        body.get("result").cloned().unwrap_or(Value::Null)
    }
}
