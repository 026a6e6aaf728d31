//! Handler-level tests for the HTTP surface.

use axum::{
    body::{to_bytes, Body},
    http::{Method, Request, StatusCode},
    routing::{get, post},
    Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

use gaia_ankr_agent::{
    agent::Agent,
    api::{chat::chat_handler, health::health_handler, models::list_models_handler},
    config::Config,
    AppState,
};

fn create_test_app() -> Router {
    // The upstream endpoints are unroutable; tests that reach them expect
    // the handler to surface an upstream failure.
    let config = Config {
        port: 0,
        gaia_api_key: "test-key".to_string(),
        gaia_api_endpoint: "http://127.0.0.1:1/v1".to_string(),
        gaia_model_name: "llama70b".to_string(),
        ankr_api_key: "test-ankr-key".to_string(),
        temperature: None,
        max_tool_rounds: 5,
    };
    let state = AppState {
        agent: Arc::new(Agent::new(&config)),
        config,
    };

    let api_router = Router::new()
        .route("/health", get(health_handler))
        .route("/models", get(list_models_handler))
        .route("/chat", post(chat_handler));

    Router::new().nest("/api", api_router).with_state(state)
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_health_endpoint() {
    let app = create_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .method(Method::GET)
                .uri("/api/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!({"status": "ok"}));
}

#[tokio::test]
async fn test_models_catalog() {
    let app = create_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .method(Method::GET)
                .uri("/api/models")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let models = body_json(response).await;
    let models = models.as_array().unwrap();
    assert_eq!(models.len(), 5);
    for model in models {
        assert!(model["id"].is_string());
        assert!(model["name"].is_string());
        assert_eq!(model["provider"], "Gaia");
        assert!(model["baseURL"].as_str().unwrap().starts_with("https://"));
    }
}

#[tokio::test]
async fn test_chat_rejects_empty_messages() {
    let app = create_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .method(Method::POST)
                .uri("/api/chat")
                .header("Content-Type", "application/json")
                .body(Body::from(json!({"messages": []}).to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_chat_rejects_history_not_ending_with_user() {
    let app = create_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .method(Method::POST)
                .uri("/api/chat")
                .header("Content-Type", "application/json")
                .body(Body::from(
                    json!({"messages": [{"role": "assistant", "content": "hi"}]}).to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_chat_upstream_failure_is_bad_gateway() {
    let app = create_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .method(Method::POST)
                .uri("/api/chat")
                .header("Content-Type", "application/json")
                .body(Body::from(
                    json!({"messages": [{"role": "user", "content": "hello"}]}).to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let body = body_json(response).await;
    assert!(body["error"]
        .as_str()
        .unwrap()
        .contains("upstream chat endpoint failed"));
}
