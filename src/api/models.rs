use axum::{response::IntoResponse, Json};
use serde_json::json;

// The handler function for the GET /api/models endpoint. Returns the
// catalog of Gaia model domains a client can pass as the `model` field of
// a chat request.
pub async fn list_models_handler() -> impl IntoResponse {
    Json(json!([
        {
            "id": "metamask",
            "name": "MetaMask AI",
            "provider": "Gaia",
            "description": "AI model specialized for MetaMask and Ethereum interactions",
            "baseURL": "https://metamask.gaia.domains/v1",
        },
        {
            "id": "base",
            "name": "Base AI",
            "provider": "Gaia",
            "description": "AI model optimized for Base blockchain development",
            "baseURL": "https://base.gaia.domains/v1",
        },
        {
            "id": "polygon",
            "name": "Polygon AI",
            "provider": "Gaia",
            "description": "AI model specialized for Polygon ecosystem",
            "baseURL": "https://polygon.gaia.domains/v1",
        },
        {
            "id": "scroll",
            "name": "Scroll AI",
            "provider": "Gaia",
            "description": "AI model for Scroll L2 blockchain interactions",
            "baseURL": "https://scroll.gaia.domains/v1",
        },
        {
            "id": "zksync",
            "name": "zkSync AI",
            "provider": "Gaia",
            "description": "AI model specialized for zkSync Era development",
            "baseURL": "https://zksync.gaia.domains/v1",
        },
    ]))
}
