//! Stand-in for the translation capability, for local runs.
//! POST {"message": t} -> {"translated_message": t}.

use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::Utc;
use serde::Deserialize;
use std::net::SocketAddr;

#[derive(Deserialize)]
struct CapabilityRequest {
    message: Option<String>,
}

#[tokio::main]
async fn main() {
    let app = Router::new()
        .route("/", post(translate))
        .route("/health", get(health_check));

    let addr = SocketAddr::from(([127, 0, 0, 1], 7000));
    println!("translation capability listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}

async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "timestamp": Utc::now().to_rfc3339(),
    }))
}

/// Dummy translation: returns the input unchanged.
async fn translate(
    Json(request): Json<CapabilityRequest>,
) -> (StatusCode, Json<serde_json::Value>) {
    match request.message {
        Some(message) => (
            StatusCode::OK,
            Json(serde_json::json!({ "translated_message": message })),
        ),
        None => (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({ "error": "missing message field" })),
        ),
    }
}
