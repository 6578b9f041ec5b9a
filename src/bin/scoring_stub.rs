//! Stand-in for the scoring capability, for local runs.
//! POST {"message": t} -> {"score": s} with s drawn uniformly from [0, 1].

use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::Utc;
use rand::Rng;
use serde::Deserialize;
use std::net::SocketAddr;

#[derive(Deserialize)]
struct CapabilityRequest {
    message: Option<String>,
}

#[tokio::main]
async fn main() {
    let app = Router::new()
        .route("/", post(score))
        .route("/health", get(health_check));

    let addr = SocketAddr::from(([127, 0, 0, 1], 8000));
    println!("scoring capability listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}

async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "timestamp": Utc::now().to_rfc3339(),
    }))
}

/// Dummy scoring: a uniform random toxicity score in [0, 1].
async fn score(Json(request): Json<CapabilityRequest>) -> (StatusCode, Json<serde_json::Value>) {
    match request.message {
        Some(_) => {
            let score: f64 = rand::thread_rng().gen_range(0.0..=1.0);
            (StatusCode::OK, Json(serde_json::json!({ "score": score })))
        }
        None => (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({ "error": "missing message field" })),
        ),
    }
}
