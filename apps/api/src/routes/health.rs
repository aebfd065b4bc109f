use axum::{extract::State, Json};
use chrono::Utc;
use serde_json::{json, Value};
use tracing::warn;

use crate::state::AppState;

/// GET /health
/// Returns a simple status object with service version.
pub async fn health_handler() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "service": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": Utc::now(),
    }))
}

/// GET /health/llm
/// Probes the model server. Always 200; the body says whether it answered.
pub async fn llm_health_handler(State(state): State<AppState>) -> Json<Value> {
    let url = state.llm.base_url().to_string();
    match state.llm.list_models().await {
        Ok(models) => Json(json!({
            "status": "connected",
            "url": url,
            "model": state.llm.model(),
            "models_available": models.len(),
        })),
        Err(e) => {
            warn!("LLM health check failed: {e}");
            Json(json!({
                "status": "error",
                "url": url,
                "error": e.to_string(),
            }))
        }
    }
}
