use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::state::AppState;

/// GET /health
/// Returns service version, the SSG endpoint in use and whether a session is loaded.
pub async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    let session_loaded = state.session.read().await.is_some();
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "service": "ssg-demo-api",
        "endpoint": state.config.base_url,
        "session_loaded": session_loaded
    }))
}
