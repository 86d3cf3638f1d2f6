//! Health / readiness endpoint.

use axum::Json;
use axum::extract::State;

use crate::state::AppState;

/// GET /health — liveness plus which optional integrations are wired.
pub async fn health(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "telegram": state.notifier.is_some(),
    }))
}
