//! Handler for the health check endpoint.

use axum::extract::State;
use axum::Json;
use serde_json::json;

use crate::state::AppState;

/// GET /health
///
/// Always returns 200; `db_healthy` reports a best-effort connectivity
/// probe so monitoring can distinguish "up" from "up and can persist".
pub async fn health_check(State(state): State<AppState>) -> Json<serde_json::Value> {
    let db_healthy = ronda_db::health_check(&state.pool).await.is_ok();

    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "db_healthy": db_healthy,
    }))
}
