//! Route definitions for the health check endpoint.
//!
//! Mounted at the application root, outside `/api/v1`.

use axum::routing::get;
use axum::Router;

use crate::handlers::health;
use crate::state::AppState;

/// Routes mounted at `/`.
///
/// ```text
/// GET /health -> health_check
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health::health_check))
}
