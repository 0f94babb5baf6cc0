//! Route definitions for the CSV bulk-import endpoint.
//!
//! Mounted at `/properties`.

use axum::routing::post;
use axum::Router;

use crate::handlers::bulk_import;
use crate::state::AppState;

/// Routes mounted at `/properties`.
///
/// ```text
/// POST /bulk-import -> bulk_import (multipart; analyze or import)
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/bulk-import", post(bulk_import::bulk_import))
}
