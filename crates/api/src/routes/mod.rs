//! Route composition for the API.

pub mod bulk_import;
pub mod health;

use axum::Router;

use crate::state::AppState;

/// All routes mounted under `/api/v1`.
pub fn api_routes() -> Router<AppState> {
    Router::new().nest("/properties", bulk_import::router())
}
