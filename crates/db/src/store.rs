//! The store seam between the import orchestrator and PostgreSQL.
//!
//! The orchestrator is generic over [`PropertyStore`] so the per-row
//! state machine can be exercised against an in-memory store in tests.
//! [`SqlxPropertyStore`] is the production implementation.

use async_trait::async_trait;
use ronda_core::types::DbId;

use crate::models::property::NewProperty;
use crate::repositories::PropertyRepo;
use crate::DbPool;

/// A store failure whose message is surfaced verbatim to the caller in
/// `error_detail` events.
#[derive(Debug, thiserror::Error)]
#[error("{message}")]
pub struct StoreError {
    pub message: String,
}

impl StoreError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        Self::new(err.to_string())
    }
}

/// External record store as seen by the import pipeline.
#[async_trait]
pub trait PropertyStore: Send + Sync {
    /// Find a record matching (name, coordinates, city); name and city
    /// compare case-insensitively, coordinates exactly.
    async fn find_duplicate(
        &self,
        name: &str,
        latitude: f64,
        longitude: f64,
        cidade: &str,
    ) -> Result<Option<DbId>, StoreError>;

    /// Persist one property via the stored procedure, returning its id.
    async fn create_profile(&self, input: &NewProperty) -> Result<DbId, StoreError>;
}

/// Production [`PropertyStore`] backed by the sqlx connection pool.
#[derive(Clone)]
pub struct SqlxPropertyStore {
    pool: DbPool,
}

impl SqlxPropertyStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PropertyStore for SqlxPropertyStore {
    async fn find_duplicate(
        &self,
        name: &str,
        latitude: f64,
        longitude: f64,
        cidade: &str,
    ) -> Result<Option<DbId>, StoreError> {
        PropertyRepo::find_duplicate(&self.pool, name, latitude, longitude, cidade)
            .await
            .map_err(StoreError::from)
    }

    async fn create_profile(&self, input: &NewProperty) -> Result<DbId, StoreError> {
        PropertyRepo::create_profile(&self.pool, input)
            .await
            .map_err(StoreError::from)
    }
}
