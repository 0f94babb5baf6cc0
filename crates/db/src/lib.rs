//! Database access layer for the property registry.
//!
//! Exposes pool construction helpers, the [`store::PropertyStore`] seam
//! used by the import orchestrator, and the sqlx-backed repository that
//! talks to PostgreSQL. Schema and the `create_property_profile` stored
//! procedure live in `migrations/`.

pub mod models;
pub mod repositories;
pub mod store;

use sqlx::postgres::PgPoolOptions;

/// Shared connection pool type used across the workspace.
pub type DbPool = sqlx::PgPool;

/// Maximum connections per pool. Imports run rows sequentially, so the
/// pool stays small even under concurrent requests.
const MAX_CONNECTIONS: u32 = 10;

/// Create a connection pool and establish an initial connection.
pub async fn create_pool(database_url: &str) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(MAX_CONNECTIONS)
        .connect(database_url)
        .await
}

/// Create a pool without connecting.
///
/// Connections are established on first use; handlers that never touch
/// the store (analyze mode) work even when the database is down. The
/// short acquire timeout keeps best-effort probes (health) from
/// stalling on an unreachable store.
pub fn create_pool_lazy(database_url: &str) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(MAX_CONNECTIONS)
        .acquire_timeout(std::time::Duration::from_secs(2))
        .connect_lazy(database_url)
}

/// Round-trip health probe.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await.map(|_| ())
}

/// Apply pending migrations from `crates/db/migrations`.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}
