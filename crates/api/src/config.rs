use ronda_core::types::DbId;

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS`.
    /// The single entry `*` selects a fully permissive policy.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Graceful shutdown timeout in seconds (default: `30`).
    pub shutdown_timeout_secs: u64,
    /// Bulk-import tuning and organizational identity.
    pub import: ImportSettings,
}

/// Tuning knobs and caller identity for the import orchestrator.
///
/// Passed into the engine at construction; nothing in the pipeline reads
/// process-wide state.
#[derive(Debug, Clone)]
pub struct ImportSettings {
    /// Delay between rows, throttling load on the store (default: `50`).
    pub row_throttle_ms: u64,
    /// Optional hard cap on processed rows per upload (default: none).
    pub row_cap: Option<usize>,
    /// Organizational unit recorded on every created property.
    pub org_id: DbId,
    /// Patrol team recorded on every created property.
    pub team_id: DbId,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                  | Default   |
    /// |--------------------------|-----------|
    /// | `HOST`                   | `0.0.0.0` |
    /// | `PORT`                   | `3000`    |
    /// | `CORS_ORIGINS`           | `*`       |
    /// | `REQUEST_TIMEOUT_SECS`   | `30`      |
    /// | `SHUTDOWN_TIMEOUT_SECS`  | `30`      |
    /// | `IMPORT_ROW_THROTTLE_MS` | `50`      |
    /// | `IMPORT_ROW_CAP`         | unset     |
    /// | `ORG_ID`                 | `1`       |
    /// | `TEAM_ID`                | `1`       |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "*".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let shutdown_timeout_secs: u64 = std::env::var("SHUTDOWN_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("SHUTDOWN_TIMEOUT_SECS must be a valid u64");

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            shutdown_timeout_secs,
            import: ImportSettings::from_env(),
        }
    }
}

impl ImportSettings {
    /// Load import tuning from environment variables with defaults.
    pub fn from_env() -> Self {
        let row_throttle_ms: u64 = std::env::var("IMPORT_ROW_THROTTLE_MS")
            .unwrap_or_else(|_| "50".into())
            .parse()
            .expect("IMPORT_ROW_THROTTLE_MS must be a valid u64");

        let row_cap: Option<usize> = std::env::var("IMPORT_ROW_CAP")
            .ok()
            .map(|v| v.parse().expect("IMPORT_ROW_CAP must be a valid usize"));

        let org_id: DbId = std::env::var("ORG_ID")
            .unwrap_or_else(|_| "1".into())
            .parse()
            .expect("ORG_ID must be a valid i64");

        let team_id: DbId = std::env::var("TEAM_ID")
            .unwrap_or_else(|_| "1".into())
            .parse()
            .expect("TEAM_ID must be a valid i64");

        Self {
            row_throttle_ms,
            row_cap,
            org_id,
            team_id,
        }
    }
}
