/// Primary keys in the registry store are PostgreSQL BIGSERIAL.
pub type DbId = i64;

/// Timestamps are always UTC on the wire and in the store.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
