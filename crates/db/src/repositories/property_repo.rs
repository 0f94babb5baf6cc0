//! Repository for property records.
//!
//! The import pipeline creates records and checks for duplicates; it
//! never updates or deletes, so those are the only two queries here.

use ronda_core::types::DbId;
use sqlx::PgPool;

use crate::models::property::NewProperty;

/// Provides the store operations the import pipeline needs.
pub struct PropertyRepo;

impl PropertyRepo {
    /// Look up an existing record matching the dedupe key: name and
    /// city case-insensitively, coordinates exactly.
    ///
    /// Best-effort only — there is no lock between this check and a
    /// subsequent insert, so concurrent imports can still both pass.
    pub async fn find_duplicate(
        pool: &PgPool,
        name: &str,
        latitude: f64,
        longitude: f64,
        cidade: &str,
    ) -> Result<Option<DbId>, sqlx::Error> {
        sqlx::query_scalar::<_, DbId>(
            "SELECT id FROM properties \
             WHERE lower(name) = lower($1) \
               AND latitude = $2 \
               AND longitude = $3 \
               AND lower(cidade) = lower($4) \
             LIMIT 1",
        )
        .bind(name)
        .bind(latitude)
        .bind(longitude)
        .bind(cidade)
        .fetch_optional(pool)
        .await
    }

    /// Create a property via the `create_property_profile` stored
    /// procedure, returning the new record id.
    pub async fn create_profile(
        pool: &PgPool,
        input: &NewProperty,
    ) -> Result<DbId, sqlx::Error> {
        sqlx::query_scalar::<_, DbId>(
            "SELECT create_property_profile( \
                $1, $2, $3, $4, $5, $6, $7, $8, $9, $10, \
                $11, $12, $13, $14, $15, $16, $17, $18, $19, $20)",
        )
        .bind(&input.name)
        .bind(input.latitude)
        .bind(input.longitude)
        .bind(&input.cidade)
        .bind(&input.bairro)
        .bind(&input.owner_name)
        .bind(&input.owner_phone)
        .bind(&input.owner_rg)
        .bind(&input.equipe)
        .bind(input.has_cameras)
        .bind(input.cameras_count)
        .bind(input.has_wifi)
        .bind(&input.wifi_password)
        .bind(&input.activity)
        .bind(&input.observations)
        .bind(input.cadastro_date)
        .bind(&input.extras)
        .bind(input.org_id)
        .bind(input.team_id)
        .bind(input.created_by)
        .fetch_one(pool)
        .await
    }
}
