//! Property record DTOs.
//!
//! The registry row itself is owned by the store; the import pipeline
//! only ever creates records, so the single DTO here is the input to the
//! `create_property_profile` stored procedure.

use chrono::NaiveDate;
use ronda_core::coerce::CoercedRow;
use ronda_core::types::DbId;
use ronda_core::validate::{ValidatedRow, NOT_INFORMED};
use serde::Serialize;
use uuid::Uuid;

/// Input to `create_property_profile`: the full coerced field set plus
/// the caller's organizational identifiers and a generated creator
/// identity.
#[derive(Debug, Clone, Serialize)]
pub struct NewProperty {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub cidade: String,
    pub bairro: Option<String>,
    pub owner_name: String,
    pub owner_phone: Option<String>,
    pub owner_rg: Option<String>,
    pub equipe: Option<String>,
    pub has_cameras: bool,
    pub cameras_count: Option<i32>,
    pub has_wifi: bool,
    pub wifi_password: Option<String>,
    pub activity: Option<String>,
    pub observations: Option<String>,
    pub cadastro_date: NaiveDate,
    pub extras: serde_json::Value,
    pub org_id: DbId,
    pub team_id: DbId,
    pub created_by: Uuid,
}

impl NewProperty {
    /// Assemble the DTO from a validated row.
    ///
    /// City and owner name default to [`NOT_INFORMED`] when the upload
    /// left them blank; a camera count that is not a plain integer is
    /// dropped rather than failing the row.
    pub fn from_row(
        valid: &ValidatedRow,
        row: &CoercedRow,
        org_id: DbId,
        team_id: DbId,
        created_by: Uuid,
    ) -> Self {
        Self {
            name: valid.name.clone(),
            latitude: valid.latitude,
            longitude: valid.longitude,
            cidade: row.cidade.clone().unwrap_or_else(|| NOT_INFORMED.to_string()),
            bairro: row.bairro.clone(),
            owner_name: row
                .owner_name
                .clone()
                .unwrap_or_else(|| NOT_INFORMED.to_string()),
            owner_phone: row.owner_phone.clone(),
            owner_rg: row.owner_rg.clone(),
            equipe: row.equipe.clone(),
            has_cameras: row.has_cameras,
            cameras_count: row
                .cameras_count
                .as_deref()
                .and_then(|c| c.trim().parse::<i32>().ok()),
            has_wifi: row.has_wifi,
            wifi_password: row.wifi_password.clone(),
            activity: row.activity.clone(),
            observations: row.observations.clone(),
            cadastro_date: row.cadastro_date,
            extras: serde_json::to_value(&row.extras)
                .unwrap_or_else(|_| serde_json::Value::Object(Default::default())),
            org_id,
            team_id,
            created_by,
        }
    }
}

// ── Tests ────────────────────────────────────────────────────────────
