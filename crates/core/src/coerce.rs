//! Cell coercion: raw CSV text into typed property fields.
//!
//! The uploads mix Brazilian and American conventions freely, so this
//! module owns the messy parts: combined "lat, lon" cells, day-first vs
//! month-first dates, and Portuguese/English boolean tokens. Coercion
//! never fails a row — unusable dates fall back to the registration day
//! and unusable booleans read as false. Presence checks happen later in
//! [`crate::validate`].

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;

use crate::header_map::{self, FieldMapping};

// ── Coerced row ──────────────────────────────────────────────────────

/// One data row after header mapping and coercion.
///
/// String fields hold `None` when the source cell was empty or absent.
/// Coordinates stay textual here; numeric validity is the validator's
/// concern. Headers mapped to a non-canonical target land in `extras`
/// untouched apart from trimming.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CoercedRow {
    pub name: Option<String>,
    pub latitude: Option<String>,
    pub longitude: Option<String>,
    pub cidade: Option<String>,
    pub bairro: Option<String>,
    pub owner_name: Option<String>,
    pub owner_phone: Option<String>,
    pub owner_rg: Option<String>,
    pub equipe: Option<String>,
    pub has_cameras: bool,
    pub cameras_count: Option<String>,
    pub has_wifi: bool,
    pub wifi_password: Option<String>,
    pub activity: Option<String>,
    pub observations: Option<String>,
    pub cadastro_date: NaiveDate,
    pub extras: BTreeMap<String, String>,
}

// ── Row coercion ─────────────────────────────────────────────────────

/// Coerce one tokenized row using the confirmed header mapping.
///
/// Headers are walked left to right; a cell index past the end of the
/// row reads as an absent value. When two headers map to the same field
/// the later one overwrites — mapping collisions are not an error.
///
/// `today` is the fallback for empty or unparseable dates; callers pass
/// the current date, tests pass a fixed one.
pub fn coerce_row(
    headers: &[String],
    row: &[String],
    mapping: &FieldMapping,
    today: NaiveDate,
) -> CoercedRow {
    let mut coerced = CoercedRow {
        cadastro_date: today,
        ..CoercedRow::default()
    };

    for (index, header) in headers.iter().enumerate() {
        let Some(field) = mapping.get(header.trim()) else {
            continue;
        };
        let cell = row.get(index).map(|c| c.trim()).unwrap_or("");

        match field.as_str() {
            header_map::FIELD_COORDINATES_COMBINED => {
                if let Some((lat, lon)) = split_coordinates(cell) {
                    coerced.latitude = Some(lat);
                    coerced.longitude = Some(lon);
                }
            }
            header_map::FIELD_CADASTRO_DATE => {
                coerced.cadastro_date = parse_flexible_date(cell, today);
            }
            header_map::FIELD_HAS_CAMERAS => coerced.has_cameras = parse_bool(cell),
            header_map::FIELD_HAS_WIFI => coerced.has_wifi = parse_bool(cell),
            header_map::FIELD_NAME => coerced.name = non_empty(cell),
            header_map::FIELD_LATITUDE => coerced.latitude = non_empty(cell),
            header_map::FIELD_LONGITUDE => coerced.longitude = non_empty(cell),
            header_map::FIELD_CIDADE => coerced.cidade = non_empty(cell),
            header_map::FIELD_BAIRRO => coerced.bairro = non_empty(cell),
            header_map::FIELD_OWNER_NAME => coerced.owner_name = non_empty(cell),
            header_map::FIELD_OWNER_PHONE => coerced.owner_phone = non_empty(cell),
            header_map::FIELD_OWNER_RG => coerced.owner_rg = non_empty(cell),
            header_map::FIELD_EQUIPE => coerced.equipe = non_empty(cell),
            header_map::FIELD_CAMERAS_COUNT => coerced.cameras_count = non_empty(cell),
            header_map::FIELD_WIFI_PASSWORD => coerced.wifi_password = non_empty(cell),
            header_map::FIELD_ACTIVITY => coerced.activity = non_empty(cell),
            header_map::FIELD_OBSERVATIONS => coerced.observations = non_empty(cell),
            other => {
                if !cell.is_empty() {
                    coerced.extras.insert(other.to_string(), cell.to_string());
                }
            }
        }
    }

    coerced
}

fn non_empty(cell: &str) -> Option<String> {
    if cell.is_empty() {
        None
    } else {
        Some(cell.to_string())
    }
}

// ── Combined coordinates ─────────────────────────────────────────────

/// Split a combined coordinate cell into (latitude, longitude) text.
///
/// The cell is split on any run of whitespace, commas, or semicolons.
/// Anything other than exactly two tokens leaves the coordinates unset
/// rather than guessing.
pub fn split_coordinates(cell: &str) -> Option<(String, String)> {
    let tokens: Vec<&str> = cell
        .split(|c: char| c.is_whitespace() || c == ',' || c == ';')
        .filter(|t| !t.is_empty())
        .collect();

    match tokens.as_slice() {
        [lat, lon] => Some((lat.to_string(), lon.to_string())),
        _ => None,
    }
}

// ── Dates ────────────────────────────────────────────────────────────

/// Parse a slash-separated date that may be day-first or month-first.
///
/// Disambiguation: a first component above 12 can only be a day; failing
/// that, a second component above 12 forces the American month-first
/// reading; a genuinely ambiguous date is read day-first, which is the
/// dominant convention in the source data. A trailing time-of-day is
/// discarded. Anything unparseable falls back to `today` — a bad date is
/// never worth losing the row over.
pub fn parse_flexible_date(cell: &str, today: NaiveDate) -> NaiveDate {
    let date_part = match cell.split_whitespace().next() {
        Some(part) => part,
        None => return today,
    };

    let components: Vec<&str> = date_part.split('/').collect();
    let [first, second, third] = components.as_slice() else {
        return today;
    };

    let (Ok(a), Ok(b), Ok(year)) = (
        first.parse::<u32>(),
        second.parse::<u32>(),
        third.parse::<i32>(),
    ) else {
        return today;
    };

    let (day, month) = if a > 12 {
        (a, b)
    } else if b > 12 {
        (b, a)
    } else {
        // Ambiguous: read day-first.
        (a, b)
    };

    if !(1..=31).contains(&day) || !(1..=12).contains(&month) {
        return today;
    }

    NaiveDate::from_ymd_opt(year, month, day).unwrap_or(today)
}

// ── Booleans ─────────────────────────────────────────────────────────

/// True iff the trimmed, lowercased cell is an affirmative token.
///
/// Everything else — including empty cells, "não", and "0" — is false.
pub fn parse_bool(cell: &str) -> bool {
    matches!(cell.trim().to_lowercase().as_str(), "sim" | "true" | "yes")
}

// ── Tests ────────────────────────────────────────────────────────────
