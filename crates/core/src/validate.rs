//! Per-row validation and the row-level error taxonomy.
//!
//! A row only needs three things to enter the registry: a property name
//! and a finite coordinate pair. Everything else is optional — city and
//! owner fall back to a placeholder instead of failing the row.

use crate::coerce::CoercedRow;

/// Placeholder stored when a non-required text field was not supplied.
pub const NOT_INFORMED: &str = "Não informado";

// ── Error taxonomy ───────────────────────────────────────────────────

/// Classification of a row-level failure.
///
/// All four classes are recoverable: the batch always continues with the
/// next row. The string forms appear verbatim in the event stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowErrorKind {
    /// A required field was absent after coercion.
    MissingFields,
    /// Latitude or longitude did not parse as a finite number.
    InvalidCoordinates,
    /// The external store rejected the persistence call.
    DatabaseError,
    /// Any other failure while processing the row.
    CriticalError,
}

impl RowErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MissingFields => "MISSING_FIELDS",
            Self::InvalidCoordinates => "INVALID_COORDINATES",
            Self::DatabaseError => "DATABASE_ERROR",
            Self::CriticalError => "CRITICAL_ERROR",
        }
    }
}

impl std::fmt::Display for RowErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A classified row failure with its diagnostic message.
#[derive(Debug, Clone)]
pub struct RowError {
    pub kind: RowErrorKind,
    pub message: String,
}

impl RowError {
    pub fn new(kind: RowErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

// ── Validation ───────────────────────────────────────────────────────

/// The validated core of a row: the fields persistence cannot do without.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedRow {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
}

/// Validate a coerced row.
///
/// Required: non-empty `name`, plus latitude and longitude that parse as
/// finite decimals. City and owner name are intentionally NOT checked —
/// absent values later default to [`NOT_INFORMED`].
pub fn validate_row(row: &CoercedRow) -> Result<ValidatedRow, RowError> {
    let name = match row.name.as_deref() {
        Some(name) if !name.is_empty() => name.to_string(),
        _ => {
            return Err(RowError::new(
                RowErrorKind::MissingFields,
                "campo obrigatório ausente: nome",
            ))
        }
    };

    let latitude = parse_finite(row.latitude.as_deref());
    let longitude = parse_finite(row.longitude.as_deref());

    match (latitude, longitude) {
        (Some(latitude), Some(longitude)) => Ok(ValidatedRow {
            name,
            latitude,
            longitude,
        }),
        _ => Err(RowError::new(
            RowErrorKind::InvalidCoordinates,
            format!(
                "coordenadas inválidas: lat={:?} lon={:?}",
                row.latitude, row.longitude
            ),
        )),
    }
}

/// Parse an optional cell as a finite f64.
fn parse_finite(cell: Option<&str>) -> Option<f64> {
    cell.and_then(|c| c.trim().parse::<f64>().ok())
        .filter(|v| v.is_finite())
}

// ── Tests ────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn row(name: Option<&str>, lat: Option<&str>, lon: Option<&str>) -> CoercedRow {
        CoercedRow {
            name: name.map(String::from),
            latitude: lat.map(String::from),
            longitude: lon.map(String::from),
            ..CoercedRow::default()
        }
    }

    #[test]
    fn complete_row_is_valid() {
        let valid = validate_row(&row(Some("Fazenda A"), Some("-23.1"), Some("-51.2"))).unwrap();
        assert_eq!(valid.name, "Fazenda A");
        assert_eq!(valid.latitude, -23.1);
        assert_eq!(valid.longitude, -51.2);
    }

    #[test]
    fn missing_name_is_missing_fields() {
        let err = validate_row(&row(None, Some("1"), Some("2"))).unwrap_err();
        assert_eq!(err.kind, RowErrorKind::MissingFields);
    }

    #[test]
    fn empty_name_is_missing_fields() {
        let err = validate_row(&row(Some(""), Some("1"), Some("2"))).unwrap_err();
        assert_eq!(err.kind, RowErrorKind::MissingFields);
    }

    #[test]
    fn unparseable_latitude_is_invalid_coordinates() {
        let err = validate_row(&row(Some("Fazenda B"), Some("bad"), Some("-51.0"))).unwrap_err();
        assert_eq!(err.kind, RowErrorKind::InvalidCoordinates);
    }

    #[test]
    fn absent_longitude_is_invalid_coordinates() {
        let err = validate_row(&row(Some("Fazenda B"), Some("-23.0"), None)).unwrap_err();
        assert_eq!(err.kind, RowErrorKind::InvalidCoordinates);
    }

    #[test]
    fn non_finite_values_are_invalid() {
        for bad in ["inf", "-inf", "NaN"] {
            let err = validate_row(&row(Some("X"), Some(bad), Some("1"))).unwrap_err();
            assert_eq!(err.kind, RowErrorKind::InvalidCoordinates, "value: {bad}");
        }
    }

    #[test]
    fn missing_name_wins_over_bad_coordinates() {
        // Classification order: presence first, then numeric validity.
        let err = validate_row(&row(None, Some("bad"), None)).unwrap_err();
        assert_eq!(err.kind, RowErrorKind::MissingFields);
    }

    #[test]
    fn city_and_owner_are_not_required() {
        let coerced = row(Some("Fazenda C"), Some("1.0"), Some("2.0"));
        assert!(coerced.cidade.is_none());
        assert!(coerced.owner_name.is_none());
        assert!(validate_row(&coerced).is_ok());
    }

    #[test]
    fn error_kinds_render_their_wire_names() {
        assert_eq!(RowErrorKind::MissingFields.to_string(), "MISSING_FIELDS");
        assert_eq!(
            RowErrorKind::InvalidCoordinates.to_string(),
            "INVALID_COORDINATES"
        );
        assert_eq!(RowErrorKind::DatabaseError.to_string(), "DATABASE_ERROR");
        assert_eq!(RowErrorKind::CriticalError.to_string(), "CRITICAL_ERROR");
    }
}
