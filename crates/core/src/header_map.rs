//! Header-to-field mapping for CSV uploads.
//!
//! Spreadsheets arrive with whatever column titles the patrol teams typed
//! in, in Portuguese or English, so an ordered table of case-insensitive
//! full-match patterns suggests a canonical field per header. The first
//! matching pattern wins; table order therefore encodes specificity
//! (e.g. "qtd câmeras" must resolve before the bare "câmeras" pattern).
//!
//! Suggestions are advisory: the import endpoint receives the final
//! mapping back from the caller and applies it verbatim.

use std::collections::BTreeMap;
use std::sync::OnceLock;

use regex::Regex;

// ── Canonical fields ─────────────────────────────────────────────────

pub const FIELD_NAME: &str = "name";
pub const FIELD_LATITUDE: &str = "latitude";
pub const FIELD_LONGITUDE: &str = "longitude";
pub const FIELD_COORDINATES_COMBINED: &str = "coordinates_combined";
pub const FIELD_CIDADE: &str = "cidade";
pub const FIELD_BAIRRO: &str = "bairro";
pub const FIELD_OWNER_NAME: &str = "owner_name";
pub const FIELD_OWNER_PHONE: &str = "owner_phone";
pub const FIELD_OWNER_RG: &str = "owner_rg";
pub const FIELD_EQUIPE: &str = "equipe";
pub const FIELD_HAS_CAMERAS: &str = "has_cameras";
pub const FIELD_CAMERAS_COUNT: &str = "cameras_count";
pub const FIELD_HAS_WIFI: &str = "has_wifi";
pub const FIELD_WIFI_PASSWORD: &str = "wifi_password";
pub const FIELD_ACTIVITY: &str = "activity";
pub const FIELD_OBSERVATIONS: &str = "observations";
pub const FIELD_CADASTRO_DATE: &str = "cadastro_date";

/// Mapping from raw CSV header to canonical field name.
///
/// Headers absent from the map are ignored during coercion. Two headers
/// mapping to the same field is not an error; the value from the last
/// such header (in left-to-right header order) wins.
pub type FieldMapping = BTreeMap<String, String>;

// ── Pattern table ────────────────────────────────────────────────────

/// Ordered (pattern, field) pairs. Evaluation is first-match-wins, so
/// narrower patterns sit above the broader ones they would otherwise
/// lose to.
const PATTERN_TABLE: &[(&str, &str)] = &[
    (
        r"coordenadas?|coordinates?|coords?|gps|lat[\s/_-]*lon[g]?",
        FIELD_COORDINATES_COMBINED,
    ),
    (
        r"(qtde?|quantidade|n[uú]mero|total)[\s_-]*(de[\s_-]*)?c[aâ]meras?|c[aâ]meras?[\s_-]*count",
        FIELD_CAMERAS_COUNT,
    ),
    (
        r"(tem|possui|has)[\s_-]*c[aâ]meras?\??|c[aâ]meras?\??",
        FIELD_HAS_CAMERAS,
    ),
    (
        r"senha([\s_-]*(do[\s_-]*)?wi-?fi)?|wi-?fi[\s_-]*(senha|password)|password",
        FIELD_WIFI_PASSWORD,
    ),
    (
        r"(tem|possui|has)[\s_-]*wi-?fi\??|wi-?fi\??",
        FIELD_HAS_WIFI,
    ),
    (r"lat|latitude", FIELD_LATITUDE),
    (r"lon|lng|long|longitude", FIELD_LONGITUDE),
    (
        r"nome([\s_-]*(da[\s_-]*)?propriedade)?|propriedade|fazenda|s[ií]tio|name",
        FIELD_NAME,
    ),
    (r"cidade|munic[ií]pio|city", FIELD_CIDADE),
    (r"bairro|distrito|localidade", FIELD_BAIRRO),
    (
        r"propriet[aá]ri[oa]|dono|respons[aá]vel|owner([\s_-]*name)?",
        FIELD_OWNER_NAME,
    ),
    (
        r"(tele)?fone|celular|contato|phone",
        FIELD_OWNER_PHONE,
    ),
    (r"rg|documento", FIELD_OWNER_RG),
    (r"equipe|team", FIELD_EQUIPE),
    (
        r"atividade|cultura|produ[cç][aã]o|activity",
        FIELD_ACTIVITY,
    ),
    (
        r"observa[cç][aã]o|observa[cç][oõ]es|obs\.?|notas?",
        FIELD_OBSERVATIONS,
    ),
    (
        r"data([\s_-]*(de[\s_-]*)?cadastro)?|cadastro|date",
        FIELD_CADASTRO_DATE,
    ),
];

/// Compiled pattern table, anchored for full-match and case-insensitive.
fn compiled_table() -> &'static Vec<(Regex, &'static str)> {
    static TABLE: OnceLock<Vec<(Regex, &'static str)>> = OnceLock::new();
    TABLE.get_or_init(|| {
        PATTERN_TABLE
            .iter()
            .map(|(pattern, field)| {
                let anchored = format!("(?i)^(?:{pattern})$");
                // Patterns are compile-time constants; a bad one is a bug.
                (Regex::new(&anchored).expect("invalid header pattern"), *field)
            })
            .collect()
    })
}

// ── Suggestion ───────────────────────────────────────────────────────

/// Suggest a canonical field for one raw header, or `None` when no
/// pattern matches the trimmed header text.
pub fn suggest_field(header: &str) -> Option<&'static str> {
    let trimmed = header.trim();
    compiled_table()
        .iter()
        .find(|(regex, _)| regex.is_match(trimmed))
        .map(|(_, field)| *field)
}

/// Build the advisory mapping for a full header row.
///
/// Headers with no matching pattern are simply omitted.
pub fn suggest_mappings(headers: &[String]) -> FieldMapping {
    let mut mapping = FieldMapping::new();
    for header in headers {
        if let Some(field) = suggest_field(header) {
            mapping.insert(header.clone(), field.to_string());
        }
    }
    mapping
}

// ── Tests ────────────────────────────────────────────────────────────
