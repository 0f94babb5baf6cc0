//! Handler for the CSV bulk-import endpoint.
//!
//! One multipart endpoint serves both phases of the import flow:
//!
//! - `action=analyze` — tokenize the upload and return headers, a small
//!   sample, and advisory header-to-field suggestions in one JSON body.
//!   The caller reviews and edits the mapping before importing.
//! - `action=import` — run the full pipeline with the caller-confirmed
//!   mapping, streaming one JSON event per line over a chunked
//!   `text/plain` body while rows are processed.
//!
//! Setup failures (missing file, empty upload, missing mapping) are
//! plain 400 responses; once the stream has started, all failures are
//! reported as events and the response stays 200.

use std::convert::Infallible;

use axum::body::Body;
use axum::extract::{Multipart, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use futures::StreamExt;
use serde::Serialize;

use ronda_core::error::CoreError;
use ronda_core::header_map::{self, FieldMapping};
use ronda_core::parse::{parse_table, ParsedTable};
use ronda_db::store::SqlxPropertyStore;
use ronda_events::{ndjson_lines, EventSink};

use crate::engine::{ImportJob, ImportOrchestrator};
use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Rows included in the analyze preview.
const SAMPLE_ROWS: usize = 5;

// ── Request parsing ──────────────────────────────────────────────────

/// Which phase of the import flow the caller requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ImportAction {
    Analyze,
    Import,
}

impl ImportAction {
    fn parse(raw: &str) -> Result<Self, AppError> {
        match raw {
            "analyze" => Ok(Self::Analyze),
            "import" => Ok(Self::Import),
            other => Err(AppError::BadRequest(format!(
                "unknown action '{other}'; expected 'analyze' or 'import'"
            ))),
        }
    }
}

/// Collected multipart fields, before validation.
#[derive(Debug, Default)]
struct BulkImportForm {
    file_text: Option<String>,
    action: Option<String>,
    column_mapping: Option<String>,
    skip_existing: bool,
    verbose: bool,
}

impl BulkImportForm {
    async fn from_multipart(mut multipart: Multipart) -> AppResult<Self> {
        let mut form = Self::default();

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| AppError::BadRequest(e.to_string()))?
        {
            let name = field.name().unwrap_or_default().to_string();
            match name.as_str() {
                "file" => {
                    let bytes = field
                        .bytes()
                        .await
                        .map_err(|e| AppError::BadRequest(e.to_string()))?;
                    form.file_text = Some(String::from_utf8_lossy(&bytes).into_owned());
                }
                "action" => form.action = Some(read_text(field).await?),
                "columnMapping" => form.column_mapping = Some(read_text(field).await?),
                "skipExisting" => form.skip_existing = read_text(field).await? == "true",
                "verbose" => form.verbose = read_text(field).await? == "true",
                // Unknown fields are ignored.
                _ => {}
            }
        }

        Ok(form)
    }
}

async fn read_text(field: axum::extract::multipart::Field<'_>) -> AppResult<String> {
    field
        .text()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))
}

// ── Analyze response ─────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct AnalyzeResponse {
    success: bool,
    data: AnalyzeData,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AnalyzeData {
    headers: Vec<String>,
    sample_data: Vec<Vec<String>>,
    suggested_mappings: FieldMapping,
    total_rows: usize,
}

// ── Handler ──────────────────────────────────────────────────────────

/// POST /api/v1/properties/bulk-import
///
/// Multipart fields: `file` (raw CSV), `action` ("analyze"|"import"),
/// and for import: `columnMapping` (JSON object), `skipExisting`
/// ("true"|"false"), `verbose` ("true" enables per-row diagnostics).
pub async fn bulk_import(
    State(state): State<AppState>,
    multipart: Multipart,
) -> AppResult<Response> {
    let form = BulkImportForm::from_multipart(multipart).await?;

    let text = form
        .file_text
        .ok_or_else(|| AppError::BadRequest("multipart field 'file' is required".to_string()))?;
    let action = form
        .action
        .as_deref()
        .map(ImportAction::parse)
        .transpose()?
        .ok_or_else(|| {
            AppError::BadRequest("multipart field 'action' is required".to_string())
        })?;

    let table = parse_table(&text)?;

    match action {
        ImportAction::Analyze => Ok(analyze(table).into_response()),
        ImportAction::Import => {
            let mapping_raw = form
                .column_mapping
                .filter(|m| !m.trim().is_empty())
                .ok_or(AppError::MissingMapping)?;
            let mapping: FieldMapping = serde_json::from_str(&mapping_raw).map_err(|e| {
                CoreError::Validation(format!("invalid columnMapping JSON: {e}"))
            })?;

            start_import(&state, table, mapping, form.skip_existing, form.verbose)
        }
    }
}

/// Build the analyze response: headers, a short sample, and advisory
/// mapping suggestions for the caller to confirm or edit.
fn analyze(table: ParsedTable) -> Json<AnalyzeResponse> {
    let suggested_mappings = header_map::suggest_mappings(&table.headers);
    let sample_data: Vec<Vec<String>> = table.rows.iter().take(SAMPLE_ROWS).cloned().collect();

    tracing::info!(
        headers = table.headers.len(),
        rows = table.rows.len(),
        suggestions = suggested_mappings.len(),
        "analyzed upload"
    );

    Json(AnalyzeResponse {
        success: true,
        data: AnalyzeData {
            headers: table.headers,
            sample_data,
            suggested_mappings,
            total_rows: table.rows.len(),
        },
    })
}

/// Spawn the orchestrator and hand the caller the event stream.
fn start_import(
    state: &AppState,
    table: ParsedTable,
    mapping: FieldMapping,
    skip_existing: bool,
    verbose: bool,
) -> AppResult<Response> {
    let (sink, rx) = EventSink::channel();
    let store = SqlxPropertyStore::new(state.pool.clone());
    let settings = state.config.import.clone();
    let job = ImportJob {
        table,
        mapping,
        skip_existing,
        diagnostics: verbose,
    };

    tracing::info!(
        rows = job.table.rows.len(),
        skip_existing,
        verbose,
        "starting bulk import"
    );

    // The task owns the producing side; when it finishes (or the caller
    // disconnects and emits start failing silently), dropping the sink
    // ends the stream.
    tokio::spawn(async move {
        ImportOrchestrator::new(&store, &settings, &sink).run(job).await;
    });

    let body = Body::from_stream(ndjson_lines(rx).map(Ok::<_, Infallible>));

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "text/plain; charset=utf-8")
        .body(body)
        .map_err(|e| AppError::InternalError(e.to_string()))
}
