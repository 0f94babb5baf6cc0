//! Wire model for the bulk-import event stream.
//!
//! Each event serializes to one JSON object tagged by `type`. Consumers
//! process events strictly in emission order; `complete` is always the
//! final data event of a batch that ran its row loop to the end, while a
//! bare `error` event with no following `complete` marks a batch that
//! aborted before the loop.

use chrono::Utc;
use serde::Serialize;

// ── Aggregate report ─────────────────────────────────────────────────

/// Terminal outcome of one persisted or skipped row.
#[derive(Debug, Clone, Serialize)]
pub struct RowResult {
    pub row: u32,
    pub name: String,
    pub status: String,
}

/// Aggregate counters for one import batch.
///
/// Mutated one row at a time by the orchestrator and shipped whole in
/// the `complete` event. Failed rows contribute to `errors` but never to
/// `results`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ImportReport {
    pub total: u32,
    pub successful: u32,
    pub failed: u32,
    pub skipped: u32,
    pub errors: Vec<String>,
    pub results: Vec<RowResult>,
}

impl ImportReport {
    pub fn new(total: u32) -> Self {
        Self {
            total,
            ..Self::default()
        }
    }

    /// Rows accounted for so far.
    pub fn processed(&self) -> u32 {
        self.successful + self.failed + self.skipped
    }
}

// ── Event payloads ───────────────────────────────────────────────────

/// Running counters attached to every `progress` event.
#[derive(Debug, Clone, Serialize)]
pub struct ProgressData {
    pub message: String,
    pub progress: u32,
    pub total: u32,
    pub successful: u32,
    pub failed: u32,
    pub skipped: u32,
}

/// Diagnostic payload announcing that a row entered the pipeline.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RowProcessingData {
    pub row_number: u32,
    pub total_rows: u32,
    pub raw_data: Vec<String>,
    pub timestamp: String,
}

/// Diagnostic payload carrying a row's post-coercion field values.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MappedData {
    pub row_number: u32,
    pub mapped_data: serde_json::Value,
    pub timestamp: String,
}

/// One classified row failure.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorDetail {
    pub row_number: u32,
    pub property_name: String,
    pub error_type: String,
    pub error_message: String,
    pub timestamp: String,
}

// ── Event envelope ───────────────────────────────────────────────────

/// A single event on the import stream.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ImportEvent {
    /// Running progress after each processed row.
    Progress { data: ProgressData },
    /// Diagnostic: a row is about to be processed (verbose mode only).
    RowProcessing { data: RowProcessingData },
    /// Diagnostic: a row's coerced field values (verbose mode only).
    MappedData { data: MappedData },
    /// A row failed; the batch continues.
    ErrorDetail { data: ErrorDetail },
    /// Terminal summary. Always the last data event of a finished batch.
    Complete {
        success: bool,
        message: String,
        data: ImportReport,
    },
    /// Terminal failure outside the per-row loop; no `complete` follows.
    Error { error: String },
}

impl ImportEvent {
    /// Progress event from the current counters.
    pub fn progress(message: impl Into<String>, report: &ImportReport) -> Self {
        Self::Progress {
            data: ProgressData {
                message: message.into(),
                progress: report.processed(),
                total: report.total,
                successful: report.successful,
                failed: report.failed,
                skipped: report.skipped,
            },
        }
    }

    pub fn row_processing(row_number: u32, total_rows: u32, raw_data: Vec<String>) -> Self {
        Self::RowProcessing {
            data: RowProcessingData {
                row_number,
                total_rows,
                raw_data,
                timestamp: now_rfc3339(),
            },
        }
    }

    pub fn mapped_data(row_number: u32, mapped_data: serde_json::Value) -> Self {
        Self::MappedData {
            data: MappedData {
                row_number,
                mapped_data,
                timestamp: now_rfc3339(),
            },
        }
    }

    pub fn error_detail(
        row_number: u32,
        property_name: impl Into<String>,
        error_type: impl Into<String>,
        error_message: impl Into<String>,
    ) -> Self {
        Self::ErrorDetail {
            data: ErrorDetail {
                row_number,
                property_name: property_name.into(),
                error_type: error_type.into(),
                error_message: error_message.into(),
                timestamp: now_rfc3339(),
            },
        }
    }

    /// Terminal summary; the message depends on whether any row failed.
    pub fn complete(report: ImportReport) -> Self {
        let message = if report.failed == 0 {
            "Importação concluída com sucesso!".to_string()
        } else {
            format!("Importação concluída com {} erro(s)", report.failed)
        };
        Self::Complete {
            success: true,
            message,
            data: report,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            error: message.into(),
        }
    }
}

fn now_rfc3339() -> String {
    Utc::now().to_rfc3339()
}

// ── Tests ────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn to_json(event: &ImportEvent) -> serde_json::Value {
        serde_json::to_value(event).unwrap()
    }

    #[test]
    fn progress_event_shape() {
        let mut report = ImportReport::new(10);
        report.successful = 2;
        report.failed = 1;

        let json = to_json(&ImportEvent::progress("Processando linha 3 de 10", &report));
        assert_eq!(json["type"], "progress");
        assert_eq!(json["data"]["message"], "Processando linha 3 de 10");
        assert_eq!(json["data"]["progress"], 3);
        assert_eq!(json["data"]["total"], 10);
        assert_eq!(json["data"]["successful"], 2);
        assert_eq!(json["data"]["failed"], 1);
        assert_eq!(json["data"]["skipped"], 0);
    }

    #[test]
    fn row_processing_event_uses_camel_case() {
        let json = to_json(&ImportEvent::row_processing(
            2,
            5,
            vec!["a".to_string(), "b".to_string()],
        ));
        assert_eq!(json["type"], "row_processing");
        assert_eq!(json["data"]["rowNumber"], 2);
        assert_eq!(json["data"]["totalRows"], 5);
        assert_eq!(json["data"]["rawData"][1], "b");
        assert!(json["data"]["timestamp"].is_string());
    }

    #[test]
    fn error_detail_event_shape() {
        let json = to_json(&ImportEvent::error_detail(
            4,
            "Fazenda B",
            "INVALID_COORDINATES",
            "coordenadas inválidas",
        ));
        assert_eq!(json["type"], "error_detail");
        assert_eq!(json["data"]["rowNumber"], 4);
        assert_eq!(json["data"]["propertyName"], "Fazenda B");
        assert_eq!(json["data"]["errorType"], "INVALID_COORDINATES");
        assert_eq!(json["data"]["errorMessage"], "coordenadas inválidas");
    }

    #[test]
    fn complete_event_is_flat_with_report_payload() {
        let mut report = ImportReport::new(3);
        report.successful = 3;
        report.results.push(RowResult {
            row: 1,
            name: "Fazenda A".to_string(),
            status: "success".to_string(),
        });

        let json = to_json(&ImportEvent::complete(report));
        assert_eq!(json["type"], "complete");
        assert_eq!(json["success"], true);
        assert_eq!(json["message"], "Importação concluída com sucesso!");
        assert_eq!(json["data"]["total"], 3);
        assert_eq!(json["data"]["results"][0]["name"], "Fazenda A");
    }

    #[test]
    fn complete_message_mentions_failures() {
        let mut report = ImportReport::new(3);
        report.successful = 1;
        report.failed = 2;

        let json = to_json(&ImportEvent::complete(report));
        assert_eq!(json["message"], "Importação concluída com 2 erro(s)");
        // `success` refers to the batch finishing, not to zero failures.
        assert_eq!(json["success"], true);
    }

    #[test]
    fn error_event_is_flat() {
        let json = to_json(&ImportEvent::error("mapeamento ausente"));
        assert_eq!(json["type"], "error");
        assert_eq!(json["error"], "mapeamento ausente");
        assert!(json.get("data").is_none());
    }

    #[test]
    fn report_processed_sums_all_outcomes() {
        let mut report = ImportReport::new(6);
        report.successful = 1;
        report.failed = 2;
        report.skipped = 3;
        assert_eq!(report.processed(), 6);
    }
}
