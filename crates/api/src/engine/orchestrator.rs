//! Per-row import orchestration.
//!
//! Drives each data row through coerce → validate → dedupe-check →
//! persist, keeping aggregate counters and emitting progress events as
//! it goes. Every row-level failure is recovered locally: the batch
//! always runs to the end and finishes with exactly one `complete`
//! event. Rows are processed strictly sequentially — both store calls
//! are awaited round trips, and event order must match row order.
//!
//! Known limitation: with `skip_existing`, the duplicate probe and the
//! subsequent insert are not atomic. Two concurrent imports of
//! overlapping data can both pass the probe and both insert; the skip
//! is advisory, not a uniqueness guarantee.

use std::time::Duration;

use chrono::{NaiveDate, Utc};
use uuid::Uuid;

use ronda_core::coerce::{coerce_row, CoercedRow};
use ronda_core::header_map::FieldMapping;
use ronda_core::parse::ParsedTable;
use ronda_core::validate::{validate_row, RowError, RowErrorKind, NOT_INFORMED};
use ronda_db::models::property::NewProperty;
use ronda_db::store::PropertyStore;
use ronda_events::{EventSink, ImportEvent, ImportReport, RowResult};

use crate::config::ImportSettings;

// ── Job ──────────────────────────────────────────────────────────────

/// One import request's worth of work, fully resolved before the row
/// loop starts.
#[derive(Debug)]
pub struct ImportJob {
    pub table: ParsedTable,
    /// Caller-confirmed header mapping, applied verbatim.
    pub mapping: FieldMapping,
    /// Probe the store and skip rows that already exist.
    pub skip_existing: bool,
    /// Emit `row_processing` and `mapped_data` diagnostic events.
    pub diagnostics: bool,
}

/// Terminal state of a row that was not counted as failed.
enum RowOutcome {
    Persisted { name: String },
    Skipped { name: String },
}

// ── Orchestrator ─────────────────────────────────────────────────────

/// Runs import jobs against a [`PropertyStore`], emitting events into
/// an [`EventSink`].
///
/// Constructed once per request; the creator identity and the fallback
/// date for unparseable `cadastro_date` cells are fixed at construction
/// so every row of a batch gets the same values.
pub struct ImportOrchestrator<'a, S> {
    store: &'a S,
    settings: &'a ImportSettings,
    sink: &'a EventSink,
    created_by: Uuid,
    today: NaiveDate,
}

impl<'a, S: PropertyStore> ImportOrchestrator<'a, S> {
    pub fn new(store: &'a S, settings: &'a ImportSettings, sink: &'a EventSink) -> Self {
        Self {
            store,
            settings,
            sink,
            created_by: Uuid::new_v4(),
            today: Utc::now().date_naive(),
        }
    }

    /// Process every row of the job and emit the terminal `complete`
    /// event. Never fails: all row-level errors are folded into the
    /// report.
    pub async fn run(&self, job: ImportJob) {
        let rows = match self.settings.row_cap {
            Some(cap) if job.table.rows.len() > cap => {
                tracing::info!(
                    dropped = job.table.rows.len() - cap,
                    cap,
                    "row cap truncated upload"
                );
                &job.table.rows[..cap]
            }
            _ => &job.table.rows[..],
        };

        let total = rows.len() as u32;
        let mut report = ImportReport::new(total);

        for (index, raw_row) in rows.iter().enumerate() {
            let row_number = index as u32 + 1;

            if job.diagnostics {
                self.sink
                    .emit(ImportEvent::row_processing(
                        row_number,
                        total,
                        raw_row.clone(),
                    ))
                    .await;
            }

            match self.process_row(&job, raw_row, row_number).await {
                Ok(RowOutcome::Persisted { name }) => {
                    report.successful += 1;
                    report.results.push(RowResult {
                        row: row_number,
                        name,
                        status: "success".to_string(),
                    });
                }
                Ok(RowOutcome::Skipped { name }) => {
                    report.skipped += 1;
                    report.results.push(RowResult {
                        row: row_number,
                        name,
                        status: "skipped".to_string(),
                    });
                }
                Err((name, error)) => {
                    report.failed += 1;
                    report
                        .errors
                        .push(format!("Linha {row_number}: {}", error.message));
                    tracing::warn!(
                        row = row_number,
                        error_type = %error.kind,
                        error = %error.message,
                        "row failed during import"
                    );
                    self.sink
                        .emit(ImportEvent::error_detail(
                            row_number,
                            name,
                            error.kind.as_str(),
                            error.message,
                        ))
                        .await;
                }
            }

            self.sink
                .emit(ImportEvent::progress(
                    format!("Processando linha {row_number} de {total}"),
                    &report,
                ))
                .await;

            // Inter-row throttle: bounds load on the store. Tuning, not
            // correctness.
            if index + 1 < rows.len() && self.settings.row_throttle_ms > 0 {
                tokio::time::sleep(Duration::from_millis(self.settings.row_throttle_ms)).await;
            }
        }

        tracing::info!(
            total,
            successful = report.successful,
            failed = report.failed,
            skipped = report.skipped,
            "import batch finished"
        );
        self.sink.emit(ImportEvent::complete(report)).await;
    }

    /// Run one row through the pipeline.
    ///
    /// Errors come back with the best display name available for the
    /// row, so `error_detail` events stay readable even when the name
    /// column itself was the problem.
    async fn process_row(
        &self,
        job: &ImportJob,
        raw_row: &[String],
        row_number: u32,
    ) -> Result<RowOutcome, (String, RowError)> {
        let coerced = coerce_row(&job.table.headers, raw_row, &job.mapping, self.today);
        let display_name = coerced
            .name
            .clone()
            .unwrap_or_else(|| format!("Linha {row_number}"));

        if job.diagnostics {
            self.emit_mapped_data(row_number, &coerced).await;
        }

        let valid = validate_row(&coerced).map_err(|e| (display_name.clone(), e))?;

        if job.skip_existing {
            let cidade = coerced.cidade.as_deref().unwrap_or(NOT_INFORMED);
            let duplicate = self
                .store
                .find_duplicate(&valid.name, valid.latitude, valid.longitude, cidade)
                .await
                // A failed probe is not the store rejecting this row's
                // data; classify it with the unexpected-failure bucket.
                .map_err(|e| {
                    (
                        display_name.clone(),
                        RowError::new(RowErrorKind::CriticalError, e.to_string()),
                    )
                })?;

            if duplicate.is_some() {
                return Ok(RowOutcome::Skipped { name: valid.name });
            }
        }

        let input = NewProperty::from_row(
            &valid,
            &coerced,
            self.settings.org_id,
            self.settings.team_id,
            self.created_by,
        );

        self.store.create_profile(&input).await.map_err(|e| {
            (
                display_name,
                RowError::new(RowErrorKind::DatabaseError, e.to_string()),
            )
        })?;

        Ok(RowOutcome::Persisted { name: valid.name })
    }

    async fn emit_mapped_data(&self, row_number: u32, coerced: &CoercedRow) {
        match serde_json::to_value(coerced) {
            Ok(value) => {
                self.sink
                    .emit(ImportEvent::mapped_data(row_number, value))
                    .await;
            }
            Err(e) => {
                tracing::error!(row = row_number, error = %e, "failed to serialize mapped row");
            }
        }
    }
}
