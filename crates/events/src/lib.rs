//! Import progress events and their streaming transport.
//!
//! This crate provides the wire model and plumbing for the bulk-import
//! event stream:
//!
//! - [`ImportEvent`] — the tagged envelope emitted once per progress
//!   step, per-row diagnostic, or failure.
//! - [`ImportReport`] — the aggregate counters finalized in the
//!   terminal `complete` event.
//! - [`EventSink`] / [`ndjson_lines`] — single-producer/single-consumer
//!   channel whose receiving side yields newline-delimited JSON, one
//!   line per event, ready to be wrapped in a chunked response body.
//!
//! The crate knows nothing about HTTP; the API layer owns the transport.

pub mod import;
pub mod stream;

pub use import::{ErrorDetail, ImportEvent, ImportReport, ProgressData, RowResult};
pub use stream::{ndjson_lines, EventSink};
