//! The import engine: per-row orchestration over the property store.

pub mod orchestrator;

pub use orchestrator::{ImportJob, ImportOrchestrator};
