//! Channel-backed NDJSON transport for [`ImportEvent`]s.
//!
//! One orchestrator task produces, one response body consumes. Events
//! are serialized to a single JSON line each as soon as they are pulled
//! from the channel, so partial results reach the caller while later
//! rows are still being processed.

use futures::stream::Stream;
use tokio::sync::mpsc;

use crate::import::ImportEvent;

/// Default channel capacity between orchestrator and response body.
const DEFAULT_CAPACITY: usize = 64;

// ── EventSink ────────────────────────────────────────────────────────

/// Producer handle for the import event stream.
///
/// Sends never fail loudly: when the consumer has gone away (caller
/// disconnect), the event is dropped and the batch keeps running —
/// rows already persisted are not rolled back, so aborting mid-batch
/// would only hide work that already happened.
#[derive(Clone)]
pub struct EventSink {
    tx: mpsc::Sender<ImportEvent>,
}

impl EventSink {
    /// Create a sink and its paired receiver with the default capacity.
    pub fn channel() -> (Self, mpsc::Receiver<ImportEvent>) {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Create a sink with an explicit channel capacity.
    pub fn with_capacity(capacity: usize) -> (Self, mpsc::Receiver<ImportEvent>) {
        let (tx, rx) = mpsc::channel(capacity);
        (Self { tx }, rx)
    }

    /// Emit one event, waiting for channel space if the consumer lags.
    pub async fn emit(&self, event: ImportEvent) {
        if self.tx.send(event).await.is_err() {
            tracing::debug!("import event dropped: consumer disconnected");
        }
    }
}

// ── NDJSON adapter ───────────────────────────────────────────────────

/// Turn the receiving side of an event channel into a stream of NDJSON
/// lines (one JSON object plus trailing newline per event).
///
/// The stream ends when every [`EventSink`] clone has been dropped.
pub fn ndjson_lines(rx: mpsc::Receiver<ImportEvent>) -> impl Stream<Item = String> {
    futures::stream::unfold(rx, |mut rx| async move {
        loop {
            let event = rx.recv().await?;
            match serde_json::to_string(&event) {
                Ok(json) => return Some((json + "\n", rx)),
                Err(e) => {
                    // Event types are plain data; serialization failure
                    // is a bug, but one malformed event must not end
                    // the stream.
                    tracing::error!(error = %e, "failed to serialize import event");
                }
            }
        }
    })
}

// ── Tests ────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::import::ImportReport;
    use futures::StreamExt;

    #[tokio::test]
    async fn events_arrive_in_emission_order_as_lines() {
        let (sink, rx) = EventSink::channel();

        let report = ImportReport::new(2);
        sink.emit(ImportEvent::progress("linha 1", &report)).await;
        sink.emit(ImportEvent::progress("linha 2", &report)).await;
        sink.emit(ImportEvent::complete(report)).await;
        drop(sink);

        let lines: Vec<String> = ndjson_lines(rx).collect().await;
        assert_eq!(lines.len(), 3);
        for line in &lines {
            assert!(line.ends_with('\n'));
            // Exactly one JSON document per line.
            let parsed: serde_json::Value = serde_json::from_str(line.trim_end()).unwrap();
            assert!(parsed["type"].is_string());
        }
        assert!(lines[0].contains("linha 1"));
        assert!(lines[1].contains("linha 2"));
        assert!(lines[2].contains("\"complete\""));
    }

    #[tokio::test]
    async fn emit_after_consumer_dropped_is_a_no_op() {
        let (sink, rx) = EventSink::channel();
        drop(rx);

        // Must neither panic nor hang.
        sink.emit(ImportEvent::error("ninguém ouvindo")).await;
    }

    #[tokio::test]
    async fn stream_ends_when_all_sinks_drop() {
        let (sink, rx) = EventSink::channel();
        let clone = sink.clone();
        drop(sink);
        drop(clone);

        let lines: Vec<String> = ndjson_lines(rx).collect().await;
        assert!(lines.is_empty());
    }

    #[tokio::test]
    async fn partial_results_are_visible_before_completion() {
        let (sink, rx) = EventSink::channel();
        let mut stream = Box::pin(ndjson_lines(rx));

        let report = ImportReport::new(1);
        sink.emit(ImportEvent::progress("primeira", &report)).await;

        // The first line is readable while the sink is still alive.
        let first = stream.next().await.unwrap();
        assert!(first.contains("primeira"));

        sink.emit(ImportEvent::complete(report)).await;
        drop(sink);

        let second = stream.next().await.unwrap();
        assert!(second.contains("\"complete\""));
        assert!(stream.next().await.is_none());
    }
}
