use std::sync::Mutex;

use crate::settlement::{EventSinkPort, SettlementEvent};

#[derive(Default)]
pub struct RecordingEventSink {
    events: Mutex<Vec<SettlementEvent>>,
}

impl RecordingEventSink {
    pub fn events(&self) -> Vec<SettlementEvent> {
        self.events
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }
}

impl EventSinkPort for RecordingEventSink {
    fn emit(&self, event: SettlementEvent) {
        if let Ok(mut guard) = self.events.lock() {
            guard.push(event);
        }
    }
}

/// Forwards events to the `events` tracing target as JSON payloads.
#[derive(Default)]
pub struct TracingEventSink;

impl EventSinkPort for TracingEventSink {
    fn emit(&self, event: SettlementEvent) {
        match serde_json::to_string(&event) {
            Ok(payload) => {
                tracing::info!(target: "events", event = event.name(), payload = %payload, "event_emitted")
            }
            Err(err) => {
                tracing::warn!(target: "events", event = event.name(), error = %err, "event_encoding_failed")
            }
        }
    }
}
