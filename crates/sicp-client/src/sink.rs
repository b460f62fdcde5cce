//! ---
//! sicp_section: "05-networking-external-interfaces"
//! sicp_subsection: "module"
//! sicp_type: "source"
//! sicp_scope: "code"
//! sicp_description: "Structured call events and the sinks that receive them."
//! sicp_version: "v0.0.0-prealpha"
//! sicp_owner: "tbd"
//! ---
use std::time::Duration;

use parking_lot::Mutex;
use serde::Serialize;
use sicp_logging::{log_call_event, CallEventOutcome, LogContext};
use sicp_proto::{Address, Outcome};

/// One finished command call, as reported to an [`EventSink`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CallEvent {
    /// Configured display name, when the client has one.
    pub display: Option<String>,
    pub address: Address,
    pub command: String,
    /// Stable outcome label, see [`Outcome::kind`].
    pub outcome: &'static str,
    /// Decoded value or failure description.
    pub detail: String,
    #[serde(with = "millis")]
    pub elapsed: Duration,
}

impl CallEvent {
    pub fn new<T: std::fmt::Display>(
        display: Option<&str>,
        address: Address,
        command: &str,
        outcome: &Outcome<T>,
        elapsed: Duration,
    ) -> Self {
        Self {
            display: display.map(str::to_owned),
            address,
            command: command.to_owned(),
            outcome: outcome.kind(),
            detail: outcome.to_string(),
            elapsed,
        }
    }

    /// Severity class used when the event is logged.
    pub fn log_outcome(&self) -> CallEventOutcome {
        match self.outcome {
            "success" => CallEventOutcome::Success,
            "device_rejected" => CallEventOutcome::Rejected,
            _ => CallEventOutcome::Failed,
        }
    }
}

mod millis {
    use std::time::Duration;

    use serde::Serializer;

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_millis() as u64)
    }
}

/// Receives one event per call. Injected into the client.
pub trait EventSink: Send + Sync {
    fn record(&self, event: &CallEvent);
}

/// Default sink: emits each call through `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn record(&self, event: &CallEvent) {
        let mut ctx = LogContext::new()
            .with_address(event.address.monitor_id, event.address.group_id)
            .with_command(&event.command);
        if let Some(display) = event.display.as_deref() {
            ctx = ctx.with_display(display);
        }
        let message = format!("{} in {}ms", event.detail, event.elapsed.as_millis());
        log_call_event(Some(&ctx), "sicp.call", &message, event.log_outcome());
    }
}

/// Keeps every event in memory.
#[derive(Debug, Default)]
pub struct RecordingSink {
    events: Mutex<Vec<CallEvent>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<CallEvent> {
        self.events.lock().clone()
    }

    pub fn last(&self) -> Option<CallEvent> {
        self.events.lock().last().cloned()
    }

    pub fn len(&self) -> usize {
        self.events.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.lock().is_empty()
    }
}

impl EventSink for RecordingSink {
    fn record(&self, event: &CallEvent) {
        self.events.lock().push(event.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sicp_proto::{RejectReason, TransportError, Value};

    #[test]
    fn outcome_kind_selects_log_severity() {
        let address = Address::monitor(1);
        let elapsed = Duration::from_millis(12);
        let ok = Outcome::Success(Value::Percent(40));
        let rejected: Outcome<Value> = Outcome::DeviceRejected(RejectReason::Unsupported);
        let failed: Outcome<Value> = Outcome::TransportFailure(TransportError::Closed);

        let event = CallEvent::new(Some("lobby"), address, "get_brightness_level", &ok, elapsed);
        assert_eq!(event.log_outcome(), CallEventOutcome::Success);
        assert_eq!(event.detail, "40%");
        assert_eq!(
            CallEvent::new(None, address, "x", &rejected, elapsed).log_outcome(),
            CallEventOutcome::Rejected
        );
        assert_eq!(
            CallEvent::new(None, address, "x", &failed, elapsed).log_outcome(),
            CallEventOutcome::Failed
        );
    }

    #[test]
    fn event_serialises_elapsed_as_millis() {
        let event = CallEvent::new(
            None,
            Address::monitor(2),
            "get_power_state",
            &Outcome::Success(Value::Acknowledged),
            Duration::from_millis(1500),
        );
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["elapsed"], 1500);
        assert_eq!(json["outcome"], "success");
        assert_eq!(json["address"]["monitor_id"], 2);
    }

    #[test]
    fn recording_sink_keeps_order() {
        let sink = RecordingSink::new();
        for command in ["a", "b"] {
            sink.record(&CallEvent::new(
                None,
                Address::monitor(1),
                command,
                &Outcome::Success(Value::Acknowledged),
                Duration::ZERO,
            ));
        }
        let names: Vec<_> = sink.events().into_iter().map(|e| e.command).collect();
        assert_eq!(names, vec!["a", "b"]);
        assert_eq!(sink.len(), 2);
    }
}
