//! ---
//! sicp_section: "03-persistence-logging"
//! sicp_subsection: "module"
//! sicp_type: "source"
//! sicp_scope: "code"
//! sicp_description: "Structured logging context and call-event emission."
//! sicp_version: "v0.0.0-prealpha"
//! sicp_owner: "tbd"
//! ---
#![warn(missing_docs)]
//! Structured logging helpers shared by the client and the CLI.

use tracing::Level;
use tracing_subscriber::{fmt as subscriber_fmt, prelude::*, EnvFilter, Registry};

pub mod macros;

#[doc(hidden)]
pub use tracing;

/// Initialize a baseline tracing subscriber suitable for tests and tools.
pub fn init() {
    let _ = Registry::default()
        .with(EnvFilter::from_default_env().add_directive(Level::INFO.into()))
        .with(subscriber_fmt::layer())
        .try_init();
}

/// Structured logging context propagated by the convenience macros.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogContext<'a> {
    /// Configured display name.
    pub display: Option<&'a str>,
    /// Monitor id the request was addressed to.
    pub monitor_id: Option<u8>,
    /// Group id the request was addressed to.
    pub group_id: Option<u8>,
    /// Command name from the registry.
    pub command: Option<&'a str>,
}

impl<'a> LogContext<'a> {
    /// Create an empty logging context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a display name.
    pub fn with_display(mut self, display: &'a str) -> Self {
        self.display = Some(display);
        self
    }

    /// Attach the monitor and group address.
    pub fn with_address(mut self, monitor_id: u8, group_id: u8) -> Self {
        self.monitor_id = Some(monitor_id);
        self.group_id = Some(group_id);
        self
    }

    /// Attach a command name.
    pub fn with_command(mut self, command: &'a str) -> Self {
        self.command = Some(command);
        self
    }
}

/// Outcome class of one command call, as logged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallEventOutcome {
    /// The display executed the command.
    Success,
    /// The display answered but refused the command.
    Rejected,
    /// The call failed on the link or broke the protocol.
    Failed,
}

impl CallEventOutcome {
    /// Stable label emitted in the `outcome` field.
    pub fn as_str(&self) -> &'static str {
        match self {
            CallEventOutcome::Success => "success",
            CallEventOutcome::Rejected => "rejected",
            CallEventOutcome::Failed => "failed",
        }
    }
}

/// Emit a standardized call event. Rejections log at warn, failures at error.
pub fn log_call_event(
    context: Option<&LogContext>,
    event: &str,
    message: &str,
    outcome: CallEventOutcome,
) {
    let ctx = context.copied().unwrap_or_default();
    match outcome {
        CallEventOutcome::Success => {
            crate::__sicp_event!(Level::INFO, ctx, "{event} outcome={} {message}", outcome.as_str())
        }
        CallEventOutcome::Rejected => {
            crate::__sicp_event!(Level::WARN, ctx, "{event} outcome={} {message}", outcome.as_str())
        }
        CallEventOutcome::Failed => {
            crate::__sicp_event!(Level::ERROR, ctx, "{event} outcome={} {message}", outcome.as_str())
        }
    }
}
