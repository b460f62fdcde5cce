//! ---
//! sicp_section: "05-networking-external-interfaces"
//! sicp_subsection: "module"
//! sicp_type: "source"
//! sicp_scope: "code"
//! sicp_description: "Typed SICP client facade, call events and status snapshots."
//! sicp_version: "v0.0.0-prealpha"
//! sicp_owner: "tbd"
//! ---
//! Typed client for Signage Control Protocol displays.
//!
//! [`Client`] wraps one [`sicp_transport::Session`] and exposes one method
//! per catalog command, plus the generic [`Client::call`] used by the CLI.

pub mod client;
pub mod sink;
pub mod status;

pub use client::Client;
pub use sink::{CallEvent, EventSink, RecordingSink, TracingSink};
pub use status::{DisplayStatus, Reading};
