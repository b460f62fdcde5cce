//! ---
//! sicp_section: "11-simulation"
//! sicp_subsection: "module"
//! sicp_type: "source"
//! sicp_scope: "code"
//! sicp_description: "Simulated display panel shared by integration tests."
//! sicp_version: "v0.0.0-prealpha"
//! sicp_owner: "tbd"
//! ---
//! Test harness for SICP clients.
//!
//! [`SimulatedDisplay`] keeps the settings of one panel in memory and answers
//! request frames the way a panel does, including NAV replies for features
//! that are switched off or unavailable in the current input. [`PanelServer`]
//! puts the same panel behind a loopback TCP port.

pub mod display;
pub mod server;

pub use display::SimulatedDisplay;
pub use server::PanelServer;
