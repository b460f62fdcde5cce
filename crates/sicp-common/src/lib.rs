//! ---
//! sicp_section: "01-core-functionality"
//! sicp_subsection: "module"
//! sicp_type: "source"
//! sicp_scope: "code"
//! sicp_description: "Shared configuration and tracing setup."
//! sicp_version: "v0.0.0-prealpha"
//! sicp_owner: "tbd"
//! ---
//! Shared primitives for SICP tools.
//! This crate exposes configuration loading and tracing initialisation
//! consumed by the client and the CLI.

pub mod config;
pub mod logging;

pub use config::{AppConfig, DisplayConfig, LoadedAppConfig, LoggingConfig, TransportConfig};
pub use logging::{init_tracing, LogFormat};
