//! ---
//! sicp_section: "05-networking-external-interfaces"
//! sicp_subsection: "binary"
//! sicp_type: "source"
//! sicp_scope: "code"
//! sicp_description: "Resolution of the command-line target to a display endpoint."
//! sicp_version: "v0.0.0-prealpha"
//! sicp_owner: "tbd"
//! ---
use std::str::FromStr;

use anyhow::{anyhow, bail, Result};
use sicp_common::{AppConfig, DisplayConfig};
use sicp_proto::BROADCAST_MONITOR;

/// Second positional argument: who the command is for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    /// Every configured display, or a broadcast frame when `--host` is given.
    All,
    /// A configured display with this monitor id, or the id at `--host`.
    Monitor(u8),
    /// A display name from the configuration file.
    Named(String),
}

impl FromStr for Target {
    type Err = anyhow::Error;

    fn from_str(text: &str) -> Result<Self> {
        let text = text.trim();
        if text.eq_ignore_ascii_case("all") {
            return Ok(Target::All);
        }
        if text.chars().all(|c| c.is_ascii_digit()) && !text.is_empty() {
            return match text.parse::<u8>() {
                Ok(0) | Err(_) => Err(anyhow!(
                    "monitor id '{text}' outside 1..=255; use 'all' for every display"
                )),
                Ok(id) => Ok(Target::Monitor(id)),
            };
        }
        Ok(Target::Named(text.to_owned()))
    }
}

/// Command-line settings that take precedence over the configuration file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub group: Option<u8>,
}

/// The display to talk to, with its configured name when it has one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    pub name: Option<String>,
    pub display: DisplayConfig,
}

impl Endpoint {
    fn configured(name: &str, display: &DisplayConfig) -> Self {
        Self {
            name: Some(name.to_owned()),
            display: display.clone(),
        }
    }

    fn ad_hoc(host: &str, monitor_id: u8) -> Self {
        Self {
            name: None,
            display: DisplayConfig::new(host, monitor_id),
        }
    }

    /// Name for output lines.
    pub fn label(&self) -> String {
        match &self.name {
            Some(name) => name.clone(),
            None => format!("{}#{}", self.display.host, self.display.monitor_id),
        }
    }

    fn apply(mut self, overrides: &Overrides) -> Self {
        if let Some(host) = &overrides.host {
            self.display.host = host.clone();
        }
        if let Some(port) = overrides.port {
            self.display.port = Some(port);
        }
        if let Some(group) = overrides.group {
            self.display.group_id = group;
        }
        self
    }
}

/// Expand a target into the displays it addresses, in configuration order.
pub fn resolve(
    target: &Target,
    overrides: &Overrides,
    config: &AppConfig,
) -> Result<Vec<Endpoint>> {
    let endpoints = match (target, overrides.host.as_deref()) {
        (Target::Named(name), _) => {
            let Some(display) = config.display(name) else {
                bail!(
                    "unknown display '{name}'; configured displays: {}",
                    known_displays(config)
                );
            };
            vec![Endpoint::configured(name, display)]
        }
        (Target::All, Some(host)) => vec![Endpoint::ad_hoc(host, BROADCAST_MONITOR)],
        (Target::All, None) => {
            if config.displays.is_empty() {
                bail!("no displays configured; pass --host to broadcast");
            }
            config
                .displays
                .iter()
                .map(|(name, display)| Endpoint::configured(name, display))
                .collect()
        }
        (Target::Monitor(id), Some(host)) => vec![Endpoint::ad_hoc(host, *id)],
        (Target::Monitor(id), None) => vec![by_monitor_id(*id, config)?],
    };
    Ok(endpoints
        .into_iter()
        .map(|endpoint| endpoint.apply(overrides))
        .collect())
}

/// The configured display carrying `monitor_id`. A lone configured display
/// lends its host to any monitor id.
fn by_monitor_id(monitor_id: u8, config: &AppConfig) -> Result<Endpoint> {
    let matches: Vec<_> = config
        .displays
        .iter()
        .filter(|(_, display)| display.monitor_id == monitor_id)
        .collect();
    match (matches.as_slice(), config.displays.len()) {
        ([(name, display)], _) => Ok(Endpoint::configured(name, display)),
        ([], 1) => {
            let host = config
                .displays
                .values()
                .map(|display| display.host.as_str())
                .next()
                .unwrap_or_default();
            Ok(Endpoint::ad_hoc(host, monitor_id))
        }
        ([], _) => bail!(
            "no configured display has monitor id {monitor_id}; pass --host or use one of: {}",
            known_displays(config)
        ),
        (_, _) => bail!(
            "monitor id {monitor_id} is configured more than once; name the display instead"
        ),
    }
}

fn known_displays(config: &AppConfig) -> String {
    if config.displays.is_empty() {
        return "none".into();
    }
    config
        .displays
        .keys()
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}
