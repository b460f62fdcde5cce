//! ---
//! sicp_section: "05-networking-external-interfaces"
//! sicp_subsection: "binary"
//! sicp_type: "source"
//! sicp_scope: "code"
//! sicp_description: "Command catalog listing derived from the registry."
//! sicp_version: "v0.0.0-prealpha"
//! sicp_owner: "tbd"
//! ---
use serde::Serialize;
use sicp_proto::{Direction, Registry};

#[derive(Debug, Serialize)]
pub struct CatalogEntry {
    pub name: String,
    pub opcode: u8,
    pub direction: Direction,
    pub usage: String,
    pub summary: &'static str,
}

pub fn entries(registry: &Registry) -> Vec<CatalogEntry> {
    registry
        .iter()
        .map(|descriptor| CatalogEntry {
            name: descriptor.cli_name(),
            opcode: descriptor.opcode,
            direction: descriptor.direction,
            usage: descriptor.request.usage(),
            summary: descriptor.summary,
        })
        .collect()
}

/// Plain-text help listing, one command per line plus its arguments.
pub fn render(registry: &Registry) -> String {
    let mut out = String::from(
        "usage: sicpctl [OPTIONS] <monitor_id|all|display-name> <command> [args...]\n\ncommands:\n",
    );
    out.push_str(&format!("  {:<32} {}\n", "status", "Read a status snapshot"));
    for entry in entries(registry) {
        out.push_str(&format!("  {:<32} {}\n", entry.name, entry.summary));
        if !entry.usage.is_empty() {
            out.push_str(&format!("  {:<32}   {}\n", "", entry.usage));
        }
    }
    out
}
