//! ---
//! sicp_section: "02-protocol-codec"
//! sicp_subsection: "module"
//! sicp_type: "source"
//! sicp_scope: "code"
//! sicp_description: "Monitor/group addressing and its validation rules."
//! sicp_version: "v0.0.0-prealpha"
//! sicp_owner: "tbd"
//! ---
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ProtocolViolation;
use crate::registry::Direction;

/// Monitor id that reaches every display on the link.
pub const BROADCAST_MONITOR: u8 = 0;

/// Highest group id a frame may carry; 0 means "no group".
pub const MAX_GROUP_ID: u8 = 254;

/// Destination of one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Address {
    pub monitor_id: u8,
    #[serde(default)]
    pub group_id: u8,
}

impl Address {
    pub const fn new(monitor_id: u8, group_id: u8) -> Self {
        Self {
            monitor_id,
            group_id,
        }
    }

    pub const fn monitor(monitor_id: u8) -> Self {
        Self::new(monitor_id, 0)
    }

    pub const fn broadcast() -> Self {
        Self::new(BROADCAST_MONITOR, 0)
    }

    pub fn is_broadcast(&self) -> bool {
        self.monitor_id == BROADCAST_MONITOR
    }

    /// Broadcast can only carry set commands since no display answers it.
    pub fn validate(&self, direction: Direction) -> Result<(), ProtocolViolation> {
        if self.group_id > MAX_GROUP_ID {
            return Err(ProtocolViolation::AddressOutOfRange(format!(
                "group id {} outside 0..={MAX_GROUP_ID}",
                self.group_id
            )));
        }
        if self.is_broadcast() && direction == Direction::Get {
            return Err(ProtocolViolation::AddressOutOfRange(
                "get commands need a monitor id in 1..=255; 0 is broadcast".into(),
            ));
        }
        Ok(())
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_broadcast() {
            f.write_str("all")?;
        } else {
            write!(f, "#{}", self.monitor_id)?;
        }
        if self.group_id != 0 {
            write!(f, " (group {})", self.group_id)?;
        }
        Ok(())
    }
}
