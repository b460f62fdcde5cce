//! ---
//! sicp_section: "02-protocol-codec"
//! sicp_subsection: "module"
//! sicp_type: "source"
//! sicp_scope: "code"
//! sicp_description: "Error taxonomy shared by the codec, registry and transport layers."
//! sicp_version: "v0.0.0-prealpha"
//! sicp_owner: "tbd"
//! ---
use std::io;
use std::time::Duration;

use serde::Serialize;
use thiserror::Error;

/// Byte-level framing failures raised by [`crate::frame`].
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FrameError {
    #[error("short frame: {len} bytes, at least {min} required")]
    ShortFrame { len: usize, min: usize },
    #[error("checksum mismatch: expected 0x{expected:02X}, frame carried 0x{actual:02X}")]
    ChecksumMismatch { expected: u8, actual: u8 },
    #[error("size byte declares {declared} bytes but {actual} were received")]
    LengthMismatch { declared: usize, actual: usize },
    #[error("{len} parameter bytes exceed the protocol maximum of {max}")]
    ParametersTooLong { len: usize, max: usize },
}

/// Parameter validation failures raised before a frame is built.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SchemaError {
    #[error("command takes no parameter")]
    UnexpectedParameter,
    #[error("missing parameter, expected {expected}")]
    MissingParameter { expected: String },
    #[error("wrong parameter shape, expected {expected}")]
    WrongShape { expected: String },
    #[error("value {value} outside {min}..={max}")]
    OutOfRange { value: i64, min: i64, max: i64 },
    #[error("'{value}' is not a valid {family}")]
    UnknownChoice { family: &'static str, value: String },
    #[error("{family} value '{value}' cannot be sent to a display")]
    NotEncodable { family: &'static str, value: String },
    #[error("{value} is not one of the accepted values ({accepted})")]
    NotInSet { value: i64, accepted: String },
}

/// Frame-level or schema-level breach of the protocol. Never retried.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum ProtocolViolation {
    #[error("unknown command '{0}'")]
    UnknownCommand(String),
    #[error("invalid address: {0}")]
    AddressOutOfRange(String),
    #[error(transparent)]
    Schema(#[from] SchemaError),
    #[error(transparent)]
    Frame(#[from] FrameError),
    #[error("unexpected {received} reply to a {direction} command")]
    UnexpectedReply {
        received: &'static str,
        direction: &'static str,
    },
    #[error("reply opcode 0x{received:02X} does not match request opcode 0x{expected:02X}")]
    OpcodeMismatch { expected: u8, received: u8 },
    #[error("unknown communication-control status 0x{0:02X}")]
    UnknownStatus(u8),
    #[error("reply decoded to {received}, expected {expected}")]
    UnexpectedValue {
        expected: &'static str,
        received: String,
    },
}

/// Network-level failure. Timeouts are the only variant the session retries.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TransportError {
    #[error("no reply within {}ms", .after.as_millis())]
    Timeout { after: Duration },
    #[error("connection reset by peer")]
    ConnectionReset,
    #[error("connection refused by {endpoint}")]
    ConnectionRefused { endpoint: String },
    #[error("unable to resolve {host}")]
    Resolve { host: String },
    #[error("transport closed")]
    Closed,
    #[error("i/o error ({io_kind}): {message}")]
    Io { io_kind: String, message: String },
}

impl TransportError {
    /// Whether the session may retry the exchange.
    pub fn is_timeout(&self) -> bool {
        matches!(self, TransportError::Timeout { .. })
    }

    /// Map a socket error, folding the read-timeout kinds into [`TransportError::Timeout`].
    pub fn from_io(err: &io::Error, waited: Duration) -> Self {
        match err.kind() {
            io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut => {
                TransportError::Timeout { after: waited }
            }
            io::ErrorKind::ConnectionReset
            | io::ErrorKind::ConnectionAborted
            | io::ErrorKind::BrokenPipe
            | io::ErrorKind::UnexpectedEof => TransportError::ConnectionReset,
            other => TransportError::Io {
                io_kind: format!("{other:?}"),
                message: err.to_string(),
            },
        }
    }
}

/// Failures detected while building the command registry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("command name '{0}' registered twice")]
    DuplicateName(&'static str),
    #[error("set '{set}' accepts a different domain than get '{get}' reports")]
    DomainMismatch {
        get: &'static str,
        set: &'static str,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_timeouts_map_to_timeout() {
        let err = io::Error::new(io::ErrorKind::WouldBlock, "would block");
        let mapped = TransportError::from_io(&err, Duration::from_millis(250));
        assert_eq!(
            mapped,
            TransportError::Timeout {
                after: Duration::from_millis(250)
            }
        );
        assert!(mapped.is_timeout());
    }

    #[test]
    fn resets_are_not_retryable() {
        let err = io::Error::new(io::ErrorKind::ConnectionReset, "reset");
        let mapped = TransportError::from_io(&err, Duration::ZERO);
        assert_eq!(mapped, TransportError::ConnectionReset);
        assert!(!mapped.is_timeout());
    }

    #[test]
    fn io_failures_serialise_with_their_kind() {
        let err = io::Error::new(io::ErrorKind::PermissionDenied, "denied");
        let mapped = TransportError::from_io(&err, Duration::ZERO);
        let json = serde_json::to_value(&mapped).unwrap();
        assert_eq!(json["kind"], "io");
        assert_eq!(json["io_kind"], "PermissionDenied");
        assert_eq!(json["message"], "denied");
    }

    #[test]
    fn violations_serialise_with_detail() {
        let json = serde_json::to_value(ProtocolViolation::UnknownCommand("get_nothing".into()))
            .unwrap();
        assert_eq!(
            json,
            serde_json::json!({"kind": "unknown_command", "detail": "get_nothing"})
        );
        let json = serde_json::to_value(ProtocolViolation::UnknownStatus(0x42)).unwrap();
        assert_eq!(json["detail"], 0x42);
    }
}
