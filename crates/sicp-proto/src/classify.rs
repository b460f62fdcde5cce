//! ---
//! sicp_section: "02-protocol-codec"
//! sicp_subsection: "module"
//! sicp_type: "source"
//! sicp_scope: "code"
//! sicp_description: "Maps raw replies and transport results onto the call outcome taxonomy."
//! sicp_version: "v0.0.0-prealpha"
//! sicp_owner: "tbd"
//! ---
//! Reply classification.
//!
//! Every call ends in exactly one [`Outcome`]:
//!
//! - `Success`: the display executed the command (and returned a value for gets)
//! - `DeviceRejected`: the display answered but refused, a recoverable state
//! - `TransportFailure`: no usable answer arrived; only timeouts are retried
//! - `ProtocolViolation`: a malformed exchange, never retried

use std::fmt;

use serde::Serialize;

use crate::error::{ProtocolViolation, TransportError};
use crate::frame::{Frame, ACK, COMMUNICATION_CONTROL, NACK, NAV};
use crate::registry::{CommandDescriptor, Direction};
use crate::value::Value;

/// Why a display refused a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "reason", rename_all = "kebab-case")]
pub enum RejectReason {
    /// NAV: command not supported, or not available in the current state.
    Unsupported,
    /// NACK: the display reported a checksum or format problem.
    InvalidParameter,
    /// Data reply without payload.
    Busy,
    /// The reply carried a byte outside the command's domain.
    OutOfDomain { value: u8 },
}

impl RejectReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            RejectReason::Unsupported => "unsupported",
            RejectReason::InvalidParameter => "invalid-parameter",
            RejectReason::Busy => "busy",
            RejectReason::OutOfDomain { .. } => "out-of-domain",
        }
    }
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RejectReason::Unsupported => f.write_str("not available on this display or in its current state"),
            RejectReason::InvalidParameter => f.write_str("display reported a checksum or format error"),
            RejectReason::Busy => f.write_str("display answered without data"),
            RejectReason::OutOfDomain { value } => {
                write!(f, "display reported unknown value 0x{value:02X}")
            }
        }
    }
}

/// Status of a decoded reply frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ResponseStatus {
    Ack,
    NotAvailable,
    NotAcknowledged,
    Data { opcode: u8 },
    Unknown { code: u8 },
}

/// A reply frame split into addressing, status and payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RawResponse {
    pub monitor_id: u8,
    pub group_id: u8,
    pub status: ResponseStatus,
    pub payload: Vec<u8>,
}

impl From<Frame> for RawResponse {
    fn from(frame: Frame) -> Self {
        let status = match (frame.opcode, frame.parameters.first()) {
            (COMMUNICATION_CONTROL, Some(&ACK)) => ResponseStatus::Ack,
            (COMMUNICATION_CONTROL, Some(&NAV)) => ResponseStatus::NotAvailable,
            (COMMUNICATION_CONTROL, Some(&NACK)) => ResponseStatus::NotAcknowledged,
            (COMMUNICATION_CONTROL, Some(&code)) => ResponseStatus::Unknown { code },
            (opcode, _) => ResponseStatus::Data { opcode },
        };
        let payload = match status {
            ResponseStatus::Data { .. } => frame.parameters,
            _ => frame.parameters.into_iter().skip(1).collect(),
        };
        Self {
            monitor_id: frame.monitor_id,
            group_id: frame.group_id,
            status,
            payload,
        }
    }
}

/// Result of one command call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", content = "detail", rename_all = "snake_case")]
pub enum Outcome<T> {
    Success(T),
    DeviceRejected(RejectReason),
    TransportFailure(TransportError),
    ProtocolViolation(ProtocolViolation),
}

impl<T> Outcome<T> {
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U> {
        match self {
            Outcome::Success(value) => Outcome::Success(f(value)),
            Outcome::DeviceRejected(reason) => Outcome::DeviceRejected(reason),
            Outcome::TransportFailure(err) => Outcome::TransportFailure(err),
            Outcome::ProtocolViolation(err) => Outcome::ProtocolViolation(err),
        }
    }

    pub fn try_map<U>(self, f: impl FnOnce(T) -> Result<U, ProtocolViolation>) -> Outcome<U> {
        match self.map(f) {
            Outcome::Success(Ok(value)) => Outcome::Success(value),
            Outcome::Success(Err(err)) => Outcome::ProtocolViolation(err),
            Outcome::DeviceRejected(reason) => Outcome::DeviceRejected(reason),
            Outcome::TransportFailure(err) => Outcome::TransportFailure(err),
            Outcome::ProtocolViolation(err) => Outcome::ProtocolViolation(err),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success(_))
    }

    /// The display answered but the feature is not usable right now.
    pub fn is_unavailable(&self) -> bool {
        matches!(self, Outcome::DeviceRejected(_))
    }

    pub fn success(self) -> Option<T> {
        match self {
            Outcome::Success(value) => Some(value),
            _ => None,
        }
    }

    /// Stable label for logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            Outcome::Success(_) => "success",
            Outcome::DeviceRejected(_) => "device_rejected",
            Outcome::TransportFailure(_) => "transport_failure",
            Outcome::ProtocolViolation(_) => "protocol_violation",
        }
    }
}

impl<T: fmt::Display> fmt::Display for Outcome<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Success(value) => write!(f, "{value}"),
            Outcome::DeviceRejected(reason) => write!(f, "rejected: {reason}"),
            Outcome::TransportFailure(err) => write!(f, "transport failure: {err}"),
            Outcome::ProtocolViolation(err) => write!(f, "protocol violation: {err}"),
        }
    }
}

/// Classify the result of one exchange. `Ok(None)` is a broadcast write
/// that no display answers.
pub fn classify(
    descriptor: &CommandDescriptor,
    reply: Result<Option<Vec<u8>>, TransportError>,
) -> Outcome<Value> {
    let raw = match reply {
        Err(err) => return Outcome::TransportFailure(err),
        Ok(None) => return Outcome::Success(Value::Acknowledged),
        Ok(Some(raw)) => raw,
    };
    match Frame::decode(&raw) {
        Ok(frame) => classify_response(descriptor, RawResponse::from(frame)),
        Err(err) => Outcome::ProtocolViolation(err.into()),
    }
}

/// Classify a reply whose frame already passed validation.
pub fn classify_response(descriptor: &CommandDescriptor, response: RawResponse) -> Outcome<Value> {
    match (response.status, descriptor.direction) {
        (ResponseStatus::NotAvailable, _) => Outcome::DeviceRejected(RejectReason::Unsupported),
        (ResponseStatus::NotAcknowledged, _) => {
            Outcome::DeviceRejected(RejectReason::InvalidParameter)
        }
        (ResponseStatus::Unknown { code }, _) => {
            Outcome::ProtocolViolation(ProtocolViolation::UnknownStatus(code))
        }
        (ResponseStatus::Ack, Direction::Set) => Outcome::Success(Value::Acknowledged),
        (ResponseStatus::Ack, Direction::Get) => {
            Outcome::ProtocolViolation(ProtocolViolation::UnexpectedReply {
                received: "ACK",
                direction: Direction::Get.as_str(),
            })
        }
        (ResponseStatus::Data { .. }, Direction::Set) => {
            Outcome::ProtocolViolation(ProtocolViolation::UnexpectedReply {
                received: "data",
                direction: Direction::Set.as_str(),
            })
        }
        (ResponseStatus::Data { opcode }, Direction::Get) if opcode != descriptor.opcode => {
            Outcome::ProtocolViolation(ProtocolViolation::OpcodeMismatch {
                expected: descriptor.opcode,
                received: opcode,
            })
        }
        (ResponseStatus::Data { .. }, Direction::Get) => {
            match descriptor.response.decode(data_payload(descriptor.opcode, &response.payload)) {
                Ok(value) => Outcome::Success(value),
                Err(reason) => Outcome::DeviceRejected(reason),
            }
        }
    }
}

/// Some firmware repeats the opcode as the first payload byte. A lone byte
/// is always data.
fn data_payload(opcode: u8, payload: &[u8]) -> &[u8] {
    match payload {
        [first, rest @ ..] if *first == opcode && !rest.is_empty() => rest,
        _ => payload,
    }
}
