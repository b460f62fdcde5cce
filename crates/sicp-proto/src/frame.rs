//! ---
//! sicp_section: "02-protocol-codec"
//! sicp_subsection: "module"
//! sicp_type: "source"
//! sicp_scope: "code"
//! sicp_description: "Pure encode/decode of SICP byte frames."
//! sicp_version: "v0.0.0-prealpha"
//! sicp_owner: "tbd"
//! ---
//! SICP frame codec.
//!
//! Frame format:
//!
//! ```text
//! [size][monitor id][group id][opcode][parameter bytes...][checksum]
//! ```
//!
//! - `size`: total frame length including the size and checksum bytes
//! - `monitor id`: 1-255, 0 addresses every display on the link
//! - `group id`: 0 when unused, 1-254 for a group
//! - `checksum`: XOR of every preceding byte
//!
//! Multi-byte numeric fields are big-endian. The frame carries no start or end
//! marker; the size byte is what delimits frames on the stream.

use bytes::{BufMut, Bytes, BytesMut};
use serde::Serialize;

use crate::error::FrameError;

/// Size byte + monitor + group + opcode + checksum.
pub const MIN_FRAME_LEN: usize = 5;

/// Largest frame the protocol allows.
pub const MAX_FRAME_LEN: usize = 40;

/// Maximum number of parameter bytes in a single frame.
pub const MAX_PARAMETER_LEN: usize = MAX_FRAME_LEN - MIN_FRAME_LEN;

/// Opcode of the communication-control reply (ACK/NAV/NACK).
pub const COMMUNICATION_CONTROL: u8 = 0x00;

/// Command well executed.
pub const ACK: u8 = 0x06;

/// Command not supported or not available in the current state.
pub const NAV: u8 = 0x18;

/// Checksum or format error detected by the display.
pub const NACK: u8 = 0x15;

/// XOR accumulator over `bytes`.
pub fn checksum(bytes: &[u8]) -> u8 {
    bytes.iter().fold(0u8, |acc, byte| acc ^ byte)
}

/// Total frame length announced by a frame's first byte.
///
/// Returns `None` when the byte cannot start a valid frame.
pub fn expected_len(size_byte: u8) -> Option<usize> {
    let len = size_byte as usize;
    (MIN_FRAME_LEN..=u8::MAX as usize)
        .contains(&len)
        .then_some(len)
}

/// One encoded protocol message, request or reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Frame {
    pub monitor_id: u8,
    pub group_id: u8,
    pub opcode: u8,
    pub parameters: Vec<u8>,
}

impl Frame {
    /// Build a request frame, rejecting parameter lists the protocol cannot carry.
    pub fn new(
        monitor_id: u8,
        group_id: u8,
        opcode: u8,
        parameters: &[u8],
    ) -> Result<Self, FrameError> {
        if parameters.len() > MAX_PARAMETER_LEN {
            return Err(FrameError::ParametersTooLong {
                len: parameters.len(),
                max: MAX_PARAMETER_LEN,
            });
        }
        Ok(Self {
            monitor_id,
            group_id,
            opcode,
            parameters: parameters.to_vec(),
        })
    }

    /// Encoded length of this frame.
    pub fn encoded_len(&self) -> usize {
        MIN_FRAME_LEN + self.parameters.len()
    }

    /// Serialise the frame; the checksum is always computed from the bytes written here.
    pub fn encode(&self) -> Bytes {
        let mut buf = BytesMut::with_capacity(self.encoded_len());
        buf.put_u8(self.encoded_len() as u8);
        buf.put_u8(self.monitor_id);
        buf.put_u8(self.group_id);
        buf.put_u8(self.opcode);
        buf.put_slice(&self.parameters);
        let sum = checksum(&buf);
        buf.put_u8(sum);
        buf.freeze()
    }

    /// Parse and validate one complete frame.
    ///
    /// The checksum is verified before the size byte so that corruption of any
    /// single byte, the size byte included, reports as a checksum mismatch.
    pub fn decode(raw: &[u8]) -> Result<Self, FrameError> {
        if raw.len() < MIN_FRAME_LEN {
            return Err(FrameError::ShortFrame {
                len: raw.len(),
                min: MIN_FRAME_LEN,
            });
        }

        let (body, trailer) = raw.split_at(raw.len() - 1);
        let expected = checksum(body);
        if expected != trailer[0] {
            return Err(FrameError::ChecksumMismatch {
                expected,
                actual: trailer[0],
            });
        }

        let declared = body[0] as usize;
        if declared != raw.len() {
            return Err(FrameError::LengthMismatch {
                declared,
                actual: raw.len(),
            });
        }

        Ok(Self {
            monitor_id: body[1],
            group_id: body[2],
            opcode: body[3],
            parameters: body[4..].to_vec(),
        })
    }
}
