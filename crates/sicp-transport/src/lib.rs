//! ---
//! sicp_section: "04-transport"
//! sicp_subsection: "module"
//! sicp_type: "source"
//! sicp_scope: "code"
//! sicp_description: "Transport abstraction and retrying session for SICP links."
//! sicp_version: "v0.0.0-prealpha"
//! sicp_owner: "tbd"
//! ---
//! Byte-level links to display panels.
//!
//! A [`Transport`] moves whole frames to and from one endpoint. A [`Session`]
//! owns one transport and applies the [`RetryPolicy`]; it is the only place
//! that decides to retry, and it only ever retries timeouts.

use std::time::Duration;

pub mod scripted;
pub mod session;
pub mod tcp;

pub use scripted::{ScriptedStep, ScriptedTransport};
pub use session::{RetryPolicy, Session};
pub use sicp_proto::TransportError;
pub use tcp::{TcpTransport, DEFAULT_PORT};

/// Convenience result alias for transport operations.
pub type Result<T> = std::result::Result<T, TransportError>;

/// Link to a single display endpoint.
///
/// Methods take `&mut self`: one link never has two requests in flight.
pub trait Transport: Send {
    /// Open the link if it is not already open.
    fn connect(&mut self, timeout: Duration) -> Result<()>;
    fn is_connected(&self) -> bool;
    /// Write a frame without waiting for a reply (broadcast).
    fn send(&mut self, frame: &[u8]) -> Result<()>;
    /// Write a frame and read exactly one reply frame within `timeout`.
    fn send_and_await(&mut self, frame: &[u8], timeout: Duration) -> Result<Vec<u8>>;
    /// Drop the link. The next call reconnects.
    fn close(&mut self);
    /// Human-readable transport name for logging.
    fn name(&self) -> &'static str;
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn connect(&mut self, timeout: Duration) -> Result<()> {
        (**self).connect(timeout)
    }

    fn is_connected(&self) -> bool {
        (**self).is_connected()
    }

    fn send(&mut self, frame: &[u8]) -> Result<()> {
        (**self).send(frame)
    }

    fn send_and_await(&mut self, frame: &[u8], timeout: Duration) -> Result<Vec<u8>> {
        (**self).send_and_await(frame, timeout)
    }

    fn close(&mut self) {
        (**self).close()
    }

    fn name(&self) -> &'static str {
        (**self).name()
    }
}
