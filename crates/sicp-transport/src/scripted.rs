//! ---
//! sicp_section: "04-transport"
//! sicp_subsection: "module"
//! sicp_type: "source"
//! sicp_scope: "code"
//! sicp_description: "In-memory transport that replays scripted replies for tests."
//! sicp_version: "v0.0.0-prealpha"
//! sicp_owner: "tbd"
//! ---
use std::collections::VecDeque;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use parking_lot::Mutex;
use sicp_proto::TransportError;

use crate::{Result, Transport};

/// What the fake display does in response to the next request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptedStep {
    Reply(Vec<u8>),
    /// Never answer. An empty script behaves the same way.
    Timeout,
    Reset,
}

#[derive(Debug, Default)]
struct ScriptState {
    steps: VecDeque<ScriptedStep>,
    written: Vec<Vec<u8>>,
    exchanges: usize,
    connects: usize,
    connected: bool,
    refuse_connects: usize,
    real_time: bool,
}

/// In-memory transport that replays queued replies.
///
/// Clones share state, so a test can keep a handle after moving the
/// transport into a session.
#[derive(Debug, Clone, Default)]
pub struct ScriptedTransport {
    state: Arc<Mutex<ScriptState>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Timeouts sleep for the full timeout instead of failing immediately.
    pub fn real_time(self) -> Self {
        self.state.lock().real_time = true;
        self
    }

    pub fn push(&self, step: ScriptedStep) {
        self.state.lock().steps.push_back(step);
    }

    pub fn push_reply(&self, frame: impl Into<Vec<u8>>) {
        self.push(ScriptedStep::Reply(frame.into()));
    }

    pub fn push_timeout(&self) {
        self.push(ScriptedStep::Timeout);
    }

    pub fn push_reset(&self) {
        self.push(ScriptedStep::Reset);
    }

    /// Refuse the next `count` connection attempts.
    pub fn refuse_connects(&self, count: usize) {
        self.state.lock().refuse_connects = count;
    }

    /// Every frame written so far, in order.
    pub fn written(&self) -> Vec<Vec<u8>> {
        self.state.lock().written.clone()
    }

    /// Number of frames written, with or without awaiting a reply.
    pub fn exchange_count(&self) -> usize {
        self.state.lock().exchanges
    }

    pub fn connect_count(&self) -> usize {
        self.state.lock().connects
    }

    pub fn pending_steps(&self) -> usize {
        self.state.lock().steps.len()
    }
}

impl Transport for ScriptedTransport {
    fn connect(&mut self, _timeout: Duration) -> Result<()> {
        let mut state = self.state.lock();
        if state.connected {
            return Ok(());
        }
        state.connects += 1;
        if state.refuse_connects > 0 {
            state.refuse_connects -= 1;
            return Err(TransportError::ConnectionRefused {
                endpoint: "scripted".into(),
            });
        }
        state.connected = true;
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.state.lock().connected
    }

    fn send(&mut self, frame: &[u8]) -> Result<()> {
        let mut state = self.state.lock();
        if !state.connected {
            return Err(TransportError::Closed);
        }
        state.exchanges += 1;
        state.written.push(frame.to_vec());
        Ok(())
    }

    fn send_and_await(&mut self, frame: &[u8], timeout: Duration) -> Result<Vec<u8>> {
        let (step, real_time) = {
            let mut state = self.state.lock();
            if !state.connected {
                return Err(TransportError::Closed);
            }
            state.exchanges += 1;
            state.written.push(frame.to_vec());
            (state.steps.pop_front(), state.real_time)
        };

        match step {
            Some(ScriptedStep::Reply(reply)) => Ok(reply),
            Some(ScriptedStep::Reset) => {
                self.state.lock().connected = false;
                Err(TransportError::ConnectionReset)
            }
            Some(ScriptedStep::Timeout) | None => {
                if real_time {
                    thread::sleep(timeout);
                }
                Err(TransportError::Timeout { after: timeout })
            }
        }
    }

    fn close(&mut self) {
        self.state.lock().connected = false;
    }

    fn name(&self) -> &'static str {
        "scripted"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replays_in_order_and_records_frames() {
        let script = ScriptedTransport::new();
        script.push_reply([0x06, 0x01, 0x00, 0x00, 0x06, 0x01]);
        let mut transport = script.clone();
        transport.connect(Duration::from_secs(1)).unwrap();

        let reply = transport
            .send_and_await(&[0x05, 0x01, 0x00, 0x19, 0x1D], Duration::from_secs(1))
            .unwrap();
        assert_eq!(reply, vec![0x06, 0x01, 0x00, 0x00, 0x06, 0x01]);
        assert_eq!(script.written(), vec![vec![0x05, 0x01, 0x00, 0x19, 0x1D]]);
        assert_eq!(script.pending_steps(), 0);
    }

    #[test]
    fn refused_connects_are_counted() {
        let script = ScriptedTransport::new();
        script.refuse_connects(1);
        let mut transport = script.clone();
        assert!(transport.connect(Duration::from_secs(1)).is_err());
        assert!(transport.connect(Duration::from_secs(1)).is_ok());
        assert_eq!(script.connect_count(), 2);
    }

    #[test]
    fn writing_while_closed_fails() {
        let mut transport = ScriptedTransport::new();
        assert_eq!(transport.send(&[0x05]), Err(TransportError::Closed));
    }
}
