//! ---
//! sicp_section: "04-transport"
//! sicp_subsection: "module"
//! sicp_type: "source"
//! sicp_scope: "code"
//! sicp_description: "Session owning one transport and applying the retry policy."
//! sicp_version: "v0.0.0-prealpha"
//! sicp_owner: "tbd"
//! ---
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use sicp_proto::TransportError;
use tracing::{debug, warn};

use crate::{Result, Transport};

/// How long to wait for each attempt and how many attempts to make.
///
/// Only timeouts are retried. Each attempt, reconnect included, must finish
/// within `timeout`, so a call never takes longer than `attempts * timeout`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryPolicy {
    pub attempts: u32,
    pub timeout: Duration,
}

impl RetryPolicy {
    pub const DEFAULT_ATTEMPTS: u32 = 3;
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(2);

    pub fn new(attempts: u32, timeout: Duration) -> Self {
        Self { attempts, timeout }
    }

    /// Upper bound on the wall-clock time of one exchange.
    pub fn budget(&self) -> Duration {
        self.timeout * self.attempts.max(1)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(Self::DEFAULT_ATTEMPTS, Self::DEFAULT_TIMEOUT)
    }
}

/// One logical connection to a display.
pub struct Session {
    transport: Box<dyn Transport>,
    policy: RetryPolicy,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("transport", &self.transport.name())
            .field("connected", &self.transport.is_connected())
            .field("policy", &self.policy)
            .finish()
    }
}

impl Session {
    /// Wrap a transport without opening it; the first exchange connects.
    pub fn new(transport: impl Transport + 'static, policy: RetryPolicy) -> Self {
        Self {
            transport: Box::new(transport),
            policy,
        }
    }

    /// Wrap a transport and open it immediately.
    pub fn connect(transport: impl Transport + 'static, policy: RetryPolicy) -> Result<Self> {
        let mut session = Self::new(transport, policy);
        session.transport.connect(policy.timeout)?;
        Ok(session)
    }

    pub fn policy(&self) -> RetryPolicy {
        self.policy
    }

    pub fn transport_name(&self) -> &'static str {
        self.transport.name()
    }

    pub fn is_connected(&self) -> bool {
        self.transport.is_connected()
    }

    /// Drop and reopen the link. Safe to call repeatedly.
    pub fn reconnect(&mut self) -> Result<()> {
        self.transport.close();
        self.transport.connect(self.policy.timeout)
    }

    pub fn close(&mut self) {
        self.transport.close();
    }

    /// Send one frame. With `expect_reply` the raw reply frame is returned;
    /// without it the frame is written and `Ok(None)` returned.
    pub fn exchange(&mut self, frame: &[u8], expect_reply: bool) -> Result<Option<Vec<u8>>> {
        let attempts = self.policy.attempts.max(1);
        let mut last_timeout = None;

        for attempt in 1..=attempts {
            let started = Instant::now();
            if attempt > 1 {
                // A late reply to the previous attempt must not be read as this one's.
                debug!(
                    transport = self.transport.name(),
                    attempt,
                    "reconnecting before retry"
                );
                self.transport.close();
            }

            match self.attempt(frame, expect_reply, started) {
                Ok(reply) => return Ok(reply),
                Err(err) if err.is_timeout() => {
                    warn!(
                        transport = self.transport.name(),
                        attempt,
                        attempts,
                        timeout_ms = self.policy.timeout.as_millis() as u64,
                        "exchange timed out"
                    );
                    last_timeout = Some(err);
                }
                Err(err) => {
                    debug!(transport = self.transport.name(), error = %err, "exchange failed");
                    self.transport.close();
                    return Err(err);
                }
            }
        }

        self.transport.close();
        Err(last_timeout.unwrap_or(TransportError::Timeout {
            after: self.policy.timeout,
        }))
    }

    fn attempt(
        &mut self,
        frame: &[u8],
        expect_reply: bool,
        started: Instant,
    ) -> Result<Option<Vec<u8>>> {
        let timeout = self.policy.timeout;
        if !self.transport.is_connected() {
            self.transport.connect(timeout)?;
        }
        if !expect_reply {
            self.transport.send(frame)?;
            return Ok(None);
        }

        let remaining = remaining(timeout, started);
        if remaining.is_zero() {
            return Err(TransportError::Timeout { after: timeout });
        }
        self.transport.send_and_await(frame, remaining).map(Some)
    }
}

fn remaining(timeout: Duration, started: Instant) -> Duration {
    timeout.saturating_sub(started.elapsed())
}
