//! ---
//! sicp_section: "04-transport"
//! sicp_subsection: "module"
//! sicp_type: "source"
//! sicp_scope: "code"
//! sicp_description: "Blocking TCP link that reads one size-delimited frame per request."
//! sicp_version: "v0.0.0-prealpha"
//! sicp_owner: "tbd"
//! ---
use std::io::{self, Read, Write};
use std::net::{Shutdown, SocketAddr, TcpStream, ToSocketAddrs};
use std::time::{Duration, Instant};

use sicp_proto::{expected_len, TransportError};
use tracing::{debug, warn};

use crate::{Result, Transport};

/// TCP port displays listen on unless configured otherwise.
pub const DEFAULT_PORT: u16 = 5000;

/// TCP link to one display. Connects lazily and drops the stream on any error.
#[derive(Debug)]
pub struct TcpTransport {
    host: String,
    port: u16,
    stream: Option<TcpStream>,
}

impl TcpTransport {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            stream: None,
        }
    }

    pub fn endpoint(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    fn resolve(&self) -> Result<Vec<SocketAddr>> {
        let addrs: Vec<SocketAddr> = (self.host.as_str(), self.port)
            .to_socket_addrs()
            .map_err(|_| TransportError::Resolve {
                host: self.host.clone(),
            })?
            .collect();
        if addrs.is_empty() {
            return Err(TransportError::Resolve {
                host: self.host.clone(),
            });
        }
        Ok(addrs)
    }

    fn stream(&mut self) -> Result<&mut TcpStream> {
        self.stream.as_mut().ok_or(TransportError::Closed)
    }

    fn fail(&mut self, err: &io::Error, waited: Duration) -> TransportError {
        let mapped = TransportError::from_io(err, waited);
        debug!(endpoint = %self.endpoint(), error = %mapped, "dropping TCP stream");
        self.close();
        mapped
    }

    fn write_frame(&mut self, frame: &[u8]) -> Result<()> {
        let stream = self.stream()?;
        let written = stream.write_all(frame).and_then(|_| stream.flush());
        written.map_err(|err| self.fail(&err, Duration::ZERO))
    }

    /// Fill `buf` completely before `deadline`.
    fn read_exact_by(&mut self, buf: &mut [u8], deadline: Instant, budget: Duration) -> Result<()> {
        let mut filled = 0;
        while filled < buf.len() {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                self.close();
                return Err(TransportError::Timeout { after: budget });
            }
            let read = {
                let stream = self.stream()?;
                stream
                    .set_read_timeout(Some(remaining))
                    .and_then(|_| stream.read(&mut buf[filled..]))
            };
            match read {
                Ok(0) => {
                    self.close();
                    return Err(TransportError::ConnectionReset);
                }
                Ok(n) => filled += n,
                Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
                Err(err) => return Err(self.fail(&err, budget)),
            }
        }
        Ok(())
    }
}

/// Try each address in turn, sharing one deadline between them.
fn connect_within(
    addrs: &[SocketAddr],
    deadline: Instant,
) -> io::Result<(TcpStream, SocketAddr)> {
    let mut last_error = io::Error::from(io::ErrorKind::TimedOut);
    for addr in addrs {
        let remaining = deadline.saturating_duration_since(Instant::now());
        if remaining.is_zero() {
            return Err(io::Error::from(io::ErrorKind::TimedOut));
        }
        match TcpStream::connect_timeout(addr, remaining) {
            Ok(stream) => return Ok((stream, *addr)),
            Err(err) => last_error = err,
        }
    }
    Err(last_error)
}

impl Transport for TcpTransport {
    fn connect(&mut self, timeout: Duration) -> Result<()> {
        if self.stream.is_some() {
            return Ok(());
        }

        let deadline = Instant::now() + timeout;
        match connect_within(&self.resolve()?, deadline) {
            Ok((stream, addr)) => {
                if let Err(err) = stream.set_nodelay(true) {
                    warn!(endpoint = %self.endpoint(), error = %err, "unable to disable Nagle");
                }
                debug!(endpoint = %self.endpoint(), %addr, "TCP link established");
                self.stream = Some(stream);
                Ok(())
            }
            Err(err) if err.kind() == io::ErrorKind::ConnectionRefused => {
                Err(TransportError::ConnectionRefused {
                    endpoint: self.endpoint(),
                })
            }
            Err(err) => Err(TransportError::from_io(&err, timeout)),
        }
    }

    fn is_connected(&self) -> bool {
        self.stream.is_some()
    }

    fn send(&mut self, frame: &[u8]) -> Result<()> {
        self.write_frame(frame)
    }

    fn send_and_await(&mut self, frame: &[u8], timeout: Duration) -> Result<Vec<u8>> {
        let deadline = Instant::now() + timeout;
        self.write_frame(frame)?;

        let mut size = [0u8; 1];
        self.read_exact_by(&mut size, deadline, timeout)?;
        let Some(total) = expected_len(size[0]) else {
            // Out of sync with the byte stream; hand back what arrived and start over.
            warn!(endpoint = %self.endpoint(), size = size[0], "invalid frame size byte");
            self.close();
            return Ok(size.to_vec());
        };

        let mut reply = vec![0u8; total];
        reply[0] = size[0];
        self.read_exact_by(&mut reply[1..], deadline, timeout)?;
        Ok(reply)
    }

    fn close(&mut self) {
        if let Some(stream) = self.stream.take() {
            let _ = stream.shutdown(Shutdown::Both);
        }
    }

    fn name(&self) -> &'static str {
        "tcp"
    }
}

impl Drop for TcpTransport {
    fn drop(&mut self) {
        self.close();
    }
}
