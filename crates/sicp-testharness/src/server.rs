//! ---
//! sicp_section: "11-simulation"
//! sicp_subsection: "module"
//! sicp_type: "source"
//! sicp_scope: "code"
//! sicp_description: "Loopback TCP listener serving a simulated display."
//! sicp_version: "v0.0.0-prealpha"
//! sicp_owner: "tbd"
//! ---
use std::io::{self, Read, Write};
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use sicp_proto::expected_len;
use tracing::{debug, trace};

use crate::display::SimulatedDisplay;

const POLL_INTERVAL: Duration = Duration::from_millis(20);

/// Serves a [`SimulatedDisplay`] on `127.0.0.1` until dropped.
pub struct PanelServer {
    address: SocketAddr,
    shutdown: Arc<AtomicBool>,
    worker: Option<JoinHandle<()>>,
}

impl PanelServer {
    pub fn spawn(display: SimulatedDisplay) -> io::Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0")?;
        listener.set_nonblocking(true)?;
        let address = listener.local_addr()?;
        let shutdown = Arc::new(AtomicBool::new(false));
        let stop = shutdown.clone();

        let worker = thread::spawn(move || {
            while !stop.load(Ordering::Relaxed) {
                match listener.accept() {
                    Ok((stream, peer)) => {
                        debug!(%peer, "simulated panel accepted connection");
                        let display = display.clone();
                        let stop = stop.clone();
                        thread::spawn(move || serve(stream, display, stop));
                    }
                    Err(err) if err.kind() == io::ErrorKind::WouldBlock => {
                        thread::sleep(POLL_INTERVAL)
                    }
                    Err(err) => {
                        debug!(error = %err, "simulated panel listener failed");
                        break;
                    }
                }
            }
        });

        Ok(Self {
            address,
            shutdown,
            worker: Some(worker),
        })
    }

    pub fn address(&self) -> SocketAddr {
        self.address
    }

    pub fn port(&self) -> u16 {
        self.address.port()
    }
}

impl Drop for PanelServer {
    fn drop(&mut self) {
        self.shutdown.store(true, Ordering::Relaxed);
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}

fn serve(mut stream: TcpStream, display: SimulatedDisplay, stop: Arc<AtomicBool>) {
    if stream.set_nonblocking(false).is_err()
        || stream.set_read_timeout(Some(POLL_INTERVAL)).is_err()
    {
        return;
    }
    let mut size = [0u8; 1];
    while !stop.load(Ordering::Relaxed) {
        match stream.read_exact(&mut size) {
            Ok(()) => {}
            Err(err)
                if matches!(err.kind(), io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut) =>
            {
                continue
            }
            Err(_) => return,
        }
        let Some(len) = expected_len(size[0]) else {
            trace!(size = size[0], "dropping connection after invalid size byte");
            return;
        };
        let mut frame = vec![0u8; len];
        frame[0] = size[0];
        if stream.set_read_timeout(Some(Duration::from_secs(1))).is_err()
            || stream.read_exact(&mut frame[1..]).is_err()
            || stream.set_read_timeout(Some(POLL_INTERVAL)).is_err()
        {
            return;
        }
        if let Some(reply) = display.respond(&frame) {
            if stream.write_all(&reply).is_err() {
                return;
            }
        }
    }
}
