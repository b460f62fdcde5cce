//! ---
//! sicp_section: "11-simulation"
//! sicp_subsection: "module"
//! sicp_type: "source"
//! sicp_scope: "code"
//! sicp_description: "In-memory display panel that answers SICP frames."
//! sicp_version: "v0.0.0-prealpha"
//! sicp_owner: "tbd"
//! ---
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use sicp_proto::{
    CommandDescriptor, Direction, Frame, InputSource, Registry, WireCode, ACK, COMMUNICATION_CONTROL,
    NACK, NAV,
};
use sicp_transport::{Result, Transport, TransportError};
use tracing::trace;

const BRIGHTNESS_SET: u8 = 0x32;
const VOLUME_SET: u8 = 0x44;
const MONITOR_ID_SET: u8 = 0x69;
const INPUT_SOURCE_GET: u8 = 0xAD;
const NO_CHANGE: u8 = 0xFF;

/// Opcodes a panel refuses while an internal (Android) source is shown.
const VIDEO_OPCODES: [u8; 6] = [0x32, 0x33, 0x34, 0x35, 0x11, 0x12];

type RegisterKey = (u8, Vec<u8>);

#[derive(Debug)]
struct Panel {
    monitor_id: u8,
    group_id: u8,
    /// Get reply payloads keyed by get opcode and request parameters.
    registers: HashMap<RegisterKey, Vec<u8>>,
    unsupported: HashSet<u8>,
    key_presses: Vec<u8>,
    received: Vec<Frame>,
    connected: bool,
    silent: bool,
    unreachable: bool,
}

/// Simulated display panel speaking SICP over the [`Transport`] trait.
///
/// Sets update the panel's registers and are acknowledged; gets answer from
/// them. Clones share the panel, so a test can inspect it after handing a
/// clone to a session.
#[derive(Debug, Clone)]
pub struct SimulatedDisplay {
    panel: Arc<Mutex<Panel>>,
}

impl SimulatedDisplay {
    /// A panel with monitor id `monitor_id`, powered on, showing HDMI 1.
    pub fn new(monitor_id: u8) -> Self {
        let mut registers = HashMap::new();
        let mut preset = |opcode: u8, payload: &[u8]| {
            registers.insert((opcode, Vec::new()), payload.to_vec());
        };
        preset(0x19, &[0x02]); // power on
        preset(0xA4, &[0x02]); // cold start: last status
        preset(0x7A, &[0x00]);
        preset(0x65, &[0x04]); // standard
        preset(0x33, &[70]);
        preset(0x35, &[0x06]); // 6500K
        preset(0x12, &[65]);
        preset(0x59, &[0x01]);
        preset(0xD3, &[0x03]);
        preset(0xD1, &[0x00]);
        preset(0xDE, &[0x00]);
        preset(0x3F, &[0x01]);
        preset(INPUT_SOURCE_GET, &[0x0D, 0x00, 0x01, 0x00]);
        preset(0xAF, &[0x00]);
        preset(0x1D, &[0x01]);
        preset(0x6C, &[0x00]);
        preset(0x2D, &[10]);
        preset(0x5D, &[0xFF]);
        preset(0x71, &[0x00]);
        preset(0x45, &[30, 30]);
        preset(0x46, &[0x00]);
        preset(0x9C, &[0x00]);
        preset(0xC6, &[0x00]);
        preset(0x2F, &[38, 41, 0xFF]);
        preset(0x15, b"AU1A2231000123");

        Self {
            panel: Arc::new(Mutex::new(Panel {
                monitor_id,
                group_id: 0,
                registers,
                unsupported: HashSet::new(),
                key_presses: Vec::new(),
                received: Vec::new(),
                connected: false,
                silent: false,
                unreachable: false,
            })),
        }
        .with_model_info(0x00, "55BDL4511D/00")
        .with_model_info(0x01, "FB02.05")
        .with_sicp_info(0x00, "2.07")
        .with_sicp_info(0x01, "Android")
        .with_ip_parameter(0x01, b"192168001050")
        .with_ip_parameter(0x06, &[0x00, 0x1B, 0x2C, 0x3D, 0x4E, 0x5F])
    }

    pub fn with_model_info(self, field: u8, text: &str) -> Self {
        self.panel
            .lock()
            .registers
            .insert((0xA1, vec![field]), text.as_bytes().to_vec());
        self
    }

    pub fn with_sicp_info(self, field: u8, text: &str) -> Self {
        self.panel
            .lock()
            .registers
            .insert((0xA2, vec![field]), text.as_bytes().to_vec());
        self
    }

    /// Current-value IP setting; the reply echoes the selector bytes.
    pub fn with_ip_parameter(self, parameter: u8, value: &[u8]) -> Self {
        let mut payload = vec![parameter, 0x01];
        payload.extend_from_slice(value);
        self.panel
            .lock()
            .registers
            .insert((0x82, vec![parameter, 0x01]), payload);
        self
    }

    /// Replace the reply payload of a parameterless get.
    pub fn with_register(self, get_opcode: u8, payload: &[u8]) -> Self {
        self.panel
            .lock()
            .registers
            .insert((get_opcode, Vec::new()), payload.to_vec());
        self
    }

    /// Answer NAV to a command, as panels lacking the feature do.
    pub fn without(self, command: &str) -> Self {
        if let Ok(descriptor) = Registry::global().resolve(command) {
            self.panel.lock().unsupported.insert(descriptor.opcode);
        }
        self
    }

    pub fn with_group(self, group_id: u8) -> Self {
        self.panel.lock().group_id = group_id;
        self
    }

    /// Keep the link open but stop answering.
    pub fn go_silent(&self) {
        self.panel.lock().silent = true;
    }

    /// Refuse new connections.
    pub fn unplug(&self) {
        let mut panel = self.panel.lock();
        panel.unreachable = true;
        panel.connected = false;
    }

    pub fn monitor_id(&self) -> u8 {
        self.panel.lock().monitor_id
    }

    /// Raw reply payload the panel would give for a parameterless get.
    pub fn register(&self, get_opcode: u8) -> Option<Vec<u8>> {
        self.panel
            .lock()
            .registers
            .get(&(get_opcode, Vec::new()))
            .cloned()
    }

    /// Every frame the panel accepted, in arrival order.
    pub fn received(&self) -> Vec<Frame> {
        self.panel.lock().received.clone()
    }

    pub fn request_count(&self) -> usize {
        self.panel.lock().received.len()
    }

    pub fn key_presses(&self) -> Vec<u8> {
        self.panel.lock().key_presses.clone()
    }

    /// Answer one raw request frame as the panel would, regardless of the
    /// link state. `None` when the panel stays silent.
    pub fn respond(&self, raw: &[u8]) -> Option<Vec<u8>> {
        let mut panel = self.panel.lock();
        if panel.silent {
            return None;
        }
        panel.handle(raw)
    }

    fn connected_panel(&self) -> Result<parking_lot::MutexGuard<'_, Panel>> {
        let panel = self.panel.lock();
        if panel.connected {
            Ok(panel)
        } else {
            Err(TransportError::Closed)
        }
    }
}

impl Panel {
    fn addressed(&self, frame: &Frame) -> bool {
        frame.monitor_id == 0
            || frame.monitor_id == self.monitor_id
            || (frame.group_id != 0 && frame.group_id == self.group_id)
    }

    fn internal_source_active(&self) -> bool {
        self.registers
            .get(&(INPUT_SOURCE_GET, Vec::new()))
            .and_then(|payload| payload.first().copied())
            .and_then(InputSource::from_code)
            .is_some_and(InputSource::is_internal)
    }

    /// Process one request. `None` means the panel stays silent.
    fn handle(&mut self, raw: &[u8]) -> Option<Vec<u8>> {
        let frame = match Frame::decode(raw) {
            Ok(frame) => frame,
            Err(err) => {
                trace!(error = %err, "simulated panel rejects malformed frame");
                return Some(control(self.monitor_id, 0, NACK));
            }
        };
        if !self.addressed(&frame) {
            return None;
        }
        self.received.push(frame.clone());
        let reply_monitor = self.monitor_id;
        let group = frame.group_id;

        let Some(descriptor) = Registry::global()
            .iter()
            .find(|descriptor| descriptor.opcode == frame.opcode)
        else {
            return Some(control(reply_monitor, group, NAV));
        };
        if self.unsupported.contains(&frame.opcode)
            || (VIDEO_OPCODES.contains(&frame.opcode) && self.internal_source_active())
        {
            return Some(control(reply_monitor, group, NAV));
        }

        match descriptor.direction {
            Direction::Get => Some(self.answer_get(descriptor, &frame)),
            Direction::Set => {
                let status = self.apply_set(descriptor, &frame);
                Some(control(reply_monitor, group, status))
            }
        }
    }

    fn answer_get(&self, descriptor: &CommandDescriptor, frame: &Frame) -> Vec<u8> {
        match self
            .registers
            .get(&(descriptor.opcode, frame.parameters.clone()))
        {
            Some(payload) => encode(self.monitor_id, frame.group_id, descriptor.opcode, payload),
            None => control(self.monitor_id, frame.group_id, NAV),
        }
    }

    /// Returns the communication-control status to answer with.
    fn apply_set(&mut self, descriptor: &CommandDescriptor, frame: &Frame) -> u8 {
        let params = &frame.parameters;
        match descriptor.opcode {
            MONITOR_ID_SET => {
                return match params.first() {
                    Some(&id) if id != 0 => {
                        self.monitor_id = id;
                        ACK
                    }
                    _ => NACK,
                };
            }
            0xFE => {
                return match params.first() {
                    Some(&key) => {
                        self.key_presses.push(key);
                        ACK
                    }
                    None => NACK,
                };
            }
            _ => {}
        }

        let (Some(get), _) = Registry::global().pair(descriptor.family_name()) else {
            return ACK;
        };
        let key = (get.opcode, Vec::new());
        let payload = match descriptor.opcode {
            BRIGHTNESS_SET => params.iter().take(1).copied().collect(),
            VOLUME_SET => {
                let mut levels = self.registers.get(&key).cloned().unwrap_or_default();
                levels.resize(params.len().max(levels.len()), 0);
                for (slot, level) in levels.iter_mut().zip(params) {
                    if *level != NO_CHANGE {
                        *slot = *level;
                    }
                }
                levels
            }
            _ => params.clone(),
        };
        if get.response.decode(&payload).is_err() {
            return NACK;
        }
        self.registers.insert(key, payload);
        ACK
    }
}

impl Transport for SimulatedDisplay {
    fn connect(&mut self, _timeout: Duration) -> Result<()> {
        let mut panel = self.panel.lock();
        if panel.unreachable {
            return Err(TransportError::ConnectionRefused {
                endpoint: "simulated display".into(),
            });
        }
        panel.connected = true;
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.panel.lock().connected
    }

    fn send(&mut self, frame: &[u8]) -> Result<()> {
        let mut panel = self.connected_panel()?;
        let _ = panel.handle(frame);
        Ok(())
    }

    fn send_and_await(&mut self, frame: &[u8], timeout: Duration) -> Result<Vec<u8>> {
        let mut panel = self.connected_panel()?;
        if panel.silent {
            return Err(TransportError::Timeout { after: timeout });
        }
        panel
            .handle(frame)
            .ok_or(TransportError::Timeout { after: timeout })
    }

    fn close(&mut self) {
        self.panel.lock().connected = false;
    }

    fn name(&self) -> &'static str {
        "simulated"
    }
}

fn encode(monitor_id: u8, group_id: u8, opcode: u8, payload: &[u8]) -> Vec<u8> {
    match Frame::new(monitor_id, group_id, opcode, payload) {
        Ok(frame) => frame.encode().to_vec(),
        Err(_) => control(monitor_id, group_id, NACK),
    }
}

fn control(monitor_id: u8, group_id: u8, status: u8) -> Vec<u8> {
    encode(monitor_id, group_id, COMMUNICATION_CONTROL, &[status])
}
