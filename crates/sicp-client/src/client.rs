//! ---
//! sicp_section: "05-networking-external-interfaces"
//! sicp_subsection: "module"
//! sicp_type: "source"
//! sicp_scope: "code"
//! sicp_description: "Typed client facade over one display session."
//! sicp_version: "v0.0.0-prealpha"
//! sicp_owner: "tbd"
//! ---
use std::sync::Arc;
use std::time::Instant;

use parking_lot::Mutex;
use sicp_common::{DisplayConfig, TransportConfig};
use sicp_logging::{sicp_info, sicp_warn, LogContext};
use sicp_proto::{
    classify, Address, ApmMode, AutoSignalMode, Choice, ColdStartPowerState,
    ColorTemperatureMode, CommandDescriptor, GroupSetting, InputSelection,
    IpParameterCode, IpValueType, ModelInfoField, Outcome, Param, PictureStyle, PowerOnLogoMode,
    PowerSaveMode, PowerState, ProtocolViolation, Registry, RemoteKey, RemoteLockState,
    SicpInfoField, SmartPowerLevel, TemperatureReading, TestPattern, Value, VolumeLevels,
};
use sicp_transport::{Session, TcpTransport, Transport, TransportError};

use crate::sink::{CallEvent, EventSink, TracingSink};

/// Blocking client for one display.
///
/// Every operation performs exactly one frame exchange. The session sits
/// behind a mutex, so a client can be shared between threads but never has
/// two requests in flight.
pub struct Client {
    session: Mutex<Session>,
    target: Address,
    display: Option<String>,
    sink: Arc<dyn EventSink>,
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("target", &self.target)
            .field("display", &self.display)
            .field("session", &*self.session.lock())
            .finish()
    }
}

impl Client {
    pub fn new(session: Session, target: Address) -> Self {
        Self {
            session: Mutex::new(session),
            target,
            display: None,
            sink: Arc::new(TracingSink),
        }
    }

    /// Open a TCP link to a configured display.
    pub fn connect(
        display: &DisplayConfig,
        transport: &TransportConfig,
    ) -> Result<Self, TransportError> {
        let mut link = TcpTransport::new(display.host.clone(), display.port_or(transport.port));
        link.connect(transport.connect_timeout)?;
        Ok(Self::open_with(link, display, transport))
    }

    /// Like [`Client::connect`], but the link is opened by the first call.
    /// An unreachable display then shows up as a `TransportFailure` outcome.
    pub fn open(display: &DisplayConfig, transport: &TransportConfig) -> Self {
        let link = TcpTransport::new(display.host.clone(), display.port_or(transport.port));
        Self::open_with(link, display, transport)
    }

    fn open_with(link: TcpTransport, display: &DisplayConfig, transport: &TransportConfig) -> Self {
        Self::new(
            Session::new(link, transport.retry_policy()),
            display.address(),
        )
    }

    pub fn with_sink(mut self, sink: Arc<dyn EventSink>) -> Self {
        self.sink = sink;
        self
    }

    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display = Some(name.into());
        self
    }

    pub fn target(&self) -> Address {
        self.target
    }

    pub fn display_name(&self) -> Option<&str> {
        self.display.as_deref()
    }

    /// Run any catalog command against `target`.
    ///
    /// Unknown commands, invalid addresses and invalid parameters end in
    /// `ProtocolViolation` before the session is touched.
    pub fn call(&self, command: &str, param: Param, target: Address) -> Outcome<Value> {
        let started = Instant::now();
        let outcome = match Registry::global().resolve(command) {
            Ok(descriptor) => self.execute(descriptor, &param, target),
            Err(err) => Outcome::ProtocolViolation(err),
        };
        let event = CallEvent::new(
            self.display.as_deref(),
            target,
            command,
            &outcome,
            started.elapsed(),
        );
        self.sink.record(&event);
        outcome
    }

    fn execute(
        &self,
        descriptor: &CommandDescriptor,
        param: &Param,
        target: Address,
    ) -> Outcome<Value> {
        let frame = match descriptor.request_frame(target, param) {
            Ok(frame) => frame.encode(),
            Err(err) => return Outcome::ProtocolViolation(err),
        };
        let reply = self
            .session
            .lock()
            .exchange(&frame, !target.is_broadcast());
        classify(descriptor, reply)
    }

    /// Drop and reopen the link.
    pub fn reconnect(&self) -> Result<(), TransportError> {
        let ctx = self.log_context();
        sicp_info!(context = ctx, "reopening display link");
        self.session
            .lock()
            .reconnect()
            .inspect_err(|err| sicp_warn!(context = ctx, "reconnect failed: {err}"))
    }

    pub fn close(&self) {
        self.session.lock().close();
        sicp_info!(context = self.log_context(), "display link closed");
    }

    fn log_context(&self) -> LogContext<'_> {
        let ctx = LogContext::new().with_address(self.target.monitor_id, self.target.group_id);
        match self.display.as_deref() {
            Some(name) => ctx.with_display(name),
            None => ctx,
        }
    }

    fn get<T>(
        &self,
        command: &str,
        param: Param,
        expected: &'static str,
        extract: impl FnOnce(Value) -> Result<T, Value>,
    ) -> Outcome<T> {
        self.call(command, param, self.target)
            .try_map(|value| {
                extract(value).map_err(|other| ProtocolViolation::UnexpectedValue {
                    expected,
                    received: other.to_string(),
                })
            })
    }

    fn set(&self, command: &str, param: Param) -> Outcome<()> {
        self.call(command, param, self.target).map(|_| ())
    }

    fn get_choice<T: TryFrom<Choice>>(&self, command: &str, expected: &'static str) -> Outcome<T> {
        self.get(command, Param::None, expected, |value| match value {
            Value::Choice(choice) => T::try_from(choice).map_err(|_| Value::Choice(choice)),
            other => Err(other),
        })
    }

    fn get_switch(&self, command: &str) -> Outcome<bool> {
        self.get(command, Param::None, "on/off", |value| match value {
            Value::Switch(state) => Ok(state),
            other => Err(other),
        })
    }

    fn get_text(&self, command: &str, param: Param) -> Outcome<String> {
        self.get(command, param, "text", |value| match value {
            Value::Text(text) => Ok(text),
            other => Err(other),
        })
    }

    fn set_choice(&self, command: &str, choice: impl Into<Choice>) -> Outcome<()> {
        self.set(command, Param::Choice(choice.into()))
    }
}

/// Typed get/set pairs for the enumerated families.
macro_rules! choice_operations {
    ($($family:ty, $label:literal => $get:ident, $set:ident;)+) => {
        impl Client {
            $(
                pub fn $get(&self) -> Outcome<$family> {
                    self.get_choice(stringify!($get), $label)
                }

                pub fn $set(&self, value: $family) -> Outcome<()> {
                    self.set_choice(stringify!($set), value)
                }
            )+
        }
    };
}

choice_operations! {
    PowerState, "power state" => get_power_state, set_power_state;
    ColdStartPowerState, "cold-start power state" => get_cold_start_power_state, set_cold_start_power_state;
    PictureStyle, "picture style" => get_picture_style, set_picture_style;
    ColorTemperatureMode, "colour temperature preset" => get_color_temperature_mode, set_color_temperature_mode;
    PowerSaveMode, "power save mode" => get_power_save_mode, set_power_save_mode;
    ApmMode, "advanced power management mode" => get_apm_mode, set_apm_mode;
    SmartPowerLevel, "smart power level" => get_smart_power_level, set_smart_power_level;
    PowerOnLogoMode, "power-on logo mode" => get_power_on_logo_mode, set_power_on_logo_mode;
    AutoSignalMode, "auto signal mode" => get_auto_signal_mode, set_auto_signal_mode;
    RemoteLockState, "remote lock state" => get_remote_lock, set_remote_lock;
    TestPattern, "test pattern" => get_test_pattern, set_test_pattern;
}

/// Typed get/set pairs for on/off settings.
macro_rules! switch_operations {
    ($($get:ident, $set:ident;)+) => {
        impl Client {
            $(
                pub fn $get(&self) -> Outcome<bool> {
                    self.get_switch(stringify!($get))
                }

                pub fn $set(&self, on: bool) -> Outcome<()> {
                    self.set(stringify!($set), Param::Flag(on))
                }
            )+
        }
    };
}

switch_operations! {
    get_av_mute, set_av_mute;
    get_backlight, set_backlight;
    get_mute, set_mute;
    get_wake_on_lan, set_wake_on_lan;
    get_android_4k, set_android_4k;
}

impl Client {
    pub fn get_temperature(&self) -> Outcome<Vec<TemperatureReading>> {
        self.get("get_temperature", Param::None, "temperatures", |value| match value {
            Value::Temperatures(readings) => Ok(readings),
            other => Err(other),
        })
    }

    pub fn get_model_info(&self, field: ModelInfoField) -> Outcome<String> {
        self.get_text("get_model_info", Param::Choice(field.into()))
    }

    pub fn get_sicp_info(&self, field: SicpInfoField) -> Outcome<String> {
        self.get_text("get_sicp_info", Param::Choice(field.into()))
    }

    pub fn get_serial_number(&self) -> Outcome<String> {
        self.get_text("get_serial_number", Param::None)
    }

    pub fn get_brightness_level(&self) -> Outcome<u8> {
        self.get("get_brightness_level", Param::None, "percent", |value| match value {
            Value::Percent(level) => Ok(level),
            other => Err(other),
        })
    }

    /// Levels outside 0..=100 are refused without contacting the display.
    pub fn set_brightness_level(&self, level: u8) -> Outcome<()> {
        self.set("set_brightness_level", Param::Number(level.into()))
    }

    pub fn get_precise_color_temperature(&self) -> Outcome<u16> {
        self.get("get_precise_color_temperature", Param::None, "kelvin", |value| match value {
            Value::Kelvin(kelvin) => Ok(kelvin),
            other => Err(other),
        })
    }

    /// Rounded to the nearest 100 K. Takes effect once the preset is user 2;
    /// the preset is left as it is.
    pub fn set_precise_color_temperature(&self, kelvin: u16) -> Outcome<()> {
        self.set("set_precise_color_temperature", Param::Number(kelvin.into()))
    }

    pub fn get_video_signal(&self) -> Outcome<bool> {
        self.get_switch("get_video_signal")
    }

    /// Active source with its playlist slot.
    pub fn get_input_source(&self) -> Outcome<InputSelection> {
        self.get("get_input_source", Param::None, "input selection", |value| match value {
            Value::Input(selection) => Ok(selection),
            other => Err(other),
        })
    }

    pub fn set_input_source(&self, selection: InputSelection) -> Outcome<()> {
        self.set("set_input_source", Param::Input(selection))
    }

    pub fn simulate_remote_key(&self, key: RemoteKey) -> Outcome<()> {
        self.set_choice("simulate_remote_key", key)
    }

    pub fn get_osd_info(&self) -> Outcome<u8> {
        self.get("get_osd_info", Param::None, "seconds", |value| match value {
            Value::Seconds(seconds) => Ok(seconds),
            other => Err(other),
        })
    }

    pub fn set_osd_info(&self, seconds: u8) -> Outcome<()> {
        self.set("set_osd_info", Param::Number(seconds.into()))
    }

    pub fn get_group_id(&self) -> Outcome<GroupSetting> {
        self.get("get_group_id", Param::None, "group", |value| match value {
            Value::Group(group) => Ok(group),
            other => Err(other),
        })
    }

    pub fn set_group_id(&self, group: GroupSetting) -> Outcome<()> {
        self.set("set_group_id", Param::Number(group.code().into()))
    }

    /// The display answers further requests under the new id only.
    pub fn set_monitor_id(&self, monitor_id: u8) -> Outcome<()> {
        self.set("set_monitor_id", Param::Number(monitor_id.into()))
    }

    pub fn get_volume(&self) -> Outcome<VolumeLevels> {
        self.get("get_volume", Param::None, "volume levels", |value| match value {
            Value::Volume(levels) => Ok(levels),
            other => Err(other),
        })
    }

    /// `None` leaves that output unchanged.
    pub fn set_volume(&self, speaker: Option<u8>, audio_out: Option<u8>) -> Outcome<()> {
        self.set("set_volume", Param::Volume { speaker, audio_out })
    }

    pub fn get_ip_parameter(
        &self,
        parameter: IpParameterCode,
        value_type: IpValueType,
    ) -> Outcome<String> {
        self.get_text(
            "get_ip_parameter",
            Param::Ip {
                parameter,
                value_type,
            },
        )
    }
}
