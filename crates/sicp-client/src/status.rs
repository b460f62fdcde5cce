//! ---
//! sicp_section: "05-networking-external-interfaces"
//! sicp_subsection: "module"
//! sicp_type: "source"
//! sicp_scope: "code"
//! sicp_description: "Status snapshot consumed by polling integrations."
//! sicp_version: "v0.0.0-prealpha"
//! sicp_owner: "tbd"
//! ---
//! One-shot status snapshot.
//!
//! A polling integration calls [`Client::fetch_status`] on its own schedule.
//! Readings a display refuses become [`Reading::Unavailable`] so the caller
//! can hide the feature instead of reporting an error.

use serde::Serialize;
use sicp_proto::{
    Address, ColdStartPowerState, ColorTemperatureMode, InputSelection, ModelInfoField, Outcome,
    PictureStyle, PowerOnLogoMode, PowerState, RejectReason, SicpInfoField, SmartPowerLevel,
    TemperatureReading, VolumeLevels,
};
use tracing::debug;

use crate::client::Client;

/// Result of one status read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "detail", rename_all = "snake_case")]
pub enum Reading<T> {
    Value(T),
    /// The display answered but does not offer this reading right now.
    Unavailable(RejectReason),
    Failed(String),
    /// Not read because the display is offline.
    Skipped,
}

impl<T> Reading<T> {
    pub fn value(&self) -> Option<&T> {
        match self {
            Reading::Value(value) => Some(value),
            _ => None,
        }
    }

    pub fn is_unavailable(&self) -> bool {
        matches!(self, Reading::Unavailable(_))
    }
}

impl<T> From<Outcome<T>> for Reading<T> {
    fn from(outcome: Outcome<T>) -> Self {
        match outcome {
            Outcome::Success(value) => Reading::Value(value),
            Outcome::DeviceRejected(reason) => Reading::Unavailable(reason),
            Outcome::TransportFailure(err) => Reading::Failed(err.to_string()),
            Outcome::ProtocolViolation(err) => Reading::Failed(err.to_string()),
        }
    }
}

/// One labelled text field of the identity block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InfoReading<F> {
    pub field: F,
    pub reading: Reading<String>,
}

/// SICP info fields included in the snapshot.
const POLLED_SICP_INFO: [SicpInfoField; 3] = [
    SicpInfoField::PlatformLabel,
    SicpInfoField::PlatformVersion,
    SicpInfoField::CustomIntentVersion,
];

/// Everything a polling integration shows for one display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplayStatus {
    pub display: Option<String>,
    pub address: Address,
    /// `Value(Offline)` when the power query could not reach the display.
    pub power: Reading<PowerState>,
    pub backlight: Reading<bool>,
    pub model: Reading<String>,
    pub serial_number: Reading<String>,
    pub sicp_info: Vec<InfoReading<SicpInfoField>>,
    pub input_source: Reading<InputSelection>,
    pub video_signal: Reading<bool>,
    pub brightness: Reading<u8>,
    pub picture_style: Reading<PictureStyle>,
    pub color_temperature: Reading<ColorTemperatureMode>,
    pub precise_color_temperature: Reading<u16>,
    pub smart_power_level: Reading<SmartPowerLevel>,
    pub power_on_logo: Reading<PowerOnLogoMode>,
    pub cold_start_power_state: Reading<ColdStartPowerState>,
    pub volume: Reading<VolumeLevels>,
    pub mute: Reading<bool>,
    pub temperature: Reading<Vec<TemperatureReading>>,
}

impl DisplayStatus {
    fn offline(display: Option<String>, address: Address) -> Self {
        Self {
            display,
            address,
            power: Reading::Value(PowerState::Offline),
            backlight: Reading::Skipped,
            model: Reading::Skipped,
            serial_number: Reading::Skipped,
            sicp_info: POLLED_SICP_INFO
                .iter()
                .map(|field| InfoReading {
                    field: *field,
                    reading: Reading::Skipped,
                })
                .collect(),
            input_source: Reading::Skipped,
            video_signal: Reading::Skipped,
            brightness: Reading::Skipped,
            picture_style: Reading::Skipped,
            color_temperature: Reading::Skipped,
            precise_color_temperature: Reading::Skipped,
            smart_power_level: Reading::Skipped,
            power_on_logo: Reading::Skipped,
            cold_start_power_state: Reading::Skipped,
            volume: Reading::Skipped,
            mute: Reading::Skipped,
            temperature: Reading::Skipped,
        }
    }

    /// Reachable over the network, whether or not the power state was readable.
    pub fn is_online(&self) -> bool {
        self.power != Reading::Value(PowerState::Offline)
    }

    pub fn power_state(&self) -> Option<PowerState> {
        self.power.value().copied()
    }

    pub fn sicp_info(&self, field: SicpInfoField) -> Option<&Reading<String>> {
        self.sicp_info
            .iter()
            .find(|info| info.field == field)
            .map(|info| &info.reading)
    }
}

impl Client {
    /// Read the status snapshot.
    ///
    /// A transport failure on the power query marks the display offline and
    /// skips the remaining reads. A refused or garbled power reply leaves the
    /// power reading unavailable and the other reads still run.
    pub fn fetch_status(&self) -> DisplayStatus {
        let display = self.display_name().map(str::to_owned);
        let address = self.target();

        let power = match self.get_power_state() {
            Outcome::TransportFailure(err) => {
                debug!(target_address = %address, error = %err, "display offline");
                return DisplayStatus::offline(display, address);
            }
            Outcome::Success(state) => Reading::Value(state),
            other => {
                debug!(target_address = %address, outcome = %other, "power state unreadable");
                Reading::from(other)
            }
        };

        DisplayStatus {
            display,
            address,
            power,
            backlight: self.get_backlight().into(),
            model: self.get_model_info(ModelInfoField::ModelNumber).into(),
            serial_number: self.get_serial_number().into(),
            sicp_info: POLLED_SICP_INFO
                .iter()
                .map(|field| InfoReading {
                    field: *field,
                    reading: self.get_sicp_info(*field).into(),
                })
                .collect(),
            input_source: self.get_input_source().into(),
            video_signal: self.get_video_signal().into(),
            brightness: self.get_brightness_level().into(),
            picture_style: self.get_picture_style().into(),
            color_temperature: self.get_color_temperature_mode().into(),
            precise_color_temperature: self.get_precise_color_temperature().into(),
            smart_power_level: self.get_smart_power_level().into(),
            power_on_logo: self.get_power_on_logo_mode().into(),
            cold_start_power_state: self.get_cold_start_power_state().into(),
            volume: self.get_volume().into(),
            mute: self.get_mute().into(),
            temperature: self.get_temperature().into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use sicp_proto::{Frame, InputSource};
    use sicp_transport::{RetryPolicy, ScriptedTransport, Session};

    fn reply(opcode: u8, payload: &[u8]) -> Vec<u8> {
        Frame::new(1, 0, opcode, payload).unwrap().encode().to_vec()
    }

    fn nav() -> Vec<u8> {
        reply(0x00, &[0x18])
    }

    fn client(script: &ScriptedTransport) -> Client {
        let session = Session::new(script.clone(), RetryPolicy::new(1, Duration::from_millis(10)));
        Client::new(session, Address::monitor(1)).with_display_name("lobby")
    }

    #[test]
    fn unreachable_display_is_offline_after_one_query() {
        let script = ScriptedTransport::new();
        script.refuse_connects(1);
        let status = client(&script).fetch_status();

        assert_eq!(status.power, Reading::Value(PowerState::Offline));
        assert!(!status.is_online());
        assert_eq!(status.brightness, Reading::Skipped);
        assert_eq!(status.sicp_info.len(), 3);
        assert!(status.sicp_info.iter().all(|info| info.reading == Reading::Skipped));
        assert_eq!(script.exchange_count(), 0);
    }

    #[test]
    fn rejected_readings_are_unavailable() {
        let script = ScriptedTransport::new();
        script.push_reply(reply(0x19, &[0x02]));
        script.push_reply(reply(0x71, &[0x00]));
        script.push_reply(reply(0xA1, b"55BDL4511D"));
        script.push_reply(reply(0x15, b"AU1A2231000123"));
        script.push_reply(reply(0xA2, b"Android"));
        script.push_reply(reply(0xA2, b"FB02.05"));
        script.push_reply(nav());
        script.push_reply(reply(0xAD, &[0x0D, 0x03, 0x01, 0x00]));
        script.push_reply(reply(0x59, &[0x01]));
        script.push_reply(nav());
        script.push_reply(reply(0x65, &[0x04]));
        script.push_reply(nav());
        script.push_reply(reply(0x12, &[50]));
        script.push_reply(reply(0xDE, &[0x02]));
        script.push_reply(reply(0x3F, &[0x01]));
        script.push_reply(reply(0xA4, &[0x02]));
        script.push_reply(reply(0x45, &[0x14]));
        script.push_reply(nav());
        script.push_reply(reply(0x2F, &[0x26]));

        let status = client(&script).fetch_status();
        assert_eq!(status.power_state(), Some(PowerState::On));
        assert_eq!(status.backlight, Reading::Value(true));
        assert_eq!(status.model, Reading::Value("55BDL4511D".into()));
        assert_eq!(status.serial_number, Reading::Value("AU1A2231000123".into()));
        assert_eq!(
            status.sicp_info(SicpInfoField::PlatformLabel),
            Some(&Reading::Value("Android".into()))
        );
        assert_eq!(
            status.sicp_info(SicpInfoField::CustomIntentVersion),
            Some(&Reading::Unavailable(RejectReason::Unsupported))
        );
        let input = status.input_source.value().unwrap();
        assert_eq!((input.source, input.playlist), (InputSource::Hdmi1, 3));
        assert_eq!(status.video_signal, Reading::Value(true));
        assert_eq!(status.brightness, Reading::Unavailable(RejectReason::Unsupported));
        assert_eq!(status.picture_style, Reading::Value(PictureStyle::Standard));
        assert!(status.color_temperature.is_unavailable());
        assert_eq!(status.precise_color_temperature, Reading::Value(5_000));
        assert_eq!(status.smart_power_level, Reading::Value(SmartPowerLevel::Medium));
        assert_eq!(status.power_on_logo, Reading::Value(PowerOnLogoMode::On));
        assert_eq!(
            status.cold_start_power_state,
            Reading::Value(ColdStartPowerState::LastStatus)
        );
        assert_eq!(
            status.volume.value(),
            Some(&VolumeLevels { speaker: 20, audio_out: None })
        );
        assert!(status.mute.is_unavailable());
        assert_eq!(
            status.temperature,
            Reading::Value(vec![TemperatureReading { sensor: 1, celsius: 38 }])
        );
        assert_eq!(script.pending_steps(), 0);
    }

    #[test]
    fn refused_power_query_is_unavailable_not_off() {
        let script = ScriptedTransport::new();
        script.push_reply(nav());
        let status = client(&script).fetch_status();

        assert_eq!(status.power, Reading::Unavailable(RejectReason::Unsupported));
        assert_eq!(status.power_state(), None);
        assert!(status.is_online());
    }

    #[test]
    fn garbled_power_reply_is_a_failed_reading() {
        let script = ScriptedTransport::new();
        script.push_reply(reply(0x19, &[0x09]));
        let status = client(&script).fetch_status();

        assert_eq!(
            status.power,
            Reading::Unavailable(RejectReason::OutOfDomain { value: 0x09 })
        );
        script.push_reply(reply(0x33, &[0x40]));
        let status = client(&script).fetch_status();
        assert!(matches!(status.power, Reading::Failed(ref message) if message.contains("0x33")));
    }

    #[test]
    fn late_failure_is_reported_per_reading() {
        let script = ScriptedTransport::new();
        script.push_reply(reply(0x19, &[0x01]));
        let status = client(&script).fetch_status();

        assert_eq!(status.power, Reading::Value(PowerState::Off));
        assert!(matches!(status.model, Reading::Failed(ref message) if message.contains("no reply")));
        assert!(status.is_online());
    }
}
