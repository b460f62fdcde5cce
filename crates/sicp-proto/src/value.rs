//! ---
//! sicp_section: "02-protocol-codec"
//! sicp_subsection: "module"
//! sicp_type: "source"
//! sicp_scope: "code"
//! sicp_description: "Typed request parameters and decoded reply values."
//! sicp_version: "v0.0.0-prealpha"
//! sicp_owner: "tbd"
//! ---
use std::fmt;

use serde::Serialize;

use crate::choices::{Choice, InputSource, IpParameterCode, IpValueType};

/// Group membership as reported or configured on the display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "state", content = "group", rename_all = "snake_case")]
pub enum GroupSetting {
    Off,
    Group(u8),
}

impl GroupSetting {
    /// Wire byte used by the group commands; `0xFF` disables grouping.
    pub const OFF_CODE: u8 = 0xFF;

    pub fn code(self) -> u8 {
        match self {
            GroupSetting::Off => Self::OFF_CODE,
            GroupSetting::Group(id) => id,
        }
    }
}

impl fmt::Display for GroupSetting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GroupSetting::Off => f.write_str("off"),
            GroupSetting::Group(id) => write!(f, "{id}"),
        }
    }
}

/// One onboard temperature sensor. Sensors are numbered from 1 in reply order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TemperatureReading {
    pub sensor: u8,
    pub celsius: u8,
}

/// Speaker and audio-out levels in percent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct VolumeLevels {
    pub speaker: u8,
    /// Older platforms report the speaker level only.
    pub audio_out: Option<u8>,
}

/// Arguments of the input source set command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct InputSelection {
    pub source: InputSource,
    /// 0 for none, 1-7 for a playlist or URL slot, 8 for USB autoplay.
    pub playlist: u8,
    pub show_label: bool,
    /// Transition effect duration in seconds.
    pub effect_seconds: u8,
}

impl InputSelection {
    /// Playlist slot that starts USB autoplay.
    pub const USB_AUTOPLAY: u8 = 8;

    pub fn new(source: InputSource) -> Self {
        Self {
            source,
            playlist: 0,
            show_label: true,
            effect_seconds: 0,
        }
    }
}

impl fmt::Display for InputSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.playlist {
            0 => write!(f, "{}", self.source),
            Self::USB_AUTOPLAY => write!(f, "{} (USB autoplay)", self.source),
            slot => write!(f, "{} (playlist/URL {slot})", self.source),
        }
    }
}

/// A request parameter before schema validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Param {
    None,
    Choice(Choice),
    Flag(bool),
    Number(i64),
    Input(InputSelection),
    /// `None` leaves the level unchanged.
    Volume {
        speaker: Option<u8>,
        audio_out: Option<u8>,
    },
    Ip {
        parameter: IpParameterCode,
        value_type: IpValueType,
    },
}

impl Param {
    /// Short shape name used in schema errors.
    pub fn shape(&self) -> &'static str {
        match self {
            Param::None => "nothing",
            Param::Choice(_) => "choice",
            Param::Flag(_) => "flag",
            Param::Number(_) => "number",
            Param::Input(_) => "input selection",
            Param::Volume { .. } => "volume levels",
            Param::Ip { .. } => "IP parameter selector",
        }
    }
}

impl From<Choice> for Param {
    fn from(choice: Choice) -> Self {
        Param::Choice(choice)
    }
}

/// A decoded reply payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Value {
    Choice(Choice),
    Switch(bool),
    Percent(u8),
    Kelvin(u16),
    Seconds(u8),
    Group(GroupSetting),
    Temperatures(Vec<TemperatureReading>),
    Text(String),
    Volume(VolumeLevels),
    Input(InputSelection),
    /// The display accepted a set command.
    Acknowledged,
}

impl Value {
    /// Extract a member of one enumerated family.
    pub fn into_choice<T: TryFrom<Choice>>(self) -> Option<T> {
        match self {
            Value::Choice(choice) => T::try_from(choice).ok(),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Choice(choice) => write!(f, "{choice}"),
            Value::Switch(true) => f.write_str("on"),
            Value::Switch(false) => f.write_str("off"),
            Value::Percent(level) => write!(f, "{level}%"),
            Value::Kelvin(kelvin) => write!(f, "{kelvin}K"),
            Value::Seconds(seconds) => write!(f, "{seconds}s"),
            Value::Group(group) => write!(f, "{group}"),
            Value::Temperatures(readings) if readings.is_empty() => {
                f.write_str("no sensor reported")
            }
            Value::Temperatures(readings) => {
                let parts: Vec<String> = readings
                    .iter()
                    .map(|r| format!("sensor {}: {}°C", r.sensor, r.celsius))
                    .collect();
                f.write_str(&parts.join(", "))
            }
            Value::Text(text) if text.is_empty() => f.write_str("(no data)"),
            Value::Text(text) => f.write_str(text),
            Value::Volume(levels) => match levels.audio_out {
                Some(out) => write!(f, "speaker {}%, audio-out {}%", levels.speaker, out),
                None => write!(f, "speaker {}%", levels.speaker),
            },
            Value::Input(selection) => write!(f, "{selection}"),
            Value::Acknowledged => f.write_str("ok"),
        }
    }
}
