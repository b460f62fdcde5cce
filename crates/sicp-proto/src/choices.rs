//! ---
//! sicp_section: "02-protocol-codec"
//! sicp_subsection: "module"
//! sicp_type: "source"
//! sicp_scope: "code"
//! sicp_description: "Closed enumerations carried by SICP parameters and replies."
//! sicp_version: "v0.0.0-prealpha"
//! sicp_owner: "tbd"
//! ---
//! Enumerated parameter families.
//!
//! Every family is a closed set. Names parse case-insensitively and accept the
//! aliases operators commonly type (`hdmi` for `hdmi1`, `med` for `medium`).
//! [`Choice`] tags a value with its family so the registry can check that a
//! parameter belongs to the family a command expects.

use std::fmt;

use serde::{Serialize, Serializer};
use strum::{Display, EnumIter, EnumString, IntoEnumIterator};

use crate::error::SchemaError;

/// Mapping between a family member and its wire byte.
pub trait WireCode: Sized + Copy + IntoEnumIterator {
    /// Wire byte, or `None` for members that only exist on the host side.
    fn code(self) -> Option<u8>;

    fn from_code(code: u8) -> Option<Self> {
        Self::iter().find(|member| member.code() == Some(code))
    }
}

macro_rules! wire_code {
    ($($ty:ident),+ $(,)?) => {
        $(
            impl WireCode for $ty {
                fn code(self) -> Option<u8> {
                    Some(self as u8)
                }
            }
        )+
    };
}

/// Display power state. `Offline` is reported by the host when the display
/// cannot be reached and has no wire representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum PowerState {
    Offline,
    Off,
    On,
}

impl WireCode for PowerState {
    fn code(self) -> Option<u8> {
        match self {
            PowerState::Offline => None,
            PowerState::Off => Some(0x01),
            PowerState::On => Some(0x02),
        }
    }
}

/// Behaviour after mains power returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
#[repr(u8)]
pub enum ColdStartPowerState {
    PowerOff = 0x00,
    ForcedOn = 0x01,
    LastStatus = 0x02,
}

/// Picture (video) style preset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
#[repr(u8)]
pub enum PictureStyle {
    Highbright = 0x00,
    Srgb = 0x01,
    Vivid = 0x02,
    Natural = 0x03,
    Standard = 0x04,
    Video = 0x05,
    StaticSignage = 0x06,
    Text = 0x07,
    EnergySaving = 0x08,
    Soft = 0x09,
    User = 0x0A,
}

/// Colour temperature preset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter)]
#[strum(ascii_case_insensitive)]
#[repr(u8)]
pub enum ColorTemperatureMode {
    #[strum(to_string = "user1", serialize = "user-1")]
    User1 = 0x00,
    #[strum(to_string = "native")]
    Native = 0x01,
    #[strum(to_string = "11000K")]
    K11000 = 0x02,
    #[strum(to_string = "10000K")]
    K10000 = 0x03,
    #[strum(to_string = "9300K")]
    K9300 = 0x04,
    #[strum(to_string = "7500K")]
    K7500 = 0x05,
    #[strum(to_string = "6500K")]
    K6500 = 0x06,
    #[strum(to_string = "5770K")]
    K5770 = 0x07,
    #[strum(to_string = "5500K")]
    K5500 = 0x08,
    #[strum(to_string = "5000K")]
    K5000 = 0x09,
    #[strum(to_string = "4000K")]
    K4000 = 0x0A,
    #[strum(to_string = "3400K")]
    K3400 = 0x0B,
    #[strum(to_string = "3350K")]
    K3350 = 0x0C,
    #[strum(to_string = "3000K")]
    K3000 = 0x0D,
    #[strum(to_string = "2800K")]
    K2800 = 0x0E,
    #[strum(to_string = "2600K")]
    K2600 = 0x0F,
    #[strum(to_string = "1850K")]
    K1850 = 0x10,
    #[strum(to_string = "user2", serialize = "user-2")]
    User2 = 0x12,
}

/// Power save behaviour when no signal is present.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
#[repr(u8)]
pub enum PowerSaveMode {
    RgbOffVideoOff = 0x00,
    RgbOffVideoOn = 0x01,
    RgbOnVideoOff = 0x02,
    RgbOnVideoOn = 0x03,
    #[strum(to_string = "mode-1", serialize = "mode1")]
    Mode1 = 0x04,
    #[strum(to_string = "mode-2", serialize = "mode2")]
    Mode2 = 0x05,
    #[strum(to_string = "mode-3", serialize = "mode3")]
    Mode3 = 0x06,
    #[strum(to_string = "mode-4", serialize = "mode4")]
    Mode4 = 0x07,
}

/// Smart power level. Medium draws roughly 80% and high 65% of the current setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
#[repr(u8)]
pub enum SmartPowerLevel {
    Off = 0x00,
    Low = 0x01,
    #[strum(to_string = "medium", serialize = "med")]
    Medium = 0x02,
    High = 0x03,
}

/// Advanced power management.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
#[repr(u8)]
pub enum ApmMode {
    Off = 0x00,
    On = 0x01,
    /// TCP off, wake-on-LAN on.
    #[strum(to_string = "mode1", serialize = "mode-1", serialize = "tcp-off-wol-on")]
    Mode1 = 0x02,
    /// TCP on, wake-on-LAN off.
    #[strum(to_string = "mode2", serialize = "mode-2", serialize = "tcp-on-wol-off")]
    Mode2 = 0x03,
}

/// Boot logo behaviour. `User` needs a boot animation uploaded through the admin menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
#[repr(u8)]
pub enum PowerOnLogoMode {
    Off = 0x00,
    On = 0x01,
    User = 0x02,
}

/// Automatic input switching when the active source loses signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
#[repr(u8)]
pub enum AutoSignalMode {
    Off = 0x00,
    All = 0x01,
    Reserved = 0x02,
    #[strum(to_string = "pc-only", serialize = "pc-sources")]
    PcOnly = 0x03,
    #[strum(to_string = "video-only", serialize = "video-sources")]
    VideoOnly = 0x04,
    Failover = 0x05,
}

/// Input source type/number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter)]
#[strum(ascii_case_insensitive)]
#[repr(u8)]
pub enum InputSource {
    #[strum(to_string = "none")]
    None = 0x00,
    #[strum(to_string = "video")]
    Video = 0x01,
    #[strum(to_string = "s-video", serialize = "svideo")]
    SVideo = 0x02,
    #[strum(to_string = "component")]
    Component = 0x03,
    #[strum(to_string = "cvi2")]
    Cvi2 = 0x04,
    #[strum(to_string = "vga")]
    Vga = 0x05,
    #[strum(to_string = "hdmi2")]
    Hdmi2 = 0x06,
    #[strum(to_string = "displayport2")]
    DisplayPort2 = 0x07,
    #[strum(to_string = "usb2")]
    Usb2 = 0x08,
    #[strum(to_string = "carddvi-d")]
    CardDviD = 0x09,
    #[strum(to_string = "displayport1")]
    DisplayPort1 = 0x0A,
    #[strum(to_string = "cardops")]
    CardOps = 0x0B,
    #[strum(to_string = "usb1")]
    Usb1 = 0x0C,
    #[strum(to_string = "hdmi1", serialize = "hdmi")]
    Hdmi1 = 0x0D,
    #[strum(to_string = "dvi-d")]
    DviD = 0x0E,
    #[strum(to_string = "hdmi3")]
    Hdmi3 = 0x0F,
    #[strum(to_string = "browser")]
    Browser = 0x10,
    #[strum(to_string = "smartcms")]
    SmartCms = 0x11,
    #[strum(to_string = "dms", serialize = "digitalmediaserver")]
    Dms = 0x12,
    #[strum(to_string = "internalstorage")]
    InternalStorage = 0x13,
    #[strum(to_string = "mediaplayer")]
    MediaPlayer = 0x16,
    #[strum(to_string = "pdfplayer")]
    PdfPlayer = 0x17,
    #[strum(to_string = "customapp", serialize = "custom")]
    CustomApp = 0x18,
    #[strum(to_string = "hdmi4")]
    Hdmi4 = 0x19,
    #[strum(to_string = "vga2")]
    Vga2 = 0x1A,
    #[strum(to_string = "vga3")]
    Vga3 = 0x1B,
    #[strum(to_string = "iwb")]
    Iwb = 0x1C,
    #[strum(to_string = "cmndplayweb", serialize = "cmndplay")]
    CmndPlayWeb = 0x1D,
    #[strum(to_string = "launcher", serialize = "home")]
    Launcher = 0x1E,
    #[strum(to_string = "usb-typec", serialize = "usbtypec", serialize = "usbc")]
    UsbTypeC = 0x1F,
    #[strum(to_string = "kiosk")]
    Kiosk = 0x20,
    #[strum(to_string = "smartinfo")]
    SmartInfo = 0x21,
    #[strum(to_string = "tuner")]
    Tuner = 0x22,
    #[strum(to_string = "googlecast")]
    GoogleCast = 0x23,
    #[strum(to_string = "interact")]
    Interact = 0x24,
    #[strum(to_string = "usb-typec2", serialize = "usbtypec2", serialize = "usbc2")]
    UsbTypeC2 = 0x25,
    #[strum(to_string = "screenshare")]
    ScreenShare = 0x26,
}

impl InputSource {
    /// Sources rendered by the built-in media platform. Video parameters
    /// (brightness, colour temperature) are greyed out while one is active.
    pub fn is_internal(self) -> bool {
        matches!(
            self,
            InputSource::Browser
                | InputSource::SmartCms
                | InputSource::Dms
                | InputSource::InternalStorage
                | InputSource::MediaPlayer
                | InputSource::PdfPlayer
                | InputSource::CustomApp
                | InputSource::CmndPlayWeb
                | InputSource::Launcher
                | InputSource::Kiosk
                | InputSource::SmartInfo
                | InputSource::GoogleCast
                | InputSource::Interact
                | InputSource::ScreenShare
        )
    }
}

/// Built-in test pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
#[repr(u8)]
pub enum TestPattern {
    Off = 0x00,
    #[strum(to_string = "white-100", serialize = "white")]
    White100 = 0x01,
    Red = 0x02,
    Green = 0x03,
    Blue = 0x04,
    Black = 0x05,
    HalfWhiteTop = 0x06,
    HalfWhiteBottom = 0x07,
    Ramp = 0x08,
    #[strum(to_string = "white-12")]
    White12 = 0x09,
    #[strum(to_string = "white-25")]
    White25 = 0x0A,
    #[strum(to_string = "white-65")]
    White65 = 0x0B,
}

/// Remote control and keypad lock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
#[repr(u8)]
pub enum RemoteLockState {
    UnlockAll = 0x01,
    LockAll = 0x02,
    LockAllButPower = 0x03,
    LockAllButVolume = 0x04,
    Primary = 0x05,
    Secondary = 0x06,
    LockAllExceptPowerVolume = 0x07,
}

/// Remote control key codes accepted by key simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
#[repr(u8)]
pub enum RemoteKey {
    #[strum(to_string = "key-0", serialize = "0")]
    Key0 = 0x00,
    #[strum(to_string = "key-1", serialize = "1")]
    Key1 = 0x01,
    #[strum(to_string = "key-2", serialize = "2")]
    Key2 = 0x02,
    #[strum(to_string = "key-3", serialize = "3")]
    Key3 = 0x03,
    #[strum(to_string = "key-4", serialize = "4")]
    Key4 = 0x04,
    #[strum(to_string = "key-5", serialize = "5")]
    Key5 = 0x05,
    #[strum(to_string = "key-6", serialize = "6")]
    Key6 = 0x06,
    #[strum(to_string = "key-7", serialize = "7")]
    Key7 = 0x07,
    #[strum(to_string = "key-8", serialize = "8")]
    Key8 = 0x08,
    #[strum(to_string = "key-9", serialize = "9")]
    Key9 = 0x09,
    Back = 0x0A,
    Mute = 0x0D,
    Info = 0x0F,
    #[strum(to_string = "vol+", serialize = "vol-plus", serialize = "volume-up")]
    VolumeUp = 0x10,
    #[strum(to_string = "vol-", serialize = "vol-minus", serialize = "volume-down")]
    VolumeDown = 0x11,
    #[strum(to_string = "fwd", serialize = "forward")]
    Forward = 0x28,
    #[strum(to_string = "rwd", serialize = "rewind")]
    Rewind = 0x2B,
    Play = 0x2C,
    Pause = 0x30,
    Stop = 0x31,
    Sources = 0x38,
    Options = 0x40,
    Home = 0x54,
    #[strum(to_string = "arrow-up", serialize = "up")]
    Up = 0x58,
    #[strum(to_string = "arrow-down", serialize = "down")]
    Down = 0x59,
    #[strum(to_string = "arrow-left", serialize = "left")]
    Left = 0x5A,
    #[strum(to_string = "arrow-right", serialize = "right")]
    Right = 0x5B,
    #[strum(to_string = "ok", serialize = "enter", serialize = "select")]
    Ok = 0x5C,
    Red = 0x6D,
    Green = 0x6E,
    Yellow = 0x6F,
    Blue = 0x70,
    List = 0x8B,
    Adjust = 0x90,
    PowerOn = 0xBE,
    PowerOff = 0xBF,
    Format = 0xF5,
}

/// Label codes for the model/firmware information query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
#[repr(u8)]
pub enum ModelInfoField {
    ModelNumber = 0x00,
    FirmwareVersion = 0x01,
    BuildDate = 0x02,
    AndroidFirmware = 0x03,
    HdmiSwitchVersion = 0x04,
    LanFirmware = 0x05,
    #[strum(to_string = "hdmi-switch2-version")]
    HdmiSwitch2Version = 0x06,
}

/// Label codes for the protocol/platform version query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
#[repr(u8)]
pub enum SicpInfoField {
    SicpVersion = 0x00,
    PlatformLabel = 0x01,
    PlatformVersion = 0x02,
    CustomIntentVersion = 0x03,
}

/// Network parameter selector for the IP parameter query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
#[repr(u8)]
pub enum IpParameterCode {
    Ip = 0x01,
    Subnet = 0x02,
    Gateway = 0x03,
    #[strum(to_string = "dns1")]
    Dns1 = 0x04,
    #[strum(to_string = "dns2")]
    Dns2 = 0x05,
    EthMac = 0x06,
    WifiMac = 0x07,
}

impl IpParameterCode {
    pub fn is_mac(self) -> bool {
        matches!(self, IpParameterCode::EthMac | IpParameterCode::WifiMac)
    }
}

/// Whether the IP parameter query reads the active or the pending value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter, Default)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
#[repr(u8)]
pub enum IpValueType {
    #[default]
    Current = 0x01,
    Queued = 0x02,
}

wire_code!(
    ColdStartPowerState,
    PictureStyle,
    ColorTemperatureMode,
    PowerSaveMode,
    SmartPowerLevel,
    ApmMode,
    PowerOnLogoMode,
    AutoSignalMode,
    InputSource,
    TestPattern,
    RemoteLockState,
    RemoteKey,
    ModelInfoField,
    SicpInfoField,
    IpParameterCode,
    IpValueType,
);

macro_rules! choice_families {
    ($($variant:ident($ty:ident) => $label:literal,)+) => {
        /// Every enumerated family a command parameter or reply can belong to.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum Family {
            $($variant,)+
        }

        /// A member of one enumerated family, tagged with that family.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum Choice {
            $($variant($ty),)+
        }

        impl Family {
            pub const ALL: &'static [Family] = &[$(Family::$variant,)+];

            /// Human-readable family name used in errors and help output.
            pub fn label(self) -> &'static str {
                match self {
                    $(Family::$variant => $label,)+
                }
            }

            /// Map a wire byte back to a member; `None` when outside the family.
            pub fn decode(self, code: u8) -> Option<Choice> {
                match self {
                    $(Family::$variant => <$ty as WireCode>::from_code(code).map(Choice::$variant),)+
                }
            }

            /// Parse a member name or alias.
            pub fn parse(self, text: &str) -> Result<Choice, SchemaError> {
                match self {
                    $(Family::$variant => text
                        .trim()
                        .parse::<$ty>()
                        .map(Choice::$variant)
                        .map_err(|_| SchemaError::UnknownChoice {
                            family: $label,
                            value: text.to_owned(),
                        }),)+
                }
            }

            /// Wire bytes of every encodable member, in declaration order.
            pub fn codes(self) -> Vec<u8> {
                match self {
                    $(Family::$variant => $ty::iter().filter_map(WireCode::code).collect(),)+
                }
            }

            /// Canonical names of every encodable member.
            pub fn names(self) -> Vec<String> {
                match self {
                    $(Family::$variant => $ty::iter()
                        .filter(|member| member.code().is_some())
                        .map(|member| member.to_string())
                        .collect(),)+
                }
            }
        }

        impl Choice {
            pub fn family(&self) -> Family {
                match self {
                    $(Choice::$variant(_) => Family::$variant,)+
                }
            }

            pub fn code(&self) -> Option<u8> {
                match self {
                    $(Choice::$variant(member) => member.code(),)+
                }
            }
        }

        impl fmt::Display for Choice {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                match self {
                    $(Choice::$variant(member) => fmt::Display::fmt(member, f),)+
                }
            }
        }

        $(
            impl From<$ty> for Choice {
                fn from(member: $ty) -> Self {
                    Choice::$variant(member)
                }
            }

            impl Serialize for $ty {
                fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                    serializer.collect_str(self)
                }
            }

            impl TryFrom<Choice> for $ty {
                type Error = Choice;

                fn try_from(choice: Choice) -> Result<Self, Self::Error> {
                    match choice {
                        Choice::$variant(member) => Ok(member),
                        other => Err(other),
                    }
                }
            }
        )+
    };
}

choice_families! {
    Power(PowerState) => "power state",
    ColdStart(ColdStartPowerState) => "cold-start power state",
    PictureStyle(PictureStyle) => "picture style",
    ColorTemperature(ColorTemperatureMode) => "colour temperature preset",
    PowerSave(PowerSaveMode) => "power save mode",
    SmartPower(SmartPowerLevel) => "smart power level",
    Apm(ApmMode) => "advanced power management mode",
    PowerOnLogo(PowerOnLogoMode) => "power-on logo mode",
    AutoSignal(AutoSignalMode) => "auto signal mode",
    InputSource(InputSource) => "input source",
    TestPattern(TestPattern) => "test pattern",
    RemoteLock(RemoteLockState) => "remote lock state",
    RemoteKey(RemoteKey) => "remote key",
    ModelInfo(ModelInfoField) => "model info field",
    SicpInfo(SicpInfoField) => "SICP info field",
    IpParameter(IpParameterCode) => "IP parameter",
    IpValueType(IpValueType) => "IP value type",
}

impl Serialize for Choice {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aliases_parse_to_canonical_members() {
        assert_eq!(
            Family::InputSource.parse("HDMI").unwrap(),
            Choice::InputSource(InputSource::Hdmi1)
        );
        assert_eq!(
            Family::SmartPower.parse("med").unwrap(),
            Choice::SmartPower(SmartPowerLevel::Medium)
        );
        assert_eq!(
            Family::Apm.parse("tcp-off-wol-on").unwrap(),
            Choice::Apm(ApmMode::Mode1)
        );
        assert_eq!(
            Family::ColorTemperature.parse("6500k").unwrap(),
            Choice::ColorTemperature(ColorTemperatureMode::K6500)
        );
        assert_eq!(
            Family::RemoteKey.parse("enter").unwrap(),
            Choice::RemoteKey(RemoteKey::Ok)
        );
    }

    #[test]
    fn unknown_names_are_rejected() {
        let err = Family::PictureStyle.parse("cinema").unwrap_err();
        assert_eq!(
            err,
            SchemaError::UnknownChoice {
                family: "picture style",
                value: "cinema".into()
            }
        );
    }

    #[test]
    fn offline_has_no_wire_code() {
        assert_eq!(PowerState::Offline.code(), None);
        assert_eq!(Family::Power.codes(), vec![0x01, 0x02]);
        assert_eq!(Family::Power.decode(0x00), None);
        assert_eq!(
            Family::Power.decode(0x02),
            Some(Choice::Power(PowerState::On))
        );
    }

    #[test]
    fn codes_are_unique_within_each_family() {
        for family in Family::ALL {
            let mut codes = family.codes();
            let total = codes.len();
            codes.sort_unstable();
            codes.dedup();
            assert_eq!(codes.len(), total, "{} repeats a code", family.label());
        }
    }

    #[test]
    fn every_canonical_name_round_trips() {
        for family in Family::ALL {
            for name in family.names() {
                let choice = family.parse(&name).unwrap();
                assert_eq!(choice.to_string(), name);
                assert_eq!(choice.family(), *family);
            }
        }
    }

    #[test]
    fn color_temperature_gap_is_not_decodable() {
        assert_eq!(Family::ColorTemperature.decode(0x11), None);
        assert_eq!(
            ColorTemperatureMode::from_code(0x12),
            Some(ColorTemperatureMode::User2)
        );
    }

    #[test]
    fn internal_sources_are_flagged() {
        assert!(InputSource::MediaPlayer.is_internal());
        assert!(!InputSource::Hdmi1.is_internal());
    }

    #[test]
    fn typed_extraction_checks_family() {
        let choice = Choice::from(PowerOnLogoMode::User);
        assert_eq!(PowerOnLogoMode::try_from(choice), Ok(PowerOnLogoMode::User));
        assert!(SmartPowerLevel::try_from(choice).is_err());
    }
}
