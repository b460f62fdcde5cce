//! ---
//! sicp_section: "02-protocol-codec"
//! sicp_subsection: "module"
//! sicp_type: "source"
//! sicp_scope: "code"
//! sicp_description: "Static command catalog and name-based lookup."
//! sicp_version: "v0.0.0-prealpha"
//! sicp_owner: "tbd"
//! ---
//! Command registry.
//!
//! The catalog below is the single source of truth for opcodes, schemas and
//! help text. [`Registry::new`] refuses a catalog with duplicate names or with
//! a `set_x` command that accepts a different domain than `get_x` reports.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use serde::Serialize;

use crate::address::Address;
use crate::choices::Family;
use crate::error::{ProtocolViolation, RegistryError};
use crate::frame::Frame;
use crate::schema::{RequestSchema, ResponseSchema};
use crate::value::Param;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Get,
    Set,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Get => "get",
            Direction::Set => "set",
        }
    }
}

/// Everything needed to encode one command and decode its reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandDescriptor {
    pub name: &'static str,
    pub summary: &'static str,
    pub opcode: u8,
    pub direction: Direction,
    pub request: RequestSchema,
    pub response: ResponseSchema,
}

impl CommandDescriptor {
    const fn get(
        name: &'static str,
        opcode: u8,
        request: RequestSchema,
        response: ResponseSchema,
        summary: &'static str,
    ) -> Self {
        Self {
            name,
            summary,
            opcode,
            direction: Direction::Get,
            request,
            response,
        }
    }

    const fn set(
        name: &'static str,
        opcode: u8,
        request: RequestSchema,
        summary: &'static str,
    ) -> Self {
        Self {
            name,
            summary,
            opcode,
            direction: Direction::Set,
            request,
            response: ResponseSchema::Ack,
        }
    }

    /// Name with the `get_`/`set_` prefix removed, shared by a command pair.
    pub fn family_name(&self) -> &'static str {
        self.name
            .strip_prefix("get_")
            .or_else(|| self.name.strip_prefix("set_"))
            .unwrap_or(self.name)
    }

    /// Name as typed on the command line.
    pub fn cli_name(&self) -> String {
        self.name.replace('_', "-")
    }

    /// Validate the address and parameter, then build the request frame.
    /// Nothing here touches the network.
    pub fn request_frame(&self, address: Address, param: &Param) -> Result<Frame, ProtocolViolation> {
        address.validate(self.direction)?;
        let parameters = self.request.encode(param)?;
        Ok(Frame::new(
            address.monitor_id,
            address.group_id,
            self.opcode,
            &parameters,
        )?)
    }
}

const NO_PARAMS: RequestSchema = RequestSchema::Empty;
const SWITCH: RequestSchema = RequestSchema::Flag { on: 0x01, off: 0x00 };
const SWITCH_REPLY: ResponseSchema = ResponseSchema::Flag { on: 0x01, off: 0x00 };
const OSD_MAX_SECONDS: u8 = 60;

/// Catalog order drives help output.
#[rustfmt::skip]
static CATALOG: &[CommandDescriptor] = &[
    // Power
    CommandDescriptor::get("get_power_state", 0x19, NO_PARAMS, ResponseSchema::Choice(Family::Power), "Read the power state"),
    CommandDescriptor::set("set_power_state", 0x18, RequestSchema::Choice(Family::Power), "Switch the display on or off"),
    CommandDescriptor::get("get_cold_start_power_state", 0xA4, NO_PARAMS, ResponseSchema::Choice(Family::ColdStart), "Read the behaviour after mains power returns"),
    CommandDescriptor::set("set_cold_start_power_state", 0xA3, RequestSchema::Choice(Family::ColdStart), "Set the behaviour after mains power returns"),
    // Identity
    CommandDescriptor::get("get_temperature", 0x2F, NO_PARAMS, ResponseSchema::Temperatures, "Read the onboard temperature sensors"),
    CommandDescriptor::get("get_model_info", 0xA1, RequestSchema::Choice(Family::ModelInfo), ResponseSchema::Text, "Read model, firmware or build information"),
    CommandDescriptor::get("get_sicp_info", 0xA2, RequestSchema::Choice(Family::SicpInfo), ResponseSchema::Text, "Read protocol and platform version strings"),
    CommandDescriptor::get("get_serial_number", 0x15, NO_PARAMS, ResponseSchema::Text, "Read the serial number"),
    // Picture
    CommandDescriptor::get("get_av_mute", 0x7A, NO_PARAMS, SWITCH_REPLY, "Read the A/V mute state"),
    CommandDescriptor::set("set_av_mute", 0x7B, SWITCH, "Blank backlight, audio and touch"),
    CommandDescriptor::get("get_picture_style", 0x65, NO_PARAMS, ResponseSchema::Choice(Family::PictureStyle), "Read the picture style"),
    CommandDescriptor::set("set_picture_style", 0x66, RequestSchema::Choice(Family::PictureStyle), "Select a picture style"),
    CommandDescriptor::get("get_brightness_level", 0x33, NO_PARAMS, ResponseSchema::Percent, "Read the brightness level"),
    CommandDescriptor::set("set_brightness_level", 0x32, RequestSchema::Brightness, "Set the brightness level"),
    CommandDescriptor::get("get_color_temperature_mode", 0x35, NO_PARAMS, ResponseSchema::Choice(Family::ColorTemperature), "Read the colour temperature preset"),
    CommandDescriptor::set("set_color_temperature_mode", 0x34, RequestSchema::Choice(Family::ColorTemperature), "Select a colour temperature preset"),
    CommandDescriptor::get("get_precise_color_temperature", 0x12, NO_PARAMS, ResponseSchema::Kelvin, "Read the user 2 colour temperature"),
    CommandDescriptor::set("set_precise_color_temperature", 0x11, RequestSchema::Kelvin, "Set the user 2 colour temperature in 100 K steps"),
    CommandDescriptor::get("get_video_signal", 0x59, NO_PARAMS, SWITCH_REPLY, "Report whether the active input carries a signal"),
    // Power management
    CommandDescriptor::get("get_power_save_mode", 0xD3, NO_PARAMS, ResponseSchema::Choice(Family::PowerSave), "Read the power save mode"),
    CommandDescriptor::set("set_power_save_mode", 0xD2, RequestSchema::Choice(Family::PowerSave), "Set the power save mode"),
    CommandDescriptor::get("get_apm_mode", 0xD1, NO_PARAMS, ResponseSchema::Choice(Family::Apm), "Read advanced power management"),
    CommandDescriptor::set("set_apm_mode", 0xD0, RequestSchema::Choice(Family::Apm), "Set advanced power management"),
    CommandDescriptor::get("get_smart_power_level", 0xDE, NO_PARAMS, ResponseSchema::Choice(Family::SmartPower), "Read the smart power level"),
    CommandDescriptor::set("set_smart_power_level", 0xDD, RequestSchema::Choice(Family::SmartPower), "Set the smart power level"),
    // Boot and input
    CommandDescriptor::get("get_power_on_logo_mode", 0x3F, NO_PARAMS, ResponseSchema::Choice(Family::PowerOnLogo), "Read the boot logo mode"),
    CommandDescriptor::set("set_power_on_logo_mode", 0x3E, RequestSchema::Choice(Family::PowerOnLogo), "Set the boot logo mode"),
    CommandDescriptor::get("get_input_source", 0xAD, NO_PARAMS, ResponseSchema::InputSource, "Read the active input source"),
    CommandDescriptor::set("set_input_source", 0xAC, RequestSchema::InputSource, "Switch the input source"),
    CommandDescriptor::get("get_auto_signal_mode", 0xAF, NO_PARAMS, ResponseSchema::Choice(Family::AutoSignal), "Read automatic input switching"),
    CommandDescriptor::set("set_auto_signal_mode", 0xAE, RequestSchema::Choice(Family::AutoSignal), "Set automatic input switching"),
    // Remote and OSD
    CommandDescriptor::set("simulate_remote_key", 0xFE, RequestSchema::RemoteKey, "Press a remote control key"),
    CommandDescriptor::get("get_remote_lock", 0x1D, NO_PARAMS, ResponseSchema::Choice(Family::RemoteLock), "Read the remote and keypad lock"),
    CommandDescriptor::set("set_remote_lock", 0x1C, RequestSchema::Choice(Family::RemoteLock), "Lock or unlock remote and keypad"),
    CommandDescriptor::get("get_test_pattern", 0x6C, NO_PARAMS, ResponseSchema::Choice(Family::TestPattern), "Read the active test pattern"),
    CommandDescriptor::set("set_test_pattern", 0x6D, RequestSchema::Choice(Family::TestPattern), "Show a test pattern"),
    CommandDescriptor::get("get_osd_info", 0x2D, NO_PARAMS, ResponseSchema::Seconds { max: OSD_MAX_SECONDS }, "Read the information OSD timeout"),
    CommandDescriptor::set("set_osd_info", 0x2C, RequestSchema::Level { min: 0, max: OSD_MAX_SECONDS }, "Set the information OSD timeout in seconds"),
    // Addressing
    CommandDescriptor::get("get_group_id", 0x5D, NO_PARAMS, ResponseSchema::Group, "Read the group id"),
    CommandDescriptor::set("set_group_id", 0x5C, RequestSchema::Group, "Assign a group id"),
    CommandDescriptor::set("set_monitor_id", 0x69, RequestSchema::Level { min: 1, max: 255 }, "Assign a new monitor id"),
    // Backlight, audio, network
    CommandDescriptor::get("get_backlight", 0x71, NO_PARAMS, ResponseSchema::Flag { on: 0x00, off: 0x01 }, "Read the backlight state"),
    CommandDescriptor::set("set_backlight", 0x72, RequestSchema::Flag { on: 0x00, off: 0x01 }, "Switch the backlight"),
    CommandDescriptor::get("get_volume", 0x45, NO_PARAMS, ResponseSchema::Volume, "Read speaker and audio-out volume"),
    CommandDescriptor::set("set_volume", 0x44, RequestSchema::Volume, "Set speaker and audio-out volume"),
    CommandDescriptor::get("get_mute", 0x46, NO_PARAMS, SWITCH_REPLY, "Read the audio mute state"),
    CommandDescriptor::set("set_mute", 0x47, SWITCH, "Mute or unmute audio"),
    CommandDescriptor::get("get_wake_on_lan", 0x9C, NO_PARAMS, SWITCH_REPLY, "Read the wake-on-LAN setting"),
    CommandDescriptor::set("set_wake_on_lan", 0x9D, SWITCH, "Enable or disable wake-on-LAN"),
    CommandDescriptor::get("get_android_4k", 0xC6, NO_PARAMS, SWITCH_REPLY, "Read 4K rendering of the Android platform"),
    CommandDescriptor::set("set_android_4k", 0xC7, SWITCH, "Enable or disable 4K rendering of the Android platform"),
    CommandDescriptor::get("get_ip_parameter", 0x82, RequestSchema::IpParameter, ResponseSchema::IpParameter, "Read an IP setting or MAC address"),
];

static GLOBAL: Lazy<Registry> = Lazy::new(|| {
    Registry::new(CATALOG.iter().copied()).expect("built-in command catalog is consistent")
});

/// Name-indexed view over the command catalog.
#[derive(Debug)]
pub struct Registry {
    commands: Vec<CommandDescriptor>,
    by_name: HashMap<&'static str, usize>,
}

impl Registry {
    /// Shared registry built from the built-in catalog.
    pub fn global() -> &'static Registry {
        &GLOBAL
    }

    pub fn new(
        descriptors: impl IntoIterator<Item = CommandDescriptor>,
    ) -> Result<Self, RegistryError> {
        let commands: Vec<CommandDescriptor> = descriptors.into_iter().collect();
        let mut by_name = HashMap::with_capacity(commands.len());
        for (index, descriptor) in commands.iter().enumerate() {
            if by_name.insert(descriptor.name, index).is_some() {
                return Err(RegistryError::DuplicateName(descriptor.name));
            }
        }

        let registry = Self { commands, by_name };
        for get in registry.iter().filter(|d| d.direction == Direction::Get) {
            let (_, Some(set)) = registry.pair(get.family_name()) else {
                continue;
            };
            if set.request.domain() != get.response.domain() {
                return Err(RegistryError::DomainMismatch {
                    get: get.name,
                    set: set.name,
                });
            }
        }
        Ok(registry)
    }

    /// Look a command up by name; dashes and underscores are interchangeable.
    pub fn resolve(&self, name: &str) -> Result<&CommandDescriptor, ProtocolViolation> {
        let normalised = name.trim().to_ascii_lowercase().replace('-', "_");
        self.by_name
            .get(normalised.as_str())
            .map(|index| &self.commands[*index])
            .ok_or_else(|| ProtocolViolation::UnknownCommand(name.to_owned()))
    }

    /// The get and set commands sharing one family name, e.g. `power_state`.
    pub fn pair(
        &self,
        family: &str,
    ) -> (Option<&CommandDescriptor>, Option<&CommandDescriptor>) {
        let lookup = |prefix: &str| {
            self.by_name
                .get(format!("{prefix}{family}").as_str())
                .map(|index| &self.commands[*index])
        };
        (lookup("get_"), lookup("set_"))
    }

    pub fn iter(&self) -> impl Iterator<Item = &CommandDescriptor> {
        self.commands.iter()
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::choices::{Choice, PowerState};
    use crate::error::SchemaError;

    #[test]
    fn builtin_catalog_is_consistent() {
        let registry = Registry::new(CATALOG.iter().copied()).unwrap();
        assert_eq!(registry.len(), CATALOG.len());
    }

    #[test]
    fn resolve_accepts_dashes_and_case() {
        let registry = Registry::global();
        let descriptor = registry.resolve("Get-Power-State").unwrap();
        assert_eq!(descriptor.opcode, 0x19);
        assert_eq!(
            registry.resolve("get_power"),
            Err(ProtocolViolation::UnknownCommand("get_power".into()))
        );
    }

    #[test]
    fn duplicate_names_are_refused() {
        let power = CATALOG[0];
        let err = Registry::new([power, power]).unwrap_err();
        assert_eq!(err, RegistryError::DuplicateName("get_power_state"));
    }

    #[test]
    fn mismatched_pair_is_refused() {
        let get = CommandDescriptor::get(
            "get_logo",
            0x3F,
            NO_PARAMS,
            ResponseSchema::Choice(Family::PowerOnLogo),
            "",
        );
        let set = CommandDescriptor::set("set_logo", 0x3E, RequestSchema::Choice(Family::Apm), "");
        assert_eq!(
            Registry::new([get, set]).unwrap_err(),
            RegistryError::DomainMismatch {
                get: "get_logo",
                set: "set_logo"
            }
        );
    }

    #[test]
    fn opcodes_are_unique() {
        let mut opcodes: Vec<u8> = CATALOG.iter().map(|d| d.opcode).collect();
        opcodes.sort_unstable();
        opcodes.dedup();
        assert_eq!(opcodes.len(), CATALOG.len());
    }

    #[test]
    fn pair_finds_both_directions() {
        let (get, set) = Registry::global().pair("brightness_level");
        assert_eq!(get.map(|d| d.opcode), Some(0x33));
        assert_eq!(set.map(|d| d.opcode), Some(0x32));
        let (get, set) = Registry::global().pair("monitor_id");
        assert!(get.is_none());
        assert!(set.is_some());
    }

    #[test]
    fn request_frame_validates_before_encoding() {
        let registry = Registry::global();
        let set_brightness = registry.resolve("set_brightness_level").unwrap();
        assert_eq!(
            set_brightness.request_frame(Address::monitor(1), &Param::Number(150)),
            Err(ProtocolViolation::Schema(SchemaError::OutOfRange {
                value: 150,
                min: 0,
                max: 100
            }))
        );

        let get_power = registry.resolve("get_power_state").unwrap();
        assert!(matches!(
            get_power.request_frame(Address::broadcast(), &Param::None),
            Err(ProtocolViolation::AddressOutOfRange(_))
        ));

        let set_power = registry.resolve("set_power_state").unwrap();
        let frame = set_power
            .request_frame(
                Address::broadcast(),
                &Param::Choice(Choice::Power(PowerState::On)),
            )
            .unwrap();
        assert_eq!(&frame.encode()[..], &[0x06, 0x00, 0x00, 0x18, 0x02, 0x1C]);
    }
}
