//! ---
//! sicp_section: "02-protocol-codec"
//! sicp_subsection: "module"
//! sicp_type: "source"
//! sicp_scope: "code"
//! sicp_description: "Per-command parameter encoding and reply payload decoding."
//! sicp_version: "v0.0.0-prealpha"
//! sicp_owner: "tbd"
//! ---
//! Request and response schemas.
//!
//! Each command descriptor carries one [`RequestSchema`] and one
//! [`ResponseSchema`]. The request side validates a [`Param`] and produces
//! parameter bytes; the response side turns a data payload into a [`Value`].
//! Both sides report their [`Domain`] so the registry can check that a set
//! command accepts exactly what the matching get command reports.

use crate::choices::{Family, InputSource, IpParameterCode, IpValueType, WireCode};
use crate::classify::RejectReason;
use crate::error::SchemaError;
use crate::value::{GroupSetting, InputSelection, Param, TemperatureReading, Value, VolumeLevels};

/// Byte meaning "leave this field unchanged".
pub const NO_CHANGE: u8 = 0xFF;

/// Trailing bytes of the video parameter set command after the brightness level.
const VIDEO_PARAMETER_TAIL: usize = 6;

/// Precise colour temperature range, in 100 K steps.
pub const KELVIN_STEP: u16 = 100;
pub const KELVIN_MIN: u16 = 2_000;
pub const KELVIN_MAX: u16 = 10_000;

/// Temperature byte reported for a sensor that is not fitted.
const UNUSED_SENSOR: u8 = 0xFF;

const MAX_PLAYLIST: u8 = 8;
const EFFECT_DURATIONS: [u8; 5] = [0, 5, 10, 15, 20];
const MAX_PERCENT: u8 = 100;

/// The set of values a schema accepts or reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Domain {
    None,
    Choice(Family),
    Switch { on: u8, off: u8 },
    Range { min: u8, max: u8 },
    Kelvin,
    Group,
    Volume,
    Temperatures,
    Text,
}

/// Parameter layout of a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestSchema {
    Empty,
    Choice(Family),
    Flag { on: u8, off: u8 },
    Level { min: u8, max: u8 },
    /// Video parameter block: level then six "no change" bytes.
    Brightness,
    Kelvin,
    Group,
    InputSource,
    Volume,
    /// Key code followed by a reserved zero byte.
    RemoteKey,
    IpParameter,
}

/// Payload layout of a data reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseSchema {
    Ack,
    Choice(Family),
    Flag { on: u8, off: u8 },
    Percent,
    Kelvin,
    Seconds { max: u8 },
    Group,
    Temperatures,
    Text,
    Volume,
    /// Source followed by playlist, label and effect bytes.
    InputSource,
    IpParameter,
}

impl RequestSchema {
    pub fn domain(&self) -> Domain {
        match *self {
            RequestSchema::Empty => Domain::None,
            RequestSchema::Choice(family) => Domain::Choice(family),
            RequestSchema::Flag { on, off } => Domain::Switch { on, off },
            RequestSchema::Level { min, max } => Domain::Range { min, max },
            RequestSchema::Brightness => Domain::Range {
                min: 0,
                max: MAX_PERCENT,
            },
            RequestSchema::Kelvin => Domain::Kelvin,
            RequestSchema::Group => Domain::Group,
            RequestSchema::InputSource => Domain::Choice(Family::InputSource),
            RequestSchema::Volume => Domain::Volume,
            RequestSchema::RemoteKey => Domain::Choice(Family::RemoteKey),
            RequestSchema::IpParameter => Domain::Choice(Family::IpParameter),
        }
    }

    /// Validate `param` and produce the parameter bytes of the frame.
    pub fn encode(&self, param: &Param) -> Result<Vec<u8>, SchemaError> {
        if matches!(param, Param::None) && !matches!(self, RequestSchema::Empty) {
            return Err(SchemaError::MissingParameter {
                expected: self.usage(),
            });
        }

        match (*self, param) {
            (RequestSchema::Empty, Param::None) => Ok(Vec::new()),
            (RequestSchema::Empty, _) => Err(SchemaError::UnexpectedParameter),

            (RequestSchema::Choice(family), Param::Choice(choice))
                if choice.family() == family =>
            {
                encodable(choice.code(), family, choice).map(|code| vec![code])
            }

            (RequestSchema::Flag { on, off }, Param::Flag(state)) => {
                Ok(vec![if *state { on } else { off }])
            }

            (RequestSchema::Level { min, max }, Param::Number(value)) => {
                Ok(vec![in_range(*value, min.into(), max.into())? as u8])
            }

            (RequestSchema::Brightness, Param::Number(value)) => {
                let level = in_range(*value, 0, MAX_PERCENT.into())? as u8;
                let mut bytes = vec![level];
                bytes.extend_from_slice(&[NO_CHANGE; VIDEO_PARAMETER_TAIL]);
                Ok(bytes)
            }

            (RequestSchema::Kelvin, Param::Number(kelvin)) => {
                let kelvin = in_range(*kelvin, KELVIN_MIN.into(), KELVIN_MAX.into())?;
                let step = (kelvin + i64::from(KELVIN_STEP) / 2) / i64::from(KELVIN_STEP);
                Ok(vec![step as u8])
            }

            (RequestSchema::Group, Param::Number(value)) => {
                if *value == i64::from(GroupSetting::OFF_CODE) {
                    Ok(vec![GroupSetting::OFF_CODE])
                } else {
                    Ok(vec![in_range(*value, 1, 254)? as u8])
                }
            }

            (RequestSchema::InputSource, Param::Input(selection)) => encode_input(selection),
            (RequestSchema::InputSource, Param::Choice(choice))
                if choice.family() == Family::InputSource =>
            {
                let source = encodable(choice.code(), Family::InputSource, choice)?;
                Ok(vec![source, 0x00, 0x01, 0x00])
            }

            (RequestSchema::Volume, Param::Volume { speaker, audio_out }) => {
                let level = |level: Option<u8>| -> Result<u8, SchemaError> {
                    match level {
                        None => Ok(NO_CHANGE),
                        Some(value) => {
                            in_range(value.into(), 0, MAX_PERCENT.into()).map(|v| v as u8)
                        }
                    }
                };
                Ok(vec![level(*speaker)?, level(*audio_out)?])
            }

            (RequestSchema::RemoteKey, Param::Choice(choice))
                if choice.family() == Family::RemoteKey =>
            {
                let key = encodable(choice.code(), Family::RemoteKey, choice)?;
                Ok(vec![key, 0x00])
            }

            (RequestSchema::IpParameter, Param::Ip { parameter, value_type }) => {
                Ok(vec![*parameter as u8, *value_type as u8])
            }

            (schema, _) => Err(SchemaError::WrongShape {
                expected: schema.usage(),
            }),
        }
    }

    /// Turn command-line arguments into a parameter for this schema.
    pub fn parse_args(&self, args: &[&str]) -> Result<Param, SchemaError> {
        let too_many = |max: usize| -> Result<(), SchemaError> {
            if args.len() > max {
                Err(SchemaError::WrongShape {
                    expected: self.usage(),
                })
            } else {
                Ok(())
            }
        };

        if matches!(self, RequestSchema::Empty) {
            return if args.is_empty() {
                Ok(Param::None)
            } else {
                Err(SchemaError::UnexpectedParameter)
            };
        }

        let Some(first) = args.first().copied() else {
            return Err(SchemaError::MissingParameter {
                expected: self.usage(),
            });
        };

        match *self {
            RequestSchema::Empty => Ok(Param::None),
            RequestSchema::Choice(family) => {
                too_many(1)?;
                family.parse(first).map(Param::Choice)
            }
            RequestSchema::RemoteKey => {
                too_many(1)?;
                Family::RemoteKey.parse(first).map(Param::Choice)
            }
            RequestSchema::Flag { .. } => {
                too_many(1)?;
                parse_switch(first).map(Param::Flag)
            }
            RequestSchema::Level { .. } | RequestSchema::Brightness => {
                too_many(1)?;
                parse_number(first).map(Param::Number)
            }
            RequestSchema::Kelvin => {
                too_many(1)?;
                let trimmed = first.trim();
                let digits = trimmed
                    .strip_suffix(['k', 'K'])
                    .unwrap_or(trimmed);
                let value = parse_number(digits)?;
                // Small values are steps, not Kelvin.
                if (20..=100).contains(&value) {
                    Ok(Param::Number(value * i64::from(KELVIN_STEP)))
                } else {
                    Ok(Param::Number(value))
                }
            }
            RequestSchema::Group => {
                too_many(1)?;
                if first.eq_ignore_ascii_case("off") {
                    Ok(Param::Number(GroupSetting::OFF_CODE.into()))
                } else {
                    parse_number(first).map(Param::Number)
                }
            }
            RequestSchema::InputSource => {
                too_many(4)?;
                let source: InputSource = Family::InputSource
                    .parse(first)?
                    .try_into()
                    .map_err(|_| SchemaError::WrongShape {
                        expected: self.usage(),
                    })?;
                let mut selection = InputSelection::new(source);
                if let Some(playlist) = args.get(1) {
                    selection.playlist = byte(parse_number(playlist)?)?;
                }
                if let Some(label) = args.get(2) {
                    selection.show_label = parse_switch(label)?;
                }
                if let Some(effect) = args.get(3) {
                    selection.effect_seconds = byte(parse_number(effect)?)?;
                }
                Ok(Param::Input(selection))
            }
            RequestSchema::Volume => {
                too_many(2)?;
                let level = |text: &str| -> Result<Option<u8>, SchemaError> {
                    if ["nc", "none", "-"].iter().any(|nc| text.eq_ignore_ascii_case(nc)) {
                        Ok(None)
                    } else {
                        let value = in_range(parse_number(text)?, 0, MAX_PERCENT.into())?;
                        Ok(Some(value as u8))
                    }
                };
                Ok(Param::Volume {
                    speaker: level(first)?,
                    audio_out: args.get(1).map(|text| level(*text)).transpose()?.flatten(),
                })
            }
            RequestSchema::IpParameter => {
                too_many(2)?;
                let parameter: IpParameterCode = Family::IpParameter
                    .parse(first)?
                    .try_into()
                    .map_err(|_| SchemaError::WrongShape {
                        expected: self.usage(),
                    })?;
                let value_type: IpValueType = match args.get(1) {
                    Some(text) => Family::IpValueType
                        .parse(text)?
                        .try_into()
                        .map_err(|_| SchemaError::WrongShape {
                            expected: self.usage(),
                        })?,
                    None => IpValueType::default(),
                };
                Ok(Param::Ip {
                    parameter,
                    value_type,
                })
            }
        }
    }

    /// Argument synopsis for help output.
    pub fn usage(&self) -> String {
        match *self {
            RequestSchema::Empty => String::new(),
            RequestSchema::Choice(family) => format!("<{}>", family.names().join("|")),
            RequestSchema::Flag { .. } => "<on|off>".into(),
            RequestSchema::Level { min, max } => format!("<{min}-{max}>"),
            RequestSchema::Brightness => format!("<0-{MAX_PERCENT}>"),
            RequestSchema::Kelvin => {
                format!("<{KELVIN_MIN}-{KELVIN_MAX} K | step 20-100>")
            }
            RequestSchema::Group => "<1-254|off>".into(),
            RequestSchema::InputSource => format!(
                "<{}> [playlist 0-{MAX_PLAYLIST}] [label on|off] [effect 0|5|10|15|20]",
                Family::InputSource.names().join("|")
            ),
            RequestSchema::Volume => "<speaker 0-100|nc> [audio-out 0-100|nc]".into(),
            RequestSchema::RemoteKey => format!("<{}>", Family::RemoteKey.names().join("|")),
            RequestSchema::IpParameter => format!(
                "<{}> [{}]",
                Family::IpParameter.names().join("|"),
                Family::IpValueType.names().join("|")
            ),
        }
    }
}

impl ResponseSchema {
    pub fn domain(&self) -> Domain {
        match *self {
            ResponseSchema::Ack => Domain::None,
            ResponseSchema::Choice(family) => Domain::Choice(family),
            ResponseSchema::Flag { on, off } => Domain::Switch { on, off },
            ResponseSchema::Percent => Domain::Range {
                min: 0,
                max: MAX_PERCENT,
            },
            ResponseSchema::Kelvin => Domain::Kelvin,
            ResponseSchema::Seconds { max } => Domain::Range { min: 0, max },
            ResponseSchema::Group => Domain::Group,
            ResponseSchema::Temperatures => Domain::Temperatures,
            ResponseSchema::Text | ResponseSchema::IpParameter => Domain::Text,
            ResponseSchema::Volume => Domain::Volume,
            ResponseSchema::InputSource => Domain::Choice(Family::InputSource),
        }
    }

    /// Decode the payload of a data reply. An empty payload means the
    /// display answered without data, which panels do while busy.
    pub fn decode(&self, payload: &[u8]) -> Result<Value, RejectReason> {
        let Some(&first) = payload.first() else {
            return Err(RejectReason::Busy);
        };
        let out_of_domain = |value: u8| RejectReason::OutOfDomain { value };

        match *self {
            ResponseSchema::Ack => Ok(Value::Acknowledged),
            ResponseSchema::Choice(family) => family
                .decode(first)
                .map(Value::Choice)
                .ok_or_else(|| out_of_domain(first)),
            ResponseSchema::Flag { on, off } => match first {
                byte if byte == on => Ok(Value::Switch(true)),
                byte if byte == off => Ok(Value::Switch(false)),
                other => Err(out_of_domain(other)),
            },
            ResponseSchema::Percent if first <= MAX_PERCENT => Ok(Value::Percent(first)),
            ResponseSchema::Kelvin => {
                let kelvin = u16::from(first) * KELVIN_STEP;
                if (KELVIN_MIN..=KELVIN_MAX).contains(&kelvin) {
                    Ok(Value::Kelvin(kelvin))
                } else {
                    Err(out_of_domain(first))
                }
            }
            ResponseSchema::Seconds { max } if first <= max => Ok(Value::Seconds(first)),
            ResponseSchema::Group => match first {
                GroupSetting::OFF_CODE => Ok(Value::Group(GroupSetting::Off)),
                1..=254 => Ok(Value::Group(GroupSetting::Group(first))),
                other => Err(out_of_domain(other)),
            },
            ResponseSchema::Temperatures => Ok(Value::Temperatures(
                payload
                    .iter()
                    .zip(1u8..)
                    .filter(|(celsius, _)| **celsius != UNUSED_SENSOR)
                    .map(|(celsius, sensor)| TemperatureReading {
                        sensor,
                        celsius: *celsius,
                    })
                    .collect(),
            )),
            ResponseSchema::Text => Ok(Value::Text(printable(payload))),
            ResponseSchema::Volume => {
                let audio_out = payload.get(1).copied();
                if first > MAX_PERCENT {
                    return Err(out_of_domain(first));
                }
                if let Some(level) = audio_out.filter(|level| *level > MAX_PERCENT) {
                    return Err(out_of_domain(level));
                }
                Ok(Value::Volume(VolumeLevels {
                    speaker: first,
                    audio_out,
                }))
            }
            ResponseSchema::InputSource => {
                let source = InputSource::from_code(first).ok_or_else(|| out_of_domain(first))?;
                let playlist = payload.get(1).copied().unwrap_or_default();
                if playlist > MAX_PLAYLIST {
                    return Err(out_of_domain(playlist));
                }
                Ok(Value::Input(InputSelection {
                    source,
                    playlist,
                    show_label: payload.get(2).map_or(true, |label| *label != 0),
                    effect_seconds: payload.get(3).copied().unwrap_or_default(),
                }))
            }
            ResponseSchema::IpParameter => {
                let parameter =
                    IpParameterCode::from_code(first).ok_or_else(|| out_of_domain(first))?;
                let value = payload.get(2..).unwrap_or_default();
                Ok(Value::Text(format_ip_value(parameter, value)))
            }
            ResponseSchema::Percent | ResponseSchema::Seconds { .. } => Err(out_of_domain(first)),
        }
    }
}

fn encodable(
    code: Option<u8>,
    family: Family,
    choice: &crate::choices::Choice,
) -> Result<u8, SchemaError> {
    code.ok_or_else(|| SchemaError::NotEncodable {
        family: family.label(),
        value: choice.to_string(),
    })
}

fn in_range(value: i64, min: i64, max: i64) -> Result<i64, SchemaError> {
    if (min..=max).contains(&value) {
        Ok(value)
    } else {
        Err(SchemaError::OutOfRange { value, min, max })
    }
}

fn byte(value: i64) -> Result<u8, SchemaError> {
    in_range(value, 0, u8::MAX.into()).map(|v| v as u8)
}

fn encode_input(selection: &InputSelection) -> Result<Vec<u8>, SchemaError> {
    in_range(selection.playlist.into(), 0, MAX_PLAYLIST.into())?;
    if !EFFECT_DURATIONS.contains(&selection.effect_seconds) {
        return Err(SchemaError::NotInSet {
            value: selection.effect_seconds.into(),
            accepted: "0, 5, 10, 15, 20".into(),
        });
    }
    Ok(vec![
        selection.source as u8,
        selection.playlist,
        u8::from(selection.show_label),
        selection.effect_seconds,
    ])
}

/// Decimal or `0x`-prefixed hexadecimal integer.
fn parse_number(text: &str) -> Result<i64, SchemaError> {
    let text = text.trim();
    let parsed = match text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        Some(hex) => i64::from_str_radix(hex, 16),
        None => text.parse::<i64>(),
    };
    parsed.map_err(|_| SchemaError::WrongShape {
        expected: format!("an integer, got '{text}'"),
    })
}

fn parse_switch(text: &str) -> Result<bool, SchemaError> {
    match text.trim().to_ascii_lowercase().as_str() {
        "on" | "true" | "yes" | "enable" | "enabled" | "1" => Ok(true),
        "off" | "false" | "no" | "disable" | "disabled" | "0" => Ok(false),
        _ => Err(SchemaError::WrongShape {
            expected: format!("on or off, got '{text}'"),
        }),
    }
}

fn printable(bytes: &[u8]) -> String {
    bytes
        .iter()
        .filter(|byte| (0x20..=0x7E).contains(*byte))
        .map(|byte| char::from(*byte))
        .collect::<String>()
        .trim()
        .to_owned()
}

/// Addresses arrive as twelve ASCII digits (`192168001010`), MAC addresses as
/// six raw bytes or twelve hex characters. Anything else is shown as text or hex.
fn format_ip_value(parameter: IpParameterCode, value: &[u8]) -> String {
    let text = printable(value);

    if parameter.is_mac() {
        if value.len() == 6 {
            return hex_pairs(value.iter().copied());
        }
        if text.len() == 12 && text.chars().all(|c| c.is_ascii_hexdigit()) {
            return text
                .to_ascii_uppercase()
                .as_bytes()
                .chunks(2)
                .map(|pair| String::from_utf8_lossy(pair).into_owned())
                .collect::<Vec<_>>()
                .join(":");
        }
    } else if text.len() == 12 && text.chars().all(|c| c.is_ascii_digit()) {
        return text
            .as_bytes()
            .chunks(3)
            .map(|octet| {
                String::from_utf8_lossy(octet)
                    .parse::<u16>()
                    .map(|n| n.to_string())
                    .unwrap_or_default()
            })
            .collect::<Vec<_>>()
            .join(".");
    }

    if !text.is_empty() {
        text
    } else {
        value.iter().map(|byte| format!("{byte:02X}")).collect()
    }
}

fn hex_pairs(bytes: impl Iterator<Item = u8>) -> String {
    bytes
        .map(|byte| format!("{byte:02X}"))
        .collect::<Vec<_>>()
        .join(":")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::choices::{Choice, PowerState, RemoteKey};

    #[test]
    fn brightness_pads_video_parameters() {
        let bytes = RequestSchema::Brightness.encode(&Param::Number(60)).unwrap();
        assert_eq!(bytes, vec![60, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF]);
    }

    #[test]
    fn brightness_out_of_range_is_rejected() {
        assert_eq!(
            RequestSchema::Brightness.encode(&Param::Number(150)),
            Err(SchemaError::OutOfRange {
                value: 150,
                min: 0,
                max: 100
            })
        );
    }

    #[test]
    fn kelvin_rounds_to_steps_but_never_clamps() {
        let schema = RequestSchema::Kelvin;
        assert_eq!(schema.encode(&Param::Number(6500)).unwrap(), vec![65]);
        assert_eq!(schema.encode(&Param::Number(6549)).unwrap(), vec![65]);
        assert_eq!(schema.encode(&Param::Number(6550)).unwrap(), vec![66]);
        assert!(matches!(
            schema.encode(&Param::Number(1_999)),
            Err(SchemaError::OutOfRange { .. })
        ));
        assert!(matches!(
            schema.encode(&Param::Number(10_001)),
            Err(SchemaError::OutOfRange { .. })
        ));
    }

    #[test]
    fn kelvin_arguments_accept_steps_and_suffix() {
        let schema = RequestSchema::Kelvin;
        assert_eq!(schema.parse_args(&["65"]).unwrap(), Param::Number(6500));
        assert_eq!(schema.parse_args(&["5000K"]).unwrap(), Param::Number(5000));
    }

    #[test]
    fn offline_power_is_not_encodable() {
        let err = RequestSchema::Choice(Family::Power)
            .encode(&Param::Choice(Choice::Power(PowerState::Offline)))
            .unwrap_err();
        assert!(matches!(err, SchemaError::NotEncodable { .. }));
    }

    #[test]
    fn choice_from_another_family_is_wrong_shape() {
        let err = RequestSchema::Choice(Family::PictureStyle)
            .encode(&Param::Choice(Choice::Power(PowerState::On)))
            .unwrap_err();
        assert!(matches!(err, SchemaError::WrongShape { .. }));
    }

    #[test]
    fn missing_and_unexpected_parameters() {
        assert!(matches!(
            RequestSchema::Choice(Family::Apm).encode(&Param::None),
            Err(SchemaError::MissingParameter { .. })
        ));
        assert_eq!(
            RequestSchema::Empty.encode(&Param::Flag(true)),
            Err(SchemaError::UnexpectedParameter)
        );
        assert_eq!(
            RequestSchema::Empty.parse_args(&["x"]),
            Err(SchemaError::UnexpectedParameter)
        );
    }

    #[test]
    fn input_source_arguments() {
        let param = RequestSchema::InputSource
            .parse_args(&["mediaplayer", "2", "off", "10"])
            .unwrap();
        assert_eq!(
            RequestSchema::InputSource.encode(&param).unwrap(),
            vec![0x16, 0x02, 0x00, 0x0A]
        );

        let shorthand = Param::Choice(Choice::InputSource(InputSource::Hdmi1));
        assert_eq!(
            RequestSchema::InputSource.encode(&shorthand).unwrap(),
            vec![0x0D, 0x00, 0x01, 0x00]
        );
    }

    #[test]
    fn input_source_rejects_bad_playlist_and_effect() {
        let mut selection = InputSelection::new(InputSource::Hdmi2);
        selection.playlist = 9;
        assert!(matches!(
            RequestSchema::InputSource.encode(&Param::Input(selection)),
            Err(SchemaError::OutOfRange { .. })
        ));
        selection.playlist = 0;
        selection.effect_seconds = 7;
        assert!(matches!(
            RequestSchema::InputSource.encode(&Param::Input(selection)),
            Err(SchemaError::NotInSet { value: 7, .. })
        ));
    }

    #[test]
    fn volume_no_change_markers() {
        let param = RequestSchema::Volume.parse_args(&["nc", "40"]).unwrap();
        assert_eq!(
            param,
            Param::Volume {
                speaker: None,
                audio_out: Some(40)
            }
        );
        assert_eq!(RequestSchema::Volume.encode(&param).unwrap(), vec![0xFF, 40]);
    }

    #[test]
    fn remote_key_carries_reserved_byte() {
        let param = RequestSchema::RemoteKey.parse_args(&["vol+"]).unwrap();
        assert_eq!(param, Param::Choice(Choice::RemoteKey(RemoteKey::VolumeUp)));
        assert_eq!(RequestSchema::RemoteKey.encode(&param).unwrap(), vec![0x10, 0x00]);
    }

    #[test]
    fn group_accepts_off() {
        let param = RequestSchema::Group.parse_args(&["off"]).unwrap();
        assert_eq!(RequestSchema::Group.encode(&param).unwrap(), vec![0xFF]);
        assert!(RequestSchema::Group.encode(&Param::Number(0)).is_err());
    }

    #[test]
    fn empty_payload_is_busy() {
        assert_eq!(ResponseSchema::Percent.decode(&[]), Err(RejectReason::Busy));
    }

    #[test]
    fn out_of_domain_bytes_are_reported() {
        assert_eq!(
            ResponseSchema::Choice(Family::Power).decode(&[0x07]),
            Err(RejectReason::OutOfDomain { value: 0x07 })
        );
        assert_eq!(
            ResponseSchema::Percent.decode(&[101]),
            Err(RejectReason::OutOfDomain { value: 101 })
        );
        assert_eq!(
            ResponseSchema::Kelvin.decode(&[19]),
            Err(RejectReason::OutOfDomain { value: 19 })
        );
    }

    #[test]
    fn temperatures_skip_unused_sensors() {
        let value = ResponseSchema::Temperatures.decode(&[41, 0xFF, 38]).unwrap();
        assert_eq!(
            value,
            Value::Temperatures(vec![
                TemperatureReading { sensor: 1, celsius: 41 },
                TemperatureReading { sensor: 3, celsius: 38 },
            ])
        );
    }

    #[test]
    fn text_keeps_printable_ascii_only() {
        let value = ResponseSchema::Text.decode(b"AB1234\x00567890CD").unwrap();
        assert_eq!(value, Value::Text("AB1234567890CD".into()));
    }

    #[test]
    fn ip_parameter_formats_addresses() {
        let mut payload = vec![0x01, 0x01];
        payload.extend_from_slice(b"192168001010");
        assert_eq!(
            ResponseSchema::IpParameter.decode(&payload).unwrap(),
            Value::Text("192.168.1.10".into())
        );

        let mac = [0x06, 0x01, 0x00, 0x1B, 0x44, 0x11, 0x3A, 0xB7];
        assert_eq!(
            ResponseSchema::IpParameter.decode(&mac).unwrap(),
            Value::Text("00:1B:44:11:3A:B7".into())
        );

        let mut hex_mac = vec![0x07, 0x01];
        hex_mac.extend_from_slice(b"001b44113ab7");
        assert_eq!(
            ResponseSchema::IpParameter.decode(&hex_mac).unwrap(),
            Value::Text("00:1B:44:11:3A:B7".into())
        );
    }

    #[test]
    fn volume_reply_with_speaker_only() {
        assert_eq!(
            ResponseSchema::Volume.decode(&[35]).unwrap(),
            Value::Volume(VolumeLevels {
                speaker: 35,
                audio_out: None
            })
        );
    }

    #[test]
    fn set_and_get_domains_line_up() {
        assert_eq!(
            RequestSchema::Brightness.domain(),
            ResponseSchema::Percent.domain()
        );
        assert_eq!(
            RequestSchema::Level { min: 0, max: 60 }.domain(),
            ResponseSchema::Seconds { max: 60 }.domain()
        );
        assert_eq!(
            RequestSchema::InputSource.domain(),
            ResponseSchema::InputSource.domain()
        );
    }

    #[test]
    fn input_source_reply_keeps_the_playlist() {
        assert_eq!(
            ResponseSchema::InputSource.decode(&[0x16, 0x08, 0x00, 0x05]),
            Ok(Value::Input(InputSelection {
                source: InputSource::MediaPlayer,
                playlist: 8,
                show_label: false,
                effect_seconds: 5,
            }))
        );
        assert_eq!(
            ResponseSchema::InputSource.decode(&[0x0D]),
            Ok(Value::Input(InputSelection::new(InputSource::Hdmi1)))
        );
        assert_eq!(
            ResponseSchema::InputSource.decode(&[0x0D, 0x0C]),
            Err(RejectReason::OutOfDomain { value: 0x0C })
        );
    }
}
