//! ---
//! sicp_section: "15-testing-qa-runbook"
//! sicp_subsection: "tests"
//! sicp_type: "test"
//! sicp_scope: "code"
//! sicp_description: "Property tests for the frame codec and the command catalog."
//! sicp_version: "v0.0.0-prealpha"
//! sicp_owner: "tbd"
//! ---
use proptest::prelude::*;
use sicp_proto::{
    checksum, Address, Direction, Frame, FrameError, IpParameterCode, IpValueType, Param,
    ProtocolViolation, Registry, RequestSchema, SchemaError, MAX_PARAMETER_LEN,
};

/// A parameter each request schema accepts.
fn sample_param(schema: RequestSchema) -> Param {
    match schema {
        RequestSchema::Empty => Param::None,
        RequestSchema::Choice(family) => {
            let name = family.names().into_iter().next().expect("family has members");
            Param::Choice(family.parse(&name).expect("canonical name parses"))
        }
        RequestSchema::Flag { .. } => Param::Flag(true),
        RequestSchema::Level { min, .. } => Param::Number(min.into()),
        RequestSchema::Brightness => Param::Number(50),
        RequestSchema::Kelvin => Param::Number(6500),
        RequestSchema::Group => Param::Number(3),
        RequestSchema::InputSource => schema.parse_args(&["hdmi1"]).expect("input parses"),
        RequestSchema::Volume => Param::Volume {
            speaker: Some(10),
            audio_out: None,
        },
        RequestSchema::RemoteKey => schema.parse_args(&["ok"]).expect("key parses"),
        RequestSchema::IpParameter => Param::Ip {
            parameter: IpParameterCode::Ip,
            value_type: IpValueType::Current,
        },
    }
}

fn any_frame() -> impl Strategy<Value = Frame> {
    (
        any::<u8>(),
        any::<u8>(),
        any::<u8>(),
        prop::collection::vec(any::<u8>(), 0..=MAX_PARAMETER_LEN),
    )
        .prop_map(|(monitor, group, opcode, params)| {
            Frame::new(monitor, group, opcode, &params).expect("length within bounds")
        })
}

proptest! {
    #[test]
    fn encoded_frames_decode_unchanged(frame in any_frame()) {
        let wire = frame.encode();
        prop_assert_eq!(wire[0] as usize, wire.len());
        prop_assert_eq!(checksum(&wire[..wire.len() - 1]), wire[wire.len() - 1]);
        let decoded = Frame::decode(&wire).expect("valid frame decodes");
        prop_assert_eq!(decoded, frame);
    }

    #[test]
    fn decode_never_panics_on_noise(raw in prop::collection::vec(any::<u8>(), 0..64)) {
        if let Ok(frame) = Frame::decode(&raw) {
            prop_assert_eq!(frame.encoded_len(), raw.len());
        }
    }

    #[test]
    fn every_command_round_trips_its_address(monitor in 1u8..=255, group in 0u8..=254) {
        for descriptor in Registry::global().iter() {
            let param = sample_param(descriptor.request);
            let frame = descriptor
                .request_frame(Address::new(monitor, group), &param)
                .expect("sample parameter encodes");
            let decoded = Frame::decode(&frame.encode()).expect("decodes");
            prop_assert_eq!(decoded.monitor_id, monitor);
            prop_assert_eq!(decoded.group_id, group);
            prop_assert_eq!(decoded.opcode, descriptor.opcode);
        }
    }

    #[test]
    fn brightness_outside_percent_range_is_refused(level in prop_oneof![i64::MIN..0i64, 101i64..i64::MAX]) {
        let set = Registry::global().resolve("set_brightness_level").expect("registered");
        let result = set.request_frame(Address::monitor(1), &Param::Number(level));
        let is_out_of_range = matches!(
            result,
            Err(ProtocolViolation::Schema(SchemaError::OutOfRange { .. }))
        );
        prop_assert!(is_out_of_range);
    }
}

#[test]
fn broadcast_reaches_set_commands_only() {
    for descriptor in Registry::global().iter() {
        let param = sample_param(descriptor.request);
        let result = descriptor.request_frame(Address::broadcast(), &param);
        match descriptor.direction {
            Direction::Set => assert!(result.is_ok(), "{} refused broadcast", descriptor.name),
            Direction::Get => assert!(
                matches!(result, Err(ProtocolViolation::AddressOutOfRange(_))),
                "{} accepted broadcast",
                descriptor.name
            ),
        }
    }
}

#[test]
fn truncated_frame_reports_checksum_first() {
    let wire = Frame::new(1, 0, 0x19, &[]).unwrap().encode();
    let truncated = &wire[..wire.len() - 1];
    assert_eq!(
        Frame::decode(truncated),
        Err(FrameError::ShortFrame { len: 4, min: 5 })
    );
}
