//! ---
//! sicp_section: "02-protocol-codec"
//! sicp_subsection: "module"
//! sicp_type: "source"
//! sicp_scope: "code"
//! sicp_description: "Frame codec, command registry and outcome classification for SICP."
//! sicp_version: "v0.0.0-prealpha"
//! sicp_owner: "tbd"
//! ---
//! Signage Control Protocol engine core.
//! This crate performs no I/O: it turns typed commands into frames and frames
//! back into typed values, and classifies every exchange into an [`Outcome`].

pub mod address;
pub mod choices;
pub mod classify;
pub mod error;
pub mod frame;
pub mod registry;
pub mod schema;
pub mod value;

pub use address::{Address, BROADCAST_MONITOR, MAX_GROUP_ID};
pub use choices::{
    ApmMode, AutoSignalMode, Choice, ColdStartPowerState, ColorTemperatureMode, Family,
    InputSource, IpParameterCode, IpValueType, ModelInfoField, PictureStyle, PowerOnLogoMode,
    PowerSaveMode, PowerState, RemoteKey, RemoteLockState, SicpInfoField, SmartPowerLevel,
    TestPattern, WireCode,
};
pub use classify::{classify, classify_response, Outcome, RawResponse, RejectReason, ResponseStatus};
pub use error::{FrameError, ProtocolViolation, RegistryError, SchemaError, TransportError};
pub use frame::{
    checksum, expected_len, Frame, ACK, COMMUNICATION_CONTROL, MAX_FRAME_LEN, MAX_PARAMETER_LEN,
    MIN_FRAME_LEN, NACK, NAV,
};
pub use registry::{CommandDescriptor, Direction, Registry};
pub use schema::{Domain, RequestSchema, ResponseSchema};
pub use value::{GroupSetting, InputSelection, Param, TemperatureReading, Value, VolumeLevels};
