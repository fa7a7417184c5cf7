//! Typed data model for RPL control messages.
//!
//! This crate models the ICMPv6 control messages of the routing protocol —
//! DIS, DIO, DAO, DAO-ACK, and the Consistency Check — together with their
//! options and the security section, as plain typed structures. Variant
//! payloads that the protocol multiplexes behind discriminant bytes are
//! expressed as tagged enums rather than overlapping memory, so the
//! discriminant can never disagree with the payload.
//!
//! Byte-level framing and parsing are intentionally absent: this is the
//! in-process representation consumed by the DODAG state machinery, not a
//! codec.
//!
//! ## Message taxonomy
//!
//! ```text
//! 0x00 DIS   solicit DODAG information        0x80 secure DIS
//! 0x01 DIO   advertise DODAG membership       0x81 secure DIO
//! 0x02 DAO   establish downward routes        0x82 secure DAO
//! 0x03 DAO-ACK acknowledge a DAO              0x83 secure DAO-ACK
//! 0x8A CC    consistency check (always secured)
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod message;
pub mod options;
pub mod security;

pub use error::MessageError;
pub use message::{
    ConsistencyCheck, ControlMessage, ControlMessageBody, ControlMessageType, Dao, DaoAck,
    DaoAckFlags, DaoAckStatus, DaoFlags, Dio, DioMode, Dis, DodagId, InstanceId, ModeOfOperation,
    DIO_PREFERENCE_DEFAULT, DIO_PREFERENCE_MAX, MAX_INSTANCE_ID, RPL_ICMPV6_TYPE,
};
pub use options::{
    DodagConfiguration, OptionType, RouteInformation, RplOption, RplTarget, SolicitedInformation,
    TransitInformation, DEFAULT_DIO_INTERVAL_DOUBLINGS, DEFAULT_DIO_INTERVAL_MIN,
    DEFAULT_DIO_REDUNDANCY_CONSTANT, DEFAULT_MIN_HOP_RANK_INCREASE, DEFAULT_PATH_CONTROL_SIZE,
};
pub use security::{
    KeyIdentifier, KeyIdentifierMode, SecurityAlgorithm, SecurityLevel, SecuritySection,
};
