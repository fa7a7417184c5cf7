//! Base structures for the RPL control messages.

use crate::options::RplOption;
use crate::security::SecuritySection;
use crate::MessageError;
use bitflags::bitflags;
use rpl_sequence::SequenceNumber;
use serde::{Deserialize, Serialize};
use std::fmt;

/// ICMPv6 information message type used for RPL control messages.
pub const RPL_ICMPV6_TYPE: u8 = 155;

/// Maximum id of a global RPL instance in an LLN.
pub const MAX_INSTANCE_ID: u8 = 127;

/// Maximum id of a local RPL instance (6 usable bits).
const MAX_LOCAL_INSTANCE_ID: u8 = 0x3F;

const INSTANCE_FLAG_LOCAL: u8 = 0x80;
const INSTANCE_FLAG_DIRECTION: u8 = 0x40;

/// Control message codes carried in the ICMPv6 code field
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ControlMessageType {
    /// DODAG Information Solicitation
    DodagInformationSolicitation = 0x00,
    /// DODAG Information Object
    DodagInformationObject = 0x01,
    /// Destination Advertisement Object
    DestinationAdvertisement = 0x02,
    /// Destination Advertisement Object acknowledgment
    DestinationAdvertisementAck = 0x03,
    /// Secured DODAG Information Solicitation
    SecureDodagInformationSolicitation = 0x80,
    /// Secured DODAG Information Object
    SecureDodagInformationObject = 0x81,
    /// Secured Destination Advertisement Object
    SecureDestinationAdvertisement = 0x82,
    /// Secured Destination Advertisement Object acknowledgment
    SecureDestinationAdvertisementAck = 0x83,
    /// Consistency Check, always secured
    ConsistencyCheck = 0x8A,
}

impl ControlMessageType {
    /// Whether this code denotes a secured message
    pub fn is_secure(self) -> bool {
        (self as u8) & 0x80 != 0
    }
}

impl TryFrom<u8> for ControlMessageType {
    type Error = MessageError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0x00 => Ok(ControlMessageType::DodagInformationSolicitation),
            0x01 => Ok(ControlMessageType::DodagInformationObject),
            0x02 => Ok(ControlMessageType::DestinationAdvertisement),
            0x03 => Ok(ControlMessageType::DestinationAdvertisementAck),
            0x80 => Ok(ControlMessageType::SecureDodagInformationSolicitation),
            0x81 => Ok(ControlMessageType::SecureDodagInformationObject),
            0x82 => Ok(ControlMessageType::SecureDestinationAdvertisement),
            0x83 => Ok(ControlMessageType::SecureDestinationAdvertisementAck),
            0x8A => Ok(ControlMessageType::ConsistencyCheck),
            _ => Err(MessageError::MessageType(value)),
        }
    }
}

/// RPL instance identifier.
///
/// Global instances use the plain id 0..=127. Local instances set the top
/// bit, carry a 6-bit id, and use the direction bit to indicate whether a
/// data packet travels toward the DODAGID (the bit is zero in control
/// messages).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InstanceId(u8);

impl InstanceId {
    /// Create a global instance id
    pub fn global(id: u8) -> Result<Self, MessageError> {
        if id > MAX_INSTANCE_ID {
            return Err(MessageError::InstanceId(id));
        }
        Ok(Self(id))
    }

    /// Create a local instance id
    pub fn local(id: u8) -> Result<Self, MessageError> {
        if id > MAX_LOCAL_INSTANCE_ID {
            return Err(MessageError::InstanceId(id));
        }
        Ok(Self(INSTANCE_FLAG_LOCAL | id))
    }

    /// Reinterpret a raw received byte; every value is a valid id
    pub const fn from_raw(raw: u8) -> Self {
        Self(raw)
    }

    /// Raw byte as carried in control messages
    pub const fn raw(self) -> u8 {
        self.0
    }

    /// Whether the instance is local to a DODAGID
    pub const fn is_local(self) -> bool {
        self.0 & INSTANCE_FLAG_LOCAL != 0
    }

    /// Instance id with scope flags stripped
    pub const fn id(self) -> u8 {
        if self.is_local() {
            self.0 & MAX_LOCAL_INSTANCE_ID
        } else {
            self.0
        }
    }

    /// Direction bit of a local instance id, meaningful in data packets only
    pub const fn toward_dodag_id(self) -> bool {
        self.is_local() && self.0 & INSTANCE_FLAG_DIRECTION != 0
    }
}

impl fmt::Display for InstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_local() {
            write!(f, "local/{}", self.id())
        } else {
            write!(f, "{}", self.id())
        }
    }
}

/// 128-bit identifier of the DODAG root, unique within an RPL instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DodagId([u8; 16]);

impl DodagId {
    /// Wrap raw identifier bytes
    pub const fn new(bytes: [u8; 16]) -> Self {
        Self(bytes)
    }

    /// Identifier bytes
    pub const fn as_bytes(&self) -> &[u8; 16] {
        &self.0
    }
}

/// Mode of operation advertised by the DODAG root
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ModeOfOperation {
    /// No downward routes maintained
    NoDownwardRoutes = 0x00,
    /// Non-storing mode
    NonStoring = 0x01,
    /// Storing mode without multicast support
    Storing = 0x02,
    /// Storing mode with multicast support
    StoringWithMulticast = 0x03,
}

impl TryFrom<u8> for ModeOfOperation {
    type Error = MessageError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0x00 => Ok(ModeOfOperation::NoDownwardRoutes),
            0x01 => Ok(ModeOfOperation::NonStoring),
            0x02 => Ok(ModeOfOperation::Storing),
            0x03 => Ok(ModeOfOperation::StoringWithMulticast),
            _ => Err(MessageError::ModeOfOperation(value)),
        }
    }
}

const DIO_MODE_GROUNDED_FLAG: u8 = 0x80;
const DIO_MODE_MOP_MASK: u8 = 0x38;
const DIO_MODE_MOP_SHIFT: u8 = 3;
const DIO_MODE_PREFERENCE_MASK: u8 = 0x07;

/// Most preferred DODAG root preference value
pub const DIO_PREFERENCE_MAX: u8 = 7;
/// Default (least preferred) root preference
pub const DIO_PREFERENCE_DEFAULT: u8 = 0;

/// DIO mode byte components: grounded flag, mode of operation, preference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DioMode {
    /// Whether the DODAG can satisfy the application-defined goal
    pub grounded: bool,
    /// Downward-route mode of operation
    pub mode_of_operation: ModeOfOperation,
    /// How preferable this root is against other roots (0..=7)
    pub preference: u8,
}

impl DioMode {
    /// Create a mode byte with the given components
    pub fn new(grounded: bool, mode_of_operation: ModeOfOperation, preference: u8) -> Self {
        Self {
            grounded,
            mode_of_operation,
            preference: preference & DIO_MODE_PREFERENCE_MASK,
        }
    }

    /// Pack the components into the mode byte
    pub fn pack(self) -> u8 {
        let mut byte = ((self.mode_of_operation as u8) << DIO_MODE_MOP_SHIFT)
            | (self.preference & DIO_MODE_PREFERENCE_MASK);
        if self.grounded {
            byte |= DIO_MODE_GROUNDED_FLAG;
        }
        byte
    }

    /// Unpack a received mode byte
    pub fn unpack(value: u8) -> Result<Self, MessageError> {
        let mode_of_operation =
            ModeOfOperation::try_from((value & DIO_MODE_MOP_MASK) >> DIO_MODE_MOP_SHIFT)?;
        Ok(Self {
            grounded: value & DIO_MODE_GROUNDED_FLAG != 0,
            mode_of_operation,
            preference: value & DIO_MODE_PREFERENCE_MASK,
        })
    }
}

impl Default for DioMode {
    fn default() -> Self {
        Self::new(
            false,
            ModeOfOperation::NoDownwardRoutes,
            DIO_PREFERENCE_DEFAULT,
        )
    }
}

/// DODAG Information Object: advertises DODAG membership upward state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dio {
    /// RPL instance the DODAG belongs to
    pub instance_id: InstanceId,
    /// DODAG Version Number set by the root
    pub version: SequenceNumber,
    /// Rank of the sending node within the DODAG version
    pub rank: u16,
    /// Grounded / mode of operation / preference components
    pub mode: DioMode,
    /// Destination Advertisement Trigger Sequence Number of the sender
    pub dtsn: SequenceNumber,
    /// Reserved flag byte, zero on send and ignored on receive
    pub flags: u8,
    /// Reserved byte, zero on send and ignored on receive
    pub reserved: u8,
    /// Attached options
    pub options: Vec<RplOption>,
}

impl Dio {
    /// Create a DIO with no options
    pub fn new(
        instance_id: InstanceId,
        version: SequenceNumber,
        rank: u16,
        mode: DioMode,
        dtsn: SequenceNumber,
    ) -> Self {
        Self {
            instance_id,
            version,
            rank,
            mode,
            dtsn,
            flags: 0,
            reserved: 0,
            options: Vec::new(),
        }
    }
}

bitflags! {
    /// DAO flag bits
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
    pub struct DaoFlags: u8 {
        /// Recipient must respond with a DAO-ACK
        const ACK_REQUEST = 0x80;
        /// The DODAGID field is present
        const DODAG_ID_PRESENT = 0x40;
    }
}

bitflags! {
    /// DAO-ACK flag bits
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
    pub struct DaoAckFlags: u8 {
        /// The DODAGID field is present
        const DODAG_ID_PRESENT = 0x80;
    }
}

/// Destination Advertisement Object: establishes downward routes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dao {
    /// RPL instance the DODAG belongs to
    pub instance_id: InstanceId,
    /// Whether the recipient must answer with a DAO-ACK
    pub ack_requested: bool,
    /// Incremented at each unique DAO from a node, echoed in the DAO-ACK
    pub sequence: SequenceNumber,
    /// DODAG identifier, mandatory for local instance ids
    pub dodag_id: Option<DodagId>,
    /// Attached options
    pub options: Vec<RplOption>,
}

impl Dao {
    /// Create a DAO, enforcing that local instance ids name their DODAG
    pub fn new(
        instance_id: InstanceId,
        sequence: SequenceNumber,
        dodag_id: Option<DodagId>,
    ) -> Result<Self, MessageError> {
        if instance_id.is_local() && dodag_id.is_none() {
            return Err(MessageError::MissingDodagId);
        }
        Ok(Self {
            instance_id,
            ack_requested: false,
            sequence,
            dodag_id,
            options: Vec::new(),
        })
    }

    /// Flag byte derived from the message shape
    pub fn flags(&self) -> DaoFlags {
        let mut flags = DaoFlags::empty();
        if self.ack_requested {
            flags |= DaoFlags::ACK_REQUEST;
        }
        if self.dodag_id.is_some() {
            flags |= DaoFlags::DODAG_ID_PRESENT;
        }
        flags
    }
}

/// DAO-ACK completion status classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DaoAckStatus {
    /// Unqualified acceptance
    Accepted,
    /// Acceptance with a reason to seek an alternate parent (1..=127)
    Tentative(u8),
    /// Rejection (128..=255)
    Rejected(u8),
}

impl DaoAckStatus {
    /// Classify a raw status byte; every value is meaningful
    pub const fn from_raw(raw: u8) -> Self {
        match raw {
            0 => DaoAckStatus::Accepted,
            1..=127 => DaoAckStatus::Tentative(raw),
            _ => DaoAckStatus::Rejected(raw),
        }
    }

    /// Raw status byte
    pub const fn raw(self) -> u8 {
        match self {
            DaoAckStatus::Accepted => 0,
            DaoAckStatus::Tentative(raw) | DaoAckStatus::Rejected(raw) => raw,
        }
    }

    /// Whether the DAO was accepted without qualification
    pub const fn is_accepted(self) -> bool {
        matches!(self, DaoAckStatus::Accepted)
    }

    /// Whether the DAO was rejected
    pub const fn is_rejected(self) -> bool {
        matches!(self, DaoAckStatus::Rejected(_))
    }
}

/// Destination Advertisement Object acknowledgment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DaoAck {
    /// RPL instance the DODAG belongs to
    pub instance_id: InstanceId,
    /// Sequence echoed from the acknowledged DAO
    pub sequence: SequenceNumber,
    /// Completion status
    pub status: DaoAckStatus,
    /// DODAG identifier, mandatory for local instance ids
    pub dodag_id: Option<DodagId>,
}

impl DaoAck {
    /// Create a DAO-ACK, enforcing that local instance ids name their DODAG
    pub fn new(
        instance_id: InstanceId,
        sequence: SequenceNumber,
        status: DaoAckStatus,
        dodag_id: Option<DodagId>,
    ) -> Result<Self, MessageError> {
        if instance_id.is_local() && dodag_id.is_none() {
            return Err(MessageError::MissingDodagId);
        }
        Ok(Self {
            instance_id,
            sequence,
            status,
            dodag_id,
        })
    }

    /// Flag byte derived from the message shape
    pub fn flags(&self) -> DaoAckFlags {
        if self.dodag_id.is_some() {
            DaoAckFlags::DODAG_ID_PRESENT
        } else {
            DaoAckFlags::empty()
        }
    }
}

/// DODAG Information Solicitation: asks neighbors for DIO messages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Dis {
    /// Reserved flag byte, zero on send and ignored on receive
    pub flags: u8,
    /// Reserved byte, zero on send and ignored on receive
    pub reserved: u8,
    /// Attached options
    pub options: Vec<RplOption>,
}

impl Dis {
    /// Create a DIS with no options
    pub fn new() -> Self {
        Self::default()
    }
}

/// Consistency Check: verifies secure message counters and carries
/// challenge-responses. Only ever sent as a secured message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsistencyCheck {
    /// RPL instance the DODAG belongs to
    pub instance_id: InstanceId,
    /// Whether this is a response (otherwise a request)
    pub is_response: bool,
    /// Nonce correlating a response with its request
    pub nonce: u16,
    /// DODAG identifier
    pub dodag_id: DodagId,
    /// Sender's estimate of the destination's security counter, 0 for none
    pub destination_counter: u32,
    /// Attached options
    pub options: Vec<RplOption>,
}

/// Control message base, one variant per message kind
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ControlMessageBody {
    /// DODAG Information Solicitation
    Dis(Dis),
    /// DODAG Information Object
    Dio(Dio),
    /// Destination Advertisement Object
    Dao(Dao),
    /// Destination Advertisement Object acknowledgment
    DaoAck(DaoAck),
    /// Consistency Check
    ConsistencyCheck(ConsistencyCheck),
}

/// A complete control message: a body plus an optional security section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControlMessage {
    /// Message base
    pub body: ControlMessageBody,
    /// Security section, present on secured messages
    pub security: Option<SecuritySection>,
}

impl ControlMessage {
    /// Create an unsecured control message.
    ///
    /// Consistency Check bodies are rejected here: they must be secured.
    pub fn new(body: ControlMessageBody) -> Result<Self, MessageError> {
        if matches!(body, ControlMessageBody::ConsistencyCheck(_)) {
            return Err(MessageError::UnsecuredConsistencyCheck);
        }
        Ok(Self {
            body,
            security: None,
        })
    }

    /// Create a secured control message
    pub fn secured(body: ControlMessageBody, security: SecuritySection) -> Self {
        Self {
            body,
            security: Some(security),
        }
    }

    /// Message type code derived from the body and security presence
    pub fn message_type(&self) -> ControlMessageType {
        let secure = self.security.is_some();
        match self.body {
            ControlMessageBody::Dis(_) if secure => {
                ControlMessageType::SecureDodagInformationSolicitation
            }
            ControlMessageBody::Dis(_) => ControlMessageType::DodagInformationSolicitation,
            ControlMessageBody::Dio(_) if secure => {
                ControlMessageType::SecureDodagInformationObject
            }
            ControlMessageBody::Dio(_) => ControlMessageType::DodagInformationObject,
            ControlMessageBody::Dao(_) if secure => {
                ControlMessageType::SecureDestinationAdvertisement
            }
            ControlMessageBody::Dao(_) => ControlMessageType::DestinationAdvertisement,
            ControlMessageBody::DaoAck(_) if secure => {
                ControlMessageType::SecureDestinationAdvertisementAck
            }
            ControlMessageBody::DaoAck(_) => ControlMessageType::DestinationAdvertisementAck,
            ControlMessageBody::ConsistencyCheck(_) => ControlMessageType::ConsistencyCheck,
        }
    }
}
