//! Control-message data model error types.

use thiserror::Error;

/// Control-message data model errors
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageError {
    /// Unknown control message type code
    #[error("unknown message type {0:#04x}")]
    MessageType(u8),

    /// Unknown option type code
    #[error("unknown option type {0:#04x}")]
    OptionType(u8),

    /// Reserved mode of operation value
    #[error("reserved mode of operation {0}")]
    ModeOfOperation(u8),

    /// Instance id outside the valid range for its scope
    #[error("instance id {0} out of range")]
    InstanceId(u8),

    /// A local instance id was used without a DODAGID
    #[error("local instance id requires a DODAGID")]
    MissingDodagId,

    /// PadN total padding outside 2..=7 octets
    #[error("padding length {0} outside 2..=7")]
    Padding(u8),

    /// Prefix length beyond 128 bits
    #[error("prefix length {0} exceeds 128")]
    PrefixLength(u8),

    /// Unknown security algorithm
    #[error("unknown security algorithm {0}")]
    Algorithm(u8),

    /// Unknown key identifier mode
    #[error("unknown key identifier mode {0}")]
    KeyIdentifierMode(u8),

    /// Unknown security level value
    #[error("unknown security level {0}")]
    SecurityLevel(u8),

    /// Security level does not belong to the key identifier mode
    #[error("security level does not match key identifier mode")]
    LevelModeMismatch,

    /// Consistency check messages must carry a security section
    #[error("consistency check must be secured")]
    UnsecuredConsistencyCheck,
}
