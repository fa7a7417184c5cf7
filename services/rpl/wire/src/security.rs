//! Security section of secured control messages, modeled as data only.
//!
//! Cryptographic processing is out of scope; this module carries the
//! fields a security implementation would consume, with the key
//! identifier union expressed as a tagged enum keyed by the Key
//! Identifier Mode.

use crate::MessageError;
use serde::{Deserialize, Serialize};

/// Mask for the Key Identifier Mode bits of the KIM/LVL byte
pub const KIM_MASK: u8 = 0xE0;
/// Shift for the Key Identifier Mode bits
pub const KIM_SHIFT: u8 = 5;
/// Mask for the Security Level bits of the KIM/LVL byte
pub const LVL_MASK: u8 = 0x07;

const COUNTER_IS_TIME_FLAG: u8 = 0x80;

/// Encryption, MAC, and signature scheme for the network
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SecurityAlgorithm {
    /// CCM with AES-128 for encryption, RSA with SHA-256 for signatures
    CcmAes128RsaSha256 = 0,
}

impl TryFrom<u8> for SecurityAlgorithm {
    type Error = MessageError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(SecurityAlgorithm::CcmAes128RsaSha256),
            _ => Err(MessageError::Algorithm(value)),
        }
    }
}

/// Key Identifier Mode: how the protecting key is determined
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum KeyIdentifierMode {
    /// Group key selected by key index
    GroupKey = 0x00,
    /// Per-pair key determined by source and destination
    PerPairKey = 0x01,
    /// Group key selected by key source and key index
    GroupKeyWithSource = 0x02,
    /// Node signature key, optionally identified by source and index
    NodeSignatureKey = 0x03,
}

impl TryFrom<u8> for KeyIdentifierMode {
    type Error = MessageError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0x00 => Ok(KeyIdentifierMode::GroupKey),
            0x01 => Ok(KeyIdentifierMode::PerPairKey),
            0x02 => Ok(KeyIdentifierMode::GroupKeyWithSource),
            0x03 => Ok(KeyIdentifierMode::NodeSignatureKey),
            _ => Err(MessageError::KeyIdentifierMode(value)),
        }
    }
}

/// Key identifier payload, one variant per Key Identifier Mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum KeyIdentifier {
    /// Mode 0: group key, key source absent
    GroupKey {
        /// Index distinguishing keys from the same originator
        key_index: u8,
    },
    /// Mode 1: key implied by source and destination, no identifier fields
    PerPairKey,
    /// Mode 2: group key with an explicit originator
    GroupKeyWithSource {
        /// Logical identifier of the group key originator
        key_source: u8,
        /// Index distinguishing keys from the same originator
        key_index: u8,
    },
    /// Mode 3: node signature key; packets may omit both fields
    NodeSignatureKey {
        /// Logical identifier of the group key originator
        key_source: Option<u8>,
        /// Index distinguishing keys from the same originator
        key_index: Option<u8>,
    },
}

impl KeyIdentifier {
    /// Key Identifier Mode implied by this variant
    pub const fn mode(&self) -> KeyIdentifierMode {
        match self {
            KeyIdentifier::GroupKey { .. } => KeyIdentifierMode::GroupKey,
            KeyIdentifier::PerPairKey => KeyIdentifierMode::PerPairKey,
            KeyIdentifier::GroupKeyWithSource { .. } => KeyIdentifierMode::GroupKeyWithSource,
            KeyIdentifier::NodeSignatureKey { .. } => KeyIdentifierMode::NodeSignatureKey,
        }
    }
}

/// Packet protection level.
///
/// Levels 0..=3 name MAC widths for key identifier modes 0..=2 and
/// signature schemes for mode 3; the two families share raw values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SecurityLevel {
    /// MAC-32 (length 4)
    Mac32,
    /// ENC-MAC-32 (length 4)
    EncMac32,
    /// MAC-64 (length 8)
    Mac64,
    /// ENC-MAC-64 (length 8)
    EncMac64,
    /// Sign-3072 (signature length 384)
    Sign3072,
    /// ENC-Sign-3072 (signature length 384)
    EncSign3072,
    /// Sign-2048 (signature length 256)
    Sign2048,
    /// ENC-Sign-2048 (signature length 256)
    EncSign2048,
}

impl SecurityLevel {
    /// Decode a raw level value in the namespace of the given mode
    pub fn from_raw(mode: KeyIdentifierMode, raw: u8) -> Result<Self, MessageError> {
        let level = match (mode, raw) {
            (KeyIdentifierMode::NodeSignatureKey, 0) => SecurityLevel::Sign3072,
            (KeyIdentifierMode::NodeSignatureKey, 1) => SecurityLevel::EncSign3072,
            (KeyIdentifierMode::NodeSignatureKey, 2) => SecurityLevel::Sign2048,
            (KeyIdentifierMode::NodeSignatureKey, 3) => SecurityLevel::EncSign2048,
            (_, 0) => SecurityLevel::Mac32,
            (_, 1) => SecurityLevel::EncMac32,
            (_, 2) => SecurityLevel::Mac64,
            (_, 3) => SecurityLevel::EncMac64,
            _ => return Err(MessageError::SecurityLevel(raw)),
        };
        Ok(level)
    }

    /// Raw level value within its mode's namespace
    pub const fn raw(self) -> u8 {
        match self {
            SecurityLevel::Mac32 | SecurityLevel::Sign3072 => 0,
            SecurityLevel::EncMac32 | SecurityLevel::EncSign3072 => 1,
            SecurityLevel::Mac64 | SecurityLevel::Sign2048 => 2,
            SecurityLevel::EncMac64 | SecurityLevel::EncSign2048 => 3,
        }
    }

    /// Whether this level belongs to the signature family (mode 3)
    pub const fn is_signature(self) -> bool {
        matches!(
            self,
            SecurityLevel::Sign3072
                | SecurityLevel::EncSign3072
                | SecurityLevel::Sign2048
                | SecurityLevel::EncSign2048
        )
    }
}

/// Security section carried by secured control messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecuritySection {
    /// Whether the counter field is a timestamp rather than an increment
    pub counter_is_time: bool,
    /// Protection scheme for the network
    pub algorithm: SecurityAlgorithm,
    /// Packet protection level
    pub level: SecurityLevel,
    /// Reserved flag byte, zero on send and ignored on receive
    pub flags: u8,
    /// Non-repeating counter feeding the cryptographic construction
    pub counter: u32,
    /// Key identification, shaped by the Key Identifier Mode
    pub key_identifier: KeyIdentifier,
}

impl SecuritySection {
    /// Create a security section, rejecting levels outside the key
    /// identifier mode's namespace
    pub fn new(
        algorithm: SecurityAlgorithm,
        key_identifier: KeyIdentifier,
        level: SecurityLevel,
        counter: u32,
    ) -> Result<Self, MessageError> {
        let signature_mode = key_identifier.mode() == KeyIdentifierMode::NodeSignatureKey;
        if level.is_signature() != signature_mode {
            return Err(MessageError::LevelModeMismatch);
        }
        Ok(Self {
            counter_is_time: false,
            algorithm,
            level,
            flags: 0,
            counter,
            key_identifier,
        })
    }

    /// Pack the Key Identifier Mode and Security Level into their shared byte
    pub fn kim_and_level(&self) -> u8 {
        ((self.key_identifier.mode() as u8) << KIM_SHIFT) | (self.level.raw() & LVL_MASK)
    }

    /// Split a KIM/LVL byte into its typed components
    pub fn split_kim_and_level(byte: u8) -> Result<(KeyIdentifierMode, SecurityLevel), MessageError> {
        let mode = KeyIdentifierMode::try_from((byte & KIM_MASK) >> KIM_SHIFT)?;
        let level = SecurityLevel::from_raw(mode, byte & LVL_MASK)?;
        Ok((mode, level))
    }

    /// Counter flag byte (timestamp indicator in the top bit)
    pub fn counter_flags(&self) -> u8 {
        if self.counter_is_time {
            COUNTER_IS_TIME_FLAG
        } else {
            0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_algorithm_conversion() {
        assert_eq!(
            SecurityAlgorithm::try_from(0).unwrap(),
            SecurityAlgorithm::CcmAes128RsaSha256
        );
        assert_eq!(
            SecurityAlgorithm::try_from(1),
            Err(MessageError::Algorithm(1))
        );
    }

    #[test]
    fn test_key_identifier_modes() {
        assert_eq!(
            KeyIdentifier::GroupKey { key_index: 0 }.mode(),
            KeyIdentifierMode::GroupKey
        );
        assert_eq!(KeyIdentifier::PerPairKey.mode(), KeyIdentifierMode::PerPairKey);
        assert_eq!(
            KeyIdentifier::NodeSignatureKey {
                key_source: None,
                key_index: None
            }
            .mode(),
            KeyIdentifierMode::NodeSignatureKey
        );
    }

    #[test]
    fn test_level_namespaces() {
        assert_eq!(
            SecurityLevel::from_raw(KeyIdentifierMode::GroupKey, 2).unwrap(),
            SecurityLevel::Mac64
        );
        assert_eq!(
            SecurityLevel::from_raw(KeyIdentifierMode::NodeSignatureKey, 2).unwrap(),
            SecurityLevel::Sign2048
        );
        assert!(SecurityLevel::from_raw(KeyIdentifierMode::GroupKey, 4).is_err());
        assert_eq!(SecurityLevel::Mac64.raw(), SecurityLevel::Sign2048.raw());
    }

    #[test]
    fn test_level_mode_mismatch() {
        assert_eq!(
            SecuritySection::new(
                SecurityAlgorithm::CcmAes128RsaSha256,
                KeyIdentifier::GroupKey { key_index: 1 },
                SecurityLevel::Sign3072,
                0,
            ),
            Err(MessageError::LevelModeMismatch)
        );
        assert!(SecuritySection::new(
            SecurityAlgorithm::CcmAes128RsaSha256,
            KeyIdentifier::NodeSignatureKey {
                key_source: Some(2),
                key_index: Some(1)
            },
            SecurityLevel::EncSign3072,
            0,
        )
        .is_ok());
    }

    #[test]
    fn test_kim_and_level_pack_split() {
        let section = SecuritySection::new(
            SecurityAlgorithm::CcmAes128RsaSha256,
            KeyIdentifier::GroupKeyWithSource {
                key_source: 4,
                key_index: 2,
            },
            SecurityLevel::EncMac64,
            99,
        )
        .unwrap();

        let byte = section.kim_and_level();
        assert_eq!(byte, (0x02 << 5) | 0x03);

        let (mode, level) = SecuritySection::split_kim_and_level(byte).unwrap();
        assert_eq!(mode, KeyIdentifierMode::GroupKeyWithSource);
        assert_eq!(level, SecurityLevel::EncMac64);
    }

    #[test]
    fn test_counter_flags() {
        let mut section = SecuritySection::new(
            SecurityAlgorithm::CcmAes128RsaSha256,
            KeyIdentifier::PerPairKey,
            SecurityLevel::Mac32,
            7,
        )
        .unwrap();
        assert_eq!(section.counter_flags(), 0);

        section.counter_is_time = true;
        assert_eq!(section.counter_flags(), 0x80);
    }
}
