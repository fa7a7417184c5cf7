//! Control-message options as tagged variants.

use crate::message::{DodagId, InstanceId};
use crate::MessageError;
use rpl_sequence::SequenceNumber;
use serde::{Deserialize, Serialize};

/// Default Path Control Size used when a DODAG Configuration omits it.
pub const DEFAULT_PATH_CONTROL_SIZE: u8 = 0;
/// Default DIO Interval Doublings (trickle Imax exponent).
pub const DEFAULT_DIO_INTERVAL_DOUBLINGS: u8 = 20;
/// Default DIO Interval Minimum (trickle Imin exponent).
pub const DEFAULT_DIO_INTERVAL_MIN: u8 = 3;
/// Default DIO Redundancy Constant (trickle k).
pub const DEFAULT_DIO_REDUNDANCY_CONSTANT: u8 = 10;
/// Default MinHopRankIncrease.
pub const DEFAULT_MIN_HOP_RANK_INCREASE: u16 = 256;

const MAX_PREFIX_LENGTH: u8 = 128;

const ROUTE_INFO_PREFERENCE_MASK: u8 = 0x1F;
const ROUTE_INFO_PREFERENCE_SHIFT: u8 = 3;

const DODAG_CONFIG_AUTHENTICATION_FLAG: u8 = 0x08;
const DODAG_CONFIG_PATH_CONTROL_MASK: u8 = 0x07;

const SOLICITED_FLAG_VERSION: u8 = 0x80;
const SOLICITED_FLAG_INSTANCE: u8 = 0x40;
const SOLICITED_FLAG_DODAG_ID: u8 = 0x20;

/// Option type codes
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OptionType {
    /// Single octet of padding
    Pad1 = 0x00,
    /// Two to seven octets of padding
    PadN = 0x01,
    /// DAG Metric Container
    DagMetricContainer = 0x02,
    /// Route Information
    RouteInformation = 0x03,
    /// DODAG Configuration
    DodagConfiguration = 0x04,
    /// RPL Target
    RplTarget = 0x05,
    /// Transit Information
    TransitInformation = 0x06,
    /// Solicited Information
    SolicitedInformation = 0x07,
}

impl TryFrom<u8> for OptionType {
    type Error = MessageError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0x00 => Ok(OptionType::Pad1),
            0x01 => Ok(OptionType::PadN),
            0x02 => Ok(OptionType::DagMetricContainer),
            0x03 => Ok(OptionType::RouteInformation),
            0x04 => Ok(OptionType::DodagConfiguration),
            0x05 => Ok(OptionType::RplTarget),
            0x06 => Ok(OptionType::TransitInformation),
            0x07 => Ok(OptionType::SolicitedInformation),
            _ => Err(MessageError::OptionType(value)),
        }
    }
}

/// Route Information: connectivity to a prefix reachable via the root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteInformation {
    /// Number of valid leading prefix bits (0..=128)
    pub prefix_length: u8,
    /// Raw flag byte carrying the route preference
    pub flags: u8,
    /// Seconds the prefix stays valid for route determination
    pub route_lifetime: u32,
    /// Prefix bytes
    pub prefix: Vec<u8>,
}

impl RouteInformation {
    /// Create a route information option
    pub fn new(prefix_length: u8, route_lifetime: u32, prefix: Vec<u8>) -> Result<Self, MessageError> {
        if prefix_length > MAX_PREFIX_LENGTH {
            return Err(MessageError::PrefixLength(prefix_length));
        }
        Ok(Self {
            prefix_length,
            flags: 0,
            route_lifetime,
            prefix,
        })
    }

    /// Route preference extracted from the flag byte
    pub fn preference(&self) -> u8 {
        (self.flags & ROUTE_INFO_PREFERENCE_MASK) >> ROUTE_INFO_PREFERENCE_SHIFT
    }
}

/// DODAG Configuration: static operating parameters distributed root-down.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DodagConfiguration {
    /// Whether a node must authenticate before joining as a router
    pub authentication_enabled: bool,
    /// Path Control Size (0..=7)
    pub path_control_size: u8,
    /// Trickle Imax exponent for the DIO timer
    pub dio_interval_doublings: u8,
    /// Trickle Imin exponent for the DIO timer
    pub dio_interval_min: u8,
    /// Trickle redundancy constant for the DIO timer
    pub dio_redundancy_constant: u8,
    /// DAGMaxRankIncrease, 0 to disable
    pub max_rank_increase: u16,
    /// MinHopRankIncrease
    pub min_hop_rank_increase: u16,
    /// Objective Function code point
    pub objective_code_point: u16,
    /// Default route lifetime, in lifetime units
    pub default_lifetime: u8,
    /// Seconds per lifetime unit
    pub lifetime_unit: u16,
}

impl DodagConfiguration {
    /// Flag byte derived from the authentication and path control fields
    pub fn flags(&self) -> u8 {
        let mut byte = self.path_control_size & DODAG_CONFIG_PATH_CONTROL_MASK;
        if self.authentication_enabled {
            byte |= DODAG_CONFIG_AUTHENTICATION_FLAG;
        }
        byte
    }
}

impl Default for DodagConfiguration {
    fn default() -> Self {
        Self {
            authentication_enabled: false,
            path_control_size: DEFAULT_PATH_CONTROL_SIZE,
            dio_interval_doublings: DEFAULT_DIO_INTERVAL_DOUBLINGS,
            dio_interval_min: DEFAULT_DIO_INTERVAL_MIN,
            dio_redundancy_constant: DEFAULT_DIO_REDUNDANCY_CONSTANT,
            max_rank_increase: 0,
            min_hop_rank_increase: DEFAULT_MIN_HOP_RANK_INCREASE,
            objective_code_point: 0,
            default_lifetime: 30,
            lifetime_unit: 60,
        }
    }
}

/// RPL Target: an address, prefix, or multicast group reachable downward.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RplTarget {
    /// Reserved flag byte
    pub flags: u8,
    /// Number of valid leading prefix bits (0..=128)
    pub prefix_length: u8,
    /// Target address, prefix, or multicast group bytes
    pub prefix: Vec<u8>,
}

impl RplTarget {
    /// Create a target option
    pub fn new(prefix_length: u8, prefix: Vec<u8>) -> Result<Self, MessageError> {
        if prefix_length > MAX_PREFIX_LENGTH {
            return Err(MessageError::PrefixLength(prefix_length));
        }
        Ok(Self {
            flags: 0,
            prefix_length,
            prefix,
        })
    }
}

/// Transit Information: path attributes for the targets preceding it in a DAO.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitInformation {
    /// Whether the path was learned from an external source
    pub external: bool,
    /// Path Control bits ordering parent preference
    pub path_control: u8,
    /// Sequence incremented for each new DAO of the target set
    pub path_sequence: SequenceNumber,
    /// Path lifetime in lifetime units, 0 for a no-path
    pub path_lifetime: u8,
    /// Parent address, used in non-storing mode
    pub parent_address: Option<[u8; 16]>,
}

/// Solicited Information: predicates a DIS applies to responding DIOs.
///
/// Each predicate is present iff its field is set; absent predicates
/// match every DODAG.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct SolicitedInformation {
    /// Restrict responses to this instance
    pub instance_id: Option<InstanceId>,
    /// Restrict responses to this DODAG
    pub dodag_id: Option<DodagId>,
    /// Restrict responses to this DODAG version
    pub version: Option<SequenceNumber>,
}

impl SolicitedInformation {
    /// Predicate flag byte derived from which fields are present
    pub fn flags(&self) -> u8 {
        let mut byte = 0;
        if self.version.is_some() {
            byte |= SOLICITED_FLAG_VERSION;
        }
        if self.instance_id.is_some() {
            byte |= SOLICITED_FLAG_INSTANCE;
        }
        if self.dodag_id.is_some() {
            byte |= SOLICITED_FLAG_DODAG_ID;
        }
        byte
    }
}

/// A control-message option: a type tag plus its per-variant payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RplOption {
    /// Single octet of padding for option alignment
    Pad1,
    /// 2..=7 octets of padding for option alignment
    PadN {
        /// Total padding octets including type and length fields
        total_length: u8,
    },
    /// Node, link, and path metrics along the DODAG
    DagMetricContainer {
        /// Raw metric data as chosen by the implementer
        metric_data: Vec<u8>,
    },
    /// Connectivity to a prefix available from the root
    RouteInformation(RouteInformation),
    /// DODAG operating parameters
    DodagConfiguration(DodagConfiguration),
    /// Reachable target advertisement
    RplTarget(RplTarget),
    /// Path attributes for preceding targets
    TransitInformation(TransitInformation),
    /// DIS response predicates
    SolicitedInformation(SolicitedInformation),
}

impl RplOption {
    /// Create a PadN option; total padding must be 2..=7 octets
    pub fn pad_n(total_length: u8) -> Result<Self, MessageError> {
        if !(2..=7).contains(&total_length) {
            return Err(MessageError::Padding(total_length));
        }
        Ok(RplOption::PadN { total_length })
    }

    /// Type code of this option
    pub fn option_type(&self) -> OptionType {
        match self {
            RplOption::Pad1 => OptionType::Pad1,
            RplOption::PadN { .. } => OptionType::PadN,
            RplOption::DagMetricContainer { .. } => OptionType::DagMetricContainer,
            RplOption::RouteInformation(_) => OptionType::RouteInformation,
            RplOption::DodagConfiguration(_) => OptionType::DodagConfiguration,
            RplOption::RplTarget(_) => OptionType::RplTarget,
            RplOption::TransitInformation(_) => OptionType::TransitInformation,
            RplOption::SolicitedInformation(_) => OptionType::SolicitedInformation,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_option_type_conversion() {
        assert_eq!(OptionType::try_from(0x00).unwrap(), OptionType::Pad1);
        assert_eq!(
            OptionType::try_from(0x07).unwrap(),
            OptionType::SolicitedInformation
        );
        assert!(OptionType::try_from(0x08).is_err());
    }

    #[test]
    fn test_pad_n_validation() {
        assert!(RplOption::pad_n(2).is_ok());
        assert!(RplOption::pad_n(7).is_ok());
        assert_eq!(RplOption::pad_n(1), Err(MessageError::Padding(1)));
        assert_eq!(RplOption::pad_n(8), Err(MessageError::Padding(8)));
    }

    #[test]
    fn test_prefix_length_validation() {
        assert!(RouteInformation::new(64, 3600, vec![0x20, 0x01]).is_ok());
        assert_eq!(
            RouteInformation::new(129, 3600, Vec::new()),
            Err(MessageError::PrefixLength(129))
        );
        assert_eq!(
            RplTarget::new(200, Vec::new()),
            Err(MessageError::PrefixLength(200))
        );
    }

    #[test]
    fn test_route_preference_extraction() {
        let mut info = RouteInformation::new(64, 3600, Vec::new()).unwrap();
        info.flags = 0x18;
        assert_eq!(info.preference(), 3);
    }

    #[test]
    fn test_dodag_configuration_defaults() {
        let config = DodagConfiguration::default();
        assert_eq!(config.dio_interval_min, DEFAULT_DIO_INTERVAL_MIN);
        assert_eq!(config.dio_interval_doublings, DEFAULT_DIO_INTERVAL_DOUBLINGS);
        assert_eq!(config.dio_redundancy_constant, DEFAULT_DIO_REDUNDANCY_CONSTANT);
        assert_eq!(config.min_hop_rank_increase, DEFAULT_MIN_HOP_RANK_INCREASE);
        assert_eq!(config.max_rank_increase, 0);
        assert!(!config.authentication_enabled);
        assert_eq!(config.flags(), 0);
    }

    #[test]
    fn test_dodag_configuration_flags() {
        let config = DodagConfiguration {
            authentication_enabled: true,
            path_control_size: 5,
            ..DodagConfiguration::default()
        };
        assert_eq!(config.flags(), 0x08 | 0x05);
    }

    #[test]
    fn test_solicited_information_flags() {
        let mut solicited = SolicitedInformation::default();
        assert_eq!(solicited.flags(), 0);

        solicited.version = Some(SequenceNumber::new(7));
        solicited.dodag_id = Some(DodagId::new([0; 16]));
        assert_eq!(solicited.flags(), 0x80 | 0x20);

        solicited.instance_id = Some(InstanceId::global(1).unwrap());
        assert_eq!(solicited.flags(), 0x80 | 0x40 | 0x20);
    }

    #[test]
    fn test_option_type_tags() {
        assert_eq!(RplOption::Pad1.option_type(), OptionType::Pad1);
        assert_eq!(
            RplOption::pad_n(4).unwrap().option_type(),
            OptionType::PadN
        );
        let config = RplOption::DodagConfiguration(DodagConfiguration::default());
        assert_eq!(config.option_type(), OptionType::DodagConfiguration);
    }
}
