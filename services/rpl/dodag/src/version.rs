//! Version observation decisions and instance statistics.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// DODAG counter-state errors
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DodagError {
    /// Version increments are reserved to the DODAG root
    #[error("only the DODAG root may advance the version number")]
    NotRoot,
}

/// Reason a received version carried no new information
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IgnoreReason {
    /// Older than the version of record
    Stale,
    /// Identical to the version of record
    Duplicate,
}

impl fmt::Display for IgnoreReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IgnoreReason::Stale => write!(f, "stale"),
            IgnoreReason::Duplicate => write!(f, "duplicate"),
        }
    }
}

/// Outcome of checking a received DODAG Version Number against the record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VersionDecision {
    /// The received version is newer; the record advanced to it
    Adopt,
    /// The received version carries no new information
    Ignore(IgnoreReason),
    /// No safe ordering exists within the window; policy stays with the
    /// caller (discard, or trigger a full resynchronization)
    Unorderable,
}

impl VersionDecision {
    /// Whether the record advanced
    pub const fn adopted(self) -> bool {
        matches!(self, VersionDecision::Adopt)
    }
}

/// What a received DIO calls for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DioAssessment {
    /// Decision on the advertised DODAG version
    pub version: VersionDecision,
    /// The sender advanced its DTSN; downward routes want refreshing
    pub dtsn_refresh: bool,
}

/// Counter decision statistics for one instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct InstanceStats {
    /// Received versions adopted as the new record
    pub versions_adopted: u64,
    /// Received versions ignored as stale or duplicate
    pub versions_ignored: u64,
    /// Received versions with no safe ordering
    pub versions_unorderable: u64,
    /// DAO sequence numbers issued
    pub dao_sequences_issued: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ignore_reason_display() {
        assert_eq!(IgnoreReason::Stale.to_string(), "stale");
        assert_eq!(IgnoreReason::Duplicate.to_string(), "duplicate");
    }

    #[test]
    fn test_decision_adopted() {
        assert!(VersionDecision::Adopt.adopted());
        assert!(!VersionDecision::Ignore(IgnoreReason::Stale).adopted());
        assert!(!VersionDecision::Unorderable.adopted());
    }
}
