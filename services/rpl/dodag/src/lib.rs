//! DODAG version, DTSN, and DAO-sequence counter ownership.
//!
//! This crate holds the counters of record for one RPL instance and turns
//! received counter values into recency decisions using the lollipop
//! arithmetic in `rpl-sequence`. It stops where DODAG maintenance begins:
//! no parent sets, no routing tables, no timers — callers receive
//! decisions (including the deliberate "no safe ordering" outcome) and
//! apply their own policy.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod instance;
pub mod version;

pub use instance::RplInstance;
pub use version::{DioAssessment, DodagError, IgnoreReason, InstanceStats, VersionDecision};
