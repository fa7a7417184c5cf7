//! Lollipop sequence-counter arithmetic for RPL control planes.
//!
//! This crate implements the 8-bit "lollipop" counters RPL uses to order
//! DODAG Version Numbers, DTSNs, and DAO sequence numbers across nodes
//! that share no clock and only ever observe wrapped values.
//!
//! ## Counter shape
//!
//! ```text
//!            0 ──────────────▶ 127          sequential region ("stick")
//!            ▲                  │            linear order, used after reset
//!            │                  ▼
//!          reset       128 ──▶ ... ──▶ 255   circular region ("loop")
//!                       ▲───────────────┘    bounded circular distance
//! ```
//!
//! Two observed values are ordered with [`SequenceNumber::compare`], which
//! returns [`SequenceOrdering::Incomparable`] when the values are too far
//! apart to order safely. `Incomparable` is a first-class outcome, not an
//! error: callers decide whether to discard the value or trigger a full
//! resynchronization.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod counter;

pub use counter::{
    ComparisonWindow, Region, SequenceError, SequenceNumber, SequenceOrdering,
    DEFAULT_SEQUENCE_WINDOW, INITIAL_SEQUENCE, SEQUENTIAL_REGION_MAX,
};
