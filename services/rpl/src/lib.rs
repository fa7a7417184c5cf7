//! RPL control-plane primitives for low-power, lossy mesh networks.
//!
//! The `rpl-sequence` crate carries the lollipop counter arithmetic, the
//! `rpl-wire` crate the typed control-message data model, and the
//! `rpl-dodag` crate the counter-of-record state that turns received
//! values into recency decisions. This umbrella crate re-exports them and
//! adds the node configuration boundary.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;

pub use config::RplConfig;
pub use rpl_dodag as dodag;
pub use rpl_sequence as sequence;
pub use rpl_wire as wire;
