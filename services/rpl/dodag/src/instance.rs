//! Owning protocol-instance state for the counters of record.

use crate::version::{DioAssessment, DodagError, IgnoreReason, InstanceStats, VersionDecision};
use rpl_sequence::{ComparisonWindow, SequenceNumber, SequenceOrdering};
use rpl_wire::{Dao, DaoAck, Dio, DodagId, InstanceId, MessageError};
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

/// Counter-of-record state for one RPL instance.
///
/// The instance is the single writer of its own counters; any number of
/// concurrent readers may compare received values against them. The
/// comparison window is fixed at construction.
#[derive(Debug)]
pub struct RplInstance {
    /// Instance identifier
    instance_id: InstanceId,
    /// Whether this node is the DODAG root
    is_root: bool,
    /// Comparison window, fixed at startup
    window: ComparisonWindow,
    /// DODAG Version Number of record
    version: RwLock<SequenceNumber>,
    /// This node's DTSN
    dtsn: RwLock<SequenceNumber>,
    /// Last issued DAO sequence
    dao_sequence: RwLock<SequenceNumber>,
    /// Last DTSN heard from the upward peer
    peer_dtsn: RwLock<Option<SequenceNumber>>,
    /// Counters for statistics
    adopted_counter: AtomicU64,
    ignored_counter: AtomicU64,
    unorderable_counter: AtomicU64,
    dao_issued_counter: AtomicU64,
}

impl RplInstance {
    /// Create an instance with all counters at the initial value
    pub fn new(instance_id: InstanceId, is_root: bool, window: ComparisonWindow) -> Self {
        Self::with_initial(instance_id, is_root, window, SequenceNumber::INITIAL)
    }

    /// Create an instance with counters starting from `initial`
    pub fn with_initial(
        instance_id: InstanceId,
        is_root: bool,
        window: ComparisonWindow,
        initial: SequenceNumber,
    ) -> Self {
        Self {
            instance_id,
            is_root,
            window,
            version: RwLock::new(initial),
            dtsn: RwLock::new(initial),
            dao_sequence: RwLock::new(initial),
            peer_dtsn: RwLock::new(None),
            adopted_counter: AtomicU64::new(0),
            ignored_counter: AtomicU64::new(0),
            unorderable_counter: AtomicU64::new(0),
            dao_issued_counter: AtomicU64::new(0),
        }
    }

    /// Instance identifier
    pub fn instance_id(&self) -> InstanceId {
        self.instance_id
    }

    /// Whether this node is the DODAG root
    pub fn is_root(&self) -> bool {
        self.is_root
    }

    /// Comparison window in effect
    pub fn window(&self) -> ComparisonWindow {
        self.window
    }

    /// Current DODAG Version Number of record
    pub async fn version(&self) -> SequenceNumber {
        *self.version.read().await
    }

    /// Current DTSN of this node
    pub async fn dtsn(&self) -> SequenceNumber {
        *self.dtsn.read().await
    }

    /// Advance the DODAG version to start a new iteration.
    ///
    /// Reserved to the root; every other node only ever adopts versions it
    /// hears.
    pub async fn advance_version(&self) -> Result<SequenceNumber, DodagError> {
        if !self.is_root {
            warn!(
                "instance {}: version advance refused, node is not the root",
                self.instance_id
            );
            return Err(DodagError::NotRoot);
        }

        let mut version = self.version.write().await;
        *version = version.increment();
        info!(
            "instance {}: DODAG version advanced to {}",
            self.instance_id, *version
        );
        Ok(*version)
    }

    /// Check a received DODAG Version Number against the record.
    ///
    /// A newer version replaces the record. An unorderable one leaves the
    /// record untouched and is reported to the caller undecided.
    pub async fn observe_version(&self, received: SequenceNumber) -> VersionDecision {
        let mut current = self.version.write().await;

        match received.compare(*current, self.window) {
            SequenceOrdering::Greater => {
                info!(
                    "instance {}: adopting DODAG version {} (was {})",
                    self.instance_id, received, *current
                );
                *current = received;
                self.adopted_counter.fetch_add(1, Ordering::Relaxed);
                VersionDecision::Adopt
            }
            SequenceOrdering::Equal => {
                debug!(
                    "instance {}: ignoring duplicate version {}",
                    self.instance_id, received
                );
                self.ignored_counter.fetch_add(1, Ordering::Relaxed);
                VersionDecision::Ignore(IgnoreReason::Duplicate)
            }
            SequenceOrdering::Lesser => {
                debug!(
                    "instance {}: ignoring stale version {} (current {})",
                    self.instance_id, received, *current
                );
                self.ignored_counter.fetch_add(1, Ordering::Relaxed);
                VersionDecision::Ignore(IgnoreReason::Stale)
            }
            SequenceOrdering::Incomparable => {
                warn!(
                    "instance {}: version {} not orderable against {} within window {}",
                    self.instance_id,
                    received,
                    *current,
                    self.window.get()
                );
                self.unorderable_counter.fetch_add(1, Ordering::Relaxed);
                VersionDecision::Unorderable
            }
        }
    }

    /// Assess a received DIO: version decision plus DTSN refresh trigger.
    pub async fn assess_dio(&self, dio: &Dio) -> DioAssessment {
        let version = self.observe_version(dio.version).await;

        let mut peer_dtsn = self.peer_dtsn.write().await;
        let dtsn_refresh = match *peer_dtsn {
            None => {
                *peer_dtsn = Some(dio.dtsn);
                false
            }
            Some(previous) => {
                let refreshed = dio.dtsn.is_greater(previous, self.window);
                if refreshed {
                    debug!(
                        "instance {}: peer DTSN advanced to {} (was {})",
                        self.instance_id, dio.dtsn, previous
                    );
                    *peer_dtsn = Some(dio.dtsn);
                }
                refreshed
            }
        };

        DioAssessment {
            version,
            dtsn_refresh,
        }
    }

    /// Advance this node's DTSN to solicit fresh downward routes
    pub async fn bump_dtsn(&self) -> SequenceNumber {
        let mut dtsn = self.dtsn.write().await;
        *dtsn = dtsn.increment();
        info!("instance {}: DTSN advanced to {}", self.instance_id, *dtsn);
        *dtsn
    }

    /// Issue the sequence number for the next outgoing DAO
    pub async fn next_dao_sequence(&self) -> SequenceNumber {
        let mut sequence = self.dao_sequence.write().await;
        *sequence = sequence.increment();
        self.dao_issued_counter.fetch_add(1, Ordering::Relaxed);
        *sequence
    }

    /// Build an outgoing DAO stamped with the next sequence number
    pub async fn issue_dao(&self, dodag_id: Option<DodagId>) -> Result<Dao, MessageError> {
        let sequence = self.next_dao_sequence().await;
        Dao::new(self.instance_id, sequence, dodag_id)
    }

    /// Whether a DAO-ACK acknowledges the last issued DAO.
    ///
    /// The echoed sequence must match the issued one exactly; distinct
    /// values never count as equal.
    pub async fn acknowledges(&self, ack: &DaoAck) -> bool {
        if ack.instance_id != self.instance_id {
            return false;
        }
        *self.dao_sequence.read().await == ack.sequence
    }

    /// Snapshot of the decision statistics
    pub fn stats(&self) -> InstanceStats {
        InstanceStats {
            versions_adopted: self.adopted_counter.load(Ordering::Relaxed),
            versions_ignored: self.ignored_counter.load(Ordering::Relaxed),
            versions_unorderable: self.unorderable_counter.load(Ordering::Relaxed),
            dao_sequences_issued: self.dao_issued_counter.load(Ordering::Relaxed),
        }
    }
}
