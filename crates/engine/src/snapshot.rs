//! Bitemporal snapshots
//!
//! A [`Snapshot`] fixes both time axes and pins a backend view. Everything
//! read through it is filtered by the same cut:
//!
//! - `transaction_time <= snapshot.transaction_time`
//! - `transaction_id <= snapshot.basis`
//! - `valid_time <= snapshot.valid_time`
//!
//! The basis is the latest applied transaction at bind time. Filtering on
//! it keeps a snapshot reproducible: a transaction applied after the bind
//! stays invisible even if it carries an earlier transaction time.
//!
//! # Lifecycle
//!
//! Snapshots are immutable and cheap to clone. The backend view is
//! released when the last clone is dropped.

use std::sync::Arc;
use tracing::debug;

use vellum_core::{RevisionStore, RevisionView, Revision, Timestamp, TxId, VellumError, VellumResult};

struct SnapshotInner {
    valid_time: Timestamp,
    transaction_time: Timestamp,
    basis: Option<TxId>,
    view: Arc<dyn RevisionView>,
}

/// Immutable bitemporal point of view.
#[derive(Clone)]
pub struct Snapshot {
    inner: Arc<SnapshotInner>,
}

impl Snapshot {
    pub fn valid_time(&self) -> Timestamp {
        self.inner.valid_time
    }

    pub fn transaction_time(&self) -> Timestamp {
        self.inner.transaction_time
    }

    /// Latest transaction visible to this snapshot, `None` for an empty store
    pub fn basis(&self) -> Option<TxId> {
        self.inner.basis
    }

    /// The pinned backend view
    pub fn view(&self) -> &Arc<dyn RevisionView> {
        &self.inner.view
    }

    /// Whether the revision was recorded within this snapshot's
    /// transaction-time bound and basis.
    pub fn knows(&self, rev: &Revision) -> bool {
        rev.transaction_time <= self.inner.transaction_time
            && self.inner.basis.map_or(false, |b| rev.transaction_id <= b)
    }

    /// Full visibility cut: [`Snapshot::knows`] plus the valid-time bound.
    pub fn admits(&self, rev: &Revision) -> bool {
        self.knows(rev) && rev.valid_time <= self.inner.valid_time
    }

    /// Whether a revision lies beyond the transaction-time bound.
    ///
    /// Streams arrive in transaction-time order, so every later revision of
    /// the same stream lies beyond it too.
    pub fn is_past(&self, rev: &Revision) -> bool {
        rev.transaction_time > self.inner.transaction_time
    }

    /// True when both handles share one bound view.
    pub fn same_as(&self, other: &Snapshot) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl std::fmt::Debug for Snapshot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Snapshot")
            .field("valid_time", &self.inner.valid_time)
            .field("transaction_time", &self.inner.transaction_time)
            .field("basis", &self.inner.basis)
            .finish()
    }
}

/// Binds snapshots against a revision store.
#[derive(Clone)]
pub struct SnapshotResolver {
    store: Arc<dyn RevisionStore>,
}

impl SnapshotResolver {
    pub fn new(store: Arc<dyn RevisionStore>) -> Self {
        SnapshotResolver { store }
    }

    /// Bind a snapshot.
    ///
    /// - An omitted transaction time resolves to the latest transaction
    ///   time applied so far, or the wall clock for an empty store.
    /// - An omitted valid time resolves to the transaction time.
    ///
    /// # Errors
    ///
    /// - `InvalidTimeRange` if either time lies before the store epoch
    /// - `BackendIo` if the store cannot be reached
    pub fn bind(
        &self,
        valid_time: Option<Timestamp>,
        transaction_time: Option<Timestamp>,
    ) -> VellumResult<Snapshot> {
        let latest = self.store.latest_tx()?;
        let transaction_time = transaction_time
            .or_else(|| latest.map(|m| m.tx_time))
            .unwrap_or_else(Timestamp::now);
        let valid_time = valid_time.unwrap_or(transaction_time);

        let earliest = self.store.epoch();
        for requested in [transaction_time, valid_time] {
            if requested < earliest {
                return Err(VellumError::InvalidTimeRange { requested, earliest });
            }
        }

        let view = self.store.open_view(latest.map(|m| m.tx_id))?;
        let basis = view.basis();
        debug!(
            target: "vellum::snapshot",
            valid_time = %valid_time,
            transaction_time = %transaction_time,
            basis = ?basis.map(|b| b.as_u64()),
            "Bound snapshot"
        );
        Ok(Snapshot {
            inner: Arc::new(SnapshotInner {
                valid_time,
                transaction_time,
                basis,
                view,
            }),
        })
    }
}
