//! Per-entity revision chains
//!
//! A chain holds one entity's revisions ordered by
//! `(transaction_time, transaction_id)`, with recording order breaking ties
//! inside a transaction. Chains are copy-on-write: readers hold an `Arc` to
//! the vector they started with, and a writer only clones it when a reader
//! still has it.

use std::sync::Arc;

use vellum_core::{Revision, TxId};

#[derive(Debug, Clone, Default)]
pub struct RevisionChain {
    revisions: Arc<Vec<Revision>>,
}

impl RevisionChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a revision at its transaction-order position.
    ///
    /// Appends in the common case of monotonically increasing transaction
    /// times; a back-dated transaction time lands after every revision with
    /// an equal or smaller key.
    pub fn insert(&mut self, revision: Revision) {
        let key = (revision.transaction_time, revision.transaction_id);
        let revisions = Arc::make_mut(&mut self.revisions);
        let at = revisions.partition_point(|r| (r.transaction_time, r.transaction_id) <= key);
        revisions.insert(at, revision);
    }

    /// Shared handle to the current revisions
    pub fn share(&self) -> Arc<Vec<Revision>> {
        Arc::clone(&self.revisions)
    }

    /// Whether any revision is visible at `basis`
    pub fn visible_at(&self, basis: TxId) -> bool {
        self.revisions.iter().any(|r| r.transaction_id <= basis)
    }

    pub fn len(&self) -> usize {
        self.revisions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.revisions.is_empty()
    }
}
