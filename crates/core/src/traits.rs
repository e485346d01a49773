//! Collaborator traits for the read path
//!
//! The engine never talks to a concrete store. It consumes revisions
//! through these traits so that any backend (in-memory, on-disk, remote)
//! can sit underneath without changes to upper layers.
//!
//! ## Layering
//!
//! ```text
//! RevisionStore   one per database, hands out pinned views
//!   └─ RevisionView    one per snapshot, immutable once opened
//!        └─ RevisionStream   one per entity traversal, batched
//! ```

use std::collections::HashMap;
use std::sync::Arc;

use crate::contract::{EntityId, Timestamp, TxId, TxMetadata};
use crate::document::{ContentHash, Document};
use crate::error::VellumResult;
use crate::revision::Revision;

/// Source of pinned revision views.
///
/// Thread safety: all methods must be safe to call concurrently from
/// multiple threads (requires Send + Sync).
pub trait RevisionStore: Send + Sync {
    /// Most recently applied transaction, or `None` for an empty store.
    ///
    /// `tx_time` is the latest transaction time applied so far, which a
    /// back-dated transaction does not lower.
    ///
    /// # Errors
    ///
    /// Returns `BackendIo` if the store cannot be reached.
    fn latest_tx(&self) -> VellumResult<Option<TxMetadata>>;

    /// Earliest time the store can answer queries about.
    ///
    /// Snapshots bound before this are rejected with `InvalidTimeRange`.
    fn epoch(&self) -> Timestamp {
        Timestamp::EPOCH
    }

    /// Open a view pinned at `basis`.
    ///
    /// The view exposes exactly the revisions whose transaction id is
    /// `<= basis` (none for `basis = None`), regardless of what is
    /// applied afterwards. The pin is released when the last `Arc` to the
    /// view is dropped.
    ///
    /// # Errors
    ///
    /// Returns `BackendIo` if the store cannot be reached.
    fn open_view(&self, basis: Option<TxId>) -> VellumResult<Arc<dyn RevisionView>>;
}

/// Immutable, pinned view of the store.
pub trait RevisionView: Send + Sync {
    /// Transaction id the view is pinned at
    fn basis(&self) -> Option<TxId>;

    /// Stream the revisions of one entity in transaction order.
    ///
    /// Revisions arrive ordered by `(transaction_time, transaction_id)`
    /// ascending, followed by their recording order within a transaction.
    /// An entity with no revisions yields an empty stream, never an error.
    /// Revisions may or may not carry inlined documents.
    fn revisions_of(&self, entity_id: &EntityId) -> VellumResult<Box<dyn RevisionStream>>;

    /// Fetch document bodies by content hash.
    ///
    /// Hashes the view does not know are absent from the returned map.
    /// Tombstone hashes are never requested.
    fn documents(&self, hashes: &[ContentHash]) -> VellumResult<HashMap<ContentHash, Document>>;

    /// Every entity with at least one revision in the view, in id order.
    fn entity_ids(&self) -> VellumResult<Vec<EntityId>>;
}

/// Lazy batched stream of one entity's revisions.
pub trait RevisionStream: Send {
    /// Next batch of revisions, or `None` once the stream is exhausted.
    ///
    /// Batches are never empty. Dropping the stream early releases any
    /// backend resources it holds.
    fn next_batch(&mut self) -> VellumResult<Option<Vec<Revision>>>;
}

/// Stream over an in-memory vector, handed out in fixed-size batches.
///
/// Useful for backends that already hold an entity's chain in memory.
pub struct VecRevisionStream {
    revisions: std::vec::IntoIter<Revision>,
    batch_size: usize,
}

impl VecRevisionStream {
    pub fn new(revisions: Vec<Revision>, batch_size: usize) -> Self {
        VecRevisionStream {
            revisions: revisions.into_iter(),
            batch_size: batch_size.max(1),
        }
    }
}

impl RevisionStream for VecRevisionStream {
    fn next_batch(&mut self) -> VellumResult<Option<Vec<Revision>>> {
        let batch: Vec<Revision> = self.revisions.by_ref().take(self.batch_size).collect();
        Ok(if batch.is_empty() { None } else { Some(batch) })
    }
}
