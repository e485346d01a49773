//! Revisions
//!
//! A revision is one immutable fact about an entity: "as of `valid_time`
//! the entity had this body", recorded by transaction `transaction_id` at
//! `transaction_time`. Revisions are never updated after being written.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::contract::{EntityId, Timestamp, TxId, TxMetadata};
use crate::document::{ContentHash, DocumentState};

/// One recorded revision of an entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Revision {
    pub entity_id: EntityId,
    pub valid_time: Timestamp,
    pub transaction_time: Timestamp,
    pub transaction_id: TxId,
    pub content_hash: ContentHash,
    /// Inlined body, when the store chose to carry it with the revision.
    /// `None` means the body must be fetched by `content_hash`.
    pub document: Option<DocumentState>,
}

impl Revision {
    /// Build a revision carrying its body, computing the content hash.
    pub fn new(
        entity_id: EntityId,
        valid_time: Timestamp,
        tx: TxMetadata,
        state: DocumentState,
    ) -> Self {
        Revision {
            entity_id,
            valid_time,
            transaction_time: tx.tx_time,
            transaction_id: tx.tx_id,
            content_hash: state.content_hash(),
            document: Some(state),
        }
    }

    /// Same revision with the body stripped (metadata only).
    pub fn without_document(mut self) -> Self {
        self.document = None;
        self
    }

    pub fn is_tombstone(&self) -> bool {
        self.content_hash.is_tombstone()
    }

    pub fn tx(&self) -> TxMetadata {
        TxMetadata::new(self.transaction_id, self.transaction_time)
    }

    /// Bitemporal ordering key: valid time, then transaction time, then
    /// transaction id. Stream position breaks any remaining tie.
    pub fn temporal_key(&self) -> (Timestamp, Timestamp, TxId) {
        (self.valid_time, self.transaction_time, self.transaction_id)
    }

    /// Compare two revisions by [`Revision::temporal_key`].
    pub fn cmp_temporal(&self, other: &Revision) -> Ordering {
        self.temporal_key().cmp(&other.temporal_key())
    }
}
