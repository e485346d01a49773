//! In-memory revision store
//!
//! # Design
//!
//! - DashMap of per-entity [`RevisionChain`]s: writes to one entity only
//!   lock that entity's shard
//! - FxHashMap document store keyed by content hash, shared by every
//!   revision with an equal body
//! - Transactions are serialized by a write lock and published by bumping
//!   the latest transaction after all revisions are in place
//!
//! # Views
//!
//! A view is pinned at a transaction id (its basis) and filters every read
//! by `transaction_id <= basis`. Transactions applied later are therefore
//! invisible even when they carry earlier transaction times. Opening a view
//! takes no lock beyond a short read of the published transaction.

use dashmap::DashMap;
use parking_lot::{Mutex, RwLock};
use rustc_hash::FxHashMap;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use tracing::{debug, trace};

use vellum_core::traits::VecRevisionStream;
use vellum_core::{
    ContentHash, Document, DocumentState, EntityId, Revision, RevisionStore, RevisionStream,
    RevisionView, Timestamp, TxId, TxMetadata, VellumError, VellumResult,
};

use crate::chain::RevisionChain;
use crate::config::StoreConfig;

/// One write inside a transaction.
#[derive(Debug, Clone, PartialEq)]
pub enum WriteOp {
    /// Record a live document for the entity
    Put {
        entity_id: EntityId,
        /// Defaults to the transaction time
        valid_time: Option<Timestamp>,
        document: Document,
    },
    /// Record a tombstone for the entity
    Delete {
        entity_id: EntityId,
        /// Defaults to the transaction time
        valid_time: Option<Timestamp>,
    },
}

impl WriteOp {
    pub fn put(entity_id: impl Into<EntityId>, document: Document) -> Self {
        WriteOp::Put {
            entity_id: entity_id.into(),
            valid_time: None,
            document,
        }
    }

    pub fn delete(entity_id: impl Into<EntityId>) -> Self {
        WriteOp::Delete {
            entity_id: entity_id.into(),
            valid_time: None,
        }
    }

    /// Set the valid time of this write
    pub fn valid_at(mut self, at: Timestamp) -> Self {
        match &mut self {
            WriteOp::Put { valid_time, .. } | WriteOp::Delete { valid_time, .. } => {
                *valid_time = Some(at)
            }
        }
        self
    }

    fn valid_time(&self) -> Option<Timestamp> {
        match self {
            WriteOp::Put { valid_time, .. } | WriteOp::Delete { valid_time, .. } => *valid_time,
        }
    }
}

/// Point-in-time counters of store activity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StoreStats {
    pub transactions: u64,
    pub revisions: u64,
    /// Calls to `RevisionView::documents`
    pub document_requests: u64,
    /// Document bodies returned across all requests
    pub documents_fetched: u64,
    pub streams_opened: u64,
    /// Views currently pinned
    pub active_views: usize,
}

struct StoreInner {
    config: StoreConfig,
    chains: DashMap<EntityId, RevisionChain>,
    documents: RwLock<FxHashMap<ContentHash, Document>>,
    /// Most recently published transaction
    latest: RwLock<Option<TxMetadata>>,
    next_tx: AtomicU64,
    write_lock: Mutex<()>,
    revisions: AtomicU64,
    document_requests: AtomicU64,
    documents_fetched: AtomicU64,
    streams_opened: AtomicU64,
    active_views: AtomicUsize,
}

/// Revision store held entirely in memory.
///
/// Cloning is cheap and yields a handle to the same store.
///
/// # Example
///
/// ```
/// use vellum_core::{Document, RevisionStore, Timestamp};
/// use vellum_storage::{MemoryRevisionStore, WriteOp};
///
/// let store = MemoryRevisionStore::new();
/// let tx = store
///     .transact_at(Timestamp::from_secs(10), vec![WriteOp::put("alice", Document::new())])
///     .unwrap();
/// assert_eq!(store.latest_tx().unwrap(), Some(tx));
/// ```
#[derive(Clone)]
pub struct MemoryRevisionStore {
    inner: Arc<StoreInner>,
}

impl MemoryRevisionStore {
    pub fn new() -> Self {
        Self::with_config(StoreConfig::default())
    }

    pub fn with_config(config: StoreConfig) -> Self {
        MemoryRevisionStore {
            inner: Arc::new(StoreInner {
                config,
                chains: DashMap::new(),
                documents: RwLock::new(FxHashMap::default()),
                latest: RwLock::new(None),
                next_tx: AtomicU64::new(0),
                write_lock: Mutex::new(()),
                revisions: AtomicU64::new(0),
                document_requests: AtomicU64::new(0),
                documents_fetched: AtomicU64::new(0),
                streams_opened: AtomicU64::new(0),
                active_views: AtomicUsize::new(0),
            }),
        }
    }

    pub fn config(&self) -> &StoreConfig {
        &self.inner.config
    }

    /// Apply a transaction at the current wall-clock time.
    ///
    /// The transaction time never goes backwards relative to the latest
    /// published transaction.
    pub fn transact(&self, ops: Vec<WriteOp>) -> VellumResult<TxMetadata> {
        let floor = self
            .inner
            .latest
            .read()
            .map(|m| m.tx_time)
            .unwrap_or(Timestamp::EPOCH);
        self.transact_at(Timestamp::now().max(floor), ops)
    }

    /// Apply a transaction with an explicit transaction time.
    ///
    /// Any transaction time at or after the store epoch is accepted,
    /// including one earlier than already-applied transactions. A
    /// back-dated transaction never lowers the published transaction time,
    /// so an unbound read still sees every committed transaction.
    ///
    /// # Errors
    ///
    /// `InvalidTimeRange` if the transaction time or any valid time lies
    /// before the store epoch. Nothing is applied in that case.
    pub fn transact_at(&self, tx_time: Timestamp, ops: Vec<WriteOp>) -> VellumResult<TxMetadata> {
        let epoch = self.inner.config.epoch;
        let too_early = std::iter::once(tx_time)
            .chain(ops.iter().filter_map(WriteOp::valid_time))
            .find(|t| *t < epoch);
        if let Some(requested) = too_early {
            return Err(VellumError::InvalidTimeRange {
                requested,
                earliest: epoch,
            });
        }

        let _guard = self.inner.write_lock.lock();
        let tx_id = TxId::new(self.inner.next_tx.fetch_add(1, Ordering::AcqRel) + 1);
        let meta = TxMetadata::new(tx_id, tx_time);
        let count = ops.len();

        for op in ops {
            let (entity_id, valid_time, state) = match op {
                WriteOp::Put {
                    entity_id,
                    valid_time,
                    document,
                } => (entity_id, valid_time, DocumentState::Live(document)),
                WriteOp::Delete {
                    entity_id,
                    valid_time,
                } => (entity_id, valid_time, DocumentState::Tombstone),
            };
            let mut revision = Revision::new(entity_id, valid_time.unwrap_or(tx_time), meta, state);
            if !self.inner.config.inline_documents {
                if let Some(DocumentState::Live(doc)) = revision.document.take() {
                    self.inner
                        .documents
                        .write()
                        .entry(revision.content_hash)
                        .or_insert(doc);
                }
            }
            self.inner
                .chains
                .entry(revision.entity_id.clone())
                .or_default()
                .insert(revision);
        }

        self.inner.revisions.fetch_add(count as u64, Ordering::Relaxed);
        // Publish last so no view can pin a half-applied transaction.
        // The published time is a high-water mark over every applied tx.
        let mut latest = self.inner.latest.write();
        let high_water = latest.map_or(tx_time, |prev| prev.tx_time.max(tx_time));
        *latest = Some(TxMetadata::new(tx_id, high_water));
        drop(latest);

        debug!(target: "vellum::storage", tx_id = %tx_id, tx_time = %tx_time, revisions = count, "Applied transaction");
        Ok(meta)
    }

    /// Number of currently pinned views
    pub fn active_views(&self) -> usize {
        self.inner.active_views.load(Ordering::Acquire)
    }

    pub fn entity_count(&self) -> usize {
        self.inner.chains.len()
    }

    pub fn stats(&self) -> StoreStats {
        let inner = &self.inner;
        StoreStats {
            transactions: inner.next_tx.load(Ordering::Acquire),
            revisions: inner.revisions.load(Ordering::Relaxed),
            document_requests: inner.document_requests.load(Ordering::Relaxed),
            documents_fetched: inner.documents_fetched.load(Ordering::Relaxed),
            streams_opened: inner.streams_opened.load(Ordering::Relaxed),
            active_views: inner.active_views.load(Ordering::Acquire),
        }
    }
}

impl Default for MemoryRevisionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for MemoryRevisionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryRevisionStore")
            .field("entities", &self.entity_count())
            .field("latest", &*self.inner.latest.read())
            .field("active_views", &self.active_views())
            .finish()
    }
}

impl RevisionStore for MemoryRevisionStore {
    fn latest_tx(&self) -> VellumResult<Option<TxMetadata>> {
        Ok(*self.inner.latest.read())
    }

    fn epoch(&self) -> Timestamp {
        self.inner.config.epoch
    }

    fn open_view(&self, basis: Option<TxId>) -> VellumResult<Arc<dyn RevisionView>> {
        // Never pin past what has been published
        let published = self.inner.latest.read().map(|m| m.tx_id);
        let basis = basis.zip(published).map(|(b, p)| b.min(p));

        self.inner.active_views.fetch_add(1, Ordering::AcqRel);
        debug!(target: "vellum::storage", basis = ?basis.map(|b| b.as_u64()), "Opened view");
        Ok(Arc::new(MemoryRevisionView {
            inner: Arc::clone(&self.inner),
            basis,
        }))
    }
}

/// View of a [`MemoryRevisionStore`] pinned at a transaction id.
struct MemoryRevisionView {
    inner: Arc<StoreInner>,
    basis: Option<TxId>,
}

impl Drop for MemoryRevisionView {
    fn drop(&mut self) {
        self.inner.active_views.fetch_sub(1, Ordering::AcqRel);
        trace!(target: "vellum::storage", "Released view");
    }
}

impl RevisionView for MemoryRevisionView {
    fn basis(&self) -> Option<TxId> {
        self.basis
    }

    fn revisions_of(&self, entity_id: &EntityId) -> VellumResult<Box<dyn RevisionStream>> {
        let batch_size = self.inner.config.stream_batch_size;
        let (Some(basis), Some(chain)) = (self.basis, self.inner.chains.get(entity_id)) else {
            return Ok(Box::new(VecRevisionStream::new(Vec::new(), batch_size)));
        };
        self.inner.streams_opened.fetch_add(1, Ordering::Relaxed);
        Ok(Box::new(ChainStream {
            revisions: chain.share(),
            pos: 0,
            basis,
            batch_size: batch_size.max(1),
        }))
    }

    fn documents(&self, hashes: &[ContentHash]) -> VellumResult<HashMap<ContentHash, Document>> {
        let docs = self.inner.documents.read();
        let found: HashMap<ContentHash, Document> = hashes
            .iter()
            .filter_map(|h| docs.get(h).map(|d| (*h, d.clone())))
            .collect();
        drop(docs);

        self.inner.document_requests.fetch_add(1, Ordering::Relaxed);
        self.inner
            .documents_fetched
            .fetch_add(found.len() as u64, Ordering::Relaxed);
        trace!(target: "vellum::storage", requested = hashes.len(), found = found.len(), "Fetched documents");
        Ok(found)
    }

    fn entity_ids(&self) -> VellumResult<Vec<EntityId>> {
        let Some(basis) = self.basis else {
            return Ok(Vec::new());
        };
        let mut ids: Vec<EntityId> = self
            .inner
            .chains
            .iter()
            .filter(|entry| entry.value().visible_at(basis))
            .map(|entry| entry.key().clone())
            .collect();
        ids.sort();
        Ok(ids)
    }
}

/// Batched stream over a shared chain, filtered by the view basis.
struct ChainStream {
    revisions: Arc<Vec<Revision>>,
    pos: usize,
    basis: TxId,
    batch_size: usize,
}

impl RevisionStream for ChainStream {
    fn next_batch(&mut self) -> VellumResult<Option<Vec<Revision>>> {
        let mut batch = Vec::with_capacity(self.batch_size);
        while batch.len() < self.batch_size {
            let Some(rev) = self.revisions.get(self.pos) else {
                break;
            };
            self.pos += 1;
            if rev.transaction_id <= self.basis {
                batch.push(rev.clone());
            }
        }
        Ok(if batch.is_empty() { None } else { Some(batch) })
    }
}
