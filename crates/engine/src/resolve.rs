//! As-of entity resolution
//!
//! Among the revisions a snapshot admits, the one an entity resolves to is
//! the maximum by `(valid_time, transaction_time, transaction_id)`; a tie
//! on all three goes to the revision recorded last.

use std::collections::HashMap;
use tracing::trace;

use vellum_core::{
    ContentHash, Document, DocumentState, EntityId, EntityTx, Revision, RevisionView,
    VellumError, VellumResult,
};

use crate::snapshot::Snapshot;

/// Resolves entities as of a snapshot.
#[derive(Debug, Clone, Copy, Default)]
pub struct EntityResolver;

impl EntityResolver {
    pub fn new() -> Self {
        EntityResolver
    }

    /// The revision the entity resolves to, or `None` if nothing is visible.
    ///
    /// Reading stops at the first revision past the snapshot's transaction
    /// time.
    pub fn resolve_revision(
        &self,
        snapshot: &Snapshot,
        entity_id: &EntityId,
    ) -> VellumResult<Option<Revision>> {
        let mut stream = snapshot.view().revisions_of(entity_id)?;
        let mut best: Option<Revision> = None;
        let mut scanned = 0usize;

        'stream: while let Some(batch) = stream.next_batch()? {
            for rev in batch {
                if snapshot.is_past(&rev) {
                    break 'stream;
                }
                scanned += 1;
                if !snapshot.admits(&rev) {
                    continue;
                }
                // `>=` so the later-recorded revision wins a full tie
                if best.as_ref().map_or(true, |b| rev.temporal_key() >= b.temporal_key()) {
                    best = Some(rev);
                }
            }
        }

        trace!(target: "vellum::resolve", entity = %entity_id, scanned, found = best.is_some(), "Resolved revision");
        Ok(best)
    }

    /// Document state of the entity.
    ///
    /// # Errors
    ///
    /// - `EntityNotFound` if no revision is visible (a tombstone is visible
    ///   and resolves to `DocumentState::Tombstone`)
    /// - `BackendIo` if a live body is missing from the store
    pub fn resolve(&self, snapshot: &Snapshot, entity_id: &EntityId) -> VellumResult<DocumentState> {
        let rev = self
            .resolve_revision(snapshot, entity_id)?
            .ok_or_else(|| VellumError::not_found(entity_id.clone()))?;
        let mut states = hydrate(snapshot.view().as_ref(), vec![rev])?;
        states
            .pop()
            .and_then(|(_, state)| state)
            .ok_or_else(|| VellumError::backend(format!("no document state for {}", entity_id)))
    }

    /// Transaction metadata of the revision the entity resolves to.
    pub fn resolve_tx(&self, snapshot: &Snapshot, entity_id: &EntityId) -> VellumResult<EntityTx> {
        self.resolve_revision(snapshot, entity_id)?
            .map(|rev| EntityTx::from(&rev))
            .ok_or_else(|| VellumError::not_found(entity_id.clone()))
    }
}

/// Attach a document state to every revision, fetching missing live bodies
/// with a single `documents` call.
///
/// Tombstones and inlined bodies never hit the store.
pub(crate) fn hydrate(
    view: &dyn RevisionView,
    revisions: Vec<Revision>,
) -> VellumResult<Vec<(Revision, Option<DocumentState>)>> {
    let mut wanted: Vec<ContentHash> = revisions
        .iter()
        .filter(|r| r.document.is_none() && !r.is_tombstone())
        .map(|r| r.content_hash)
        .collect();
    wanted.sort();
    wanted.dedup();

    let fetched: HashMap<ContentHash, Document> = if wanted.is_empty() {
        HashMap::new()
    } else {
        view.documents(&wanted)?
    };

    revisions
        .into_iter()
        .map(|mut rev| {
            let state = match rev.document.take() {
                Some(state) => state,
                None if rev.is_tombstone() => DocumentState::Tombstone,
                None => {
                    let doc = fetched.get(&rev.content_hash).cloned().ok_or_else(|| {
                        VellumError::backend(format!(
                            "document {} of entity {} is missing",
                            rev.content_hash, rev.entity_id
                        ))
                    })?;
                    DocumentState::Live(doc)
                }
            };
            Ok((rev, Some(state)))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use vellum_core::{Timestamp, TxId, TxMetadata};
    use vellum_storage::{MemoryRevisionStore, WriteOp};

    use crate::snapshot::SnapshotResolver;

    fn ts(micros: u64) -> Timestamp {
        Timestamp::from_micros(micros)
    }

    fn doc(name: &str) -> Document {
        Document::new().with("name", name)
    }

    fn bind(store: &MemoryRevisionStore, vt: u64, tt: u64) -> Snapshot {
        SnapshotResolver::new(Arc::new(store.clone()))
            .bind(Some(ts(vt)), Some(ts(tt)))
            .unwrap()
    }

    /// (vt1,tt1,A), (vt1,tt2,B), (vt2,tt3,C)
    fn scenario() -> MemoryRevisionStore {
        let store = MemoryRevisionStore::new();
        store.transact_at(ts(1), vec![WriteOp::put("e", doc("A")).valid_at(ts(1))]).unwrap();
        store.transact_at(ts(2), vec![WriteOp::put("e", doc("B")).valid_at(ts(1))]).unwrap();
        store.transact_at(ts(3), vec![WriteOp::put("e", doc("C")).valid_at(ts(2))]).unwrap();
        store
    }

    #[test]
    fn test_latest_valid_time_wins() {
        let store = scenario();
        let state = EntityResolver.resolve(&bind(&store, 2, 3), &EntityId::from("e")).unwrap();
        assert_eq!(state, DocumentState::Live(doc("C")));
    }

    #[test]
    fn test_correction_wins_within_valid_time() {
        let store = scenario();
        let state = EntityResolver.resolve(&bind(&store, 1, 3), &EntityId::from("e")).unwrap();
        assert_eq!(state, DocumentState::Live(doc("B")));
    }

    #[test]
    fn test_earliest_snapshot_sees_original() {
        let store = scenario();
        let state = EntityResolver.resolve(&bind(&store, 1, 1), &EntityId::from("e")).unwrap();
        assert_eq!(state, DocumentState::Live(doc("A")));
    }

    #[test]
    fn test_unknown_entity_is_not_found() {
        let store = scenario();
        let err = EntityResolver.resolve(&bind(&store, 2, 3), &EntityId::from("nobody")).unwrap_err();
        assert!(err.is_not_found());
        let err = EntityResolver.resolve_tx(&bind(&store, 2, 3), &EntityId::from("nobody")).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_entity_before_first_valid_time_is_not_found() {
        let store = MemoryRevisionStore::new();
        store.transact_at(ts(10), vec![WriteOp::put("e", doc("A")).valid_at(ts(10))]).unwrap();
        let err = EntityResolver.resolve(&bind(&store, 5, 10), &EntityId::from("e")).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_tombstone_is_distinct_from_not_found() {
        let store = scenario();
        store.transact_at(ts(4), vec![WriteOp::delete("e").valid_at(ts(3))]).unwrap();
        let snap = bind(&store, 3, 4);
        let before = store.stats().document_requests;
        assert_eq!(EntityResolver.resolve(&snap, &EntityId::from("e")).unwrap(), DocumentState::Tombstone);
        assert_eq!(store.stats().document_requests, before);
    }

    #[test]
    fn test_resolve_tx_reports_winning_revision() {
        let store = scenario();
        let tx = EntityResolver.resolve_tx(&bind(&store, 1, 3), &EntityId::from("e")).unwrap();
        assert_eq!(tx.valid_time, ts(1));
        assert_eq!(tx.transaction_time, ts(2));
        assert_eq!(tx.transaction_id, TxId::new(2));
        assert_eq!(tx.content_hash, doc("B").content_hash());
    }

    #[test]
    fn test_full_tie_goes_to_last_recorded() {
        let store = MemoryRevisionStore::new();
        store
            .transact_at(
                ts(5),
                vec![
                    WriteOp::put("e", doc("first")).valid_at(ts(5)),
                    WriteOp::put("e", doc("second")).valid_at(ts(5)),
                ],
            )
            .unwrap();
        let state = EntityResolver.resolve(&bind(&store, 5, 5), &EntityId::from("e")).unwrap();
        assert_eq!(state, DocumentState::Live(doc("second")));
    }

    #[test]
    fn test_later_transaction_with_earlier_time_is_hidden_by_basis() {
        let store = scenario();
        let snap = bind(&store, 2, 3);
        store.transact_at(ts(2), vec![WriteOp::put("e", doc("late")).valid_at(ts(2))]).unwrap();
        let state = EntityResolver.resolve(&snap, &EntityId::from("e")).unwrap();
        assert_eq!(state, DocumentState::Live(doc("C")));
    }

    #[test]
    fn test_hydrate_reports_missing_body() {
        struct Empty;
        impl RevisionView for Empty {
            fn basis(&self) -> Option<TxId> {
                None
            }
            fn revisions_of(&self, _: &EntityId) -> VellumResult<Box<dyn vellum_core::RevisionStream>> {
                Ok(Box::new(vellum_core::VecRevisionStream::new(Vec::new(), 1)))
            }
            fn documents(&self, _: &[ContentHash]) -> VellumResult<HashMap<ContentHash, Document>> {
                Ok(HashMap::new())
            }
            fn entity_ids(&self) -> VellumResult<Vec<EntityId>> {
                Ok(Vec::new())
            }
        }

        let rev = Revision::new(
            EntityId::from("e"),
            ts(1),
            TxMetadata::new(TxId::new(1), ts(1)),
            DocumentState::Live(doc("x")),
        )
        .without_document();
        let err = hydrate(&Empty, vec![rev]).unwrap_err();
        assert!(matches!(err, VellumError::BackendIo { .. }));
    }

    /// Collects the target of every event emitted while installed.
    #[derive(Clone, Default)]
    struct Targets(Arc<parking_lot::Mutex<Vec<String>>>);

    impl<S: tracing::Subscriber> tracing_subscriber::Layer<S> for Targets {
        fn on_event(&self, event: &tracing::Event<'_>, _: tracing_subscriber::layer::Context<'_, S>) {
            self.0.lock().push(event.metadata().target().to_string());
        }
    }

    #[test]
    fn test_resolution_traces_under_its_own_target() {
        use tracing_subscriber::layer::SubscriberExt;

        let store = scenario();
        let snap = bind(&store, 2, 3);
        let targets = Targets::default();
        let subscriber = tracing_subscriber::registry().with(targets.clone());
        tracing::subscriber::with_default(subscriber, || {
            EntityResolver.resolve(&snap, &EntityId::from("e")).unwrap();
        });

        let seen = targets.0.lock().clone();
        assert!(seen.iter().any(|t| t == "vellum::resolve"), "targets: {:?}", seen);
        assert!(!seen.iter().any(|t| t == "vellum::snapshot"), "targets: {:?}", seen);
    }
}
