//! History traversal
//!
//! Produces the revisions of one entity, as seen from a snapshot, ordered
//! by valid time.
//!
//! # Pipeline
//!
//! 1. Read the entity's stream in transaction-time order, stopping at the
//!    first revision past the snapshot's transaction time.
//! 2. Keep revisions the snapshot admits and the range filters accept.
//! 3. Sort by `(valid_time, transaction_time, transaction_id, position)`.
//!    Collapsed mode keeps the last revision of every valid time.
//! 4. Reverse for descending order.
//! 5. Emit in batches, hydrating a batch's documents with one store call
//!    when documents were requested.
//!
//! Steps 1-4 run on the first pull, not when the cursor is opened.
//! Because one total key is sorted and then reversed, a descending
//! traversal is exactly the reverse of the ascending one.

use std::collections::VecDeque;
use tracing::debug;

use vellum_core::{
    EntityId, HistoryEntry, HistoryOptions, Revision, RevisionStream, VellumResult,
};

use crate::cursor::{Cursor, CursorSource};
use crate::resolve::hydrate;
use crate::snapshot::Snapshot;

/// Walks entity histories as of a snapshot.
#[derive(Debug, Clone, Copy)]
pub struct HistoryTraverser {
    batch_size: usize,
}

impl Default for HistoryTraverser {
    fn default() -> Self {
        Self::new(128)
    }
}

impl HistoryTraverser {
    /// `batch_size` bounds the entries hydrated per store call.
    pub fn new(batch_size: usize) -> Self {
        HistoryTraverser {
            batch_size: batch_size.max(1),
        }
    }

    /// Materialized history. An entity without revisions yields `[]`.
    pub fn traverse(
        &self,
        snapshot: &Snapshot,
        entity_id: &EntityId,
        options: &HistoryOptions,
    ) -> VellumResult<Vec<HistoryEntry>> {
        self.open(snapshot, entity_id, options)?.collect_all()
    }

    /// Lazy history.
    pub fn open(
        &self,
        snapshot: &Snapshot,
        entity_id: &EntityId,
        options: &HistoryOptions,
    ) -> VellumResult<Cursor<HistoryEntry>> {
        let stream = snapshot.view().revisions_of(entity_id)?;
        debug!(
            target: "vellum::history",
            entity = %entity_id,
            direction = ?options.direction,
            with_docs = options.with_docs,
            with_corrections = options.with_corrections,
            "Opened history"
        );
        Ok(Cursor::new(
            "history",
            HistorySource {
                snapshot: snapshot.clone(),
                options: options.clone(),
                batch_size: self.batch_size,
                phase: Phase::Pending(stream),
            },
        ))
    }
}

enum Phase {
    /// Stream not read yet
    Pending(Box<dyn RevisionStream>),
    /// Ordered revisions left to emit
    Ready(VecDeque<Revision>),
}

struct HistorySource {
    snapshot: Snapshot,
    options: HistoryOptions,
    batch_size: usize,
    phase: Phase,
}

/// Reads the stream to the snapshot's edge and returns the emission order.
fn order(
    snapshot: &Snapshot,
    options: &HistoryOptions,
    stream: &mut dyn RevisionStream,
) -> VellumResult<VecDeque<Revision>> {
    let mut cut: Vec<(usize, Revision)> = Vec::new();
    let mut position = 0usize;

    'stream: while let Some(batch) = stream.next_batch()? {
        for rev in batch {
            if snapshot.is_past(&rev) {
                break 'stream;
            }
            if snapshot.admits(&rev) && options.admits(&rev) {
                cut.push((position, rev));
            }
            position += 1;
        }
    }

    cut.sort_by(|(pa, a), (pb, b)| a.temporal_key().cmp(&b.temporal_key()).then(pa.cmp(pb)));

    let mut ordered: Vec<Revision> = if options.with_corrections {
        cut.into_iter().map(|(_, rev)| rev).collect()
    } else {
        // Last of each valid-time run is the one that resolves
        let mut collapsed: Vec<Revision> = Vec::new();
        for (_, rev) in cut {
            match collapsed.last_mut() {
                Some(last) if last.valid_time == rev.valid_time => *last = rev,
                _ => collapsed.push(rev),
            }
        }
        collapsed
    };
    if options.direction.is_descending() {
        ordered.reverse();
    }

    debug!(
        target: "vellum::history",
        scanned = position,
        entries = ordered.len(),
        "Ordered history"
    );
    Ok(ordered.into())
}

impl CursorSource<HistoryEntry> for HistorySource {
    fn next_batch(&mut self) -> VellumResult<Option<Vec<HistoryEntry>>> {
        if let Phase::Pending(stream) = &mut self.phase {
            let ordered = order(&self.snapshot, &self.options, stream.as_mut())?;
            // The stream is dropped here, releasing its backend resources
            self.phase = Phase::Ready(ordered);
        }
        let Phase::Ready(remaining) = &mut self.phase else {
            return Ok(None);
        };
        if remaining.is_empty() {
            return Ok(None);
        }

        let take = self.batch_size.min(remaining.len());
        let batch: Vec<Revision> = remaining.drain(..take).collect();
        if !self.options.with_docs {
            return Ok(Some(batch.iter().map(HistoryEntry::from_revision).collect()));
        }

        let hydrated = hydrate(self.snapshot.view().as_ref(), batch)?;
        Ok(Some(
            hydrated
                .into_iter()
                .map(|(rev, state)| HistoryEntry {
                    document: state,
                    ..HistoryEntry::from_revision(&rev)
                })
                .collect(),
        ))
    }
}
