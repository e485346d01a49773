//! Deprecated datasource methods
//!
//! Older callers acquired a snapshot handle and passed it back into every
//! read, and used one method per history direction. These names delegate
//! to the canonical methods and always read through the datasource's own
//! snapshot. A handle from another datasource is ignored.
//!
//! The history forms use collapsed mode and include documents.

use tracing::debug;

use vellum_core::{DocumentState, HistoryEntry, HistoryOptions, Value, VellumResult};

use super::Datasource;
use crate::cursor::Cursor;
use crate::query::{QueryDescriptor, Tuple};
use crate::snapshot::Snapshot;

fn legacy_history(descending: bool) -> HistoryOptions {
    let opts = HistoryOptions::new().with_docs(true);
    if descending {
        opts.descending()
    } else {
        opts.ascending()
    }
}

impl Datasource {
    fn check_handle(&self, handle: &Snapshot, method: &'static str) {
        if !handle.same_as(&self.snapshot) {
            debug!(
                target: "vellum::db",
                method,
                handle = ?handle,
                "Ignoring snapshot handle from another datasource"
            );
        }
    }

    /// Handle to this datasource's snapshot.
    #[deprecated(note = "reads are already bound to the datasource's snapshot")]
    pub fn new_snapshot(&self) -> Snapshot {
        self.snapshot.clone()
    }

    #[deprecated(note = "use `entity`")]
    pub fn entity_with(
        &self,
        handle: &Snapshot,
        entity_id: impl Into<Value>,
    ) -> VellumResult<DocumentState> {
        self.check_handle(handle, "entity_with");
        self.entity(entity_id)
    }

    #[deprecated(note = "use `query`")]
    pub fn q(&self, query: &QueryDescriptor) -> VellumResult<Vec<Tuple>> {
        self.query(query)
    }

    #[deprecated(note = "use `open_query`")]
    pub fn q_with(&self, handle: &Snapshot, query: &QueryDescriptor) -> VellumResult<Cursor<Tuple>> {
        self.check_handle(handle, "q_with");
        self.open_query(query)
    }

    #[deprecated(note = "use `entity_history` with ascending options")]
    pub fn history_ascending(&self, entity_id: impl Into<Value>) -> VellumResult<Vec<HistoryEntry>> {
        self.entity_history(entity_id, &legacy_history(false))
    }

    #[deprecated(note = "use `entity_history` with descending options")]
    pub fn history_descending(&self, entity_id: impl Into<Value>) -> VellumResult<Vec<HistoryEntry>> {
        self.entity_history(entity_id, &legacy_history(true))
    }

    #[deprecated(note = "use `open_entity_history` with ascending options")]
    pub fn history_ascending_with(
        &self,
        handle: &Snapshot,
        entity_id: impl Into<Value>,
    ) -> VellumResult<Cursor<HistoryEntry>> {
        self.check_handle(handle, "history_ascending_with");
        self.open_entity_history(entity_id, &legacy_history(false))
    }

    #[deprecated(note = "use `open_entity_history` with descending options")]
    pub fn history_descending_with(
        &self,
        handle: &Snapshot,
        entity_id: impl Into<Value>,
    ) -> VellumResult<Cursor<HistoryEntry>> {
        self.check_handle(handle, "history_descending_with");
        self.open_entity_history(entity_id, &legacy_history(true))
    }

    #[deprecated(note = "use `open_entity_history` with ascending options")]
    pub fn open_history_ascending(&self, entity_id: impl Into<Value>) -> VellumResult<Cursor<HistoryEntry>> {
        self.open_entity_history(entity_id, &legacy_history(false))
    }

    #[deprecated(note = "use `open_entity_history` with descending options")]
    pub fn open_history_descending(&self, entity_id: impl Into<Value>) -> VellumResult<Cursor<HistoryEntry>> {
        self.open_entity_history(entity_id, &legacy_history(true))
    }
}
