//! Datasource: every read, as of one snapshot
//!
//! A [`Datasource`] is opened from a [`Database`](crate::Database) and binds
//! a [`Snapshot`] for its whole life. All of its reads agree with each
//! other, however many transactions are applied meanwhile.
//!
//! Entity ids are accepted as anything convertible into a
//! [`Value`](vellum_core::Value) and coerced with [`EntityId::coerce`]:
//! strings, integers, UUIDs, `EntityId`s and structured values all work.
//!
//! Lazy variants (`open_*`) return a [`Cursor`] that should be closed or
//! dropped when the caller is done with it. The view pin is released once
//! the datasource and every cursor it opened are gone.

mod legacy;

use std::sync::Arc;
use tracing::debug;

use vellum_core::{
    DocumentState, EntityId, EntityTx, HistoryEntry, HistoryOptions, Timestamp, TxId, Value,
    VellumResult,
};

use crate::cursor::Cursor;
use crate::database::DatabaseInner;
use crate::history::HistoryTraverser;
use crate::query::{QueryDescriptor, Tuple};
use crate::resolve::EntityResolver;
use crate::snapshot::Snapshot;

/// Read handle bound to one snapshot.
pub struct Datasource {
    db: Arc<DatabaseInner>,
    snapshot: Snapshot,
}

impl Datasource {
    pub(crate) fn new(db: Arc<DatabaseInner>, snapshot: Snapshot) -> Self {
        Datasource { db, snapshot }
    }

    /// Document state of an entity as of this snapshot.
    ///
    /// # Errors
    ///
    /// - `MalformedEntityId` if the id cannot be coerced
    /// - `EntityNotFound` if no revision is visible
    pub fn entity(&self, entity_id: impl Into<Value>) -> VellumResult<DocumentState> {
        let entity_id = EntityId::coerce(entity_id)?;
        self.db.tracker.record_entity_read();
        EntityResolver.resolve(&self.snapshot, &entity_id)
    }

    /// Transaction metadata of the revision the entity resolves to.
    pub fn entity_tx(&self, entity_id: impl Into<Value>) -> VellumResult<EntityTx> {
        let entity_id = EntityId::coerce(entity_id)?;
        self.db.tracker.record_entity_read();
        EntityResolver.resolve_tx(&self.snapshot, &entity_id)
    }

    /// Run a query to completion.
    pub fn query(&self, query: &QueryDescriptor) -> VellumResult<Vec<Tuple>> {
        self.run_query(query)?.collect_all()
    }

    /// Run a query lazily.
    pub fn open_query(&self, query: &QueryDescriptor) -> VellumResult<Cursor<Tuple>> {
        let cursor = self.run_query(query)?;
        self.db.tracker.record_cursor();
        Ok(cursor)
    }

    fn run_query(&self, query: &QueryDescriptor) -> VellumResult<Cursor<Tuple>> {
        self.db.tracker.record_query();
        self.db.executor.execute(&self.snapshot, query)
    }

    /// History of an entity. An entity without visible revisions yields `[]`.
    pub fn entity_history(
        &self,
        entity_id: impl Into<Value>,
        options: &HistoryOptions,
    ) -> VellumResult<Vec<HistoryEntry>> {
        self.history_cursor(entity_id, options)?.collect_all()
    }

    /// History of an entity, lazily.
    pub fn open_entity_history(
        &self,
        entity_id: impl Into<Value>,
        options: &HistoryOptions,
    ) -> VellumResult<Cursor<HistoryEntry>> {
        let cursor = self.history_cursor(entity_id, options)?;
        self.db.tracker.record_cursor();
        Ok(cursor)
    }

    fn history_cursor(
        &self,
        entity_id: impl Into<Value>,
        options: &HistoryOptions,
    ) -> VellumResult<Cursor<HistoryEntry>> {
        let entity_id = EntityId::coerce(entity_id)?;
        self.db.tracker.record_history();
        HistoryTraverser::new(self.db.config.cursor_batch_size).open(&self.snapshot, &entity_id, options)
    }

    /// History options seeded from the database config.
    pub fn default_history_options(&self) -> HistoryOptions {
        self.db.config.history_options()
    }

    pub fn valid_time(&self) -> Timestamp {
        self.snapshot.valid_time()
    }

    pub fn transaction_time(&self) -> Timestamp {
        self.snapshot.transaction_time()
    }

    /// Latest transaction visible to this datasource
    pub fn basis(&self) -> Option<TxId> {
        self.snapshot.basis()
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    /// Decode an entity id received over the wire.
    pub fn entity_from_wire(&self, bytes: &[u8]) -> VellumResult<EntityId> {
        Ok(self.db.codec.decode_entity_id(bytes)?)
    }

    /// Resolve an entity and encode its document state for the wire.
    pub fn encode_entity(&self, entity_id: impl Into<Value>) -> VellumResult<Vec<u8>> {
        let state = self.entity(entity_id)?;
        Ok(self.db.codec.encode_document(&state)?)
    }

    /// Release the snapshot. Dropping the datasource does the same.
    pub fn close(self) {}
}

impl Drop for Datasource {
    fn drop(&mut self) {
        self.db.tracker.record_datasource_closed();
        debug!(
            target: "vellum::db",
            valid_time = %self.snapshot.valid_time(),
            transaction_time = %self.snapshot.transaction_time(),
            "Datasource closed"
        );
    }
}

impl std::fmt::Debug for Datasource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Datasource").field("snapshot", &self.snapshot).finish()
    }
}
