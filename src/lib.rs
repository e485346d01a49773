//! Vellum - read core of a bitemporal document store
//!
//! Every revision of a document carries two times: when it is true in the
//! modelled world (valid time) and when the store learned it (transaction
//! time). Vellum answers reads as of any point on both axes.
//!
//! # Quick Start
//!
//! ```
//! use std::sync::Arc;
//! use vellum::{Database, Document, HistoryOptions, MemoryRevisionStore, Timestamp, WriteOp};
//!
//! let store = MemoryRevisionStore::new();
//! let t = Timestamp::from_secs;
//! store.transact_at(t(1), vec![WriteOp::put("alice", Document::new().with("city", "Lyon")).valid_at(t(1))]).unwrap();
//! store.transact_at(t(2), vec![WriteOp::put("alice", Document::new().with("city", "Oslo")).valid_at(t(1))]).unwrap();
//!
//! let db = Database::new(Arc::new(store));
//!
//! // As known at t=1: the original record
//! let then = db.open_datasource(None, Some(t(1))).unwrap();
//! assert_eq!(then.entity("alice").unwrap().as_live().unwrap().get("city").unwrap().as_str(), Some("Lyon"));
//!
//! // Today, with the correction kept in the history
//! let now = db.datasource().unwrap();
//! let history = now.entity_history("alice", &HistoryOptions::new().with_corrections(true)).unwrap();
//! assert_eq!(history.len(), 2);
//! ```
//!
//! # Architecture
//!
//! - `vellum-core`: time, identity, document model, errors, collaborator traits, wire codecs
//! - `vellum-storage`: in-memory revision store with pinned views
//! - `vellum-engine`: snapshots, resolution, history, cursors, queries, `Database`/`Datasource`

pub use vellum_core::{
    CodecError, ContentHash, Direction, Document, DocumentState, EntityId, EntityTx,
    HistoryEntry, HistoryOptions, JsonCodec, MsgPackCodec, Revision, RevisionStore,
    RevisionStream, RevisionView, TimeRange, Timestamp, TxId, TxMetadata, Value, VellumError,
    VellumResult, WireCodec,
};
pub use vellum_engine::{
    Cursor, CursorSource, Database, DatabaseBuilder, Datasource, EntityResolver,
    HistoryTraverser, QueryDescriptor, QueryExecutor, ReadMetrics, ScanExecutor, Snapshot,
    SnapshotResolver, Tuple, VellumConfig, CONFIG_FILE_NAME, ID_COLUMN,
};
pub use vellum_storage::{MemoryRevisionStore, StoreConfig, StoreStats, WriteOp};
