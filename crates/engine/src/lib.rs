//! Read engine for Vellum
//!
//! This crate answers reads against a bitemporal revision store:
//! - Snapshot: one fixed (valid time, transaction time) point of view
//! - EntityResolver: what an entity looked like as of a snapshot
//! - HistoryTraverser: how an entity changed, collapsed or with corrections
//! - Cursor: closable lazy sequences handed out by every `open_*` method
//! - ScanExecutor: entity table scans behind the `QueryExecutor` seam
//! - Database / Datasource: the exposed surface, with deprecated aliases
//!
//! Storage, wire formats and the document model live in `vellum-core` and
//! `vellum-storage`; the engine only filters and orders what a store
//! returns.

#![warn(clippy::all)]

pub mod cursor;
pub mod database;
pub mod datasource;
pub mod history;
pub mod metrics;
pub mod query;
pub mod resolve;
pub mod snapshot;

pub use cursor::{Cursor, CursorSource};
pub use database::{Database, DatabaseBuilder, VellumConfig, CONFIG_FILE_NAME};
pub use datasource::Datasource;
pub use history::HistoryTraverser;
pub use metrics::{ReadMetrics, ReadTracker};
pub use query::{QueryDescriptor, QueryExecutor, ScanExecutor, Tuple, ID_COLUMN};
pub use resolve::EntityResolver;
pub use snapshot::{Snapshot, SnapshotResolver};
