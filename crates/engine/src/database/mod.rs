//! Database handle and datasource factory
//!
//! A [`Database`] owns the read collaborators:
//!
//! - the revision store (`Arc<dyn RevisionStore>`)
//! - the query executor, [`ScanExecutor`](crate::ScanExecutor) by default
//! - the wire codec, JSON by default
//! - the read-path [`VellumConfig`]
//!
//! It holds no snapshot of its own. Every read goes through a
//! [`Datasource`] bound at open time, which pins one consistent view of the
//! store until it is closed or dropped.
//!
//! ```
//! use std::sync::Arc;
//! use vellum_core::{Document, DocumentState, Timestamp};
//! use vellum_engine::Database;
//! use vellum_storage::{MemoryRevisionStore, WriteOp};
//!
//! let store = MemoryRevisionStore::new();
//! store
//!     .transact_at(
//!         Timestamp::from_secs(10),
//!         vec![WriteOp::put("alice", Document::new().with("role", "admin"))],
//!     )
//!     .unwrap();
//!
//! let db = Database::new(Arc::new(store));
//! let ds = db.datasource().unwrap();
//! let state = ds.entity("alice").unwrap();
//! assert_eq!(state.as_live().and_then(|d| d.get("role")).and_then(|v| v.as_str()), Some("admin"));
//! ds.close();
//! ```

mod builder;
pub mod config;

pub use builder::DatabaseBuilder;
pub use config::{VellumConfig, CONFIG_FILE_NAME};

use std::sync::Arc;
use tracing::debug;

use vellum_core::{RevisionStore, Timestamp, VellumResult, WireCodec};

use crate::datasource::Datasource;
use crate::metrics::{ReadMetrics, ReadTracker};
use crate::query::QueryExecutor;
use crate::snapshot::SnapshotResolver;

pub(crate) struct DatabaseInner {
    pub(crate) store: Arc<dyn RevisionStore>,
    pub(crate) resolver: SnapshotResolver,
    pub(crate) executor: Arc<dyn QueryExecutor>,
    pub(crate) codec: Arc<dyn WireCodec>,
    pub(crate) config: VellumConfig,
    pub(crate) tracker: ReadTracker,
}

/// Read entry point over a revision store.
///
/// Cheap to clone; clones share collaborators and counters.
#[derive(Clone)]
pub struct Database {
    inner: Arc<DatabaseInner>,
}

impl Database {
    /// Database with the default executor, codec and config.
    pub fn new(store: Arc<dyn RevisionStore>) -> Self {
        let config = VellumConfig::default();
        let executor = Arc::new(crate::query::ScanExecutor::new(config.cursor_batch_size));
        Self::from_parts(store, executor, Arc::new(vellum_core::JsonCodec), config)
    }

    pub fn builder(store: Arc<dyn RevisionStore>) -> DatabaseBuilder {
        DatabaseBuilder::new(store)
    }

    pub(crate) fn from_parts(
        store: Arc<dyn RevisionStore>,
        executor: Arc<dyn QueryExecutor>,
        codec: Arc<dyn WireCodec>,
        config: VellumConfig,
    ) -> Self {
        debug!(
            target: "vellum::db",
            codec = codec.codec_id(),
            cursor_batch_size = config.cursor_batch_size,
            "Database created"
        );
        Database {
            inner: Arc::new(DatabaseInner {
                resolver: SnapshotResolver::new(Arc::clone(&store)),
                store,
                executor,
                codec,
                config,
                tracker: ReadTracker::new(),
            }),
        }
    }

    /// Open a datasource bound to a snapshot.
    ///
    /// An omitted transaction time resolves to the latest applied
    /// transaction; an omitted valid time resolves to the transaction time.
    ///
    /// # Errors
    ///
    /// - `InvalidTimeRange` if a requested time precedes the store epoch
    /// - `BackendIo` if the store cannot pin a view
    pub fn open_datasource(
        &self,
        valid_time: Option<Timestamp>,
        transaction_time: Option<Timestamp>,
    ) -> VellumResult<Datasource> {
        let snapshot = self.inner.resolver.bind(valid_time, transaction_time)?;
        self.inner.tracker.record_datasource_opened();
        debug!(
            target: "vellum::db",
            valid_time = %snapshot.valid_time(),
            transaction_time = %snapshot.transaction_time(),
            active = self.inner.tracker.active_datasources(),
            "Opened datasource"
        );
        Ok(Datasource::new(Arc::clone(&self.inner), snapshot))
    }

    /// Datasource at the latest transaction, valid now.
    pub fn datasource(&self) -> VellumResult<Datasource> {
        self.open_datasource(None, None)
    }

    pub fn store(&self) -> &Arc<dyn RevisionStore> {
        &self.inner.store
    }

    pub fn executor(&self) -> &Arc<dyn QueryExecutor> {
        &self.inner.executor
    }

    pub fn codec(&self) -> &Arc<dyn WireCodec> {
        &self.inner.codec
    }

    pub fn config(&self) -> &VellumConfig {
        &self.inner.config
    }

    /// Read counters across every datasource opened from this database.
    pub fn metrics(&self) -> ReadMetrics {
        self.inner.tracker.metrics()
    }
}

impl std::fmt::Debug for Database {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Database")
            .field("codec", &self.inner.codec.codec_id())
            .field("config", &self.inner.config)
            .field("metrics", &self.inner.tracker.metrics())
            .finish()
    }
}
