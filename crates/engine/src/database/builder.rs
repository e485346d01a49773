//! Database builder for fluent configuration
//!
//! Collaborators are injected here; nothing is looked up by name at runtime.

use std::path::Path;
use std::sync::Arc;

use vellum_core::{JsonCodec, RevisionStore, VellumResult, WireCodec};

use super::config::VellumConfig;
use super::Database;
use crate::query::{QueryExecutor, ScanExecutor};

/// Builder for [`Database`].
///
/// ```
/// use std::sync::Arc;
/// use vellum_core::{MsgPackCodec, WireCodec};
/// use vellum_engine::{Database, ScanExecutor, VellumConfig};
/// use vellum_storage::MemoryRevisionStore;
///
/// let db = Database::builder(Arc::new(MemoryRevisionStore::new()))
///     .executor(Arc::new(ScanExecutor::new(32)))
///     .codec(Arc::new(MsgPackCodec))
///     .config(VellumConfig::default())
///     .build()
///     .unwrap();
/// assert_eq!(db.codec().codec_id(), "msgpack");
/// ```
pub struct DatabaseBuilder {
    store: Arc<dyn RevisionStore>,
    executor: Option<Arc<dyn QueryExecutor>>,
    codec: Option<Arc<dyn WireCodec>>,
    config: VellumConfig,
}

impl DatabaseBuilder {
    pub fn new(store: Arc<dyn RevisionStore>) -> Self {
        Self {
            store,
            executor: None,
            codec: None,
            config: VellumConfig::default(),
        }
    }

    /// Query executor. Defaults to a [`ScanExecutor`] using the configured
    /// cursor batch size.
    pub fn executor(mut self, executor: Arc<dyn QueryExecutor>) -> Self {
        self.executor = Some(executor);
        self
    }

    /// Wire codec for the edge helpers. Defaults to [`JsonCodec`].
    pub fn codec(mut self, codec: Arc<dyn WireCodec>) -> Self {
        self.codec = Some(codec);
        self
    }

    pub fn config(mut self, config: VellumConfig) -> Self {
        self.config = config;
        self
    }

    /// Load config from `path`, writing the default file first if it is
    /// missing.
    pub fn config_from_file(mut self, path: &Path) -> VellumResult<Self> {
        VellumConfig::write_default_if_missing(path)?;
        self.config = VellumConfig::from_file(path)?;
        Ok(self)
    }

    /// Build the database.
    ///
    /// # Errors
    ///
    /// `Config` if the configuration does not validate.
    pub fn build(self) -> VellumResult<Database> {
        self.config.validate()?;
        let batch_size = self.config.cursor_batch_size;
        let executor = self
            .executor
            .unwrap_or_else(|| Arc::new(ScanExecutor::new(batch_size)));
        let codec = self.codec.unwrap_or_else(|| Arc::new(JsonCodec));
        Ok(Database::from_parts(self.store, executor, codec, self.config))
    }
}
