//! Read-path counters
//!
//! [`ReadTracker`] lives inside a database and is bumped by every datasource
//! it opens. Counters are relaxed atomics; [`ReadMetrics`] is a point-in-time
//! copy and may mix values observed at slightly different moments.

use std::sync::atomic::{AtomicU64, Ordering};

/// Atomic counters for one database.
#[derive(Debug, Default)]
pub struct ReadTracker {
    datasources_opened: AtomicU64,
    active_datasources: AtomicU64,
    cursors_opened: AtomicU64,
    entity_reads: AtomicU64,
    history_traversals: AtomicU64,
    queries_executed: AtomicU64,
}

impl ReadTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record_datasource_opened(&self) {
        self.datasources_opened.fetch_add(1, Ordering::Relaxed);
        self.active_datasources.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_datasource_closed(&self) {
        self.active_datasources.fetch_sub(1, Ordering::Relaxed);
    }

    pub(crate) fn record_cursor(&self) {
        self.cursors_opened.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_entity_read(&self) {
        self.entity_reads.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_history(&self) {
        self.history_traversals.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_query(&self) {
        self.queries_executed.fetch_add(1, Ordering::Relaxed);
    }

    /// Datasources currently open
    pub fn active_datasources(&self) -> u64 {
        self.active_datasources.load(Ordering::Relaxed)
    }

    pub fn metrics(&self) -> ReadMetrics {
        ReadMetrics {
            datasources_opened: self.datasources_opened.load(Ordering::Relaxed),
            active_datasources: self.active_datasources.load(Ordering::Relaxed),
            cursors_opened: self.cursors_opened.load(Ordering::Relaxed),
            entity_reads: self.entity_reads.load(Ordering::Relaxed),
            history_traversals: self.history_traversals.load(Ordering::Relaxed),
            queries_executed: self.queries_executed.load(Ordering::Relaxed),
        }
    }
}

/// Snapshot of [`ReadTracker`] counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReadMetrics {
    /// Total datasources opened
    pub datasources_opened: u64,
    /// Datasources not yet closed or dropped
    pub active_datasources: u64,
    /// Cursors handed out by `open_*` methods
    pub cursors_opened: u64,
    /// `entity` and `entity_tx` calls
    pub entity_reads: u64,
    /// History traversals, materialized or lazy
    pub history_traversals: u64,
    /// Queries executed, materialized or lazy
    pub queries_executed: u64,
}

impl ReadMetrics {
    /// Datasources that were closed or dropped
    pub fn datasources_closed(&self) -> u64 {
        self.datasources_opened - self.active_datasources
    }

    /// Reads of any kind
    pub fn total_reads(&self) -> u64 {
        self.entity_reads + self.history_traversals + self.queries_executed
    }
}
