//! Shared test utilities for the root integration suites.
//!
//! Import via `#[path = "../common/mod.rs"] mod common;` from a suite's main.rs.

#![allow(dead_code)]

use std::sync::{Arc, Once};

pub use vellum::{
    Database, Datasource, Document, DocumentState, HistoryEntry, HistoryOptions,
    MemoryRevisionStore, StoreConfig, Timestamp, TxId, Value, VellumError, WriteOp,
};

static INIT_TRACING: Once = Once::new();

/// Route `vellum::*` traces to the test writer. Honors `RUST_LOG`.
pub fn init_tracing() {
    INIT_TRACING.call_once(|| {
        let filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("vellum=debug"));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init();
    });
}

/// Microsecond timestamp
pub fn ts(micros: u64) -> Timestamp {
    Timestamp::from_micros(micros)
}

pub fn named(name: &str) -> Document {
    Document::new().with("name", name)
}

/// Store and database over the same revisions.
pub struct Fixture {
    pub store: MemoryRevisionStore,
    pub db: Database,
}

impl Fixture {
    pub fn new() -> Self {
        Self::with_config(StoreConfig::default())
    }

    pub fn with_config(config: StoreConfig) -> Self {
        init_tracing();
        let store = MemoryRevisionStore::with_config(config);
        let db = Database::new(Arc::new(store.clone()));
        Fixture { store, db }
    }

    /// Apply one put at (`vt`, `tt`)
    pub fn put(&self, eid: &str, doc: Document, vt: u64, tt: u64) -> TxId {
        self.store
            .transact_at(ts(tt), vec![WriteOp::put(eid, doc).valid_at(ts(vt))])
            .unwrap()
            .tx_id
    }

    /// Apply one tombstone at (`vt`, `tt`)
    pub fn delete(&self, eid: &str, vt: u64, tt: u64) -> TxId {
        self.store
            .transact_at(ts(tt), vec![WriteOp::delete(eid).valid_at(ts(vt))])
            .unwrap()
            .tx_id
    }

    pub fn at(&self, vt: u64, tt: u64) -> Datasource {
        self.db.open_datasource(Some(ts(vt)), Some(ts(tt))).unwrap()
    }
}

/// Revisions (vt1,tt1,A), (vt1,tt2,B), (vt2,tt3,C) for entity "e".
pub fn scenario_e1() -> Fixture {
    let f = Fixture::new();
    f.put("e", named("A"), 1, 1);
    f.put("e", named("B"), 1, 2);
    f.put("e", named("C"), 2, 3);
    f
}

/// (vt, tt) of each entry
pub fn times(entries: &[HistoryEntry]) -> Vec<(u64, u64)> {
    entries
        .iter()
        .map(|e| (e.valid_time.as_micros(), e.transaction_time.as_micros()))
        .collect()
}

/// The `name` attribute of each entry's document
pub fn names(entries: &[HistoryEntry]) -> Vec<String> {
    entries
        .iter()
        .map(|e| match &e.document {
            Some(DocumentState::Live(doc)) => doc
                .get("name")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
            Some(DocumentState::Tombstone) => "-".to_string(),
            None => "?".to_string(),
        })
        .collect()
}
