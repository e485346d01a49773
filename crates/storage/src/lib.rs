//! Storage layer for Vellum
//!
//! This crate implements an in-memory [`RevisionStore`](vellum_core::RevisionStore):
//! - MemoryRevisionStore: DashMap of per-entity revision chains
//! - Content-addressed document store (FxHashMap)
//! - Views pinned at a transaction id, released on drop
//! - Batched, copy-on-write revision streams
//!
//! There is no persistence and no compaction; every revision ever written
//! stays addressable.

#![warn(clippy::all)]

mod chain;
pub mod config;
pub mod store;

pub use config::StoreConfig;
pub use store::{MemoryRevisionStore, StoreStats, WriteOp};
