//! Core types and traits for Vellum
//!
//! This crate defines the foundational types used throughout the system:
//! - Timestamp, TxId, TxMetadata: the two time axes and transaction identity
//! - EntityId: coerced, canonical entity identity
//! - Value, Document, DocumentState, ContentHash: the document model
//! - Revision: one immutable bitemporal fact
//! - HistoryOptions, HistoryEntry, EntityTx: history traversal types
//! - VellumError: error type hierarchy
//! - Traits: collaborator seams (RevisionStore, RevisionView, RevisionStream)
//! - Codecs: wire formats for ids and documents

#![warn(clippy::all)]

pub mod codec;
pub mod contract;
pub mod document;
pub mod error;
pub mod history;
pub mod revision;
pub mod traits;
pub mod value;

pub use codec::{CodecError, JsonCodec, MsgPackCodec, WireCodec};
pub use contract::{EntityId, Timestamp, TxId, TxMetadata};
pub use document::{ContentHash, Document, DocumentState};
pub use error::{VellumError, VellumResult};
pub use history::{Direction, EntityTx, HistoryEntry, HistoryOptions, TimeRange};
pub use revision::Revision;
pub use traits::{RevisionStore, RevisionStream, RevisionView, VecRevisionStream};
pub use value::Value;
