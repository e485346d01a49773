//! Contract types shared by every layer
//!
//! These types define what the read path promises to callers:
//!
//! - `timestamp`: the unit of both time axes
//! - `tx`: transaction identity (`TxId`, `TxMetadata`)
//! - `entity_id`: coerced, canonical entity identity
//!
//! ## Usage
//!
//! ```
//! use vellum_core::contract::{EntityId, Timestamp, TxId, TxMetadata};
//! ```

pub mod entity_id;
pub mod timestamp;
pub mod tx;

pub use entity_id::EntityId;
pub use timestamp::Timestamp;
pub use tx::{TxId, TxMetadata};
