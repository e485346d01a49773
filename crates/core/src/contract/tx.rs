//! Transaction identity
//!
//! Every revision is recorded under exactly one transaction. Transactions
//! are identified by a monotonically increasing [`TxId`] and carry the
//! transaction time at which they were applied.

use serde::{Deserialize, Serialize};

use super::Timestamp;

/// Monotonically increasing transaction identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TxId(u64);

impl TxId {
    /// Create a transaction id from its raw value
    #[inline]
    pub const fn new(id: u64) -> Self {
        TxId(id)
    }

    /// Raw numeric value
    #[inline]
    pub const fn as_u64(&self) -> u64 {
        self.0
    }

    /// The id following this one.
    pub const fn next(&self) -> Self {
        TxId(self.0.saturating_add(1))
    }
}

impl std::fmt::Display for TxId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "tx:{}", self.0)
    }
}

impl From<u64> for TxId {
    fn from(id: u64) -> Self {
        TxId(id)
    }
}

/// Id and time of one applied transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TxMetadata {
    /// Transaction id
    pub tx_id: TxId,
    /// Transaction time the store assigned on apply
    pub tx_time: Timestamp,
}

impl TxMetadata {
    /// Create transaction metadata
    pub const fn new(tx_id: TxId, tx_time: Timestamp) -> Self {
        TxMetadata { tx_id, tx_time }
    }
}
