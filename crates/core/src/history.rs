//! History traversal options and results
//!
//! ## Modes
//!
//! - **Collapsed** (`with_corrections = false`): one entry per distinct
//!   valid time, the latest-recorded revision for it.
//! - **Full** (`with_corrections = true`): every revision, corrections
//!   included.
//!
//! ## Ranges
//!
//! [`TimeRange`] is half-open: `start <= t < end`, with either bound
//! optional. Ranges narrow a snapshot's view and never widen it.

use serde::{Deserialize, Serialize};

use crate::contract::{EntityId, Timestamp, TxId};
use crate::document::{ContentHash, DocumentState};
use crate::revision::Revision;

/// Order of history entries by valid time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    #[default]
    Ascending,
    Descending,
}

impl Direction {
    pub fn is_descending(&self) -> bool {
        matches!(self, Direction::Descending)
    }
}

impl std::str::FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ascending" | "asc" => Ok(Direction::Ascending),
            "descending" | "desc" => Ok(Direction::Descending),
            other => Err(format!("unknown direction '{}'", other)),
        }
    }
}

/// Half-open time interval `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TimeRange {
    pub start: Option<Timestamp>,
    pub end: Option<Timestamp>,
}

impl TimeRange {
    /// Unbounded on both sides
    pub const fn all() -> Self {
        TimeRange { start: None, end: None }
    }

    pub const fn between(start: Timestamp, end: Timestamp) -> Self {
        TimeRange { start: Some(start), end: Some(end) }
    }

    /// `[start, ∞)`
    pub const fn starting_at(start: Timestamp) -> Self {
        TimeRange { start: Some(start), end: None }
    }

    /// `[-∞, end)`
    pub const fn until(end: Timestamp) -> Self {
        TimeRange { start: None, end: Some(end) }
    }

    pub fn contains(&self, t: Timestamp) -> bool {
        self.start.map_or(true, |s| s <= t) && self.end.map_or(true, |e| t < e)
    }
}

/// Options for one history traversal.
///
/// ```
/// use vellum_core::{Direction, HistoryOptions, TimeRange, Timestamp};
///
/// let opts = HistoryOptions::new()
///     .descending()
///     .with_docs(true)
///     .valid_time_range(TimeRange::starting_at(Timestamp::from_secs(10)));
/// assert_eq!(opts.direction, Direction::Descending);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct HistoryOptions {
    pub direction: Direction,
    pub with_docs: bool,
    pub with_corrections: bool,
    pub valid_time_range: Option<TimeRange>,
    pub transaction_time_range: Option<TimeRange>,
}

impl HistoryOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ascending(self) -> Self {
        self.direction(Direction::Ascending)
    }

    pub fn descending(self) -> Self {
        self.direction(Direction::Descending)
    }

    pub fn direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    pub fn with_docs(mut self, with_docs: bool) -> Self {
        self.with_docs = with_docs;
        self
    }

    pub fn with_corrections(mut self, with_corrections: bool) -> Self {
        self.with_corrections = with_corrections;
        self
    }

    pub fn valid_time_range(mut self, range: TimeRange) -> Self {
        self.valid_time_range = Some(range);
        self
    }

    pub fn transaction_time_range(mut self, range: TimeRange) -> Self {
        self.transaction_time_range = Some(range);
        self
    }

    /// Whether a revision passes both range filters
    pub fn admits(&self, rev: &Revision) -> bool {
        self.valid_time_range.map_or(true, |r| r.contains(rev.valid_time))
            && self
                .transaction_time_range
                .map_or(true, |r| r.contains(rev.transaction_time))
    }
}

/// One element of a history sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub valid_time: Timestamp,
    pub transaction_time: Timestamp,
    pub transaction_id: TxId,
    pub content_hash: ContentHash,
    /// Present only when the traversal asked for documents
    pub document: Option<DocumentState>,
}

impl HistoryEntry {
    /// Metadata-only entry for a revision
    pub fn from_revision(rev: &Revision) -> Self {
        HistoryEntry {
            valid_time: rev.valid_time,
            transaction_time: rev.transaction_time,
            transaction_id: rev.transaction_id,
            content_hash: rev.content_hash,
            document: None,
        }
    }
}

/// Transaction metadata of the revision an entity resolves to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityTx {
    pub entity_id: EntityId,
    pub valid_time: Timestamp,
    pub transaction_time: Timestamp,
    pub transaction_id: TxId,
    pub content_hash: ContentHash,
}

impl From<&Revision> for EntityTx {
    fn from(rev: &Revision) -> Self {
        EntityTx {
            entity_id: rev.entity_id.clone(),
            valid_time: rev.valid_time,
            transaction_time: rev.transaction_time,
            transaction_id: rev.transaction_id,
            content_hash: rev.content_hash,
        }
    }
}
