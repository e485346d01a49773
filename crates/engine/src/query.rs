//! Query execution against a snapshot
//!
//! [`QueryExecutor`] is the seam a database is built with. The bundled
//! [`ScanExecutor`] answers a single query shape, the entity table scan:
//! every entity known to the snapshot's view is resolved as of the
//! snapshot, filtered on attribute equality and projected to a tuple.
//!
//! Rows are produced lazily in entity-id order. Each batch of entities is
//! resolved first and its documents hydrated with one store call.

use std::collections::VecDeque;
use tracing::debug;

use vellum_core::{DocumentState, EntityId, Value, VellumError, VellumResult};

use crate::cursor::{Cursor, CursorSource};
use crate::resolve::{hydrate, EntityResolver};
use crate::snapshot::Snapshot;

/// One result row, in the order of the query's columns.
pub type Tuple = Vec<Value>;

/// Reserved column projecting the entity id as a `Value::Reference`.
pub const ID_COLUMN: &str = "_id";

/// Table-scan query: projection, equality filters and an optional limit.
///
/// ```
/// use vellum_engine::QueryDescriptor;
///
/// let q = QueryDescriptor::select(["_id", "name"])
///     .filter("team", "storage")
///     .limit(10);
/// assert_eq!(q.columns, vec!["_id", "name"]);
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct QueryDescriptor {
    pub columns: Vec<String>,
    pub filters: Vec<(String, Value)>,
    pub limit: Option<usize>,
}

impl QueryDescriptor {
    pub fn select<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        QueryDescriptor {
            columns: columns.into_iter().map(Into::into).collect(),
            ..Default::default()
        }
    }

    /// Keep rows whose attribute equals `value`.
    pub fn filter(mut self, attr: impl Into<String>, value: impl Into<Value>) -> Self {
        self.filters.push((attr.into(), value.into()));
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// Turns a query descriptor into result tuples against a bound snapshot.
pub trait QueryExecutor: Send + Sync {
    fn execute(&self, snapshot: &Snapshot, query: &QueryDescriptor) -> VellumResult<Cursor<Tuple>>;
}

/// Scan-based executor for [`QueryDescriptor`]s.
#[derive(Debug, Clone, Copy)]
pub struct ScanExecutor {
    batch_size: usize,
}

impl Default for ScanExecutor {
    fn default() -> Self {
        Self::new(128)
    }
}

impl ScanExecutor {
    /// `batch_size` bounds the entities resolved per pull.
    pub fn new(batch_size: usize) -> Self {
        ScanExecutor {
            batch_size: batch_size.max(1),
        }
    }
}

enum Filter {
    Id(EntityId),
    Attr(String, Value),
}

impl Filter {
    fn matches(&self, entity_id: &EntityId, state: &DocumentState) -> bool {
        match self {
            Filter::Id(id) => id == entity_id,
            Filter::Attr(attr, value) => state
                .as_live()
                .and_then(|doc| doc.get(attr))
                .map_or(false, |v| v == value),
        }
    }
}

/// Reject descriptors the scan cannot answer and compile the filters.
fn compile(query: &QueryDescriptor) -> VellumResult<Vec<Filter>> {
    if query.columns.is_empty() {
        return Err(VellumError::invalid_query("query selects no columns"));
    }
    if query.columns.iter().any(|c| c.is_empty()) {
        return Err(VellumError::invalid_query("column names must not be empty"));
    }
    query
        .filters
        .iter()
        .map(|(attr, value)| match attr.as_str() {
            "" => Err(VellumError::invalid_query("filter attribute must not be empty")),
            ID_COLUMN => EntityId::coerce(value.clone())
                .map(Filter::Id)
                .map_err(|e| VellumError::invalid_query(format!("bad {} filter: {}", ID_COLUMN, e))),
            _ => Ok(Filter::Attr(attr.clone(), value.clone())),
        })
        .collect()
}

impl QueryExecutor for ScanExecutor {
    fn execute(&self, snapshot: &Snapshot, query: &QueryDescriptor) -> VellumResult<Cursor<Tuple>> {
        let filters = compile(query)?;
        let ids: VecDeque<EntityId> = snapshot.view().entity_ids()?.into();
        debug!(
            target: "vellum::query",
            columns = query.columns.len(),
            filters = filters.len(),
            limit = ?query.limit,
            entities = ids.len(),
            "Executing scan"
        );
        Ok(Cursor::new(
            "query",
            ScanSource {
                snapshot: snapshot.clone(),
                columns: query.columns.clone(),
                filters,
                remaining: query.limit,
                ids,
                batch_size: self.batch_size,
            },
        ))
    }
}

struct ScanSource {
    snapshot: Snapshot,
    columns: Vec<String>,
    filters: Vec<Filter>,
    /// Rows still allowed by the limit
    remaining: Option<usize>,
    ids: VecDeque<EntityId>,
    batch_size: usize,
}

impl ScanSource {
    fn project(&self, entity_id: &EntityId, state: &DocumentState) -> Tuple {
        self.columns
            .iter()
            .map(|column| {
                if column == ID_COLUMN {
                    return Value::Reference(entity_id.clone());
                }
                state
                    .as_live()
                    .and_then(|doc| doc.get(column))
                    .cloned()
                    .unwrap_or(Value::Null)
            })
            .collect()
    }
}

impl CursorSource<Tuple> for ScanSource {
    fn next_batch(&mut self) -> VellumResult<Option<Vec<Tuple>>> {
        if self.ids.is_empty() || self.remaining == Some(0) {
            return Ok(None);
        }

        let take = self.batch_size.min(self.ids.len());
        let mut live = Vec::with_capacity(take);
        for entity_id in self.ids.drain(..take) {
            let Some(rev) = EntityResolver.resolve_revision(&self.snapshot, &entity_id)? else {
                continue;
            };
            if !rev.is_tombstone() {
                live.push(rev);
            }
        }

        let mut rows = Vec::new();
        for (rev, state) in hydrate(self.snapshot.view().as_ref(), live)? {
            let Some(state) = state else { continue };
            if !self.filters.iter().all(|f| f.matches(&rev.entity_id, &state)) {
                continue;
            }
            if let Some(remaining) = self.remaining.as_mut() {
                if *remaining == 0 {
                    break;
                }
                *remaining -= 1;
            }
            rows.push(self.project(&rev.entity_id, &state));
        }
        Ok(Some(rows))
    }
}
