//! Closable, pull-based cursors
//!
//! A [`Cursor`] drains a [`CursorSource`] batch by batch. It has two
//! states:
//!
//! ```text
//! Open --try_next--> Open        (yields an item)
//! Open --exhausted--> Closed     (yields Ok(None) once, source released)
//! Open --close/drop--> Closed    (source released)
//! Closed --try_next--> Err(CursorClosed)
//! ```
//!
//! # Single consumer
//!
//! A cursor is `Send + Sync`, but only one call may be inside it at a time.
//! Overlapping `try_next`/`close` calls from two threads are rejected with
//! `ConcurrentAccess` instead of blocking.
//!
//! # Errors
//!
//! A source error closes the cursor (releasing the source) and is returned
//! to the caller unchanged.

use parking_lot::Mutex;
use std::collections::VecDeque;
use std::iter::FusedIterator;
use tracing::{debug, trace};

use vellum_core::{VellumError, VellumResult};

/// Producer behind a cursor.
///
/// Dropping the source must release every backend resource it holds.
pub trait CursorSource<T>: Send {
    /// Next batch of items, or `None` once exhausted.
    ///
    /// Empty batches are allowed and skipped.
    fn next_batch(&mut self) -> VellumResult<Option<Vec<T>>>;
}

impl<T, F> CursorSource<T> for F
where
    F: FnMut() -> VellumResult<Option<Vec<T>>> + Send,
{
    fn next_batch(&mut self) -> VellumResult<Option<Vec<T>>> {
        self()
    }
}

enum State<T> {
    Open {
        source: Box<dyn CursorSource<T>>,
        buffer: VecDeque<T>,
        yielded: u64,
    },
    Closed,
}

/// Scoped lazy sequence with explicit close.
pub struct Cursor<T> {
    label: &'static str,
    state: Mutex<State<T>>,
}

impl<T> Cursor<T> {
    /// Wrap a source. `label` names the cursor in trace output.
    pub fn new(label: &'static str, source: impl CursorSource<T> + 'static) -> Self {
        trace!(target: "vellum::cursor", cursor = label, "Cursor opened");
        Cursor {
            label,
            state: Mutex::new(State::Open {
                source: Box::new(source),
                buffer: VecDeque::new(),
                yielded: 0,
            }),
        }
    }

    /// Cursor over items that are already materialized.
    pub fn from_vec(label: &'static str, items: Vec<T>) -> Self
    where
        T: Send + 'static,
    {
        let mut items = Some(items);
        Self::new(label, move || Ok::<_, VellumError>(items.take()))
    }

    /// Next item, `Ok(None)` once at exhaustion.
    ///
    /// # Errors
    ///
    /// - `CursorClosed` after close or exhaustion
    /// - `ConcurrentAccess` if another call is in progress
    /// - any error raised by the source (the cursor is closed first)
    pub fn try_next(&self) -> VellumResult<Option<T>> {
        let mut state = self.state.try_lock().ok_or(VellumError::ConcurrentAccess)?;
        Self::advance(self.label, &mut state, true)
    }

    /// Release the source. Idempotent.
    ///
    /// # Errors
    ///
    /// `ConcurrentAccess` if another call is in progress.
    pub fn close(&self) -> VellumResult<()> {
        let mut state = self.state.try_lock().ok_or(VellumError::ConcurrentAccess)?;
        Self::release(self.label, &mut state, "closed");
        Ok(())
    }

    /// Whether the cursor has been closed or exhausted.
    ///
    /// Waits for an in-progress call to finish.
    pub fn is_closed(&self) -> bool {
        matches!(*self.state.lock(), State::Closed)
    }

    /// Drain the remaining items.
    pub fn collect_all(&self) -> VellumResult<Vec<T>> {
        let mut out = Vec::new();
        while let Some(item) = self.try_next()? {
            out.push(item);
        }
        Ok(out)
    }

    fn advance(label: &'static str, state: &mut State<T>, strict: bool) -> VellumResult<Option<T>> {
        loop {
            let State::Open { source, buffer, yielded } = state else {
                return if strict { Err(VellumError::CursorClosed) } else { Ok(None) };
            };
            if let Some(item) = buffer.pop_front() {
                *yielded += 1;
                return Ok(Some(item));
            }
            match source.next_batch() {
                Ok(Some(batch)) => {
                    trace!(target: "vellum::cursor", cursor = label, batch = batch.len(), "Fetched batch");
                    buffer.extend(batch);
                }
                Ok(None) => {
                    Self::release(label, state, "exhausted");
                    return Ok(None);
                }
                Err(e) => {
                    Self::release(label, state, "failed");
                    return Err(e);
                }
            }
        }
    }

    fn release(label: &'static str, state: &mut State<T>, reason: &'static str) {
        if let State::Open { yielded, buffer, .. } = state {
            debug!(
                target: "vellum::cursor",
                cursor = label,
                yielded = *yielded,
                unconsumed = buffer.len(),
                reason,
                "Cursor released"
            );
            *state = State::Closed;
        }
    }
}

impl<T> Iterator for Cursor<T> {
    type Item = VellumResult<T>;

    fn next(&mut self) -> Option<Self::Item> {
        let label = self.label;
        Self::advance(label, self.state.get_mut(), false).transpose()
    }
}

impl<T> FusedIterator for Cursor<T> {}

impl<T> Drop for Cursor<T> {
    fn drop(&mut self) {
        let label = self.label;
        Self::release(label, self.state.get_mut(), "dropped");
    }
}

impl<T> std::fmt::Debug for Cursor<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let open = self
            .state
            .try_lock()
            .map(|s| matches!(*s, State::Open { .. }));
        f.debug_struct("Cursor")
            .field("label", &self.label)
            .field("open", &open)
            .finish()
    }
}
