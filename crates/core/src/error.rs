//! Error types for Vellum
//!
//! Every fallible operation on the read path returns [`VellumResult`].
//! We use `thiserror` for `Display` and `Error` implementations.
//!
//! No variant is retried internally: backend and codec failures propagate
//! to the caller unchanged.

use thiserror::Error;

use crate::codec::CodecError;
use crate::contract::{EntityId, Timestamp};

/// Result type alias for Vellum operations
pub type VellumResult<T> = std::result::Result<T, VellumError>;

/// Error type for the Vellum read path
#[derive(Debug, Error)]
pub enum VellumError {
    /// Caller-supplied value cannot be coerced into an entity id
    #[error("Malformed entity id: {reason}")]
    MalformedEntityId {
        /// What was wrong with the input
        reason: String,
    },

    /// No revision of the entity is visible in the snapshot
    #[error("Entity not found: {entity_id}")]
    EntityNotFound {
        /// The entity that was looked up
        entity_id: EntityId,
    },

    /// Snapshot bind time lies outside what the store can serve
    #[error("Invalid time range: requested {requested}, earliest available {earliest}")]
    InvalidTimeRange {
        /// Requested valid or transaction time
        requested: Timestamp,
        /// Earliest time the store retains
        earliest: Timestamp,
    },

    /// `try_next` on a closed or exhausted cursor
    #[error("Cursor is closed")]
    CursorClosed,

    /// Two threads called into the same cursor at once
    #[error("Concurrent access to a single-consumer cursor")]
    ConcurrentAccess,

    /// Failure reported by the revision store or query executor
    #[error("Backend I/O error: {message}")]
    BackendIo {
        /// Backend-provided description
        message: String,
    },

    /// Query descriptor the executor cannot run
    #[error("Invalid query: {reason}")]
    InvalidQuery {
        /// Why the query was rejected
        reason: String,
    },

    /// Wire encode/decode failure
    #[error("Codec error: {0}")]
    Codec(#[from] CodecError),

    /// Configuration load or validation failure
    #[error("Configuration error: {message}")]
    Config {
        /// Description of the problem
        message: String,
    },
}

impl VellumError {
    pub fn malformed_id(reason: impl Into<String>) -> Self {
        VellumError::MalformedEntityId { reason: reason.into() }
    }

    pub fn not_found(entity_id: EntityId) -> Self {
        VellumError::EntityNotFound { entity_id }
    }

    pub fn backend(message: impl Into<String>) -> Self {
        VellumError::BackendIo { message: message.into() }
    }

    pub fn invalid_query(reason: impl Into<String>) -> Self {
        VellumError::InvalidQuery { reason: reason.into() }
    }

    pub fn config(message: impl Into<String>) -> Self {
        VellumError::Config { message: message.into() }
    }

    /// True for `EntityNotFound`
    pub fn is_not_found(&self) -> bool {
        matches!(self, VellumError::EntityNotFound { .. })
    }

    /// True for errors raised by the cursor state machine
    pub fn is_cursor_error(&self) -> bool {
        matches!(self, VellumError::CursorClosed | VellumError::ConcurrentAccess)
    }
}

impl From<std::io::Error> for VellumError {
    fn from(e: std::io::Error) -> Self {
        VellumError::BackendIo { message: e.to_string() }
    }
}

impl From<serde_json::Error> for VellumError {
    fn from(e: serde_json::Error) -> Self {
        VellumError::Codec(CodecError::Decode(e.to_string()))
    }
}
