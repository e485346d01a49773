//! Wire codec trait definitions.

use crate::contract::EntityId;
use crate::document::DocumentState;

/// Wire codec trait.
///
/// Converts entity ids and document bodies to and from bytes at process
/// boundaries. Nothing inside the engine depends on a wire format.
///
/// # Thread Safety
///
/// Codecs must be `Send + Sync` so one instance can serve every
/// datasource of a database.
///
/// # Entity ids
///
/// Encoders write the id in its original form (string, integer, UUID or
/// content hash) so that decoding yields an equal [`EntityId`].
pub trait WireCodec: Send + Sync {
    /// Unique codec identifier, e.g. `"json"`.
    fn codec_id(&self) -> &str;

    fn encode_entity_id(&self, id: &EntityId) -> Result<Vec<u8>, CodecError>;

    fn decode_entity_id(&self, bytes: &[u8]) -> Result<EntityId, CodecError>;

    fn encode_document(&self, state: &DocumentState) -> Result<Vec<u8>, CodecError>;

    fn decode_document(&self, bytes: &[u8]) -> Result<DocumentState, CodecError>;
}

/// Codec errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CodecError {
    /// Value cannot be represented in the wire format.
    #[error("Encode error: {0}")]
    Encode(String),

    /// Bytes are not a valid encoding.
    #[error("Decode error: {0}")]
    Decode(String),

    /// Unknown codec identifier.
    #[error("Unknown codec: {0}")]
    UnknownCodec(String),
}
