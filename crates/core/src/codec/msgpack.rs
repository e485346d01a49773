//! MessagePack wire codec.
//!
//! Uses the serde representation of [`EntityId`] and [`DocumentState`]
//! directly; every variant is self-describing, so no tagging layer is needed.

use super::traits::{CodecError, WireCodec};
use crate::contract::EntityId;
use crate::document::DocumentState;

/// Compact binary codec backed by `rmp-serde`.
#[derive(Debug, Clone, Copy, Default)]
pub struct MsgPackCodec;

impl WireCodec for MsgPackCodec {
    fn codec_id(&self) -> &str {
        "msgpack"
    }

    fn encode_entity_id(&self, id: &EntityId) -> Result<Vec<u8>, CodecError> {
        rmp_serde::to_vec_named(id).map_err(|e| CodecError::Encode(e.to_string()))
    }

    fn decode_entity_id(&self, bytes: &[u8]) -> Result<EntityId, CodecError> {
        rmp_serde::from_slice(bytes).map_err(|e| CodecError::Decode(e.to_string()))
    }

    fn encode_document(&self, state: &DocumentState) -> Result<Vec<u8>, CodecError> {
        rmp_serde::to_vec_named(state).map_err(|e| CodecError::Encode(e.to_string()))
    }

    fn decode_document(&self, bytes: &[u8]) -> Result<DocumentState, CodecError> {
        rmp_serde::from_slice(bytes).map_err(|e| CodecError::Decode(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contract::Timestamp;
    use crate::document::Document;
    use crate::value::Value;

    #[test]
    fn test_document_with_every_kind() {
        let doc = Document::new()
            .with("s", "x")
            .with("i", -1i64)
            .with("f", 0.5)
            .with("b", vec![0u8, 255])
            .with("t", Timestamp::from_secs(1))
            .with("r", EntityId::Int(9))
            .with("a", Value::Array(vec![Value::Null, Value::Bool(true)]));
        let state = DocumentState::Live(doc);
        let bytes = MsgPackCodec.encode_document(&state).unwrap();
        assert_eq!(MsgPackCodec.decode_document(&bytes).unwrap(), state);
    }

    #[test]
    fn test_hashed_entity_id() {
        let id = EntityId::coerce(Value::Array(vec![Value::from("k")])).unwrap();
        let bytes = MsgPackCodec.encode_entity_id(&id).unwrap();
        assert_eq!(MsgPackCodec.decode_entity_id(&bytes).unwrap(), id);
    }

    #[test]
    fn test_garbage_is_a_decode_error() {
        let err = MsgPackCodec.decode_entity_id(&[0xc1]).unwrap_err();
        assert!(matches!(err, CodecError::Decode(_)));
    }
}
