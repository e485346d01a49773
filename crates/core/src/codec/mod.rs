//! Wire codecs.
//!
//! Codecs convert entity ids and documents at process boundaries. The
//! engine receives one codec at construction and uses it only for the
//! datasource edge helpers.
//!
//! # Known Codecs
//!
//! - `"json"`: tagged JSON, readable and the default
//! - `"msgpack"`: MessagePack via serde
//!
//! # Usage
//!
//! ```
//! use vellum_core::codec::{get_codec, WireCodec};
//! use vellum_core::EntityId;
//!
//! let codec = get_codec("json").unwrap();
//! let bytes = codec.encode_entity_id(&EntityId::from("alice")).unwrap();
//! assert_eq!(codec.decode_entity_id(&bytes).unwrap(), EntityId::from("alice"));
//! ```

mod json;
mod msgpack;
mod traits;

use std::sync::Arc;

pub use json::JsonCodec;
pub use msgpack::MsgPackCodec;
pub use traits::{CodecError, WireCodec};

/// Get a codec by its identifier.
///
/// Returns the codec if recognized, or an error for unknown codec IDs.
pub fn get_codec(codec_id: &str) -> Result<Arc<dyn WireCodec>, CodecError> {
    match codec_id {
        "json" => Ok(Arc::new(JsonCodec)),
        "msgpack" => Ok(Arc::new(MsgPackCodec)),
        _ => Err(CodecError::UnknownCodec(codec_id.to_string())),
    }
}
