//! JSON wire codec.
//!
//! Plain JSON cannot tell a reference from a string or a timestamp from a
//! number, so non-JSON values travel as single-key tagged objects:
//!
//! | Value | Wire form |
//! |-------|-----------|
//! | `Reference(id)` | `{"vellum/id": <id>}` |
//! | `Timestamp(t)` | `{"vellum/inst": <micros>}` |
//! | `Bytes(b)` | `{"vellum/bytes": "<base64>"}` |
//! | non-finite `Float` | `{"vellum/float": "NaN" \| "Infinity" \| "-Infinity"}` |
//!
//! An `<id>` is a JSON string or integer for string and integer ids,
//! `{"uuid": "..."}` or `{"hash": "<hex>"}` otherwise. A tombstone document
//! is `{"vellum/tombstone": true}`. Attribute names starting with `vellum/`
//! are reserved and rejected on encode.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde_json::{json, Map, Number, Value as Json};
use std::collections::BTreeMap;

use super::traits::{CodecError, WireCodec};
use crate::contract::entity_id::decode_digest;
use crate::contract::{EntityId, Timestamp};
use crate::document::{Document, DocumentState};
use crate::value::Value;

const TAG_PREFIX: &str = "vellum/";
const TAG_ID: &str = "vellum/id";
const TAG_INST: &str = "vellum/inst";
const TAG_BYTES: &str = "vellum/bytes";
const TAG_FLOAT: &str = "vellum/float";
const TAG_TOMBSTONE: &str = "vellum/tombstone";

/// JSON codec with tagged extension values.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

impl WireCodec for JsonCodec {
    fn codec_id(&self) -> &str {
        "json"
    }

    fn encode_entity_id(&self, id: &EntityId) -> Result<Vec<u8>, CodecError> {
        to_bytes(&json!({ TAG_ID: id_to_json(id) }))
    }

    fn decode_entity_id(&self, bytes: &[u8]) -> Result<EntityId, CodecError> {
        let json = from_bytes(bytes)?;
        match tagged(&json) {
            Some((TAG_ID, inner)) => id_from_json(inner),
            _ => Err(CodecError::Decode(format!("expected {{\"{}\": ...}}", TAG_ID))),
        }
    }

    fn encode_document(&self, state: &DocumentState) -> Result<Vec<u8>, CodecError> {
        let json = match state {
            DocumentState::Tombstone => json!({ TAG_TOMBSTONE: true }),
            DocumentState::Live(doc) => {
                let mut map = Map::with_capacity(doc.len());
                for (attr, value) in doc.iter() {
                    check_attr(attr)?;
                    map.insert(attr.clone(), value_to_json(value)?);
                }
                Json::Object(map)
            }
        };
        to_bytes(&json)
    }

    fn decode_document(&self, bytes: &[u8]) -> Result<DocumentState, CodecError> {
        let json = from_bytes(bytes)?;
        if let Some((TAG_TOMBSTONE, Json::Bool(true))) = tagged(&json) {
            return Ok(DocumentState::Tombstone);
        }
        match json {
            Json::Object(map) => {
                let mut attrs = BTreeMap::new();
                for (attr, v) in map {
                    attrs.insert(attr, value_from_json(v)?);
                }
                Ok(DocumentState::Live(Document::from(attrs)))
            }
            other => Err(CodecError::Decode(format!(
                "document must be a JSON object, got {}",
                other
            ))),
        }
    }
}

fn to_bytes(json: &Json) -> Result<Vec<u8>, CodecError> {
    serde_json::to_vec(json).map_err(|e| CodecError::Encode(e.to_string()))
}

fn from_bytes(bytes: &[u8]) -> Result<Json, CodecError> {
    serde_json::from_slice(bytes).map_err(|e| CodecError::Decode(e.to_string()))
}

fn check_attr(attr: &str) -> Result<(), CodecError> {
    if attr.starts_with(TAG_PREFIX) {
        return Err(CodecError::Encode(format!("attribute name '{}' is reserved", attr)));
    }
    Ok(())
}

/// Returns `(tag, inner)` for a single-key object whose key is a tag.
fn tagged(json: &Json) -> Option<(&str, &Json)> {
    match json {
        Json::Object(map) if map.len() == 1 => {
            let (k, v) = map.iter().next()?;
            k.starts_with(TAG_PREFIX).then_some((k.as_str(), v))
        }
        _ => None,
    }
}

fn id_to_json(id: &EntityId) -> Json {
    match id {
        EntityId::Str(s) => Json::String(s.clone()),
        EntityId::Int(i) => Json::Number((*i).into()),
        EntityId::Uuid(u) => json!({ "uuid": u.to_string() }),
        EntityId::Hashed(h) => json!({ "hash": hex::encode(h) }),
    }
}

fn id_from_json(json: &Json) -> Result<EntityId, CodecError> {
    let bad = || CodecError::Decode(format!("invalid entity id form: {}", json));
    match json {
        Json::String(s) if !s.is_empty() => Ok(EntityId::Str(s.clone())),
        Json::Number(n) => n.as_i64().map(EntityId::Int).ok_or_else(bad),
        Json::Object(map) if map.len() == 1 => {
            if let Some(Json::String(u)) = map.get("uuid") {
                return u.parse().map(EntityId::Uuid).map_err(|_| bad());
            }
            if let Some(Json::String(h)) = map.get("hash") {
                return decode_digest(h).map(EntityId::Hashed).ok_or_else(bad);
            }
            Err(bad())
        }
        _ => Err(bad()),
    }
}

fn value_to_json(value: &Value) -> Result<Json, CodecError> {
    Ok(match value {
        Value::Null => Json::Null,
        Value::Bool(b) => Json::Bool(*b),
        Value::Int(i) => Json::Number((*i).into()),
        Value::Float(f) => match Number::from_f64(*f) {
            Some(n) => Json::Number(n),
            None => {
                let name = if f.is_nan() {
                    "NaN"
                } else if *f > 0.0 {
                    "Infinity"
                } else {
                    "-Infinity"
                };
                json!({ TAG_FLOAT: name })
            }
        },
        Value::String(s) => Json::String(s.clone()),
        Value::Bytes(b) => json!({ TAG_BYTES: STANDARD.encode(b) }),
        Value::Timestamp(t) => json!({ TAG_INST: t.as_micros() }),
        Value::Reference(id) => json!({ TAG_ID: id_to_json(id) }),
        Value::Array(items) => {
            Json::Array(items.iter().map(value_to_json).collect::<Result<_, _>>()?)
        }
        Value::Object(map) => {
            let mut out = Map::with_capacity(map.len());
            for (k, v) in map {
                check_attr(k)?;
                out.insert(k.clone(), value_to_json(v)?);
            }
            Json::Object(out)
        }
    })
}

fn value_from_json(json: Json) -> Result<Value, CodecError> {
    if let Some((tag, inner)) = tagged(&json) {
        return match (tag, inner) {
            (TAG_ID, inner) => id_from_json(inner).map(Value::Reference),
            (TAG_INST, Json::Number(n)) => n
                .as_u64()
                .map(|m| Value::Timestamp(Timestamp::from_micros(m)))
                .ok_or_else(|| CodecError::Decode(format!("invalid instant: {}", n))),
            (TAG_BYTES, Json::String(s)) => STANDARD
                .decode(s)
                .map(Value::Bytes)
                .map_err(|e| CodecError::Decode(e.to_string())),
            (TAG_FLOAT, Json::String(s)) => match s.as_str() {
                "NaN" => Ok(Value::Float(f64::NAN)),
                "Infinity" => Ok(Value::Float(f64::INFINITY)),
                "-Infinity" => Ok(Value::Float(f64::NEG_INFINITY)),
                other => Err(CodecError::Decode(format!("invalid float tag: {}", other))),
            },
            (tag, _) => Err(CodecError::Decode(format!("unknown or malformed tag '{}'", tag))),
        };
    }
    Ok(match json {
        Json::Null => Value::Null,
        Json::Bool(b) => Value::Bool(b),
        Json::Number(n) => match n.as_i64() {
            Some(i) => Value::Int(i),
            None => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
        },
        Json::String(s) => Value::String(s),
        Json::Array(items) => {
            Value::Array(items.into_iter().map(value_from_json).collect::<Result<_, _>>()?)
        }
        Json::Object(map) => {
            let mut out = BTreeMap::new();
            for (k, v) in map {
                out.insert(k, value_from_json(v)?);
            }
            Value::Object(out)
        }
    })
}
