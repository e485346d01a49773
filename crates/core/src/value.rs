//! Attribute values
//!
//! Documents map attribute names to tagged [`Value`]s. The value model is a
//! closed discriminated union:
//!
//! - Null, Bool, Int, Float, String, Bytes
//! - Timestamp (a point on either time axis)
//! - Reference (a link to another entity)
//! - Array, Object
//!
//! ## Type Rules
//!
//! - No implicit coercions: `Int(1) != Float(1.0)`, `Bytes != String`
//! - Float uses IEEE-754 equality: `NaN != NaN`, `-0.0 == 0.0`
//! - Objects are ordered maps, so every value has one canonical encoding
//!   (see [`Value::hash_into`]) and content hashes are deterministic

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use uuid::Uuid;

use crate::contract::{EntityId, Timestamp};

/// Tagged attribute value.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Value {
    /// Null value
    Null,
    /// Boolean value
    Bool(bool),
    /// 64-bit signed integer
    Int(i64),
    /// 64-bit floating point (IEEE-754)
    Float(f64),
    /// UTF-8 string
    String(String),
    /// Raw bytes
    Bytes(Vec<u8>),
    /// Point in time
    Timestamp(Timestamp),
    /// Reference to another entity
    Reference(EntityId),
    /// Array of values
    Array(Vec<Value>),
    /// Object with string keys, ordered by key
    Object(BTreeMap<String, Value>),
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            // IEEE-754: NaN != NaN, -0.0 == 0.0
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Bytes(a), Value::Bytes(b)) => a == b,
            (Value::Timestamp(a), Value::Timestamp(b)) => a == b,
            (Value::Reference(a), Value::Reference(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => a == b,
            _ => false,
        }
    }
}

impl Value {
    /// Get the type name as a string
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "Null",
            Value::Bool(_) => "Bool",
            Value::Int(_) => "Int",
            Value::Float(_) => "Float",
            Value::String(_) => "String",
            Value::Bytes(_) => "Bytes",
            Value::Timestamp(_) => "Timestamp",
            Value::Reference(_) => "Reference",
            Value::Array(_) => "Array",
            Value::Object(_) => "Object",
        }
    }

    /// Check if this is a null value
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::Bytes(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_timestamp(&self) -> Option<Timestamp> {
        match self {
            Value::Timestamp(t) => Some(*t),
            _ => None,
        }
    }

    /// Get the referenced entity if this is a Reference value
    pub fn as_reference(&self) -> Option<&EntityId> {
        match self {
            Value::Reference(id) => Some(id),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&BTreeMap<String, Value>> {
        match self {
            Value::Object(o) => Some(o),
            _ => None,
        }
    }

    /// Feed the canonical encoding of this value into a SHA-256 hasher.
    ///
    /// Each value is a one-byte tag followed by its content; variable-length
    /// content is length-prefixed so concatenations cannot collide. Floats
    /// hash by bit pattern after folding `-0.0` into `0.0` and every NaN into
    /// one canonical NaN.
    pub fn hash_into(&self, hasher: &mut Sha256) {
        match self {
            Value::Null => hasher.update([0x10]),
            Value::Bool(b) => hasher.update([0x11, *b as u8]),
            Value::Int(i) => {
                hasher.update([0x12]);
                hasher.update(i.to_le_bytes());
            }
            Value::Float(f) => {
                let canonical = if f.is_nan() {
                    f64::NAN
                } else if *f == 0.0 {
                    0.0
                } else {
                    *f
                };
                hasher.update([0x13]);
                hasher.update(canonical.to_bits().to_le_bytes());
            }
            Value::String(s) => {
                hasher.update([0x14]);
                hash_len_prefixed(hasher, s.as_bytes());
            }
            Value::Bytes(b) => {
                hasher.update([0x15]);
                hash_len_prefixed(hasher, b);
            }
            Value::Timestamp(t) => {
                hasher.update([0x16]);
                hasher.update(t.as_micros().to_le_bytes());
            }
            Value::Reference(id) => {
                hasher.update([0x17]);
                id.hash_into(hasher);
            }
            Value::Array(items) => {
                hasher.update([0x18]);
                hasher.update((items.len() as u64).to_le_bytes());
                for item in items {
                    item.hash_into(hasher);
                }
            }
            Value::Object(map) => {
                hasher.update([0x19]);
                hasher.update((map.len() as u64).to_le_bytes());
                for (k, v) in map {
                    hash_len_prefixed(hasher, k.as_bytes());
                    v.hash_into(hasher);
                }
            }
        }
    }
}

fn hash_len_prefixed(hasher: &mut Sha256, bytes: &[u8]) {
    hasher.update((bytes.len() as u64).to_le_bytes());
    hasher.update(bytes);
}

// ============================================================================
// From implementations for ergonomic API usage
// ============================================================================

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i as i64)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<Vec<u8>> for Value {
    fn from(b: Vec<u8>) -> Self {
        Value::Bytes(b)
    }
}

impl From<Timestamp> for Value {
    fn from(t: Timestamp) -> Self {
        Value::Timestamp(t)
    }
}

impl From<EntityId> for Value {
    fn from(id: EntityId) -> Self {
        Value::Reference(id)
    }
}

impl From<Uuid> for Value {
    /// A bare UUID is treated as a reference to the entity it names.
    fn from(u: Uuid) -> Self {
        Value::Reference(EntityId::Uuid(u))
    }
}

impl From<Vec<Value>> for Value {
    fn from(a: Vec<Value>) -> Self {
        Value::Array(a)
    }
}

impl From<BTreeMap<String, Value>> for Value {
    fn from(o: BTreeMap<String, Value>) -> Self {
        Value::Object(o)
    }
}

impl From<()> for Value {
    fn from(_: ()) -> Self {
        Value::Null
    }
}

// ============================================================================
// serde_json interop for ergonomic JSON construction
// ============================================================================

impl From<serde_json::Value> for Value {
    fn from(v: serde_json::Value) -> Self {
        match v {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Value::Int(i),
                // u64 beyond i64 and real numbers both land here
                None => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(arr) => {
                Value::Array(arr.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(obj) => {
                Value::Object(obj.into_iter().map(|(k, v)| (k, Value::from(v))).collect())
            }
        }
    }
}
