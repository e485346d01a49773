//! Entity identity
//!
//! Callers address entities with loosely typed values (a string, a number,
//! a UUID, or a whole structure). `EntityId::coerce` turns such a value into
//! a canonical identifier; two ids are equal iff their canonical forms are.
//!
//! ## Accepted inputs
//!
//! | Input | Canonical form |
//! |-------|----------------|
//! | non-empty `String` | `EntityId::Str` |
//! | `Int` | `EntityId::Int` |
//! | UUID | `EntityId::Uuid` |
//! | `Array` / `Object` | `EntityId::Hashed` (SHA-256 of the canonical encoding) |
//! | `Reference(id)` | `id` unchanged |
//!
//! Everything else is rejected with `MalformedEntityId`.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use uuid::Uuid;

use crate::error::{VellumError, VellumResult};
use crate::value::Value;

/// Canonical, comparable, hashable entity identifier.
///
/// Ordering is by variant first, then by content, which gives scans a
/// stable entity order.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum EntityId {
    /// String identifier
    Str(String),
    /// Integer identifier
    Int(i64),
    /// UUID identifier
    Uuid(Uuid),
    /// Content-addressed identifier of a structured value
    Hashed([u8; 32]),
}

impl EntityId {
    /// Coerce a caller-supplied value into an entity id.
    ///
    /// # Errors
    ///
    /// Returns `MalformedEntityId` for nulls, booleans, floats, raw bytes,
    /// timestamps and empty strings.
    pub fn coerce(value: impl Into<Value>) -> VellumResult<Self> {
        let value = value.into();
        match value {
            Value::String(s) if s.is_empty() => Err(VellumError::malformed_id(
                "entity id string must not be empty",
            )),
            Value::String(s) => Ok(EntityId::Str(s)),
            Value::Int(i) => Ok(EntityId::Int(i)),
            Value::Reference(id) => Ok(id),
            Value::Array(_) | Value::Object(_) => {
                let mut hasher = Sha256::new();
                value.hash_into(&mut hasher);
                Ok(EntityId::Hashed(hasher.finalize().into()))
            }
            other => Err(VellumError::malformed_id(format!(
                "cannot coerce {} into an entity id",
                other.type_name()
            ))),
        }
    }

    /// Short name of the id kind, used in logs and wire envelopes.
    pub fn kind(&self) -> &'static str {
        match self {
            EntityId::Str(_) => "str",
            EntityId::Int(_) => "int",
            EntityId::Uuid(_) => "uuid",
            EntityId::Hashed(_) => "hash",
        }
    }

    pub(crate) fn hash_into(&self, hasher: &mut Sha256) {
        match self {
            EntityId::Str(s) => {
                hasher.update([0x01]);
                hasher.update((s.len() as u32).to_le_bytes());
                hasher.update(s.as_bytes());
            }
            EntityId::Int(i) => {
                hasher.update([0x02]);
                hasher.update(i.to_le_bytes());
            }
            EntityId::Uuid(u) => {
                hasher.update([0x03]);
                hasher.update(u.as_bytes());
            }
            EntityId::Hashed(h) => {
                hasher.update([0x04]);
                hasher.update(h);
            }
        }
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityId::Str(s) => write!(f, "{}", s),
            EntityId::Int(i) => write!(f, "{}", i),
            EntityId::Uuid(u) => write!(f, "{}", u),
            EntityId::Hashed(h) => write!(f, "#{}", hex::encode(h)),
        }
    }
}

impl From<&str> for EntityId {
    /// Infallible for non-empty strings; an empty string maps to the
    /// reserved id `""` which is never stored. Prefer [`EntityId::coerce`]
    /// when the input is untrusted.
    fn from(s: &str) -> Self {
        EntityId::Str(s.to_string())
    }
}

impl From<String> for EntityId {
    fn from(s: String) -> Self {
        EntityId::Str(s)
    }
}

impl From<i64> for EntityId {
    fn from(i: i64) -> Self {
        EntityId::Int(i)
    }
}

impl From<Uuid> for EntityId {
    fn from(u: Uuid) -> Self {
        EntityId::Uuid(u)
    }
}

/// Decodes the 64-char hex form of a SHA-256 digest.
pub(crate) fn decode_digest(text: &str) -> Option<[u8; 32]> {
    let mut out = [0u8; 32];
    hex::decode_to_slice(text, &mut out).ok()?;
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn test_coerce_scalars() {
        assert_eq!(EntityId::coerce("alice").unwrap(), EntityId::Str("alice".into()));
        assert_eq!(EntityId::coerce(42i64).unwrap(), EntityId::Int(42));
    }

    #[test]
    fn test_coerce_rejects_unusable_values() {
        for bad in [Value::Null, Value::Bool(true), Value::Float(1.5), Value::Bytes(vec![1])] {
            let err = EntityId::coerce(bad).unwrap_err();
            assert!(matches!(err, VellumError::MalformedEntityId { .. }));
        }
        assert!(EntityId::coerce("").is_err());
    }

    #[test]
    fn test_structured_ids_are_content_addressed() {
        let mut a = BTreeMap::new();
        a.insert("email".to_string(), Value::from("a@example.com"));
        a.insert("tenant".to_string(), Value::Int(1));
        let b = a.clone();

        let id_a = EntityId::coerce(Value::Object(a)).unwrap();
        let id_b = EntityId::coerce(Value::Object(b)).unwrap();
        assert_eq!(id_a, id_b);
        assert!(matches!(id_a, EntityId::Hashed(_)));

        let other = EntityId::coerce(Value::Array(vec![Value::Int(1)])).unwrap();
        assert_ne!(id_a, other);
    }

    #[test]
    fn test_reference_passes_through() {
        let id = EntityId::Uuid(Uuid::new_v4());
        assert_eq!(EntityId::coerce(Value::Reference(id.clone())).unwrap(), id);
    }

    #[test]
    fn test_display_forms() {
        let hashed = EntityId::coerce(Value::Array(vec![Value::from("x")])).unwrap();
        let EntityId::Hashed(digest) = &hashed else {
            panic!("expected a hashed id");
        };
        assert_eq!(hashed.to_string(), format!("#{}", hex::encode(digest)));
        assert_eq!(hashed.to_string().len(), 65);
        assert_eq!(EntityId::from(-7i64).to_string(), "-7");
    }

    #[test]
    fn test_decode_digest() {
        let digest = [0xabu8; 32];
        assert_eq!(decode_digest(&hex::encode(digest)), Some(digest));
        assert_eq!(decode_digest("zz"), None);
        assert_eq!(decode_digest(&"ab".repeat(31)), None);
    }

    #[test]
    fn test_ordering_is_variant_then_content() {
        let mut ids = vec![EntityId::Int(2), EntityId::from("b"), EntityId::Int(1), EntityId::from("a")];
        ids.sort();
        assert_eq!(
            ids,
            vec![EntityId::from("a"), EntityId::from("b"), EntityId::Int(1), EntityId::Int(2)]
        );
    }
}
