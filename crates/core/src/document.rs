//! Documents and content hashes
//!
//! A [`Document`] is the immutable attribute map recorded by one revision.
//! Revisions refer to their body by [`ContentHash`]; equal hashes mean the
//! bodies are interchangeable in storage, not that the revisions are the
//! same event.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::fmt;

use crate::value::Value;

/// SHA-256 of a document's canonical encoding.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ContentHash([u8; 32]);

impl ContentHash {
    /// Hash recorded by tombstone revisions (all zero).
    pub const TOMBSTONE: ContentHash = ContentHash([0u8; 32]);

    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        ContentHash(bytes)
    }

    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub fn is_tombstone(&self) -> bool {
        *self == Self::TOMBSTONE
    }

    /// Lowercase hex form
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Debug for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Eight hex chars are plenty to tell hashes apart in test output
        write!(f, "ContentHash({}..)", &self.to_hex()[..8])
    }
}

impl fmt::Display for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

/// Immutable attribute map of one revision.
///
/// ```
/// use vellum_core::{Document, Value};
///
/// let doc = Document::new().with("name", "Ada").with("age", 36i64);
/// assert_eq!(doc.get("age"), Some(&Value::Int(36)));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Document(BTreeMap<String, Value>);

impl Document {
    pub fn new() -> Self {
        Document(BTreeMap::new())
    }

    /// Builder-style attribute insert
    pub fn with(mut self, attr: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(attr.into(), value.into());
        self
    }

    pub fn get(&self, attr: &str) -> Option<&Value> {
        self.0.get(attr)
    }

    pub fn contains(&self, attr: &str) -> bool {
        self.0.contains_key(attr)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_inner(self) -> BTreeMap<String, Value> {
        self.0
    }

    /// Content hash of this document.
    ///
    /// Never equal to [`ContentHash::TOMBSTONE`]: the encoding starts with a
    /// document marker byte, so an all-zero digest would need a SHA-256
    /// preimage.
    pub fn content_hash(&self) -> ContentHash {
        let mut hasher = Sha256::new();
        hasher.update(b"vellum.doc.v1");
        hasher.update((self.0.len() as u64).to_le_bytes());
        for (k, v) in &self.0 {
            hasher.update((k.len() as u64).to_le_bytes());
            hasher.update(k.as_bytes());
            v.hash_into(&mut hasher);
        }
        ContentHash(hasher.finalize().into())
    }
}

impl From<BTreeMap<String, Value>> for Document {
    fn from(map: BTreeMap<String, Value>) -> Self {
        Document(map)
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Document {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Document(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// Body of a revision: a live document, or a tombstone meaning "entity
/// absent as of this revision".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DocumentState {
    Live(Document),
    Tombstone,
}

impl DocumentState {
    pub fn is_tombstone(&self) -> bool {
        matches!(self, DocumentState::Tombstone)
    }

    pub fn as_live(&self) -> Option<&Document> {
        match self {
            DocumentState::Live(doc) => Some(doc),
            DocumentState::Tombstone => None,
        }
    }

    pub fn into_live(self) -> Option<Document> {
        match self {
            DocumentState::Live(doc) => Some(doc),
            DocumentState::Tombstone => None,
        }
    }

    pub fn content_hash(&self) -> ContentHash {
        match self {
            DocumentState::Live(doc) => doc.content_hash(),
            DocumentState::Tombstone => ContentHash::TOMBSTONE,
        }
    }
}

impl From<Document> for DocumentState {
    fn from(doc: Document) -> Self {
        DocumentState::Live(doc)
    }
}
