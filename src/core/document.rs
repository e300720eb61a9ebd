//! Nested preference documents
//!
//! A [`Document`] is a mapping from string keys to [`Value`]s, where any value
//! may itself be a nested document. Three access styles are offered:
//!
//! - **Item access**: [`Document::item`], [`Document::insert`] and
//!   [`Document::child`] operate on a single literal key. `child` creates an
//!   empty nested document when the key is absent, which makes building deep
//!   structures a matter of chaining calls.
//! - **Attribute access**: [`Document::attr`] and [`Document::set_attr`] behave
//!   like item access but never expose keys starting with [`RESERVED_PREFIX`].
//! - **Path access**: [`Document::get`] and [`Document::set`] take dotted paths
//!   such as `"window.geometry.width"`.
//!
//! Keys are kept sorted so serialization is stable and diff-friendly.

use std::collections::BTreeMap;

use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::error::{PrefsError, Result};
use super::value::Value;

/// Keys with this prefix are internal bookkeeping: readable through item
/// access, hidden from attribute access, never written to disk.
pub const RESERVED_PREFIX: &str = "_";

/// Whether `key` uses the reserved prefix
pub fn is_reserved(key: &str) -> bool {
    key.starts_with(RESERVED_PREFIX)
}

/// Normalizes a dotted path.
///
/// Leading, trailing and repeated dots are dropped:
/// `".window..geometry."` becomes `"window.geometry"`.
pub fn normalize_path(input: &str) -> String {
    components(input).collect::<Vec<_>>().join(".")
}

fn components(path: &str) -> impl Iterator<Item = &str> {
    path.split('.').filter(|component| !component.is_empty())
}

/// A nested key/value preferences tree
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    entries: BTreeMap<String, Value>,
}

impl Document {
    /// Create an empty document
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert, for literals in code and tests.
    ///
    /// Empty keys are dropped with a warning.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        if let Err(err) = self.insert(key, value) {
            tracing::warn!("Dropping entry: {}", err);
        }
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Top-level keys in sorted order, reserved keys included
    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.entries.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.entries.iter()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    // === Item access ===

    /// Look up a literal top-level key without creating anything
    pub fn item(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    /// Look up a literal top-level key, falling back to `default`.
    ///
    /// Unlike [`get_or`](Self::get_or), dots in `key` are not path separators.
    pub fn item_or<'a>(&'a self, key: &str, default: &'a Value) -> &'a Value {
        self.entries.get(key).unwrap_or(default)
    }

    pub fn item_mut(&mut self, key: &str) -> Option<&mut Value> {
        self.entries.get_mut(key)
    }

    /// Assign `value` at a literal top-level key, replacing what was there
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Result<Option<Value>> {
        let key = key.into();
        if key.is_empty() {
            return Err(PrefsError::EmptyKey);
        }
        Ok(self.entries.insert(key, value.into()))
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.entries.remove(key)
    }

    /// Get the nested document at `key`, creating an empty one if absent.
    ///
    /// Fails if `key` already holds a non-document value; existing data is
    /// never replaced by a read.
    pub fn child(&mut self, key: &str) -> Result<&mut Document> {
        if key.is_empty() {
            return Err(PrefsError::EmptyKey);
        }
        let value = self
            .entries
            .entry(key.to_string())
            .or_insert_with(|| Value::Doc(Document::new()));
        let found = value.type_name();
        value.as_doc_mut().ok_or_else(|| PrefsError::NotADocument {
            key: key.to_string(),
            found,
        })
    }

    // === Attribute access ===

    /// Like [`item`](Self::item), but reserved keys are never returned
    pub fn attr(&self, name: &str) -> Option<&Value> {
        if is_reserved(name) {
            return None;
        }
        self.item(name)
    }

    /// Like [`insert`](Self::insert), but refuses reserved keys
    pub fn set_attr(&mut self, name: &str, value: impl Into<Value>) -> Result<()> {
        if is_reserved(name) {
            return Err(PrefsError::ReservedKey {
                key: name.to_string(),
            });
        }
        self.insert(name, value)?;
        Ok(())
    }

    /// Like [`child`](Self::child), but refuses reserved keys
    pub fn attr_child(&mut self, name: &str) -> Result<&mut Document> {
        if is_reserved(name) {
            return Err(PrefsError::ReservedKey {
                key: name.to_string(),
            });
        }
        self.child(name)
    }

    // === Path access ===

    /// Look up a dotted path
    pub fn get(&self, path: &str) -> Option<&Value> {
        let mut parts = components(path);
        let mut current = self.entries.get(parts.next()?)?;
        for part in parts {
            current = current.as_doc()?.entries.get(part)?;
        }
        Some(current)
    }

    /// Look up a dotted path, falling back to `default`
    pub fn get_or<'a>(&'a self, path: &str, default: &'a Value) -> &'a Value {
        self.get(path).unwrap_or(default)
    }

    pub fn get_mut(&mut self, path: &str) -> Option<&mut Value> {
        let mut parts = components(path);
        let mut current = self.entries.get_mut(parts.next()?)?;
        for part in parts {
            current = current.as_doc_mut()?.entries.get_mut(part)?;
        }
        Some(current)
    }

    pub fn get_str(&self, path: &str) -> Option<&str> {
        self.get(path).and_then(Value::as_str)
    }

    pub fn get_bool(&self, path: &str) -> Option<bool> {
        self.get(path).and_then(Value::as_bool)
    }

    pub fn get_i64(&self, path: &str) -> Option<i64> {
        self.get(path).and_then(Value::as_i64)
    }

    pub fn get_f64(&self, path: &str) -> Option<f64> {
        self.get(path).and_then(Value::as_f64)
    }

    pub fn get_doc(&self, path: &str) -> Option<&Document> {
        self.get(path).and_then(Value::as_doc)
    }

    /// Assign `value` at a dotted path, creating intermediate documents
    pub fn set(&mut self, path: &str, value: impl Into<Value>) -> Result<()> {
        let parts: Vec<&str> = components(path).collect();
        let (last, parents) = parts.split_last().ok_or(PrefsError::EmptyKey)?;
        let mut target = self;
        for part in parents {
            target = target.child(part)?;
        }
        target.insert(*last, value)?;
        Ok(())
    }

    /// Overlay `other` onto this document.
    ///
    /// Nested documents merge recursively; any other value replaces.
    pub fn merge(&mut self, other: Document) {
        for (key, value) in other.entries {
            match (self.entries.get_mut(&key), value) {
                (Some(Value::Doc(existing)), Value::Doc(incoming)) => existing.merge(incoming),
                (_, value) => {
                    self.entries.insert(key, value);
                }
            }
        }
    }

    // === Serialization ===

    /// Pretty JSON with 4-space indentation and sorted keys.
    ///
    /// Reserved keys are omitted at every depth.
    pub fn to_json_string(&self) -> Result<String> {
        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
        self.serialize(&mut serializer).map_err(PrefsError::Serialize)?;
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }

    /// Parse a JSON object into a document
    pub fn from_json_str(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }
}

impl Serialize for Document {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        for (key, value) in self.entries.iter().filter(|(key, _)| !is_reserved(key)) {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Document {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let mut entries: BTreeMap<String, Value> = BTreeMap::deserialize(deserializer)?;
        if entries.remove("").is_some() {
            tracing::warn!("Dropping entry with an empty key");
        }
        Ok(Document { entries })
    }
}

/// Collects entries as [`Document::with`] does: empty keys are dropped.
impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Document {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        iter.into_iter()
            .fold(Document::new(), |doc, (key, value)| doc.with(key, value))
    }
}
