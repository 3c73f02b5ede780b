//! Contract models for the settings store
//!
//! These models are transport-agnostic and used for inter-module communication.
//! Documents are kept as generic JSON values so the store never depends on
//! concrete application types.

use super::error::SettingsError;
use serde::{Deserialize, Serialize};
use std::collections::hash_map::{self, HashMap};
use std::fmt;
use std::hash::{Hash, Hasher};

/// A settings document: an open-ended JSON value tree
pub type Document = serde_json::Value;

/// Full copy of the settings map at one instant, used for backup
pub type Snapshot = SettingsMap;

/// Identifier of one settings document (e.g. `"ui/theme"` or `"net.proxy"`)
///
/// Comparison and hashing ignore case; the original spelling is kept for
/// display and serialization.
#[derive(Clone, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SettingsUri(String);

impl SettingsUri {
    /// Create a uri, rejecting empty or whitespace-only identifiers
    pub fn new(uri: impl Into<String>) -> Result<Self, SettingsError> {
        let uri = uri.into();
        if uri.trim().is_empty() {
            return Err(SettingsError::InvalidArgument {
                name: "uri".to_string(),
                reason: "uri cannot be empty".to_string(),
            });
        }
        Ok(Self(uri))
    }

    /// Join a non-empty namespace and a segment as `namespace/segment`
    pub(crate) fn from_parts(namespace: &str, segment: &str) -> Self {
        Self(format!("{namespace}/{segment}"))
    }

    /// The uri as originally spelled
    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn folded(&self) -> impl Iterator<Item = char> + '_ {
        self.0.chars().flat_map(char::to_lowercase)
    }
}

impl PartialEq for SettingsUri {
    fn eq(&self, other: &Self) -> bool {
        self.folded().eq(other.folded())
    }
}

impl Eq for SettingsUri {}

impl Hash for SettingsUri {
    fn hash<H: Hasher>(&self, state: &mut H) {
        for c in self.folded() {
            c.hash(state);
        }
    }
}

impl fmt::Debug for SettingsUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.0)
    }
}

impl fmt::Display for SettingsUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for SettingsUri {
    type Error = SettingsError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<&str> for SettingsUri {
    type Error = SettingsError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<SettingsUri> for String {
    fn from(uri: SettingsUri) -> Self {
        uri.0
    }
}

/// Mapping from uri to settings document
///
/// This is both the in-memory state of the store and the shape of the
/// persisted blob and of the backup section: a JSON object keyed by uri.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SettingsMap(HashMap<SettingsUri, Document>);

impl SettingsMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, uri: &SettingsUri) -> Option<&Document> {
        self.0.get(uri)
    }

    /// Insert or overwrite a document, returning the previous one.
    ///
    /// When the uri already exists under a different spelling, the stored
    /// spelling is kept.
    pub fn insert(&mut self, uri: SettingsUri, document: Document) -> Option<Document> {
        self.0.insert(uri, document)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> hash_map::Iter<'_, SettingsUri, Document> {
        self.0.iter()
    }

    pub fn uris(&self) -> impl Iterator<Item = &SettingsUri> {
        self.0.keys()
    }

    /// Build a map from a JSON value that must be an object keyed by uri.
    ///
    /// Two keys naming the same uri in different spellings are rejected, as
    /// the map could only keep one of them.
    pub fn from_document(operation: &str, document: Document) -> Result<Self, SettingsError> {
        let mut map = Self::new();
        for (uri, doc) in entries_from_document(operation, document)? {
            if map.0.contains_key(&uri) {
                return Err(SettingsError::InvalidArgument {
                    name: "uri".to_string(),
                    reason: format!("uri '{uri}' appears more than once"),
                });
            }
            map.0.insert(uri, doc);
        }
        Ok(map)
    }

    /// Render the map as a JSON object keyed by uri
    pub fn to_document(&self) -> Document {
        Document::Object(
            self.0
                .iter()
                .map(|(uri, doc)| (uri.to_string(), doc.clone()))
                .collect(),
        )
    }
}

/// Entries of a JSON object keyed by uri, in document order and without
/// folding keys that differ only by case
pub fn entries_from_document(
    operation: &str,
    document: Document,
) -> Result<Vec<(SettingsUri, Document)>, SettingsError> {
    match document {
        Document::Object(entries) => entries
            .into_iter()
            .map(|(uri, doc)| Ok((SettingsUri::new(uri)?, doc)))
            .collect(),
        other => Err(SettingsError::unsupported_shape(operation, "object", &other)),
    }
}

impl FromIterator<(SettingsUri, Document)> for SettingsMap {
    fn from_iter<I: IntoIterator<Item = (SettingsUri, Document)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for SettingsMap {
    type Item = (SettingsUri, Document);
    type IntoIter = hash_map::IntoIter<SettingsUri, Document>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a SettingsMap {
    type Item = (&'a SettingsUri, &'a Document);
    type IntoIter = hash_map::Iter<'a, SettingsUri, Document>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_uri_rejects_blank() {
        assert!(SettingsUri::new("").is_err());
        assert!(SettingsUri::new("   ").is_err());
        assert!(SettingsUri::new("ui/theme").is_ok());
    }

    #[test]
    fn test_uri_is_case_insensitive() {
        let a = SettingsUri::new("UI/Theme").unwrap();
        let b = SettingsUri::new("ui/theme").unwrap();
        assert_eq!(a, b);

        let mut map = SettingsMap::new();
        map.insert(a, json!({"dark": true}));
        assert_eq!(map.get(&b), Some(&json!({"dark": true})));
    }

    #[test]
    fn test_map_keeps_first_spelling() {
        let mut map = SettingsMap::new();
        map.insert(SettingsUri::new("Net.Proxy").unwrap(), json!(1));
        map.insert(SettingsUri::new("net.proxy").unwrap(), json!(2));

        assert_eq!(map.len(), 1);
        assert_eq!(map.to_document(), json!({"Net.Proxy": 2}));
    }

    #[test]
    fn test_map_serializes_as_object() {
        let map = SettingsMap::from_document("test", json!({"a": {"x": 1}, "b": [1, 2]})).unwrap();
        let text = serde_json::to_string(&map).unwrap();
        let back: SettingsMap = serde_json::from_str(&text).unwrap();
        assert_eq!(back, map);
    }

    #[test]
    fn test_map_rejects_uri_spelled_twice() {
        let err = SettingsMap::from_document(
            "restore_backup",
            json!({"UI/Theme": {"x": 1}, "ui/theme": {"y": 2}}),
        )
        .unwrap_err();
        assert!(matches!(err, SettingsError::InvalidArgument { .. }));
    }

    #[test]
    fn test_entries_keep_every_spelling() {
        let payload = json!({"UI/Theme": {"x": 1}, "ui/theme": {"y": 2}});
        let entries = entries_from_document("import_multiple", payload).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].0, entries[1].0);
    }

    #[test]
    fn test_map_from_non_object_fails() {
        let err = SettingsMap::from_document("import_multiple", json!(["a"])).unwrap_err();
        assert!(matches!(err, SettingsError::UnsupportedRequestShape { .. }));
    }
}
