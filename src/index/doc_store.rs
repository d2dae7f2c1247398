//! Stored fields of live documents, keyed by internal id and by unique key.

use std::collections::BTreeMap;

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::document::{DocId, StoredDocument};
use crate::error::{Result, WolfError};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct StoredEntry {
    key: String,
    fields: BTreeMap<String, String>,
}

/// The document store.
///
/// Holds the stored field values of each live document plus the unique key it was
/// indexed under, so a key can be resolved to the id currently holding it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DocStore {
    docs: AHashMap<DocId, StoredEntry>,
    keys: AHashMap<String, DocId>,
}

impl DocStore {
    pub fn new() -> Self {
        DocStore::default()
    }

    /// Store the fields of a document under `doc_id`, replacing whatever that id held.
    ///
    /// Only the values handed in are kept; callers pass the schema's stored fields.
    pub fn put(&mut self, doc_id: DocId, key: String, fields: BTreeMap<String, String>) {
        if let Some(previous) = self.docs.remove(&doc_id) {
            self.keys.remove(&previous.key);
        }
        self.keys.insert(key.clone(), doc_id);
        self.docs.insert(doc_id, StoredEntry { key, fields });
    }

    /// Stored fields of a live document.
    pub fn get(&self, doc_id: DocId) -> Result<StoredDocument> {
        self.docs
            .get(&doc_id)
            .map(|entry| StoredDocument {
                doc_id,
                fields: entry.fields.clone(),
            })
            .ok_or_else(|| WolfError::not_found(format!("document {doc_id}")))
    }

    /// Borrow the stored fields of a live document without copying them.
    pub fn fields(&self, doc_id: DocId) -> Option<&BTreeMap<String, String>> {
        self.docs.get(&doc_id).map(|entry| &entry.fields)
    }

    /// Remove a document; removing an absent id does nothing.
    ///
    /// Returns whether the id was live.
    pub fn delete(&mut self, doc_id: DocId) -> bool {
        match self.docs.remove(&doc_id) {
            Some(entry) => {
                if self.keys.get(&entry.key) == Some(&doc_id) {
                    self.keys.remove(&entry.key);
                }
                true
            }
            None => false,
        }
    }

    /// Id of the live document indexed under `key`.
    pub fn doc_id_for_key(&self, key: &str) -> Option<DocId> {
        self.keys.get(key).copied()
    }

    pub fn contains(&self, doc_id: DocId) -> bool {
        self.docs.contains_key(&doc_id)
    }

    pub fn len(&self) -> usize {
        self.docs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }

    /// Live document ids, ascending.
    pub fn doc_ids(&self) -> Vec<DocId> {
        let mut ids: Vec<DocId> = self.docs.keys().copied().collect();
        ids.sort_unstable();
        ids
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn fields(title: &str) -> BTreeMap<String, String> {
        BTreeMap::from([("title".to_string(), title.to_string())])
    }

    #[test]
    fn test_put_and_get() {
        let mut store = DocStore::new();
        store.put(1, "a.txt".to_string(), fields("Wolves"));

        let doc = store.get(1).unwrap();
        assert_eq!(doc.doc_id, 1);
        assert_eq!(doc.get("title"), Some("Wolves"));
        assert_eq!(store.doc_id_for_key("a.txt"), Some(1));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_put_overwrites() {
        let mut store = DocStore::new();
        store.put(1, "a.txt".to_string(), fields("Wolves"));
        store.put(1, "b.txt".to_string(), fields("Cats"));

        assert_eq!(store.get(1).unwrap().get("title"), Some("Cats"));
        assert_eq!(store.doc_id_for_key("a.txt"), None);
        assert_eq!(store.doc_id_for_key("b.txt"), Some(1));
    }

    #[test]
    fn test_get_missing_is_not_found() {
        let store = DocStore::new();
        assert_eq!(store.get(9).unwrap_err().kind(), ErrorKind::NotFound);
    }

    #[test]
    fn test_delete_is_idempotent() {
        let mut store = DocStore::new();
        store.put(1, "a.txt".to_string(), fields("Wolves"));

        assert!(store.delete(1));
        assert!(!store.delete(1));
        assert!(store.is_empty());
        assert_eq!(store.doc_id_for_key("a.txt"), None);
    }

    #[test]
    fn test_delete_keeps_newer_key_owner() {
        let mut store = DocStore::new();
        store.put(1, "a.txt".to_string(), fields("old"));
        store.put(2, "a.txt".to_string(), fields("new"));

        store.delete(1);
        assert_eq!(store.doc_id_for_key("a.txt"), Some(2));
        assert_eq!(store.doc_ids(), vec![2]);
    }
}
