//! Document structures.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{Result, WolfError};

/// Internal document identifier.
///
/// Ids are assigned at commit time, grow monotonically and are never reused by an
/// index: re-indexing a key retires the old id and assigns a fresh one.
pub type DocId = u64;

/// A record of field name → raw text value.
///
/// # Examples
///
/// ```
/// use wolfsearch::document::Document;
///
/// let doc = Document::builder()
///     .add_text("title", "Wolves")
///     .add_text("path", "docs/wolves.txt")
///     .build();
///
/// assert_eq!(doc.get("title"), Some("Wolves"));
/// assert_eq!(doc.len(), 2);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    fields: BTreeMap<String, String>,
}

impl Document {
    pub fn new() -> Self {
        Document {
            fields: BTreeMap::new(),
        }
    }

    pub fn add_field<S: Into<String>, T: Into<String>>(&mut self, name: S, value: T) {
        self.fields.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    pub fn has_field(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    pub fn field_names(&self) -> Vec<&str> {
        self.fields.keys().map(String::as_str).collect()
    }

    pub fn fields(&self) -> &BTreeMap<String, String> {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn builder() -> DocumentBuilder {
        DocumentBuilder::new()
    }
}

impl<S: Into<String>, T: Into<String>> FromIterator<(S, T)> for Document {
    fn from_iter<I: IntoIterator<Item = (S, T)>>(iter: I) -> Self {
        let mut doc = Document::new();
        for (name, value) in iter {
            doc.add_field(name, value);
        }
        doc
    }
}

#[derive(Debug, Default)]
pub struct DocumentBuilder {
    document: Document,
}

impl DocumentBuilder {
    pub fn new() -> Self {
        DocumentBuilder {
            document: Document::new(),
        }
    }

    pub fn add_text<S: Into<String>, T: Into<String>>(mut self, name: S, value: T) -> Self {
        self.document.add_field(name, value);
        self
    }

    pub fn build(self) -> Document {
        self.document
    }
}

/// The stored fields of a live document.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredDocument {
    pub doc_id: DocId,
    pub fields: BTreeMap<String, String>,
}

impl StoredDocument {
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    /// Like [`get`](Self::get), failing with a not found error for absent fields.
    pub fn require(&self, name: &str) -> Result<&str> {
        self.get(name).ok_or_else(|| {
            WolfError::not_found(format!(
                "stored field '{name}' of document {}",
                self.doc_id
            ))
        })
    }
}
