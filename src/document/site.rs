//! The typed field set of the search site: every document has a title, a body and
//! the path it was read from.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::document::document::{Document, StoredDocument};
use crate::error::{Result, WolfError};
use crate::schema::{FieldOptions, Schema};

/// Fields of the site schema.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SiteField {
    Title,
    Content,
    Path,
}

impl SiteField {
    pub const ALL: [SiteField; 3] = [SiteField::Title, SiteField::Content, SiteField::Path];

    pub fn as_str(self) -> &'static str {
        match self {
            SiteField::Title => "title",
            SiteField::Content => "content",
            SiteField::Path => "path",
        }
    }

    /// Fields a free-text query runs over by default.
    pub fn searchable() -> [SiteField; 2] {
        [SiteField::Title, SiteField::Content]
    }

    fn options(self) -> FieldOptions {
        match self {
            SiteField::Title | SiteField::Content => FieldOptions::text(),
            SiteField::Path => FieldOptions::id(),
        }
    }

    /// The site schema: stemmed `title` and `content`, `path` as the unique key.
    pub fn schema() -> Result<Schema> {
        Schema::define(SiteField::ALL.iter().map(|f| (f.as_str(), f.options())))
    }
}

impl fmt::Display for SiteField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SiteField {
    type Err = WolfError;

    fn from_str(s: &str) -> Result<Self> {
        SiteField::ALL
            .into_iter()
            .find(|f| f.as_str() == s)
            .ok_or_else(|| WolfError::invalid_field(s.to_string()))
    }
}

/// A site page ready for indexing.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteDocument {
    pub title: String,
    pub content: String,
    pub path: String,
}

impl SiteDocument {
    pub fn new<T, C, P>(title: T, content: C, path: P) -> Self
    where
        T: Into<String>,
        C: Into<String>,
        P: Into<String>,
    {
        SiteDocument {
            title: title.into(),
            content: content.into(),
            path: path.into(),
        }
    }

    pub fn get(&self, field: SiteField) -> &str {
        match field {
            SiteField::Title => &self.title,
            SiteField::Content => &self.content,
            SiteField::Path => &self.path,
        }
    }

    /// Rebuild a site document from stored fields. The path is required; a missing
    /// title or content reads as empty.
    pub fn from_stored(stored: &StoredDocument) -> Result<Self> {
        Ok(SiteDocument {
            title: stored.get(SiteField::Title.as_str()).unwrap_or_default().to_string(),
            content: stored
                .get(SiteField::Content.as_str())
                .unwrap_or_default()
                .to_string(),
            path: stored.require(SiteField::Path.as_str())?.to_string(),
        })
    }
}

impl From<SiteDocument> for Document {
    fn from(site: SiteDocument) -> Self {
        Document::builder()
            .add_text(SiteField::Title.as_str(), site.title)
            .add_text(SiteField::Content.as_str(), site.content)
            .add_text(SiteField::Path.as_str(), site.path)
            .build()
    }
}
