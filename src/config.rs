//! Engine configuration.
//!
//! Every section has defaults, so a configuration file only needs to list the values
//! it changes:
//!
//! ```
//! use wolfsearch::config::{StorageKind, WolfConfig};
//!
//! let config = WolfConfig::from_json(r#"{ "search": { "max_results": 10 } }"#).unwrap();
//!
//! assert_eq!(config.search.max_results, 10);
//! assert_eq!(config.search.snippet_chars, 400);
//! assert_eq!(config.index.storage, StorageKind::File);
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, WolfError};
use crate::search::snippet::DEFAULT_SNIPPET_CHARS;
use crate::storage::StorageConfig;
use crate::storage::file::FileStorageConfig;
use crate::storage::memory::MemoryStorageConfig;

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WolfConfig {
    #[serde(default)]
    pub index: IndexConfig,

    #[serde(default)]
    pub search: SearchConfig,
}

/// Storage backend for the index.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageKind {
    /// Index files in a directory on disk.
    #[default]
    File,
    /// Process-local index, lost on exit.
    Memory,
}

/// Index settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexConfig {
    pub storage: StorageKind,

    /// Fsync segment and metadata files on commit.
    pub sync_writes: bool,
}

impl Default for IndexConfig {
    fn default() -> Self {
        IndexConfig {
            storage: StorageKind::File,
            sync_writes: true,
        }
    }
}

impl IndexConfig {
    /// Storage configuration for an index living in `dir`.
    ///
    /// `dir` is ignored for in-memory storage.
    pub fn storage_config<P: AsRef<Path>>(&self, dir: P) -> StorageConfig {
        match self.storage {
            StorageKind::File => {
                let mut config = FileStorageConfig::new(dir);
                config.sync_writes = self.sync_writes;
                StorageConfig::File(config)
            }
            StorageKind::Memory => StorageConfig::Memory(MemoryStorageConfig::default()),
        }
    }
}

/// Query-serving settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Fields a bare query word is matched against.
    pub default_fields: Vec<String>,

    /// Upper bound on hits returned for one query.
    pub max_results: usize,

    /// Excerpt length in characters.
    pub snippet_chars: usize,

    /// Center excerpts on the first matching term.
    pub centered_snippets: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        SearchConfig {
            default_fields: vec!["title".to_string(), "content".to_string()],
            max_results: 50,
            snippet_chars: DEFAULT_SNIPPET_CHARS,
            centered_snippets: false,
        }
    }
}

impl WolfConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        let config: WolfConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a JSON file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        Self::from_json(&contents)
    }

    /// Load from `path` when given, otherwise return the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(WolfConfig::default()),
        }
    }

    fn validate(&self) -> Result<()> {
        if self.search.default_fields.is_empty() {
            return Err(WolfError::other(
                "search.default_fields must name at least one field",
            ));
        }
        if self.search.max_results == 0 {
            return Err(WolfError::other("search.max_results must be positive"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_defaults() {
        let config = WolfConfig::default();
        assert_eq!(config.search.default_fields, vec!["title", "content"]);
        assert_eq!(config.search.max_results, 50);
        assert_eq!(config.search.snippet_chars, 400);
        assert!(!config.search.centered_snippets);
        assert!(config.index.sync_writes);
    }

    #[test]
    fn test_empty_json_is_default() {
        assert_eq!(WolfConfig::from_json("{}").unwrap(), WolfConfig::default());
    }

    #[test]
    fn test_partial_sections() {
        let config = WolfConfig::from_json(
            r#"{ "index": { "storage": "memory" }, "search": { "centered_snippets": true } }"#,
        )
        .unwrap();

        assert_eq!(config.index.storage, StorageKind::Memory);
        assert!(config.index.sync_writes);
        assert!(config.search.centered_snippets);
        assert_eq!(config.search.max_results, 50);
    }

    #[test]
    fn test_invalid_values() {
        let err = WolfConfig::from_json(r#"{ "search": { "default_fields": [] } }"#).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Other);

        let err = WolfConfig::from_json(r#"{ "index": { "storage": "tape" } }"#).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Serialization);
    }

    #[test]
    fn test_storage_config() {
        let mut index = IndexConfig::default();
        index.sync_writes = false;
        match index.storage_config("/tmp/wolf") {
            StorageConfig::File(file) => {
                assert_eq!(file.path, Path::new("/tmp/wolf"));
                assert!(!file.sync_writes);
            }
            other => panic!("unexpected storage config: {other:?}"),
        }

        index.storage = StorageKind::Memory;
        assert!(matches!(index.storage_config("ignored"), StorageConfig::Memory(_)));
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("wolf.json");
        std::fs::write(&path, r#"{ "search": { "snippet_chars": 120 } }"#).unwrap();

        let config = WolfConfig::load(Some(&path)).unwrap();
        assert_eq!(config.search.snippet_chars, 120);
        assert!(WolfConfig::from_file(dir.path().join("missing.json")).is_err());
    }
}
