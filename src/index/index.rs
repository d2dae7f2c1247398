//! The index handle.
//!
//! ```text
//! index directory
//! ├── schema.json          bound schema
//! ├── meta.json            { generation, committed_at, doc_count, checksum }
//! └── segment_<gen>.bin    the committed snapshot
//! ```
//!
//! `meta.json` is the commit point: a generation becomes authoritative when the
//! rename of its metadata file succeeds. Everything written before that can be
//! discarded without a reader noticing.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use chrono::{DateTime, Utc};
use log::{debug, info, warn};
use parking_lot::{Mutex, RwLock};
use serde::{Deserialize, Serialize};

use crate::error::{Result, WolfError};
use crate::index::snapshot::{
    Snapshot, parse_segment_file_name, segment_checksum, segment_file_name,
};
use crate::index::writer::IndexWriter;
use crate::schema::Schema;
use crate::search::searcher::Searcher;
use crate::storage::file::FileStorageConfig;
use crate::storage::memory::MemoryStorageConfig;
use crate::storage::{Storage, StorageConfig, StorageFactory};

pub const SCHEMA_FILE: &str = "schema.json";
pub const META_FILE: &str = "meta.json";

/// Commit metadata, persisted as `meta.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexMeta {
    /// Generation of the committed snapshot.
    pub generation: u64,
    /// When the generation was committed.
    pub committed_at: DateTime<Utc>,
    /// Live documents in the generation.
    pub doc_count: u64,
    /// CRC32 of the segment file.
    pub checksum: u32,
}

/// Statistics about an index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IndexStats {
    pub generation: u64,
    pub committed_at: DateTime<Utc>,
    /// Number of live documents.
    pub doc_count: usize,
    /// Number of distinct (field, term) pairs.
    pub term_count: usize,
    /// Number of postings across all terms.
    pub posting_count: usize,
    /// Distinct terms per indexed field.
    pub vocabulary: BTreeMap<String, usize>,
}

#[derive(Debug)]
struct Committed {
    snapshot: Arc<Snapshot>,
    meta: IndexMeta,
}

#[derive(Debug)]
struct IndexInner {
    schema: Arc<Schema>,
    storage: Arc<dyn Storage>,
    committed: RwLock<Committed>,
    writer_lock: Arc<Mutex<()>>,
    closed: AtomicBool,
}

/// A handle to an open index.
///
/// Cloning the handle is cheap; all clones share the committed generation and the
/// writer lock. Searchers pin the generation they were created from, so a commit
/// never changes the view of an in-flight search.
#[derive(Debug, Clone)]
pub struct Index {
    inner: Arc<IndexInner>,
}

impl Index {
    /// Create a new, empty index in `storage`, replacing any index already there.
    pub fn create(storage: Arc<dyn Storage>, schema: Schema) -> Result<Index> {
        for name in storage.list_files()? {
            if is_index_file(&name) {
                storage.delete_file(&name)?;
            }
        }

        storage.write_atomic(SCHEMA_FILE, &serde_json::to_vec_pretty(&schema)?)?;

        let snapshot = Snapshot::empty();
        let meta = persist(storage.as_ref(), &snapshot)?;
        info!("Created index with fields {:?}", schema.field_names());

        Ok(Index::from_parts(Arc::new(schema), storage, snapshot, meta))
    }

    /// Open the index stored in `storage`, verifying its segment checksum.
    pub fn open(storage: Arc<dyn Storage>) -> Result<Index> {
        if !Index::exists(storage.as_ref()) {
            return Err(WolfError::storage("no index found: meta.json is missing"));
        }

        let schema: Schema = serde_json::from_slice(&storage.read_all(SCHEMA_FILE)?)?;
        let meta: IndexMeta = serde_json::from_slice(&storage.read_all(META_FILE)?)?;

        let bytes = storage.read_all(&segment_file_name(meta.generation))?;
        let checksum = segment_checksum(&bytes)?;
        if checksum != meta.checksum {
            return Err(WolfError::storage(format!(
                "checksum of generation {} does not match meta.json",
                meta.generation
            )));
        }

        let snapshot = Snapshot::decode(&bytes)?;
        if snapshot.generation() != meta.generation {
            return Err(WolfError::storage(format!(
                "segment holds generation {}, meta.json names {}",
                snapshot.generation(),
                meta.generation
            )));
        }

        remove_stale_files(storage.as_ref(), meta.generation);
        info!(
            "Opened index at generation {} with {} documents",
            meta.generation, meta.doc_count
        );

        Ok(Index::from_parts(Arc::new(schema), storage, snapshot, meta))
    }

    /// Open the index in `storage`, creating it if there is none.
    ///
    /// Fails with a schema error if the existing index was built with a different
    /// schema; changing the schema requires a rebuild through [`Index::create`].
    pub fn open_or_create(storage: Arc<dyn Storage>, schema: Schema) -> Result<Index> {
        if !Index::exists(storage.as_ref()) {
            return Index::create(storage, schema);
        }

        let index = Index::open(storage)?;
        if index.schema().as_ref() != &schema {
            return Err(WolfError::schema(
                "existing index was built with a different schema; rebuild it",
            ));
        }
        Ok(index)
    }

    /// Whether `storage` holds a committed index.
    pub fn exists(storage: &dyn Storage) -> bool {
        storage.file_exists(META_FILE)
    }

    /// Create an index from a storage configuration.
    pub fn create_with(config: StorageConfig, schema: Schema) -> Result<Index> {
        Index::create(StorageFactory::create(config)?, schema)
    }

    /// Open or create an index from a storage configuration.
    pub fn open_or_create_with(config: StorageConfig, schema: Schema) -> Result<Index> {
        Index::open_or_create(StorageFactory::create(config)?, schema)
    }

    /// Create a file-backed index in `path`.
    pub fn create_in<P: AsRef<Path>>(path: P, schema: Schema) -> Result<Index> {
        Index::create_with(StorageConfig::File(FileStorageConfig::new(path)), schema)
    }

    /// Open the file-backed index in `path`.
    pub fn open_in<P: AsRef<Path>>(path: P) -> Result<Index> {
        let storage = StorageFactory::create(StorageConfig::File(FileStorageConfig::new(path)))?;
        Index::open(storage)
    }

    /// Open the file-backed index in `path`, creating it if needed.
    pub fn open_or_create_in<P: AsRef<Path>>(path: P, schema: Schema) -> Result<Index> {
        Index::open_or_create_with(StorageConfig::File(FileStorageConfig::new(path)), schema)
    }

    /// Create an index that lives only in memory.
    pub fn in_memory(schema: Schema) -> Result<Index> {
        Index::create_with(
            StorageConfig::Memory(MemoryStorageConfig::default()),
            schema,
        )
    }

    fn from_parts(
        schema: Arc<Schema>,
        storage: Arc<dyn Storage>,
        snapshot: Snapshot,
        meta: IndexMeta,
    ) -> Index {
        Index {
            inner: Arc::new(IndexInner {
                schema,
                storage,
                committed: RwLock::new(Committed {
                    snapshot: Arc::new(snapshot),
                    meta,
                }),
                writer_lock: Arc::new(Mutex::new(())),
                closed: AtomicBool::new(false),
            }),
        }
    }

    pub fn schema(&self) -> &Arc<Schema> {
        &self.inner.schema
    }

    pub fn storage(&self) -> &Arc<dyn Storage> {
        &self.inner.storage
    }

    /// The current committed snapshot.
    pub fn snapshot(&self) -> Arc<Snapshot> {
        Arc::clone(&self.inner.committed.read().snapshot)
    }

    pub fn generation(&self) -> u64 {
        self.inner.committed.read().meta.generation
    }

    pub fn meta(&self) -> IndexMeta {
        self.inner.committed.read().meta.clone()
    }

    /// A searcher pinned to the current generation.
    pub fn searcher(&self) -> Result<Searcher> {
        self.check_open()?;
        Ok(Searcher::new(Arc::clone(self.schema()), self.snapshot()))
    }

    /// Start the writer transaction, waiting for the current one to finish.
    ///
    /// Calling this while the same thread holds a writer blocks forever; use
    /// [`Index::try_writer`] where that can happen.
    pub fn writer(&self) -> Result<IndexWriter> {
        self.check_open()?;
        let guard = self.inner.writer_lock.lock_arc();
        Ok(IndexWriter::new(self.clone(), guard))
    }

    /// Start the writer transaction, failing with a writer busy error if another
    /// writer is active.
    pub fn try_writer(&self) -> Result<IndexWriter> {
        self.check_open()?;
        let guard = self
            .inner
            .writer_lock
            .try_lock_arc()
            .ok_or_else(|| WolfError::writer_busy("another writer holds the index"))?;
        Ok(IndexWriter::new(self.clone(), guard))
    }

    pub fn stats(&self) -> IndexStats {
        let committed = self.inner.committed.read();
        let inverted = committed.snapshot.inverted();

        let vocabulary = self
            .inner
            .schema
            .indexed_fields()
            .map(|field| (field.name().to_string(), inverted.vocabulary_size(field.name())))
            .collect();

        IndexStats {
            generation: committed.meta.generation,
            committed_at: committed.meta.committed_at,
            doc_count: committed.snapshot.doc_count(),
            term_count: inverted.term_count(),
            posting_count: inverted.posting_count(),
            vocabulary,
        }
    }

    /// Close the index. Searchers already handed out keep working on their snapshot.
    pub fn close(&self) -> Result<()> {
        if self.inner.closed.swap(true, Ordering::AcqRel) {
            return Ok(());
        }
        self.inner.storage.sync()?;
        self.inner.storage.close()?;
        info!("Closed index at generation {}", self.generation());
        Ok(())
    }

    pub fn is_closed(&self) -> bool {
        self.inner.closed.load(Ordering::Acquire)
    }

    fn check_open(&self) -> Result<()> {
        if self.is_closed() {
            Err(WolfError::storage("index is closed"))
        } else {
            Ok(())
        }
    }

    /// Persist `next` and make it the committed generation.
    ///
    /// On error nothing is published and the previous generation stays authoritative
    /// on disk and in memory.
    pub(crate) fn publish(&self, next: Snapshot) -> Result<IndexMeta> {
        self.check_open()?;
        let storage = self.inner.storage.as_ref();

        let meta = persist(storage, &next)?;

        let previous = {
            let mut committed = self.inner.committed.write();
            let previous = committed.meta.generation;
            *committed = Committed {
                snapshot: Arc::new(next),
                meta: meta.clone(),
            };
            previous
        };

        if let Err(e) = storage.delete_file(&segment_file_name(previous)) {
            warn!("Failed to remove segment of generation {previous}: {e}");
        }

        Ok(meta)
    }
}

/// Write the segment of `snapshot`, then commit it by replacing `meta.json`.
fn persist(storage: &dyn Storage, snapshot: &Snapshot) -> Result<IndexMeta> {
    let bytes = snapshot.encode()?;
    let segment = segment_file_name(snapshot.generation());

    let meta = IndexMeta {
        generation: snapshot.generation(),
        committed_at: Utc::now(),
        doc_count: snapshot.doc_count() as u64,
        checksum: segment_checksum(&bytes)?,
    };

    let written = storage
        .write_atomic(&segment, &bytes)
        .and_then(|_| storage.sync())
        .and_then(|_| serde_json::to_vec_pretty(&meta).map_err(WolfError::from))
        .and_then(|json| storage.write_atomic(META_FILE, &json));

    if let Err(e) = written {
        let _ = storage.delete_file(&segment);
        return Err(e);
    }

    if let Err(e) = storage.sync() {
        warn!("Sync after committing generation {} failed: {e}", meta.generation);
    }
    debug!(
        "Persisted generation {} ({} bytes)",
        meta.generation,
        bytes.len()
    );
    Ok(meta)
}

fn is_index_file(name: &str) -> bool {
    name == SCHEMA_FILE
        || name == META_FILE
        || name.ends_with(".tmp")
        || parse_segment_file_name(name).is_some()
}

/// Remove segments of other generations and abandoned temporary files.
fn remove_stale_files(storage: &dyn Storage, generation: u64) {
    let Ok(files) = storage.list_files() else {
        return;
    };

    for name in files {
        let stale = name.ends_with(".tmp")
            || parse_segment_file_name(&name).is_some_and(|g| g != generation);
        if stale {
            debug!("Removing stale index file {name}");
            if let Err(e) = storage.delete_file(&name) {
                warn!("Failed to remove stale index file {name}: {e}");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{SiteDocument, SiteField};
    use crate::error::ErrorKind;
    use crate::storage::memory::MemoryStorage;

    fn schema() -> Schema {
        SiteField::schema().unwrap()
    }

    #[test]
    fn test_create_writes_generation_zero() {
        let storage: Arc<dyn Storage> = Arc::new(MemoryStorage::new_default());
        let index = Index::create(Arc::clone(&storage), schema()).unwrap();

        assert_eq!(index.generation(), 0);
        assert_eq!(index.snapshot().doc_count(), 0);
        assert_eq!(
            storage.list_files().unwrap(),
            vec!["meta.json", "schema.json", "segment_0.bin"]
        );
    }

    #[test]
    fn test_open_round_trip() {
        let storage: Arc<dyn Storage> = Arc::new(MemoryStorage::new_default());
        Index::create(Arc::clone(&storage), schema()).unwrap();

        let index = Index::open(storage).unwrap();
        assert_eq!(index.schema().unique_key(), "path");
        assert_eq!(index.meta().generation, 0);
        assert_eq!(index.stats().vocabulary.len(), 3);
    }

    #[test]
    fn test_stats_count_terms_and_postings() {
        let index = Index::in_memory(schema()).unwrap();
        let mut writer = index.writer().unwrap();
        writer
            .update_document(SiteDocument::new("Wolves", "wolves run", "a"))
            .unwrap();
        writer
            .update_document(SiteDocument::new("Cats", "cats run", "b"))
            .unwrap();
        writer.commit().unwrap();

        let stats = index.stats();
        assert_eq!(stats.generation, 1);
        assert_eq!(stats.doc_count, 2);
        assert_eq!(stats.term_count, 7);
        assert_eq!(stats.posting_count, 8);
        assert_eq!(stats.vocabulary["content"], 3);
    }

    #[test]
    fn test_open_missing_index() {
        let storage: Arc<dyn Storage> = Arc::new(MemoryStorage::new_default());
        assert_eq!(Index::open(storage).unwrap_err().kind(), ErrorKind::Storage);
    }

    #[test]
    fn test_open_detects_checksum_mismatch() {
        let storage: Arc<dyn Storage> = Arc::new(MemoryStorage::new_default());
        Index::create(Arc::clone(&storage), schema()).unwrap();

        let mut meta: IndexMeta =
            serde_json::from_slice(&storage.read_all(META_FILE).unwrap()).unwrap();
        meta.checksum ^= 1;
        storage
            .write_atomic(META_FILE, &serde_json::to_vec(&meta).unwrap())
            .unwrap();

        assert_eq!(Index::open(storage).unwrap_err().kind(), ErrorKind::Storage);
    }

    #[test]
    fn test_open_or_create_rejects_other_schema() {
        let storage: Arc<dyn Storage> = Arc::new(MemoryStorage::new_default());
        Index::open_or_create(Arc::clone(&storage), schema()).unwrap();
        Index::open_or_create(Arc::clone(&storage), schema()).unwrap();

        let other = Schema::builder()
            .add_field("id", crate::schema::FieldOptions::id())
            .build()
            .unwrap();
        assert_eq!(
            Index::open_or_create(storage, other).unwrap_err().kind(),
            ErrorKind::Schema
        );
    }

    #[test]
    fn test_try_writer_is_exclusive() {
        let index = Index::in_memory(schema()).unwrap();
        let writer = index.try_writer().unwrap();

        assert_eq!(index.try_writer().unwrap_err().kind(), ErrorKind::WriterBusy);
        drop(writer);
        assert!(index.try_writer().is_ok());
    }

    #[test]
    fn test_close() {
        let index = Index::in_memory(schema()).unwrap();
        let searcher = index.searcher().unwrap();

        index.close().unwrap();
        index.close().unwrap();
        assert!(index.is_closed());
        assert!(index.searcher().is_err());
        assert!(index.writer().is_err());
        assert_eq!(searcher.generation(), 0);
    }
}
