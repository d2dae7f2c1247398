//! The index writer.
//!
//! ```text
//! Idle ──update_document / delete_document──▶ Staging ──commit──▶ Committing ──▶ Idle
//!   ▲                                            │
//!   └──────────────────rollback──────────────────┘
//! ```
//!
//! Staged operations are keyed by the schema's unique field. Staging the same key
//! twice keeps only the later operation. A commit first retires every live document
//! whose key was staged, then inserts the staged documents with fresh ids, persists
//! the result as the next generation and publishes it.

use ahash::AHashMap;
use log::{debug, info, warn};
use parking_lot::RawMutex;
use parking_lot::lock_api::ArcMutexGuard;

use crate::document::{AnalyzedDocument, Document, DocumentParser};
use crate::error::{ErrorKind, Result, WolfError};
use crate::index::index::Index;
use crate::index::snapshot::Snapshot;

/// Lifecycle state of an [`IndexWriter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriterState {
    /// Nothing staged.
    Idle,
    /// At least one operation staged.
    Staging,
    /// A commit is being applied.
    Committing,
}

#[derive(Debug)]
enum StagedOp {
    Upsert(Box<AnalyzedDocument>),
    Delete,
}

/// Outcome of a successful commit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommitStats {
    /// The generation now visible to new searchers.
    pub generation: u64,
    /// Documents inserted.
    pub added: usize,
    /// Live documents retired, either deleted or superseded.
    pub removed: usize,
}

/// The single writer transaction of an index.
///
/// Obtained from [`Index::writer`] or [`Index::try_writer`]; the index stays locked
/// for other writers until this value is dropped.
pub struct IndexWriter {
    index: Index,
    parser: DocumentParser,
    staged: Vec<(String, StagedOp)>,
    slots: AHashMap<String, usize>,
    state: WriterState,
    _guard: ArcMutexGuard<RawMutex, ()>,
}

impl std::fmt::Debug for IndexWriter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IndexWriter")
            .field("state", &self.state)
            .field("pending", &self.staged.len())
            .finish()
    }
}

impl IndexWriter {
    pub(crate) fn new(index: Index, guard: ArcMutexGuard<RawMutex, ()>) -> Self {
        let parser = DocumentParser::new(std::sync::Arc::clone(index.schema()));
        IndexWriter {
            index,
            parser,
            staged: Vec::new(),
            slots: AHashMap::new(),
            state: WriterState::Idle,
            _guard: guard,
        }
    }

    pub fn state(&self) -> WriterState {
        self.state
    }

    /// Number of staged operations.
    pub fn pending(&self) -> usize {
        self.staged.len()
    }

    /// Stage an insert of `doc`, replacing any live document with the same key.
    ///
    /// The document is analyzed immediately, so undeclared fields and a missing key
    /// are reported here rather than at commit.
    pub fn update_document<D: Into<Document>>(&mut self, doc: D) -> Result<()> {
        let analyzed = self.parser.parse(&doc.into())?;
        let key = analyzed.key.clone();
        self.stage(key, StagedOp::Upsert(Box::new(analyzed)));
        Ok(())
    }

    /// Stage the deletion of the document indexed under `key`.
    ///
    /// Deleting a key that is not indexed is not an error.
    pub fn delete_document(&mut self, key: &str) -> Result<()> {
        if key.is_empty() {
            return Err(WolfError::invalid_document("unique key cannot be empty"));
        }
        self.stage(key.to_string(), StagedOp::Delete);
        Ok(())
    }

    fn stage(&mut self, key: String, op: StagedOp) {
        match self.slots.get(&key) {
            Some(&slot) => self.staged[slot].1 = op,
            None => {
                self.slots.insert(key.clone(), self.staged.len());
                self.staged.push((key, op));
            }
        }
        self.state = WriterState::Staging;
    }

    /// Apply the staged operations and publish them as the next generation.
    ///
    /// On failure the staged operations are discarded, the previous generation stays
    /// visible and the error is reported as a commit error.
    pub fn commit(&mut self) -> Result<CommitStats> {
        if self.staged.is_empty() {
            self.state = WriterState::Idle;
            return Ok(CommitStats {
                generation: self.index.generation(),
                added: 0,
                removed: 0,
            });
        }

        self.state = WriterState::Committing;
        let staged = std::mem::take(&mut self.staged);
        self.slots.clear();

        let base = self.index.snapshot();
        let result = apply(&base, staged).and_then(|(next, added, removed)| {
            let meta = self.index.publish(next)?;
            Ok(CommitStats {
                generation: meta.generation,
                added,
                removed,
            })
        });
        self.state = WriterState::Idle;

        match result {
            Ok(stats) => {
                info!(
                    "Committed generation {}: {} added, {} removed",
                    stats.generation, stats.added, stats.removed
                );
                Ok(stats)
            }
            Err(e) => {
                warn!(
                    "Commit on generation {} failed, transaction discarded: {e}",
                    base.generation()
                );
                Err(match e.kind() {
                    ErrorKind::Commit => e,
                    _ => WolfError::commit(e.to_string()),
                })
            }
        }
    }

    /// Discard every staged operation.
    pub fn rollback(&mut self) {
        if !self.staged.is_empty() {
            debug!("Rolled back {} staged operations", self.staged.len());
        }
        self.staged.clear();
        self.slots.clear();
        self.state = WriterState::Idle;
    }
}

impl Drop for IndexWriter {
    fn drop(&mut self) {
        if !self.staged.is_empty() {
            debug!(
                "Writer dropped with {} uncommitted operations",
                self.staged.len()
            );
        }
    }
}

/// Build the successor of `base`: deletions first, then insertions.
fn apply(base: &Snapshot, staged: Vec<(String, StagedOp)>) -> Result<(Snapshot, usize, usize)> {
    let mut next = base.successor();

    let mut removed = 0;
    for (key, _) in &staged {
        if let Some(old) = next.docs().doc_id_for_key(key) {
            next.inverted_mut().remove_document(old);
            next.docs_mut().delete(old);
            removed += 1;
        }
    }

    let mut added = 0;
    for (_, op) in staged {
        let StagedOp::Upsert(doc) = op else {
            continue;
        };
        let AnalyzedDocument {
            key,
            stored,
            field_terms,
        } = *doc;

        let doc_id = next.allocate_doc_id()?;
        for (field, terms) in field_terms {
            next.inverted_mut().add_postings(&field, doc_id, terms);
        }
        next.docs_mut().put(doc_id, key, stored);
        added += 1;
    }

    Ok((next, added, removed))
}
