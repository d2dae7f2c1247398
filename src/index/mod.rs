//! Index creation, persistence and transactional writes.
//!
//! # Core Components
//!
//! - [`index::Index`] - handle over one index directory and its committed generation
//! - [`writer::IndexWriter`] - the single writer transaction of an index
//! - [`snapshot::Snapshot`] - an immutable committed generation
//! - [`doc_store::DocStore`] - stored fields per document
//! - [`inverted::InvertedIndex`] - (field, term) → posting list

pub mod doc_store;
#[allow(clippy::module_inception)]
pub mod index;
pub mod inverted;
pub mod posting;
pub mod snapshot;
pub mod writer;

pub use doc_store::DocStore;
pub use index::{Index, IndexMeta, IndexStats};
pub use inverted::InvertedIndex;
pub use posting::{Posting, PostingList};
pub use snapshot::Snapshot;
pub use writer::{CommitStats, IndexWriter, WriterState};
