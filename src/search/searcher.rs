//! Searcher over one committed snapshot.

use std::collections::BTreeSet;
use std::sync::Arc;

use log::debug;

use crate::document::{DocId, StoredDocument};
use crate::error::Result;
use crate::index::Snapshot;
use crate::index::posting::PostingList;
use crate::query::Query;
use crate::schema::Schema;
use crate::search::scorer::{Scorer, TfIdfScorer};
use crate::search::{Hit, SearchRequest, SearchResults};

/// Executes queries against a pinned snapshot.
///
/// A searcher never observes later commits; create a new one from the
/// [`Index`](crate::index::Index) to see them.
#[derive(Debug, Clone)]
pub struct Searcher {
    schema: Arc<Schema>,
    snapshot: Arc<Snapshot>,
}

impl Searcher {
    pub fn new(schema: Arc<Schema>, snapshot: Arc<Snapshot>) -> Self {
        Searcher { schema, snapshot }
    }

    /// Generation of the pinned snapshot.
    pub fn generation(&self) -> u64 {
        self.snapshot.generation()
    }

    pub fn doc_count(&self) -> usize {
        self.snapshot.doc_count()
    }

    pub fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    pub fn snapshot(&self) -> &Arc<Snapshot> {
        &self.snapshot
    }

    /// Stored fields of a document.
    pub fn doc(&self, doc_id: DocId) -> Result<StoredDocument> {
        self.snapshot.docs().get(doc_id)
    }

    /// Run `query` and return the best `limit` hits with their stored fields.
    pub fn search(&self, query: &Query, limit: usize) -> Result<SearchResults> {
        self.execute(query, limit, true)
    }

    /// Execute a search request.
    pub fn search_request(&self, request: SearchRequest) -> Result<SearchResults> {
        self.execute(&request.query, request.max_docs, request.load_documents)
    }

    /// Count the documents matching `query`.
    pub fn count(&self, query: &Query) -> Result<u64> {
        self.validate_fields(query)?;
        Ok(self.matching_docs(query).len() as u64)
    }

    fn execute(&self, query: &Query, limit: usize, load_documents: bool) -> Result<SearchResults> {
        let generation = self.generation();
        let total_docs = self.doc_count() as u64;
        if query.is_empty() || total_docs == 0 {
            return Ok(SearchResults::empty(generation));
        }
        self.validate_fields(query)?;

        let candidates = self.matching_docs(query);
        let total_hits = candidates.len() as u64;

        let scorers: Vec<(&PostingList, TfIdfScorer)> = query
            .leaf_terms()
            .into_iter()
            .map(|(field, term)| self.snapshot.inverted().lookup(field, term))
            .filter(|postings| !postings.is_empty())
            .map(|postings| {
                let scorer = TfIdfScorer::new(postings.doc_frequency() as u64, total_docs);
                (postings, scorer)
            })
            .collect();

        let mut hits: Vec<Hit> = candidates
            .into_iter()
            .map(|doc_id| {
                let score = scorers
                    .iter()
                    .filter_map(|(postings, scorer)| {
                        postings
                            .get(doc_id)
                            .map(|p| scorer.score(doc_id, p.frequency() as f32))
                    })
                    .sum();
                Hit {
                    doc_id,
                    score,
                    fields: Default::default(),
                }
            })
            .collect();

        hits.sort_by(|a, b| b.score.total_cmp(&a.score).then(a.doc_id.cmp(&b.doc_id)));
        hits.truncate(limit);

        if load_documents {
            for hit in &mut hits {
                hit.fields = self.snapshot.docs().get(hit.doc_id)?.fields;
            }
        }

        let max_score = hits.first().map_or(0.0, |hit| hit.score);
        debug!(
            "Search on generation {generation} matched {total_hits} documents, returning {}",
            hits.len()
        );

        Ok(SearchResults {
            hits,
            total_hits,
            max_score,
            generation,
        })
    }

    /// Every leaf must name a declared field.
    fn validate_fields(&self, query: &Query) -> Result<()> {
        for (field, _) in query.leaf_terms() {
            self.schema.require_field(field)?;
        }
        Ok(())
    }

    fn matching_docs(&self, query: &Query) -> BTreeSet<DocId> {
        let inverted = self.snapshot.inverted();

        match query {
            Query::Term { field, term } => inverted.lookup(field, term).doc_ids().collect(),
            Query::Phrase { field, terms } => self.phrase_docs(field, terms),
            Query::And(children) => {
                let mut children = children.iter();
                let Some(first) = children.next() else {
                    return BTreeSet::new();
                };
                let mut docs = self.matching_docs(first);
                for child in children {
                    if docs.is_empty() {
                        break;
                    }
                    let other = self.matching_docs(child);
                    docs.retain(|doc_id| other.contains(doc_id));
                }
                docs
            }
            Query::Or(children) => children
                .iter()
                .flat_map(|child| self.matching_docs(child))
                .collect(),
            Query::Empty => BTreeSet::new(),
        }
    }

    /// Documents whose `field` holds `terms` at consecutive positions.
    fn phrase_docs(&self, field: &str, terms: &[String]) -> BTreeSet<DocId> {
        let inverted = self.snapshot.inverted();
        let lists: Vec<&PostingList> = terms
            .iter()
            .map(|term| inverted.lookup(field, term))
            .collect();

        let Some((first, rest)) = lists.split_first() else {
            return BTreeSet::new();
        };
        if rest.iter().any(|list| list.is_empty()) {
            return BTreeSet::new();
        }

        first
            .iter()
            .filter(|head| {
                let Some(tail) = rest
                    .iter()
                    .map(|list| list.get(head.doc_id))
                    .collect::<Option<Vec<_>>>()
                else {
                    return false;
                };

                head.positions().iter().any(|&start| {
                    tail.iter().enumerate().all(|(i, posting)| {
                        start
                            .checked_add(i as u32 + 1)
                            .is_some_and(|pos| posting.has_position(pos))
                    })
                })
            })
            .map(|head| head.doc_id)
            .collect()
    }
}
