//! Inverted index: (field, term) → posting list.

use serde::{Deserialize, Serialize};

use ahash::AHashMap;

use crate::document::DocId;
use crate::index::posting::{Posting, PostingList};

static EMPTY_POSTINGS: PostingList = PostingList::new();

/// Term dictionary of one field.
pub type TermDictionary = AHashMap<String, PostingList>;

/// Per-field term dictionaries plus a reverse map used to remove documents.
///
/// Every posting list is non-empty: removing the last posting of a term drops the
/// term from its dictionary, and a field without terms is dropped as well.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InvertedIndex {
    fields: AHashMap<String, TermDictionary>,
    /// doc id → (field, term) pairs that hold a posting for it.
    doc_terms: AHashMap<DocId, Vec<(String, String)>>,
}

impl InvertedIndex {
    pub fn new() -> Self {
        InvertedIndex::default()
    }

    /// Merge the postings of one field of a document into the index.
    ///
    /// `terms` yields each distinct term with the positions it occurs at; its
    /// frequency is the number of positions.
    pub fn add_postings<I>(&mut self, field: &str, doc_id: DocId, terms: I)
    where
        I: IntoIterator<Item = (String, Vec<u32>)>,
    {
        let dictionary = self.fields.entry(field.to_string()).or_default();
        let owned = self.doc_terms.entry(doc_id).or_default();

        for (term, positions) in terms {
            if positions.is_empty() {
                continue;
            }
            dictionary
                .entry(term.clone())
                .or_default()
                .add_posting(Posting::with_positions(doc_id, positions));
            owned.push((field.to_string(), term));
        }

        if owned.is_empty() {
            self.doc_terms.remove(&doc_id);
        }
        if dictionary.is_empty() {
            self.fields.remove(field);
        }
    }

    /// Remove every posting of `doc_id` and prune emptied posting lists.
    ///
    /// Returns the number of postings removed; zero for an unknown document.
    pub fn remove_document(&mut self, doc_id: DocId) -> usize {
        let Some(owned) = self.doc_terms.remove(&doc_id) else {
            return 0;
        };

        let mut removed = 0;
        for (field, term) in owned {
            let Some(dictionary) = self.fields.get_mut(&field) else {
                continue;
            };
            if let Some(list) = dictionary.get_mut(&term) {
                if list.remove(doc_id).is_some() {
                    removed += 1;
                }
                if list.is_empty() {
                    dictionary.remove(&term);
                }
            }
            if dictionary.is_empty() {
                self.fields.remove(&field);
            }
        }
        removed
    }

    /// Posting list of a term; an unknown field or term yields an empty list.
    pub fn lookup(&self, field: &str, term: &str) -> &PostingList {
        self.fields
            .get(field)
            .and_then(|dictionary| dictionary.get(term))
            .unwrap_or(&EMPTY_POSTINGS)
    }

    /// Number of documents whose `field` contains `term`.
    pub fn doc_freq(&self, field: &str, term: &str) -> usize {
        self.lookup(field, term).doc_frequency()
    }

    pub fn contains_term(&self, field: &str, term: &str) -> bool {
        !self.lookup(field, term).is_empty()
    }

    pub fn contains_document(&self, doc_id: DocId) -> bool {
        self.doc_terms.contains_key(&doc_id)
    }

    /// Terms of a field, in no particular order.
    pub fn terms(&self, field: &str) -> impl Iterator<Item = &str> {
        self.fields
            .get(field)
            .into_iter()
            .flat_map(|dictionary| dictionary.keys().map(String::as_str))
    }

    /// Number of distinct terms in a field.
    pub fn vocabulary_size(&self, field: &str) -> usize {
        self.fields.get(field).map_or(0, |dictionary| dictionary.len())
    }

    /// Number of distinct (field, term) pairs.
    pub fn term_count(&self) -> usize {
        self.fields.values().map(|dictionary| dictionary.len()).sum()
    }

    /// Number of (document, field, term) postings.
    pub fn posting_count(&self) -> usize {
        self.doc_terms.values().map(Vec::len).sum()
    }

    /// Names of the fields holding at least one term.
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn terms(pairs: &[(&str, Vec<u32>)]) -> Vec<(String, Vec<u32>)> {
        pairs
            .iter()
            .map(|(t, p)| (t.to_string(), p.clone()))
            .collect()
    }

    #[test]
    fn test_add_and_lookup() {
        let mut index = InvertedIndex::new();
        index.add_postings("content", 2, terms(&[("wolv", vec![0, 3]), ("run", vec![1])]));
        index.add_postings("content", 1, terms(&[("run", vec![0])]));

        let run = index.lookup("content", "run");
        assert_eq!(run.doc_ids().collect::<Vec<_>>(), vec![1, 2]);
        assert_eq!(index.lookup("content", "wolv").get(2).unwrap().frequency, 2);
        assert_eq!(index.doc_freq("content", "run"), 2);
        assert_eq!(index.vocabulary_size("content"), 2);
        assert_eq!(index.posting_count(), 3);
    }

    #[test]
    fn test_unknown_term_is_empty() {
        let index = InvertedIndex::new();
        assert!(index.lookup("content", "nothing").is_empty());
        assert!(index.lookup("nofield", "x").is_empty());
        assert_eq!(index.doc_freq("content", "nothing"), 0);
    }

    #[test]
    fn test_remove_document_prunes() {
        let mut index = InvertedIndex::new();
        index.add_postings("title", 1, terms(&[("wolv", vec![0])]));
        index.add_postings("content", 1, terms(&[("wolv", vec![0]), ("pack", vec![3])]));
        index.add_postings("content", 2, terms(&[("pack", vec![0])]));

        assert_eq!(index.remove_document(1), 3);
        assert!(!index.contains_document(1));
        assert!(!index.contains_term("content", "wolv"));
        assert_eq!(index.vocabulary_size("title"), 0);
        assert_eq!(index.fields().collect::<Vec<_>>(), vec!["content"]);
        assert_eq!(
            index.lookup("content", "pack").doc_ids().collect::<Vec<_>>(),
            vec![2]
        );

        assert_eq!(index.remove_document(1), 0);
        assert_eq!(index.remove_document(2), 1);
        assert_eq!(index.term_count(), 0);
    }

    #[test]
    fn test_empty_term_set_leaves_no_trace() {
        let mut index = InvertedIndex::new();
        index.add_postings("content", 4, Vec::new());
        assert!(!index.contains_document(4));
        assert_eq!(index.fields().count(), 0);
    }
}
