//! Posting lists: per-term records of which documents contain the term.

use serde::{Deserialize, Serialize};

use crate::document::DocId;

/// A single posting in a posting list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Posting {
    /// Document ID.
    pub doc_id: DocId,
    /// Term frequency in the document.
    pub frequency: u32,
    /// Positions of the term in the field, ascending (for phrase queries).
    pub positions: Vec<u32>,
}

impl Posting {
    /// Create a posting from the positions at which the term occurs.
    pub fn with_positions(doc_id: DocId, mut positions: Vec<u32>) -> Self {
        positions.sort_unstable();
        Posting {
            doc_id,
            frequency: positions.len() as u32,
            positions,
        }
    }

    pub fn frequency(&self) -> u32 {
        self.frequency
    }

    pub fn positions(&self) -> &[u32] {
        &self.positions
    }

    /// Whether the term occurs at `position`.
    pub fn has_position(&self, position: u32) -> bool {
        self.positions.binary_search(&position).is_ok()
    }
}

/// The postings of one term, ordered by document id with no duplicates.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostingList {
    postings: Vec<Posting>,
}

impl PostingList {
    pub const fn new() -> Self {
        PostingList {
            postings: Vec::new(),
        }
    }

    /// Insert a posting, keeping document-id order.
    ///
    /// A posting for a document already in the list is merged into the existing one.
    pub fn add_posting(&mut self, posting: Posting) {
        match self
            .postings
            .binary_search_by_key(&posting.doc_id, |p| p.doc_id)
        {
            Ok(pos) => {
                let existing = &mut self.postings[pos];
                existing.frequency += posting.frequency;
                existing.positions.extend(posting.positions);
                existing.positions.sort_unstable();
            }
            Err(pos) => self.postings.insert(pos, posting),
        }
    }

    /// Remove the posting for `doc_id`, returning it if present.
    pub fn remove(&mut self, doc_id: DocId) -> Option<Posting> {
        let pos = self
            .postings
            .binary_search_by_key(&doc_id, |p| p.doc_id)
            .ok()?;
        Some(self.postings.remove(pos))
    }

    pub fn get(&self, doc_id: DocId) -> Option<&Posting> {
        self.postings
            .binary_search_by_key(&doc_id, |p| p.doc_id)
            .ok()
            .map(|pos| &self.postings[pos])
    }

    pub fn contains(&self, doc_id: DocId) -> bool {
        self.get(doc_id).is_some()
    }

    /// Number of documents containing the term.
    pub fn doc_frequency(&self) -> usize {
        self.postings.len()
    }

    pub fn len(&self) -> usize {
        self.postings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.postings.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Posting> {
        self.postings.iter()
    }

    pub fn doc_ids(&self) -> impl Iterator<Item = DocId> + '_ {
        self.postings.iter().map(|p| p.doc_id)
    }
}

impl<'a> IntoIterator for &'a PostingList {
    type Item = &'a Posting;
    type IntoIter = std::slice::Iter<'a, Posting>;

    fn into_iter(self) -> Self::IntoIter {
        self.postings.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_posting_creation() {
        let posting = Posting::with_positions(7, vec![9, 2, 5]);
        assert_eq!(posting.frequency(), 3);
        assert_eq!(posting.positions(), &[2, 5, 9]);
        assert!(posting.has_position(5));
        assert!(!posting.has_position(4));
    }

    #[test]
    fn test_merge_insert_keeps_order() {
        let mut list = PostingList::new();
        for doc_id in [5, 1, 9, 3] {
            list.add_posting(Posting::with_positions(doc_id, vec![0]));
        }

        assert_eq!(list.doc_ids().collect::<Vec<_>>(), vec![1, 3, 5, 9]);
        assert_eq!(list.doc_frequency(), 4);
    }

    #[test]
    fn test_duplicate_doc_is_merged() {
        let mut list = PostingList::new();
        list.add_posting(Posting::with_positions(2, vec![0]));
        list.add_posting(Posting::with_positions(2, vec![4]));

        assert_eq!(list.len(), 1);
        let posting = list.get(2).unwrap();
        assert_eq!(posting.frequency(), 2);
        assert_eq!(posting.positions(), &[0, 4]);
    }

    #[test]
    fn test_remove() {
        let mut list = PostingList::new();
        list.add_posting(Posting::with_positions(1, vec![0, 4]));
        list.add_posting(Posting::with_positions(2, vec![1, 2, 7]));

        assert_eq!(list.remove(1).map(|p| p.frequency), Some(2));
        assert!(list.remove(1).is_none());
        assert!(!list.contains(1));
        assert_eq!(list.get(2).map(Posting::frequency), Some(3));

        list.remove(2);
        assert!(list.is_empty());
    }
}
