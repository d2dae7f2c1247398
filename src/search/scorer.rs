//! Relevance scoring.

use std::fmt::Debug;

use crate::document::DocId;

/// Scores the documents matching one query term.
pub trait Scorer: Send + Debug {
    /// Calculate the score contribution of the term for a document.
    fn score(&self, doc_id: DocId, term_freq: f32) -> f32;

    /// Get the boost factor for this scorer.
    fn boost(&self) -> f32;

    /// Set the boost factor for this scorer.
    fn set_boost(&mut self, boost: f32);

    /// Get the name of this scorer.
    fn name(&self) -> &'static str;
}

/// TF-IDF scorer.
///
/// `score = tf * idf` with `tf` the raw term frequency and
/// `idf = ln(total_docs / (1 + doc_freq))`, floored at zero so a term found in
/// nearly every document never ranks higher frequencies lower.
#[derive(Debug, Clone)]
pub struct TfIdfScorer {
    /// Document frequency of the term.
    doc_freq: u64,
    /// Total number of documents in the index.
    total_docs: u64,
    /// Boost factor.
    boost: f32,
}

impl TfIdfScorer {
    pub fn new(doc_freq: u64, total_docs: u64) -> Self {
        TfIdfScorer {
            doc_freq,
            total_docs,
            boost: 1.0,
        }
    }

    pub fn with_boost(mut self, boost: f32) -> Self {
        self.boost = boost;
        self
    }

    /// Inverse document frequency; zero for an empty corpus or a term that is
    /// present in almost every document.
    pub fn idf(&self) -> f32 {
        if self.total_docs == 0 {
            return 0.0;
        }

        let n = self.total_docs as f64;
        let df = self.doc_freq as f64;
        ((n / (1.0 + df)).ln() as f32).max(0.0)
    }

    pub fn doc_freq(&self) -> u64 {
        self.doc_freq
    }

    pub fn total_docs(&self) -> u64 {
        self.total_docs
    }
}

impl Scorer for TfIdfScorer {
    fn score(&self, _doc_id: DocId, term_freq: f32) -> f32 {
        if term_freq == 0.0 {
            return 0.0;
        }
        self.boost * term_freq * self.idf()
    }

    fn boost(&self) -> f32 {
        self.boost
    }

    fn set_boost(&mut self, boost: f32) {
        self.boost = boost;
    }

    fn name(&self) -> &'static str {
        "TF-IDF"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_idf() {
        assert!((TfIdfScorer::new(1, 10).idf() - 5.0f32.ln()).abs() < 1e-6);
        assert_eq!(TfIdfScorer::new(0, 1).idf(), 0.0);
        assert_eq!(TfIdfScorer::new(2, 2).idf(), 0.0);
        assert_eq!(TfIdfScorer::new(9, 10).idf(), 0.0);
        assert_eq!(TfIdfScorer::new(3, 0).idf(), 0.0);
    }

    #[test]
    fn test_score_is_tf_times_idf() {
        let scorer = TfIdfScorer::new(1, 4);
        let idf = 2.0f32.ln();

        assert!((scorer.score(0, 1.0) - idf).abs() < 1e-6);
        assert!((scorer.score(0, 3.0) - 3.0 * idf).abs() < 1e-6);
        assert_eq!(scorer.score(0, 0.0), 0.0);
    }

    #[test]
    fn test_higher_frequency_scores_higher() {
        let scorer = TfIdfScorer::new(2, 8);
        assert!(scorer.score(0, 5.0) >= scorer.score(1, 2.0));
    }

    #[test]
    fn test_common_term_never_inverts_frequency_order() {
        let scorer = TfIdfScorer::new(2, 2);
        let low = scorer.score(0, 1.0);
        let high = scorer.score(1, 3.0);
        assert!(high >= low);
        assert!(low >= 0.0);
    }

    #[test]
    fn test_boost() {
        let mut scorer = TfIdfScorer::new(1, 4).with_boost(2.0);
        assert_eq!(scorer.boost(), 2.0);
        assert!((scorer.score(0, 1.0) - 2.0 * 2.0f32.ln()).abs() < 1e-6);

        scorer.set_boost(1.0);
        assert_eq!(scorer.name(), "TF-IDF");
    }
}
