//! Stemming analyzer used for full-text fields.
//!
//! # Pipeline
//!
//! 1. LowercaseCharFilter
//! 2. RegexTokenizer (runs of letters and digits)
//! 3. StemFilter (Porter)
//! 4. RemoveEmptyFilter

use std::sync::Arc;

use crate::analysis::analyzer::Analyzer;
use crate::analysis::analyzer::pipeline::PipelineAnalyzer;
use crate::analysis::char_filter::lowercase::LowercaseCharFilter;
use crate::analysis::token::TokenStream;
use crate::analysis::token_filter::remove_empty::RemoveEmptyFilter;
use crate::analysis::token_filter::stem::StemFilter;
use crate::analysis::tokenizer::regex::RegexTokenizer;
use crate::error::Result;

#[derive(Clone, Debug)]
pub struct StemmingAnalyzer {
    inner: PipelineAnalyzer,
}

impl StemmingAnalyzer {
    pub fn new() -> Result<Self> {
        let tokenizer = Arc::new(RegexTokenizer::new()?);
        let analyzer = PipelineAnalyzer::new(tokenizer)
            .add_char_filter(Arc::new(LowercaseCharFilter::new()))
            .add_filter(Arc::new(StemFilter::new()))
            .add_filter(Arc::new(RemoveEmptyFilter::new()))
            .with_name("stemming");

        Ok(StemmingAnalyzer { inner: analyzer })
    }

    /// Same pipeline without the stemmer.
    pub fn without_stemming() -> Result<Self> {
        let tokenizer = Arc::new(RegexTokenizer::new()?);
        let analyzer = PipelineAnalyzer::new(tokenizer)
            .add_char_filter(Arc::new(LowercaseCharFilter::new()))
            .add_filter(Arc::new(RemoveEmptyFilter::new()))
            .with_name("simple");

        Ok(StemmingAnalyzer { inner: analyzer })
    }

    pub fn inner(&self) -> &PipelineAnalyzer {
        &self.inner
    }
}

impl Analyzer for StemmingAnalyzer {
    fn analyze(&self, text: &str) -> Result<TokenStream> {
        self.inner.analyze(text)
    }

    fn name(&self) -> &'static str {
        "stemming"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stemming_analyzer() {
        let analyzer = StemmingAnalyzer::new().unwrap();
        let terms = analyzer.terms("The wolves were RUNNING, in packs!").unwrap();

        let texts: Vec<&str> = terms.iter().map(|(t, _)| t.as_str()).collect();
        assert_eq!(texts, vec!["the", "wolv", "were", "run", "in", "pack"]);

        let positions: Vec<usize> = terms.iter().map(|(_, p)| *p).collect();
        assert_eq!(positions, vec![0, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_query_and_document_agree() {
        let analyzer = StemmingAnalyzer::new().unwrap();
        let doc = analyzer.terms("wolves run in packs").unwrap();
        let query = analyzer.terms("Running").unwrap();
        assert!(doc.iter().any(|(t, _)| t == &query[0].0));
    }

    #[test]
    fn test_lowercases_before_splitting() {
        let analyzer = StemmingAnalyzer::new().unwrap();
        assert_eq!(
            analyzer.terms("İstanbul").unwrap(),
            analyzer.terms("i\u{307}stanbul").unwrap()
        );

        let text = "İstanbul Wolves";
        let tokens: Vec<_> = analyzer.analyze(text).unwrap().collect();
        let last = tokens.last().unwrap();
        assert_eq!(last.text, "wolv");
        assert_eq!(&text[last.start_offset..last.end_offset], "Wolves");
    }

    #[test]
    fn test_deterministic() {
        let analyzer = StemmingAnalyzer::new().unwrap();
        let text = "Hunting grounds, hunters and hunted";
        assert_eq!(analyzer.terms(text).unwrap(), analyzer.terms(text).unwrap());
    }

    #[test]
    fn test_empty_input() {
        let analyzer = StemmingAnalyzer::new().unwrap();
        assert!(analyzer.terms("").unwrap().is_empty());
        assert!(analyzer.terms("  ?! -- ").unwrap().is_empty());
    }

    #[test]
    fn test_without_stemming() {
        let analyzer = StemmingAnalyzer::without_stemming().unwrap();
        let terms = analyzer.terms("Running wolves").unwrap();
        assert_eq!(terms[0].0, "running");
        assert_eq!(terms[1].0, "wolves");
        assert_eq!(analyzer.inner().pipeline_name(), "simple");
    }
}
