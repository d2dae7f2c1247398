//! Lowercase char filter.
//!
//! # Examples
//!
//! ```
//! use wolfsearch::analysis::char_filter::CharFilter;
//! use wolfsearch::analysis::char_filter::lowercase::LowercaseCharFilter;
//!
//! let (text, transformations) = LowercaseCharFilter::new().filter("Grey WOLF");
//! assert_eq!(text, "grey wolf");
//! assert!(transformations.is_empty());
//! ```

use crate::analysis::char_filter::{CharFilter, Transformation};

/// Lowercases the whole text ahead of tokenization.
///
/// ASCII input takes the byte-wise path. Otherwise each char is lowercased on its
/// own and a [`Transformation`] is recorded wherever the byte length changes.
#[derive(Clone, Debug, Default)]
pub struct LowercaseCharFilter;

impl LowercaseCharFilter {
    pub fn new() -> Self {
        LowercaseCharFilter
    }
}

impl CharFilter for LowercaseCharFilter {
    fn filter(&self, input: &str) -> (String, Vec<Transformation>) {
        if input.is_ascii() {
            return (input.to_ascii_lowercase(), Vec::new());
        }

        let mut output = String::with_capacity(input.len());
        let mut transformations = Vec::new();

        for (start, ch) in input.char_indices() {
            let new_start = output.len();
            output.extend(ch.to_lowercase());

            let end = start + ch.len_utf8();
            if output.len() - new_start != ch.len_utf8() {
                transformations.push(Transformation::new(start, end, new_start, output.len()));
            }
        }

        (output, transformations)
    }

    fn name(&self) -> &'static str {
        "lowercase"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lowercase_non_ascii() {
        let (text, transformations) = LowercaseCharFilter::new().filter("Ärger QUICK");
        assert_eq!(text, "ärger quick");
        assert!(transformations.is_empty());
    }

    #[test]
    fn test_length_changes_are_recorded() {
        let (text, transformations) = LowercaseCharFilter::new().filter("aİb");
        assert_eq!(text, "ai\u{307}b");
        assert_eq!(transformations, vec![Transformation::new(1, 3, 1, 4)]);
    }
}
