//! Char filters rewrite the raw text before it reaches the tokenizer.
//!
//! A filter reports every span whose byte length changed as a [`Transformation`], so
//! the pipeline can map token offsets back onto the text it was given.

/// A span of the original text and the span that replaced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transformation {
    pub original_start: usize,
    pub original_end: usize,
    pub new_start: usize,
    pub new_end: usize,
}

impl Transformation {
    pub fn new(original_start: usize, original_end: usize, new_start: usize, new_end: usize) -> Self {
        Transformation {
            original_start,
            original_end,
            new_start,
            new_end,
        }
    }
}

/// Trait for filters that transform text before tokenization.
pub trait CharFilter: Send + Sync {
    /// Return the filtered text and the length-changing spans, ordered by position.
    fn filter(&self, input: &str) -> (String, Vec<Transformation>);

    fn name(&self) -> &'static str;
}

/// Map a byte offset in filtered text back to the original text.
///
/// An offset that falls inside a replaced span snaps to the nearer edge of the
/// original span, rounding outwards, so the result is always a char boundary.
pub fn correct_offset(offset: usize, transformations: &[Transformation]) -> usize {
    let mut corrected = offset as isize;

    for t in transformations {
        if offset >= t.new_end {
            let original_len = (t.original_end - t.original_start) as isize;
            let new_len = (t.new_end - t.new_start) as isize;
            corrected += original_len - new_len;
        } else if offset > t.new_start {
            return t.original_end;
        } else {
            break;
        }
    }

    corrected.max(0) as usize
}

pub mod lowercase;

pub use lowercase::LowercaseCharFilter;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offsets_after_a_longer_replacement() {
        // "İx": 'İ' is 2 bytes and lowercases to 3.
        let transformations = [Transformation::new(0, 2, 0, 3)];

        assert_eq!(correct_offset(0, &transformations), 0);
        assert_eq!(correct_offset(1, &transformations), 2);
        assert_eq!(correct_offset(3, &transformations), 2);
        assert_eq!(correct_offset(4, &transformations), 3);
    }

    #[test]
    fn test_offsets_after_a_shorter_replacement() {
        // "aẞb": 'ẞ' is 3 bytes and lowercases to the 2-byte 'ß'.
        let transformations = [Transformation::new(1, 4, 1, 3)];

        assert_eq!(correct_offset(1, &transformations), 1);
        assert_eq!(correct_offset(3, &transformations), 4);
        assert_eq!(correct_offset(4, &transformations), 5);
    }

    #[test]
    fn test_no_transformations() {
        assert_eq!(correct_offset(7, &[]), 7);
    }
}
