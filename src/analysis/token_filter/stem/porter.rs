//! Porter stemming algorithm implementation.
//!
//! The Porter stemmer applies a series of suffix rewrite rules in five steps:
//! 1. Plurals, -ed/-ing suffixes and terminal y
//! 2. -ational → -ate, -tional → -tion, etc.
//! 3. -icate → -ic, -ative → "", etc.
//! 4. Remove -al, -ance, -ence, etc.
//! 5. Remove final -e and -ll
//!
//! Only lowercase ASCII words are rewritten; anything else (digits, accented or
//! non-Latin words) is returned unchanged, so the stemmer never splits a multi-byte
//! character.
//!
//! # Examples
//!
//! ```
//! use wolfsearch::analysis::token_filter::stem::Stemmer;
//! use wolfsearch::analysis::token_filter::stem::porter::PorterStemmer;
//!
//! let stemmer = PorterStemmer::new();
//!
//! assert_eq!(stemmer.stem("running"), "run");
//! assert_eq!(stemmer.stem("flies"), "fli");
//! assert_eq!(stemmer.stem("traditional"), "tradit");
//! ```

use crate::analysis::token_filter::stem::Stemmer;

const STEP2_SUFFIXES: [(&str, &str); 20] = [
    ("ational", "ate"),
    ("tional", "tion"),
    ("enci", "ence"),
    ("anci", "ance"),
    ("izer", "ize"),
    ("abli", "able"),
    ("alli", "al"),
    ("entli", "ent"),
    ("eli", "e"),
    ("ousli", "ous"),
    ("ization", "ize"),
    ("ation", "ate"),
    ("ator", "ate"),
    ("alism", "al"),
    ("iveness", "ive"),
    ("fulness", "ful"),
    ("ousness", "ous"),
    ("aliti", "al"),
    ("iviti", "ive"),
    ("biliti", "ble"),
];

const STEP3_SUFFIXES: [(&str, &str); 7] = [
    ("icate", "ic"),
    ("ative", ""),
    ("alize", "al"),
    ("iciti", "ic"),
    ("ical", "ic"),
    ("ful", ""),
    ("ness", ""),
];

// Longer suffixes precede the shorter ones they contain ("ement" before "ment").
const STEP4_SUFFIXES: [&str; 19] = [
    "al", "ance", "ence", "er", "ic", "able", "ible", "ant", "ement", "ment", "ent", "ion", "ou",
    "ism", "ate", "iti", "ous", "ive", "ize",
];

/// Porter stemming algorithm implementation.
#[derive(Debug, Clone, Copy, Default)]
pub struct PorterStemmer;

impl PorterStemmer {
    /// Create a new Porter stemmer.
    pub fn new() -> Self {
        PorterStemmer
    }

    /// Check if the byte at `pos` acts as a vowel.
    fn is_vowel(word: &[u8], pos: usize) -> bool {
        match word[pos] {
            b'a' | b'e' | b'i' | b'o' | b'u' => true,
            b'y' => pos > 0 && !Self::is_vowel(word, pos - 1),
            _ => false,
        }
    }

    /// Calculate the measure of a word (number of VC sequences).
    fn measure(word: &[u8]) -> usize {
        let n = word.len();
        let mut m = 0;
        let mut i = 0;

        while i < n && !Self::is_vowel(word, i) {
            i += 1;
        }

        while i < n {
            while i < n && Self::is_vowel(word, i) {
                i += 1;
            }
            if i >= n {
                break;
            }
            m += 1;
            while i < n && !Self::is_vowel(word, i) {
                i += 1;
            }
        }

        m
    }

    fn contains_vowel(word: &[u8]) -> bool {
        (0..word.len()).any(|i| Self::is_vowel(word, i))
    }

    fn ends_with_double_consonant(word: &[u8]) -> bool {
        let len = word.len();
        len >= 2 && word[len - 1] == word[len - 2] && !Self::is_vowel(word, len - 1)
    }

    /// Consonant-vowel-consonant ending where the final consonant is not w, x or y.
    fn ends_cvc(word: &[u8]) -> bool {
        let len = word.len();
        len >= 3
            && !Self::is_vowel(word, len - 3)
            && Self::is_vowel(word, len - 2)
            && !Self::is_vowel(word, len - 1)
            && !matches!(word[len - 1], b'w' | b'x' | b'y')
    }

    fn step1a(word: &mut String) {
        if word.ends_with("sses") || word.ends_with("ies") {
            word.truncate(word.len() - 2);
        } else if word.ends_with('s') && !word.ends_with("ss") {
            word.truncate(word.len() - 1);
        }
    }

    fn step1b(word: &mut String) {
        if word.ends_with("eed") {
            if Self::measure(&word.as_bytes()[..word.len() - 3]) > 0 {
                word.truncate(word.len() - 1);
            }
            return;
        }

        let suffix_len = if word.ends_with("ed") {
            2
        } else if word.ends_with("ing") {
            3
        } else {
            return;
        };

        if !Self::contains_vowel(&word.as_bytes()[..word.len() - suffix_len]) {
            return;
        }
        word.truncate(word.len() - suffix_len);

        let bytes = word.as_bytes();
        if word.ends_with("at") || word.ends_with("bl") || word.ends_with("iz") {
            word.push('e');
        } else if Self::ends_with_double_consonant(bytes)
            && !matches!(bytes[bytes.len() - 1], b'l' | b's' | b'z')
        {
            word.truncate(word.len() - 1);
        } else if Self::measure(bytes) == 1 && Self::ends_cvc(bytes) {
            word.push('e');
        }
    }

    fn step1c(word: &mut String) {
        if word.ends_with('y') && Self::contains_vowel(&word.as_bytes()[..word.len() - 1]) {
            word.truncate(word.len() - 1);
            word.push('i');
        }
    }

    /// Replace the first matching suffix whose stem has measure > 0.
    fn replace_first(word: &mut String, rules: &[(&str, &str)]) {
        for (old_suffix, new_suffix) in rules {
            if word.ends_with(old_suffix) {
                let stem_len = word.len() - old_suffix.len();
                if Self::measure(&word.as_bytes()[..stem_len]) > 0 {
                    word.truncate(stem_len);
                    word.push_str(new_suffix);
                }
                return;
            }
        }
    }

    fn step4(word: &mut String) {
        for suffix in STEP4_SUFFIXES {
            if word.ends_with(suffix) {
                let stem_len = word.len() - suffix.len();
                let stem = &word.as_bytes()[..stem_len];
                let allowed = suffix != "ion"
                    || matches!(stem.last(), Some(b's') | Some(b't'));
                if allowed && Self::measure(stem) > 1 {
                    word.truncate(stem_len);
                }
                return;
            }
        }
    }

    fn step5(word: &mut String) {
        if word.ends_with('e') {
            let stem = &word.as_bytes()[..word.len() - 1];
            let m = Self::measure(stem);
            if m > 1 || (m == 1 && !Self::ends_cvc(stem)) {
                word.truncate(word.len() - 1);
            }
        }

        if word.ends_with("ll") && Self::measure(word.as_bytes()) > 1 {
            word.truncate(word.len() - 1);
        }
    }
}

impl Stemmer for PorterStemmer {
    fn stem(&self, word: &str) -> String {
        if word.len() <= 2 || !word.bytes().all(|b| b.is_ascii_lowercase()) {
            return word.to_string();
        }

        let mut word = word.to_string();
        Self::step1a(&mut word);
        Self::step1b(&mut word);
        Self::step1c(&mut word);
        Self::replace_first(&mut word, &STEP2_SUFFIXES);
        Self::replace_first(&mut word, &STEP3_SUFFIXES);
        Self::step4(&mut word);
        Self::step5(&mut word);
        word
    }

    fn name(&self) -> &'static str {
        "porter"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_porter_stemmer() {
        let stemmer = PorterStemmer::new();

        assert_eq!(stemmer.stem("running"), "run");
        assert_eq!(stemmer.stem("run"), "run");
        assert_eq!(stemmer.stem("runs"), "run");
        assert_eq!(stemmer.stem("flies"), "fli");
        assert_eq!(stemmer.stem("died"), "di");
        assert_eq!(stemmer.stem("agreed"), "agre");
        assert_eq!(stemmer.stem("disabled"), "disabl");
        assert_eq!(stemmer.stem("measuring"), "measur");
        assert_eq!(stemmer.stem("itemization"), "item");
        assert_eq!(stemmer.stem("sensational"), "sensat");
        assert_eq!(stemmer.stem("traditional"), "tradit");
        assert_eq!(stemmer.stem("caresses"), "caress");
        assert_eq!(stemmer.stem("ponies"), "poni");
        assert_eq!(stemmer.stem("happy"), "happi");
        assert_eq!(stemmer.stem("hopping"), "hop");
        assert_eq!(stemmer.stem("filing"), "file");
    }

    #[test]
    fn test_wolves_and_packs() {
        let stemmer = PorterStemmer::new();
        assert_eq!(stemmer.stem("wolves"), "wolv");
        assert_eq!(stemmer.stem("packs"), "pack");
        assert_eq!(stemmer.stem("cats"), "cat");
    }

    #[test]
    fn test_non_ascii_and_short_words_untouched() {
        let stemmer = PorterStemmer::new();
        assert_eq!(stemmer.stem("is"), "is");
        assert_eq!(stemmer.stem("cafés"), "cafés");
        assert_eq!(stemmer.stem("2024s"), "2024s");
        assert_eq!(stemmer.stem("Running"), "Running");
    }

    #[test]
    fn test_porter_measure() {
        assert_eq!(PorterStemmer::measure(b"tree"), 0);
        assert_eq!(PorterStemmer::measure(b"trees"), 1);
        assert_eq!(PorterStemmer::measure(b"trouble"), 1);
        assert_eq!(PorterStemmer::measure(b"troubles"), 2);
    }

    #[test]
    fn test_porter_vowel_detection() {
        let word = b"trouble";

        assert!(!PorterStemmer::is_vowel(word, 0));
        assert!(!PorterStemmer::is_vowel(word, 1));
        assert!(PorterStemmer::is_vowel(word, 2));
        assert!(PorterStemmer::is_vowel(word, 3));
        assert!(!PorterStemmer::is_vowel(word, 4));
        assert!(!PorterStemmer::is_vowel(word, 5));
        assert!(PorterStemmer::is_vowel(word, 6));
        assert!(PorterStemmer::is_vowel(b"syzygy", 1));
    }
}
