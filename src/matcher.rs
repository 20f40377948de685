//! Matcher Module
//!
//! Fixed-length wildcard matching over the corpus.
//!
//! A pattern position is either a literal character or [`WILDCARD`], which
//! stands for exactly one arbitrary character. Lengths are counted in
//! characters and must be equal for a match; there are no back-references
//! and no variable-length wildcards.
//!
//! `scan` walks the whole corpus once per query, O(corpus × pattern length),
//! with nothing cached between queries.

use crate::corpus::Corpus;

/// Matches any single character
pub const WILDCARD: char = '?';

/// Check whether `word` matches `pattern`.
///
/// Fails on the first literal mismatch, or as soon as one side runs out of
/// characters before the other.
pub fn matches(word: &str, pattern: &str) -> bool {
    let mut word_chars = word.chars();
    let mut pattern_chars = pattern.chars();

    loop {
        match (word_chars.next(), pattern_chars.next()) {
            (None, None) => return true,
            (Some(_), None) | (None, Some(_)) => return false,
            (Some(_), Some(WILDCARD)) => continue,
            (Some(w), Some(p)) if w != p => return false,
            _ => continue,
        }
    }
}

/// True if `pattern` contains no wildcard positions
pub fn is_exact(pattern: &str) -> bool {
    !pattern.contains(WILDCARD)
}

/// Words matched by a single query, in corpus order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryResult {
    words: Vec<String>,
}

impl QueryResult {
    /// Number of matched words; always equal to `words().len()`
    pub fn count(&self) -> usize {
        self.words.len()
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn into_words(self) -> Vec<String> {
        self.words
    }
}

/// Collect every corpus word matching `pattern`
pub fn scan(corpus: &Corpus, pattern: &str) -> QueryResult {
    let words = corpus
        .iter()
        .filter(|word| matches(word, pattern))
        .cloned()
        .collect();
    QueryResult { words }
}
