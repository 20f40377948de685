//! Corpus Module
//!
//! The immutable word collection every session matches against.
//!
//! ## Responsibilities
//! - Load words once at startup (file, reader, or in-memory list)
//! - Preserve insertion order; every scan walks the words in that order
//! - Never change after construction, so sessions share it via `Arc`
//!   without any locking

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::error::{Result, SearchError};

/// Immutable, ordered collection of dictionary words
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Corpus {
    /// Words in insertion order. Duplicates are kept as-is.
    words: Box<[String]>,
}

impl Corpus {
    /// Build a corpus from an in-memory list of words
    ///
    /// Words containing `\n` are dropped: a reply carries all matches on a
    /// single line, so such a word could never be sent intact.
    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut dropped = 0usize;
        let words = words
            .into_iter()
            .map(Into::into)
            .filter(|word: &String| {
                let keep = !word.contains('\n');
                if !keep {
                    dropped += 1;
                }
                keep
            })
            .collect();
        if dropped > 0 {
            tracing::warn!("Dropped {} words containing a newline", dropped);
        }
        Self { words }
    }

    /// Read one word per line.
    ///
    /// Trailing `\r` is stripped and blank lines are skipped; nothing else
    /// about a word is validated.
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self> {
        let mut words = Vec::new();
        for line in reader.lines() {
            let line = line?;
            let word = line.strip_suffix('\r').unwrap_or(&line);
            if word.is_empty() {
                continue;
            }
            words.push(word.to_string());
        }
        Ok(Self {
            words: words.into_boxed_slice(),
        })
    }

    /// Load a wordlist file
    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|e| {
            SearchError::Corpus(format!("cannot open {}: {}", path.display(), e))
        })?;
        let corpus = Self::from_reader(BufReader::new(file))?;
        tracing::debug!("Loaded {} words from {}", corpus.len(), path.display());
        Ok(corpus)
    }

    /// Number of words (duplicates included)
    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Iterate over words in insertion order
    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.words.iter()
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }
}

impl<'a> IntoIterator for &'a Corpus {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
