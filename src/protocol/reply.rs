//! Reply definitions
//!
//! The answer to one query, as it travels on the wire.

use std::fmt;

use crate::matcher::QueryResult;
use super::codec::{REPLY_HEADER_PREFIX, WORD_SEPARATOR};

/// A reply to send to (or received by) a client
///
/// The word line is kept verbatim. Words are opaque, so a word that itself
/// contains `", "` cannot be told apart from two words once joined; the
/// header count is the authoritative number of matches.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reply {
    /// Match count from the reply header
    count: usize,

    /// Matched words joined with `", "`, without the terminator
    body: String,
}

impl Reply {
    /// Create a reply whose count is the number of words
    pub fn new<S: AsRef<str>>(words: &[S]) -> Self {
        let body = words
            .iter()
            .map(AsRef::as_ref)
            .collect::<Vec<&str>>()
            .join(WORD_SEPARATOR);
        Self {
            count: words.len(),
            body,
        }
    }

    /// Rebuild a reply from its decoded header count and word line
    pub(crate) fn from_parts(count: usize, body: String) -> Self {
        Self { count, body }
    }

    /// Number of matches announced in the header
    pub fn count(&self) -> usize {
        self.count
    }

    /// The word line exactly as sent
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Matched words, split on `", "`.
    ///
    /// Best effort: may differ from `count()` when a word contains the
    /// separator.
    pub fn words(&self) -> Vec<&str> {
        if self.body.is_empty() {
            return Vec::new();
        }
        self.body.split(WORD_SEPARATOR).collect()
    }
}

impl From<QueryResult> for Reply {
    fn from(result: QueryResult) -> Self {
        Self::new(result.words())
    }
}

impl From<&QueryResult> for Reply {
    fn from(result: &QueryResult) -> Self {
        Self::new(result.words())
    }
}

/// Renders the exact wire text
impl fmt::Display for Reply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}{})", REPLY_HEADER_PREFIX, self.count)?;
        f.write_str(&self.body)?;
        f.write_str("\n")
    }
}
