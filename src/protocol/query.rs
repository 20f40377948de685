//! Query definitions
//!
//! A single pattern sent by a client.

/// One decoded client query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    pattern: String,
}

impl Query {
    pub fn new(pattern: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
        }
    }

    /// Decode the bytes of one read.
    ///
    /// Bytes are taken verbatim (no trimming, no terminator handling);
    /// invalid UTF-8 is replaced rather than rejected, so such a query
    /// simply matches nothing.
    pub fn decode(bytes: &[u8]) -> Self {
        Self {
            pattern: String::from_utf8_lossy(bytes).into_owned(),
        }
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.pattern.as_bytes()
    }

    pub fn into_pattern(self) -> String {
        self.pattern
    }
}
