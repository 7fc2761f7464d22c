use std::fmt;

use strum::{Display, EnumString};

use crate::error::{Error, Result};

/// How the engine treats rules whose search and replacement lengths differ.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum LengthPolicy {
    /// Refuse the rule with [`Error::LengthMismatch`].
    #[default]
    Reject,
    /// Overwrite `len(replacement)` bytes at each match, leaving stale bytes
    /// behind a shorter replacement and clobbering the bytes after a longer one.
    Overwrite,
}

/// A literal byte-string replacement. Rules are applied in insertion order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplacementRule {
    pub search: Vec<u8>,
    pub replacement: Vec<u8>,
}

impl ReplacementRule {
    pub fn new(search: impl Into<Vec<u8>>, replacement: impl Into<Vec<u8>>) -> Self {
        Self {
            search: search.into(),
            replacement: replacement.into(),
        }
    }

    pub fn is_length_preserving(&self) -> bool {
        self.search.len() == self.replacement.len()
    }

    /// Check the rule against a length policy before it is scanned.
    pub fn validate(&self, policy: LengthPolicy) -> Result<()> {
        if self.search.is_empty() {
            return Err(Error::EmptySearch);
        }

        let mismatch = Error::LengthMismatch {
            search: self.search.len(),
            replacement: self.replacement.len(),
        };
        match policy {
            LengthPolicy::Reject if !self.is_length_preserving() => Err(mismatch),
            // An empty replacement would resume at the match itself and never advance.
            LengthPolicy::Overwrite if self.replacement.is_empty() => Err(mismatch),
            _ => Ok(()),
        }
    }
}

impl fmt::Display for ReplacementRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "\"{}\" -> \"{}\"",
            self.search.escape_ascii(),
            self.replacement.escape_ascii()
        )
    }
}
