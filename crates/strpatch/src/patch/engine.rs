//! Fixed-width in-place replacement over a whole-file buffer.

use std::fs;
use std::path::Path;

use memchr::memmem;
use tracing::{debug, info};

use super::rule::{LengthPolicy, ReplacementRule};
use crate::error::{Error, Result};

/// Outcome of applying a rule sequence to one buffer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PatchReport {
    /// Replacements made by each rule, in rule order
    pub replacements: Vec<usize>,
    /// Buffer length, unchanged by patching
    pub buffer_len: usize,
}

impl PatchReport {
    pub fn total_replacements(&self) -> usize {
        self.replacements.iter().sum()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PatchEngine {
    policy: LengthPolicy,
}

impl PatchEngine {
    pub fn new(policy: LengthPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> LengthPolicy {
        self.policy
    }

    /// Load `path`, apply `rules` in order and write the result back over it.
    ///
    /// Nothing is written unless every rule applies cleanly.
    pub fn patch_file<P: AsRef<Path>>(
        &self,
        path: P,
        rules: &[ReplacementRule],
    ) -> Result<PatchReport> {
        let path = path.as_ref();
        let mut buffer = load_buffer(path)?;
        let report = self.apply_all(&mut buffer, rules)?;
        save_buffer(path, &buffer)?;

        info!(
            "Patched {} ({} bytes, {} replacements from {} rules)",
            path.display(),
            report.buffer_len,
            report.total_replacements(),
            rules.len()
        );
        Ok(report)
    }

    /// Apply every rule to the same evolving buffer.
    pub fn apply_all(&self, buffer: &mut [u8], rules: &[ReplacementRule]) -> Result<PatchReport> {
        let mut report = PatchReport {
            replacements: Vec::with_capacity(rules.len()),
            buffer_len: buffer.len(),
        };

        for (index, rule) in rules.iter().enumerate() {
            let count = self.apply_rule(buffer, rule)?;
            debug!("Rule #{} {}: {} replacements", index + 1, rule, count);
            report.replacements.push(count);
        }

        Ok(report)
    }

    /// Overwrite every non-overlapping occurrence of `rule.search`, left to right.
    ///
    /// After a match at `offset` the scan resumes at `offset + len(replacement)`,
    /// so bytes just written are never matched again by the same rule.
    pub fn apply_rule(&self, buffer: &mut [u8], rule: &ReplacementRule) -> Result<usize> {
        rule.validate(self.policy)?;

        let finder = memmem::Finder::new(&rule.search);
        let width = rule.replacement.len();
        let mut count = 0;
        let mut pos = 0;

        while pos < buffer.len() {
            let Some(found) = finder.find(&buffer[pos..]) else {
                break;
            };
            let offset = pos + found;
            let end = offset + width;
            if end > buffer.len() {
                return Err(Error::OutOfBounds {
                    offset,
                    len: width,
                    buffer_len: buffer.len(),
                });
            }

            buffer[offset..end].copy_from_slice(&rule.replacement);
            count += 1;
            pos = end;
        }

        Ok(count)
    }
}

/// Read a whole file into memory.
pub fn load_buffer<P: AsRef<Path>>(path: P) -> Result<Vec<u8>> {
    let path = path.as_ref();
    fs::read(path).map_err(|source| Error::Read {
        path: path.to_path_buf(),
        source,
    })
}

/// Truncate `path` and write `buffer` as its full contents.
pub fn save_buffer<P: AsRef<Path>>(path: P, buffer: &[u8]) -> Result<()> {
    let path = path.as_ref();
    fs::write(path, buffer).map_err(|source| Error::Write {
        path: path.to_path_buf(),
        source,
    })
}
