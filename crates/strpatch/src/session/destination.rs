//! Destination file name checks.

use std::fs;
use std::path::{Component, Path, PathBuf};

use crate::error::{Error, Result};

/// Resolve an operator-supplied file name inside `output_dir`.
///
/// The name must be a single plain path component and must not resolve to
/// the file being patched.
pub fn resolve_destination(name: &str, source: &Path, output_dir: &Path) -> Result<PathBuf> {
    let invalid = |reason: &str| Error::InvalidDestinationName {
        name: name.to_string(),
        reason: reason.to_string(),
    };

    if name.contains(['/', '\\']) {
        return Err(invalid("must not contain path separators"));
    }

    let candidate = Path::new(name);
    let mut components = candidate.components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) => {}
        _ => return Err(invalid("must be a plain file name")),
    }

    let destination = output_dir.join(candidate);
    if is_same_file(&destination, source) {
        return Err(invalid("is the file being patched"));
    }

    Ok(destination)
}

fn is_same_file(a: &Path, b: &Path) -> bool {
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}
