use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Failed to create process from {path}: {message} (code {code})")]
    ProcessCreation {
        path: PathBuf,
        code: i32,
        message: String,
    },

    #[error("Failed to terminate process {pid}: {message}")]
    ProcessTermination { pid: u32, message: String },

    #[error("Failed to open file for reading: {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to open file for writing: {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to copy {from} to {to}: {source}")]
    Copy {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Search and replacement lengths differ: {search} vs {replacement} bytes")]
    LengthMismatch { search: usize, replacement: usize },

    #[error(
        "Replacement at offset {offset:#x} ({len} bytes) runs past the end of the buffer ({buffer_len} bytes)"
    )]
    OutOfBounds {
        offset: usize,
        len: usize,
        buffer_len: usize,
    },

    #[error("Search string is empty")]
    EmptySearch,

    #[error("Invalid hex input: {0}")]
    InvalidHex(String),

    #[error("Invalid file name: {name}: {reason}")]
    InvalidDestinationName { name: String, reason: String },

    #[error("Failed to read operator input: {0}")]
    Prompt(#[source] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Errors that end the program before any patching can happen.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Error::ProcessCreation { .. })
    }

    /// Errors that reject a single rule (or its input) without ending the session.
    pub fn is_rule_rejection(&self) -> bool {
        matches!(
            self,
            Error::LengthMismatch { .. } | Error::EmptySearch | Error::InvalidHex(_)
        )
    }

    /// Check if this error is a "file not found" error
    pub fn is_not_found(&self) -> bool {
        match self {
            Error::Read { source, .. }
            | Error::Write { source, .. }
            | Error::Copy { source, .. } => source.kind() == std::io::ErrorKind::NotFound,
            _ => false,
        }
    }
}
