//! # strpatch
//!
//! Core library for the strpatch binary patcher.
//!
//! This crate provides:
//! - A fixed-width byte-string replacement engine over whole files
//! - The interactive replacement session (rule collection, save decision)
//! - A suspended hold on the target executable for the session's duration
//!
//! The patched output is always a copy of the target; the target file itself
//! is only read.

pub mod error;
pub mod patch;
pub mod prelude;
pub mod process;
pub mod session;

pub use error::{Error, Result};
pub use patch::{
    InputFormat, LengthPolicy, PatchEngine, PatchReport, ReplacementRule, load_buffer,
    parse_hex_bytes, save_buffer,
};
pub use process::{
    HeldProcess, ProcessGuard, ProcessLauncher, SuspendedLauncher, SuspendedProcess, process_name,
};
pub use session::{
    Choice, Prompter, ReplacementSession, SessionConfig, SessionConfigBuilder, SessionOutcome,
    SessionState, resolve_destination, run_session,
};
