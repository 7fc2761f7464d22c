//! Prelude module for convenient imports
//!
//! ```ignore
//! use strpatch::prelude::*;
//! ```
//!
//! This brings the following into scope:
//!
//! - Session: `run_session`, `SessionConfig`, `SessionOutcome`, `Prompter`
//! - Patching: `PatchEngine`, `ReplacementRule`, `LengthPolicy`, `InputFormat`
//! - Process hold: `SuspendedLauncher`, `ProcessLauncher`
//! - Error handling: `Error`, `Result`

// Session
pub use crate::session::{Prompter, SessionConfig, SessionOutcome, run_session};

// Error handling
pub use crate::error::{Error, Result};

// Patching
pub use crate::patch::{InputFormat, LengthPolicy, PatchEngine, PatchReport, ReplacementRule};

// Process hold
pub use crate::process::{ProcessLauncher, SuspendedLauncher};
