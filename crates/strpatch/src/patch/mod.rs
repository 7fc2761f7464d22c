//! Binary patch engine.
//!
//! Applies an ordered list of literal byte-string replacements to a file:
//!
//! - **Rules**: `(search, replacement)` pairs, applied in insertion order
//! - **Engine**: fixed-width in-place overwrite, resuming after each written region
//! - **Input**: decoding operator lines as text or hex bytes
//!
//! The buffer is never resized. Rules whose lengths differ are governed by
//! [`LengthPolicy`].

mod engine;
mod input;
mod rule;

pub use engine::{PatchEngine, PatchReport, load_buffer, save_buffer};
pub use input::{InputFormat, parse_hex_bytes, strip_line_ending};
pub use rule::{LengthPolicy, ReplacementRule};
