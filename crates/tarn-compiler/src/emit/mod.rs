//! Artifact emission.
//!
//! Converts the DFA set and the instruction listing into the binary
//! artifact format. This module handles:
//! - String table construction and literal interning
//! - Section assembly, alignment and header generation
//! - The trailing checksum

mod emitter;
mod strings;

#[cfg(test)]
mod emit_tests;

pub use emitter::{ArtifactParts, emit};
pub use strings::StringTableBuilder;

/// The artifact does not fit the format's fixed-width fields.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ArtifactError {
    #[error("too many strings: {0} (max 65535)")]
    TooManyStrings(usize),
    #[error("string blob too large: {0} bytes")]
    StringsTooLarge(usize),
    #[error("too many steps: {0} (max 65535)")]
    TooManySteps(usize),
    #[error("artifact too large: {0} bytes")]
    TooLarge(usize),
}
