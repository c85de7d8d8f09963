//! Dispatch program generation.
//!
//! Produces the backend-agnostic instruction listing for a matcher: one
//! routine per public operation, written with symbolic labels and laid
//! out into a flat step array.

mod builder;
mod layout;
mod routines;


pub use builder::{InstructionIR, Label, Routine, RoutineBuilder};
pub use layout::{Listing, layout};
pub use routines::{contained_in, find, matches};

use tarn_bytecode::StringId;

/// Cheap rejection tests run before any DFA.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Prefilters {
    /// Minimum match length in bytes; 0 disables the test.
    pub min_len: u32,
    pub max_len: Option<u32>,
    /// Required substring.
    pub literal: Option<StringId>,
}

/// Generate and lay out `matches`, `find` and `contained_in`.
pub fn generate(prefilters: &Prefilters) -> Listing {
    layout(&[
        matches(prefilters),
        find(prefilters),
        contained_in(prefilters),
    ])
}
