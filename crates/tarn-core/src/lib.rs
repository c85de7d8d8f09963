#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Core data structures shared by the tarn compiler and runtime.
//!
//! - [`StateId`]: dense DFA state index with a `DEAD` sentinel
//! - [`ByteClasses`] / [`ByteClassSet`]: alphabet compression
//! - [`MatchSpan`]: byte offsets of a match
//! - [`Colors`]: ANSI palette for dumps and traces

mod alphabet;
mod colors;
mod span;


pub use alphabet::{ByteClassSet, ByteClasses};
pub use colors::Colors;
pub use span::MatchSpan;

/// Hard ceiling on DFA states per automaton.
///
/// Half the range of a 16-bit signed count, which keeps every id (and the
/// `DEAD` sentinel) representable in a `u16` table cell.
pub const MAX_STATE_LIMIT: usize = (i16::MAX / 2) as usize;

/// DFA state index.
///
/// Live states are dense (`0..N`) in discovery order. `DEAD` is the shared
/// absorbing, non-accepting state and is never stored as a table row.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
#[repr(transparent)]
pub struct StateId(pub u16);

impl StateId {
    pub const DEAD: Self = Self(u16::MAX);

    #[inline]
    pub fn new(index: usize) -> Self {
        debug_assert!(index < MAX_STATE_LIMIT, "state index {index} out of range");
        Self(index as u16)
    }

    #[inline]
    pub fn is_dead(self) -> bool {
        self == Self::DEAD
    }

    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }

    #[inline]
    pub fn get(self) -> u16 {
        self.0
    }
}

impl std::fmt::Display for StateId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_dead() {
            write!(f, "DEAD")
        } else {
            write!(f, "s{}", self.0)
        }
    }
}
