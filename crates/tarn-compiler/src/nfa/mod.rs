//! Thompson NFA over bytes.
//!
//! States live in an arena and are addressed by dense ids. Each edge is
//! either a byte range or an epsilon move. Built once per pattern and
//! direction, never mutated afterwards.

mod builder;
mod utf8;

#[cfg(test)]
mod nfa_tests;

pub use builder::{DEFAULT_NFA_LIMIT, NfaBuilder, NfaTooLarge};
pub use utf8::{ByteRange, utf8_sequences};

use tarn_core::{ByteClassSet, ByteClasses};

/// Index of an NFA state.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct NfaStateId(pub u32);

impl NfaStateId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Edge label.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Edge {
    Epsilon,
    /// Any byte in `lo..=hi`.
    Range(u8, u8),
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Transition {
    pub edge: Edge,
    pub target: NfaStateId,
}

#[derive(Clone, Debug, Default)]
pub struct NfaState {
    pub transitions: Vec<Transition>,
}

/// Which way the automaton reads its input.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Direction {
    Forward,
    /// Reads the input from the end; every string is byte-reversed.
    Reverse,
}

#[derive(Clone, Debug)]
pub struct Nfa {
    states: Vec<NfaState>,
    start: NfaStateId,
    accept: NfaStateId,
    direction: Direction,
}

impl Nfa {
    pub(crate) fn new(
        states: Vec<NfaState>,
        start: NfaStateId,
        accept: NfaStateId,
        direction: Direction,
    ) -> Self {
        Self {
            states,
            start,
            accept,
            direction,
        }
    }

    pub fn start(&self) -> NfaStateId {
        self.start
    }

    pub fn accept(&self) -> NfaStateId {
        self.accept
    }

    pub fn is_accepting(&self, id: NfaStateId) -> bool {
        id == self.accept
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn state(&self, id: NfaStateId) -> &NfaState {
        &self.states[id.index()]
    }

    pub fn states(&self) -> impl Iterator<Item = (NfaStateId, &NfaState)> {
        self.states
            .iter()
            .enumerate()
            .map(|(i, s)| (NfaStateId(i as u32), s))
    }

    /// Record every byte range this NFA tests.
    pub fn add_boundaries(&self, set: &mut ByteClassSet) {
        for state in &self.states {
            for t in &state.transitions {
                if let Edge::Range(lo, hi) = t.edge {
                    set.set_range(lo, hi);
                }
            }
        }
    }
}

/// Byte classes that separate every range tested by any of `nfas`.
pub fn byte_classes(nfas: &[&Nfa]) -> ByteClasses {
    let mut set = ByteClassSet::new();
    for nfa in nfas {
        nfa.add_boundaries(&mut set);
    }
    set.byte_classes()
}
