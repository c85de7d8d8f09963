//! Deterministic automata.
//!
//! A [`Dfa`] is a dense `state × class` table. Live states are numbered
//! `0..N` in discovery order; `StateId::DEAD` is the shared absorbing
//! reject state and has no row.

mod determinize;
mod minimize;
mod prune;

#[cfg(test)]
mod dfa_tests;

pub use determinize::{KEY_ENTRIES_PER_STATE, Mode, StateLimitExceeded, determinize};
pub use minimize::minimize;
pub use prune::prune;

use tarn_bytecode::DfaRole;
use tarn_core::{ByteClasses, StateId};

use crate::nfa::Nfa;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Dfa {
    role: DfaRole,
    start: StateId,
    stride: usize,
    transitions: Vec<StateId>,
    accepting: Vec<bool>,
}

impl Dfa {
    pub fn new(
        role: DfaRole,
        start: StateId,
        stride: usize,
        transitions: Vec<StateId>,
        accepting: Vec<bool>,
    ) -> Self {
        debug_assert_eq!(transitions.len(), accepting.len() * stride);
        Self {
            role,
            start,
            stride,
            transitions,
            accepting,
        }
    }

    pub fn role(&self) -> DfaRole {
        self.role
    }

    pub fn start(&self) -> StateId {
        self.start
    }

    /// Number of classes per row.
    pub fn stride(&self) -> usize {
        self.stride
    }

    pub fn state_count(&self) -> usize {
        self.accepting.len()
    }

    pub fn transitions(&self) -> &[StateId] {
        &self.transitions
    }

    /// Row of a live state.
    pub fn row(&self, state: StateId) -> &[StateId] {
        let base = state.index() * self.stride;
        &self.transitions[base..base + self.stride]
    }

    pub fn next(&self, state: StateId, class: usize) -> StateId {
        if state.is_dead() {
            return StateId::DEAD;
        }
        self.transitions[state.index() * self.stride + class]
    }

    pub fn is_accepting(&self, state: StateId) -> bool {
        !state.is_dead() && self.accepting[state.index()]
    }

    /// Accepts nothing at all.
    pub fn is_empty(&self) -> bool {
        self.start.is_dead()
    }

    /// Run over `input` from the start state, returning the final state.
    pub fn walk(&self, classes: &ByteClasses, input: &[u8]) -> StateId {
        let mut state = self.start;
        for &b in input {
            state = self.next(state, classes.get(b) as usize);
            if state.is_dead() {
                break;
            }
        }
        state
    }

    /// Same automaton over a different class alphabet. `columns[c]` names
    /// the old class whose column becomes new class `c`.
    pub fn remap_columns(&self, columns: &[usize]) -> Dfa {
        let mut transitions = Vec::with_capacity(self.state_count() * columns.len());
        for s in 0..self.state_count() {
            let row = self.row(StateId::new(s));
            transitions.extend(columns.iter().map(|&old| row[old]));
        }
        Dfa::new(
            self.role,
            self.start,
            columns.len(),
            transitions,
            self.accepting.clone(),
        )
    }
}

/// Determinize, prune and minimize in one go.
pub fn build(
    nfa: &Nfa,
    classes: &ByteClasses,
    mode: Mode,
    role: DfaRole,
    cap: usize,
    pattern: &str,
) -> Result<Dfa, StateLimitExceeded> {
    let dfa = determinize(nfa, classes, mode, role, cap, pattern)?;
    Ok(minimize(&prune(&dfa)))
}
