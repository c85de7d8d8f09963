//! Subset construction.
//!
//! DFA states are keyed by the NFA states they stand for and numbered in
//! the order they are discovered, which makes the output a pure function
//! of the NFA. Keys only hold states with byte edges plus the accept
//! state; pure epsilon states are implied by the closure.

use indexmap::IndexSet;
use tarn_bytecode::DfaRole;
use tarn_core::{ByteClasses, StateId};

use super::Dfa;
use crate::nfa::{Edge, Nfa, NfaStateId};

/// How the start state is fed to the automaton.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Mode {
    /// Only from the first byte.
    Anchored,
    /// From every offset, keeping one thread group per start offset (oldest
    /// first). Once a group accepts, younger groups are dropped and no new
    /// ones start, so the last accepting offset is the end of the
    /// leftmost-longest match.
    Leftmost,
    /// From every offset; the first accept is final.
    Membership,
}

/// NFA states held across all keys, per allowed DFA state. Patterns whose
/// keys outgrow this are rejected before the state cap is reached.
pub const KEY_ENTRIES_PER_STATE: usize = 256;

/// Subset construction would exceed its state budget.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("pattern {pattern:?} needs more than {cap} DFA states")]
pub struct StateLimitExceeded {
    pub cap: usize,
    pub pattern: String,
}

/// A DFA state: NFA thread groups (each sorted, disjoint) plus whether a
/// match has been seen. The empty key is `DEAD`.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
struct StateKey {
    groups: Vec<Vec<u32>>,
    started: bool,
}

impl StateKey {
    fn is_dead(&self) -> bool {
        self.groups.is_empty()
    }

    fn entries(&self) -> usize {
        self.groups.iter().map(Vec::len).sum()
    }
}

struct Determinizer<'a> {
    nfa: &'a Nfa,
    mode: Mode,
    /// States worth keeping in a key: byte edges or accept.
    keep: Vec<bool>,
    /// Generation stamps; `seen[s] == generation` marks `s` as taken.
    seen: Vec<u32>,
    generation: u32,
    stack: Vec<u32>,
}

/// Build the DFA for `nfa` over `classes`.
pub fn determinize(
    nfa: &Nfa,
    classes: &ByteClasses,
    mode: Mode,
    role: DfaRole,
    cap: usize,
    pattern: &str,
) -> Result<Dfa, StateLimitExceeded> {
    let limit = || StateLimitExceeded {
        cap,
        pattern: pattern.to_string(),
    };
    let representatives = classes.representatives();
    let stride = representatives.len();
    let keep = (0..nfa.len())
        .map(|s| {
            let state = nfa.state(NfaStateId(s as u32));
            s as u32 == nfa.accept().0
                || state.transitions.iter().any(|t| matches!(t.edge, Edge::Range(..)))
        })
        .collect();
    let mut det = Determinizer {
        nfa,
        mode,
        keep,
        seen: vec![0; nfa.len()],
        generation: 0,
        stack: Vec::new(),
    };

    let budget = cap.saturating_mul(KEY_ENTRIES_PER_STATE);
    let mut states: IndexSet<StateKey> = IndexSet::new();
    let start = det.start_key();
    let mut entries = start.entries();
    if cap == 0 || entries > budget {
        return Err(limit());
    }
    states.insert(start);

    let mut transitions = Vec::new();
    let mut accepting = Vec::new();
    let mut i = 0;
    while i < states.len() {
        let key = &states[i];
        accepting.push(det.is_accepting(key));
        let successors: Vec<StateKey> = representatives
            .iter()
            .map(|&byte| det.step(key, byte))
            .collect();

        for next in successors {
            if next.is_dead() {
                transitions.push(StateId::DEAD);
                continue;
            }
            let id = match states.get_index_of(&next) {
                Some(id) => id,
                None => {
                    entries += next.entries();
                    if states.len() >= cap || entries > budget {
                        return Err(limit());
                    }
                    states.insert_full(next).0
                }
            };
            transitions.push(StateId::new(id));
        }
        i += 1;
    }

    Ok(Dfa::new(role, StateId::new(0), stride, transitions, accepting))
}

impl Determinizer<'_> {
    fn accept(&self) -> u32 {
        self.nfa.accept().0
    }

    fn is_accepting(&self, key: &StateKey) -> bool {
        let accept = self.accept();
        key.groups.iter().any(|g| g.binary_search(&accept).is_ok())
    }

    fn start_key(&mut self) -> StateKey {
        self.generation += 1;
        let mut group = Vec::new();
        self.add(self.nfa.start().0, &mut group);
        self.close(&mut group);
        self.compact(&mut group);
        group.sort_unstable();
        self.normalize(StateKey {
            groups: vec![group],
            started: false,
        })
    }

    fn step(&mut self, key: &StateKey, byte: u8) -> StateKey {
        if self.mode == Mode::Membership && key.started {
            return key.clone();
        }

        self.generation += 1;
        let mut groups = Vec::with_capacity(key.groups.len() + 1);
        let mut merged = Vec::new();
        for group in &key.groups {
            let mut next = Vec::new();
            for &s in group {
                for t in &self.nfa.state(NfaStateId(s)).transitions {
                    if let Edge::Range(lo, hi) = t.edge
                        && lo <= byte
                        && byte <= hi
                    {
                        self.add(t.target.0, &mut next);
                    }
                }
            }
            self.close(&mut next);
            self.compact(&mut next);
            match self.mode {
                Mode::Leftmost => {
                    if !next.is_empty() {
                        next.sort_unstable();
                        groups.push(next);
                    }
                }
                Mode::Anchored | Mode::Membership => merged.append(&mut next),
            }
        }

        let inject = match self.mode {
            Mode::Anchored => false,
            Mode::Leftmost => !key.started,
            Mode::Membership => true,
        };
        let mut fresh = Vec::new();
        if inject {
            self.add(self.nfa.start().0, &mut fresh);
            self.close(&mut fresh);
            self.compact(&mut fresh);
        }

        match self.mode {
            Mode::Leftmost => {
                if !fresh.is_empty() {
                    fresh.sort_unstable();
                    groups.push(fresh);
                }
            }
            Mode::Anchored | Mode::Membership => {
                merged.append(&mut fresh);
                if !merged.is_empty() {
                    merged.sort_unstable();
                    groups.push(merged);
                }
            }
        }

        self.normalize(StateKey {
            groups,
            started: key.started,
        })
    }

    fn normalize(&self, mut key: StateKey) -> StateKey {
        let accept = self.accept();
        let Some(first) = key
            .groups
            .iter()
            .position(|g| g.binary_search(&accept).is_ok())
        else {
            return key;
        };
        match self.mode {
            Mode::Anchored => key,
            Mode::Leftmost => {
                key.groups.truncate(first + 1);
                key.started = true;
                key
            }
            Mode::Membership => StateKey {
                groups: vec![vec![accept]],
                started: true,
            },
        }
    }

    /// Push `s` unless already taken in this generation.
    fn add(&mut self, s: u32, out: &mut Vec<u32>) {
        if self.seen[s as usize] != self.generation {
            self.seen[s as usize] = self.generation;
            out.push(s);
        }
    }

    fn compact(&self, set: &mut Vec<u32>) {
        set.retain(|&s| self.keep[s as usize]);
    }

    /// Extend `set` with its epsilon closure.
    fn close(&mut self, set: &mut Vec<u32>) {
        self.stack.clear();
        self.stack.extend_from_slice(set);
        while let Some(s) = self.stack.pop() {
            for t in &self.nfa.state(NfaStateId(s)).transitions {
                if t.edge == Edge::Epsilon && self.seen[t.target.index()] != self.generation {
                    self.seen[t.target.index()] = self.generation;
                    set.push(t.target.0);
                    self.stack.push(t.target.0);
                }
            }
        }
    }
}
