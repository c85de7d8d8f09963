//! Thompson construction.
//!
//! Every node lowers to a fragment `(start, accept)` with a single entry
//! and a single exit. Repetitions are unrolled: `x{m,n}` becomes `m`
//! copies of `x` followed by `n - m` nested optional copies, and `x{m,}`
//! ends in a starred copy.

use super::utf8::utf8_sequences;
use super::{Direction, Edge, Nfa, NfaState, NfaStateId, Transition};
use crate::ast::Node;

/// Most NFA states a single pattern may unroll to.
pub const DEFAULT_NFA_LIMIT: usize = 1 << 20;

/// The unrolled NFA would exceed its state limit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[error("NFA exceeds {limit} states")]
pub struct NfaTooLarge {
    pub limit: usize,
}

type Result<T> = std::result::Result<T, NfaTooLarge>;

#[derive(Clone, Copy)]
struct Fragment {
    start: NfaStateId,
    accept: NfaStateId,
}

pub struct NfaBuilder {
    states: Vec<NfaState>,
    direction: Direction,
    limit: usize,
}

impl NfaBuilder {
    pub fn new(direction: Direction) -> Self {
        Self {
            states: Vec::new(),
            direction,
            limit: DEFAULT_NFA_LIMIT,
        }
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    /// Build the automaton for `node`.
    ///
    /// A reverse builder expects the already-mirrored tree
    /// ([`Node::reversed`]) and reverses the bytes within each char.
    pub fn build(mut self, node: &Node) -> Result<Nfa> {
        let frag = self.node(node)?;
        Ok(Nfa::new(self.states, frag.start, frag.accept, self.direction))
    }

    fn add_state(&mut self) -> Result<NfaStateId> {
        if self.states.len() >= self.limit {
            return Err(NfaTooLarge { limit: self.limit });
        }
        let id = NfaStateId(self.states.len() as u32);
        self.states.push(NfaState::default());
        Ok(id)
    }

    fn connect(&mut self, from: NfaStateId, edge: Edge, to: NfaStateId) {
        self.states[from.index()]
            .transitions
            .push(Transition { edge, target: to });
    }

    fn epsilon(&mut self, from: NfaStateId, to: NfaStateId) {
        self.connect(from, Edge::Epsilon, to);
    }

    fn node(&mut self, node: &Node) -> Result<Fragment> {
        match node {
            Node::Literal(c) => self.char_range(*c, *c),
            Node::CharRange(lo, hi) => self.char_range(*lo, *hi),
            Node::Concat(children) => self.concat(children),
            Node::Alternation(children) => self.alternation(children),
            Node::Repetition { child, min, max } => self.repetition(child, *min, *max),
            Node::Group(child) => self.node(child),
        }
    }

    fn char_range(&mut self, lo: char, hi: char) -> Result<Fragment> {
        let start = self.add_state()?;
        let accept = self.add_state()?;
        for mut seq in utf8_sequences(lo, hi) {
            if self.direction == Direction::Reverse {
                seq.reverse();
            }
            let mut at = start;
            let last = seq.len() - 1;
            for (i, &(blo, bhi)) in seq.iter().enumerate() {
                let next = if i == last { accept } else { self.add_state()? };
                self.connect(at, Edge::Range(blo, bhi), next);
                at = next;
            }
        }
        Ok(Fragment { start, accept })
    }

    fn empty(&mut self) -> Result<Fragment> {
        let s = self.add_state()?;
        Ok(Fragment {
            start: s,
            accept: s,
        })
    }

    fn concat(&mut self, children: &[Node]) -> Result<Fragment> {
        let Some((first, rest)) = children.split_first() else {
            return self.empty();
        };
        let head = self.node(first)?;
        let mut accept = head.accept;
        for child in rest {
            let frag = self.node(child)?;
            self.epsilon(accept, frag.start);
            accept = frag.accept;
        }
        Ok(Fragment {
            start: head.start,
            accept,
        })
    }

    fn alternation(&mut self, children: &[Node]) -> Result<Fragment> {
        let start = self.add_state()?;
        let accept = self.add_state()?;
        for child in children {
            let frag = self.node(child)?;
            self.epsilon(start, frag.start);
            self.epsilon(frag.accept, accept);
        }
        Ok(Fragment { start, accept })
    }

    fn repetition(&mut self, child: &Node, min: u32, max: Option<u32>) -> Result<Fragment> {
        let entry = self.empty()?;
        let mut accept = entry.accept;

        for _ in 0..min {
            let frag = self.node(child)?;
            self.epsilon(accept, frag.start);
            accept = frag.accept;
        }

        match max {
            None => {
                let star = self.star(child)?;
                self.epsilon(accept, star.start);
                accept = star.accept;
            }
            Some(max) if max > min => {
                // x? (x? (x?)...) nested so each optional copy requires the previous one
                let exit = self.add_state()?;
                for _ in min..max {
                    let frag = self.node(child)?;
                    self.epsilon(accept, frag.start);
                    self.epsilon(accept, exit);
                    accept = frag.accept;
                }
                self.epsilon(accept, exit);
                accept = exit;
            }
            Some(_) => {}
        }

        Ok(Fragment {
            start: entry.start,
            accept,
        })
    }

    fn star(&mut self, child: &Node) -> Result<Fragment> {
        let start = self.add_state()?;
        let accept = self.add_state()?;
        let frag = self.node(child)?;
        self.epsilon(start, frag.start);
        self.epsilon(start, accept);
        self.epsilon(frag.accept, frag.start);
        self.epsilon(frag.accept, accept);
        Ok(Fragment { start, accept })
    }
}
