//! Dead-state elimination.

use std::collections::VecDeque;

use tarn_core::StateId;

use super::Dfa;

/// Collapse every state that cannot reach an accepting state into `DEAD`.
///
/// Survivors keep their relative order and are renumbered densely. The
/// start state itself becomes `DEAD` when the language is empty.
pub fn prune(dfa: &Dfa) -> Dfa {
    let n = dfa.state_count();
    let stride = dfa.stride();

    let mut preds: Vec<Vec<usize>> = vec![Vec::new(); n];
    for s in 0..n {
        for &t in dfa.row(StateId::new(s)) {
            if !t.is_dead() {
                preds[t.index()].push(s);
            }
        }
    }

    let mut live = vec![false; n];
    let mut queue = VecDeque::new();
    for (s, alive) in live.iter_mut().enumerate() {
        if dfa.is_accepting(StateId::new(s)) {
            *alive = true;
            queue.push_back(s);
        }
    }
    while let Some(s) = queue.pop_front() {
        for &p in &preds[s] {
            if !live[p] {
                live[p] = true;
                queue.push_back(p);
            }
        }
    }

    let mut renumber = vec![StateId::DEAD; n];
    let mut next = 0;
    for s in 0..n {
        if live[s] {
            renumber[s] = StateId::new(next);
            next += 1;
        }
    }
    let map = |id: StateId| {
        if id.is_dead() {
            StateId::DEAD
        } else {
            renumber[id.index()]
        }
    };

    let mut transitions = Vec::with_capacity(next * stride);
    let mut accepting = Vec::with_capacity(next);
    for s in (0..n).filter(|&s| live[s]) {
        let state = StateId::new(s);
        transitions.extend(dfa.row(state).iter().map(|&t| map(t)));
        accepting.push(dfa.is_accepting(state));
    }

    Dfa::new(dfa.role(), map(dfa.start()), stride, transitions, accepting)
}
