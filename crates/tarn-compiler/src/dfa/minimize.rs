//! State minimization.
//!
//! Hopcroft partition refinement over the live states plus `DEAD`. The
//! input must already be pruned, so `DEAD` is the only state that cannot
//! reach an accept and always ends up alone in its block.

use std::collections::VecDeque;

use tarn_core::StateId;

use super::Dfa;

/// Merge states that accept the same suffixes.
///
/// Blocks are numbered breadth-first from the start state, visiting
/// classes in order. A DFA that is already minimal keeps its numbering.
pub fn minimize(dfa: &Dfa) -> Dfa {
    let n = dfa.state_count();
    if n == 0 || dfa.is_empty() {
        return dfa.clone();
    }
    let stride = dfa.stride();
    let dead = n;
    let index = |id: StateId| if id.is_dead() { dead } else { id.index() };
    let target = |s: usize, class: usize| {
        if s == dead {
            dead
        } else {
            index(dfa.next(StateId::new(s), class))
        }
    };

    let incoming = Incoming::new(n + 1, stride, &target);

    let mut block_of = vec![0; n + 1];
    let mut blocks: Vec<Vec<usize>> = Vec::new();
    let (accepting, rejecting): (Vec<usize>, Vec<usize>) =
        (0..n).partition(|&s| dfa.is_accepting(StateId::new(s)));
    for members in [accepting, rejecting, vec![dead]] {
        if members.is_empty() {
            continue;
        }
        for &s in &members {
            block_of[s] = blocks.len();
        }
        blocks.push(members);
    }

    let mut waiting: Vec<usize> = (0..blocks.len()).collect();
    let mut in_waiting = vec![true; blocks.len()];
    let mut hits = vec![0; blocks.len()];
    let mut marked = vec![false; n + 1];
    let mut sources = Vec::new();
    let mut touched = Vec::new();

    while let Some(splitter) = waiting.pop() {
        in_waiting[splitter] = false;
        let members = blocks[splitter].clone();
        for class in 0..stride {
            sources.clear();
            for &t in &members {
                for s in incoming.sources(class, t) {
                    if !marked[s] {
                        marked[s] = true;
                        sources.push(s);
                    }
                }
            }

            touched.clear();
            for &s in &sources {
                let b = block_of[s];
                if hits[b] == 0 {
                    touched.push(b);
                }
                hits[b] += 1;
            }

            for &b in &touched {
                if hits[b] < blocks[b].len() {
                    let (inside, outside): (Vec<usize>, Vec<usize>) =
                        blocks[b].iter().copied().partition(|&s| marked[s]);
                    let fresh = blocks.len();
                    for &s in &inside {
                        block_of[s] = fresh;
                    }
                    let fresh_is_smaller = inside.len() <= outside.len();
                    blocks[b] = outside;
                    blocks.push(inside);
                    hits.push(0);
                    in_waiting.push(false);

                    let queued = if in_waiting[b] || fresh_is_smaller { fresh } else { b };
                    if !in_waiting[queued] {
                        in_waiting[queued] = true;
                        waiting.push(queued);
                    }
                }
                hits[b] = 0;
            }

            for &s in &sources {
                marked[s] = false;
            }
        }
    }

    // breadth-first renumbering; the dead block is never numbered
    let mut renumber = vec![StateId::DEAD; blocks.len()];
    let mut visited = vec![false; blocks.len()];
    visited[block_of[dead]] = true;
    let start = block_of[dfa.start().index()];
    visited[start] = true;
    let mut queue = VecDeque::from([start]);
    let mut representatives = Vec::with_capacity(blocks.len());
    while let Some(b) = queue.pop_front() {
        renumber[b] = StateId::new(representatives.len());
        let rep = blocks[b][0];
        representatives.push(rep);
        for class in 0..stride {
            let next = block_of[target(rep, class)];
            if !visited[next] {
                visited[next] = true;
                queue.push_back(next);
            }
        }
    }

    let mut transitions = Vec::with_capacity(representatives.len() * stride);
    let mut accepting = Vec::with_capacity(representatives.len());
    for &rep in &representatives {
        transitions.extend((0..stride).map(|class| renumber[block_of[target(rep, class)]]));
        accepting.push(dfa.is_accepting(StateId::new(rep)));
    }

    Dfa::new(dfa.role(), StateId::new(0), stride, transitions, accepting)
}

/// Inverted transition table: for each class and target, the sources.
struct Incoming {
    states: usize,
    offsets: Vec<u32>,
    sources: Vec<u32>,
}

impl Incoming {
    fn new(states: usize, stride: usize, target: impl Fn(usize, usize) -> usize) -> Self {
        let cell = |class: usize, t: usize| class * states + t;
        let mut offsets = vec![0u32; stride * states + 1];
        for s in 0..states {
            for class in 0..stride {
                offsets[cell(class, target(s, class)) + 1] += 1;
            }
        }
        for i in 1..offsets.len() {
            offsets[i] += offsets[i - 1];
        }

        let mut fill = offsets.clone();
        let mut sources = vec![0u32; states * stride];
        for s in 0..states {
            for class in 0..stride {
                let at = &mut fill[cell(class, target(s, class))];
                sources[*at as usize] = s as u32;
                *at += 1;
            }
        }

        Self {
            states,
            offsets,
            sources,
        }
    }

    fn sources(&self, class: usize, t: usize) -> impl Iterator<Item = usize> + '_ {
        let cell = class * self.states + t;
        let range = self.offsets[cell] as usize..self.offsets[cell + 1] as usize;
        self.sources[range].iter().map(|&s| s as usize)
    }
}
