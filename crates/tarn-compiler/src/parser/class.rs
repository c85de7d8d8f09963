//! Character sets built from class syntax and class escapes.

use crate::ast::Node;

const MAX_SCALAR: u32 = 0x10FFFF;
const SURROGATE_LO: u32 = 0xD800;
const SURROGATE_HI: u32 = 0xDFFF;

/// One element of a bracket class: a single char or a predefined set.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(super) enum ClassItem {
    Char(char),
    Set(ClassSet),
}

/// Sorted, non-overlapping, non-adjacent scalar ranges.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(super) struct ClassSet {
    ranges: Vec<(char, char)>,
}

impl ClassSet {
    pub(super) fn new() -> Self {
        Self::default()
    }

    fn from_ranges(ranges: &[(char, char)]) -> Self {
        let mut set = Self::new();
        for &(lo, hi) in ranges {
            set.push(lo, hi);
        }
        set
    }

    pub(super) fn digit() -> Self {
        Self::from_ranges(&[('0', '9')])
    }

    pub(super) fn word() -> Self {
        Self::from_ranges(&[('0', '9'), ('A', 'Z'), ('_', '_'), ('a', 'z')])
    }

    pub(super) fn space() -> Self {
        Self::from_ranges(&[('\t', '\r'), (' ', ' ')])
    }

    pub(super) fn any_but_newline() -> Self {
        Self::from_ranges(&[('\0', '\u{09}'), ('\u{0B}', char::MAX)])
    }

    #[cfg(test)]
    pub(super) fn ranges(&self) -> &[(char, char)] {
        &self.ranges
    }

    pub(super) fn push_item(&mut self, item: ClassItem) {
        match item {
            ClassItem::Char(c) => self.push(c, c),
            ClassItem::Set(set) => {
                for (lo, hi) in set.ranges {
                    self.push(lo, hi);
                }
            }
        }
    }

    /// Add `lo..=hi`, keeping the ranges canonical.
    pub(super) fn push(&mut self, lo: char, hi: char) {
        debug_assert!(lo <= hi);
        self.ranges.push((lo, hi));
        self.canonicalize();
    }

    fn canonicalize(&mut self) {
        self.ranges.sort_unstable();
        let mut merged: Vec<(char, char)> = Vec::with_capacity(self.ranges.len());
        for &(lo, hi) in &self.ranges {
            match merged.last_mut() {
                Some((_, last_hi)) if scalar_after(*last_hi).is_none_or(|next| lo <= next) => {
                    *last_hi = (*last_hi).max(hi);
                }
                _ => merged.push((lo, hi)),
            }
        }
        self.ranges = merged;
    }

    /// Every scalar value not in the set.
    pub(super) fn negate(&self) -> Self {
        let mut out = Vec::new();
        let mut next = 0u32;
        for &(lo, hi) in &self.ranges {
            if (lo as u32) > next {
                push_scalars(&mut out, next, lo as u32 - 1);
            }
            next = hi as u32 + 1;
        }
        if next <= MAX_SCALAR {
            push_scalars(&mut out, next, MAX_SCALAR);
        }
        let mut set = Self { ranges: out };
        set.canonicalize();
        set
    }

    /// Lower to a syntax tree node. An empty set matches nothing.
    pub(super) fn into_node(self) -> Node {
        let mut nodes: Vec<Node> = self
            .ranges
            .into_iter()
            .map(|(lo, hi)| {
                if lo == hi {
                    Node::Literal(lo)
                } else {
                    Node::CharRange(lo, hi)
                }
            })
            .collect();
        if nodes.len() == 1 {
            return nodes.remove(0);
        }
        Node::Alternation(nodes)
    }
}

/// Next scalar value, skipping the surrogate gap.
fn scalar_after(c: char) -> Option<char> {
    match c as u32 {
        v if v == SURROGATE_LO - 1 => char::from_u32(SURROGATE_HI + 1),
        v => char::from_u32(v + 1),
    }
}

/// Push `lo..=hi` (raw code points) with the surrogate gap cut out.
fn push_scalars(out: &mut Vec<(char, char)>, lo: u32, hi: u32) {
    let mut pieces = Vec::with_capacity(2);
    if lo < SURROGATE_LO {
        pieces.push((lo, hi.min(SURROGATE_LO - 1)));
    }
    if hi > SURROGATE_HI {
        pieces.push((lo.max(SURROGATE_HI + 1), hi));
    }
    for (lo, hi) in pieces {
        if lo > hi {
            continue;
        }
        if let (Some(lo), Some(hi)) = (char::from_u32(lo), char::from_u32(hi)) {
            out.push((lo, hi));
        }
    }
}
