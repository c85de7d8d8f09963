//! Pattern syntax tree.
//!
//! Produced by the parser, consumed by the factorizer and the NFA builder.
//! Nodes are immutable once parsed; derived views (`reversed`, `factors`)
//! build new values.

mod factor;
mod printer;

#[cfg(test)]
mod ast_tests;

pub use factor::{Factorization, MAX_LITERAL_LEN};

/// Regular expression node over Unicode scalar values.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Node {
    Literal(char),
    /// Every scalar value in `lo..=hi`.
    CharRange(char, char),
    /// Children matched in sequence. Empty matches the empty string.
    Concat(Vec<Node>),
    /// Any one child. Empty matches nothing.
    Alternation(Vec<Node>),
    /// `child` repeated `min..=max` times; `max: None` is unbounded.
    Repetition {
        child: Box<Node>,
        min: u32,
        max: Option<u32>,
    },
    /// Parenthesized subexpression. Carries no capture semantics.
    Group(Box<Node>),
}

impl Node {
    pub fn repeat(child: Node, min: u32, max: Option<u32>) -> Self {
        Self::Repetition {
            child: Box::new(child),
            min,
            max,
        }
    }

    pub fn group(child: Node) -> Self {
        Self::Group(Box::new(child))
    }

    /// The empty string.
    pub fn empty() -> Self {
        Self::Concat(Vec::new())
    }

    /// Matches nothing at all.
    pub fn never() -> Self {
        Self::Alternation(Vec::new())
    }

    /// Literal text as a concatenation of characters.
    pub fn literal_str(text: &str) -> Self {
        let mut chars: Vec<Node> = text.chars().map(Node::Literal).collect();
        if chars.len() == 1 {
            return chars.remove(0);
        }
        Self::Concat(chars)
    }

    /// Shortest match length in UTF-8 bytes.
    pub fn min_len(&self) -> usize {
        match self {
            Node::Literal(c) => c.len_utf8(),
            Node::CharRange(lo, _) => lo.len_utf8(),
            Node::Concat(children) => children
                .iter()
                .fold(0usize, |acc, c| acc.saturating_add(c.min_len())),
            Node::Alternation(children) => children.iter().map(Node::min_len).min().unwrap_or(0),
            Node::Repetition { child, min, .. } => child.min_len().saturating_mul(*min as usize),
            Node::Group(child) => child.min_len(),
        }
    }

    /// Longest match length in UTF-8 bytes, `None` if unbounded.
    pub fn max_len(&self) -> Option<usize> {
        match self {
            Node::Literal(c) => Some(c.len_utf8()),
            Node::CharRange(_, hi) => Some(hi.len_utf8()),
            Node::Concat(children) => children.iter().try_fold(0usize, |acc, c| {
                c.max_len().map(|len| acc.saturating_add(len))
            }),
            Node::Alternation(children) => children
                .iter()
                .try_fold(0usize, |acc, c| c.max_len().map(|len| acc.max(len))),
            Node::Repetition { child, max, .. } => {
                let child_max = child.max_len()?;
                match max {
                    _ if child_max == 0 => Some(0),
                    Some(max) => Some(child_max.saturating_mul(*max as usize)),
                    None => None,
                }
            }
            Node::Group(child) => child.max_len(),
        }
    }

    /// Tree matching the mirror image of this node's language.
    ///
    /// Characters are kept as-is; byte order within a character is handled
    /// when the reversed NFA is lowered to UTF-8.
    pub fn reversed(&self) -> Node {
        match self {
            Node::Literal(_) | Node::CharRange(..) => self.clone(),
            Node::Concat(children) => Node::Concat(children.iter().rev().map(Node::reversed).collect()),
            Node::Alternation(children) => Node::Alternation(children.iter().map(Node::reversed).collect()),
            Node::Repetition { child, min, max } => Node::repeat(child.reversed(), *min, *max),
            Node::Group(child) => Node::group(child.reversed()),
        }
    }

    /// Required-literal facts for prefiltering.
    pub fn factors(&self) -> Factorization {
        factor::factorize(self)
    }
}
