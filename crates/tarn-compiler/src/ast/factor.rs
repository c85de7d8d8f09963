//! Literal factorization.
//!
//! Every string in a node's language begins with `prefix`, ends with
//! `suffix` and contains `factor`. The facts may be weaker than the truth
//! (an empty string is always valid) but never stronger.

use serde::Serialize;

use super::Node;

/// Longest literal tracked per fact. Longer literals are cut, which only
/// weakens them.
pub const MAX_LITERAL_LEN: usize = 256;

/// Prefilter facts derived from a pattern.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Factorization {
    pub min_len: usize,
    pub max_len: Option<usize>,
    pub prefix: String,
    pub suffix: String,
    /// Best required substring.
    pub factor: String,
}

impl Factorization {
    /// True if nothing beyond the length bounds is known.
    pub fn is_trivial(&self) -> bool {
        self.factor.is_empty()
    }
}

/// Per-node facts. `exact` is set when the language is a single string.
#[derive(Clone, Debug, Default)]
struct Facts {
    exact: Option<String>,
    prefix: String,
    suffix: String,
    factor: String,
}

impl Facts {
    fn exact(text: String) -> Self {
        let mut facts = Self {
            prefix: text.clone(),
            suffix: text.clone(),
            factor: text.clone(),
            exact: Some(text),
        };
        facts.cap();
        facts
    }

    fn unknown() -> Self {
        Self::default()
    }

    fn cap(&mut self) {
        if self.exact.as_ref().is_some_and(|e| e.len() > MAX_LITERAL_LEN) {
            self.exact = None;
        }
        keep_front(&mut self.prefix, MAX_LITERAL_LEN);
        keep_back(&mut self.suffix, MAX_LITERAL_LEN);
        keep_front(&mut self.factor, MAX_LITERAL_LEN);
    }
}

pub(super) fn factorize(node: &Node) -> Factorization {
    let facts = facts(node);
    Factorization {
        min_len: node.min_len(),
        max_len: node.max_len(),
        prefix: facts.prefix,
        suffix: facts.suffix,
        factor: facts.factor,
    }
}

fn facts(node: &Node) -> Facts {
    match node {
        Node::Literal(c) => Facts::exact(c.to_string()),
        Node::CharRange(lo, hi) if lo == hi => Facts::exact(lo.to_string()),
        Node::CharRange(..) => Facts::unknown(),
        Node::Concat(children) => children
            .iter()
            .map(facts)
            .fold(Facts::exact(String::new()), concat),
        Node::Alternation(children) => alternation(children.iter().map(facts).collect()),
        Node::Repetition { child, min, max } => repetition(facts(child), *min, *max),
        Node::Group(child) => facts(child),
    }
}

fn concat(a: Facts, b: Facts) -> Facts {
    let exact = match (&a.exact, &b.exact) {
        (Some(x), Some(y)) => Some(format!("{x}{y}")),
        _ => None,
    };
    let prefix = match &a.exact {
        Some(x) => format!("{x}{}", b.prefix),
        None => a.prefix,
    };
    let suffix = match &b.exact {
        Some(y) => format!("{}{y}", a.suffix),
        None => b.suffix,
    };
    let bridge = format!("{}{}", a.suffix, b.prefix);
    let factor = match &exact {
        Some(e) => e.clone(),
        None => longest([a.factor, b.factor, bridge]),
    };

    let mut out = Facts {
        exact,
        prefix,
        suffix,
        factor,
    };
    out.cap();
    out
}

fn alternation(branches: Vec<Facts>) -> Facts {
    let Some(first) = branches.first() else {
        return Facts::unknown();
    };

    let exact = first
        .exact
        .as_ref()
        .filter(|e| branches.iter().all(|b| b.exact.as_ref() == Some(*e)))
        .cloned();
    if let Some(e) = exact {
        return Facts::exact(e);
    }

    let mut prefix = first.prefix.clone();
    let mut suffix = first.suffix.clone();
    for b in &branches[1..] {
        prefix = common_prefix(&prefix, &b.prefix).to_string();
        suffix = common_suffix(&suffix, &b.suffix).to_string();
    }
    let factors: Vec<&str> = branches.iter().map(|b| b.factor.as_str()).collect();
    let factor = longest([prefix.clone(), suffix.clone(), common_substring(&factors)]);

    Facts {
        exact: None,
        prefix,
        suffix,
        factor,
    }
}

fn repetition(child: Facts, min: u32, max: Option<u32>) -> Facts {
    if min == 0 {
        if max == Some(0) {
            return Facts::exact(String::new());
        }
        return Facts::unknown();
    }

    if let Some(e) = &child.exact {
        let (run, complete) = repeat_capped(e, min as usize);
        if complete && max == Some(min) {
            return Facts::exact(run);
        }
        // e{min} is a required prefix, and a required suffix by symmetry
        let mut out = Facts {
            exact: None,
            prefix: run.clone(),
            suffix: if complete { run.clone() } else { e.clone() },
            factor: run,
        };
        out.cap();
        return out;
    }

    let mut out = child;
    if min >= 2 {
        let bridge = format!("{}{}", out.suffix, out.prefix);
        out.factor = longest([std::mem::take(&mut out.factor), bridge]);
        out.cap();
    }
    out
}

/// `text` repeated `n` times, cut at `MAX_LITERAL_LEN`. The flag is false
/// if the result was cut.
fn repeat_capped(text: &str, n: usize) -> (String, bool) {
    if text.is_empty() {
        return (String::new(), true);
    }
    let fits = text.len().checked_mul(n).is_some_and(|len| len <= MAX_LITERAL_LEN);
    if fits {
        return (text.repeat(n), true);
    }
    let mut out = String::new();
    while out.len() < MAX_LITERAL_LEN {
        out.push_str(text);
    }
    keep_front(&mut out, MAX_LITERAL_LEN);
    (out, false)
}

fn longest<const N: usize>(candidates: [String; N]) -> String {
    let mut best = String::new();
    for c in candidates {
        if c.len() > best.len() {
            best = c;
        }
    }
    best
}

fn keep_front(s: &mut String, cap: usize) {
    if s.len() > cap {
        let mut end = cap;
        while !s.is_char_boundary(end) {
            end -= 1;
        }
        s.truncate(end);
    }
}

fn keep_back(s: &mut String, cap: usize) {
    if s.len() > cap {
        let mut start = s.len() - cap;
        while !s.is_char_boundary(start) {
            start += 1;
        }
        s.drain(..start);
    }
}

fn common_prefix<'a>(a: &'a str, b: &str) -> &'a str {
    let mut end = 0;
    for ((i, x), y) in a.char_indices().zip(b.chars()) {
        if x != y {
            break;
        }
        end = i + x.len_utf8();
    }
    &a[..end]
}

fn common_suffix<'a>(a: &'a str, b: &str) -> &'a str {
    let mut start = a.len();
    for ((i, x), y) in a.char_indices().rev().zip(b.chars().rev()) {
        if x != y {
            break;
        }
        start = i;
    }
    &a[start..]
}

/// Longest string contained in every input.
fn common_substring(all: &[&str]) -> String {
    let Some(shortest) = all.iter().min_by_key(|s| s.len()) else {
        return String::new();
    };
    let bounds: Vec<usize> = shortest
        .char_indices()
        .map(|(i, _)| i)
        .chain(std::iter::once(shortest.len()))
        .collect();

    let mut best = "";
    for (si, &start) in bounds.iter().enumerate() {
        for &end in bounds[si + 1..].iter().rev() {
            if end - start <= best.len() {
                break;
            }
            let candidate = &shortest[start..end];
            if all.iter().all(|s| s.contains(candidate)) {
                best = candidate;
                break;
            }
        }
    }
    best.to_string()
}
