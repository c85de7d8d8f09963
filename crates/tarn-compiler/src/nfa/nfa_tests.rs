use std::collections::BTreeSet;

use super::{Direction, Edge, Nfa, NfaBuilder, NfaStateId, NfaTooLarge, byte_classes};
use crate::parser::parse;

fn closure(nfa: &Nfa, set: &mut BTreeSet<NfaStateId>) {
    let mut stack: Vec<NfaStateId> = set.iter().copied().collect();
    while let Some(id) = stack.pop() {
        for t in &nfa.state(id).transitions {
            if t.edge == Edge::Epsilon && set.insert(t.target) {
                stack.push(t.target);
            }
        }
    }
}

/// Direct NFA simulation over the whole input.
fn accepts(nfa: &Nfa, input: &[u8]) -> bool {
    let mut set = BTreeSet::from([nfa.start()]);
    closure(nfa, &mut set);
    for &b in input {
        let mut next = BTreeSet::new();
        for &id in &set {
            for t in &nfa.state(id).transitions {
                if let Edge::Range(lo, hi) = t.edge
                    && lo <= b
                    && b <= hi
                {
                    next.insert(t.target);
                }
            }
        }
        closure(nfa, &mut next);
        set = next;
    }
    set.iter().any(|&id| nfa.is_accepting(id))
}

fn forward(pattern: &str) -> Nfa {
    NfaBuilder::new(Direction::Forward)
        .build(&parse(pattern).unwrap())
        .unwrap()
}

fn reverse(pattern: &str) -> Nfa {
    NfaBuilder::new(Direction::Reverse)
        .build(&parse(pattern).unwrap().reversed())
        .unwrap()
}

fn rev(s: &str) -> Vec<u8> {
    s.bytes().rev().collect()
}

#[test]
fn literal_and_alternation() {
    let nfa = forward("ab|cd");
    assert!(accepts(&nfa, b"ab"));
    assert!(accepts(&nfa, b"cd"));
    assert!(!accepts(&nfa, b"ad"));
    assert!(!accepts(&nfa, b""));
}

#[test]
fn bounded_repetition() {
    let nfa = forward("a{2,3}");
    assert!(!accepts(&nfa, b"a"));
    assert!(accepts(&nfa, b"aa"));
    assert!(accepts(&nfa, b"aaa"));
    assert!(!accepts(&nfa, b"aaaa"));
}

#[test]
fn unbounded_repetition() {
    let nfa = forward("(ab){2,}");
    assert!(!accepts(&nfa, b"ab"));
    assert!(accepts(&nfa, b"abab"));
    assert!(accepts(&nfa, b"ababababab"));
    assert!(!accepts(&nfa, b"ababa"));
}

#[test]
fn zero_width_star_terminates() {
    let nfa = forward("(a?)*b");
    assert!(accepts(&nfa, b"b"));
    assert!(accepts(&nfa, b"aaab"));
    let nfa = forward("()*");
    assert!(accepts(&nfa, b""));
    assert!(!accepts(&nfa, b"x"));
}

#[test]
fn empty_class_accepts_nothing() {
    let nfa = forward("a[^\\u{0}-\\u{10ffff}]");
    assert!(!accepts(&nfa, b"a"));
    assert!(!accepts(&nfa, b"ab"));
}

#[test]
fn multibyte_chars() {
    let nfa = forward("[α-ω]+");
    assert!(accepts(&nfa, "λμ".as_bytes()));
    assert!(!accepts(&nfa, "λa".as_bytes()));
    // a lone lead byte is not a char
    assert!(!accepts(&nfa, &"λ".as_bytes()[..1]));
}

#[test]
fn reverse_reads_mirrored_bytes() {
    let nfa = reverse("ab+é");
    assert!(accepts(&nfa, &rev("abbé")));
    assert!(!accepts(&nfa, "abbé".as_bytes()));
    assert_eq!(nfa.direction(), Direction::Reverse);

    let nfa = reverse("[α-ω]x");
    assert!(accepts(&nfa, &rev("λx")));
}

#[test]
fn state_limit() {
    let node = parse("(abc){1000}").unwrap();
    let err = NfaBuilder::new(Direction::Forward)
        .limit(100)
        .build(&node)
        .unwrap_err();
    assert_eq!(err, NfaTooLarge { limit: 100 });
}

#[test]
fn classes_from_both_directions() {
    let f = forward("[a-c]x");
    let r = reverse("[a-c]x");
    let classes = byte_classes(&[&f, &r]);
    // [00-60] [61-63] [64-77] [78] [79-ff]
    assert_eq!(classes.len(), 5);
    assert_eq!(classes.get(b'a'), classes.get(b'c'));
    assert_ne!(classes.get(b'c'), classes.get(b'd'));
    assert_ne!(classes.get(b'x'), classes.get(b'y'));
}
