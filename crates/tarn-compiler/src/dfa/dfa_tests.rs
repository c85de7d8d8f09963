use tarn_bytecode::DfaRole;
use tarn_core::{ByteClasses, MAX_STATE_LIMIT, StateId};

use super::{Dfa, Mode, StateLimitExceeded, build, determinize, minimize, prune};
use crate::nfa::{Direction, Nfa, NfaBuilder, byte_classes};
use crate::parser::parse;

fn nfa(pattern: &str, direction: Direction) -> Nfa {
    let node = parse(pattern).unwrap();
    let node = match direction {
        Direction::Forward => node,
        Direction::Reverse => node.reversed(),
    };
    NfaBuilder::new(direction).build(&node).unwrap()
}

fn dfa(pattern: &str, mode: Mode) -> (Dfa, ByteClasses) {
    let nfa = nfa(pattern, Direction::Forward);
    let classes = byte_classes(&[&nfa]);
    let dfa = build(&nfa, &classes, mode, role(mode), MAX_STATE_LIMIT, pattern).unwrap();
    (dfa, classes)
}

fn role(mode: Mode) -> DfaRole {
    match mode {
        Mode::Anchored => DfaRole::ForwardExact,
        Mode::Leftmost => DfaRole::ForwardSearch,
        Mode::Membership => DfaRole::Membership,
    }
}

fn accepts(dfa: &Dfa, classes: &ByteClasses, input: &[u8]) -> bool {
    dfa.is_accepting(dfa.walk(classes, input))
}

/// End of the leftmost-longest match, scanning from offset 0.
fn search_end(dfa: &Dfa, classes: &ByteClasses, input: &[u8]) -> Option<usize> {
    let mut state = dfa.start();
    let mut end = dfa.is_accepting(state).then_some(0);
    for (i, &b) in input.iter().enumerate() {
        state = dfa.next(state, classes.get(b) as usize);
        if state.is_dead() {
            break;
        }
        if dfa.is_accepting(state) {
            end = Some(i + 1);
        }
    }
    end
}

#[test]
fn anchored_decides_whole_input() {
    let (d, c) = dfa("ab|cd", Mode::Anchored);
    assert!(accepts(&d, &c, b"ab"));
    assert!(accepts(&d, &c, b"cd"));
    assert!(!accepts(&d, &c, b"abx"));
    assert!(!accepts(&d, &c, b"xab"));
    assert!(!accepts(&d, &c, b""));
}

#[test]
fn anchored_state_count() {
    let (d, _) = dfa("abc", Mode::Anchored);
    assert_eq!(d.state_count(), 4);
    assert_eq!(d.start(), StateId::new(0));
    assert!(!d.is_accepting(d.start()));
}

#[test]
fn nullable_start_accepts() {
    let (d, c) = dfa("a*", Mode::Anchored);
    assert!(d.is_accepting(d.start()));
    assert!(accepts(&d, &c, b"aaa"));
    assert!(!accepts(&d, &c, b"ab"));
}

#[test]
fn reverse_reads_backwards() {
    let n = nfa("ab+", Direction::Reverse);
    let c = byte_classes(&[&n]);
    let d = build(&n, &c, Mode::Anchored, DfaRole::Reverse, 100, "ab+").unwrap();
    assert_eq!(d.role(), DfaRole::Reverse);
    assert!(accepts(&d, &c, b"bba"));
    assert!(!accepts(&d, &c, b"abb"));
}

#[test]
fn leftmost_finds_longest_end() {
    let (d, c) = dfa("a+", Mode::Leftmost);
    assert_eq!(search_end(&d, &c, b"baaab"), Some(4));
    assert_eq!(search_end(&d, &c, b"bbb"), None);
}

#[test]
fn leftmost_prefers_earlier_start() {
    // "abcd" at 0 beats "b" at 1
    let (d, c) = dfa("b|abcd", Mode::Leftmost);
    assert_eq!(search_end(&d, &c, b"abcd"), Some(4));
    // "abc" fails, "b" at 1 wins
    let (d, c) = dfa("b|abc", Mode::Leftmost);
    assert_eq!(search_end(&d, &c, b"abd"), Some(2));
}

#[test]
fn leftmost_stops_starting_after_match() {
    // once "ab" matched at 0, the "ab" at 3 is a separate match
    let (d, c) = dfa("ab", Mode::Leftmost);
    assert_eq!(search_end(&d, &c, b"abxab"), Some(2));
}

#[test]
fn membership_accept_is_absorbing() {
    let (d, c) = dfa("bc", Mode::Membership);
    assert!(accepts(&d, &c, b"abcd"));
    assert!(accepts(&d, &c, b"bc"));
    assert!(!accepts(&d, &c, b"acbd"));

    let accepting: Vec<_> = (0..d.state_count())
        .map(StateId::new)
        .filter(|&s| d.is_accepting(s))
        .collect();
    assert_eq!(accepting.len(), 1);
    let s = accepting[0];
    assert!(d.row(s).iter().all(|&t| t == s));
}

#[test]
fn empty_language_prunes_to_dead_start() {
    let (d, c) = dfa("a[^\\u{0}-\\u{10ffff}]", Mode::Anchored);
    assert!(d.is_empty());
    assert_eq!(d.state_count(), 0);
    assert!(!accepts(&d, &c, b"a"));
    assert_eq!(d.walk(&c, b""), StateId::DEAD);
}

#[test]
fn prune_drops_hopeless_states() {
    let pattern = "ab[^\\u{0}-\\u{10ffff}]|c";
    let n = nfa(pattern, Direction::Forward);
    let c = byte_classes(&[&n]);
    let raw = determinize(&n, &c, Mode::Anchored, DfaRole::ForwardExact, 100, pattern).unwrap();
    let pruned = prune(&raw);
    // start, after "a", after "c"
    assert_eq!(raw.state_count(), 3);
    assert_eq!(pruned.state_count(), 2);
    assert_eq!(pruned.next(pruned.start(), c.get(b'a') as usize), StateId::DEAD);
    assert!(accepts(&pruned, &c, b"c"));
}

#[test]
fn minimize_merges_equivalent_accepts() {
    let pattern = "ab|cb";
    let n = nfa(pattern, Direction::Forward);
    let c = byte_classes(&[&n]);
    let raw = determinize(&n, &c, Mode::Anchored, DfaRole::ForwardExact, 100, pattern).unwrap();
    let raw = prune(&raw);
    // after "a" and after "c" wait on different NFA states
    assert_eq!(raw.state_count(), 4);

    let min = minimize(&raw);
    assert_eq!(min.state_count(), 3);
    let (on_a, on_c) = (c.get(b'a') as usize, c.get(b'c') as usize);
    assert_eq!(min.next(min.start(), on_a), min.next(min.start(), on_c));
    assert!(accepts(&min, &c, b"cb"));
    assert!(!accepts(&min, &c, b"ac"));
}

#[test]
fn minimize_keeps_minimal_numbering() {
    for (pattern, mode) in [
        ("abc", Mode::Anchored),
        ("(a|bc)*d{2,3}", Mode::Leftmost),
        ("x[0-9]+", Mode::Membership),
    ] {
        let (d, _) = dfa(pattern, mode);
        assert_eq!(minimize(&d), d, "{pattern}");
    }
}

#[test]
fn minimize_repeated_wildcard() {
    // per char: boundary plus seven partial UTF-8 states, then the accept
    let (d, c) = dfa(".{100}", Mode::Anchored);
    assert_eq!(d.state_count(), 801);
    assert!(accepts(&d, &c, "é".repeat(100).as_bytes()));
    assert!(!accepts(&d, &c, "é".repeat(99).as_bytes()));
}

#[test]
fn minimize_keeps_leftmost_ends() {
    let (d, c) = dfa("(ab|cb)+|b", Mode::Leftmost);
    assert_eq!(search_end(&d, &c, b"xabcbab"), Some(7));
    assert_eq!(search_end(&d, &c, b"xbab"), Some(2));
}

#[test]
fn key_entries_are_budgeted() {
    // 600 entries in the start key, two states in all; a cap of 2 allows
    // only 2 * KEY_ENTRIES_PER_STATE entries
    let pattern = vec!["a"; 600].join("|");
    let n = nfa(&pattern, Direction::Forward);
    let c = byte_classes(&[&n]);
    let err = determinize(&n, &c, Mode::Anchored, DfaRole::ForwardExact, 2, &pattern).unwrap_err();
    assert_eq!(err.cap, 2);

    let d = build(&n, &c, Mode::Anchored, DfaRole::ForwardExact, 3, &pattern).unwrap();
    assert_eq!(d.state_count(), 2);
}

#[test]
fn exploding_search_is_rejected() {
    let pattern = "(.{0,1000}){3}";
    let n = nfa(pattern, Direction::Forward);
    let c = byte_classes(&[&n]);
    let err = build(&n, &c, Mode::Leftmost, DfaRole::ForwardSearch, 1000, pattern).unwrap_err();
    assert_eq!(err.cap, 1000);
}

#[test]
fn state_limit_is_enforced() {
    let pattern = "[ab]*a[ab]{5}";
    let n = nfa(pattern, Direction::Forward);
    let c = byte_classes(&[&n]);
    let err = build(&n, &c, Mode::Anchored, DfaRole::ForwardExact, 10, pattern).unwrap_err();
    assert_eq!(
        err,
        StateLimitExceeded {
            cap: 10,
            pattern: pattern.to_string(),
        }
    );
    assert!(build(&n, &c, Mode::Anchored, DfaRole::ForwardExact, 200, pattern).is_ok());
}

#[test]
fn construction_is_deterministic() {
    let (a, _) = dfa("(a|bc)*d{2,3}", Mode::Leftmost);
    let (b, _) = dfa("(a|bc)*d{2,3}", Mode::Leftmost);
    assert_eq!(a, b);
}

#[test]
fn singleton_classes_agree_with_compressed() {
    let pattern = "[a-f]x|é";
    let n = nfa(pattern, Direction::Forward);
    let compressed = byte_classes(&[&n]);
    let singletons = ByteClasses::singletons();
    let d1 = build(&n, &compressed, Mode::Anchored, DfaRole::ForwardExact, 100, pattern).unwrap();
    let d2 = build(&n, &singletons, Mode::Anchored, DfaRole::ForwardExact, 100, pattern).unwrap();
    assert_eq!(d2.stride(), 256);
    assert!(d1.stride() < 256);
    for input in ["ax", "fx", "gx", "é", "e", ""] {
        assert_eq!(
            accepts(&d1, &compressed, input.as_bytes()),
            accepts(&d2, &singletons, input.as_bytes()),
            "{input:?}"
        );
    }
}

#[test]
fn remap_columns_permutes_rows() {
    let (d, _) = dfa("ab", Mode::Anchored);
    let columns: Vec<usize> = (0..d.stride()).rev().collect();
    let remapped = d.remap_columns(&columns);
    assert_eq!(remapped.stride(), d.stride());
    for s in 0..d.state_count() {
        let s = StateId::new(s);
        let mut row = d.row(s).to_vec();
        row.reverse();
        assert_eq!(remapped.row(s), row.as_slice());
    }
}
