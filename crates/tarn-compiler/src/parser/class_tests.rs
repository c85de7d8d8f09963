use super::class::ClassSet;
use crate::ast::Node;

#[test]
fn push_merges_adjacent_and_overlapping() {
    let mut set = ClassSet::new();
    set.push('d', 'f');
    set.push('a', 'c');
    set.push('x', 'x');
    set.push('e', 'k');
    assert_eq!(set.ranges(), &[('a', 'k'), ('x', 'x')]);
}

#[test]
fn push_merges_across_surrogate_gap() {
    let mut set = ClassSet::new();
    set.push('\u{D000}', '\u{D7FF}');
    set.push('\u{E000}', '\u{E0FF}');
    assert_eq!(set.ranges(), &[('\u{D000}', '\u{E0FF}')]);
}

#[test]
fn negate_skips_surrogates() {
    let mut set = ClassSet::new();
    set.push('\0', '\u{D000}');
    set.push('\u{E800}', char::MAX);
    assert_eq!(set.negate().ranges(), &[('\u{D001}', '\u{E7FF}')]);

    let mut set = ClassSet::new();
    set.push('\0', '\u{D7FF}');
    assert_eq!(set.negate().ranges(), &[('\u{E000}', char::MAX)]);
}

#[test]
fn negate_twice_is_identity() {
    let set = ClassSet::word();
    assert_eq!(set.negate().negate(), set);
}

#[test]
fn empty_set_lowers_to_never() {
    assert_eq!(ClassSet::new().into_node(), Node::never());
    assert_eq!(ClassSet::new().negate().negate().into_node(), Node::never());
}
