use super::Node;
use crate::parser::parse;

fn lens(pattern: &str) -> (usize, Option<usize>) {
    let node = parse(pattern).unwrap();
    (node.min_len(), node.max_len())
}

#[test]
fn length_bounds_in_bytes() {
    assert_eq!(lens("abc"), (3, Some(3)));
    assert_eq!(lens("é"), (2, Some(2)));
    assert_eq!(lens("a|bcd"), (1, Some(3)));
    assert_eq!(lens("a*"), (0, None));
    assert_eq!(lens("(ab){2,3}"), (4, Some(6)));
    assert_eq!(lens("[a-é]"), (1, Some(2)));
    assert_eq!(lens("."), (1, Some(4)));
    assert_eq!(lens(""), (0, Some(0)));
    assert_eq!(lens("()*"), (0, Some(0)));
    assert_eq!(lens("[B-i]{0,2}"), (0, Some(2)));
}

#[test]
fn never_has_vacuous_bounds() {
    assert_eq!(Node::never().min_len(), 0);
    assert_eq!(Node::never().max_len(), Some(0));
}

#[test]
fn lengths_saturate() {
    let node = parse("((a{1000}){1000}){1000}").unwrap();
    assert_eq!(node.min_len(), 1_000_000_000);
    let deep = format!("{}a{}", "(".repeat(7), "{1000})".repeat(7));
    let node = parse(&deep).unwrap();
    assert_eq!(node.max_len(), Some(usize::MAX));
}

#[test]
fn zero_width() {
    assert_eq!(parse("").unwrap().max_len(), Some(0));
    assert_eq!(parse("(){3}").unwrap().max_len(), Some(0));
    assert_eq!(parse("a?").unwrap().max_len(), Some(1));
}

#[test]
fn reversed_mirrors_concatenation() {
    assert_eq!(parse("abc").unwrap().reversed(), parse("cba").unwrap());
    assert_eq!(
        parse("ab|cd*").unwrap().reversed(),
        parse("ba|d*c").unwrap()
    );
    assert_eq!(parse("(ab)+").unwrap().reversed(), parse("(ba)+").unwrap());
}

#[test]
fn literal_str() {
    assert_eq!(Node::literal_str("x"), Node::Literal('x'));
    assert_eq!(
        Node::literal_str("xy"),
        Node::Concat(vec![Node::Literal('x'), Node::Literal('y')])
    );
}
