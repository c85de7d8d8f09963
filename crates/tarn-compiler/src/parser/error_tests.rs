use super::{ParseError, ParseErrorKind, parse};

#[test]
fn display() {
    let err = ParseError::new(3, ParseErrorKind::UnclosedGroup);
    assert_eq!(err.to_string(), "unclosed group at offset 3");

    let err = ParseError::new(0, ParseErrorKind::Unsupported("lookahead"));
    assert_eq!(err.to_string(), "unsupported syntax: lookahead at offset 0");
}

#[test]
fn serializes_position_and_reason() {
    let err = parse("a{3,1}").unwrap_err();
    let json = serde_json::to_string(&err).unwrap();
    insta::assert_snapshot!(json, @r#"{"position":1,"reason":"repetition minimum exceeds maximum"}"#);
}

#[test]
fn render_plain() {
    let pattern = "ab)";
    let err = parse(pattern).unwrap_err();
    insta::assert_snapshot!(err.render(pattern), @r"
    error: unmatched closing parenthesis
      |
    1 | ab)
      |   ^ unmatched closing parenthesis
    ");
}

#[test]
fn render_at_start() {
    let pattern = "*a";
    let err = parse(pattern).unwrap_err();
    insta::assert_snapshot!(err.render(pattern), @r"
    error: quantifier has nothing to repeat
      |
    1 | *a
      | ^ quantifier has nothing to repeat
    ");
}

#[test]
fn render_past_end_does_not_panic() {
    let pattern = "ab\\";
    let err = ParseError::new(pattern.len() + 10, ParseErrorKind::TrailingEscape);
    assert!(err.render(pattern).contains("pattern ends with a lone backslash"));
}

#[test]
fn render_styled_has_ansi() {
    let pattern = "(a";
    let err = parse(pattern).unwrap_err();
    let out = err.render_styled(pattern);
    assert!(out.contains("unclosed group"));
    assert!(out.contains('\x1b'));
}
