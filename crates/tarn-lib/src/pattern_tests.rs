use indoc::indoc;

use crate::{
    CompilationPolicy, CompiledPattern, EmitError, Error, Interpreter, ParseErrorKind, Pattern,
    compile,
};

fn spans(pattern: &CompiledPattern, input: &str) -> Vec<(usize, usize)> {
    pattern
        .new_matcher(input)
        .map(|span| (span.start, span.end))
        .collect()
}

#[test]
fn literal_scenario() {
    let p = compile("abcd", "abcd_matcher").unwrap();
    assert!(p.new_matcher("abcd").matches());
    assert!(!p.new_matcher("xabcdy").matches());
    assert!(p.new_matcher("xabcdy").contained_in());
    assert_eq!(spans(&p, "xabcdy"), vec![(1, 5)]);
}

#[test]
fn bounded_class_scenario() {
    let p = compile("[B-i]{0,2}", "short_class").unwrap();
    assert!(p.new_matcher("").matches());
    assert!(p.new_matcher("").contained_in());
    assert!(p.new_matcher("aZ").matches());
    assert!(!p.new_matcher("aZa").matches());
}

#[test]
fn optional_group_scenario() {
    let p = compile("(123)|(234){0,1}", "optional_group").unwrap();
    for input in ["123", "234", ""] {
        assert!(p.new_matcher(input).matches(), "{input:?}");
    }
    for input in ["1234", "12", "23"] {
        assert!(!p.new_matcher(input).matches(), "{input:?}");
    }
}

#[test]
fn zero_length_repetition() {
    let p = compile("a{0}b", "zero").unwrap();
    assert!(p.new_matcher("b").matches());
    assert!(!p.new_matcher("ab").matches());

    let p = compile("(a{0})*", "nested_zero").unwrap();
    assert!(p.new_matcher("").matches());
    assert!(!p.new_matcher("a").matches());
    assert_eq!(spans(&p, "ab"), vec![(0, 0), (1, 1), (2, 2)]);

    let p = compile("(a*)*b", "nested_star").unwrap();
    assert!(p.new_matcher("aaab").matches());
    assert_eq!(spans(&p, "xaab"), vec![(1, 4)]);
}

#[test]
fn empty_pattern() {
    let p = compile("", "empty").unwrap();
    assert!(p.new_matcher("").matches());
    assert!(!p.new_matcher("a").matches());
    assert!(p.new_matcher("a").contained_in());
    assert_eq!(spans(&p, "ab"), vec![(0, 0), (1, 1), (2, 2)]);
}

#[test]
fn builder_options() {
    let policy = CompilationPolicy::new().diagnostics(true).literal_factoring(false);
    let p = Pattern::builder("(foo|bar)+")
        .name("words")
        .policy(policy)
        .build()
        .unwrap();

    assert_eq!(p.name(), "words");
    assert_eq!(p.pattern(), "(foo|bar)+");
    assert_eq!(p.factorization().min_len, 3);
    assert_eq!(p.factorization().max_len, None);
    assert!(p.diagnostics().unwrap().starts_with("[stats]\n"));
    assert_eq!(p.stats().artifact_size, p.artifact().len());

    let p = Pattern::builder("x").build().unwrap();
    assert_eq!(p.name(), "matcher");
    assert!(p.diagnostics().is_none());
}

#[test]
fn parse_error_surfaces() {
    let err = compile("a(b", "broken").unwrap_err();
    let parse = err.as_parse_error().unwrap();
    assert_eq!(parse.kind, ParseErrorKind::UnclosedGroup);
    assert_eq!(err.to_string(), parse.to_string());

    let err = compile("^a", "anchored").unwrap_err();
    assert_eq!(
        err.as_parse_error().map(|e| e.kind),
        Some(ParseErrorKind::Unsupported("start anchor"))
    );
}

#[test]
fn state_cap_surfaces() {
    let err = compile("[ab]*a[ab]{14}", "blowup").unwrap_err();
    let Error::Compile(tarn_compiler::Error::StateLimitExceeded(err)) = err else {
        panic!("expected state limit error, got {err:?}");
    };
    assert_eq!(err.cap, 16383);
    assert_eq!(err.pattern, "[ab]*a[ab]{14}");

    let small = CompilationPolicy::new().state_limit(4);
    let err = Pattern::builder("[ab]*a[ab]{3}")
        .policy(small)
        .build()
        .unwrap_err();
    insta::assert_snapshot!(err.to_string(), @r#"pattern "[ab]*a[ab]{3}" needs more than 4 DFA states"#);
}

#[test]
fn compilation_is_deterministic() {
    let pattern = "([a-f0-9]{2}:){2}[a-f0-9]{2}|é+";
    let a = compile(pattern, "mac").unwrap();
    let b = compile(pattern, "mac").unwrap();
    assert_eq!(a.artifact(), b.artifact());
}

#[test]
fn corrupted_artifact_is_rejected() {
    let p = compile("needle", "needle").unwrap();
    let mut bytes = p.artifact().to_vec();
    let middle = bytes.len() / 2;
    bytes[middle] ^= 0x55;
    let err = Interpreter::new().load(&bytes).unwrap_err();
    assert!(matches!(err, EmitError::Module(_)), "{err:?}");

    let reloaded = Interpreter::new().load(p.artifact()).unwrap();
    assert!(reloaded.matcher("haystack with needle").contained_in());
}

#[test]
fn shared_across_threads() {
    let p = compile("[0-9]+(\\.[0-9]+)?", "number").unwrap();
    let inputs = ["pi 3.14", "e 2.71828", "none", "1 2 3", "x.5"];
    let expected = [
        vec![(3, 7)],
        vec![(2, 9)],
        vec![],
        vec![(0, 1), (2, 3), (4, 5)],
        vec![(2, 3)],
    ];

    let p = &p;
    std::thread::scope(|s| {
        let handles: Vec<_> = inputs
            .into_iter()
            .map(|input| s.spawn(move || spans(p, input)))
            .collect();
        for (handle, expected) in handles.into_iter().zip(expected) {
            assert_eq!(handle.join().unwrap(), expected);
        }
    });
}

#[test]
fn diagnostics_dump() {
    let policy = CompilationPolicy::new().diagnostics(true);
    let p = Pattern::builder("a|b").name("ab").policy(policy).build().unwrap();
    let report = p.diagnostics().unwrap();
    assert!(report.contains(indoc! {"
        [classes] count=2
        C0 00-60 63-ff
        C1 61-62
    "}));
}
