use std::error::Error as _;

use regex_automaton::{ErrorKind, ParseErrorKind, Regex};

fn syntax(pattern: &str) -> ParseErrorKind {
    let err = Regex::new(pattern).unwrap_err();
    match err.syntax_error() {
        Some(err) => err.kind().clone(),
        None => panic!("expected a syntax error for {:?}: {:?}", pattern, err),
    }
}

#[test]
fn malformed_patterns() {
    use ParseErrorKind::*;

    assert_eq!(GroupUnclosed, syntax("(a"));
    assert_eq!(GroupUnopened, syntax("a)"));
    assert_eq!(ClassUnclosed, syntax("[a"));
    assert_eq!(ClassRangeInvalid, syntax("[z-a]"));
    assert_eq!(EscapeUnexpectedEof, syntax("a\\"));
    assert_eq!(RepetitionMissing, syntax("*"));
    assert_eq!(RepetitionNested, syntax("a**"));
    assert_eq!(RepetitionLazy, syntax("a*?"));
    assert_eq!(RepetitionCountInvalid, syntax("a{3,2}"));
    assert_eq!(RepetitionCountUnclosed, syntax("a{2"));
    assert_eq!(AlternationEmpty, syntax("a||b"));
    assert_eq!(FlagUnrecognized, syntax("(?x)a"));
    assert_eq!(UnsupportedLook, syntax("^a"));
}

#[test]
fn syntax_error_is_the_source() {
    let err = Regex::new("(?i)[z-a]").unwrap_err();
    assert!(matches!(*err.kind(), ErrorKind::Syntax(_)));
    let source = err.source().unwrap();
    assert_eq!(
        err.syntax_error().unwrap().to_string(),
        source.to_string()
    );
    assert!(err.to_string().contains("(?i)[z-a]"));
}

#[test]
fn size_limit_is_reported() {
    let err = Regex::builder()
        .size_limit(Some(1 << 16))
        .build("[a-z]{50}[0-9]{50}")
        .unwrap_err();
    match *err.kind() {
        ErrorKind::TooBig { limit } => assert_eq!(1 << 16, limit),
        ref kind => panic!("unexpected error kind: {:?}", kind),
    }
    assert!(err.syntax_error().is_none());
    assert!(err.source().is_none());
}

#[test]
fn default_size_limit_stops_blowup() {
    // Every byte could begin the final run of 20, so determinization has to
    // track each position at once.
    let err = Regex::new("[ab]*a[ab]{20}").unwrap_err();
    assert!(matches!(*err.kind(), ErrorKind::TooBig { .. }));
    assert!(Regex::builder()
        .size_limit(None)
        .build("[ab]*a[ab]{10}")
        .is_ok());
}
