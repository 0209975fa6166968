// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Property-based tests for the lexer.
//!
//! These tests use `proptest` to verify lexer invariants over generated
//! inputs:
//!
//! 1. **Lexer never panics** — arbitrary string input always produces tokens
//! 2. **Token spans within input** — all spans satisfy `end <= input.len()`
//! 3. **Token spans are ordered and non-overlapping**
//! 4. **EOF is always last** — `lex_with_eof` always ends with EOF
//! 5. **Lexer is deterministic** — same input, same tokens
//! 6. **Round-trip** — leading trivia plus lexemes reconstruct the input
//! 7. **Valid fragments lex cleanly** — known-good inputs produce no
//!    unknown tokens and no diagnostics

use proptest::prelude::*;

use super::lexer::{lex_with_eof, Lexer, LexerMode};
use super::source::{FileId, SourceText};
use crate::diagnostics::Diagnostics;

/// Known-valid single-token fragments that should lex without errors.
const VALID_SINGLE_TOKENS: &[&str] = &[
    "42",
    "4'b10xz",
    "32'shDEAD_BEEF",
    "'hff",
    "'0",
    "'x",
    "3.14",
    "1.5e2",
    "10ns",
    "1.5us",
    "\"hello\\n\"",
    "foo",
    "_bar9",
    "\\esc*aped ",
    "$display",
    "module",
    "logic",
    "`include",
    "`MY_MACRO",
    "+",
    "-",
    "**",
    "<<<=",
    ">>>",
    "==?",
    "!==",
    "<->",
    "::",
    "[",
    "]",
    "{",
    "}",
    "?",
    ";",
];

/// Multi-token valid expressions that should lex cleanly.
const VALID_EXPRESSIONS: &[&str] = &[
    "a + b",
    "x[7:0]",
    "pkg::item",
    "{3{2'b10}}",
    "q <= d ? 'x : 8'd0;",
    "foo(a, b) ** 2",
    "value >>> shift",
    "logic [15:0] bus;",
];

/// Generates arbitrary printable-ish source including edge characters.
fn arbitrary_source() -> impl Strategy<Value = String> {
    proptest::string::string_regex("[ -~\\t\\n\\r\u{0}\\\\'\"`]{0,64}")
        .expect("valid regex")
}

/// Generates source assembled from valid fragments and whitespace.
fn token_soup() -> impl Strategy<Value = String> {
    let fragment = prop_oneof![
        proptest::sample::select(VALID_SINGLE_TOKENS).prop_map(str::to_owned),
        proptest::sample::select(VALID_EXPRESSIONS).prop_map(str::to_owned),
        Just("// line comment".to_owned()),
        Just("/* block */".to_owned()),
    ];
    proptest::collection::vec(fragment, 0..12).prop_map(|fragments| fragments.join(" \n "))
}

proptest! {
    #[test]
    fn lexer_never_panics(source in arbitrary_source()) {
        let _ = lex_with_eof(&source);
    }

    #[test]
    fn token_spans_are_in_bounds_and_ordered(source in arbitrary_source()) {
        let tokens = lex_with_eof(&source);
        let mut previous_end = 0u32;
        for token in &tokens {
            let span = token.span();
            prop_assert!(span.start() <= span.end());
            prop_assert!(span.end() as usize <= source.len());
            prop_assert!(span.start() >= previous_end, "overlapping token spans");
            previous_end = span.end();
        }
    }

    #[test]
    fn eof_is_always_last(source in arbitrary_source()) {
        let tokens = lex_with_eof(&source);
        prop_assert!(!tokens.is_empty());
        prop_assert!(tokens.last().unwrap().kind().is_eof());
        prop_assert!(tokens[..tokens.len() - 1].iter().all(|t| !t.kind().is_eof()));
    }

    #[test]
    fn lexer_is_deterministic(source in arbitrary_source()) {
        prop_assert_eq!(lex_with_eof(&source), lex_with_eof(&source));
    }

    #[test]
    fn round_trip_reconstructs_input(source in token_soup()) {
        let tokens = lex_with_eof(&source);
        let mut rebuilt = String::new();
        for token in &tokens {
            for trivia in token.leading_trivia() {
                rebuilt.push_str(trivia.text());
            }
            rebuilt.push_str(&source[token.span().as_range()]);
        }
        prop_assert_eq!(rebuilt, source);
    }

    #[test]
    fn arbitrary_round_trip_reconstructs_input(source in arbitrary_source()) {
        let tokens = lex_with_eof(&source);
        let mut rebuilt = String::new();
        for token in &tokens {
            for trivia in token.leading_trivia() {
                rebuilt.push_str(trivia.text());
            }
            rebuilt.push_str(&source[token.span().as_range()]);
        }
        prop_assert_eq!(rebuilt, source);
    }

    #[test]
    fn valid_fragments_lex_cleanly(fragment in proptest::sample::select(VALID_SINGLE_TOKENS)) {
        let diagnostics = Diagnostics::new();
        let tokens: Vec<_> =
            Lexer::new(SourceText::new(FileId::default(), fragment), &diagnostics).collect();
        prop_assert!(!tokens.is_empty());
        prop_assert!(tokens.iter().all(|t| !t.kind().is_unknown()));
        prop_assert!(diagnostics.is_empty(), "unexpected diagnostics for {fragment}");
    }

    #[test]
    fn directive_mode_never_panics(source in arbitrary_source()) {
        let diagnostics = Diagnostics::new();
        let mut lexer = Lexer::new(SourceText::new(FileId::default(), &source), &diagnostics);
        loop {
            let token = lexer.lex(LexerMode::Directive);
            if token.kind().is_eof() {
                break;
            }
        }
    }
}
