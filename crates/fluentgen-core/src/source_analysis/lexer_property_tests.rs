// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Property-based tests for the Go lexer.
//!
//! 1. **Lexer never panics**: arbitrary string input always produces tokens
//! 2. **Token spans within input**: all token spans satisfy `end <= input.len()`
//! 3. **Spans are ordered**: each token starts at or after the previous one ends
//! 4. **EOF is always last**: `lex_with_eof` always ends with EOF
//! 5. **Lexer is deterministic**: same input always produces same tokens
//! 6. **Valid tokens lex cleanly**: known-valid fragments produce no errors

use proptest::prelude::*;

use super::lexer::{lex, lex_with_eof};
use super::token::TokenKind;

/// Known-valid single-token fragments.
const VALID_TOKENS: &[&str] = &[
    "Color",
    "_",
    "ÄrgerStyle",
    "struct",
    "42",
    "0x1F",
    "0b1010",
    "1_000",
    "3.14",
    "1e-9",
    "0x1p-2",
    "2i",
    "'a'",
    "'\\n'",
    "\"json:\\\"x\\\"\"",
    "`raw\nstring`",
    "...",
    "<-",
    ":=",
    "&^=",
    "~",
];

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn lexer_never_panics(input in "\\PC{0,200}") {
        let _ = lex(&input);
    }

    #[test]
    fn token_spans_within_input(input in "\\PC{0,200}") {
        for token in lex_with_eof(&input) {
            prop_assert!(token.span().end() as usize <= input.len());
        }
    }

    #[test]
    fn token_spans_are_ordered(input in "\\PC{0,200}") {
        let tokens = lex_with_eof(&input);
        for pair in tokens.windows(2) {
            prop_assert!(pair[0].span().end() <= pair[1].span().start());
        }
    }

    #[test]
    fn eof_is_last(input in "\\PC{0,200}") {
        let tokens = lex_with_eof(&input);
        prop_assert!(tokens.last().is_some_and(|t| t.kind().is_eof()));
        prop_assert_eq!(tokens.iter().filter(|t| t.kind().is_eof()).count(), 1);
    }

    #[test]
    fn lexer_is_deterministic(input in "\\PC{0,200}") {
        prop_assert_eq!(lex(&input), lex(&input));
    }

    #[test]
    fn valid_tokens_lex_cleanly(token in prop::sample::select(VALID_TOKENS)) {
        let tokens = lex(token);
        prop_assert!(!tokens.is_empty());
        prop_assert!(!tokens[0].kind().is_error(), "{:?}", tokens[0]);
        prop_assert!(tokens.iter().all(|t| !matches!(t.kind(), TokenKind::Error(_))));
    }
}
