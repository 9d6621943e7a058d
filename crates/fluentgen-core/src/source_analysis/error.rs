// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Lexical error classification.
//!
//! The lexer never fails; it emits [`TokenKind::Error`](super::TokenKind::Error)
//! tokens carrying the offending text. [`LexError::classify`] turns such a
//! token back into a structured error for diagnostics.

// Spurious warnings from miette derive macro expansion
#![allow(unused_assignments)]

use miette::Diagnostic;
use thiserror::Error;

use super::Span;

/// A lexical error recovered from an error token.
#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
#[error("{kind}")]
#[diagnostic(code(fluentgen::lex))]
pub struct LexError {
    /// The kind of lexical error.
    #[source]
    pub kind: LexErrorKind,
    /// The source location of the error.
    #[label("here")]
    pub span: Span,
}

impl LexError {
    /// Creates a new lexical error.
    #[must_use]
    pub fn new(kind: LexErrorKind, span: Span) -> Self {
        Self { kind, span }
    }

    /// Classifies the text of an error token.
    #[must_use]
    pub fn classify(text: &str, span: Span) -> Self {
        let kind = match text.chars().next() {
            Some('"') => LexErrorKind::UnterminatedString,
            Some('`') => LexErrorKind::UnterminatedRawString,
            Some('\'') => LexErrorKind::UnterminatedRune,
            Some('/') if text.starts_with("/*") => LexErrorKind::UnterminatedComment,
            Some(c) => LexErrorKind::UnexpectedCharacter(c),
            None => LexErrorKind::UnexpectedCharacter('\0'),
        };
        Self::new(kind, span)
    }
}

/// The kind of lexical error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LexErrorKind {
    /// A character that cannot start any Go token.
    #[error("invalid character {0:?}")]
    UnexpectedCharacter(char),

    /// An interpreted string literal was not terminated on its line.
    #[error("string literal not terminated")]
    UnterminatedString,

    /// A raw string literal was not terminated before EOF.
    #[error("raw string literal not terminated")]
    UnterminatedRawString,

    /// A rune literal was not terminated on its line.
    #[error("rune literal not terminated")]
    UnterminatedRune,

    /// A block comment was not terminated before EOF.
    #[error("comment not terminated")]
    UnterminatedComment,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_error_tokens() {
        let span = Span::new(0, 4);
        assert_eq!(
            LexError::classify("\"abc", span).kind,
            LexErrorKind::UnterminatedString
        );
        assert_eq!(
            LexError::classify("`abc", span).kind,
            LexErrorKind::UnterminatedRawString
        );
        assert_eq!(
            LexError::classify("'a", span).kind,
            LexErrorKind::UnterminatedRune
        );
        assert_eq!(
            LexError::classify("/* x", span).kind,
            LexErrorKind::UnterminatedComment
        );
        assert_eq!(
            LexError::classify("@", span).kind,
            LexErrorKind::UnexpectedCharacter('@')
        );
    }

    #[test]
    fn lex_error_display() {
        let err = LexError::classify("#", Span::new(3, 4));
        assert_eq!(err.to_string(), "invalid character '#'");
        assert_eq!(err.span, Span::new(3, 4));
    }
}
