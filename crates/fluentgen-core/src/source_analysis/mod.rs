// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Parsing infrastructure for Go source code.
//!
//! This module contains the lexer and the parser that produce the
//! [`SourceFile`](crate::ast::SourceFile) tree consumed by the fluent
//! generator.
//!
//! # Lexical Analysis
//!
//! The [`Lexer`] converts source text into a stream of [`Token`]s. Each token
//! carries its source location via [`Span`] and the whitespace and comments
//! around it as [`Trivia`]. Automatic semicolon insertion happens here.
//!
//! ```
//! use fluentgen_core::source_analysis::{Lexer, TokenKind};
//!
//! let tokens: Vec<_> = Lexer::new("type A struct{}").collect();
//! assert_eq!(tokens.len(), 6); // type, A, struct, {, }, inserted `;`
//! ```
//!
//! # Parsing
//!
//! [`parse_source`] converts text into a [`SourceFile`](crate::ast::SourceFile)
//! plus diagnostics. Only declarations are parsed in depth; function bodies
//! and value initializers are skipped by balancing delimiters.
//!
//! # Error Handling
//!
//! The lexer never stops on bad input: invalid characters and unterminated
//! literals become [`TokenKind::Error`] tokens. The parser reports them (and
//! its own errors) as [`Diagnostic`]s and keeps going, so one pass reports
//! every problem in a file. Use [`LexError`] for miette-rendered lexical
//! errors.

mod error;
mod lexer;
mod parser;
mod span;
mod token;

#[cfg(test)]
mod lexer_property_tests;

pub use error::{LexError, LexErrorKind};
pub use lexer::{Lexer, lex, lex_with_eof};
pub use parser::{Diagnostic, Severity, comment_text, parse, parse_source};
pub use span::Span;
pub use token::{Keyword, Token, TokenKind, Trivia, is_keyword};
