// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Recursive descent parser for Go source files.
//!
//! This parser builds a [`SourceFile`] from a stream of tokens. It covers
//! the declaration grammar in full and skips everything the generator never
//! looks at (function bodies, initializer expressions).
//!
//! # Design Philosophy
//!
//! - **Error recovery is mandatory** - the parser always produces a tree
//! - **Multiple errors** - report all errors, don't stop at the first
//! - **Precise spans** - every diagnostic points at the offending token
//! - **Synchronization points** - recover at `;` and closing delimiters
//!
//! # Doc Comments
//!
//! Go has no dedicated doc-comment syntax. A declaration's doc is the
//! comment group that ends on the line immediately before it; see
//! [`Parser::collect_doc_comment`] and [`comment_text`].
//!
//! # Usage
//!
//! ```
//! use fluentgen_core::source_analysis::parse_source;
//!
//! let (file, diagnostics) = parse_source("package ui\n\ntype ButtonStyle struct {\n\tColor string\n}\n");
//!
//! assert!(diagnostics.is_empty());
//! assert_eq!(file.package.name, "ui");
//! assert_eq!(file.declarations.len(), 1);
//! ```

use ecow::EcoString;

use crate::ast::{Identifier, SourceFile};
use crate::source_analysis::{Keyword, LexError, Span, Token, TokenKind, Trivia, lex_with_eof};

mod declarations;
mod types;


/// A diagnostic message (error or warning).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// The severity of the diagnostic.
    pub severity: Severity,
    /// The error message.
    pub message: EcoString,
    /// The source location.
    pub span: Span,
    /// Optional hint for how to fix the issue.
    pub hint: Option<EcoString>,
}

impl Diagnostic {
    /// Creates a new error diagnostic.
    #[must_use]
    pub fn error(message: impl Into<EcoString>, span: Span) -> Self {
        Self {
            severity: Severity::Error,
            message: message.into(),
            span,
            hint: None,
        }
    }

    /// Creates a new warning diagnostic.
    #[must_use]
    pub fn warning(message: impl Into<EcoString>, span: Span) -> Self {
        Self {
            severity: Severity::Warning,
            message: message.into(),
            span,
            hint: None,
        }
    }

    /// Attaches a hint.
    #[must_use]
    pub fn with_hint(mut self, hint: impl Into<EcoString>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    /// Returns `true` for error-severity diagnostics.
    #[must_use]
    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

/// Diagnostic severity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    /// An error that makes the input unusable.
    Error,
    /// A warning; generation continues.
    Warning,
}

/// Maximum nesting depth for type expressions before the parser bails out.
///
/// Prevents stack overflow on adversarial input such as `[][][]...T` or
/// `((((T))))`.
const MAX_NESTING_DEPTH: usize = 128;

/// The parser state.
pub(super) struct Parser {
    /// The tokens being parsed, always terminated by EOF.
    pub(super) tokens: Vec<Token>,
    /// Current token index.
    pub(super) current: usize,
    /// Accumulated diagnostics.
    pub(super) diagnostics: Vec<Diagnostic>,
    /// Current type nesting depth.
    nesting_depth: usize,
}

impl Parser {
    /// Creates a new parser for the given tokens.
    ///
    /// Lexical error tokens are reported and dropped up front so the
    /// grammar rules never see them.
    fn new(tokens: Vec<Token>) -> Self {
        let mut diagnostics = Vec::new();
        let mut kept: Vec<Token> = Vec::with_capacity(tokens.len());
        for token in tokens {
            if let TokenKind::Error(text) = token.kind() {
                let error = LexError::classify(text, token.span());
                diagnostics.push(Diagnostic::error(error.to_string(), token.span()));
            } else {
                kept.push(token);
            }
        }
        if !kept.last().is_some_and(|t| t.kind().is_eof()) {
            let end = kept.last().map_or(0, |t| t.span().end());
            kept.push(Token::new(TokenKind::Eof, Span::new(end, end)));
        }
        Self {
            tokens: kept,
            current: 0,
            diagnostics,
            nesting_depth: 0,
        }
    }

    // ========================================================================
    // Token Management
    // ========================================================================

    /// Returns the current token.
    pub(super) fn current_token(&self) -> &Token {
        let last = self.tokens.len() - 1;
        &self.tokens[self.current.min(last)]
    }

    /// Returns the current token kind.
    pub(super) fn current_kind(&self) -> &TokenKind {
        self.current_token().kind()
    }

    /// Returns the kind `offset` tokens ahead of the current one.
    pub(super) fn peek_at(&self, offset: usize) -> Option<&TokenKind> {
        self.tokens.get(self.current + offset).map(Token::kind)
    }

    /// Peeks at the next token kind.
    pub(super) fn peek_kind(&self) -> Option<&TokenKind> {
        self.peek_at(1)
    }

    /// Checks if we're at the end of input.
    pub(super) fn is_at_end(&self) -> bool {
        self.current_kind().is_eof()
    }

    /// Advances to the next token and returns the previous one.
    pub(super) fn advance(&mut self) -> Token {
        let token = self.current_token().clone();
        if !self.is_at_end() {
            self.current += 1;
        }
        token
    }

    /// Returns the span of the most recently consumed token.
    pub(super) fn previous_span(&self) -> Span {
        self.current
            .checked_sub(1)
            .and_then(|i| self.tokens.get(i))
            .map_or_else(|| self.current_token().span(), Token::span)
    }

    /// Returns a span from `start` to the end of the last consumed token.
    pub(super) fn span_from(&self, start: Span) -> Span {
        start.merge(self.previous_span())
    }

    /// Checks if the current token matches the given kind.
    ///
    /// Only the variant is compared, so `Identifier(_)` matches any name.
    pub(super) fn check(&self, kind: &TokenKind) -> bool {
        if self.is_at_end() {
            return false;
        }
        std::mem::discriminant(self.current_kind()) == std::mem::discriminant(kind)
    }

    /// Consumes the current token if it matches the given kind.
    pub(super) fn match_token(&mut self, kind: &TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Expects the current token to match the given kind, advancing if it does.
    ///
    /// If the token doesn't match, reports an error and returns `None`.
    pub(super) fn expect(&mut self, kind: &TokenKind, what: &str) -> Option<Token> {
        if self.check(kind) {
            Some(self.advance())
        } else {
            self.error(format!("expected {what}, found {}", self.describe_current()));
            None
        }
    }

    /// Checks if the current token is the given keyword.
    pub(super) fn check_keyword(&self, keyword: Keyword) -> bool {
        matches!(self.current_kind(), TokenKind::Keyword(k) if *k == keyword)
    }

    /// Consumes the current token if it is the given keyword.
    pub(super) fn match_keyword(&mut self, keyword: Keyword) -> bool {
        if self.check_keyword(keyword) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Consumes an identifier, reporting an error if there is none.
    pub(super) fn expect_identifier(&mut self, what: &str) -> Option<Identifier> {
        if let TokenKind::Identifier(name) = self.current_kind() {
            let ident = Identifier::new(name.clone(), self.current_token().span());
            self.advance();
            Some(ident)
        } else {
            self.error(format!("expected {what}, found {}", self.describe_current()));
            None
        }
    }

    /// Expects the `;` that terminates a declaration.
    ///
    /// As in Go, the semicolon may be omitted before a closing `)` or `}`.
    pub(super) fn expect_semicolon(&mut self, after: &str) {
        if self.match_token(&TokenKind::Semicolon { inserted: false }) {
            return;
        }
        if matches!(
            self.current_kind(),
            TokenKind::RightParen | TokenKind::RightBrace | TokenKind::Eof
        ) {
            return;
        }
        self.error(format!(
            "expected ';' after {after}, found {}",
            self.describe_current()
        ));
        self.skip_to_statement_end();
        self.match_token(&TokenKind::Semicolon { inserted: false });
    }

    /// Describes the current token for error messages.
    pub(super) fn describe_current(&self) -> String {
        match self.current_kind() {
            TokenKind::Semicolon { inserted: true } => "newline".to_string(),
            TokenKind::Eof => "EOF".to_string(),
            kind => format!("'{kind}'"),
        }
    }

    // ========================================================================
    // Error Handling & Recovery
    // ========================================================================

    /// Reports an error at the current token.
    pub(super) fn error(&mut self, message: impl Into<EcoString>) {
        let span = self.current_token().span();
        self.diagnostics.push(Diagnostic::error(message, span));
    }

    /// Increments the nesting depth, reporting an error past
    /// [`MAX_NESTING_DEPTH`]. Pair every `true` with [`Self::leave_nesting`].
    pub(super) fn enter_nesting(&mut self) -> bool {
        if self.nesting_depth >= MAX_NESTING_DEPTH {
            self.error(format!(
                "type nesting is too deep (maximum {MAX_NESTING_DEPTH} levels)"
            ));
            return false;
        }
        self.nesting_depth += 1;
        true
    }

    /// Decrements the nesting depth (pair with [`Self::enter_nesting`]).
    pub(super) fn leave_nesting(&mut self) {
        self.nesting_depth = self.nesting_depth.saturating_sub(1);
    }

    /// Skips to the end of the current list element.
    ///
    /// Stops (without consuming) at a `;` or `,` outside nested delimiters,
    /// or at a closing delimiter that would close an enclosing construct.
    pub(super) fn skip_to_list_end(&mut self) {
        self.skip_tokens(true);
    }

    /// Skips to the end of the current declaration or statement.
    ///
    /// Like [`Self::skip_to_list_end`] but commas do not stop the scan, so
    /// `var a, b = 1, 2` is skipped as one unit.
    pub(super) fn skip_to_statement_end(&mut self) {
        self.skip_tokens(false);
    }

    fn skip_tokens(&mut self, stop_at_comma: bool) {
        let mut depth = 0usize;
        loop {
            match self.current_kind() {
                TokenKind::Eof => return,
                TokenKind::LeftParen | TokenKind::LeftBracket | TokenKind::LeftBrace => {
                    depth += 1;
                }
                TokenKind::RightParen | TokenKind::RightBracket | TokenKind::RightBrace => {
                    if depth == 0 {
                        return;
                    }
                    depth -= 1;
                }
                TokenKind::Semicolon { .. } if depth == 0 => return,
                TokenKind::Comma if depth == 0 && stop_at_comma => return,
                _ => {}
            }
            self.advance();
        }
    }

    /// Skips a balanced delimiter group starting at the current opening
    /// token. Reports an error if input ends first.
    pub(super) fn skip_balanced(&mut self) {
        let open = self.current_token().span();
        let mut depth = 0usize;
        loop {
            match self.current_kind() {
                TokenKind::Eof => {
                    self.diagnostics.push(Diagnostic::error(
                        "unexpected EOF, expected closing delimiter",
                        self.current_token().span(),
                    ));
                    self.diagnostics
                        .push(Diagnostic::warning("unclosed delimiter opened here", open));
                    return;
                }
                TokenKind::LeftParen | TokenKind::LeftBracket | TokenKind::LeftBrace => {
                    depth += 1;
                }
                TokenKind::RightParen | TokenKind::RightBracket | TokenKind::RightBrace => {
                    depth = depth.saturating_sub(1);
                    if depth == 0 {
                        self.advance();
                        return;
                    }
                }
                _ => {}
            }
            self.advance();
        }
    }

    // ========================================================================
    // Doc comments
    // ========================================================================

    /// Extracts the doc comment from the current token's leading trivia.
    ///
    /// The doc is the last comment group before the token, provided it
    /// ends on the line immediately above it. Comments in a group are
    /// separated by at most one line break; a blank line starts a new
    /// group. Same-line comments after the previous token live in that
    /// token's trailing trivia and are never considered.
    pub(super) fn collect_doc_comment(&self) -> Option<String> {
        let group = lead_comment_group(self.current_token().leading_trivia());
        if group.is_empty() {
            return None;
        }
        let text = comment_text(&group);
        let text = text.trim();
        (!text.is_empty()).then(|| text.to_string())
    }
}

/// Returns the comment texts of the lead comment group in `trivia`.
fn lead_comment_group(trivia: &[Trivia]) -> Vec<&str> {
    let mut group = Vec::new();
    let mut newlines = 0usize;
    for item in trivia.iter().rev() {
        match item {
            Trivia::Whitespace(ws) => newlines += ws.matches('\n').count(),
            comment => {
                let allowed = if group.is_empty() {
                    newlines == 1
                } else {
                    newlines <= 1
                };
                if !allowed {
                    break;
                }
                group.push(comment.as_str());
                newlines = 0;
            }
        }
    }
    group.reverse();
    group
}

/// Returns the text of a comment group with comment markers removed.
///
/// Follows `go/ast.CommentGroup.Text`: the first space after `//` is
/// dropped, directive comments (`//go:generate`, `//line`, ...) are
/// skipped, trailing whitespace is stripped from every line, leading blank
/// lines are removed and runs of blank lines collapse to one. A non-empty
/// result ends with a newline.
///
/// ```
/// use fluentgen_core::source_analysis::comment_text;
///
/// let text = comment_text(&["// Color of the border.", "//", "//", "// Defaults to red."]);
/// assert_eq!(text, "Color of the border.\n\nDefaults to red.\n");
/// ```
#[must_use]
pub fn comment_text(comments: &[&str]) -> String {
    let mut lines: Vec<&str> = Vec::new();
    for comment in comments {
        let body = if let Some(line) = comment.strip_prefix("//") {
            if is_directive(line) {
                continue;
            }
            line.strip_prefix(' ').unwrap_or(line)
        } else if let Some(block) = comment
            .strip_prefix("/*")
            .and_then(|c| c.strip_suffix("*/"))
        {
            block
        } else {
            comment
        };
        lines.extend(body.split('\n').map(str::trim_end));
    }

    let mut kept: Vec<&str> = Vec::with_capacity(lines.len());
    for line in lines {
        if !line.is_empty() || kept.last().is_some_and(|prev| !prev.is_empty()) {
            kept.push(line);
        }
    }
    while kept.last().is_some_and(|line| line.is_empty()) {
        kept.pop();
    }
    if kept.is_empty() {
        return String::new();
    }
    let mut text = kept.join("\n");
    text.push('\n');
    text
}

/// Returns `true` for directive comments (text after `//`), which are
/// never part of documentation.
fn is_directive(line: &str) -> bool {
    if ["line ", "extern ", "export "]
        .iter()
        .any(|prefix| line.starts_with(prefix))
    {
        return true;
    }
    let is_word = |c: char| c.is_ascii_lowercase() || c.is_ascii_digit();
    let Some(colon) = line.find(':') else {
        return false;
    };
    colon > 0
        && line[..colon].chars().all(is_word)
        && line[colon + 1..].chars().next().is_some_and(is_word)
}

/// Parses a token stream into a source file.
///
/// Always returns a tree; check the diagnostics for errors.
#[must_use]
pub fn parse(tokens: Vec<Token>) -> (SourceFile, Vec<Diagnostic>) {
    let mut parser = Parser::new(tokens);
    let file = parser.parse_source_file();
    (file, parser.diagnostics)
}

/// Lexes and parses source text.
#[must_use]
pub fn parse_source(source: &str) -> (SourceFile, Vec<Diagnostic>) {
    parse(lex_with_eof(source))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Declaration, TypeExpr};

    fn parse_ok(source: &str) -> SourceFile {
        let (file, diagnostics) = parse_source(source);
        assert!(diagnostics.is_empty(), "unexpected diagnostics: {diagnostics:?}");
        file
    }

    fn struct_fields(file: &SourceFile) -> &[crate::ast::FieldDecl] {
        match &file.type_specs().next().expect("type spec").ty {
            TypeExpr::Struct(st) => &st.fields,
            other => panic!("expected struct, got {other:?}"),
        }
    }

    #[test]
    fn comment_text_strips_markers() {
        assert_eq!(comment_text(&["// Hello"]), "Hello\n");
        assert_eq!(comment_text(&["//Hello"]), "Hello\n");
        assert_eq!(comment_text(&["//  indented"]), " indented\n");
        assert_eq!(comment_text(&["/* block */"]), " block\n");
    }

    #[test]
    fn comment_text_drops_directives() {
        assert_eq!(comment_text(&["//go:generate stringer", "// Doc."]), "Doc.\n");
        assert_eq!(comment_text(&["//line foo.go:10"]), "");
        // A space after `//` makes it ordinary text.
        assert_eq!(comment_text(&["// go:generate"]), "go:generate\n");
    }

    #[test]
    fn comment_text_collapses_blank_lines() {
        let text = comment_text(&["//", "// A", "//", "//", "// B", "//"]);
        assert_eq!(text, "A\n\nB\n");
    }

    #[test]
    fn comment_text_multiline_block() {
        let text = comment_text(&["/*\n  First.\n  Second.   \n*/"]);
        assert_eq!(text, "  First.\n  Second.\n");
    }

    #[test]
    fn field_doc_from_preceding_line() {
        let file = parse_ok(
            "package p\n\ntype AStyle struct {\n\t// Color of the border.\n\tColor string\n}\n",
        );
        let fields = struct_fields(&file);
        assert_eq!(fields[0].doc.as_deref(), Some("Color of the border."));
    }

    #[test]
    fn blank_line_detaches_doc() {
        let file = parse_ok("package p\n\ntype AStyle struct {\n\t// Orphan.\n\n\tColor string\n}\n");
        assert_eq!(struct_fields(&file)[0].doc, None);
    }

    #[test]
    fn trailing_comment_is_not_doc() {
        let file = parse_ok(
            "package p\n\ntype AStyle struct {\n\tBold bool // bold text\n\tColor string\n}\n",
        );
        let fields = struct_fields(&file);
        assert_eq!(fields[0].doc, None);
        assert_eq!(fields[1].doc, None);
    }

    #[test]
    fn comment_after_open_brace_is_not_doc() {
        let file = parse_ok("package p\n\ntype AStyle struct { // header\n\tColor string\n}\n");
        assert_eq!(struct_fields(&file)[0].doc, None);
    }

    #[test]
    fn multi_line_doc_group() {
        let file = parse_ok(
            "package p\n\ntype AStyle struct {\n\t// Unrelated.\n\n\t// Padding around\n\t// the content.\n\tPadding int\n}\n",
        );
        assert_eq!(
            struct_fields(&file)[0].doc.as_deref(),
            Some("Padding around\nthe content.")
        );
    }

    #[test]
    fn same_line_block_comment_is_not_doc() {
        let file = parse_ok("package p\n\ntype AStyle struct {\n\t/* c */ Color string\n}\n");
        assert_eq!(struct_fields(&file)[0].doc, None);
    }

    #[test]
    fn type_doc_attaches_to_ungrouped_spec() {
        let file = parse_ok("package p\n\n// AStyle styles things.\ntype AStyle struct{}\n");
        let spec = file.type_specs().next().expect("type spec");
        assert_eq!(spec.doc.as_deref(), Some("AStyle styles things."));
    }

    #[test]
    fn lex_errors_become_diagnostics() {
        let (_, diagnostics) = parse_source("package p\n\nvar s = \"open\n");
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].message, "string literal not terminated");
        assert!(diagnostics[0].is_error());
    }

    #[test]
    fn missing_package_clause_is_an_error() {
        let (_, diagnostics) = parse_source("type A struct{}\n");
        assert!(diagnostics.iter().any(Diagnostic::is_error));
        assert_eq!(
            diagnostics[0].message,
            "expected 'package' clause, found 'type'"
        );
    }

    #[test]
    fn empty_input_reports_missing_package() {
        let (file, diagnostics) = parse_source("");
        assert!(file.declarations.is_empty());
        assert_eq!(diagnostics[0].message, "expected 'package' clause, found EOF");
    }

    #[test]
    fn deep_nesting_is_rejected_without_overflow() {
        let source = format!("package p\n\ntype A {}int\n", "[]".repeat(1000));
        let (_, diagnostics) = parse_source(&source);
        assert!(
            diagnostics
                .iter()
                .any(|d| d.message.starts_with("type nesting is too deep"))
        );
    }

    #[test]
    fn declarations_kept_in_order() {
        let file = parse_ok(
            "package p\n\nfunc f() {}\n\ntype A struct{}\n\nvar x = 1\n\ntype B int\n",
        );
        let kinds: Vec<_> = file
            .declarations
            .iter()
            .map(|d| match d {
                Declaration::Type(spec) => format!("type {}", spec.name.name),
                Declaration::Func(func) => format!("func {}", func.name.name),
                Declaration::Value(value) => format!("value {}", value.names[0].name),
            })
            .collect();
        assert_eq!(kinds, ["func f", "type A", "value x", "type B"]);
    }
}
