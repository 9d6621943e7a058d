// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Token types for Go lexical analysis.
//!
//! Each [`Token`] pairs a [`TokenKind`] with its [`Span`] and the
//! [`Trivia`] (whitespace and comments) around it. Comments are trivia,
//! never tokens: the parser reads them back from the trivia lists when it
//! needs doc comments.
//!
//! Literal tokens keep their exact source text (quotes and prefixes
//! included) so struct tags and array lengths can be reproduced verbatim.

use ecow::EcoString;

use super::Span;

/// Go's reserved words.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Keyword {
    Break,
    Case,
    Chan,
    Const,
    Continue,
    Default,
    Defer,
    Else,
    Fallthrough,
    For,
    Func,
    Go,
    Goto,
    If,
    Import,
    Interface,
    Map,
    Package,
    Range,
    Return,
    Select,
    Struct,
    Switch,
    Type,
    Var,
}

impl Keyword {
    /// Looks up the keyword spelled by `ident`, if any.
    #[must_use]
    pub fn from_ident(ident: &str) -> Option<Self> {
        let keyword = match ident {
            "break" => Self::Break,
            "case" => Self::Case,
            "chan" => Self::Chan,
            "const" => Self::Const,
            "continue" => Self::Continue,
            "default" => Self::Default,
            "defer" => Self::Defer,
            "else" => Self::Else,
            "fallthrough" => Self::Fallthrough,
            "for" => Self::For,
            "func" => Self::Func,
            "go" => Self::Go,
            "goto" => Self::Goto,
            "if" => Self::If,
            "import" => Self::Import,
            "interface" => Self::Interface,
            "map" => Self::Map,
            "package" => Self::Package,
            "range" => Self::Range,
            "return" => Self::Return,
            "select" => Self::Select,
            "struct" => Self::Struct,
            "switch" => Self::Switch,
            "type" => Self::Type,
            "var" => Self::Var,
            _ => return None,
        };
        Some(keyword)
    }

    /// Returns the keyword's spelling.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Break => "break",
            Self::Case => "case",
            Self::Chan => "chan",
            Self::Const => "const",
            Self::Continue => "continue",
            Self::Default => "default",
            Self::Defer => "defer",
            Self::Else => "else",
            Self::Fallthrough => "fallthrough",
            Self::For => "for",
            Self::Func => "func",
            Self::Go => "go",
            Self::Goto => "goto",
            Self::If => "if",
            Self::Import => "import",
            Self::Interface => "interface",
            Self::Map => "map",
            Self::Package => "package",
            Self::Range => "range",
            Self::Return => "return",
            Self::Select => "select",
            Self::Struct => "struct",
            Self::Switch => "switch",
            Self::Type => "type",
            Self::Var => "var",
        }
    }
}

/// Returns `true` if `ident` is a Go keyword.
///
/// ```
/// use fluentgen_core::source_analysis::is_keyword;
///
/// assert!(is_keyword("func"));
/// assert!(!is_keyword("style"));
/// ```
#[must_use]
pub fn is_keyword(ident: &str) -> bool {
    Keyword::from_ident(ident).is_some()
}

/// The kind of token, not including source location or trivia.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // === Names ===
    /// An identifier: `Color`, `style`, `_`
    Identifier(EcoString),
    /// A reserved word.
    Keyword(Keyword),

    // === Literals (source text preserved) ===
    /// An integer literal: `42`, `0x1F`, `1_000`
    Int(EcoString),
    /// A floating-point literal: `3.14`, `1e9`, `0x1p-2`
    Float(EcoString),
    /// An imaginary literal: `2i`
    Imaginary(EcoString),
    /// A rune literal: `'a'`, `'\n'`
    Rune(EcoString),
    /// An interpreted string literal including quotes: `"json:\"x\""`
    String(EcoString),
    /// A raw string literal including backquotes: `` `json:"x"` ``
    RawString(EcoString),

    // === Delimiters ===
    /// `(`
    LeftParen,
    /// `)`
    RightParen,
    /// `[`
    LeftBracket,
    /// `]`
    RightBracket,
    /// `{`
    LeftBrace,
    /// `}`
    RightBrace,

    // === Punctuation the type grammar needs ===
    /// `,`
    Comma,
    /// `.`
    Period,
    /// `...`
    Ellipsis,
    /// `;`, either written or inserted at a line end.
    Semicolon {
        /// `true` when produced by automatic semicolon insertion.
        inserted: bool,
    },
    /// `*`
    Star,
    /// `<-`
    Arrow,
    /// `~`
    Tilde,
    /// `|`
    Pipe,
    /// `=`
    Assign,
    /// `:`
    Colon,
    /// Any other operator: `+`, `:=`, `&&`, `<<=`, ...
    Operator(EcoString),

    // === Special ===
    /// End of file
    Eof,
    /// Invalid input, preserved for error recovery.
    Error(EcoString),
}

impl TokenKind {
    /// Returns `true` if this is the end-of-file marker.
    #[must_use]
    pub const fn is_eof(&self) -> bool {
        matches!(self, Self::Eof)
    }

    /// Returns `true` if this is an error token.
    #[must_use]
    pub const fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }

    /// Returns `true` for `;`, whether written or inserted.
    #[must_use]
    pub const fn is_semicolon(&self) -> bool {
        matches!(self, Self::Semicolon { .. })
    }

    /// Returns `true` if a newline after this token inserts a semicolon.
    #[must_use]
    pub fn ends_statement(&self) -> bool {
        match self {
            Self::Identifier(_)
            | Self::Int(_)
            | Self::Float(_)
            | Self::Imaginary(_)
            | Self::Rune(_)
            | Self::String(_)
            | Self::RawString(_)
            | Self::RightParen
            | Self::RightBracket
            | Self::RightBrace => true,
            Self::Keyword(keyword) => matches!(
                keyword,
                Keyword::Break | Keyword::Continue | Keyword::Fallthrough | Keyword::Return
            ),
            Self::Operator(op) => op == "++" || op == "--",
            _ => false,
        }
    }

    /// Returns `true` if this token can begin a type expression.
    #[must_use]
    pub const fn starts_type(&self) -> bool {
        matches!(
            self,
            Self::Identifier(_)
                | Self::Star
                | Self::LeftBracket
                | Self::LeftParen
                | Self::Arrow
                | Self::Keyword(
                    Keyword::Map
                        | Keyword::Chan
                        | Keyword::Func
                        | Keyword::Struct
                        | Keyword::Interface
                )
        )
    }

    /// Returns the identifier text if this is an identifier.
    #[must_use]
    pub fn as_identifier(&self) -> Option<&EcoString> {
        match self {
            Self::Identifier(name) => Some(name),
            _ => None,
        }
    }
}

impl std::fmt::Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Identifier(s)
            | Self::Int(s)
            | Self::Float(s)
            | Self::Imaginary(s)
            | Self::Rune(s)
            | Self::String(s)
            | Self::RawString(s)
            | Self::Operator(s) => write!(f, "{s}"),
            Self::Keyword(keyword) => write!(f, "{}", keyword.as_str()),
            Self::Error(s) => write!(f, "<error: {s}>"),
            Self::LeftParen => write!(f, "("),
            Self::RightParen => write!(f, ")"),
            Self::LeftBracket => write!(f, "["),
            Self::RightBracket => write!(f, "]"),
            Self::LeftBrace => write!(f, "{{"),
            Self::RightBrace => write!(f, "}}"),
            Self::Comma => write!(f, ","),
            Self::Period => write!(f, "."),
            Self::Ellipsis => write!(f, "..."),
            Self::Semicolon { inserted: true } => write!(f, "newline"),
            Self::Semicolon { inserted: false } => write!(f, ";"),
            Self::Star => write!(f, "*"),
            Self::Arrow => write!(f, "<-"),
            Self::Tilde => write!(f, "~"),
            Self::Pipe => write!(f, "|"),
            Self::Assign => write!(f, "="),
            Self::Colon => write!(f, ":"),
            Self::Eof => write!(f, "EOF"),
        }
    }
}

/// Non-semantic source text: whitespace and comments.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Trivia {
    /// Whitespace (spaces, tabs, newlines)
    Whitespace(EcoString),
    /// A line comment including its marker: `// text`
    LineComment(EcoString),
    /// A block comment including its markers: `/* text */`
    BlockComment(EcoString),
}

impl Trivia {
    /// Returns the text content of this trivia.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Whitespace(s) | Self::LineComment(s) | Self::BlockComment(s) => s,
        }
    }

    /// Number of newlines in this trivia.
    #[must_use]
    pub fn newlines(&self) -> usize {
        self.as_str().matches('\n').count()
    }

    /// Returns `true` if this is a comment.
    #[must_use]
    pub const fn is_comment(&self) -> bool {
        matches!(self, Self::LineComment(_) | Self::BlockComment(_))
    }
}

/// A token with its source location and surrounding trivia.
///
/// Leading trivia is everything between the previous token's trailing
/// trivia and this token. Trailing trivia is same-line whitespace and at
/// most one comment after the token.
///
/// ```
/// use fluentgen_core::source_analysis::{Span, Token, TokenKind};
///
/// let token = Token::new(TokenKind::Identifier("Color".into()), Span::new(0, 5));
/// assert_eq!(token.span().len(), 5);
/// assert!(token.leading_trivia().is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    kind: TokenKind,
    span: Span,
    leading_trivia: Vec<Trivia>,
    trailing_trivia: Vec<Trivia>,
}

impl Token {
    /// Creates a new token with no trivia.
    #[must_use]
    pub fn new(kind: TokenKind, span: Span) -> Self {
        Self::with_trivia(kind, span, Vec::new(), Vec::new())
    }

    /// Creates a new token with trivia.
    #[must_use]
    pub fn with_trivia(
        kind: TokenKind,
        span: Span,
        leading_trivia: Vec<Trivia>,
        trailing_trivia: Vec<Trivia>,
    ) -> Self {
        Self {
            kind,
            span,
            leading_trivia,
            trailing_trivia,
        }
    }

    /// Returns the kind of this token.
    #[must_use]
    pub fn kind(&self) -> &TokenKind {
        &self.kind
    }

    /// Consumes the token and returns its kind.
    #[must_use]
    pub fn into_kind(self) -> TokenKind {
        self.kind
    }

    /// Returns the source span of this token (excluding trivia).
    #[must_use]
    pub fn span(&self) -> Span {
        self.span
    }

    /// Returns the trivia that precedes this token.
    #[must_use]
    pub fn leading_trivia(&self) -> &[Trivia] {
        &self.leading_trivia
    }

    /// Returns the trivia that follows this token on the same line.
    #[must_use]
    pub fn trailing_trivia(&self) -> &[Trivia] {
        &self.trailing_trivia
    }

    /// Returns `true` if this token has a same-line trailing comment.
    #[must_use]
    pub fn has_trailing_comment(&self) -> bool {
        self.trailing_trivia.iter().any(Trivia::is_comment)
    }
}
