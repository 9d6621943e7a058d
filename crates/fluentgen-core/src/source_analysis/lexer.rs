// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Lexical analysis for Go source code.
//!
//! Converts source text into a stream of [`Token`]s. The lexer is
//! hand-written so comments can be kept as trivia with exact positions;
//! field documentation is recovered from that trivia later.
//!
//! # Design Principles
//!
//! - **Error recovery**: never panic on malformed input; emit [`TokenKind::Error`]
//! - **Trivia preservation**: whitespace and comments stay attached to tokens
//! - **Semicolon insertion**: line ends produce `;` tokens following the Go rules
//!
//! # Example
//!
//! ```
//! use fluentgen_core::source_analysis::{Lexer, TokenKind};
//!
//! let kinds: Vec<_> = Lexer::new("Color string\n").map(|t| t.into_kind()).collect();
//! assert_eq!(kinds.len(), 3); // Color, string, inserted `;`
//! assert!(matches!(kinds[2], TokenKind::Semicolon { inserted: true }));
//! ```

use std::iter::Peekable;
use std::str::CharIndices;

use ecow::EcoString;

use super::{Keyword, Span, Token, TokenKind, Trivia};

/// Operators and punctuation, longest spellings first so a prefix scan
/// finds the longest match.
const OPERATORS: &[&str] = &[
    "...", "&^=", "<<=", ">>=", "&&", "||", "<-", "++", "--", "==", "!=", "<=", ">=", ":=",
    "+=", "-=", "*=", "/=", "%=", "&=", "|=", "^=", "<<", ">>", "&^", "+", "-", "*", "/", "%",
    "&", "|", "^", "<", ">", "=", "!", "(", ")", "[", "]", "{", "}", ",", ";", ".", ":", "~",
];

/// A lexer that tokenizes Go source code.
///
/// Implements [`Iterator`]; the iterator stops before the EOF token. Use
/// [`lex_with_eof`] when the parser needs the terminating EOF.
pub struct Lexer<'src> {
    /// The source text being lexed.
    source: &'src str,
    /// Character iterator with byte positions.
    chars: Peekable<CharIndices<'src>>,
    /// Current byte position in source.
    position: usize,
    /// Pending trivia to attach to the next token.
    pending_trivia: Vec<Trivia>,
    /// Whether a newline at this point terminates a statement.
    insert_semicolon: bool,
}

impl std::fmt::Debug for Lexer<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Lexer")
            .field("position", &self.position)
            .field("insert_semicolon", &self.insert_semicolon)
            .finish_non_exhaustive()
    }
}

impl<'src> Lexer<'src> {
    /// Creates a new lexer for the given source text.
    #[must_use]
    pub fn new(source: &'src str) -> Self {
        let mut lexer = Self {
            source,
            chars: source.char_indices().peekable(),
            position: 0,
            pending_trivia: Vec::new(),
            insert_semicolon: false,
        };
        if lexer.peek_char() == Some('\u{feff}') {
            lexer.advance();
        }
        lexer
    }

    fn peek_char(&mut self) -> Option<char> {
        self.chars.peek().map(|&(_, c)| c)
    }

    /// Peeks `n+1` characters ahead without consuming.
    fn peek_char_n(&self, n: usize) -> Option<char> {
        self.chars.clone().nth(n).map(|(_, c)| c)
    }

    fn advance(&mut self) -> Option<char> {
        let (pos, c) = self.chars.next()?;
        self.position = pos + c.len_utf8();
        Some(c)
    }

    fn advance_while(&mut self, predicate: impl Fn(char) -> bool) {
        while self.peek_char().is_some_and(&predicate) {
            self.advance();
        }
    }

    #[expect(
        clippy::cast_possible_truncation,
        reason = "source files over 4GB are not supported"
    )]
    fn current_position(&self) -> u32 {
        self.position as u32
    }

    fn span_from(&self, start: u32) -> Span {
        Span::new(start, self.current_position())
    }

    fn text_for(&self, span: Span) -> &'src str {
        &self.source[span.as_range()]
    }

    /// Skips whitespace and comments, collecting them as trivia.
    ///
    /// Returns a token when the trivia itself ends a statement (a newline,
    /// a multi-line block comment or EOF after a statement-ending token) or
    /// is malformed (an unterminated block comment).
    fn skip_trivia(&mut self) -> Option<Token> {
        loop {
            match self.peek_char() {
                Some('\n') if self.insert_semicolon => {
                    let start = self.current_position();
                    self.advance();
                    return Some(self.inserted_semicolon(self.span_from(start)));
                }
                Some(' ' | '\t' | '\r' | '\n') => {
                    let start = self.current_position();
                    if self.insert_semicolon {
                        self.advance_while(|c| matches!(c, ' ' | '\t' | '\r'));
                    } else {
                        self.advance_while(|c| matches!(c, ' ' | '\t' | '\r' | '\n'));
                    }
                    let text = self.text_for(self.span_from(start));
                    self.pending_trivia
                        .push(Trivia::Whitespace(EcoString::from(text)));
                }
                Some('/') if self.peek_char_n(1) == Some('/') => self.lex_line_comment(),
                Some('/') if self.peek_char_n(1) == Some('*') => {
                    let start = self.current_position();
                    if !self.lex_block_comment() {
                        let span = self.span_from(start);
                        return Some(Token::with_trivia(
                            TokenKind::Error(EcoString::from(self.text_for(span))),
                            span,
                            std::mem::take(&mut self.pending_trivia),
                            Vec::new(),
                        ));
                    }
                    let spans_lines = self.text_for(self.span_from(start)).contains('\n');
                    if self.insert_semicolon && spans_lines {
                        let end = self.current_position();
                        return Some(self.inserted_semicolon(Span::new(end, end)));
                    }
                }
                None if self.insert_semicolon => {
                    let end = self.current_position();
                    return Some(self.inserted_semicolon(Span::new(end, end)));
                }
                _ => return None,
            }
        }
    }

    fn inserted_semicolon(&mut self, span: Span) -> Token {
        self.insert_semicolon = false;
        Token::with_trivia(
            TokenKind::Semicolon { inserted: true },
            span,
            std::mem::take(&mut self.pending_trivia),
            Vec::new(),
        )
    }

    /// Lexes a line comment up to (not including) the newline.
    fn lex_line_comment(&mut self) {
        let start = self.current_position();
        self.advance_while(|c| c != '\n');
        let text = self.text_for(self.span_from(start));
        let text = text.strip_suffix('\r').unwrap_or(text);
        self.pending_trivia
            .push(Trivia::LineComment(EcoString::from(text)));
    }

    /// Lexes a block comment, returning `false` if it is unterminated.
    ///
    /// Unterminated comments are not pushed as trivia.
    fn lex_block_comment(&mut self) -> bool {
        let start = self.current_position();
        self.advance(); // /
        self.advance(); // *
        loop {
            match self.peek_char() {
                None => return false,
                Some('*') if self.peek_char_n(1) == Some('/') => {
                    self.advance();
                    self.advance();
                    break;
                }
                Some(_) => {
                    self.advance();
                }
            }
        }
        let text = self.text_for(self.span_from(start));
        self.pending_trivia
            .push(Trivia::BlockComment(EcoString::from(text)));
        true
    }

    /// Lexes the next token.
    fn lex_token(&mut self) -> Token {
        if let Some(token) = self.skip_trivia() {
            return token;
        }
        let leading_trivia = std::mem::take(&mut self.pending_trivia);

        let start = self.current_position();
        let kind = match self.peek_char() {
            None => TokenKind::Eof,
            Some(c) => self.lex_token_kind(c),
        };
        let span = self.span_from(start);
        self.insert_semicolon = kind.ends_statement();

        self.collect_trailing_trivia();
        let trailing_trivia = std::mem::take(&mut self.pending_trivia);

        Token::with_trivia(kind, span, leading_trivia, trailing_trivia)
    }

    /// Collects same-line whitespace and comments after a token.
    ///
    /// A block comment that spans lines is left for [`Self::skip_trivia`],
    /// where it may end the statement.
    fn collect_trailing_trivia(&mut self) {
        loop {
            match self.peek_char() {
                Some(' ' | '\t' | '\r') => {
                    let start = self.current_position();
                    self.advance_while(|c| matches!(c, ' ' | '\t' | '\r'));
                    let text = self.text_for(self.span_from(start));
                    self.pending_trivia
                        .push(Trivia::Whitespace(EcoString::from(text)));
                }
                Some('/') if self.peek_char_n(1) == Some('/') => {
                    self.lex_line_comment();
                    break;
                }
                Some('/') if self.peek_char_n(1) == Some('*') => {
                    let rest = &self.source[self.position..];
                    let single_line = rest
                        .find("*/")
                        .is_some_and(|end| !rest[..end].contains('\n'));
                    if !single_line || !self.lex_block_comment() {
                        break;
                    }
                }
                _ => break,
            }
        }
    }

    /// Lexes a token kind based on the first character.
    fn lex_token_kind(&mut self, c: char) -> TokenKind {
        match c {
            c if c == '_' || c.is_alphabetic() => self.lex_identifier_or_keyword(),
            '0'..='9' => self.lex_number(),
            '.' if self.peek_char_n(1).is_some_and(|c| c.is_ascii_digit()) => self.lex_number(),
            '"' => self.lex_quoted('"', TokenKind::String),
            '\'' => self.lex_quoted('\'', TokenKind::Rune),
            '`' => self.lex_raw_string(),
            _ => self.lex_operator(),
        }
    }

    fn lex_identifier_or_keyword(&mut self) -> TokenKind {
        let start = self.current_position();
        self.advance_while(|c| c == '_' || c.is_alphanumeric());
        let text = self.text_for(self.span_from(start));
        match Keyword::from_ident(text) {
            Some(keyword) => TokenKind::Keyword(keyword),
            None => TokenKind::Identifier(EcoString::from(text)),
        }
    }

    /// Lexes integer, float and imaginary literals in every Go base.
    ///
    /// Validation is lenient: digit separators and digits out of range for
    /// the base are accepted, since literals only ever appear here as array
    /// lengths that are reproduced verbatim.
    fn lex_number(&mut self) -> TokenKind {
        let start = self.current_position();
        let mut is_float = false;

        let prefix = self.peek_char_n(1).filter(|c| "xXbBoO".contains(*c));
        if self.peek_char() == Some('0') && prefix.is_some() {
            let hex = matches!(prefix, Some('x' | 'X'));
            self.advance();
            self.advance();
            self.advance_while(|c| c.is_ascii_hexdigit() || c == '_');
            if hex && self.peek_char() == Some('.') {
                self.advance();
                self.advance_while(|c| c.is_ascii_hexdigit() || c == '_');
                is_float = true;
            }
            if hex && matches!(self.peek_char(), Some('p' | 'P')) {
                is_float = true;
                self.lex_exponent();
            }
        } else {
            self.advance_while(|c| c.is_ascii_digit() || c == '_');
            if self.peek_char() == Some('.') && self.peek_char_n(1) != Some('.') {
                self.advance();
                self.advance_while(|c| c.is_ascii_digit() || c == '_');
                is_float = true;
            }
            if matches!(self.peek_char(), Some('e' | 'E')) {
                is_float = true;
                self.lex_exponent();
            }
        }

        let imaginary = self.peek_char() == Some('i');
        if imaginary {
            self.advance();
        }
        let text = EcoString::from(self.text_for(self.span_from(start)));
        if imaginary {
            TokenKind::Imaginary(text)
        } else if is_float {
            TokenKind::Float(text)
        } else {
            TokenKind::Int(text)
        }
    }

    fn lex_exponent(&mut self) {
        self.advance(); // e, E, p or P
        if matches!(self.peek_char(), Some('+' | '-')) {
            self.advance();
        }
        self.advance_while(|c| c.is_ascii_digit() || c == '_');
    }

    /// Lexes an interpreted string or rune literal.
    ///
    /// A newline or EOF before the closing quote yields an error token.
    fn lex_quoted(&mut self, quote: char, make: fn(EcoString) -> TokenKind) -> TokenKind {
        let start = self.current_position();
        self.advance(); // opening quote
        loop {
            match self.peek_char() {
                None | Some('\n') => {
                    return TokenKind::Error(EcoString::from(
                        self.text_for(self.span_from(start)),
                    ));
                }
                Some('\\') => {
                    self.advance();
                    if self.peek_char().is_some_and(|c| c != '\n') {
                        self.advance();
                    }
                }
                Some(c) if c == quote => {
                    self.advance();
                    break;
                }
                Some(_) => {
                    self.advance();
                }
            }
        }
        make(EcoString::from(self.text_for(self.span_from(start))))
    }

    fn lex_raw_string(&mut self) -> TokenKind {
        let start = self.current_position();
        self.advance(); // opening backquote
        self.advance_while(|c| c != '`');
        if self.advance().is_none() {
            return TokenKind::Error(EcoString::from(self.text_for(self.span_from(start))));
        }
        TokenKind::RawString(EcoString::from(self.text_for(self.span_from(start))))
    }

    fn lex_operator(&mut self) -> TokenKind {
        let rest = &self.source[self.position..];
        let Some(op) = OPERATORS.iter().find(|op| rest.starts_with(**op)) else {
            let start = self.current_position();
            self.advance();
            return TokenKind::Error(EcoString::from(self.text_for(self.span_from(start))));
        };
        for _ in 0..op.len() {
            self.advance();
        }
        match *op {
            "(" => TokenKind::LeftParen,
            ")" => TokenKind::RightParen,
            "[" => TokenKind::LeftBracket,
            "]" => TokenKind::RightBracket,
            "{" => TokenKind::LeftBrace,
            "}" => TokenKind::RightBrace,
            "," => TokenKind::Comma,
            "." => TokenKind::Period,
            "..." => TokenKind::Ellipsis,
            ";" => TokenKind::Semicolon { inserted: false },
            "*" => TokenKind::Star,
            "<-" => TokenKind::Arrow,
            "~" => TokenKind::Tilde,
            "|" => TokenKind::Pipe,
            "=" => TokenKind::Assign,
            ":" => TokenKind::Colon,
            other => TokenKind::Operator(EcoString::from(other)),
        }
    }
}

impl Iterator for Lexer<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Self::Item> {
        let token = self.lex_token();
        if token.kind().is_eof() {
            None
        } else {
            Some(token)
        }
    }
}

/// Lexes source into a vector of tokens (excluding EOF).
#[must_use]
pub fn lex(source: &str) -> Vec<Token> {
    Lexer::new(source).collect()
}

/// Lexes source into a vector of tokens terminated by EOF.
#[must_use]
pub fn lex_with_eof(source: &str) -> Vec<Token> {
    let mut lexer = Lexer::new(source);
    let mut tokens = Vec::new();
    loop {
        let token = lexer.lex_token();
        let is_eof = token.kind().is_eof();
        tokens.push(token);
        if is_eof {
            break;
        }
    }
    tokens
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lex_kinds(source: &str) -> Vec<TokenKind> {
        lex(source).into_iter().map(Token::into_kind).collect()
    }

    fn ident(name: &str) -> TokenKind {
        TokenKind::Identifier(name.into())
    }

    const SEMI: TokenKind = TokenKind::Semicolon { inserted: true };

    #[test]
    fn lex_empty_and_trivia_only() {
        assert!(lex("").is_empty());
        assert!(lex("  \n\t").is_empty());
        assert!(lex("// comment").is_empty());
        assert!(lex("/* block */").is_empty());
    }

    #[test]
    fn lex_package_clause_inserts_semicolon() {
        assert_eq!(
            lex_kinds("package widgets\n"),
            vec![TokenKind::Keyword(Keyword::Package), ident("widgets"), SEMI]
        );
    }

    #[test]
    fn lex_semicolon_at_eof() {
        assert_eq!(lex_kinds("x"), vec![ident("x"), SEMI]);
    }

    #[test]
    fn lex_no_semicolon_after_open_brace() {
        assert_eq!(
            lex_kinds("struct {\n}"),
            vec![
                TokenKind::Keyword(Keyword::Struct),
                TokenKind::LeftBrace,
                TokenKind::RightBrace,
                SEMI,
            ]
        );
    }

    #[test]
    fn lex_struct_field_line() {
        assert_eq!(
            lex_kinds("Border *lipgloss.Border\n"),
            vec![
                ident("Border"),
                TokenKind::Star,
                ident("lipgloss"),
                TokenKind::Period,
                ident("Border"),
                SEMI,
            ]
        );
    }

    #[test]
    fn lex_unicode_identifier() {
        assert_eq!(lex_kinds("Größe"), vec![ident("Größe"), SEMI]);
    }

    #[test]
    fn lex_numbers() {
        assert_eq!(
            lex_kinds("42 0x1F 1_000 3.14 1e9 .5 0x1p-2 2i 0b101 0o17"),
            vec![
                TokenKind::Int("42".into()),
                TokenKind::Int("0x1F".into()),
                TokenKind::Int("1_000".into()),
                TokenKind::Float("3.14".into()),
                TokenKind::Float("1e9".into()),
                TokenKind::Float(".5".into()),
                TokenKind::Float("0x1p-2".into()),
                TokenKind::Imaginary("2i".into()),
                TokenKind::Int("0b101".into()),
                TokenKind::Int("0o17".into()),
                SEMI,
            ]
        );
    }

    #[test]
    fn lex_strings_keep_source_text() {
        assert_eq!(
            lex_kinds(r#""a\"b" `json:"x"` 'c'"#),
            vec![
                TokenKind::String(r#""a\"b""#.into()),
                TokenKind::RawString("`json:\"x\"`".into()),
                TokenKind::Rune("'c'".into()),
                SEMI,
            ]
        );
    }

    #[test]
    fn lex_raw_string_spans_lines() {
        let kinds = lex_kinds("`a\nb`");
        assert_eq!(kinds[0], TokenKind::RawString("`a\nb`".into()));
    }

    #[test]
    fn lex_unterminated_string_is_error() {
        let kinds = lex_kinds("\"abc\nx");
        assert_eq!(kinds[0], TokenKind::Error("\"abc".into()));
    }

    #[test]
    fn lex_unterminated_raw_string_is_error() {
        assert_eq!(lex_kinds("`abc")[0], TokenKind::Error("`abc".into()));
    }

    #[test]
    fn lex_unterminated_block_comment_is_error() {
        assert_eq!(lex_kinds("/* open"), vec![TokenKind::Error("/* open".into())]);
    }

    #[test]
    fn lex_unexpected_character() {
        assert_eq!(lex_kinds("@")[0], TokenKind::Error("@".into()));
    }

    #[test]
    fn lex_operators_longest_match() {
        assert_eq!(
            lex_kinds("<-chan ... := &^= ~ | ="),
            vec![
                TokenKind::Arrow,
                TokenKind::Keyword(Keyword::Chan),
                TokenKind::Ellipsis,
                TokenKind::Operator(":=".into()),
                TokenKind::Operator("&^=".into()),
                TokenKind::Tilde,
                TokenKind::Pipe,
                TokenKind::Assign,
            ]
        );
    }

    #[test]
    fn lex_increment_ends_statement() {
        assert_eq!(
            lex_kinds("i++\n"),
            vec![ident("i"), TokenKind::Operator("++".into()), SEMI]
        );
    }

    #[test]
    fn lex_trailing_line_comment_stays_on_its_token() {
        let tokens = lex("Color string // the color\nSize int");
        assert_eq!(tokens[1].kind(), &ident("string"));
        assert!(tokens[1].has_trailing_comment());
        assert!(tokens[2].kind().is_semicolon());
        assert!(tokens[3].leading_trivia().is_empty());
    }

    #[test]
    fn lex_leading_comment_attaches_to_next_line() {
        let tokens = lex("{\n\t// Color of the border.\n\tColor string\n}");
        let color = &tokens[1];
        assert_eq!(color.kind(), &ident("Color"));
        assert!(
            color
                .leading_trivia()
                .iter()
                .any(|t| t.as_str() == "// Color of the border.")
        );
    }

    #[test]
    fn lex_comment_after_open_brace_is_trailing() {
        let tokens = lex("struct { // note\n\tColor string\n}");
        assert!(tokens[1].has_trailing_comment());
        assert!(!tokens[2].leading_trivia().iter().any(Trivia::is_comment));
    }

    #[test]
    fn lex_multiline_block_comment_ends_statement() {
        let kinds = lex_kinds("x /* a\nb */ y");
        assert_eq!(kinds, vec![ident("x"), SEMI, ident("y"), SEMI]);
    }

    #[test]
    fn lex_single_line_block_comment_does_not_end_statement() {
        let kinds = lex_kinds("x /* a */ y");
        assert_eq!(kinds, vec![ident("x"), ident("y"), SEMI]);
    }

    #[test]
    fn lex_spans_are_byte_offsets() {
        let tokens = lex("type A struct{}");
        assert_eq!(tokens[0].span(), Span::new(0, 4));
        assert_eq!(tokens[1].span(), Span::new(5, 6));
        assert_eq!(tokens[2].span(), Span::new(7, 13));
    }

    #[test]
    fn lex_with_eof_terminates() {
        let tokens = lex_with_eof("x");
        assert_eq!(tokens.len(), 3);
        assert!(tokens[2].kind().is_eof());
    }

    #[test]
    fn lex_skips_byte_order_mark() {
        assert_eq!(lex_kinds("\u{feff}x"), vec![ident("x"), SEMI]);
    }
}
