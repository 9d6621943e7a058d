// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Type expression parsing.
//!
//! Covers the full Go type grammar: names, qualified names, generic
//! instantiations, pointers, slices, arrays, maps, channels, function
//! signatures, struct and interface literals.
//!
//! Go's grammar is ambiguous around `[`: `a []int` (a name, then a slice),
//! `List[int]` (an instantiation) and `A [3]int` (a field, then an array)
//! all start with an identifier followed by `[`. The parser looks past the
//! matching `]`: if a type follows, the brackets belong to an array or
//! slice; otherwise they are type arguments.

use ecow::EcoString;

use crate::ast::{
    ChanDir, FieldDecl, Identifier, InterfaceElem, InterfaceType, Param, Signature, StructType,
    TypeExpr, UnionTerm,
};
use crate::source_analysis::{Diagnostic, Keyword, TokenKind};

use super::Parser;

/// One parsed entry of a parameter list before names are assigned.
struct ParamEntry {
    first: TypeExpr,
    /// The type when `first` turned out to be a parameter name.
    ty: Option<TypeExpr>,
    variadic: bool,
}

impl Parser {
    /// Parses a type expression.
    pub(super) fn parse_type(&mut self) -> Option<TypeExpr> {
        if !self.enter_nesting() {
            return None;
        }
        let ty = self.parse_type_inner();
        self.leave_nesting();
        ty
    }

    fn parse_type_inner(&mut self) -> Option<TypeExpr> {
        let start = self.current_token().span();
        match self.current_kind() {
            TokenKind::Identifier(_) => self.parse_type_name(),
            TokenKind::Star => {
                self.advance();
                let elem = self.parse_type()?;
                Some(TypeExpr::Pointer {
                    elem: Box::new(elem),
                    span: self.span_from(start),
                })
            }
            TokenKind::LeftBracket => self.parse_array_or_slice(),
            TokenKind::Keyword(Keyword::Map) => self.parse_map_type(),
            TokenKind::Keyword(Keyword::Chan) | TokenKind::Arrow => self.parse_chan_type(),
            TokenKind::Keyword(Keyword::Func) => {
                self.advance();
                let signature = self.parse_signature()?;
                Some(TypeExpr::Func {
                    signature,
                    span: self.span_from(start),
                })
            }
            TokenKind::Keyword(Keyword::Struct) => self.parse_struct_type().map(TypeExpr::Struct),
            TokenKind::Keyword(Keyword::Interface) => {
                self.parse_interface_type().map(TypeExpr::Interface)
            }
            TokenKind::LeftParen => {
                self.advance();
                let inner = self.parse_type()?;
                self.expect(&TokenKind::RightParen, "')'")?;
                Some(TypeExpr::Paren {
                    inner: Box::new(inner),
                    span: self.span_from(start),
                })
            }
            _ => {
                self.error(format!("expected type, found {}", self.describe_current()));
                None
            }
        }
    }

    /// Parses `Name`, `pkg.Name`, and either followed by type arguments.
    fn parse_type_name(&mut self) -> Option<TypeExpr> {
        let first = self.expect_identifier("type name")?;
        let base = if self.match_token(&TokenKind::Period) {
            let name = self.expect_identifier("name after '.'")?;
            TypeExpr::Qualified {
                package: first,
                name,
            }
        } else {
            TypeExpr::Name(first)
        };

        if self.check(&TokenKind::LeftBracket) && self.brackets_are_type_args(0) {
            let start = base.span();
            self.advance();
            let args = self.parse_type_list(&TokenKind::RightBracket)?;
            self.expect(&TokenKind::RightBracket, "']'")?;
            if args.is_empty() {
                self.diagnostics.push(Diagnostic::error(
                    "expected type argument list",
                    self.span_from(start),
                ));
                return None;
            }
            return Some(TypeExpr::Generic {
                base: Box::new(base),
                args,
                span: self.span_from(start),
            });
        }
        Some(base)
    }

    /// Returns `true` if the `[` at `offset` opens type arguments.
    pub(super) fn brackets_are_type_args(&self, offset: usize) -> bool {
        if matches!(self.peek_at(offset + 1), Some(TokenKind::RightBracket)) {
            return false;
        }
        let Some(close) = self.matching_close(offset) else {
            return false;
        };
        !self
            .peek_at(close + 1)
            .is_some_and(TokenKind::starts_type)
    }

    /// Finds the offset of the delimiter closing the one at `offset`.
    fn matching_close(&self, offset: usize) -> Option<usize> {
        let mut depth = 0usize;
        let mut at = offset;
        loop {
            match self.peek_at(at)? {
                TokenKind::LeftParen | TokenKind::LeftBracket | TokenKind::LeftBrace => depth += 1,
                TokenKind::RightParen | TokenKind::RightBracket | TokenKind::RightBrace => {
                    depth = depth.checked_sub(1)?;
                    if depth == 0 {
                        return Some(at);
                    }
                }
                TokenKind::Eof => return None,
                _ => {}
            }
            at += 1;
        }
    }

    /// Parses a comma-separated list of types up to `close`.
    fn parse_type_list(&mut self, close: &TokenKind) -> Option<Vec<TypeExpr>> {
        let mut types = Vec::new();
        while !self.check(close) && !self.is_at_end() {
            types.push(self.parse_type()?);
            if !self.match_token(&TokenKind::Comma) {
                break;
            }
        }
        Some(types)
    }

    fn parse_array_or_slice(&mut self) -> Option<TypeExpr> {
        let start = self.advance().span(); // [
        if self.match_token(&TokenKind::RightBracket) {
            let elem = self.parse_type()?;
            return Some(TypeExpr::Slice {
                elem: Box::new(elem),
                span: self.span_from(start),
            });
        }
        let len = self.parse_array_length()?;
        self.expect(&TokenKind::RightBracket, "']'")?;
        let elem = self.parse_type()?;
        Some(TypeExpr::Array {
            len,
            elem: Box::new(elem),
            span: self.span_from(start),
        })
    }

    /// Collects the source text of an array length expression.
    fn parse_array_length(&mut self) -> Option<EcoString> {
        let mut text = EcoString::new();
        let mut depth = 0usize;
        loop {
            match self.current_kind() {
                TokenKind::RightBracket if depth == 0 => break,
                TokenKind::Eof | TokenKind::Semicolon { .. } => {
                    self.error(format!(
                        "expected ']' after array length, found {}",
                        self.describe_current()
                    ));
                    return None;
                }
                TokenKind::LeftParen | TokenKind::LeftBracket | TokenKind::LeftBrace => {
                    depth += 1;
                }
                TokenKind::RightParen | TokenKind::RightBracket | TokenKind::RightBrace => {
                    if depth == 0 {
                        self.error(format!(
                            "unexpected {} in array length",
                            self.describe_current()
                        ));
                        return None;
                    }
                    depth -= 1;
                }
                _ => {}
            }
            text.push_str(&self.advance().kind().to_string());
        }
        Some(text)
    }

    fn parse_map_type(&mut self) -> Option<TypeExpr> {
        let start = self.advance().span(); // map
        self.expect(&TokenKind::LeftBracket, "'['")?;
        let key = self.parse_type()?;
        self.expect(&TokenKind::RightBracket, "']'")?;
        let value = self.parse_type()?;
        Some(TypeExpr::Map {
            key: Box::new(key),
            value: Box::new(value),
            span: self.span_from(start),
        })
    }

    fn parse_chan_type(&mut self) -> Option<TypeExpr> {
        let start = self.current_token().span();
        let dir = if self.match_token(&TokenKind::Arrow) {
            if !self.match_keyword(Keyword::Chan) {
                self.error(format!("expected 'chan', found {}", self.describe_current()));
                return None;
            }
            ChanDir::Recv
        } else {
            self.advance(); // chan
            if self.match_token(&TokenKind::Arrow) {
                ChanDir::Send
            } else {
                ChanDir::Both
            }
        };
        let elem = self.parse_type()?;
        Some(TypeExpr::Chan {
            dir,
            elem: Box::new(elem),
            span: self.span_from(start),
        })
    }

    // ========================================================================
    // Signatures
    // ========================================================================

    /// Parses `(params) results`.
    pub(super) fn parse_signature(&mut self) -> Option<Signature> {
        let params = self.parse_parameters()?;
        let results = if self.check(&TokenKind::LeftParen) {
            self.parse_parameters()?
        } else if self.current_kind().starts_type() {
            let ty = self.parse_type()?;
            vec![Param {
                name: None,
                ty,
                variadic: false,
            }]
        } else {
            Vec::new()
        };
        Some(Signature { params, results })
    }

    /// Parses a parenthesized parameter list.
    pub(super) fn parse_parameters(&mut self) -> Option<Vec<Param>> {
        self.expect(&TokenKind::LeftParen, "'('")?;
        let params = self.parse_parameter_list(&TokenKind::RightParen, false)?;
        self.expect(&TokenKind::RightParen, "')'")?;
        Some(params)
    }

    /// Parses the entries of a parameter or type parameter list up to
    /// `close` (not consumed).
    ///
    /// Entries are either all types (`int, string`) or all named
    /// (`a, b int, c string`); in the named form a bare name takes the type
    /// of the next typed entry.
    pub(super) fn parse_parameter_list(
        &mut self,
        close: &TokenKind,
        type_params: bool,
    ) -> Option<Vec<Param>> {
        let mut entries = Vec::new();
        while !self.check(close) && !self.is_at_end() {
            if self.match_token(&TokenKind::Ellipsis) {
                let ty = self.parse_type()?;
                entries.push(ParamEntry {
                    first: ty,
                    ty: None,
                    variadic: true,
                });
            } else {
                let first = self.parse_param_type(type_params)?;
                let named = matches!(first, TypeExpr::Name(_))
                    && (self.current_kind().starts_type()
                        || self.check(&TokenKind::Ellipsis)
                        || (type_params && self.check(&TokenKind::Tilde)));
                if named {
                    let variadic = self.match_token(&TokenKind::Ellipsis);
                    let ty = self.parse_param_type(type_params)?;
                    entries.push(ParamEntry {
                        first,
                        ty: Some(ty),
                        variadic,
                    });
                } else {
                    entries.push(ParamEntry {
                        first,
                        ty: None,
                        variadic: false,
                    });
                }
            }
            if !self.match_token(&TokenKind::Comma) {
                break;
            }
        }
        self.assign_parameter_names(entries)
    }

    fn parse_param_type(&mut self, type_params: bool) -> Option<TypeExpr> {
        if type_params {
            self.parse_constraint()
        } else {
            self.parse_type()
        }
    }

    fn assign_parameter_names(&mut self, entries: Vec<ParamEntry>) -> Option<Vec<Param>> {
        if entries.iter().all(|entry| entry.ty.is_none()) {
            return Some(
                entries
                    .into_iter()
                    .map(|entry| Param {
                        name: None,
                        ty: entry.first,
                        variadic: entry.variadic,
                    })
                    .collect(),
            );
        }

        let mut params = Vec::with_capacity(entries.len());
        let mut pending: Vec<Identifier> = Vec::new();
        for entry in entries {
            match (entry.first, entry.ty) {
                (TypeExpr::Name(name), Some(ty)) => {
                    pending.push(name);
                    params.extend(pending.drain(..).map(|name| Param {
                        name: Some(name),
                        ty: ty.clone(),
                        variadic: entry.variadic,
                    }));
                }
                (TypeExpr::Name(name), None) if !entry.variadic => pending.push(name),
                (other, _) => {
                    self.diagnostics.push(Diagnostic::error(
                        "mixed named and unnamed parameters",
                        other.span(),
                    ));
                    return None;
                }
            }
        }
        if let Some(name) = pending.first() {
            self.diagnostics.push(Diagnostic::error(
                "mixed named and unnamed parameters",
                name.span,
            ));
            return None;
        }
        Some(params)
    }

    /// Parses a type constraint: a type or a union of `~`-terms.
    ///
    /// A union is wrapped in an implicit interface.
    fn parse_constraint(&mut self) -> Option<TypeExpr> {
        let start = self.current_token().span();
        let mut terms = self.parse_union_terms()?;
        if terms.len() == 1 && !terms[0].tilde {
            return terms.pop().map(|term| term.ty);
        }
        let span = self.span_from(start);
        Some(TypeExpr::Interface(InterfaceType {
            elements: vec![InterfaceElem::Union(terms)],
            span,
        }))
    }

    fn parse_union_terms(&mut self) -> Option<Vec<UnionTerm>> {
        let mut terms = Vec::new();
        loop {
            let tilde = self.match_token(&TokenKind::Tilde);
            let ty = self.parse_type()?;
            terms.push(UnionTerm { tilde, ty });
            if !self.match_token(&TokenKind::Pipe) {
                break;
            }
        }
        Some(terms)
    }

    // ========================================================================
    // Struct and interface literals
    // ========================================================================

    fn parse_struct_type(&mut self) -> Option<StructType> {
        let start = self.advance().span(); // struct
        self.expect(&TokenKind::LeftBrace, "'{'")?;

        let mut fields = Vec::new();
        while !self.check(&TokenKind::RightBrace) && !self.is_at_end() {
            let before = self.current;
            match self.parse_field_decl() {
                Some(field) => fields.push(field),
                None => self.skip_to_statement_end(),
            }
            if !self.check(&TokenKind::RightBrace) {
                self.expect_semicolon("field declaration");
            }
            if self.current == before {
                self.advance();
            }
        }
        self.expect(&TokenKind::RightBrace, "'}'")?;

        Some(StructType {
            fields,
            span: self.span_from(start),
        })
    }

    /// Parses one field declaration, with its doc comment and tag.
    fn parse_field_decl(&mut self) -> Option<FieldDecl> {
        let doc = self.collect_doc_comment();
        let start = self.current_token().span();

        let (names, ty) = if self.at_embedded_field() {
            let ty = self.parse_type()?;
            if ty.embedded_name().is_none() {
                self.diagnostics.push(Diagnostic::error(
                    "expected field name or embedded type",
                    ty.span(),
                ));
                return None;
            }
            (Vec::new(), ty)
        } else {
            let mut names = vec![self.expect_identifier("field name")?];
            while self.match_token(&TokenKind::Comma) {
                names.push(self.expect_identifier("field name")?);
            }
            (names, self.parse_type()?)
        };

        let tag = match self.current_kind() {
            TokenKind::String(tag) | TokenKind::RawString(tag) => {
                let tag = tag.clone();
                self.advance();
                Some(tag)
            }
            _ => None,
        };

        Some(FieldDecl {
            names,
            ty,
            tag,
            doc,
            span: self.span_from(start),
        })
    }

    /// Decides whether the current field declaration is an embedded type.
    fn at_embedded_field(&self) -> bool {
        match self.current_kind() {
            TokenKind::Star | TokenKind::LeftParen => true,
            TokenKind::Identifier(_) => match self.peek_kind() {
                Some(
                    TokenKind::Period
                    | TokenKind::Semicolon { .. }
                    | TokenKind::RightBrace
                    | TokenKind::String(_)
                    | TokenKind::RawString(_)
                    | TokenKind::Eof,
                )
                | None => true,
                Some(TokenKind::LeftBracket) => self.brackets_are_type_args(1),
                _ => false,
            },
            _ => false,
        }
    }

    fn parse_interface_type(&mut self) -> Option<InterfaceType> {
        let start = self.advance().span(); // interface
        self.expect(&TokenKind::LeftBrace, "'{'")?;

        let mut elements = Vec::new();
        while !self.check(&TokenKind::RightBrace) && !self.is_at_end() {
            let before = self.current;
            let is_method = matches!(self.current_kind(), TokenKind::Identifier(_))
                && matches!(self.peek_kind(), Some(TokenKind::LeftParen));
            let element = if is_method {
                self.expect_identifier("method name").and_then(|name| {
                    self.parse_signature()
                        .map(|signature| InterfaceElem::Method { name, signature })
                })
            } else {
                self.parse_union_terms().map(InterfaceElem::Union)
            };
            match element {
                Some(element) => elements.push(element),
                None => self.skip_to_statement_end(),
            }
            if !self.check(&TokenKind::RightBrace) {
                self.expect_semicolon("interface element");
            }
            if self.current == before {
                self.advance();
            }
        }
        self.expect(&TokenKind::RightBrace, "'}'")?;

        Some(InterfaceType {
            elements,
            span: self.span_from(start),
        })
    }
}
