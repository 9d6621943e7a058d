// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Top-level declaration parsing.
//!
//! A file is `package` clause, imports, then `type`, `func`, `var` and
//! `const` declarations. Grouped forms (`type ( ... )`) are flattened into
//! one [`Declaration`] per spec.

use ecow::EcoString;

use crate::ast::{
    Declaration, FuncDecl, Identifier, ImportSpec, Param, SourceFile, TypeExpr, TypeParam,
    TypeSpec, ValueDecl, ValueKind,
};
use crate::source_analysis::{Diagnostic, Keyword, Span, TokenKind};

use super::Parser;

impl Parser {
    /// Parses a complete source file.
    pub(super) fn parse_source_file(&mut self) -> SourceFile {
        let start = self.current_token().span();
        let package = self.parse_package_clause();

        let mut imports = Vec::new();
        while self.check_keyword(Keyword::Import) {
            self.parse_import_decl(&mut imports);
        }

        let mut declarations = Vec::new();
        while !self.is_at_end() {
            let before = self.current;
            self.parse_top_level_decl(&mut imports, &mut declarations);
            if self.current == before {
                self.advance();
            }
        }

        let span = start.merge(self.current_token().span());
        SourceFile {
            package,
            imports,
            declarations,
            span,
        }
    }

    fn parse_package_clause(&mut self) -> Identifier {
        let start = self.current_token().span();
        if !self.match_keyword(Keyword::Package) {
            self.error(format!(
                "expected 'package' clause, found {}",
                self.describe_current()
            ));
            return Identifier::new("", Span::new(start.start(), start.start()));
        }
        let Some(name) = self.expect_identifier("package name") else {
            self.skip_to_statement_end();
            self.match_token(&TokenKind::Semicolon { inserted: false });
            return Identifier::new("", self.previous_span());
        };
        if name.is_blank() {
            self.diagnostics
                .push(Diagnostic::error("invalid package name _", name.span));
        }
        self.expect_semicolon("package clause");
        name
    }

    fn parse_top_level_decl(
        &mut self,
        imports: &mut Vec<ImportSpec>,
        declarations: &mut Vec<Declaration>,
    ) {
        match self.current_kind() {
            TokenKind::Keyword(Keyword::Type) => self.parse_type_decl(declarations),
            TokenKind::Keyword(Keyword::Func) => {
                if let Some(func) = self.parse_func_decl() {
                    declarations.push(Declaration::Func(func));
                    self.expect_semicolon("function declaration");
                } else {
                    self.synchronize();
                }
            }
            TokenKind::Keyword(Keyword::Var) => self.parse_value_decl(ValueKind::Var, declarations),
            TokenKind::Keyword(Keyword::Const) => {
                self.parse_value_decl(ValueKind::Const, declarations);
            }
            TokenKind::Keyword(Keyword::Import) => {
                self.error("imports must appear before other declarations");
                self.parse_import_decl(imports);
            }
            _ => {
                self.error(format!(
                    "expected declaration, found {}",
                    self.describe_current()
                ));
                self.synchronize();
            }
        }
    }

    /// Skips to the next token that can start a top-level declaration.
    fn synchronize(&mut self) {
        self.advance();
        while !self.is_at_end() {
            let after_semicolon = self.tokens[self.current - 1].kind().is_semicolon();
            if after_semicolon
                && matches!(
                    self.current_kind(),
                    TokenKind::Keyword(
                        Keyword::Type
                            | Keyword::Func
                            | Keyword::Var
                            | Keyword::Const
                            | Keyword::Import
                    )
                )
            {
                return;
            }
            self.advance();
        }
    }

    /// Parses either a single spec or a parenthesized group of specs after
    /// the declaration keyword, then the terminating `;`.
    fn parse_spec_group(&mut self, what: &str, mut spec: impl FnMut(&mut Self)) {
        if self.match_token(&TokenKind::LeftParen) {
            while !self.check(&TokenKind::RightParen) && !self.is_at_end() {
                let before = self.current;
                spec(self);
                self.expect_semicolon(what);
                if self.current == before {
                    self.advance();
                }
            }
            self.expect(&TokenKind::RightParen, "')'");
        } else {
            spec(self);
        }
        self.expect_semicolon(what);
    }

    // ========================================================================
    // Imports
    // ========================================================================

    fn parse_import_decl(&mut self, imports: &mut Vec<ImportSpec>) {
        self.advance(); // import
        self.parse_spec_group("import declaration", |p| {
            if let Some(spec) = p.parse_import_spec() {
                imports.push(spec);
            } else {
                p.skip_to_statement_end();
            }
        });
    }

    fn parse_import_spec(&mut self) -> Option<ImportSpec> {
        let start = self.current_token().span();
        let name = match self.current_kind() {
            TokenKind::Identifier(_) => self.expect_identifier("import name"),
            TokenKind::Period => {
                let span = self.advance().span();
                Some(Identifier::new(".", span))
            }
            _ => None,
        };

        let (TokenKind::String(literal) | TokenKind::RawString(literal)) = self.current_kind()
        else {
            self.error(format!(
                "expected import path, found {}",
                self.describe_current()
            ));
            return None;
        };
        let literal = literal.clone();
        let path_span = self.advance().span();
        let path = unquote(&literal);
        if !is_valid_import_path(&path) {
            self.diagnostics.push(Diagnostic::error(
                format!("invalid import path: {literal}"),
                path_span,
            ));
        }

        Some(ImportSpec {
            name,
            path,
            span: self.span_from(start),
        })
    }

    // ========================================================================
    // Type declarations
    // ========================================================================

    fn parse_type_decl(&mut self, declarations: &mut Vec<Declaration>) {
        let decl_doc = self.collect_doc_comment();
        self.advance(); // type
        let grouped = self.check(&TokenKind::LeftParen);
        self.parse_spec_group("type declaration", |p| {
            let doc = if grouped {
                p.collect_doc_comment()
            } else {
                decl_doc.clone()
            };
            if let Some(spec) = p.parse_type_spec(doc) {
                declarations.push(Declaration::Type(spec));
            } else {
                p.skip_to_statement_end();
            }
        });
    }

    fn parse_type_spec(&mut self, doc: Option<String>) -> Option<TypeSpec> {
        let name = self.expect_identifier("type name")?;

        let type_params = if self.check(&TokenKind::LeftBracket) && self.at_type_params() {
            let start = self.advance().span();
            let params = self.parse_parameter_list(&TokenKind::RightBracket, true)?;
            self.expect(&TokenKind::RightBracket, "']'")?;
            self.type_params_from(params, start)?
        } else {
            Vec::new()
        };

        let is_alias = self.match_token(&TokenKind::Assign);
        let ty = self.parse_type()?;
        Some(TypeSpec {
            span: self.span_from(name.span),
            name,
            type_params,
            is_alias,
            ty,
            doc,
        })
    }

    /// Decides whether `[` after a type name opens a type parameter list
    /// rather than an array length.
    ///
    /// `type A[P any] ...` has a name followed by a constraint;
    /// `type A [N]int` has a lone length expression. Ambiguous forms such
    /// as `[P *C]` are arrays, as in Go.
    fn at_type_params(&self) -> bool {
        matches!(self.peek_at(1), Some(TokenKind::Identifier(_)))
            && matches!(
                self.peek_at(2),
                Some(
                    TokenKind::Identifier(_)
                        | TokenKind::Comma
                        | TokenKind::Tilde
                        | TokenKind::LeftBracket
                        | TokenKind::Arrow
                        | TokenKind::Keyword(
                            Keyword::Interface
                                | Keyword::Map
                                | Keyword::Chan
                                | Keyword::Func
                                | Keyword::Struct
                        )
                )
            )
    }

    fn type_params_from(&mut self, params: Vec<Param>, start: Span) -> Option<Vec<TypeParam>> {
        if params.is_empty() {
            self.diagnostics.push(Diagnostic::error(
                "empty type parameter list",
                self.span_from(start),
            ));
            return None;
        }
        let mut type_params = Vec::with_capacity(params.len());
        for param in params {
            let Some(name) = param.name else {
                self.diagnostics.push(Diagnostic::error(
                    "type parameters must be named",
                    param.ty.span(),
                ));
                return None;
            };
            type_params.push(TypeParam {
                name,
                constraint: param.ty,
            });
        }
        Some(type_params)
    }

    // ========================================================================
    // Functions
    // ========================================================================

    fn parse_func_decl(&mut self) -> Option<FuncDecl> {
        let start = self.advance().span(); // func

        let receiver = if self.check(&TokenKind::LeftParen) {
            let open = self.current_token().span();
            let params = self.parse_parameters()?;
            if let [param] = params.as_slice() {
                receiver_base(&param.ty).cloned()
            } else {
                let message = if params.is_empty() {
                    "method has no receiver"
                } else {
                    "method has multiple receivers"
                };
                self.diagnostics
                    .push(Diagnostic::error(message, self.span_from(open)));
                None
            }
        } else {
            None
        };

        let name = self.expect_identifier("function name")?;
        if self.check(&TokenKind::LeftBracket) {
            let open = self.advance().span();
            let params = self.parse_parameter_list(&TokenKind::RightBracket, true)?;
            self.expect(&TokenKind::RightBracket, "']'")?;
            self.type_params_from(params, open)?;
        }
        self.parse_signature()?;
        if self.check(&TokenKind::LeftBrace) {
            self.skip_balanced();
        }

        Some(FuncDecl {
            name,
            receiver,
            span: self.span_from(start),
        })
    }

    // ========================================================================
    // Variables and constants
    // ========================================================================

    fn parse_value_decl(&mut self, kind: ValueKind, declarations: &mut Vec<Declaration>) {
        self.advance(); // var / const
        let what = match kind {
            ValueKind::Var => "variable declaration",
            ValueKind::Const => "constant declaration",
        };
        self.parse_spec_group(what, |p| {
            let start = p.current_token().span();
            let mut names = Vec::new();
            while let Some(name) = p.expect_identifier("name") {
                names.push(name);
                if !p.match_token(&TokenKind::Comma) {
                    break;
                }
            }
            // Type and initializer are not needed.
            p.skip_to_statement_end();
            if !names.is_empty() {
                declarations.push(Declaration::Value(ValueDecl {
                    kind,
                    names,
                    span: p.span_from(start),
                }));
            }
        });
    }
}

/// Returns the base type name of a receiver type: `T` for `T`, `*T`,
/// `T[P]` and `(*T)`.
fn receiver_base(ty: &TypeExpr) -> Option<&Identifier> {
    match ty.unparen() {
        TypeExpr::Name(name) => Some(name),
        TypeExpr::Pointer { elem, .. } | TypeExpr::Generic { base: elem, .. } => receiver_base(elem),
        _ => None,
    }
}

/// Strips the quotes from a string literal.
///
/// Escape sequences are kept as written; valid import paths never
/// contain a backslash.
fn unquote(literal: &str) -> EcoString {
    let inner = literal
        .strip_prefix(['"', '`'])
        .and_then(|s| s.strip_suffix(['"', '`']))
        .unwrap_or(literal);
    EcoString::from(inner)
}

/// Reports whether `path` is a syntactically valid import path.
fn is_valid_import_path(path: &str) -> bool {
    const ILLEGAL: &str = "!\"#$%&'()*,:;<=>?[\\]^{|}`\u{fffd}";
    !path.is_empty()
        && path
            .chars()
            .all(|c| !c.is_whitespace() && !c.is_control() && !ILLEGAL.contains(c))
}
