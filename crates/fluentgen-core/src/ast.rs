// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Abstract Syntax Tree (AST) definitions for Go source files.
//!
//! The tree models what declaration discovery needs and nothing more:
//! the package clause, imports, and top-level declarations. Type
//! declarations are parsed in full; `func`, `var` and `const`
//! declarations keep only their names.
//!
//! Every node carries a [`Span`]. Doc comments are attached to type specs
//! and struct fields as already-normalized text (see
//! [`crate::source_analysis::comment_text`]).
//!
//! # Example
//!
//! ```ignore
//! // Source: type ButtonStyle struct { Color string }
//! Declaration::Type(TypeSpec {
//!     name: Identifier { name: "ButtonStyle", .. },
//!     ty: TypeExpr::Struct(StructType {
//!         fields: vec![FieldDecl { names: vec![Color], ty: TypeExpr::Name(string), .. }],
//!         ..
//!     }),
//!     ..
//! })
//! ```

use std::fmt;

use ecow::EcoString;

use crate::source_analysis::Span;

/// Returns `true` if `name` is exported: its first character is an
/// upper-case letter (Unicode class Lu).
///
/// ```
/// use fluentgen_core::ast::is_exported;
///
/// assert!(is_exported("Color"));
/// assert!(is_exported("Ärger"));
/// assert!(!is_exported("hidden"));
/// assert!(!is_exported("_Color"));
/// ```
#[must_use]
pub fn is_exported(name: &str) -> bool {
    name.chars().next().is_some_and(char::is_uppercase)
}

/// A parsed Go source file.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceFile {
    /// The name in the `package` clause.
    pub package: Identifier,
    /// Import declarations, in source order.
    pub imports: Vec<ImportSpec>,
    /// Top-level declarations after the imports, in source order.
    pub declarations: Vec<Declaration>,
    /// Source location spanning the entire file.
    pub span: Span,
}

impl SourceFile {
    /// Iterates the type specs of the file in declaration order.
    pub fn type_specs(&self) -> impl Iterator<Item = &TypeSpec> {
        self.declarations.iter().filter_map(|decl| match decl {
            Declaration::Type(spec) => Some(spec),
            _ => None,
        })
    }
}

/// An identifier with its location.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Identifier {
    /// The identifier text.
    pub name: EcoString,
    /// Source location.
    pub span: Span,
}

impl Identifier {
    /// Creates a new identifier.
    pub fn new(name: impl Into<EcoString>, span: Span) -> Self {
        Self {
            name: name.into(),
            span,
        }
    }

    /// Returns `true` if the identifier is exported.
    #[must_use]
    pub fn is_exported(&self) -> bool {
        is_exported(&self.name)
    }

    /// Returns `true` for the blank identifier `_`.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.name == "_"
    }
}

/// A single import: `import alias "path"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportSpec {
    /// Explicit local name (`alias`, `.` or `_`), if any.
    pub name: Option<Identifier>,
    /// The import path with quotes removed.
    pub path: EcoString,
    /// Source location of the whole spec.
    pub span: Span,
}

/// A top-level declaration.
#[derive(Debug, Clone, PartialEq)]
pub enum Declaration {
    /// One type spec. Grouped `type ( ... )` declarations are flattened.
    Type(TypeSpec),
    /// A function or method.
    Func(FuncDecl),
    /// A `var` or `const` spec (names only).
    Value(ValueDecl),
}

/// A type spec: `Name[TypeParams] Type` or `Name = Type`.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeSpec {
    /// The declared name.
    pub name: Identifier,
    /// Type parameters of a generic declaration.
    pub type_params: Vec<TypeParam>,
    /// `true` for alias declarations (`type A = B`).
    pub is_alias: bool,
    /// The declared type.
    pub ty: TypeExpr,
    /// Normalized doc comment, if any.
    pub doc: Option<String>,
    /// Source location of the spec.
    pub span: Span,
}

/// A type parameter with its constraint.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeParam {
    pub name: Identifier,
    pub constraint: TypeExpr,
}

/// A function or method declaration. Bodies are not parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FuncDecl {
    /// Function name.
    pub name: Identifier,
    /// Base type name of the receiver, for methods.
    pub receiver: Option<Identifier>,
    /// Source location of the declaration.
    pub span: Span,
}

/// Whether a value spec declares variables or constants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Var,
    Const,
}

/// A `var` or `const` spec. Only the declared names are kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValueDecl {
    pub kind: ValueKind,
    pub names: Vec<Identifier>,
    pub span: Span,
}

/// A type expression as written in source.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeExpr {
    /// A bare type name: `string`, `Color`
    Name(Identifier),
    /// A package-qualified name: `lipgloss.Border`
    Qualified {
        package: Identifier,
        name: Identifier,
    },
    /// A generic instantiation: `List[int]`
    Generic {
        base: Box<TypeExpr>,
        args: Vec<TypeExpr>,
        span: Span,
    },
    /// `*T`
    Pointer { elem: Box<TypeExpr>, span: Span },
    /// `[]T`
    Slice { elem: Box<TypeExpr>, span: Span },
    /// `[N]T`; the length is kept as source text.
    Array {
        len: EcoString,
        elem: Box<TypeExpr>,
        span: Span,
    },
    /// `map[K]V`
    Map {
        key: Box<TypeExpr>,
        value: Box<TypeExpr>,
        span: Span,
    },
    /// `chan T`, `chan<- T`, `<-chan T`
    Chan {
        dir: ChanDir,
        elem: Box<TypeExpr>,
        span: Span,
    },
    /// `func(params) results`
    Func { signature: Signature, span: Span },
    /// `struct { ... }`
    Struct(StructType),
    /// `interface { ... }`
    Interface(InterfaceType),
    /// `(T)`
    Paren { inner: Box<TypeExpr>, span: Span },
}

/// Coarse classification of a type expression's outermost shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeShape {
    Name,
    Qualified,
    Generic,
    Pointer,
    Slice,
    Array,
    Map,
    Chan,
    Func,
    Struct,
    Interface,
    Paren,
}

impl fmt::Display for TypeShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Name => "type name",
            Self::Qualified => "qualified type name",
            Self::Generic => "generic instantiation",
            Self::Pointer => "pointer",
            Self::Slice => "slice",
            Self::Array => "array",
            Self::Map => "map",
            Self::Chan => "channel",
            Self::Func => "function",
            Self::Struct => "struct literal",
            Self::Interface => "interface literal",
            Self::Paren => "parenthesized type",
        };
        f.write_str(name)
    }
}

impl TypeExpr {
    /// Returns the source location of the expression.
    #[must_use]
    pub fn span(&self) -> Span {
        match self {
            Self::Name(ident) => ident.span,
            Self::Qualified { package, name } => package.span.merge(name.span),
            Self::Struct(st) => st.span,
            Self::Interface(it) => it.span,
            Self::Generic { span, .. }
            | Self::Pointer { span, .. }
            | Self::Slice { span, .. }
            | Self::Array { span, .. }
            | Self::Map { span, .. }
            | Self::Chan { span, .. }
            | Self::Func { span, .. }
            | Self::Paren { span, .. } => *span,
        }
    }

    /// Returns the outermost shape of the expression.
    #[must_use]
    pub fn shape(&self) -> TypeShape {
        match self {
            Self::Name(_) => TypeShape::Name,
            Self::Qualified { .. } => TypeShape::Qualified,
            Self::Generic { .. } => TypeShape::Generic,
            Self::Pointer { .. } => TypeShape::Pointer,
            Self::Slice { .. } => TypeShape::Slice,
            Self::Array { .. } => TypeShape::Array,
            Self::Map { .. } => TypeShape::Map,
            Self::Chan { .. } => TypeShape::Chan,
            Self::Func { .. } => TypeShape::Func,
            Self::Struct(_) => TypeShape::Struct,
            Self::Interface(_) => TypeShape::Interface,
            Self::Paren { .. } => TypeShape::Paren,
        }
    }

    /// Strips any number of enclosing parentheses.
    #[must_use]
    pub fn unparen(&self) -> &Self {
        match self {
            Self::Paren { inner, .. } => inner.unparen(),
            other => other,
        }
    }

    /// Returns the type name an embedded field declares: `T` for `T`,
    /// `*T`, `pkg.T` and `T[A]`.
    #[must_use]
    pub fn embedded_name(&self) -> Option<&Identifier> {
        match self.unparen() {
            Self::Name(ident) | Self::Qualified { name: ident, .. } => Some(ident),
            Self::Pointer { elem, .. } | Self::Generic { base: elem, .. } => elem.embedded_name(),
            _ => None,
        }
    }
}

/// Channel direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChanDir {
    /// `chan T`
    Both,
    /// `chan<- T`
    Send,
    /// `<-chan T`
    Recv,
}

/// Parameters and results of a function type.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Signature {
    pub params: Vec<Param>,
    pub results: Vec<Param>,
}

/// One parameter or result. Grouped names (`a, b int`) are split into
/// one `Param` per name.
#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    pub name: Option<Identifier>,
    pub ty: TypeExpr,
    /// `true` for a final `...T` parameter.
    pub variadic: bool,
}

/// A struct type literal.
#[derive(Debug, Clone, PartialEq)]
pub struct StructType {
    /// Field declarations in source order.
    pub fields: Vec<FieldDecl>,
    /// Source location from `struct` to the closing brace.
    pub span: Span,
}

/// One field declaration line: `A, B int \`tag\``, or an embedded type.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDecl {
    /// Declared names; empty for embedded fields.
    pub names: Vec<Identifier>,
    /// The field type (for embedded fields, the embedded type).
    pub ty: TypeExpr,
    /// Raw tag literal including its quotes.
    pub tag: Option<EcoString>,
    /// Normalized doc comment, if any.
    pub doc: Option<String>,
    /// Source location of the declaration.
    pub span: Span,
}

impl FieldDecl {
    /// Returns `true` for an embedded (anonymous) field.
    #[must_use]
    pub fn is_embedded(&self) -> bool {
        self.names.is_empty()
    }
}

/// An interface type literal.
#[derive(Debug, Clone, PartialEq)]
pub struct InterfaceType {
    pub elements: Vec<InterfaceElem>,
    pub span: Span,
}

/// An interface element.
#[derive(Debug, Clone, PartialEq)]
pub enum InterfaceElem {
    /// `Name(params) results`
    Method {
        name: Identifier,
        signature: Signature,
    },
    /// An embedded type or type set: `io.Reader`, `~int | ~string`
    Union(Vec<UnionTerm>),
}

/// One term of a type union.
#[derive(Debug, Clone, PartialEq)]
pub struct UnionTerm {
    /// `true` for `~T`.
    pub tilde: bool,
    pub ty: TypeExpr,
}

// --- Source rendering ---

/// Writes `items` separated by `sep`.
pub(crate) fn write_joined<T: fmt::Display>(
    f: &mut fmt::Formatter<'_>,
    items: &[T],
    sep: &str,
) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(sep)?;
        }
        write!(f, "{item}")?;
    }
    Ok(())
}

impl fmt::Display for TypeExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Name(ident) => f.write_str(&ident.name),
            Self::Qualified { package, name } => write!(f, "{}.{}", package.name, name.name),
            Self::Generic { base, args, .. } => {
                write!(f, "{base}[")?;
                write_joined(f, args, ", ")?;
                f.write_str("]")
            }
            Self::Pointer { elem, .. } => write!(f, "*{elem}"),
            Self::Slice { elem, .. } => write!(f, "[]{elem}"),
            Self::Array { len, elem, .. } => write!(f, "[{len}]{elem}"),
            Self::Map { key, value, .. } => write!(f, "map[{key}]{value}"),
            Self::Chan { dir, elem, .. } => match dir {
                ChanDir::Both => write!(f, "chan {elem}"),
                ChanDir::Send => write!(f, "chan<- {elem}"),
                ChanDir::Recv => write!(f, "<-chan {elem}"),
            },
            Self::Func { signature, .. } => write!(f, "func{signature}"),
            Self::Struct(st) => write!(f, "{st}"),
            Self::Interface(it) => write!(f, "{it}"),
            Self::Paren { inner, .. } => write!(f, "({inner})"),
        }
    }
}

impl fmt::Display for Param {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(name) = &self.name {
            write!(f, "{} ", name.name)?;
        }
        if self.variadic {
            f.write_str("...")?;
        }
        write!(f, "{}", self.ty)
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("(")?;
        write_joined(f, &self.params, ", ")?;
        f.write_str(")")?;
        match self.results.as_slice() {
            [] => Ok(()),
            [single] if single.name.is_none() => write!(f, " {single}"),
            results => {
                f.write_str(" (")?;
                write_joined(f, results, ", ")?;
                f.write_str(")")
            }
        }
    }
}

impl fmt::Display for FieldDecl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.names.is_empty() {
            let names: Vec<&str> = self.names.iter().map(|n| n.name.as_str()).collect();
            write!(f, "{} ", names.join(", "))?;
        }
        write!(f, "{}", self.ty)?;
        if let Some(tag) = &self.tag {
            write!(f, " {tag}")?;
        }
        Ok(())
    }
}

impl fmt::Display for StructType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("struct{")?;
        write_joined(f, &self.fields, "; ")?;
        f.write_str("}")
    }
}

impl fmt::Display for UnionTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.tilde {
            f.write_str("~")?;
        }
        write!(f, "{}", self.ty)
    }
}

impl fmt::Display for InterfaceElem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Method { name, signature } => write!(f, "{}{signature}", name.name),
            Self::Union(terms) => write_joined(f, terms, " | "),
        }
    }
}

impl fmt::Display for InterfaceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("interface{")?;
        write_joined(f, &self.elements, "; ")?;
        f.write_str("}")
    }
}
