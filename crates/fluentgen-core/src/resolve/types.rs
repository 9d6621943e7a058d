// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Resolved types.
//!
//! A [`ResolvedType`] is a type expression whose names have been bound:
//! every named type knows the package that declares it. Rendering is
//! canonical and relative to one package (see [`ResolvedType::qualified`]):
//! types declared in that package print bare, types from any other package
//! print as `<declared package name>.<Name>`, whatever alias the source
//! used for the import.

use std::fmt;

use ecow::EcoString;

use crate::ast::ChanDir;
use crate::source_analysis::Span;

/// Identity of a package: its import path and declared name.
///
/// For a package outside any module the path is its directory.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PackageId {
    pub path: EcoString,
    pub name: EcoString,
}

impl PackageId {
    /// Creates a package identity.
    pub fn new(path: impl Into<EcoString>, name: impl Into<EcoString>) -> Self {
        Self {
            path: path.into(),
            name: name.into(),
        }
    }
}

/// A type with all names bound.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedType {
    /// A predeclared type: `int`, `string`, `error`, `any`, ...
    Basic(EcoString),
    /// A declared (named) type, possibly instantiated.
    Named(NamedType),
    /// A type parameter of the enclosing generic declaration.
    TypeParam(EcoString),
    Pointer(Box<ResolvedType>),
    Slice(Box<ResolvedType>),
    Array {
        len: EcoString,
        elem: Box<ResolvedType>,
    },
    Map {
        key: Box<ResolvedType>,
        value: Box<ResolvedType>,
    },
    Chan {
        dir: ChanDir,
        elem: Box<ResolvedType>,
    },
    Func(ResolvedSignature),
    Struct(ResolvedStruct),
    Interface(ResolvedInterface),
}

/// A reference to a declared type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedType {
    /// The declaring package.
    pub package: PackageId,
    /// The declared name.
    pub name: EcoString,
    /// Type arguments of an instantiation; empty otherwise.
    pub args: Vec<ResolvedType>,
}

/// Parameters and results of a function type.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ResolvedSignature {
    pub params: Vec<ResolvedParam>,
    pub results: Vec<ResolvedParam>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedParam {
    pub name: Option<EcoString>,
    pub ty: ResolvedType,
    pub variadic: bool,
}

/// A struct type; multi-name declarations are split into one field per
/// name.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ResolvedStruct {
    pub fields: Vec<ResolvedField>,
}

/// One struct field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedField {
    /// Field name; for embedded fields the embedded type's name.
    pub name: EcoString,
    pub embedded: bool,
    pub ty: ResolvedType,
    /// Raw tag literal including quotes.
    pub tag: Option<EcoString>,
    pub doc: Option<String>,
    /// Location of the field name (or embedded type) in its file.
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ResolvedInterface {
    pub elements: Vec<ResolvedElement>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedElement {
    Method {
        name: EcoString,
        signature: ResolvedSignature,
    },
    /// Embedded types and type sets; each term is `(tilde, type)`.
    Union(Vec<(bool, ResolvedType)>),
}

impl ResolvedType {
    /// Returns a [`Display`](fmt::Display) adapter rendering this type as
    /// seen from inside `package`.
    #[must_use]
    pub fn qualified<'a>(&'a self, package: &'a PackageId) -> Qualified<'a> {
        Qualified { ty: self, package }
    }

    /// Returns the struct if this type is a struct literal.
    #[must_use]
    pub fn as_struct(&self) -> Option<&ResolvedStruct> {
        match self {
            Self::Struct(st) => Some(st),
            _ => None,
        }
    }

    /// Replaces type parameters by the types in `bindings`.
    #[must_use]
    pub fn substitute(&self, bindings: &[(EcoString, ResolvedType)]) -> Self {
        if bindings.is_empty() {
            return self.clone();
        }
        let sub = |ty: &Self| Box::new(ty.substitute(bindings));
        match self {
            Self::TypeParam(name) => bindings
                .iter()
                .find(|(param, _)| param == name)
                .map_or_else(|| self.clone(), |(_, ty)| ty.clone()),
            Self::Basic(_) => self.clone(),
            Self::Named(named) => Self::Named(NamedType {
                package: named.package.clone(),
                name: named.name.clone(),
                args: named.args.iter().map(|a| a.substitute(bindings)).collect(),
            }),
            Self::Pointer(elem) => Self::Pointer(sub(elem)),
            Self::Slice(elem) => Self::Slice(sub(elem)),
            Self::Array { len, elem } => Self::Array {
                len: len.clone(),
                elem: sub(elem),
            },
            Self::Map { key, value } => Self::Map {
                key: sub(key),
                value: sub(value),
            },
            Self::Chan { dir, elem } => Self::Chan {
                dir: *dir,
                elem: sub(elem),
            },
            Self::Func(sig) => Self::Func(sig.substitute(bindings)),
            Self::Struct(st) => Self::Struct(ResolvedStruct {
                fields: st
                    .fields
                    .iter()
                    .map(|field| ResolvedField {
                        ty: field.ty.substitute(bindings),
                        ..field.clone()
                    })
                    .collect(),
            }),
            Self::Interface(it) => Self::Interface(ResolvedInterface {
                elements: it
                    .elements
                    .iter()
                    .map(|element| match element {
                        ResolvedElement::Method { name, signature } => ResolvedElement::Method {
                            name: name.clone(),
                            signature: signature.substitute(bindings),
                        },
                        ResolvedElement::Union(terms) => ResolvedElement::Union(
                            terms
                                .iter()
                                .map(|(tilde, ty)| (*tilde, ty.substitute(bindings)))
                                .collect(),
                        ),
                    })
                    .collect(),
            }),
        }
    }
}

impl ResolvedSignature {
    fn substitute(&self, bindings: &[(EcoString, ResolvedType)]) -> Self {
        let params = |list: &[ResolvedParam]| {
            list.iter()
                .map(|p| ResolvedParam {
                    ty: p.ty.substitute(bindings),
                    ..p.clone()
                })
                .collect()
        };
        Self {
            params: params(&self.params),
            results: params(&self.results),
        }
    }
}

/// Renders a [`ResolvedType`] relative to a package.
#[derive(Debug, Clone, Copy)]
pub struct Qualified<'a> {
    ty: &'a ResolvedType,
    package: &'a PackageId,
}

impl Qualified<'_> {
    fn with<'b>(&'b self, ty: &'b ResolvedType) -> Qualified<'b> {
        Qualified {
            ty,
            package: self.package,
        }
    }

    fn write_params(&self, f: &mut fmt::Formatter<'_>, params: &[ResolvedParam]) -> fmt::Result {
        for (i, param) in params.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            if let Some(name) = &param.name {
                write!(f, "{name} ")?;
            }
            if param.variadic {
                f.write_str("...")?;
            }
            write!(f, "{}", self.with(&param.ty))?;
        }
        Ok(())
    }

    fn write_signature(&self, f: &mut fmt::Formatter<'_>, sig: &ResolvedSignature) -> fmt::Result {
        f.write_str("(")?;
        self.write_params(f, &sig.params)?;
        f.write_str(")")?;
        match sig.results.as_slice() {
            [] => Ok(()),
            [single] if single.name.is_none() => write!(f, " {}", self.with(&single.ty)),
            results => {
                f.write_str(" (")?;
                self.write_params(f, results)?;
                f.write_str(")")
            }
        }
    }
}

impl fmt::Display for Qualified<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.ty {
            ResolvedType::Basic(name) | ResolvedType::TypeParam(name) => f.write_str(name),
            ResolvedType::Named(named) => {
                if named.package != *self.package {
                    write!(f, "{}.", named.package.name)?;
                }
                f.write_str(&named.name)?;
                if !named.args.is_empty() {
                    f.write_str("[")?;
                    for (i, arg) in named.args.iter().enumerate() {
                        if i > 0 {
                            f.write_str(", ")?;
                        }
                        write!(f, "{}", self.with(arg))?;
                    }
                    f.write_str("]")?;
                }
                Ok(())
            }
            ResolvedType::Pointer(elem) => write!(f, "*{}", self.with(elem)),
            ResolvedType::Slice(elem) => write!(f, "[]{}", self.with(elem)),
            ResolvedType::Array { len, elem } => write!(f, "[{len}]{}", self.with(elem)),
            ResolvedType::Map { key, value } => {
                write!(f, "map[{}]{}", self.with(key), self.with(value))
            }
            ResolvedType::Chan { dir, elem } => match dir {
                ChanDir::Both => write!(f, "chan {}", self.with(elem)),
                ChanDir::Send => write!(f, "chan<- {}", self.with(elem)),
                ChanDir::Recv => write!(f, "<-chan {}", self.with(elem)),
            },
            ResolvedType::Func(sig) => {
                f.write_str("func")?;
                self.write_signature(f, sig)
            }
            ResolvedType::Struct(st) => {
                f.write_str("struct{")?;
                for (i, field) in st.fields.iter().enumerate() {
                    if i > 0 {
                        f.write_str("; ")?;
                    }
                    if !field.embedded {
                        write!(f, "{} ", field.name)?;
                    }
                    write!(f, "{}", self.with(&field.ty))?;
                    if let Some(tag) = &field.tag {
                        write!(f, " {tag}")?;
                    }
                }
                f.write_str("}")
            }
            ResolvedType::Interface(it) => {
                f.write_str("interface{")?;
                for (i, element) in it.elements.iter().enumerate() {
                    if i > 0 {
                        f.write_str("; ")?;
                    }
                    match element {
                        ResolvedElement::Method { name, signature } => {
                            f.write_str(name)?;
                            self.write_signature(f, signature)?;
                        }
                        ResolvedElement::Union(terms) => {
                            for (j, (tilde, ty)) in terms.iter().enumerate() {
                                if j > 0 {
                                    f.write_str(" | ")?;
                                }
                                if *tilde {
                                    f.write_str("~")?;
                                }
                                write!(f, "{}", self.with(ty))?;
                            }
                        }
                    }
                }
                f.write_str("}")
            }
        }
    }
}
