// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Binding of type expressions.

use std::collections::HashMap;
use std::rc::Rc;

use camino::Utf8PathBuf;
use ecow::EcoString;

use super::scope::{ObjectKind, PackageScope, is_universe_type, is_universe_value};
use super::types::{
    NamedType, PackageId, ResolvedElement, ResolvedField, ResolvedInterface, ResolvedParam,
    ResolvedSignature, ResolvedStruct, ResolvedType,
};
use super::{ResolveError, ResolvedPackage};
use crate::ast::{FieldDecl, Identifier, InterfaceElem, Param, Signature, TypeExpr, is_exported};
use crate::source_analysis::Span;

/// What an import name refers to.
#[derive(Debug, Clone)]
pub(crate) enum ImportBinding {
    /// A standard library package; its declarations are not inspected.
    Standard(PackageId),
    Loaded(Rc<ResolvedPackage>),
}

impl ImportBinding {
    pub(crate) fn id(&self) -> &PackageId {
        match self {
            Self::Standard(id) => id,
            Self::Loaded(package) => &package.id,
        }
    }
}

/// Import names visible in one file.
#[derive(Debug, Default)]
pub(crate) struct FileImports {
    pub(crate) named: HashMap<EcoString, (ImportBinding, Span)>,
    /// `import . "path"` packages, in source order.
    pub(crate) dot: Vec<ImportBinding>,
}

/// Result of looking up a name used as a type.
enum Lookup {
    Basic(EcoString),
    TypeParam(EcoString),
    /// `params` is the number of type parameters, unknown for standard
    /// library types.
    Named {
        named: NamedType,
        params: Option<usize>,
    },
}

/// Resolves type expressions of one file of a package.
pub(crate) struct Checker<'a> {
    pub(crate) package: &'a PackageId,
    pub(crate) scope: &'a PackageScope,
    pub(crate) imports: &'a FileImports,
    pub(crate) path: &'a Utf8PathBuf,
    pub(crate) type_params: &'a [EcoString],
}

impl Checker<'_> {
    pub(crate) fn resolve(&self, expr: &TypeExpr) -> Result<ResolvedType, ResolveError> {
        match expr {
            TypeExpr::Name(ident) => {
                let lookup = self.lookup_name(ident)?;
                self.instantiate(lookup, Vec::new(), &ident.name, ident.span)
            }
            TypeExpr::Qualified { package, name } => {
                let lookup = self.lookup_selector(package, name)?;
                self.instantiate(lookup, Vec::new(), &expr.to_string(), expr.span())
            }
            TypeExpr::Generic { base, args, span } => {
                let lookup = match base.unparen() {
                    TypeExpr::Name(ident) => self.lookup_name(ident)?,
                    TypeExpr::Qualified { package, name } => self.lookup_selector(package, name)?,
                    other => {
                        return Err(self.invalid(format!("{other} is not a generic type"), *span));
                    }
                };
                let args = args
                    .iter()
                    .map(|arg| self.resolve(arg))
                    .collect::<Result<Vec<_>, _>>()?;
                self.instantiate(lookup, args, &base.to_string(), *span)
            }
            TypeExpr::Pointer { elem, .. } => Ok(ResolvedType::Pointer(Box::new(self.resolve(elem)?))),
            TypeExpr::Slice { elem, .. } => Ok(ResolvedType::Slice(Box::new(self.resolve(elem)?))),
            TypeExpr::Array { len, elem, .. } => Ok(ResolvedType::Array {
                len: len.clone(),
                elem: Box::new(self.resolve(elem)?),
            }),
            TypeExpr::Map { key, value, .. } => Ok(ResolvedType::Map {
                key: Box::new(self.resolve(key)?),
                value: Box::new(self.resolve(value)?),
            }),
            TypeExpr::Chan { dir, elem, .. } => Ok(ResolvedType::Chan {
                dir: *dir,
                elem: Box::new(self.resolve(elem)?),
            }),
            TypeExpr::Func { signature, .. } => Ok(ResolvedType::Func(self.signature(signature)?)),
            TypeExpr::Struct(st) => {
                let mut fields = Vec::new();
                for decl in &st.fields {
                    self.fields(decl, &mut fields)?;
                }
                Ok(ResolvedType::Struct(ResolvedStruct { fields }))
            }
            TypeExpr::Interface(it) => {
                let elements = it
                    .elements
                    .iter()
                    .map(|element| self.element(element))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(ResolvedType::Interface(ResolvedInterface { elements }))
            }
            TypeExpr::Paren { inner, .. } => self.resolve(inner),
        }
    }

    fn element(&self, element: &InterfaceElem) -> Result<ResolvedElement, ResolveError> {
        match element {
            InterfaceElem::Method { name, signature } => Ok(ResolvedElement::Method {
                name: name.name.clone(),
                signature: self.signature(signature)?,
            }),
            InterfaceElem::Union(terms) => {
                let mut resolved = Vec::with_capacity(terms.len());
                for term in terms {
                    resolved.push((term.tilde, self.resolve(&term.ty)?));
                }
                Ok(ResolvedElement::Union(resolved))
            }
        }
    }

    fn fields(&self, decl: &FieldDecl, out: &mut Vec<ResolvedField>) -> Result<(), ResolveError> {
        let ty = self.resolve(&decl.ty)?;
        if decl.is_embedded() {
            let Some(name) = decl.ty.embedded_name() else {
                return Err(self.invalid(
                    format!("invalid embedded field type {}", decl.ty),
                    decl.ty.span(),
                ));
            };
            out.push(ResolvedField {
                name: name.name.clone(),
                embedded: true,
                ty,
                tag: decl.tag.clone(),
                doc: decl.doc.clone(),
                span: decl.ty.span(),
            });
            return Ok(());
        }
        for name in &decl.names {
            out.push(ResolvedField {
                name: name.name.clone(),
                embedded: false,
                ty: ty.clone(),
                tag: decl.tag.clone(),
                doc: decl.doc.clone(),
                span: name.span,
            });
        }
        Ok(())
    }

    fn signature(&self, signature: &Signature) -> Result<ResolvedSignature, ResolveError> {
        let params = |list: &[Param]| -> Result<Vec<ResolvedParam>, ResolveError> {
            let mut resolved = Vec::with_capacity(list.len());
            for param in list {
                resolved.push(ResolvedParam {
                    name: param.name.as_ref().map(|n| n.name.clone()),
                    ty: self.resolve(&param.ty)?,
                    variadic: param.variadic,
                });
            }
            Ok(resolved)
        };
        Ok(ResolvedSignature {
            params: params(&signature.params)?,
            results: params(&signature.results)?,
        })
    }

    fn lookup_name(&self, ident: &Identifier) -> Result<Lookup, ResolveError> {
        let name = &ident.name;
        if self.type_params.contains(name) {
            return Ok(Lookup::TypeParam(name.clone()));
        }
        if let Some(object) = self.scope.lookup(name) {
            return match object.kind {
                ObjectKind::Type { type_params } => Ok(Lookup::Named {
                    named: NamedType {
                        package: self.package.clone(),
                        name: name.clone(),
                        args: Vec::new(),
                    },
                    params: Some(type_params),
                }),
                _ => Err(self.not_a_type(name.clone(), ident.span)),
            };
        }
        for binding in &self.imports.dot {
            if let ImportBinding::Loaded(package) = binding
                && let Some(lookup) = exported_type(package, name)
            {
                return Ok(lookup);
            }
        }
        if is_universe_type(name) {
            return Ok(Lookup::Basic(name.clone()));
        }
        if is_universe_value(name) {
            return Err(self.not_a_type(name.clone(), ident.span));
        }
        let standard_dot = self
            .imports
            .dot
            .iter()
            .find(|binding| matches!(binding, ImportBinding::Standard(_)));
        if let Some(binding) = standard_dot
            && is_exported(name)
        {
            return Ok(Lookup::Named {
                named: NamedType {
                    package: binding.id().clone(),
                    name: name.clone(),
                    args: Vec::new(),
                },
                params: None,
            });
        }
        Err(ResolveError::Undefined {
            name: name.clone(),
            path: self.path.clone(),
            span: ident.span,
        })
    }

    fn lookup_selector(
        &self,
        package: &Identifier,
        name: &Identifier,
    ) -> Result<Lookup, ResolveError> {
        let span = package.span.merge(name.span);
        let qualified: EcoString = format!("{}.{}", package.name, name.name).into();
        let Some((binding, _)) = self.imports.named.get(&package.name) else {
            if self.scope.lookup(&package.name).is_some() {
                return Err(self.not_a_type(qualified, span));
            }
            return Err(ResolveError::Undefined {
                name: package.name.clone(),
                path: self.path.clone(),
                span: package.span,
            });
        };
        if !name.is_exported() {
            return Err(ResolveError::NotExported {
                name: name.name.clone(),
                package: binding.id().name.clone(),
                path: self.path.clone(),
                span,
            });
        }
        match binding {
            ImportBinding::Standard(id) => Ok(Lookup::Named {
                named: NamedType {
                    package: id.clone(),
                    name: name.name.clone(),
                    args: Vec::new(),
                },
                params: None,
            }),
            ImportBinding::Loaded(loaded) => {
                if let Some(lookup) = exported_type(loaded, &name.name) {
                    Ok(lookup)
                } else if loaded.scope.lookup(&name.name).is_some() {
                    Err(self.not_a_type(qualified, span))
                } else {
                    Err(ResolveError::Undefined {
                        name: qualified,
                        path: self.path.clone(),
                        span,
                    })
                }
            }
        }
    }

    fn instantiate(
        &self,
        lookup: Lookup,
        args: Vec<ResolvedType>,
        display: &str,
        span: Span,
    ) -> Result<ResolvedType, ResolveError> {
        match lookup {
            Lookup::Basic(name) | Lookup::TypeParam(name) if !args.is_empty() => {
                Err(self.invalid(format!("{name} is not a generic type"), span))
            }
            Lookup::Basic(name) => Ok(ResolvedType::Basic(name)),
            Lookup::TypeParam(name) => Ok(ResolvedType::TypeParam(name)),
            Lookup::Named { mut named, params } => {
                match params {
                    Some(0) if !args.is_empty() => {
                        return Err(self.invalid(format!("{display} is not a generic type"), span));
                    }
                    Some(n) if n > 0 && args.is_empty() => {
                        return Err(self.invalid(
                            format!("cannot use generic type {display} without instantiation"),
                            span,
                        ));
                    }
                    Some(n) if n != args.len() => {
                        return Err(self.invalid(
                            format!(
                                "got {} type arguments for {display}, want {n}",
                                args.len()
                            ),
                            span,
                        ));
                    }
                    _ => {}
                }
                named.args = args;
                Ok(ResolvedType::Named(named))
            }
        }
    }

    fn not_a_type(&self, name: EcoString, span: Span) -> ResolveError {
        ResolveError::NotAType {
            name,
            path: self.path.clone(),
            span,
        }
    }

    fn invalid(&self, message: String, span: Span) -> ResolveError {
        ResolveError::InvalidType {
            message,
            path: self.path.clone(),
            span,
        }
    }
}

fn exported_type(package: &ResolvedPackage, name: &str) -> Option<Lookup> {
    if !is_exported(name) {
        return None;
    }
    match package.scope.lookup(name)?.kind {
        ObjectKind::Type { type_params } => Some(Lookup::Named {
            named: NamedType {
                package: package.id.clone(),
                name: name.into(),
                args: Vec::new(),
            },
            params: Some(type_params),
        }),
        _ => None,
    }
}
