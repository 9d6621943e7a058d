// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Package scope and the universe block.

use std::collections::HashMap;

use ecow::EcoString;

use super::{ResolveError, ResolvedFile};
use crate::ast::{Declaration, Identifier};
use crate::source_analysis::Span;

/// Predeclared type names.
const UNIVERSE_TYPES: &[&str] = &[
    "any",
    "bool",
    "byte",
    "comparable",
    "complex64",
    "complex128",
    "error",
    "float32",
    "float64",
    "int",
    "int8",
    "int16",
    "int32",
    "int64",
    "rune",
    "string",
    "uint",
    "uint8",
    "uint16",
    "uint32",
    "uint64",
    "uintptr",
];

/// Predeclared constants, the zero value and builtin functions.
const UNIVERSE_VALUES: &[&str] = &[
    "true", "false", "iota", "nil", "append", "cap", "clear", "close", "complex", "copy",
    "delete", "imag", "len", "make", "max", "min", "new", "panic", "print", "println", "real",
    "recover",
];

pub(crate) fn is_universe_type(name: &str) -> bool {
    UNIVERSE_TYPES.contains(&name)
}

pub(crate) fn is_universe_value(name: &str) -> bool {
    UNIVERSE_VALUES.contains(&name)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ObjectKind {
    Type { type_params: usize },
    Func,
    Var,
    Const,
}

/// A package-level declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ScopeObject {
    pub(crate) kind: ObjectKind,
    /// Index into the package's files.
    pub(crate) file: usize,
    pub(crate) span: Span,
}

/// Top-level names of one package.
#[derive(Debug, Clone, Default)]
pub(crate) struct PackageScope {
    objects: HashMap<EcoString, ScopeObject>,
}

impl PackageScope {
    /// Collects every top-level declaration of `files`.
    ///
    /// Blank names and `init` functions are not declared. Methods do not
    /// enter the scope but must be unique per receiver.
    pub(crate) fn build(files: &[ResolvedFile]) -> Result<Self, ResolveError> {
        let mut scope = Self::default();
        let mut methods: HashMap<(EcoString, EcoString), (usize, Span)> = HashMap::new();

        for (index, file) in files.iter().enumerate() {
            for declaration in &file.syntax.declarations {
                match declaration {
                    Declaration::Type(spec) => scope.declare(
                        files,
                        index,
                        &spec.name,
                        ObjectKind::Type {
                            type_params: spec.type_params.len(),
                        },
                    )?,
                    Declaration::Func(func) => match &func.receiver {
                        Some(receiver) => {
                            if func.name.is_blank() {
                                continue;
                            }
                            let key = (receiver.name.clone(), func.name.name.clone());
                            if let Some(&(previous_file, previous_span)) = methods.get(&key) {
                                return Err(ResolveError::Redeclared {
                                    name: format!("{}.{}", receiver.name, func.name.name).into(),
                                    path: file.path.clone(),
                                    span: func.name.span,
                                    previous: files[previous_file].path.clone(),
                                    previous_span,
                                });
                            }
                            methods.insert(key, (index, func.name.span));
                        }
                        None if func.name.name == "init" => {}
                        None => scope.declare(files, index, &func.name, ObjectKind::Func)?,
                    },
                    Declaration::Value(value) => {
                        let kind = match value.kind {
                            crate::ast::ValueKind::Var => ObjectKind::Var,
                            crate::ast::ValueKind::Const => ObjectKind::Const,
                        };
                        for name in &value.names {
                            scope.declare(files, index, name, kind)?;
                        }
                    }
                }
            }
        }
        Ok(scope)
    }

    fn declare(
        &mut self,
        files: &[ResolvedFile],
        file: usize,
        name: &Identifier,
        kind: ObjectKind,
    ) -> Result<(), ResolveError> {
        if name.is_blank() {
            return Ok(());
        }
        if let Some(previous) = self.objects.get(&name.name) {
            return Err(ResolveError::Redeclared {
                name: name.name.clone(),
                path: files[file].path.clone(),
                span: name.span,
                previous: files[previous.file].path.clone(),
                previous_span: previous.span,
            });
        }
        self.objects.insert(
            name.name.clone(),
            ScopeObject {
                kind,
                file,
                span: name.span,
            },
        );
        Ok(())
    }

    pub(crate) fn lookup(&self, name: &str) -> Option<&ScopeObject> {
        self.objects.get(name)
    }
}
