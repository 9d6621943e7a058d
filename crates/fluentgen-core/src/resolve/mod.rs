// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Type resolution for a Go package.
//!
//! The [`Loader`] reads every source file of a package directory, builds
//! its scope, locates and loads the packages it imports (recursively), and
//! binds every type expression in every type declaration. The result is a
//! [`ResolvedPackage`]: the parsed files plus one [`Definition`] per
//! declared type, each with its resolved and underlying type.
//!
//! ```no_run
//! use camino::Utf8Path;
//! use fluentgen_core::resolve::{ImportLocator, Loader};
//!
//! let mut loader = Loader::new(ImportLocator::from_env());
//! let package = loader.load(Utf8Path::new("ui"))?;
//! for definition in &package.definitions {
//!     println!("{}", definition.name.name);
//! }
//! # Ok::<(), fluentgen_core::resolve::ResolveError>(())
//! ```
//!
//! Resolution is all-or-nothing: any [`ResolveError`] fails the whole
//! package.

mod checker;
mod loader;
pub mod module;
mod scope;
pub mod types;

use std::fs;
use std::io;

use camino::{Utf8Path, Utf8PathBuf};
use ecow::EcoString;
use miette::Diagnostic as MietteDiagnostic;
use thiserror::Error;

pub use loader::Loader;
pub use module::{GoMod, ImportLocator, ImportTarget};
pub use types::{PackageId, ResolvedField, ResolvedStruct, ResolvedType};

use crate::ast::{Identifier, SourceFile};
use crate::source_analysis::{Diagnostic, Span};
use scope::PackageScope;

/// One parsed source file of a package.
#[derive(Debug, Clone)]
pub struct ResolvedFile {
    pub path: Utf8PathBuf,
    pub source: String,
    pub syntax: SourceFile,
}

/// A fully resolved package.
#[derive(Debug, Clone)]
pub struct ResolvedPackage {
    pub id: PackageId,
    pub dir: Utf8PathBuf,
    /// Source files sorted by name.
    pub files: Vec<ResolvedFile>,
    /// Declared types in file order, then declaration order.
    pub definitions: Vec<Definition>,
    pub(crate) scope: PackageScope,
}

impl ResolvedPackage {
    /// The declared package name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.id.name
    }

    /// Looks up a declared type by name.
    #[must_use]
    pub fn definition(&self, name: &str) -> Option<&Definition> {
        self.definitions.iter().find(|def| def.name.name == name)
    }

    /// Index of the file at `path`, if it belongs to this package.
    #[must_use]
    pub fn file_index(&self, path: &Utf8Path) -> Option<usize> {
        self.files.iter().position(|file| {
            file.path == path || file.path.file_name().is_some_and(|n| Some(n) == path.file_name())
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefinitionKind {
    /// `type T U`
    Defined,
    /// `type T = U`
    Alias,
}

/// A declared type.
#[derive(Debug, Clone)]
pub struct Definition {
    pub name: Identifier,
    /// Index into [`ResolvedPackage::files`].
    pub file: usize,
    pub kind: DefinitionKind,
    pub type_params: Vec<EcoString>,
    /// The right-hand side of the declaration.
    pub ty: ResolvedType,
    /// The underlying type; `None` when it lies in a package that is not
    /// loaded from source (the standard library).
    pub underlying: Option<ResolvedType>,
    pub doc: Option<String>,
}

impl Definition {
    #[must_use]
    pub fn is_generic(&self) -> bool {
        !self.type_params.is_empty()
    }
}

/// Why a package could not be resolved.
#[derive(Debug, Error, MietteDiagnostic)]
pub enum ResolveError {
    #[error("cannot find package {import_path}: {reason}")]
    #[diagnostic(code(fluentgen::resolve::package_not_found))]
    PackageNotFound {
        import_path: EcoString,
        reason: String,
        /// The importing spec, absent for the root package.
        location: Option<(Utf8PathBuf, Span)>,
    },

    #[error("{path}: {}", first_message(.diagnostics))]
    #[diagnostic(code(fluentgen::resolve::syntax))]
    Syntax {
        path: Utf8PathBuf,
        diagnostics: Vec<Diagnostic>,
    },

    #[error("{path}: found package {found}, expected {expected}")]
    #[diagnostic(code(fluentgen::resolve::mismatched_package))]
    MismatchedPackage {
        path: Utf8PathBuf,
        expected: EcoString,
        found: EcoString,
        span: Span,
    },

    #[error("{path}: {name} redeclared in this block")]
    #[diagnostic(code(fluentgen::resolve::redeclared))]
    Redeclared {
        name: EcoString,
        path: Utf8PathBuf,
        span: Span,
        previous: Utf8PathBuf,
        previous_span: Span,
    },

    #[error("{path}: undefined: {name}")]
    #[diagnostic(code(fluentgen::resolve::undefined))]
    Undefined {
        name: EcoString,
        path: Utf8PathBuf,
        span: Span,
    },

    #[error("{path}: {name} is not a type")]
    #[diagnostic(code(fluentgen::resolve::not_a_type))]
    NotAType {
        name: EcoString,
        path: Utf8PathBuf,
        span: Span,
    },

    #[error("{path}: name {name} not exported by package {package}")]
    #[diagnostic(code(fluentgen::resolve::not_exported))]
    NotExported {
        name: EcoString,
        package: EcoString,
        path: Utf8PathBuf,
        span: Span,
    },

    #[error("{path}: {message}")]
    #[diagnostic(code(fluentgen::resolve::invalid_type))]
    InvalidType {
        message: String,
        path: Utf8PathBuf,
        span: Span,
    },

    #[error("{path}: invalid recursive type {name}")]
    #[diagnostic(code(fluentgen::resolve::recursive_type))]
    RecursiveType {
        name: EcoString,
        path: Utf8PathBuf,
        span: Span,
    },

    #[error("{path}: import cycle not allowed: {}", .cycle.join(" -> "))]
    #[diagnostic(code(fluentgen::resolve::import_cycle))]
    ImportCycle {
        cycle: Vec<EcoString>,
        path: Utf8PathBuf,
        span: Span,
    },

    #[error("invalid module file {path}")]
    #[diagnostic(code(fluentgen::resolve::go_mod))]
    GoMod {
        path: Utf8PathBuf,
        #[source]
        source: module::GoModError,
    },

    #[error("cannot read {path}")]
    #[diagnostic(code(fluentgen::resolve::io))]
    Io {
        path: Utf8PathBuf,
        #[source]
        source: io::Error,
    },
}

fn first_message(diagnostics: &[Diagnostic]) -> &str {
    diagnostics
        .iter()
        .find(|d| d.is_error())
        .or_else(|| diagnostics.first())
        .map_or("syntax error", |d| d.message.as_str())
}

impl ResolveError {
    /// The file and span the error points at, when it has one.
    #[must_use]
    pub fn location(&self) -> Option<(&Utf8Path, Span)> {
        match self {
            Self::PackageNotFound { location, .. } => {
                location.as_ref().map(|(path, span)| (path.as_path(), *span))
            }
            Self::Syntax { path, diagnostics } => diagnostics
                .iter()
                .find(|d| d.is_error())
                .map(|d| (path.as_path(), d.span)),
            Self::MismatchedPackage { path, span, .. }
            | Self::Redeclared { path, span, .. }
            | Self::Undefined { path, span, .. }
            | Self::NotAType { path, span, .. }
            | Self::NotExported { path, span, .. }
            | Self::InvalidType { path, span, .. }
            | Self::RecursiveType { path, span, .. }
            | Self::ImportCycle { path, span, .. } => Some((path.as_path(), *span)),
            Self::GoMod { .. } | Self::Io { .. } => None,
        }
    }
}

/// Returns `true` for file names that belong to a package build: `.go`
/// files that are neither tests nor generated fluent output.
///
/// ```
/// use fluentgen_core::resolve::is_package_source;
///
/// assert!(is_package_source("button.go"));
/// assert!(!is_package_source("button_test.go"));
/// assert!(!is_package_source("button_fluent.go"));
/// assert!(!is_package_source("README.md"));
/// ```
#[must_use]
pub fn is_package_source(file_name: &str) -> bool {
    file_name.ends_with(".go") && !file_name.ends_with("_test.go") && !file_name.contains("fluent")
}

/// Lists the package sources of `dir`, sorted by file name.
///
/// # Errors
///
/// Returns the underlying I/O error when the directory cannot be read.
pub fn package_files(dir: &Utf8Path) -> io::Result<Vec<Utf8PathBuf>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let Ok(name) = entry.file_name().into_string() else {
            continue;
        };
        if is_package_source(&name) {
            files.push(dir.join(name));
        }
    }
    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}
