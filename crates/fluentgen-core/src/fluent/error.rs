// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Error types for fluent setter generation.

use std::io;

use camino::{Utf8Path, Utf8PathBuf};
use ecow::EcoString;
use miette::Diagnostic as MietteDiagnostic;
use thiserror::Error;

use crate::ast::TypeShape;
use crate::resolve::ResolveError;
use crate::source_analysis::{Diagnostic, Span};

/// Errors that can occur while generating setters.
#[derive(Debug, Error, MietteDiagnostic)]
pub enum GenerateError {
    /// The file does not parse.
    #[error("{path}: {}", first_error(.diagnostics))]
    #[diagnostic(code(fluentgen::syntax))]
    Syntax {
        path: Utf8PathBuf,
        diagnostics: Vec<Diagnostic>,
    },

    /// The package could not be loaded or type-checked.
    #[error(transparent)]
    #[diagnostic(transparent)]
    Resolution(#[from] ResolveError),

    /// A field type the syntax strategy cannot render, under
    /// [`UnsupportedTypePolicy::Reject`](super::UnsupportedTypePolicy::Reject).
    #[error("{path}: field {type_name}.{field} has unsupported type {text} ({shape})")]
    #[diagnostic(
        code(fluentgen::unsupported_field_type),
        help("use --strategy resolve, or --unsupported skip to leave the field out")
    )]
    UnsupportedFieldType {
        path: Utf8PathBuf,
        type_name: EcoString,
        field: EcoString,
        shape: TypeShape,
        text: String,
        span: Span,
    },

    /// A method could not be rendered.
    #[error("cannot render setter for {type_name}.{field}: {reason}")]
    #[diagnostic(code(fluentgen::template))]
    TemplateRender {
        type_name: EcoString,
        field: EcoString,
        reason: String,
    },

    /// A generator option is out of range.
    #[error("invalid {option}: {reason}")]
    #[diagnostic(code(fluentgen::options))]
    InvalidOption {
        option: &'static str,
        reason: String,
    },

    #[error("cannot read {path}")]
    #[diagnostic(code(fluentgen::io))]
    Io {
        path: Utf8PathBuf,
        #[source]
        source: io::Error,
    },
}

fn first_error(diagnostics: &[Diagnostic]) -> &str {
    diagnostics
        .iter()
        .find(|d| d.is_error())
        .map_or("syntax error", |d| d.message.as_str())
}

impl GenerateError {
    /// The file and span the error points at, when it has one.
    #[must_use]
    pub fn location(&self) -> Option<(&Utf8Path, Span)> {
        match self {
            Self::Syntax { path, diagnostics } => diagnostics
                .iter()
                .find(|d| d.is_error())
                .map(|d| (path.as_path(), d.span)),
            Self::Resolution(err) => err.location(),
            Self::UnsupportedFieldType { path, span, .. } => Some((path.as_path(), *span)),
            Self::TemplateRender { .. } | Self::InvalidOption { .. } | Self::Io { .. } => None,
        }
    }
}

/// Result alias for generation.
pub type Result<T> = std::result::Result<T, GenerateError>;
