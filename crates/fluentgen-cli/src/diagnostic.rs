// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Error diagnostics with source context using miette.
//!
//! Generator errors that carry a file location are re-read from disk and
//! rendered with a labelled snippet; skipped fields become warnings.

// Suppress unused_assignments for struct fields used by derive macros
#![allow(unused_assignments)]

use camino::Utf8Path;
use fluentgen_core::fluent::{GenerateError, SkippedField};
use fluentgen_core::resolve::ResolveError;
use fluentgen_core::source_analysis::Span;
use miette::{Diagnostic, SourceSpan};

/// A generation failure pointing into a source file.
#[derive(Debug, Diagnostic, thiserror::Error)]
#[error("{message}")]
#[diagnostic(code(fluentgen::generate))]
pub struct SourceDiagnostic {
    pub message: String,
    #[source_code]
    pub src: miette::NamedSource<String>,
    #[label("{label}")]
    pub span: SourceSpan,
    pub label: String,
    #[help]
    pub help: Option<String>,
}

/// A field that was left out of the generated output.
#[derive(Debug, Diagnostic, thiserror::Error)]
#[error("{type_name}.{field} skipped: unsupported type {text} ({shape})")]
#[diagnostic(
    code(fluentgen::skipped_field),
    severity(Warning),
    help("use --strategy resolve to generate setters for any field type")
)]
pub struct SkippedFieldWarning {
    pub type_name: String,
    pub field: String,
    pub text: String,
    pub shape: String,
    #[source_code]
    pub src: miette::NamedSource<String>,
    #[label("not generated")]
    pub span: SourceSpan,
}

impl SourceDiagnostic {
    /// Builds a diagnostic for `error` if it has a location in `source`.
    pub fn from_error(error: &GenerateError, source_path: &Utf8Path, source: &str) -> Option<Self> {
        let (path, span) = error.location()?;
        if path != source_path {
            return None;
        }
        Some(Self {
            message: error.to_string(),
            src: miette::NamedSource::new(source_path.as_str(), source.to_string()),
            span: clamp(span, source),
            label: "error here".to_string(),
            help: hint(error),
        })
    }
}

impl SkippedFieldWarning {
    pub fn new(skipped: &SkippedField, source: &str) -> Self {
        Self {
            type_name: skipped.type_name.to_string(),
            field: skipped.field.to_string(),
            text: skipped.text.clone(),
            shape: skipped.shape.to_string(),
            src: miette::NamedSource::new(skipped.path.as_str(), source.to_string()),
            span: clamp(skipped.span, source),
        }
    }
}

/// Parser hint for syntax errors, the error's own help otherwise.
fn hint(error: &GenerateError) -> Option<String> {
    let diagnostics = match error {
        GenerateError::Syntax { diagnostics, .. }
        | GenerateError::Resolution(ResolveError::Syntax { diagnostics, .. }) => diagnostics,
        other => return other.help().map(|help| help.to_string()),
    };
    diagnostics
        .iter()
        .find(|d| d.is_error())
        .and_then(|d| d.hint.as_ref())
        .map(ToString::to_string)
}

/// Keeps the label inside `source` when the file changed since parsing.
fn clamp(span: Span, source: &str) -> SourceSpan {
    let len = source.len();
    let start = (span.start() as usize).min(len);
    let end = (span.end() as usize).clamp(start, len);
    (start, end - start).into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino::Utf8PathBuf;
    use fluentgen_core::ast::TypeShape;
    use fluentgen_core::source_analysis::Diagnostic as CoreDiagnostic;

    #[test]
    fn syntax_error_carries_span_and_hint() {
        let source = "package ui\n\ntype AStyle struct {\n";
        let error = GenerateError::Syntax {
            path: "ui/a.go".into(),
            diagnostics: vec![
                CoreDiagnostic::error("expected }", Span::new(33, 33)).with_hint("close the struct"),
            ],
        };
        let diag = SourceDiagnostic::from_error(&error, Utf8Path::new("ui/a.go"), source).unwrap();
        assert_eq!(diag.message, "ui/a.go: expected }");
        assert_eq!(diag.span.offset(), 33);
        assert_eq!(diag.span.len(), 0);
        assert_eq!(diag.label, "error here");
        assert_eq!(diag.help.as_deref(), Some("close the struct"));
    }

    #[test]
    fn unsupported_field_uses_error_help() {
        let source = "package ui\n\ntype AStyle struct{ F []int }\n";
        let error = GenerateError::UnsupportedFieldType {
            path: "a.go".into(),
            type_name: "AStyle".into(),
            field: "F".into(),
            shape: TypeShape::Slice,
            text: "[]int".to_string(),
            span: Span::new(34, 39),
        };
        let diag = SourceDiagnostic::from_error(&error, Utf8Path::new("a.go"), source).unwrap();
        assert_eq!(diag.span.offset(), 34);
        assert_eq!(diag.span.len(), 5);
        assert!(diag.help.unwrap().contains("--strategy resolve"));
    }

    #[test]
    fn errors_without_location_have_no_snippet() {
        let error = GenerateError::InvalidOption {
            option: "receiver",
            reason: "bad".to_string(),
        };
        assert!(SourceDiagnostic::from_error(&error, Utf8Path::new("a.go"), "").is_none());
    }

    #[test]
    fn location_in_another_file_is_ignored() {
        let error = GenerateError::Syntax {
            path: "b.go".into(),
            diagnostics: vec![CoreDiagnostic::error("oops", Span::new(0, 1))],
        };
        assert!(SourceDiagnostic::from_error(&error, Utf8Path::new("a.go"), "x").is_none());
    }

    #[test]
    fn span_is_clamped_to_source() {
        let span = clamp(Span::new(8, 40), "package x");
        assert_eq!(span.offset(), 8);
        assert_eq!(span.len(), 1);
        let span = clamp(Span::new(50, 60), "package x");
        assert_eq!(span.offset(), 9);
        assert_eq!(span.len(), 0);
    }

    #[test]
    fn skipped_field_warning() {
        let source = "package ui\n\ntype AStyle struct{ F []int }\n";
        let skipped = SkippedField {
            path: Utf8PathBuf::from("a.go"),
            type_name: "AStyle".into(),
            field: "F".into(),
            shape: TypeShape::Slice,
            text: "[]int".to_string(),
            span: Span::new(34, 39),
        };
        let warning = SkippedFieldWarning::new(&skipped, source);
        assert_eq!(warning.severity(), Some(miette::Severity::Warning));
        assert_eq!(warning.span.offset(), 34);
        assert_eq!(warning.field, "F");
    }
}
