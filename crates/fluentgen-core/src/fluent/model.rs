// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Values passed between the generation stages.

use camino::Utf8PathBuf;
use ecow::EcoString;

use crate::ast::{Identifier, TypeShape};
use crate::source_analysis::Span;

/// A struct declaration whose name matches the suffix.
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateType {
    pub name: Identifier,
    /// The file declaring the type.
    pub path: Utf8PathBuf,
    /// Direct fields in declaration order, one per declared name.
    pub fields: Vec<FieldSpec>,
}

/// One struct field as seen by a scanner.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSpec {
    /// The field name; for embedded fields the embedded type's name.
    pub identifier: EcoString,
    pub type_signature: TypeSignature,
    pub doc_comment: Option<String>,
    pub is_embedded: bool,
    pub is_exported: bool,
    pub span: Span,
}

/// The rendered type of a field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeSignature {
    /// Text usable verbatim in generated code.
    Rendered(String),
    /// A shape the scanner does not render; `text` is the source
    /// rendering, for diagnostics only.
    Unsupported { shape: TypeShape, text: String },
}

impl TypeSignature {
    /// The type text, rendered or not.
    #[must_use]
    pub fn text(&self) -> &str {
        match self {
            Self::Rendered(text) | Self::Unsupported { text, .. } => text,
        }
    }
}

/// A field that receives a setter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EligibleField {
    pub name: EcoString,
    /// Rendered parameter type.
    pub signature: String,
    /// Trimmed doc text, `None` when absent or blank.
    pub doc: Option<String>,
}

/// A field left out because its type cannot be rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedField {
    pub path: Utf8PathBuf,
    pub type_name: EcoString,
    pub field: EcoString,
    pub shape: TypeShape,
    pub text: String,
    pub span: Span,
}

/// A candidate reduced to the fields that get setters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedType {
    pub name: EcoString,
    pub fields: Vec<EligibleField>,
    pub skipped: Vec<SkippedField>,
}

/// Source of one setter method, ending with one blank line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodFragment {
    pub type_name: EcoString,
    pub field: EcoString,
    pub source: String,
}

/// Setters generated for one source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileOutput {
    pub path: Utf8PathBuf,
    pub package: EcoString,
    /// Declaration order.
    pub fragments: Vec<MethodFragment>,
    pub skipped: Vec<SkippedField>,
}

/// Setters for every processed file of one package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationResult {
    pub package: EcoString,
    /// File enumeration order.
    pub files: Vec<FileOutput>,
}
