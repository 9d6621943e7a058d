// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Declaration discovery.
//!
//! A [`DeclarationScanner`] finds the struct types whose name ends with the
//! configured [`Suffix`] and describes their direct fields. Two strategies
//! implement it:
//!
//! - [`SyntaxScanner`] looks at one parsed file. Only literal
//!   `struct { ... }` declarations qualify, and field types are rendered
//!   from source: a bare or package-qualified name, optionally behind one
//!   `*`. Anything else is [`TypeSignature::Unsupported`].
//! - [`ResolvedScanner`] looks at a resolved package. Any defined type
//!   whose underlying type is a struct qualifies, and every field type is
//!   rendered canonically.

use camino::Utf8Path;
use tracing::debug;

use super::model::{CandidateType, FieldSpec, TypeSignature};
use super::{Strategy, Suffix};
use crate::ast::{Declaration, FieldDecl, SourceFile, TypeExpr, is_exported};
use crate::resolve::{DefinitionKind, ResolvedPackage};

/// Finds candidate types.
pub trait DeclarationScanner {
    /// Candidates in declaration order.
    fn scan(&self, suffix: &Suffix) -> Vec<CandidateType>;

    fn strategy(&self) -> Strategy;
}

/// Scans one parsed file.
#[derive(Debug, Clone, Copy)]
pub struct SyntaxScanner<'a> {
    path: &'a Utf8Path,
    file: &'a SourceFile,
}

impl<'a> SyntaxScanner<'a> {
    #[must_use]
    pub fn new(path: &'a Utf8Path, file: &'a SourceFile) -> Self {
        Self { path, file }
    }
}

impl DeclarationScanner for SyntaxScanner<'_> {
    fn scan(&self, suffix: &Suffix) -> Vec<CandidateType> {
        let mut candidates = Vec::new();
        for declaration in &self.file.declarations {
            let Declaration::Type(spec) = declaration else {
                continue;
            };
            if !suffix.matches(&spec.name.name) {
                continue;
            }
            let TypeExpr::Struct(st) = spec.ty.unparen() else {
                debug!(name = %spec.name.name, shape = %spec.ty.shape(), "skipping non-struct type");
                continue;
            };
            if spec.is_alias || !spec.type_params.is_empty() {
                debug!(name = %spec.name.name, "skipping alias or generic type");
                continue;
            }
            candidates.push(CandidateType {
                name: spec.name.clone(),
                path: self.path.to_path_buf(),
                fields: st.fields.iter().flat_map(syntax_fields).collect(),
            });
        }
        candidates
    }

    fn strategy(&self) -> Strategy {
        Strategy::Syntax
    }
}

fn syntax_fields(decl: &FieldDecl) -> Vec<FieldSpec> {
    let type_signature = syntax_signature(&decl.ty);
    if decl.is_embedded() {
        let identifier = decl
            .ty
            .embedded_name()
            .map_or_else(|| decl.ty.to_string().into(), |name| name.name.clone());
        return vec![FieldSpec {
            is_exported: is_exported(&identifier),
            identifier,
            type_signature,
            doc_comment: decl.doc.clone(),
            is_embedded: true,
            span: decl.ty.span(),
        }];
    }
    decl.names
        .iter()
        .map(|name| FieldSpec {
            identifier: name.name.clone(),
            type_signature: type_signature.clone(),
            doc_comment: decl.doc.clone(),
            is_embedded: false,
            is_exported: name.is_exported(),
            span: name.span,
        })
        .collect()
}

/// Renders a named type, optionally behind a single `*`.
fn syntax_signature(ty: &TypeExpr) -> TypeSignature {
    let (prefix, base) = match ty {
        TypeExpr::Pointer { elem, .. } => ("*", elem.as_ref()),
        other => ("", other),
    };
    match base {
        TypeExpr::Name(_) | TypeExpr::Qualified { .. } => {
            TypeSignature::Rendered(format!("{prefix}{base}"))
        }
        _ => TypeSignature::Unsupported {
            shape: base.shape(),
            text: ty.to_string(),
        },
    }
}

/// Scans a resolved package, optionally restricted to one of its files.
#[derive(Debug, Clone, Copy)]
pub struct ResolvedScanner<'a> {
    package: &'a ResolvedPackage,
    file: Option<usize>,
}

impl<'a> ResolvedScanner<'a> {
    #[must_use]
    pub fn new(package: &'a ResolvedPackage) -> Self {
        Self {
            package,
            file: None,
        }
    }

    /// Restricts scanning to the file at `index` in the package's files.
    #[must_use]
    pub fn for_file(package: &'a ResolvedPackage, index: usize) -> Self {
        Self {
            package,
            file: Some(index),
        }
    }
}

impl DeclarationScanner for ResolvedScanner<'_> {
    fn scan(&self, suffix: &Suffix) -> Vec<CandidateType> {
        let package = self.package;
        let mut candidates = Vec::new();
        for definition in &package.definitions {
            if self.file.is_some_and(|file| file != definition.file) {
                continue;
            }
            let name = &definition.name.name;
            if !suffix.matches(name) {
                continue;
            }
            if definition.kind == DefinitionKind::Alias || definition.is_generic() {
                debug!(%name, "skipping alias or generic type");
                continue;
            }
            let Some(st) = definition.underlying.as_ref().and_then(|u| u.as_struct()) else {
                debug!(%name, "skipping type whose underlying type is not a struct");
                continue;
            };
            let fields = st
                .fields
                .iter()
                .map(|field| FieldSpec {
                    identifier: field.name.clone(),
                    type_signature: TypeSignature::Rendered(
                        field.ty.qualified(&package.id).to_string(),
                    ),
                    doc_comment: field.doc.clone(),
                    is_embedded: field.embedded,
                    is_exported: is_exported(&field.name),
                    span: field.span,
                })
                .collect();
            candidates.push(CandidateType {
                name: definition.name.clone(),
                path: package.files[definition.file].path.clone(),
                fields,
            });
        }
        candidates
    }

    fn strategy(&self) -> Strategy {
        Strategy::Resolve
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::TypeShape;
    use crate::source_analysis::parse_source;

    fn scan(source: &str) -> Vec<CandidateType> {
        let (file, diagnostics) = parse_source(source);
        assert!(diagnostics.is_empty(), "{diagnostics:?}");
        SyntaxScanner::new(Utf8Path::new("a.go"), &file).scan(&Suffix::default())
    }

    #[test]
    fn finds_suffixed_structs_in_order() {
        let candidates = scan(
            "package p\n\ntype LabelStyle struct{}\ntype Button struct{}\ntype (\n\tBorderStyle struct{ W int }\n\tModeStyle int\n\tAliasStyle = LabelStyle\n\tListStyle[T any] struct{ Items []T }\n)\n",
        );
        let names: Vec<_> = candidates.iter().map(|c| c.name.name.as_str()).collect();
        assert_eq!(names, ["LabelStyle", "BorderStyle"]);
        assert_eq!(candidates[1].path, "a.go");
    }

    #[test]
    fn suffix_match_is_case_sensitive() {
        let candidates = scan("package p\n\ntype Lifestyle struct{}\ntype STYLE struct{}\n");
        assert!(candidates.is_empty());
    }

    #[test]
    fn field_specs_cover_every_name_and_shape() {
        let candidates = scan(
            "package p\n\ntype CardStyle struct {\n\t// Width and height.\n\tW, H int\n\tBorder *lipgloss.Border\n\tTags []string\n\thidden bool\n\t*Base\n}\n",
        );
        let fields = &candidates[0].fields;
        let summary: Vec<_> = fields
            .iter()
            .map(|f| (f.identifier.as_str(), f.type_signature.text(), f.is_exported, f.is_embedded))
            .collect();
        assert_eq!(
            summary,
            [
                ("W", "int", true, false),
                ("H", "int", true, false),
                ("Border", "*lipgloss.Border", true, false),
                ("Tags", "[]string", true, false),
                ("hidden", "bool", false, false),
                ("Base", "*Base", true, true),
            ]
        );
        assert_eq!(fields[1].doc_comment.as_deref(), Some("Width and height."));
        assert_eq!(
            fields[3].type_signature,
            TypeSignature::Unsupported {
                shape: TypeShape::Slice,
                text: "[]string".into()
            }
        );
    }

    #[test]
    fn resolved_scanner_sees_defined_struct_types() {
        let temp = tempfile::TempDir::new().unwrap();
        let dir = camino::Utf8PathBuf::from_path_buf(temp.path().to_path_buf()).unwrap();
        std::fs::write(
            dir.join("a.go"),
            "package p\n\ntype base struct {\n\tItems []string\n\tembedded\n}\n\ntype embedded struct{}\n\ntype PanelStyle base\ntype ModeStyle int\ntype AliasStyle = base\n",
        )
        .unwrap();
        let package = crate::resolve::Loader::new(crate::resolve::ImportLocator::default())
            .load(&dir)
            .unwrap();

        let scanner = ResolvedScanner::new(&package);
        assert_eq!(scanner.strategy(), Strategy::Resolve);
        let candidates = scanner.scan(&Suffix::default());
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].name.name, "PanelStyle");
        let fields: Vec<_> = candidates[0]
            .fields
            .iter()
            .map(|f| (f.identifier.as_str(), f.type_signature.text(), f.is_embedded))
            .collect();
        assert_eq!(
            fields,
            [("Items", "[]string", false), ("embedded", "embedded", true)]
        );
    }

    #[test]
    fn double_pointer_is_unsupported() {
        let candidates = scan("package p\n\ntype XStyle struct{ P **int }\n");
        assert!(matches!(
            candidates[0].fields[0].type_signature,
            TypeSignature::Unsupported {
                shape: TypeShape::Pointer,
                ..
            }
        ));
    }
}
