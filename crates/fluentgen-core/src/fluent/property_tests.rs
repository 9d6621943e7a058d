// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Property-based tests for setter generation.
//!
//! For random `...Style` structs:
//!
//! 1. **One method per eligible field**, in declaration order
//! 2. **Output re-parses cleanly** as methods on the style type
//! 3. **Generation is deterministic**
//! 4. **`reject` fails exactly when an exported field is unsupported**

use camino::Utf8Path;
use proptest::prelude::*;

use super::{GeneratorOptions, UnsupportedTypePolicy, generate_source};
use crate::ast::Declaration;
use crate::source_analysis::parse_source;

const NAMES: &[&str] = &[
    "Color", "Width", "Border", "Margin", "padding", "Bold", "label", "Äther", "Z9",
];

/// `(type text, renderable by the syntax strategy)`
const TYPES: &[(&str, bool)] = &[
    ("int", true),
    ("string", true),
    ("*Border", true),
    ("lipgloss.Color", true),
    ("*bar.Baz", true),
    ("[]int", false),
    ("map[string]int", false),
    ("func() error", false),
    ("chan int", false),
    ("struct{ X int }", false),
];

const EMBEDDED: &[&str] = &["Base", "*Inner", "lipgloss.Style"];

#[derive(Debug, Clone)]
struct Field {
    name: &'static str,
    ty: &'static str,
    supported: bool,
}

impl Field {
    fn is_exported(&self) -> bool {
        self.name.chars().next().is_some_and(char::is_uppercase)
    }
}

fn fields() -> impl Strategy<Value = Vec<Field>> {
    prop::sample::subsequence(NAMES, 0..=NAMES.len()).prop_flat_map(|names| {
        let count = names.len();
        prop::collection::vec(prop::sample::select(TYPES), count).prop_map(move |types| {
            names
                .iter()
                .copied()
                .zip(types)
                .map(|(name, (ty, supported))| Field {
                    name,
                    ty,
                    supported,
                })
                .collect()
        })
    })
}

fn source_for(fields: &[Field], embedded: &[&str]) -> String {
    let mut source = String::from("package ui\n\ntype PanelStyle struct {\n");
    for field in fields {
        source.push_str(&format!("\t// {} doc.\n\t{} {}\n", field.name, field.name, field.ty));
    }
    for ty in embedded {
        source.push_str(&format!("\t{ty}\n"));
    }
    source.push_str("}\n");
    source
}

fn eligible(fields: &[Field]) -> Vec<&'static str> {
    fields
        .iter()
        .filter(|f| f.is_exported() && f.supported)
        .map(|f| f.name)
        .collect()
}

proptest! {
    #[test]
    fn one_method_per_eligible_field(
        fields in fields(),
        embedded in prop::sample::subsequence(EMBEDDED, 0..=EMBEDDED.len()),
    ) {
        let source = source_for(&fields, &embedded);
        let output = generate_source(Utf8Path::new("panel.go"), &source, &GeneratorOptions::default())
            .expect("skip policy never fails on valid input");
        let generated: Vec<&str> = output.fragments.iter().map(|f| f.field.as_str()).collect();
        prop_assert_eq!(generated, eligible(&fields));

        let skipped: Vec<&str> = output.skipped.iter().map(|s| s.field.as_str()).collect();
        let expected: Vec<&str> = fields
            .iter()
            .filter(|f| f.is_exported() && !f.supported)
            .map(|f| f.name)
            .collect();
        prop_assert_eq!(skipped, expected);
    }

    #[test]
    fn output_reparses_as_methods(fields in fields()) {
        let source = source_for(&fields, &[]);
        let output = generate_source(Utf8Path::new("panel.go"), &source, &GeneratorOptions::default())
            .expect("generates");
        let rendered = output.render();
        let (file, diagnostics) = parse_source(&rendered);
        prop_assert!(diagnostics.is_empty(), "{diagnostics:?}\n{rendered}");
        prop_assert_eq!(file.package.name.as_str(), "ui");

        let mut methods = Vec::new();
        for declaration in &file.declarations {
            let Declaration::Func(func) = declaration else {
                return Err(TestCaseError::fail(format!("unexpected declaration in\n{rendered}")));
            };
            let receiver = func.receiver.as_ref().map(|r| r.name.as_str());
            prop_assert_eq!(receiver, Some("PanelStyle"));
            methods.push(func.name.name.to_string());
        }
        let expected: Vec<String> = eligible(&fields).iter().map(|f| format!("With{f}")).collect();
        prop_assert_eq!(methods, expected);
    }

    #[test]
    fn generation_is_deterministic(fields in fields()) {
        let source = source_for(&fields, &[]);
        let options = GeneratorOptions::default();
        let first = generate_source(Utf8Path::new("panel.go"), &source, &options).expect("generates");
        let second = generate_source(Utf8Path::new("panel.go"), &source, &options).expect("generates");
        prop_assert_eq!(first.render(), second.render());
    }

    #[test]
    fn reject_fails_only_on_unsupported_exported_fields(fields in fields()) {
        let source = source_for(&fields, &[]);
        let options = GeneratorOptions {
            unsupported: UnsupportedTypePolicy::Reject,
            ..GeneratorOptions::default()
        };
        let result = generate_source(Utf8Path::new("panel.go"), &source, &options);
        let should_fail = fields.iter().any(|f| f.is_exported() && !f.supported);
        prop_assert_eq!(result.is_err(), should_fail);
    }
}
