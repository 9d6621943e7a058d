// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Whole-pipeline tests: discover, scan, extract, render, emit.

use std::fs;

use camino::{Utf8Path, Utf8PathBuf};
use tempfile::TempDir;

use super::*;
use crate::resolve::ResolveError;

const BUTTON: &str = "package ui

import \"github.com/charmbracelet/lipgloss\"

// ButtonStyle styles a button.
type ButtonStyle struct {
\t// Color of the border.
\tColor  string
\tBorder *lipgloss.Border
\tlabel  string
\tlipgloss.Style
}
";

struct Package {
    _temp: TempDir,
    dir: Utf8PathBuf,
}

impl Package {
    fn new(files: &[(&str, &str)]) -> Self {
        let temp = TempDir::new().unwrap();
        let dir = Utf8PathBuf::from_path_buf(temp.path().join("ui")).unwrap();
        fs::create_dir(&dir).unwrap();
        for (name, contents) in files {
            fs::write(dir.join(name), contents).unwrap();
        }
        Self { _temp: temp, dir }
    }

    fn run(&self, options: &GeneratorOptions) -> Generation {
        self.run_path(&self.dir, options)
    }

    fn run_path(&self, path: &Utf8Path, options: &GeneratorOptions) -> Generation {
        let input = Input::discover(path).unwrap();
        generate(&input, options, &ImportLocator::default())
    }
}

fn resolve() -> GeneratorOptions {
    GeneratorOptions {
        strategy: Strategy::Resolve,
        ..GeneratorOptions::default()
    }
}

#[test]
fn button_style() {
    let package = Package::new(&[("button.go", BUTTON)]);
    let generation = package.run(&GeneratorOptions::default());
    assert!(generation.is_success());
    insta::assert_snapshot!(generation.result.render(), @r"
    package ui

    // WithColor of the border.
    func (style ButtonStyle) WithColor(s string) ButtonStyle {
    	style.Color = s
    	return style
    }

    func (style ButtonStyle) WithBorder(l *lipgloss.Border) ButtonStyle {
    	style.Border = l
    	return style
    }
    ");
}

#[test]
fn no_candidates_yields_package_clause() {
    let package = Package::new(&[(
        "plain.go",
        "package ui\n\ntype Plain struct{ X int }\n\ntype Styles []int\n",
    )]);
    let generation = package.run(&GeneratorOptions::default());
    assert!(generation.is_success());
    assert_eq!(generation.result.render(), "package ui\n");
    assert_eq!(generation.result.method_count(), 0);
}

#[test]
fn empty_directory_uses_directory_name() {
    let package = Package::new(&[]);
    let generation = package.run(&GeneratorOptions::default());
    assert!(generation.is_success());
    assert_eq!(generation.result.render(), "package ui\n");
}

#[test]
fn malformed_file_fails_alone() {
    let package = Package::new(&[
        ("a.go", "package ui\n\ntype AStyle struct {\n\tWidth int\n}\n"),
        ("b.go", "package ui\n\ntype BStyle struct {\n\tHeight\n"),
        ("c.go", "package ui\n\ntype CStyle struct {\n\tDepth int\n}\n"),
    ]);
    let generation = package.run(&GeneratorOptions::default());
    assert!(!generation.is_success());
    assert_eq!(generation.failures.len(), 1);
    let (path, _) = generation.failures[0].location().unwrap();
    assert_eq!(path.file_name(), Some("b.go"));

    let rendered = generation.result.render();
    assert!(rendered.contains("func (style AStyle) WithWidth(i int) AStyle {"));
    assert!(rendered.contains("func (style CStyle) WithDepth(i int) CStyle {"));
}

#[test]
fn malformed_file_fails_the_whole_package_when_resolving() {
    let package = Package::new(&[
        ("a.go", "package ui\n\ntype AStyle struct {\n\tWidth int\n}\n"),
        ("b.go", "package ui\n\ntype BStyle struct {\n\tHeight\n"),
    ]);
    let generation = package.run(&resolve());
    assert_eq!(generation.failures.len(), 1);
    assert!(matches!(
        generation.failures[0],
        GenerateError::Resolution(ResolveError::Syntax { .. })
    ));
    assert_eq!(generation.result.render(), "package ui\n");
}

#[test]
fn generated_files_are_not_inputs() {
    let package = Package::new(&[("button.go", BUTTON)]);
    let first = package.run(&GeneratorOptions::default());
    for file in &first.result.files {
        fs::write(file.fluent_path(), file.render()).unwrap();
    }
    assert!(package.dir.join("button_fluent.go").exists());

    let second = package.run(&GeneratorOptions::default());
    assert_eq!(second.result.render(), first.result.render());
    assert_eq!(second.result.files.len(), 1);
}

#[test]
fn test_files_are_not_inputs() {
    let package = Package::new(&[
        ("a.go", "package ui\n\ntype AStyle struct{ Width int }\n"),
        ("a_test.go", "package ui\n\ntype TestStyle struct{ Case string }\n"),
    ]);
    let rendered = package.run(&GeneratorOptions::default()).result.render();
    assert!(rendered.contains("WithWidth"));
    assert!(!rendered.contains("WithCase"));
}

#[test]
fn files_in_name_order() {
    let package = Package::new(&[
        ("z.go", "package ui\n\ntype ZStyle struct{ Z int }\n"),
        ("a.go", "package ui\n\ntype AStyle struct{ A int }\n"),
    ]);
    let rendered = package.run(&GeneratorOptions::default()).result.render();
    let a = rendered.find("WithA").unwrap();
    let z = rendered.find("WithZ").unwrap();
    assert!(a < z);
}

#[test]
fn grouped_fields_and_qualified_pointer() {
    let package = Package::new(&[(
        "box.go",
        "package ui\n\nimport \"example.com/bar\"\n\ntype BoxStyle struct {\n\tTop, Bottom int\n\tShadow *bar.Baz\n}\n",
    )]);
    let rendered = package.run(&GeneratorOptions::default()).result.render();
    insta::assert_snapshot!(rendered, @r"
    package ui

    func (style BoxStyle) WithTop(i int) BoxStyle {
    	style.Top = i
    	return style
    }

    func (style BoxStyle) WithBottom(i int) BoxStyle {
    	style.Bottom = i
    	return style
    }

    func (style BoxStyle) WithShadow(b *bar.Baz) BoxStyle {
    	style.Shadow = b
    	return style
    }
    ");
}

#[test]
fn qualified_types_name_the_argument_after_the_package() {
    let package = Package::new(&[(
        "timer.go",
        "package ui\n\nimport (\n\t\"time\"\n\n\t\"github.com/charmbracelet/lipgloss\"\n)\n\ntype TimerStyle struct {\n\tBorder *lipgloss.Border\n\tDur    time.Duration\n}\n",
    )]);
    let rendered = package.run(&GeneratorOptions::default()).result.render();
    assert!(rendered.contains("func (style TimerStyle) WithBorder(l *lipgloss.Border) TimerStyle {\n\tstyle.Border = l\n"));
    assert!(rendered.contains("func (style TimerStyle) WithDur(t time.Duration) TimerStyle {\n\tstyle.Dur = t\n"));
}

#[test]
fn resolve_rejects_struct_containing_itself() {
    let package = Package::new(&[(
        "a.go",
        "package ui\n\ntype AStyle struct {\n\tSelf AStyle\n}\n",
    )]);
    let generation = package.run(&resolve());
    assert_eq!(generation.failures.len(), 1);
    assert!(matches!(
        generation.failures[0],
        GenerateError::Resolution(ResolveError::RecursiveType { .. })
    ));
    assert_eq!(generation.result.render(), "package ui\n");
}

#[test]
fn custom_suffix_and_receiver() {
    let package = Package::new(&[(
        "opts.go",
        "package ui\n\ntype ListOpts struct{ Limit int }\n\ntype ButtonStyle struct{ Color string }\n",
    )]);
    let options = GeneratorOptions {
        suffix: Suffix::new("Opts").unwrap(),
        receiver: "o".into(),
        ..GeneratorOptions::default()
    };
    let rendered = package.run(&options).result.render();
    assert!(rendered.contains("func (o ListOpts) WithLimit(i int) ListOpts {\n\to.Limit = i\n\treturn o\n}"));
    assert!(!rendered.contains("ButtonStyle"));
}

#[test]
fn unsupported_fields_are_skipped_then_rejected() {
    let source = "package ui\n\ntype ListStyle struct {\n\tItems []string\n\tWidth int\n}\n";
    let package = Package::new(&[("list.go", source)]);

    let generation = package.run(&GeneratorOptions::default());
    assert!(generation.is_success());
    assert_eq!(generation.result.method_count(), 1);
    let skipped = &generation.result.files[0].skipped;
    assert_eq!(skipped.len(), 1);
    assert_eq!(skipped[0].field, "Items");
    assert_eq!(&source[skipped[0].span.as_range()], "Items");

    let options = GeneratorOptions {
        unsupported: UnsupportedTypePolicy::Reject,
        ..GeneratorOptions::default()
    };
    let generation = package.run(&options);
    assert_eq!(generation.failures.len(), 1);
    assert_eq!(
        generation.failures[0].to_string(),
        format!(
            "{}: field ListStyle.Items has unsupported type []string (slice)",
            package.dir.join("list.go")
        )
    );
}

#[test]
fn strategies_agree_on_simple_types() {
    let package = Package::new(&[
        ("button.go", "package ui\n\ntype ButtonStyle struct {\n\t// Color of the border.\n\tColor string\n\tBorder *Border\n}\n"),
        ("border.go", "package ui\n\ntype Border struct{ Width int }\n"),
    ]);
    let syntax = package.run(&GeneratorOptions::default());
    let resolved = package.run(&resolve());
    assert!(syntax.is_success());
    assert!(resolved.is_success());
    assert_eq!(syntax.result.render(), resolved.result.render());
}

#[test]
fn resolve_renders_composite_types() {
    let package = Package::new(&[(
        "list.go",
        "package ui\n\ntype Item struct{ Name string }\n\ntype ListStyle struct {\n\tItems   []string\n\tOnPick  func(int) error\n\tLookup  map[string]*Item\n\tCursor  struct{ Row, Col int }\n}\n",
    )]);
    let generation = package.run(&resolve());
    assert!(generation.is_success());
    insta::assert_snapshot!(generation.result.render(), @r"
    package ui

    func (style ListStyle) WithItems(s []string) ListStyle {
    	style.Items = s
    	return style
    }

    func (style ListStyle) WithOnPick(f func(int) error) ListStyle {
    	style.OnPick = f
    	return style
    }

    func (style ListStyle) WithLookup(m map[string]*Item) ListStyle {
    	style.Lookup = m
    	return style
    }

    func (style ListStyle) WithCursor(s struct{Row int; Col int}) ListStyle {
    	style.Cursor = s
    	return style
    }
    ");
}

#[test]
fn resolve_follows_defined_types() {
    let package = Package::new(&[
        ("base.go", "package ui\n\ntype base struct {\n\t// Pad is the padding.\n\tPad int\n}\n"),
        ("panel.go", "package ui\n\ntype PanelStyle base\n\ntype AliasStyle = base\n"),
    ]);
    let syntax = package.run(&GeneratorOptions::default());
    assert_eq!(syntax.result.method_count(), 0);

    let resolved = package.run(&resolve());
    assert!(resolved.is_success());
    insta::assert_snapshot!(resolved.result.render(), @r"
    package ui

    // WithPad is the padding.
    func (style PanelStyle) WithPad(i int) PanelStyle {
    	style.Pad = i
    	return style
    }
    ");
}

#[test]
fn resolve_single_file_sees_the_package() {
    let package = Package::new(&[
        ("button.go", "package ui\n\ntype ButtonStyle struct{ Border Border }\n"),
        ("border.go", "package ui\n\ntype Border struct{ Width int }\n\ntype BorderStyle struct{ Width int }\n"),
    ]);
    let generation = package.run_path(&package.dir.join("button.go"), &resolve());
    assert!(generation.is_success());
    assert_eq!(generation.result.files.len(), 1);
    let rendered = generation.result.render();
    assert!(rendered.contains("func (style ButtonStyle) WithBorder(b Border) ButtonStyle {"));
    assert!(!rendered.contains("BorderStyle"));
}

#[test]
fn resolve_reports_undefined_types() {
    let package = Package::new(&[("a.go", "package ui\n\ntype AStyle struct{ Color Colour }\n")]);
    let generation = package.run(&resolve());
    assert_eq!(generation.failures.len(), 1);
    assert!(generation.failures[0].to_string().ends_with("undefined: Colour"));
}

#[test]
fn invalid_receiver_is_a_single_failure() {
    let package = Package::new(&[("button.go", BUTTON)]);
    let options = GeneratorOptions {
        receiver: "type".into(),
        ..GeneratorOptions::default()
    };
    let generation = package.run(&options);
    assert_eq!(generation.failures.len(), 1);
    assert!(matches!(
        generation.failures[0],
        GenerateError::InvalidOption { option: "receiver", .. }
    ));
    assert_eq!(generation.result.render(), "package ui\n");
}
