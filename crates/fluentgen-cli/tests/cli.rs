// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! End-to-end tests for the `fluentgen` binary.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use tempfile::TempDir;

const BUTTON: &str = "package ui

import \"github.com/charmbracelet/lipgloss\"

type ButtonStyle struct {
\t// Color of the border.
\tColor  string
\tBorder *lipgloss.Border
\tlabel  string
}
";

fn package(files: &[(&str, &str)]) -> (TempDir, PathBuf) {
    let temp = TempDir::new().unwrap();
    let dir = temp.path().join("ui");
    fs::create_dir(&dir).unwrap();
    for (name, contents) in files {
        fs::write(dir.join(name), contents).unwrap();
    }
    (temp, dir)
}

fn fluentgen(args: &[&str], path: &Path) -> Output {
    Command::new(env!("CARGO_BIN_EXE_fluentgen"))
        .args(args)
        .arg(path)
        .env_remove("RUST_LOG")
        .output()
        .unwrap()
}

fn stdout(output: &Output) -> String {
    String::from_utf8(output.stdout.clone()).unwrap()
}

#[test]
fn prints_setters_to_stdout() {
    let (_temp, dir) = package(&[("button.go", BUTTON)]);
    let output = fluentgen(&[], &dir);
    assert!(output.status.success());
    assert_eq!(
        stdout(&output),
        "package ui

// WithColor of the border.
func (style ButtonStyle) WithColor(s string) ButtonStyle {
\tstyle.Color = s
\treturn style
}

func (style ButtonStyle) WithBorder(l *lipgloss.Border) ButtonStyle {
\tstyle.Border = l
\treturn style
}
"
    );
}

#[test]
fn no_matching_types_prints_package_clause() {
    let (_temp, dir) = package(&[("plain.go", "package ui\n\ntype Plain struct{ X int }\n")]);
    let output = fluentgen(&[], &dir);
    assert!(output.status.success());
    assert_eq!(stdout(&output), "package ui\n");
}

#[test]
fn single_file_input() {
    let (_temp, dir) = package(&[
        ("button.go", BUTTON),
        ("label.go", "package ui\n\ntype LabelStyle struct{ Text string }\n"),
    ]);
    let output = fluentgen(&[], &dir.join("label.go"));
    assert!(output.status.success());
    let text = stdout(&output);
    assert!(text.contains("WithText(s string) LabelStyle"));
    assert!(!text.contains("ButtonStyle"));
}

#[test]
fn per_file_output_is_idempotent() {
    let (_temp, dir) = package(&[("button.go", BUTTON)]);
    let first = fluentgen(&["--per-file"], &dir);
    assert!(first.status.success());
    let generated = dir.join("button_fluent.go");
    let contents = fs::read_to_string(&generated).unwrap();
    assert!(contents.contains("func (style ButtonStyle) WithBorder"));

    let second = fluentgen(&["--per-file"], &dir);
    assert!(second.status.success());
    assert_eq!(fs::read_to_string(&generated).unwrap(), contents);
    assert!(!dir.join("button_fluent_fluent.go").exists());
}

#[test]
fn out_argument_writes_file() {
    let (temp, dir) = package(&[("button.go", BUTTON)]);
    let out = temp.path().join("styles.go");
    let output = Command::new(env!("CARGO_BIN_EXE_fluentgen"))
        .arg(&dir)
        .arg(&out)
        .output()
        .unwrap();
    assert!(output.status.success());
    assert!(output.stdout.is_empty());
    assert!(fs::read_to_string(&out).unwrap().starts_with("package ui\n\n// WithColor"));
}

#[test]
fn suffix_and_receiver_flags() {
    let (_temp, dir) = package(&[("opts.go", "package ui\n\ntype ListOpts struct{ Limit int }\n")]);
    let output = fluentgen(&["-s", "Opts", "-r", "o"], &dir);
    assert!(output.status.success());
    assert!(stdout(&output).contains("func (o ListOpts) WithLimit(i int) ListOpts {"));
}

#[test]
fn config_file_sets_defaults() {
    let (_temp, dir) = package(&[
        ("opts.go", "package ui\n\ntype ListOpts struct{ Limit int }\n"),
        ("fluentgen.toml", "[generate]\nsuffix = \"Opts\"\nreceiver = \"o\"\n"),
    ]);
    let output = fluentgen(&["-r", "opts"], &dir);
    assert!(output.status.success());
    assert!(stdout(&output).contains("func (opts ListOpts) WithLimit(i int) ListOpts {"));
}

#[test]
fn malformed_config_fails() {
    let (_temp, dir) = package(&[
        ("button.go", BUTTON),
        ("fluentgen.toml", "[generate]\nprefix = \"With\"\n"),
    ]);
    let output = fluentgen(&[], &dir);
    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
}

#[test]
fn malformed_file_does_not_stop_siblings() {
    let (_temp, dir) = package(&[
        ("button.go", BUTTON),
        ("broken.go", "package ui\n\ntype BrokenStyle struct {\n"),
    ]);
    let output = fluentgen(&[], &dir);
    assert!(!output.status.success());
    assert!(stdout(&output).contains("WithColor"));
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("broken.go"));
}

#[test]
fn unsupported_field_is_skipped_or_rejected() {
    let source = "package ui\n\ntype ListStyle struct {\n\tItems []string\n\tWidth int\n}\n";
    let (_temp, dir) = package(&[("list.go", source)]);

    let skipped = fluentgen(&[], &dir);
    assert!(skipped.status.success());
    let text = stdout(&skipped);
    assert!(text.contains("WithWidth"));
    assert!(!text.contains("WithItems"));
    assert!(String::from_utf8(skipped.stderr).unwrap().contains("Items"));

    let rejected = fluentgen(&["--unsupported", "reject"], &dir);
    assert!(!rejected.status.success());

    let resolved = fluentgen(&["--strategy", "resolve"], &dir);
    assert!(resolved.status.success());
    assert!(stdout(&resolved).contains("func (style ListStyle) WithItems(s []string) ListStyle {"));
}

#[test]
fn invalid_receiver_fails() {
    let (_temp, dir) = package(&[("button.go", BUTTON)]);
    let output = fluentgen(&["-r", "func"], &dir);
    assert!(!output.status.success());
    assert!(String::from_utf8(output.stderr).unwrap().contains("receiver"));
}

#[test]
fn missing_path_fails() {
    let temp = TempDir::new().unwrap();
    let output = fluentgen(&[], &temp.path().join("nope"));
    assert!(!output.status.success());
}
