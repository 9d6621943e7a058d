// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Generate setters for a Go package or file.

use std::collections::HashMap;
use std::fs;

use camino::{Utf8Path, Utf8PathBuf};
use fluentgen_core::fluent::{GenerateError, Generation, GenerationResult, Input, generate};
use fluentgen_core::resolve::ImportLocator;
use miette::{Context, IntoDiagnostic, Result};
use tracing::{debug, info, instrument, warn};

use crate::config::{self, Settings};
use crate::diagnostic::{SkippedFieldWarning, SourceDiagnostic};

/// Where generated code goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputMode {
    Stdout,
    /// One combined file.
    File(Utf8PathBuf),
    /// `<stem>_fluent.go` beside every input that produced methods.
    PerFile,
}

#[derive(Debug)]
pub struct GenerateArgs {
    pub path: Utf8PathBuf,
    pub output: OutputMode,
    /// Values given on the command line.
    pub flags: Settings,
}

/// Run the generator and write its output.
///
/// Output from the inputs that succeeded is written even when others
/// failed; the failures are reported and turn into an error.
#[instrument(skip_all, fields(path = %args.path))]
pub fn run(args: &GenerateArgs) -> Result<()> {
    let input = Input::discover(&args.path)?;
    debug!(files = input.files.len(), dir = %input.dir, "Discovered input");

    let file_settings = match config::find_config(&input.dir)? {
        Some(config) => {
            info!(dir = %input.dir, "Found {}", config::CONFIG_FILE);
            config.generate
        }
        None => Settings::default(),
    };
    let options = file_settings.merge(args.flags.clone()).into_options()?;
    debug!(?options, "Resolved options");

    let Generation { result, failures } = generate(&input, &options, &ImportLocator::from_env());

    let mut sources = SourceCache::default();
    report_skipped(&result, &mut sources);
    write_output(&result, &args.output)?;

    if failures.is_empty() {
        return Ok(());
    }
    let failed = failures.len();
    for failure in failures {
        report_failure(failure, &mut sources);
    }
    miette::bail!(
        "{failed} input{} of '{}' failed",
        if failed == 1 { "" } else { "s" },
        args.path
    )
}

fn write_output(result: &GenerationResult, output: &OutputMode) -> Result<()> {
    match output {
        OutputMode::Stdout => {
            print!("{}", result.render());
        }
        OutputMode::File(path) => {
            write_file(path, &result.render())?;
            info!(%path, methods = result.method_count(), "Wrote output");
        }
        OutputMode::PerFile => {
            for file in result.files.iter().filter(|file| !file.fragments.is_empty()) {
                let path = file.fluent_path();
                write_file(&path, &file.render())?;
                info!(%path, methods = file.fragments.len(), "Wrote output");
            }
        }
    }
    Ok(())
}

fn write_file(path: &Utf8Path, contents: &str) -> Result<()> {
    fs::write(path, contents)
        .into_diagnostic()
        .wrap_err_with(|| format!("Failed to write '{path}'"))
}

fn report_skipped(result: &GenerationResult, sources: &mut SourceCache) {
    for skipped in result.files.iter().flat_map(|file| &file.skipped) {
        match sources.get(&skipped.path) {
            Some(source) => {
                let warning = SkippedFieldWarning::new(skipped, source);
                eprintln!("{:?}", miette::Report::new(warning));
            }
            None => warn!(
                path = %skipped.path,
                "{}.{} skipped: unsupported type {}",
                skipped.type_name,
                skipped.field,
                skipped.text
            ),
        }
    }
}

fn report_failure(error: GenerateError, sources: &mut SourceCache) {
    let located = error
        .location()
        .map(|(path, _)| path.to_path_buf())
        .and_then(|path| {
            let source = sources.get(&path)?;
            SourceDiagnostic::from_error(&error, &path, source)
        });
    match located {
        Some(diagnostic) => eprintln!("{:?}", miette::Report::new(diagnostic)),
        None => eprintln!("{:?}", miette::Report::new(error)),
    }
}

/// Source text re-read for diagnostics, once per file.
#[derive(Debug, Default)]
struct SourceCache {
    files: HashMap<Utf8PathBuf, Option<String>>,
}

impl SourceCache {
    fn get(&mut self, path: &Utf8Path) -> Option<&str> {
        self.files
            .entry(path.to_path_buf())
            .or_insert_with(|| fs::read_to_string(path).ok())
            .as_deref()
    }
}
