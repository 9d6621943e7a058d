// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Fluent setter generation.
//!
//! The pipeline runs in four stages, each a pure function of its input and
//! the [`GeneratorOptions`]:
//!
//! 1. a [`DeclarationScanner`] finds candidate struct types
//!    ([`scanner`]);
//! 2. [`extract`](extract::extract) keeps the fields that get setters;
//! 3. a [`MethodTemplate`] renders one fragment per field
//!    ([`synthesize`]);
//! 4. [`GenerationResult::render`] assembles the Go file ([`emit`]).
//!
//! [`generate`] drives the pipeline over an [`Input`]. With
//! [`Strategy::Syntax`] every file is an independent unit: a failing file
//! is reported and the others still produce output. With
//! [`Strategy::Resolve`] the package is loaded and type-checked as a whole
//! and fails as a whole.
//!
//! ```
//! use camino::Utf8Path;
//! use fluentgen_core::fluent::{GeneratorOptions, generate_source};
//!
//! let source = "package ui\n\ntype ButtonStyle struct {\n\tColor string\n}\n";
//! let output = generate_source(Utf8Path::new("button.go"), source, &GeneratorOptions::default())?;
//! assert_eq!(output.fragments.len(), 1);
//! # Ok::<(), fluentgen_core::fluent::GenerateError>(())
//! ```

pub mod emit;
mod error;
pub mod extract;
pub mod model;
pub mod scanner;
pub mod synthesize;

#[cfg(test)]
mod pipeline_tests;
#[cfg(test)]
mod property_tests;

use std::fmt;
use std::fs;
use std::str::FromStr;

use camino::{Utf8Path, Utf8PathBuf};
use ecow::EcoString;
use tracing::{debug, info, instrument, warn};

pub use error::{GenerateError, Result};
pub use model::{
    CandidateType, EligibleField, ExtractedType, FieldSpec, FileOutput, GenerationResult,
    MethodFragment, SkippedField, TypeSignature,
};
pub use scanner::{DeclarationScanner, ResolvedScanner, SyntaxScanner};
pub use synthesize::{MethodTemplate, NamingScheme};

use crate::resolve::{ImportLocator, Loader, ResolvedPackage, package_files};
use crate::source_analysis::parse_source;

/// The type-name suffix that selects candidates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Suffix(EcoString);

impl Suffix {
    /// # Errors
    ///
    /// Returns [`GenerateError::InvalidOption`] for an empty suffix or one
    /// containing characters that cannot appear in a Go identifier.
    pub fn new(suffix: impl Into<EcoString>) -> Result<Self> {
        let suffix = suffix.into();
        if suffix.is_empty() || !suffix.chars().all(|c| c == '_' || c.is_alphanumeric()) {
            return Err(GenerateError::InvalidOption {
                option: "suffix",
                reason: format!("{suffix:?} cannot end a Go type name"),
            });
        }
        Ok(Self(suffix))
    }

    /// Exact, case-sensitive suffix match.
    #[must_use]
    pub fn matches(&self, name: &str) -> bool {
        name.ends_with(self.0.as_str())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for Suffix {
    fn default() -> Self {
        Self("Style".into())
    }
}

impl fmt::Display for Suffix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// How candidate types are discovered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Strategy {
    /// Per-file syntax walk.
    #[default]
    Syntax,
    /// Type-resolved walk over the whole package.
    Resolve,
}

/// What to do with a field whose type the syntax strategy cannot render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnsupportedTypePolicy {
    /// Leave the field out and warn.
    #[default]
    Skip,
    /// Fail the file.
    Reject,
}

macro_rules! keyword_enum {
    ($ty:ident { $($variant:ident => $text:literal),+ $(,)? }) => {
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(match self {
                    $(Self::$variant => $text),+
                })
            }
        }

        impl FromStr for $ty {
            type Err = String;

            fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
                match s {
                    $($text => Ok(Self::$variant),)+
                    other => Err(format!(
                        "unknown {} {other:?}, expected one of: {}",
                        stringify!($ty),
                        [$($text),+].join(", ")
                    )),
                }
            }
        }
    };
}

keyword_enum!(Strategy { Syntax => "syntax", Resolve => "resolve" });
keyword_enum!(UnsupportedTypePolicy { Skip => "skip", Reject => "reject" });

/// Static configuration of one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorOptions {
    pub suffix: Suffix,
    pub receiver: EcoString,
    pub strategy: Strategy,
    pub unsupported: UnsupportedTypePolicy,
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        Self {
            suffix: Suffix::default(),
            receiver: "style".into(),
            strategy: Strategy::default(),
            unsupported: UnsupportedTypePolicy::default(),
        }
    }
}

impl GeneratorOptions {
    /// Checks the options and builds the method template they describe.
    ///
    /// # Errors
    ///
    /// Returns [`GenerateError::InvalidOption`] for an unusable receiver.
    pub fn validate(&self) -> Result<MethodTemplate> {
        Ok(MethodTemplate::new(NamingScheme::new(self.receiver.clone())?))
    }
}

/// Scans, extracts and renders every candidate `scanner` finds.
fn synthesize_all(
    scanner: &dyn DeclarationScanner,
    options: &GeneratorOptions,
    template: &MethodTemplate,
) -> Result<(Vec<MethodFragment>, Vec<SkippedField>)> {
    let mut fragments = Vec::new();
    let mut skipped = Vec::new();
    let candidates = scanner.scan(&options.suffix);
    debug!(strategy = %scanner.strategy(), candidates = candidates.len(), "scanned");
    for candidate in candidates {
        let extracted = extract::extract(&candidate, options.unsupported)?;
        for field in &extracted.fields {
            fragments.push(template.render(&extracted.name, field)?);
        }
        skipped.extend(extracted.skipped);
    }
    Ok((fragments, skipped))
}

/// Generates setters for one file's source text with the syntax strategy.
///
/// # Errors
///
/// Returns [`GenerateError::Syntax`] if the source does not parse, or any
/// extraction/rendering error.
#[instrument(skip_all, fields(path = %path))]
pub fn generate_source(
    path: &Utf8Path,
    source: &str,
    options: &GeneratorOptions,
) -> Result<FileOutput> {
    let template = options.validate()?;
    let (file, diagnostics) = parse_source(source);
    if diagnostics.iter().any(|d| d.is_error()) {
        return Err(GenerateError::Syntax {
            path: path.to_path_buf(),
            diagnostics,
        });
    }
    let scanner = SyntaxScanner::new(path, &file);
    let (fragments, skipped) = synthesize_all(&scanner, options, &template)?;
    Ok(FileOutput {
        path: path.to_path_buf(),
        package: file.package.name.clone(),
        fragments,
        skipped,
    })
}

/// Reads `path` and runs [`generate_source`] on it.
///
/// # Errors
///
/// Returns [`GenerateError::Io`] if the file cannot be read, otherwise as
/// [`generate_source`].
pub fn generate_file(path: &Utf8Path, options: &GeneratorOptions) -> Result<FileOutput> {
    let source = fs::read_to_string(path).map_err(|source| GenerateError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    generate_source(path, &source, options)
}

/// Generates setters for a resolved package, optionally for one file only.
///
/// The result holds one [`FileOutput`] per package file (or just `only`),
/// in file order.
///
/// # Errors
///
/// Returns extraction and rendering errors; the package fails as a whole.
#[instrument(skip_all, fields(package = %package.id.path))]
pub fn generate_package(
    package: &ResolvedPackage,
    only: Option<&Utf8Path>,
    options: &GeneratorOptions,
) -> Result<GenerationResult> {
    let template = options.validate()?;
    let only = only.and_then(|path| package.file_index(path));
    let mut files = Vec::new();
    for (index, file) in package.files.iter().enumerate() {
        if only.is_some_and(|only| only != index) {
            continue;
        }
        let scanner = ResolvedScanner::for_file(package, index);
        let (fragments, skipped) = synthesize_all(&scanner, options, &template)?;
        files.push(FileOutput {
            path: file.path.clone(),
            package: package.id.name.clone(),
            fragments,
            skipped,
        });
    }
    Ok(GenerationResult {
        package: package.id.name.clone(),
        files,
    })
}

/// What to generate from: a package directory and the files to consider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Input {
    pub dir: Utf8PathBuf,
    /// Package sources, sorted by file name.
    pub files: Vec<Utf8PathBuf>,
    /// Set when a single file was named.
    pub only: Option<Utf8PathBuf>,
}

impl Input {
    /// Enumerates `path`: a directory (non-recursively) or one `.go` file.
    ///
    /// # Errors
    ///
    /// Returns [`GenerateError::Io`] if the path cannot be read.
    pub fn discover(path: &Utf8Path) -> Result<Self> {
        let io = |source| GenerateError::Io {
            path: path.to_path_buf(),
            source,
        };
        let metadata = fs::metadata(path).map_err(io)?;
        if metadata.is_dir() {
            return Ok(Self {
                dir: path.to_path_buf(),
                files: package_files(path).map_err(io)?,
                only: None,
            });
        }
        let dir = match path.parent() {
            Some(parent) if !parent.as_str().is_empty() => parent.to_path_buf(),
            _ => Utf8PathBuf::from("."),
        };
        Ok(Self {
            dir,
            files: vec![path.to_path_buf()],
            only: Some(path.to_path_buf()),
        })
    }

    /// Fallback package name when no file could be parsed.
    fn fallback_package(&self) -> EcoString {
        let dir = self.dir.canonicalize_utf8().unwrap_or_else(|_| self.dir.clone());
        emit::package_name_from_dir(&dir)
    }
}

/// Outcome of a run: whatever was generated plus the units that failed.
#[derive(Debug)]
pub struct Generation {
    pub result: GenerationResult,
    pub failures: Vec<GenerateError>,
}

impl Generation {
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Runs the pipeline over `input`.
///
/// Invalid options are reported as a single failure with an empty result.
#[instrument(skip_all, fields(dir = %input.dir, strategy = %options.strategy))]
pub fn generate(input: &Input, options: &GeneratorOptions, locator: &ImportLocator) -> Generation {
    let mut failures = Vec::new();
    let mut files = Vec::new();
    let mut package = None;

    if let Err(err) = options.validate() {
        failures.push(err);
    } else {
        match options.strategy {
            Strategy::Syntax => {
                for path in &input.files {
                    match generate_file(path, options) {
                        Ok(output) => {
                            package.get_or_insert_with(|| output.package.clone());
                            files.push(output);
                        }
                        Err(err) => {
                            warn!(%path, error = %err, "file failed");
                            failures.push(err);
                        }
                    }
                }
            }
            Strategy::Resolve => {
                let generated = Loader::new(locator.clone())
                    .load(&input.dir)
                    .map_err(GenerateError::from)
                    .and_then(|resolved| {
                        generate_package(&resolved, input.only.as_deref(), options)
                    });
                match generated {
                    Ok(result) => {
                        package = Some(result.package);
                        files = result.files;
                    }
                    Err(err) => {
                        warn!(error = %err, "package failed");
                        failures.push(err);
                    }
                }
            }
        }
    }

    let result = GenerationResult {
        package: package.unwrap_or_else(|| input.fallback_package()),
        files,
    };
    info!(
        files = result.files.len(),
        methods = result.method_count(),
        failures = failures.len(),
        "generation finished"
    );
    Generation { result, failures }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn suffix_validation() {
        assert!(Suffix::new("Style").is_ok());
        assert!(Suffix::new("Opts_2").is_ok());
        assert!(Suffix::new("").is_err());
        assert!(Suffix::new("My Style").is_err());
        assert!(Suffix::default().matches("ButtonStyle"));
        assert!(Suffix::default().matches("Style"));
        assert!(!Suffix::default().matches("Styles"));
    }

    #[test]
    fn strategy_and_policy_parse_from_keywords() {
        assert_eq!("resolve".parse::<Strategy>(), Ok(Strategy::Resolve));
        assert_eq!("skip".parse::<UnsupportedTypePolicy>(), Ok(UnsupportedTypePolicy::Skip));
        assert_eq!(Strategy::Syntax.to_string(), "syntax");
        assert_eq!(
            "typed".parse::<Strategy>(),
            Err("unknown Strategy \"typed\", expected one of: syntax, resolve".to_string())
        );
    }

    #[test]
    fn default_options() {
        let options = GeneratorOptions::default();
        assert_eq!(options.suffix.as_str(), "Style");
        assert_eq!(options.receiver, "style");
        assert_eq!(options.strategy, Strategy::Syntax);
        assert_eq!(options.unsupported, UnsupportedTypePolicy::Skip);
        assert!(options.validate().is_ok());
    }

    #[test]
    fn invalid_receiver_fails_validation() {
        let options = GeneratorOptions {
            receiver: "func".into(),
            ..GeneratorOptions::default()
        };
        let err = options.validate().expect_err("keyword receiver");
        assert_eq!(
            err.to_string(),
            "invalid receiver: \"func\" is not a usable Go identifier"
        );
    }

    #[test]
    fn syntax_errors_fail_the_file() {
        let err = generate_source(
            Utf8Path::new("bad.go"),
            "package ui\n\ntype ButtonStyle struct {\n\tColor\n",
            &GeneratorOptions::default(),
        )
        .expect_err("truncated struct");
        assert!(matches!(err, GenerateError::Syntax { .. }));
        assert!(err.location().is_some());
    }
}
