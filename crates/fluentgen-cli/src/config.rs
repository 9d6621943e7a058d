// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! `fluentgen.toml` configuration.
//!
//! The file lives in the package directory and holds a `[generate]` table
//! with the same keys as the command-line options:
//!
//! ```toml
//! [generate]
//! suffix = "Style"
//! receiver = "s"
//! strategy = "resolve"
//! unsupported = "reject"
//! ```
//!
//! Precedence is defaults, then the file, then flags.

use camino::Utf8Path;
use clap::ValueEnum;
use fluentgen_core::fluent::{GeneratorOptions, Strategy, Suffix, UnsupportedTypePolicy};
use miette::{Context, IntoDiagnostic, Result};
use serde::Deserialize;
use std::fs;

/// Name of the configuration file looked up next to the sources.
pub const CONFIG_FILE: &str = "fluentgen.toml";

/// The top-level configuration structure parsed from `fluentgen.toml`.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub generate: Settings,
}

/// Generator settings; unset values fall through to the next layer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    pub suffix: Option<String>,
    pub receiver: Option<String>,
    pub strategy: Option<StrategyArg>,
    pub unsupported: Option<UnsupportedArg>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StrategyArg {
    /// Parse each file on its own
    Syntax,
    /// Load and type-check the whole package
    Resolve,
}

impl From<StrategyArg> for Strategy {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::Syntax => Self::Syntax,
            StrategyArg::Resolve => Self::Resolve,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnsupportedArg {
    /// Leave the field out with a warning
    Skip,
    /// Fail the file
    Reject,
}

impl From<UnsupportedArg> for UnsupportedTypePolicy {
    fn from(arg: UnsupportedArg) -> Self {
        match arg {
            UnsupportedArg::Skip => Self::Skip,
            UnsupportedArg::Reject => Self::Reject,
        }
    }
}

impl Settings {
    /// Layers `over` on top of `self`: values set in `over` win.
    #[must_use]
    pub fn merge(self, over: Self) -> Self {
        Self {
            suffix: over.suffix.or(self.suffix),
            receiver: over.receiver.or(self.receiver),
            strategy: over.strategy.or(self.strategy),
            unsupported: over.unsupported.or(self.unsupported),
        }
    }

    /// Fills unset values from [`GeneratorOptions::default`].
    ///
    /// The receiver is checked later, when the generator builds its template.
    pub fn into_options(self) -> Result<GeneratorOptions> {
        let defaults = GeneratorOptions::default();
        let suffix = match self.suffix {
            Some(suffix) => Suffix::new(suffix)?,
            None => defaults.suffix,
        };
        Ok(GeneratorOptions {
            suffix,
            receiver: self.receiver.map_or(defaults.receiver, Into::into),
            strategy: self.strategy.map_or(defaults.strategy, Into::into),
            unsupported: self.unsupported.map_or(defaults.unsupported, Into::into),
        })
    }
}

/// Parse a `fluentgen.toml` file.
pub fn parse_config(path: &Utf8Path) -> Result<Config> {
    let content = fs::read_to_string(path)
        .into_diagnostic()
        .wrap_err_with(|| format!("Failed to read config '{path}'"))?;

    toml::from_str(&content)
        .into_diagnostic()
        .wrap_err_with(|| format!("Failed to parse config '{path}'"))
}

/// Look for `fluentgen.toml` in `dir` and parse it if found.
pub fn find_config(dir: &Utf8Path) -> Result<Option<Config>> {
    let config_path = dir.join(CONFIG_FILE);
    if config_path
        .try_exists()
        .into_diagnostic()
        .wrap_err_with(|| format!("Failed to stat config '{config_path}'"))?
    {
        parse_config(&config_path).map(Some)
    } else {
        Ok(None)
    }
}
