// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Command-line interface for fluentgen.
//!
//! Reads a Go package directory (or one file), generates `With<Field>`
//! setters for every struct whose name ends with the configured suffix,
//! and writes them to stdout, a file, or `<file>_fluent.go` siblings.

mod commands;
mod config;
mod diagnostic;

use camino::Utf8PathBuf;
use clap::{ArgAction, Parser};
use miette::Result;
use tracing_subscriber::EnvFilter;

use commands::generate::{GenerateArgs, OutputMode};
use config::{Settings, StrategyArg, UnsupportedArg};

/// Generate fluent setters for Go style structs.
#[derive(Debug, Parser)]
#[command(name = "fluentgen")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Package directory, or a single .go file
    path: Utf8PathBuf,

    /// Write the generated file here instead of stdout
    out: Option<Utf8PathBuf>,

    /// Type-name suffix that selects candidate structs
    #[arg(short, long)]
    suffix: Option<String>,

    /// Receiver identifier used in every generated method
    #[arg(short, long)]
    receiver: Option<String>,

    /// How candidate types are discovered
    #[arg(long, value_enum)]
    strategy: Option<StrategyArg>,

    /// What to do with fields whose type cannot be rendered
    #[arg(long, value_enum)]
    unsupported: Option<UnsupportedArg>,

    /// Write `<file>_fluent.go` next to each input file
    #[arg(long, conflicts_with = "out")]
    per_file: bool,

    /// Increase logging verbosity (-v: debug, -vv+: trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn into_args(self) -> GenerateArgs {
        let output = match (self.per_file, self.out) {
            (true, _) => OutputMode::PerFile,
            (false, Some(out)) => OutputMode::File(out),
            (false, None) => OutputMode::Stdout,
        };
        GenerateArgs {
            path: self.path,
            output,
            flags: Settings {
                suffix: self.suffix,
                receiver: self.receiver,
                strategy: self.strategy,
                unsupported: self.unsupported,
            },
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(directive_for_verbosity(cli.verbose))),
        )
        .with_writer(std::io::stderr)
        .init();

    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(3)
                .build(),
        )
    }))?;

    if let Err(e) = commands::generate::run(&cli.into_args()) {
        eprintln!("{e:?}");
        std::process::exit(1);
    }
    Ok(())
}

fn directive_for_verbosity(v: u8) -> &'static str {
    // Skipped fields and failures are rendered as diagnostics, so the
    // library's own warnings stay quiet by default.
    match v {
        0 => "fluentgen_cli=warn,fluentgen_core=error",
        1 => "fluentgen_cli=debug,fluentgen_core=debug",
        _ => "fluentgen_cli=trace,fluentgen_core=trace",
    }
}
