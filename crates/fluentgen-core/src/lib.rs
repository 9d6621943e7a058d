// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! fluentgen core.
//!
//! This crate contains the generator:
//! - Lexical analysis and parsing of Go source ([`source_analysis`], [`ast`])
//! - Package loading and type resolution ([`resolve`])
//! - Declaration discovery and setter synthesis ([`fluent`])
//! - Layout of generated Go code ([`codegen`])

#![doc = include_str!("../../../README.md")]

pub mod ast;
pub mod codegen;
pub mod fluent;
pub mod resolve;
pub mod source_analysis;

pub use fluent::{GenerateError, GeneratorOptions, generate};

/// Re-export commonly used types.
pub mod prelude {
    pub use crate::fluent::{
        GenerateError, Generation, GenerationResult, GeneratorOptions, Input, Strategy, Suffix,
        UnsupportedTypePolicy, generate,
    };
    pub use crate::resolve::ImportLocator;
    pub use crate::source_analysis::Span;
}
