// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Fuzz target for the syntax-strategy pipeline.
//!
//! Any input either generates a file that starts with its package clause
//! or fails with an error.

#![no_main]

use camino::Utf8Path;
use fluentgen_core::fluent::{GeneratorOptions, generate_source};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(source) = std::str::from_utf8(data) {
        let options = GeneratorOptions::default();
        if let Ok(output) = generate_source(Utf8Path::new("fuzz.go"), source, &options) {
            let rendered = output.render();
            assert!(rendered.starts_with("package "));
            assert!(rendered.ends_with('\n'));
        }
    }
});
