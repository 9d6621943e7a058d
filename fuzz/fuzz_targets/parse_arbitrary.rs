// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Fuzz target for parser crash safety.
//!
//! Arbitrary input must produce a `SourceFile` and diagnostics, never a
//! panic. Seed `fuzz/corpus/parse_arbitrary/` with `.go` files.

#![no_main]

use fluentgen_core::source_analysis::{lex_with_eof, parse};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Invalid UTF-8 never reaches the lexer.
    if let Ok(source) = std::str::from_utf8(data) {
        let tokens = lex_with_eof(source);
        let (_file, _diagnostics) = parse(tokens);
    }
});
