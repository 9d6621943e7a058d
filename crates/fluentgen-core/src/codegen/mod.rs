// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Go source generation.
//!
//! [`document`] provides the layout tree that method templates render
//! through; the templates themselves live in
//! [`crate::fluent::synthesize`].

pub mod document;
