// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Setter method rendering.
//!
//! [`MethodTemplate`] renders one [`MethodFragment`] per eligible field
//! through the [`Document`] tree:
//!
//! ```text
//! // WithColor of the border.
//! func (style ButtonStyle) WithColor(s string) ButtonStyle {
//! 	style.Color = s
//! 	return style
//! }
//!
//! ```
//!
//! Naming lives in [`NamingScheme`]: a fixed receiver for the whole run,
//! and an argument named after the first letter of the field's type.

use ecow::EcoString;

use super::error::{GenerateError, Result};
use super::model::{EligibleField, MethodFragment};
use crate::codegen::document::{Document, concat, join, line, nest, nil};
use crate::docvec;
use crate::source_analysis::is_keyword;

/// Argument names used when the type's first letter is unusable.
const FALLBACK_ARGUMENTS: &[&str] = &["v", "value", "arg"];

/// Returns `true` if `name` is a Go identifier that is neither blank nor
/// a keyword.
///
/// ```
/// use fluentgen_core::fluent::synthesize::is_valid_identifier;
///
/// assert!(is_valid_identifier("style"));
/// assert!(is_valid_identifier("ö"));
/// assert!(!is_valid_identifier("_"));
/// assert!(!is_valid_identifier("func"));
/// assert!(!is_valid_identifier("1st"));
/// ```
#[must_use]
pub fn is_valid_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    (first == '_' || first.is_alphabetic())
        && chars.all(|c| c == '_' || c.is_alphanumeric())
        && name != "_"
        && !is_keyword(name)
}

/// Receiver and argument naming for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamingScheme {
    receiver: EcoString,
}

impl NamingScheme {
    /// Creates a scheme with the given receiver identifier.
    ///
    /// # Errors
    ///
    /// Returns [`GenerateError::InvalidOption`] unless `receiver` is a
    /// valid, non-blank, non-keyword identifier.
    pub fn new(receiver: impl Into<EcoString>) -> Result<Self> {
        let receiver = receiver.into();
        if !is_valid_identifier(&receiver) {
            return Err(GenerateError::InvalidOption {
                option: "receiver",
                reason: format!("{receiver:?} is not a usable Go identifier"),
            });
        }
        Ok(Self { receiver })
    }

    #[must_use]
    pub fn receiver(&self) -> &str {
        &self.receiver
    }

    /// `With` followed by the field name.
    #[must_use]
    pub fn method_name(&self, field: &str) -> EcoString {
        let mut name = EcoString::from("With");
        name.push_str(field);
        name
    }

    /// The argument name for a parameter of type `signature`.
    ///
    /// The first character of the signature, lower-cased, after any
    /// pointer and slice/array prefixes. A package qualifier is part of the
    /// type text, so `*lipgloss.Border` gives `l`. When that character is
    /// not usable, or equals the receiver, the first of `v`, `value`, `arg`
    /// distinct from the receiver is used.
    ///
    /// ```
    /// use fluentgen_core::fluent::synthesize::NamingScheme;
    ///
    /// let naming = NamingScheme::new("style").unwrap();
    /// assert_eq!(naming.argument_name("*bar.Baz"), "b");
    /// assert_eq!(naming.argument_name("time.Duration"), "t");
    /// assert_eq!(naming.argument_name("[]string"), "s");
    /// ```
    #[must_use]
    pub fn argument_name(&self, signature: &str) -> EcoString {
        head_letter(signature)
            .filter(|letter| is_valid_identifier(letter) && *letter != self.receiver)
            .unwrap_or_else(|| {
                let fallback = FALLBACK_ARGUMENTS
                    .iter()
                    .find(|name| **name != self.receiver)
                    .unwrap_or(&"v");
                EcoString::from(*fallback)
            })
    }
}

/// First character, lower-cased, of `signature` once leading pointer and
/// slice/array prefixes are stripped.
fn head_letter(signature: &str) -> Option<EcoString> {
    let mut rest = signature.trim_start();
    loop {
        if let Some(after) = rest.strip_prefix('*') {
            rest = after;
        } else if rest.starts_with('[') {
            let close = rest.find(']')?;
            rest = &rest[close + 1..];
        } else {
            break;
        }
    }
    let first = rest.chars().next()?;
    Some(first.to_lowercase().collect::<String>().into())
}

/// Renders setters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodTemplate {
    naming: NamingScheme,
}

impl MethodTemplate {
    #[must_use]
    pub fn new(naming: NamingScheme) -> Self {
        Self { naming }
    }

    /// Renders the setter of `field` on `type_name`.
    ///
    /// # Errors
    ///
    /// Returns [`GenerateError::TemplateRender`] if the field has an empty
    /// name or type, or its argument name would shadow the receiver.
    pub fn render(&self, type_name: &str, field: &EligibleField) -> Result<MethodFragment> {
        let fail = |reason: &str| GenerateError::TemplateRender {
            type_name: type_name.into(),
            field: field.name.clone(),
            reason: reason.to_string(),
        };
        if type_name.is_empty() || field.name.is_empty() {
            return Err(fail("empty identifier"));
        }
        if field.signature.trim().is_empty() {
            return Err(fail("empty type"));
        }

        let receiver = self.naming.receiver();
        let method = self.naming.method_name(&field.name);
        let argument = self.naming.argument_name(&field.signature);
        if argument.as_str() == receiver {
            return Err(fail("argument name equals receiver name"));
        }

        let doc = field
            .doc
            .as_deref()
            .map_or(nil(), |text| doc_comment(&method, text));
        let body = docvec![
            line(),
            receiver,
            ".",
            &field.name,
            " = ",
            &argument,
            line(),
            "return ",
            receiver,
        ];
        let fragment = docvec![
            doc,
            "func (",
            receiver,
            " ",
            type_name,
            ") ",
            &method,
            "(",
            &argument,
            " ",
            field.signature.as_str(),
            ") ",
            type_name,
            " {",
            nest(1, body),
            line(),
            "}",
            line(),
            line(),
        ];

        Ok(MethodFragment {
            type_name: type_name.into(),
            field: field.name.clone(),
            source: fragment.to_pretty_string(),
        })
    }
}

/// Doc lines: the first word of `text` is replaced by `method`.
fn doc_comment<'a>(method: &str, text: &'a str) -> Document<'a> {
    let mut lines = text.lines();
    let first = lines.next().unwrap_or_default().trim_start();
    let remainder = first
        .split_once(char::is_whitespace)
        .map(|(_, rest)| rest.trim_start());
    let first = match remainder {
        Some(rest) if !rest.is_empty() => format!("// {method} {rest}"),
        _ => format!("// {method}"),
    };
    let rest = lines.map(|text| match text.trim_end() {
        "" => Document::Str("//"),
        text => Document::String(format!("// {text}")),
    });
    let comment = join(std::iter::once(Document::String(first)).chain(rest), &line());
    concat([comment, line()])
}
