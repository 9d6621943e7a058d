// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Document tree for Go source generation.
//!
//! Codegen functions return [`Document`] values instead of writing into a
//! string buffer with manual indentation tracking; the tree is rendered in
//! a final pass.
//!
//! Indentation follows gofmt: one tab per nesting level, and lines that
//! end up empty carry no indentation at all.
//!
//! # Example
//!
//! ```
//! use fluentgen_core::codegen::document::{line, nest};
//! use fluentgen_core::docvec;
//!
//! let doc = docvec![
//!     "func (style ButtonStyle) Reset() ButtonStyle {",
//!     nest(1, docvec![line(), "return style"]),
//!     line(),
//!     "}",
//! ];
//! assert_eq!(
//!     doc.to_pretty_string(),
//!     "func (style ButtonStyle) Reset() ButtonStyle {\n\treturn style\n}"
//! );
//! ```

/// A renderable document tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Document<'a> {
    /// A borrowed string literal.
    Str(&'a str),
    /// An owned string.
    String(String),
    /// A newline followed by current indentation.
    Line,
    /// Increase indentation (in tabs) for nested content.
    Nest(usize, Box<Document<'a>>),
    /// A sequence of documents.
    Vec(Vec<Document<'a>>),
    /// Empty document.
    Nil,
}

/// Coerce a value into a `Document`.
pub trait Documentable<'a> {
    fn to_doc(self) -> Document<'a>;
}

impl<'a> Documentable<'a> for &'a str {
    fn to_doc(self) -> Document<'a> {
        Document::Str(self)
    }
}

impl<'a> Documentable<'a> for String {
    fn to_doc(self) -> Document<'a> {
        Document::String(self)
    }
}

impl<'a> Documentable<'a> for &'a ecow::EcoString {
    fn to_doc(self) -> Document<'a> {
        Document::Str(self.as_str())
    }
}

impl<'a> Documentable<'a> for Document<'a> {
    fn to_doc(self) -> Document<'a> {
        self
    }
}

impl<'a> Documentable<'a> for Vec<Document<'a>> {
    fn to_doc(self) -> Document<'a> {
        Document::Vec(self)
    }
}

/// Join multiple documents together in a vector.
///
/// Each element is converted to a `Document` via the `Documentable` trait.
/// Documents are concatenated directly; no separator is inserted.
///
/// ```
/// use fluentgen_core::docvec;
///
/// let doc = docvec!["style", ".", "Color"];
/// assert_eq!(doc.to_pretty_string(), "style.Color");
/// ```
#[macro_export]
macro_rules! docvec {
    () => {
        $crate::codegen::document::Document::Vec(Vec::new())
    };

    ($first:expr $(,)?) => {
        $crate::codegen::document::Document::Vec(
            vec![$crate::codegen::document::Documentable::to_doc($first)]
        )
    };

    ($first:expr, $($rest:expr),+ $(,)?) => {
        match $crate::codegen::document::Documentable::to_doc($first) {
            $crate::codegen::document::Document::Vec(mut vec) => {
                $(
                    vec.push($crate::codegen::document::Documentable::to_doc($rest));
                )*
                $crate::codegen::document::Document::Vec(vec)
            },
            first => {
                $crate::codegen::document::Document::Vec(
                    vec![first, $($crate::codegen::document::Documentable::to_doc($rest)),+]
                )
            }
        }
    };
}

/// Creates a `Line` document: a mandatory newline followed by indentation.
#[must_use]
pub fn line() -> Document<'static> {
    Document::Line
}

/// Creates a `Nil` document.
#[must_use]
pub fn nil() -> Document<'static> {
    Document::Nil
}

/// Creates a `Nest` document that indents the inner document by `levels`
/// tabs.
#[must_use]
pub fn nest(levels: usize, doc: Document<'_>) -> Document<'_> {
    Document::Nest(levels, Box::new(doc))
}

/// Joins documents with a separator between each pair.
#[must_use]
pub fn join<'a>(
    docs: impl IntoIterator<Item = Document<'a>>,
    separator: &Document<'a>,
) -> Document<'a> {
    let mut result = Vec::new();
    for doc in docs {
        if !result.is_empty() {
            result.push(separator.clone());
        }
        result.push(doc);
    }
    if result.is_empty() {
        Document::Nil
    } else {
        Document::Vec(result)
    }
}

/// Concatenates documents without any separator.
#[must_use]
pub fn concat<'a>(docs: impl IntoIterator<Item = Document<'a>>) -> Document<'a> {
    Document::Vec(docs.into_iter().collect())
}

// --- Rendering ---

/// Output buffer that defers indentation until a line gets content.
struct Renderer {
    output: String,
    pending_indent: Option<usize>,
}

impl Renderer {
    fn push_str(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        if let Some(levels) = self.pending_indent.take() {
            self.output.extend(std::iter::repeat_n('\t', levels));
        }
        self.output.push_str(text);
    }

    fn newline(&mut self, indent: usize) {
        self.output.push('\n');
        self.pending_indent = Some(indent);
    }
}

impl Document<'_> {
    /// Renders the document to a string.
    #[must_use]
    pub fn to_pretty_string(&self) -> String {
        let mut renderer = Renderer {
            output: String::new(),
            pending_indent: None,
        };
        self.render_to(&mut renderer, 0);
        renderer.output
    }

    fn render_to(&self, renderer: &mut Renderer, indent: usize) {
        match self {
            Document::Str(s) => renderer.push_str(s),
            Document::String(s) => renderer.push_str(s),
            Document::Nil => {}
            Document::Line => renderer.newline(indent),
            Document::Nest(extra, doc) => doc.render_to(renderer, indent + extra),
            Document::Vec(docs) => {
                for doc in docs {
                    doc.render_to(renderer, indent);
                }
            }
        }
    }
}
