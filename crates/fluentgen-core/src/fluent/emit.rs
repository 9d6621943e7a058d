// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Output assembly.

use camino::{Utf8Path, Utf8PathBuf};
use ecow::EcoString;

use super::model::{FileOutput, GenerationResult, MethodFragment};

impl GenerationResult {
    /// Renders one Go file holding every fragment of every file.
    #[must_use]
    pub fn render(&self) -> String {
        render(
            &self.package,
            self.files.iter().flat_map(|file| &file.fragments),
        )
    }

    /// Number of generated methods.
    #[must_use]
    pub fn method_count(&self) -> usize {
        self.files.iter().map(|file| file.fragments.len()).sum()
    }
}

impl FileOutput {
    /// Renders this file's fragments as a standalone Go file.
    #[must_use]
    pub fn render(&self) -> String {
        render(&self.package, &self.fragments)
    }

    /// Path of the per-file output, see [`fluent_path`].
    #[must_use]
    pub fn fluent_path(&self) -> Utf8PathBuf {
        fluent_path(&self.path)
    }
}

/// The package clause followed by the fragments. The output ends with
/// exactly one newline.
fn render<'a>(package: &str, fragments: impl IntoIterator<Item = &'a MethodFragment>) -> String {
    let mut out = format!("package {package}\n\n");
    for fragment in fragments {
        out.push_str(&fragment.source);
    }
    let trimmed = out.trim_end_matches('\n').len();
    out.truncate(trimmed);
    out.push('\n');
    out
}

/// `<stem>_fluent.<ext>` next to `path`.
///
/// ```
/// use camino::Utf8Path;
/// use fluentgen_core::fluent::emit::fluent_path;
///
/// assert_eq!(fluent_path(Utf8Path::new("ui/button.go")), "ui/button_fluent.go");
/// assert_eq!(fluent_path(Utf8Path::new("Makefile")), "Makefile_fluent");
/// ```
#[must_use]
pub fn fluent_path(path: &Utf8Path) -> Utf8PathBuf {
    let stem = path.file_stem().unwrap_or_default();
    let name = match path.extension() {
        Some(ext) => format!("{stem}_fluent.{ext}"),
        None => format!("{stem}_fluent"),
    };
    path.with_file_name(name)
}

/// Package name guessed from a directory: its name up to the first `.`.
///
/// ```
/// use camino::Utf8Path;
/// use fluentgen_core::fluent::emit::package_name_from_dir;
///
/// assert_eq!(package_name_from_dir(Utf8Path::new("src/widgets.v2")), "widgets");
/// ```
#[must_use]
pub fn package_name_from_dir(dir: &Utf8Path) -> EcoString {
    let name = dir.file_name().unwrap_or("main");
    name.split('.').next().filter(|n| !n.is_empty()).unwrap_or("main").into()
}
