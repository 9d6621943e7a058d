// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Go module metadata and import path lookup.
//!
//! [`GoMod`] is the subset of a `go.mod` file the loader needs: the module
//! path, `require`d versions and `replace` directives. [`ImportLocator`]
//! maps an import path to either a standard library package or a source
//! directory.

use std::env;

use camino::{Utf8Path, Utf8PathBuf};
use ecow::EcoString;
use thiserror::Error;

/// Name of the module manifest file.
pub const GO_MOD: &str = "go.mod";

/// A parsed `go.mod` file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoMod {
    /// The `module` path.
    pub module: EcoString,
    /// Directory containing the `go.mod` file.
    pub root: Utf8PathBuf,
    pub requires: Vec<Requirement>,
    pub replaces: Vec<Replacement>,
}

/// A `require` line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Requirement {
    pub path: EcoString,
    pub version: EcoString,
}

/// A `replace` directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Replacement {
    pub path: EcoString,
    /// Only this version is replaced when present.
    pub version: Option<EcoString>,
    pub target: ReplaceTarget,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplaceTarget {
    /// A local directory, already joined onto the module root.
    Dir(Utf8PathBuf),
    /// Another module version.
    Module { path: EcoString, version: EcoString },
}

/// A malformed `go.mod` line.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("go.mod:{line}: {message}")]
pub struct GoModError {
    pub line: usize,
    pub message: String,
}

impl GoMod {
    /// Parses `go.mod` text. `root` is the directory holding the file.
    ///
    /// Only `module`, `require` and `replace` are interpreted; other
    /// directives (`go`, `toolchain`, `exclude`, `retract`, `godebug`)
    /// are skipped.
    ///
    /// # Errors
    ///
    /// Returns [`GoModError`] for malformed `module`, `require` or
    /// `replace` lines, or when no `module` directive is present.
    pub fn parse(text: &str, root: &Utf8Path) -> Result<Self, GoModError> {
        let mut module = None;
        let mut requires = Vec::new();
        let mut replaces = Vec::new();
        let mut block: Option<String> = None;

        for (index, raw) in text.lines().enumerate() {
            let line_no = index + 1;
            let line = strip_comment(raw).trim();
            if line.is_empty() {
                continue;
            }
            let err = |message: String| GoModError {
                line: line_no,
                message,
            };

            let (verb, rest) = if let Some(open) = &block {
                if line == ")" {
                    block = None;
                    continue;
                }
                (open.clone(), line)
            } else {
                let (verb, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
                let rest = rest.trim();
                if rest == "(" {
                    block = Some(verb.to_string());
                    continue;
                }
                (verb.to_string(), rest)
            };

            let words = split_words(rest);
            match verb.as_str() {
                "module" => {
                    let [path] = words.as_slice() else {
                        return Err(err("usage: module module/path".into()));
                    };
                    module = Some(EcoString::from(path.as_str()));
                }
                "require" => {
                    let [path, version, ..] = words.as_slice() else {
                        return Err(err("usage: require module/path v1.2.3".into()));
                    };
                    requires.push(Requirement {
                        path: path.as_str().into(),
                        version: version.as_str().into(),
                    });
                }
                "replace" => replaces.push(parse_replace(&words, root).map_err(err)?),
                _ => {}
            }
        }

        if block.is_some() {
            return Err(GoModError {
                line: text.lines().count(),
                message: "unterminated block".into(),
            });
        }
        let module = module.ok_or_else(|| GoModError {
            line: 0,
            message: "no module declaration".into(),
        })?;
        Ok(Self {
            module,
            root: root.to_path_buf(),
            requires,
            replaces,
        })
    }

    /// Returns the import path of `dir`, which must lie inside the module.
    #[must_use]
    pub fn import_path_of(&self, dir: &Utf8Path) -> Option<EcoString> {
        let rel = dir.strip_prefix(&self.root).ok()?;
        let mut path = String::from(self.module.as_str());
        for component in rel.components() {
            path.push('/');
            path.push_str(component.as_str());
        }
        Some(path.into())
    }

    /// Returns the directory of `import_path` when it lies inside this
    /// module.
    fn local_dir(&self, import_path: &str) -> Option<Utf8PathBuf> {
        let rest = strip_module_prefix(import_path, &self.module)?;
        Some(if rest.is_empty() {
            self.root.clone()
        } else {
            self.root.join(rest)
        })
    }

    /// Finds the `require` with the longest module path prefixing
    /// `import_path`.
    fn requirement_for(&self, import_path: &str) -> Option<&Requirement> {
        self.requires
            .iter()
            .filter(|req| strip_module_prefix(import_path, &req.path).is_some())
            .max_by_key(|req| req.path.len())
    }

    /// Finds the `replace` applying to `import_path` at `version`.
    fn replacement_for(&self, import_path: &str, version: Option<&str>) -> Option<&Replacement> {
        self.replaces
            .iter()
            .filter(|rep| strip_module_prefix(import_path, &rep.path).is_some())
            .filter(|rep| rep.version.is_none() || rep.version.as_deref() == version)
            .max_by_key(|rep| rep.path.len())
    }
}

fn parse_replace(words: &[String], root: &Utf8Path) -> Result<Replacement, String> {
    const USAGE: &str = "usage: replace module/path [v1.2.3] => other/module v1.4.5 | ../local/dir";
    let arrow = words
        .iter()
        .position(|w| w == "=>")
        .ok_or_else(|| USAGE.to_string())?;
    let (old, new) = (&words[..arrow], &words[arrow + 1..]);
    let (path, version) = match old {
        [path] => (path, None),
        [path, version] => (path, Some(EcoString::from(version.as_str()))),
        _ => return Err(USAGE.into()),
    };
    let target = match new {
        [dir] if is_local_path(dir) => ReplaceTarget::Dir(root.join(dir)),
        [path, version] => ReplaceTarget::Module {
            path: path.as_str().into(),
            version: version.as_str().into(),
        },
        _ => return Err(USAGE.into()),
    };
    Ok(Replacement {
        path: path.as_str().into(),
        version,
        target,
    })
}

fn is_local_path(path: &str) -> bool {
    path.starts_with("./") || path.starts_with("../") || Utf8Path::new(path).is_absolute()
}

fn strip_comment(line: &str) -> &str {
    line.find("//").map_or(line, |at| &line[..at])
}

/// Splits on whitespace, honouring `"quoted"` and `` `raw` `` words.
fn split_words(text: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut chars = text.chars().peekable();
    while let Some(&c) = chars.peek() {
        if c.is_whitespace() {
            chars.next();
            continue;
        }
        let mut word = String::new();
        if c == '"' || c == '`' {
            chars.next();
            for next in chars.by_ref() {
                if next == c {
                    break;
                }
                word.push(next);
            }
        } else {
            while let Some(&next) = chars.peek() {
                if next.is_whitespace() {
                    break;
                }
                word.push(next);
                chars.next();
            }
        }
        words.push(word);
    }
    words
}

/// Returns the remainder of `path` after `module` when `module` is a
/// path-element prefix of it.
fn strip_module_prefix<'a>(path: &'a str, module: &str) -> Option<&'a str> {
    let rest = path.strip_prefix(module)?;
    if rest.is_empty() {
        Some(rest)
    } else {
        rest.strip_prefix('/')
    }
}

/// Walks up from `start` looking for a `go.mod` file.
#[must_use]
pub fn find_go_mod(start: &Utf8Path) -> Option<Utf8PathBuf> {
    start
        .ancestors()
        .map(|dir| dir.join(GO_MOD))
        .find(|candidate| candidate.is_file())
}

/// Escapes a module path or version for the module cache: every
/// upper-case letter becomes `!` followed by its lower-case form.
///
/// ```
/// use fluentgen_core::resolve::module::escape_module_path;
///
/// assert_eq!(
///     escape_module_path("github.com/BurntSushi/toml"),
///     "github.com/!burnt!sushi/toml"
/// );
/// ```
#[must_use]
pub fn escape_module_path(path: &str) -> String {
    let mut escaped = String::with_capacity(path.len());
    for c in path.chars() {
        if c.is_ascii_uppercase() {
            escaped.push('!');
            escaped.push(c.to_ascii_lowercase());
        } else {
            escaped.push(c);
        }
    }
    escaped
}

/// Returns `true` for standard library import paths: the first path
/// element contains no dot.
#[must_use]
pub fn is_standard_import(path: &str) -> bool {
    path.split('/').next().is_some_and(|first| !first.contains('.'))
}

/// The package name an import path conventionally declares: its last
/// element, skipping a trailing `/vN` major version.
///
/// ```
/// use fluentgen_core::resolve::module::default_package_name;
///
/// assert_eq!(default_package_name("net/http"), "http");
/// assert_eq!(default_package_name("math/rand/v2"), "rand");
/// ```
#[must_use]
pub fn default_package_name(path: &str) -> &str {
    let mut elements = path.rsplit('/');
    let last = elements.next().unwrap_or(path);
    if is_major_version(last) {
        elements.next().unwrap_or(last)
    } else {
        last
    }
}

fn is_major_version(element: &str) -> bool {
    element
        .strip_prefix('v')
        .is_some_and(|digits| !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()))
}

/// Where an import path points.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportTarget {
    /// A standard library package, not loaded from source.
    Standard { name: EcoString },
    /// A package directory to load.
    Dir(Utf8PathBuf),
}

/// Toolchain locations used to find imported packages.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportLocator {
    /// `$GOROOT`; standard imports are checked against `$GOROOT/src`.
    pub goroot: Option<Utf8PathBuf>,
    /// The module cache directory.
    pub module_cache: Option<Utf8PathBuf>,
}

impl ImportLocator {
    /// Reads `GOROOT`, `GOMODCACHE` and `GOPATH`, falling back to
    /// `~/go/pkg/mod` for the module cache.
    #[must_use]
    pub fn from_env() -> Self {
        let goroot = env::var("GOROOT")
            .ok()
            .filter(|v| !v.is_empty())
            .map(Utf8PathBuf::from);
        let module_cache = env::var("GOMODCACHE")
            .ok()
            .filter(|v| !v.is_empty())
            .map(Utf8PathBuf::from)
            .or_else(|| {
                let gopath = env::var_os("GOPATH")?;
                let first = env::split_paths(&gopath).next()?;
                let first = Utf8PathBuf::from_path_buf(first).ok()?;
                (!first.as_str().is_empty()).then(|| first.join("pkg").join("mod"))
            })
            .or_else(|| {
                let home = Utf8PathBuf::from_path_buf(dirs::home_dir()?).ok()?;
                Some(home.join("go").join("pkg").join("mod"))
            });
        Self {
            goroot,
            module_cache,
        }
    }

    /// Locates `import_path` as seen from a package governed by `module`.
    ///
    /// # Errors
    ///
    /// Returns a human-readable reason when no candidate location exists.
    pub fn locate(&self, import_path: &str, module: Option<&GoMod>) -> Result<ImportTarget, String> {
        if let Some(module) = module
            && let Some(dir) = module.local_dir(import_path)
        {
            return existing_dir(dir);
        }

        if is_standard_import(import_path) {
            if let Some(goroot) = &self.goroot {
                let dir = goroot.join("src").join(import_path);
                if !dir.is_dir() {
                    return Err(format!("not in standard library ({dir})"));
                }
            }
            return Ok(ImportTarget::Standard {
                name: default_package_name(import_path).into(),
            });
        }

        let Some(module) = module else {
            return Err("not in a module and not a standard library path".into());
        };

        let requirement = module.requirement_for(import_path);
        if let Some(replacement) =
            module.replacement_for(import_path, requirement.map(|r| r.version.as_str()))
        {
            let rest = strip_module_prefix(import_path, &replacement.path).unwrap_or_default();
            return match &replacement.target {
                ReplaceTarget::Dir(dir) => existing_dir(join_rest(dir, rest)),
                ReplaceTarget::Module { path, version } => self.cached(path, version, rest),
            };
        }

        let vendored = module.root.join("vendor").join(import_path);
        if vendored.is_dir() {
            return Ok(ImportTarget::Dir(vendored));
        }

        let Some(requirement) = requirement else {
            return Err(format!("no required module provides package {import_path}"));
        };
        let rest = strip_module_prefix(import_path, &requirement.path).unwrap_or_default();
        self.cached(&requirement.path, &requirement.version, rest)
    }

    fn cached(&self, module: &str, version: &str, rest: &str) -> Result<ImportTarget, String> {
        let Some(cache) = &self.module_cache else {
            return Err("no module cache configured".into());
        };
        let root = cache.join(format!(
            "{}@{}",
            escape_module_path(module),
            escape_module_path(version)
        ));
        existing_dir(join_rest(&root, rest))
    }
}

fn join_rest(dir: &Utf8Path, rest: &str) -> Utf8PathBuf {
    if rest.is_empty() {
        dir.to_path_buf()
    } else {
        dir.join(rest)
    }
}

fn existing_dir(dir: Utf8PathBuf) -> Result<ImportTarget, String> {
    if dir.is_dir() {
        Ok(ImportTarget::Dir(dir))
    } else {
        Err(format!("cannot find package directory {dir}"))
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    const GO_MOD_TEXT: &str = r#"module example.com/app // main module

go 1.22

require (
	github.com/BurntSushi/toml v1.3.2
	example.com/colors v0.4.0 // indirect
)

require "example.com/shapes" v1.0.0

replace example.com/colors => ../colors

replace (
	example.com/shapes v1.0.0 => example.com/shapes-fork v1.0.1
)
"#;

    fn parsed() -> GoMod {
        GoMod::parse(GO_MOD_TEXT, Utf8Path::new("/work/app")).expect("valid go.mod")
    }

    #[test]
    fn parse_module_require_and_replace() {
        let go_mod = parsed();
        assert_eq!(go_mod.module, "example.com/app");
        assert_eq!(go_mod.requires.len(), 3);
        assert_eq!(go_mod.requires[0].path, "github.com/BurntSushi/toml");
        assert_eq!(go_mod.requires[2].path, "example.com/shapes");
        assert_eq!(
            go_mod.replaces[0].target,
            ReplaceTarget::Dir(Utf8PathBuf::from("/work/app/../colors"))
        );
        assert_eq!(go_mod.replaces[1].version.as_deref(), Some("v1.0.0"));
        assert_eq!(
            go_mod.replaces[1].target,
            ReplaceTarget::Module {
                path: "example.com/shapes-fork".into(),
                version: "v1.0.1".into(),
            }
        );
    }

    #[test]
    fn parse_errors_name_the_line() {
        let err = GoMod::parse("module a\nrequire onlypath\n", Utf8Path::new("/"))
            .expect_err("require without version");
        assert_eq!(err.line, 2);
        assert!(err.to_string().starts_with("go.mod:2: usage: require"));

        let err = GoMod::parse("go 1.22\n", Utf8Path::new("/")).expect_err("no module");
        assert_eq!(err.message, "no module declaration");

        let err = GoMod::parse("module a\nrequire (\n", Utf8Path::new("/"))
            .expect_err("open block");
        assert_eq!(err.message, "unterminated block");
    }

    #[test]
    fn import_path_of_nested_dir() {
        let go_mod = parsed();
        assert_eq!(
            go_mod.import_path_of(Utf8Path::new("/work/app/ui/widgets")).as_deref(),
            Some("example.com/app/ui/widgets")
        );
        assert_eq!(
            go_mod.import_path_of(Utf8Path::new("/work/app")).as_deref(),
            Some("example.com/app")
        );
        assert_eq!(go_mod.import_path_of(Utf8Path::new("/elsewhere")), None);
    }

    #[test]
    fn module_prefix_matches_whole_elements() {
        assert_eq!(strip_module_prefix("example.com/app/ui", "example.com/app"), Some("ui"));
        assert_eq!(strip_module_prefix("example.com/app", "example.com/app"), Some(""));
        assert_eq!(strip_module_prefix("example.com/apple", "example.com/app"), None);
    }

    #[test]
    fn standard_paths_and_names() {
        assert!(is_standard_import("fmt"));
        assert!(is_standard_import("net/http"));
        assert!(!is_standard_import("github.com/x/y"));
        assert_eq!(default_package_name("fmt"), "fmt");
        assert_eq!(default_package_name("example.com/colors/v2"), "colors");
        assert_eq!(default_package_name("v2"), "v2");
    }

    #[test]
    fn locate_standard_without_goroot() {
        let locator = ImportLocator::default();
        assert_eq!(
            locator.locate("image/color", None),
            Ok(ImportTarget::Standard {
                name: "color".into()
            })
        );
        assert!(locator.locate("github.com/x/y", None).is_err());
    }

    #[test]
    fn locate_in_module_vendor_replace_and_cache() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let base = Utf8Path::from_path(tmp.path()).expect("utf8 tempdir");
        let app = base.join("app");
        let colors = base.join("colors");
        let cache = base.join("cache");
        let toml_dir = cache.join("github.com/!burnt!sushi/toml@v1.3.2/internal");
        let vendored = app.join("vendor/example.com/vendored/pkg");
        for dir in [&app.join("ui"), &colors.join("rgb"), &toml_dir, &vendored] {
            fs::create_dir_all(dir).expect("mkdir");
        }
        let go_mod = GoMod::parse(GO_MOD_TEXT, &app).expect("valid go.mod");
        let locator = ImportLocator {
            goroot: None,
            module_cache: Some(cache.clone()),
        };

        assert_eq!(
            locator.locate("example.com/app/ui", Some(&go_mod)),
            Ok(ImportTarget::Dir(app.join("ui")))
        );
        assert_eq!(
            locator.locate("example.com/colors/rgb", Some(&go_mod)),
            Ok(ImportTarget::Dir(app.join("../colors").join("rgb")))
        );
        assert_eq!(
            locator.locate("example.com/vendored/pkg", Some(&go_mod)),
            Ok(ImportTarget::Dir(vendored))
        );
        assert_eq!(
            locator.locate("github.com/BurntSushi/toml/internal", Some(&go_mod)),
            Ok(ImportTarget::Dir(toml_dir))
        );
        let missing = locator
            .locate("example.com/nowhere", Some(&go_mod))
            .expect_err("unrequired module");
        assert!(missing.contains("no required module"), "{missing}");
    }

    #[test]
    fn locate_checks_goroot_when_known() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let goroot = Utf8Path::from_path(tmp.path()).expect("utf8 tempdir");
        fs::create_dir_all(goroot.join("src/fmt")).expect("mkdir");
        let locator = ImportLocator {
            goroot: Some(goroot.to_path_buf()),
            module_cache: None,
        };
        assert!(locator.locate("fmt", None).is_ok());
        assert!(locator.locate("nosuchpkg", None).is_err());
    }
}
