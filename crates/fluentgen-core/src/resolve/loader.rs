// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Package loading.

use std::collections::HashMap;
use std::fs;
use std::rc::Rc;

use camino::{Utf8Path, Utf8PathBuf};
use ecow::EcoString;
use tracing::{debug, instrument, trace};

use super::checker::{Checker, FileImports, ImportBinding};
use super::module::{self, GoMod, ImportLocator, ImportTarget};
use super::scope::PackageScope;
use super::types::{PackageId, ResolvedType};
use super::{Definition, DefinitionKind, ResolveError, ResolvedFile, ResolvedPackage};
use crate::source_analysis::{Span, parse_source};

/// Loads and resolves packages, caching every package it loads.
///
/// A loader may be reused for several root packages; shared dependencies
/// are loaded once.
#[derive(Debug)]
pub struct Loader {
    locator: ImportLocator,
    /// Loaded packages by canonical directory.
    loaded: HashMap<Utf8PathBuf, Rc<ResolvedPackage>>,
    /// Loaded packages by import path.
    by_path: HashMap<EcoString, Rc<ResolvedPackage>>,
    /// Parsed `go.mod` files by path.
    modules: HashMap<Utf8PathBuf, Rc<GoMod>>,
    /// Packages being loaded: canonical directory and import path.
    stack: Vec<(Utf8PathBuf, EcoString)>,
}

impl Loader {
    #[must_use]
    pub fn new(locator: ImportLocator) -> Self {
        Self {
            locator,
            loaded: HashMap::new(),
            by_path: HashMap::new(),
            modules: HashMap::new(),
            stack: Vec::new(),
        }
    }

    /// Loads the package in `dir` and everything it imports.
    ///
    /// # Errors
    ///
    /// Returns the first [`ResolveError`] met anywhere in the dependency
    /// graph.
    #[instrument(skip_all, fields(dir = %dir))]
    pub fn load(&mut self, dir: &Utf8Path) -> Result<ResolvedPackage, ResolveError> {
        let import_path = self
            .module_for(dir)?
            .and_then(|go_mod| go_mod.import_path_of(&canonical(dir)))
            .unwrap_or_else(|| dir.as_str().into());
        let package = self.load_package(dir, import_path, None)?;
        Ok(ResolvedPackage::clone(&package))
    }

    fn load_package(
        &mut self,
        dir: &Utf8Path,
        import_path: EcoString,
        importer: Option<(&Utf8Path, Span)>,
    ) -> Result<Rc<ResolvedPackage>, ResolveError> {
        let key = canonical(dir);
        if let Some(package) = self.loaded.get(&key) {
            return Ok(Rc::clone(package));
        }
        if let Some(start) = self.stack.iter().position(|(open, _)| *open == key) {
            let mut cycle: Vec<EcoString> =
                self.stack[start..].iter().map(|(_, path)| path.clone()).collect();
            cycle.push(import_path);
            let (path, span) = importer.map_or_else(
                || (dir.to_path_buf(), Span::default()),
                |(path, span)| (path.to_path_buf(), span),
            );
            return Err(ResolveError::ImportCycle { cycle, path, span });
        }

        self.stack.push((key.clone(), import_path.clone()));
        let result = self.load_uncached(dir, &import_path, importer);
        self.stack.pop();

        let package = Rc::new(result?);
        debug!(
            package = %package.id.name,
            path = %package.id.path,
            definitions = package.definitions.len(),
            "loaded package"
        );
        self.loaded.insert(key, Rc::clone(&package));
        self.by_path.insert(import_path, Rc::clone(&package));
        Ok(package)
    }

    fn load_uncached(
        &mut self,
        dir: &Utf8Path,
        import_path: &EcoString,
        importer: Option<(&Utf8Path, Span)>,
    ) -> Result<ResolvedPackage, ResolveError> {
        let files = read_files(dir, import_path, importer)?;
        let name = files[0].syntax.package.name.clone();
        for file in &files[1..] {
            if file.syntax.package.name != name {
                return Err(ResolveError::MismatchedPackage {
                    path: file.path.clone(),
                    expected: name,
                    found: file.syntax.package.name.clone(),
                    span: file.syntax.package.span,
                });
            }
        }
        let id = PackageId::new(import_path.clone(), name);
        let scope = PackageScope::build(&files)?;

        let go_mod = self.module_for(dir)?;
        let mut imports = Vec::with_capacity(files.len());
        for file in &files {
            imports.push(self.bind_imports(file, go_mod.as_deref())?);
        }

        let mut definitions = Vec::new();
        for (index, file) in files.iter().enumerate() {
            for spec in file.syntax.type_specs() {
                let type_params: Vec<EcoString> =
                    spec.type_params.iter().map(|p| p.name.name.clone()).collect();
                let checker = Checker {
                    package: &id,
                    scope: &scope,
                    imports: &imports[index],
                    path: &file.path,
                    type_params: &type_params,
                };
                for param in &spec.type_params {
                    checker.resolve(&param.constraint)?;
                }
                let ty = checker.resolve(&spec.ty)?;
                trace!(name = %spec.name.name, ty = %ty.qualified(&id), "resolved type");
                definitions.push(Definition {
                    name: spec.name.clone(),
                    file: index,
                    kind: if spec.is_alias {
                        DefinitionKind::Alias
                    } else {
                        DefinitionKind::Defined
                    },
                    type_params,
                    ty,
                    underlying: None,
                    doc: spec.doc.clone(),
                });
            }
        }

        let underlying = UnderlyingPass::new(self, &id, &files, &definitions).run()?;
        for (definition, underlying) in definitions.iter_mut().zip(underlying) {
            definition.underlying = underlying;
        }
        ContainmentPass::new(&id, &files, &definitions).run()?;

        Ok(ResolvedPackage {
            id,
            dir: dir.to_path_buf(),
            files,
            definitions,
            scope,
        })
    }

    /// Locates, loads and names every import of `file`.
    fn bind_imports(
        &mut self,
        file: &ResolvedFile,
        go_mod: Option<&GoMod>,
    ) -> Result<FileImports, ResolveError> {
        let mut imports = FileImports::default();
        for spec in &file.syntax.imports {
            let target = self.locator.locate(&spec.path, go_mod).map_err(|reason| {
                ResolveError::PackageNotFound {
                    import_path: spec.path.clone(),
                    reason,
                    location: Some((file.path.clone(), spec.span)),
                }
            })?;
            let binding = match target {
                ImportTarget::Standard { name } => {
                    ImportBinding::Standard(PackageId::new(spec.path.clone(), name))
                }
                ImportTarget::Dir(dir) => ImportBinding::Loaded(self.load_package(
                    &dir,
                    spec.path.clone(),
                    Some((file.path.as_path(), spec.span)),
                )?),
            };
            let local = match &spec.name {
                Some(name) if name.is_blank() => continue,
                Some(name) if name.name == "." => {
                    imports.dot.push(binding);
                    continue;
                }
                Some(name) => name.name.clone(),
                None => binding.id().name.clone(),
            };
            if let Some((_, previous_span)) = imports.named.get(&local) {
                return Err(ResolveError::Redeclared {
                    name: local,
                    path: file.path.clone(),
                    span: spec.span,
                    previous: file.path.clone(),
                    previous_span: *previous_span,
                });
            }
            imports.named.insert(local, (binding, spec.span));
        }
        Ok(imports)
    }

    /// Finds and parses the `go.mod` governing `dir`.
    fn module_for(&mut self, dir: &Utf8Path) -> Result<Option<Rc<GoMod>>, ResolveError> {
        let Some(path) = module::find_go_mod(&canonical(dir)) else {
            return Ok(None);
        };
        if let Some(go_mod) = self.modules.get(&path) {
            return Ok(Some(Rc::clone(go_mod)));
        }
        let text = fs::read_to_string(&path).map_err(|source| ResolveError::Io {
            path: path.clone(),
            source,
        })?;
        let root = path.parent().unwrap_or(Utf8Path::new("")).to_path_buf();
        let go_mod = Rc::new(GoMod::parse(&text, &root).map_err(|source| ResolveError::GoMod {
            path: path.clone(),
            source,
        })?);
        debug!(module = %go_mod.module, %path, "read module file");
        self.modules.insert(path, Rc::clone(&go_mod));
        Ok(Some(go_mod))
    }
}

fn canonical(dir: &Utf8Path) -> Utf8PathBuf {
    dir.canonicalize_utf8().unwrap_or_else(|_| dir.to_path_buf())
}

/// Reads and parses every package source in `dir`.
fn read_files(
    dir: &Utf8Path,
    import_path: &EcoString,
    importer: Option<(&Utf8Path, Span)>,
) -> Result<Vec<ResolvedFile>, ResolveError> {
    let not_found = |reason: String| ResolveError::PackageNotFound {
        import_path: import_path.clone(),
        reason,
        location: importer.map(|(path, span)| (path.to_path_buf(), span)),
    };
    let paths = super::package_files(dir).map_err(|err| not_found(format!("{dir}: {err}")))?;
    if paths.is_empty() {
        return Err(not_found(format!("no Go files in {dir}")));
    }

    let mut files = Vec::with_capacity(paths.len());
    for path in paths {
        let source = fs::read_to_string(&path).map_err(|source| ResolveError::Io {
            path: path.clone(),
            source,
        })?;
        let (syntax, diagnostics) = parse_source(&source);
        if diagnostics.iter().any(|d| d.is_error()) {
            return Err(ResolveError::Syntax { path, diagnostics });
        }
        files.push(ResolvedFile {
            path,
            source,
            syntax,
        });
    }
    Ok(files)
}

#[derive(Debug, Clone)]
enum State {
    Pending,
    Visiting,
    Done(Option<ResolvedType>),
}

/// Computes underlying types of one package's definitions, following
/// chains like `type A B; type B struct{...}` across packages.
struct UnderlyingPass<'a> {
    loader: &'a Loader,
    package: &'a PackageId,
    files: &'a [ResolvedFile],
    definitions: &'a [Definition],
    index: HashMap<&'a str, usize>,
    state: Vec<State>,
}

impl<'a> UnderlyingPass<'a> {
    fn new(
        loader: &'a Loader,
        package: &'a PackageId,
        files: &'a [ResolvedFile],
        definitions: &'a [Definition],
    ) -> Self {
        let index = definitions
            .iter()
            .enumerate()
            .map(|(i, def)| (def.name.name.as_str(), i))
            .collect();
        Self {
            loader,
            package,
            files,
            definitions,
            index,
            state: vec![State::Pending; definitions.len()],
        }
    }

    fn run(mut self) -> Result<Vec<Option<ResolvedType>>, ResolveError> {
        (0..self.definitions.len())
            .map(|i| self.of_definition(i))
            .collect()
    }

    fn of_definition(&mut self, i: usize) -> Result<Option<ResolvedType>, ResolveError> {
        match &self.state[i] {
            State::Done(underlying) => return Ok(underlying.clone()),
            State::Visiting => return Err(recursive_type(&self.definitions[i], self.files)),
            State::Pending => {}
        }
        self.state[i] = State::Visiting;
        let definitions = self.definitions;
        let underlying = self.of_type(&definitions[i].ty)?;
        self.state[i] = State::Done(underlying.clone());
        Ok(underlying)
    }

    fn of_type(&mut self, ty: &ResolvedType) -> Result<Option<ResolvedType>, ResolveError> {
        let ResolvedType::Named(named) = ty else {
            return Ok(match ty {
                ResolvedType::TypeParam(_) => None,
                other => Some(other.clone()),
            });
        };
        let definitions = self.definitions;
        let (underlying, params) = if named.package == *self.package {
            let Some(&i) = self.index.get(named.name.as_str()) else {
                return Ok(None);
            };
            (self.of_definition(i)?, &definitions[i].type_params)
        } else {
            let Some(definition) = self
                .loader
                .by_path
                .get(&named.package.path)
                .and_then(|package| package.definition(&named.name))
            else {
                return Ok(None);
            };
            (definition.underlying.clone(), &definition.type_params)
        };
        let bindings: Vec<(EcoString, ResolvedType)> = params
            .iter()
            .cloned()
            .zip(named.args.iter().cloned())
            .collect();
        Ok(underlying.map(|ty| ty.substitute(&bindings)))
    }
}

fn recursive_type(definition: &Definition, files: &[ResolvedFile]) -> ResolveError {
    ResolveError::RecursiveType {
        name: definition.name.name.clone(),
        path: files[definition.file].path.clone(),
        span: definition.name.span,
    }
}

/// Rejects definitions that contain themselves by value, as in
/// `type T struct{ next T }` or `type T struct{ ring [2]T }`.
///
/// Arrays, struct fields and local named types are followed; pointers,
/// slices, maps, channels, functions and interfaces break the walk.
struct ContainmentPass<'a> {
    package: &'a PackageId,
    files: &'a [ResolvedFile],
    definitions: &'a [Definition],
    index: HashMap<&'a str, usize>,
    /// `Some(false)` while on the walk, `Some(true)` once cleared.
    state: Vec<Option<bool>>,
}

impl<'a> ContainmentPass<'a> {
    fn new(
        package: &'a PackageId,
        files: &'a [ResolvedFile],
        definitions: &'a [Definition],
    ) -> Self {
        let index = definitions
            .iter()
            .enumerate()
            .map(|(i, def)| (def.name.name.as_str(), i))
            .collect();
        Self {
            package,
            files,
            definitions,
            index,
            state: vec![None; definitions.len()],
        }
    }

    fn run(mut self) -> Result<(), ResolveError> {
        (0..self.definitions.len()).try_for_each(|i| self.definition(i, &[]))
    }

    fn definition(&mut self, i: usize, args: &[ResolvedType]) -> Result<(), ResolveError> {
        let previous = self.state[i];
        match previous {
            Some(true) if args.is_empty() => return Ok(()),
            Some(false) => return Err(recursive_type(&self.definitions[i], self.files)),
            _ => {}
        }
        let definitions = self.definitions;
        let definition = &definitions[i];
        let Some(underlying) = &definition.underlying else {
            return Ok(());
        };
        self.state[i] = Some(false);
        if args.is_empty() {
            self.contained(underlying)?;
            self.state[i] = Some(true);
        } else {
            // Instantiations are walked with their arguments in place and
            // leave no mark.
            let bindings: Vec<(EcoString, ResolvedType)> = definition
                .type_params
                .iter()
                .cloned()
                .zip(args.iter().cloned())
                .collect();
            self.contained(&underlying.substitute(&bindings))?;
            self.state[i] = previous;
        }
        Ok(())
    }

    fn contained(&mut self, ty: &ResolvedType) -> Result<(), ResolveError> {
        match ty {
            ResolvedType::Named(named) if named.package == *self.package => {
                match self.index.get(named.name.as_str()) {
                    Some(&i) => self.definition(i, &named.args),
                    None => Ok(()),
                }
            }
            ResolvedType::Array { elem, .. } => self.contained(elem),
            ResolvedType::Struct(structure) => structure
                .fields
                .iter()
                .try_for_each(|field| self.contained(&field.ty)),
            _ => Ok(()),
        }
    }
}
