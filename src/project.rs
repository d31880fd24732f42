//! Project-wide aggregate of parsed source units.
//!
//! Units are parsed without holding any lock; only `merge` takes the write
//! lock, once per unit, so readers never observe half of a unit. Merged
//! entries are never replaced or removed.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard};

use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::model::{FieldRef, JavaAnnotation, JavaClass, JavaPackage, SourceUnit, TypeBinding, TypeRef};
use crate::parser::parse_source;

#[derive(Debug, Default)]
struct ProjectState {
    units: Vec<Arc<SourceUnit>>,
    /// Every class, nested ones included, in merge order
    classes: Vec<Arc<JavaClass>>,
    by_name: HashMap<String, Arc<JavaClass>>,
    packages: BTreeMap<String, Vec<JavaPackage>>,
}

/// Outcome of `JavaProject::add_source_tree`
#[derive(Debug, Default)]
pub struct SourceTreeReport {
    pub merged: Vec<Arc<SourceUnit>>,
    /// Files whose parse aborted; they contribute nothing
    pub failed: Vec<(PathBuf, Error)>,
}

#[derive(Debug, Default)]
pub struct JavaProject {
    config: Config,
    state: RwLock<ProjectState>,
}

impl JavaProject {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            state: RwLock::new(ProjectState::default()),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    fn read(&self) -> RwLockReadGuard<'_, ProjectState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Parse and merge one anonymous unit
    pub fn add_source(&self, source: &str) -> Result<Arc<SourceUnit>> {
        let unit = parse_source(source, &self.config)?;
        Ok(self.merge(unit))
    }

    pub fn add_named_source(&self, name: impl Into<String>, source: &str) -> Result<Arc<SourceUnit>> {
        let mut unit = parse_source(source, &self.config)?;
        unit.name = Some(name.into());
        Ok(self.merge(unit))
    }

    pub fn add_file(&self, path: impl AsRef<Path>) -> Result<Arc<SourceUnit>> {
        let path = path.as_ref();
        let source = fs::read_to_string(path)?;
        self.add_named_source(path.display().to_string(), &source)
    }

    /// Parse every `.java` file below `root`, in path order
    pub fn add_source_tree(&self, root: impl AsRef<Path>) -> Result<SourceTreeReport> {
        let root = root.as_ref();
        let mut paths = Vec::new();
        for entry in WalkDir::new(root).follow_links(false) {
            let entry = entry.map_err(|e| Error::Io(e.into()))?;
            let path = entry.path();
            if entry.file_type().is_file() && path.extension().map_or(false, |ext| ext == "java") {
                paths.push(path.to_path_buf());
            }
        }
        paths.sort();

        let mut report = SourceTreeReport::default();
        for path in paths {
            match self.add_file(&path) {
                Ok(unit) => report.merged.push(unit),
                Err(Error::Io(e)) => return Err(Error::Io(e)),
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "source file not added");
                    report.failed.push((path, e));
                }
            }
        }
        debug!(root = %root.display(), merged = report.merged.len(), failed = report.failed.len(), "source tree added");
        Ok(report)
    }

    /// Add a finished unit to the aggregate in one step
    pub fn merge(&self, unit: SourceUnit) -> Arc<SourceUnit> {
        let unit = Arc::new(unit);
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);

        for class in unit.all_classes() {
            let fqn = class.fully_qualified_name.clone();
            if state.by_name.contains_key(&fqn) {
                warn!(class = %fqn, unit = ?unit.name, "duplicate class ignored");
                continue;
            }
            state.by_name.insert(fqn, Arc::clone(&class));
            state.classes.push(class);
        }
        if let Some(package) = &unit.package {
            state.packages.entry(package.name.clone()).or_default().push(package.clone());
        }
        state.units.push(Arc::clone(&unit));

        debug!(unit = ?unit.name, classes = unit.classes.len(), partial = unit.is_partial(), "merged source unit");
        unit
    }

    pub fn class_by_name(&self, fully_qualified_name: &str) -> Option<Arc<JavaClass>> {
        self.read().by_name.get(fully_qualified_name).cloned()
    }

    pub fn classes(&self) -> Vec<Arc<JavaClass>> {
        self.read().classes.clone()
    }

    pub fn classes_in_package(&self, package: &str) -> Vec<Arc<JavaClass>> {
        self.read()
            .classes
            .iter()
            .filter(|c| c.package == package)
            .cloned()
            .collect()
    }

    /// The package's declaration, preferring one that carries annotations
    pub fn package(&self, name: &str) -> Option<JavaPackage> {
        let state = self.read();
        let declarations = state.packages.get(name)?;
        declarations
            .iter()
            .find(|p| !p.annotations.is_empty())
            .or_else(|| declarations.first())
            .cloned()
    }

    /// Names of all known packages, sorted
    pub fn packages(&self) -> Vec<String> {
        self.read().packages.keys().cloned().collect()
    }

    pub fn units(&self) -> Vec<Arc<SourceUnit>> {
        self.read().units.clone()
    }

    /// Units merged with recovered errors
    pub fn partial_units(&self) -> Vec<Arc<SourceUnit>> {
        self.read().units.iter().filter(|u| u.is_partial()).cloned().collect()
    }

    fn lookup_binding(&self, binding: &TypeBinding, written: &str) -> Option<Arc<JavaClass>> {
        let state = self.read();
        match binding {
            TypeBinding::Resolved(fqn) => state.by_name.get(fqn).cloned(),
            TypeBinding::Unresolved { candidates, .. } => {
                candidates.iter().find_map(|c| state.by_name.get(c).cloned())
            }
            TypeBinding::Pending => state.by_name.get(written).cloned(),
            TypeBinding::Primitive | TypeBinding::TypeVariable => None,
        }
    }

    /// Link a type reference against the classes merged so far
    pub fn resolve_type(&self, type_ref: &TypeRef) -> Option<Arc<JavaClass>> {
        self.lookup_binding(&type_ref.binding, &type_ref.value)
    }

    pub fn resolve_annotation_type(&self, annotation: &JavaAnnotation) -> Option<Arc<JavaClass>> {
        self.resolve_type(&annotation.type_ref)
    }

    /// Class that declares the referenced field, if it has been merged
    pub fn resolve_field_ref(&self, field_ref: &FieldRef) -> Option<Arc<JavaClass>> {
        let written = field_ref.class_part().unwrap_or_default();
        let declares = |class: &Arc<JavaClass>| class.field_by_name(field_ref.field_part()).is_some();

        match &field_ref.class_binding {
            TypeBinding::Unresolved { candidates, .. } => {
                let state = self.read();
                candidates
                    .iter()
                    .filter_map(|c| state.by_name.get(c))
                    .find(|c| declares(*c))
                    .cloned()
            }
            binding => self.lookup_binding(binding, written).filter(declares),
        }
    }
}
