//! Incremental model builder.
//!
//! The grammar parser drives a `ModelBuilder` through begin/add/end calls as
//! it recognizes declarations. Open classes live on an explicit stack; an
//! inner class is moved into its parent when it ends, so nothing half-built
//! is ever reachable from a finished class.

use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, warn};

use super::{DocComment, Import, JavaAnnotation, JavaClass, JavaField, JavaMethod, JavaPackage, TypeResolver};
use crate::parser::ParseError;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum BuildError {
    #[error("model is finalized and can no longer be modified")]
    Finalized,

    #[error("no class is open")]
    NoOpenClass,

    #[error("class '{0}' is still open")]
    ClassStillOpen(String),

    #[error("package already declared as '{0}'")]
    DuplicatePackage(String),

    #[error("package declaration must precede type declarations")]
    PackageAfterType,
}

/// Frozen model of one parsed source unit
#[derive(Debug, Clone)]
pub struct SourceUnit {
    /// Path or label the unit was added under, if any
    pub name: Option<String>,
    pub package: Option<JavaPackage>,
    pub imports: Vec<Import>,
    /// Top-level classes in declaration order
    pub classes: Vec<Arc<JavaClass>>,
    /// Errors recovered from while parsing; non-empty means partial
    pub diagnostics: Vec<ParseError>,
}

impl SourceUnit {
    pub fn package(&self) -> Option<&JavaPackage> {
        self.package.as_ref()
    }

    pub fn package_name(&self) -> &str {
        self.package.as_ref().map(|p| p.name.as_str()).unwrap_or("")
    }

    pub fn imports(&self) -> &[Import] {
        &self.imports
    }

    pub fn classes(&self) -> &[Arc<JavaClass>] {
        &self.classes
    }

    pub fn diagnostics(&self) -> &[ParseError] {
        &self.diagnostics
    }

    /// Top-level and nested classes, depth first
    pub fn all_classes(&self) -> Vec<Arc<JavaClass>> {
        self.classes.iter().flat_map(JavaClass::with_nested).collect()
    }

    /// Look a class up by simple or fully-qualified name, nested ones included
    pub fn class_by_name(&self, name: &str) -> Option<Arc<JavaClass>> {
        self.all_classes()
            .into_iter()
            .find(|c| c.fully_qualified_name == name || c.name == name)
    }

    pub fn is_partial(&self) -> bool {
        !self.diagnostics.is_empty()
    }
}

#[derive(Debug, Default)]
pub struct ModelBuilder {
    package: Option<JavaPackage>,
    imports: Vec<Import>,
    open: Vec<JavaClass>,
    classes: Vec<Arc<JavaClass>>,
    diagnostics: Vec<ParseError>,
    finished: bool,
}

impl ModelBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    fn check_open(&self) -> Result<(), BuildError> {
        if self.finished {
            Err(BuildError::Finalized)
        } else {
            Ok(())
        }
    }

    pub fn set_package(
        &mut self,
        name: impl Into<String>,
        annotations: Vec<JavaAnnotation>,
        line_number: usize,
        doc: Option<DocComment>,
    ) -> Result<(), BuildError> {
        self.check_open()?;
        if let Some(existing) = &self.package {
            return Err(if existing.is_default() {
                BuildError::PackageAfterType
            } else {
                BuildError::DuplicatePackage(existing.name.clone())
            });
        }
        if !self.classes.is_empty() || !self.open.is_empty() {
            return Err(BuildError::PackageAfterType);
        }

        let mut package = JavaPackage::new(name, line_number);
        package.annotations = annotations;
        package.doc = doc;
        self.package = Some(package);
        Ok(())
    }

    pub fn add_import(&mut self, import: Import) -> Result<(), BuildError> {
        self.check_open()?;
        self.imports.push(import);
        Ok(())
    }

    /// Open a class; its name is qualified by the enclosing class or package
    pub fn begin_class(&mut self, mut class: JavaClass) -> Result<(), BuildError> {
        self.check_open()?;

        let package = self
            .package
            .get_or_insert_with(|| JavaPackage::new("", class.line_number));
        class.package = package.name.clone();
        class.fully_qualified_name = match self.open.last() {
            Some(outer) => format!("{}.{}", outer.fully_qualified_name, class.name),
            None if package.is_default() => class.name.clone(),
            None => format!("{}.{}", package.name, class.name),
        };

        self.open.push(class);
        Ok(())
    }

    pub fn end_class(&mut self) -> Result<(), BuildError> {
        self.check_open()?;
        let class = self.open.pop().ok_or(BuildError::NoOpenClass)?;
        match self.open.last_mut() {
            Some(outer) => outer.inner_classes.push(Arc::new(class)),
            None => self.classes.push(Arc::new(class)),
        }
        Ok(())
    }

    fn current(&mut self) -> Result<&mut JavaClass, BuildError> {
        self.check_open()?;
        self.open.last_mut().ok_or(BuildError::NoOpenClass)
    }

    pub fn add_field(&mut self, field: JavaField) -> Result<(), BuildError> {
        self.current()?.fields.push(field);
        Ok(())
    }

    pub fn add_method(&mut self, method: JavaMethod) -> Result<(), BuildError> {
        self.current()?.methods.push(method);
        Ok(())
    }

    pub fn add_constructor(&mut self, constructor: JavaMethod) -> Result<(), BuildError> {
        self.current()?.constructors.push(constructor);
        Ok(())
    }

    /// Number of classes currently open
    pub fn depth(&self) -> usize {
        self.open.len()
    }

    /// Drop classes opened above `depth`; used when a declaration is skipped
    pub fn discard_above(&mut self, depth: usize) -> usize {
        let mut dropped = 0;
        while self.open.len() > depth {
            if let Some(class) = self.open.pop() {
                warn!(class = %class.fully_qualified_name, "discarding incomplete class");
                dropped += 1;
            }
        }
        dropped
    }

    pub fn record_diagnostic(&mut self, error: ParseError) -> Result<(), BuildError> {
        self.check_open()?;
        self.diagnostics.push(error);
        Ok(())
    }

    pub fn diagnostics(&self) -> &[ParseError] {
        &self.diagnostics
    }

    /// Bind type names and hand out the finished unit.
    ///
    /// The builder is finalized afterwards and rejects every further call.
    pub fn finish(&mut self) -> Result<SourceUnit, BuildError> {
        self.check_open()?;
        if let Some(class) = self.open.last() {
            return Err(BuildError::ClassStillOpen(class.fully_qualified_name.clone()));
        }
        self.finished = true;

        let mut package = self.package.take();
        let imports = std::mem::take(&mut self.imports);
        let mut classes = std::mem::take(&mut self.classes);

        let package_name = package.as_ref().map(|p| p.name.clone()).unwrap_or_default();
        {
            let mut resolver = TypeResolver::new(&package_name, &imports, &classes);
            if let Some(package) = &mut package {
                for annotation in &mut package.annotations {
                    resolver.bind_annotation(annotation);
                }
            }
            for class in &mut classes {
                resolver.bind_class(Arc::make_mut(class));
            }
        }

        debug!(
            package = %package_name,
            classes = classes.len(),
            diagnostics = self.diagnostics.len(),
            "finished source unit"
        );

        Ok(SourceUnit {
            name: None,
            package,
            imports,
            classes,
            diagnostics: std::mem::take(&mut self.diagnostics),
        })
    }
}
