//! Java source model (javamodel)
//!
//! Reads Java source files without compiling them and recovers their
//! declarations: packages, imports, classes, fields, methods and the fully
//! structured annotations attached to each of them.
//!
//! ## Architecture
//!
//! - **parser**: Lexical analysis, the declaration grammar and the annotation-value sub-grammar
//! - **model**: Packages, classes, members, annotations and the builder that assembles them
//! - **project**: Thread-safe aggregate of every parsed unit, with cross-unit lookups
//!
//! ## Flow
//!
//! ```text
//! Java Source → Lexer → Parser → ModelBuilder → SourceUnit → JavaProject
//!                                     ↓
//!                              TypeResolver (binding pass)
//! ```

pub mod config;
pub mod consts;
pub mod error;
pub mod model;
pub mod parser;
pub mod project;

pub use config::{Config, RecoveryPolicy};
pub use error::{Error, Result};
pub use model::{
    AnnotationElement, AnnotationValue, BinaryExpression, BinaryOperator, ClassKind, Constant, DocComment, DocletTag,
    FieldRef, Import, JavaAnnotation, JavaClass, JavaField, JavaMethod, JavaPackage, JavaParameter, Modifier,
    SourceUnit, BoundKind, TypeArg, TypeBinding, TypeParam, TypeRef,
};
pub use parser::{ErrorKind, ParseError};
pub use project::{JavaProject, SourceTreeReport};

/// Parse a single Java source unit into its model
///
/// The unit is not merged anywhere; use [`JavaProject`] to link units together.
pub fn parse_source(source: &str, config: &Config) -> Result<SourceUnit> {
    parser::parse_source(source, config)
}

/// Read and parse one `.java` file
pub fn parse_file(path: impl AsRef<std::path::Path>, config: &Config) -> Result<SourceUnit> {
    let path = path.as_ref();
    let source = std::fs::read_to_string(path)?;
    let mut unit = parse_source(&source, config)?;
    unit.name = Some(path.display().to_string());
    Ok(unit)
}
