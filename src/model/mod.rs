//! Object model produced by the parser.
//!
//! Everything here is plain data: the builder owns all mutation while a unit
//! is being parsed, and a finished `SourceUnit` is read-only.

pub mod annotation;
pub mod builder;
pub mod class;
pub mod doc;
pub mod package;
pub mod printer;
pub mod resolve;
pub mod types;

pub use annotation::{AnnotationElement, AnnotationValue, BinaryExpression, BinaryOperator, Constant, FieldRef, JavaAnnotation};
pub use builder::{BuildError, ModelBuilder, SourceUnit};
pub use class::{ClassKind, JavaClass, JavaField, JavaMethod, JavaParameter, Modifier};
pub use doc::{DocComment, DocletTag};
pub use package::{Import, JavaPackage};
pub use resolve::TypeResolver;
pub use types::{BoundKind, TypeArg, TypeBinding, TypeParam, TypeRef};
