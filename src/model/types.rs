use std::borrow::Cow;
use std::fmt;

use super::JavaAnnotation;

/// How a type name written in source was bound within its own unit.
///
/// Binding never needs a classpath: names that cannot be settled from the
/// unit alone stay `Unresolved` with the candidates an external resolver
/// should try, in order.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum TypeBinding {
    Primitive,
    TypeVariable,
    Resolved(String),
    Unresolved { guess: String, candidates: Vec<String> },
    /// Not yet visited by the binding pass
    #[default]
    Pending,
}

/// A type as written in source: `int`, `java.util.Map<K, V>[]`, `T`
#[derive(Debug, Clone, PartialEq)]
pub struct TypeRef {
    /// Name exactly as typed, without type arguments or dimensions
    pub value: String,
    pub type_args: Vec<TypeArg>,
    pub dimensions: usize,
    /// Type-use annotations written before the type
    pub annotations: Vec<JavaAnnotation>,
    pub binding: TypeBinding,
}

impl TypeRef {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            type_args: Vec::new(),
            dimensions: 0,
            annotations: Vec::new(),
            binding: TypeBinding::Pending,
        }
    }

    pub fn with_dimensions(mut self, dimensions: usize) -> Self {
        self.dimensions = dimensions;
        self
    }

    pub fn with_type_args(mut self, type_args: Vec<TypeArg>) -> Self {
        self.type_args = type_args;
        self
    }

    pub fn is_primitive(&self) -> bool {
        crate::consts::PRIMITIVE_TYPES.contains(&self.value.as_str())
    }

    pub fn is_void(&self) -> bool {
        self.value == "void" && self.dimensions == 0
    }

    pub fn is_array(&self) -> bool {
        self.dimensions > 0
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self.binding, TypeBinding::Primitive | TypeBinding::Resolved(_))
    }

    /// Resolved name, else the best guess; never the type arguments or dims
    pub fn fully_qualified_name(&self) -> Cow<'_, str> {
        match &self.binding {
            TypeBinding::Resolved(fqn) => Cow::Borrowed(fqn.as_str()),
            TypeBinding::Unresolved { guess, .. } => Cow::Borrowed(guess.as_str()),
            _ => Cow::Borrowed(self.value.as_str()),
        }
    }

    /// Candidate fully-qualified names, most likely first
    pub fn candidates(&self) -> Vec<&str> {
        match &self.binding {
            TypeBinding::Resolved(fqn) => vec![fqn.as_str()],
            TypeBinding::Unresolved { candidates, .. } => candidates.iter().map(String::as_str).collect(),
            _ => Vec::new(),
        }
    }

    /// Canonical text of the type: `java.util.Map<K, V>[]`
    pub fn generic_value(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)?;
        if !self.type_args.is_empty() {
            write!(f, "<")?;
            for (i, arg) in self.type_args.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{}", arg)?;
            }
            write!(f, ">")?;
        }
        for _ in 0..self.dimensions {
            write!(f, "[]")?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TypeArg {
    Type(TypeRef),
    Wildcard(Option<(BoundKind, TypeRef)>),
}

impl fmt::Display for TypeArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeArg::Type(t) => write!(f, "{}", t),
            TypeArg::Wildcard(None) => write!(f, "?"),
            TypeArg::Wildcard(Some((BoundKind::Extends, t))) => write!(f, "? extends {}", t),
            TypeArg::Wildcard(Some((BoundKind::Super, t))) => write!(f, "? super {}", t),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundKind {
    Extends,
    Super,
}

/// Generic type parameter declaration: `T extends Comparable<T> & Serializable`
#[derive(Debug, Clone, PartialEq)]
pub struct TypeParam {
    pub name: String,
    pub bounds: Vec<TypeRef>,
    pub annotations: Vec<JavaAnnotation>,
}

impl fmt::Display for TypeParam {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        for (i, bound) in self.bounds.iter().enumerate() {
            write!(f, "{}{}", if i == 0 { " extends " } else { " & " }, bound)?;
        }
        Ok(())
    }
}
