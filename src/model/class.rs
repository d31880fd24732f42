use std::sync::Arc;

use super::{AnnotationValue, DocComment, JavaAnnotation, TypeParam, TypeRef};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Modifier {
    Public,
    Protected,
    Private,
    Abstract,
    Static,
    Final,
    Native,
    Synchronized,
    Transient,
    Volatile,
    Strictfp,
    // Java 8: default interface method
    Default,
}

impl Modifier {
    pub fn as_str(&self) -> &'static str {
        match self {
            Modifier::Public => "public",
            Modifier::Protected => "protected",
            Modifier::Private => "private",
            Modifier::Abstract => "abstract",
            Modifier::Static => "static",
            Modifier::Final => "final",
            Modifier::Native => "native",
            Modifier::Synchronized => "synchronized",
            Modifier::Transient => "transient",
            Modifier::Volatile => "volatile",
            Modifier::Strictfp => "strictfp",
            Modifier::Default => "default",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassKind {
    Class,
    Interface,
    Enum,
    Annotation,
}

#[derive(Debug, Clone, PartialEq)]
pub struct JavaParameter {
    pub name: String,
    pub type_ref: TypeRef,
    pub modifiers: Vec<Modifier>,
    pub annotations: Vec<JavaAnnotation>,
    pub varargs: bool,
}

impl JavaParameter {
    pub fn annotations(&self) -> &[JavaAnnotation] {
        &self.annotations
    }

    pub fn is_final(&self) -> bool {
        self.modifiers.contains(&Modifier::Final)
    }
}

/// Method or constructor. Constructors have no return type.
#[derive(Debug, Clone, PartialEq)]
pub struct JavaMethod {
    pub name: String,
    pub modifiers: Vec<Modifier>,
    pub type_params: Vec<TypeParam>,
    pub return_type: Option<TypeRef>,
    pub parameters: Vec<JavaParameter>,
    pub exceptions: Vec<TypeRef>,
    pub annotations: Vec<JavaAnnotation>,
    /// `default` clause of an annotation-type element
    pub default_value: Option<AnnotationValue>,
    /// Body text between the braces, verbatim
    pub source_code: Option<String>,
    pub line_number: usize,
    pub doc: Option<DocComment>,
}

impl JavaMethod {
    pub fn is_constructor(&self) -> bool {
        self.return_type.is_none()
    }

    pub fn parameter_by_name(&self, name: &str) -> Option<&JavaParameter> {
        self.parameters.iter().find(|p| p.name == name)
    }

    pub fn annotations(&self) -> &[JavaAnnotation] {
        &self.annotations
    }

    pub fn is_varargs(&self) -> bool {
        self.parameters.last().map(|p| p.varargs).unwrap_or(false)
    }

    pub fn has_modifier(&self, modifier: Modifier) -> bool {
        self.modifiers.contains(&modifier)
    }

    /// `String xyz(int, java.util.List<T>...)` style signature
    pub fn signature(&self) -> String {
        let params: Vec<String> = self
            .parameters
            .iter()
            .map(|p| {
                if p.varargs {
                    format!("{}...", p.type_ref)
                } else {
                    p.type_ref.to_string()
                }
            })
            .collect();
        match &self.return_type {
            Some(ret) => format!("{} {}({})", ret, self.name, params.join(", ")),
            None => format!("{}({})", self.name, params.join(", ")),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct JavaField {
    pub name: String,
    pub type_ref: TypeRef,
    pub modifiers: Vec<Modifier>,
    pub annotations: Vec<JavaAnnotation>,
    /// Initializer expression as raw source text
    pub initializer: Option<String>,
    pub enum_constant: bool,
    pub line_number: usize,
    pub doc: Option<DocComment>,
}

impl JavaField {
    pub fn annotations(&self) -> &[JavaAnnotation] {
        &self.annotations
    }

    pub fn has_modifier(&self, modifier: Modifier) -> bool {
        self.modifiers.contains(&modifier)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct JavaClass {
    pub name: String,
    pub fully_qualified_name: String,
    /// Declaring package; empty for the default package
    pub package: String,
    pub kind: ClassKind,
    pub modifiers: Vec<Modifier>,
    pub type_params: Vec<TypeParam>,
    pub superclass: Option<TypeRef>,
    /// `implements` of classes and enums, `extends` of interfaces
    pub implements: Vec<TypeRef>,
    pub fields: Vec<JavaField>,
    pub methods: Vec<JavaMethod>,
    pub constructors: Vec<JavaMethod>,
    pub inner_classes: Vec<Arc<JavaClass>>,
    pub annotations: Vec<JavaAnnotation>,
    pub line_number: usize,
    pub doc: Option<DocComment>,
}

impl JavaClass {
    pub fn new(name: impl Into<String>, fully_qualified_name: impl Into<String>, kind: ClassKind) -> Self {
        Self {
            name: name.into(),
            fully_qualified_name: fully_qualified_name.into(),
            package: String::new(),
            kind,
            modifiers: Vec::new(),
            type_params: Vec::new(),
            superclass: None,
            implements: Vec::new(),
            fields: Vec::new(),
            methods: Vec::new(),
            constructors: Vec::new(),
            inner_classes: Vec::new(),
            annotations: Vec::new(),
            line_number: 0,
            doc: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn fully_qualified_name(&self) -> &str {
        &self.fully_qualified_name
    }

    pub fn annotations(&self) -> &[JavaAnnotation] {
        &self.annotations
    }

    pub fn methods(&self) -> &[JavaMethod] {
        &self.methods
    }

    pub fn fields(&self) -> &[JavaField] {
        &self.fields
    }

    pub fn is_interface(&self) -> bool {
        self.kind == ClassKind::Interface
    }

    pub fn is_enum(&self) -> bool {
        self.kind == ClassKind::Enum
    }

    pub fn is_annotation(&self) -> bool {
        self.kind == ClassKind::Annotation
    }

    pub fn method_by_name(&self, name: &str) -> Option<&JavaMethod> {
        self.methods.iter().find(|m| m.name == name)
    }

    pub fn methods_by_name<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a JavaMethod> + 'a {
        self.methods.iter().filter(move |m| m.name == name)
    }

    pub fn field_by_name(&self, name: &str) -> Option<&JavaField> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn enum_constants(&self) -> impl Iterator<Item = &JavaField> {
        self.fields.iter().filter(|f| f.enum_constant)
    }

    pub fn inner_class_by_name(&self, name: &str) -> Option<&Arc<JavaClass>> {
        self.inner_classes.iter().find(|c| c.name == name)
    }

    pub fn has_modifier(&self, modifier: Modifier) -> bool {
        self.modifiers.contains(&modifier)
    }

    /// `class` and every class nested in it, depth first
    pub fn with_nested(class: &Arc<JavaClass>) -> Vec<Arc<JavaClass>> {
        let mut out = vec![Arc::clone(class)];
        for inner in &class.inner_classes {
            out.extend(JavaClass::with_nested(inner));
        }
        out
    }
}
