use super::{TypeBinding, TypeRef};
use crate::consts::DEFAULT_ELEMENT_NAME;

/// A literal value exactly as typed by its suffix or prefix
#[derive(Debug, Clone, PartialEq)]
pub enum Constant {
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    Char(char),
    Boolean(bool),
    String(String),
}

impl Constant {
    /// Java name of the constant's type
    pub fn type_name(&self) -> &'static str {
        match self {
            Constant::Int(_) => "int",
            Constant::Long(_) => "long",
            Constant::Float(_) => "float",
            Constant::Double(_) => "double",
            Constant::Char(_) => "char",
            Constant::Boolean(_) => "boolean",
            Constant::String(_) => "java.lang.String",
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, Constant::Int(_) | Constant::Long(_) | Constant::Float(_) | Constant::Double(_))
    }

    /// Arithmetic negation; `None` for non-numeric constants
    pub fn negate(&self) -> Option<Constant> {
        match self {
            Constant::Int(v) => Some(Constant::Int(v.wrapping_neg())),
            Constant::Long(v) => Some(Constant::Long(v.wrapping_neg())),
            Constant::Float(v) => Some(Constant::Float(-v)),
            Constant::Double(v) => Some(Constant::Double(-v)),
            _ => None,
        }
    }
}

/// Reference to a static field used as a value, e.g. `java.lang.Math.E`.
///
/// The split is purely syntactic: everything before the last dot is the
/// class part. The field itself is never evaluated.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldRef {
    pub class_part: Option<String>,
    pub field_part: String,
    /// Binding of the class part (or of the implied class for bare names)
    pub class_binding: TypeBinding,
}

impl FieldRef {
    pub fn new(class_part: Option<String>, field_part: impl Into<String>) -> Self {
        Self {
            class_part,
            field_part: field_part.into(),
            class_binding: TypeBinding::Pending,
        }
    }

    /// Split a dotted name at its last dot
    pub fn from_qualified(name: &str) -> Self {
        match name.rsplit_once('.') {
            Some((class_part, field_part)) => Self::new(Some(class_part.to_string()), field_part),
            None => Self::new(None, name),
        }
    }

    pub fn class_part(&self) -> Option<&str> {
        self.class_part.as_deref()
    }

    pub fn field_part(&self) -> &str {
        &self.field_part
    }

    /// Full dotted name as written
    pub fn name(&self) -> String {
        match &self.class_part {
            Some(class_part) => format!("{}.{}", class_part, self.field_part),
            None => self.field_part.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOperator {
    Add,
}

impl BinaryOperator {
    pub fn symbol(&self) -> &'static str {
        match self {
            BinaryOperator::Add => "+",
        }
    }
}

/// Unevaluated expression tree; operands keep their own types
#[derive(Debug, Clone, PartialEq)]
pub struct BinaryExpression {
    pub operator: BinaryOperator,
    pub left: Box<AnnotationValue>,
    pub right: Box<AnnotationValue>,
}

impl BinaryExpression {
    pub fn new(operator: BinaryOperator, left: AnnotationValue, right: AnnotationValue) -> Self {
        Self {
            operator,
            left: Box::new(left),
            right: Box::new(right),
        }
    }
}

/// Right-hand side of an annotation element
#[derive(Debug, Clone, PartialEq)]
pub enum AnnotationValue {
    Constant(Constant),
    ValueList(Vec<AnnotationValue>),
    NestedAnnotation(Box<JavaAnnotation>),
    FieldRef(FieldRef),
    /// Class-literal: `int.class`, `java.util.Set.class`
    TypeRef(TypeRef),
    BinaryExpression(BinaryExpression),
}

impl AnnotationValue {
    pub fn as_constant(&self) -> Option<&Constant> {
        match self {
            AnnotationValue::Constant(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[AnnotationValue]> {
        match self {
            AnnotationValue::ValueList(values) => Some(values),
            _ => None,
        }
    }

    pub fn as_annotation(&self) -> Option<&JavaAnnotation> {
        match self {
            AnnotationValue::NestedAnnotation(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_field_ref(&self) -> Option<&FieldRef> {
        match self {
            AnnotationValue::FieldRef(r) => Some(r),
            _ => None,
        }
    }

    pub fn as_type_ref(&self) -> Option<&TypeRef> {
        match self {
            AnnotationValue::TypeRef(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_binary(&self) -> Option<&BinaryExpression> {
        match self {
            AnnotationValue::BinaryExpression(e) => Some(e),
            _ => None,
        }
    }
}

/// One `name = value` pair inside annotation parentheses
#[derive(Debug, Clone, PartialEq)]
pub struct AnnotationElement {
    pub name: String,
    pub value: AnnotationValue,
}

#[derive(Debug, Clone, PartialEq)]
pub struct JavaAnnotation {
    pub type_ref: TypeRef,
    /// Source order; names are unique
    pub elements: Vec<AnnotationElement>,
    pub line_number: usize,
}

impl JavaAnnotation {
    pub fn new(type_ref: TypeRef, line_number: usize) -> Self {
        Self {
            type_ref,
            elements: Vec::new(),
            line_number,
        }
    }

    pub fn type_ref(&self) -> &TypeRef {
        &self.type_ref
    }

    /// Value of an element; the implicit single element is keyed `"value"`
    pub fn property(&self, name: &str) -> Option<&AnnotationValue> {
        self.elements.iter().find(|e| e.name == name).map(|e| &e.value)
    }

    pub fn value(&self) -> Option<&AnnotationValue> {
        self.property(DEFAULT_ELEMENT_NAME)
    }

    pub fn property_names(&self) -> impl Iterator<Item = &str> {
        self.elements.iter().map(|e| e.name.as_str())
    }

    pub fn has_property(&self, name: &str) -> bool {
        self.elements.iter().any(|e| e.name == name)
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}
