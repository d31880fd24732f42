//! Canonical annotation syntax.
//!
//! The text produced here parses back to a structurally equal value, so it
//! doubles as the model's debug and comparison format.

use std::fmt;

use super::{AnnotationValue, BinaryExpression, Constant, FieldRef, JavaAnnotation};

impl fmt::Display for Constant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Constant::Int(v) => write!(f, "{}", v),
            Constant::Long(v) => write!(f, "{}L", v),
            Constant::Float(v) => write!(f, "{:?}f", v),
            Constant::Double(v) => write!(f, "{:?}", v),
            Constant::Char(c) => write!(f, "'{}'", escape_char(*c, '\'')),
            Constant::Boolean(b) => write!(f, "{}", b),
            Constant::String(s) => {
                write!(f, "\"")?;
                for c in s.chars() {
                    write!(f, "{}", escape_char(c, '"'))?;
                }
                write!(f, "\"")
            }
        }
    }
}

impl fmt::Display for FieldRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.class_part {
            Some(class_part) => write!(f, "{}.{}", class_part, self.field_part),
            None => write!(f, "{}", self.field_part),
        }
    }
}

impl fmt::Display for BinaryExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} ", self.left, self.operator.symbol())?;
        // Left-associative: only a nested right operand needs grouping
        match self.right.as_ref() {
            AnnotationValue::BinaryExpression(_) => write!(f, "({})", self.right),
            other => write!(f, "{}", other),
        }
    }
}

impl fmt::Display for AnnotationValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnnotationValue::Constant(c) => write!(f, "{}", c),
            AnnotationValue::ValueList(values) => {
                write!(f, "{{")?;
                for (i, value) in values.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", value)?;
                }
                write!(f, "}}")
            }
            AnnotationValue::NestedAnnotation(a) => write!(f, "{}", a),
            AnnotationValue::FieldRef(r) => write!(f, "{}", r),
            AnnotationValue::TypeRef(t) => write!(f, "{}.class", t),
            AnnotationValue::BinaryExpression(e) => write!(f, "{}", e),
        }
    }
}

impl fmt::Display for JavaAnnotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "@{}", self.type_ref.value)?;
        if self.elements.is_empty() {
            return Ok(());
        }
        write!(f, "(")?;
        for (i, element) in self.elements.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}={}", element.name, element.value)?;
        }
        write!(f, ")")
    }
}

fn escape_char(c: char, quote: char) -> String {
    match c {
        '\n' => "\\n".to_string(),
        '\r' => "\\r".to_string(),
        '\t' => "\\t".to_string(),
        '\u{8}' => "\\b".to_string(),
        '\u{c}' => "\\f".to_string(),
        '\\' => "\\\\".to_string(),
        c if c == quote => format!("\\{}", c),
        c if c.is_control() && (c as u32) <= 0xFFFF => format!("\\u{:04x}", c as u32),
        c => c.to_string(),
    }
}
