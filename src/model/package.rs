use std::fmt;

use super::{DocComment, JavaAnnotation};

#[derive(Debug, Clone, PartialEq)]
pub struct JavaPackage {
    /// Dotted name; empty for the default package
    pub name: String,
    pub annotations: Vec<JavaAnnotation>,
    /// Line of the `package` keyword, or of the first class in the default package
    pub line_number: usize,
    pub doc: Option<DocComment>,
}

impl JavaPackage {
    pub fn new(name: impl Into<String>, line_number: usize) -> Self {
        Self {
            name: name.into(),
            annotations: Vec::new(),
            line_number,
            doc: None,
        }
    }

    pub fn is_default(&self) -> bool {
        self.name.is_empty()
    }

    pub fn annotations(&self) -> &[JavaAnnotation] {
        &self.annotations
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Import {
    /// Imported name without the trailing `.*`
    pub name: String,
    pub is_static: bool,
    pub is_wildcard: bool,
    pub line_number: usize,
}

impl Import {
    /// Simple name introduced by a single-type import
    pub fn simple_name(&self) -> Option<&str> {
        if self.is_wildcard {
            None
        } else {
            self.name.rsplit('.').next()
        }
    }
}

impl fmt::Display for Import {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_static {
            write!(f, "import static ")?;
        } else {
            write!(f, "import ")?;
        }

        if self.is_wildcard {
            write!(f, "{}.*;", self.name)
        } else {
            write!(f, "{};", self.name)
        }
    }
}
