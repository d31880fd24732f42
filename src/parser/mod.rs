//! Parser module for Java source units
//!
//! Lexing, the declaration grammar and the annotation-value sub-grammar.
//! The parser never builds a syntax tree: it drives the model builder.

pub mod annotation;
pub mod error;
pub mod lexer;
pub mod literal;
pub mod parser;
pub mod span;

pub use error::{ErrorKind, ErrorRecovery, ParseError, ParseResult};
pub use lexer::{Lexer, LexicalToken, Token};
pub use parser::Parser;
pub use span::Location;

use crate::config::Config;
use crate::error::Result;
use crate::model::SourceUnit;

/// Parse one source unit into its frozen model
pub fn parse_source(source: &str, config: &Config) -> Result<SourceUnit> {
    parser::parse(source, config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_class() {
        let source = r#"
package com.example;

public class HelloWorld {
    public static void main(String[] args) {
        System.out.println("Hello, World!");
    }
}
"#;

        let unit = parse_source(source, &Config::default()).expect("Failed to parse");
        assert_eq!(unit.classes.len(), 1);
        assert_eq!(unit.classes[0].fully_qualified_name, "com.example.HelloWorld");
        assert_eq!(unit.classes[0].methods[0].signature(), "void main(String[])");
    }

    #[test]
    fn test_parse_with_imports() {
        let source = r#"
package com.example;

import java.util.List;
import java.util.*;
import static java.lang.Math.PI;

public class TestClass {
    private List<String> items = new ArrayList<>();
}
"#;

        let unit = parse_source(source, &Config::default()).expect("Failed to parse");
        assert_eq!(unit.imports.len(), 3);
        assert!(unit.imports[1].is_wildcard);
        assert!(unit.imports[2].is_static);
        assert_eq!(unit.imports[2].to_string(), "import static java.lang.Math.PI;");
        assert_eq!(unit.classes[0].fields[0].initializer.as_deref(), Some("new ArrayList<>()"));
    }
}
