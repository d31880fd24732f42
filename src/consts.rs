// Shared constants for lexing, parsing and type binding

// Element key used when an annotation is written as `@Name(expr)`
pub const DEFAULT_ELEMENT_NAME: &str = "value";

// Parser: default nesting cap for annotation values (lists, nested annotations, groups)
pub const DEFAULT_MAX_NESTING_DEPTH: usize = 64;
// Parser: diagnostics collected before a unit is abandoned
pub const DEFAULT_MAX_ERRORS: usize = 100;

// Well-known simple names from java.lang, used to pick a best guess for unresolved names
pub const JAVA_LANG_SIMPLE_TYPES: &[&str] = &[
    "String", "Object", "Throwable", "Cloneable", "Iterable", "Comparable",
    "CharSequence", "Number", "Enum", "Record", "Runnable", "AutoCloseable",
    "Integer", "Long", "Float", "Double", "Boolean", "Character",
    "Short", "Byte", "Void", "Class", "Math", "System", "StringBuilder",
    "RuntimeException", "Exception", "Error", "AssertionError",
    "IllegalArgumentException", "IllegalStateException", "UnsupportedOperationException",
    "Deprecated", "Override", "SuppressWarnings", "SafeVarargs", "FunctionalInterface",
];

// Primitive type keywords accepted in type positions and class-literals
pub const PRIMITIVE_TYPES: &[&str] = &[
    "boolean", "byte", "short", "int", "long", "char", "float", "double", "void",
];
