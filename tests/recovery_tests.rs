use javamodel::{parse_source, Config, Error, ErrorKind, JavaProject, ParseError, RecoveryPolicy};

const MALFORMED_MEMBER: &str = r#"
package p;

class Good {
    int before;
    @Broken(1 - 1) int bad;
    int after;
}

class Other {}
"#;

fn abort() -> Config {
    Config::default().with_recovery(RecoveryPolicy::Abort)
}

#[test]
fn abort_policy_fails_the_whole_unit() {
    let err = parse_source(MALFORMED_MEMBER, &abort()).unwrap_err();
    let parse_error = err.as_parse_error().expect("parse error");
    assert_eq!(parse_error.kind(), ErrorKind::UnsupportedConstruct);
    assert_eq!(parse_error.line(), 6);
}

#[test]
fn abort_policy_contributes_nothing_to_the_project() {
    let project = JavaProject::new(abort());
    assert!(project.add_source(MALFORMED_MEMBER).is_err());
    assert!(project.class_by_name("p.Good").is_none());
    assert!(project.class_by_name("p.Other").is_none());
    assert!(project.packages().is_empty());
}

#[test]
fn skip_policy_drops_only_the_broken_member() {
    let unit = parse_source(MALFORMED_MEMBER, &Config::default()).expect("Failed to parse");
    assert!(unit.is_partial());
    assert_eq!(unit.diagnostics().len(), 1);
    assert_eq!(unit.diagnostics()[0].kind(), ErrorKind::UnsupportedConstruct);

    let good = unit.class_by_name("p.Good").expect("Good");
    let fields: Vec<&str> = good.fields.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(fields, vec!["before", "after"]);
    assert!(unit.class_by_name("p.Other").is_some());
}

#[test]
fn skip_policy_partial_units_are_listed() {
    let project = JavaProject::new(Config::default());
    project.add_named_source("Good.java", MALFORMED_MEMBER).expect("Failed to parse");
    project.add_named_source("Clean.java", "package p; class Clean {}").expect("Failed to parse");

    let partial = project.partial_units();
    assert_eq!(partial.len(), 1);
    assert_eq!(partial[0].name.as_deref(), Some("Good.java"));
    assert_eq!(project.classes_in_package("p").len(), 3);
}

#[test]
fn error_inside_brackets_drops_only_that_member() {
    let source = r#"
class A {
    int before;
    @X({1 - 1}) int bad;
    @Y(value = {@Z(2 * (3))}) int worse;
    void f(int[] 1) { return; }
    int after;
}
class B {}
"#;
    let unit = parse_source(source, &Config::default()).expect("Failed to parse");
    let names: Vec<&str> = unit.classes.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["A", "B"]);

    let a = &unit.classes[0];
    let fields: Vec<&str> = a.fields.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(fields, vec!["before", "after"]);
    assert!(a.methods.is_empty());

    let lines: Vec<usize> = unit.diagnostics().iter().map(ParseError::line).collect();
    assert_eq!(lines, vec![4, 5, 6]);
}

#[test]
fn error_inside_header_annotation_skips_the_declaration() {
    let source = "@X({1 - 1}) class Skipped { int x; }\nclass Kept {}";
    let unit = parse_source(source, &Config::default()).expect("Failed to parse");
    let names: Vec<&str> = unit.classes.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["Kept"]);
    assert_eq!(unit.diagnostics().len(), 1);
}

#[test]
fn broken_class_header_discards_the_top_level_declaration() {
    let source = r#"
class First {}
class Broken extends { int x; void f() { } }
class Last {}
"#;
    let unit = parse_source(source, &Config::default()).expect("Failed to parse");
    let names: Vec<&str> = unit.classes.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["First", "Last"]);
    assert_eq!(unit.diagnostics()[0].line(), 3);
}

#[test]
fn broken_nested_class_header_is_skipped_inside_its_parent() {
    let source = r#"
class Outer {
    int a;
    class Inner implements { int x; }
    int b;
}
"#;
    let unit = parse_source(source, &Config::default()).expect("Failed to parse");
    let outer = &unit.classes[0];
    assert!(outer.inner_classes.is_empty());
    let fields: Vec<&str> = outer.fields.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(fields, vec!["a", "b"]);
}

#[test]
fn error_inside_nested_class_keeps_both_classes() {
    let source = r#"
class Outer {
    class Inner {
        int ok;
        int = 5;
    }
    int b;
}
"#;
    let unit = parse_source(source, &Config::default()).expect("Failed to parse");
    let outer = &unit.classes[0];
    let inner = outer.inner_class_by_name("Inner").expect("Inner");
    assert_eq!(inner.fields.len(), 1);
    assert_eq!(outer.fields[0].name, "b");
    assert_eq!(unit.diagnostics().len(), 1);
}

#[test]
fn broken_enum_constant_list_keeps_the_members() {
    let source = "enum E { A, B C; int after; }";
    let unit = parse_source(source, &Config::default()).expect("Failed to parse");
    let class = &unit.classes[0];
    let constants: Vec<&str> = class.enum_constants().map(|f| f.name.as_str()).collect();
    assert_eq!(constants, vec!["A", "B"]);
    assert!(class.field_by_name("after").is_some());
    assert!(unit.is_partial());
}

#[test]
fn constructor_with_wrong_name_is_a_syntax_error() {
    let err = parse_source("class A { B() {} }", &abort()).unwrap_err();
    assert_eq!(err.as_parse_error().map(ParseError::kind), Some(ErrorKind::Syntax));

    let unit = parse_source("class A { B() {} int x; }", &Config::default()).expect("Failed to parse");
    assert!(unit.classes[0].constructors.is_empty());
    assert_eq!(unit.classes[0].fields.len(), 1);
}

#[test]
fn lexical_errors_abort_under_every_policy() {
    let source = "class A {\n  String s = \"unterminated;\n  int x;\n}";
    for config in [abort(), Config::default()] {
        let err = parse_source(source, &config).unwrap_err();
        let parse_error = err.as_parse_error().expect("parse error");
        assert_eq!(parse_error.kind(), ErrorKind::Lexical);
        assert_eq!(parse_error.line(), 2);
    }
}

#[test]
fn unterminated_comment_is_lexical() {
    let err = parse_source("class A {}\n/* never closed", &Config::default()).unwrap_err();
    assert!(matches!(err, Error::Parse(ParseError::Lexical { .. })));
    assert_eq!(err.line(), Some(2));
}

#[test]
fn out_of_range_literal_is_lexical() {
    let err = parse_source("@A(2147483649) class A {}", &Config::default()).unwrap_err();
    assert_eq!(err.as_parse_error().map(ParseError::kind), Some(ErrorKind::Lexical));
}

#[test]
fn minimum_magnitude_without_minus_is_lexical() {
    for value in ["2147483648", "9223372036854775808L", "1 + 2147483648"] {
        let source = format!("@A({})\nclass Foo {{}}", value);
        for config in [abort(), Config::default()] {
            let err = parse_source(&source, &config).unwrap_err();
            assert_eq!(err.as_parse_error().map(ParseError::kind), Some(ErrorKind::Lexical), "{}", value);
            assert_eq!(err.line(), Some(1));
        }
    }

    let unit = parse_source("@A(x = -2147483648, y = -9223372036854775808L)\nclass Foo {}", &abort())
        .expect("Failed to parse");
    let annotation = &unit.classes[0].annotations[0];
    assert_eq!(annotation.property("x").map(|v| v.to_string()).as_deref(), Some("-2147483648"));
    assert_eq!(annotation.property("y").map(|v| v.to_string()).as_deref(), Some("-9223372036854775808L"));
}

#[test]
fn error_budget_aborts_the_unit() {
    let source = "class A { int 1; int 2; int 3; int ok; }";
    let unit = parse_source(source, &Config::default().with_max_errors(3)).expect("Failed to parse");
    assert_eq!(unit.diagnostics().len(), 3);
    assert_eq!(unit.classes[0].fields.len(), 1);

    let err = parse_source(source, &Config::default().with_max_errors(2)).unwrap_err();
    assert_eq!(err.as_parse_error().map(ParseError::kind), Some(ErrorKind::Syntax));
}

#[test]
fn deep_generic_type_is_bounded() {
    let levels = 50_000;
    let deep_type = format!("{}String{}", "List<".repeat(levels), ">".repeat(levels));
    let source = format!("class Deep {{\n    int before;\n    {} deep;\n    int after;\n}}", deep_type);

    let unit = parse_source(&source, &Config::default()).expect("Failed to parse");
    let fields: Vec<&str> = unit.classes[0].fields.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(fields, vec!["before", "after"]);
    assert_eq!(unit.diagnostics().len(), 1);
    assert_eq!(unit.diagnostics()[0].kind(), ErrorKind::UnsupportedConstruct);
    assert_eq!(unit.diagnostics()[0].line(), 3);

    let shallow = format!("class Shallow {{ {}String{} s; }}", "List<".repeat(8), ">".repeat(8));
    let unit = parse_source(&shallow, &abort()).expect("Failed to parse");
    assert_eq!(unit.classes[0].fields.len(), 1);
}

#[test]
fn deep_member_types_are_bounded() {
    let levels = 5_000;
    let mut source = String::new();
    for i in 0..levels {
        source.push_str(&format!("class C{} {{ ", i));
    }
    source.push_str(&"}".repeat(levels));

    let err = parse_source(&source, &abort()).unwrap_err();
    assert_eq!(err.as_parse_error().map(ParseError::kind), Some(ErrorKind::UnsupportedConstruct));

    let unit = parse_source(&source, &Config::default().with_max_nesting_depth(10)).expect("Failed to parse");
    assert_eq!(unit.all_classes().len(), 11);
    assert_eq!(unit.diagnostics().len(), 1);
}

#[test]
fn long_concatenation_is_bounded() {
    let chain = vec!["1"; 10_000].join(" + ");
    let source = format!("@A({})\nclass Long {{}}\nclass Kept {{}}", chain);

    let err = parse_source(&source, &abort()).unwrap_err();
    assert_eq!(err.as_parse_error().map(ParseError::kind), Some(ErrorKind::UnsupportedConstruct));

    let unit = parse_source(&source, &Config::default()).expect("Failed to parse");
    let names: Vec<&str> = unit.classes.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["Kept"]);
}

#[test]
fn end_of_input_inside_a_class_aborts() {
    let err = parse_source("class A { int x;", &Config::default()).unwrap_err();
    assert!(matches!(err, Error::Parse(ParseError::UnexpectedEndOfInput { .. })));
}
