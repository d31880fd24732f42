use javamodel::{parse_source, Config, ErrorKind, Error, JavaProject};

#[test]
fn package_line_is_the_keyword_line() {
    let source = "\n\n@Deprecated\n@SuppressWarnings(\"all\")\npackage com.example.util;\n\nclass A {}\n";
    let unit = parse_source(source, &Config::default()).expect("Failed to parse");
    let package = unit.package().expect("package");
    assert_eq!(package.name, "com.example.util");
    assert_eq!(package.line_number, 5);
    assert_eq!(package.annotations().len(), 2);
    assert_eq!(package.annotations()[0].line_number, 3);
    assert_eq!(package.annotations()[1].to_string(), "@SuppressWarnings(value=\"all\")");
    assert!(unit.classes[0].annotations.is_empty());
}

#[test]
fn package_info_unit_without_types() {
    let source = "/** Utilities. */\n@Deprecated\npackage com.example.util;\n";
    let unit = parse_source(source, &Config::default()).expect("Failed to parse");
    assert!(unit.classes.is_empty());
    let package = unit.package().expect("package");
    assert_eq!(package.doc.as_ref().map(|d| d.text.as_str()), Some("Utilities."));
    assert_eq!(package.annotations()[0].type_ref().fully_qualified_name(), "java.lang.Deprecated");
}

#[test]
fn default_package_is_created_by_the_first_class() {
    let unit = parse_source("\n\nclass A {}\nclass B {}", &Config::default()).expect("Failed to parse");
    let package = unit.package().expect("default package");
    assert!(package.is_default());
    assert_eq!(package.line_number, 3);
    assert_eq!(unit.classes[1].fully_qualified_name, "B");
    assert_eq!(unit.classes[1].package, "");
}

#[test]
fn package_after_a_type_is_a_syntax_error() {
    let config = Config::default().with_recovery(javamodel::RecoveryPolicy::Abort);
    let err = parse_source("class A {}\npackage p;", &config).unwrap_err();
    let parse_error = err.as_parse_error().expect("parse error");
    assert_eq!(parse_error.kind(), ErrorKind::Syntax);
    assert_eq!(err.line(), Some(2));
}

#[test]
fn second_package_declaration_is_skipped_when_recovering() {
    let unit = parse_source("package a;\npackage b;\nclass A {}", &Config::default()).expect("Failed to parse");
    assert_eq!(unit.package_name(), "a");
    assert_eq!(unit.classes[0].fully_qualified_name, "a.A");
    assert_eq!(unit.diagnostics().len(), 1);
    assert_eq!(unit.diagnostics()[0].line(), 2);
}

#[test]
fn annotated_package_declaration_wins_in_the_project() {
    let project = JavaProject::new(Config::default());
    project
        .add_named_source("A.java", "package p;\nclass A {}")
        .expect("Failed to parse");
    project
        .add_named_source("package-info.java", "@Deprecated\npackage p;")
        .expect("Failed to parse");
    project
        .add_named_source("B.java", "package p.q;\nclass B {}")
        .expect("Failed to parse");

    let package = project.package("p").expect("package p");
    assert_eq!(package.annotations().len(), 1);
    assert_eq!(package.line_number, 2);
    assert_eq!(project.packages(), vec!["p".to_string(), "p.q".to_string()]);
    assert_eq!(project.classes_in_package("p").len(), 1);
    assert!(project.package("r").is_none());
}

#[test]
fn io_errors_are_not_parse_errors() {
    let project = JavaProject::new(Config::default());
    let err = project.add_file("/definitely/not/here/A.java").unwrap_err();
    assert!(matches!(err, Error::Io(_)));
    assert!(err.line().is_none());
}
