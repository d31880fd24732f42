use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::thread;

use javamodel::{AnnotationValue, Config, Error, JavaProject};
use tempfile::TempDir;

fn write(root: &Path, relative: &str, contents: &str) {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create source dir");
    }
    fs::write(path, contents).expect("write source file");
}

#[test]
fn lookups_across_units() {
    let project = JavaProject::new(Config::default());
    project
        .add_named_source("Marker.java", "package a; public @interface Marker { int value() default 0; }")
        .expect("Failed to parse");
    project
        .add_named_source(
            "Holder.java",
            "package a; public class Holder { public static final int SIZE = 4; static class Inner {} }",
        )
        .expect("Failed to parse");
    project
        .add_named_source(
            "User.java",
            "package b;\nimport a.Marker;\nimport a.*;\n@Marker(Holder.SIZE)\npublic class User extends Holder { Holder.Inner inner; }",
        )
        .expect("Failed to parse");

    assert_eq!(project.units().len(), 3);
    assert_eq!(project.classes().len(), 4);
    assert!(project.class_by_name("a.Holder.Inner").is_some());

    let user = project.class_by_name("b.User").expect("User");
    let annotation = &user.annotations[0];
    let marker = project.resolve_annotation_type(annotation).expect("annotation type");
    assert_eq!(marker.fully_qualified_name(), "a.Marker");
    assert!(marker.is_annotation());

    let superclass = user.superclass.as_ref().expect("superclass");
    assert_eq!(
        project.resolve_type(superclass).map(|c| c.fully_qualified_name.clone()).as_deref(),
        Some("a.Holder")
    );

    let inner_type = &user.fields[0].type_ref;
    assert_eq!(
        project.resolve_type(inner_type).map(|c| c.fully_qualified_name.clone()).as_deref(),
        Some("a.Holder.Inner")
    );

    let size = annotation.value().and_then(AnnotationValue::as_field_ref).expect("field reference");
    let declaring = project.resolve_field_ref(size).expect("declaring class");
    assert_eq!(declaring.fully_qualified_name(), "a.Holder");
}

#[test]
fn unresolvable_names_stay_unresolved() {
    let project = JavaProject::new(Config::default());
    project
        .add_source("package c; @Missing(Missing.NOPE) class C { java.util.List<String> list; }")
        .expect("Failed to parse");
    let class = project.class_by_name("c.C").expect("class");
    assert!(project.resolve_annotation_type(&class.annotations[0]).is_none());
    assert!(project.resolve_type(&class.fields[0].type_ref).is_none());

    let field_ref = class.annotations[0]
        .value()
        .and_then(AnnotationValue::as_field_ref)
        .expect("field reference");
    assert!(project.resolve_field_ref(field_ref).is_none());
}

#[test]
fn field_ref_needs_the_field_to_exist() {
    let project = JavaProject::new(Config::default());
    project
        .add_source("package d; class K { static final int A = 1; }")
        .expect("Failed to parse");
    let unit = project
        .add_source("package d; @X(K.B) class L {}")
        .expect("Failed to parse");
    let field_ref = unit.classes[0].annotations[0]
        .value()
        .and_then(AnnotationValue::as_field_ref)
        .expect("field reference");
    assert!(project.resolve_field_ref(field_ref).is_none());
}

#[test]
fn concurrent_merges_are_serialized() {
    let project = Arc::new(JavaProject::new(Config::default()));
    let handles: Vec<_> = (0..8)
        .map(|t| {
            let project = Arc::clone(&project);
            thread::spawn(move || {
                for i in 0..10 {
                    let source = format!(
                        "package p{t};\nclass C{i} {{ class Nested {{}} int f{i}; }}\nclass D{i} {{}}",
                        t = t,
                        i = i
                    );
                    project.add_source(&source).expect("Failed to parse");
                    // Every visible unit is visible whole
                    for unit in project.units() {
                        for class in unit.all_classes() {
                            assert!(project.class_by_name(&class.fully_qualified_name).is_some());
                        }
                    }
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().expect("worker thread");
    }

    assert_eq!(project.units().len(), 80);
    assert_eq!(project.classes().len(), 240);
    assert_eq!(project.packages().len(), 8);
    assert_eq!(project.classes_in_package("p3").len(), 30);
}

#[test]
fn source_tree_is_walked_in_path_order() {
    let dir = TempDir::new().expect("temp dir");
    write(dir.path(), "com/acme/B.java", "package com.acme;\npublic class B {}");
    write(dir.path(), "com/acme/A.java", "package com.acme;\npublic class A extends B {}");
    write(dir.path(), "com/acme/package-info.java", "@Deprecated\npackage com.acme;");
    write(dir.path(), "com/acme/notes.txt", "not java");
    write(dir.path(), "com/acme/broken/Bad.java", "package com.acme.broken;\nclass Bad { String s = \"open; }");
    write(dir.path(), "com/acme/partial/Half.java", "package com.acme.partial;\nclass Half { int 1; int ok; }");

    let project = JavaProject::new(Config::default());
    let report = project.add_source_tree(dir.path()).expect("walk source tree");

    assert_eq!(report.merged.len(), 4);
    assert_eq!(report.failed.len(), 1);
    assert!(report.failed[0].0.ends_with("com/acme/broken/Bad.java"));
    assert!(matches!(report.failed[0].1, Error::Parse(_)));

    let names: Vec<String> = report
        .merged
        .iter()
        .filter_map(|u| u.name.clone())
        .map(|n| Path::new(&n).file_name().map(|f| f.to_string_lossy().into_owned()).unwrap_or_default())
        .collect();
    assert_eq!(names, vec!["A.java", "B.java", "package-info.java", "Half.java"]);

    assert_eq!(project.classes_in_package("com.acme").len(), 2);
    assert_eq!(project.package("com.acme").expect("package").annotations().len(), 1);
    assert_eq!(project.partial_units().len(), 1);
    assert!(project.class_by_name("com.acme.broken.Bad").is_none());
}

#[test]
fn missing_source_tree_is_an_io_error() {
    let dir = TempDir::new().expect("temp dir");
    let project = JavaProject::new(Config::default());
    let err = project.add_source_tree(dir.path().join("absent")).unwrap_err();
    assert!(matches!(err, Error::Io(_)));
}
