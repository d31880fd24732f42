//! Intra-unit type binding.
//!
//! Names are settled only from what the unit itself declares and imports.
//! Anything that needs a classpath stays `Unresolved` with its candidates,
//! for the aggregate (or an external resolver) to link later.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use once_cell::sync::Lazy;

use super::{AnnotationValue, FieldRef, Import, JavaAnnotation, JavaClass, JavaMethod, TypeArg, TypeBinding, TypeParam, TypeRef};
use crate::consts::{JAVA_LANG_SIMPLE_TYPES, PRIMITIVE_TYPES};

static JAVA_LANG: Lazy<HashSet<&'static str>> = Lazy::new(|| JAVA_LANG_SIMPLE_TYPES.iter().copied().collect());

/// Names visible from one class or method body
#[derive(Debug, Default)]
struct Frame {
    class_fqn: Option<String>,
    type_vars: Vec<String>,
    /// simple name -> fqn of member types
    members: HashMap<String, String>,
}

impl Frame {
    fn for_class(class: &JavaClass) -> Self {
        Self {
            class_fqn: Some(class.fully_qualified_name.clone()),
            type_vars: class.type_params.iter().map(|p| p.name.clone()).collect(),
            members: class
                .inner_classes
                .iter()
                .map(|c| (c.name.clone(), c.fully_qualified_name.clone()))
                .collect(),
        }
    }

    fn for_method(method: &JavaMethod) -> Self {
        Self {
            class_fqn: None,
            type_vars: method.type_params.iter().map(|p| p.name.clone()).collect(),
            members: HashMap::new(),
        }
    }
}

/// Binds every `TypeRef` and `FieldRef` of one unit
pub struct TypeResolver<'a> {
    package: &'a str,
    imports: &'a [Import],
    /// simple name -> fqn of top-level types declared in the unit
    unit_types: HashMap<String, String>,
    scopes: Vec<Frame>,
}

impl<'a> TypeResolver<'a> {
    pub fn new(package: &'a str, imports: &'a [Import], classes: &[Arc<JavaClass>]) -> Self {
        let unit_types = classes
            .iter()
            .map(|c| (c.name.clone(), c.fully_qualified_name.clone()))
            .collect();
        Self {
            package,
            imports,
            unit_types,
            scopes: Vec::new(),
        }
    }

    /// Binding for a type name as written, from the current scope
    pub fn binding_for(&self, name: &str) -> TypeBinding {
        if PRIMITIVE_TYPES.contains(&name) {
            return TypeBinding::Primitive;
        }

        let (first, rest) = match name.split_once('.') {
            Some((first, rest)) => (first, Some(rest)),
            None => (name, None),
        };
        let qualify = |base: &str| match rest {
            Some(rest) => format!("{}.{}", base, rest),
            None => base.to_string(),
        };

        if rest.is_none() && self.scopes.iter().rev().any(|f| f.type_vars.iter().any(|v| v == name)) {
            return TypeBinding::TypeVariable;
        }
        for frame in self.scopes.iter().rev() {
            if let Some(fqn) = frame.members.get(first) {
                return TypeBinding::Resolved(qualify(fqn));
            }
        }
        if let Some(fqn) = self.unit_types.get(first) {
            return TypeBinding::Resolved(qualify(fqn));
        }
        if let Some(import) = self
            .imports
            .iter()
            .find(|i| !i.is_static && i.simple_name() == Some(first))
        {
            return TypeBinding::Resolved(qualify(&import.name));
        }
        // `java.util.List`: package segments are lowercase by convention
        if rest.is_some() && first.starts_with(|c: char| c.is_ascii_lowercase()) {
            return TypeBinding::Resolved(name.to_string());
        }

        self.unresolved(name, rest.is_some())
    }

    fn unresolved(&self, name: &str, qualified: bool) -> TypeBinding {
        let mut candidates: Vec<String> = Vec::new();
        let mut push = |candidate: String| {
            if !candidates.contains(&candidate) {
                candidates.push(candidate);
            }
        };

        if self.package.is_empty() {
            push(name.to_string());
        } else {
            push(format!("{}.{}", self.package, name));
        }
        for import in self.imports.iter().filter(|i| !i.is_static && i.is_wildcard) {
            push(format!("{}.{}", import.name, name));
        }
        if !qualified {
            push(format!("java.lang.{}", name));
        } else {
            push(name.to_string());
        }

        let guess = if !qualified && JAVA_LANG.contains(name) {
            format!("java.lang.{}", name)
        } else {
            candidates[0].clone()
        };
        TypeBinding::Unresolved { guess, candidates }
    }

    fn bind_field_ref(&self, field_ref: &mut FieldRef) {
        if let Some(class_part) = &field_ref.class_part {
            field_ref.class_binding = self.binding_for(class_part);
            return;
        }

        let static_single = self.imports.iter().find(|i| {
            i.is_static && !i.is_wildcard && i.simple_name() == Some(field_ref.field_part.as_str())
        });
        if let Some((class_name, _)) = static_single.and_then(|i| i.name.rsplit_once('.')) {
            field_ref.class_binding = TypeBinding::Resolved(class_name.to_string());
            return;
        }

        let mut candidates: Vec<String> = Vec::new();
        if let Some(fqn) = self.scopes.iter().rev().find_map(|f| f.class_fqn.clone()) {
            candidates.push(fqn);
        }
        candidates.extend(
            self.imports
                .iter()
                .filter(|i| i.is_static && i.is_wildcard)
                .map(|i| i.name.clone()),
        );
        let guess = candidates.first().cloned().unwrap_or_default();
        field_ref.class_binding = TypeBinding::Unresolved { guess, candidates };
    }

    pub fn bind_type(&self, type_ref: &mut TypeRef) {
        type_ref.binding = self.binding_for(&type_ref.value);
        for arg in &mut type_ref.type_args {
            match arg {
                TypeArg::Type(t) | TypeArg::Wildcard(Some((_, t))) => self.bind_type(t),
                TypeArg::Wildcard(None) => {}
            }
        }
        for annotation in &mut type_ref.annotations {
            self.bind_annotation(annotation);
        }
    }

    pub fn bind_annotation(&self, annotation: &mut JavaAnnotation) {
        self.bind_type(&mut annotation.type_ref);
        for element in &mut annotation.elements {
            self.bind_value(&mut element.value);
        }
    }

    fn bind_value(&self, value: &mut AnnotationValue) {
        match value {
            AnnotationValue::Constant(_) => {}
            AnnotationValue::ValueList(values) => {
                for v in values {
                    self.bind_value(v);
                }
            }
            AnnotationValue::NestedAnnotation(a) => self.bind_annotation(a),
            AnnotationValue::FieldRef(r) => self.bind_field_ref(r),
            AnnotationValue::TypeRef(t) => self.bind_type(t),
            AnnotationValue::BinaryExpression(e) => {
                self.bind_value(&mut e.left);
                self.bind_value(&mut e.right);
            }
        }
    }

    fn bind_type_params(&self, params: &mut [TypeParam]) {
        for param in params {
            for bound in &mut param.bounds {
                self.bind_type(bound);
            }
            for annotation in &mut param.annotations {
                self.bind_annotation(annotation);
            }
        }
    }

    fn bind_method(&mut self, method: &mut JavaMethod) {
        self.scopes.push(Frame::for_method(method));
        self.bind_type_params(&mut method.type_params);
        if let Some(ret) = &mut method.return_type {
            self.bind_type(ret);
        }
        for param in &mut method.parameters {
            self.bind_type(&mut param.type_ref);
            for annotation in &mut param.annotations {
                self.bind_annotation(annotation);
            }
        }
        for exception in &mut method.exceptions {
            self.bind_type(exception);
        }
        for annotation in &mut method.annotations {
            self.bind_annotation(annotation);
        }
        if let Some(default) = &mut method.default_value {
            self.bind_value(default);
        }
        self.scopes.pop();
    }

    /// Bind a class and everything nested in it
    pub fn bind_class(&mut self, class: &mut JavaClass) {
        self.scopes.push(Frame::for_class(class));

        self.bind_type_params(&mut class.type_params);
        if let Some(superclass) = &mut class.superclass {
            self.bind_type(superclass);
        }
        for iface in &mut class.implements {
            self.bind_type(iface);
        }
        for annotation in &mut class.annotations {
            self.bind_annotation(annotation);
        }
        for field in &mut class.fields {
            self.bind_type(&mut field.type_ref);
            for annotation in &mut field.annotations {
                self.bind_annotation(annotation);
            }
        }
        for method in class.methods.iter_mut().chain(class.constructors.iter_mut()) {
            self.bind_method(method);
        }
        for inner in &mut class.inner_classes {
            self.bind_class(Arc::make_mut(inner));
        }

        self.scopes.pop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ClassKind;

    fn import(name: &str, is_static: bool, is_wildcard: bool) -> Import {
        Import {
            name: name.to_string(),
            is_static,
            is_wildcard,
            line_number: 1,
        }
    }

    #[test]
    fn test_binding_order() {
        let imports = vec![import("java.util.List", false, false), import("java.io", false, true)];
        let classes = vec![Arc::new(JavaClass::new("Local", "p.Local", ClassKind::Class))];
        let resolver = TypeResolver::new("p", &imports, &classes);

        assert_eq!(resolver.binding_for("int"), TypeBinding::Primitive);
        assert_eq!(resolver.binding_for("Local"), TypeBinding::Resolved("p.Local".to_string()));
        assert_eq!(resolver.binding_for("List"), TypeBinding::Resolved("java.util.List".to_string()));
        assert_eq!(resolver.binding_for("java.util.Set"), TypeBinding::Resolved("java.util.Set".to_string()));
        assert_eq!(
            resolver.binding_for("String"),
            TypeBinding::Unresolved {
                guess: "java.lang.String".to_string(),
                candidates: vec!["p.String".to_string(), "java.io.String".to_string(), "java.lang.String".to_string()],
            }
        );
        match resolver.binding_for("File") {
            TypeBinding::Unresolved { guess, .. } => assert_eq!(guess, "p.File"),
            other => panic!("unexpected binding {:?}", other),
        }
    }

    #[test]
    fn test_type_variables_and_member_types() {
        let mut outer = JavaClass::new("Outer", "p.Outer", ClassKind::Class);
        outer.type_params.push(TypeParam {
            name: "T".to_string(),
            bounds: Vec::new(),
            annotations: Vec::new(),
        });
        outer.inner_classes.push(Arc::new(JavaClass::new("Node", "p.Outer.Node", ClassKind::Class)));

        let mut resolver = TypeResolver::new("p", &[], &[]);
        resolver.scopes.push(Frame::for_class(&outer));
        assert_eq!(resolver.binding_for("T"), TypeBinding::TypeVariable);
        assert_eq!(resolver.binding_for("Node"), TypeBinding::Resolved("p.Outer.Node".to_string()));
        assert_eq!(resolver.binding_for("Node.Leaf"), TypeBinding::Resolved("p.Outer.Node.Leaf".to_string()));
    }

    #[test]
    fn test_field_ref_uses_static_imports() {
        let imports = vec![import("java.lang.Math.PI", true, false)];
        let resolver = TypeResolver::new("p", &imports, &[]);
        let mut r = FieldRef::from_qualified("PI");
        resolver.bind_field_ref(&mut r);
        assert_eq!(r.class_binding, TypeBinding::Resolved("java.lang.Math".to_string()));
    }
}
