//! Unit tests for the semantic checker.
//!
//! Each stage is exercised through the full pipeline on small HULK
//! programs, plus direct tests for the hierarchy queries and scopes.

use std::rc::Rc;

use pretty_assertions::assert_eq;

use super::{
    definitions::{Definition, PrimitiveKind, OBJECT},
    hierarchy::{assign_depths, check_tree, Hierarchy, HierarchyNode},
    propagation::propagate_parameters,
    scope::{Binding, Scope},
    semantic_checker::{semantic_check, SemanticReport, SUCCESS_MESSAGE},
};
use crate::{
    ast::ast::Program, errors::diagnostics::SemanticError, lexer::lexer::tokenize, parser::parser::parse,
};

const ANIMALS: &str = "
    type Animal(a) { name = a; speak() => \"...\"; }
    type Felino inherits Animal {}
    type Gato inherits Felino {}
    type Canino inherits Animal {}
    type Perro inherits Canino {}
    type Lobo inherits Canino {}
";

fn check_program(source: &str) -> (Program, SemanticReport) {
    let tokens = tokenize(source.to_string(), None).unwrap();
    let mut program = parse(tokens, Rc::new("shell".to_string())).unwrap();
    let report = semantic_check(&mut program);
    (program, report)
}

fn check(source: &str) -> SemanticReport {
    check_program(source).1
}

fn param_names(program: &Program, type_name: &str) -> Vec<String> {
    program
        .types
        .iter()
        .find(|type_def| type_def.name == type_name)
        .unwrap()
        .params
        .iter()
        .map(|param| param.name.clone())
        .collect()
}

#[test]
fn test_definitions_include_primitives_and_user_entries() {
    let (program, report) = check_program(
        "function f(a, b) => a;
         function f(a, b, c) => c;
         type Point(x, y) {}
         protocol Shape { area(): Number; }
         1",
    );

    assert!(report.is_success());
    assert_eq!(report.definitions.len(), 7);
    assert_eq!(report.definitions.get("f/2"), Some(Definition::Function(0)));
    assert_eq!(report.definitions.get("f/3"), Some(Definition::Function(1)));
    assert_eq!(report.definitions.get("Point"), Some(Definition::Type(0)));
    assert_eq!(report.definitions.get("Shape"), Some(Definition::Protocol(0)));
    assert_eq!(
        report.definitions.get("Boolean"),
        Some(Definition::Primitive(PrimitiveKind::Boolean))
    );
    assert!(!report.definitions.contains("f"));
    assert_eq!(report.definitions.type_def(&program, "Point").unwrap().params.len(), 2);
    assert!(report.definitions.type_def(&program, "Shape").is_none());
}

#[test]
fn test_duplicate_function_keeps_first() {
    let report = check(
        "function f(a, b) => a;
         function f(x, y) => y;
         1",
    );

    assert_eq!(
        report.diagnostics,
        vec![SemanticError::DuplicateFunction {
            signature: "f/2".to_string()
        }]
    );
    assert_eq!(report.definitions.get("f/2"), Some(Definition::Function(0)));
}

#[test]
fn test_duplicate_type_and_protocol_names() {
    let report = check("type A {} type A {} protocol A {} 1");

    assert_eq!(report.diagnostic_names(), vec!["DuplicateType", "DuplicateType"]);
    assert_eq!(report.definitions.get("A"), Some(Definition::Type(0)));
    assert_eq!(report.hierarchy.len(), 5);
}

#[test]
fn test_builtin_type_names_are_reserved() {
    let report = check("type Object {} type Number {} 1");

    assert_eq!(
        report.diagnostics,
        vec![
            SemanticError::DuplicateType {
                name: "Object".to_string()
            },
            SemanticError::DuplicateType {
                name: "Number".to_string()
            },
        ]
    );
}

#[test]
fn test_acyclic_hierarchy_is_fully_connected() {
    let source = format!("{} 1", ANIMALS);
    let report = check(&source);

    assert!(report.is_success());

    let (errors, visited) = check_tree(&report.hierarchy, OBJECT);
    assert!(errors.is_empty());
    assert_eq!(visited, 6 + 4);

    assert_eq!(report.hierarchy.get("Number").unwrap().depth, 1);
    assert_eq!(report.hierarchy.get("Animal").unwrap().depth, 1);
    assert_eq!(report.hierarchy.get("Canino").unwrap().depth, 2);
    assert_eq!(report.hierarchy.get("Lobo").unwrap().depth, 3);
    assert_eq!(report.hierarchy.get("Lobo").unwrap().parent.as_deref(), Some("Canino"));
}

#[test]
fn test_hierarchy_queries() {
    let source = format!("{} 1", ANIMALS);
    let hierarchy = check(&source).hierarchy;

    assert_eq!(hierarchy.ancestors("Lobo"), vec!["Canino", "Animal", "Object"]);
    assert!(hierarchy.is_subtype("Gato", "Animal"));
    assert!(!hierarchy.is_subtype("Gato", "Canino"));
    assert_eq!(hierarchy.lowest_common_ancestor("Perro", "Lobo").as_deref(), Some("Canino"));
    assert_eq!(hierarchy.lowest_common_ancestor("Gato", "Lobo").as_deref(), Some("Animal"));
    assert_eq!(hierarchy.lowest_common_ancestor("Gato", "Number").as_deref(), Some("Object"));
    assert_eq!(hierarchy.lowest_common_ancestor("Gato", "Ghost"), None);
}

#[test]
fn test_hierarchy_render() {
    let source = format!("{} 1", ANIMALS);
    let hierarchy = check(&source).hierarchy;

    assert_eq!(
        hierarchy.render(),
        "Object\n  Number\n  String\n  Boolean\n  Animal\n    Felino\n      Gato\n    Canino\n      Perro\n      Lobo\n"
    );
}

#[test]
fn test_inheriting_from_primitive() {
    let report = check("type A inherits Number {} 1");

    assert_eq!(
        report.diagnostics,
        vec![
            SemanticError::InvalidInheritance {
                type_name: "A".to_string(),
                parent: "Number".to_string(),
            },
            SemanticError::HierarchyDisconnected {
                types: vec!["A".to_string()]
            },
        ]
    );
    assert_eq!(report.hierarchy.get("A").unwrap().parent, None);
}

#[test]
fn test_inheriting_from_protocol_or_undefined_type() {
    let report = check("protocol P {} type A inherits P {} 1");
    assert_eq!(report.diagnostic_names(), vec!["InvalidInheritance", "HierarchyDisconnected"]);

    let report = check("type A inherits Ghost {} 1");
    assert_eq!(
        report.diagnostics[0],
        SemanticError::UndefinedType {
            name: "Ghost".to_string()
        }
    );
    assert_eq!(report.diagnostic_names(), vec!["UndefinedType", "HierarchyDisconnected"]);
}

#[test]
fn test_inheritance_cycle() {
    let report = check("type A inherits B {} type B inherits A {} type C inherits A {} 1");

    assert_eq!(
        report.diagnostics,
        vec![
            SemanticError::HierarchyCycle {
                types: vec!["A".to_string(), "B".to_string()]
            },
            SemanticError::HierarchyDisconnected {
                types: vec!["A".to_string(), "B".to_string(), "C".to_string()]
            },
        ]
    );
}

#[test]
fn test_self_inheritance_is_a_cycle() {
    let report = check("type A inherits A {} 1");

    assert_eq!(report.diagnostic_names(), vec!["HierarchyCycle", "HierarchyDisconnected"]);
    assert_eq!(report.hierarchy.ancestors("A"), Vec::<String>::new());
}

#[test]
fn test_node_listed_under_two_parents_is_revisited() {
    let mut hierarchy = Hierarchy::with_builtins();
    hierarchy.insert(HierarchyNode::new("A"));
    hierarchy.insert(HierarchyNode::new("B"));
    hierarchy.link(OBJECT, "A");
    hierarchy.link(OBJECT, "B");
    hierarchy.link("B", "A");

    let revisit = SemanticError::HierarchyRevisit {
        type_name: "A".to_string(),
    };
    assert_eq!(assign_depths(&mut hierarchy), vec![revisit.clone()]);
    assert_eq!(hierarchy.get("A").unwrap().depth, 1);

    let (errors, visited) = check_tree(&hierarchy, OBJECT);
    assert_eq!(errors, vec![revisit]);
    assert_eq!(visited, hierarchy.len());
}

#[test]
fn test_parameters_propagate_ancestors_first() {
    let (program, report) = check_program(
        "type Animal(a) {}
         type Felino inherits Animal {}
         type Gato(b, c) inherits Felino(b) {}
         1",
    );

    assert!(report.is_success());
    assert_eq!(param_names(&program, "Animal"), vec!["a"]);
    assert_eq!(param_names(&program, "Felino"), vec!["a"]);
    assert_eq!(param_names(&program, "Gato"), vec!["a", "b", "c"]);
}

#[test]
fn test_propagation_is_idempotent() {
    let (mut program, report) = check_program(
        "type Animal(a) {}
         type Gato(b) inherits Animal(b) {}
         1",
    );

    propagate_parameters(&report.hierarchy, &report.definitions, &mut program);

    assert_eq!(param_names(&program, "Gato"), vec!["a", "b"]);
}

#[test]
fn test_disconnected_type_keeps_declared_parameters() {
    let (program, _) = check_program("type A(x) inherits Number {} 1");

    assert_eq!(param_names(&program, "A"), vec!["x"]);
}

#[test]
fn test_undefined_variable() {
    let report = check("print(x)");

    assert_eq!(
        report.diagnostics,
        vec![SemanticError::UndefinedVariable { name: "x".to_string() }]
    );

    assert!(check("let x = 5 in print(x)").is_success());
}

#[test]
fn test_let_binding_scope() {
    let report = check("{ let x = 1 in x; x; }");
    assert_eq!(report.diagnostic_names(), vec!["UndefinedVariable"]);

    // The bound value is resolved in the outer scope.
    let report = check("let x = x in x");
    assert_eq!(report.diagnostic_names(), vec!["UndefinedVariable"]);

    assert!(check("let a = 5, b = a in let a = b in print(a)").is_success());
}

#[test]
fn test_loop_variables_are_bound_in_body_only() {
    assert!(check("function range(a, b) => a; for (i in range(0, 3)) print(i)").is_success());

    let report = check("{ [i ^ 2 | i in [1, 2]]; i; }");
    assert_eq!(
        report.diagnostics,
        vec![SemanticError::UndefinedVariable { name: "i".to_string() }]
    );
}

#[test]
fn test_destructive_assignment_is_resolved() {
    let report = check("let x = 1 in x := y");

    assert_eq!(
        report.diagnostics,
        vec![SemanticError::UndefinedVariable { name: "y".to_string() }]
    );
}

#[test]
fn test_function_calls_resolve_by_arity() {
    assert!(check("function f(x) => x; f(1)").is_success());

    let report = check("function f(x) => x; f(1, 2)");
    assert_eq!(
        report.diagnostics,
        vec![SemanticError::UndefinedFunction {
            signature: "f/2".to_string()
        }]
    );

    let report = check("function f(x) => x; f(y)");
    assert_eq!(report.diagnostic_names(), vec!["UndefinedVariable"]);
}

#[test]
fn test_function_bodies_are_checked() {
    let report = check("function f(a) => a + b; f(1)");

    assert_eq!(
        report.diagnostics,
        vec![SemanticError::UndefinedVariable { name: "b".to_string() }]
    );
}

#[test]
fn test_missing_global_expression_skips_reference_check() {
    let report = check("function f() => x;");

    assert_eq!(report.diagnostics, vec![SemanticError::MissingGlobalExpression]);
}

#[test]
fn test_instantiation_arity() {
    let source = "type Animal(a) {} type Felino inherits Animal {} type Gato inherits Felino {}";

    assert!(check(&format!("{} new Gato(1)", source)).is_success());

    let report = check(&format!("{} new Gato()", source));
    assert_eq!(
        report.diagnostics,
        vec![SemanticError::ArityMismatch {
            type_name: "Gato".to_string(),
            expected: 1,
            received: 0,
        }]
    );

    let report = check(&format!("{} new Gato(1, x)", source));
    assert_eq!(
        report.diagnostics,
        vec![
            SemanticError::ArityMismatch {
                type_name: "Gato".to_string(),
                expected: 1,
                received: 2,
            },
            SemanticError::UndefinedVariable { name: "x".to_string() },
        ]
    );
}

#[test]
fn test_instantiation_of_non_instantiable_and_unknown_types() {
    let report = check("protocol P { m(): Number; } new P()");
    assert_eq!(
        report.diagnostics,
        vec![SemanticError::NotInstantiable { name: "P".to_string() }]
    );

    let report = check("new Number(1)");
    assert_eq!(report.diagnostic_names(), vec!["NotInstantiable"]);

    let report = check("new Ghost(y)");
    assert_eq!(
        report.diagnostics,
        vec![SemanticError::UndefinedType {
            name: "Ghost".to_string()
        }]
    );
}

#[test]
fn test_type_bodies_scope() {
    assert!(check("type A(a) { x = a; } new A(1)").is_success());

    let report = check("type A(a) { m() => a; } new A(1)");
    assert_eq!(
        report.diagnostics,
        vec![SemanticError::UndefinedVariable { name: "a".to_string() }]
    );

    let report = check("type A(a) inherits Ghost(b) {} 1");
    assert_eq!(
        report.diagnostic_names(),
        vec!["UndefinedType", "HierarchyDisconnected", "UndefinedVariable"]
    );
}

#[test]
fn test_method_calls_on_known_classes() {
    let source = "type A { m() => 1; } type B inherits A { n(x: A) => x.m(); }";

    assert!(check(&format!("{} let b = new B() in b.m()", source)).is_success());
    assert!(check(&format!("{} new B().n(new A())", source)).is_success());

    let report = check(&format!("{} let b = new B() in b.z()", source));
    assert_eq!(
        report.diagnostics,
        vec![SemanticError::UndefinedMethod {
            type_name: "B".to_string(),
            signature: "z/0".to_string(),
        }]
    );

    let report = check(&format!("{} new A().m(1)", source));
    assert_eq!(
        report.diagnostics,
        vec![SemanticError::UndefinedMethod {
            type_name: "A".to_string(),
            signature: "m/1".to_string(),
        }]
    );
}

#[test]
fn test_method_calls_on_unknown_classes_are_not_checked() {
    assert!(check("function f(x) => x.anything(); f(1)").is_success());

    let report = check("function f(x) => x.anything(y); f(1)");
    assert_eq!(report.diagnostic_names(), vec!["UndefinedVariable"]);
}

#[test]
fn test_self_resolves_to_enclosing_type() {
    assert!(check("type A { m() => self.n(); n() => self.x; } 1").is_success());

    let report = check("type A { m() => self.q(); } 1");
    assert_eq!(
        report.diagnostics,
        vec![SemanticError::UndefinedMethod {
            type_name: "A".to_string(),
            signature: "q/0".to_string(),
        }]
    );
}

#[test]
fn test_conditional_class_joins_branches() {
    let source = "type A { m() => 1; } type B inherits A {} type C inherits A {}";

    assert!(check(&format!("{} let x = if (true) new B() else new C() in x.m()", source)).is_success());

    let report = check(&format!("{} let x = if (true) new B() else new C() in x.q()", source));
    assert_eq!(
        report.diagnostics,
        vec![SemanticError::UndefinedMethod {
            type_name: "A".to_string(),
            signature: "q/0".to_string(),
        }]
    );

    // Branches joined only at `Object` are left unchecked.
    assert!(check("type D {} type F {} let x = if (true) new D() else new F() in x.q()").is_success());
}

#[test]
fn test_end_to_end_animals() {
    let source = format!("{} let a = 5, b = a in print(new Lobo(2))", ANIMALS);
    let (program, report) = check_program(&source);

    assert!(report.diagnostics.is_empty());
    assert_eq!(report.render(), SUCCESS_MESSAGE);
    assert_eq!(param_names(&program, "Lobo"), vec!["a"]);
}

#[test]
fn test_render_lists_diagnostics() {
    let report = check("print(x + f(1))");

    assert_eq!(
        report.render(),
        "SEMANTIC CHECK FOUND THE FOLLOWING ERRORS:\nVariable x not defined\nFunction f/1 not defined"
    );
}

#[test]
fn test_scope_shadowing() {
    let mut root = Scope::root();
    root.define("x", Binding::default());

    let inner = root.extend("x", Binding::of_class(Some("Point".to_string())));
    let nested = inner.child();

    assert_eq!(nested.lookup("x").unwrap().class.as_deref(), Some("Point"));
    assert_eq!(root.lookup("x").unwrap().class, None);
    assert!(!nested.contains("y"));
}
