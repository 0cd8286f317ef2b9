//! Integration tests for the full front end.
//!
//! These tests run complete HULK programs through tokenization, parsing and
//! semantic checking, and compare the rendered report.

use std::rc::Rc;

use hulk::{
    lexer::lexer::tokenize,
    parser::parser::parse,
    semantic_checker::semantic_checker::{semantic_check, SemanticReport, FAILURE_HEADER, SUCCESS_MESSAGE},
};
use pretty_assertions::assert_eq;

fn run(source: &str, file: &str) -> SemanticReport {
    let tokens = tokenize(source.to_string(), Some(file.to_string())).unwrap();
    let mut program = parse(tokens, Rc::new(file.to_string())).unwrap();
    semantic_check(&mut program)
}

#[test]
fn test_animals_program_checks_cleanly() {
    let report = run(include_str!("../demos/animals.hulk"), "animals.hulk");

    assert_eq!(report.render(), SUCCESS_MESSAGE);
    assert_eq!(report.hierarchy.get("Lobo").unwrap().depth, 3);
}

#[test]
fn test_shapes_program_checks_cleanly() {
    let report = run(include_str!("../demos/shapes.hulk"), "shapes.hulk");

    assert_eq!(report.render(), SUCCESS_MESSAGE);
}

#[test]
fn test_broken_program_reports_every_diagnostic() {
    let report = run(include_str!("../demos/broken.hulk"), "broken.hulk");

    let expected = [
        FAILURE_HEADER,
        "Function twice/1 already defined",
        "Type Weird cannot inherit from type Number",
        "Types not connected to Object: Weird",
        "Variable x not defined",
        "Variable x not defined",
        "Variable y not defined",
        "Variable y not defined",
        "Amount of params doesn't match type definition of Point (2) and its instantiation (1)",
        "Method length/0 not defined in type Point",
        "Function twice/2 not defined",
        "Variable q not defined",
    ]
    .join("\n");

    assert_eq!(report.render(), expected);
}

#[test]
fn test_syntax_error_stops_before_semantic_check() {
    let tokens = tokenize("let x = 1 in print(x".to_string(), Some("bad.hulk".to_string())).unwrap();
    let error = parse(tokens, Rc::new("bad.hulk".to_string())).unwrap_err();

    assert_eq!(error.get_position().1.as_str(), "bad.hulk");
}

#[test]
fn test_reports_are_independent_between_runs() {
    let first = run("print(x)", "first.hulk");
    let second = run("let x = 1 in print(x)", "second.hulk");

    assert!(!first.is_success());
    assert!(second.is_success());
}
