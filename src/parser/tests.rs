//! Unit tests for the parser module.
//!
//! Covers definitions (functions, types, protocols), operator precedence,
//! binding and control-flow expressions, built-ins and syntax errors.

use std::rc::Rc;

use pretty_assertions::assert_eq;

use super::parser::parse;
use crate::{
    ast::{
        ast::Program,
        expressions::{BinaryOperator, Case, Expr, UnaryOperator},
    },
    errors::errors::Error,
    lexer::lexer::tokenize,
};

fn parse_source(source: &str) -> Result<Program, Error> {
    let tokens = tokenize(source.to_string(), Some("test.hulk".to_string()))?;
    parse(tokens, Rc::new("test.hulk".to_string()))
}

fn parse_global(source: &str) -> Expr {
    parse_source(source)
        .unwrap()
        .global_exp
        .expect("a global expression")
}

#[test]
fn test_parse_function_definitions() {
    let program = parse_source(
        "function asd(a, b, c) => print(a);
         function block(x: Number): Number { x; }
         42;",
    )
    .unwrap();

    assert_eq!(program.functions.len(), 2);
    assert_eq!(program.functions[0].signature(), "asd/3");
    assert_eq!(program.functions[0].body, Expr::Print(Box::new(Expr::id("a"))));
    assert_eq!(program.functions[1].params[0].annotation.as_deref(), Some("Number"));
    assert_eq!(program.functions[1].return_annotation.as_deref(), Some("Number"));
    assert_eq!(program.functions[1].body, Expr::Block(vec![Expr::id("x")]));
    assert_eq!(program.global_exp, Some(Expr::Number(42.0)));
}

#[test]
fn test_parse_type_definitions() {
    let program = parse_source(
        "type Animal(a) { name = a; speak() => \"...\"; }
         type Felino inherits Animal {}
         type Gato(b) inherits Felino(b) { meow(times) { print(times); } }
         1",
    )
    .unwrap();

    assert_eq!(program.types.len(), 3);

    let animal = &program.types[0];
    assert_eq!(animal.params.len(), 1);
    assert_eq!(animal.declared_param_count, 1);
    assert!(animal.inherits.is_none());
    assert_eq!(animal.attributes[0].name, "name");
    assert_eq!(animal.methods[0].signature(), "speak/0");

    let felino = &program.types[1];
    assert!(felino.params.is_empty());
    assert_eq!(felino.inherits.as_ref().unwrap().name, "Animal");

    let gato = &program.types[2];
    let inherits = gato.inherits.as_ref().unwrap();
    assert_eq!(inherits.name, "Felino");
    assert_eq!(inherits.args, vec![Expr::id("b")]);
    assert!(gato.find_method("meow/1").is_some());
}

#[test]
fn test_parse_protocol_definition() {
    let program = parse_source(
        "protocol Hashable { hash(): Number; }
         protocol Comparable extends Hashable { compare(other: Object): Number; }
         1",
    )
    .unwrap();

    assert_eq!(program.protocols.len(), 2);
    assert_eq!(program.protocols[0].methods[0].signature(), "hash/0");
    assert_eq!(program.protocols[1].extends.as_deref(), Some("Hashable"));
    assert_eq!(program.protocols[1].methods[0].params[0].annotation.as_deref(), Some("Object"));
}

#[test]
fn test_missing_global_expression_is_not_a_syntax_error() {
    let program = parse_source("function f() => 1;").unwrap();

    assert!(program.global_exp.is_none());
}

#[test]
fn test_operator_precedence() {
    let expr = parse_global("1 + 2 * 3 ^ 2 ^ 1");

    let power = Expr::binary(
        Expr::Number(3.0),
        BinaryOperator::Pow,
        Expr::binary(Expr::Number(2.0), BinaryOperator::Pow, Expr::Number(1.0)),
    );
    let expected = Expr::binary(
        Expr::Number(1.0),
        BinaryOperator::Add,
        Expr::binary(Expr::Number(2.0), BinaryOperator::Mul, power),
    );

    assert_eq!(expr, expected);
}

#[test]
fn test_prefix_binds_tighter_than_addition() {
    let expr = parse_global("-a + b");

    assert_eq!(
        expr,
        Expr::binary(
            Expr::UnaryOp {
                op: UnaryOperator::Neg,
                operand: Box::new(Expr::id("a")),
            },
            BinaryOperator::Add,
            Expr::id("b"),
        )
    );
}

#[test]
fn test_prefix_binds_looser_than_power() {
    let neg = |operand: Expr| Expr::UnaryOp {
        op: UnaryOperator::Neg,
        operand: Box::new(operand),
    };

    assert_eq!(
        parse_global("-2 ^ 2"),
        neg(Expr::binary(Expr::Number(2.0), BinaryOperator::Pow, Expr::Number(2.0)))
    );
    assert_eq!(
        parse_global("-a * b"),
        Expr::binary(neg(Expr::id("a")), BinaryOperator::Mul, Expr::id("b"))
    );
}

#[test]
fn test_let_with_multiple_bindings_nests() {
    let expr = parse_global("let a = 5, b = a in print(b)");

    let expected = Expr::let_in(
        "a",
        Expr::Number(5.0),
        Expr::let_in("b", Expr::id("a"), Expr::Print(Box::new(Expr::id("b")))),
    );
    assert_eq!(expr, expected);
}

#[test]
fn test_let_binding_annotation() {
    let Expr::Let { binding, .. } = parse_global("let x: Number = 1 in x") else {
        panic!("expected a let expression");
    };

    assert_eq!(binding.annotation.as_deref(), Some("Number"));
}

#[test]
fn test_if_elif_else() {
    let expr = parse_global("if (a) 1 elif (b) 2 else 3");

    assert_eq!(
        expr,
        Expr::If {
            cases: vec![
                Case {
                    condition: Expr::id("a"),
                    body: Expr::Number(1.0),
                },
                Case {
                    condition: Expr::id("b"),
                    body: Expr::Number(2.0),
                },
            ],
            default: Some(Box::new(Expr::Number(3.0))),
        }
    );
}

#[test]
fn test_while_and_for() {
    let expr = parse_global("while (x < 10) x := x + 1");
    assert!(matches!(expr, Expr::While { .. }));

    let expr = parse_global("for (i in range(0, 10)) print(i)");
    let Expr::For { variable, iterable, .. } = expr else {
        panic!("expected a for expression");
    };
    assert_eq!(variable, "i");
    assert_eq!(*iterable, Expr::call("range", vec![Expr::Number(0.0), Expr::Number(10.0)]));
}

#[test]
fn test_destructive_assignment_target() {
    let expr = parse_global("a := b := 3");

    assert_eq!(
        expr,
        Expr::DestructiveAssign {
            target: Box::new(Expr::id("a")),
            value: Box::new(Expr::DestructiveAssign {
                target: Box::new(Expr::id("b")),
                value: Box::new(Expr::Number(3.0)),
            }),
        }
    );

    assert!(parse_source("1 := 2").is_err());
}

#[test]
fn test_member_access_and_method_call() {
    let expr = parse_global("new Lobo(2).howl(3).name");

    let call = Expr::binary(
        Expr::new_instance("Lobo", vec![Expr::Number(2.0)]),
        BinaryOperator::Member,
        Expr::call("howl", vec![Expr::Number(3.0)]),
    );
    assert_eq!(expr, Expr::binary(call, BinaryOperator::Member, Expr::id("name")));
}

#[test]
fn test_block_and_vectors() {
    let expr = parse_global("{ [1, 2, 3]; [x ^ 2 | x in xs]; v[0]; }");

    let Expr::Block(expressions) = expr else {
        panic!("expected a block");
    };
    assert_eq!(expressions.len(), 3);
    assert_eq!(
        expressions[0],
        Expr::VectorExt(vec![Expr::Number(1.0), Expr::Number(2.0), Expr::Number(3.0)])
    );
    assert!(matches!(&expressions[1], Expr::VectorInt { variable, .. } if variable == "x"));
    assert!(matches!(expressions[2], Expr::VectorCall { .. }));
}

#[test]
fn test_builtins() {
    assert_eq!(
        parse_global("log(2, 8)"),
        Expr::Log {
            base: Box::new(Expr::Number(2.0)),
            value: Box::new(Expr::Number(8.0)),
        }
    );
    assert_eq!(parse_global("rand()"), Expr::Rand);
    assert_eq!(parse_global("sqrt(PI)"), Expr::Sqrt(Box::new(Expr::Pi)));
}

#[test]
fn test_builtin_argument_count_errors() {
    let error = parse_source("sqrt(1, 2)").unwrap_err();
    assert_eq!(error.get_error_name(), "UnexpectedArguments");

    let error = parse_source("log(1)").unwrap_err();
    assert_eq!(error.get_error_name(), "MissingArguments");
}

#[test]
fn test_only_one_global_expression() {
    let error = parse_source("print(1); print(2);").unwrap_err();

    assert_eq!(error.get_error_name(), "UnexpectedTokenDetailed");
}

#[test]
fn test_unexpected_token_position() {
    let error = parse_source("let x = in x").unwrap_err();

    assert_eq!(error.get_error_name(), "UnexpectedToken");
    assert_eq!(error.get_position().0, 8);
}

#[test]
fn test_unclosed_block_reaches_eof() {
    assert!(parse_source("{ print(1);").is_err());
    assert!(parse_source("type A {").is_err());
}
