use crate::{
    ast::{
        ast::{Attribute, FunctionDef, Inherits, Method, MethodSignature, Param, Protocol, TypeDef},
        expressions::Expr,
    },
    errors::errors::Error,
    lexer::tokens::TokenKind,
    Span,
};

use super::{
    expr::{parse_annotation, parse_arguments, parse_expr},
    lookups::BindingPower,
    parser::Parser,
};

/// Parses `(a, b: Number, ...)`.
pub fn parse_params(parser: &mut Parser) -> Result<Vec<Param>, Error> {
    parser.expect(TokenKind::OpenParen)?;

    let mut params = Vec::new();
    while parser.current_token_kind() != TokenKind::CloseParen {
        let error = parser.unexpected("expected parameter name");
        let name = parser.expect_error(TokenKind::Identifier, Some(error))?.value;
        let annotation = parse_annotation(parser)?;
        params.push(Param { name, annotation });

        if !parser.eat(TokenKind::Comma) && parser.current_token_kind() != TokenKind::CloseParen {
            return Err(parser.unexpected("expected `,` or `)` in parameter list"));
        }
    }

    parser.expect(TokenKind::CloseParen)?;

    Ok(params)
}

/// Parses either `=> expr;` or a block body followed by an optional `;`.
fn parse_body(parser: &mut Parser) -> Result<Expr, Error> {
    if parser.eat(TokenKind::Arrow) {
        let body = parse_expr(parser, BindingPower::Default)?;
        parser.expect(TokenKind::Semicolon)?;
        Ok(body)
    } else if parser.current_token_kind() == TokenKind::OpenCurly {
        let body = parse_expr(parser, BindingPower::Default)?;
        parser.eat(TokenKind::Semicolon);
        Ok(body)
    } else {
        Err(parser.unexpected("expected `=>` or `{` to start a body"))
    }
}

pub fn parse_function_def(parser: &mut Parser) -> Result<FunctionDef, Error> {
    let start = parser.advance().span.start;

    let name = parser.expect(TokenKind::Identifier)?.value;
    let params = parse_params(parser)?;
    let return_annotation = parse_annotation(parser)?;
    let body = parse_body(parser)?;

    Ok(FunctionDef {
        name,
        params,
        return_annotation,
        body,
        span: Span {
            start,
            end: parser.get_position(),
        },
    })
}

/// `type Name(params) inherits Parent(args) { attributes and methods }`
pub fn parse_type_def(parser: &mut Parser) -> Result<TypeDef, Error> {
    let start = parser.advance().span.start;

    let name = parser.expect(TokenKind::Identifier)?.value;

    let params = if parser.current_token_kind() == TokenKind::OpenParen {
        parse_params(parser)?
    } else {
        Vec::new()
    };

    let inherits = if parser.eat(TokenKind::Inherits) {
        let parent = parser.expect(TokenKind::Identifier)?.value;
        let args = if parser.current_token_kind() == TokenKind::OpenParen {
            parse_arguments(parser)?.param_list
        } else {
            Vec::new()
        };
        Some(Inherits { name: parent, args })
    } else {
        None
    };

    parser.expect(TokenKind::OpenCurly)?;

    let mut attributes = Vec::new();
    let mut methods = Vec::new();
    while parser.current_token_kind() != TokenKind::CloseCurly {
        let error = parser.unexpected("expected attribute or method name");
        let member = parser.expect_error(TokenKind::Identifier, Some(error))?.value;

        if parser.current_token_kind() == TokenKind::OpenParen {
            let params = parse_params(parser)?;
            let return_annotation = parse_annotation(parser)?;
            let body = parse_body(parser)?;
            methods.push(Method {
                name: member,
                params,
                return_annotation,
                body,
            });
        } else {
            let annotation = parse_annotation(parser)?;
            parser.expect(TokenKind::Assignment)?;
            let value = parse_expr(parser, BindingPower::Default)?;
            parser.expect(TokenKind::Semicolon)?;
            attributes.push(Attribute {
                name: member,
                annotation,
                value,
            });
        }
    }

    parser.expect(TokenKind::CloseCurly)?;

    Ok(TypeDef {
        name,
        declared_param_count: params.len(),
        params,
        inherits,
        attributes,
        methods,
        span: Span {
            start,
            end: parser.get_position(),
        },
    })
}

/// `protocol Name extends Parent { method(params): Type; }`
pub fn parse_protocol_def(parser: &mut Parser) -> Result<Protocol, Error> {
    let start = parser.advance().span.start;

    let name = parser.expect(TokenKind::Identifier)?.value;

    let extends = if parser.eat(TokenKind::Extends) {
        Some(parser.expect(TokenKind::Identifier)?.value)
    } else {
        None
    };

    parser.expect(TokenKind::OpenCurly)?;

    let mut methods = Vec::new();
    while parser.current_token_kind() != TokenKind::CloseCurly {
        let error = parser.unexpected("expected method signature");
        let method = parser.expect_error(TokenKind::Identifier, Some(error))?.value;
        let params = parse_params(parser)?;
        let return_annotation = parse_annotation(parser)?;
        parser.expect(TokenKind::Semicolon)?;

        methods.push(MethodSignature {
            name: method,
            params,
            return_annotation,
        });
    }

    parser.expect(TokenKind::CloseCurly)?;

    Ok(Protocol {
        name,
        extends,
        methods,
        span: Span {
            start,
            end: parser.get_position(),
        },
    })
}
