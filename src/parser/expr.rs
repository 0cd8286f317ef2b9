use crate::{
    ast::expressions::{Assign, BinaryOperator, Case, Expr, Params, UnaryOperator},
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::TokenKind,
};

use super::{lookups::BindingPower, parser::Parser};

pub fn parse_expr(parser: &mut Parser, bp: BindingPower) -> Result<Expr, Error> {
    // First parse NUD
    let token_kind = parser.current_token_kind();
    let Some(nud) = parser.get_nud(token_kind) else {
        return Err(Error::new(
            ErrorImpl::UnexpectedToken {
                token: parser.current_token().value.clone(),
            },
            parser.get_position(),
        ));
    };

    let mut left = nud(parser)?;

    // While LED and current BP is less than BP of current token, continue parsing lhs
    while parser.get_bp(parser.current_token_kind()) > bp {
        let token_kind = parser.current_token_kind();
        let Some(led) = parser.get_led(token_kind) else {
            return Err(parser.unexpected("expected an operator"));
        };

        let token_bp = parser.get_bp(token_kind);
        left = led(parser, left, token_bp)?;
    }

    Ok(left)
}

pub fn parse_primary_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let token = parser.advance();
    match token.kind {
        TokenKind::Number => token.value.parse().map(Expr::Number).map_err(|_| {
            Error::new(
                ErrorImpl::NumberParseError {
                    token: token.value.clone(),
                },
                token.span.start.clone(),
            )
        }),
        TokenKind::Identifier => Ok(Expr::Id(token.value)),
        TokenKind::String => Ok(Expr::Str(token.value)),
        TokenKind::True => Ok(Expr::Bool(true)),
        TokenKind::False => Ok(Expr::Bool(false)),
        TokenKind::Pi => Ok(Expr::Pi),
        TokenKind::E => Ok(Expr::E),
        _ => Err(Error::new(
            ErrorImpl::UnexpectedToken { token: token.value },
            token.span.start,
        )),
    }
}

fn binary_operator(kind: TokenKind) -> Option<BinaryOperator> {
    let op = match kind {
        TokenKind::Plus => BinaryOperator::Add,
        TokenKind::Dash => BinaryOperator::Sub,
        TokenKind::Star => BinaryOperator::Mul,
        TokenKind::Slash => BinaryOperator::Div,
        TokenKind::Percent => BinaryOperator::Mod,
        TokenKind::Caret => BinaryOperator::Pow,
        TokenKind::At => BinaryOperator::Concat,
        TokenKind::DoubleAt => BinaryOperator::ConcatSpaced,
        TokenKind::Equals => BinaryOperator::Eq,
        TokenKind::NotEquals => BinaryOperator::NotEq,
        TokenKind::Less => BinaryOperator::Less,
        TokenKind::LessEquals => BinaryOperator::LessEq,
        TokenKind::Greater => BinaryOperator::Greater,
        TokenKind::GreaterEquals => BinaryOperator::GreaterEq,
        TokenKind::And | TokenKind::DoubleAnd => BinaryOperator::And,
        TokenKind::Or | TokenKind::DoubleOr => BinaryOperator::Or,
        TokenKind::Dot => BinaryOperator::Member,
        _ => return None,
    };
    Some(op)
}

pub fn parse_binary_expr(parser: &mut Parser, left: Expr, bp: BindingPower) -> Result<Expr, Error> {
    let operator_token = parser.advance();
    let Some(op) = binary_operator(operator_token.kind) else {
        return Err(Error::new(
            ErrorImpl::UnexpectedToken {
                token: operator_token.value,
            },
            operator_token.span.start,
        ));
    };

    let right = parse_expr(parser, bp)?;

    Ok(Expr::binary(left, op, right))
}

/// `^` is right associative.
pub fn parse_power_expr(parser: &mut Parser, left: Expr, _bp: BindingPower) -> Result<Expr, Error> {
    parser.advance();
    let right = parse_expr(parser, BindingPower::Multiplicative)?;

    Ok(Expr::binary(left, BinaryOperator::Pow, right))
}

/// Prefix operators bind looser than `^`, so `-2 ^ 2` is `-(2 ^ 2)`.
pub fn parse_prefix_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let operator_token = parser.advance();
    let operand = parse_expr(parser, BindingPower::Multiplicative)?;

    let op = if operator_token.kind == TokenKind::Not {
        UnaryOperator::Not
    } else {
        UnaryOperator::Neg
    };

    Ok(Expr::UnaryOp {
        op,
        operand: Box::new(operand),
    })
}

pub fn parse_destructive_assign_expr(parser: &mut Parser, left: Expr, _bp: BindingPower) -> Result<Expr, Error> {
    let operator_token = parser.advance();

    let is_assignable = matches!(
        left,
        Expr::Id(_)
            | Expr::VectorCall { .. }
            | Expr::BinOp {
                op: BinaryOperator::Member,
                ..
            }
    );
    if !is_assignable {
        return Err(Error::new(
            ErrorImpl::UnexpectedTokenDetailed {
                token: operator_token.value,
                message: String::from("left side of `:=` is not assignable"),
            },
            operator_token.span.start,
        ));
    }

    let value = parse_expr(parser, BindingPower::Default)?;

    Ok(Expr::DestructiveAssign {
        target: Box::new(left),
        value: Box::new(value),
    })
}

pub fn parse_grouping_expr(parser: &mut Parser) -> Result<Expr, Error> {
    parser.advance();
    let expr = parse_expr(parser, BindingPower::Default)?;
    parser.expect(TokenKind::CloseParen)?;

    Ok(expr)
}

/// Parses `( expr, expr, ... )`, consuming both parentheses.
pub fn parse_arguments(parser: &mut Parser) -> Result<Params, Error> {
    parser.expect(TokenKind::OpenParen)?;

    let mut args = vec![];
    while parser.current_token_kind() != TokenKind::CloseParen {
        args.push(parse_expr(parser, BindingPower::Default)?);

        if !parser.eat(TokenKind::Comma) && parser.current_token_kind() != TokenKind::CloseParen {
            return Err(parser.unexpected("expected `,` or `)` in argument list"));
        }
    }

    parser.expect(TokenKind::CloseParen)?;

    Ok(Params::new(args))
}

pub fn parse_call_expr(parser: &mut Parser, left: Expr, _bp: BindingPower) -> Result<Expr, Error> {
    let Expr::Id(name) = left else {
        return Err(parser.unexpected("only named functions can be called"));
    };

    let params = parse_arguments(parser)?;

    Ok(Expr::FunctionCall { name, params })
}

/// `left.attribute` or `left.method(args)`.
pub fn parse_member_expr(parser: &mut Parser, left: Expr, _bp: BindingPower) -> Result<Expr, Error> {
    parser.advance();
    let member = parser.expect(TokenKind::Identifier)?.value;

    let right = if parser.current_token_kind() == TokenKind::OpenParen {
        Expr::FunctionCall {
            name: member,
            params: parse_arguments(parser)?,
        }
    } else {
        Expr::Id(member)
    };

    Ok(Expr::binary(left, BinaryOperator::Member, right))
}

pub fn parse_index_expr(parser: &mut Parser, left: Expr, _bp: BindingPower) -> Result<Expr, Error> {
    parser.advance();
    let index = parse_expr(parser, BindingPower::Default)?;
    parser.expect(TokenKind::CloseBracket)?;

    Ok(Expr::VectorCall {
        vector: Box::new(left),
        index: Box::new(index),
    })
}

/// `{ expr; expr; ... }`, the last `;` is optional.
pub fn parse_block_expr(parser: &mut Parser) -> Result<Expr, Error> {
    parser.advance();

    let mut expressions = vec![];
    while parser.current_token_kind() != TokenKind::CloseCurly {
        expressions.push(parse_expr(parser, BindingPower::Default)?);

        if !parser.eat(TokenKind::Semicolon) && parser.current_token_kind() != TokenKind::CloseCurly {
            return Err(parser.unexpected("expected `;` after expression in block"));
        }
    }

    parser.expect(TokenKind::CloseCurly)?;

    Ok(Expr::Block(expressions))
}

/// `[a, b, c]` or `[expr | x in iterable]`.
pub fn parse_vector_expr(parser: &mut Parser) -> Result<Expr, Error> {
    parser.advance();

    if parser.eat(TokenKind::CloseBracket) {
        return Ok(Expr::VectorExt(vec![]));
    }

    let first = parse_expr(parser, BindingPower::Default)?;

    // The generator bar was parsed as `|`, split it back apart
    if parser.current_token_kind() == TokenKind::In {
        if let Expr::BinOp {
            left,
            op: BinaryOperator::Or,
            right,
        } = first
        {
            if let Expr::Id(variable) = *right {
                parser.advance();
                let iterable = parse_expr(parser, BindingPower::Default)?;
                parser.expect(TokenKind::CloseBracket)?;

                return Ok(Expr::VectorInt {
                    expr: left,
                    variable,
                    iterable: Box::new(iterable),
                });
            }
        }
        return Err(parser.unexpected("expected `[expr | variable in iterable]`"));
    }

    let mut elements = vec![first];
    while parser.eat(TokenKind::Comma) {
        elements.push(parse_expr(parser, BindingPower::Default)?);
    }
    parser.expect(TokenKind::CloseBracket)?;

    Ok(Expr::VectorExt(elements))
}

pub fn parse_type_call_expr(parser: &mut Parser) -> Result<Expr, Error> {
    parser.advance();
    let name = parser.expect(TokenKind::Identifier)?.value;
    let params = parse_arguments(parser)?;

    Ok(Expr::TypeCall { name, params })
}

/// Parses an optional `: Type` annotation.
pub fn parse_annotation(parser: &mut Parser) -> Result<Option<String>, Error> {
    if parser.eat(TokenKind::Colon) {
        Ok(Some(parser.expect(TokenKind::Identifier)?.value))
    } else {
        Ok(None)
    }
}

/// `let a = 1, b = a in body` becomes `let a = 1 in let b = a in body`.
pub fn parse_let_expr(parser: &mut Parser) -> Result<Expr, Error> {
    parser.advance();

    let mut bindings = vec![];
    loop {
        let error = parser.unexpected("expected identifier in let binding");
        let name = parser.expect_error(TokenKind::Identifier, Some(error))?.value;
        let annotation = parse_annotation(parser)?;
        parser.expect(TokenKind::Assignment)?;
        let value = parse_expr(parser, BindingPower::Default)?;

        bindings.push(Assign {
            name,
            annotation,
            value: Box::new(value),
        });

        if !parser.eat(TokenKind::Comma) {
            break;
        }
    }

    parser.expect(TokenKind::In)?;
    let body = parse_expr(parser, BindingPower::Default)?;

    Ok(bindings.into_iter().rev().fold(body, |body, binding| Expr::Let {
        binding,
        body: Box::new(body),
    }))
}

fn parse_condition(parser: &mut Parser) -> Result<Expr, Error> {
    parser.expect(TokenKind::OpenParen)?;
    let condition = parse_expr(parser, BindingPower::Default)?;
    parser.expect(TokenKind::CloseParen)?;

    Ok(condition)
}

pub fn parse_if_expr(parser: &mut Parser) -> Result<Expr, Error> {
    parser.advance();

    let condition = parse_condition(parser)?;
    let body = parse_expr(parser, BindingPower::Default)?;
    let mut cases = vec![Case { condition, body }];

    while parser.eat(TokenKind::Elif) {
        let condition = parse_condition(parser)?;
        let body = parse_expr(parser, BindingPower::Default)?;
        cases.push(Case { condition, body });
    }

    let default = if parser.eat(TokenKind::Else) {
        Some(Box::new(parse_expr(parser, BindingPower::Default)?))
    } else {
        None
    };

    Ok(Expr::If { cases, default })
}

pub fn parse_while_expr(parser: &mut Parser) -> Result<Expr, Error> {
    parser.advance();

    let condition = parse_condition(parser)?;
    let body = parse_expr(parser, BindingPower::Default)?;

    Ok(Expr::While {
        condition: Box::new(condition),
        body: Box::new(body),
    })
}

/// `for (x in iterable) body`
pub fn parse_for_expr(parser: &mut Parser) -> Result<Expr, Error> {
    parser.advance();

    parser.expect(TokenKind::OpenParen)?;
    let variable = parser.expect(TokenKind::Identifier)?.value;
    parser.expect(TokenKind::In)?;
    let iterable = parse_expr(parser, BindingPower::Default)?;
    parser.expect(TokenKind::CloseParen)?;

    let body = parse_expr(parser, BindingPower::Default)?;

    Ok(Expr::For {
        variable,
        iterable: Box::new(iterable),
        body: Box::new(body),
    })
}

pub fn parse_builtin_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let builtin = parser.advance();
    let expected = match builtin.kind {
        TokenKind::Rand => 0,
        TokenKind::Log => 2,
        _ => 1,
    };

    let params = parse_arguments(parser)?;
    let received = params.len();

    if received > expected {
        return Err(Error::new(
            ErrorImpl::UnexpectedArguments {
                builtin: builtin.value,
                expected,
                received,
            },
            builtin.span.start,
        ));
    } else if received < expected {
        return Err(Error::new(
            ErrorImpl::MissingArguments {
                builtin: builtin.value,
                expected,
                received,
            },
            builtin.span.start,
        ));
    }

    let mut args = params.param_list.into_iter().map(Box::new);
    let mut next = || args.next().ok_or_else(|| parser.unexpected("missing argument"));

    let expr = match builtin.kind {
        TokenKind::Print => Expr::Print(next()?),
        TokenKind::Sqrt => Expr::Sqrt(next()?),
        TokenKind::Sin => Expr::Sin(next()?),
        TokenKind::Cos => Expr::Cos(next()?),
        TokenKind::Exp => Expr::Exp(next()?),
        TokenKind::Log => {
            let base = next()?;
            let value = next()?;
            Expr::Log { base, value }
        }
        _ => Expr::Rand,
    };

    Ok(expr)
}
