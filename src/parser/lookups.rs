use std::collections::HashMap;

use crate::{ast::expressions::Expr, errors::errors::Error, lexer::tokens::TokenKind};

use super::{expr::*, parser::Parser};

#[derive(PartialEq, PartialOrd, Clone, Copy, Debug)]
pub enum BindingPower {
    Default,
    Assignment,
    Logical,
    Relational,
    Concat,
    Additive,
    Multiplicative,
    Power,
    Call,
    Member,
}

pub type NUDHandler = fn(&mut Parser) -> Result<Expr, Error>;
pub type LEDHandler = fn(&mut Parser, Expr, BindingPower) -> Result<Expr, Error>;

pub fn create_token_lookups(parser: &mut Parser) {
    parser.led(TokenKind::DestructiveAssignment, BindingPower::Assignment, parse_destructive_assign_expr);

    // Logical
    parser.led(TokenKind::And, BindingPower::Logical, parse_binary_expr);
    parser.led(TokenKind::Or, BindingPower::Logical, parse_binary_expr);
    parser.led(TokenKind::DoubleAnd, BindingPower::Logical, parse_binary_expr);
    parser.led(TokenKind::DoubleOr, BindingPower::Logical, parse_binary_expr);

    // Relational
    parser.led(TokenKind::Less, BindingPower::Relational, parse_binary_expr);
    parser.led(TokenKind::LessEquals, BindingPower::Relational, parse_binary_expr);
    parser.led(TokenKind::Greater, BindingPower::Relational, parse_binary_expr);
    parser.led(TokenKind::GreaterEquals, BindingPower::Relational, parse_binary_expr);
    parser.led(TokenKind::Equals, BindingPower::Relational, parse_binary_expr);
    parser.led(TokenKind::NotEquals, BindingPower::Relational, parse_binary_expr);

    // String concatenation
    parser.led(TokenKind::At, BindingPower::Concat, parse_binary_expr);
    parser.led(TokenKind::DoubleAt, BindingPower::Concat, parse_binary_expr);

    // Additive and multiplicative
    parser.led(TokenKind::Plus, BindingPower::Additive, parse_binary_expr);
    parser.led(TokenKind::Dash, BindingPower::Additive, parse_binary_expr);
    parser.led(TokenKind::Star, BindingPower::Multiplicative, parse_binary_expr);
    parser.led(TokenKind::Slash, BindingPower::Multiplicative, parse_binary_expr);
    parser.led(TokenKind::Percent, BindingPower::Multiplicative, parse_binary_expr);
    parser.led(TokenKind::Caret, BindingPower::Power, parse_power_expr);

    parser.led(TokenKind::OpenParen, BindingPower::Call, parse_call_expr);

    // Member and indexing
    parser.led(TokenKind::Dot, BindingPower::Member, parse_member_expr);
    parser.led(TokenKind::OpenBracket, BindingPower::Member, parse_index_expr);

    // Literals and symbols
    parser.nud(TokenKind::Number, parse_primary_expr);
    parser.nud(TokenKind::Identifier, parse_primary_expr);
    parser.nud(TokenKind::String, parse_primary_expr);
    parser.nud(TokenKind::True, parse_primary_expr);
    parser.nud(TokenKind::False, parse_primary_expr);
    parser.nud(TokenKind::Pi, parse_primary_expr);
    parser.nud(TokenKind::E, parse_primary_expr);
    parser.nud(TokenKind::Dash, parse_prefix_expr);
    parser.nud(TokenKind::Not, parse_prefix_expr);
    parser.nud(TokenKind::OpenParen, parse_grouping_expr);
    parser.nud(TokenKind::OpenCurly, parse_block_expr);
    parser.nud(TokenKind::OpenBracket, parse_vector_expr);
    parser.nud(TokenKind::New, parse_type_call_expr);

    // Binding and control flow
    parser.nud(TokenKind::Let, parse_let_expr);
    parser.nud(TokenKind::If, parse_if_expr);
    parser.nud(TokenKind::While, parse_while_expr);
    parser.nud(TokenKind::For, parse_for_expr);

    // Built-ins
    parser.nud(TokenKind::Print, parse_builtin_expr);
    parser.nud(TokenKind::Sqrt, parse_builtin_expr);
    parser.nud(TokenKind::Sin, parse_builtin_expr);
    parser.nud(TokenKind::Cos, parse_builtin_expr);
    parser.nud(TokenKind::Exp, parse_builtin_expr);
    parser.nud(TokenKind::Log, parse_builtin_expr);
    parser.nud(TokenKind::Rand, parse_builtin_expr);
}

// Lookup tables inside parser struct, so it's easier
pub type NUDLookup = HashMap<TokenKind, NUDHandler>;
pub type LEDLookup = HashMap<TokenKind, LEDHandler>;
pub type BPLookup = HashMap<TokenKind, BindingPower>;
