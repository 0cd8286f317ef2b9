//! Parser implementation for building the Abstract Syntax Tree.
//!
//! This module contains the main Parser struct and the `parse` entry point.
//! Expressions are parsed with a Pratt parser driven by NUD/LED handlers;
//! top-level definitions are parsed by the functions in `definitions`.
//!
//! It maintains lookup tables for:
//! - NUD (null denotation) handlers for prefix expressions
//! - LED (left denotation) handlers for infix expressions
//! - Binding powers for operator precedence

use std::{collections::HashMap, rc::Rc};

use crate::{
    ast::ast::Program,
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::{Token, TokenKind},
    Position,
};

use super::{
    definitions::{parse_function_def, parse_protocol_def, parse_type_def},
    expr::parse_expr,
    lookups::{create_token_lookups, BPLookup, BindingPower, LEDHandler, LEDLookup, NUDHandler, NUDLookup},
};

/// The main parser structure that maintains parsing state.
///
/// This struct holds the token stream and the lookup tables for parsing
/// expressions. It tracks the current position in the token stream and
/// provides methods for token consumption.
pub struct Parser {
    /// The list of tokens to parse, always terminated by `EOF`
    tokens: Vec<Token>,
    /// Current position in the token stream
    pos: usize,
    /// Lookup table for null denotation (prefix) expression handlers
    nud_lookup: NUDLookup,
    /// Lookup table for left denotation (infix) expression handlers
    led_lookup: LEDLookup,
    /// Lookup table for expression binding powers (precedence)
    binding_power_lookup: BPLookup,
    /// Stand-in returned once the stream is exhausted
    eof: Token,
}

impl Parser {
    /// Creates a new Parser instance.
    ///
    /// # Arguments
    ///
    /// * `tokens` - Vector of tokens to parse
    /// * `file` - Reference-counted string containing the source file name
    pub fn new(tokens: Vec<Token>, file: Rc<String>) -> Self {
        let end = tokens
            .last()
            .map(|token| token.span.end.clone())
            .unwrap_or_else(|| Position(0, Rc::clone(&file)));

        Parser {
            tokens,
            pos: 0,
            eof: Token {
                kind: TokenKind::EOF,
                value: String::from("EOF"),
                span: crate::Span { start: end.clone(), end },
            },
            nud_lookup: HashMap::new(),
            led_lookup: HashMap::new(),
            binding_power_lookup: HashMap::new(),
        }
    }

    /// Returns the current token without advancing.
    pub fn current_token(&self) -> &Token {
        self.tokens.get(self.pos).unwrap_or(&self.eof)
    }

    /// Returns the kind of the current token.
    pub fn current_token_kind(&self) -> TokenKind {
        self.current_token().kind
    }

    /// Advances to the next token and returns the previous token.
    pub fn advance(&mut self) -> Token {
        let token = self.current_token().clone();
        if self.pos < self.tokens.len() {
            self.pos += 1;
        }
        token
    }

    /// Expects a token of the specified kind, with optional custom error.
    ///
    /// Returns the consumed token if the current token matches, otherwise
    /// `error` or a default `UnexpectedToken` error.
    pub fn expect_error(&mut self, expected_kind: TokenKind, error: Option<Error>) -> Result<Token, Error> {
        let token = self.current_token();
        if token.kind != expected_kind {
            match error {
                Some(error) => Err(error),
                None => Err(Error::new(
                    ErrorImpl::UnexpectedToken {
                        token: token.value.clone(),
                    },
                    token.span.start.clone(),
                )),
            }
        } else {
            Ok(self.advance())
        }
    }

    /// Expects a token of the specified kind with default error message.
    pub fn expect(&mut self, expected_kind: TokenKind) -> Result<Token, Error> {
        self.expect_error(expected_kind, None)
    }

    /// Consumes the current token if it is of the given kind.
    pub fn eat(&mut self, kind: TokenKind) -> bool {
        if self.current_token_kind() == kind {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Checks if there are more tokens to parse.
    pub fn has_tokens(&self) -> bool {
        self.current_token_kind() != TokenKind::EOF
    }

    pub fn get_nud(&self, kind: TokenKind) -> Option<NUDHandler> {
        self.nud_lookup.get(&kind).copied()
    }

    pub fn get_led(&self, kind: TokenKind) -> Option<LEDHandler> {
        self.led_lookup.get(&kind).copied()
    }

    /// Binding power of `kind`, `Default` for tokens that end an expression.
    pub fn get_bp(&self, kind: TokenKind) -> BindingPower {
        self.binding_power_lookup
            .get(&kind)
            .copied()
            .unwrap_or(BindingPower::Default)
    }

    /// Registers a left denotation (infix) handler for a token.
    pub fn led(&mut self, kind: TokenKind, binding_power: BindingPower, led_fn: LEDHandler) {
        self.binding_power_lookup.insert(kind, binding_power);
        self.led_lookup.insert(kind, led_fn);
    }

    /// Registers a null denotation (prefix) handler for a token.
    ///
    /// Tokens that also have an infix meaning keep their infix binding power.
    pub fn nud(&mut self, kind: TokenKind, nud_fn: NUDHandler) {
        self.nud_lookup.insert(kind, nud_fn);
    }

    /// Returns the start position of the current token.
    pub fn get_position(&self) -> Position {
        self.current_token().span.start.clone()
    }

    /// Builds an `UnexpectedTokenDetailed` error at the current token.
    pub fn unexpected(&self, message: &str) -> Error {
        Error::new(
            ErrorImpl::UnexpectedTokenDetailed {
                token: self.current_token().value.clone(),
                message: String::from(message),
            },
            self.get_position(),
        )
    }
}

/// Parses a stream of tokens into a Program.
///
/// Function, type and protocol definitions may appear in any order; at most
/// one global expression is accepted, optionally followed by `;`. A missing
/// global expression is not a syntax error, the semantic checker reports it.
#[tracing::instrument(level = "debug", skip_all, fields(file = %file))]
pub fn parse(tokens: Vec<Token>, file: Rc<String>) -> Result<Program, Error> {
    let mut parser = Parser::new(tokens, file);
    create_token_lookups(&mut parser);

    let mut program = Program::default();

    while parser.has_tokens() {
        match parser.current_token_kind() {
            TokenKind::Function => program.functions.push(parse_function_def(&mut parser)?),
            TokenKind::Type => program.types.push(parse_type_def(&mut parser)?),
            TokenKind::Protocol => program.protocols.push(parse_protocol_def(&mut parser)?),
            TokenKind::Semicolon => {
                parser.advance();
            }
            _ => {
                if program.global_exp.is_some() {
                    return Err(parser.unexpected("only one global expression is allowed"));
                }
                program.global_exp = Some(parse_expr(&mut parser, BindingPower::Default)?);
            }
        }
    }

    tracing::debug!(
        functions = program.functions.len(),
        types = program.types.len(),
        protocols = program.protocols.len(),
        "parsed program"
    );

    Ok(program)
}
