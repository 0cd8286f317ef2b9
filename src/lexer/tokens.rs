use lazy_static::lazy_static;
use std::{collections::HashMap, fmt::Display};

use crate::Span;

lazy_static! {
    pub static ref RESERVED_LOOKUP: HashMap<&'static str, TokenKind> = {
        let mut map = HashMap::new();
        map.insert("function", TokenKind::Function);
        map.insert("type", TokenKind::Type);
        map.insert("inherits", TokenKind::Inherits);
        map.insert("protocol", TokenKind::Protocol);
        map.insert("extends", TokenKind::Extends);
        map.insert("new", TokenKind::New);
        map.insert("let", TokenKind::Let);
        map.insert("in", TokenKind::In);
        map.insert("if", TokenKind::If);
        map.insert("elif", TokenKind::Elif);
        map.insert("else", TokenKind::Else);
        map.insert("while", TokenKind::While);
        map.insert("for", TokenKind::For);
        map.insert("true", TokenKind::True);
        map.insert("false", TokenKind::False);
        map.insert("print", TokenKind::Print);
        map.insert("sqrt", TokenKind::Sqrt);
        map.insert("sin", TokenKind::Sin);
        map.insert("cos", TokenKind::Cos);
        map.insert("exp", TokenKind::Exp);
        map.insert("log", TokenKind::Log);
        map.insert("rand", TokenKind::Rand);
        map.insert("PI", TokenKind::Pi);
        map.insert("E", TokenKind::E);
        map
    };
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum TokenKind {
    EOF,
    Number,
    String,
    Identifier,

    OpenBracket,
    CloseBracket,
    OpenCurly,
    CloseCurly,
    OpenParen,
    CloseParen,

    Assignment,            // =
    DestructiveAssignment, // :=
    Equals,                // ==
    Not,                   // !
    NotEquals,             // !=

    Less,
    LessEquals,
    Greater,
    GreaterEquals,

    Or,  // |
    And, // &
    DoubleOr,
    DoubleAnd,

    Dot,
    Semicolon,
    Colon,
    Comma,
    Arrow, // =>

    Plus,
    Dash,
    Slash,
    Star,
    Percent,
    Caret,
    At,       // @
    DoubleAt, // @@

    // Reserved
    Function,
    Type,
    Inherits,
    Protocol,
    Extends,
    New,
    Let,
    In,
    If,
    Elif,
    Else,
    While,
    For,
    True,
    False,
    Print,
    Sqrt,
    Sin,
    Cos,
    Exp,
    Log,
    Rand,
    Pi,
    E,
}

impl Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

#[derive(Debug, Clone)]
pub struct Token {
    pub kind: TokenKind,
    pub value: String,
    pub span: Span,
}

impl Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_one_of_many(&[TokenKind::String, TokenKind::Identifier, TokenKind::Number]) {
            write!(f, "{} ({})", self.kind, self.value)
        } else {
            write!(f, "{}", self.kind)
        }
    }
}

impl Token {
    fn is_one_of_many(&self, tokens: &[TokenKind]) -> bool {
        tokens.contains(&self.kind)
    }
}
