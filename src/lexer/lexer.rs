use std::rc::Rc;

use lazy_static::lazy_static;
use regex::Regex;

use crate::{errors::errors::{Error, ErrorImpl}, Position, Span, MK_DEFAULT_HANDLER, MK_SPAN, MK_TOKEN};

use super::tokens::{Token, TokenKind, RESERVED_LOOKUP};

pub type RegexHandler = fn(&mut Lexer, &str) -> Result<(), Error>;

pub struct RegexPattern {
    regex: Regex,
    handler: RegexHandler,
}

impl RegexPattern {
    fn new(pattern: &str, handler: RegexHandler) -> Self {
        RegexPattern {
            regex: Regex::new(&format!("^(?:{})", pattern)).expect("token patterns are valid regexes"),
            handler,
        }
    }
}

lazy_static! {
    // Order matters: longer operators must come before their prefixes.
    static ref PATTERNS: Vec<RegexPattern> = vec![
        RegexPattern::new("[a-zA-Z_][a-zA-Z0-9_]*", symbol_handler),
        RegexPattern::new("[0-9]+(\\.[0-9]+)?", number_handler),
        RegexPattern::new("\\s+", skip_handler),
        RegexPattern::new("\"(?:[^\"\\\\]|\\\\.)*\"", string_handler),
        RegexPattern::new("\"", unterminated_string_handler),
        RegexPattern::new("//[^\\n]*", skip_handler),
        RegexPattern::new("\\[", MK_DEFAULT_HANDLER!(TokenKind::OpenBracket)),
        RegexPattern::new("\\]", MK_DEFAULT_HANDLER!(TokenKind::CloseBracket)),
        RegexPattern::new("\\{", MK_DEFAULT_HANDLER!(TokenKind::OpenCurly)),
        RegexPattern::new("\\}", MK_DEFAULT_HANDLER!(TokenKind::CloseCurly)),
        RegexPattern::new("\\(", MK_DEFAULT_HANDLER!(TokenKind::OpenParen)),
        RegexPattern::new("\\)", MK_DEFAULT_HANDLER!(TokenKind::CloseParen)),
        RegexPattern::new("=>", MK_DEFAULT_HANDLER!(TokenKind::Arrow)),
        RegexPattern::new(":=", MK_DEFAULT_HANDLER!(TokenKind::DestructiveAssignment)),
        RegexPattern::new("==", MK_DEFAULT_HANDLER!(TokenKind::Equals)),
        RegexPattern::new("!=", MK_DEFAULT_HANDLER!(TokenKind::NotEquals)),
        RegexPattern::new("!", MK_DEFAULT_HANDLER!(TokenKind::Not)),
        RegexPattern::new("=", MK_DEFAULT_HANDLER!(TokenKind::Assignment)),
        RegexPattern::new("<=", MK_DEFAULT_HANDLER!(TokenKind::LessEquals)),
        RegexPattern::new("<", MK_DEFAULT_HANDLER!(TokenKind::Less)),
        RegexPattern::new(">=", MK_DEFAULT_HANDLER!(TokenKind::GreaterEquals)),
        RegexPattern::new(">", MK_DEFAULT_HANDLER!(TokenKind::Greater)),
        RegexPattern::new("\\|\\|", MK_DEFAULT_HANDLER!(TokenKind::DoubleOr)),
        RegexPattern::new("\\|", MK_DEFAULT_HANDLER!(TokenKind::Or)),
        RegexPattern::new("&&", MK_DEFAULT_HANDLER!(TokenKind::DoubleAnd)),
        RegexPattern::new("&", MK_DEFAULT_HANDLER!(TokenKind::And)),
        RegexPattern::new("@@", MK_DEFAULT_HANDLER!(TokenKind::DoubleAt)),
        RegexPattern::new("@", MK_DEFAULT_HANDLER!(TokenKind::At)),
        RegexPattern::new("\\.", MK_DEFAULT_HANDLER!(TokenKind::Dot)),
        RegexPattern::new(";", MK_DEFAULT_HANDLER!(TokenKind::Semicolon)),
        RegexPattern::new(":", MK_DEFAULT_HANDLER!(TokenKind::Colon)),
        RegexPattern::new(",", MK_DEFAULT_HANDLER!(TokenKind::Comma)),
        RegexPattern::new("\\+", MK_DEFAULT_HANDLER!(TokenKind::Plus)),
        RegexPattern::new("-", MK_DEFAULT_HANDLER!(TokenKind::Dash)),
        RegexPattern::new("/", MK_DEFAULT_HANDLER!(TokenKind::Slash)),
        RegexPattern::new("\\*", MK_DEFAULT_HANDLER!(TokenKind::Star)),
        RegexPattern::new("%", MK_DEFAULT_HANDLER!(TokenKind::Percent)),
        RegexPattern::new("\\^", MK_DEFAULT_HANDLER!(TokenKind::Caret)),
    ];
}

pub struct Lexer {
    tokens: Vec<Token>,
    source: String,
    pos: usize,
    file: Rc<String>,
}

impl Lexer {
    pub fn new(source: String, file: Option<String>) -> Lexer {
        let file_name = if let Some(file) = file {
            Rc::new(file)
        } else {
            Rc::new(String::from("shell"))
        };

        Lexer {
            pos: 0,
            tokens: vec![],
            source,
            file: file_name,
        }
    }

    pub fn advance_n(&mut self, n: usize) {
        self.pos += n;
    }

    pub fn push(&mut self, token: Token) {
        self.tokens.push(token);
    }

    pub fn at(&self) -> Option<char> {
        self.remainder().chars().next()
    }

    pub fn remainder(&self) -> &str {
        &self.source[self.pos..]
    }

    pub fn at_eof(&self) -> bool {
        self.pos >= self.source.len()
    }

    fn position(&self) -> Position {
        Position(self.pos as u32, Rc::clone(&self.file))
    }
}

fn number_handler(lexer: &mut Lexer, matched: &str) -> Result<(), Error> {
    lexer.push(MK_TOKEN!(TokenKind::Number, matched.to_string(), MK_SPAN!(lexer, matched.len())));
    lexer.advance_n(matched.len());
    Ok(())
}

fn skip_handler(lexer: &mut Lexer, matched: &str) -> Result<(), Error> {
    lexer.advance_n(matched.len());
    Ok(())
}

fn unterminated_string_handler(lexer: &mut Lexer, _matched: &str) -> Result<(), Error> {
    Err(Error::new(ErrorImpl::UnterminatedString, lexer.position()))
}

fn string_handler(lexer: &mut Lexer, matched: &str) -> Result<(), Error> {
    let string_literal = &matched[1..matched.len() - 1];

    let mut result = String::new();
    let mut chars = string_literal.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '\\' {
            if let Some(next_ch) = chars.peek() {
                match next_ch {
                    'n' => {
                        result.push('\n');
                        chars.next();
                    }
                    't' => {
                        result.push('\t');
                        chars.next();
                    }
                    '\\' => {
                        result.push('\\');
                        chars.next();
                    }
                    'r' => {
                        result.push('\r');
                        chars.next();
                    }
                    '"' => {
                        result.push('"');
                        chars.next();
                    }
                    '0' => {
                        result.push('\0');
                        chars.next();
                    }
                    'x' => {
                        let mut hex = String::new();
                        chars.next();

                        while hex.len() < 2 {
                            match chars.peek() {
                                Some(ch) if ch.is_ascii_hexdigit() => {
                                    hex.push(*ch);
                                    chars.next();
                                }
                                _ => break,
                            }
                        }

                        match u8::from_str_radix(&hex, 16) {
                            Ok(byte) => result.push(byte as char),
                            // Not a valid escape, keep it verbatim
                            Err(_) => {
                                result.push_str("\\x");
                                result.push_str(&hex);
                            }
                        }
                    }
                    _ => {
                        result.push(ch); // Keep the backslash
                    }
                }
            } else {
                result.push(ch); // Keep the lone backslash
            }
        } else {
            result.push(ch);
        }
    }

    lexer.push(MK_TOKEN!(TokenKind::String, result, MK_SPAN!(lexer, matched.len())));
    lexer.advance_n(matched.len());
    Ok(())
}

fn symbol_handler(lexer: &mut Lexer, matched: &str) -> Result<(), Error> {
    let kind = RESERVED_LOOKUP.get(matched).copied().unwrap_or(TokenKind::Identifier);

    lexer.push(MK_TOKEN!(kind, String::from(matched), MK_SPAN!(lexer, matched.len())));
    lexer.advance_n(matched.len());
    Ok(())
}

/// Splits `source` into tokens, terminated by a single `EOF` token.
#[tracing::instrument(level = "debug", skip(source))]
pub fn tokenize(source: String, file: Option<String>) -> Result<Vec<Token>, Error> {
    let mut lex = Lexer::new(source, file);

    while !lex.at_eof() {
        let found = PATTERNS.iter().find_map(|pattern| {
            pattern
                .regex
                .find(lex.remainder())
                .map(|matched| (pattern.handler, matched.as_str().to_string()))
        });

        match found {
            Some((handler, matched)) => handler(&mut lex, &matched)?,
            None => {
                let token = lex.at().map(String::from).unwrap_or_default();
                return Err(Error::new(ErrorImpl::UnrecognisedToken { token }, lex.position()));
            }
        }
    }

    lex.push(MK_TOKEN!(TokenKind::EOF, String::from("EOF"), MK_SPAN!(lex, 0)));
    tracing::debug!(count = lex.tokens.len(), "tokenized source");
    Ok(lex.tokens)
}
