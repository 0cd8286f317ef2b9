//! Utility macros for the front end.
//!
//! - `MK_TOKEN!` - Creates a Token instance
//! - `MK_SPAN!` - Creates a Span covering `len` bytes from the lexer position
//! - `MK_DEFAULT_HANDLER!` - Creates a default lexer handler for simple tokens
//!
//! These macros reduce boilerplate in the lexer implementation.

/// Creates a Token instance.
///
/// # Example
///
/// ```ignore
/// let token = MK_TOKEN!(TokenKind::Number, "42".to_string(), span);
/// ```
#[macro_export]
macro_rules! MK_TOKEN {
    ($kind:expr, $value:expr, $span:expr) => {
        Token {
            kind: $kind,
            value: $value,
            span: $span,
        }
    };
}

/// Creates a Span starting at the lexer's current position.
///
/// # Arguments
///
/// * `$lexer` - The lexer, read for its position and file name
/// * `$len` - Length of the span in bytes
#[macro_export]
macro_rules! MK_SPAN {
    ($lexer:expr, $len:expr) => {
        Span {
            start: Position($lexer.pos as u32, Rc::clone(&$lexer.file)),
            end: Position(($lexer.pos + $len) as u32, Rc::clone(&$lexer.file)),
        }
    };
}

/// Creates a default lexer handler for simple single-token patterns.
///
/// Generates a handler function that creates a token with the given kind
/// and advances the lexer position past the matched text.
///
/// # Example
///
/// ```ignore
/// RegexPattern {
///     regex: Regex::new("^\\+").unwrap(),
///     handler: MK_DEFAULT_HANDLER!(TokenKind::Plus),
/// }
/// ```
#[macro_export]
macro_rules! MK_DEFAULT_HANDLER {
    ($kind:expr) => {
        |lexer: &mut Lexer, matched: &str| -> Result<(), Error> {
            lexer.push(MK_TOKEN!($kind, String::from(matched), MK_SPAN!(lexer, matched.len())));
            lexer.advance_n(matched.len());
            Ok(())
        }
    };
}
