//! Error types and error handling for the front end.
//!
//! Two families of errors live here:
//!
//! - `errors`: syntax errors raised by the lexer and parser. They carry a
//!   source position, abort the current phase and are propagated with `?`.
//! - `diagnostics`: semantic diagnostics produced by the checker. They are
//!   accumulated and reported together once analysis finishes.

pub mod diagnostics;
pub mod errors;
