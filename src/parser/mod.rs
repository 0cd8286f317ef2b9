//! Parser module for building an Abstract Syntax Tree (AST).
//!
//! This module contains the parser that transforms a stream of tokens
//! into a `Program`. It uses a Pratt parser for expressions with proper
//! operator precedence and handles:
//!
//! - Function, type and protocol definitions
//! - Expression parsing (binary ops, calls, member access, literals)
//! - Binding and control-flow expressions (`let`, `if`, `while`, `for`)
//!
//! The parser uses NUD (null denotation) and LED (left denotation) functions
//! for expression parsing with binding power for precedence handling.

pub mod definitions;
pub mod expr;
pub mod lookups;
pub mod parser;

#[cfg(test)]
mod tests;
