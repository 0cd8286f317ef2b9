//! Semantic analysis of a parsed HULK program.
//!
//! The check runs in stages over a single `Program`, each one returning its
//! diagnostics instead of stopping at the first problem:
//!
//! 1. `definitions`: global table of functions (by `name/arity`), types,
//!    protocols and the primitive aliases.
//! 2. `hierarchy`: the single-inheritance tree rooted at `Object`, with depth
//!    assignment, cycle detection and a connectivity check.
//! 3. `propagation`: inherited constructor parameters are prepended to each
//!    type's own.
//! 4. `visitor`: name resolution over every body with lexical `scope`s.
//!
//! `semantic_checker::semantic_check` runs the whole pipeline.

pub mod definitions;
pub mod hierarchy;
pub mod propagation;
pub mod scope;
pub mod semantic_checker;
pub mod visitor;

#[cfg(test)]
mod tests;
