/// AST (Abstract Syntax Tree) module
/// Contains all definitions related to the AST structure
///
/// Submodules:
/// - ast: Program and top-level definitions (functions, types, protocols)
/// - expressions: The closed expression enum and its helpers
pub mod ast;
pub mod expressions;
