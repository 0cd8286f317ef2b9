use thiserror::Error;

/// A semantic diagnostic produced by the checker.
///
/// Diagnostics never abort analysis. Every stage appends to its own list and
/// the pipeline concatenates them in stage order.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SemanticError {
    #[error("Global Expression required")]
    MissingGlobalExpression,
    #[error("Function {signature} already defined")]
    DuplicateFunction { signature: String },
    #[error("Type {name} already defined")]
    DuplicateType { name: String },
    #[error("Type {type_name} cannot inherit from type {parent}")]
    InvalidInheritance { type_name: String, parent: String },
    #[error("Inheritance cycle involving types: {}", .types.join(", "))]
    HierarchyCycle { types: Vec<String> },
    #[error("Type {type_name} is reached more than once in the type hierarchy")]
    HierarchyRevisit { type_name: String },
    #[error("Types not connected to Object: {}", .types.join(", "))]
    HierarchyDisconnected { types: Vec<String> },
    #[error("Variable {name} not defined")]
    UndefinedVariable { name: String },
    #[error("Function {signature} not defined")]
    UndefinedFunction { signature: String },
    #[error("Type {name} not defined")]
    UndefinedType { name: String },
    #[error("Method {signature} not defined in type {type_name}")]
    UndefinedMethod { type_name: String, signature: String },
    #[error("Type {name} cannot be instantiated")]
    NotInstantiable { name: String },
    #[error(
        "Amount of params doesn't match type definition of {type_name} ({expected}) and its instantiation ({received})"
    )]
    ArityMismatch {
        type_name: String,
        expected: usize,
        received: usize,
    },
}

impl SemanticError {
    pub fn get_error_name(&self) -> &str {
        match self {
            SemanticError::MissingGlobalExpression => "MissingGlobalExpression",
            SemanticError::DuplicateFunction { .. } => "DuplicateFunction",
            SemanticError::DuplicateType { .. } => "DuplicateType",
            SemanticError::InvalidInheritance { .. } => "InvalidInheritance",
            SemanticError::HierarchyCycle { .. } => "HierarchyCycle",
            SemanticError::HierarchyRevisit { .. } => "HierarchyRevisit",
            SemanticError::HierarchyDisconnected { .. } => "HierarchyDisconnected",
            SemanticError::UndefinedVariable { .. } => "UndefinedVariable",
            SemanticError::UndefinedFunction { .. } => "UndefinedFunction",
            SemanticError::UndefinedType { .. } => "UndefinedType",
            SemanticError::UndefinedMethod { .. } => "UndefinedMethod",
            SemanticError::NotInstantiable { .. } => "NotInstantiable",
            SemanticError::ArityMismatch { .. } => "ArityMismatch",
        }
    }
}
