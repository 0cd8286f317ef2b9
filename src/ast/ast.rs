use crate::Span;

use super::expressions::Expr;

/// Function signature key: `name/arity`.
pub fn signature(name: &str, arity: usize) -> String {
    format!("{}/{}", name, arity)
}

/// A declared parameter with its optional type annotation.
#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    pub name: String,
    pub annotation: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDef {
    pub name: String,
    pub params: Vec<Param>,
    pub return_annotation: Option<String>,
    pub body: Expr,
    pub span: Span,
}

impl FunctionDef {
    pub fn signature(&self) -> String {
        signature(&self.name, self.params.len())
    }
}

/// `inherits Parent(args)` clause of a type.
#[derive(Debug, Clone, PartialEq)]
pub struct Inherits {
    pub name: String,
    pub args: Vec<Expr>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Attribute {
    pub name: String,
    pub annotation: Option<String>,
    pub value: Expr,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Method {
    pub name: String,
    pub params: Vec<Param>,
    pub return_annotation: Option<String>,
    pub body: Expr,
}

impl Method {
    pub fn signature(&self) -> String {
        signature(&self.name, self.params.len())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypeDef {
    pub name: String,
    /// Constructor parameters. Holds only the declared ones until parameter
    /// propagation prepends the inherited ones.
    pub params: Vec<Param>,
    pub declared_param_count: usize,
    pub inherits: Option<Inherits>,
    pub attributes: Vec<Attribute>,
    pub methods: Vec<Method>,
    pub span: Span,
}

impl TypeDef {
    pub fn find_method(&self, signature: &str) -> Option<&Method> {
        self.methods.iter().find(|method| method.signature() == signature)
    }

    /// The parameters this type declares itself, without inherited ones.
    pub fn declared_params(&self) -> &[Param] {
        &self.params[self.params.len().saturating_sub(self.declared_param_count)..]
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MethodSignature {
    pub name: String,
    pub params: Vec<Param>,
    pub return_annotation: Option<String>,
}

impl MethodSignature {
    pub fn signature(&self) -> String {
        signature(&self.name, self.params.len())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Protocol {
    pub name: String,
    pub extends: Option<String>,
    pub methods: Vec<MethodSignature>,
    pub span: Span,
}

/// Root of a parsed compilation unit.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Program {
    pub functions: Vec<FunctionDef>,
    pub types: Vec<TypeDef>,
    pub protocols: Vec<Protocol>,
    pub global_exp: Option<Expr>,
}
