use crate::{
    ast::{
        ast::{signature, Param, Program},
        expressions::{Assign, BinaryOperator, Expr, Params},
    },
    errors::diagnostics::SemanticError,
};

use super::{
    definitions::{Definition, GlobalDefinitions, OBJECT},
    hierarchy::Hierarchy,
    scope::{Binding, Scope},
};

/// Walks every body of a program resolving names against lexical scope and
/// the global definitions.
pub struct ReferenceChecker<'p> {
    program: &'p Program,
    definitions: &'p GlobalDefinitions,
    hierarchy: &'p Hierarchy,
    errors: Vec<SemanticError>,
}

impl<'p> ReferenceChecker<'p> {
    pub fn new(program: &'p Program, definitions: &'p GlobalDefinitions, hierarchy: &'p Hierarchy) -> Self {
        ReferenceChecker {
            program,
            definitions,
            hierarchy,
            errors: Vec::new(),
        }
    }

    pub fn into_errors(self) -> Vec<SemanticError> {
        self.errors
    }

    /// Checks installed functions, installed types and then the global
    /// expression. Without a global expression nothing is visited.
    pub fn check_program(&mut self) {
        let program = self.program;

        let Some(global) = &program.global_exp else {
            self.errors.push(SemanticError::MissingGlobalExpression);
            return;
        };

        for index in self.definitions.installed_functions(program) {
            let function = &program.functions[index];
            let scope = self.param_scope(&function.params);
            self.visit(&function.body, &scope);
        }

        for index in self.definitions.installed_types(program) {
            self.check_type(index);
        }

        self.visit(global, &Scope::root());
    }

    fn check_type(&mut self, index: usize) {
        let program = self.program;
        let type_def = &program.types[index];

        // Constructor parameters are visible to the parent arguments and
        // attribute initializers only.
        let constructor = self.param_scope(&type_def.params);
        if let Some(inherits) = &type_def.inherits {
            for arg in &inherits.args {
                self.visit(arg, &constructor);
            }
        }
        for attribute in &type_def.attributes {
            self.visit(&attribute.value, &constructor);
        }

        for method in &type_def.methods {
            let mut scope = Scope::root();
            scope.define("self", Binding::of_class(Some(type_def.name.clone())));
            for param in &method.params {
                scope.define(&param.name, Binding::of_class(self.annotated_class(param.annotation.as_deref())));
            }
            self.visit(&method.body, &scope);
        }
    }

    fn param_scope(&self, params: &[Param]) -> Scope<'static> {
        let mut scope = Scope::root();
        for param in params {
            scope.define(&param.name, Binding::of_class(self.annotated_class(param.annotation.as_deref())));
        }
        scope
    }

    pub fn visit(&mut self, expr: &Expr, scope: &Scope<'_>) {
        match expr {
            Expr::Number(_) | Expr::Str(_) | Expr::Bool(_) | Expr::Pi | Expr::E | Expr::Rand => {}

            Expr::Id(name) => {
                if !scope.contains(name) {
                    self.errors.push(SemanticError::UndefinedVariable { name: name.clone() });
                }
            }

            Expr::BinOp {
                left,
                op: BinaryOperator::Member,
                right,
            } => self.visit_member(left, right, scope),
            Expr::BinOp { left, right, .. } => {
                self.visit(left, scope);
                self.visit(right, scope);
            }
            Expr::UnaryOp { operand, .. } => self.visit(operand, scope),

            Expr::Print(arg) | Expr::Sqrt(arg) | Expr::Sin(arg) | Expr::Cos(arg) | Expr::Exp(arg) => self.visit(arg, scope),
            Expr::Log { base, value } => {
                self.visit(base, scope);
                self.visit(value, scope);
            }

            Expr::If { cases, default } => {
                for case in cases {
                    self.visit(&case.condition, scope);
                    self.visit(&case.body, scope);
                }
                if let Some(default) = default {
                    self.visit(default, scope);
                }
            }
            Expr::While { condition, body } => {
                self.visit(condition, scope);
                self.visit(body, scope);
            }
            Expr::For {
                variable,
                iterable,
                body,
            } => {
                self.visit(iterable, scope);
                let inner = scope.extend(variable, Binding::default());
                self.visit(body, &inner);
            }

            Expr::Block(expressions) => {
                for expression in expressions {
                    self.visit(expression, scope);
                }
            }
            Expr::Let { binding, body } => {
                self.visit(&binding.value, scope);
                let class = self.binding_class(binding, scope);
                let inner = scope.extend(&binding.name, Binding::of_class(class));
                self.visit(body, &inner);
            }
            Expr::DestructiveAssign { target, value } => {
                self.visit(target, scope);
                self.visit(value, scope);
            }

            Expr::FunctionCall { name, params } => {
                let signature = signature(name, params.len());
                if !matches!(self.definitions.get(&signature), Some(Definition::Function(_))) {
                    self.errors.push(SemanticError::UndefinedFunction { signature });
                }
                self.visit_params(params, scope);
            }
            Expr::TypeCall { name, params } => self.visit_instantiation(name, params, scope),

            Expr::VectorExt(items) => {
                for item in items {
                    self.visit(item, scope);
                }
            }
            Expr::VectorInt {
                expr,
                variable,
                iterable,
            } => {
                self.visit(iterable, scope);
                let inner = scope.extend(variable, Binding::default());
                self.visit(expr, &inner);
            }
            Expr::VectorCall { vector, index } => {
                self.visit(vector, scope);
                self.visit(index, scope);
            }
        }
    }

    fn visit_params(&mut self, params: &Params, scope: &Scope<'_>) {
        for param in &params.param_list {
            self.visit(param, scope);
        }
    }

    fn visit_member(&mut self, left: &Expr, right: &Expr, scope: &Scope<'_>) {
        self.visit(left, scope);

        match right {
            Expr::FunctionCall { name, params } => {
                self.visit_params(params, scope);
                if let Some(class) = self.static_class(left, scope) {
                    self.check_method(&class, name, params.len());
                }
            }
            // Attribute access, resolved against the instance at runtime.
            Expr::Id(_) => {}
            other => self.visit(other, scope),
        }
    }

    fn visit_instantiation(&mut self, name: &str, params: &Params, scope: &Scope<'_>) {
        let expected = match self.definitions.get(name) {
            Some(Definition::Type(index)) => Some(self.program.types[index].params.len()),
            Some(Definition::Primitive(_)) | Some(Definition::Protocol(_)) => {
                self.errors.push(SemanticError::NotInstantiable { name: name.to_string() });
                None
            }
            None if name == OBJECT => Some(0),
            Some(Definition::Function(_)) | None => {
                self.errors.push(SemanticError::UndefinedType { name: name.to_string() });
                return;
            }
        };

        if let Some(expected) = expected {
            if expected != params.len() {
                self.errors.push(SemanticError::ArityMismatch {
                    type_name: name.to_string(),
                    expected,
                    received: params.len(),
                });
            }
        }

        self.visit_params(params, scope);
    }

    fn check_method(&mut self, class: &str, name: &str, arity: usize) {
        let signature = signature(name, arity);
        if self.find_method_owner(class, &signature).is_none() {
            self.errors.push(SemanticError::UndefinedMethod {
                type_name: class.to_string(),
                signature,
            });
        }
    }

    /// First type in `class`'s ancestry, itself included, defining `signature`.
    fn find_method_owner(&self, class: &str, signature: &str) -> Option<usize> {
        std::iter::once(class.to_string())
            .chain(self.hierarchy.ancestors(class))
            .filter_map(|name| self.definitions.type_index(&name))
            .find(|index| self.program.types[*index].find_method(signature).is_some())
    }

    /// Annotation kept only when it names a user type.
    fn annotated_class(&self, annotation: Option<&str>) -> Option<String> {
        annotation
            .filter(|name| self.definitions.type_index(name).is_some())
            .map(str::to_string)
    }

    fn binding_class(&self, binding: &Assign, scope: &Scope<'_>) -> Option<String> {
        self.annotated_class(binding.annotation.as_deref())
            .or_else(|| self.static_class(&binding.value, scope))
    }

    /// User type an expression is statically known to produce, if any.
    fn static_class(&self, expr: &Expr, scope: &Scope<'_>) -> Option<String> {
        match expr {
            Expr::TypeCall { name, .. } => self.definitions.type_index(name).map(|_| name.clone()),
            Expr::Id(name) => scope.lookup(name).and_then(|binding| binding.class.clone()),
            Expr::Block(expressions) => self.static_class(expressions.last()?, scope),
            Expr::Let { binding, body } => {
                let class = self.binding_class(binding, scope);
                let inner = scope.extend(&binding.name, Binding::of_class(class));
                self.static_class(body, &inner)
            }
            Expr::If { cases, default } => {
                let mut class = self.static_class(default.as_ref()?, scope)?;
                for case in cases {
                    let branch = self.static_class(&case.body, scope)?;
                    class = self.hierarchy.lowest_common_ancestor(&class, &branch)?;
                }
                self.definitions.type_index(&class).map(|_| class)
            }
            Expr::BinOp {
                left,
                op: BinaryOperator::Member,
                right,
            } => {
                let Expr::FunctionCall { name, params } = right.as_ref() else {
                    return None;
                };
                let class = self.static_class(left, scope)?;
                let signature = signature(name, params.len());
                let owner = self.find_method_owner(&class, &signature)?;
                let method = self.program.types[owner].find_method(&signature)?;
                self.annotated_class(method.return_annotation.as_deref())
            }
            Expr::FunctionCall { name, params } => {
                let function = self.definitions.function(self.program, &signature(name, params.len()))?;
                self.annotated_class(function.return_annotation.as_deref())
            }
            _ => None,
        }
    }
}

/// Runs the reference checker over `program` and returns its diagnostics.
#[tracing::instrument(level = "debug", skip_all)]
pub fn check_references(program: &Program, definitions: &GlobalDefinitions, hierarchy: &Hierarchy) -> Vec<SemanticError> {
    let mut checker = ReferenceChecker::new(program, definitions, hierarchy);
    checker.check_program();

    let errors = checker.into_errors();
    tracing::debug!(errors = errors.len(), "checked references");
    errors
}
