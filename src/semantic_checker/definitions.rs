use std::collections::HashMap;

use crate::{
    ast::ast::{FunctionDef, Program, TypeDef},
    errors::diagnostics::SemanticError,
};

/// Name of the hierarchy root. Reserved, never stored as a definition.
pub const OBJECT: &str = "Object";

/// Built-in value kinds. They are aliases, not user-definable types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    Number,
    String,
    Boolean,
}

impl PrimitiveKind {
    pub const ALL: [PrimitiveKind; 3] = [PrimitiveKind::Number, PrimitiveKind::String, PrimitiveKind::Boolean];

    pub fn name(&self) -> &'static str {
        match self {
            PrimitiveKind::Number => "Number",
            PrimitiveKind::String => "String",
            PrimitiveKind::Boolean => "Boolean",
        }
    }
}

/// Entry of the global definition table.
///
/// User definitions are stored as indices into the owning `Program`'s
/// `functions`, `types` and `protocols` vectors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Definition {
    Primitive(PrimitiveKind),
    Function(usize),
    Type(usize),
    Protocol(usize),
}

/// Flat table from qualified name to definition.
///
/// Functions are keyed by `name/arity`, types and protocols by plain name.
#[derive(Debug, Clone, Default)]
pub struct GlobalDefinitions {
    definitions: HashMap<String, Definition>,
}

impl GlobalDefinitions {
    pub fn get(&self, key: &str) -> Option<Definition> {
        self.definitions.get(key).copied()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.definitions.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    /// Inserts `definition` unless `key` is taken. Returns whether it was installed.
    fn install(&mut self, key: String, definition: Definition) -> bool {
        if self.definitions.contains_key(&key) {
            false
        } else {
            self.definitions.insert(key, definition);
            true
        }
    }

    pub fn function<'p>(&self, program: &'p Program, signature: &str) -> Option<&'p FunctionDef> {
        match self.get(signature)? {
            Definition::Function(index) => program.functions.get(index),
            _ => None,
        }
    }

    pub fn type_def<'p>(&self, program: &'p Program, name: &str) -> Option<&'p TypeDef> {
        match self.get(name)? {
            Definition::Type(index) => program.types.get(index),
            _ => None,
        }
    }

    /// Index of the installed type named `name`, if any.
    pub fn type_index(&self, name: &str) -> Option<usize> {
        match self.get(name)? {
            Definition::Type(index) => Some(index),
            _ => None,
        }
    }

    /// Indices of installed types, in declaration order.
    pub fn installed_types(&self, program: &Program) -> Vec<usize> {
        (0..program.types.len())
            .filter(|index| self.get(&program.types[*index].name) == Some(Definition::Type(*index)))
            .collect()
    }

    /// Indices of installed functions, in declaration order.
    pub fn installed_functions(&self, program: &Program) -> Vec<usize> {
        (0..program.functions.len())
            .filter(|index| self.get(&program.functions[*index].signature()) == Some(Definition::Function(*index)))
            .collect()
    }
}

/// Builds the global definition table for `program`.
///
/// Primitive aliases go in first. On a duplicate key the first definition
/// stays installed and a diagnostic is recorded for the later one.
#[tracing::instrument(level = "debug", skip_all)]
pub fn collect_global_definitions(program: &Program) -> (GlobalDefinitions, Vec<SemanticError>) {
    let mut definitions = GlobalDefinitions::default();
    let mut errors = Vec::new();

    for kind in PrimitiveKind::ALL {
        definitions.install(kind.name().to_string(), Definition::Primitive(kind));
    }

    for (index, function) in program.functions.iter().enumerate() {
        let signature = function.signature();
        if !definitions.install(signature.clone(), Definition::Function(index)) {
            tracing::debug!(%signature, "duplicate function");
            errors.push(SemanticError::DuplicateFunction { signature });
        }
    }

    let types = program
        .types
        .iter()
        .enumerate()
        .map(|(index, type_def)| (&type_def.name, Definition::Type(index)));
    let protocols = program
        .protocols
        .iter()
        .enumerate()
        .map(|(index, protocol)| (&protocol.name, Definition::Protocol(index)));

    for (name, definition) in types.chain(protocols) {
        if name == OBJECT || !definitions.install(name.clone(), definition) {
            tracing::debug!(%name, "duplicate type");
            errors.push(SemanticError::DuplicateType { name: name.clone() });
        }
    }

    tracing::debug!(count = definitions.len(), "collected global definitions");
    (definitions, errors)
}
