//! Lexical scopes for the reference checker.

use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Binding {
    /// Statically known class of the bound value, when one can be inferred
    pub class: Option<String>,
}

impl Binding {
    pub fn of_class(class: Option<String>) -> Self {
        Binding { class }
    }
}

/// A frame of variable bindings linked to its enclosing frame.
///
/// Frames are immutable once handed out as a parent, so sibling
/// expressions never observe each other's bindings.
#[derive(Debug, Clone)]
pub struct Scope<'a> {
    /// Variables defined in this frame
    bindings: HashMap<String, Binding>,
    /// Enclosing frame (None for a root)
    parent: Option<&'a Scope<'a>>,
}

impl<'a> Scope<'a> {
    pub fn root() -> Self {
        Scope {
            bindings: HashMap::new(),
            parent: None,
        }
    }

    pub fn child(&'a self) -> Scope<'a> {
        Scope {
            bindings: HashMap::new(),
            parent: Some(self),
        }
    }

    /// Child frame holding a single binding.
    pub fn extend(&'a self, name: &str, binding: Binding) -> Scope<'a> {
        let mut scope = self.child();
        scope.define(name, binding);
        scope
    }

    pub fn define(&mut self, name: &str, binding: Binding) {
        self.bindings.insert(name.to_string(), binding);
    }

    pub fn lookup(&self, name: &str) -> Option<&Binding> {
        match self.bindings.get(name) {
            Some(binding) => Some(binding),
            None => self.parent.and_then(|parent| parent.lookup(name)),
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.lookup(name).is_some()
    }
}
