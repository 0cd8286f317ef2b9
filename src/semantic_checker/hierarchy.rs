use std::collections::{HashMap, HashSet, VecDeque};

use crate::{ast::ast::Program, errors::diagnostics::SemanticError};

use super::definitions::{Definition, GlobalDefinitions, PrimitiveKind, OBJECT};

#[derive(Debug, Clone, PartialEq)]
pub struct HierarchyNode {
    pub name: String,
    pub parent: Option<String>,
    pub children: Vec<String>,
    pub depth: usize,
}

impl HierarchyNode {
    pub(super) fn new(name: &str) -> Self {
        HierarchyNode {
            name: name.to_string(),
            parent: None,
            children: Vec::new(),
            depth: 0,
        }
    }
}

/// Single-inheritance type tree rooted at `Object`.
///
/// Nodes are addressed by name. `order` keeps insertion order so traversals
/// and printed output are deterministic.
#[derive(Debug, Clone)]
pub struct Hierarchy {
    nodes: HashMap<String, HierarchyNode>,
    order: Vec<String>,
}

impl Hierarchy {
    /// `Object` plus the primitive aliases as its depth-1 children.
    pub fn with_builtins() -> Self {
        let mut hierarchy = Hierarchy {
            nodes: HashMap::new(),
            order: Vec::new(),
        };

        hierarchy.insert(HierarchyNode::new(OBJECT));
        for kind in PrimitiveKind::ALL {
            hierarchy.insert(HierarchyNode::new(kind.name()));
            hierarchy.link(OBJECT, kind.name());
            if let Some(node) = hierarchy.nodes.get_mut(kind.name()) {
                node.depth = 1;
            }
        }

        hierarchy
    }

    pub fn get(&self, name: &str) -> Option<&HierarchyNode> {
        self.nodes.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.nodes.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Node names in insertion order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    pub(super) fn insert(&mut self, node: HierarchyNode) {
        if !self.nodes.contains_key(&node.name) {
            self.order.push(node.name.clone());
        }
        self.nodes.insert(node.name.clone(), node);
    }

    pub(super) fn link(&mut self, parent: &str, child: &str) {
        if let Some(node) = self.nodes.get_mut(child) {
            node.parent = Some(parent.to_string());
        }
        if let Some(node) = self.nodes.get_mut(parent) {
            node.children.push(child.to_string());
        }
    }

    /// Ancestors of `name`, nearest first. Stops early on a looping chain.
    pub fn ancestors(&self, name: &str) -> Vec<String> {
        let mut ancestors = Vec::new();
        let mut seen = HashSet::from([name.to_string()]);
        let mut current = self.get(name).and_then(|node| node.parent.clone());

        while let Some(parent) = current {
            if !seen.insert(parent.clone()) {
                break;
            }
            current = self.get(&parent).and_then(|node| node.parent.clone());
            ancestors.push(parent);
        }

        ancestors
    }

    pub fn is_subtype(&self, name: &str, ancestor: &str) -> bool {
        name == ancestor || self.ancestors(name).iter().any(|parent| parent == ancestor)
    }

    /// Closest type both `a` and `b` conform to.
    pub fn lowest_common_ancestor(&self, a: &str, b: &str) -> Option<String> {
        if !self.contains(a) || !self.contains(b) {
            return None;
        }

        let mut chain = vec![a.to_string()];
        chain.extend(self.ancestors(a));

        chain.into_iter().find(|candidate| self.is_subtype(b, candidate))
    }

    /// Indented tree view from `Object`, one node per line.
    pub fn render(&self) -> String {
        let mut output = String::new();
        let mut stack = vec![(OBJECT, 0usize)];
        let mut seen = HashSet::new();

        while let Some((name, indent)) = stack.pop() {
            if !seen.insert(name) {
                continue;
            }
            let Some(node) = self.get(name) else {
                continue;
            };

            output.push_str(&format!("{}{}\n", "  ".repeat(indent), name));
            for child in node.children.iter().rev() {
                stack.push((child.as_str(), indent + 1));
            }
        }

        output
    }
}

/// Builds the type tree for every installed user type.
///
/// The result may be inconsistent; every problem found is returned as a
/// diagnostic rather than aborting.
#[tracing::instrument(level = "debug", skip_all)]
pub fn build_hierarchy(program: &Program, definitions: &GlobalDefinitions) -> (Hierarchy, Vec<SemanticError>) {
    let mut hierarchy = Hierarchy::with_builtins();
    let mut errors = Vec::new();

    let installed = definitions.installed_types(program);

    for index in &installed {
        hierarchy.insert(HierarchyNode::new(&program.types[*index].name));
    }

    for index in &installed {
        let type_def = &program.types[*index];

        let Some(inherits) = &type_def.inherits else {
            hierarchy.link(OBJECT, &type_def.name);
            continue;
        };

        if inherits.name == OBJECT {
            hierarchy.link(OBJECT, &type_def.name);
            continue;
        }

        match definitions.get(&inherits.name) {
            Some(Definition::Type(_)) => hierarchy.link(&inherits.name, &type_def.name),
            Some(Definition::Primitive(_)) | Some(Definition::Protocol(_)) => {
                errors.push(SemanticError::InvalidInheritance {
                    type_name: type_def.name.clone(),
                    parent: inherits.name.clone(),
                });
            }
            Some(Definition::Function(_)) | None => {
                errors.push(SemanticError::UndefinedType {
                    name: inherits.name.clone(),
                });
            }
        }
    }

    errors.extend(assign_depths(&mut hierarchy));

    tracing::debug!(nodes = hierarchy.len(), errors = errors.len(), "built type hierarchy");
    (hierarchy, errors)
}

/// Depth-first depth assignment from `Object`, then cycle detection over
/// whatever the traversal could not reach.
///
/// A revisit needs a node listed under two parents, which `build_hierarchy`
/// never produces since every type links to exactly one parent.
pub(super) fn assign_depths(hierarchy: &mut Hierarchy) -> Vec<SemanticError> {
    let mut errors = Vec::new();
    let mut visited = HashSet::from([OBJECT.to_string()]);
    let mut stack = vec![OBJECT.to_string()];

    while let Some(name) = stack.pop() {
        let Some(node) = hierarchy.get(&name) else {
            continue;
        };
        let depth = node.depth;
        let children = node.children.clone();

        for child in children {
            if !visited.insert(child.clone()) {
                errors.push(SemanticError::HierarchyRevisit { type_name: child });
                continue;
            }
            if let Some(node) = hierarchy.nodes.get_mut(&child) {
                node.depth = depth + 1;
            }
            stack.push(child);
        }
    }

    let mut unreached: Vec<&String> = hierarchy.order.iter().filter(|name| !visited.contains(*name)).collect();
    unreached.sort();

    let mut classified: HashSet<String> = HashSet::new();
    for start in unreached {
        let mut path: Vec<String> = Vec::new();
        let mut current = Some(start.clone());

        while let Some(name) = current {
            if visited.contains(&name) || classified.contains(&name) {
                break;
            }
            if let Some(position) = path.iter().position(|step| *step == name) {
                let mut types = path[position..].to_vec();
                types.sort();
                tracing::debug!(?types, "inheritance cycle");
                errors.push(SemanticError::HierarchyCycle { types });
                break;
            }
            current = hierarchy.get(&name).and_then(|node| node.parent.clone());
            path.push(name);
        }

        classified.extend(path);
    }

    errors
}

/// Breadth-first walk from `root` checking that every node is reached exactly once.
///
/// Returns the diagnostics and the number of nodes visited.
#[tracing::instrument(level = "debug", skip(hierarchy))]
pub fn check_tree(hierarchy: &Hierarchy, root: &str) -> (Vec<SemanticError>, usize) {
    let mut errors = Vec::new();
    let mut visited = HashSet::new();
    let mut queue = VecDeque::new();

    if hierarchy.contains(root) {
        visited.insert(root.to_string());
        queue.push_back(root.to_string());
    }

    while let Some(name) = queue.pop_front() {
        let Some(node) = hierarchy.get(&name) else {
            continue;
        };

        for child in &node.children {
            if visited.insert(child.clone()) {
                queue.push_back(child.clone());
            } else {
                errors.push(SemanticError::HierarchyRevisit { type_name: child.clone() });
            }
        }
    }

    if visited.len() != hierarchy.len() {
        let mut types: Vec<String> = hierarchy
            .names()
            .filter(|name| !visited.contains(*name))
            .map(str::to_string)
            .collect();
        types.sort();
        errors.push(SemanticError::HierarchyDisconnected { types });
    }

    tracing::debug!(visited = visited.len(), total = hierarchy.len(), "checked type tree");
    (errors, visited.len())
}
