use std::collections::{HashMap, HashSet, VecDeque};

use crate::ast::ast::{Param, Program};

use super::{
    definitions::{GlobalDefinitions, OBJECT},
    hierarchy::Hierarchy,
};

/// Rewrites every reachable type's `params` to its full constructor
/// signature: inherited parameters first, then the declared ones.
///
/// Parents are finalized before their children. Types the traversal cannot
/// reach keep their declared parameters. Running it twice gives the same
/// result.
#[tracing::instrument(level = "debug", skip_all)]
pub fn propagate_parameters(hierarchy: &Hierarchy, definitions: &GlobalDefinitions, program: &mut Program) {
    let mut resolved: HashMap<String, Vec<Param>> = HashMap::from([(OBJECT.to_string(), Vec::new())]);
    let mut visited = HashSet::from([OBJECT.to_string()]);
    let mut queue = VecDeque::from([OBJECT.to_string()]);

    while let Some(name) = queue.pop_front() {
        let Some(node) = hierarchy.get(&name) else {
            continue;
        };
        let inherited = resolved.get(&name).cloned().unwrap_or_default();

        for child in &node.children {
            if !visited.insert(child.clone()) {
                continue;
            }

            let mut params = inherited.clone();
            if let Some(index) = definitions.type_index(child) {
                let type_def = &mut program.types[index];
                params.extend(type_def.declared_params().iter().cloned());
                type_def.params = params.clone();
                tracing::trace!(type_name = %child, count = params.len(), "propagated parameters");
            }

            resolved.insert(child.clone(), params);
            queue.push_back(child.clone());
        }
    }
}
